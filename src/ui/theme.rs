use crate::alerts::Status;
use crossterm::style::{Color, ContentStyle, Stylize};
use std::io::IsTerminal;

// ── Color decision ──────────────────────────────────────────────────────

/// Colors are used only when requested, stdout is a terminal and `NO_COLOR`
/// is unset.
pub fn colors_enabled(requested: bool) -> bool {
    requested && std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

// ── Theme struct ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Theme {
    pub enabled:  bool,
    pub title:    ContentStyle,
    pub header:   ContentStyle,
    pub border:   ContentStyle,
    pub device:   ContentStyle,
    pub mount:    ContentStyle,
    pub ok:       ContentStyle,
    pub warn:     ContentStyle,
    pub crit:     ContentStyle,
    pub text_dim: ContentStyle,
    pub json_key:  ContentStyle,
    pub json_str:  ContentStyle,
    pub json_num:  ContentStyle,
    pub json_lit:  ContentStyle,
}

impl Theme {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, ..Self::default() }
    }

    /// Plain theme; `paint` returns text unchanged.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn status_style(&self, status: Status) -> ContentStyle {
        match status {
            Status::Ok       => self.ok,
            Status::Warning  => self.warn,
            Status::Critical => self.crit,
        }
    }

    pub fn paint(&self, style: ContentStyle, text: &str) -> String {
        if self.enabled {
            style.apply(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            enabled:  true,
            title:    ContentStyle::new().bold().italic(),
            header:   ContentStyle::new().bold(),
            border:   ContentStyle::new().with(Color::DarkGrey),
            device:   ContentStyle::new().with(Color::Cyan),
            mount:    ContentStyle::new().with(Color::Magenta),
            ok:       ContentStyle::new().with(Color::White),
            warn:     ContentStyle::new().with(Color::Yellow),
            crit:     ContentStyle::new().with(Color::Red).bold(),
            text_dim: ContentStyle::new().dim(),
            json_key: ContentStyle::new().with(Color::Blue).bold(),
            json_str: ContentStyle::new().with(Color::Green),
            json_num: ContentStyle::new().with(Color::Cyan).bold(),
            json_lit: ContentStyle::new().with(Color::Magenta).italic(),
        }
    }
}
