use crate::ui::theme::Theme;
use chrono::{DateTime, Local};

/// "Generated at: 2024-05-01 12:00:00"
pub fn render_timestamp(now: DateTime<Local>, theme: &Theme) -> String {
    let text = format!("Generated at: {}", now.format("%Y-%m-%d %H:%M:%S"));
    theme.paint(theme.text_dim, &text)
}
