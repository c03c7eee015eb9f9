use crate::models::mount::{StorageRow, Unit};
use crate::ui::theme::Theme;
use crate::util::human::{fmt_pct, fmt_size};
use crossterm::style::ContentStyle;

const TITLE: &str = "Current Storage Status";

#[derive(Clone, Copy, PartialEq)]
enum Align {
    Left,
    Right,
}

struct Cell {
    text:  String,
    style: Option<ContentStyle>,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self { text, style: None }
    }

    fn styled(text: String, style: ContentStyle) -> Self {
        Self { text, style: Some(style) }
    }
}

/// Render rows as a boxed table with a separator line between rows.
pub fn render(rows: &[StorageRow], unit: Unit, theme: &Theme) -> String {
    if rows.is_empty() {
        return "No filesystems matched.\n".to_string();
    }

    let u = unit.label();
    let headers = [
        "Device".to_string(),
        "Mount Point".to_string(),
        format!("Total ({})", u),
        format!("Used ({})", u),
        format!("Free ({})", u),
        "Use %".to_string(),
        "Filesystem".to_string(),
    ];
    let aligns = [
        Align::Left, Align::Left, Align::Right, Align::Right, Align::Right, Align::Right, Align::Left,
    ];

    let body: Vec<[Cell; 7]> = rows.iter().map(|r| {
        [
            Cell::styled(r.record.device.clone(), theme.device),
            Cell::styled(r.record.mountpoint.clone(), theme.mount),
            Cell::plain(fmt_size(r.total)),
            Cell::plain(fmt_size(r.used)),
            Cell::plain(fmt_size(r.free)),
            Cell::styled(fmt_pct(r.percent()), theme.status_style(r.status)),
            Cell::plain(r.record.fs_type.clone()),
        ]
    }).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (w, c) in widths.iter_mut().zip(cells.iter()) {
            *w = (*w).max(c.text.chars().count());
        }
    }

    let inner: usize = widths.iter().map(|w| w + 2).sum::<usize>() + widths.len() - 1;
    let mut out = String::new();

    // Title, centred over the table
    let pad = inner.saturating_sub(TITLE.len()) / 2 + 1;
    out.push_str(&" ".repeat(pad));
    out.push_str(&theme.paint(theme.title, TITLE));
    out.push('\n');

    out.push_str(&rule(&widths, theme, '┌', '┬', '┐'));
    let header_cells: Vec<String> = headers.iter().zip(widths.iter())
        .map(|(h, &w)| theme.paint(theme.header, &pad_to(h, w, Align::Left)))
        .collect();
    out.push_str(&line(&header_cells, theme));
    out.push_str(&rule(&widths, theme, '├', '┼', '┤'));

    for (i, cells) in body.iter().enumerate() {
        if i > 0 {
            out.push_str(&rule(&widths, theme, '├', '┼', '┤'));
        }
        let rendered: Vec<String> = cells.iter().zip(widths.iter()).zip(aligns.iter())
            .map(|((c, &w), &a)| {
                let padded = pad_to(&c.text, w, a);
                match c.style {
                    Some(style) => theme.paint(style, &padded),
                    None        => padded,
                }
            })
            .collect();
        out.push_str(&line(&rendered, theme));
    }

    out.push_str(&rule(&widths, theme, '└', '┴', '┘'));
    out
}

fn pad_to(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left  => format!("{:<width$}", text, width = width),
        Align::Right => format!("{:>width$}", text, width = width),
    }
}

fn rule(widths: &[usize], theme: &Theme, left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    let joined = segments.join(&mid.to_string());
    format!("{}\n", theme.paint(theme.border, &format!("{}{}{}", left, joined, right)))
}

fn line(cells: &[String], theme: &Theme) -> String {
    let bar = theme.paint(theme.border, "│");
    let mut s = bar.clone();
    for c in cells {
        s.push(' ');
        s.push_str(c);
        s.push(' ');
        s.push_str(&bar);
    }
    s.push('\n');
    s
}
