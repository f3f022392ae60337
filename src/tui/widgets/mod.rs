//! TUI widgets

pub mod countries;
pub mod help;
pub mod map;
pub mod overview;
pub mod tabs;
pub mod timeline;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;
use tabs::{Tab, TabBar};

/// Maximum content width, keeps the layout readable on wide terminals
const MAX_CONTENT_WIDTH: u16 = 140;

/// Areas shared by every view
pub struct ViewChrome {
    pub body: Rect,
}

/// Draw tab bar, separators and key hints; return the body area in between
pub fn render_chrome(
    area: Rect,
    buf: &mut Buffer,
    tab: Tab,
    theme: Theme,
    bindings: &[(&str, &str)],
) -> ViewChrome {
    let content_width = area.width.min(MAX_CONTENT_WIDTH);
    let centered = Rect {
        x: area.x + area.width.saturating_sub(content_width) / 2,
        width: content_width,
        ..area
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // tab bar
        Constraint::Length(1), // separator
        Constraint::Fill(1),   // body
        Constraint::Length(1), // separator
        Constraint::Length(1), // key hints
    ])
    .split(centered);

    TabBar::new(tab, theme).render(chunks[0], buf);
    render_separator(chunks[1], buf, theme);
    render_separator(chunks[3], buf, theme);
    render_keybindings(chunks[4], buf, theme, bindings);

    ViewChrome { body: chunks[2] }
}

pub fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    if area.height == 0 {
        return;
    }
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}

/// `key: action` hints, centered
pub fn render_keybindings(area: Rect, buf: &mut Buffer, theme: Theme, bindings: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(bindings.len() * 3);
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(theme.accent())));
        spans.push(Span::styled(
            format!(": {}", action),
            Style::default().fg(theme.muted()),
        ));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_reserves_four_rows() {
        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        let chrome = render_chrome(area, &mut buf, Tab::Overview, Theme::Dark, &[("q", "Quit")]);
        assert_eq!(chrome.body.height, 16);
        assert_eq!(chrome.body.y, 2);
        assert!(buffer_text(&buf).contains("q: Quit"));
    }
}
