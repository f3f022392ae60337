//! Help popup widget - displays keyboard shortcuts

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::tui::theme::Theme;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const POPUP_WIDTH: u16 = 46;
const POPUP_HEIGHT: u16 = 18;

const NAVIGATION: [(&str, &str); 4] = [
    ("Tab / Shift+Tab", "Switch view"),
    ("1-4", "Jump to view"),
    ("Up/Down or j/k", "Scroll (Countries)"),
    ("s", "Cycle sort (Countries)"),
];

const GENERAL: [(&str, &str); 3] = [
    ("c / n", "Timeline mode"),
    ("q / Esc", "Quit"),
    ("?", "Toggle help"),
];

/// Help popup widget showing keyboard shortcuts
pub struct HelpPopup {
    theme: Theme,
}

impl HelpPopup {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// Centered popup area, clamped to the terminal
    pub fn centered_area(area: Rect) -> Rect {
        let x = area.x + (area.width.saturating_sub(POPUP_WIDTH)) / 2;
        let y = area.y + (area.height.saturating_sub(POPUP_HEIGHT)) / 2;
        Rect {
            x,
            y,
            width: POPUP_WIDTH.min(area.width),
            height: POPUP_HEIGHT.min(area.height),
        }
    }

    fn render_section(
        &self,
        title: &str,
        entries: &[(&str, &str)],
        areas: &[Rect],
        buf: &mut Buffer,
    ) {
        if areas.iter().all(|a| a.height == 0) {
            return;
        }
        Paragraph::new(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        )))
        .render(areas[0], buf);

        if areas[1].height > 0 {
            let sep = "─".repeat(areas[1].width as usize);
            buf.set_string(
                areas[1].x,
                areas[1].y,
                &sep,
                Style::default().fg(self.theme.muted()),
            );
        }

        for ((key, desc), area) in entries.iter().zip(&areas[2..]) {
            let line = Line::from(vec![
                Span::styled(
                    format!("  {:<18}", key),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(*desc, Style::default().fg(self.theme.text())),
            ]);
            Paragraph::new(line).render(*area, buf);
        }
    }
}

impl Widget for HelpPopup {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .title(format!(" covidash v{} ", VERSION))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        let nav_rows = 2 + NAVIGATION.len();
        let gen_rows = 2 + GENERAL.len();
        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(std::iter::repeat_n(Constraint::Length(1), nav_rows));
        constraints.push(Constraint::Length(1));
        constraints.extend(std::iter::repeat_n(Constraint::Length(1), gen_rows));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1)); // close hint
        constraints.push(Constraint::Min(0));
        let chunks = Layout::vertical(constraints).split(inner);

        let nav_start = 1;
        let gen_start = nav_start + nav_rows + 1;
        self.render_section(
            "Navigation",
            &NAVIGATION,
            &chunks[nav_start..nav_start + nav_rows],
            buf,
        );
        self.render_section(
            "General",
            &GENERAL,
            &chunks[gen_start..gen_start + gen_rows],
            buf,
        );

        Paragraph::new(Line::from(Span::styled(
            "Press ? to close",
            Style::default().fg(self.theme.muted()),
        )))
        .alignment(Alignment::Center)
        .render(chunks[gen_start + gen_rows + 1], buf);
    }
}
