//! Overview: headline totals, top countries and attribution

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::render_chrome;
use super::tabs::Tab;
use crate::tui::theme::Theme;
use crate::types::{CountryRow, DashboardStats};

pub const TITLE: &str = "COVID-19 Live Dashboard";
pub const ATTRIBUTION: &str =
    "Data source: COVID-19 (2019-nCoV) Data Repository by Johns Hopkins CSSE";

/// Countries listed under the headline
pub const TOP_COUNTRIES: usize = 5;

/// Format a number with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

#[derive(Debug)]
pub struct OverviewData<'a> {
    pub stats: &'a DashboardStats,
    /// Rows in default (confirmed descending) order
    pub rows: &'a [CountryRow],
}

pub struct Overview<'a> {
    data: OverviewData<'a>,
    theme: Theme,
}

impl<'a> Overview<'a> {
    pub fn new(data: OverviewData<'a>, theme: Theme) -> Self {
        Self { data, theme }
    }
}

impl Widget for Overview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chrome = render_chrome(
            area,
            buf,
            Tab::Overview,
            self.theme,
            &[("Tab", "Switch view"), ("?", "Help"), ("q", "Quit")],
        );
        if chrome.body.height == 0 {
            return;
        }

        let top_rows = self.data.rows.len().min(TOP_COUNTRIES) as u16;
        let chunks = Layout::vertical([
            Constraint::Length(1),        // title
            Constraint::Length(1),        // blank
            Constraint::Length(2),        // hero stat
            Constraint::Length(1),        // deaths / recovered
            Constraint::Length(1),        // last update / countries
            Constraint::Length(1),        // blank
            Constraint::Length(1),        // top label
            Constraint::Length(top_rows), // top bars
            Constraint::Fill(1),
            Constraint::Length(1), // unmapped note
            Constraint::Length(1), // attribution
        ])
        .split(chrome.body);

        self.render_title(chunks[0], buf);
        self.render_hero_stat(chunks[2], buf);
        self.render_sub_stats(chunks[3], buf);
        self.render_update_line(chunks[4], buf);
        self.render_top_label(chunks[6], buf);
        self.render_top_bars(chunks[7], buf);
        self.render_unmapped(chunks[9], buf);
        self.render_attribution(chunks[10], buf);
    }
}

impl Overview<'_> {
    fn centered(&self, line: Line<'_>, area: Rect, buf: &mut Buffer) {
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        self.centered(
            Line::from(Span::styled(
                TITLE,
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            )),
            area,
            buf,
        );
    }

    fn render_hero_stat(&self, area: Rect, buf: &mut Buffer) {
        let formatted = format_number(self.data.stats.total_confirmed_cases);
        Paragraph::new(vec![
            Line::from(Span::styled(
                formatted,
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "confirmed cases",
                Style::default().fg(self.theme.muted()),
            )),
        ])
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_sub_stats(&self, area: Rect, buf: &mut Buffer) {
        let stats = self.data.stats;
        self.centered(
            Line::from(vec![
                Span::styled(
                    format!("Deaths: {}", format_number(stats.total_deaths)),
                    Style::default().fg(self.theme.error()),
                ),
                Span::raw("   "),
                Span::styled(
                    format!("Recovered: {}", format_number(stats.total_recovered)),
                    Style::default().fg(self.theme.bar()),
                ),
            ]),
            area,
            buf,
        );
    }

    fn render_update_line(&self, area: Rect, buf: &mut Buffer) {
        let stats = self.data.stats;
        self.centered(
            Line::from(vec![
                Span::styled("Last update: ", Style::default().fg(self.theme.muted())),
                Span::styled(
                    stats.last_update.format("%Y-%m-%d").to_string(),
                    Style::default().fg(self.theme.date()),
                ),
                Span::raw("   "),
                Span::styled(
                    "Number of countries: ",
                    Style::default().fg(self.theme.muted()),
                ),
                Span::styled(
                    stats.total_countries.to_string(),
                    Style::default().fg(self.theme.text()),
                ),
            ]),
            area,
            buf,
        );
    }

    fn render_top_label(&self, area: Rect, buf: &mut Buffer) {
        self.centered(
            Line::from(Span::styled(
                "Most confirmed cases:",
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            )),
            area,
            buf,
        );
    }

    fn render_top_bars(&self, area: Rect, buf: &mut Buffer) {
        const NAME_WIDTH: usize = 16;
        const BAR_WIDTH: usize = 24;
        const LINE_WIDTH: usize = NAME_WIDTH + 2 + BAR_WIDTH + 2 + 13;

        let top = &self.data.rows[..self.data.rows.len().min(TOP_COUNTRIES)];
        let max = top.iter().map(|r| r.confirmed).max().unwrap_or(0).max(1);
        let x_offset = area.width.saturating_sub(LINE_WIDTH as u16) / 2;

        for (i, row) in top.iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.y + area.height {
                break;
            }

            let name = if row.country.chars().count() > NAME_WIDTH {
                let cut: String = row.country.chars().take(NAME_WIDTH - 1).collect();
                format!("{}…", cut)
            } else {
                row.country.clone()
            };

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>width$}", name, width = NAME_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
                Span::raw("  "),
                Span::styled(
                    bar(row.confirmed, max, BAR_WIDTH),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::raw("  "),
                Span::styled(
                    format_number(row.confirmed),
                    Style::default().fg(self.theme.text()),
                ),
            ]);
            buf.set_line(area.x + x_offset, y, &line, area.width - x_offset);
        }
    }

    fn render_unmapped(&self, area: Rect, buf: &mut Buffer) {
        let count = self.data.stats.unmapped_countries.len();
        if count == 0 {
            return;
        }
        self.centered(
            Line::from(Span::styled(
                format!("{} countries have no ISO code and are not on the map", count),
                Style::default().fg(self.theme.muted()),
            )),
            area,
            buf,
        );
    }

    fn render_attribution(&self, area: Rect, buf: &mut Buffer) {
        self.centered(
            Line::from(Span::styled(
                ATTRIBUTION,
                Style::default().fg(self.theme.muted()),
            )),
            area,
            buf,
        );
    }
}

/// Filled/empty block bar; non-zero values always get at least one block
pub fn bar(value: u64, max: u64, width: usize) -> String {
    let ratio = if max == 0 {
        0.0
    } else {
        value as f64 / max as f64
    };
    let mut filled = (ratio * width as f64).round() as usize;
    if value > 0 {
        filled = filled.max(1);
    }
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
