//! Countries view: scrollable, sortable summary table

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use super::overview::format_number;
use super::render_chrome;
use super::tabs::Tab;
use crate::tui::theme::Theme;
use crate::types::{CountryRow, SortKey};

/// Visible rows for scrolling (excluding header)
pub const VISIBLE_ROWS: usize = 20;

const RANK_WIDTH: usize = 4;
const COUNTRY_WIDTH: usize = 28;
const ISO_WIDTH: usize = 5;
const COUNT_WIDTH: usize = 14;
const TABLE_WIDTH: usize = RANK_WIDTH + COUNTRY_WIDTH + ISO_WIDTH + COUNT_WIDTH * 3;

/// Largest scroll offset that still fills the view
pub fn max_scroll_offset_for(count: usize) -> usize {
    count.saturating_sub(VISIBLE_ROWS)
}

pub struct CountriesView<'a> {
    rows: &'a [CountryRow],
    sort_key: SortKey,
    scroll_offset: usize,
    theme: Theme,
}

impl<'a> CountriesView<'a> {
    /// `rows` must already be ordered by `sort_key`
    pub fn new(
        rows: &'a [CountryRow],
        sort_key: SortKey,
        scroll_offset: usize,
        theme: Theme,
    ) -> Self {
        Self {
            rows,
            sort_key,
            scroll_offset,
            theme,
        }
    }
}

impl Widget for CountriesView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chrome = render_chrome(
            area,
            buf,
            Tab::Countries,
            self.theme,
            &[
                ("j/k", "Scroll"),
                ("s", "Sort"),
                ("Tab", "Switch view"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
        );
        if chrome.body.height == 0 {
            return;
        }

        let chunks = Layout::vertical([
            Constraint::Length(1), // header
            Constraint::Fill(1),   // rows
            Constraint::Length(1), // position
        ])
        .split(chrome.body);

        let x_offset = chrome.body.width.saturating_sub(TABLE_WIDTH as u16) / 2;
        self.render_header(chunks[0], x_offset, buf);
        self.render_rows(chunks[1], x_offset, buf);
        self.render_position(chunks[2], x_offset, buf);
    }
}

impl CountriesView<'_> {
    fn header_label(&self, key: SortKey) -> String {
        if key == self.sort_key {
            format!("{} ▼", key.label())
        } else {
            key.label().to_string()
        }
    }

    fn render_header(&self, area: Rect, x_offset: u16, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let style = Style::default()
            .fg(self.theme.text())
            .add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::styled(format!("{:>w$}", "#", w = RANK_WIDTH - 1), style),
            Span::raw(" "),
            Span::styled(
                format!("{:<w$}", self.header_label(SortKey::Country), w = COUNTRY_WIDTH),
                style,
            ),
            Span::styled(format!("{:<w$}", "ISO", w = ISO_WIDTH), style),
            Span::styled(
                format!("{:>w$}", self.header_label(SortKey::Confirmed), w = COUNT_WIDTH),
                style,
            ),
            Span::styled(
                format!("{:>w$}", self.header_label(SortKey::Deaths), w = COUNT_WIDTH),
                style,
            ),
            Span::styled(
                format!("{:>w$}", self.header_label(SortKey::Recovered), w = COUNT_WIDTH),
                style,
            ),
        ]);
        buf.set_line(area.x + x_offset, area.y, &line, area.width - x_offset);
    }

    fn render_rows(&self, area: Rect, x_offset: u16, buf: &mut Buffer) {
        let start = self.scroll_offset.min(self.rows.len());
        let end = (start + area.height as usize).min(self.rows.len());

        for (i, row) in self.rows[start..end].iter().enumerate() {
            let y = area.y + i as u16;
            let name = if row.country.chars().count() > COUNTRY_WIDTH - 1 {
                let cut: String = row.country.chars().take(COUNTRY_WIDTH - 2).collect();
                format!("{}…", cut)
            } else {
                row.country.clone()
            };
            let iso = row.iso_code.as_deref().unwrap_or("-");

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>w$} ", start + i + 1, w = RANK_WIDTH - 1),
                    Style::default().fg(self.theme.muted()),
                ),
                Span::styled(
                    format!("{:<w$}", name, w = COUNTRY_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:<w$}", iso, w = ISO_WIDTH),
                    Style::default().fg(self.theme.muted()),
                ),
                Span::styled(
                    format!("{:>w$}", format_number(row.confirmed), w = COUNT_WIDTH),
                    Style::default().fg(self.theme.accent()),
                ),
                Span::styled(
                    format!("{:>w$}", format_number(row.deaths), w = COUNT_WIDTH),
                    Style::default().fg(self.theme.error()),
                ),
                Span::styled(
                    format!("{:>w$}", format_number(row.recovered), w = COUNT_WIDTH),
                    Style::default().fg(self.theme.bar()),
                ),
            ]);
            buf.set_line(area.x + x_offset, y, &line, area.width - x_offset);
        }
    }

    fn render_position(&self, area: Rect, x_offset: u16, buf: &mut Buffer) {
        if self.rows.is_empty() || area.height == 0 {
            return;
        }
        let first = self.scroll_offset.min(self.rows.len() - 1) + 1;
        let last = (self.scroll_offset + VISIBLE_ROWS).min(self.rows.len());
        buf.set_string(
            area.x + x_offset,
            area.y,
            format!("{}-{} of {} countries", first, last, self.rows.len()),
            Style::default().fg(self.theme.muted()),
        );
    }
}
