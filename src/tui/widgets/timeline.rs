//! Timeline view: worldwide totals per date as a line chart

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Chart, Dataset as ChartDataset, GraphType, Widget},
};

use super::overview::format_number;
use super::render_chrome;
use super::tabs::Tab;
use crate::tui::theme::Theme;
use crate::types::Timeline;

/// What the chart plots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimelineMode {
    /// Cumulative confirmed, deaths and recovered
    #[default]
    Cumulative,
    /// Day-over-day new confirmed cases
    New,
}

impl TimelineMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cumulative => "Cumulative",
            Self::New => "New cases",
        }
    }
}

/// One plotted line
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub points: Vec<(f64, f64)>,
}

fn indexed(values: impl Iterator<Item = u64>) -> Vec<(f64, f64)> {
    values
        .enumerate()
        .map(|(i, v)| (i as f64, v as f64))
        .collect()
}

/// Chart series for `mode`; x is the date column index
pub fn chart_series(timeline: &Timeline, mode: TimelineMode) -> Vec<Series> {
    let points = timeline.points();
    match mode {
        TimelineMode::Cumulative => vec![
            Series {
                name: "Confirmed",
                points: indexed(points.iter().map(|p| p.confirmed)),
            },
            Series {
                name: "Deaths",
                points: indexed(points.iter().map(|p| p.deaths)),
            },
            Series {
                name: "Recovered",
                points: indexed(points.iter().map(|p| p.recovered)),
            },
        ],
        TimelineMode::New => vec![Series {
            name: "New confirmed",
            points: indexed(timeline.daily_new().into_iter().map(|(_, n)| n)),
        }],
    }
}

pub struct TimelineView<'a> {
    timeline: &'a Timeline,
    mode: TimelineMode,
    theme: Theme,
}

impl<'a> TimelineView<'a> {
    pub fn new(timeline: &'a Timeline, mode: TimelineMode, theme: Theme) -> Self {
        Self {
            timeline,
            mode,
            theme,
        }
    }

    fn series_color(&self, name: &str) -> ratatui::style::Color {
        match name {
            "Deaths" => self.theme.error(),
            "Recovered" => self.theme.bar(),
            _ => self.theme.accent(),
        }
    }
}

impl Widget for TimelineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chrome = render_chrome(
            area,
            buf,
            Tab::Timeline,
            self.theme,
            &[
                ("c", "Cumulative"),
                ("n", "New cases"),
                ("Tab", "Switch view"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
        );
        if chrome.body.height == 0 {
            return;
        }
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)])
            .split(chrome.body);

        self.render_mode_line(chunks[0], buf);
        if chunks[1].height == 0 {
            return;
        }

        let points = self.timeline.points();
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            buf.set_string(
                chunks[1].x,
                chunks[1].y,
                "No timeline data",
                Style::default().fg(self.theme.muted()),
            );
            return;
        };

        let series = chart_series(self.timeline, self.mode);
        let y_max = series
            .iter()
            .flat_map(|s| s.points.iter().map(|(_, y)| *y))
            .fold(0.0_f64, f64::max)
            .max(1.0);
        let x_max = (points.len().saturating_sub(1)).max(1) as f64;

        let datasets: Vec<ChartDataset> = series
            .iter()
            .map(|s| {
                ChartDataset::default()
                    .name(s.name)
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.series_color(s.name)))
                    .data(&s.points)
            })
            .collect();

        let muted = Style::default().fg(self.theme.muted());
        let x_labels = vec![
            first.date.format("%Y-%m-%d").to_string(),
            last.date.format("%Y-%m-%d").to_string(),
        ];
        let y_labels = vec![
            "0".to_string(),
            format_number((y_max / 2.0) as u64),
            format_number(y_max as u64),
        ];

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(muted)
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(muted)
                    .bounds([0.0, y_max])
                    .labels(y_labels),
            )
            .render(chunks[1], buf);
    }
}

impl TimelineView<'_> {
    fn render_mode_line(&self, area: Rect, buf: &mut Buffer) {
        let spans: Vec<Span> = [TimelineMode::Cumulative, TimelineMode::New]
            .into_iter()
            .flat_map(|mode| {
                let style = if mode == self.mode {
                    Style::default()
                        .fg(self.theme.accent())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted())
                };
                [Span::styled(mode.label(), style), Span::raw("   ")]
            })
            .collect();
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}
