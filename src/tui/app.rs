//! Application state and event loop

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, DefaultTerminal, Frame};

use crate::services::Aggregator;
use crate::types::{CountryRow, CountrySummary, DashboardStats, SortKey, Timeline};

use super::theme::Theme;
use super::widgets::{
    countries::{max_scroll_offset_for, CountriesView},
    help::HelpPopup,
    map::{build_tiles, MapTile, MapView},
    overview::{Overview, OverviewData},
    tabs::Tab,
    timeline::{TimelineMode, TimelineView},
};

/// Everything the views draw, computed once before the terminal is taken over
pub struct AppData {
    pub stats: DashboardStats,
    pub summary: CountrySummary,
    pub timeline: Timeline,
    pub tiles: Vec<MapTile>,
}

impl AppData {
    pub fn from_aggregator(aggregator: &Aggregator) -> Self {
        let summary = aggregator.build_summary();
        let tiles = build_tiles(summary.mapped());
        Self {
            stats: aggregator.stats_for(&summary),
            timeline: aggregator.build_timeline(),
            summary,
            tiles,
        }
    }
}

/// Main application
pub struct App {
    data: AppData,
    theme: Theme,
    should_quit: bool,
    current_tab: Tab,
    sort_key: SortKey,
    /// Summary rows in `sort_key` order
    sorted_rows: Vec<CountryRow>,
    scroll: usize,
    timeline_mode: TimelineMode,
    show_help: bool,
}

impl App {
    pub fn new(data: AppData, theme: Theme) -> Self {
        let sort_key = SortKey::default();
        let sorted_rows = data.summary.sorted_by(sort_key);
        Self {
            data,
            theme,
            should_quit: false,
            current_tab: Tab::default(),
            sort_key,
            sorted_rows,
            scroll: 0,
            timeline_mode: TimelineMode::default(),
            show_help: false,
        }
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.current_tab = self.current_tab.next();
            }
            KeyCode::BackTab => {
                self.current_tab = self.current_tab.prev();
            }
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                    self.current_tab = tab;
                }
            }
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            KeyCode::Up | KeyCode::Char('k') if self.current_tab == Tab::Countries => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') if self.current_tab == Tab::Countries => {
                let max = max_scroll_offset_for(self.sorted_rows.len());
                self.scroll = (self.scroll + 1).min(max);
            }
            KeyCode::Char('s') if self.current_tab == Tab::Countries => {
                self.set_sort_key(self.sort_key.next());
            }
            KeyCode::Char('c') if self.current_tab == Tab::Timeline => {
                self.timeline_mode = TimelineMode::Cumulative;
            }
            KeyCode::Char('n') if self.current_tab == Tab::Timeline => {
                self.timeline_mode = TimelineMode::New;
            }
            _ => {}
        }
    }

    fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.sorted_rows = self.data.summary.sorted_by(key);
        self.scroll = 0;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.current_tab {
            Tab::Overview => Overview::new(
                OverviewData {
                    stats: &self.data.stats,
                    rows: self.data.summary.rows(),
                },
                self.theme,
            )
            .render(area, buf),
            Tab::Map => MapView::new(
                &self.data.tiles,
                self.data.stats.unmapped_countries.len(),
                self.theme,
            )
            .render(area, buf),
            Tab::Countries => {
                CountriesView::new(&self.sorted_rows, self.sort_key, self.scroll, self.theme)
                    .render(area, buf)
            }
            Tab::Timeline => {
                TimelineView::new(&self.data.timeline, self.timeline_mode, self.theme)
                    .render(area, buf)
            }
        }

        if self.show_help {
            let popup_area = HelpPopup::centered_area(area);
            HelpPopup::new(self.theme).render(popup_area, buf);
        }
    }
}

/// Run the dashboard until the user quits
pub fn run(data: AppData) -> anyhow::Result<()> {
    // Detect before raw mode
    let theme = Theme::detect();
    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, App::new(data, theme));
    ratatui::restore();
    result
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(250))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}
