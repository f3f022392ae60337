//! Choropleth-style map: one tile per ISO code, shaded by confirmed cases

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use super::render_chrome;
use super::tabs::Tab;
use crate::tui::theme::{intensity_level, IntensityLevel, Theme};
use crate::types::CountryRow;

/// "ITA" plus one column gap
const TILE_WIDTH: u16 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapTile {
    pub iso_code: String,
    pub confirmed: u64,
    pub level: IntensityLevel,
}

/// Tiles for every row with an ISO code, sorted by code.
/// Rows without a code are left out.
pub fn build_tiles<'a>(rows: impl IntoIterator<Item = &'a CountryRow>) -> Vec<MapTile> {
    let mapped: Vec<(&str, u64)> = rows
        .into_iter()
        .filter_map(|r| r.iso_code.as_deref().map(|code| (code, r.confirmed)))
        .collect();
    let max = mapped.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let mut tiles: Vec<MapTile> = mapped
        .into_iter()
        .map(|(code, confirmed)| MapTile {
            iso_code: code.to_string(),
            confirmed,
            level: intensity_level(confirmed, max),
        })
        .collect();
    tiles.sort_by(|a, b| a.iso_code.cmp(&b.iso_code));
    tiles
}

pub struct MapView<'a> {
    tiles: &'a [MapTile],
    unmapped: usize,
    theme: Theme,
}

impl<'a> MapView<'a> {
    pub fn new(tiles: &'a [MapTile], unmapped: usize, theme: Theme) -> Self {
        Self {
            tiles,
            unmapped,
            theme,
        }
    }

    /// Tiles per grid row for a given width
    pub fn columns_for_width(width: u16) -> usize {
        (width / TILE_WIDTH).max(1) as usize
    }
}

impl Widget for MapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chrome = render_chrome(
            area,
            buf,
            Tab::Map,
            self.theme,
            &[("Tab", "Switch view"), ("?", "Help"), ("q", "Quit")],
        );
        if chrome.body.height == 0 {
            return;
        }
        let chunks = Layout::vertical([
            Constraint::Length(1), // heading
            Constraint::Length(1), // blank
            Constraint::Fill(1),   // grid
            Constraint::Length(1), // legend
        ])
        .split(chrome.body);

        if chunks[0].height > 0 {
            buf.set_string(
                chunks[0].x,
                chunks[0].y,
                "Confirmed cases by country (ISO alpha-3)",
                Style::default().fg(self.theme.text()),
            );
        }
        self.render_grid(chunks[2], buf);
        self.render_legend(chunks[3], buf);
    }
}

impl MapView<'_> {
    fn render_grid(&self, area: Rect, buf: &mut Buffer) {
        let columns = Self::columns_for_width(area.width);
        let grid_width = columns as u16 * TILE_WIDTH;
        let x0 = area.x + area.width.saturating_sub(grid_width) / 2;

        for (i, tile) in self.tiles.iter().enumerate() {
            let row = (i / columns) as u16;
            if row >= area.height {
                break;
            }
            let x = x0 + (i % columns) as u16 * TILE_WIDTH;
            let style = Style::default()
                .fg(self.theme.text())
                .bg(self.theme.intensity_color(tile.level));
            buf.set_string(x, area.y + row, &tile.iso_code, style);
        }
    }

    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let mut spans = vec![Span::styled(
            "Fewer ",
            Style::default().fg(self.theme.muted()),
        )];
        for level in IntensityLevel::SCALE {
            spans.push(Span::styled(
                "  ",
                Style::default().bg(self.theme.intensity_color(level)),
            ));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("More", Style::default().fg(self.theme.muted())));
        if self.unmapped > 0 {
            spans.push(Span::styled(
                format!("   ({} countries without ISO code not shown)", self.unmapped),
                Style::default().fg(self.theme.muted()),
            ));
        }
        buf.set_line(area.x, area.y, &Line::from(spans), area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;

    fn row(country: &str, iso: Option<&str>, confirmed: u64) -> CountryRow {
        CountryRow {
            country: country.to_string(),
            iso_code: iso.map(String::from),
            confirmed,
            deaths: 0,
            recovered: 0,
        }
    }

    #[test]
    fn test_build_tiles_excludes_unmapped() {
        let rows = vec![
            row("Italy", Some("ITA"), 200),
            row("Kosovo", None, 50),
            row("China", Some("CHN"), 800),
        ];
        let tiles = build_tiles(&rows);
        let codes: Vec<&str> = tiles.iter().map(|t| t.iso_code.as_str()).collect();
        assert_eq!(codes, vec!["CHN", "ITA"]);
        assert_eq!(tiles[0].level, IntensityLevel::Max);
    }

    #[test]
    fn test_build_tiles_zero_is_none() {
        let rows = vec![row("Italy", Some("ITA"), 0), row("China", Some("CHN"), 10)];
        let tiles = build_tiles(&rows);
        assert_eq!(tiles[1].level, IntensityLevel::None);
    }

    #[test]
    fn test_columns_for_width() {
        assert_eq!(MapView::columns_for_width(80), 20);
        assert_eq!(MapView::columns_for_width(2), 1);
    }

    #[test]
    fn test_map_renders_codes_and_legend() {
        let rows = vec![row("Italy", Some("ITA"), 200), row("Kosovo", None, 50)];
        let tiles = build_tiles(&rows);
        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        MapView::new(&tiles, 1, Theme::Dark).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("ITA"));
        assert!(!text.contains("Kosovo"));
        assert!(text.contains("1 countries without ISO code"));
    }

    #[test]
    fn test_map_on_short_terminal() {
        let rows = vec![row("Italy", Some("ITA"), 200)];
        let tiles = build_tiles(&rows);
        for height in [1, 2, 5] {
            let area = Rect::new(0, 0, 80, height);
            let mut buf = Buffer::empty(area);
            MapView::new(&tiles, 0, Theme::Dark).render(area, &mut buf);
        }
    }
}
