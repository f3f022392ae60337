//! Tab bar widget for view navigation

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::tui::theme::Theme;

/// Dashboard views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Map,
    Countries,
    Timeline,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Map => "Map",
            Self::Countries => "Countries",
            Self::Timeline => "Timeline",
        }
    }

    /// All tabs in display order
    pub fn all() -> &'static [Tab] {
        &[Tab::Overview, Tab::Map, Tab::Countries, Tab::Timeline]
    }

    fn position(self) -> usize {
        Self::all().iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Next tab (wrapping)
    pub fn next(self) -> Self {
        let all = Self::all();
        all[(self.position() + 1) % all.len()]
    }

    /// Previous tab (wrapping)
    pub fn prev(self) -> Self {
        let all = Self::all();
        all[(self.position() + all.len() - 1) % all.len()]
    }

    /// Tab for number key 1-4
    pub fn from_number(n: u8) -> Option<Self> {
        Self::all().get((n as usize).checked_sub(1)?).copied()
    }
}

/// Centered tab bar, selected tab in brackets
pub struct TabBar {
    selected: Tab,
    theme: Theme,
}

impl TabBar {
    pub fn new(selected: Tab, theme: Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let labels: Vec<(Tab, String)> = Tab::all()
            .iter()
            .map(|tab| {
                let label = if *tab == self.selected {
                    format!("[{}]", tab.label())
                } else {
                    tab.label().to_string()
                };
                (*tab, label)
            })
            .collect();

        let total_width = labels
            .iter()
            .map(|(_, l)| l.len() as u16 + 2)
            .sum::<u16>()
            .saturating_sub(2);

        let mut x = area.x + area.width.saturating_sub(total_width) / 2;
        for (tab, label) in labels {
            let width = label.len() as u16;
            if x + width > area.x + area.width {
                break;
            }
            let style = if tab == self.selected {
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.muted())
            };
            buf.set_string(x, area.y, &label, style);
            x += width + 2;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_all() {
        assert_eq!(
            Tab::all(),
            &[Tab::Overview, Tab::Map, Tab::Countries, Tab::Timeline]
        );
    }

    #[test]
    fn test_tab_next_prev_wrap() {
        assert_eq!(Tab::Overview.next(), Tab::Map);
        assert_eq!(Tab::Timeline.next(), Tab::Overview);
        assert_eq!(Tab::Overview.prev(), Tab::Timeline);
        assert_eq!(Tab::Countries.prev(), Tab::Map);
    }

    #[test]
    fn test_tab_from_number() {
        assert_eq!(Tab::from_number(1), Some(Tab::Overview));
        assert_eq!(Tab::from_number(3), Some(Tab::Countries));
        assert_eq!(Tab::from_number(4), Some(Tab::Timeline));
        assert_eq!(Tab::from_number(0), None);
        assert_eq!(Tab::from_number(5), None);
    }

    #[test]
    fn test_tab_bar_highlights_selected() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        TabBar::new(Tab::Map, Theme::Dark).render(area, &mut buf);
        let line: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(line.contains("[Map]"));
        assert!(line.contains("Timeline"));
    }
}
