//! Terminal theme detection and color definitions

use ratatui::style::Color;

/// Choropleth intensity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityLevel {
    None,
    Low,
    Medium,
    High,
    Max,
}

impl IntensityLevel {
    /// Non-empty levels, lowest first
    pub const SCALE: [IntensityLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Max];
}

/// Bucket `value` on a log scale relative to `max`
pub fn intensity_level(value: u64, max: u64) -> IntensityLevel {
    if value == 0 || max == 0 {
        return IntensityLevel::None;
    }
    let ratio = (value as f64).ln_1p() / (max as f64).ln_1p();
    if ratio >= 0.9 {
        IntensityLevel::Max
    } else if ratio >= 0.75 {
        IntensityLevel::High
    } else if ratio >= 0.5 {
        IntensityLevel::Medium
    } else {
        IntensityLevel::Low
    }
}

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Selected tabs, keybinding keys, confirmed counts
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Separators, inactive tabs, hints
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Bars and recovered counts
    pub fn bar(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    /// Errors and death counts
    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Map tile color
    pub fn intensity_color(self, level: IntensityLevel) -> Color {
        match self {
            Self::Dark => match level {
                IntensityLevel::None => Color::Indexed(236),
                IntensityLevel::Low => Color::Indexed(52),
                IntensityLevel::Medium => Color::Indexed(88),
                IntensityLevel::High => Color::Indexed(160),
                IntensityLevel::Max => Color::Indexed(196),
            },
            Self::Light => match level {
                IntensityLevel::None => Color::Indexed(254),
                IntensityLevel::Low => Color::Indexed(224),
                IntensityLevel::Medium => Color::Indexed(210),
                IntensityLevel::High => Color::Indexed(167),
                IntensityLevel::Max => Color::Indexed(124),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_colors() {
        let t = Theme::Dark;
        assert_eq!(t.text(), Color::White);
        assert_eq!(t.accent(), Color::Cyan);
        assert_eq!(t.muted(), Color::DarkGray);
        assert_eq!(t.date(), Color::Yellow);
        assert_eq!(t.bar(), Color::Green);
        assert_eq!(t.error(), Color::Red);
    }

    #[test]
    fn test_light_theme_colors() {
        let t = Theme::Light;
        assert_eq!(t.text(), Color::Black);
        assert_eq!(t.accent(), Color::Indexed(25));
        assert_eq!(t.error(), Color::Indexed(124));
    }

    #[test]
    fn test_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_intensity_colors_distinct() {
        for theme in [Theme::Dark, Theme::Light] {
            let mut colors: Vec<Color> = IntensityLevel::SCALE
                .iter()
                .map(|l| theme.intensity_color(*l))
                .collect();
            colors.push(theme.intensity_color(IntensityLevel::None));
            colors.dedup();
            assert_eq!(colors.len(), 5);
        }
    }

    // ========== intensity level tests ==========

    #[test]
    fn test_intensity_zero() {
        assert_eq!(intensity_level(0, 1000), IntensityLevel::None);
        assert_eq!(intensity_level(10, 0), IntensityLevel::None);
    }

    #[test]
    fn test_intensity_max_value() {
        assert_eq!(intensity_level(1_000_000, 1_000_000), IntensityLevel::Max);
    }

    #[test]
    fn test_intensity_log_scale() {
        // ln(1001)/ln(1000001) is about 0.5
        assert_eq!(intensity_level(1_000, 1_000_000), IntensityLevel::Medium);
        assert_eq!(intensity_level(10, 1_000_000), IntensityLevel::Low);
        assert_eq!(intensity_level(100_000, 1_000_000), IntensityLevel::High);
    }
}
