//! Colors for the dashboard.

use feedchart_core::ColorCode;
use ratatui::style::Color;

/// Axis, label, and grid color of the chart.
pub const AXIS: Color = Color::Rgb(0x69, 0x7b, 0x6d);

/// Color palette for the dashboard.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Title and overlay borders
    pub header: Color,
    /// Hotkey hints
    pub hotkey: Color,
    /// Normal text
    pub text: Color,
    /// Secondary text (clock, counters)
    pub text_dim: Color,
    /// Panel borders
    pub border_dim: Color,
    /// Chart axis and category labels
    pub axis: Color,
    /// Bars whose category has no palette entry
    pub bar_fallback: Color,
    /// Status: connected
    pub status_healthy: Color,
    /// Status: reconnecting
    pub status_warning: Color,
    /// Status: last error
    pub status_error: Color,
}

/// Complete theme definition.
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: ThemeColors,
}

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            colors: ThemeColors {
                header: Color::Cyan,
                hotkey: Color::Yellow,
                text: Color::White,
                text_dim: Color::Gray,
                border_dim: Color::DarkGray,
                axis: AXIS,
                bar_fallback: Color::Rgb(0xc9, 0xcb, 0xcf),
                status_healthy: Color::Green,
                status_warning: Color::Yellow,
                status_error: Color::Red,
            },
        }
    }

    /// Terminal color for a bar. Unknown categories get the fallback.
    pub fn bar_color(&self, code: Option<ColorCode>) -> Color {
        code.and_then(to_color).unwrap_or(self.colors.bar_fallback)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

/// Convert a palette code to a true-color terminal color. Alpha is dropped.
pub fn to_color(code: ColorCode) -> Option<Color> {
    code.rgb().map(|(r, g, b)| Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedchart_core::palette;

    #[test]
    fn test_palette_colors_convert() {
        assert_eq!(to_color(palette::GRANDE), Some(Color::Rgb(0xfc, 0xff, 0x32)));
        assert_eq!(to_color(palette::MEDIA), Some(Color::Rgb(0x34, 0xe7, 0x58)));
        assert_eq!(to_color(palette::PEQUENA), Some(Color::Rgb(0xba, 0x66, 0xf5)));
    }

    #[test]
    fn test_unknown_category_uses_fallback() {
        let theme = Theme::default();
        assert_eq!(theme.bar_color(None), theme.colors.bar_fallback);
        assert_eq!(
            theme.bar_color(Some(palette::MEDIA)),
            Color::Rgb(0x34, 0xe7, 0x58)
        );
    }

    #[test]
    fn test_axis_color() {
        assert_eq!(Theme::default().colors.axis, Color::Rgb(105, 123, 109));
    }
}
