use ratatui::style::{Color, Modifier, Style};
use roi_core::metrics::RoiSegment;

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by roi-ui
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_accent: Style,
    pub separator: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── ROI segments ─────────────────────────────────────────────────────────
    pub roi_high: Style,
    pub roi_medium: Style,
    pub roi_low: Style,

    // ── Tabs and focus ───────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border: Style,
    pub border_focused: Style,
    pub cursor: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    /// Series colours, assigned to platforms in legend order.
    pub platform_palette: Vec<Color>,
    pub axis: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            roi_high: Style::default().fg(Color::Green),
            roi_medium: Style::default().fg(Color::Yellow),
            roi_low: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::Gray),
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            cursor: Style::default().add_modifier(Modifier::REVERSED),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            platform_palette: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::LightBlue,
                Color::LightRed,
            ],
            axis: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_accent: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            roi_high: Style::default().fg(Color::Green),
            roi_medium: Style::default().fg(Color::Yellow),
            roi_low: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            border_focused: Style::default().fg(Color::Blue),
            cursor: Style::default().add_modifier(Modifier::REVERSED),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),

            platform_palette: vec![
                Color::Blue,
                Color::Magenta,
                Color::Red,
                Color::Green,
                Color::DarkGray,
                Color::Cyan,
            ],
            axis: Style::default().fg(Color::DarkGray),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// No bold modifiers, for minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_accent: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            roi_high: Style::default().fg(Color::Green),
            roi_medium: Style::default().fg(Color::Yellow),
            roi_low: Style::default().fg(Color::Red),

            tab_active: Style::default().fg(Color::Cyan),
            tab_inactive: Style::default().fg(Color::Gray),
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            cursor: Style::default().add_modifier(Modifier::REVERSED),

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),

            platform_palette: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::Blue,
                Color::Red,
            ],
            axis: Style::default().fg(Color::Gray),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    pub fn segment_style(&self, segment: RoiSegment) -> Style {
        match segment {
            RoiSegment::High => self.roi_high,
            RoiSegment::Medium => self.roi_medium,
            RoiSegment::Low => self.roi_low,
        }
    }

    /// Style a ROAS value by the segment it would fall into.
    pub fn roas_style(&self, roas: Option<f64>) -> Style {
        self.segment_style(RoiSegment::classify(roas))
    }

    /// Series colour for the platform at `index` in legend order, cycling
    /// through the palette.
    pub fn platform_color(&self, index: usize) -> Color {
        if self.platform_palette.is_empty() {
            return Color::Reset;
        }
        self.platform_palette[index % self.platform_palette.len()]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    // ── Theme construction ───────────────────────────────────────────────────

    #[test]
    fn test_dark_theme_creation() {
        let t = Theme::dark();
        assert_eq!(t.header.fg, Some(Color::Cyan));
        assert_eq!(t.success.fg, Some(Color::Green));
        assert_eq!(t.roi_high.fg, Some(Color::Green));
        assert_eq!(t.roi_medium.fg, Some(Color::Yellow));
        assert_eq!(t.roi_low.fg, Some(Color::Red));
        assert!(!t.platform_palette.is_empty());
    }

    #[test]
    fn test_light_theme_creation() {
        let t = Theme::light();
        assert_eq!(t.header.fg, Some(Color::Blue));
        assert_eq!(t.text.fg, Some(Color::Black));
        assert_eq!(t.table_row.fg, Some(Color::Black));
        assert_eq!(t.platform_color(0), Color::Blue);
    }

    #[test]
    fn test_classic_theme_creation() {
        let t = Theme::classic();
        assert!(!t.bold.add_modifier.contains(Modifier::BOLD));
        assert!(!t.tab_active.add_modifier.contains(Modifier::BOLD));
        assert_eq!(t.header.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_from_name_dark() {
        let t = Theme::from_name("dark");
        assert_eq!(t.header.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_from_name_light() {
        let t = Theme::from_name("light");
        assert_eq!(t.header.fg, Some(Color::Blue));
    }

    #[test]
    fn test_from_name_unknown_falls_back() {
        let t = Theme::from_name("does-not-exist");
        assert!(t.header.fg.is_some());
    }

    // ── segment / ROAS styles ────────────────────────────────────────────────

    #[test]
    fn test_segment_style() {
        let t = Theme::dark();
        assert_eq!(t.segment_style(RoiSegment::High).fg, Some(Color::Green));
        assert_eq!(t.segment_style(RoiSegment::Medium).fg, Some(Color::Yellow));
        assert_eq!(t.segment_style(RoiSegment::Low).fg, Some(Color::Red));
    }

    #[test]
    fn test_roas_style_follows_thresholds() {
        let t = Theme::dark();
        assert_eq!(t.roas_style(Some(3.0)).fg, Some(Color::Green));
        assert_eq!(t.roas_style(Some(1.5)).fg, Some(Color::Yellow));
        assert_eq!(t.roas_style(Some(1.49)).fg, Some(Color::Red));
        assert_eq!(t.roas_style(None).fg, Some(Color::Red));
    }

    #[test]
    fn test_platform_color_cycles() {
        let t = Theme::dark();
        let n = t.platform_palette.len();
        assert_eq!(t.platform_color(0), t.platform_color(n));
        assert_ne!(t.platform_color(0), t.platform_color(1));
    }
}
