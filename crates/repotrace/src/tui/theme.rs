//! Shared theme: the TUI's presentation root.

use std::sync::{Arc, RwLock};

use ratatui::style::Color;
use repotrace_core::{CategoryBand, ScoreBand};
use repotrace_models::DisplayMode;
use repotrace_persistence::PresentationRoot;

/// Process-wide display mode read by every draw call.
///
/// Clones share the same cell. Only the preference store writes to it.
#[derive(Debug, Clone, Default)]
pub struct ThemeRoot {
    mode: Arc<RwLock<DisplayMode>>,
}

impl ThemeRoot {
    /// Creates a root in the default mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the applied mode.
    pub fn mode(&self) -> DisplayMode {
        match self.mode.read() {
            Ok(mode) => *mode,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Returns the palette for the applied mode.
    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.mode())
    }
}

impl PresentationRoot for ThemeRoot {
    fn apply(&self, mode: DisplayMode) {
        match self.mode.write() {
            Ok(mut current) => *current = mode,
            Err(poisoned) => *poisoned.into_inner() = mode,
        }
    }
}

/// Colors for one display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub bar_bg: Color,
    pub bar_fg: Color,
}

impl Palette {
    /// Palette for `mode`.
    pub fn for_mode(mode: DisplayMode) -> Self {
        match mode {
            DisplayMode::Dark => Self {
                background: Color::Rgb(15, 23, 42),
                text: Color::Rgb(241, 245, 249),
                muted: Color::Rgb(148, 163, 184),
                border: Color::Rgb(51, 65, 85),
                accent: Color::Rgb(45, 212, 191),
                bar_bg: Color::Rgb(30, 41, 59),
                bar_fg: Color::White,
            },
            DisplayMode::Light => Self {
                background: Color::Rgb(248, 250, 252),
                text: Color::Rgb(15, 23, 42),
                muted: Color::Rgb(100, 116, 139),
                border: Color::Rgb(203, 213, 225),
                accent: Color::Rgb(13, 148, 136),
                bar_bg: Color::Rgb(226, 232, 240),
                bar_fg: Color::Rgb(15, 23, 42),
            },
        }
    }

    /// Error banner color.
    pub fn error(&self) -> Color {
        ROSE
    }
}

const EMERALD: Color = Color::Rgb(16, 185, 129);
const AMBER: Color = Color::Rgb(245, 158, 11);
const ORANGE: Color = Color::Rgb(249, 115, 22);
const ROSE: Color = Color::Rgb(244, 63, 94);

/// Color for an overall score band.
pub fn score_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Excellent => EMERALD,
        ScoreBand::Good => AMBER,
        ScoreBand::Fair => ORANGE,
        ScoreBand::Poor => ROSE,
    }
}

/// Color for a category band.
pub fn category_color(band: CategoryBand) -> Color {
    match band {
        CategoryBand::Pass => EMERALD,
        CategoryBand::Warn => AMBER,
        CategoryBand::Fail => ROSE,
    }
}

/// Color for a compliance row.
pub fn check_color(passed: bool) -> Color {
    if passed {
        EMERALD
    } else {
        ROSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_clones_share_mode() {
        let root = ThemeRoot::new();
        let view = root.clone();
        assert_eq!(view.mode(), DisplayMode::Dark);

        root.apply(DisplayMode::Light);
        assert_eq!(view.mode(), DisplayMode::Light);

        root.apply(DisplayMode::Light);
        assert_eq!(view.mode(), DisplayMode::Light);
        assert_eq!(view.palette(), Palette::for_mode(DisplayMode::Light));
    }

    #[test]
    fn test_palettes_differ() {
        assert_ne!(
            Palette::for_mode(DisplayMode::Dark),
            Palette::for_mode(DisplayMode::Light)
        );
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(score_color(ScoreBand::Good), AMBER);
        assert_eq!(category_color(CategoryBand::Fail), ROSE);
        assert_eq!(check_color(true), EMERALD);
    }
}
