// Color palette for the review screen
use crate::domain::Decision;
use ratatui::style::Color;

/// Delete / destructive actions
pub const ACCENT_PRIMARY: Color = Color::Rgb(239, 83, 80);
/// Keep / safe actions
pub const ACCENT_SECONDARY: Color = Color::Rgb(102, 187, 106);
/// Titles and focus
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(100, 181, 246);

pub const TEXT_PRIMARY: Color = Color::Rgb(236, 239, 241);
pub const TEXT_SECONDARY: Color = Color::Rgb(144, 164, 174);

pub const BG_DARK: Color = Color::Rgb(24, 26, 32);
pub const BORDER_COLOR: Color = Color::Rgb(69, 90, 100);

pub fn decision_color(decision: Decision) -> Color {
    match decision {
        Decision::Keep => ACCENT_SECONDARY,
        Decision::Delete => ACCENT_PRIMARY,
    }
}
