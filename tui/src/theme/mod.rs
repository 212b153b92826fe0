//! Theme and Colors
//!
//! GreenHero's palette: leafy greens for progress, gold for coins, and the
//! achievement metals for badges.

use ratatui::style::{Color, Modifier, Style};

use greenhero_core::{AchievementLevel, ConfidenceBand, NotifyLevel};

// ============================================================================
// Brand Palette
// ============================================================================

/// Primary leaf green (titles, active tab)
pub const LEAF_GREEN: Color = Color::Rgb(76, 175, 80);

/// Dark forest green (borders)
pub const FOREST_GREEN: Color = Color::Rgb(46, 125, 50);

/// Light mint (selection background)
pub const MINT: Color = Color::Rgb(200, 240, 210);

/// Green Coin gold
pub const COIN_GOLD: Color = Color::Rgb(255, 193, 7);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(120, 120, 120);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 170, 60);

/// Info sky blue
pub const INFO_BLUE: Color = Color::Rgb(100, 180, 255);

// ============================================================================
// Achievement Metals
// ============================================================================

/// Bronze badge
pub const BRONZE: Color = Color::Rgb(205, 127, 50);

/// Silver badge
pub const SILVER: Color = Color::Rgb(192, 192, 192);

/// Gold badge
pub const GOLD: Color = Color::Rgb(255, 215, 0);

/// Diamond badge
pub const DIAMOND: Color = Color::Rgb(185, 242, 255);

/// Color for an achievement level
pub fn level_color(level: AchievementLevel) -> Color {
    match level {
        AchievementLevel::Bronze => BRONZE,
        AchievementLevel::Silver => SILVER,
        AchievementLevel::Gold => GOLD,
        AchievementLevel::Diamond => DIAMOND,
    }
}

/// Color for a notification level
pub fn notify_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => INFO_BLUE,
        NotifyLevel::Success => LEAF_GREEN,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
    }
}

/// Color for a confidence band
pub fn confidence_color(band: ConfidenceBand) -> Color {
    match band {
        ConfidenceBand::High => LEAF_GREEN,
        ConfidenceBand::Medium => WARNING_AMBER,
        ConfidenceBand::Low => ERROR_RED,
    }
}

/// Style for titles
pub fn title_style() -> Style {
    Style::default().fg(LEAF_GREEN).add_modifier(Modifier::BOLD)
}

/// Style for a selected list row
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(MINT)
        .add_modifier(Modifier::BOLD)
}

/// Style for coin amounts
pub fn coin_style() -> Style {
    Style::default().fg(COIN_GOLD).add_modifier(Modifier::BOLD)
}
