//! Color constants for the TUI.

use ratatui::style::Color;

use crate::platform::Platform;

/// Healthy / active component.
pub const STATUS_OK: Color = Color::Green;
/// Degraded or not-yet-tested component.
pub const STATUS_WARN: Color = Color::Yellow;
/// Unhealthy component or failed poll.
pub const STATUS_BAD: Color = Color::Red;
/// Poll in flight.
pub const LOADING: Color = Color::Cyan;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Parameter names in the physics panel.
pub const KEY_FG: Color = Color::Gray;

/// Returns a color for a backend status string.
pub fn status_color(status: &str) -> Color {
    match status {
        "healthy" | "active" | "operational" | "available" => STATUS_OK,
        "unhealthy" | "unavailable" | "down" => STATUS_BAD,
        _ => STATUS_WARN,
    }
}

/// Accent color for the platform badge.
pub fn platform_color(platform: Platform) -> Color {
    match platform {
        Platform::Ios | Platform::MacOs => Color::LightBlue,
        Platform::Android => Color::LightGreen,
        Platform::Windows => Color::Blue,
        Platform::Linux => Color::Yellow,
        Platform::Web => Color::Gray,
    }
}
