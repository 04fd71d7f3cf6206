use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);
pub const ACCENT_RED: Color = Color::Rgb(224, 92, 84);
pub const FLASH: Color = Color::Rgb(250, 250, 250);

/// Accent color for a species color token; unknown tokens use the default.
pub fn theme_color(token: &str) -> Color {
    match token {
        "black" => Color::Rgb(88, 88, 88),
        "blue" => Color::Rgb(96, 146, 240),
        "brown" => Color::Rgb(176, 112, 64),
        "gray" => Color::Rgb(160, 160, 170),
        "green" => Color::Rgb(104, 196, 112),
        "pink" => Color::Rgb(240, 150, 190),
        "purple" => Color::Rgb(168, 112, 208),
        "red" => Color::Rgb(232, 88, 80),
        "white" => Color::Rgb(226, 226, 226),
        "yellow" => Color::Rgb(242, 204, 72),
        _ => ACCENT_TEAL,
    }
}
