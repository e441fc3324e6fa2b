use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightCyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const VENDOR: Color = Color::BrightBlue;
pub const SUCCESS: Color = Color::Green;
pub const FAILURE: Color = Color::Red;
pub const UNDETECTED: Color = Color::Yellow;
