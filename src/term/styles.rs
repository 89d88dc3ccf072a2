//! Terminal styling helpers
//!
//! Box-drawing characters, cursor control sequences formatted to strings,
//! and conversion from appearance colors to crossterm colors. Everything
//! returns plain `String`s so the renderer can assemble a frame and write
//! it in one go.

use crossterm::style::Color as TermColor;

use crate::appearance::Color;

/// Box-drawing characters for the HUD frame.
pub struct BoxChars;

impl BoxChars {
    pub const TOP_LEFT: &'static str = "╭";
    pub const TOP_RIGHT: &'static str = "╮";
    pub const BOTTOM_LEFT: &'static str = "╰";
    pub const BOTTOM_RIGHT: &'static str = "╯";
    pub const TOP_LEFT_SQUARE: &'static str = "┌";
    pub const TOP_RIGHT_SQUARE: &'static str = "┐";
    pub const BOTTOM_LEFT_SQUARE: &'static str = "└";
    pub const BOTTOM_RIGHT_SQUARE: &'static str = "┘";
    pub const HORIZONTAL: &'static str = "─";
    pub const VERTICAL: &'static str = "│";
}

/// Map an appearance color to a terminal color. Terminals have no alpha;
/// translucent colors are darkened towards black instead.
pub fn term_color(color: Color) -> TermColor {
    let scale = |channel: u8| -> u8 {
        ((channel as u16 * color.a as u16) / 255) as u8
    };
    TermColor::Rgb {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}

/// Cursor control sequences as strings.
pub mod ctrl {
    use crossterm::cursor;
    use crossterm::terminal::{Clear, ClearType};
    use crossterm::Command;

    /// Move cursor to absolute position (1-indexed).
    pub fn move_to(row: u16, col: u16) -> String {
        format!("\x1b[{};{}H", row, col)
    }

    /// Clear the current line.
    pub fn clear_line() -> String {
        let mut buf = String::new();
        let _ = Clear(ClearType::CurrentLine).write_ansi(&mut buf);
        buf
    }

    /// Save cursor position.
    pub fn save_cursor() -> String {
        let mut buf = String::new();
        let _ = cursor::SavePosition.write_ansi(&mut buf);
        buf
    }

    /// Restore cursor position.
    pub fn restore_cursor() -> String {
        let mut buf = String::new();
        let _ = cursor::RestorePosition.write_ansi(&mut buf);
        buf
    }

    /// Hide the cursor.
    pub fn hide_cursor() -> String {
        let mut buf = String::new();
        let _ = cursor::Hide.write_ansi(&mut buf);
        buf
    }

    /// Show the cursor.
    pub fn show_cursor() -> String {
        let mut buf = String::new();
        let _ = cursor::Show.write_ansi(&mut buf);
        buf
    }
}
