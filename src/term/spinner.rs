//! Braille spinner animation for the loading accessory

use std::time::Duration;

/// Braille spinner frames.
pub const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// How often the spinner advances a frame.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner character for the given frame counter.
pub fn spinner_char(frame: u8) -> char {
    SPINNER_FRAMES[(frame as usize) % SPINNER_FRAMES.len()]
}
