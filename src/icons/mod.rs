//! Icons and glyph constants used throughout the UI.

// Spinner animation frames (braille characters)
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// Status and check run icons
pub const STATUS_SUCCESS: &str = "✓";
pub const STATUS_FAILURE: &str = "✗";
pub const STATUS_PENDING: &str = "●";
pub const STATUS_ERROR: &str = "!";
pub const STATUS_ATTENTION: &str = "◯";

// Selection indicator
pub const SELECTOR: &str = "▶ ";

// Cursor
pub const CURSOR: &str = "█";

// List/UI elements
pub const COMMENTS: &str = "💬";
pub const SEPARATOR_CHAR: &str = "─";
