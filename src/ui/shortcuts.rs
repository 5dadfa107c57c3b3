//! Keyboard shortcut constants for consistent documentation.

pub const SEARCH: &str = "Ctrl+K";
pub const SEARCH_ALT: &str = "/";
pub const THEME: &str = "F2";
pub const QUIT: &str = "q/Esc";
pub const BACK: &str = "Backspace";
pub const OPEN: &str = "Enter";

// Pages
pub const HOME: &str = "h";
pub const COLLECTIONS: &str = "c";
pub const ALL_POSTS: &str = "a";
pub const PAGE_PREV_NEXT: &str = "Left/Right";

// Search dialog
pub const CLOSE_SEARCH: &str = "Ctrl+W";
pub const ESCAPE_SEARCH: &str = "Esc";
pub const RESULT_NAV: &str = "Up/Down";
