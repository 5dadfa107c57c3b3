pub mod components;
pub mod document;
pub mod shortcuts;
pub mod tui;
