//! Incremental post search.
//!
//! - **[`controller`]**: debounced query dispatch with sequence-stamped,
//!   cancellable requests.
//! - **[`state`]**: the `Idle / Loading / Success / Error` state record.
//! - **[`highlight`]**: markup-free, case-insensitive query highlighting and
//!   excerpt truncation.
//! - **[`render`]**: status-dependent results panel model.
//! - **[`dialog`]**: open/close lifecycle, shortcut, Escape and route handling.

pub mod controller;
pub mod dialog;
pub mod highlight;
pub mod render;
pub mod state;

pub use controller::SearchController;
pub use dialog::SearchDialog;
pub use state::{SearchState, SearchStatus};
