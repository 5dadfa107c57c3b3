use crate::model::types::ContentItem;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl SearchStatus {
    pub fn label(self) -> &'static str {
        match self {
            SearchStatus::Idle => "idle",
            SearchStatus::Loading => "loading",
            SearchStatus::Success => "success",
            SearchStatus::Error => "error",
        }
    }
}

/// Everything the search dialog shows. Owned by a single controller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub status: SearchStatus,
    /// API relevance order. Kept while `Loading` so the previous list stays
    /// visible until the new response lands.
    pub results: Vec<ContentItem>,
    /// Only set in the `Error` state; logged, never rendered.
    pub error_message: Option<String>,
    /// Set once a search has succeeded in this session.
    pub is_open: bool,
}

impl SearchState {
    pub fn is_initial(&self) -> bool {
        self.query.is_empty()
            && self.status == SearchStatus::Idle
            && self.results.is_empty()
            && self.error_message.is_none()
    }
}
