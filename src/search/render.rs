//! Status-dependent view of the search results panel.

use serde::Serialize;

use super::highlight::{Segment, clean_excerpt, clean_title, highlight};
use super::state::{SearchState, SearchStatus};
use crate::content::format_date;
use crate::model::types::ContentItem;

pub const SEARCHING_TEXT: &str = "Searching...";
pub const ERROR_TEXT: &str = "An error occurred while searching. Please try again.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub slug: String,
    pub title: Vec<SegmentView>,
    pub date: Option<String>,
    pub excerpt: Vec<SegmentView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SegmentView {
    pub text: String,
    pub highlighted: bool,
}

impl From<Segment> for SegmentView {
    fn from(s: Segment) -> Self {
        Self {
            text: s.text,
            highlighted: s.highlighted,
        }
    }
}

/// What the results panel shows, in priority order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResultsView {
    Loading,
    Error,
    NothingFound { query: String },
    Rows(Vec<ResultRow>),
}

impl ResultsView {
    /// Panel for the current state, or `None` while the query is empty.
    pub fn for_state(state: &SearchState) -> Option<Self> {
        if state.query.is_empty() {
            return None;
        }
        Some(match state.status {
            SearchStatus::Loading => ResultsView::Loading,
            SearchStatus::Error => ResultsView::Error,
            _ if state.results.is_empty() => ResultsView::NothingFound {
                query: state.query.clone(),
            },
            _ => ResultsView::Rows(
                state
                    .results
                    .iter()
                    .map(|item| result_row(item, &state.query))
                    .collect(),
            ),
        })
    }
}

pub fn nothing_found_text(query: &str) -> String {
    format!("Nothing found for \"{query}\". Please try again.")
}

pub fn result_row(item: &ContentItem, query: &str) -> ResultRow {
    let title = clean_title(&item.title);
    let excerpt = clean_excerpt(&item.excerpt);
    ResultRow {
        slug: item.slug.clone(),
        title: highlight(&title, query).into_iter().map(Into::into).collect(),
        date: item.date.as_deref().map(format_date),
        excerpt: highlight(&excerpt, query).into_iter().map(Into::into).collect(),
    }
}
