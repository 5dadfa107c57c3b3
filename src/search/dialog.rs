//! Search dialog lifecycle: open/close, shortcut, Escape, route changes.
//!
//! While closed the dialog listens for the global shortcut; while open it
//! holds the page scroll lock and the input has focus. Every way of closing
//! (close action, overlay click, Escape, selecting a result, route change,
//! dropping the dialog) goes through the same reset.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use tracing::debug;

use super::controller::SearchController;
use super::render::ResultsView;
use super::state::SearchState;
use crate::api::ContentSource;
use crate::model::types::ContentItem;
use crate::routes::Route;
use crate::ui::document::{Document, ScrollLockGuard, ShortcutGuard, is_search_shortcut};

pub struct SearchDialog<C: ContentSource> {
    controller: SearchController<C>,
    document: Arc<Document>,
    open: bool,
    input_focused: bool,
    selected: usize,
    last_route: Option<Route>,
    scroll_lock: Option<ScrollLockGuard>,
    shortcut: Option<ShortcutGuard>,
}

impl<C: ContentSource> SearchDialog<C> {
    pub fn new(controller: SearchController<C>, document: Arc<Document>) -> Self {
        let shortcut = Some(document.listen_shortcut());
        Self {
            controller,
            document,
            open: false,
            input_focused: false,
            selected: 0,
            last_route: None,
            scroll_lock: None,
            shortcut,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn state(&self) -> &SearchState {
        self.controller.state()
    }

    pub fn controller_mut(&mut self) -> &mut SearchController<C> {
        &mut self.controller
    }

    /// Results panel content; `None` while the query is empty.
    pub fn view(&self) -> Option<ResultsView> {
        ResultsView::for_state(self.controller.state())
    }

    pub fn open(&mut self) {
        if self.open {
            return;
        }
        debug!("search dialog open");
        self.open = true;
        self.input_focused = true;
        self.selected = 0;
        self.shortcut = None;
        self.scroll_lock = Some(self.document.lock_scroll());
    }

    pub fn close(&mut self) {
        if self.open {
            debug!("search dialog close");
        }
        self.open = false;
        self.input_focused = false;
        self.selected = 0;
        self.controller.reset();
        self.scroll_lock = None;
        if self.shortcut.is_none() {
            self.shortcut = Some(self.document.listen_shortcut());
        }
    }

    /// Global key handler. Opens on the shortcut, only while closed.
    pub fn on_global_key(&mut self, key: &KeyEvent) -> bool {
        if self.shortcut.is_some() && is_search_shortcut(key) {
            self.open();
            return true;
        }
        false
    }

    pub fn on_input_change(&mut self, text: impl Into<String>) {
        self.selected = 0;
        self.controller.on_input_change(text);
    }

    pub fn push_char(&mut self, c: char) {
        let mut query = self.state().query.clone();
        query.push(c);
        self.on_input_change(query);
    }

    pub fn pop_char(&mut self) {
        let mut query = self.state().query.clone();
        if query.pop().is_some() {
            self.on_input_change(query);
        }
    }

    /// Escape inside the input.
    ///
    /// Closes only when no search has succeeded yet in this session and the
    /// query is empty; otherwise it is a no-op. Returns whether it closed.
    pub fn on_escape(&mut self) -> bool {
        let state = self.controller.state();
        if !state.is_open && state.query.is_empty() {
            self.input_focused = false;
            self.close();
            return true;
        }
        false
    }

    /// Force-close when the current page changes underneath an open dialog.
    pub fn on_route_change(&mut self, route: &Route) {
        if self.last_route.as_ref() == Some(route) {
            return;
        }
        self.last_route = Some(route.clone());
        if self.open {
            debug!(route = %route, "route changed, closing search");
            self.close();
        }
    }

    /// Navigate to a result: returns the detail route and closes the dialog.
    pub fn navigate_to_post(&mut self, item: &ContentItem) -> Route {
        let route = Route::Post {
            slug: item.slug.clone(),
        };
        self.close();
        route
    }

    /// Apply async search updates; returns true if the state changed.
    pub fn pump(&mut self) -> bool {
        let changed = self.controller.pump();
        if changed {
            let len = self.controller.state().results.len();
            if self.selected >= len {
                self.selected = len.saturating_sub(1);
            }
        }
        changed
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.controller.state().results.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.controller.state().results.get(self.selected)
    }

    /// Activate the highlighted result, if any.
    pub fn select_current(&mut self) -> Option<Route> {
        let item = self.selected_item()?.clone();
        Some(self.navigate_to_post(&item))
    }
}
