//! Process-wide UI side effects, handed out as guards.
//!
//! The page scroll lock and the global search shortcut are shared by every
//! component of the running app. Components never toggle them directly: they
//! hold a guard for as long as the effect should last, and dropping the guard
//! (including during unwinding) releases it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Default)]
pub struct Document {
    scroll_locks: AtomicUsize,
    shortcut_listeners: AtomicUsize,
}

impl Document {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Suppress page scrolling until the guard is dropped.
    pub fn lock_scroll(self: &Arc<Self>) -> ScrollLockGuard {
        self.scroll_locks.fetch_add(1, Ordering::SeqCst);
        ScrollLockGuard {
            doc: Arc::clone(self),
        }
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locks.load(Ordering::SeqCst) > 0
    }

    /// Register interest in the global search shortcut.
    pub fn listen_shortcut(self: &Arc<Self>) -> ShortcutGuard {
        self.shortcut_listeners.fetch_add(1, Ordering::SeqCst);
        ShortcutGuard {
            doc: Arc::clone(self),
        }
    }

    pub fn shortcut_listeners(&self) -> usize {
        self.shortcut_listeners.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct ScrollLockGuard {
    doc: Arc<Document>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.doc.scroll_locks.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct ShortcutGuard {
    doc: Arc<Document>,
}

impl Drop for ShortcutGuard {
    fn drop(&mut self) {
        self.doc.shortcut_listeners.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Ctrl+K, or Cmd/Super+K where the terminal reports it.
pub fn is_search_shortcut(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('k') | KeyCode::Char('K'))
        && (key.modifiers.contains(KeyModifiers::CONTROL)
            || key.modifiers.contains(KeyModifiers::SUPER)
            || key.modifiers.contains(KeyModifiers::META))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_release_on_drop() {
        let doc = Document::new();
        let a = doc.lock_scroll();
        let b = doc.lock_scroll();
        assert!(doc.is_scroll_locked());
        drop(a);
        assert!(doc.is_scroll_locked());
        drop(b);
        assert!(!doc.is_scroll_locked());

        let l = doc.listen_shortcut();
        assert_eq!(doc.shortcut_listeners(), 1);
        drop(l);
        assert_eq!(doc.shortcut_listeners(), 0);
    }

    #[test]
    fn guard_released_during_unwind() {
        let doc = Document::new();
        let held = Arc::clone(&doc);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = held.lock_scroll();
            panic!("render failed");
        }));
        assert!(result.is_err());
        assert!(!doc.is_scroll_locked());
    }

    #[test]
    fn shortcut_matches_ctrl_k_only() {
        assert!(is_search_shortcut(&KeyEvent::new(KeyCode::Char('k'), KeyModifiers::CONTROL)));
        assert!(is_search_shortcut(&KeyEvent::new(KeyCode::Char('k'), KeyModifiers::SUPER)));
        assert!(!is_search_shortcut(&KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE)));
        assert!(!is_search_shortcut(&KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)));
    }
}
