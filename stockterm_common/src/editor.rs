//! State machine behind the interactive watchlist editor.
//!
//! The editor starts in `Browsing` over the current watchlist. Rows can be marked
//! for removal; `Save` ends in `Saved` with the unmarked rows, `Quit` ends in
//! `Cancelled` with the original list. Actions after a terminal state are ignored.
use std::collections::BTreeSet;

use strum_macros::{Display, EnumString};

use crate::tickers::Ticker;

/// Input accepted by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum EditorAction {
    /// Cursor one row up, stopping at the first row.
    MoveUp,
    /// Cursor one row down, stopping at the last row.
    MoveDown,
    /// Mark or unmark the row under the cursor for removal.
    ToggleSelect,
    /// Finish, keeping the unmarked rows.
    Save,
    /// Finish without changes.
    Quit,
}

impl EditorAction {
    /// Maps a key name or typed line to an action.
    ///
    /// An empty line toggles the current row, like pressing Enter.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "k" | "up" => Some(EditorAction::MoveUp),
            "j" | "down" => Some(EditorAction::MoveDown),
            "" | "t" | "space" | "enter" => Some(EditorAction::ToggleSelect),
            "s" => Some(EditorAction::Save),
            "q" | "ctrl+c" => Some(EditorAction::Quit),
            _ => None,
        }
    }
}

/// Editor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// Accepting actions.
    Browsing,
    /// Finished with `Save`.
    Saved,
    /// Finished with `Quit` or end of input.
    Cancelled,
}

/// Final result of an editing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Remaining rows when saved, otherwise the original list.
    pub tickers: Vec<Ticker>,
    /// Whether the session ended with `Save`.
    pub saved: bool,
}

/// Watchlist editor state.
#[derive(Debug, Clone)]
pub struct WatchlistEditor {
    choices: Vec<Ticker>,
    cursor: usize,
    marked: BTreeSet<usize>,
    state: EditorState,
}

impl WatchlistEditor {
    /// Editor over `choices`, cursor on the first row, nothing marked.
    pub fn new(choices: Vec<Ticker>) -> Self {
        Self {
            choices,
            cursor: 0,
            marked: BTreeSet::new(),
            state: EditorState::Browsing,
        }
    }

    /// Runs a whole session from an action stream.
    ///
    /// A stream that ends while still browsing counts as a quit.
    pub fn run<I: IntoIterator<Item = EditorAction>>(choices: Vec<Ticker>, actions: I) -> EditOutcome {
        let mut editor = Self::new(choices);
        for action in actions {
            if editor.apply(action) != EditorState::Browsing {
                break;
            }
        }
        editor.finish()
    }

    /// Applies one action and returns the resulting state.
    pub fn apply(&mut self, action: EditorAction) -> EditorState {
        if self.state != EditorState::Browsing {
            return self.state;
        }
        match action {
            EditorAction::MoveUp => self.cursor = self.cursor.saturating_sub(1),
            EditorAction::MoveDown => {
                if self.cursor + 1 < self.choices.len() {
                    self.cursor += 1;
                }
            }
            EditorAction::ToggleSelect => {
                if self.cursor < self.choices.len() && !self.marked.remove(&self.cursor) {
                    self.marked.insert(self.cursor);
                }
            }
            EditorAction::Save => self.state = EditorState::Saved,
            EditorAction::Quit => self.state = EditorState::Cancelled,
        }
        self.state
    }

    /// Ends the session. Still browsing counts as cancelled.
    pub fn finish(mut self) -> EditOutcome {
        if self.state == EditorState::Browsing {
            self.state = EditorState::Cancelled;
        }
        match self.state {
            EditorState::Saved => EditOutcome {
                tickers: self.remaining(),
                saved: true,
            },
            _ => EditOutcome {
                tickers: self.choices,
                saved: false,
            },
        }
    }

    /// Rows not marked for removal.
    pub fn remaining(&self) -> Vec<Ticker> {
        self.choices
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.marked.contains(i))
            .map(|(_, t)| t.clone())
            .collect()
    }

    /// Current state.
    pub fn state(&self) -> EditorState {
        self.state
    }

    /// All rows.
    pub fn choices(&self) -> &[Ticker] {
        &self.choices
    }

    /// Row under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether row `index` is marked for removal.
    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }
}
