//! Observable guess/loading state shared by the dispatcher and the display.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::InferenceOutcome;

/// Shown while a request is outstanding
pub const LOADING_TEXT: &str = "Loading...";

/// Prefix of the guess line
pub const GUESS_PREFIX: &str = "Gemini's Guess: ";

/// Guess text used when the service answers without any text
pub const NO_GUESS_TEXT: &str = "No guess available";

/// The single result slot: latest guess plus loading flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuessState {
    pub guess_text: String,
    pub is_loading: bool,
}

impl GuessState {
    /// Text for the passive display element
    pub fn display_text(&self) -> String {
        if self.is_loading {
            LOADING_TEXT.to_string()
        } else {
            format!("{}{}", GUESS_PREFIX, self.guess_text)
        }
    }
}

/// Shared, observable [`GuessState`].
///
/// Every write goes through the watch channel, so subscribers always see the
/// latest value. Writes are last-write-wins: a late response from an older
/// dispatch overwrites a newer one, and a reset does not fence off requests
/// that were already in flight.
///
/// `is_loading` stays set while any dispatch is outstanding.
#[derive(Debug)]
pub struct GuessBoard {
    state: watch::Sender<GuessState>,
    /// Outstanding dispatches; only touched inside `send_modify`
    in_flight: AtomicUsize,
}

impl Default for GuessBoard {
    fn default() -> Self {
        Self {
            state: watch::channel(GuessState::default()).0,
            in_flight: AtomicUsize::new(0),
        }
    }
}

impl GuessBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<GuessState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn current(&self) -> GuessState {
        self.state.borrow().clone()
    }

    /// Number of dispatches that have not resolved yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Mark a new dispatch as started
    pub fn begin(&self) {
        self.state.send_modify(|state| {
            self.in_flight.fetch_add(1, Ordering::AcqRel);
            state.is_loading = true;
        });
    }

    /// Record the outcome of one dispatch
    pub fn resolve(&self, outcome: InferenceOutcome) {
        let guess_text = match outcome {
            Ok(Some(text)) => text,
            Ok(None) => NO_GUESS_TEXT.to_string(),
            Err(e) => format!("Error: {}", e),
        };
        self.state.send_modify(|state| {
            let previous = self.in_flight.load(Ordering::Acquire);
            let remaining = previous.saturating_sub(1);
            self.in_flight.store(remaining, Ordering::Release);
            debug!("Guess resolved ({} still in flight)", remaining);
            state.guess_text = guess_text;
            state.is_loading = remaining > 0;
        });
    }

    /// Reset to an empty, idle state. Outstanding dispatches keep running.
    pub fn reset(&self) {
        self.state.send_modify(|state| {
            state.guess_text.clear();
            state.is_loading = false;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InferenceError;

    #[test]
    fn test_display_text() {
        let mut state = GuessState {
            guess_text: "a cat".to_string(),
            is_loading: true,
        };
        assert_eq!(state.display_text(), "Loading...");

        state.is_loading = false;
        assert_eq!(state.display_text(), "Gemini's Guess: a cat");
        assert_eq!(GuessState::default().display_text(), "Gemini's Guess: ");
    }

    #[test]
    fn test_begin_then_resolve() {
        let board = GuessBoard::new();
        board.begin();
        assert!(board.current().is_loading);

        board.resolve(Ok(Some("house".to_string())));
        assert_eq!(
            board.current(),
            GuessState {
                guess_text: "house".to_string(),
                is_loading: false
            }
        );
    }

    #[test]
    fn test_resolve_without_text_uses_fallback() {
        let board = GuessBoard::new();
        board.begin();
        board.resolve(Ok(None));
        assert_eq!(board.current().guess_text, NO_GUESS_TEXT);
    }

    #[test]
    fn test_resolve_error() {
        let board = GuessBoard::new();
        board.begin();
        board.resolve(Err(InferenceError::Timeout));
        let state = board.current();
        assert_eq!(state.guess_text, "Error: Request timed out");
        assert!(!state.is_loading);
    }

    #[test]
    fn test_loading_until_all_resolved() {
        let board = GuessBoard::new();
        board.begin();
        board.begin();
        assert_eq!(board.in_flight(), 2);

        board.resolve(Ok(Some("first".to_string())));
        assert!(board.current().is_loading);

        board.resolve(Ok(Some("second".to_string())));
        assert!(!board.current().is_loading);
        assert_eq!(board.current().guess_text, "second");
    }

    #[test]
    fn test_reset() {
        let board = GuessBoard::new();
        board.begin();
        board.resolve(Ok(Some("tree".to_string())));
        board.begin();

        board.reset();
        assert_eq!(board.current(), GuessState::default());
        // The outstanding dispatch is still counted
        assert_eq!(board.in_flight(), 1);
    }

    #[test]
    fn test_subscribers_see_latest() {
        let board = GuessBoard::new();
        let mut rx = board.subscribe();
        assert!(!rx.has_changed().unwrap());

        board.begin();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_loading);
    }
}
