//! The analysis-session state machine.
//!
//! Three pieces of state drive the whole dashboard: a busy flag, the last
//! decoded word, and the display mode. They are kept behind methods so the
//! pairing between mode and result cannot drift: `Result` mode always
//! carries a word when produced through [`AnalysisSession::settle`], and
//! `InProgress` always means busy.

// no_std support: use core and alloc when std is not available
#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::string::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which of the mutually exclusive visual states the dashboard presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayMode {
    Idle,
    InProgress,
    Result,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Idle => "idle",
            DisplayMode::InProgress => "in_progress",
            DisplayMode::Result => "result",
        }
    }
}

/// State for one analysis session.
///
/// Lifecycle is a single process; there is nothing to persist or tear down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSession {
    busy: bool,
    result: Option<String>,
    display_mode: DisplayMode,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            busy: false,
            result: None,
            display_mode: DisplayMode::Idle,
        }
    }

    /// An analysis is in flight: true only between [`begin`](Self::begin)
    /// and [`settle`](Self::settle).
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// The last decoded word, cleared at the start of each new analysis.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Start a new analysis: busy, in-progress, previous result cleared.
    ///
    /// Returns false and changes nothing while one is already in flight.
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.display_mode = DisplayMode::InProgress;
        self.result = None;
        true
    }

    /// Finish the in-flight analysis with a decoded word.
    ///
    /// Every outcome of an analysis run converges here, so after settling
    /// the session is never busy and never without a result.
    pub fn settle(&mut self, word: String) {
        self.busy = false;
        self.result = Some(word);
        self.display_mode = DisplayMode::Result;
    }

    /// Return to the initial idle state.
    ///
    /// Refused while busy: an in-flight settle must not land on a session
    /// that was cleared under it.
    pub fn reset(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.result = None;
        self.display_mode = DisplayMode::Idle;
        true
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_no_result() {
        let s = AnalysisSession::new();
        assert!(!s.busy());
        assert_eq!(s.result(), None);
        assert_eq!(s.display_mode(), DisplayMode::Idle);
    }

    #[test]
    fn begin_moves_to_in_progress() {
        let mut s = AnalysisSession::new();
        assert!(s.begin());
        assert!(s.busy());
        assert_eq!(s.result(), None);
        assert_eq!(s.display_mode(), DisplayMode::InProgress);
    }

    #[test]
    fn begin_while_busy_is_refused_and_changes_nothing() {
        let mut s = AnalysisSession::new();
        assert!(s.begin());
        let before = s.clone();
        assert!(!s.begin());
        assert_eq!(s, before);
    }

    #[test]
    fn settle_ends_busy_and_carries_the_word() {
        let mut s = AnalysisSession::new();
        s.begin();
        s.settle("FOCUS".to_string());
        assert!(!s.busy());
        assert_eq!(s.result(), Some("FOCUS"));
        assert_eq!(s.display_mode(), DisplayMode::Result);
    }

    #[test]
    fn new_trigger_clears_the_previous_result() {
        let mut s = AnalysisSession::new();
        s.begin();
        s.settle("MIND".to_string());

        // result -> in_progress directly, no idle in between
        assert!(s.begin());
        assert_eq!(s.result(), None);
        assert_eq!(s.display_mode(), DisplayMode::InProgress);
    }

    #[test]
    fn reset_returns_to_idle_unless_busy() {
        let mut s = AnalysisSession::new();
        s.begin();
        assert!(!s.reset());
        assert_eq!(s.display_mode(), DisplayMode::InProgress);

        s.settle("THOUGHT".to_string());
        assert!(s.reset());
        assert_eq!(s.result(), None);
        assert_eq!(s.display_mode(), DisplayMode::Idle);
    }

    #[test]
    fn display_mode_names_match_wire_form() {
        assert_eq!(DisplayMode::Idle.as_str(), "idle");
        assert_eq!(DisplayMode::InProgress.as_str(), "in_progress");
        assert_eq!(DisplayMode::Result.as_str(), "result");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn display_mode_serializes_as_snake_case() {
        let json = serde_json::to_string(&DisplayMode::InProgress).expect("serialize");
        assert_eq!(json, "\"in_progress\"");
        let back: DisplayMode = serde_json::from_str("\"result\"").expect("parse");
        assert_eq!(back, DisplayMode::Result);
    }
}
