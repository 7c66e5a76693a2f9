//! Pure display-branch selection for the visualization area.
//!
//! Rendering itself is a frontend concern; the core only decides which of
//! the mutually exclusive panels a frontend should draw for a given
//! session state.

use crate::session::DisplayMode;

/// What the visualization area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel<'a> {
    /// Nothing has run yet; invite the user to trigger an analysis.
    Prompt,
    /// An analysis is in flight; the wave-animation slot.
    Waves,
    /// A decoded word to present.
    Word(&'a str),
    /// Result mode without a word; draw nothing.
    Blank,
}

/// Select exactly one panel for `(mode, result)`.
///
/// `Blank` is unreachable through the engine, which never enters `Result`
/// mode without a word, but the selection stays total for frontends fed
/// from other sources.
pub fn select_panel(mode: DisplayMode, result: Option<&str>) -> Panel<'_> {
    match (mode, result) {
        (DisplayMode::Idle, _) => Panel::Prompt,
        (DisplayMode::InProgress, _) => Panel::Waves,
        (DisplayMode::Result, Some(word)) => Panel::Word(word),
        (DisplayMode::Result, None) => Panel::Blank,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_prompts_regardless_of_stale_result() {
        assert_eq!(select_panel(DisplayMode::Idle, None), Panel::Prompt);
        assert_eq!(select_panel(DisplayMode::Idle, Some("MIND")), Panel::Prompt);
    }

    #[test]
    fn in_progress_shows_waves() {
        assert_eq!(select_panel(DisplayMode::InProgress, None), Panel::Waves);
        assert_eq!(
            select_panel(DisplayMode::InProgress, Some("MIND")),
            Panel::Waves
        );
    }

    #[test]
    fn result_shows_the_word() {
        assert_eq!(
            select_panel(DisplayMode::Result, Some("FOCUS")),
            Panel::Word("FOCUS")
        );
    }

    #[test]
    fn result_without_a_word_is_blank() {
        assert_eq!(select_panel(DisplayMode::Result, None), Panel::Blank);
    }
}
