//! # mindlink
//!
//! Session state machine for a demonstration brain-computer-interface
//! dashboard. A trigger starts a fake "analysis"; after a fixed delay the
//! session settles with a decoded word, substituting a random candidate
//! when no decode provider is reachable.
//!
//! Timers, provider I/O, and the client protocol live in the `mindlinkd`
//! daemon. This crate holds the pieces every frontend shares:
//!
//! - [`session`]: the busy/result/display-mode state machine
//! - [`lexicon`]: fallback candidate words and the fault word
//! - [`prng`]: small xorshift64* generator behind the fallback draw
//! - [`view`]: pure selection of the visualization panel
//!
//! ## Quick Start
//!
//! ```
//! use mindlink::prelude::*;
//!
//! let mut session = AnalysisSession::new();
//! assert!(session.begin());
//! assert_eq!(session.display_mode(), DisplayMode::InProgress);
//!
//! // The daemon suspends here; the offline demo settles immediately.
//! let mut prng = Prng::new(42);
//! session.settle(random_candidate(&mut prng).to_string());
//! assert!(!session.busy());
//! assert_eq!(session.display_mode(), DisplayMode::Result);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support
//! - `serde`: Enable serialization/deserialization
//!
//! ## no_std Support
//!
//! Disable default features for `no_std` environments:
//! ```toml
//! mindlink = { version = "0.1", default-features = false }
//! ```

// no_std support
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[path = "core/lexicon.rs"]
pub mod lexicon;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/session.rs"]
pub mod session;

pub mod view;

/// Prelude module for convenient imports.
///
/// ```
/// use mindlink::prelude::*;
/// ```
pub mod prelude {
    pub use crate::lexicon::{random_candidate, CANDIDATE_WORDS, FAULT_WORD};
    pub use crate::prng::Prng;
    pub use crate::session::{AnalysisSession, DisplayMode};
    pub use crate::view::{select_panel, Panel};
}
