//! # Narrative Core
//!
//! The narrative layer on top of `threat_deck`. It turns a finished backlog
//! into an executive summary, a single card into extended threat intel, and
//! a card code into an illustration reference.
//!
//! ## Core Components
//!
//! - **backend**: the `NarrativeBackend` trait plus offline and prompt-driven implementations
//! - **service**: `NarrativeService`, which caches intel and never fails (fallback text)
//! - **task**: background requests carrying a session ticket back to the controller
//! - **enrichment**: case-insensitive security details keyed by card or category code
//! - **prompt**: prompt assembly for external text and image generators
//!
//! ## Design Philosophy
//!
//! - **Never blocking**: the session controller hands out snapshots and never awaits
//! - **Never failing**: the worst a player sees is a placeholder sentence
//! - **Stale-safe**: results for an abandoned session are dropped on arrival

pub mod backend;
pub mod enrichment;
pub mod error;
pub mod prompt;
pub mod service;
pub mod task;

pub use backend::*;
pub use enrichment::*;
pub use error::{NarrativeError, Result};
pub use prompt::*;
pub use service::*;
pub use task::*;
