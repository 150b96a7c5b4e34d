//! # Threat Deck
//!
//! The rules crate for a STRIDE threat-triage card game. Players pick a deck
//! of threat scenarios, then accept, dismiss or defer each card until the
//! queue runs dry; accepted cards form a backlog that is scored and reported.
//!
//! This crate is synchronous and owns all game state. Narrative text (AI
//! summaries, threat intel) lives in `narrative_core` and flows back in
//! through session tickets.
//!
//! ## Modules
//!
//! - **cards**: cards, decks, STRIDE categories, backlog items
//! - **catalog**: the read-only deck collection and mixed-deck sampling
//! - **session**: the LOBBY / PLAYING / SUMMARY state machine
//! - **risk**: score, severity banding and category distribution
//! - **config**: TOML configuration

pub mod cards;
pub mod catalog;
pub mod config;
pub mod error;
pub mod risk;
pub mod session;

pub use cards::*;
pub use catalog::*;
pub use config::*;
pub use error::{DeckError, Result};
pub use risk::*;
pub use session::*;
