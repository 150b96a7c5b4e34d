//! Session identity and the tickets that tie narrative requests to it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cards::BacklogItem;

/// Unique identifier for a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies the session state an asynchronous request was issued against.
///
/// A result carrying a ticket is only applied if the controller still holds
/// the same session at the same generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionTicket {
    pub session: SessionId,
    pub generation: u64,
}

/// Snapshot handed to the narrative layer once a session reaches SUMMARY.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub ticket: SessionTicket,
    pub deck_name: String,
    /// The final ledger, in acceptance order.
    pub ledger: Vec<BacklogItem>,
}
