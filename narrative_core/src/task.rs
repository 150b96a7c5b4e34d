//! Background narrative requests tied to a session ticket.
//!
//! The session controller never awaits narrative work. A request is spawned
//! on the tokio runtime with a snapshot of what it needs, and its result is
//! handed back together with the ticket it was issued under. Whether the
//! result still applies is decided by the controller on arrival.

use std::sync::Arc;
use tokio::task::JoinHandle;

use threat_deck::{Card, CardCode, SessionController, SessionTicket, SummaryRequest};

use crate::service::{FallbackText, NarrativeService};

/// What a narrative task was asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeSubject {
    Summary,
    Intel(CardCode),
}

/// A finished narrative request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub ticket: SessionTicket,
    pub subject: NarrativeSubject,
    pub text: String,
}

impl Delivery {
    /// Whether the session this was requested for is still live.
    pub fn is_current(&self, controller: &SessionController) -> bool {
        controller.is_current(&self.ticket)
    }

    /// Write a summary into the session it was requested for.
    ///
    /// Returns `false` if the session has moved on, or if this is not a
    /// summary.
    pub fn apply_to(self, controller: &mut SessionController) -> bool {
        match self.subject {
            NarrativeSubject::Summary => controller.apply_summary(&self.ticket, self.text),
            NarrativeSubject::Intel(code) => {
                tracing::debug!(card = %code, "intel deliveries are not stored in the session");
                false
            }
        }
    }
}

/// Handle to an in-flight narrative request.
pub struct NarrativeTask {
    ticket: SessionTicket,
    subject: NarrativeSubject,
    handle: JoinHandle<String>,
    /// Used if the task itself dies.
    fallback: String,
}

impl NarrativeTask {
    pub fn ticket(&self) -> SessionTicket {
        self.ticket
    }

    pub fn subject(&self) -> &NarrativeSubject {
        &self.subject
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result. Always yields text, even if the task panicked.
    pub async fn join(self) -> Delivery {
        let text = match self.handle.await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(error = %err, "narrative task did not complete, using fallback");
                self.fallback
            }
        };
        Delivery {
            ticket: self.ticket,
            subject: self.subject,
            text,
        }
    }
}

/// Summarize a final ledger in the background.
///
/// Must be called from within a tokio runtime.
pub fn spawn_summary(service: Arc<NarrativeService>, request: SummaryRequest) -> NarrativeTask {
    let SummaryRequest {
        ticket,
        deck_name,
        ledger,
    } = request;
    let fallback = service.config().fallback.summary_fallback(&ledger);

    tracing::debug!(
        session = %ticket.session,
        generation = ticket.generation,
        deck = %deck_name,
        risks = ledger.len(),
        "spawning summary"
    );

    let handle = tokio::spawn(async move { service.summarize(&ledger).await });

    NarrativeTask {
        ticket,
        subject: NarrativeSubject::Summary,
        handle,
        fallback,
    }
}

/// Elaborate on a card in the background.
///
/// Must be called from within a tokio runtime.
pub fn spawn_intel(
    service: Arc<NarrativeService>,
    ticket: SessionTicket,
    card: Card,
) -> NarrativeTask {
    let fallback = service.config().fallback.intel_fallback(&card);
    let code = card.code().clone();

    tracing::debug!(session = %ticket.session, card = %code, "spawning intel");

    let handle = tokio::spawn(async move { service.elaborate(&card).await });

    NarrativeTask {
        ticket,
        subject: NarrativeSubject::Intel(code),
        handle,
        fallback,
    }
}
