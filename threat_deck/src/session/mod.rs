//! Session controller - the triage state machine.
//!
//! The controller owns at most one live [`Session`] and is the only way to
//! mutate it. Phases move LOBBY -> PLAYING -> SUMMARY -> LOBBY:
//!
//! - `start_session` enters PLAYING with a freshly shuffled queue
//! - `accept_top` / `dismiss_top` / `defer_top` work the head of the queue
//! - the move to SUMMARY happens inside whichever command empties the queue
//!   (including `start_session` on an empty deck); there is no separate
//!   "show results" command
//! - `abandon` / `reset` drop the session from any phase
//!
//! Narrative text arrives asynchronously and is applied through
//! [`SessionController::apply_summary`], which checks the request's
//! [`SessionTicket`] so late results never land in a newer session.

mod report;
mod ticket;

pub use report::*;
pub use ticket::*;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

use crate::cards::{BacklogItem, BacklogStatus, Card, CardCode, Deck};
use crate::catalog::Catalog;
use crate::config::SessionConfig;
use crate::risk::RiskReport;

/// Summary used when a session ends without any accepted risk.
pub const EMPTY_LEDGER_SUMMARY: &str =
    "No risks were accepted in this session, so there is nothing to prioritize yet.";

/// Phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No active session.
    Lobby,
    /// Triaging a queue.
    Playing,
    /// Queue exhausted, results shown.
    Summary,
}

/// State of one playthrough.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    deck: Deck,
    queue: VecDeque<Card>,
    ledger: Vec<BacklogItem>,
    phase: Phase,
    summary: Option<String>,
    summary_requested: bool,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn queue(&self) -> &VecDeque<Card> {
        &self.queue
    }

    pub fn ledger(&self) -> &[BacklogItem] {
        &self.ledger
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }
}

/// Owner of the single active session.
pub struct SessionController {
    catalog: Arc<Catalog>,
    config: SessionConfig,
    rng: StdRng,
    session: Option<Session>,
    /// Bumped on every start, abandon and reset.
    generation: u64,
}

impl SessionController {
    /// Create a controller seeded from the operating system.
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Self {
        Self::with_rng(catalog, config, StdRng::from_os_rng())
    }

    /// Create a controller with an explicit random source.
    pub fn with_rng(catalog: Arc<Catalog>, config: SessionConfig, rng: StdRng) -> Self {
        Self {
            catalog,
            config,
            rng,
            session: None,
            generation: 0,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Begin a session on `deck`, replacing any current one.
    ///
    /// A deck that fails [`Deck::validate`] is ignored and the current
    /// session, if any, is kept.
    pub fn start_session(&mut self, deck: Deck) -> Option<SessionTicket> {
        if let Err(err) = deck.validate() {
            tracing::debug!(deck = %deck.id, error = %err, "start ignored: invalid deck");
            return None;
        }

        let mut cards = deck.cards.clone();
        cards.shuffle(&mut self.rng);

        let session = Session {
            id: SessionId::new(),
            deck,
            queue: cards.into(),
            ledger: Vec::new(),
            phase: Phase::Playing,
            summary: None,
            summary_requested: false,
        };

        tracing::info!(
            session = %session.id,
            deck = %session.deck.id,
            cards = session.queue.len(),
            "session started"
        );

        self.generation += 1;
        let ticket = SessionTicket {
            session: session.id,
            generation: self.generation,
        };
        self.session = Some(session);
        self.advance_phase();
        self.check_invariants();
        Some(ticket)
    }

    /// Begin a session on a catalog deck. Unknown ids are ignored.
    pub fn start_deck(&mut self, deck_id: &str) -> Option<SessionTicket> {
        let Some(deck) = self.catalog.deck(deck_id).cloned() else {
            tracing::debug!(deck = deck_id, "unknown deck requested");
            return None;
        };
        self.start_session(deck)
    }

    /// Draw a mixed deck from the whole catalog.
    ///
    /// Catalogs smaller than the configured size yield every card they hold.
    pub fn synthesize_mixed_deck(&mut self) -> Deck {
        self.catalog
            .sample_mixed_deck(self.config.mixed_deck_size, &mut self.rng)
    }

    /// Synthesize a mixed deck and start a session on it.
    pub fn start_mixed(&mut self) -> Option<SessionTicket> {
        let deck = self.synthesize_mixed_deck();
        self.start_session(deck)
    }

    /// Move the head of the queue into the ledger.
    ///
    /// No-op on an empty queue.
    pub fn accept_top(&mut self) -> Option<&BacklogItem> {
        let session = self.session.as_mut()?;
        let Some(card) = session.queue.pop_front() else {
            tracing::debug!("accept ignored: queue is empty");
            return None;
        };

        tracing::debug!(card = %card.code(), remaining = session.queue.len(), "card accepted");
        session.ledger.push(BacklogItem::accept(card));

        self.advance_phase();
        self.check_invariants();
        self.session.as_ref().and_then(|s| s.ledger.last())
    }

    /// Drop the head of the queue without recording it.
    ///
    /// No-op on an empty queue.
    pub fn dismiss_top(&mut self) -> Option<Card> {
        let session = self.session.as_mut()?;
        let Some(card) = session.queue.pop_front() else {
            tracing::debug!("dismiss ignored: queue is empty");
            return None;
        };

        tracing::debug!(card = %card.code(), remaining = session.queue.len(), "card dismissed");

        self.advance_phase();
        self.check_invariants();
        Some(card)
    }

    /// Send the head of the queue to the back. Returns the new head.
    ///
    /// A single-card queue is left untouched. No-op on an empty queue.
    pub fn defer_top(&mut self) -> Option<&Card> {
        let session = self.session.as_mut()?;
        if session.queue.len() > 1 {
            if let Some(card) = session.queue.pop_front() {
                tracing::debug!(card = %card.code(), "card deferred");
                session.queue.push_back(card);
            }
        } else if session.queue.is_empty() {
            tracing::debug!("defer ignored: queue is empty");
            return None;
        }

        self.check_invariants();
        self.session.as_ref().and_then(|s| s.queue.front())
    }

    /// Drop the session and return to the lobby, from any phase.
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(
                session = %session.id,
                phase = ?session.phase,
                accepted = session.ledger.len(),
                "session abandoned"
            );
        }
        self.generation += 1;
    }

    /// Leave the summary screen: abandon plus clearing the cached summary.
    pub fn reset(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.summary = None;
        }
        self.abandon();
    }

    /// Record a status change made by external tooling.
    ///
    /// Returns `false` if the code is not in the ledger.
    pub fn mark_mitigated(&mut self, code: &CardCode) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        match session.ledger.iter_mut().find(|item| item.code() == code) {
            Some(item) => {
                item.status = BacklogStatus::Mitigated;
                true
            }
            None => false,
        }
    }

    /// Ticket for the current session state.
    pub fn ticket(&self) -> Option<SessionTicket> {
        self.session.as_ref().map(|s| SessionTicket {
            session: s.id,
            generation: self.generation,
        })
    }

    /// Whether a ticket still refers to the live session.
    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.ticket().as_ref() == Some(ticket)
    }

    /// Claim the one summary request for a finished session.
    ///
    /// Returns `None` outside SUMMARY, once a request was already handed out,
    /// or when a summary is already cached. An empty ledger gets
    /// [`EMPTY_LEDGER_SUMMARY`] directly and never needs a request.
    ///
    /// The request stays claimed until its result reaches
    /// [`apply_summary`](Self::apply_summary). A caller that drops it must
    /// call [`release_summary_request`](Self::release_summary_request).
    pub fn summary_request(&mut self) -> Option<SummaryRequest> {
        let ticket = self.ticket()?;
        let session = self.session.as_mut()?;

        if session.phase != Phase::Summary
            || session.summary.is_some()
            || session.summary_requested
        {
            return None;
        }

        if session.ledger.is_empty() {
            session.summary = Some(EMPTY_LEDGER_SUMMARY.to_string());
            return None;
        }

        session.summary_requested = true;
        Some(SummaryRequest {
            ticket,
            deck_name: session.deck.name.clone(),
            ledger: session.ledger.clone(),
        })
    }

    /// Store a narrative summary if `ticket` still matches the live session.
    ///
    /// Only the answer to an outstanding [`SummaryRequest`] is accepted, so
    /// the text is always built from the final ledger.
    pub fn apply_summary(&mut self, ticket: &SessionTicket, text: String) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(session = %ticket.session, "discarding stale summary");
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != Phase::Summary || !session.summary_requested {
            tracing::debug!(
                session = %ticket.session,
                phase = ?session.phase,
                "discarding summary that was never requested"
            );
            return false;
        }
        if session.summary.is_some() {
            return false;
        }
        session.summary = Some(text);
        true
    }

    /// Give back an undelivered summary request so it can be claimed again.
    ///
    /// Returns `false` if the ticket is stale or nothing is outstanding.
    pub fn release_summary_request(&mut self, ticket: &SessionTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if session.phase != Phase::Summary
            || session.summary.is_some()
            || !session.summary_requested
        {
            return false;
        }
        tracing::debug!(session = %ticket.session, "summary request released");
        session.summary_requested = false;
        true
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref().map_or(Phase::Lobby, |s| s.phase)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn deck(&self) -> Option<&Deck> {
        self.session.as_ref().map(|s| &s.deck)
    }

    /// The card currently on top of the queue.
    pub fn current_card(&self) -> Option<&Card> {
        self.session.as_ref().and_then(|s| s.queue.front())
    }

    /// Cards left in the queue.
    pub fn remaining(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.queue.len())
    }

    pub fn queue(&self) -> Vec<&Card> {
        self.session
            .as_ref()
            .map(|s| s.queue.iter().collect())
            .unwrap_or_default()
    }

    pub fn ledger(&self) -> &[BacklogItem] {
        self.session
            .as_ref()
            .map(|s| s.ledger.as_slice())
            .unwrap_or(&[])
    }

    pub fn summary(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.summary())
    }

    /// Risk derived from the current ledger.
    pub fn risk(&self) -> RiskReport {
        RiskReport::from_ledger(self.ledger(), self.config.severity_cap)
    }

    /// Results report for the current session.
    pub fn report(&self) -> Option<SessionReport> {
        let session = self.session.as_ref()?;
        Some(SessionReport {
            deck_id: session.deck.id.clone(),
            deck_name: session.deck.name.clone(),
            rows: session.ledger.iter().map(BacklogRow::from).collect(),
            risk: RiskReport::from_ledger(&session.ledger, self.config.severity_cap),
            summary: session.summary.clone(),
        })
    }

    /// PLAYING with an empty queue becomes SUMMARY.
    fn advance_phase(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.phase == Phase::Playing && session.queue.is_empty() {
                session.phase = Phase::Summary;
                tracing::info!(
                    session = %session.id,
                    accepted = session.ledger.len(),
                    "queue exhausted, entering summary"
                );
            }
        }
    }

    fn check_invariants(&self) {
        if !cfg!(debug_assertions) {
            return;
        }
        if let Some(session) = &self.session {
            let mut seen = std::collections::HashSet::new();
            let codes = session
                .queue
                .iter()
                .map(|c| c.code())
                .chain(session.ledger.iter().map(|i| i.code()));
            for code in codes {
                debug_assert!(session.deck.contains(code), "{} is not in the deck", code);
                debug_assert!(seen.insert(code), "{} appears twice", code);
            }
            debug_assert!(
                session.phase != Phase::Summary || session.queue.is_empty(),
                "summary with a non-empty queue"
            );
        }
    }
}
