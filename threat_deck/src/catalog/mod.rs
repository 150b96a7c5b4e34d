//! Catalog store - the immutable collection of decks supplied at startup.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::cards::{Card, CardCode, Deck};
use crate::error::{DeckError, Result};

/// Identity of the synthesized mixed deck.
pub const MIXED_DECK_ID: &str = "hidden-threats";

const BUILTIN_CATALOG: &str = include_str!("builtin.toml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    decks: Vec<Deck>,
}

/// Read-only collection of decks with a catalog-wide card index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    decks: Vec<Deck>,
    /// Card code -> (deck index, card index).
    index: HashMap<CardCode, (usize, usize)>,
}

impl Catalog {
    /// Build a catalog, validating every deck and card code uniqueness.
    pub fn from_decks(decks: Vec<Deck>) -> Result<Self> {
        let mut index = HashMap::new();
        let mut deck_ids = HashMap::new();

        for (deck_idx, deck) in decks.iter().enumerate() {
            deck.validate()?;
            if deck_ids.insert(deck.id.clone(), deck_idx).is_some() {
                return Err(DeckError::DuplicateDeck(deck.id.clone()));
            }

            for (card_idx, card) in deck.cards.iter().enumerate() {
                if let Some((first, _)) = index.insert(card.code().clone(), (deck_idx, card_idx)) {
                    return Err(DeckError::DuplicateCard {
                        code: card.code().to_string(),
                        first_deck: decks[first].id.clone(),
                        second_deck: deck.id.clone(),
                    });
                }
            }
        }

        tracing::debug!(decks = decks.len(), cards = index.len(), "catalog loaded");
        Ok(Self { decks, index })
    }

    /// Parse a catalog from TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(contents).map_err(DeckError::CatalogParse)?;
        Self::from_decks(file.decks)
    }

    /// Load a catalog file from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DeckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// The catalog embedded in this crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    /// Get a deck by id.
    pub fn deck(&self, id: &str) -> Option<&Deck> {
        self.decks.iter().find(|d| d.id == id)
    }

    /// Get a card by code, whichever deck holds it.
    pub fn card(&self, code: &CardCode) -> Option<&Card> {
        self.index
            .get(code)
            .map(|(deck_idx, card_idx)| &self.decks[*deck_idx].cards[*card_idx])
    }

    /// Every card of every deck, in catalog order.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.decks.iter().flat_map(|d| d.cards.iter())
    }

    pub fn card_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Draw `size` distinct cards uniformly from the union of all decks.
    ///
    /// A catalog holding fewer than `size` cards yields all of them.
    pub fn sample_mixed_deck<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Deck {
        let mut pool: Vec<Card> = self.all_cards().cloned().collect();
        pool.shuffle(rng);
        pool.truncate(size);

        if pool.len() < size {
            tracing::debug!(
                requested = size,
                available = pool.len(),
                "catalog too small for a full mixed deck"
            );
        }

        Deck::new(
            MIXED_DECK_ID,
            "Hidden Threats",
            "fa-skull",
            "A perilous raid through the shadows of the realm, revealing secrets that were never meant to be found.",
            pool,
        )
    }
}
