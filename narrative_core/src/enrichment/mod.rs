//! Enrichment lookup - supplementary security details for cards.
//!
//! Records come from a JSON document keyed by card or category code and are
//! validated for shape when loaded. Queries never fail; a missing key is
//! simply `None`.

mod detail;
mod lookup;

pub use detail::*;
pub use lookup::*;
