//! In-memory catalog store for the Ederaxy upload engine.
//!
//! [`CatalogStore`] is the single source of truth for the client-held
//! mirrors of curriculum hierarchy entities, lessons, and video records.
//! All reads and writes go through one shared instance
//! (`Arc<CatalogStore>`), so concurrent access from the wizard's
//! submission task and the UI shell is explicit and serialized.

mod catalog;

pub use catalog::CatalogStore;
