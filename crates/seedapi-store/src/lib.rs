//! In-memory backing stores for seedapi resources.
//!
//! Each served resource owns exactly one [`ResourceStore`]. A store holds
//! either a single item or an ordered collection of items, fixed at
//! construction from the resource's [`ResourceData`](seedapi_types::ResourceData).
//!
//! # Design Rules
//!
//! 1. Insertion order is the pagination order.
//! 2. Collection lookups compare ids through their string form
//!    ([`ItemId`](seedapi_types::ItemId)), so `12` and `"12"` are the same id.
//! 3. Inserts never check for colliding ids.
//! 4. Merges are shallow: nested values are replaced, not merged.
//! 5. Nothing is persisted; a store lives as long as its router.

pub mod error;
pub mod page;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use page::Page;
pub use store::ResourceStore;
