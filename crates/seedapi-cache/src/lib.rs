//! Regeneration cache for seedapi.
//!
//! Generating sample data is slow and costs provider tokens, so the result
//! of a successful generation pass is persisted together with a
//! [`Fingerprint`] of the descriptor set that produced it. On the next run
//! the fingerprint of the current descriptors is compared with the stored
//! one and generation is skipped when they agree.
//!
//! # On-disk layout
//!
//! ```text
//! <cache dir>/generated.json   resource name -> item or items (pretty JSON)
//! <cache dir>/fingerprint      hex digest of the descriptor set
//! ```
//!
//! Both files are replaced through a temporary file and an atomic rename.
//! A commit removes the old fingerprint, then replaces the data file, then
//! writes the new fingerprint. A fingerprint on disk therefore always
//! describes the data next to it, and an interrupted commit leaves no
//! fingerprint at all.

pub mod cache;
pub mod error;
pub mod fingerprint;

pub use cache::{CacheRecord, RegenerationCache};
pub use error::{CacheError, CacheResult};
pub use fingerprint::Fingerprint;
