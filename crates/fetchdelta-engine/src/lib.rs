//! fetchdelta engine - orchestration layer
//!
//! Ties a [`FetchSource`] to the core pipeline: fetch, section, diff,
//! notify, persist.

pub mod controller;
pub mod source;

pub use controller::{CacheBinding, FetchOutcome, FetchedResultsController};
pub use source::{FetchSource, MemorySource};
