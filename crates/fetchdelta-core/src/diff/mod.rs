//! Snapshot diff engine.
//!
//! Compares a baseline snapshot with a candidate snapshot and produces an
//! ordered change script for driving incremental UI updates.
//!
//! ## Entry point
//!
//! ```ignore
//! use fetchdelta_core::diff::{compute_changes, OrderingKeys};
//!
//! let keys = OrderingKeys::from_request(&request, Some("group"));
//! let script = compute_changes(&baseline, &candidate, &keys);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical scripts.
//! - **Silence**: structurally identical snapshots produce an empty script.
//! - **Fixed order**: section deletes, section inserts, then row deletes,
//!   inserts, moves and updates, each group in ascending index path order.
//! - **Direct changes only**: rows shifted by their neighbours are not reported.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{compute_changes, OrderingKeys};
pub use human_summary::render_human_summary;
pub use model::{ChangeKind, ChangeRecord, ChangeScript, SectionChangeKind, SectionChangeRecord};
