//! Foundation types for Tally, a small leaderboard backend.
//!
//! Every other Tally crate depends on `tally-types`.
//!
//! # Key Types
//!
//! - [`ScoreRecord`] — one persisted leaderboard entry (name, score)
//! - [`Submission`] — an unvalidated score submission as received from a client
//! - [`ValidationError`] — why a submission was rejected before reaching the store

pub mod error;
pub mod record;

pub use error::ValidationError;
pub use record::{ScoreRecord, Submission};
