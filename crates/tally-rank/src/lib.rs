//! Leaderboard ranking for Tally.
//!
//! Rankings are pure projections of the full record set, rebuilt on every
//! read. Nothing here performs I/O.

pub mod ranking;

pub use ranking::{top_default, top_n, Ranked, DEFAULT_TOP_N};
