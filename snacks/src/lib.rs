//! # Snacks
//!
//! Domain core shared by the server and the vision client.
//!
//! ## Contents
//!
//! - [`types`]: snack categories, metric modes, per-shape dimensions and stored observations
//! - [`geometry`]: dimension to metric derivation, one closed formula per shape
//! - [`records`]: the session store and the record/leaderboard queries over it
//! - [`badge`]: the snack expert badge
//!
//! ## Notes
//!
//! - Exactly one metric convention (area or perimeter) is active per deployment. The store is
//!   built with a mode and stamps it on every observation, so modes are never mixed.
//! - Nothing here rounds. Rounding is left to whoever displays the numbers.
pub mod badge;
pub mod geometry;
pub mod records;
pub mod types;

pub use badge::{Badge, DEFAULT_EXPERT_THRESHOLD, expert_badge};
pub use geometry::GeometryError;
pub use records::{LeaderboardEntry, RecordTracker, SessionStore, Winners};
pub use types::{DetectedType, Dimensions, MetricMode, Shape, SnackObservation, SnackType};
