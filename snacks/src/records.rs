//! # Session Records
//!
//! In-memory, append-only list of measured snacks for the lifetime of the process.
//!
//! ## Queries
//!
//! - No indexes, no caches. Every query is a fresh linear scan over the store, which is fine
//!   for the tens of snacks a session sees.
//! - The store itself is never capped. Only the leaderboard view is truncated.
use std::collections::{BTreeMap, HashMap};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::types::{MetricMode, SnackObservation, SnackType};

/// Current record holder per snack type. Every type is always present as a key.
pub type Winners = BTreeMap<SnackType, Option<SnackObservation>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub label: String,
    pub metric: f64,
    #[serde(rename = "type")]
    pub snack_type: SnackType,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    mode: MetricMode,
    snacks: Vec<SnackObservation>,
}

impl SessionStore {
    pub fn new(mode: MetricMode) -> Self {
        Self {
            mode,
            snacks: Vec::new(),
        }
    }

    pub fn mode(&self) -> MetricMode {
        self.mode
    }

    /// Stores a new observation and hands back a copy of it. Callers are expected to have
    /// rejected unknown snacks and non-positive metrics already.
    pub fn append(&mut self, snack_type: SnackType, metric: f64, image: String) -> SnackObservation {
        debug_assert!(metric.is_finite() && metric > 0.0);

        let created_at = Utc::now();
        let snack = SnackObservation {
            id: format!(
                "{}-{}",
                created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
                self.snacks.len()
            ),
            snack_type,
            metric,
            mode: self.mode,
            created_at,
            image,
        };

        self.snacks.push(snack.clone());
        snack
    }

    pub fn len(&self) -> usize {
        self.snacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snacks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnackObservation> {
        self.snacks.iter()
    }

    pub fn tracker(&self) -> RecordTracker<'_> {
        RecordTracker {
            snacks: &self.snacks,
        }
    }
}

/// Read-only record queries over a snapshot of the store.
#[derive(Debug, Clone, Copy)]
pub struct RecordTracker<'a> {
    snacks: &'a [SnackObservation],
}

impl<'a> RecordTracker<'a> {
    /// Largest snack of a type. On a tie the earliest one keeps the title.
    pub fn largest_of_type(&self, snack_type: SnackType) -> Option<&'a SnackObservation> {
        self.snacks
            .iter()
            .filter(|snack| snack.snack_type == snack_type)
            .reduce(|best, snack| if snack.metric > best.metric { snack } else { best })
    }

    /// Strictly greater than the current record. Matching it is not enough.
    pub fn is_new_record(&self, snack_type: SnackType, candidate: f64) -> bool {
        self.largest_of_type(snack_type)
            .is_none_or(|record| candidate > record.metric)
    }

    /// All snacks of every type, biggest first, cut to `n`. Equal metrics keep insertion order.
    pub fn top_n(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut ordinals: HashMap<SnackType, usize> = HashMap::new();

        let mut entries: Vec<LeaderboardEntry> = self
            .snacks
            .iter()
            .map(|snack| {
                let ordinal = ordinals.entry(snack.snack_type).or_insert(0);
                *ordinal += 1;

                LeaderboardEntry {
                    label: format!("{} #{}", snack.snack_type.label(), ordinal),
                    metric: snack.metric,
                    snack_type: snack.snack_type,
                }
            })
            .collect();

        entries.sort_by(|a, b| b.metric.total_cmp(&a.metric));
        entries.truncate(n);
        entries
    }

    pub fn all_winners(&self) -> Winners {
        SnackType::ALL
            .into_iter()
            .map(|snack_type| (snack_type, self.largest_of_type(snack_type).cloned()))
            .collect()
    }
}
