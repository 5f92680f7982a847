//! Odometer intervals and the per-vehicle interval index.
//!
//! A trip claims the half-open range `[start, end)` on its vehicle's
//! odometer. Two trips collide when `a.start < b.end && a.end > b.start`;
//! trips that merely touch (`a.end == b.start`) do not.

use std::collections::BTreeMap;

use milebook_shared::types::TripId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::LedgerError;

/// Highest odometer reading accepted for a trip or vehicle, in kilometres.
pub const MAX_ODOMETER: i64 = 10_000_000;

/// Half-open odometer range `[start, end)` in kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OdometerInterval {
    start: i64,
    end: i64,
}

impl OdometerInterval {
    /// Creates an interval, rejecting empty or inverted ranges.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::EndNotAfterStart` if `end <= start`.
    pub const fn new(start: i64, end: i64) -> Result<Self, LedgerError> {
        if end <= start {
            return Err(LedgerError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    /// Start reading (inclusive).
    #[must_use]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// End reading (exclusive).
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Distance driven, always positive.
    #[must_use]
    pub const fn distance(&self) -> i64 {
        self.end - self.start
    }

    /// Returns true if the two intervals share at least one kilometre.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Sorted index of the active trip intervals of one vehicle.
///
/// While the stored intervals are pairwise disjoint (the normal case, since
/// every write is validated against this index) an overlap query walks
/// backwards from the greatest start below the query's end and stops at the
/// first interval that ends at or before the query's start, which is
/// O(log n). Rows written before overlap validation existed may collide with
/// each other; once such a pair is inserted the index falls back to a
/// linear scan.
#[derive(Debug, Clone)]
pub struct OdometerIndex {
    by_start: BTreeMap<(i64, TripId), i64>,
    disjoint: bool,
}

impl Default for OdometerIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl OdometerIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_start: BTreeMap::new(),
            disjoint: true,
        }
    }

    /// Number of intervals in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_start.len()
    }

    /// Returns true if the index holds no intervals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_start.is_empty()
    }

    /// Adds a trip's interval.
    pub fn insert(&mut self, trip_id: TripId, interval: OdometerInterval) {
        if self.disjoint && self.find_overlap(&interval, Some(trip_id)).is_some() {
            self.disjoint = false;
        }
        self.by_start.insert((interval.start, trip_id), interval.end);
    }

    /// Removes a trip's interval. Returns false if it was not present.
    pub fn remove(&mut self, trip_id: TripId, interval: OdometerInterval) -> bool {
        self.by_start.remove(&(interval.start, trip_id)).is_some()
    }

    /// Finds an indexed trip whose interval overlaps `interval`.
    ///
    /// `exclude` skips one trip, used when re-validating a trip against the
    /// rest of its vehicle's history.
    #[must_use]
    pub fn find_overlap(
        &self,
        interval: &OdometerInterval,
        exclude: Option<TripId>,
    ) -> Option<TripId> {
        if !self.disjoint {
            return self
                .iter()
                .find(|(id, other)| Some(*id) != exclude && other.overlaps(interval))
                .map(|(id, _)| id);
        }

        // Disjoint intervals sorted by start are also sorted by end, so the
        // walk can stop at the first one that ends before the query begins.
        let upper = (interval.end, TripId::from_uuid(Uuid::nil()));
        for (&(_, id), &end) in self.by_start.range(..upper).rev() {
            if end <= interval.start {
                break;
            }
            if Some(id) != exclude {
                return Some(id);
            }
        }
        None
    }

    /// Iterates over the indexed intervals in ascending start order.
    pub fn iter(&self) -> impl Iterator<Item = (TripId, OdometerInterval)> + '_ {
        self.by_start
            .iter()
            .map(|(&(start, id), &end)| (id, OdometerInterval { start, end }))
    }
}

impl FromIterator<(TripId, OdometerInterval)> for OdometerIndex {
    fn from_iter<I: IntoIterator<Item = (TripId, OdometerInterval)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (id, interval) in iter {
            index.insert(id, interval);
        }
        index
    }
}
