//! Queue & Service Station state. Plain data, no behavior beyond small accessors; the
//! scheduler in `kernel::step` owns all transitions.

use std::collections::{BTreeMap, VecDeque};

use crate::models::PassengerId;

/// Absolute-second-keyed bucket of passengers due at a node, insertion
/// order preserved per key.
pub type PendingMap = BTreeMap<u64, VecDeque<PassengerId>>;

pub fn schedule(map: &mut PendingMap, at_abs_sec: u64, passenger: PassengerId) {
    map.entry(at_abs_sec).or_default().push_back(passenger);
}

/// Removes and returns the bucket due exactly at `abs_sec`, if any.
pub fn drain_due(map: &mut PendingMap, abs_sec: u64) -> VecDeque<PassengerId> {
    map.remove(&abs_sec).unwrap_or_default()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TicketLaneState {
    pub queue: VecDeque<PassengerId>,
    /// Finished ticketing, in transit to a checkpoint.
    pub staging: VecDeque<PassengerId>,
    /// Fractional service debt carried across intervals, `[0, 1)`.
    pub debt: f64,
    /// Most recent service in the current interval; reset each Prelude phase.
    pub serving_this_interval: Option<PassengerId>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CheckpointLaneState {
    pub queue: VecDeque<PassengerId>,
    pub staging: VecDeque<PassengerId>,
    pub serving: Option<PassengerId>,
    /// Absolute second of completion; 0 means idle.
    pub service_end_abs: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HoldRoomState {
    pub admitted: VecDeque<PassengerId>,
}

/// Per-flight counters accumulated within the current interval, then
/// snapshotted into history at the Persist & record phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlightIntervalCounters {
    pub arrivals: u32,
    pub enqueued_at_ticket: u32,
    pub ticketed: u32,
    pub arrived_at_checkpoint: u32,
    pub passed_checkpoint: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schedule_preserves_insertion_order_within_a_key() {
        let mut map = PendingMap::new();
        schedule(&mut map, 10, 3);
        schedule(&mut map, 10, 1);
        schedule(&mut map, 10, 2);
        let drained: Vec<_> = drain_due(&mut map, 10).into_iter().collect();
        assert_eq!(drained, vec![3, 1, 2]);
    }

    #[test]
    fn draining_an_empty_key_returns_empty() {
        let mut map = PendingMap::new();
        assert!(drain_due(&mut map, 5).is_empty());
    }

    #[test]
    fn drain_removes_the_key() {
        let mut map = PendingMap::new();
        schedule(&mut map, 1, 7);
        drain_due(&mut map, 1);
        assert!(!map.contains_key(&1));
    }
}
