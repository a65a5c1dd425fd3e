//! Passenger arena.
//!
//! Passengers live in an append-only arena owned by the kernel; queues,
//! staging lists, and pending-travel buckets store `PassengerId`s, never
//! passenger data directly, so that snapshots deep-copy cheaply (just the
//! membership sequences) while passenger identity stays stable across the
//! whole run — including for historical snapshots that outlive a purge.

use super::flight::FlightId;

pub type PassengerId = usize;

#[derive(Clone, Debug)]
pub struct Passenger {
    pub id: PassengerId,
    pub flight: FlightId,
    pub spawn_minute_idx: u32,
    pub in_person: bool,
    pub missed: bool,
    pub assigned_hold_room_idx: Option<usize>,
    pub hold_room_sequence: Option<u32>,
}

impl Passenger {
    pub fn new(id: PassengerId, flight: FlightId, spawn_minute_idx: u32, in_person: bool) -> Self {
        Self {
            id,
            flight,
            spawn_minute_idx,
            in_person,
            missed: false,
            assigned_hold_room_idx: None,
            hold_room_sequence: None,
        }
    }
}

/// Absolute-second stamps for one passenger, kept in a map keyed by
/// identity rather than probed reflectively (design note §9): a stamp is
/// always set or always absent, no silent fallback.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassengerStamps {
    pub ticket_queue_enter: Option<u64>,
    pub ticket_done: Option<u64>,
    pub checkpoint_queue_enter: Option<u64>,
    pub checkpoint_start: Option<u64>,
    pub checkpoint_done: Option<u64>,
    pub hold_enter: Option<u64>,
}

impl PassengerStamps {
    /// Monotonic-stamp invariant check (testable property 4).
    pub fn is_monotonic(&self) -> bool {
        let ordered = [
            self.ticket_queue_enter,
            self.ticket_done,
            self.checkpoint_queue_enter,
            self.checkpoint_start,
            self.checkpoint_done,
            self.hold_enter,
        ];
        let mut last = None;
        for stamp in ordered.into_iter().flatten() {
            if let Some(prev) = last {
                if stamp < prev {
                    return false;
                }
            }
            last = Some(stamp);
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
