//! Snapshot Store.
//!
//! A snapshot is a deep copy of every FIFO membership, pending map,
//! service slot, and passenger stamp at one interval boundary. The
//! passenger arena itself is never copied: it is
//! append-only, so a historical snapshot can reference ids that have
//! since been purged from the live queues without needing its own copy
//! of passenger data beyond the small set of fields that do mutate.

use std::collections::{HashMap, VecDeque};

use crate::models::{FlightId, PassengerId, PassengerStamps};
use crate::stations::{FlightIntervalCounters, PendingMap};

use super::Kernel;

/// The mutable slice of a [`Passenger`](crate::models::Passenger)'s state:
/// everything set after construction. Combined with its stamps, this is
/// the per-passenger data a snapshot must deep-copy to stay a frozen,
/// independent view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PassengerSnapshotRecord {
    pub missed: bool,
    pub assigned_hold_room_idx: Option<usize>,
    pub hold_room_sequence: Option<u32>,
    pub stamps: PassengerStamps,
}

/// Structural equality (testable property 7) only holds between two
/// snapshots captured at the same point in the passenger arena's growth:
/// `passenger_records` always covers every passenger that exists in the
/// live arena at capture time, including ones spawned after the interval
/// a restored snapshot represents (the arena never shrinks on rewind, see
/// [`restore`]). Comparing `Kernel::current_snapshot()` against a stored
/// snapshot is therefore only meaningful after a full run, where no later
/// interval can have spawned passengers the earlier one doesn't know
/// about; comparing mid-run needs a membership-only comparison instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub interval: u64,

    pub ticket_queues: Vec<VecDeque<PassengerId>>,
    pub ticket_staging: Vec<VecDeque<PassengerId>>,
    pub ticket_debt: Vec<f64>,

    pub checkpoint_queues: Vec<VecDeque<PassengerId>>,
    pub checkpoint_staging: Vec<VecDeque<PassengerId>>,
    pub checkpoint_serving: Vec<Option<PassengerId>>,
    pub service_end_abs: Vec<u64>,

    pub hold_rooms: Vec<VecDeque<PassengerId>>,

    pub pending_to_ticket: PendingMap,
    pub pending_to_checkpoint: PendingMap,
    pub pending_to_hold: PendingMap,

    pub target_ticket_lane: HashMap<PassengerId, usize>,
    pub target_checkpoint_lane: HashMap<PassengerId, usize>,

    /// Indexed by `PassengerId`, one entry per passenger that existed at
    /// capture time.
    pub passenger_records: Vec<PassengerSnapshotRecord>,

    pub just_closed_flights: Vec<FlightId>,
    pub flight_counters: Vec<FlightIntervalCounters>,
}

pub(super) fn capture(kernel: &Kernel) -> Snapshot {
    let passenger_records = kernel
        .stamps
        .iter()
        .zip(kernel.passengers.iter())
        .map(|(stamps, p)| PassengerSnapshotRecord {
            missed: p.missed,
            assigned_hold_room_idx: p.assigned_hold_room_idx,
            hold_room_sequence: p.hold_room_sequence,
            stamps: stamps.clone(),
        })
        .collect();

    Snapshot {
        interval: kernel.current_interval,
        ticket_queues: kernel.ticket_lanes.iter().map(|l| l.queue.clone()).collect(),
        ticket_staging: kernel.ticket_lanes.iter().map(|l| l.staging.clone()).collect(),
        ticket_debt: kernel.ticket_lanes.iter().map(|l| l.debt).collect(),
        checkpoint_queues: kernel
            .checkpoint_lanes
            .iter()
            .map(|l| l.queue.clone())
            .collect(),
        checkpoint_staging: kernel
            .checkpoint_lanes
            .iter()
            .map(|l| l.staging.clone())
            .collect(),
        checkpoint_serving: kernel.checkpoint_lanes.iter().map(|l| l.serving).collect(),
        service_end_abs: kernel
            .checkpoint_lanes
            .iter()
            .map(|l| l.service_end_abs)
            .collect(),
        hold_rooms: kernel.hold_rooms.iter().map(|r| r.admitted.clone()).collect(),
        pending_to_ticket: kernel.pending_to_ticket.clone(),
        pending_to_checkpoint: kernel.pending_to_checkpoint.clone(),
        pending_to_hold: kernel.pending_to_hold.clone(),
        target_ticket_lane: kernel.target_ticket_lane.clone(),
        target_checkpoint_lane: kernel.target_checkpoint_lane.clone(),
        passenger_records,
        just_closed_flights: kernel.just_closed_flights.clone(),
        flight_counters: kernel.flight_counters.clone(),
    }
}

/// Replaces every live container's contents with the snapshot at
/// `interval`, in place. Passengers beyond `passenger_records.len()` (not
/// yet spawned when this snapshot was captured) are left untouched — they
/// cannot be referenced by any membership list this snapshot restores.
pub(super) fn restore(kernel: &mut Kernel, interval: u64) {
    let snap = kernel.snapshots[interval as usize].clone();

    for (lane, queue) in kernel.ticket_lanes.iter_mut().zip(snap.ticket_queues) {
        lane.queue = queue;
    }
    for (lane, staging) in kernel.ticket_lanes.iter_mut().zip(snap.ticket_staging) {
        lane.staging = staging;
    }
    for (lane, debt) in kernel.ticket_lanes.iter_mut().zip(snap.ticket_debt) {
        lane.debt = debt;
        lane.serving_this_interval = None;
    }

    for (lane, queue) in kernel.checkpoint_lanes.iter_mut().zip(snap.checkpoint_queues) {
        lane.queue = queue;
    }
    for (lane, staging) in kernel
        .checkpoint_lanes
        .iter_mut()
        .zip(snap.checkpoint_staging)
    {
        lane.staging = staging;
    }
    for (lane, serving) in kernel
        .checkpoint_lanes
        .iter_mut()
        .zip(snap.checkpoint_serving)
    {
        lane.serving = serving;
    }
    for (lane, end) in kernel.checkpoint_lanes.iter_mut().zip(snap.service_end_abs) {
        lane.service_end_abs = end;
    }

    for (room, admitted) in kernel.hold_rooms.iter_mut().zip(snap.hold_rooms) {
        room.admitted = admitted;
    }

    kernel.pending_to_ticket = snap.pending_to_ticket;
    kernel.pending_to_checkpoint = snap.pending_to_checkpoint;
    kernel.pending_to_hold = snap.pending_to_hold;

    kernel.target_ticket_lane = snap.target_ticket_lane;
    kernel.target_checkpoint_lane = snap.target_checkpoint_lane;

    for (id, record) in snap.passenger_records.into_iter().enumerate() {
        if let Some(p) = kernel.passengers.get_mut(id) {
            p.missed = record.missed;
            p.assigned_hold_room_idx = record.assigned_hold_room_idx;
            p.hold_room_sequence = record.hold_room_sequence;
        }
        if let Some(s) = kernel.stamps.get_mut(id) {
            *s = record.stamps;
        }
    }

    kernel.just_closed_flights = snap.just_closed_flights;
    kernel.flight_counters = snap.flight_counters;
}
