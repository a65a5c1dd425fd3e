//! Flight Lifecycle Manager.
//!
//! Fires at flight-specific absolute seconds during the Pipeline
//! Scheduler's per-second tick loop (`kernel::step`, sub-phases 1-2).

use std::collections::HashSet;

use crate::models::{FlightId, PassengerId};

use super::Kernel;

/// Marks missed every passenger of `flight` not already seated in its
/// chosen hold room, then strips them from pending buckets and target-lane
/// hints. Queue/staging membership purge happens later, at interval end
///.
pub(super) fn mark_boarding_closed(kernel: &mut Kernel, flight: FlightId) {
    let flight_of: Vec<FlightId> = kernel.passengers.iter().map(|p| p.flight).collect();
    let already_missed: Vec<bool> = kernel.passengers.iter().map(|p| p.missed).collect();

    let in_chosen: HashSet<PassengerId> = kernel
        .chosen_room(flight)
        .map(|room| {
            kernel.hold_rooms[room]
                .admitted
                .iter()
                .copied()
                .filter(|&id| flight_of[id] == flight)
                .collect()
        })
        .unwrap_or_default();

    let mut candidates: Vec<PassengerId> = Vec::new();
    for lane in &kernel.ticket_lanes {
        candidates.extend(lane.queue.iter().copied());
        candidates.extend(lane.staging.iter().copied());
        if let Some(id) = lane.serving_this_interval {
            candidates.push(id);
        }
    }
    for lane in &kernel.checkpoint_lanes {
        candidates.extend(lane.queue.iter().copied());
        candidates.extend(lane.staging.iter().copied());
        if let Some(id) = lane.serving {
            candidates.push(id);
        }
    }
    for bucket in kernel.pending_to_ticket.values() {
        candidates.extend(bucket.iter().copied());
    }
    for bucket in kernel.pending_to_checkpoint.values() {
        candidates.extend(bucket.iter().copied());
    }
    for bucket in kernel.pending_to_hold.values() {
        candidates.extend(bucket.iter().copied());
    }

    let mut to_mark: HashSet<PassengerId> = HashSet::new();
    for id in candidates {
        if flight_of[id] == flight && !already_missed[id] && !in_chosen.contains(&id) {
            to_mark.insert(id);
        }
    }

    for &id in &to_mark {
        kernel.passengers[id].missed = true;
        kernel.stamps[id].clear();
        kernel.target_ticket_lane.remove(&id);
        kernel.target_checkpoint_lane.remove(&id);
    }

    for bucket in kernel.pending_to_ticket.values_mut() {
        bucket.retain(|id| !to_mark.contains(id));
    }
    for bucket in kernel.pending_to_checkpoint.values_mut() {
        bucket.retain(|id| !to_mark.contains(id));
    }
    for bucket in kernel.pending_to_hold.values_mut() {
        bucket.retain(|id| !to_mark.contains(id));
    }
    kernel.pending_to_ticket.retain(|_, v| !v.is_empty());
    kernel.pending_to_checkpoint.retain(|_, v| !v.is_empty());
    kernel.pending_to_hold.retain(|_, v| !v.is_empty());

    if !to_mark.is_empty() {
        log::debug!(
            "boarding close for flight {flight}: {} passengers marked missed",
            to_mark.len()
        );
    }
}

/// Clears the flight's chosen hold room and the stamps of everyone who was
/// in it.
pub(super) fn on_departure(kernel: &mut Kernel, flight: FlightId) {
    let Some(room) = kernel.chosen_room(flight) else {
        return;
    };
    let flight_of: Vec<FlightId> = kernel.passengers.iter().map(|p| p.flight).collect();
    let departing: Vec<PassengerId> = kernel.hold_rooms[room]
        .admitted
        .iter()
        .copied()
        .filter(|&id| flight_of[id] == flight)
        .collect();
    kernel.hold_rooms[room]
        .admitted
        .retain(|id| flight_of[*id] != flight);
    for &id in &departing {
        kernel.stamps[id].clear();
    }
    log::info!(
        "flight {flight} departed: {} passengers cleared from hold room {room}",
        departing.len()
    );
}

/// Called at the end of an interval that closed `flight`. Strips the flight's
/// passengers from every non-hold container, then resets `service_end_abs`
/// for *every* checkpoint lane — not only those serving this flight. A
/// service in progress for another flight is cancelled by this reset; the
/// kernel preserves that behavior rather than special-casing it (see
/// Open Question #1).
pub(super) fn clear_flight_from_non_hold_areas(kernel: &mut Kernel, flight: FlightId) {
    let flight_of: Vec<FlightId> = kernel.passengers.iter().map(|p| p.flight).collect();

    for lane in &mut kernel.ticket_lanes {
        lane.queue.retain(|id| flight_of[*id] != flight);
        lane.staging.retain(|id| flight_of[*id] != flight);
        if lane.serving_this_interval.is_some_and(|id| flight_of[id] == flight) {
            lane.serving_this_interval = None;
        }
    }
    for lane in &mut kernel.checkpoint_lanes {
        lane.queue.retain(|id| flight_of[*id] != flight);
        lane.staging.retain(|id| flight_of[*id] != flight);
        if lane.serving.is_some_and(|id| flight_of[id] == flight) {
            lane.serving = None;
        }
        lane.service_end_abs = 0;
    }

    for bucket in kernel.pending_to_ticket.values_mut() {
        bucket.retain(|id| flight_of[*id] != flight);
    }
    for bucket in kernel.pending_to_checkpoint.values_mut() {
        bucket.retain(|id| flight_of[*id] != flight);
    }
    for bucket in kernel.pending_to_hold.values_mut() {
        bucket.retain(|id| flight_of[*id] != flight);
    }
    kernel.pending_to_ticket.retain(|_, v| !v.is_empty());
    kernel.pending_to_checkpoint.retain(|_, v| !v.is_empty());
    kernel.pending_to_hold.retain(|_, v| !v.is_empty());

    kernel
        .target_ticket_lane
        .retain(|id, _| flight_of[*id] != flight);
    kernel
        .target_checkpoint_lane
        .retain(|id, _| flight_of[*id] != flight);

    for (id, f) in flight_of.iter().enumerate() {
        if *f == flight {
            kernel.stamps[id].clear();
        }
    }
}
