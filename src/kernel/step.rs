//! Pipeline Scheduler — `simulate_interval()`.
//!
//! Advances the kernel by exactly one engine interval: spawn passengers
//! for every minute in range, then a per-second tick loop running the
//! seven ordered sub-phases, then persist & purge. Never called directly
//! by a consumer — `Kernel::compute_next_interval` owns when this runs.

use crate::stations::{drain_due, schedule, FlightIntervalCounters};

use super::Kernel;
use super::lifecycle;

pub(super) fn simulate_interval(kernel: &mut Kernel) {
    prelude(kernel);

    let interval_seconds = kernel.config.interval_minutes as u64 * 60;
    let t0 = kernel.current_interval * interval_seconds;
    let t1 = t0 + interval_seconds;

    spawn(kernel, t0, t1);

    for abs_sec in t0..t1 {
        boarding_close_events(kernel, abs_sec);
        departure_events(kernel, abs_sec);
        arrivals_to_ticket(kernel, abs_sec);
        arrivals_to_checkpoint(kernel, abs_sec);
        arrivals_to_hold(kernel, abs_sec);
        ticket_service(kernel, abs_sec);
        checkpoint_service(kernel, abs_sec);
    }

    persist_and_record(kernel);

    log::debug!(
        "simulated interval {} [{t0}, {t1})",
        kernel.current_interval
    );
}

fn prelude(kernel: &mut Kernel) {
    kernel.just_closed_flights.clear();
    for lane in &mut kernel.ticket_lanes {
        lane.serving_this_interval = None;
    }
    for counters in &mut kernel.flight_counters {
        *counters = FlightIntervalCounters::default();
    }
}

fn spawn(kernel: &mut Kernel, t0: u64, t1: u64) {
    for m in (t0 / 60)..(t1 / 60) {
        for f in 0..kernel.config.flights.len() {
            let idx = m as i64 - kernel.spawn_offset_min[f];
            let count = if idx < 0 || idx as usize >= kernel.arrivals_table[f].len() {
                0
            } else {
                kernel.arrivals_table[f][idx as usize]
            };
            if count == 0 {
                continue;
            }

            let in_person = if kernel.config.ticket_counter_configs.is_empty() {
                0
            } else {
                ((count as f64 * kernel.config.percent_in_person).round() as u32).min(count)
            };
            let online = count - in_person;

            for _ in 0..in_person {
                spawn_in_person(kernel, f, m);
            }
            for _ in 0..online {
                spawn_online(kernel, f, m);
            }
        }
    }
}

fn new_passenger(kernel: &mut Kernel, flight: usize, spawn_minute_idx: u64, in_person: bool) -> usize {
    let id = kernel.passengers.len();
    kernel
        .passengers
        .push(crate::models::Passenger::new(id, flight, spawn_minute_idx as u32, in_person));
    kernel.stamps.push(crate::models::PassengerStamps::default());
    kernel.flight_counters[flight].arrivals += 1;
    id
}

fn jitter(kernel: &mut Kernel) -> u64 {
    if kernel.config.jitter_enabled {
        kernel.rng.jitter_seconds()
    } else {
        0
    }
}

fn spawn_in_person(kernel: &mut Kernel, flight: usize, minute: u64) {
    let id = new_passenger(kernel, flight, minute, true);

    let flight_number = kernel.config.flights[flight].normalized_number().to_string();
    let lane = kernel
        .config
        .ticket_counter_configs
        .iter()
        .enumerate()
        .filter(|(_, c)| c.allowed_flights.is_empty() || c.allowed_flights.contains(&flight_number))
        .min_by_key(|(idx, _)| kernel.ticket_lanes[*idx].queue.len())
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let jitter_s = jitter(kernel);
    let arrival = minute * 60 + jitter_s + kernel.travel.spawn_to_ticket(lane);
    schedule(&mut kernel.pending_to_ticket, arrival, id);
    kernel.target_ticket_lane.insert(id, lane);
}

fn spawn_online(kernel: &mut Kernel, flight: usize, minute: u64) {
    let id = new_passenger(kernel, flight, minute, false);

    let proto_lane = pick_checkpoint_lane(kernel, minute * 60);
    let jitter_s = jitter(kernel);
    let travel = kernel.travel.spawn_to_checkpoint(proto_lane.unwrap_or(0));
    let arrival = minute * 60 + jitter_s + travel;
    schedule(&mut kernel.pending_to_checkpoint, arrival, id);
    if let Some(lane) = proto_lane {
        kernel.target_checkpoint_lane.insert(id, lane);
    }
}

/// `backlog`-minimizing lane choice, re-derived fresh every
/// call so it always reflects current queue/service state.
fn pick_checkpoint_lane(kernel: &Kernel, abs_sec: u64) -> Option<usize> {
    let service_end_abs: Vec<u64> = kernel
        .checkpoint_lanes
        .iter()
        .map(|l| l.service_end_abs)
        .collect();
    crate::router::pick_checkpoint_lane_at(abs_sec, &kernel.config.checkpoint_configs, &service_end_abs, |c| {
        kernel.checkpoint_lanes[c]
            .queue
            .iter()
            .filter(|&&id| !kernel.passengers[id].missed)
            .count()
    })
}

fn boarding_close_events(kernel: &mut Kernel, abs_sec: u64) {
    for f in 0..kernel.config.flights.len() {
        if kernel.boarding_close_abs(f) == abs_sec {
            lifecycle::mark_boarding_closed(kernel, f);
        }
    }
}

fn departure_events(kernel: &mut Kernel, abs_sec: u64) {
    for f in 0..kernel.config.flights.len() {
        if kernel.departure_abs(f) == abs_sec {
            lifecycle::on_departure(kernel, f);
            kernel.just_closed_flights.push(f);
        }
    }
}

fn arrivals_to_ticket(kernel: &mut Kernel, abs_sec: u64) {
    let due = drain_due(&mut kernel.pending_to_ticket, abs_sec);
    for id in due {
        if kernel.passengers[id].missed {
            continue;
        }
        let lane = kernel.target_ticket_lane.get(&id).copied().unwrap_or(0);
        if lane >= kernel.ticket_lanes.len() {
            continue;
        }
        kernel.ticket_lanes[lane].queue.push_back(id);
        kernel.stamps[id].ticket_queue_enter = Some(abs_sec);
        let flight = kernel.passengers[id].flight;
        kernel.flight_counters[flight].enqueued_at_ticket += 1;
    }
}

fn arrivals_to_checkpoint(kernel: &mut Kernel, abs_sec: u64) {
    let due = drain_due(&mut kernel.pending_to_checkpoint, abs_sec);
    for id in due {
        if kernel.passengers[id].in_person {
            for lane in &mut kernel.ticket_lanes {
                if let Some(pos) = lane.staging.iter().position(|&x| x == id) {
                    lane.staging.remove(pos);
                    break;
                }
            }
        }

        kernel.stamps[id].checkpoint_queue_enter = Some(abs_sec);

        if kernel.checkpoint_lanes.is_empty() {
            continue;
        }
        let hinted = kernel
            .target_checkpoint_lane
            .get(&id)
            .copied()
            .filter(|&l| l < kernel.checkpoint_lanes.len());
        let lane = hinted.or_else(|| pick_checkpoint_lane(kernel, abs_sec)).unwrap_or(0);
        kernel.checkpoint_lanes[lane].queue.push_back(id);
        let flight = kernel.passengers[id].flight;
        kernel.flight_counters[flight].arrived_at_checkpoint += 1;
    }
}

fn arrivals_to_hold(kernel: &mut Kernel, abs_sec: u64) {
    let due = drain_due(&mut kernel.pending_to_hold, abs_sec);
    for id in due {
        for lane in &mut kernel.checkpoint_lanes {
            if let Some(pos) = lane.staging.iter().position(|&x| x == id) {
                lane.staging.remove(pos);
                break;
            }
        }

        let flight = kernel.passengers[id].flight;
        if abs_sec < kernel.boarding_close_abs(flight) {
            if let Some(room) = kernel.chosen_room(flight) {
                let room = room.min(kernel.hold_rooms.len().saturating_sub(1));
                kernel.hold_rooms[room].admitted.push_back(id);
                let seq = kernel.hold_rooms[room].admitted.len() as u32;
                kernel.passengers[id].assigned_hold_room_idx = Some(room);
                kernel.passengers[id].hold_room_sequence = Some(seq);
                kernel.stamps[id].hold_enter = Some(abs_sec);
            }
        } else {
            kernel.passengers[id].missed = true;
        }
    }
}

fn ticket_service(kernel: &mut Kernel, abs_sec: u64) {
    for c in 0..kernel.config.ticket_counter_configs.len() {
        if kernel.ticket_lanes[c].queue.is_empty() {
            kernel.ticket_lanes[c].debt = 0.0;
            continue;
        }

        let rate_per_sec = kernel.config.ticket_counter_configs[c].rate_per_minute.max(0.0) / 60.0;
        kernel.ticket_lanes[c].debt += rate_per_sec;

        while kernel.ticket_lanes[c].debt >= 1.0 {
            let pos = kernel.ticket_lanes[c]
                .queue
                .iter()
                .position(|&pid| !kernel.passengers[pid].missed);
            let Some(pos) = pos else {
                kernel.ticket_lanes[c].debt = 0.0;
                break;
            };
            let pid = kernel.ticket_lanes[c].queue.remove(pos).unwrap();

            kernel.stamps[pid].ticket_done = Some(abs_sec);
            kernel.ticket_lanes[c].staging.push_back(pid);
            kernel.ticket_lanes[c].serving_this_interval = Some(pid);
            let flight = kernel.passengers[pid].flight;
            kernel.flight_counters[flight].ticketed += 1;

            if !kernel.passengers[pid].missed {
                let target_lane = pick_checkpoint_lane(kernel, abs_sec).unwrap_or(0);
                kernel.target_checkpoint_lane.insert(pid, target_lane);
                let depart = abs_sec + kernel.travel.ticket_to_checkpoint(c, target_lane);
                schedule(&mut kernel.pending_to_checkpoint, depart, pid);
            }

            kernel.ticket_lanes[c].debt -= 1.0;
            if kernel.ticket_lanes[c].queue.is_empty() {
                kernel.ticket_lanes[c].debt = 0.0;
                break;
            }
        }
    }
}

fn checkpoint_service(kernel: &mut Kernel, abs_sec: u64) {
    for c in 0..kernel.config.checkpoint_configs.len() {
        if kernel.checkpoint_lanes[c].service_end_abs > 0
            && abs_sec >= kernel.checkpoint_lanes[c].service_end_abs
        {
            let done = kernel.checkpoint_lanes[c].serving.take();
            kernel.checkpoint_lanes[c].service_end_abs = 0;
            if let Some(pid) = done {
                if !kernel.passengers[pid].missed {
                    kernel.checkpoint_lanes[c].staging.push_back(pid);
                    let flight = kernel.passengers[pid].flight;
                    kernel.flight_counters[flight].passed_checkpoint += 1;
                    if let Some(room) = kernel.chosen_room(flight) {
                        kernel.passengers[pid].assigned_hold_room_idx = Some(room);
                        let walk = kernel.config.hold_room_configs[room].walk_seconds_from_checkpoint;
                        let depart = abs_sec + kernel.travel.checkpoint_to_hold(c, room, walk);
                        schedule(&mut kernel.pending_to_hold, depart, pid);
                    }
                }
            }
        }

        if kernel.checkpoint_lanes[c].serving.is_none() {
            let pos = kernel.checkpoint_lanes[c]
                .queue
                .iter()
                .position(|&pid| !kernel.passengers[pid].missed);
            if let Some(pos) = pos {
                let pid = kernel.checkpoint_lanes[c].queue.remove(pos).unwrap();
                let service_seconds = kernel.config.checkpoint_configs[c].service_seconds().max(1);
                kernel.checkpoint_lanes[c].serving = Some(pid);
                kernel.checkpoint_lanes[c].service_end_abs = abs_sec + service_seconds;
                kernel.stamps[pid].checkpoint_start = Some(abs_sec);
                kernel.stamps[pid].checkpoint_done = Some(abs_sec + service_seconds);
            }
        }
    }
}

fn persist_and_record(kernel: &mut Kernel) {
    for lane in &mut kernel.ticket_lanes {
        lane.debt = lane.debt.rem_euclid(1.0);
    }

    for f in kernel.just_closed_flights.clone() {
        lifecycle::clear_flight_from_non_hold_areas(kernel, f);
    }

    let missed_of: Vec<bool> = kernel.passengers.iter().map(|p| p.missed).collect();
    for lane in &mut kernel.ticket_lanes {
        lane.queue.retain(|&id| !missed_of[id]);
        lane.staging.retain(|&id| !missed_of[id]);
    }
    for lane in &mut kernel.checkpoint_lanes {
        lane.queue.retain(|&id| !missed_of[id]);
        lane.staging.retain(|&id| !missed_of[id]);
    }
    for bucket in kernel.pending_to_ticket.values_mut() {
        bucket.retain(|&id| !missed_of[id]);
    }
    for bucket in kernel.pending_to_checkpoint.values_mut() {
        bucket.retain(|&id| !missed_of[id]);
    }
    for bucket in kernel.pending_to_hold.values_mut() {
        bucket.retain(|&id| !missed_of[id]);
    }
    kernel.pending_to_ticket.retain(|_, v| !v.is_empty());
    kernel.pending_to_checkpoint.retain(|_, v| !v.is_empty());
    kernel.pending_to_hold.retain(|_, v| !v.is_empty());
}
