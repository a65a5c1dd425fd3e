//! Deterministic `KernelConfig` fixtures for the concrete end-to-end
//! scenarios, shared by unit tests (inline `#[cfg(test)]` modules) and the
//! integration tests under `tests/`. Compiled for `test`/`debug_assertions`
//! builds only, never shipped in a release binary.

use std::collections::HashSet;

use crate::config::{
    ArrivalCurveConfig, CheckpointConfig, HoldRoomConfig, KernelConfig, TicketCounterConfig,
};
use crate::models::Flight;

/// S1 — single flight, single ticket counter, single checkpoint, no
/// travel delay, no jitter: every passenger should clear the pipeline
/// before boarding close.
pub fn scenario_single_lane_ticketing() -> KernelConfig {
    KernelConfig {
        percent_in_person: 1.0,
        ticket_counter_configs: vec![TicketCounterConfig {
            id: 0,
            rate_per_minute: 60.0,
            allowed_flights: HashSet::new(),
        }],
        checkpoint_configs: vec![CheckpointConfig {
            id: 0,
            rate_per_hour: 3600.0,
        }],
        hold_room_configs: vec![HoldRoomConfig {
            id: 0,
            walk_seconds_from_checkpoint: 0,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 60,
        interval_minutes: 1,
        transit_delay_minutes: 0,
        hold_delay_minutes: 0,
        flights: vec![Flight::new("AB100", 600, 10, 1.0, "narrowbody")],
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(1),
        jitter_enabled: false,
        boarding_close_minutes: 20,
    }
}

/// S2 — a single ticket lane at 30/min (0.5/sec) with 20 passengers all
/// queued at second 0; exercises fractional-debt carry across ticks.
pub fn scenario_rate_carry() -> KernelConfig {
    KernelConfig {
        percent_in_person: 1.0,
        ticket_counter_configs: vec![TicketCounterConfig {
            id: 0,
            rate_per_minute: 30.0,
            allowed_flights: HashSet::new(),
        }],
        checkpoint_configs: vec![CheckpointConfig {
            id: 0,
            rate_per_hour: 3600.0,
        }],
        hold_room_configs: vec![HoldRoomConfig {
            id: 0,
            walk_seconds_from_checkpoint: 0,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 1,
        interval_minutes: 1,
        transit_delay_minutes: 0,
        hold_delay_minutes: 0,
        flights: vec![Flight::new("RC200", 30, 20, 1.0, "narrowbody")],
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(2),
        jitter_enabled: false,
        boarding_close_minutes: 0,
    }
}

/// S3 — two idle, equal-rate checkpoints to exercise router tie-breaking.
pub fn scenario_router_tie_break() -> KernelConfig {
    KernelConfig {
        percent_in_person: 0.0,
        ticket_counter_configs: Vec::new(),
        checkpoint_configs: vec![
            CheckpointConfig {
                id: 0,
                rate_per_hour: 1800.0,
            },
            CheckpointConfig {
                id: 1,
                rate_per_hour: 1800.0,
            },
        ],
        hold_room_configs: vec![HoldRoomConfig {
            id: 0,
            walk_seconds_from_checkpoint: 0,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 10,
        interval_minutes: 5,
        transit_delay_minutes: 0,
        hold_delay_minutes: 0,
        flights: vec![Flight::new("RT300", 300, 2, 1.0, "narrowbody")],
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(3),
        jitter_enabled: false,
        boarding_close_minutes: 0,
    }
}

/// S4 — boarding close fires while a passenger is still in the ticket
/// queue with no possibility of finishing service in time.
pub fn scenario_boarding_close_miss() -> KernelConfig {
    KernelConfig {
        percent_in_person: 1.0,
        ticket_counter_configs: vec![TicketCounterConfig {
            id: 0,
            rate_per_minute: 0.1,
            allowed_flights: HashSet::new(),
        }],
        checkpoint_configs: vec![CheckpointConfig {
            id: 0,
            rate_per_hour: 3600.0,
        }],
        hold_room_configs: vec![HoldRoomConfig {
            id: 0,
            walk_seconds_from_checkpoint: 0,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 30,
        interval_minutes: 1,
        transit_delay_minutes: 0,
        hold_delay_minutes: 0,
        flights: vec![Flight::new("BC400", 30, 5, 1.0, "narrowbody")],
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(4),
        jitter_enabled: false,
        boarding_close_minutes: 20,
    }
}

/// S5 — a small multi-interval run used to assert rewind/fast-forward
/// determinism.
pub fn scenario_rewind_determinism() -> KernelConfig {
    KernelConfig {
        percent_in_person: 0.6,
        ticket_counter_configs: vec![TicketCounterConfig {
            id: 0,
            rate_per_minute: 10.0,
            allowed_flights: HashSet::new(),
        }],
        checkpoint_configs: vec![
            CheckpointConfig {
                id: 0,
                rate_per_hour: 600.0,
            },
            CheckpointConfig {
                id: 1,
                rate_per_hour: 600.0,
            },
        ],
        hold_room_configs: vec![HoldRoomConfig {
            id: 0,
            walk_seconds_from_checkpoint: 30,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 60,
        interval_minutes: 5,
        transit_delay_minutes: 1,
        hold_delay_minutes: 1,
        flights: vec![Flight::new("RW500", 60, 40, 0.8, "narrowbody")],
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(5),
        jitter_enabled: true,
        boarding_close_minutes: 10,
    }
}

/// S6 — online-only routing: no ticket counters at all, percent_in_person
/// forced to 0.
pub fn scenario_online_routing() -> KernelConfig {
    KernelConfig {
        percent_in_person: 0.0,
        ticket_counter_configs: Vec::new(),
        checkpoint_configs: vec![CheckpointConfig {
            id: 0,
            rate_per_hour: 1200.0,
        }],
        hold_room_configs: vec![HoldRoomConfig {
            id: 0,
            walk_seconds_from_checkpoint: 0,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 1,
        interval_minutes: 1,
        transit_delay_minutes: 1,
        hold_delay_minutes: 0,
        flights: vec![Flight::new("ON600", 30, 5, 1.0, "narrowbody")],
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(6),
        jitter_enabled: false,
        boarding_close_minutes: 0,
    }
}
