//! The simulation kernel. `Kernel` owns every passenger, queue, and snapshot for one
//! run; all mutation funnels through [`Kernel::compute_next_interval`] and
//! its siblings.

mod lifecycle;
mod snapshot;
mod step;

pub use snapshot::Snapshot;

use std::collections::{HashMap, VecDeque};

use crate::config::KernelConfig;
use crate::errors::ConfigWarning;
use crate::models::{Flight, FlightId, Passenger, PassengerId, PassengerStamps};
use crate::rng::KernelRng;
use crate::stations::{
    CheckpointLaneState, FlightIntervalCounters, HoldRoomState, PendingMap, TicketLaneState,
};
use crate::travel::{TravelModel, TravelTimeProvider};

pub struct Kernel {
    config: KernelConfig,

    horizon_start_min: i64,
    spawn_offset_min: Vec<i64>,
    departure_abs_sec: Vec<u64>,
    boarding_close_abs_sec: Vec<u64>,
    arrivals_table: Vec<Vec<u32>>,
    chosen_room: Vec<Option<usize>>,

    ticket_lanes: Vec<TicketLaneState>,
    checkpoint_lanes: Vec<CheckpointLaneState>,
    hold_rooms: Vec<HoldRoomState>,

    passengers: Vec<Passenger>,
    stamps: Vec<PassengerStamps>,

    pending_to_ticket: PendingMap,
    pending_to_checkpoint: PendingMap,
    pending_to_hold: PendingMap,

    target_ticket_lane: HashMap<PassengerId, usize>,
    target_checkpoint_lane: HashMap<PassengerId, usize>,

    just_closed_flights: Vec<FlightId>,
    flight_counters: Vec<FlightIntervalCounters>,

    current_interval: u64,
    max_computed_interval: u64,
    total_intervals: u64,

    snapshots: Vec<Snapshot>,

    rng: KernelRng,
    travel: TravelModel,

    config_warnings: Vec<ConfigWarning>,
}

impl Kernel {
    /// Validates and clamps `config`, then builds the fixed
    /// per-flight schedule (spawn offsets, arrival curves, chosen hold
    /// rooms) and an empty snapshot at index 0.
    pub fn new(mut config: KernelConfig) -> (Self, Vec<ConfigWarning>) {
        let warnings = config.validate_and_clamp();

        let horizon_start_min = config
            .flights
            .iter()
            .map(|f| f.departure_time as i64 - config.arrival_span_minutes as i64)
            .min()
            .unwrap_or(0);

        let interval_seconds = config.interval_minutes as u64 * 60;

        let mut spawn_offset_min = Vec::with_capacity(config.flights.len());
        let mut departure_abs_sec = Vec::with_capacity(config.flights.len());
        let mut boarding_close_abs_sec = Vec::with_capacity(config.flights.len());
        let mut arrivals_table = Vec::with_capacity(config.flights.len());

        for flight in &config.flights {
            let offset = (flight.departure_time as i64 - config.arrival_span_minutes as i64)
                - horizon_start_min;
            spawn_offset_min.push(offset);

            let dep_abs = (flight.departure_time as i64 - horizon_start_min).max(0) as u64 * 60;
            departure_abs_sec.push(dep_abs);
            boarding_close_abs_sec
                .push(dep_abs.saturating_sub(config.boarding_close_minutes as u64 * 60));

            let curve = crate::arrival::build_arrival_curve(
                &config.arrival_curve_config,
                config.arrival_span_minutes,
                flight.planned_passengers(),
            );
            arrivals_table.push(curve);
        }

        let max_departure = departure_abs_sec.iter().copied().max().unwrap_or(0);
        let total_seconds = max_departure + interval_seconds;
        let total_intervals = total_seconds.div_ceil(interval_seconds).max(1);

        let ticket_lanes = vec![TicketLaneState::default(); config.ticket_counter_configs.len()];
        let checkpoint_lanes =
            vec![CheckpointLaneState::default(); config.checkpoint_configs.len()];
        let hold_rooms = vec![HoldRoomState::default(); config.hold_room_configs.len()];
        let flight_counters = vec![FlightIntervalCounters::default(); config.flights.len()];

        let mut rng = KernelRng::from_seed(config.seed);
        let chosen_room = choose_rooms(&config, &mut rng);

        let travel = TravelModel::new(config.transit_delay_minutes, config.hold_delay_minutes);

        let mut kernel = Self {
            config,
            horizon_start_min,
            spawn_offset_min,
            departure_abs_sec,
            boarding_close_abs_sec,
            arrivals_table,
            chosen_room,
            ticket_lanes,
            checkpoint_lanes,
            hold_rooms,
            passengers: Vec::new(),
            stamps: Vec::new(),
            pending_to_ticket: PendingMap::new(),
            pending_to_checkpoint: PendingMap::new(),
            pending_to_hold: PendingMap::new(),
            target_ticket_lane: HashMap::new(),
            target_checkpoint_lane: HashMap::new(),
            just_closed_flights: Vec::new(),
            flight_counters,
            current_interval: 0,
            max_computed_interval: 0,
            total_intervals,
            snapshots: Vec::new(),
            rng,
            travel,
            config_warnings: warnings.clone(),
        };
        let initial = snapshot::capture(&kernel);
        kernel.snapshots.push(initial);

        log::info!(
            "kernel constructed: {} flights, {} ticket lanes, {} checkpoint lanes, {} hold rooms, {} intervals",
            kernel.config.flights.len(),
            kernel.config.ticket_counter_configs.len(),
            kernel.config.checkpoint_configs.len(),
            kernel.config.hold_room_configs.len(),
            kernel.total_intervals,
        );
        for warning in &kernel.config_warnings {
            log::warn!("config warning: {warning}");
        }

        (kernel, warnings)
    }

    pub fn attach_travel_provider(&mut self, provider: Box<dyn TravelTimeProvider>) {
        self.travel.attach_provider(provider);
    }

    /// The clamp warnings produced at construction time, kept for callers
    /// that want to inspect them after the fact rather than capturing the
    /// `Vec` returned by `new`.
    pub fn config_warnings(&self) -> &[ConfigWarning] {
        &self.config_warnings
    }

    /// A short human-readable summary of the roster this kernel was built
    /// with: flight/lane/room counts and total planned passengers across
    /// the whole run.
    pub fn describe(&self) -> String {
        let total_planned: u32 = self.config.flights.iter().map(|f| f.planned_passengers()).sum();
        format!(
            "{} flights ({} planned passengers), {} ticket lanes, {} checkpoint lanes, {} hold rooms, {} intervals",
            self.config.flights.len(),
            total_planned,
            self.config.ticket_counter_configs.len(),
            self.config.checkpoint_configs.len(),
            self.config.hold_room_configs.len(),
            self.total_intervals,
        )
    }

    // ---- Control API ----

    pub fn current_interval(&self) -> u64 {
        self.current_interval
    }

    pub fn total_intervals(&self) -> u64 {
        self.total_intervals
    }

    pub fn max_computed_interval(&self) -> u64 {
        self.max_computed_interval
    }

    pub fn can_rewind(&self) -> bool {
        self.current_interval > 0
    }

    pub fn can_fast_forward(&self) -> bool {
        self.current_interval < self.max_computed_interval
    }

    /// `StepBeyondHorizon`: no-op once `current_interval == total_intervals`.
    /// Otherwise restores a cached future snapshot, or computes and appends
    /// a new one.
    pub fn compute_next_interval(&mut self) {
        if self.current_interval >= self.total_intervals {
            return;
        }
        if self.current_interval + 1 <= self.max_computed_interval {
            let target = self.current_interval + 1;
            snapshot::restore(self, target);
            self.current_interval = target;
            return;
        }
        step::simulate_interval(self);
        self.current_interval += 1;
        self.max_computed_interval = self.current_interval;
        let appended = snapshot::capture(self);
        self.snapshots.push(appended);
    }

    pub fn run_all_intervals(&mut self) {
        self.reset_to_initial();
        while self.current_interval < self.total_intervals {
            self.compute_next_interval();
        }
    }

    /// `OutOfRangeInterval`: clamp `k` into `[0, max_computed_interval]`.
    pub fn go_to_interval(&mut self, k: u64) {
        let k = k.min(self.max_computed_interval);
        snapshot::restore(self, k);
        self.current_interval = k;
    }

    pub fn rewind_one_interval(&mut self) {
        if self.can_rewind() {
            self.go_to_interval(self.current_interval - 1);
        }
    }

    /// Restores a cached later snapshot without computing new ones; a pure
    /// fast-forward distinct from [`Kernel::compute_next_interval`], which
    /// also extends the horizon when needed.
    pub fn fast_forward_one_interval(&mut self) {
        if self.can_fast_forward() {
            self.go_to_interval(self.current_interval + 1);
        }
    }

    fn reset_to_initial(&mut self) {
        self.passengers.clear();
        self.stamps.clear();
        self.rng = KernelRng::from_seed(self.config.seed);
        self.snapshots.truncate(1);
        self.max_computed_interval = 0;
        self.current_interval = 0;
        snapshot::restore(self, 0);
    }

    // ---- Read API ----

    pub fn flight_id_for(&self, normalized_number: &str) -> Option<FlightId> {
        self.config
            .flights
            .iter()
            .position(|f| f.normalized_number() == normalized_number)
    }

    pub fn flights(&self) -> &[Flight] {
        &self.config.flights
    }

    pub fn boarding_close_abs(&self, flight: FlightId) -> u64 {
        self.boarding_close_abs_sec[flight]
    }

    pub fn departure_abs(&self, flight: FlightId) -> u64 {
        self.departure_abs_sec[flight]
    }

    pub fn chosen_room(&self, flight: FlightId) -> Option<usize> {
        self.chosen_room[flight]
    }

    pub fn ticket_lane_count(&self) -> usize {
        self.ticket_lanes.len()
    }

    pub fn checkpoint_lane_count(&self) -> usize {
        self.checkpoint_lanes.len()
    }

    pub fn hold_room_count(&self) -> usize {
        self.hold_rooms.len()
    }

    pub fn ticket_queue(&self, lane: usize) -> &VecDeque<PassengerId> {
        &self.ticket_lanes[lane].queue
    }

    pub fn ticket_staging(&self, lane: usize) -> &VecDeque<PassengerId> {
        &self.ticket_lanes[lane].staging
    }

    pub fn ticket_debt(&self, lane: usize) -> f64 {
        self.ticket_lanes[lane].debt
    }

    pub fn checkpoint_queue(&self, lane: usize) -> &VecDeque<PassengerId> {
        &self.checkpoint_lanes[lane].queue
    }

    pub fn checkpoint_staging(&self, lane: usize) -> &VecDeque<PassengerId> {
        &self.checkpoint_lanes[lane].staging
    }

    pub fn checkpoint_serving(&self, lane: usize) -> Option<PassengerId> {
        self.checkpoint_lanes[lane].serving
    }

    pub fn checkpoint_service_end_abs(&self, lane: usize) -> u64 {
        self.checkpoint_lanes[lane].service_end_abs
    }

    pub fn hold_room(&self, room: usize) -> &VecDeque<PassengerId> {
        &self.hold_rooms[room].admitted
    }

    pub fn pending_to_ticket(&self) -> &PendingMap {
        &self.pending_to_ticket
    }

    pub fn pending_to_checkpoint(&self) -> &PendingMap {
        &self.pending_to_checkpoint
    }

    pub fn pending_to_hold(&self) -> &PendingMap {
        &self.pending_to_hold
    }

    pub fn target_ticket_lane(&self, passenger: PassengerId) -> Option<usize> {
        self.target_ticket_lane.get(&passenger).copied()
    }

    pub fn target_checkpoint_lane(&self, passenger: PassengerId) -> Option<usize> {
        self.target_checkpoint_lane.get(&passenger).copied()
    }

    pub fn passenger(&self, id: PassengerId) -> &Passenger {
        &self.passengers[id]
    }

    pub fn stamps(&self, id: PassengerId) -> &PassengerStamps {
        &self.stamps[id]
    }

    pub fn flight_counters(&self, flight: FlightId) -> FlightIntervalCounters {
        self.flight_counters[flight]
    }

    pub fn just_closed_flights(&self) -> &[FlightId] {
        &self.just_closed_flights
    }

    /// Per-minute arrival counts for `flight`, summing to its planned
    /// passenger count.
    pub fn arrivals_table(&self, flight: FlightId) -> &[u32] {
        &self.arrivals_table[flight]
    }

    /// Total passengers spawned so far across every flight.
    pub fn passenger_count(&self) -> usize {
        self.passengers.len()
    }

    /// Queue-size time series for one ticket lane, one entry per computed
    /// interval 0..=`max_computed_interval`.
    pub fn ticket_queue_size_series(&self, lane: usize) -> Vec<usize> {
        self.snapshots.iter().map(|s| s.ticket_queues[lane].len()).collect()
    }

    pub fn checkpoint_queue_size_series(&self, lane: usize) -> Vec<usize> {
        self.snapshots
            .iter()
            .map(|s| s.checkpoint_queues[lane].len())
            .collect()
    }

    pub fn hold_room_size_series(&self, room: usize) -> Vec<usize> {
        self.snapshots.iter().map(|s| s.hold_rooms[room].len()).collect()
    }

    pub fn flight_counters_series(&self, flight: FlightId) -> Vec<FlightIntervalCounters> {
        self.snapshots.iter().map(|s| s.flight_counters[flight]).collect()
    }

    /// A fresh deep copy of the current live state, in the same shape as a
    /// historical entry in the snapshot log. Lets a caller compare "state
    /// now" against "state recorded at interval k" by structural equality —
    /// but only meaningfully after a full run (`run_all_intervals`), since
    /// `passenger_records` always reflects every passenger spawned so far
    /// in the live arena, not just the ones known as of interval k. See
    /// [`Snapshot`]'s doc comment.
    pub fn current_snapshot(&self) -> Snapshot {
        snapshot::capture(self)
    }
}

/// Pre-assigns each flight to the hold room with minimal walk seconds
/// among rooms that accept it, ties broken by the seeded PRNG; falls back
/// to any all-accepting room, then room 0.
fn choose_rooms(config: &KernelConfig, rng: &mut KernelRng) -> Vec<Option<usize>> {
    config
        .flights
        .iter()
        .map(|flight| {
            if config.hold_room_configs.is_empty() {
                return None;
            }
            let accepting: Vec<usize> = config
                .hold_room_configs
                .iter()
                .enumerate()
                .filter(|(_, room)| {
                    room.allowed_flights.is_empty()
                        || room.allowed_flights.contains(flight.normalized_number())
                })
                .map(|(idx, _)| idx)
                .collect();

            if accepting.is_empty() {
                return Some(0);
            }

            let min_walk = accepting
                .iter()
                .map(|&idx| config.hold_room_configs[idx].walk_seconds_from_checkpoint)
                .min()
                .unwrap();
            let tied: Vec<usize> = accepting
                .into_iter()
                .filter(|&idx| config.hold_room_configs[idx].walk_seconds_from_checkpoint == min_walk)
                .collect();
            let pick = rng.choose_index(tied.len());
            Some(tied[pick])
        })
        .collect()
}
