use std::collections::HashSet;

use concourse_sim::{
    ArrivalCurveConfig, CheckpointConfig, Flight, HoldRoomConfig, Kernel, KernelConfig,
    TicketCounterConfig,
};
use concourse_sim::cli::{console_main, ConsoleInteraction};
use concourse_sim::roster;

fn main() {
    if let Err(e) = concourse_sim::init_logging() {
        eprintln!("failed to initialize logging: {e}");
    }

    let app_dir = concourse_sim::app_data_dir().ok();
    let flights = match roster::find_flight_csv(app_dir.as_deref()) {
        Some(path) => match roster::load_flights_from_csv(&path) {
            Ok(flights) if !flights.is_empty() => {
                log::info!("using flight roster from {}", path.display());
                flights
            }
            Ok(_) => {
                log::warn!("{} contained no usable rows, using built-in sample", path.display());
                sample_flights()
            }
            Err(e) => {
                log::error!("failed to load {}: {e}, using built-in sample", path.display());
                sample_flights()
            }
        },
        None => {
            log::info!("no flights.csv found, using built-in sample roster");
            sample_flights()
        }
    };

    let config = KernelConfig {
        percent_in_person: 0.5,
        ticket_counter_configs: vec![
            TicketCounterConfig {
                id: 0,
                rate_per_minute: 20.0,
                allowed_flights: HashSet::new(),
            },
            TicketCounterConfig {
                id: 1,
                rate_per_minute: 20.0,
                allowed_flights: HashSet::new(),
            },
        ],
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
            walk_seconds_from_checkpoint: 60,
            allowed_flights: HashSet::new(),
        }],
        arrival_span_minutes: 120,
        interval_minutes: 5,
        transit_delay_minutes: 2,
        hold_delay_minutes: 2,
        flights,
        arrival_curve_config: ArrivalCurveConfig::Legacy,
        seed: Some(42),
        jitter_enabled: true,
        boarding_close_minutes: 20,
    };

    let (mut kernel, warnings): (Kernel, _) = Kernel::new(config);
    for warning in &warnings {
        eprintln!("config warning: {warning}");
    }

    let interaction = ConsoleInteraction::new();
    if let Err(e) = console_main(&mut kernel, &interaction) {
        log::error!("CLI loop exited with an error: {e}");
        std::process::exit(1);
    }
}

fn sample_flights() -> Vec<Flight> {
    vec![
        Flight::new("AB123", 480, 180, 0.9, "narrowbody"),
        Flight::new("CD456", 540, 220, 0.75, "widebody"),
        Flight::new("EF789", 600, 150, 0.95, "narrowbody"),
    ]
}
