//! Construction-time configuration and the clamp-don't-reject validation
//! policy: out-of-range values are coerced into range rather than
//! rejected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigWarning;
use crate::models::Flight;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TicketCounterConfig {
    pub id: usize,
    pub rate_per_minute: f64,
    /// Empty means "accepts all flights".
    pub allowed_flights: HashSet<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckpointConfig {
    pub id: usize,
    pub rate_per_hour: f64,
}

impl CheckpointConfig {
    /// `max(1, round(3600 / rate_per_hour))`; a non-positive rate is
    /// treated as "effectively infinite service seconds".
    pub fn service_seconds(&self) -> u64 {
        if self.rate_per_hour <= 0.0 {
            u64::MAX / 2
        } else {
            (3600.0 / self.rate_per_hour).round().max(1.0) as u64
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HoldRoomConfig {
    pub id: usize,
    pub walk_seconds_from_checkpoint: u64,
    /// Empty means "accepts all flights".
    pub allowed_flights: HashSet<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ArrivalCurveConfig {
    Legacy,
    Edited {
        window_start_min_before_dep: u32,
        boarding_close_min_before_dep: u32,
        peak_min_before_dep: u32,
        left_sigma_min: f64,
        right_sigma_min: f64,
        late_clamp_min_before_dep: Option<u32>,
    },
}

impl Default for ArrivalCurveConfig {
    fn default() -> Self {
        Self::Legacy
    }
}

impl ArrivalCurveConfig {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy)
    }

    /// Clamp every field of an `Edited` curve: non-negative offsets, peak
    /// inside the window, sigmas >= 1.
    pub fn validate_and_clamp(&mut self, warnings: &mut Vec<ConfigWarning>) {
        if let Self::Edited {
            window_start_min_before_dep,
            boarding_close_min_before_dep,
            peak_min_before_dep,
            left_sigma_min,
            right_sigma_min,
            ..
        } = self
        {
            if *window_start_min_before_dep < *boarding_close_min_before_dep {
                warnings.push(ConfigWarning {
                    field: "arrival_curve.window_start_min_before_dep",
                    message: "window start must be at least boarding close offset; clamped"
                        .into(),
                });
                *window_start_min_before_dep = *boarding_close_min_before_dep;
            }
            if *peak_min_before_dep > *window_start_min_before_dep
                || *peak_min_before_dep < *boarding_close_min_before_dep
            {
                warnings.push(ConfigWarning {
                    field: "arrival_curve.peak_min_before_dep",
                    message: "peak clamped into [boarding_close, window_start]".into(),
                });
                *peak_min_before_dep =
                    (*peak_min_before_dep).clamp(*boarding_close_min_before_dep, *window_start_min_before_dep);
            }
            if *left_sigma_min < 1.0 {
                warnings.push(ConfigWarning {
                    field: "arrival_curve.left_sigma_min",
                    message: "sigma clamped to 1.0".into(),
                });
                *left_sigma_min = 1.0;
            }
            if *right_sigma_min < 1.0 {
                warnings.push(ConfigWarning {
                    field: "arrival_curve.right_sigma_min",
                    message: "sigma clamped to 1.0".into(),
                });
                *right_sigma_min = 1.0;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct KernelConfig {
    pub percent_in_person: f64,
    pub ticket_counter_configs: Vec<TicketCounterConfig>,
    pub checkpoint_configs: Vec<CheckpointConfig>,
    pub hold_room_configs: Vec<HoldRoomConfig>,
    pub arrival_span_minutes: u32,
    pub interval_minutes: u32,
    pub transit_delay_minutes: u32,
    pub hold_delay_minutes: u32,
    pub flights: Vec<Flight>,
    pub arrival_curve_config: ArrivalCurveConfig,
    pub seed: Option<u64>,
    pub jitter_enabled: bool,
    pub boarding_close_minutes: u32,
}

impl KernelConfig {
    /// Invalid configuration is clamped, never rejected. Returns the list
    /// of clamps applied so a caller can surface them.
    pub fn validate_and_clamp(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !(0.0..=1.0).contains(&self.percent_in_person) {
            warnings.push(ConfigWarning {
                field: "percent_in_person",
                message: format!("{} clamped to [0,1]", self.percent_in_person),
            });
            self.percent_in_person = self.percent_in_person.clamp(0.0, 1.0);
        }

        if self.interval_minutes < 1 {
            warnings.push(ConfigWarning {
                field: "interval_minutes",
                message: "interval_minutes < 1 clamped to 1".into(),
            });
            self.interval_minutes = 1;
        }

        if self.arrival_span_minutes < 1 {
            warnings.push(ConfigWarning {
                field: "arrival_span_minutes",
                message: "arrival_span_minutes < 1 clamped to 1".into(),
            });
            self.arrival_span_minutes = 1;
        }

        for counter in &mut self.ticket_counter_configs {
            if !counter.rate_per_minute.is_finite() || counter.rate_per_minute < 0.0 {
                warnings.push(ConfigWarning {
                    field: "ticket_counter_configs[].rate_per_minute",
                    message: format!("lane {} non-finite/negative rate clamped to 0", counter.id),
                });
                counter.rate_per_minute = 0.0;
            }
        }

        for checkpoint in &mut self.checkpoint_configs {
            if !checkpoint.rate_per_hour.is_finite() || checkpoint.rate_per_hour < 0.0 {
                warnings.push(ConfigWarning {
                    field: "checkpoint_configs[].rate_per_hour",
                    message: format!(
                        "lane {} non-finite/negative rate clamped to 0",
                        checkpoint.id
                    ),
                });
                checkpoint.rate_per_hour = 0.0;
            }
        }

        self.arrival_curve_config.validate_and_clamp(&mut warnings);

        if self.ticket_counter_configs.is_empty() {
            warnings.push(ConfigWarning {
                field: "ticket_counter_configs",
                message: "no ticket counters configured; in-person arrivals will reroute to online"
                    .into(),
            });
        }

        warnings
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            percent_in_person: 0.5,
            ticket_counter_configs: Vec::new(),
            checkpoint_configs: Vec::new(),
            hold_room_configs: Vec::new(),
            arrival_span_minutes: 120,
            interval_minutes: 5,
            transit_delay_minutes: 2,
            hold_delay_minutes: 2,
            flights: Vec::new(),
            arrival_curve_config: ArrivalCurveConfig::Legacy,
            seed: None,
            jitter_enabled: false,
            boarding_close_minutes: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_minutes_below_one_is_clamped() {
        let mut cfg = KernelConfig {
            interval_minutes: 0,
            ..Default::default()
        };
        let warnings = cfg.validate_and_clamp();
        assert_eq!(cfg.interval_minutes, 1);
        assert!(!warnings.is_empty());
    }

    #[test]
    fn negative_rate_is_clamped_to_zero() {
        let mut cfg = KernelConfig {
            checkpoint_configs: vec![CheckpointConfig {
                id: 0,
                rate_per_hour: -5.0,
            }],
            ..Default::default()
        };
        cfg.validate_and_clamp();
        assert_eq!(cfg.checkpoint_configs[0].rate_per_hour, 0.0);
    }

    #[test]
    fn service_seconds_is_at_least_one() {
        let c = CheckpointConfig {
            id: 0,
            rate_per_hour: 100_000.0,
        };
        assert_eq!(c.service_seconds(), 1);
    }

    #[test]
    fn zero_rate_checkpoint_is_effectively_closed() {
        let c = CheckpointConfig {
            id: 0,
            rate_per_hour: 0.0,
        };
        assert!(c.service_seconds() > 1_000_000);
    }
}
