//! Travel Model: four node-to-node legs, each returning
//! integer seconds >= 1, with a legacy fallback when no provider is
//! attached or when a provider signals "unknown" (a value <= 0).

/// Implemented by an external consumer that wants to override the legacy
/// minute-constant travel times (e.g. a floor-plan path-finder). Returning
/// `<= 0` signals "unknown" and falls back to the legacy constant.
pub trait TravelTimeProvider: Send + Sync {
    fn spawn_to_ticket(&self, lane: usize) -> i64;
    fn spawn_to_checkpoint(&self, lane: usize) -> i64;
    fn ticket_to_checkpoint(&self, lane_from: usize, lane_to: usize) -> i64;
    fn checkpoint_to_hold(&self, lane: usize, room: usize) -> i64;

    /// Optional hook; default is a no-op.
    fn set_walk_speed_mps(&mut self, _mps: f64) {}
}

pub struct TravelModel {
    pub transit_delay_minutes: u32,
    pub hold_delay_minutes: u32,
    provider: Option<Box<dyn TravelTimeProvider>>,
}

impl TravelModel {
    pub fn new(transit_delay_minutes: u32, hold_delay_minutes: u32) -> Self {
        Self {
            transit_delay_minutes,
            hold_delay_minutes,
            provider: None,
        }
    }

    pub fn attach_provider(&mut self, provider: Box<dyn TravelTimeProvider>) {
        self.provider = Some(provider);
    }

    fn legacy_transit(&self) -> u64 {
        (self.transit_delay_minutes as u64 * 60).max(1)
    }

    pub fn spawn_to_ticket(&self, lane: usize) -> u64 {
        resolve(
            self.provider.as_deref().map(|p| p.spawn_to_ticket(lane)),
            self.legacy_transit(),
        )
    }

    pub fn spawn_to_checkpoint(&self, lane: usize) -> u64 {
        resolve(
            self.provider.as_deref().map(|p| p.spawn_to_checkpoint(lane)),
            self.legacy_transit(),
        )
    }

    pub fn ticket_to_checkpoint(&self, lane_from: usize, lane_to: usize) -> u64 {
        resolve(
            self.provider
                .as_deref()
                .map(|p| p.ticket_to_checkpoint(lane_from, lane_to)),
            self.legacy_transit(),
        )
    }

    /// Checkpoint->hold uses the destination room's walk-seconds override
    /// when positive, else `hold_delay_minutes * 60`.
    pub fn checkpoint_to_hold(&self, lane: usize, room: usize, room_walk_seconds: u64) -> u64 {
        let legacy = if room_walk_seconds > 0 {
            room_walk_seconds
        } else {
            (self.hold_delay_minutes as u64 * 60).max(1)
        };
        resolve(
            self.provider
                .as_deref()
                .map(|p| p.checkpoint_to_hold(lane, room)),
            legacy,
        )
    }
}

fn resolve(provided: Option<i64>, legacy: u64) -> u64 {
    match provided {
        Some(v) if v > 0 => v as u64,
        _ => legacy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(i64);
    impl TravelTimeProvider for FixedProvider {
        fn spawn_to_ticket(&self, _lane: usize) -> i64 {
            self.0
        }
        fn spawn_to_checkpoint(&self, _lane: usize) -> i64 {
            self.0
        }
        fn ticket_to_checkpoint(&self, _lane_from: usize, _lane_to: usize) -> i64 {
            self.0
        }
        fn checkpoint_to_hold(&self, _lane: usize, _room: usize) -> i64 {
            self.0
        }
    }

    #[test]
    fn no_provider_falls_back_to_legacy() {
        let model = TravelModel::new(2, 3);
        assert_eq!(model.spawn_to_ticket(0), 120);
        assert_eq!(model.checkpoint_to_hold(0, 0, 0), 180);
    }

    #[test]
    fn provider_overrides_when_positive() {
        let mut model = TravelModel::new(2, 3);
        model.attach_provider(Box::new(FixedProvider(500)));
        assert_eq!(model.spawn_to_ticket(0), 500);
    }

    #[test]
    fn unknown_provider_value_falls_back() {
        let mut model = TravelModel::new(2, 3);
        model.attach_provider(Box::new(FixedProvider(0)));
        assert_eq!(model.spawn_to_ticket(0), 120);
        model.attach_provider(Box::new(FixedProvider(-5)));
        assert_eq!(model.spawn_to_ticket(0), 120);
    }

    #[test]
    fn room_walk_seconds_override_wins_over_legacy_hold_delay() {
        let model = TravelModel::new(2, 3);
        assert_eq!(model.checkpoint_to_hold(0, 0, 45), 45);
    }
}
