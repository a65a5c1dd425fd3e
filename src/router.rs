//! Checkpoint Router: picks the lane minimizing backlog,
//! breaking ties by smaller non-missed queue size then lower lane id.

use crate::config::CheckpointConfig;

/// `backlog(c) = remaining_service(c) + non_missed_queued(c) * service_seconds(c)`.
///
/// `non_missed_queue_len(c)` is supplied by the caller rather than a raw
/// queue slice so the router stays decoupled from how lane state is stored.
///
/// A zero-rate (effectively-infinite-service) lane is excluded from
/// selection whenever at least one lane can actually make progress: an
/// idle zero-rate lane has `backlog == 0` just like any other idle lane,
/// so it would otherwise win ties on lane id alone and trap a passenger
/// forever. Only when every lane is zero-rate does selection fall back to
/// the plain backlog comparison.
pub fn pick_checkpoint_lane_at(
    abs_sec: u64,
    configs: &[CheckpointConfig],
    service_end_abs: &[u64],
    non_missed_queue_len: impl Fn(usize) -> usize,
) -> Option<usize> {
    if configs.is_empty() {
        return None;
    }

    let any_open = configs.iter().any(|cfg| cfg.rate_per_hour > 0.0);

    let mut best: Option<(u128, usize, usize)> = None; // (backlog, queue_len, lane_id)
    for (c, cfg) in configs.iter().enumerate() {
        if any_open && cfg.rate_per_hour <= 0.0 {
            continue;
        }
        let remaining = service_end_abs[c].saturating_sub(abs_sec);
        let non_missed = non_missed_queue_len(c);
        let service_seconds = cfg.service_seconds();
        let backlog = remaining as u128 + non_missed as u128 * service_seconds as u128;
        let candidate = (backlog, non_missed, c);
        match &best {
            None => best = Some(candidate),
            Some(current) if candidate < *current => best = Some(candidate),
            _ => {}
        }
    }
    best.map(|(_, _, lane)| lane)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfgs(rates: &[f64]) -> Vec<CheckpointConfig> {
        rates
            .iter()
            .enumerate()
            .map(|(id, &rate_per_hour)| CheckpointConfig { id, rate_per_hour })
            .collect()
    }

    #[test]
    fn idle_equal_lanes_pick_lowest_id() {
        let configs = cfgs(&[3600.0, 3600.0]);
        let ends = vec![0, 0];
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |_| 0);
        assert_eq!(lane, Some(0));
    }

    #[test]
    fn next_arrival_prefers_emptier_lane() {
        let configs = cfgs(&[3600.0, 3600.0]);
        let ends = vec![0, 0];
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |c| if c == 0 { 1 } else { 0 });
        assert_eq!(lane, Some(1));
    }

    #[test]
    fn missed_passengers_dont_count_toward_backlog() {
        let configs = cfgs(&[3600.0, 3600.0]);
        let ends = vec![0, 0];
        // lane 0 has queued passengers but all missed -> non-missed count 0
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |c| if c == 0 { 0 } else { 3 });
        assert_eq!(lane, Some(0));
    }

    #[test]
    fn remaining_service_dominates_backlog() {
        let configs = cfgs(&[3600.0, 3600.0]);
        let ends = vec![1000, 0];
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |_| 0);
        assert_eq!(lane, Some(1));
    }

    #[test]
    fn zero_rate_lane_is_avoided_once_backlogged() {
        let configs = cfgs(&[0.0, 3600.0]);
        let ends = vec![0, 0];
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |c| if c == 0 { 1 } else { 1 });
        assert_eq!(lane, Some(1));
    }

    #[test]
    fn idle_zero_rate_lane_is_never_chosen_over_an_open_lane() {
        let configs = cfgs(&[0.0, 3600.0]);
        let ends = vec![0, 0];
        // Both lanes idle with empty queues: backlog(0) == backlog(1) == 0,
        // but lane 0 is closed and must lose the tie regardless of id.
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |_| 0);
        assert_eq!(lane, Some(1));
    }

    #[test]
    fn all_lanes_closed_falls_back_to_plain_backlog_tie_break() {
        let configs = cfgs(&[0.0, 0.0]);
        let ends = vec![0, 0];
        let lane = pick_checkpoint_lane_at(100, &configs, &ends, |_| 0);
        assert_eq!(lane, Some(0));
    }

    #[test]
    fn no_lanes_returns_none() {
        assert_eq!(pick_checkpoint_lane_at(0, &[], &[], |_| 0), None);
    }
}
