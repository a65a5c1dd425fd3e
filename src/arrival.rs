//! Arrival Curve Generator.
//!
//! Produces, for one flight, a deterministic per-minute arrival-count array
//! of length `arrival_span_minutes` summing exactly to the flight's planned
//! passenger count. Two modes: a legacy centered Gaussian, and an edited
//! split-Gaussian with configurable peak/sigmas and a late-arrival clamp.

use crate::config::ArrivalCurveConfig;

/// Builds the minute-bucket table for one flight. `planned` is
/// `round(seats * fill_percent)`. Output length is always
/// `arrival_span_minutes`; minutes outside the active window are zero.
pub fn build_arrival_curve(
    config: &ArrivalCurveConfig,
    arrival_span_minutes: u32,
    planned: u32,
) -> Vec<u32> {
    let span = arrival_span_minutes as usize;
    match config {
        ArrivalCurveConfig::Legacy => build_legacy(span, planned),
        ArrivalCurveConfig::Edited {
            window_start_min_before_dep,
            boarding_close_min_before_dep,
            peak_min_before_dep,
            left_sigma_min,
            right_sigma_min,
            late_clamp_min_before_dep,
        } => build_edited(
            span,
            planned,
            *window_start_min_before_dep,
            *boarding_close_min_before_dep,
            *peak_min_before_dep,
            *left_sigma_min,
            *right_sigma_min,
            *late_clamp_min_before_dep,
        ),
    }
}

fn build_legacy(span: usize, planned: u32) -> Vec<u32> {
    let t = (span.saturating_sub(20)).max(1);
    let mean = (t as f64 - 1.0) / 2.0;
    let sigma = (t as f64 / 6.0).max(1.0);

    let mut density = vec![0.0_f64; t];
    for (m, d) in density.iter_mut().enumerate() {
        *d = gaussian(m as f64, mean, sigma);
    }
    normalize(&mut density);

    let mut out = vec![0_u32; span];
    distribute(&density, planned, &mut out[..t]);
    out
}

#[allow(clippy::too_many_arguments)]
fn build_edited(
    span: usize,
    planned: u32,
    window_start_min_before_dep: u32,
    boarding_close_min_before_dep: u32,
    peak_min_before_dep: u32,
    left_sigma_min: f64,
    right_sigma_min: f64,
    late_clamp_min_before_dep: Option<u32>,
) -> Vec<u32> {
    // minute index i <-> minutes-before-departure: pre_dep(i) = span - i.
    let pre_dep = |i: usize| span as i64 - i as i64;

    let lo = (span as i64 - window_start_min_before_dep as i64).max(0) as usize;
    let hi = ((span as i64 - boarding_close_min_before_dep as i64).max(0) as usize).min(span);
    if lo >= hi {
        return vec![0; span];
    }

    let mut density = vec![0.0_f64; span];
    for i in lo..hi {
        let pd = pre_dep(i);
        if let Some(clamp) = late_clamp_min_before_dep {
            if pd < clamp as i64 {
                continue;
            }
        }
        let x = pd as f64;
        let peak = peak_min_before_dep as f64;
        let sigma = if x > peak { left_sigma_min } else { right_sigma_min };
        density[i] = gaussian(x, peak, sigma);
    }
    normalize(&mut density);

    let mut out = vec![0_u32; span];
    distribute(&density, planned, &mut out);
    out
}

fn gaussian(x: f64, mean: f64, sigma: f64) -> f64 {
    let z = (x - mean) / sigma;
    (-0.5 * z * z).exp()
}

fn normalize(density: &mut [f64]) {
    let sum: f64 = density.iter().sum();
    if sum > 0.0 {
        for d in density.iter_mut() {
            *d /= sum;
        }
    }
}

/// Floors `density[i] * planned` into `out[i]`, then hands the remainder to
/// the minutes with the largest fractional parts, ties broken by minute
/// index ascending.
fn distribute(density: &[f64], planned: u32, out: &mut [u32]) {
    let planned = planned as f64;
    let mut fractions: Vec<(usize, f64)> = Vec::with_capacity(density.len());
    let mut assigned = 0_u32;

    for (i, &p) in density.iter().enumerate() {
        let exact = p * planned;
        let floor = exact.floor();
        out[i] = floor as u32;
        assigned += out[i];
        fractions.push((i, exact - floor));
    }

    let remainder = (planned as u32).saturating_sub(assigned);
    fractions.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then(a.0.cmp(&b.0)));
    for &(i, _) in fractions.iter().take(remainder as usize) {
        out[i] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_curve_sums_to_planned() {
        for planned in [0_u32, 1, 7, 50, 999] {
            let curve = build_arrival_curve(&ArrivalCurveConfig::Legacy, 90, planned);
            assert_eq!(curve.len(), 90);
            assert_eq!(curve.iter().sum::<u32>(), planned);
        }
    }

    #[test]
    fn legacy_curve_is_deterministic() {
        let a = build_arrival_curve(&ArrivalCurveConfig::Legacy, 120, 500);
        let b = build_arrival_curve(&ArrivalCurveConfig::Legacy, 120, 500);
        assert_eq!(a, b);
    }

    #[test]
    fn legacy_curve_tail_is_zero() {
        // last 20 minutes before the array end carry no arrivals.
        let curve = build_arrival_curve(&ArrivalCurveConfig::Legacy, 100, 300);
        assert!(curve[80..].iter().all(|&c| c == 0));
    }

    #[test]
    fn edited_curve_sums_to_planned() {
        let cfg = ArrivalCurveConfig::Edited {
            window_start_min_before_dep: 180,
            boarding_close_min_before_dep: 20,
            peak_min_before_dep: 90,
            left_sigma_min: 40.0,
            right_sigma_min: 20.0,
            late_clamp_min_before_dep: None,
        };
        let curve = build_arrival_curve(&cfg, 200, 777);
        assert_eq!(curve.iter().sum::<u32>(), 777);
    }

    #[test]
    fn edited_curve_respects_late_clamp() {
        let cfg = ArrivalCurveConfig::Edited {
            window_start_min_before_dep: 180,
            boarding_close_min_before_dep: 0,
            peak_min_before_dep: 90,
            left_sigma_min: 40.0,
            right_sigma_min: 20.0,
            late_clamp_min_before_dep: Some(30),
        };
        let span = 200_u32;
        let curve = build_arrival_curve(&cfg, span, 500);
        // minutes-before-dep < 30 <=> minute index > span - 30
        let clamp_idx = (span - 30) as usize;
        assert!(curve[clamp_idx..].iter().all(|&c| c == 0));
        assert_eq!(curve.iter().sum::<u32>(), 500);
    }

    #[test]
    fn idempotent_rebuild() {
        let cfg = ArrivalCurveConfig::Legacy;
        let a = build_arrival_curve(&cfg, 60, 42);
        let b = build_arrival_curve(&cfg, 60, 42);
        assert_eq!(a, b);
    }
}
