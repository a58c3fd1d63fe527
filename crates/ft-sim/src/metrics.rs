//! Control loop performance metrics.
//!
//! Computes rise time, overshoot, settling time, steady-state error and the
//! integral error criteria from a finished [`TimeSeries`]. All criteria are
//! measured against the series' fixed setpoint.

use serde::{Deserialize, Serialize};

use crate::series::TimeSeries;

/// Fraction of the initial gap covered for rise time.
const RISE_FRACTION: f64 = 0.9;
/// Settling band as a fraction of `|setpoint|`.
const SETTLING_BAND: f64 = 0.02;
/// Below this the initial temperature counts as already at setpoint.
const AT_SETPOINT_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// First time the response covered 90 % of the initial gap.
    pub rise_time: Option<f64>,
    /// Peak excursion past the setpoint, percent of the initial gap.
    pub overshoot_pct: f64,
    /// Start of the final stay inside ±2 % of the setpoint.
    pub settling_time: Option<f64>,
    /// `|setpoint - final|`
    pub steady_state_error: f64,
    /// Integral of absolute error.
    pub iae: f64,
    /// Integral of squared error.
    pub ise: f64,
    /// Integral of time-weighted absolute error.
    pub itae: f64,
    pub final_value: f64,
    /// Extreme temperature in the direction of approach.
    pub peak_value: f64,
}

/// Compute every metric for `series`. An empty series yields defaults.
pub fn compute_metrics(series: &TimeSeries) -> Metrics {
    let samples = series.samples();
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return Metrics::default();
    };

    let setpoint = series.setpoint();
    let initial = first.temperature;
    let gap = setpoint - initial;
    let at_setpoint = gap.abs() < AT_SETPOINT_EPS;
    // +1 when the response has to rise, -1 when it has to fall
    let direction = if gap < 0.0 { -1.0 } else { 1.0 };

    let rise_time = if at_setpoint {
        Some(first.time)
    } else {
        let target = initial + RISE_FRACTION * gap;
        samples
            .iter()
            .find(|s| (s.temperature - target) * direction >= 0.0)
            .map(|s| s.time)
    };

    let temperatures = series.temperatures();
    let peak_value = if direction > 0.0 {
        temperatures.fold(f64::NEG_INFINITY, f64::max)
    } else {
        temperatures.fold(f64::INFINITY, f64::min)
    };
    let overshoot_pct = if at_setpoint {
        0.0
    } else {
        ((peak_value - setpoint) / gap * 100.0).max(0.0)
    };

    let band = SETTLING_BAND * setpoint.abs();
    let settling_time = match samples
        .iter()
        .rposition(|s| (s.temperature - setpoint).abs() > band)
    {
        None => Some(first.time),
        Some(i) => samples.get(i + 1).map(|s| s.time),
    };

    let mut iae = 0.0;
    let mut ise = 0.0;
    let mut itae = 0.0;
    for pair in samples.windows(2) {
        let width = pair[1].time - pair[0].time;
        let error = setpoint - pair[0].temperature;
        iae += error.abs() * width;
        ise += error * error * width;
        itae += pair[0].time * error.abs() * width;
    }

    Metrics {
        rise_time,
        overshoot_pct,
        settling_time,
        steady_state_error: (setpoint - last.temperature).abs(),
        iae,
        ise,
        itae,
        final_value: last.temperature,
        peak_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(setpoint: f64, temps: &[f64]) -> TimeSeries {
        let triples: Vec<(f64, f64, f64)> = temps
            .iter()
            .enumerate()
            .map(|(i, &t)| (i as f64, t, 0.0))
            .collect();
        TimeSeries::from_triples(setpoint, &triples)
    }

    #[test]
    fn monotone_rise_to_setpoint() {
        let m = compute_metrics(&series(22.0, &[20.0, 21.0, 21.9, 22.0, 22.0]));
        assert_eq!(m.rise_time, Some(2.0));
        assert_eq!(m.overshoot_pct, 0.0);
        assert_eq!(m.settling_time, Some(2.0));
        assert_eq!(m.steady_state_error, 0.0);
        assert!((m.iae - 3.1).abs() < 1e-12);
        assert!((m.ise - 5.01).abs() < 1e-12);
        assert!((m.itae - 1.2).abs() < 1e-12);
        assert_eq!(m.final_value, 22.0);
    }

    #[test]
    fn overshoot_on_the_way_up() {
        let m = compute_metrics(&series(22.0, &[20.0, 22.5, 22.0]));
        assert!((m.overshoot_pct - 25.0).abs() < 1e-9);
        assert_eq!(m.peak_value, 22.5);
        assert_eq!(m.rise_time, Some(1.0));
    }

    #[test]
    fn cooling_direction_is_mirrored() {
        let m = compute_metrics(&series(22.0, &[25.0, 23.0, 21.5, 22.0]));
        assert_eq!(m.rise_time, Some(2.0));
        assert_eq!(m.peak_value, 21.5);
        assert!((m.overshoot_pct - 50.0 / 3.0).abs() < 1e-9);
        assert_eq!(m.settling_time, Some(3.0));
    }

    #[test]
    fn never_reaching_target() {
        let m = compute_metrics(&series(22.0, &[20.0, 20.5, 21.0]));
        assert_eq!(m.rise_time, None);
        assert_eq!(m.settling_time, None);
        assert!((m.steady_state_error - 1.0).abs() < 1e-12);
    }

    #[test]
    fn starting_at_setpoint() {
        let m = compute_metrics(&series(22.0, &[22.0, 22.1, 22.0]));
        assert_eq!(m.rise_time, Some(0.0));
        assert_eq!(m.overshoot_pct, 0.0);
        assert_eq!(m.settling_time, Some(0.0));
    }

    #[test]
    fn uneven_steps_use_their_own_width() {
        let s = TimeSeries::from_triples(
            10.0,
            &[(0.0, 8.0, 0.0), (0.5, 9.0, 0.0), (2.0, 10.0, 0.0)],
        );
        let m = compute_metrics(&s);
        // 2 * 0.5 + 1 * 1.5
        assert!((m.iae - 2.5).abs() < 1e-12);
    }

    #[test]
    fn empty_series_defaults() {
        assert_eq!(compute_metrics(&TimeSeries::new(22.0)), Metrics::default());
    }
}
