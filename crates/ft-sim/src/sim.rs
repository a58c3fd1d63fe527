//! Closed-loop simulation runner.

use ft_controls::{ControlInput, Controller};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::disturbance::{Disturbance, DisturbanceSchedule};
use crate::error::{SimError, SimResult};
use crate::plant::ThermalPlant;
use crate::series::{Sample, TimeSeries};

/// Options for one closed-loop run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimOptions {
    /// Temperature the controller tracks.
    pub setpoint: f64,
    /// Simulated time span (seconds).
    pub duration: f64,
    /// Fixed step (seconds).
    pub dt: f64,
    #[serde(default)]
    pub disturbances: Vec<Disturbance>,
}

impl SimOptions {
    pub fn new(setpoint: f64, duration: f64, dt: f64) -> Self {
        Self {
            setpoint,
            duration,
            dt,
            disturbances: Vec::new(),
        }
    }

    pub fn with_disturbances(mut self, disturbances: Vec<Disturbance>) -> Self {
        self.disturbances = disturbances;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        ft_core::ensure_finite_param(self.setpoint, "setpoint")?;
        ft_core::ensure_positive(self.duration, "duration")?;
        ft_core::ensure_positive(self.dt, "dt")?;
        if self.dt > self.duration {
            return Err(SimError::InvalidParameter {
                param: "dt",
                constraint: "must not exceed duration",
                value: self.dt,
            });
        }
        for disturbance in &self.disturbances {
            disturbance.validate()?;
        }
        Ok(())
    }

    /// Number of plant advances; the run records one more sample than this.
    /// The last sample never lies past `duration`.
    pub fn steps(&self) -> usize {
        (self.duration / self.dt + 1e-9).floor() as usize
    }
}

/// Run `controller` against `plant` for `opts.duration`.
///
/// At step `k` (time `k * dt`): due disturbances are applied, the controller
/// is queried, the sample is recorded, then the plant advances. The last
/// sample is not followed by an advance, so a run yields `steps() + 1`
/// samples and leaves `plant` at the final recorded temperature.
///
/// Options and the step size are checked against the plant up front, so a
/// run that starts does not diverge.
pub fn run_closed_loop(
    controller: &mut dyn Controller,
    plant: &mut ThermalPlant,
    opts: &SimOptions,
) -> SimResult<TimeSeries> {
    opts.validate()?;
    plant.config().check_step(opts.dt)?;

    let steps = opts.steps();
    let label = controller.kind().label();
    let mut schedule = DisturbanceSchedule::new(opts.disturbances.clone())?;
    let mut series = TimeSeries::with_capacity(opts.setpoint, steps + 1);

    info!(
        controller = %label,
        steps,
        dt = opts.dt,
        setpoint = opts.setpoint,
        disturbances = schedule.len(),
        "starting closed-loop run"
    );

    for k in 0..=steps {
        let t = k as f64 * opts.dt;

        for disturbance in schedule.due(t) {
            disturbance.apply(plant)?;
            debug!(
                t,
                kind = ?disturbance.kind,
                ambient = plant.ambient(),
                "disturbance applied"
            );
        }

        let measurement = plant.temperature();
        let power = controller.control_signal(&ControlInput {
            time: t,
            setpoint: opts.setpoint,
            measurement,
            dt: opts.dt,
        })?;

        series.push(Sample {
            time: t,
            temperature: measurement,
            control_signal: power,
        });

        if k < steps {
            plant.advance(power, opts.dt)?;
        }
    }

    info!(
        controller = %label,
        final_temperature = plant.temperature(),
        samples = series.len(),
        "closed-loop run finished"
    );

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integrator::IntegratorType;
    use crate::plant::PlantConfig;
    use ft_controls::{ControlResult, ControllerKind};

    /// Always outputs the same power.
    struct Constant(f64);

    impl Controller for Constant {
        fn kind(&self) -> ControllerKind {
            ControllerKind::Pid
        }

        fn control_signal(&mut self, _input: &ControlInput) -> ControlResult<f64> {
            Ok(self.0)
        }
    }

    fn plant() -> ThermalPlant {
        ThermalPlant::new(PlantConfig {
            initial_temperature: 20.0,
            ambient_temperature: 30.0,
            time_constant: 5.0,
            gain: -0.08,
            integrator: IntegratorType::ForwardEuler,
        })
        .unwrap()
    }

    #[test]
    fn sample_count_and_times() {
        let series =
            run_closed_loop(&mut Constant(0.0), &mut plant(), &SimOptions::new(22.0, 10.0, 0.5))
                .unwrap();
        assert_eq!(series.len(), 21);
        assert_eq!(series.first().map(|s| s.time), Some(0.0));
        assert_eq!(series.last().map(|s| s.time), Some(10.0));
        assert_eq!(series.first().map(|s| s.temperature), Some(20.0));
    }

    #[test]
    fn run_never_passes_duration() {
        let series =
            run_closed_loop(&mut Constant(0.0), &mut plant(), &SimOptions::new(22.0, 1.0, 0.4))
                .unwrap();
        assert_eq!(series.len(), 3);
        let last = series.last().map(|s| s.time).unwrap();
        assert!((last - 0.8).abs() < 1e-12);
        assert!(last <= 1.0);

        // 0.3 / 0.1 is just below 3 in floating point
        assert_eq!(SimOptions::new(22.0, 0.3, 0.1).steps(), 3);
    }

    #[test]
    fn unstable_step_rejected_before_running() {
        let opts = SimOptions::new(22.0, 30000.0, 15.0);
        assert!(opts.validate().is_ok());
        let mut p = plant();
        let err = run_closed_loop(&mut Constant(0.0), &mut p, &opts).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { param: "dt", .. }));
        assert_eq!(p.temperature(), 20.0);
    }

    #[test]
    fn sample_temperature_precedes_advance() {
        let mut p = plant();
        let series =
            run_closed_loop(&mut Constant(50.0), &mut p, &SimOptions::new(22.0, 1.0, 0.5)).unwrap();
        // 20 -> 19 -> 18.1 under 50 % cooling
        let temps: Vec<f64> = series.temperatures().collect();
        assert!((temps[1] - 19.0).abs() < 1e-12);
        assert!((temps[2] - 18.1).abs() < 1e-12);
        assert_eq!(p.temperature(), temps[2]);
    }

    #[test]
    fn rejects_invalid_options() {
        let cases = [
            SimOptions::new(22.0, 0.0, 0.5),
            SimOptions::new(22.0, 10.0, 0.0),
            SimOptions::new(22.0, 10.0, -0.5),
            SimOptions::new(22.0, 1.0, 2.0),
            SimOptions::new(f64::NAN, 10.0, 0.5),
            SimOptions::new(22.0, 10.0, 0.5)
                .with_disturbances(vec![Disturbance::offset_ambient(-1.0, 2.0)]),
        ];
        for opts in cases {
            let mut p = plant();
            assert!(run_closed_loop(&mut Constant(0.0), &mut p, &opts).is_err());
            // Nothing ran
            assert_eq!(p.temperature(), 20.0);
        }
    }
}
