//! First-order thermal plant.
//!
//! ```text
//! dT/dt = -(T - T_ambient) / tau + gain * power
//! ```
//!
//! A positive `gain` heats the room, a negative one cools it. Power is held
//! constant over each step.

use ft_core::{ensure_finite_param, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::integrator::IntegratorType;
use crate::model::TransientModel;

/// Construction parameters for a [`ThermalPlant`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    pub initial_temperature: f64,
    pub ambient_temperature: f64,
    /// Thermal time constant `tau`, > 0.
    pub time_constant: f64,
    /// Temperature rate per unit of power.
    pub gain: f64,
    #[serde(default)]
    pub integrator: IntegratorType,
}

impl PlantConfig {
    pub fn validate(&self) -> SimResult<()> {
        ensure_finite_param(self.initial_temperature, "initial_temperature")?;
        ensure_finite_param(self.ambient_temperature, "ambient_temperature")?;
        ensure_positive(self.time_constant, "time_constant")?;
        ensure_finite_param(self.gain, "gain")?;
        Ok(())
    }

    /// Reject a step the integrator would amplify instead of damp.
    pub fn check_step(&self, dt: f64) -> SimResult<()> {
        ensure_positive(dt, "dt")?;
        if dt >= self.integrator.stable_step_ratio() * self.time_constant {
            return Err(SimError::InvalidParameter {
                param: "dt",
                constraint: match self.integrator {
                    IntegratorType::ForwardEuler => {
                        "must be < 2 * time_constant for forward Euler"
                    }
                    IntegratorType::RK4 => "must be < 2.785 * time_constant for RK4",
                },
                value: dt,
            });
        }
        Ok(())
    }
}

/// Snapshot of the plant's mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantState {
    pub temperature: f64,
    pub ambient: f64,
}

#[derive(Debug, Clone)]
pub struct ThermalPlant {
    config: PlantConfig,
    state: PlantState,
    /// Input held over the step being integrated.
    power: f64,
}

impl ThermalPlant {
    pub fn new(config: PlantConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: PlantState {
                temperature: config.initial_temperature,
                ambient: config.ambient_temperature,
            },
            power: 0.0,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.state.temperature
    }

    pub fn ambient(&self) -> f64 {
        self.state.ambient
    }

    pub fn state(&self) -> PlantState {
        self.state
    }

    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    /// Advance by `dt` with `power` applied, returning the new temperature.
    pub fn advance(&mut self, power: f64, dt: f64) -> SimResult<f64> {
        ensure_positive(dt, "dt")?;
        ensure_finite_param(power, "power")?;
        self.power = power;
        let x = self.state.temperature;
        let next = self.config.integrator.step(self, 0.0, &x, dt)?;
        if !next.is_finite() {
            return Err(SimError::InvalidArg {
                what: "plant temperature diverged",
            });
        }
        self.state.temperature = next;
        Ok(next)
    }

    /// Ambient temperature used from the next advance on.
    pub fn set_ambient(&mut self, value: f64) -> SimResult<()> {
        self.state.ambient = ensure_finite_param(value, "ambient_temperature")?;
        Ok(())
    }

    pub fn offset_ambient(&mut self, delta: f64) -> SimResult<()> {
        self.set_ambient(self.state.ambient + delta)
    }

    /// Step change of the room temperature itself.
    pub fn offset_temperature(&mut self, delta: f64) -> SimResult<()> {
        self.state.temperature =
            ensure_finite_param(self.state.temperature + delta, "temperature")?;
        Ok(())
    }

    /// Back to the configured initial conditions.
    pub fn reset(&mut self) {
        self.state = PlantState {
            temperature: self.config.initial_temperature,
            ambient: self.config.ambient_temperature,
        };
        self.power = 0.0;
    }
}

impl TransientModel for ThermalPlant {
    type State = f64;

    fn derivative(&mut self, _t: f64, temperature: &f64) -> SimResult<f64> {
        let loss = (temperature - self.state.ambient) / self.config.time_constant;
        Ok(self.config.gain * self.power - loss)
    }

    fn project(&self, temperature: &f64, slope: &f64, h: f64) -> f64 {
        temperature + h * slope
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unpowered_plant_decays_monotonically(
            initial in -20.0_f64..60.0,
            ambient in -20.0_f64..60.0,
            tau in 1.0_f64..20.0,
            dt in 0.01_f64..0.9,
        ) {
            let mut plant = ThermalPlant::new(PlantConfig {
                initial_temperature: initial,
                ambient_temperature: ambient,
                time_constant: tau,
                gain: -0.08,
                integrator: IntegratorType::ForwardEuler,
            })
            .unwrap();
            let mut gap = initial - ambient;
            for _ in 0..50 {
                let next = plant.advance(0.0, dt).unwrap() - ambient;
                prop_assert!(next.abs() <= gap.abs() + 1e-12);
                prop_assert!(next * gap >= 0.0);
                gap = next;
            }
        }
    }
}
