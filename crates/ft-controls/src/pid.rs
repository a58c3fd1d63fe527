//! PID controller with integral-clamping anti-windup.
//!
//! The configuration ([`PidConfig`]) is a pure update law over an explicit
//! [`PidState`]; [`PidController`] owns one state instance and is what the
//! simulation loop drives.
//!
//! Anti-windup ordering per step:
//! 1. compute the would-be integral `integral + error * dt`
//! 2. compute the unclamped output with that integral
//! 3. clamp the output to the limits
//! 4. commit the new integral only if no clamping occurred

use ft_core::{ensure_finite, ensure_finite_param, ensure_non_negative, ensure_positive};
use serde::{Deserialize, Serialize};

use crate::controller::{ControlInput, Controller, ControllerKind, POWER_MAX, POWER_MIN};
use crate::error::{ControlError, ControlResult};

/// Sign convention between error and actuator effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    /// Positive error (measurement below setpoint) increases output. Heating.
    #[default]
    Direct,
    /// Positive error decreases output. Cooling.
    Reverse,
}

impl ControlAction {
    pub fn sign(self) -> f64 {
        match self {
            ControlAction::Direct => 1.0,
            ControlAction::Reverse => -1.0,
        }
    }
}

/// PID controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidConfig {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Minimum output value.
    pub out_min: f64,
    /// Maximum output value.
    pub out_max: f64,
    /// Direct (heating) or reverse (cooling) action.
    pub action: ControlAction,
}

impl PidConfig {
    /// Create a new PID configuration.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ki` - Integral gain
    /// * `kd` - Derivative gain
    /// * `out_min` - Minimum output
    /// * `out_max` - Maximum output
    pub fn new(kp: f64, ki: f64, kd: f64, out_min: f64, out_max: f64) -> ControlResult<Self> {
        ensure_non_negative(kp, "kp")?;
        ensure_non_negative(ki, "ki")?;
        ensure_non_negative(kd, "kd")?;
        ensure_finite_param(out_min, "out_min")?;
        ensure_finite_param(out_max, "out_max")?;
        if out_min >= out_max {
            return Err(ControlError::InvalidParameter {
                param: "out_min",
                constraint: "must be less than out_max",
                value: out_min,
            });
        }
        Ok(Self {
            kp,
            ki,
            kd,
            out_min,
            out_max,
            action: ControlAction::Direct,
        })
    }

    /// Gains with the standard `[0, 100]` power limits.
    pub fn with_power_limits(kp: f64, ki: f64, kd: f64) -> ControlResult<Self> {
        Self::new(kp, ki, kd, POWER_MIN, POWER_MAX)
    }

    /// Set the control action.
    pub fn with_action(mut self, action: ControlAction) -> Self {
        self.action = action;
        self
    }

    /// Compute controller output given setpoint, measurement and step size.
    ///
    /// # Returns
    ///
    /// Updated state and output value. `dt` must be finite and positive.
    pub fn update(
        &self,
        state: &PidState,
        setpoint: f64,
        measurement: f64,
        dt: f64,
    ) -> ControlResult<(PidState, f64)> {
        ensure_positive(dt, "dt")?;
        ensure_finite(setpoint, "setpoint")?;
        ensure_finite(measurement, "measurement")?;

        // Error: e = sp - pv (positive error means PV is below setpoint)
        let error = setpoint - measurement;

        let p_term = self.kp * error;

        let candidate_integral = state.integral + error * dt;
        let i_term = self.ki * candidate_integral;

        // Zero derivative on the first call after construction or reset
        let derivative = match state.previous_error {
            Some(previous) => (error - previous) / dt,
            None => 0.0,
        };
        let d_term = self.kd * derivative;

        let output_raw = self.action.sign() * (p_term + i_term + d_term);
        let output = output_raw.clamp(self.out_min, self.out_max);

        // Anti-windup: saturated steps do not commit their integral contribution
        let integral = if output == output_raw {
            candidate_integral
        } else {
            state.integral
        };

        let new_state = PidState {
            integral,
            previous_error: Some(error),
            previous_time: Some(state.previous_time.unwrap_or(0.0) + dt),
        };

        Ok((new_state, output))
    }
}

/// PID controller state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PidState {
    /// Committed integral accumulator.
    pub integral: f64,
    /// Error seen on the previous step, if any.
    pub previous_error: Option<f64>,
    /// Time of the previous step, measured from the last reset.
    pub previous_time: Option<f64>,
}

/// A PID configuration together with the state it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct PidController {
    config: PidConfig,
    state: PidState,
}

impl PidController {
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            state: PidState::default(),
        }
    }

    /// Advance one step and return the clamped output.
    pub fn step(&mut self, setpoint: f64, measurement: f64, dt: f64) -> ControlResult<f64> {
        let (state, output) = self.config.update(&self.state, setpoint, measurement, dt)?;
        self.state = state;
        Ok(output)
    }

    /// Clear integral and derivative history.
    pub fn reset(&mut self) {
        self.state = PidState::default();
    }

    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    pub fn state(&self) -> &PidState {
        &self.state
    }
}

impl Controller for PidController {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Pid
    }

    fn control_signal(&mut self, input: &ControlInput) -> ControlResult<f64> {
        self.step(input.setpoint, input.measurement, input.dt)
    }

    fn reset(&mut self) {
        PidController::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_config_creation() {
        let pid = PidConfig::with_power_limits(8.0, 0.3, 2.0).unwrap();
        assert_eq!(pid.kp, 8.0);
        assert_eq!(pid.out_max, 100.0);
        assert_eq!(pid.action, ControlAction::Direct);
    }

    #[test]
    fn invalid_pid_params() {
        assert!(PidConfig::with_power_limits(-1.0, 0.3, 2.0).is_err());
        assert!(PidConfig::with_power_limits(1.0, f64::NAN, 2.0).is_err());
        assert!(PidConfig::with_power_limits(1.0, 0.3, -2.0).is_err());
        assert!(PidConfig::new(1.0, 0.3, 2.0, 100.0, 0.0).is_err());
        assert!(PidConfig::new(1.0, 0.3, 2.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn proportional_only() {
        let mut pid = PidController::new(PidConfig::with_power_limits(2.0, 0.0, 0.0).unwrap());
        let out = pid.step(22.0, 20.0, 0.5).unwrap();
        assert!((out - 4.0).abs() < 1e-12);
    }

    #[test]
    fn first_step_has_zero_derivative() {
        let mut pid = PidController::new(PidConfig::with_power_limits(0.0, 0.0, 5.0).unwrap());
        let out = pid.step(22.0, 20.0, 0.5).unwrap();
        assert_eq!(out, 0.0);
        // Error drops from 2.0 to 1.0 → derivative -2.0 → clamped to 0
        let out = pid.step(22.0, 21.0, 0.5).unwrap();
        assert_eq!(out, 0.0);
        // Error rises from 1.0 to 3.0 → derivative 4.0 → 20.0
        let out = pid.step(22.0, 19.0, 0.5).unwrap();
        assert!((out - 20.0).abs() < 1e-12);
    }

    #[test]
    fn integral_accumulates_when_unsaturated() {
        let mut pid = PidController::new(PidConfig::with_power_limits(0.0, 1.0, 0.0).unwrap());
        for _ in 0..4 {
            pid.step(1.0, 0.0, 0.5).unwrap();
        }
        assert!((pid.state().integral - 2.0).abs() < 1e-12);
    }

    #[test]
    fn saturated_step_rolls_back_integral() {
        let mut pid = PidController::new(PidConfig::with_power_limits(1.0, 1.0, 0.0).unwrap());
        // e = 10: outputs 20, 30, ..., 100 are in range; the 10th step would be 110
        for _ in 0..9 {
            pid.step(10.0, 0.0, 1.0).unwrap();
        }
        assert!((pid.state().integral - 90.0).abs() < 1e-9);
        let out = pid.step(10.0, 0.0, 1.0).unwrap();
        assert_eq!(out, 100.0);
        assert!((pid.state().integral - 90.0).abs() < 1e-9);
    }

    #[test]
    fn previous_error_updates_even_when_clamped() {
        let mut pid = PidController::new(PidConfig::with_power_limits(100.0, 0.0, 0.0).unwrap());
        let out = pid.step(50.0, 0.0, 0.5).unwrap();
        assert_eq!(out, 100.0);
        assert_eq!(pid.state().previous_error, Some(50.0));
        assert_eq!(pid.state().previous_time, Some(0.5));
    }

    #[test]
    fn reverse_action_cools_above_setpoint() {
        let config = PidConfig::with_power_limits(8.0, 0.3, 2.0)
            .unwrap()
            .with_action(ControlAction::Reverse);
        let mut pid = PidController::new(config);
        // Measurement below setpoint: a cooling controller stays off
        assert_eq!(pid.step(22.0, 20.0, 0.5).unwrap(), 0.0);
        assert_eq!(pid.state().integral, 0.0);
        pid.reset();
        // Measurement above setpoint: output rises
        let out = pid.step(22.0, 23.0, 0.5).unwrap();
        assert!(out > 0.0);
    }

    #[test]
    fn invalid_dt_is_rejected() {
        let mut pid = PidController::new(PidConfig::with_power_limits(1.0, 1.0, 1.0).unwrap());
        let err = pid.step(22.0, 20.0, 0.0).unwrap_err();
        assert!(matches!(err, ControlError::InvalidParameter { param: "dt", .. }));
        assert!(pid.step(22.0, 20.0, -0.5).is_err());
        // Failed steps leave the state untouched
        assert_eq!(pid.state(), &PidState::default());
    }

    #[test]
    fn reset_clears_state() {
        let mut pid = PidController::new(PidConfig::with_power_limits(1.0, 1.0, 1.0).unwrap());
        pid.step(22.0, 20.0, 0.5).unwrap();
        pid.reset();
        assert_eq!(pid.state(), &PidState::default());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn committed_integral_never_exceeds_saturation_bound(
            error in 1.0_f64..50.0,
            kp in 0.0_f64..5.0,
            ki in 0.05_f64..2.0,
            dt in 0.01_f64..2.0,
            steps in 1usize..2000,
        ) {
            let mut pid = PidController::new(PidConfig::with_power_limits(kp, ki, 0.0).unwrap());
            for _ in 0..steps {
                let out = pid.step(error, 0.0, dt).unwrap();
                prop_assert!((0.0..=100.0).contains(&out));
            }
            // Headroom left by the proportional term; zero when P alone saturates
            let headroom = (100.0 - kp * error).max(0.0);
            prop_assert!(ki * pid.state().integral <= headroom + 1e-9);
        }
    }
}
