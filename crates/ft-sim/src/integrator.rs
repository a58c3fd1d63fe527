//! Fixed-step time integrators.

use serde::{Deserialize, Serialize};

use crate::error::SimResult;
use crate::model::TransientModel;

/// Fixed-step scheme for a [`TransientModel`].
pub trait Integrator {
    /// State after `dt` starting from `x` at `t`.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// `T += dt * dT/dt`; one derivative evaluation per step.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let slope = model.derivative(t, x)?;
        Ok(model.project(x, &slope, dt))
    }
}

/// Four-stage Runge-Kutta with the classical 1/6, 1/3, 1/3, 1/6 weights.
#[derive(Clone, Copy, Debug, Default)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let mid = t + 0.5 * dt;
        let start = model.derivative(t, x)?;
        let trial_a = model.project(x, &start, 0.5 * dt);
        let mid_a = model.derivative(mid, &trial_a)?;
        let trial_b = model.project(x, &mid_a, 0.5 * dt);
        let mid_b = model.derivative(mid, &trial_b)?;
        let trial_end = model.project(x, &mid_b, dt);
        let end = model.derivative(t + dt, &trial_end)?;

        let mut next = model.project(x, &start, dt / 6.0);
        next = model.project(&next, &mid_a, dt / 3.0);
        next = model.project(&next, &mid_b, dt / 3.0);
        Ok(model.project(&next, &end, dt / 6.0))
    }
}

/// Integrator selection for a plant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// First order, matches the reference discretisation `T += dt * dT/dt`.
    #[default]
    ForwardEuler,
    RK4,
}

impl IntegratorType {
    pub fn step<M: TransientModel>(
        self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        match self {
            IntegratorType::ForwardEuler => ForwardEuler.step(model, t, x, dt),
            IntegratorType::RK4 => RK4.step(model, t, x, dt),
        }
    }

    /// Largest `dt / tau` for which a first-order lag still decays.
    pub fn stable_step_ratio(self) -> f64 {
        match self {
            IntegratorType::ForwardEuler => 2.0,
            // Real-axis edge of the RK4 stability region
            IntegratorType::RK4 => 2.785,
        }
    }
}
