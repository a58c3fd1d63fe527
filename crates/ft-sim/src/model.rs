//! Continuous-time plant dynamics seen by the integrators.

use crate::error::SimResult;

/// Something whose state evolves as `dx/dt = f(t, x)`.
///
/// Inputs that stay fixed over a step (heater power, ambient) live on the
/// model; the integrator only passes time and state.
pub trait TransientModel {
    type State: Clone;

    /// Rate of change of `x` at time `t`.
    fn derivative(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// `x + h * slope`, the only state arithmetic a fixed-step method needs.
    fn project(&self, x: &Self::State, slope: &Self::State, h: f64) -> Self::State;
}
