//! The control capability shared by every controller.

use serde::{Deserialize, Serialize};

use crate::defuzz::Defuzzification;
use crate::error::ControlResult;

/// Lower bound of the control signal (percent power).
pub const POWER_MIN: f64 = 0.0;
/// Upper bound of the control signal (percent power).
pub const POWER_MAX: f64 = 100.0;

/// Plant state and timing presented to a controller at one simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInput {
    /// Simulated time of the step.
    pub time: f64,
    /// Desired temperature.
    pub setpoint: f64,
    /// Measured plant temperature.
    pub measurement: f64,
    /// Step size.
    pub dt: f64,
}

impl ControlInput {
    /// Control error, `setpoint - measurement`.
    pub fn error(&self) -> f64 {
        self.setpoint - self.measurement
    }
}

/// Which control law produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "method", rename_all = "snake_case")]
pub enum ControllerKind {
    Pid,
    Fuzzy(Defuzzification),
}

impl ControllerKind {
    /// Human readable label used in reports.
    pub fn label(&self) -> String {
        match self {
            ControllerKind::Pid => "PID".to_string(),
            ControllerKind::Fuzzy(method) => format!("Fuzzy ({})", method.name()),
        }
    }
}

/// Something that turns the current plant state into a control signal.
pub trait Controller {
    /// Control law identity.
    fn kind(&self) -> ControllerKind;

    /// Compute the control signal for this step.
    ///
    /// Stateful controllers advance their internal state here.
    fn control_signal(&mut self, input: &ControlInput) -> ControlResult<f64>;

    /// Return to the freshly constructed state. Stateless controllers ignore this.
    fn reset(&mut self) {}
}
