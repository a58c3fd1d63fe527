//! Controllers for fuzzytherm.
//!
//! This crate provides the two control laws compared by the simulator: a
//! classical PID controller and a Mamdani fuzzy controller. Both implement the
//! [`Controller`] capability so the simulation loop never depends on a
//! concrete controller type.
//!
//! # Architecture
//!
//! - Signals are scalar `f64` values; the control signal is a heating or
//!   cooling power in percent, `[0, 100]`
//! - The PID controller owns its integrator state and is mutated by `step`
//! - The fuzzy controller is a pure function of `(temperature, error)` and an
//!   immutable, shareable [`FuzzySystem`]
//!
//! # Fuzzy pipeline
//!
//! fuzzification ([`LinguisticVariable`]) → rule evaluation ([`RuleBase`],
//! min conjunction, max aggregation) → defuzzification ([`Defuzzification`]).

pub mod controller;
pub mod defuzz;
pub mod error;
pub mod fuzzy;
pub mod hvac;
pub mod membership;
pub mod pid;
pub mod rules;
pub mod variable;

pub use controller::{ControlInput, Controller, ControllerKind, POWER_MAX, POWER_MIN};
pub use defuzz::{Defuzzification, Implication, discretize};
pub use error::{ControlError, ControlResult};
pub use fuzzy::{ControlSurface, FuzzyController, FuzzySystem, FuzzySystemConfig, Inference};
pub use membership::{FuzzySet, MembershipFunction};
pub use pid::{ControlAction, PidConfig, PidController, PidState};
pub use rules::{FuzzyRule, RuleBase};
pub use variable::LinguisticVariable;
