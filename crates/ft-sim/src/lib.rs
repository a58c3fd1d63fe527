//! Closed-loop thermal simulation for fuzzytherm.
//!
//! Provides:
//! - First-order thermal plant behind the [`TransientModel`] abstraction
//! - Fixed-step forward Euler and RK4 integrators
//! - Disturbance schedules applied between steps
//! - The closed-loop runner producing a [`TimeSeries`]
//! - Control performance metrics computed from a finished series

pub mod disturbance;
pub mod error;
pub mod integrator;
pub mod metrics;
pub mod model;
pub mod plant;
pub mod series;
pub mod sim;

pub use disturbance::{Disturbance, DisturbanceKind, DisturbanceSchedule};
pub use error::{SimError, SimResult};
pub use integrator::{ForwardEuler, Integrator, IntegratorType, RK4};
pub use metrics::{Metrics, compute_metrics};
pub use model::TransientModel;
pub use plant::{PlantConfig, PlantState, ThermalPlant};
pub use series::{Sample, TimeSeries};
pub use sim::{SimOptions, run_closed_loop};
