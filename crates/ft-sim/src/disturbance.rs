//! Scheduled disturbances.
//!
//! A disturbance fires at the first simulation step whose time has reached
//! `at`. It is applied before the controller is queried, so ambient changes
//! show up in the temperature of the following sample.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::plant::ThermalPlant;

/// Slack on `at <= t` for step times accumulated as `k * dt`.
const TIME_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisturbanceKind {
    /// Ambient temperature becomes `value`.
    SetAmbient { value: f64 },
    /// Ambient temperature shifts by `delta`.
    OffsetAmbient { delta: f64 },
    /// Room temperature jumps by `delta`.
    OffsetTemperature { delta: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disturbance {
    pub at: f64,
    #[serde(flatten)]
    pub kind: DisturbanceKind,
}

impl Disturbance {
    pub fn new(at: f64, kind: DisturbanceKind) -> Self {
        Self { at, kind }
    }

    pub fn offset_ambient(at: f64, delta: f64) -> Self {
        Self::new(at, DisturbanceKind::OffsetAmbient { delta })
    }

    pub fn validate(&self) -> SimResult<()> {
        if !(self.at.is_finite() && self.at >= 0.0) {
            return Err(SimError::InvalidParameter {
                param: "disturbance time",
                constraint: "must be finite and >= 0",
                value: self.at,
            });
        }
        let value = match self.kind {
            DisturbanceKind::SetAmbient { value } => value,
            DisturbanceKind::OffsetAmbient { delta }
            | DisturbanceKind::OffsetTemperature { delta } => delta,
        };
        if !value.is_finite() {
            return Err(SimError::InvalidParameter {
                param: "disturbance value",
                constraint: "must be finite",
                value,
            });
        }
        Ok(())
    }

    pub fn apply(&self, plant: &mut ThermalPlant) -> SimResult<()> {
        match self.kind {
            DisturbanceKind::SetAmbient { value } => plant.set_ambient(value),
            DisturbanceKind::OffsetAmbient { delta } => plant.offset_ambient(delta),
            DisturbanceKind::OffsetTemperature { delta } => plant.offset_temperature(delta),
        }
    }
}

/// Disturbances in firing order, each handed out exactly once.
#[derive(Debug, Clone, Default)]
pub struct DisturbanceSchedule {
    events: Vec<Disturbance>,
    next: usize,
}

impl DisturbanceSchedule {
    pub fn new(mut events: Vec<Disturbance>) -> SimResult<Self> {
        for event in &events {
            event.validate()?;
        }
        // Stable: same-time events keep their authored order
        events.sort_by(|a, b| a.at.total_cmp(&b.at));
        Ok(Self { events, next: 0 })
    }

    /// Events with `at <= t` not handed out before.
    pub fn due(&mut self, t: f64) -> &[Disturbance] {
        let start = self.next;
        while self
            .events
            .get(self.next)
            .is_some_and(|event| event.at <= t + TIME_EPS)
        {
            self.next += 1;
        }
        &self.events[start..self.next]
    }

    /// Events not yet handed out.
    pub fn pending(&self) -> usize {
        self.events.len() - self.next
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
