//! Recorded closed-loop trajectories.

use serde::{Deserialize, Serialize};

/// One simulation step as seen by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub temperature: f64,
    pub control_signal: f64,
}

/// Ordered samples of one run plus the setpoint they were tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    setpoint: f64,
    samples: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(setpoint: f64) -> Self {
        Self::with_capacity(setpoint, 0)
    }

    pub fn with_capacity(setpoint: f64, capacity: usize) -> Self {
        Self {
            setpoint,
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Build a series from `(time, temperature, control_signal)` triples.
    pub fn from_triples(setpoint: f64, triples: &[(f64, f64, f64)]) -> Self {
        let mut series = Self::with_capacity(setpoint, triples.len());
        for &(time, temperature, control_signal) in triples {
            series.push(Sample {
                time,
                temperature,
                control_signal,
            });
        }
        series
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.time)
    }

    pub fn temperatures(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.temperature)
    }

    pub fn control_signals(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.control_signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_follow_push_order() {
        let series = TimeSeries::from_triples(22.0, &[(0.0, 20.0, 5.0), (0.5, 20.4, 3.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.setpoint(), 22.0);
        assert_eq!(series.times().collect::<Vec<_>>(), vec![0.0, 0.5]);
        assert_eq!(series.temperatures().collect::<Vec<_>>(), vec![20.0, 20.4]);
        assert_eq!(series.control_signals().collect::<Vec<_>>(), vec![5.0, 3.0]);
        assert_eq!(series.last().map(|s| s.time), Some(0.5));
        assert!(TimeSeries::new(22.0).is_empty());
    }
}
