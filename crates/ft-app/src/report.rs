//! Side-by-side metric comparison of several runs.

use std::fmt;

use ft_core::{Tolerances, nearly_equal};
use ft_sim::Metrics;
use serde::{Deserialize, Serialize};

/// One metric across all compared runs. Lower is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub metric: String,
    /// Per run, in column order. `None` means not reached.
    pub values: Vec<Option<f64>>,
    /// Column index of the unique best value.
    pub winner: Option<usize>,
}

impl MetricRow {
    fn new(metric: &str, values: Vec<Option<f64>>) -> Self {
        let winner = best_index(&values);
        Self {
            metric: metric.to_string(),
            values,
            winner,
        }
    }
}

/// Index of the strictly smallest present value; ties and all-missing rows
/// have no winner.
fn best_index(values: &[Option<f64>]) -> Option<usize> {
    let (best, min) = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;
    let tol = Tolerances::default();
    let tied = values
        .iter()
        .enumerate()
        .any(|(i, v)| i != best && v.is_some_and(|v| nearly_equal(v, min, tol)));
    if tied { None } else { Some(best) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    /// Column headers, one per run.
    pub labels: Vec<String>,
    pub rows: Vec<MetricRow>,
}

impl ComparisonTable {
    pub fn new(labels: Vec<String>, metrics: &[Metrics]) -> Self {
        let column = |f: fn(&Metrics) -> Option<f64>| metrics.iter().map(f).collect::<Vec<_>>();
        let rows = vec![
            MetricRow::new("Rise time (s)", column(|m| m.rise_time)),
            MetricRow::new("Overshoot (%)", column(|m| Some(m.overshoot_pct))),
            MetricRow::new("Settling time (s)", column(|m| m.settling_time)),
            MetricRow::new("Steady-state error", column(|m| Some(m.steady_state_error))),
            MetricRow::new("IAE", column(|m| Some(m.iae))),
            MetricRow::new("ISE", column(|m| Some(m.ise))),
            MetricRow::new("ITAE", column(|m| Some(m.itae))),
        ];
        Self { labels, rows }
    }

    /// Number of rows won by each column.
    pub fn wins(&self) -> Vec<usize> {
        let mut wins = vec![0; self.labels.len()];
        for winner in self.rows.iter().filter_map(|row| row.winner) {
            if let Some(count) = wins.get_mut(winner) {
                *count += 1;
            }
        }
        wins
    }

    /// Column with the most row wins, if unique.
    pub fn overall_winner(&self) -> Option<&str> {
        let wins = self.wins();
        let top = *wins.iter().max()?;
        let mut leaders = wins.iter().enumerate().filter(|&(_, &w)| w == top);
        match (leaders.next(), leaders.next()) {
            (Some((i, _)), None) if top > 0 => self.labels.get(i).map(String::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for ComparisonTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAME_WIDTH: usize = 20;
        let width = self
            .labels
            .iter()
            .map(|l| l.len())
            .max()
            .unwrap_or(0)
            .max(12)
            + 2;

        write!(f, "{:<NAME_WIDTH$}", "Metric")?;
        for label in &self.labels {
            write!(f, "{label:>width$}")?;
        }
        writeln!(f, "{:>10}", "Winner")?;
        writeln!(f, "{}", "-".repeat(NAME_WIDTH + width * self.labels.len() + 10))?;

        for row in &self.rows {
            write!(f, "{:<NAME_WIDTH$}", row.metric)?;
            for value in &row.values {
                match value {
                    Some(v) => write!(f, "{v:>width$.3}")?,
                    None => write!(f, "{:>width$}", "n/a")?,
                }
            }
            let winner = row
                .winner
                .and_then(|i| self.labels.get(i))
                .map_or("tie", String::as_str);
            writeln!(f, "  {winner}")?;
        }

        let wins = self.wins();
        write!(f, "{:<NAME_WIDTH$}", "Wins")?;
        for count in &wins {
            write!(f, "{count:>width$}")?;
        }
        writeln!(f)
    }
}
