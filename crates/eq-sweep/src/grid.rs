//! Sweep grid definition.
//!
//! A sweep is the cartesian product of four axes. Points are produced with
//! the graph axis outermost and the dynamic axis innermost.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{SweepError, SweepResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepGrid {
    pub graph_names: Vec<String>,
    pub birth_mutation_rates: Vec<f64>,
    pub independent_mutation_rates: Vec<f64>,
    pub dynamics: Vec<String>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            graph_names: ["complete", "cycle", "double-star", "star"]
                .into_iter()
                .map(String::from)
                .collect(),
            birth_mutation_rates: vec![1e-4, 1e-3, 1e-2],
            independent_mutation_rates: vec![1e-4, 1e-3, 1e-2],
            dynamics: ["birth-death", "death-birth"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// One combination of sweep parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub graph_name: String,
    pub birth_mutation_rate: f64,
    pub independent_mutation_rate: f64,
    pub dynamic: String,
}

impl SweepGrid {
    /// Reject grids with an empty axis; they would silently produce nothing.
    pub fn validate(&self) -> SweepResult<()> {
        let axes = [
            ("graph_names", self.graph_names.is_empty()),
            ("birth_mutation_rates", self.birth_mutation_rates.is_empty()),
            (
                "independent_mutation_rates",
                self.independent_mutation_rates.is_empty(),
            ),
            ("dynamics", self.dynamics.is_empty()),
        ];
        match axes.into_iter().find(|(_, empty)| *empty) {
            Some((axis, _)) => Err(SweepError::EmptyAxis { axis }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.graph_names.len()
            * self.birth_mutation_rates.len()
            * self.independent_mutation_rates.len()
            * self.dynamics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> Vec<SweepPoint> {
        let mut points = Vec::with_capacity(self.len());
        for graph_name in &self.graph_names {
            for &birth_mutation_rate in &self.birth_mutation_rates {
                for &independent_mutation_rate in &self.independent_mutation_rates {
                    for dynamic in &self.dynamics {
                        points.push(SweepPoint {
                            graph_name: graph_name.clone(),
                            birth_mutation_rate,
                            independent_mutation_rate,
                            dynamic: dynamic.clone(),
                        });
                    }
                }
            }
        }
        points
    }
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "graph={} birth={} independent={} dynamic={}",
            self.graph_name, self.birth_mutation_rate, self.independent_mutation_rate, self.dynamic
        )
    }
}
