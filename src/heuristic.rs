use crate::common::Coordinate;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Distance estimate to the goal.
///
/// Neither variant is admissible on an 8-connected unit-cost grid: Manhattan
/// overestimates along diagonals, and Euclidean is not a lower bound on the
/// step count either once diagonals cost 1. Paths are valid but not
/// guaranteed shortest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeuristicKind {
    #[default]
    Manhattan,
    Euclidean,
}

impl HeuristicKind {
    pub fn estimate(self, position: Coordinate, goal: Coordinate) -> f64 {
        let d_col = f64::from(position.col) - f64::from(goal.col);
        let d_row = f64::from(position.row) - f64::from(goal.row);
        match self {
            HeuristicKind::Manhattan => d_col.abs() + d_row.abs(),
            HeuristicKind::Euclidean => d_col.hypot(d_row),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeuristicKind::Manhattan => write!(f, "Manhattan"),
            HeuristicKind::Euclidean => write!(f, "Euclidean"),
        }
    }
}
