//! Error types for the maze search.

use crate::common::Coordinate;

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    #[error("position is not set")]
    Unset,

    #[error("{0} lies outside the grid")]
    OutOfBounds(Coordinate),

    #[error("{0} is a blocked cell")]
    Blocked(Coordinate),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid {endpoint}: {reason}")]
    InvalidStartOrGoal {
        endpoint: Endpoint,
        reason: InvalidReason,
    },

    /// Popping an empty frontier. The engine guards against this, so seeing it
    /// means an internal invariant broke.
    #[error("pop from an empty frontier")]
    EmptyFrontier,
}

impl SearchError {
    pub(crate) fn invalid(endpoint: Endpoint, reason: InvalidReason) -> Self {
        SearchError::InvalidStartOrGoal { endpoint, reason }
    }
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed header line {line}: {message}")]
    Header { line: usize, message: String },

    #[error("row {row} has {found} cells, expected {expected}")]
    Row {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("unknown cell '{symbol}' at {at}")]
    UnknownCell { symbol: char, at: Coordinate },

    #[error("more than one {0} marker in map")]
    DuplicateMarker(Endpoint),

    #[error("map declares {declared} rows but contains {found}")]
    Dimensions { declared: usize, found: usize },
}
