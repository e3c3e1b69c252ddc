pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod map;
pub mod playback;
pub mod stat;

pub use algorithm::{
    search, search_with, AStar, ClosePolicy, SearchOutcome, SearchPhase, SearchStatus,
};
pub use common::{Action, CellType, Coordinate, Direction, Path};
pub use error::{Endpoint, InvalidReason, MapError, SearchError};
pub use heuristic::HeuristicKind;
pub use map::{resolve_endpoints, Bounds, Grid, GridView};
pub use playback::Playback;
pub use stat::Stats;
