use crate::common::{CellType, Coordinate, Path};
use crate::map::Grid;

use std::collections::VecDeque;
use tracing::trace;

/// Replays a found path onto a grid one step per tick.
///
/// The current step is tagged Runner and the one before it Trail. The goal
/// keeps its Goal tag.
#[derive(Debug, Clone)]
pub struct Playback {
    steps: VecDeque<Coordinate>,
    previous: Option<Coordinate>,
}

impl Playback {
    pub fn new(path: Path) -> Self {
        Playback {
            steps: path.into(),
            previous: None,
        }
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// Advance one step. Returns the cell the runner moved to, or `None` once
    /// the path is used up.
    pub fn tick(&mut self, grid: &mut Grid) -> Option<Coordinate> {
        if let Some(previous) = self.previous.take() {
            if grid.cell(previous) == Some(CellType::Runner) {
                grid.set_cell(previous, CellType::Trail);
            }
        }

        let current = self.steps.pop_front()?;
        if grid.cell(current) != Some(CellType::Goal) {
            grid.set_cell(current, CellType::Runner);
        }
        trace!("runner at {current}");
        self.previous = Some(current);
        Some(current)
    }
}
