mod astar;
mod frontier;
mod state;

pub use astar::{search, search_with, AStar, ClosePolicy, SearchOutcome, SearchPhase, SearchStatus};
pub use frontier::Frontier;
pub use state::{NodeId, SearchNode, SearchState};

use crate::common::Path;
use crate::map::GridView;

/// Walk parent links from `goal` back to the root. The root (the start cell)
/// contributes nothing; the result runs from the first step to the goal.
pub fn reconstruct_path<G: GridView + ?Sized>(nodes: &[SearchNode<'_, G>], goal: NodeId) -> Path {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(id) = current {
        let node = &nodes[id];
        if let Some(action) = node.action {
            path.push(action.target);
        }
        current = node.parent;
    }
    path.reverse();
    path
}
