use crate::common::{Action, Coordinate, Direction};
use crate::map::GridView;

use std::fmt;
use std::hash::{Hash, Hasher};

/// Index of a node in the engine's arena.
pub type NodeId = usize;

/// A grid position within one search. Goal and grid are shared context,
/// so identity is the coordinate alone.
pub struct SearchState<'g, G: ?Sized> {
    pub coordinate: Coordinate,
    goal: Coordinate,
    grid: &'g G,
}

impl<G: ?Sized> Clone for SearchState<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: ?Sized> Copy for SearchState<'_, G> {}

impl<G: ?Sized> PartialEq for SearchState<'_, G> {
    fn eq(&self, other: &Self) -> bool {
        self.coordinate == other.coordinate
    }
}

impl<G: ?Sized> Eq for SearchState<'_, G> {}

impl<G: ?Sized> Hash for SearchState<'_, G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coordinate.hash(state);
    }
}

impl<G: ?Sized> fmt::Debug for SearchState<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchState")
            .field("coordinate", &self.coordinate)
            .field("goal", &self.goal)
            .finish()
    }
}

impl<'g, G: GridView + ?Sized> SearchState<'g, G> {
    pub fn new(coordinate: Coordinate, goal: Coordinate, grid: &'g G) -> Self {
        SearchState {
            coordinate,
            goal,
            grid,
        }
    }

    pub fn goal(&self) -> Coordinate {
        self.goal
    }

    pub fn is_goal(&self) -> bool {
        self.coordinate == self.goal
    }

    /// In bounds and on an Empty or Goal cell.
    pub fn is_valid(&self) -> bool {
        self.grid.in_bounds(self.coordinate)
            && self.grid.cell_type_at(self.coordinate).is_traversable()
    }

    /// Valid successors in fixed direction order, each with the move that reaches it.
    /// Moves that leave the `i32` coordinate range are skipped.
    pub fn expand(&self) -> Vec<(SearchState<'g, G>, Action)> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| Action::step(self.coordinate, direction))
            .map(|action| (SearchState::new(action.target, self.goal, self.grid), action))
            .filter(|(successor, _)| successor.is_valid())
            .collect()
    }
}

/// Node of the implicit search tree, stored in an arena and linked by index.
pub struct SearchNode<'g, G: ?Sized> {
    pub state: SearchState<'g, G>,
    pub g_cost: u32,
    pub h_cost: f64,
    pub action: Option<Action>,
    pub parent: Option<NodeId>,
}

impl<G: ?Sized> Clone for SearchNode<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: ?Sized> Copy for SearchNode<'_, G> {}

impl<G: ?Sized> fmt::Debug for SearchNode<'_, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchNode")
            .field("state", &self.state)
            .field("g_cost", &self.g_cost)
            .field("h_cost", &self.h_cost)
            .field("action", &self.action)
            .field("parent", &self.parent)
            .finish()
    }
}

impl<'g, G: GridView + ?Sized> SearchNode<'g, G> {
    pub fn root(state: SearchState<'g, G>, h_cost: f64) -> Self {
        SearchNode {
            state,
            g_cost: 0,
            h_cost,
            action: None,
            parent: None,
        }
    }

    pub fn child(
        state: SearchState<'g, G>,
        h_cost: f64,
        action: Action,
        parent: NodeId,
        parent_g: u32,
    ) -> Self {
        SearchNode {
            state,
            g_cost: parent_g + action.cost,
            h_cost,
            action: Some(action),
            parent: Some(parent),
        }
    }

    pub fn f_cost(&self) -> f64 {
        f64::from(self.g_cost) + self.h_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Grid;

    #[test]
    fn test_state_identity_is_coordinate() {
        let grid = Grid::new(3, 3);
        let a = SearchState::new(Coordinate::new(1, 1), Coordinate::new(2, 2), &grid);
        let b = SearchState::new(Coordinate::new(1, 1), Coordinate::new(0, 0), &grid);
        assert_eq!(a, b);
        assert!(!a.is_goal());
        assert!(SearchState::new(Coordinate::new(2, 2), Coordinate::new(2, 2), &grid).is_goal());
    }

    #[test]
    fn test_validity() {
        let grid: Grid = "S@G\n.o*".parse().unwrap();
        let goal = Coordinate::new(2, 0);
        let valid = |col, row| SearchState::new(Coordinate::new(col, row), goal, &grid).is_valid();
        assert!(!valid(0, 0));
        assert!(!valid(1, 0));
        assert!(valid(2, 0));
        assert!(valid(0, 1));
        assert!(!valid(1, 1));
        assert!(!valid(2, 1));
        assert!(!valid(-1, 0));
        assert!(!valid(3, 1));
    }

    #[test]
    fn test_expand_in_direction_order() {
        let grid: Grid = "...\n.S.\n.@.".parse().unwrap();
        let state = SearchState::new(Coordinate::new(1, 1), Coordinate::new(2, 2), &grid);
        let successors = state.expand();
        let directions: Vec<_> = successors.iter().map(|(_, action)| action.direction).collect();
        assert_eq!(
            directions,
            vec![
                Direction::North,
                Direction::NorthEast,
                Direction::East,
                Direction::SouthEast,
                Direction::SouthWest,
                Direction::West,
                Direction::NorthWest,
            ]
        );
        for (successor, action) in &successors {
            assert_eq!(successor.coordinate, action.target);
            assert_eq!(action.cost, 1);
        }
    }

    #[test]
    fn test_expand_corner_clips_to_bounds() {
        let grid = Grid::new(2, 2);
        let state = SearchState::new(Coordinate::new(0, 0), Coordinate::new(1, 1), &grid);
        let targets: Vec<_> = state.expand().iter().map(|(s, _)| s.coordinate).collect();
        assert_eq!(
            targets,
            vec![Coordinate::new(1, 0), Coordinate::new(1, 1), Coordinate::new(0, 1)]
        );
    }

    #[test]
    fn test_child_cost_accumulates() {
        let grid = Grid::new(3, 1);
        let goal = Coordinate::new(2, 0);
        let root = SearchNode::root(SearchState::new(Coordinate::new(0, 0), goal, &grid), 2.0);
        let action = Action::step(Coordinate::new(0, 0), Direction::East).unwrap();
        let state = SearchState::new(action.target, goal, &grid);
        let child = SearchNode::child(state, 1.0, action, 0, root.g_cost);
        assert_eq!(root.g_cost, 0);
        assert_eq!(child.g_cost, 1);
        assert_eq!(child.f_cost(), 2.0);
        assert_eq!(child.parent, Some(0));
    }
}
