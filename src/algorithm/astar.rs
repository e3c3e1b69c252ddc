use super::frontier::Frontier;
use super::reconstruct_path;
use super::state::{NodeId, SearchNode, SearchState};
use crate::common::{Action, Coordinate, Path};
use crate::error::{Endpoint, SearchError};
use crate::heuristic::HeuristicKind;
use crate::map::{check_endpoint, GridView};
use crate::stat::Stats;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, instrument, trace};

/// When a coordinate stops accepting new nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClosePolicy {
    /// Close a coordinate as soon as a node for it is generated. The first
    /// node to reach a cell wins even if a cheaper route shows up later.
    #[default]
    OnGenerate,
    /// Close on pop and re-push when a cheaper g is found before that.
    OnExpand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Running,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { path: Path, stats: Stats },
    NoPath { stats: Stats },
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }

    pub fn path(&self) -> Option<&[Coordinate]> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            SearchOutcome::NoPath { .. } => None,
        }
    }

    pub fn stats(&self) -> &Stats {
        match self {
            SearchOutcome::Found { stats, .. } | SearchOutcome::NoPath { stats } => stats,
        }
    }

    pub fn nodes_generated(&self) -> usize {
        self.stats().nodes_generated
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchStatus {
    Running,
    Done(SearchOutcome),
}

/// Resumable A* over a [`GridView`].
///
/// The grid must not change while the search is alive. Each [`AStar::step`]
/// pops one node, so a caller can bound work per slice with [`AStar::run`].
pub struct AStar<'g, G: ?Sized> {
    grid: &'g G,
    start: Coordinate,
    goal: Coordinate,
    heuristic: HeuristicKind,
    policy: ClosePolicy,
    phase: SearchPhase,
    nodes: Vec<SearchNode<'g, G>>,
    frontier: Frontier<NodeId>,
    expanded: HashSet<Coordinate>,
    // Only used by ClosePolicy::OnExpand.
    best_g: HashMap<Coordinate, u32>,
    path: Path,
    stats: Stats,
    elapsed: Duration,
}

impl<'g, G: GridView + ?Sized> AStar<'g, G> {
    pub fn new(
        grid: &'g G,
        start: Coordinate,
        goal: Coordinate,
        heuristic: HeuristicKind,
        policy: ClosePolicy,
    ) -> Result<Self, SearchError> {
        check_endpoint(grid, Endpoint::Start, start)?;
        check_endpoint(grid, Endpoint::Goal, goal)?;

        Ok(AStar {
            grid,
            start,
            goal,
            heuristic,
            policy,
            phase: SearchPhase::Idle,
            nodes: Vec::new(),
            frontier: Frontier::new(),
            expanded: HashSet::new(),
            best_g: HashMap::new(),
            path: Vec::new(),
            stats: Stats::default(),
            elapsed: Duration::ZERO,
        })
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Coordinates currently in the expanded set.
    pub fn expanded_len(&self) -> usize {
        self.expanded.len()
    }

    fn seed(&mut self) {
        let state = SearchState::new(self.start, self.goal, self.grid);
        let root = SearchNode::root(state, self.heuristic.estimate(self.start, self.goal));
        self.frontier.push(root.f_cost(), 0);
        self.nodes.push(root);
        if self.policy == ClosePolicy::OnExpand {
            self.best_g.insert(self.start, 0);
        }
        self.stats.nodes_generated = 1;
        self.phase = SearchPhase::Running;
    }

    fn push_child(
        &mut self,
        parent_id: NodeId,
        parent_g: u32,
        successor: SearchState<'g, G>,
        action: Action,
    ) {
        let h_cost = self.heuristic.estimate(successor.coordinate, self.goal);
        let child = SearchNode::child(successor, h_cost, action, parent_id, parent_g);
        self.frontier.push(child.f_cost(), self.nodes.len());
        self.nodes.push(child);
        self.stats.nodes_generated += 1;
    }

    fn advance(&mut self) -> Result<(), SearchError> {
        if self.phase == SearchPhase::Idle {
            self.seed();
        }

        if self.frontier.is_empty() {
            debug!("cannot find solution");
            self.phase = SearchPhase::Failed;
            return Ok(());
        }

        let id = self.frontier.pop_min()?;
        let node = self.nodes[id];
        self.stats.nodes_expanded += 1;
        trace!("expand node: {node:?}");

        if self.policy == ClosePolicy::OnExpand && !self.expanded.insert(node.state.coordinate) {
            // Stale entry, a cheaper node for this cell was already expanded.
            return Ok(());
        }

        if node.state.is_goal() {
            self.path = reconstruct_path(&self.nodes, id);
            self.phase = SearchPhase::Succeeded;
            return Ok(());
        }

        for (successor, action) in node.state.expand() {
            let at = successor.coordinate;
            if self.expanded.contains(&at) {
                continue;
            }
            match self.policy {
                ClosePolicy::OnGenerate => {
                    self.expanded.insert(at);
                }
                ClosePolicy::OnExpand => {
                    let tentative_g = node.g_cost + action.cost;
                    if self.best_g.get(&at).is_some_and(|&g| g <= tentative_g) {
                        continue;
                    }
                    self.best_g.insert(at, tentative_g);
                }
            }
            self.push_child(id, node.g_cost, successor, action);
        }
        Ok(())
    }

    /// Pop and expand a single node.
    pub fn step(&mut self) -> Result<SearchStatus, SearchError> {
        if matches!(self.phase, SearchPhase::Idle | SearchPhase::Running) {
            let started = Instant::now();
            self.advance()?;
            self.elapsed += started.elapsed();
        }
        Ok(self.status())
    }

    /// Step until done, or until `budget` steps have run. A zero budget does
    /// no work. The step that finds the frontier empty counts as one.
    pub fn run(&mut self, budget: Option<usize>) -> Result<SearchStatus, SearchError> {
        if budget == Some(0) {
            return Ok(self.status());
        }
        let mut steps = 0;
        loop {
            let status = self.step()?;
            steps += 1;
            let spent = budget.is_some_and(|budget| steps >= budget);
            if spent || matches!(status, SearchStatus::Done(_)) {
                return Ok(status);
            }
        }
    }

    fn status(&self) -> SearchStatus {
        let stats = Stats {
            time_us: self.elapsed.as_micros() as u64,
            ..self.stats.clone()
        };
        match self.phase {
            SearchPhase::Idle | SearchPhase::Running => SearchStatus::Running,
            SearchPhase::Succeeded => SearchStatus::Done(SearchOutcome::Found {
                path: self.path.clone(),
                stats,
            }),
            SearchPhase::Failed => SearchStatus::Done(SearchOutcome::NoPath { stats }),
        }
    }
}

/// Run A* from `start` to `goal`, closing cells as they are generated.
pub fn search<G: GridView + ?Sized>(
    start: Coordinate,
    goal: Coordinate,
    grid: &G,
    heuristic: HeuristicKind,
) -> Result<SearchOutcome, SearchError> {
    search_with(start, goal, grid, heuristic, ClosePolicy::default())
}

#[instrument(
    skip_all,
    name = "a_star",
    fields(start = %start, goal = %goal, heuristic = %heuristic),
    level = "debug"
)]
pub fn search_with<G: GridView + ?Sized>(
    start: Coordinate,
    goal: Coordinate,
    grid: &G,
    heuristic: HeuristicKind,
    policy: ClosePolicy,
) -> Result<SearchOutcome, SearchError> {
    let mut engine = AStar::new(grid, start, goal, heuristic, policy)?;
    loop {
        if let SearchStatus::Done(outcome) = engine.step()? {
            debug!("search finished: found {}, {:?}", outcome.is_found(), outcome.stats());
            return Ok(outcome);
        }
    }
}
