use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Root plus every node pushed onto the frontier.
    pub nodes_generated: usize,
    /// Nodes popped off the frontier.
    pub nodes_expanded: usize,
    pub time_us: u64,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "{:?} node(s) generated, {:?} node(s) expanded, Time(microseconds) {:?}",
            self.nodes_generated, self.nodes_expanded, self.time_us
        );
    }
}
