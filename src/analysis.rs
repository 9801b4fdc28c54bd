//  ANALYSIS.rs
//    by Lut99
//
//  Created:
//    19 Sep 2026, 10:03:57
//  Last edited:
//    08 Oct 2026, 16:21:30
//  Auto updated?
//    Yes
//
//  Description:
//!   Classifies a policy by looking at the shape of its [`ExecutionGraph`].
//!
//!   A policy is _strong_ if its graph has no cycles at all, i.e., the goal
//!   is always reached in a bounded number of steps. It is _strong-cyclic_ if
//!   the goal can be reached from every state it may end up in, i.e., it
//!   reaches the goal eventually if non-determinism is fair.
//

use std::fmt::{Display, Formatter, Result as FResult};

use petgraph::algo::toposort;
use petgraph::visit::{Bfs, Reversed};

use crate::graph::{self, ExecutionGraph, GOAL};
use crate::log::debug;


/***** HELPER FUNCTIONS *****/
/// Counts the nodes from which the goal node can be reached (including itself).
fn count_goal_reaching(graph: &ExecutionGraph) -> usize {
    let reversed = Reversed(graph.graph());
    let mut bfs = Bfs::new(reversed, graph::index(GOAL));
    let mut count: usize = 0;
    while bfs.next(reversed).is_some() {
        count += 1;
    }
    count
}





/***** LIBRARY FUNCTIONS *****/
/// Analyses an execution graph.
///
/// # Arguments
/// - `graph`: The [`ExecutionGraph`] to analyse.
///
/// # Returns
/// A [`Report`] with the graph's statistics and classification.
pub fn analyse(graph: &ExecutionGraph) -> Report {
    // Self-loops make toposort fail too, which is what we want
    let strong: bool = toposort(graph.graph(), None).is_ok();
    let strong_cyclic: bool = count_goal_reaching(graph) == graph.node_count();
    debug!("Policy is {}strong and {}strong-cyclic", if strong { "" } else { "NOT " }, if strong_cyclic { "" } else { "NOT " });
    Report { nodes: graph.node_count(), edges: graph.edge_count(), unhandled: graph.unhandled().len(), strong, strong_cyclic }
}





/***** LIBRARY *****/
/// The statistics and classification of a policy.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Report {
    /// The number of nodes in the graph.
    pub nodes: usize,
    /// The number of edges in the graph.
    pub edges: usize,
    /// The number of states the policy did not handle.
    pub unhandled: usize,
    /// Whether the graph is acyclic.
    pub strong: bool,
    /// Whether the goal is reachable from every node.
    pub strong_cyclic: bool,
}
impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        writeln!(f, "Policy Statistics from graph:")?;
        writeln!(f)?;
        writeln!(f, "            Nodes: {}", self.nodes)?;
        writeln!(f, "            Edges: {}", self.edges)?;
        writeln!(f, "        Unhandled: {}", self.unhandled)?;
        writeln!(f, "           Strong: {}", self.strong)?;
        write!(f, "    Strong Cyclic: {}", self.strong_cyclic)
    }
}





/***** TESTS *****/
