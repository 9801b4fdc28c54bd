//  PLANS.rs
//    by Lut99
//
//  Created:
//    19 Sep 2026, 14:40:12
//  Last edited:
//    09 Oct 2026, 09:12:05
//  Auto updated?
//    Yes
//
//  Description:
//!   Extracts linear plans from an [`ExecutionGraph`], i.e., paths from the
//!   start node to the goal node, translated to the actions taken along them.
//

use std::collections::{BTreeSet, HashMap};
use std::fmt::{Display, Formatter, Result as FResult};

use indexmap::IndexSet;
use itertools::Itertools as _;
use petgraph::algo::{all_simple_paths, dijkstra};
use petgraph::graph::NodeIndex;
use petgraph::Direction;

use crate::graph::{self, ExecutionGraph, NodeId, GOAL, START};
use crate::log::debug;


/***** HELPER FUNCTIONS *****/
/// Translates a path to the [`Plan`] it describes.
///
/// Returns [`None`] if two consecutive nodes are not connected.
fn to_plan(graph: &ExecutionGraph, path: Vec<NodeId>) -> Option<Plan> {
    let actions: Vec<String> = path.iter().tuple_windows().map(|(u, v)| graph.transition_action(*u, *v).map(String::from)).collect::<Option<_>>()?;
    Some(Plan { path, actions })
}

/// Computes the distance (in edges) of every node reachable from the start node.
#[inline]
fn distances(graph: &ExecutionGraph) -> HashMap<NodeIndex, usize> { dijkstra(graph.graph(), graph::index(START), None, |_| 1usize) }

/// Collects the distinct plan actions into a set.
fn action_set<'p>(plans: impl IntoIterator<Item = &'p Plan>) -> BTreeSet<String> { plans.into_iter().flat_map(|plan| plan.actions.iter().cloned()).collect() }





/***** LIBRARY FUNCTIONS *****/
/// Finds all the shortest plans from the start to the goal.
///
/// # Arguments
/// - `graph`: The [`ExecutionGraph`] to search.
///
/// # Returns
/// Every distinct minimum-length path from [`START`] to [`GOAL`] as a [`Plan`]. Paths are ordered
/// by their node ids. If the goal cannot be reached, there are none.
pub fn shortest_plans(graph: &ExecutionGraph) -> Vec<Plan> {
    let g = graph.graph();
    let dist: HashMap<NodeIndex, usize> = distances(graph);
    let goal_dist: usize = match dist.get(&graph::index(GOAL)) {
        Some(d) => *d,
        None => {
            debug!("Goal is unreachable; no shortest plans");
            return Vec::new();
        },
    };

    // Walk back from the goal over nodes that are exactly one step closer to the start
    let mut paths: Vec<Vec<NodeId>> = Vec::new();
    let mut stack: Vec<Vec<NodeIndex>> = vec![vec![graph::index(GOAL)]];
    while let Some(rev) = stack.pop() {
        let head: NodeIndex = rev[rev.len() - 1];
        if head == graph::index(START) {
            paths.push(rev.iter().rev().copied().map(graph::id).collect());
            continue;
        }

        let dh: usize = dist.get(&head).copied().unwrap_or(0);
        let preds: BTreeSet<NodeIndex> = g.neighbors_directed(head, Direction::Incoming).filter(|u| dist.get(u).map(|du| du + 1 == dh).unwrap_or(false)).collect();
        for u in preds {
            let mut next: Vec<NodeIndex> = rev.clone();
            next.push(u);
            stack.push(next);
        }
    }
    paths.sort();

    let plans: Vec<Plan> = paths.into_iter().filter_map(|path| to_plan(graph, path)).collect();
    debug!("Found {} shortest plan(s) of length {goal_dist}", plans.len());
    plans
}

/// Finds all plans from the start to the goal that don't visit a node twice.
///
/// # Arguments
/// - `graph`: The [`ExecutionGraph`] to search.
///
/// # Returns
/// A tuple of every distinct simple path from [`START`] to [`GOAL`] as a [`Plan`], and the set of
/// all actions used by them.
pub fn all_plans(graph: &ExecutionGraph) -> (Vec<Plan>, BTreeSet<String>) {
    // Parallel edges make petgraph report the same node sequence more than once
    let paths: IndexSet<Vec<NodeId>> = all_simple_paths::<Vec<NodeIndex>, _>(graph.graph(), graph::index(START), graph::index(GOAL), 0, None)
        .map(|path| path.into_iter().map(graph::id).collect())
        .collect();

    let plans: Vec<Plan> = paths.into_iter().filter_map(|path| to_plan(graph, path)).collect();
    let actions: BTreeSet<String> = action_set(&plans);
    debug!("Found {} plan(s) using {} distinct action(s)", plans.len(), actions.len());
    (plans, actions)
}





/***** LIBRARY *****/
/// A linear plan through an [`ExecutionGraph`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Plan {
    /// The nodes visited, from [`START`] to [`GOAL`].
    pub path:    Vec<NodeId>,
    /// The action taken between every two consecutive nodes.
    pub actions: Vec<String>,
}
impl Plan {
    /// Returns the number of actions in the plan.
    #[inline]
    pub fn len(&self) -> usize { self.actions.len() }

    /// Returns whether the plan has no actions.
    #[inline]
    pub fn is_empty(&self) -> bool { self.actions.is_empty() }
}
impl Display for Plan {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "[{}]", self.actions.iter().join(", ")) }
}





/***** TESTS *****/
