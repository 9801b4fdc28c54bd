//  GRAPH.rs
//    by Lut99
//
//  Created:
//    18 Sep 2026, 09:20:14
//  Last edited:
//    09 Oct 2026, 11:02:46
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the simulation of a [`Policy`] into an [`ExecutionGraph`].
//!
//!   Starting from the initial state, we ask the policy what to do, and then
//!   apply _every_ outcome of the chosen action(s). Every distinct state we
//!   find this way becomes a node; every applied outcome an edge. States
//!   satisfying the goal are all collapsed into a single goal node.
//!
//!   The search is breadth-first and visits every state exactly once, so it
//!   always terminates (the state space is finite).
//

use std::collections::{HashMap, VecDeque};
use std::error;
use std::fmt::{Display, Formatter, Result as FResult};

use enum_debug::EnumDebug as _;
use indexmap::{IndexMap, IndexSet};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef as _;

use crate::domain::Domain;
use crate::log::{debug, trace};
use crate::policy::{Decision, Policy};
use crate::progress::{self, progress};
use crate::state::State;


/***** CONSTANTS *****/
/// The node id of the initial state.
pub const START: NodeId = 1;
/// The node id of the (collapsed) goal state.
pub const GOAL: NodeId = 2;





/***** ERRORS *****/
/// Defines errors that abort building an [`ExecutionGraph`].
#[derive(Debug)]
pub enum Error {
    /// The policy chose an action that the domain doesn't have.
    UnknownAction { action: String, state: State },
    /// Failed to apply one of the outcomes of the chosen action.
    Progress { action: String, outcome: usize, err: progress::Error },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::UnknownAction { action, state } => write!(f, "Policy chose unknown action \"{action}\" in state {state}"),
            Self::Progress { action, outcome, .. } => write!(f, "Failed to apply outcome {outcome} of action \"{action}\""),
        }
    }
}
impl error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::UnknownAction { .. } => None,
            Self::Progress { err, .. } => Some(err),
        }
    }
}





/***** AUXILLARY *****/
/// Identifies a node in an [`ExecutionGraph`].
///
/// Ids start at 1. [`START`] and [`GOAL`] are reserved; discovered states are numbered from 3 in
/// the order they are found.
pub type NodeId = usize;



/// The weight of the nodes in an [`ExecutionGraph`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Node {
    /// The initial state.
    Start,
    /// The collapsed goal state.
    Goal,
    /// Any other discovered state.
    State(NodeId),
}
impl Node {
    /// Returns the id of this node.
    #[inline]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Start => START,
            Self::Goal => GOAL,
            Self::State(id) => *id,
        }
    }
}
impl Display for Node {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Start => write!(f, "s0"),
            Self::Goal => write!(f, "G"),
            Self::State(id) => write!(f, "{id}"),
        }
    }
}



/// The weight of the edges in an [`ExecutionGraph`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Transition {
    /// The name of the action that was executed.
    pub action:  String,
    /// Which of the action's outcomes happened (1-based).
    pub outcome: usize,
}
impl Display for Transition {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{} ({})", self.action, self.outcome) }
}





/***** LIBRARY *****/
/// The graph of all states reachable when following some policy.
///
/// This is a multigraph: the same pair of nodes may be connected by several edges (e.g., when
/// different outcomes happen to produce the same state).
#[derive(Clone, Debug)]
pub struct ExecutionGraph {
    /// The graph itself. Node `i` in here has id `i + 1`.
    graph: DiGraph<Node, Transition>,
    /// Maps every registered state to its node. Insertion order equals id order.
    nodes: IndexMap<State, NodeId>,
    /// For every connected pair of nodes, the action of the edge added last between them.
    transition_actions: HashMap<(NodeId, NodeId), String>,
    /// The states for which the policy gave no answer.
    unhandled: IndexSet<State>,
}

// Constructors
impl ExecutionGraph {
    /// Creates a graph with only the start- and goal nodes in it.
    ///
    /// # Arguments
    /// - `init`: The initial [`State`].
    fn new(init: State) -> Self {
        let mut graph: DiGraph<Node, Transition> = DiGraph::new();
        graph.add_node(Node::Start);
        graph.add_node(Node::Goal);

        let mut nodes: IndexMap<State, NodeId> = IndexMap::new();
        nodes.insert(init, START);
        nodes.insert(State::goal_marker(), GOAL);

        Self { graph, nodes, transition_actions: HashMap::new(), unhandled: IndexSet::new() }
    }

    /// Simulates a policy on a domain and returns the resulting graph.
    ///
    /// Shortcut for [`GraphBuilder::new()`] followed by [`GraphBuilder::run()`].
    ///
    /// # Arguments
    /// - `domain`: The [`Domain`] to simulate in.
    /// - `policy`: The [`Policy`] to simulate.
    ///
    /// # Returns
    /// A new ExecutionGraph.
    ///
    /// # Errors
    /// This function errors if the policy chooses an action that doesn't exist or that isn't
    /// applicable in the state it chose it for.
    #[inline]
    pub fn build<P: ?Sized + Policy>(domain: &Domain, policy: &mut P) -> Result<Self, Error> { GraphBuilder::new(domain).run(policy) }
}

// Mutation (only done by the builder)
impl ExecutionGraph {
    /// Registers a new state, giving it the next free id.
    fn register(&mut self, state: State) -> NodeId {
        let id: NodeId = self.graph.node_count() + 1;
        self.graph.add_node(Node::State(id));
        self.nodes.insert(state, id);
        id
    }

    /// Adds an edge between two registered nodes.
    fn connect(&mut self, from: NodeId, to: NodeId, transition: Transition) -> EdgeIndex {
        self.transition_actions.insert((from, to), transition.action.clone());
        self.graph.add_edge(index(from), index(to), transition)
    }
}

// Inspection
impl ExecutionGraph {
    /// Returns the number of nodes in the graph, including the start- and goal nodes.
    #[inline]
    pub fn node_count(&self) -> usize { self.graph.node_count() }

    /// Returns the number of edges in the graph.
    #[inline]
    pub fn edge_count(&self) -> usize { self.graph.edge_count() }

    /// Returns the states that the policy did not handle, in the order they were found.
    #[inline]
    pub fn unhandled(&self) -> &IndexSet<State> { &self.unhandled }

    /// Returns the node of the given state, if it was registered.
    ///
    /// Note that states satisfying the goal are never registered; they all map to [`GOAL`]
    /// implicitly. Only the [synthetic goal state](State::goal_marker()) is found here.
    #[inline]
    pub fn node(&self, state: &State) -> Option<NodeId> { self.nodes.get(state).copied() }

    /// Returns the state of the given node.
    ///
    /// For [`GOAL`], this is the [synthetic goal state](State::goal_marker()).
    #[inline]
    pub fn state(&self, id: NodeId) -> Option<&State> { self.nodes.get_index(id.checked_sub(1)?).map(|(state, _)| state) }

    /// Iterates over all registered states and their nodes, in id order.
    #[inline]
    pub fn states<'s>(&'s self) -> impl 's + ExactSizeIterator<Item = (&'s State, NodeId)> { self.nodes.iter().map(|(state, id)| (state, *id)) }

    /// Returns all the edges between two nodes.
    ///
    /// # Arguments
    /// - `from`: The source node.
    /// - `to`: The target node.
    ///
    /// # Returns
    /// An [`Iterator`] over the [`Transition`]s of all edges from `from` to `to`.
    #[inline]
    pub fn transitions<'s>(&'s self, from: NodeId, to: NodeId) -> impl 's + Iterator<Item = &'s Transition> {
        let valid: bool = self.contains(from) && self.contains(to);
        valid.then(|| self.graph.edges_connecting(index(from), index(to)).map(|edge| edge.weight())).into_iter().flatten()
    }

    /// Returns the action of the last edge that was added between two nodes.
    ///
    /// If several actions connect the same two nodes, only the one recorded last is kept here. Use
    /// [`ExecutionGraph::transitions()`] to see all of them.
    #[inline]
    pub fn transition_action(&self, from: NodeId, to: NodeId) -> Option<&str> { self.transition_actions.get(&(from, to)).map(String::as_str) }

    /// Iterates over all edges in the graph, in the order they were added.
    ///
    /// # Returns
    /// An [`Iterator`] over `(from, to, transition)`-triplets.
    #[inline]
    pub fn edges<'s>(&'s self) -> impl 's + Iterator<Item = (NodeId, NodeId, &'s Transition)> {
        self.graph.edge_references().map(|edge| (self.graph[edge.source()].id(), self.graph[edge.target()].id(), edge.weight()))
    }

    /// Returns whether a node with the given id exists.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool { id >= 1 && id <= self.graph.node_count() }

    /// Returns the underlying [`petgraph`] graph.
    ///
    /// Node indices in here are [`NodeId`]s minus one.
    #[inline]
    pub fn graph(&self) -> &DiGraph<Node, Transition> { &self.graph }
}



/// Simulates a [`Policy`] into an [`ExecutionGraph`].
///
/// The builder owns the graph under construction and the queue of states still to expand. States
/// are expanded in the order they are discovered, each exactly once.
#[derive(Clone, Debug)]
pub struct GraphBuilder<'d> {
    /// The domain we're simulating in.
    domain: &'d Domain,
    /// The graph built so far.
    graph:  ExecutionGraph,
    /// The states still to expand, with their nodes.
    queue:  VecDeque<(NodeId, State)>,
}
impl<'d> GraphBuilder<'d> {
    /// Constructor for the GraphBuilder.
    ///
    /// # Arguments
    /// - `domain`: The [`Domain`] to simulate in.
    ///
    /// # Returns
    /// A new GraphBuilder with only the initial state queued.
    #[inline]
    pub fn new(domain: &'d Domain) -> Self {
        Self { domain, graph: ExecutionGraph::new(domain.init().clone()), queue: VecDeque::from([(START, domain.init().clone())]) }
    }

    /// Expands states until there are none left.
    ///
    /// # Arguments
    /// - `policy`: The [`Policy`] that decides which action to take in every state.
    ///
    /// # Returns
    /// The finished [`ExecutionGraph`].
    ///
    /// # Errors
    /// This function errors if the policy chooses an action that doesn't exist or that isn't
    /// applicable in the state it chose it for.
    pub fn run<P: ?Sized + Policy>(mut self, policy: &mut P) -> Result<ExecutionGraph, Error> {
        debug!("Simulating policy from initial state {}", self.domain.init());
        while self.step(policy)? {}
        debug!(
            "Simulation done: {} node(s), {} edge(s), {} unhandled state(s)",
            self.graph.node_count(),
            self.graph.edge_count(),
            self.graph.unhandled.len()
        );
        Ok(self.graph)
    }

    /// Expands the next queued state.
    ///
    /// # Arguments
    /// - `policy`: The [`Policy`] that decides which action to take in the state.
    ///
    /// # Returns
    /// True if a state was expanded, or false if the queue was empty.
    ///
    /// # Errors
    /// This function errors if the policy chooses an action that doesn't exist or that isn't
    /// applicable in the state.
    pub fn step<P: ?Sized + Policy>(&mut self, policy: &mut P) -> Result<bool, Error> {
        let (u_id, u): (NodeId, State) = match self.queue.pop_front() {
            Some(next) => next,
            None => return Ok(false),
        };
        trace!("Expanding node {u_id} ({u})");
        let domain: &'d Domain = self.domain;

        let decisions: Vec<Decision> = policy.next_actions(&u);
        if decisions.is_empty() {
            trace!("--> Policy gave no decisions; state is unhandled");
            self.graph.unhandled.insert(u.clone());
        }
        for decision in decisions {
            trace!("--> Decision '{decision}' ({:?})", decision.variant());
            let action: String = match decision {
                Decision::Action(action) => action,
                Decision::Goal => continue,
                Decision::Unhandled => {
                    self.graph.unhandled.insert(u.clone());
                    continue;
                },
            };

            let outcomes = match domain.actions().outcomes(&action) {
                Some(outcomes) => outcomes,
                None => return Err(Error::UnknownAction { action, state: u }),
            };
            for (i, outcome) in outcomes.iter().enumerate() {
                let v: State = match progress(&u, outcome) {
                    Ok(v) => v,
                    Err(err) => return Err(Error::Progress { action, outcome: i + 1, err }),
                };

                // Find the node of the successor
                let v_id: NodeId = if v.is_goal(domain.goal()) {
                    GOAL
                } else if let Some(v_id) = self.graph.node(&v) {
                    v_id
                } else {
                    let v_id: NodeId = self.graph.register(v.clone());
                    trace!("-----> Discovered node {v_id} ({v})");
                    self.queue.push_back((v_id, v));
                    v_id
                };

                trace!("-----> Edge {u_id} -> {v_id} ('{action}' outcome {})", i + 1);
                self.graph.connect(u_id, v_id, Transition { action: action.clone(), outcome: i + 1 });
            }
        }
        Ok(true)
    }

    /// Returns the graph built so far.
    #[inline]
    pub fn graph(&self) -> &ExecutionGraph { &self.graph }

    /// Returns the number of states that still have to be expanded.
    #[inline]
    pub fn pending(&self) -> usize { self.queue.len() }
}



/// Converts a [`NodeId`] to a [`NodeIndex`].
#[inline]
pub(crate) fn index(id: NodeId) -> NodeIndex { NodeIndex::new(id - 1) }

/// Converts a [`NodeIndex`] to a [`NodeId`].
#[inline]
pub(crate) fn id(index: NodeIndex) -> NodeId { index.index() + 1 }





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Formula;
    use crate::tests::{flip_domain, make_domain, make_operator, scripted, toss_domain};


    #[test]
    fn test_build_single_step() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let domain = flip_domain();
        let graph = ExecutionGraph::build(&domain, &mut scripted(&domain, [("p", vec!["flip"])])).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.unhandled().is_empty());
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(START, GOAL, &Transition { action: "flip".into(), outcome: 1 })]);
        assert_eq!(graph.transition_action(START, GOAL), Some("flip"));
        assert_eq!(graph.node(domain.init()), Some(START));
        assert_eq!(graph.state(GOAL), Some(&State::goal_marker()));
        assert_eq!(graph.state(3), None);
        assert_eq!(graph.state(0), None);
    }

    #[test]
    fn test_build_self_loop() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let domain = toss_domain();
        let graph = ExecutionGraph::build(&domain, &mut scripted(&domain, [("p", vec!["toss"])])).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![
            (START, START, &Transition { action: "toss".into(), outcome: 1 }),
            (START, GOAL, &Transition { action: "toss".into(), outcome: 2 }),
        ]);
    }

    #[test]
    fn test_build_reuses_nodes() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        // Nodes are numbered in the order they are discovered
        let domain = make_domain(
            ["p", "q", "r", "g"],
            [
                make_operator("a", Formula::atom("p"), Formula::one_of([Formula::atom("q"), Formula::and([Formula::atom("q"), Formula::atom("r")])])),
                make_operator("b", Formula::atom("q"), Formula::and([Formula::atom("r"), Formula::not("p")])),
                make_operator("c", Formula::atom("r"), Formula::atom("g")),
            ],
            Formula::atom("p"),
            Formula::atom("g"),
        );
        // p        --a(1)--> p,q      --b--> q,r --c--> goal
        // p        --a(2)--> p,q,r    --c--> goal
        let mut policy = |state: &State| {
            if state.contains(1) && !state.contains(2) {
                vec![Decision::action("a")]
            } else if state.contains(1) && !state.contains(3) {
                vec![Decision::action("b")]
            } else {
                vec![Decision::action("c")]
            }
        };
        let graph = ExecutionGraph::build(&domain, &mut policy).unwrap();
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.node(&State::new([1, 2])), Some(3));
        assert_eq!(graph.node(&State::new([1, 2, 3])), Some(4));
        assert_eq!(graph.node(&State::new([2, 3])), Some(5));
        assert_eq!(graph.states().map(|(_, id)| id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(graph.graph().node_weights().map(Node::id).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(graph.edges().map(|(u, v, _)| (u, v)).collect::<Vec<_>>(), vec![(START, 3), (START, 4), (3, 5), (4, GOAL), (5, GOAL)]);
        assert_eq!(graph.transition_action(3, 5), Some("b"));
        assert_eq!(graph.transition_action(4, GOAL), Some("c"));
        assert_eq!(graph.transition_action(5, GOAL), Some("c"));
    }

    #[test]
    fn test_build_each_state_expanded_once() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        // Two outcomes both lead back to the start; the start must only be asked about once
        let domain = make_domain(
            ["p", "q"],
            [make_operator("spin", Formula::atom("p"), Formula::one_of([Formula::atom("p"), Formula::and([])]))],
            Formula::atom("p"),
            Formula::atom("q"),
        );
        let mut calls: Vec<State> = Vec::new();
        let mut policy = |state: &State| {
            calls.push(state.clone());
            vec![Decision::action("spin")]
        };
        let graph = ExecutionGraph::build(&domain, &mut policy).unwrap();
        assert_eq!(calls, vec![State::new([1])]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.transitions(START, START).map(|t| t.outcome).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(graph.transitions(START, GOAL).count(), 0);
        assert_eq!(graph.transitions(START, 42).count(), 0);
    }

    #[test]
    fn test_build_unhandled_and_goal() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let domain = toss_domain();

        // Declared goal is skipped without edges
        let graph = ExecutionGraph::build(&domain, &mut |_: &State| vec![Decision::Goal]).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.unhandled().is_empty());

        // Explicitly unhandled
        let graph = ExecutionGraph::build(&domain, &mut |_: &State| vec![Decision::Unhandled, Decision::Unhandled]).unwrap();
        assert_eq!(graph.unhandled().len(), 1);
        assert!(graph.unhandled().contains(domain.init()));

        // No answer at all
        let graph = ExecutionGraph::build(&domain, &mut |_: &State| vec![]).unwrap();
        assert_eq!(graph.unhandled().len(), 1);

        // Unhandled next to a real action still expands it
        let graph = ExecutionGraph::build(&domain, &mut |_: &State| vec![Decision::Unhandled, Decision::action("toss")]).unwrap();
        assert_eq!(graph.unhandled().len(), 1);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_build_last_action_wins() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let domain = make_domain(
            ["p", "q"],
            [make_operator("a", Formula::atom("p"), Formula::atom("q")), make_operator("b", Formula::atom("p"), Formula::atom("q"))],
            Formula::atom("p"),
            Formula::atom("q"),
        );
        let graph = ExecutionGraph::build(&domain, &mut |_: &State| vec![Decision::action("a"), Decision::action("b")]).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.transition_action(START, GOAL), Some("b"));
        assert_eq!(graph.transitions(START, GOAL).map(|t| t.action.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_build_errors() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let domain = flip_domain();
        assert!(matches!(
            ExecutionGraph::build(&domain, &mut |_: &State| vec![Decision::action("jump")]),
            Err(Error::UnknownAction { action, state }) if action == "jump" && state == State::new([1])
        ));

        // `flip` needs `p`, which doesn't hold initially here
        let domain = make_domain(
            ["p", "q"],
            [make_operator("flip", Formula::atom("p"), Formula::and([Formula::atom("q"), Formula::not("p")]))],
            Formula::atom("q"),
            Formula::atom("p"),
        );
        assert!(matches!(
            ExecutionGraph::build(&domain, &mut |_: &State| vec![Decision::action("flip")]),
            Err(Error::Progress { outcome: 1, err: progress::Error::Inapplicable { .. }, .. })
        ));
    }

    #[test]
    fn test_builder_step() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let domain = flip_domain();
        let mut builder = GraphBuilder::new(&domain);
        assert_eq!(builder.pending(), 1);
        assert!(builder.step(&mut |_: &State| vec![Decision::action("flip")]).unwrap());
        assert_eq!(builder.pending(), 0);
        assert_eq!(builder.graph().edge_count(), 1);
        assert!(!builder.step(&mut |_: &State| vec![Decision::action("flip")]).unwrap());
    }
}
