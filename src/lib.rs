//  LIB.rs
//    by Lut99
//
//  Created:
//    14 Sep 2026, 09:51:44
//  Last edited:
//    09 Oct 2026, 11:23:05
//  Auto updated?
//    Yes
//
//  Description:
//!   A validator for policies produced by FOND (Fully Observable
//!   Non-Deterministic) planners.
//!
//!   Given a grounded planning task and a policy, the validator simulates
//!   the policy over _every_ non-deterministic outcome of the actions it
//!   picks. This yields an execution graph, which is then classified as
//!   _strong_ (no cycles) and/or _strong-cyclic_ (every reachable state can
//!   still reach the goal). Plans realizing the policy can be extracted from
//!   the same graph.
//!
//!   The typical flow is:
//!   1. Obtain a [`GroundTask`](task::GroundTask) from some grounder;
//!   2. Build a [`Domain`](domain::Domain) out of it;
//!   3. Run some [`Policy`](policy::Policy) over it with
//!      [`ExecutionGraph::build()`](graph::ExecutionGraph::build()); and
//!   4. [`analyse()`](analysis::analyse()) the graph or extract its
//!      [plans](plans).
//

// Declare modules
pub mod actions;
pub mod analysis;
pub mod artifacts;
pub mod domain;
pub mod fluents;
pub mod graph;
mod log;
pub mod plans;
pub mod policy;
pub mod progress;
pub mod state;
pub mod task;
#[cfg(test)]
mod tests;
