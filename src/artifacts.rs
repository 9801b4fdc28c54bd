//  ARTIFACTS.rs
//    by Lut99
//
//  Created:
//    22 Sep 2026, 11:15:48
//  Last edited:
//    09 Oct 2026, 10:20:33
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the human-readable dumps produced next to a validation: the
//!   action mapping, the unhandled states and the graph in Graphviz' DOT.
//

use std::fmt::{Display, Formatter, Result as FResult};

use itertools::Itertools as _;
use petgraph::dot::Dot;

use crate::actions::{ActionModel, ConditionalEffect};
use crate::fluents::{FluentIndex, Literal};
use crate::graph::ExecutionGraph;


/***** FORMATTERS *****/
/// Formats the action mapping of an [`ActionModel`].
///
/// Every action is written as a header line with its name, followed by one line per outcome listing
/// its effects as `[condition] -> [result]`.
#[derive(Clone, Copy, Debug)]
pub struct ActionMapping<'a> {
    /// The model to format.
    model:   &'a ActionModel,
    /// Resolves literals to names.
    fluents: &'a FluentIndex,
}
impl<'a> ActionMapping<'a> {
    /// Writes a list of literals as `[a, not(b)]`.
    fn write_literals<'l>(&self, f: &mut Formatter<'_>, lits: impl IntoIterator<Item = &'l Literal>) -> FResult {
        write!(f, "[{}]", lits.into_iter().map(|lit| self.fluents.display(*lit)).join(", "))
    }

    /// Writes a single effect.
    fn write_effect(&self, f: &mut Formatter<'_>, effect: &ConditionalEffect) -> FResult {
        self.write_literals(f, &effect.condition)?;
        write!(f, " -> ")?;
        self.write_literals(f, &effect.result)
    }
}
impl<'a> Display for ActionMapping<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        for (name, outcomes) in self.model.iter() {
            writeln!(f)?;
            writeln!(f, "{name}:")?;
            for (i, outcome) in outcomes.iter().enumerate() {
                write!(f, "{}: ", i + 1)?;
                for (j, effect) in outcome.effects.iter().enumerate() {
                    if j > 0 {
                        write!(f, " / ")?;
                    }
                    self.write_effect(f, effect)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}



/// Formats the unhandled states of an [`ExecutionGraph`].
///
/// Every state is written as its true atoms, one per line, separated from the previous one by an
/// empty line.
#[derive(Clone, Copy, Debug)]
pub struct UnhandledStates<'a> {
    /// The graph with the states.
    graph:   &'a ExecutionGraph,
    /// Resolves literals to names.
    fluents: &'a FluentIndex,
}
impl<'a> Display for UnhandledStates<'a> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        for state in self.graph.unhandled() {
            write!(f, "\n{}\n", state.display(self.fluents))?;
        }
        Ok(())
    }
}





/***** LIBRARY FUNCTIONS *****/
/// Returns a formatter for the unhandled states of a graph.
///
/// # Arguments
/// - `graph`: The [`ExecutionGraph`] to list the unhandled states of.
/// - `fluents`: The [`FluentIndex`] to resolve the states' literals with.
///
/// # Returns
/// An [`UnhandledStates`] that implements [`Display`].
#[inline]
pub fn unhandled_states<'a>(graph: &'a ExecutionGraph, fluents: &'a FluentIndex) -> UnhandledStates<'a> { UnhandledStates { graph, fluents } }





/***** LIBRARY *****/
impl ActionModel {
    /// Returns a formatter for the action mapping of this model.
    ///
    /// # Arguments
    /// - `fluents`: The [`FluentIndex`] to resolve the effects' literals with.
    ///
    /// # Returns
    /// An [`ActionMapping`] that implements [`Display`].
    #[inline]
    pub fn mapping<'a>(&'a self, fluents: &'a FluentIndex) -> ActionMapping<'a> { ActionMapping { model: self, fluents } }
}

impl ExecutionGraph {
    /// Renders this graph in Graphviz' DOT.
    ///
    /// Nodes are labelled `s0` (start), `G` (goal) or with their id. Edges are labelled with their
    /// [`Transition`](crate::graph::Transition).
    #[inline]
    pub fn to_dot(&self) -> String { format!("{}", Dot::with_config(self.graph(), &[])) }
}





/***** TESTS *****/
