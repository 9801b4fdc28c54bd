//  STATE.rs
//    by Lut99
//
//  Created:
//    15 Sep 2026, 16:02:48
//  Last edited:
//    30 Sep 2026, 12:17:36
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`State`], an immutable set of literals that are true
//!   in some world.
//

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FResult};

use itertools::Itertools as _;

use crate::fluents::{FluentIndex, Literal, GOAL_MARKER};


/***** LIBRARY *****/
/// A world state, i.e., the set of literals true in it.
///
/// States are compared as sets. Because the literals are kept ordered, both equality and hashing
/// are independent of the order in which the literals were given.
///
/// States are never mutated after creation; [progression](crate::progress::progress()) produces new
/// ones instead.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct State {
    /// The literals true in this state.
    literals: BTreeSet<Literal>,
}

// Constructors
impl State {
    /// Constructor for the State.
    ///
    /// # Arguments
    /// - `literals`: The literals that are true in this state. Duplicates are ignored.
    ///
    /// # Returns
    /// A new State.
    #[inline]
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self { Self { literals: literals.into_iter().collect() } }

    /// Returns the synthetic state that stands in for "the goal" in an execution graph.
    ///
    /// It only contains the [`GOAL_MARKER`], which no real state ever does.
    #[inline]
    pub fn goal_marker() -> Self { Self { literals: BTreeSet::from([GOAL_MARKER]) } }
}

// Inspection
impl State {
    /// Returns the literals in this state, in ascending order.
    #[inline]
    pub fn literals(&self) -> &BTreeSet<Literal> { &self.literals }

    /// Returns whether the given literal is true in this state.
    #[inline]
    pub fn contains(&self, lit: Literal) -> bool { self.literals.contains(&lit) }

    /// Returns whether this state satisfies some goal condition.
    ///
    /// # Arguments
    /// - `goal`: The literals that must all be in the state.
    ///
    /// # Returns
    /// True if `goal` is a subset of this state, false otherwise.
    #[inline]
    pub fn is_goal(&self, goal: &BTreeSet<Literal>) -> bool { goal.is_subset(&self.literals) }

    /// Returns whether this is the [synthetic goal state](State::goal_marker()).
    #[inline]
    pub fn is_goal_marker(&self) -> bool { self.literals.contains(&GOAL_MARKER) }

    /// Returns the number of literals in this state.
    #[inline]
    pub fn len(&self) -> usize { self.literals.len() }

    /// Returns whether no literal is true in this state.
    #[inline]
    pub fn is_empty(&self) -> bool { self.literals.is_empty() }

    /// Returns a formatter that writes this state with human-readable fluent names.
    ///
    /// The names are sorted alphabetically and written one per line.
    ///
    /// # Arguments
    /// - `fluents`: The [`FluentIndex`] to resolve literals with.
    #[inline]
    pub fn display<'s>(&'s self, fluents: &'s FluentIndex) -> StateDisplay<'s> { StateDisplay { state: self, fluents } }
}

// Formatting
impl Display for State {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult { write!(f, "{{{}}}", self.literals.iter().join(", ")) }
}



/// Formats a [`State`] with the names found in a [`FluentIndex`].
#[derive(Clone, Copy, Debug)]
pub struct StateDisplay<'s> {
    state:   &'s State,
    fluents: &'s FluentIndex,
}
impl<'s> Display for StateDisplay<'s> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        let names: Vec<String> = self.state.literals.iter().map(|lit| self.fluents.display(*lit).to_string()).sorted().collect();
        write!(f, "{}", names.join("\n"))
    }
}





/***** TESTS *****/
