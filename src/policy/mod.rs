//  MOD.rs
//    by Lut99
//
//  Created:
//    17 Sep 2026, 10:11:40
//  Last edited:
//    08 Oct 2026, 15:02:33
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the interface to the policies we validate.
//!
//!   The validator does not care how a policy is represented; it only asks
//!   it what to do in every state it discovers. See [`Policy`].
//

// Nested modules
#[cfg(feature = "prp")]
pub mod prp;

// Imports
use std::error;
use std::fmt::{Display, Formatter, Result as FResult};
use std::path::Path;

use enum_debug::EnumDebug;

use crate::actions::normalize_action_name;
use crate::fluents::FluentIndex;
use crate::state::State;


/***** AUXILLARY *****/
/// What a policy decides to do in some state.
#[derive(Clone, Debug, EnumDebug, Eq, Hash, PartialEq)]
pub enum Decision {
    /// Execute the action with the given (normalised) name.
    Action(String),
    /// The policy declares the state a goal state. Nothing is executed.
    Goal,
    /// The policy has nothing to say about this state.
    Unhandled,
}
impl Decision {
    /// Interprets the textual answer of some policy.
    ///
    /// # Arguments
    /// - `name`: The name to interpret. Whitespace-separated words are joined with underscores
    ///   (`pick-up a b` becomes `pick-up_a_b`), and the result is normalised like operator names.
    ///
    /// # Returns
    /// [`Decision::Unhandled`] for an empty name, [`Decision::Goal`] for `goal` (in any casing), or
    /// else a [`Decision::Action`].
    pub fn from_name(name: &str) -> Self {
        let words: Vec<&str> = name.split_whitespace().collect();
        if words.is_empty() {
            Self::Unhandled
        } else if words.len() == 1 && words[0].eq_ignore_ascii_case("goal") {
            Self::Goal
        } else {
            Self::Action(normalize_action_name(&words.join("_")))
        }
    }

    /// Convenience constructor for a [`Decision::Action`] that does _not_ normalise the name.
    #[inline]
    pub fn action(name: impl Into<String>) -> Self { Self::Action(name.into()) }
}
impl Display for Decision {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Action(name) => write!(f, "{name}"),
            Self::Goal => write!(f, "<goal>"),
            Self::Unhandled => write!(f, "<unhandled>"),
        }
    }
}





/***** LIBRARY *****/
/// Something that decides what to do in a given state.
///
/// This is all the [`GraphBuilder`](crate::graph::GraphBuilder) knows about a policy. It's called
/// exactly once per discovered state.
///
/// It's implemented for closures, which is convenient for one-off policies:
/// ```rust
/// use fond_validator::policy::{Decision, Policy};
/// use fond_validator::state::State;
///
/// let mut always_flip = |_: &State| vec![Decision::action("flip")];
/// assert_eq!(always_flip.next_actions(&State::new([1])), vec![Decision::action("flip")]);
/// ```
pub trait Policy {
    /// Decides what to do in the given state.
    ///
    /// # Arguments
    /// - `state`: The [`State`] to decide for.
    ///
    /// # Returns
    /// The candidate [`Decision`]s for this state, in order. Returning nothing means the state is
    /// unhandled.
    fn next_actions(&mut self, state: &State) -> Vec<Decision>;
}

// Closures are policies too
impl<F: FnMut(&State) -> Vec<Decision>> Policy for F {
    #[inline]
    fn next_actions(&mut self, state: &State) -> Vec<Decision> { (self)(state) }
}



/// A [`Policy`] that can be loaded from a file.
pub trait LoadPolicy: Sized + Policy {
    /// The error returned when loading fails.
    type Error: 'static + error::Error;


    /// Loads the policy.
    ///
    /// # Arguments
    /// - `path`: The path to the file describing the policy.
    /// - `fluents`: The [`FluentIndex`] of the task the policy is for, to resolve fluents with.
    ///
    /// # Returns
    /// A new instance of Self.
    ///
    /// # Errors
    /// This function errors if the file could not be read or is not a valid policy.
    fn load(path: impl AsRef<Path>, fluents: &FluentIndex) -> Result<Self, Self::Error>;
}





/***** TESTS *****/
