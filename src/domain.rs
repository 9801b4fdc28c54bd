//  DOMAIN.rs
//    by Lut99
//
//  Created:
//    16 Sep 2026, 14:21:09
//  Last edited:
//    06 Oct 2026, 09:40:27
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`Domain`], the context that holds everything about a
//!   grounded task that stays fixed during validation.
//

use std::collections::BTreeSet;
use std::error;
use std::fmt::{Display, Formatter, Result as FResult};

use crate::actions::{self, convert_conjunction, ActionModel, FormulaError};
use crate::fluents::{self, FluentIndex, Literal};
use crate::log::debug;
use crate::state::State;
use crate::task::GroundTask;


/***** ERRORS *****/
/// Defines errors that occur when building a [`Domain`].
#[derive(Debug)]
pub enum Error {
    /// Failed to index the task's atoms.
    Fluents { err: fluents::Error },
    /// Failed to convert the task's operators.
    Actions { err: actions::Error },
    /// Failed to convert the initial state.
    Init { err: FormulaError },
    /// Failed to convert the goal condition.
    Goal { err: FormulaError },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Fluents { .. } => write!(f, "Failed to index ground atoms"),
            Self::Actions { .. } => write!(f, "Failed to build action model"),
            Self::Init { .. } => write!(f, "Failed to convert initial state"),
            Self::Goal { .. } => write!(f, "Failed to convert goal condition"),
        }
    }
}
impl error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Fluents { err } => Some(err),
            Self::Actions { err } => Some(err),
            Self::Init { err } => Some(err),
            Self::Goal { err } => Some(err),
        }
    }
}
impl From<fluents::Error> for Error {
    #[inline]
    fn from(value: fluents::Error) -> Self { Self::Fluents { err: value } }
}
impl From<actions::Error> for Error {
    #[inline]
    fn from(value: actions::Error) -> Self { Self::Actions { err: value } }
}





/***** LIBRARY *****/
/// Everything about a planning task that is fixed for the duration of a validation run.
///
/// This is built once from a [`GroundTask`] and then only read. It is the context that is passed
/// to the [`GraphBuilder`](crate::graph::GraphBuilder); nothing in the validator keeps global state.
#[derive(Clone, Debug)]
pub struct Domain {
    /// Maps atoms to literals and back.
    fluents: FluentIndex,
    /// The task's actions.
    actions: ActionModel,
    /// The state to start in.
    init:    State,
    /// The literals that must hold in a goal state.
    goal:    BTreeSet<Literal>,
}

// Constructors
impl Domain {
    /// Constructor for the Domain from its parts.
    ///
    /// # Arguments
    /// - `fluents`: The [`FluentIndex`] of the task.
    /// - `actions`: The [`ActionModel`] of the task (built against `fluents`).
    /// - `init`: The initial [`State`].
    /// - `goal`: The goal condition.
    ///
    /// # Returns
    /// A new Domain.
    #[inline]
    pub fn from_parts(fluents: FluentIndex, actions: ActionModel, init: State, goal: impl IntoIterator<Item = Literal>) -> Self {
        Self { fluents, actions, init, goal: goal.into_iter().collect() }
    }

    /// Builds a Domain out of a grounded task.
    ///
    /// # Arguments
    /// - `task`: The [`GroundTask`] produced by a grounder.
    ///
    /// # Returns
    /// A new Domain.
    ///
    /// # Errors
    /// This function errors if the task's atoms contain duplicates, or if any of its formulas has
    /// a shape we don't support or mentions atoms the task doesn't list.
    pub fn new(task: &GroundTask) -> Result<Self, Error> {
        let fluents: FluentIndex = FluentIndex::from_atoms(&task.atoms)?;
        let actions: ActionModel = ActionModel::from_operators(&fluents, &task.operators)?;
        let init: State = State::new(convert_conjunction(&fluents, &task.init).map_err(|err| Error::Init { err })?);
        let goal: Vec<Literal> = convert_conjunction(&fluents, &task.goal).map_err(|err| Error::Goal { err })?;
        debug!("Built domain with {} atom(s), {} action(s), {} init literal(s) and {} goal literal(s)", fluents.len(), actions.len(), init.len(), goal.len());
        Ok(Self::from_parts(fluents, actions, init, goal))
    }
}

// Accessors
impl Domain {
    /// Returns the [`FluentIndex`] of this domain.
    #[inline]
    pub fn fluents(&self) -> &FluentIndex { &self.fluents }

    /// Returns the [`ActionModel`] of this domain.
    #[inline]
    pub fn actions(&self) -> &ActionModel { &self.actions }

    /// Returns the initial [`State`].
    #[inline]
    pub fn init(&self) -> &State { &self.init }

    /// Returns the goal condition.
    #[inline]
    pub fn goal(&self) -> &BTreeSet<Literal> { &self.goal }
}





/***** TESTS *****/
