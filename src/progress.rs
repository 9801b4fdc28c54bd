//  PROGRESS.rs
//    by Lut99
//
//  Created:
//    16 Sep 2026, 09:37:55
//  Last edited:
//    05 Oct 2026, 10:48:13
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements state progression, i.e., computing the successor of a
//!   [`State`] after applying a single [`Outcome`].
//

use std::collections::BTreeSet;
use std::error;
use std::fmt::{Display, Formatter, Result as FResult};

use crate::actions::{ConditionalEffect, Outcome};
use crate::fluents::Literal;
use crate::log::{trace, warn};
use crate::state::State;


/***** ERRORS *****/
/// Defines errors that occur when progressing a state.
///
/// These are all internal consistency errors; the caller should never progress with an outcome
/// that isn't applicable.
#[derive(Debug)]
pub enum Error {
    /// The outcome's precondition doesn't hold in the state.
    Inapplicable { outcome: String, missing: BTreeSet<Literal>, forbidden: BTreeSet<Literal>, state: State },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Inapplicable { outcome, missing, forbidden, state } => {
                write!(f, "Failed to progress state {state} with action \"{outcome}\": precondition does not hold")?;
                if !missing.is_empty() {
                    write!(f, " (missing {})", State::new(missing.iter().copied()))?;
                }
                if !forbidden.is_empty() {
                    write!(f, " (forbidden {})", State::new(forbidden.iter().copied()))?;
                }
                Ok(())
            },
        }
    }
}
impl error::Error for Error {}





/***** LIBRARY FUNCTIONS *****/
/// Computes the successor of a state after applying one outcome.
///
/// Every conditional effect whose condition holds in `state` fires. Deletes are applied before
/// adds, so if effects firing together both add and delete the same atom, the add wins. This is
/// logged as a warning.
///
/// # Arguments
/// - `state`: The [`State`] to progress. It is not modified.
/// - `outcome`: The [`Outcome`] to apply.
///
/// # Returns
/// The successor [`State`].
///
/// # Errors
/// This function errors if the outcome's precondition doesn't hold in `state`.
pub fn progress(state: &State, outcome: &Outcome) -> Result<State, Error> {
    if !outcome.is_applicable(state) {
        return Err(Error::Inapplicable {
            outcome:   outcome.name.clone(),
            missing:   outcome.positive_preconditions.iter().filter(|lit| !state.contains(**lit)).copied().collect(),
            forbidden: outcome.negative_preconditions.iter().filter(|lit| state.contains(**lit)).copied().collect(),
            state:     state.clone(),
        });
    }

    // Collect what all the firing effects do
    let mut adds: BTreeSet<Literal> = BTreeSet::new();
    let mut dels: BTreeSet<Literal> = BTreeSet::new();
    for effect in &outcome.effects {
        if !effect.fires(state) {
            continue;
        }
        for lit in &effect.result {
            if *lit < 0 {
                dels.insert(-*lit);
            } else {
                adds.insert(*lit);
            }
        }
    }

    if !adds.is_disjoint(&dels) {
        warn!(
            "Conflicting adds and deletes of {} in action '{}' (keeping the adds)",
            State::new(adds.intersection(&dels).copied()),
            outcome.name
        );
    }

    // Apply them
    let next = State::new(state.literals().difference(&dels).copied().chain(adds));
    trace!("Progressed {state} with '{}' to {next}", outcome.name);
    Ok(next)
}





/***** LIBRARY *****/
// Progression extensions for the [`Outcome`].
impl Outcome {
    /// Checks whether this outcome can be applied in the given state.
    ///
    /// # Arguments
    /// - `state`: The [`State`] to check in.
    ///
    /// # Returns
    /// True if all positive preconditions are in the state and none of the negative ones are.
    #[inline]
    pub fn is_applicable(&self, state: &State) -> bool {
        self.positive_preconditions.is_subset(state.literals()) && self.negative_preconditions.is_disjoint(state.literals())
    }
}

// Progression extensions for the [`ConditionalEffect`].
impl ConditionalEffect {
    /// Checks whether this effect fires in the given state.
    ///
    /// # Arguments
    /// - `state`: The [`State`] to check in.
    ///
    /// # Returns
    /// True if all positive literals of the condition are in the state, and none of the atoms of
    /// the negative ones are.
    #[inline]
    pub fn fires(&self, state: &State) -> bool {
        self.condition.iter().all(|lit| if *lit < 0 { !state.contains(-*lit) } else { state.contains(*lit) })
    }
}





/***** TESTS *****/
