//  TESTS.rs
//    by Lut99
//
//  Created:
//    15 Sep 2026, 14:02:31
//  Last edited:
//    09 Oct 2026, 10:44:18
//  Auto updated?
//    Yes
//
//  Description:
//!   Contains some common test functions.
//

#![allow(unused)]

use std::collections::{BTreeSet, HashMap};

use crate::actions::{ConditionalEffect, Outcome};
use crate::domain::Domain;
use crate::fluents::Literal;
use crate::policy::Decision;
use crate::state::State;
use crate::task::{Formula, GroundOperator, GroundTask};


/***** LIBRARY *****/
/// Sets up a logger if wanted.
#[cfg(feature = "log")]
pub fn setup_logger() {
    use humanlog::{DebugMode, HumanLogger};

    // Check if the envs tell us to
    if let Ok(logger) = std::env::var("LOGGER") {
        if logger == "1" || logger == "true" {
            // Create the logger
            if let Err(err) = HumanLogger::terminal(DebugMode::Full).init() {
                eprintln!("WARNING: Failed to setup logger: {err} (no logging for this session)");
            }
        }
    }
}



/// Makes a [`GroundOperator`] conveniently.
pub fn make_operator(name: &'static str, precondition: Formula, effect: Formula) -> GroundOperator {
    GroundOperator { name: name.into(), precondition, effect }
}

/// Makes a [`GroundTask`] conveniently.
pub fn make_task(
    atoms: impl IntoIterator<Item = &'static str>,
    operators: impl IntoIterator<Item = GroundOperator>,
    init: Formula,
    goal: Formula,
) -> GroundTask {
    GroundTask { atoms: atoms.into_iter().map(String::from).collect(), operators: operators.into_iter().collect(), init, goal }
}

/// Makes a [`Domain`] conveniently.
#[track_caller]
pub fn make_domain(
    atoms: impl IntoIterator<Item = &'static str>,
    operators: impl IntoIterator<Item = GroundOperator>,
    init: Formula,
    goal: Formula,
) -> Domain {
    match Domain::new(&make_task(atoms, operators, init, goal)) {
        Ok(domain) => domain,
        Err(err) => panic!("Failed to build test domain: {err}"),
    }
}

/// Makes an [`Outcome`] conveniently.
pub fn make_outcome(
    name: &'static str,
    precondition: impl IntoIterator<Item = Literal>,
    effects: impl IntoIterator<Item = ConditionalEffect>,
) -> Outcome {
    Outcome::new(name, precondition, effects.into_iter().collect())
}

/// Makes a [`ConditionalEffect`] conveniently.
pub fn make_effect(condition: impl IntoIterator<Item = Literal>, result: impl IntoIterator<Item = Literal>) -> ConditionalEffect {
    ConditionalEffect { condition: condition.into_iter().collect(), result: result.into_iter().collect() }
}



/// Makes a policy that answers from a fixed script.
///
/// Every entry maps a state, given as its space-separated true atoms, to the action names to
/// answer with. States not in the script get no answer.
#[track_caller]
pub fn scripted(
    domain: &Domain,
    script: impl IntoIterator<Item = (&'static str, Vec<&'static str>)>,
) -> impl FnMut(&State) -> Vec<Decision> {
    let mut answers: HashMap<State, Vec<Decision>> = HashMap::new();
    for (state, actions) in script {
        let state: State = State::new(
            state.split_whitespace().map(|atom| domain.fluents().literal(atom).unwrap_or_else(|| panic!("Unknown atom '{atom}' in script"))),
        );
        answers.insert(state, actions.into_iter().map(Decision::from_name).collect());
    }
    move |state: &State| answers.get(state).cloned().unwrap_or_default()
}



/// The domain where `flip` turns `p` into `q`, which is the goal.
pub fn flip_domain() -> Domain {
    make_domain(
        ["p", "q"],
        [make_operator("flip_", Formula::atom("p"), Formula::and([Formula::atom("q"), Formula::not("p")]))],
        Formula::atom("p"),
        Formula::atom("q"),
    )
}

/// The domain where `toss` either changes nothing or achieves the goal `q`.
pub fn toss_domain() -> Domain {
    make_domain(
        ["p", "q"],
        [make_operator("toss", Formula::atom("p"), Formula::one_of([Formula::atom("p"), Formula::atom("q")]))],
        Formula::atom("p"),
        Formula::atom("q"),
    )
}

/// The domain where `try` either achieves the goal `g` or breaks things (`b`) beyond repair.
///
/// `wait` is applicable anywhere but does nothing.
pub fn dead_end_domain() -> Domain {
    make_domain(
        ["p", "b", "g"],
        [
            make_operator("try", Formula::and([Formula::atom("p"), Formula::not("b")]), Formula::one_of([Formula::atom("g"), Formula::atom("b")])),
            make_operator("wait", Formula::and([]), Formula::and([])),
        ],
        Formula::atom("p"),
        Formula::atom("g"),
    )
}

/// The domain where `left` and `right` both lead from `a` to the goal, either directly or via `b`.
///
/// ```plain
/// a --left(1)--> g
/// a --left(2)--> b --fwd--> g
/// a --right---> b
/// ```
pub fn diamond_domain() -> Domain {
    make_domain(
        ["a", "b", "g"],
        [
            make_operator(
                "left",
                Formula::atom("a"),
                Formula::one_of([Formula::atom("g"), Formula::and([Formula::atom("b"), Formula::not("a")])]),
            ),
            make_operator("right", Formula::atom("a"), Formula::and([Formula::atom("b"), Formula::not("a")])),
            make_operator("fwd", Formula::atom("b"), Formula::atom("g")),
        ],
        Formula::atom("a"),
        Formula::atom("g"),
    )
}
