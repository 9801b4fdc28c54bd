//  PRP.rs
//    by Lut99
//
//  Created:
//    17 Sep 2026, 13:58:21
//  Last edited:
//    08 Oct 2026, 15:10:09
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements a [`Policy`] read from the rule-based format emitted by PRP
//!   (after translating its SAS+ variables back to ground atoms).
//!
//!   # Syntax
//!   ```plain
//!   If holds: at(l1)/not(broken)
//!   Execute: move l1 l2 / SC / d=3
//!   ```
//!   Rules are tried in order; the first one whose condition holds decides.
//!   Anything after the first `/` on an `Execute:`-line is annotation and
//!   ignored, as are lines that are neither.
//

use std::collections::BTreeSet;
use std::error;
use std::fmt::{Display, Formatter, Result as FResult};
use std::path::{Path, PathBuf};

use super::{Decision, LoadPolicy, Policy};
use crate::fluents::{FluentIndex, Literal};
use crate::log::{debug, trace};
use crate::state::State;


/***** CONSTANTS *****/
/// The prefix of condition lines.
const CONDITION_PREFIX: &str = "If holds:";
/// The prefix of action lines.
const EXECUTE_PREFIX: &str = "Execute:";





/***** ERRORS *****/
/// Defines errors that occur when loading a [`RulePolicy`].
#[derive(Debug)]
pub enum Error {
    /// Failed to read the policy file.
    Read { path: PathBuf, err: std::io::Error },
    /// A condition refers to a fluent the task doesn't have.
    UnknownFluent { line: usize, fluent: String },
    /// A condition wasn't followed by an action.
    MissingExecute { line: usize },
    /// An action wasn't preceded by a condition.
    DanglingExecute { line: usize },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Read { path, .. } => write!(f, "Failed to read policy file '{}'", path.display()),
            Self::UnknownFluent { line, fluent } => write!(f, "Line {line}: unknown fluent \"{fluent}\""),
            Self::MissingExecute { line } => write!(f, "Line {line}: condition is not followed by an \"{EXECUTE_PREFIX}\"-line"),
            Self::DanglingExecute { line } => write!(f, "Line {line}: action is not preceded by an \"{CONDITION_PREFIX}\"-line"),
        }
    }
}
impl error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Read { err, .. } => Some(err),
            Self::UnknownFluent { .. } | Self::MissingExecute { .. } | Self::DanglingExecute { .. } => None,
        }
    }
}





/***** AUXILLARY *****/
/// A single condition/action pair.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    /// The literals that must hold. Negative literals require their atom to be absent.
    pub condition: BTreeSet<Literal>,
    /// What to do if it does.
    pub decision:  Decision,
}
impl Rule {
    /// Checks whether this rule's condition holds in the given state.
    #[inline]
    pub fn matches(&self, state: &State) -> bool {
        self.condition.iter().all(|lit| if *lit < 0 { !state.contains(-*lit) } else { state.contains(*lit) })
    }
}





/***** LIBRARY *****/
/// A policy given as an ordered list of condition/action [`Rule`]s.
#[derive(Clone, Debug, Default)]
pub struct RulePolicy {
    /// The rules, in order of priority.
    rules: Vec<Rule>,
}

// Constructors
impl RulePolicy {
    /// Constructor for the RulePolicy from a list of rules.
    #[inline]
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self { Self { rules: rules.into_iter().collect() } }

    /// Parses a RulePolicy from text.
    ///
    /// # Arguments
    /// - `source`: The policy text.
    /// - `fluents`: The [`FluentIndex`] to resolve condition fluents with.
    ///
    /// # Returns
    /// A new RulePolicy.
    ///
    /// # Errors
    /// This function errors if a condition mentions an unknown fluent, or if conditions and
    /// actions don't alternate properly.
    pub fn parse(source: &str, fluents: &FluentIndex) -> Result<Self, Error> {
        let mut rules: Vec<Rule> = Vec::new();
        let mut pending: Option<(usize, BTreeSet<Literal>)> = None;
        for (i, line) in source.lines().enumerate() {
            let line: &str = line.trim();
            if let Some(cond) = line.strip_prefix(CONDITION_PREFIX) {
                if let Some((line, _)) = pending {
                    return Err(Error::MissingExecute { line });
                }

                let mut condition: BTreeSet<Literal> = BTreeSet::new();
                for fluent in cond.split('/').map(str::trim).filter(|f| !f.is_empty()) {
                    match fluents.literal(fluent) {
                        Some(lit) => {
                            condition.insert(lit);
                        },
                        None => return Err(Error::UnknownFluent { line: i + 1, fluent: fluent.into() }),
                    }
                }
                pending = Some((i + 1, condition));
            } else if let Some(action) = line.strip_prefix(EXECUTE_PREFIX) {
                let condition: BTreeSet<Literal> = match pending.take() {
                    Some((_, condition)) => condition,
                    None => return Err(Error::DanglingExecute { line: i + 1 }),
                };
                let action: &str = action.split('/').next().unwrap_or("");
                rules.push(Rule { condition, decision: Decision::from_name(action) });
            }
        }
        if let Some((line, _)) = pending {
            return Err(Error::MissingExecute { line });
        }

        debug!("Loaded policy with {} rule(s)", rules.len());
        Ok(Self { rules })
    }
}

// Inspection
impl RulePolicy {
    /// Returns the rules of this policy, in order of priority.
    #[inline]
    pub fn rules(&self) -> &[Rule] { &self.rules }

    /// Returns the first rule that matches the given state, if any.
    #[inline]
    pub fn find(&self, state: &State) -> Option<&Rule> { self.rules.iter().find(|rule| rule.matches(state)) }
}

// Policy
impl Policy for RulePolicy {
    fn next_actions(&mut self, state: &State) -> Vec<Decision> {
        match self.find(state) {
            Some(rule) => {
                trace!("Policy decides '{}' for {state}", rule.decision);
                vec![rule.decision.clone()]
            },
            None => {
                trace!("Policy has no rule for {state}");
                vec![Decision::Unhandled]
            },
        }
    }
}
impl LoadPolicy for RulePolicy {
    type Error = Error;

    #[inline]
    fn load(path: impl AsRef<Path>, fluents: &FluentIndex) -> Result<Self, Self::Error> {
        let path: &Path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(source) => Self::parse(&source, fluents),
            Err(err) => Err(Error::Read { path: path.into(), err }),
        }
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;


    fn index() -> FluentIndex { FluentIndex::from_atoms(["at(l1)", "at(l2)", "broken"]).unwrap() }

    #[test]
    fn test_rule_policy_parse() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let policy = RulePolicy::parse(
            "
            If holds: at(l1)/not(broken)
            Execute: move l1 l2 / SC / d=2

            If holds: at(l2)
            Execute: goal

            If holds:
            Execute: fix_
            ",
            &index(),
        )
        .unwrap();
        assert_eq!(policy.rules(), &[
            Rule { condition: BTreeSet::from([1, -3]), decision: Decision::action("move_l1_l2") },
            Rule { condition: BTreeSet::from([2]), decision: Decision::Goal },
            Rule { condition: BTreeSet::new(), decision: Decision::action("fix") },
        ]);
    }

    #[test]
    fn test_rule_policy_next_actions() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let mut policy = RulePolicy::new([
            Rule { condition: BTreeSet::from([1, -3]), decision: Decision::action("move") },
            Rule { condition: BTreeSet::from([3]), decision: Decision::action("fix") },
        ]);
        assert_eq!(policy.next_actions(&State::new([1])), vec![Decision::action("move")]);
        assert_eq!(policy.next_actions(&State::new([1, 3])), vec![Decision::action("fix")]);
        assert_eq!(policy.next_actions(&State::new([2])), vec![Decision::Unhandled]);
    }

    #[test]
    fn test_rule_policy_errors() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let fluents = index();
        assert!(matches!(
            RulePolicy::parse("If holds: at(l3)\nExecute: a", &fluents),
            Err(Error::UnknownFluent { line: 1, fluent }) if fluent == "at(l3)"
        ));
        assert!(matches!(RulePolicy::parse("If holds: at(l1)\nIf holds: at(l2)\nExecute: a", &fluents), Err(Error::MissingExecute { line: 1 })));
        assert!(matches!(RulePolicy::parse("If holds: at(l1)\nExecute: a\nIf holds: at(l2)", &fluents), Err(Error::MissingExecute { line: 3 })));
        assert!(matches!(RulePolicy::parse("\nExecute: a", &fluents), Err(Error::DanglingExecute { line: 2 })));
        assert!(matches!(RulePolicy::load("/definitely/not/a/policy.out", &fluents), Err(Error::Read { .. })));
    }

    #[cfg(all(feature = "prp", feature = "serde"))]
    #[test]
    fn test_rule_policy_validates_task() {
        use crate::analysis::{analyse, Report};
        use crate::domain::Domain;
        use crate::graph::{ExecutionGraph, GOAL, START};
        use crate::plans::{shortest_plans, Plan};
        use crate::task::GroundTask;

        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        // Picking up may slip, after which we're back where we started
        let task = GroundTask::from_json(
            "<test>",
            r#"{
                "atoms": ["ontable(a)", "holding(a)", "on(a,b)"],
                "operators": [
                    {
                        "name": "Pick-Up_A_B_",
                        "precondition": { "atom": "ontable(a)" },
                        "effect": { "one_of": [
                            { "and": [{ "atom": "holding(a)" }, { "not": { "atom": "ontable(a)" } }] },
                            { "atom": "ontable(a)" }
                        ] }
                    },
                    {
                        "name": "stack_a_b",
                        "precondition": { "atom": "holding(a)" },
                        "effect": { "and": [{ "atom": "on(a,b)" }, { "not": { "atom": "holding(a)" } }] }
                    }
                ],
                "init": { "atom": "ontable(a)" },
                "goal": { "atom": "on(a,b)" }
            }"#,
        )
        .unwrap();
        let domain = Domain::new(&task).unwrap();
        let mut policy = RulePolicy::parse(
            "If holds: ontable(a)\n\
             Execute: pick-up a b / SC / d=2\n\
             \n\
             If holds: holding(a)/not(on(a,b))\n\
             Execute: stack a b / SC / d=1\n",
            domain.fluents(),
        )
        .unwrap();

        let graph = ExecutionGraph::build(&domain, &mut policy).unwrap();
        assert_eq!(analyse(&graph), Report { nodes: 3, edges: 3, unhandled: 0, strong: false, strong_cyclic: true });
        assert_eq!(graph.transition_action(START, START), Some("pick-up_a_b"));
        assert_eq!(shortest_plans(&graph), vec![Plan { path: vec![START, 3, GOAL], actions: vec!["pick-up_a_b".into(), "stack_a_b".into()] }]);
    }
}
