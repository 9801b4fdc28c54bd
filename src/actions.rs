//  ACTIONS.rs
//    by Lut99
//
//  Created:
//    15 Sep 2026, 13:44:10
//  Last edited:
//    07 Oct 2026, 17:30:52
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`ActionModel`], which decomposes grounded,
//!   non-deterministic operators into deterministic [`Outcome`]s.
//!
//!   Every outcome is a precondition (split in a positive and negative part)
//!   and a list of [`ConditionalEffect`]s. Unconditional effects are simply
//!   conditional effects with an empty condition.
//

use std::collections::BTreeSet;
use std::error;
use std::fmt::{Display, Formatter, Result as FResult};

use enum_debug::EnumDebug as _;
use indexmap::IndexMap;

use crate::fluents::{FluentIndex, Literal};
use crate::log::{debug, trace};
use crate::task::{Formula, GroundOperator};


/***** ERRORS *****/
/// Defines problems with converting a single [`Formula`].
#[derive(Debug)]
pub enum FormulaError {
    /// The formula was used as an effect, but has a shape we don't support there.
    UnsupportedEffect { formula: Formula },
    /// The formula was used as a conjunction of literals, but has a shape we don't support there.
    UnsupportedConjunction { formula: Formula },
    /// The formula refers to an atom that the grounder did not list.
    UnknownAtom { atom: String },
}
impl Display for FormulaError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::UnsupportedEffect { formula } => {
                write!(f, "Unsupported effect shape '{:?}' in \"{formula}\" (expected a literal, a conjunction or a when-clause)", formula.variant())
            },
            Self::UnsupportedConjunction { formula } => {
                write!(f, "Unsupported conjunction shape '{:?}' in \"{formula}\" (expected a literal or a conjunction of literals)", formula.variant())
            },
            Self::UnknownAtom { atom } => write!(f, "Unknown ground atom \"{atom}\""),
        }
    }
}
impl error::Error for FormulaError {}

/// Defines errors that occur when building an [`ActionModel`].
#[derive(Debug)]
pub enum Error {
    /// Two operators normalised to the same action name.
    DuplicateAction { name: String },
    /// The operator's effect flattened to no outcomes at all (e.g., an empty `oneof`).
    NoOutcomes { name: String },
    /// Failed to convert the operator's precondition.
    Precondition { name: String, err: FormulaError },
    /// Failed to convert one of the operator's outcomes.
    Effect { name: String, outcome: usize, err: FormulaError },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::DuplicateAction { name } => write!(f, "Action \"{name}\" is defined more than once"),
            Self::NoOutcomes { name } => write!(f, "Action \"{name}\" has no outcomes"),
            Self::Precondition { name, .. } => write!(f, "Failed to convert precondition of action \"{name}\""),
            Self::Effect { name, outcome, .. } => write!(f, "Failed to convert outcome {outcome} of action \"{name}\""),
        }
    }
}
impl error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::DuplicateAction { .. } | Self::NoOutcomes { .. } => None,
            Self::Precondition { err, .. } => Some(err),
            Self::Effect { err, .. } => Some(err),
        }
    }
}





/***** HELPER FUNCTIONS *****/
/// Resolves a single literal formula to its [`Literal`].
fn literal(fluents: &FluentIndex, formula: &Formula) -> Option<Result<Literal, FormulaError>> {
    let text: String = formula.as_literal()?;
    Some(fluents.literal(&text).ok_or(FormulaError::UnknownAtom { atom: text }))
}

/// Adds a formula to a conjunction, splicing it in if it's a conjunction itself.
fn push_conjunct(conj: &mut Vec<Formula>, formula: Formula) {
    match formula {
        Formula::And(args) => conj.extend(args),
        other => conj.push(other),
    }
}

/// Flattens the non-determinism out of an effect.
///
/// # Arguments
/// - `effect`: The (possibly non-deterministic) effect to flatten.
///
/// # Returns
/// A list of deterministic effects, one per possible outcome, in declaration order.
fn flatten(effect: &Formula) -> Vec<Formula> {
    match effect {
        Formula::OneOf(alts) => alts.iter().flat_map(flatten).collect(),
        Formula::And(args) => {
            // Every conjunct may be non-deterministic itself, so build the cartesian product
            let mut branches: Vec<Vec<Formula>> = vec![Vec::new()];
            for arg in args {
                let alts: Vec<Formula> = flatten(arg);
                branches = branches
                    .iter()
                    .flat_map(|branch| {
                        alts.iter().map(move |alt| {
                            let mut branch: Vec<Formula> = branch.clone();
                            push_conjunct(&mut branch, alt.clone());
                            branch
                        })
                    })
                    .collect();
            }
            branches.into_iter().map(Formula::And).collect()
        },
        other => vec![other.clone()],
    }
}





/***** LIBRARY FUNCTIONS *****/
/// Normalises an operator name to the action name used throughout the validator.
///
/// Grounders tend to emit zero-argument operators as `name_`, so a single trailing underscore is
/// removed. The result is lower-cased.
///
/// # Arguments
/// - `name`: The name to normalise.
///
/// # Returns
/// The normalised name.
#[inline]
pub fn normalize_action_name(name: &str) -> String { name.strip_suffix('_').unwrap_or(name).to_lowercase() }

/// Converts a formula that must be a (possibly singleton) conjunction of literals.
///
/// Equality constraints in the conjunction are skipped.
///
/// # Arguments
/// - `fluents`: The [`FluentIndex`] to resolve atoms with.
/// - `formula`: The [`Formula`] to convert.
///
/// # Returns
/// The literals in the conjunction, in order.
///
/// # Errors
/// This function errors if the formula is not a conjunction of literals, or if it mentions atoms
/// not in `fluents`.
pub fn convert_conjunction(fluents: &FluentIndex, formula: &Formula) -> Result<Vec<Literal>, FormulaError> {
    if let Some(lit) = literal(fluents, formula) {
        return Ok(vec![lit?]);
    }
    match formula {
        Formula::And(args) => args
            .iter()
            .filter(|arg| !arg.is_equality())
            .map(|arg| match literal(fluents, arg) {
                Some(lit) => lit,
                None => Err(FormulaError::UnsupportedConjunction { formula: arg.clone() }),
            })
            .collect(),
        other => Err(FormulaError::UnsupportedConjunction { formula: other.clone() }),
    }
}

/// Converts a single effect clause into a [`ConditionalEffect`].
fn convert_clause(fluents: &FluentIndex, clause: &Formula) -> Result<ConditionalEffect, FormulaError> {
    if let Some(lit) = literal(fluents, clause) {
        return Ok(ConditionalEffect { condition: BTreeSet::new(), result: BTreeSet::from([lit?]) });
    }
    match clause {
        Formula::When { condition, result } => Ok(ConditionalEffect {
            condition: convert_conjunction(fluents, condition)?.into_iter().collect(),
            result:    convert_conjunction(fluents, result)?.into_iter().collect(),
        }),
        other => Err(FormulaError::UnsupportedEffect { formula: other.clone() }),
    }
}

/// Converts a deterministic effect into a list of [`ConditionalEffect`]s.
///
/// # Arguments
/// - `fluents`: The [`FluentIndex`] to resolve atoms with.
/// - `effect`: The [`Formula`] to convert. Must be a literal, a when-clause or a conjunction of
///   those.
///
/// # Returns
/// The conditional effects, in order.
///
/// # Errors
/// This function errors if the effect has any other shape, or if it mentions unknown atoms.
pub fn convert_effect(fluents: &FluentIndex, effect: &Formula) -> Result<Vec<ConditionalEffect>, FormulaError> {
    match effect {
        Formula::And(args) => args.iter().filter(|arg| !arg.is_equality()).map(|arg| convert_clause(fluents, arg)).collect(),
        other => Ok(vec![convert_clause(fluents, other)?]),
    }
}





/***** LIBRARY *****/
/// An effect that only fires if its condition holds.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ConditionalEffect {
    /// The literals that must hold for the effect to fire. Empty for unconditional effects.
    pub condition: BTreeSet<Literal>,
    /// The literals that become true. Negative literals delete their atom.
    pub result:    BTreeSet<Literal>,
}



/// One deterministic branch of a non-deterministic action.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Outcome {
    /// The name of the action this is an outcome of.
    pub name: String,
    /// Atom ids that must all be true for the outcome to be applicable.
    pub positive_preconditions: BTreeSet<Literal>,
    /// Atom ids that must all be false for the outcome to be applicable.
    ///
    /// Note that these are stored as (positive) ids, not as negative literals.
    pub negative_preconditions: BTreeSet<Literal>,
    /// The effects of this outcome, in declaration order.
    pub effects: Vec<ConditionalEffect>,
}
impl Outcome {
    /// Constructor for the Outcome that splits a precondition into its positive and negative parts.
    ///
    /// # Arguments
    /// - `name`: The name of the action.
    /// - `precondition`: The literals that must hold.
    /// - `effects`: The outcome's [`ConditionalEffect`]s.
    ///
    /// # Returns
    /// A new Outcome.
    pub fn new(name: impl Into<String>, precondition: impl IntoIterator<Item = Literal>, effects: Vec<ConditionalEffect>) -> Self {
        let mut positive_preconditions: BTreeSet<Literal> = BTreeSet::new();
        let mut negative_preconditions: BTreeSet<Literal> = BTreeSet::new();
        for lit in precondition {
            if lit > 0 {
                positive_preconditions.insert(lit);
            } else {
                negative_preconditions.insert(-lit);
            }
        }
        Self { name: name.into(), positive_preconditions, negative_preconditions, effects }
    }
}



/// Maps action names to their deterministic [`Outcome`]s.
///
/// Built once from the grounder's output and immutable afterwards.
#[derive(Clone, Debug, Default)]
pub struct ActionModel {
    /// The actions, in grounding order.
    actions: IndexMap<String, Vec<Outcome>>,
}

// Constructors
impl ActionModel {
    /// Creates a model without any actions.
    #[inline]
    pub fn new() -> Self { Self { actions: IndexMap::new() } }

    /// Builds a model out of grounded operators.
    ///
    /// # Arguments
    /// - `fluents`: The [`FluentIndex`] to resolve atoms with.
    /// - `operators`: The [`GroundOperator`]s to convert.
    ///
    /// # Returns
    /// A new ActionModel with one action per operator.
    ///
    /// # Errors
    /// This function errors if any operator has a precondition or effect we can't interpret, or if
    /// two operators end up with the same name.
    pub fn from_operators<'o>(fluents: &FluentIndex, operators: impl IntoIterator<Item = &'o GroundOperator>) -> Result<Self, Error> {
        let mut model = Self::new();
        for op in operators {
            model.add_operator(fluents, op)?;
        }
        debug!("Built action model with {} action(s) and {} outcome(s)", model.len(), model.outcomes_len());
        Ok(model)
    }

    /// Converts and adds a single operator.
    ///
    /// # Arguments
    /// - `fluents`: The [`FluentIndex`] to resolve atoms with.
    /// - `op`: The [`GroundOperator`] to convert.
    ///
    /// # Errors
    /// This function errors if the operator has a precondition or effect we can't interpret, or if
    /// an action by the same name already exists.
    pub fn add_operator(&mut self, fluents: &FluentIndex, op: &GroundOperator) -> Result<(), Error> {
        let name: String = normalize_action_name(&op.name);
        if self.actions.contains_key(&name) {
            return Err(Error::DuplicateAction { name });
        }

        let pre: Vec<Literal> = match convert_conjunction(fluents, &op.precondition) {
            Ok(pre) => pre,
            Err(err) => return Err(Error::Precondition { name, err }),
        };
        let mut outcomes: Vec<Outcome> = Vec::new();
        for (i, branch) in flatten(&op.effect).into_iter().enumerate() {
            trace!("Action '{name}' outcome {}: {branch}", i + 1);
            match convert_effect(fluents, &branch) {
                Ok(effects) => outcomes.push(Outcome::new(name.clone(), pre.iter().copied(), effects)),
                Err(err) => return Err(Error::Effect { name, outcome: i + 1, err }),
            }
        }
        if outcomes.is_empty() {
            return Err(Error::NoOutcomes { name });
        }

        self.actions.insert(name, outcomes);
        Ok(())
    }
}

// Lookup
impl ActionModel {
    /// Returns the outcomes of the given action.
    ///
    /// # Arguments
    /// - `name`: The (normalised) name of the action.
    ///
    /// # Returns
    /// The action's [`Outcome`]s in declaration order, or [`None`] if there is no such action.
    #[inline]
    pub fn outcomes(&self, name: &str) -> Option<&[Outcome]> { self.actions.get(name).map(Vec::as_slice) }

    /// Returns whether an action by the given name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool { self.actions.contains_key(name) }

    /// Iterates over all actions in grounding order.
    #[inline]
    pub fn iter<'s>(&'s self) -> impl 's + ExactSizeIterator<Item = (&'s str, &'s [Outcome])> {
        self.actions.iter().map(|(name, outcomes)| (name.as_str(), outcomes.as_slice()))
    }

    /// Returns the number of actions.
    #[inline]
    pub fn len(&self) -> usize { self.actions.len() }

    /// Returns whether there are no actions.
    #[inline]
    pub fn is_empty(&self) -> bool { self.actions.is_empty() }

    /// Returns the number of outcomes across all actions.
    #[inline]
    pub fn outcomes_len(&self) -> usize { self.actions.values().map(Vec::len).sum() }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::make_operator;


    fn index() -> FluentIndex { FluentIndex::from_atoms(["p", "q", "r", "s"]).unwrap() }

    #[test]
    fn test_normalize_action_name() {
        assert_eq!(normalize_action_name("flip_"), "flip");
        assert_eq!(normalize_action_name("Move_L1_L2"), "move_l1_l2");
        assert_eq!(normalize_action_name("noop__"), "noop_");
        assert_eq!(normalize_action_name("wait"), "wait");
    }

    #[test]
    fn test_convert_conjunction() {
        let fluents = index();
        assert_eq!(convert_conjunction(&fluents, &Formula::atom("p")).unwrap(), vec![1]);
        assert_eq!(convert_conjunction(&fluents, &Formula::not("q")).unwrap(), vec![-2]);
        assert_eq!(
            convert_conjunction(&fluents, &Formula::and([Formula::atom("r"), Formula::Equals("a".into(), "b".into()), Formula::not("s")])).unwrap(),
            vec![3, -4]
        );
        assert!(convert_conjunction(&fluents, &Formula::and([])).unwrap().is_empty());
        assert!(matches!(
            convert_conjunction(&fluents, &Formula::and([Formula::and([Formula::atom("p")])])),
            Err(FormulaError::UnsupportedConjunction { .. })
        ));
        assert!(matches!(convert_conjunction(&fluents, &Formula::atom("x")), Err(FormulaError::UnknownAtom { atom }) if atom == "x"));
    }

    #[test]
    fn test_convert_effect_shapes() {
        let fluents = index();

        // Plain literal
        assert_eq!(convert_effect(&fluents, &Formula::not("p")).unwrap(), vec![ConditionalEffect {
            condition: BTreeSet::new(),
            result:    BTreeSet::from([-1]),
        }]);

        // Conjunction of literals and a when
        let effects = convert_effect(
            &fluents,
            &Formula::and([Formula::atom("q"), Formula::when(Formula::and([Formula::atom("r"), Formula::not("s")]), Formula::not("r"))]),
        )
        .unwrap();
        assert_eq!(effects, vec![
            ConditionalEffect { condition: BTreeSet::new(), result: BTreeSet::from([2]) },
            ConditionalEffect { condition: BTreeSet::from([3, -4]), result: BTreeSet::from([-3]) },
        ]);

        // Unsupported stuff
        assert!(matches!(
            convert_effect(&fluents, &Formula::and([Formula::and([Formula::atom("p")])])),
            Err(FormulaError::UnsupportedEffect { .. })
        ));
        assert!(matches!(convert_effect(&fluents, &Formula::Not(Box::new(Formula::not("p")))), Err(FormulaError::UnsupportedEffect { .. })));
        assert!(matches!(convert_effect(&fluents, &Formula::one_of([Formula::atom("p")])), Err(FormulaError::UnsupportedEffect { .. })));
    }

    #[test]
    fn test_flatten_one_of() {
        let effect = Formula::and([
            Formula::atom("p"),
            Formula::one_of([Formula::atom("q"), Formula::and([Formula::atom("r"), Formula::not("p")])]),
            Formula::one_of([Formula::atom("s"), Formula::not("s")]),
        ]);
        assert_eq!(flatten(&effect), vec![
            Formula::and([Formula::atom("p"), Formula::atom("q"), Formula::atom("s")]),
            Formula::and([Formula::atom("p"), Formula::atom("q"), Formula::not("s")]),
            Formula::and([Formula::atom("p"), Formula::atom("r"), Formula::not("p"), Formula::atom("s")]),
            Formula::and([Formula::atom("p"), Formula::atom("r"), Formula::not("p"), Formula::not("s")]),
        ]);
        assert_eq!(flatten(&Formula::atom("p")), vec![Formula::atom("p")]);
    }

    #[test]
    fn test_action_model_from_operators() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let fluents = index();
        let ops = [
            make_operator("flip_", Formula::and([Formula::atom("p"), Formula::not("q")]), Formula::and([Formula::atom("q"), Formula::not("p")])),
            make_operator("Toss", Formula::and([]), Formula::one_of([Formula::atom("r"), Formula::atom("s")])),
        ];
        let model = ActionModel::from_operators(&fluents, &ops).unwrap();
        assert_eq!(model.len(), 2);
        assert_eq!(model.outcomes_len(), 3);
        assert_eq!(model.iter().map(|(name, _)| name).collect::<Vec<_>>(), vec!["flip", "toss"]);

        let flip: &[Outcome] = model.outcomes("flip").unwrap();
        assert_eq!(flip.len(), 1);
        assert_eq!(flip[0].name, "flip");
        assert_eq!(flip[0].positive_preconditions, BTreeSet::from([1]));
        assert_eq!(flip[0].negative_preconditions, BTreeSet::from([2]));
        assert_eq!(flip[0].effects.len(), 2);

        let toss: &[Outcome] = model.outcomes("toss").unwrap();
        assert_eq!(toss.len(), 2);
        assert_eq!(toss[0].effects, vec![ConditionalEffect { condition: BTreeSet::new(), result: BTreeSet::from([3]) }]);
        assert_eq!(toss[1].effects, vec![ConditionalEffect { condition: BTreeSet::new(), result: BTreeSet::from([4]) }]);
        assert!(model.outcomes("flip_").is_none());
    }

    #[test]
    fn test_action_model_errors() {
        #[cfg(feature = "log")]
        crate::tests::setup_logger();

        let fluents = index();
        let dup = [make_operator("a_", Formula::and([]), Formula::atom("p")), make_operator("A", Formula::and([]), Formula::atom("q"))];
        assert!(matches!(ActionModel::from_operators(&fluents, &dup), Err(Error::DuplicateAction { name }) if name == "a"));

        let empty = [make_operator("a", Formula::and([]), Formula::one_of([]))];
        assert!(matches!(ActionModel::from_operators(&fluents, &empty), Err(Error::NoOutcomes { .. })));

        let bad_pre = [make_operator("a", Formula::one_of([Formula::atom("p")]), Formula::atom("q"))];
        assert!(matches!(ActionModel::from_operators(&fluents, &bad_pre), Err(Error::Precondition { err: FormulaError::UnsupportedConjunction { .. }, .. })));

        let bad_eff = [make_operator("a", Formula::and([]), Formula::one_of([Formula::atom("p"), Formula::Not(Box::new(Formula::not("q")))]))];
        match ActionModel::from_operators(&fluents, &bad_eff) {
            Err(Error::Effect { outcome, err: FormulaError::UnsupportedEffect { .. }, .. }) => assert_eq!(outcome, 2),
            other => panic!("Expected an unsupported effect, got {other:?}"),
        }
    }
}
