//  TASK.rs
//    by Lut99
//
//  Created:
//    14 Sep 2026, 11:30:06
//  Last edited:
//    06 Oct 2026, 09:12:44
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the [`GroundTask`], i.e., the output of a grounder that we
//!   consume.
//!
//!   Grounding itself (turning a PDDL domain and problem into ground atoms
//!   and operators) is not done by this crate. Instead, we expect it as a
//!   pre-computed artifact. With the `serde`-feature enabled, it can be read
//!   from JSON.
//

use std::fmt::{Display, Formatter, Result as FResult};

use enum_debug::EnumDebug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};


/***** ERRORS *****/
/// Defines errors that occur when loading a [`GroundTask`].
#[cfg(feature = "serde")]
#[derive(Debug)]
pub enum Error {
    /// Failed to read the task file.
    Read { path: std::path::PathBuf, err: std::io::Error },
    /// Failed to parse the task file.
    Parse { what: String, err: serde_json::Error },
}
#[cfg(feature = "serde")]
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Read { path, .. } => write!(f, "Failed to read grounded task file '{}'", path.display()),
            Self::Parse { what, .. } => write!(f, "Failed to parse grounded task from {what}"),
        }
    }
}
#[cfg(feature = "serde")]
impl std::error::Error for Error {
    #[inline]
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { err, .. } => Some(err),
            Self::Parse { err, .. } => Some(err),
        }
    }
}





/***** LIBRARY *****/
/// A logical formula over ground atoms, as produced by the grounder.
///
/// This is a closed set of shapes. Which shapes are accepted where is decided by the
/// [`ActionModel`](crate::actions::ActionModel) when it converts operators.
///
/// # Syntax (JSON)
/// ```json
/// { "and": [{ "atom": "p" }, { "not": { "atom": "q" } }] }
/// ```
#[derive(Clone, Debug, EnumDebug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Formula {
    /// A ground atom, e.g., `at(robot, kitchen)`.
    Atom(String),
    /// Negation of some formula. Only negated atoms are ever accepted.
    Not(Box<Formula>),
    /// Conjunction of formulas.
    And(Vec<Formula>),
    /// A conditional effect: `result` happens only if `condition` holds.
    When { condition: Box<Formula>, result: Box<Formula> },
    /// Non-deterministic choice between effects.
    OneOf(Vec<Formula>),
    /// A ground equality constraint. These are skipped when converting conjunctions.
    Equals(String, String),
}

// Constructors
impl Formula {
    /// Convenience constructor for an [`Formula::Atom`].
    #[inline]
    pub fn atom(name: impl Into<String>) -> Self { Self::Atom(name.into()) }

    /// Convenience constructor for a negated [`Formula::Atom`].
    #[inline]
    pub fn not(name: impl Into<String>) -> Self { Self::Not(Box::new(Self::Atom(name.into()))) }

    /// Convenience constructor for an [`Formula::And`].
    #[inline]
    pub fn and(args: impl IntoIterator<Item = Formula>) -> Self { Self::And(args.into_iter().collect()) }

    /// Convenience constructor for an [`Formula::OneOf`].
    #[inline]
    pub fn one_of(args: impl IntoIterator<Item = Formula>) -> Self { Self::OneOf(args.into_iter().collect()) }

    /// Convenience constructor for a [`Formula::When`].
    #[inline]
    pub fn when(condition: Formula, result: Formula) -> Self { Self::When { condition: Box::new(condition), result: Box::new(result) } }
}

// Inspection
impl Formula {
    /// Returns the textual form of this formula if it's a literal.
    ///
    /// # Returns
    /// `atom` for an atom, `not(atom)` for a negated atom, or [`None`] for anything else.
    pub fn as_literal(&self) -> Option<String> {
        match self {
            Self::Atom(atom) => Some(atom.clone()),
            Self::Not(arg) => match &**arg {
                Self::Atom(atom) => Some(format!("not({atom})")),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns whether this formula is an equality constraint.
    #[inline]
    pub fn is_equality(&self) -> bool { matches!(self, Self::Equals(..)) }
}

// Formatting
impl Display for Formula {
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::Atom(atom) => write!(f, "{atom}"),
            Self::Not(arg) => write!(f, "not({arg})"),
            Self::And(args) => {
                write!(f, "and(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            },
            Self::When { condition, result } => write!(f, "when({condition}, {result})"),
            Self::OneOf(args) => {
                write!(f, "oneof(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            },
            Self::Equals(lhs, rhs) => write!(f, "={lhs},{rhs}"),
        }
    }
}



/// A single ground operator, possibly with non-deterministic effects.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct GroundOperator {
    /// The name of the operator, e.g., `move_l1_l2`.
    pub name:         String,
    /// What must hold for the operator to be applicable. Must be a conjunction of literals.
    pub precondition: Formula,
    /// What the operator does.
    pub effect:       Formula,
}



/// Everything the grounder produces for a single planning task.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct GroundTask {
    /// All ground atoms, in discovery order.
    pub atoms:     Vec<String>,
    /// All ground operators.
    pub operators: Vec<GroundOperator>,
    /// The initial state, as a conjunction of literals.
    pub init:      Formula,
    /// The goal condition, as a conjunction of literals.
    pub goal:      Formula,
}
#[cfg(feature = "serde")]
impl GroundTask {
    /// Parses a GroundTask from JSON.
    ///
    /// # Arguments
    /// - `what`: Some description of where the JSON came from, for debugging purposes.
    /// - `raw`: The JSON text to parse.
    ///
    /// # Returns
    /// A new GroundTask.
    ///
    /// # Errors
    /// This function errors if the given text is not a valid task.
    #[inline]
    pub fn from_json(what: impl Into<String>, raw: &str) -> Result<Self, Error> {
        serde_json::from_str(raw).map_err(|err| Error::Parse { what: what.into(), err })
    }

    /// Reads a GroundTask from a JSON file.
    ///
    /// # Arguments
    /// - `path`: The path of the file to read.
    ///
    /// # Returns
    /// A new GroundTask.
    ///
    /// # Errors
    /// This function errors if we failed to read the file, or if it did not contain a valid task.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let path: &std::path::Path = path.as_ref();
        let raw: String = std::fs::read_to_string(path).map_err(|err| Error::Read { path: path.into(), err })?;
        Self::from_json(format!("'{}'", path.display()), &raw)
    }
}





/***** TESTS *****/
