//  FLUENTS.rs
//    by Lut99
//
//  Created:
//    14 Sep 2026, 10:15:32
//  Last edited:
//    01 Oct 2026, 14:08:19
//  Auto updated?
//    Yes
//
//  Description:
//!   Implements the [`FluentIndex`], which maps ground atoms to signed
//!   integer [`Literal`]s and back.
//

use std::error;
use std::fmt::{Display, Formatter, Result as FResult};

use indexmap::IndexMap;

use crate::log::trace;


/***** CONSTANTS *****/
/// A literal that is never assigned to any real atom.
///
/// Its magnitude does not fit a positive [`Literal`], so no atom id can ever be its negation. It's
/// used to mark the synthetic goal state of an [`ExecutionGraph`](crate::graph::ExecutionGraph).
pub const GOAL_MARKER: Literal = Literal::MIN;





/***** ERRORS *****/
/// Defines errors that occur when building a [`FluentIndex`].
#[derive(Debug)]
pub enum Error {
    /// The grounder gave us the same atom twice.
    DuplicateAtom { atom: String },
    /// There are more atoms than we can give an id.
    TooManyAtoms { max: usize },
}
impl Display for Error {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self {
            Self::DuplicateAtom { atom } => write!(f, "Ground atom \"{atom}\" occurs more than once"),
            Self::TooManyAtoms { max } => write!(f, "Task has more than {max} ground atoms"),
        }
    }
}
impl error::Error for Error {}





/***** AUXILLARY *****/
/// A signed atom identifier.
///
/// The magnitude identifies the atom, the sign whether it's asserted (positive) or denied
/// (negative).
pub type Literal = i32;





/***** LIBRARY *****/
/// Bidirectional mapping between ground atoms and [`Literal`]s.
///
/// Every atom `foo` is assigned some id `i`, and then:
/// - `foo` maps to `i`; and
/// - `not(foo)` maps to `-i`.
///
/// Ids are assigned densely, starting at 1, in the order that atoms are given.
#[derive(Clone, Debug, Default)]
pub struct FluentIndex {
    /// Maps the textual (lower-case) name to the literal.
    ///
    /// Contains both the positive and negative form of every atom.
    literals: IndexMap<String, Literal>,
    /// The textual representation of every atom, indexed by `id - 1`.
    atoms:    Vec<String>,
}

// Constructors
impl FluentIndex {
    /// Creates an empty FluentIndex.
    #[inline]
    pub fn new() -> Self { Self { literals: IndexMap::new(), atoms: Vec::new() } }

    /// Builds a FluentIndex out of a list of ground atoms.
    ///
    /// # Arguments
    /// - `atoms`: The ground atoms, as text, in the order the grounder discovered them.
    ///
    /// # Returns
    /// A new FluentIndex that knows of all the given atoms.
    ///
    /// # Errors
    /// This function errors if the same atom occurs twice (case-insensitively), or if there are
    /// too many atoms to give them all an id.
    pub fn from_atoms<I>(atoms: I) -> Result<Self, Error>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut index = Self::new();
        for atom in atoms {
            index.register(atom.as_ref())?;
        }
        Ok(index)
    }
}

// Registration
impl FluentIndex {
    /// Registers a new atom, assigning it the next free id.
    ///
    /// # Arguments
    /// - `atom`: The textual representation of the atom. It will be lower-cased.
    ///
    /// # Returns
    /// The positive [`Literal`] assigned to the atom.
    ///
    /// # Errors
    /// This function errors if the atom was already registered, or if the id space is exhausted.
    pub fn register(&mut self, atom: &str) -> Result<Literal, Error> {
        let atom: String = atom.to_lowercase();
        let neg: String = negated(&atom);
        if self.literals.contains_key(&atom) || self.literals.contains_key(&neg) {
            return Err(Error::DuplicateAtom { atom });
        }

        // Next free id
        let id: Literal = match Literal::try_from(self.atoms.len() + 1) {
            Ok(id) => id,
            Err(_) => return Err(Error::TooManyAtoms { max: Literal::MAX as usize }),
        };
        trace!("Registering atom '{atom}' as {id}");
        self.literals.insert(atom.clone(), id);
        self.literals.insert(neg, -id);
        self.atoms.push(atom);
        Ok(id)
    }
}

// Lookup
impl FluentIndex {
    /// Finds the literal of the given fluent.
    ///
    /// # Arguments
    /// - `text`: Either `atom` or `not(atom)`. Matched case-insensitively.
    ///
    /// # Returns
    /// The matching [`Literal`], or [`None`] if we don't know it.
    #[inline]
    pub fn literal(&self, text: &str) -> Option<Literal> {
        match self.literals.get(text) {
            Some(lit) => Some(*lit),
            None => self.literals.get(&text.to_lowercase()).copied(),
        }
    }

    /// Finds the textual representation of the given literal.
    ///
    /// # Arguments
    /// - `lit`: The [`Literal`] to resolve.
    ///
    /// # Returns
    /// `atom` for positive literals, `not(atom)` for negative ones, or [`None`] if the literal is
    /// not one of ours (e.g., [`GOAL_MARKER`]).
    pub fn text(&self, lit: Literal) -> Option<&str> {
        if lit == 0 || lit == GOAL_MARKER {
            return None;
        }
        let idx: usize = usize::try_from(lit.unsigned_abs()).ok()? - 1;
        if lit > 0 {
            self.atoms.get(idx).map(String::as_str)
        } else {
            // The negative forms live in the map only; since they're inserted right after their
            // positive counterpart, their index is predictable.
            self.literals.get_index(idx.checked_mul(2)?.checked_add(1)?).map(|(text, _)| text.as_str())
        }
    }

    /// Returns the same as [`FluentIndex::text()`], but with a fallback for unknown literals.
    ///
    /// # Arguments
    /// - `lit`: The [`Literal`] to resolve.
    ///
    /// # Returns
    /// Something [`Display`]able that either writes the name or `<lit>` if we don't know it.
    #[inline]
    pub fn display(&self, lit: Literal) -> FluentDisplay<'_> { FluentDisplay { index: self, lit } }

    /// Returns the number of atoms in the index.
    ///
    /// Note that this counts atoms, not literals; the latter is twice this number.
    #[inline]
    pub fn len(&self) -> usize { self.atoms.len() }

    /// Returns whether the index has no atoms.
    #[inline]
    pub fn is_empty(&self) -> bool { self.atoms.is_empty() }

    /// Iterates over all atoms and their positive literals, in id order.
    ///
    /// # Returns
    /// An [`Iterator`] over `(text, literal)`-pairs.
    #[inline]
    pub fn atoms<'s>(&'s self) -> impl 's + ExactSizeIterator<Item = (&'s str, Literal)> {
        self.atoms.iter().enumerate().map(|(i, atom)| (atom.as_str(), (i + 1) as Literal))
    }
}



/// Formats a [`Literal`] using a [`FluentIndex`].
#[derive(Clone, Copy, Debug)]
pub struct FluentDisplay<'i> {
    index: &'i FluentIndex,
    lit:   Literal,
}
impl<'i> Display for FluentDisplay<'i> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FResult {
        match self.index.text(self.lit) {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "<{}>", self.lit),
        }
    }
}



/// Builds the textual negation of an atom.
#[inline]
fn negated(atom: &str) -> String { format!("not({atom})") }





/***** TESTS *****/
