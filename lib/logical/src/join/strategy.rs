use itertools::Itertools;
use rdf_algebra_model::{Solution, Variable};
use std::fmt::{Display, Formatter};

/// The algorithm used for joining the solutions of two operands.
///
/// A strategy is selected once per operator at compile time based on the variable analysis of
/// the operands. The join variables are the projected variables shared by both operands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum JoinStrategy {
    /// The operands share no variable. Every pair of solutions is joined.
    Product,
    /// Scans all right-hand solutions for every left-hand solution. Does not build an index.
    Loop { join_variables: Vec<Variable> },
    /// Indexes the right-hand solutions by the values of the join variables. Requires that every
    /// join variable is fixed on both sides.
    FixedHash { join_variables: Vec<Variable> },
    /// Indexes the right-hand solutions per join variable, including an index of the solutions
    /// that leave the variable unbound.
    FloatingHash { join_variables: Vec<Variable> },
    /// Only checks whether a compatible right-hand solution exists (`EXISTS`).
    Existence(Box<JoinStrategy>),
    /// Only checks whether no compatible right-hand solution exists (`NOT EXISTS`, `MINUS`).
    NonExistence(Box<JoinStrategy>),
}

impl JoinStrategy {
    /// Returns the join variables of this strategy.
    pub fn join_variables(&self) -> &[Variable] {
        match self {
            Self::Product => &[],
            Self::Loop { join_variables }
            | Self::FixedHash { join_variables }
            | Self::FloatingHash { join_variables } => join_variables,
            Self::Existence(inner) | Self::NonExistence(inner) => inner.join_variables(),
        }
    }

    /// Combines a left-hand solution with a matching right-hand solution.
    ///
    /// Existence strategies never contribute bindings and return `lhs` unchanged.
    pub fn combine(&self, lhs: &Solution, rhs: &Solution) -> Solution {
        match self {
            Self::Existence(_) | Self::NonExistence(_) => lhs.clone(),
            _ => lhs.join(rhs),
        }
    }
}

impl Display for JoinStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Product => f.write_str("Product"),
            Self::Loop { join_variables } => write!(f, "Loop({})", join_variables.iter().join(", ")),
            Self::FixedHash { join_variables } => {
                write!(f, "FixedHash({})", join_variables.iter().join(", "))
            }
            Self::FloatingHash { join_variables } => {
                write!(f, "FloatingHash({})", join_variables.iter().join(", "))
            }
            Self::Existence(inner) => write!(f, "Existence({inner})"),
            Self::NonExistence(inner) => write!(f, "NonExistence({inner})"),
        }
    }
}
