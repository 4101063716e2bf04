use crate::DuplicateBindingError;
use oxrdf::{Term, Variable};
use rustc_hash::{FxHashMap, FxHasher};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// A single solution of a graph pattern: a mapping from variables to RDF terms.
///
/// A variable that is not part of the mapping is *unbound*. There is no "bound to nothing" state.
/// Two solutions are equal iff they bind exactly the same variables to the same terms. The order
/// in which bindings were added never matters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    bindings: FxHashMap<Variable, Term>,
}

impl Solution {
    /// Creates a solution without any bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the term bound to `variable`, if any.
    pub fn get(&self, variable: &Variable) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// Returns whether `variable` is bound in this solution.
    pub fn contains(&self, variable: &Variable) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Binds `variable` to `term`.
    ///
    /// Returns an error if `variable` is already bound, even if it is bound to the same term.
    pub fn add(&mut self, variable: Variable, term: Term) -> Result<(), DuplicateBindingError> {
        if self.bindings.contains_key(&variable) {
            return Err(DuplicateBindingError::new(variable));
        }
        self.bindings.insert(variable, term);
        Ok(())
    }

    /// Merges the bindings of `self` and `other` into a new solution.
    ///
    /// This operation does not check whether the solutions are compatible. If a variable is bound
    /// in both solutions, the binding of `self` is kept. Callers that need the SPARQL join
    /// semantics must filter with [Self::is_compatible_with] first.
    #[must_use]
    pub fn join(&self, other: &Solution) -> Solution {
        let mut bindings = self.bindings.clone();
        for (variable, term) in &other.bindings {
            bindings
                .entry(variable.clone())
                .or_insert_with(|| term.clone());
        }
        Solution { bindings }
    }

    /// Checks whether the two solutions agree on every variable in `join_variables` that is bound
    /// in both of them.
    ///
    /// A variable that is unbound on either side never causes an incompatibility.
    pub fn is_compatible_with(&self, other: &Solution, join_variables: &[Variable]) -> bool {
        join_variables.iter().all(|variable| {
            match (self.bindings.get(variable), other.bindings.get(variable)) {
                (Some(lhs), Some(rhs)) => lhs == rhs,
                _ => true,
            }
        })
    }

    /// Checks whether the two solutions agree on every variable bound in both of them.
    pub fn is_compatible(&self, other: &Solution) -> bool {
        let (smaller, larger) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        smaller
            .bindings
            .iter()
            .all(|(variable, term)| {
                larger
                    .bindings
                    .get(variable)
                    .map_or(true, |t| t == term)
            })
    }

    /// Returns whether at least one variable is bound in both solutions.
    pub fn shares_bound_variable(&self, other: &Solution) -> bool {
        self.bindings
            .keys()
            .any(|variable| other.bindings.contains_key(variable))
    }

    /// Restricts the solution to `variables`. Variables that are not bound are ignored.
    #[must_use]
    pub fn project(&self, variables: &[Variable]) -> Solution {
        variables
            .iter()
            .filter_map(|variable| {
                self.bindings
                    .get(variable)
                    .map(|term| (variable.clone(), term.clone()))
            })
            .collect()
    }

    /// Builds the canonical key of this solution for the given `join_variables`.
    ///
    /// Two solutions have the same key iff they agree on the bound-ness and the value of every
    /// join variable.
    pub fn join_key(&self, join_variables: &[Variable]) -> JoinKey {
        JoinKey(
            join_variables
                .iter()
                .map(|variable| self.bindings.get(variable).cloned())
                .collect(),
        )
    }

    /// Returns an iterator over the bound variables.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.bindings.keys()
    }

    /// Returns an iterator over all bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &Term)> {
        self.bindings.iter()
    }

    /// Returns the number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns whether no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Hash for Solution {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // The map has no defined iteration order, so we combine the entries commutatively.
        let mut combined = 0_u64;
        for (variable, term) in &self.bindings {
            let mut hasher = FxHasher::default();
            variable.hash(&mut hasher);
            term.hash(&mut hasher);
            combined = combined.wrapping_add(hasher.finish());
        }
        state.write_usize(self.bindings.len());
        state.write_u64(combined);
    }
}

impl FromIterator<(Variable, Term)> for Solution {
    fn from_iter<T: IntoIterator<Item = (Variable, Term)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Solution {
    type Item = (Variable, Term);
    type IntoIter = <FxHashMap<Variable, Term> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut bindings = self.bindings.iter().collect::<Vec<_>>();
        bindings.sort_by(|(lhs, _), (rhs, _)| lhs.as_str().cmp(rhs.as_str()));

        f.write_str("{")?;
        for (i, (variable, term)) in bindings.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{variable} -> {term}")?;
        }
        f.write_str("}")
    }
}

/// The values of a fixed list of join variables, in the order of that list.
///
/// Used as the hash key of join indices. Keys built for different variable lists must not be
/// compared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JoinKey(Vec<Option<Term>>);

impl JoinKey {
    /// Returns whether every join variable is bound.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }
}
