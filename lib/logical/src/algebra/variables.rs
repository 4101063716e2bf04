use rdf_algebra_model::{NamedNodePattern, TermPattern, TriplePattern, Variable};
use std::collections::BTreeSet;

/// The static variable analysis of an algebra node.
///
/// Invariant: the fixed variables are a subset of the projected variables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgebraVariables {
    projected: BTreeSet<Variable>,
    fixed: BTreeSet<Variable>,
}

impl AlgebraVariables {
    /// Creates a new [AlgebraVariables]. Fixed variables that are not projected are ignored.
    pub fn new(projected: BTreeSet<Variable>, fixed: BTreeSet<Variable>) -> Self {
        let fixed = fixed.intersection(&projected).cloned().collect();
        Self { projected, fixed }
    }

    /// Creates a new [AlgebraVariables] where every variable is fixed.
    pub fn all_fixed(variables: BTreeSet<Variable>) -> Self {
        Self {
            fixed: variables.clone(),
            projected: variables,
        }
    }

    /// All variables that may be bound.
    pub fn projected(&self) -> &BTreeSet<Variable> {
        &self.projected
    }

    /// All variables that are always bound.
    pub fn fixed(&self) -> &BTreeSet<Variable> {
        &self.fixed
    }

    /// All variables that may be unbound.
    pub fn floating(&self) -> BTreeSet<Variable> {
        self.projected.difference(&self.fixed).cloned().collect()
    }
}

/// Collects the variables of a term pattern. Blank nodes are not variables of the pattern.
pub(crate) fn term_pattern_variables(pattern: &TermPattern, variables: &mut BTreeSet<Variable>) {
    if let TermPattern::Variable(variable) = pattern {
        variables.insert(variable.clone());
    }
}

/// Collects the variables of a triple pattern.
pub(crate) fn triple_pattern_variables(
    pattern: &TriplePattern,
    variables: &mut BTreeSet<Variable>,
) {
    term_pattern_variables(&pattern.subject, variables);
    if let NamedNodePattern::Variable(variable) = &pattern.predicate {
        variables.insert(variable.clone());
    }
    term_pattern_variables(&pattern.object, variables);
}
