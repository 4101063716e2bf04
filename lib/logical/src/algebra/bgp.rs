use crate::algebra::variables::triple_pattern_variables;
use crate::AlgebraVariables;
use itertools::Itertools;
use rdf_algebra_model::TriplePattern;
use std::collections::BTreeSet;
use std::fmt::Formatter;

/// A basic graph pattern: a conjunction of triple patterns matched against the active graph.
///
/// Blank nodes in the patterns behave like variables that are local to this node. They are never
/// part of the produced solutions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bgp {
    patterns: Vec<TriplePattern>,
    variables: AlgebraVariables,
}

impl Bgp {
    /// Creates a new [Bgp]. Every variable of a pattern is fixed.
    pub fn new(patterns: Vec<TriplePattern>) -> Self {
        let mut variables = BTreeSet::new();
        for pattern in &patterns {
            triple_pattern_variables(pattern, &mut variables);
        }
        Self {
            patterns,
            variables: AlgebraVariables::all_fixed(variables),
        }
    }

    /// The triple patterns in evaluation order.
    pub fn patterns(&self) -> &[TriplePattern] {
        &self.patterns
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bgp: {}", self.patterns.iter().join(" . "))
    }
}
