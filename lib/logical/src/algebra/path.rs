use crate::algebra::variables::term_pattern_variables;
use crate::AlgebraVariables;
use rdf_algebra_model::{PropertyPathExpression, TermPattern};
use std::collections::BTreeSet;
use std::fmt::Formatter;

/// Matches a property path between a subject and an object.
///
/// A path pattern has set semantics: each pair of endpoints is produced at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPath {
    subject: TermPattern,
    path: PropertyPathExpression,
    object: TermPattern,
    variables: AlgebraVariables,
}

impl PropertyPath {
    /// Creates a new [PropertyPath].
    pub fn new(subject: TermPattern, path: PropertyPathExpression, object: TermPattern) -> Self {
        let mut variables = BTreeSet::new();
        term_pattern_variables(&subject, &mut variables);
        term_pattern_variables(&object, &mut variables);
        Self {
            subject,
            path,
            object,
            variables: AlgebraVariables::all_fixed(variables),
        }
    }

    pub fn subject(&self) -> &TermPattern {
        &self.subject
    }

    pub fn path(&self) -> &PropertyPathExpression {
        &self.path
    }

    pub fn object(&self) -> &TermPattern {
        &self.object
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PropertyPath: {} {} {}",
            self.subject, self.path, self.object
        )
    }
}
