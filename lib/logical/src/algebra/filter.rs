use crate::{Algebra, AlgebraVariables, Expression};
use itertools::Itertools;
use rdf_algebra_model::Variable;
use std::fmt::Formatter;

/// Keeps the solutions of the inner node that satisfy all expressions.
///
/// An expression that cannot be evaluated for a solution counts as `false`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    inner: Box<Algebra>,
    expressions: Vec<Expression>,
}

impl Filter {
    /// Creates a new [Filter].
    pub fn new(inner: Algebra, expressions: Vec<Expression>) -> Self {
        Self {
            inner: Box::new(inner),
            expressions,
        }
    }

    /// Filters `inner` with `expressions`. Returns `inner` unchanged if there is no expression.
    pub fn create(inner: Algebra, expressions: Vec<Expression>) -> Algebra {
        if expressions.is_empty() {
            return inner;
        }
        Self::new(inner, expressions).into()
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }

    /// Splits the filter into its inner node and its expressions.
    pub fn into_parts(self) -> (Algebra, Vec<Expression>) {
        (*self.inner, self.expressions)
    }

    pub fn variables(&self) -> &AlgebraVariables {
        self.inner.variables()
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filter: {}", self.expressions.iter().join(", "))
    }
}

/// Binds new variables to the values of expressions (`BIND`).
///
/// The assignments are evaluated in order, so an assignment can use the variables bound by the
/// previous ones. An assigned variable must not be bound already, and a failed evaluation fails
/// the query. Therefore, every assigned variable is fixed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extend {
    inner: Box<Algebra>,
    assignments: Vec<(Variable, Expression)>,
    variables: AlgebraVariables,
}

impl Extend {
    /// Creates a new [Extend].
    pub fn new(inner: Algebra, assignments: Vec<(Variable, Expression)>) -> Self {
        let mut projected = inner.projected_variables().clone();
        let mut fixed = inner.fixed_variables().clone();
        for (variable, _) in &assignments {
            projected.insert(variable.clone());
            fixed.insert(variable.clone());
        }
        Self {
            inner: Box::new(inner),
            assignments,
            variables: AlgebraVariables::new(projected, fixed),
        }
    }

    /// Extends `inner` with `assignments`.
    ///
    /// If `inner` already is an [Extend], the assignments are appended to it instead of creating
    /// a nested node. Returns `inner` unchanged if there is no assignment.
    pub fn create(inner: Algebra, assignments: Vec<(Variable, Expression)>) -> Algebra {
        if assignments.is_empty() {
            return inner;
        }
        match inner {
            Algebra::Extend(extend) => {
                let mut merged = extend.assignments;
                merged.extend(assignments);
                Self::new(*extend.inner, merged).into()
            }
            inner => Self::new(inner, assignments).into(),
        }
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn assignments(&self) -> &[(Variable, Expression)] {
        &self.assignments
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Extend: {}",
            self.assignments
                .iter()
                .map(|(variable, expression)| format!("{variable} := {expression}"))
                .join(", ")
        )
    }
}
