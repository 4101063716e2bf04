use crate::{Algebra, AlgebraVariables};
use itertools::Itertools;
use rdf_algebra_model::Variable;
use std::fmt::Formatter;

/// Skips the first `offset` solutions and returns at most `limit` of the remaining ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Slice {
    inner: Box<Algebra>,
    offset: usize,
    limit: Option<usize>,
}

impl Slice {
    /// Creates a new [Slice]. A `limit` of `None` returns all remaining solutions.
    pub fn new(inner: Algebra, offset: usize, limit: Option<usize>) -> Self {
        Self {
            inner: Box::new(inner),
            offset,
            limit,
        }
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn variables(&self) -> &AlgebraVariables {
        self.inner.variables()
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.limit {
            None => write!(f, "Slice: offset={}, limit=none", self.offset),
            Some(limit) => write!(f, "Slice: offset={}, limit={limit}", self.offset),
        }
    }
}

/// Restricts every solution to the given variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    inner: Box<Algebra>,
    projection: Vec<Variable>,
    variables: AlgebraVariables,
}

impl Project {
    /// Creates a new [Project].
    pub fn new(inner: Algebra, projection: Vec<Variable>) -> Self {
        let projected = projection
            .iter()
            .filter(|variable| inner.projected_variables().contains(*variable))
            .cloned()
            .collect();
        let fixed = projection
            .iter()
            .filter(|variable| inner.fixed_variables().contains(*variable))
            .cloned()
            .collect();
        Self {
            inner: Box::new(inner),
            projection,
            variables: AlgebraVariables::new(projected, fixed),
        }
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    /// The selected variables, in selection order.
    pub fn projection(&self) -> &[Variable] {
        &self.projection
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Project: {}", self.projection.iter().join(", "))
    }
}

/// Removes duplicate solutions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distinct {
    inner: Box<Algebra>,
}

impl Distinct {
    pub fn new(inner: Algebra) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn variables(&self) -> &AlgebraVariables {
        self.inner.variables()
    }
}

/// Allows removing duplicate solutions. Consecutive duplicates are removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reduced {
    inner: Box<Algebra>,
}

impl Reduced {
    pub fn new(inner: Algebra) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn variables(&self) -> &AlgebraVariables {
        self.inner.variables()
    }
}
