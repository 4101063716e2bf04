use crate::{Element, InlineData};
use rdf_algebra_model::Variable;

/// How duplicate solutions of a query are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DuplicateHandling {
    /// Keep all solutions.
    #[default]
    Keep,
    /// `SELECT DISTINCT`: remove all duplicates.
    Distinct,
    /// `SELECT REDUCED`: duplicates may be removed.
    Reduced,
}

/// A parsed `SELECT` query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    /// The selected variables. `None` selects all variables (`SELECT *`).
    pub projection: Option<Vec<Variable>>,
    /// The graph pattern of the query. `None` if the query has no `WHERE` clause.
    pub where_clause: Option<Element>,
    /// A `VALUES` block after the `WHERE` clause.
    pub values_clause: Option<InlineData>,
    pub duplicates: DuplicateHandling,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Query {
    /// Creates a `SELECT *` query with the given `WHERE` clause.
    pub fn new(where_clause: Element) -> Self {
        Self {
            where_clause: Some(where_clause),
            ..Self::default()
        }
    }

    /// Sets the projection of the query.
    #[must_use]
    pub fn with_projection(mut self, variables: impl IntoIterator<Item = Variable>) -> Self {
        self.projection = Some(variables.into_iter().collect());
        self
    }

    /// Sets the duplicate handling of the query.
    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicateHandling) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Sets the `LIMIT` of the query.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the `OFFSET` of the query.
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the trailing `VALUES` block of the query.
    #[must_use]
    pub fn with_values(mut self, values: InlineData) -> Self {
        self.values_clause = Some(values);
        self
    }

    /// Returns whether the query has a `LIMIT`.
    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    /// Returns whether the query has a non-zero `OFFSET`.
    pub fn has_offset(&self) -> bool {
        self.offset > 0
    }
}
