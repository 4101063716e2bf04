use crate::eval::{evaluate, SolutionIter};
use crate::{ExecutionContext, QueryEvaluationError};
use rdf_algebra_logical::Algebra;
use rdf_algebra_model::Variable;
pub use sparesults::QuerySolution;
use std::sync::Arc;

/// An iterator over the solutions of a query as [QuerySolution]s.
///
/// Every [QuerySolution] has the same ordered list of variables, see [Self::variables].
pub struct QuerySolutionIter<'a> {
    variables: Arc<[Variable]>,
    inner: SolutionIter<'a>,
}

impl<'a> QuerySolutionIter<'a> {
    /// Creates a new [QuerySolutionIter] that reports the bindings of `variables`.
    pub fn new(variables: Arc<[Variable]>, inner: SolutionIter<'a>) -> Self {
        Self { variables, inner }
    }

    /// Evaluates `algebra` and reports the bindings of its [result variables](result_variables).
    pub fn evaluate(context: &'a ExecutionContext, algebra: &'a Algebra) -> Self {
        Self::new(result_variables(algebra).into(), evaluate(context, algebra))
    }

    /// The ordered list of used variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

impl Iterator for QuerySolutionIter<'_> {
    type Item = Result<QuerySolution, QueryEvaluationError>;

    fn next(&mut self) -> Option<Self::Item> {
        let solution = match self.inner.next()? {
            Ok(solution) => solution,
            Err(error) => return Some(Err(error)),
        };
        let values = self
            .variables
            .iter()
            .map(|variable| solution.get(variable).cloned())
            .collect::<Vec<_>>();
        Some(Ok(QuerySolution::from((Arc::clone(&self.variables), values))))
    }
}

/// Returns the variables of the query result: the projection if there is one, otherwise the
/// projected variables of the algebra in lexicographic order.
pub fn result_variables(algebra: &Algebra) -> Vec<Variable> {
    match algebra {
        Algebra::Project(project) => project.projection().to_vec(),
        Algebra::Slice(slice) => result_variables(slice.inner()),
        Algebra::Distinct(distinct) => result_variables(distinct.inner()),
        Algebra::Reduced(reduced) => result_variables(reduced.inner()),
        _ => algebra.projected_variables().iter().cloned().collect(),
    }
}
