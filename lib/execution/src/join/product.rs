use crate::join::{JoinWorker, MatchIter, SolutionRows};
use crate::QueryEvaluationError;
use rdf_algebra_model::Solution;
use std::sync::Arc;

/// Joins operands that do not share a variable. Every right-hand solution matches.
#[derive(Debug)]
pub struct ProductJoinWorker {
    rows: SolutionRows,
}

impl ProductJoinWorker {
    pub fn new(rows: SolutionRows) -> Self {
        Self { rows }
    }
}

impl JoinWorker for ProductJoinWorker {
    fn find(&self, _lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        let rows = Arc::clone(&self.rows);
        Ok(Box::new(
            (0..rows.len()).filter_map(move |index| rows.get(index).cloned()),
        ))
    }
}
