use crate::join::{compatible_rows, JoinWorker, MatchIter, SolutionRows};
use crate::QueryEvaluationError;
use rdf_algebra_model::{Solution, Variable};
use std::sync::Arc;

/// Scans all right-hand solutions for every probe. No index is built.
#[derive(Debug)]
pub struct LoopJoinWorker {
    rows: SolutionRows,
    join_variables: Arc<[Variable]>,
}

impl LoopJoinWorker {
    pub fn new(rows: SolutionRows, join_variables: Vec<Variable>) -> Self {
        Self {
            rows,
            join_variables: join_variables.into(),
        }
    }
}

impl JoinWorker for LoopJoinWorker {
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        Ok(compatible_rows(
            &self.rows,
            0..self.rows.len(),
            lhs,
            &self.join_variables,
        ))
    }
}
