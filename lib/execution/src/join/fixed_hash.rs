use crate::join::{compatible_rows, JoinWorker, MatchIter, SolutionRows};
use crate::QueryEvaluationError;
use rdf_algebra_model::{JoinKey, Solution, Variable};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Indexes the right-hand solutions by the values of the join variables.
///
/// This worker is selected if every join variable is bound in every solution of both operands.
/// Solutions that nevertheless leave a join variable unbound are kept aside and checked on every
/// probe, so the worker stays correct for any input.
#[derive(Debug)]
pub struct FixedHashJoinWorker {
    rows: SolutionRows,
    join_variables: Arc<[Variable]>,
    index: FxHashMap<JoinKey, Vec<usize>>,
    incomplete: Vec<usize>,
}

impl FixedHashJoinWorker {
    pub fn new(rows: SolutionRows, join_variables: Vec<Variable>) -> Self {
        let mut index: FxHashMap<JoinKey, Vec<usize>> = FxHashMap::default();
        let mut incomplete = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let key = row.join_key(&join_variables);
            if key.is_complete() {
                index.entry(key).or_default().push(i);
            } else {
                incomplete.push(i);
            }
        }

        Self {
            rows,
            join_variables: join_variables.into(),
            index,
            incomplete,
        }
    }
}

impl JoinWorker for FixedHashJoinWorker {
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        let key = lhs.join_key(&self.join_variables);
        if !key.is_complete() {
            return Ok(compatible_rows(
                &self.rows,
                0..self.rows.len(),
                lhs,
                &self.join_variables,
            ));
        }

        let mut candidates = self.index.get(&key).cloned().unwrap_or_default();
        candidates.extend_from_slice(&self.incomplete);
        Ok(compatible_rows(
            &self.rows,
            candidates,
            lhs,
            &self.join_variables,
        ))
    }
}
