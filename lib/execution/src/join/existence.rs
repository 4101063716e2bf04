use crate::join::{JoinWorker, MatchIter};
use crate::QueryEvaluationError;
use rdf_algebra_model::Solution;
use std::iter::{empty, once};

/// Matches the empty solution once if the inner worker finds at least one match (`EXISTS`).
pub struct ExistenceJoinWorker {
    inner: Box<dyn JoinWorker>,
}

impl ExistenceJoinWorker {
    pub fn new(inner: Box<dyn JoinWorker>) -> Self {
        Self { inner }
    }
}

impl JoinWorker for ExistenceJoinWorker {
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        if self.inner.find(lhs)?.next().is_some() {
            Ok(Box::new(once(Solution::new())))
        } else {
            Ok(Box::new(empty()))
        }
    }
}

/// Matches the empty solution once if the inner worker finds no match (`NOT EXISTS`, `MINUS`).
pub struct NonExistenceJoinWorker {
    inner: Box<dyn JoinWorker>,
    require_shared_variable: bool,
}

impl NonExistenceJoinWorker {
    pub fn new(inner: Box<dyn JoinWorker>) -> Self {
        Self {
            inner,
            require_shared_variable: false,
        }
    }

    /// Creates a worker with the semantics of `MINUS`: a match only counts if it shares a bound
    /// variable with the left-hand solution.
    pub fn for_minus(inner: Box<dyn JoinWorker>) -> Self {
        Self {
            inner,
            require_shared_variable: true,
        }
    }
}

impl JoinWorker for NonExistenceJoinWorker {
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        let mut matches = self.inner.find(lhs)?;
        let found = if self.require_shared_variable {
            matches.any(|rhs| rhs.shares_bound_variable(lhs))
        } else {
            matches.next().is_some()
        };

        if found {
            Ok(Box::new(empty()))
        } else {
            Ok(Box::new(once(Solution::new())))
        }
    }
}
