//! Join workers probe the materialized right-hand side of a join with left-hand solutions.
//!
//! A worker is created once per join node from the right-hand solutions and is never mutated
//! afterward. [JoinWorker::find] can be called any number of times.

mod existence;
mod fixed_hash;
mod floating_hash;
mod left_join;
mod nested_loop;
mod product;

pub use existence::{ExistenceJoinWorker, NonExistenceJoinWorker};
pub use fixed_hash::FixedHashJoinWorker;
pub use floating_hash::FloatingHashJoinWorker;
pub use left_join::{LeftJoinFilter, LeftJoinWorker};
pub use nested_loop::LoopJoinWorker;
pub use product::ProductJoinWorker;

use crate::QueryEvaluationError;
use rdf_algebra_logical::join::JoinStrategy;
use rdf_algebra_model::{Solution, Variable};
use std::sync::Arc;

/// The right-hand solutions that a worker has been prepared with.
pub type SolutionRows = Arc<[Solution]>;

/// The right-hand solutions that match a single left-hand solution.
pub type MatchIter = Box<dyn Iterator<Item = Solution>>;

/// Finds the right-hand solutions that match a left-hand solution.
pub trait JoinWorker {
    /// Returns the right-hand solutions that are compatible with `lhs`.
    ///
    /// The returned iterator does not borrow the worker, so probing is cheap to interleave with
    /// the consumption of the matches.
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError>;
}

/// Creates the worker for `strategy` from the right-hand solutions `rows`.
pub fn create_join_worker(strategy: &JoinStrategy, rows: SolutionRows) -> Box<dyn JoinWorker> {
    match strategy {
        JoinStrategy::Product => Box::new(ProductJoinWorker::new(rows)),
        JoinStrategy::Loop { join_variables } => {
            Box::new(LoopJoinWorker::new(rows, join_variables.clone()))
        }
        JoinStrategy::FixedHash { join_variables } => {
            Box::new(FixedHashJoinWorker::new(rows, join_variables.clone()))
        }
        JoinStrategy::FloatingHash { join_variables } => {
            Box::new(FloatingHashJoinWorker::new(rows, join_variables.clone()))
        }
        JoinStrategy::Existence(inner) => {
            Box::new(ExistenceJoinWorker::new(create_join_worker(inner, rows)))
        }
        JoinStrategy::NonExistence(inner) => {
            Box::new(NonExistenceJoinWorker::new(create_join_worker(inner, rows)))
        }
    }
}

/// Creates the worker of a `MINUS` node.
///
/// Only right-hand solutions that share a bound variable with the left-hand solution remove it.
pub fn create_minus_worker(strategy: &JoinStrategy, rows: SolutionRows) -> Box<dyn JoinWorker> {
    let inner = match strategy {
        JoinStrategy::NonExistence(inner) | JoinStrategy::Existence(inner) => inner.as_ref(),
        strategy => strategy,
    };
    Box::new(NonExistenceJoinWorker::for_minus(create_join_worker(
        inner, rows,
    )))
}

/// Returns the rows at `indices` that are compatible with `lhs`.
fn compatible_rows<I>(
    rows: &SolutionRows,
    indices: I,
    lhs: &Solution,
    join_variables: &Arc<[Variable]>,
) -> MatchIter
where
    I: IntoIterator<Item = usize>,
    I::IntoIter: 'static,
{
    let rows = Arc::clone(rows);
    let lhs = lhs.clone();
    let join_variables = Arc::clone(join_variables);
    Box::new(indices.into_iter().filter_map(move |index| {
        let row = rows.get(index)?;
        row.is_compatible_with(&lhs, &join_variables)
            .then(|| row.clone())
    }))
}
