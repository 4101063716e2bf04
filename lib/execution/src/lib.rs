//! This crate defines the execution engine of the compiled SPARQL algebra.
//!
//! # Evaluation Model
//!
//! The evaluation is single-threaded and pull-based. Evaluating an [Algebra](rdf_algebra_logical::Algebra)
//! node returns a lazy iterator of solutions that pulls from the iterators of its children on
//! demand. Nothing is computed before the first solution is requested.
//!
//! Joins are evaluated with [join workers](join::JoinWorker). A worker is prepared from the
//! materialized solutions of the right-hand side once the first left-hand solution arrives, and
//! is then probed with every left-hand solution. The
//! [JoinStrategy](rdf_algebra_logical::join::JoinStrategy) that the compiler selected for a join
//! decides which worker is used.
//!
//! # Execution Context
//!
//! Every evaluation runs within an [ExecutionContext]. The context provides access to the
//! storage, the dataset of the query, the expression evaluator, and a [CancellationToken] that is
//! checked whenever a solution is pulled from a node.

mod active_graph;
mod context;
mod error;
mod eval;
pub mod expression;
pub mod join;
mod results;

pub use active_graph::ActiveGraph;
pub use context::*;
pub use error::*;
pub use eval::{evaluate, Evaluator, SolutionIter};
pub use results::*;
