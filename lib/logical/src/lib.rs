//! The logical layer of the engine.
//!
//! Contains the graph pattern [Element] tree that is produced by a SPARQL parser, the [Algebra]
//! that is evaluated by the execution layer, and the compilers that translate the former into the
//! latter.

mod algebra;
mod compiler;
mod element;
mod error;
mod expr;
pub mod join;
mod query;

pub use algebra::*;
pub use compiler::*;
pub use element::*;
pub use error::*;
pub use expr::*;
pub use query::*;
