//! Selection of the join algorithm for binary operators.

mod selector;
mod strategy;

pub use selector::*;
pub use strategy::*;
