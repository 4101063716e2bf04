mod element;
mod query;

pub use element::ElementCompiler;
pub use query::QueryCompiler;

/// Options of the compilers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Use loop joins instead of hash joins for operands that share variables. Loop joins do not
    /// build an index over the right-hand side.
    pub memory_bounded_joins: bool,
}
