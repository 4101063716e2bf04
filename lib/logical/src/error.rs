use rdf_algebra_model::Variable;

/// An error raised while compiling a graph pattern into an [Algebra](crate::Algebra).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CompilationError {
    /// A `UNION` element without any branch.
    #[error("A UNION must have at least one branch")]
    EmptyUnion,
    /// A row of a `VALUES` block has a different number of values than there are variables.
    #[error("A VALUES row has {actual} values but {expected} variables are declared")]
    InvalidValuesRow {
        /// The number of declared variables.
        expected: usize,
        /// The number of values in the row.
        actual: usize,
    },
    /// A `VALUES` block declares the same variable more than once.
    #[error("The variable {0} is declared more than once in a VALUES block")]
    DuplicateValuesVariable(Variable),
}
