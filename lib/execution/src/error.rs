use rdf_algebra_common::error::StorageError;
use rdf_algebra_logical::CompilationError;
use rdf_algebra_model::{DuplicateBindingError, NamedNode, ThinError, Variable};
use std::convert::Infallible;
use std::error::Error;

/// A query evaluation error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryEvaluationError {
    /// The query could not be compiled.
    #[error(transparent)]
    Compilation(#[from] CompilationError),
    /// An error from the storage.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// An expression of a `BIND` could not be evaluated.
    #[error(transparent)]
    Expression(ExpressionEvaluationError),
    /// A variable has been bound twice.
    #[error(transparent)]
    DuplicateBinding(#[from] DuplicateBindingError),
    /// The evaluation has been cancelled.
    #[error("The query evaluation has been cancelled")]
    Cancelled,
    /// Error during `SERVICE` evaluation
    #[error("{0}")]
    Service(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// The given `SERVICE` is not supported
    #[error("The service {0} is not supported")]
    UnsupportedService(NamedNode),
    #[error("An internal error that likely indicates towards a bug in the engine: {0}")]
    Internal(String),
}

impl QueryEvaluationError {
    pub fn internal<T>(cause: impl Into<String>) -> Result<T, Self> {
        Err(QueryEvaluationError::Internal(cause.into()))
    }
}

impl From<Infallible> for QueryEvaluationError {
    #[inline]
    fn from(error: Infallible) -> Self {
        match error {}
    }
}

/// Fatal errors raised while evaluating an `EXISTS` pattern are unwrapped, so that they are
/// reported as they happened.
impl From<ExpressionEvaluationError> for QueryEvaluationError {
    fn from(error: ExpressionEvaluationError) -> Self {
        match error {
            ExpressionEvaluationError::Query(error) => *error,
            error => Self::Expression(error),
        }
    }
}

/// An error raised while evaluating an expression for a single solution.
///
/// All variants except [ExpressionEvaluationError::Query] are part of the regular SPARQL
/// semantics. For example, a `FILTER` treats them as `false`.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExpressionEvaluationError {
    #[error("The variable {0} is not bound")]
    UnboundVariable(Variable),
    #[error("The operands have an unsupported type or value")]
    TypeError,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("The function {0} is not supported")]
    UnsupportedFunction(String),
    /// A fatal error raised while evaluating a graph pattern within the expression.
    #[error(transparent)]
    Query(Box<QueryEvaluationError>),
}

impl ExpressionEvaluationError {
    /// Returns whether this error must abort the query instead of being handled by the
    /// expression semantics.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

impl From<ThinError> for ExpressionEvaluationError {
    fn from(_: ThinError) -> Self {
        Self::TypeError
    }
}

impl From<QueryEvaluationError> for ExpressionEvaluationError {
    fn from(error: QueryEvaluationError) -> Self {
        Self::Query(Box::new(error))
    }
}
