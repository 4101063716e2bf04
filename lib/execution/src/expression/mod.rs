//! Evaluation of [Expression]s for single solutions.

mod comparison;
mod functions;

pub use comparison::{effective_boolean_value, equals, partial_compare};

use crate::{ExpressionEvaluationError, QueryEvaluationError};
use rdf_algebra_logical::{ExistsPattern, Expression};
use rdf_algebra_model::{Literal, Numeric, Solution, Term};
use std::cmp::Ordering;

/// Checks whether the pattern of an `EXISTS` has a solution that is compatible with a given
/// solution.
pub trait ExistenceProbe {
    fn exists(
        &self,
        pattern: &ExistsPattern,
        solution: &Solution,
    ) -> Result<bool, QueryEvaluationError>;
}

/// Evaluates expressions of `FILTER`, `BIND`, and `OPTIONAL` conditions.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluates `expression` for `solution`. `EXISTS` patterns are checked with `probe`.
    fn evaluate(
        &self,
        expression: &Expression,
        solution: &Solution,
        probe: &dyn ExistenceProbe,
    ) -> Result<Term, ExpressionEvaluationError>;

    /// Evaluates the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv) of
    /// `expression` for `solution`.
    fn evaluate_boolean(
        &self,
        expression: &Expression,
        solution: &Solution,
        probe: &dyn ExistenceProbe,
    ) -> Result<bool, ExpressionEvaluationError> {
        let term = self.evaluate(expression, solution, probe)?;
        effective_boolean_value(&term)
    }
}

/// The built-in [ExpressionEvaluator].
///
/// Supports the SPARQL operators, `IF`, `COALESCE`, `EXISTS`, and a set of string and term
/// functions. Other functions fail with [ExpressionEvaluationError::UnsupportedFunction].
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultExpressionEvaluator {}

impl DefaultExpressionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExpressionEvaluator for DefaultExpressionEvaluator {
    fn evaluate(
        &self,
        expression: &Expression,
        solution: &Solution,
        probe: &dyn ExistenceProbe,
    ) -> Result<Term, ExpressionEvaluationError> {
        let context = EvaluationContext { solution, probe };
        context.evaluate(expression)
    }
}

struct EvaluationContext<'e> {
    solution: &'e Solution,
    probe: &'e dyn ExistenceProbe,
}

impl EvaluationContext<'_> {
    fn evaluate(&self, expression: &Expression) -> Result<Term, ExpressionEvaluationError> {
        match expression {
            Expression::NamedNode(node) => Ok(node.clone().into()),
            Expression::Literal(literal) => Ok(literal.clone().into()),
            Expression::Variable(variable) => self
                .solution
                .get(variable)
                .cloned()
                .ok_or_else(|| ExpressionEvaluationError::UnboundVariable(variable.clone())),
            Expression::Bound(variable) => Ok(boolean(self.solution.contains(variable))),
            Expression::Or(lhs, rhs) => self.evaluate_or(lhs, rhs).map(boolean),
            Expression::And(lhs, rhs) => self.evaluate_and(lhs, rhs).map(boolean),
            Expression::Not(inner) => Ok(boolean(!self.evaluate_boolean(inner)?)),
            Expression::Equal(lhs, rhs) => {
                let (lhs, rhs) = self.evaluate_pair(lhs, rhs)?;
                Ok(boolean(equals(&lhs, &rhs)?))
            }
            Expression::SameTerm(lhs, rhs) => {
                let (lhs, rhs) = self.evaluate_pair(lhs, rhs)?;
                Ok(boolean(lhs == rhs))
            }
            Expression::Greater(lhs, rhs) => self.compare(lhs, rhs, Ordering::is_gt),
            Expression::GreaterOrEqual(lhs, rhs) => self.compare(lhs, rhs, Ordering::is_ge),
            Expression::Less(lhs, rhs) => self.compare(lhs, rhs, Ordering::is_lt),
            Expression::LessOrEqual(lhs, rhs) => self.compare(lhs, rhs, Ordering::is_le),
            Expression::In(lhs, candidates) => self.evaluate_in(lhs, candidates).map(boolean),
            Expression::Add(lhs, rhs) => self.arithmetic(lhs, rhs, Numeric::checked_add),
            Expression::Subtract(lhs, rhs) => self.arithmetic(lhs, rhs, Numeric::checked_sub),
            Expression::Multiply(lhs, rhs) => self.arithmetic(lhs, rhs, Numeric::checked_mul),
            Expression::Divide(lhs, rhs) => {
                let (lhs, rhs) = (self.numeric(lhs)?, self.numeric(rhs)?);
                if is_exact_zero(rhs) {
                    return Err(ExpressionEvaluationError::DivisionByZero);
                }
                Ok(lhs.checked_div(rhs)?.into_literal().into())
            }
            Expression::UnaryPlus(inner) => Ok(self.numeric(inner)?.into_literal().into()),
            Expression::UnaryMinus(inner) => {
                Ok(self.numeric(inner)?.checked_neg()?.into_literal().into())
            }
            Expression::Exists(pattern) => {
                let exists = self.probe.exists(pattern, self.solution)?;
                Ok(boolean(exists))
            }
            Expression::If(condition, then, otherwise) => {
                if self.evaluate_boolean(condition)? {
                    self.evaluate(then)
                } else {
                    self.evaluate(otherwise)
                }
            }
            Expression::Coalesce(alternatives) => {
                for alternative in alternatives {
                    match self.evaluate(alternative) {
                        Ok(term) => return Ok(term),
                        Err(error) if error.is_fatal() => return Err(error),
                        Err(_) => {}
                    }
                }
                Err(ExpressionEvaluationError::TypeError)
            }
            Expression::FunctionCall(function, args) => {
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                functions::evaluate_function(function, &args)
            }
        }
    }

    fn evaluate_boolean(&self, expression: &Expression) -> Result<bool, ExpressionEvaluationError> {
        let term = self.evaluate(expression)?;
        effective_boolean_value(&term)
    }

    fn evaluate_pair(
        &self,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<(Term, Term), ExpressionEvaluationError> {
        Ok((self.evaluate(lhs)?, self.evaluate(rhs)?))
    }

    /// [Logical-or](https://www.w3.org/TR/sparql11-query/#func-logical-or): `true` wins over an
    /// error.
    fn evaluate_or(
        &self,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<bool, ExpressionEvaluationError> {
        match self.evaluate_boolean(lhs) {
            Ok(true) => Ok(true),
            Ok(false) => self.evaluate_boolean(rhs),
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                if self.evaluate_boolean(rhs)? {
                    Ok(true)
                } else {
                    Err(error)
                }
            }
        }
    }

    /// [Logical-and](https://www.w3.org/TR/sparql11-query/#func-logical-and): `false` wins over
    /// an error.
    fn evaluate_and(
        &self,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<bool, ExpressionEvaluationError> {
        match self.evaluate_boolean(lhs) {
            Ok(true) => self.evaluate_boolean(rhs),
            Ok(false) => Ok(false),
            Err(error) if error.is_fatal() => Err(error),
            Err(error) => {
                if self.evaluate_boolean(rhs)? {
                    Err(error)
                } else {
                    Ok(false)
                }
            }
        }
    }

    /// [IN](https://www.w3.org/TR/sparql11-query/#func-in): an error is only raised if no
    /// candidate is equal.
    fn evaluate_in(
        &self,
        lhs: &Expression,
        candidates: &[Expression],
    ) -> Result<bool, ExpressionEvaluationError> {
        let lhs = self.evaluate(lhs)?;
        let mut error = None;
        for candidate in candidates {
            match self
                .evaluate(candidate)
                .and_then(|candidate| equals(&lhs, &candidate))
            {
                Ok(true) => return Ok(true),
                Ok(false) => {}
                Err(candidate_error) if candidate_error.is_fatal() => return Err(candidate_error),
                Err(candidate_error) => error = Some(candidate_error),
            }
        }
        error.map_or(Ok(false), Err)
    }

    fn compare(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        predicate: fn(Ordering) -> bool,
    ) -> Result<Term, ExpressionEvaluationError> {
        let (lhs, rhs) = self.evaluate_pair(lhs, rhs)?;
        let ordering = partial_compare(&lhs, &rhs)?;
        Ok(boolean(ordering.is_some_and(predicate)))
    }

    fn numeric(&self, expression: &Expression) -> Result<Numeric, ExpressionEvaluationError> {
        match self.evaluate(expression)? {
            Term::Literal(literal) => Ok(Numeric::from_literal(&literal)?),
            _ => Err(ExpressionEvaluationError::TypeError),
        }
    }

    fn arithmetic(
        &self,
        lhs: &Expression,
        rhs: &Expression,
        operation: fn(Numeric, Numeric) -> rdf_algebra_model::ThinResult<Numeric>,
    ) -> Result<Term, ExpressionEvaluationError> {
        let (lhs, rhs) = (self.numeric(lhs)?, self.numeric(rhs)?);
        Ok(operation(lhs, rhs)?.into_literal().into())
    }
}

fn boolean(value: bool) -> Term {
    Literal::from(value).into()
}

fn is_exact_zero(value: Numeric) -> bool {
    match value {
        Numeric::Integer(value) => value == 0,
        Numeric::Decimal(value) => value == rdf_algebra_model::Decimal::from(0),
        Numeric::Float(_) | Numeric::Double(_) => false,
    }
}
