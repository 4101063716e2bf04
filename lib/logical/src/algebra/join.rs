use crate::join::{JoinStrategy, JoinStrategySelector};
use crate::{Algebra, AlgebraVariables, Expression};
use itertools::Itertools;
use std::fmt::Formatter;

/// The inner join of two multisets of solutions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Join {
    lhs: Box<Algebra>,
    rhs: Box<Algebra>,
    strategy: JoinStrategy,
    variables: AlgebraVariables,
}

impl Join {
    /// Creates a new [Join] with the given `strategy`.
    pub fn new(lhs: Algebra, rhs: Algebra, strategy: JoinStrategy) -> Self {
        let projected = lhs
            .projected_variables()
            .union(rhs.projected_variables())
            .cloned()
            .collect();
        let fixed = lhs
            .fixed_variables()
            .union(rhs.fixed_variables())
            .cloned()
            .collect();
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            strategy,
            variables: AlgebraVariables::new(projected, fixed),
        }
    }

    /// Joins `lhs` and `rhs`, selecting the strategy with `selector`.
    ///
    /// The unit table is the identity of the join. If either side is the unit table, the other
    /// side is returned unchanged and no [Join] is created.
    pub fn create(lhs: Algebra, rhs: Algebra, selector: &JoinStrategySelector) -> Algebra {
        if rhs.is_unit() {
            return lhs;
        }
        if lhs.is_unit() {
            return rhs;
        }

        let strategy = selector.select(&lhs, &rhs);
        Self::new(lhs, rhs, strategy).into()
    }

    pub fn lhs(&self) -> &Algebra {
        &self.lhs
    }

    pub fn rhs(&self) -> &Algebra {
        &self.rhs
    }

    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Join: {}", self.strategy)
    }
}

/// The left outer join of two multisets of solutions (`OPTIONAL`).
///
/// Every solution of the left-hand side is kept. It is extended with each compatible right-hand
/// solution that satisfies the filter, or returned as-is if there is no such solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeftJoin {
    lhs: Box<Algebra>,
    rhs: Box<Algebra>,
    filters: Vec<Expression>,
    strategy: JoinStrategy,
    variables: AlgebraVariables,
}

impl LeftJoin {
    /// Creates a new [LeftJoin].
    pub fn new(
        lhs: Algebra,
        rhs: Algebra,
        filters: Vec<Expression>,
        strategy: JoinStrategy,
    ) -> Self {
        let projected = lhs
            .projected_variables()
            .union(rhs.projected_variables())
            .cloned()
            .collect();
        let fixed = lhs.fixed_variables().clone();
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            filters,
            strategy,
            variables: AlgebraVariables::new(projected, fixed),
        }
    }

    pub fn lhs(&self) -> &Algebra {
        &self.lhs
    }

    pub fn rhs(&self) -> &Algebra {
        &self.rhs
    }

    /// The expressions that a joined solution must satisfy. Empty if there is no filter.
    pub fn filters(&self) -> &[Expression] {
        &self.filters
    }

    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "LeftJoin: {}", self.strategy)?;
        if !self.filters.is_empty() {
            write!(f, " FILTER {}", self.filters.iter().join(", "))?;
        }
        Ok(())
    }
}

/// Removes every left-hand solution that has a compatible right-hand solution sharing at least
/// one bound variable (`MINUS`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Minus {
    lhs: Box<Algebra>,
    rhs: Box<Algebra>,
    strategy: JoinStrategy,
    variables: AlgebraVariables,
}

impl Minus {
    /// Creates a new [Minus]. The strategy should be a non-existence strategy.
    pub fn new(lhs: Algebra, rhs: Algebra, strategy: JoinStrategy) -> Self {
        let variables = lhs.variables().clone();
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            strategy,
            variables,
        }
    }

    /// Creates a new [Minus], selecting the strategy with `selector`.
    pub fn create(lhs: Algebra, rhs: Algebra, selector: &JoinStrategySelector) -> Self {
        let strategy = selector.select_non_existence(&lhs, &rhs);
        Self::new(lhs, rhs, strategy)
    }

    pub fn lhs(&self) -> &Algebra {
        &self.lhs
    }

    pub fn rhs(&self) -> &Algebra {
        &self.rhs
    }

    pub fn strategy(&self) -> &JoinStrategy {
        &self.strategy
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Minus: {}", self.strategy)
    }
}
