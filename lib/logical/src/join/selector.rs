use crate::join::JoinStrategy;
use crate::{Algebra, CompilerOptions};
use rdf_algebra_model::Variable;
use std::collections::BTreeSet;

/// Selects the [JoinStrategy] for a pair of operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinStrategySelector {
    memory_bounded: bool,
}

impl JoinStrategySelector {
    /// Creates a new [JoinStrategySelector].
    ///
    /// If `memory_bounded` is set, joins with shared variables use the loop strategy instead of
    /// building hash indices.
    pub fn new(memory_bounded: bool) -> Self {
        Self { memory_bounded }
    }

    /// Selects the strategy for joining `lhs` with `rhs`.
    pub fn select(&self, lhs: &Algebra, rhs: &Algebra) -> JoinStrategy {
        self.select_for_variables(
            lhs.projected_variables(),
            lhs.fixed_variables(),
            rhs.projected_variables(),
            rhs.fixed_variables(),
        )
    }

    /// Selects the strategy for an `EXISTS` check of `rhs` against the solutions of `lhs`.
    pub fn select_existence(&self, lhs: &Algebra, rhs: &Algebra) -> JoinStrategy {
        JoinStrategy::Existence(Box::new(self.select(lhs, rhs)))
    }

    /// Selects the strategy for a `NOT EXISTS` check of `rhs` against the solutions of `lhs`.
    pub fn select_non_existence(&self, lhs: &Algebra, rhs: &Algebra) -> JoinStrategy {
        JoinStrategy::NonExistence(Box::new(self.select(lhs, rhs)))
    }

    /// Selects the strategy based on the projected and fixed variables of the operands.
    ///
    /// 1. Without shared variables, the product of both sides is computed.
    /// 2. If memory-bounded joins are requested, the loop strategy is used.
    /// 3. If every join variable is fixed on both sides, the fixed-hash strategy is used.
    /// 4. Otherwise, the floating-hash strategy is used.
    pub fn select_for_variables(
        &self,
        lhs_projected: &BTreeSet<Variable>,
        lhs_fixed: &BTreeSet<Variable>,
        rhs_projected: &BTreeSet<Variable>,
        rhs_fixed: &BTreeSet<Variable>,
    ) -> JoinStrategy {
        let join_variables = lhs_projected
            .intersection(rhs_projected)
            .cloned()
            .collect::<Vec<_>>();

        let strategy = if join_variables.is_empty() {
            JoinStrategy::Product
        } else if self.memory_bounded {
            JoinStrategy::Loop { join_variables }
        } else if join_variables
            .iter()
            .all(|variable| lhs_fixed.contains(variable) && rhs_fixed.contains(variable))
        {
            JoinStrategy::FixedHash { join_variables }
        } else {
            JoinStrategy::FloatingHash { join_variables }
        };

        tracing::trace!(%strategy, "Selected join strategy");
        strategy
    }
}

impl From<CompilerOptions> for JoinStrategySelector {
    fn from(options: CompilerOptions) -> Self {
        Self::new(options.memory_bounded_joins)
    }
}
