use crate::{Algebra, AlgebraVariables};

/// The multiset union of two operands. A solution keeps only the bindings of its own branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Union {
    lhs: Box<Algebra>,
    rhs: Box<Algebra>,
    variables: AlgebraVariables,
}

impl Union {
    /// Creates a new [Union].
    pub fn new(lhs: Algebra, rhs: Algebra) -> Self {
        let projected = lhs
            .projected_variables()
            .union(rhs.projected_variables())
            .cloned()
            .collect();
        let fixed = lhs
            .fixed_variables()
            .intersection(rhs.fixed_variables())
            .cloned()
            .collect();
        Self {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            variables: AlgebraVariables::new(projected, fixed),
        }
    }

    pub fn lhs(&self) -> &Algebra {
        &self.lhs
    }

    pub fn rhs(&self) -> &Algebra {
        &self.rhs
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }
}
