use crate::{AlgebraVariables, CompilationError, InlineData};
use itertools::Itertools;
use rdf_algebra_model::{Solution, Variable};
use std::collections::BTreeSet;
use std::fmt::Formatter;

/// A constant multiset of solutions.
///
/// The unit table (a single solution without bindings) is the identity of the join. The empty
/// table (no solution at all) is its zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    variables: Vec<Variable>,
    rows: Vec<Solution>,
    analysis: AlgebraVariables,
}

impl Table {
    /// Creates a new [Table]. `variables` declares the columns of the table. Rows may leave any of
    /// them unbound.
    pub fn new(variables: Vec<Variable>, rows: Vec<Solution>) -> Self {
        let mut projected = variables.iter().cloned().collect::<BTreeSet<_>>();
        for row in &rows {
            projected.extend(row.variables().cloned());
        }
        let fixed = projected
            .iter()
            .filter(|variable| rows.iter().all(|row| row.contains(variable)))
            .cloned()
            .collect();
        Self {
            variables,
            rows,
            analysis: AlgebraVariables::new(projected, fixed),
        }
    }

    /// Returns the table with a single solution that binds no variable.
    pub fn unit() -> Self {
        Self::new(Vec::new(), vec![Solution::new()])
    }

    /// Returns the table without any solution.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    /// Creates a table from the data of a `VALUES` block. `UNDEF` values are left unbound.
    pub fn try_from_inline_data(data: &InlineData) -> Result<Self, CompilationError> {
        if let Some(duplicate) = data.variables.iter().duplicates().next() {
            return Err(CompilationError::DuplicateValuesVariable(duplicate.clone()));
        }

        let rows = data
            .rows
            .iter()
            .map(|row| {
                if row.len() != data.variables.len() {
                    return Err(CompilationError::InvalidValuesRow {
                        expected: data.variables.len(),
                        actual: row.len(),
                    });
                }
                Ok(data
                    .variables
                    .iter()
                    .zip(row)
                    .filter_map(|(variable, value)| {
                        value.as_ref().map(|value| (variable.clone(), value.clone()))
                    })
                    .collect::<Solution>())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(data.variables.clone(), rows))
    }

    /// Returns whether this is the unit table.
    pub fn is_unit(&self) -> bool {
        matches!(self.rows.as_slice(), [row] if row.is_empty())
    }

    /// Returns whether the table has no solution.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The declared columns of the table.
    pub fn declared_variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn rows(&self) -> &[Solution] {
        &self.rows
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.analysis
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_unit() {
            return f.write_str("Table: unit");
        }
        write!(
            f,
            "Table: {} ({} rows)",
            self.analysis.projected().iter().join(", "),
            self.rows.len()
        )
    }
}
