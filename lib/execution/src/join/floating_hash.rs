use crate::join::{compatible_rows, JoinWorker, MatchIter, SolutionRows};
use crate::QueryEvaluationError;
use itertools::{EitherOrBoth, Itertools};
use rdf_algebra_model::{Solution, Term, Variable};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// The index of a single join variable.
#[derive(Debug, Default)]
struct VariableIndex {
    /// Row indices by the value of the variable.
    values: FxHashMap<Term, Vec<usize>>,
    /// Row indices of solutions that leave the variable unbound.
    nulls: Vec<usize>,
}

/// Indexes the right-hand solutions by each join variable separately.
///
/// An unbound variable is compatible with every value. Therefore, the candidates of a bound
/// left-hand variable are the rows with the same value plus the rows that leave the variable
/// unbound. The candidates of all bound left-hand variables are intersected and checked for
/// compatibility.
#[derive(Debug)]
pub struct FloatingHashJoinWorker {
    rows: SolutionRows,
    join_variables: Arc<[Variable]>,
    indices: Vec<VariableIndex>,
}

impl FloatingHashJoinWorker {
    pub fn new(rows: SolutionRows, join_variables: Vec<Variable>) -> Self {
        let mut indices = join_variables
            .iter()
            .map(|_| VariableIndex::default())
            .collect::<Vec<_>>();
        for (i, row) in rows.iter().enumerate() {
            for (variable, index) in join_variables.iter().zip(indices.iter_mut()) {
                match row.get(variable) {
                    Some(term) => index.values.entry(term.clone()).or_default().push(i),
                    None => index.nulls.push(i),
                }
            }
        }

        Self {
            rows,
            join_variables: join_variables.into(),
            indices,
        }
    }

    /// Returns the sorted candidate rows for the value of a single join variable.
    fn candidates_for(index: &VariableIndex, term: &Term) -> Vec<usize> {
        let matching = index.values.get(term).map(Vec::as_slice).unwrap_or_default();
        // Both lists are sorted and disjoint.
        matching
            .iter()
            .merge(index.nulls.iter())
            .copied()
            .collect()
    }
}

impl JoinWorker for FloatingHashJoinWorker {
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        if self.rows.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }

        let mut candidates: Option<Vec<usize>> = None;
        for (variable, index) in self.join_variables.iter().zip(&self.indices) {
            let Some(term) = lhs.get(variable) else {
                continue;
            };

            let variable_candidates = Self::candidates_for(index, term);
            candidates = Some(match candidates {
                None => variable_candidates,
                Some(candidates) => intersect_sorted(&candidates, &variable_candidates),
            });
        }

        Ok(match candidates {
            Some(candidates) => {
                compatible_rows(&self.rows, candidates, lhs, &self.join_variables)
            }
            None => compatible_rows(
                &self.rows,
                0..self.rows.len(),
                lhs,
                &self.join_variables,
            ),
        })
    }
}

fn intersect_sorted(lhs: &[usize], rhs: &[usize]) -> Vec<usize> {
    lhs.iter()
        .merge_join_by(rhs.iter(), |lhs, rhs| lhs.cmp(rhs))
        .filter_map(|entry| match entry {
            EitherOrBoth::Both(index, _) => Some(*index),
            EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdf_algebra_model::NamedNode;

    fn var(name: &str) -> Variable {
        Variable::new_unchecked(name)
    }

    fn term(suffix: &str) -> Term {
        NamedNode::new_unchecked(format!("http://example.com/{suffix}")).into()
    }

    fn solution(bindings: &[(&str, &str)]) -> Solution {
        bindings
            .iter()
            .map(|(variable, value)| (var(variable), term(value)))
            .collect()
    }

    #[test]
    fn test_intersect_sorted() {
        assert_eq!(intersect_sorted(&[1, 3, 5, 7], &[2, 3, 7, 8]), vec![3, 7]);
        assert_eq!(intersect_sorted(&[], &[1]), Vec::<usize>::new());
    }

    #[test]
    fn test_unbound_rows_match_every_value() {
        let rows: SolutionRows = vec![
            solution(&[("a", "1"), ("b", "1")]),
            solution(&[("b", "2")]),
            solution(&[("a", "2"), ("b", "2")]),
        ]
        .into();
        let worker = FloatingHashJoinWorker::new(rows, vec![var("a"), var("b")]);

        let matches = worker
            .find(&solution(&[("a", "1"), ("b", "2")]))
            .unwrap()
            .collect::<Vec<_>>();
        assert_eq!(matches, vec![solution(&[("b", "2")])]);
    }

    #[test]
    fn test_unbound_lhs_variable_matches_every_row() {
        let rows: SolutionRows = vec![
            solution(&[("a", "1"), ("b", "1")]),
            solution(&[("a", "2"), ("b", "1")]),
            solution(&[("a", "2"), ("b", "2")]),
        ]
        .into();
        let worker = FloatingHashJoinWorker::new(rows, vec![var("a"), var("b")]);

        let matches = worker
            .find(&solution(&[("b", "1")]))
            .unwrap()
            .count();
        assert_eq!(matches, 2);
    }
}
