use crate::join::{JoinWorker, MatchIter};
use crate::QueryEvaluationError;
use rdf_algebra_model::Solution;
use std::iter::once;

/// Decides whether a joined solution satisfies the filter of a left join.
pub type LeftJoinFilter<'f> = Box<dyn Fn(&Solution) -> Result<bool, QueryEvaluationError> + 'f>;

/// Finds the joined solutions of a left join (`OPTIONAL`).
///
/// Every match of the inner worker is joined with the left-hand solution and checked against the
/// filter. If no joined solution passes, the left-hand solution itself is the only match. The
/// matches of this worker are therefore complete solutions and never empty.
pub struct LeftJoinWorker<'f> {
    inner: Box<dyn JoinWorker>,
    filter: Option<LeftJoinFilter<'f>>,
}

impl<'f> LeftJoinWorker<'f> {
    /// Creates a new [LeftJoinWorker]. Without a filter, every match of `inner` is accepted.
    pub fn new(inner: Box<dyn JoinWorker>, filter: Option<LeftJoinFilter<'f>>) -> Self {
        Self { inner, filter }
    }
}

impl JoinWorker for LeftJoinWorker<'_> {
    fn find(&self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        let mut matches = Vec::new();
        for rhs in self.inner.find(lhs)? {
            let joined = lhs.join(&rhs);
            let accepted = match &self.filter {
                Some(filter) => filter(&joined)?,
                None => true,
            };
            if accepted {
                matches.push(joined);
            }
        }

        if matches.is_empty() {
            return Ok(Box::new(once(lhs.clone())));
        }
        Ok(Box::new(matches.into_iter()))
    }
}
