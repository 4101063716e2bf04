use crate::eval::{Evaluator, SolutionIter};
use crate::join::{
    create_join_worker, create_minus_worker, JoinWorker, LeftJoinFilter, LeftJoinWorker, MatchIter,
};
use crate::QueryEvaluationError;
use rdf_algebra_logical::join::JoinStrategy;
use rdf_algebra_logical::{Join, LeftJoin, Minus};
use rdf_algebra_model::Solution;

type WorkerResult<'b> = Result<Box<dyn JoinWorker + 'b>, QueryEvaluationError>;

type PrepareWorker<'b> = Box<dyn FnOnce() -> WorkerResult<'b> + 'b>;

/// How a left-hand solution and one of its matches become an output solution.
enum JoinOutput<'b> {
    /// Combine both with the join strategy.
    Combine(&'b JoinStrategy),
    /// The matches already are complete solutions.
    Matches,
}

/// Streams the left-hand solutions of a join and probes a worker prepared from the right-hand
/// side for each of them.
///
/// The right-hand side is materialized when the first left-hand solution arrives, so an empty
/// left-hand side never evaluates it.
pub(super) struct JoinIterator<'b> {
    lhs: SolutionIter<'b>,
    output: JoinOutput<'b>,
    prepare: Option<PrepareWorker<'b>>,
    worker: Option<Box<dyn JoinWorker + 'b>>,
    current: Option<(Solution, MatchIter)>,
}

impl<'b> JoinIterator<'b> {
    fn new(lhs: SolutionIter<'b>, output: JoinOutput<'b>, prepare: PrepareWorker<'b>) -> Self {
        Self {
            lhs,
            output,
            prepare: Some(prepare),
            worker: None,
            current: None,
        }
    }

    pub(super) fn join<'a: 'b>(evaluator: &Evaluator<'a>, join: &'b Join) -> Self {
        let rhs_evaluator = evaluator.clone();
        let strategy = join.strategy();
        Self::new(
            evaluator.evaluate(join.lhs()),
            JoinOutput::Combine(strategy),
            Box::new(move || -> WorkerResult<'b> {
                let rows = rhs_evaluator.materialize(join.rhs(), strategy)?;
                Ok(create_join_worker(strategy, rows))
            }),
        )
    }

    pub(super) fn left_join<'a: 'b>(evaluator: &Evaluator<'a>, left_join: &'b LeftJoin) -> Self {
        let rhs_evaluator = evaluator.clone();
        let strategy = left_join.strategy();
        Self::new(
            evaluator.evaluate(left_join.lhs()),
            JoinOutput::Matches,
            Box::new(move || -> WorkerResult<'b> {
                let rows = rhs_evaluator.materialize(left_join.rhs(), strategy)?;
                let filters = left_join.filters();
                let filter: Option<LeftJoinFilter<'b>> = if filters.is_empty() {
                    None
                } else {
                    Some(Box::new(move |solution: &Solution| {
                        rhs_evaluator.filter_accepts(filters, solution)
                    }))
                };
                Ok(Box::new(LeftJoinWorker::new(
                    create_join_worker(strategy, rows),
                    filter,
                )))
            }),
        )
    }

    pub(super) fn minus<'a: 'b>(evaluator: &Evaluator<'a>, minus: &'b Minus) -> Self {
        let rhs_evaluator = evaluator.clone();
        let strategy = minus.strategy();
        Self::new(
            evaluator.evaluate(minus.lhs()),
            JoinOutput::Combine(strategy),
            Box::new(move || -> WorkerResult<'b> {
                let rows = rhs_evaluator.materialize(minus.rhs(), strategy)?;
                Ok(create_minus_worker(strategy, rows))
            }),
        )
    }

    fn find(&mut self, lhs: &Solution) -> Result<MatchIter, QueryEvaluationError> {
        if let Some(prepare) = self.prepare.take() {
            self.worker = Some(prepare()?);
        }
        match &self.worker {
            Some(worker) => worker.find(lhs),
            None => QueryEvaluationError::internal("The join worker has not been prepared"),
        }
    }
}

impl Iterator for JoinIterator<'_> {
    type Item = Result<Solution, QueryEvaluationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((lhs, matches)) = &mut self.current {
                if let Some(rhs) = matches.next() {
                    let solution = match self.output {
                        JoinOutput::Combine(strategy) => strategy.combine(lhs, &rhs),
                        JoinOutput::Matches => rhs,
                    };
                    return Some(Ok(solution));
                }
                self.current = None;
            }

            let lhs = match self.lhs.next()? {
                Ok(lhs) => lhs,
                Err(error) => return Some(Err(error)),
            };
            match self.find(&lhs) {
                Ok(matches) => self.current = Some((lhs, matches)),
                Err(error) => return Some(Err(error)),
            }
        }
    }
}
