mod bgp;
mod join;
mod path;

use crate::active_graph::ActiveGraph;
use crate::expression::ExistenceProbe;
use crate::join::{create_join_worker, JoinWorker, SolutionRows};
use crate::{ExecutionContext, ExpressionEvaluationError, QueryEvaluationError};
use join::JoinIterator;
use rdf_algebra_logical::join::JoinStrategy;
use rdf_algebra_logical::{
    Algebra, ExistsPattern, Expression, Extend, Filter, NamedGraph, Service, Slice,
};
use rdf_algebra_model::{
    GraphName, NamedNodePattern, NamedOrBlankNode, Solution, Term, Variable,
};
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::iter::{empty, from_fn, once, once_with};
use std::rc::Rc;

/// A lazy sequence of solutions. Evaluation stops after the first error.
pub type SolutionIter<'a> = Box<dyn Iterator<Item = Result<Solution, QueryEvaluationError>> + 'a>;

/// Evaluates `algebra` in `context`.
pub fn evaluate<'a>(context: &'a ExecutionContext, algebra: &'a Algebra) -> SolutionIter<'a> {
    Evaluator::new(context).evaluate(algebra)
}

/// The workers of the `EXISTS` patterns that have been probed in an active graph, keyed by the
/// address of the pattern.
type ExistsWorkers = Rc<RefCell<FxHashMap<*const ExistsPattern, Rc<dyn JoinWorker>>>>;

/// Turns [Algebra] nodes into lazy solution sequences.
///
/// Every node pulls the solutions of its children on demand. The right-hand side of a join is
/// only materialized when the first left-hand solution arrives.
#[derive(Clone)]
pub struct Evaluator<'a> {
    context: &'a ExecutionContext,
    active_graph: Rc<ActiveGraph>,
    exists_workers: ExistsWorkers,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator that matches patterns against the default active graph of `context`.
    pub fn new(context: &'a ExecutionContext) -> Self {
        Self {
            context,
            active_graph: Rc::new(context.default_active_graph()),
            exists_workers: ExistsWorkers::default(),
        }
    }

    pub fn context(&self) -> &'a ExecutionContext {
        self.context
    }

    pub fn active_graph(&self) -> &ActiveGraph {
        &self.active_graph
    }

    /// Returns an evaluator that matches patterns against `active_graph`.
    #[must_use]
    pub fn with_active_graph(&self, active_graph: ActiveGraph) -> Self {
        Self {
            context: self.context,
            active_graph: Rc::new(active_graph),
            exists_workers: ExistsWorkers::default(),
        }
    }

    /// Evaluates `node`. Cancellation is checked every time a solution is pulled.
    pub fn evaluate<'b>(&self, node: &'b Algebra) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let solutions: SolutionIter<'b> = match node {
            Algebra::Bgp(bgp) => bgp::evaluate_bgp(self, bgp),
            Algebra::PropertyPath(path) => path::evaluate_property_path(self, path),
            Algebra::Join(join) => Box::new(JoinIterator::join(self, join)),
            Algebra::LeftJoin(left_join) => Box::new(JoinIterator::left_join(self, left_join)),
            Algebra::Minus(minus) => Box::new(JoinIterator::minus(self, minus)),
            Algebra::Union(union) => Box::new(
                self.evaluate(union.lhs())
                    .chain(self.evaluate(union.rhs())),
            ),
            Algebra::Filter(filter) => self.evaluate_filter(filter),
            Algebra::Extend(extend) => self.evaluate_extend(extend),
            Algebra::NamedGraph(graph) => self.evaluate_named_graph(graph),
            Algebra::Service(service) => self.evaluate_service(service),
            Algebra::Slice(slice) => self.evaluate_slice(slice),
            Algebra::Table(table) => Box::new(table.rows().iter().cloned().map(Ok)),
            Algebra::Project(project) => {
                let projection = project.projection();
                Box::new(
                    self.evaluate(project.inner())
                        .map(move |solution| solution.map(|solution| solution.project(projection))),
                )
            }
            Algebra::Distinct(distinct) => {
                let mut seen = FxHashSet::default();
                Box::new(
                    self.evaluate(distinct.inner())
                        .filter(move |solution| match solution {
                            Ok(solution) => seen.insert(solution.clone()),
                            Err(_) => true,
                        }),
                )
            }
            Algebra::Reduced(reduced) => {
                let mut previous: Option<Solution> = None;
                Box::new(
                    self.evaluate(reduced.inner())
                        .filter(move |solution| match solution {
                            Ok(solution) if previous.as_ref() == Some(solution) => false,
                            Ok(solution) => {
                                previous = Some(solution.clone());
                                true
                            }
                            Err(_) => true,
                        }),
                )
            }
        };
        self.stop_on_error(solutions)
    }

    /// Evaluates `node` completely.
    fn materialize(
        &self,
        node: &Algebra,
        strategy: &JoinStrategy,
    ) -> Result<SolutionRows, QueryEvaluationError> {
        let rows = self.evaluate(node).collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(%strategy, rows = rows.len(), "Preparing join worker");
        Ok(rows.into())
    }

    /// Checks whether every expression of a filter evaluates to `true` for `solution`.
    ///
    /// Expression errors reject the solution. Errors of the query itself (e.g., cancellation
    /// while probing an `EXISTS`) are propagated.
    fn filter_accepts(
        &self,
        expressions: &[Expression],
        solution: &Solution,
    ) -> Result<bool, QueryEvaluationError> {
        let evaluator = self.context.expression_evaluator();
        for expression in expressions {
            match evaluator.evaluate_boolean(expression, solution, self) {
                Ok(true) => {}
                Ok(false) => return Ok(false),
                Err(ExpressionEvaluationError::Query(error)) => return Err(*error),
                Err(_) => return Ok(false),
            }
        }
        Ok(true)
    }

    fn evaluate_filter<'b>(&self, filter: &'b Filter) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let evaluator = self.clone();
        let expressions = filter.expressions();
        Box::new(
            self.evaluate(filter.inner())
                .filter_map(move |solution| match solution {
                    Ok(solution) => match evaluator.filter_accepts(expressions, &solution) {
                        Ok(true) => Some(Ok(solution)),
                        Ok(false) => None,
                        Err(error) => Some(Err(error)),
                    },
                    Err(error) => Some(Err(error)),
                }),
        )
    }

    /// Unlike a filter, a failing assignment fails the query.
    fn evaluate_extend<'b>(&self, extend: &'b Extend) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let evaluator = self.clone();
        let assignments = extend.assignments();
        Box::new(self.evaluate(extend.inner()).map(
            move |solution| -> Result<Solution, QueryEvaluationError> {
                let mut solution = solution?;
                for (variable, expression) in assignments {
                    let value = evaluator.context.expression_evaluator().evaluate(
                        expression,
                        &solution,
                        &evaluator,
                    )?;
                    solution.add(variable.clone(), value)?;
                }
                Ok(solution)
            },
        ))
    }

    fn evaluate_named_graph<'b>(&self, graph: &'b NamedGraph) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        match graph.graph() {
            NamedNodePattern::NamedNode(name) => {
                if !self.context.is_available_named_graph(&name.clone().into()) {
                    return Box::new(empty());
                }
                let active_graph = ActiveGraph::Union(vec![GraphName::NamedNode(name.clone())]);
                self.with_active_graph(active_graph).evaluate(graph.inner())
            }
            NamedNodePattern::Variable(variable) => {
                let context = self.context;
                let evaluator = self.clone();
                Box::new(once_with(move || context.named_graphs()).flat_map(
                    move |graphs| -> SolutionIter<'b> {
                        match graphs {
                            Ok(graphs) => {
                                let evaluator = evaluator.clone();
                                Box::new(graphs.into_iter().flat_map(move |name| {
                                    evaluator.evaluate_in_named_graph(graph, variable, name)
                                }))
                            }
                            Err(error) => Box::new(once(Err(error.into()))),
                        }
                    },
                ))
            }
        }
    }

    /// Evaluates the inner pattern of `GRAPH ?variable` in the graph `name`, binding `variable`.
    fn evaluate_in_named_graph<'b>(
        &self,
        graph: &'b NamedGraph,
        variable: &'b Variable,
        name: NamedOrBlankNode,
    ) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let term = Term::from(name.clone());
        let active_graph = ActiveGraph::Union(vec![GraphName::from(name)]);
        Box::new(
            self.with_active_graph(active_graph)
                .evaluate(graph.inner())
                .filter_map(move |solution| {
                    let mut solution = match solution {
                        Ok(solution) => solution,
                        Err(error) => return Some(Err(error)),
                    };
                    match solution.get(variable) {
                        Some(bound) if *bound == term => Some(Ok(solution)),
                        Some(_) => None,
                        None => Some(
                            solution
                                .add(variable.clone(), term.clone())
                                .map(|()| solution)
                                .map_err(Into::into),
                        ),
                    }
                }),
        )
    }

    /// The service is only called once the first solution is pulled.
    fn evaluate_service<'b>(&self, service: &'b Service) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let context = self.context;
        Box::new(
            once_with(move || call_service(context, service)).flat_map(
                |result| -> SolutionIter<'b> {
                    match result {
                        Ok(solutions) => Box::new(solutions.into_iter().map(Ok)),
                        Err(error) => Box::new(once(Err(error))),
                    }
                },
            ),
        )
    }

    fn evaluate_slice<'b>(&self, slice: &'b Slice) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let solutions = self.evaluate(slice.inner()).skip(slice.offset());
        match slice.limit() {
            Some(limit) => Box::new(solutions.take(limit)),
            None => Box::new(solutions),
        }
    }

    /// Checks for cancellation before every pulled solution and ends the sequence after the first
    /// error.
    fn stop_on_error<'b>(&self, mut solutions: SolutionIter<'b>) -> SolutionIter<'b>
    where
        'a: 'b,
    {
        let context = self.context;
        let mut failed = false;
        Box::new(from_fn(move || {
            if failed {
                return None;
            }
            let next = match context.check_cancelled() {
                Ok(()) => solutions.next(),
                Err(error) => Some(Err(error)),
            };
            failed = matches!(next, Some(Err(_)));
            next
        }))
    }
}

fn call_service(
    context: &ExecutionContext,
    service: &Service,
) -> Result<Vec<Solution>, QueryEvaluationError> {
    let result = match context.service_handler() {
        Some(handler) => handler
            .handle(service.endpoint(), service.inner())
            .map_err(QueryEvaluationError::Service),
        None => Err(QueryEvaluationError::UnsupportedService(
            service.endpoint().clone(),
        )),
    };

    match result {
        Err(error) if service.silent() => {
            tracing::warn!(endpoint = %service.endpoint(), %error, "Ignoring failed silent service");
            Ok(vec![Solution::new()])
        }
        result => result,
    }
}

/// The pattern of an `EXISTS` is evaluated once per active graph. Its worker is then probed with
/// every solution.
impl ExistenceProbe for Evaluator<'_> {
    fn exists(
        &self,
        pattern: &ExistsPattern,
        solution: &Solution,
    ) -> Result<bool, QueryEvaluationError> {
        let key = std::ptr::from_ref(pattern);
        let cached = self.exists_workers.borrow().get(&key).cloned();
        let worker = match cached {
            Some(worker) => worker,
            None => {
                let rows = self.materialize(pattern.pattern(), pattern.strategy())?;
                let worker: Rc<dyn JoinWorker> =
                    Rc::from(create_join_worker(pattern.strategy(), rows));
                self.exists_workers
                    .borrow_mut()
                    .insert(key, Rc::clone(&worker));
                worker
            }
        };
        Ok(worker.find(solution)?.next().is_some())
    }
}
