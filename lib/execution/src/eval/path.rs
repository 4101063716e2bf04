use crate::active_graph::ActiveGraph;
use crate::eval::{Evaluator, SolutionIter};
use crate::QueryEvaluationError;
use rdf_algebra_common::error::StorageError;
use rdf_algebra_common::QuadStorage;
use rdf_algebra_logical::PropertyPath;
use rdf_algebra_model::{NamedNode, PropertyPathExpression, Solution, Subject, Term, TermPattern};
use rustc_hash::FxHashSet;
use std::iter::{once, once_with};

type PathResult<T> = Result<T, StorageError>;

/// Evaluates a property path. Paths have set semantics: every pair of endpoints is returned once.
pub(super) fn evaluate_property_path<'a: 'b, 'b>(
    evaluator: &Evaluator<'a>,
    path: &'b PropertyPath,
) -> SolutionIter<'b> {
    let evaluator = evaluator.clone();
    Box::new(
        once_with(move || {
            PathEvaluator {
                storage: evaluator.context().storage(),
                active_graph: evaluator.active_graph(),
            }
            .evaluate(path)
        })
        .flat_map(|solutions| -> SolutionIter<'b> {
            match solutions {
                Ok(solutions) => Box::new(solutions.into_iter().map(Ok)),
                Err(error) => Box::new(once(Err(error))),
            }
        }),
    )
}

struct PathEvaluator<'e> {
    storage: &'e dyn QuadStorage,
    active_graph: &'e ActiveGraph,
}

impl PathEvaluator<'_> {
    fn evaluate(&self, path: &PropertyPath) -> Result<Vec<Solution>, QueryEvaluationError> {
        let expression = path.path();
        let mut solutions = Vec::new();
        match (constant(path.subject()), constant(path.object())) {
            (Some(subject), Some(object)) => {
                if self.objects(expression, &subject)?.contains(&object) {
                    solutions.push(Solution::new());
                }
            }
            (Some(subject), None) => {
                for object in self.objects(expression, &subject)? {
                    push_binding(&mut solutions, path.object(), object)?;
                }
            }
            (None, Some(object)) => {
                for subject in self.subjects(expression, &object)? {
                    push_binding(&mut solutions, path.subject(), subject)?;
                }
            }
            (None, None) => {
                let same_variable = path.subject() == path.object();
                for (subject, object) in self.pairs(expression)? {
                    if same_variable {
                        if subject == object {
                            push_binding(&mut solutions, path.subject(), subject)?;
                        }
                        continue;
                    }
                    let mut solution = Solution::new();
                    bind(&mut solution, path.subject(), subject)?;
                    bind(&mut solution, path.object(), object)?;
                    solutions.push(solution);
                }
            }
        }
        Ok(solutions)
    }

    /// All terms reachable from `start` via `path`.
    fn objects(&self, path: &PropertyPathExpression, start: &Term) -> PathResult<FxHashSet<Term>> {
        Ok(match path {
            PropertyPathExpression::NamedNode(predicate) => {
                let Some(subject) = as_subject(start) else {
                    return Ok(FxHashSet::default());
                };
                self.active_graph
                    .triples_for_pattern(self.storage, Some(&subject), Some(predicate), None)?
                    .into_iter()
                    .map(|triple| triple.object)
                    .collect()
            }
            PropertyPathExpression::Reverse(inner) => self.subjects(inner, start)?,
            PropertyPathExpression::Sequence(lhs, rhs) => {
                let mut objects = FxHashSet::default();
                for middle in self.objects(lhs, start)? {
                    objects.extend(self.objects(rhs, &middle)?);
                }
                objects
            }
            PropertyPathExpression::Alternative(lhs, rhs) => {
                let mut objects = self.objects(lhs, start)?;
                objects.extend(self.objects(rhs, start)?);
                objects
            }
            PropertyPathExpression::ZeroOrMore(inner) => {
                let mut objects = transitive_closure(|term| self.objects(inner, term), start)?;
                objects.insert(start.clone());
                objects
            }
            PropertyPathExpression::OneOrMore(inner) => {
                transitive_closure(|term| self.objects(inner, term), start)?
            }
            PropertyPathExpression::ZeroOrOne(inner) => {
                let mut objects = self.objects(inner, start)?;
                objects.insert(start.clone());
                objects
            }
            PropertyPathExpression::NegatedPropertySet(excluded) => {
                let Some(subject) = as_subject(start) else {
                    return Ok(FxHashSet::default());
                };
                self.active_graph
                    .triples_for_pattern(self.storage, Some(&subject), None, None)?
                    .into_iter()
                    .filter(|triple| !excluded.contains(&triple.predicate))
                    .map(|triple| triple.object)
                    .collect()
            }
        })
    }

    /// All terms from which `end` is reachable via `path`.
    fn subjects(&self, path: &PropertyPathExpression, end: &Term) -> PathResult<FxHashSet<Term>> {
        Ok(match path {
            PropertyPathExpression::NamedNode(predicate) => self
                .active_graph
                .triples_for_pattern(self.storage, None, Some(predicate), Some(end))?
                .into_iter()
                .map(|triple| triple.subject.into())
                .collect(),
            PropertyPathExpression::Reverse(inner) => self.objects(inner, end)?,
            PropertyPathExpression::Sequence(lhs, rhs) => {
                let mut subjects = FxHashSet::default();
                for middle in self.subjects(rhs, end)? {
                    subjects.extend(self.subjects(lhs, &middle)?);
                }
                subjects
            }
            PropertyPathExpression::Alternative(lhs, rhs) => {
                let mut subjects = self.subjects(lhs, end)?;
                subjects.extend(self.subjects(rhs, end)?);
                subjects
            }
            PropertyPathExpression::ZeroOrMore(inner) => {
                let mut subjects = transitive_closure(|term| self.subjects(inner, term), end)?;
                subjects.insert(end.clone());
                subjects
            }
            PropertyPathExpression::OneOrMore(inner) => {
                transitive_closure(|term| self.subjects(inner, term), end)?
            }
            PropertyPathExpression::ZeroOrOne(inner) => {
                let mut subjects = self.subjects(inner, end)?;
                subjects.insert(end.clone());
                subjects
            }
            PropertyPathExpression::NegatedPropertySet(excluded) => self
                .active_graph
                .triples_for_pattern(self.storage, None, None, Some(end))?
                .into_iter()
                .filter(|triple| !excluded.contains(&triple.predicate))
                .map(|triple| triple.subject.into())
                .collect(),
        })
    }

    /// All pairs of terms that are connected via `path`.
    fn pairs(&self, path: &PropertyPathExpression) -> PathResult<FxHashSet<(Term, Term)>> {
        Ok(match path {
            PropertyPathExpression::NamedNode(predicate) => {
                self.edges(|triple_predicate| triple_predicate == predicate, Some(predicate))?
            }
            PropertyPathExpression::Reverse(inner) => self
                .pairs(inner)?
                .into_iter()
                .map(|(subject, object)| (object, subject))
                .collect(),
            PropertyPathExpression::Sequence(lhs, rhs) => {
                let mut pairs = FxHashSet::default();
                for (subject, middle) in self.pairs(lhs)? {
                    for object in self.objects(rhs, &middle)? {
                        pairs.insert((subject.clone(), object));
                    }
                }
                pairs
            }
            PropertyPathExpression::Alternative(lhs, rhs) => {
                let mut pairs = self.pairs(lhs)?;
                pairs.extend(self.pairs(rhs)?);
                pairs
            }
            PropertyPathExpression::ZeroOrMore(_) | PropertyPathExpression::ZeroOrOne(_) => {
                let mut pairs = FxHashSet::default();
                for node in self.active_graph.nodes(self.storage)? {
                    for object in self.objects(path, &node)? {
                        pairs.insert((node.clone(), object));
                    }
                }
                pairs
            }
            PropertyPathExpression::OneOrMore(inner) => {
                let starts = self
                    .pairs(inner)?
                    .into_iter()
                    .map(|(subject, _)| subject)
                    .collect::<FxHashSet<_>>();
                let mut pairs = FxHashSet::default();
                for start in starts {
                    for object in transitive_closure(|term| self.objects(inner, term), &start)? {
                        pairs.insert((start.clone(), object));
                    }
                }
                pairs
            }
            PropertyPathExpression::NegatedPropertySet(excluded) => {
                self.edges(|predicate| !excluded.contains(predicate), None)?
            }
        })
    }

    /// All `(subject, object)` pairs of the triples whose predicate satisfies `accept`.
    fn edges(
        &self,
        accept: impl Fn(&NamedNode) -> bool,
        predicate: Option<&NamedNode>,
    ) -> PathResult<FxHashSet<(Term, Term)>> {
        Ok(self
            .active_graph
            .triples_for_pattern(self.storage, None, predicate, None)?
            .into_iter()
            .filter(|triple| accept(&triple.predicate))
            .map(|triple| (triple.subject.into(), triple.object))
            .collect())
    }
}

/// Every term reachable from `start` with one or more `step`s. `start` is only part of the
/// result if it lies on a cycle.
fn transitive_closure(
    step: impl Fn(&Term) -> PathResult<FxHashSet<Term>>,
    start: &Term,
) -> PathResult<FxHashSet<Term>> {
    let mut reached = FxHashSet::default();
    let mut frontier = vec![start.clone()];
    while let Some(term) = frontier.pop() {
        for next in step(&term)? {
            if reached.insert(next.clone()) {
                frontier.push(next);
            }
        }
    }
    Ok(reached)
}

/// Returns the term of a position that does not bind a variable.
fn constant(pattern: &TermPattern) -> Option<Term> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::BlankNode(_) | TermPattern::Variable(_) => None,
    }
}

fn as_subject(term: &Term) -> Option<Subject> {
    match term {
        Term::NamedNode(node) => Some(node.clone().into()),
        Term::BlankNode(node) => Some(node.clone().into()),
        Term::Literal(_) => None,
    }
}

fn push_binding(
    solutions: &mut Vec<Solution>,
    pattern: &TermPattern,
    term: Term,
) -> Result<(), QueryEvaluationError> {
    let mut solution = Solution::new();
    bind(&mut solution, pattern, term)?;
    solutions.push(solution);
    Ok(())
}

/// Blank nodes in a path pattern match any term but are not part of the solution.
fn bind(
    solution: &mut Solution,
    pattern: &TermPattern,
    term: Term,
) -> Result<(), QueryEvaluationError> {
    if let TermPattern::Variable(variable) = pattern {
        solution.add(variable.clone(), term)?;
    }
    Ok(())
}
