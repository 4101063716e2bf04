use crate::eval::{Evaluator, SolutionIter};
use crate::QueryEvaluationError;
use rdf_algebra_logical::Bgp;
use rdf_algebra_model::{
    BlankNode, NamedNode, NamedNodePattern, Solution, Subject, Term, TermPattern, TriplePattern,
};
use rustc_hash::FxHashMap;
use std::iter::once;

/// Bindings of the blank nodes of a basic graph pattern. Blank nodes act like variables that are
/// never part of a solution.
type BlankNodeBindings = FxHashMap<BlankNode, Term>;

type PartialSolution = (Solution, BlankNodeBindings);

type PartialSolutionIter<'b> =
    Box<dyn Iterator<Item = Result<PartialSolution, QueryEvaluationError>> + 'b>;

/// Matches the triple patterns one after another, extending every partial solution with the
/// matching triples of the active graph.
pub(super) fn evaluate_bgp<'a: 'b, 'b>(evaluator: &Evaluator<'a>, bgp: &'b Bgp) -> SolutionIter<'b> {
    let mut solutions: PartialSolutionIter<'b> =
        Box::new(once(Ok((Solution::new(), BlankNodeBindings::default()))));

    for pattern in bgp.patterns() {
        let evaluator = evaluator.clone();
        solutions = Box::new(solutions.flat_map(move |partial| -> PartialSolutionIter<'b> {
            let matches = partial.and_then(|(solution, blank_nodes)| {
                match_triple_pattern(&evaluator, pattern, &solution, &blank_nodes)
            });
            match matches {
                Ok(matches) => Box::new(matches.into_iter().map(Ok)),
                Err(error) => Box::new(once(Err(error))),
            }
        }));
    }

    Box::new(solutions.map(|partial| partial.map(|(solution, _)| solution)))
}

/// Returns every extension of the partial solution that matches `pattern`.
fn match_triple_pattern(
    evaluator: &Evaluator<'_>,
    pattern: &TriplePattern,
    solution: &Solution,
    blank_nodes: &BlankNodeBindings,
) -> Result<Vec<PartialSolution>, QueryEvaluationError> {
    let predicate_pattern = predicate_term_pattern(&pattern.predicate);
    let subject = resolve(&pattern.subject, solution, blank_nodes);
    let predicate = resolve(&predicate_pattern, solution, blank_nodes);
    let object = resolve(&pattern.object, solution, blank_nodes);

    let (Some(subject), Some(predicate)) = (
        restrict(subject, into_subject),
        restrict(predicate, into_named_node),
    ) else {
        return Ok(Vec::new());
    };

    let triples = evaluator.active_graph().triples_for_pattern(
        evaluator.context().storage(),
        subject.as_ref(),
        predicate.as_ref(),
        object.as_ref(),
    )?;

    let mut matches = Vec::new();
    for triple in triples {
        let mut solution = solution.clone();
        let mut blank_nodes = blank_nodes.clone();
        if bind(
            &pattern.subject,
            triple.subject.into(),
            &mut solution,
            &mut blank_nodes,
        )? && bind(
            &predicate_pattern,
            triple.predicate.into(),
            &mut solution,
            &mut blank_nodes,
        )? && bind(&pattern.object, triple.object, &mut solution, &mut blank_nodes)?
        {
            matches.push((solution, blank_nodes));
        }
    }
    Ok(matches)
}

fn predicate_term_pattern(pattern: &NamedNodePattern) -> TermPattern {
    match pattern {
        NamedNodePattern::NamedNode(node) => TermPattern::NamedNode(node.clone()),
        NamedNodePattern::Variable(variable) => TermPattern::Variable(variable.clone()),
    }
}

/// Converts a bound position into the type the storage expects.
///
/// Returns `None` if the term can't occur in that position, `Some(None)` if the position is
/// unbound.
fn restrict<T>(term: Option<Term>, convert: fn(Term) -> Option<T>) -> Option<Option<T>> {
    match term {
        Some(term) => convert(term).map(Some),
        None => Some(None),
    }
}

/// Returns the term that a position is bound to, if any.
fn resolve(
    pattern: &TermPattern,
    solution: &Solution,
    blank_nodes: &BlankNodeBindings,
) -> Option<Term> {
    match pattern {
        TermPattern::NamedNode(node) => Some(node.clone().into()),
        TermPattern::Literal(literal) => Some(literal.clone().into()),
        TermPattern::BlankNode(node) => blank_nodes.get(node).cloned(),
        TermPattern::Variable(variable) => solution.get(variable).cloned(),
    }
}

/// Binds the position to `term`. Returns `false` if the position is already bound to another
/// term, which happens if a variable occurs twice in a pattern.
fn bind(
    pattern: &TermPattern,
    term: Term,
    solution: &mut Solution,
    blank_nodes: &mut BlankNodeBindings,
) -> Result<bool, QueryEvaluationError> {
    match pattern {
        TermPattern::NamedNode(_) | TermPattern::Literal(_) => Ok(true),
        TermPattern::BlankNode(node) => match blank_nodes.get(node) {
            Some(bound) => Ok(*bound == term),
            None => {
                blank_nodes.insert(node.clone(), term);
                Ok(true)
            }
        },
        TermPattern::Variable(variable) => match solution.get(variable) {
            Some(bound) => Ok(*bound == term),
            None => {
                solution.add(variable.clone(), term)?;
                Ok(true)
            }
        },
    }
}

fn into_subject(term: Term) -> Option<Subject> {
    match term {
        Term::NamedNode(node) => Some(node.into()),
        Term::BlankNode(node) => Some(node.into()),
        Term::Literal(_) => None,
    }
}

fn into_named_node(term: Term) -> Option<NamedNode> {
    match term {
        Term::NamedNode(node) => Some(node),
        Term::BlankNode(_) | Term::Literal(_) => None,
    }
}
