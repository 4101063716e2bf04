use rdf_algebra_common::QuadStorage;
use rdf_algebra_execution::{
    evaluate, CancellationToken, ExecutionContext, QueryDataset, QueryEvaluationError,
    QueryOptions, QuerySolutionIter, ServiceHandler,
};
use rdf_algebra_logical::{
    Algebra, CompilerOptions, DuplicateHandling, Element, ElementExpression, InlineData, Query,
    QueryCompiler, TriplePath,
};
use rdf_algebra_model::{
    BlankNode, GraphName, Literal, NamedNode, NamedNodePattern, NamedOrBlankNode,
    PropertyPathExpression, Quad, Solution, Term, TermPattern, TriplePattern, Variable,
};
use rdf_algebra_storage::MemoryQuadStorage;
use std::error::Error;
use std::sync::Arc;

type TestResult = Result<(), Box<dyn Error>>;

fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

fn iri(suffix: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{suffix}"))
}

fn quad(subject: &str, predicate: &str, object: &str) -> Quad {
    Quad::new(iri(subject), iri(predicate), iri(object), GraphName::DefaultGraph)
}

fn named_quad(subject: &str, predicate: &str, object: &str, graph: &str) -> Quad {
    Quad::new(iri(subject), iri(predicate), iri(object), iri(graph))
}

/// `?subject <predicate> ?object`
fn triple(subject: &str, predicate: &str, object: &str) -> TriplePattern {
    TriplePattern {
        subject: TermPattern::Variable(var(subject)),
        predicate: NamedNodePattern::NamedNode(iri(predicate)),
        object: TermPattern::Variable(var(object)),
    }
}

fn integer(value: i64) -> ElementExpression {
    Literal::from(value).into()
}

fn context(quads: Vec<Quad>) -> Result<ExecutionContext, Box<dyn Error>> {
    let storage = MemoryQuadStorage::new();
    storage.extend(quads)?;
    Ok(ExecutionContext::new(Arc::new(storage)))
}

fn compile(query: &Query) -> Result<Algebra, Box<dyn Error>> {
    Ok(QueryCompiler::new(CompilerOptions::default()).compile(query)?)
}

/// Evaluates `element` and returns the solutions in a canonical order.
fn run(context: &ExecutionContext, element: Element) -> Result<Vec<String>, Box<dyn Error>> {
    run_query(context, &Query::new(element))
}

fn run_query(context: &ExecutionContext, query: &Query) -> Result<Vec<String>, Box<dyn Error>> {
    let algebra = compile(query)?;
    let mut solutions = evaluate(context, &algebra)
        .map(|solution| solution.map(|solution| solution.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    solutions.sort();
    Ok(solutions)
}

fn evaluation_error(context: &ExecutionContext, element: Element) -> Option<QueryEvaluationError> {
    let algebra = compile(&Query::new(element)).ok()?;
    let error = evaluate(context, &algebra).find_map(Result::err);
    error
}

fn social_graph() -> Vec<Quad> {
    vec![
        quad("alice", "knows", "bob"),
        quad("bob", "knows", "carol"),
        quad("carol", "knows", "dave"),
        quad("alice", "name", "alice-name"),
        quad("bob", "age", "bob-age"),
    ]
}

#[test]
fn test_bgp_chain() -> TestResult {
    let context = context(vec![
        quad("a", "p1", "x"),
        quad("a", "p2", "y"),
        quad("b", "p1", "z"),
    ])?;
    let solutions = run(
        &context,
        Element::triples([triple("s", "p1", "o1"), triple("s", "p2", "o2")]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o1 -> <http://example.com/x>, ?o2 -> <http://example.com/y>, ?s -> <http://example.com/a>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_join_of_groups() -> TestResult {
    let context = context(vec![
        quad("a", "p1", "x"),
        quad("a", "p2", "y"),
        quad("b", "p1", "z"),
    ])?;
    let solutions = run(
        &context,
        Element::group([
            Element::group([Element::triples([triple("s", "p1", "o1")])]),
            Element::group([Element::triples([triple("s", "p2", "o2")])]),
        ]),
    )?;
    assert_eq!(solutions.len(), 1);
    Ok(())
}

#[test]
fn test_optional_without_match_keeps_solution() -> TestResult {
    let context = context(vec![quad("a", "type", "thing")])?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "type", "t")]),
            Element::optional(Element::triples([triple("s", "name", "o")])),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?s -> <http://example.com/a>, ?t -> <http://example.com/thing>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_optional_filter_is_applied_to_joined_solutions() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "knows", "o")]),
            Element::optional(Element::group([
                Element::triples([triple("o", "knows", "x")]),
                Element::filter(ElementExpression::equal(
                    var("x").into(),
                    iri("carol").into(),
                )),
            ])),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/bob>, ?s -> <http://example.com/alice>, ?x -> <http://example.com/carol>}",
        "{?o -> <http://example.com/carol>, ?s -> <http://example.com/bob>}",
        "{?o -> <http://example.com/dave>, ?s -> <http://example.com/carol>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_optional_not_exists_sees_variables_of_both_operands() -> TestResult {
    let context = context(vec![
        quad("a", "p", "b"),
        quad("b", "q", "c"),
        quad("d", "r", "c"),
    ])?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("x", "p", "y")]),
            Element::optional(Element::group([
                Element::triples([triple("y", "q", "z")]),
                Element::filter(ElementExpression::not_exists(Element::triples([triple(
                    "x", "r", "z",
                )]))),
            ])),
        ]),
    )?;
    // `?x` is bound to <a> by the left operand, so `<d> <r> <c>` is not compatible.
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?x -> <http://example.com/a>, ?y -> <http://example.com/b>, ?z -> <http://example.com/c>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_union_of_disjoint_patterns() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        Element::Union(vec![
            Element::triples([triple("s", "name", "n")]),
            Element::triples([triple("p", "age", "a")]),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?a -> <http://example.com/bob-age>, ?p -> <http://example.com/bob>}",
        "{?n -> <http://example.com/alice-name>, ?s -> <http://example.com/alice>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_filter_error_drops_solutions() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "knows", "o")]),
            Element::filter(ElementExpression::greater(
                ElementExpression::divide(integer(1), integer(0)),
                integer(0),
            )),
        ]),
    )?;
    assert!(solutions.is_empty());
    Ok(())
}

#[test]
fn test_bind_error_fails_query() -> TestResult {
    let context = context(social_graph())?;
    let error = evaluation_error(
        &context,
        Element::group([
            Element::triples([triple("s", "knows", "o")]),
            Element::bind(var("x"), ElementExpression::divide(integer(1), integer(0))),
        ]),
    );
    assert!(matches!(error, Some(QueryEvaluationError::Expression(_))));
    Ok(())
}

#[test]
fn test_bind_extends_solutions() -> TestResult {
    let context = context(vec![quad("a", "p", "b")])?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "p", "o")]),
            Element::bind(var("x"), ElementExpression::add(integer(1), integer(2))),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/b>, ?s -> <http://example.com/a>, ?x -> \"3\"^^<http://www.w3.org/2001/XMLSchema#integer>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_sparse_values_rows() -> TestResult {
    let context = context(vec![quad("a", "p", "b")])?;
    let values = InlineData::new(
        vec![var("x"), var("y")],
        vec![
            vec![Some(iri("one").into()), None],
            vec![None, Some(iri("two").into())],
        ],
    );
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "p", "o")]),
            Element::Data(values),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/b>, ?s -> <http://example.com/a>, ?x -> <http://example.com/one>}",
        "{?o -> <http://example.com/b>, ?s -> <http://example.com/a>, ?y -> <http://example.com/two>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_minus_removes_compatible_solutions() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "knows", "o")]),
            Element::minus(Element::triples([triple("s", "name", "n")])),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/carol>, ?s -> <http://example.com/bob>}",
        "{?o -> <http://example.com/dave>, ?s -> <http://example.com/carol>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_minus_with_disjoint_variables_removes_nothing() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "knows", "o")]),
            Element::minus(Element::triples([triple("x", "name", "y")])),
        ]),
    )?;
    assert_eq!(solutions.len(), 3);
    Ok(())
}

#[test]
fn test_filter_not_exists() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        Element::group([
            Element::triples([triple("s", "knows", "o")]),
            Element::filter(ElementExpression::not_exists(Element::triples([triple(
                "o", "knows", "x",
            )]))),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/dave>, ?s -> <http://example.com/carol>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_named_graph_variable() -> TestResult {
    let context = context(vec![
        quad("a", "p", "default"),
        named_quad("a", "p", "first", "g1"),
        named_quad("a", "p", "second", "g2"),
    ])?;
    let solutions = run(
        &context,
        Element::named_graph(var("g"), Element::triples([triple("s", "p", "o")])),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?g -> <http://example.com/g1>, ?o -> <http://example.com/first>, ?s -> <http://example.com/a>}",
        "{?g -> <http://example.com/g2>, ?o -> <http://example.com/second>, ?s -> <http://example.com/a>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_named_graph_iri_and_dataset() -> TestResult {
    let context = context(vec![
        named_quad("a", "p", "first", "g1"),
        named_quad("a", "p", "second", "g2"),
    ])?;
    let element = Element::named_graph(iri("g2"), Element::triples([triple("s", "p", "o")]));
    assert_eq!(run(&context, element.clone())?.len(), 1);

    let restricted = context.with_dataset(
        QueryDataset::new().with_available_named_graphs([NamedOrBlankNode::from(iri("g1"))]),
    );
    assert!(run(&restricted, element)?.is_empty());
    Ok(())
}

#[test]
fn test_default_graph_as_union() -> TestResult {
    let context = context(vec![
        quad("a", "p", "b"),
        named_quad("a", "p", "b", "g1"),
        named_quad("a", "p", "c", "g1"),
    ])?;
    let element = Element::triples([triple("s", "p", "o")]);
    assert_eq!(run(&context, element.clone())?.len(), 1);

    let union = context.with_options(QueryOptions {
        default_graph_as_union: true,
        ..QueryOptions::default()
    });
    // The triple that is part of two graphs is only returned once.
    assert_eq!(run(&union, element)?.len(), 2);
    Ok(())
}

#[test]
fn test_blank_nodes_are_not_returned() -> TestResult {
    let context = context(social_graph())?;
    let blank = BlankNode::new_unchecked("b");
    let solutions = run(
        &context,
        Element::triples([
            TriplePattern {
                subject: TermPattern::Variable(var("s")),
                predicate: NamedNodePattern::NamedNode(iri("knows")),
                object: blank.clone().into(),
            },
            TriplePattern {
                subject: blank.into(),
                predicate: NamedNodePattern::NamedNode(iri("knows")),
                object: TermPattern::Variable(var("o")),
            },
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/carol>, ?s -> <http://example.com/alice>}",
        "{?o -> <http://example.com/dave>, ?s -> <http://example.com/bob>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_blank_node_is_shared_across_path_block() -> TestResult {
    let context = context(vec![
        quad("a", "p", "x1"),
        quad("x1", "q", "x2"),
        quad("a", "r", "y1"),
        quad("c", "r", "y2"),
    ])?;
    let blank = BlankNode::new_unchecked("b");
    let solutions = run(
        &context,
        Element::PathBlock(vec![
            TriplePath::Triple(TriplePattern {
                subject: blank.clone().into(),
                predicate: NamedNodePattern::NamedNode(iri("p")),
                object: TermPattern::Variable(var("x")),
            }),
            TriplePath::Path {
                subject: var("x").into(),
                path: PropertyPathExpression::OneOrMore(Box::new(iri("q").into())),
                object: var("z").into(),
            },
            TriplePath::Triple(TriplePattern {
                subject: blank.into(),
                predicate: NamedNodePattern::NamedNode(iri("r")),
                object: TermPattern::Variable(var("y")),
            }),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?x -> <http://example.com/x1>, ?y -> <http://example.com/y1>, ?z -> <http://example.com/x2>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_blank_node_is_shared_across_group() -> TestResult {
    let context = context(social_graph())?;
    let blank = BlankNode::new_unchecked("b");
    let solutions = run(
        &context,
        Element::group([
            Element::triples([TriplePattern {
                subject: blank.clone().into(),
                predicate: NamedNodePattern::NamedNode(iri("knows")),
                object: TermPattern::Variable(var("o")),
            }]),
            Element::bind(var("found"), var("o").into()),
            Element::triples([TriplePattern {
                subject: blank.into(),
                predicate: NamedNodePattern::NamedNode(iri("age")),
                object: TermPattern::Variable(var("n")),
            }]),
        ]),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?found -> <http://example.com/carol>, ?n -> <http://example.com/bob-age>, ?o -> <http://example.com/carol>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_repeated_variable_in_pattern() -> TestResult {
    let context = context(vec![quad("a", "p", "a"), quad("a", "p", "b")])?;
    let solutions = run(&context, Element::triples([triple("x", "p", "x")]))?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?x -> <http://example.com/a>}",
    ]
    "#);
    Ok(())
}

fn path(subject: TermPattern, path: PropertyPathExpression, object: TermPattern) -> Element {
    Element::PathBlock(vec![TriplePath::Path {
        subject,
        path,
        object,
    }])
}

#[test]
fn test_one_or_more_path() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        path(
            iri("alice").into(),
            PropertyPathExpression::OneOrMore(Box::new(iri("knows").into())),
            var("o").into(),
        ),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/bob>}",
        "{?o -> <http://example.com/carol>}",
        "{?o -> <http://example.com/dave>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_zero_or_more_path_includes_start() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        path(
            var("s").into(),
            PropertyPathExpression::ZeroOrMore(Box::new(iri("knows").into())),
            iri("bob").into(),
        ),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?s -> <http://example.com/alice>}",
        "{?s -> <http://example.com/bob>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_sequence_and_reverse_path() -> TestResult {
    let context = context(social_graph())?;
    let knows = PropertyPathExpression::from(iri("knows"));
    let solutions = run(
        &context,
        path(
            var("s").into(),
            PropertyPathExpression::Sequence(
                Box::new(knows.clone()),
                Box::new(PropertyPathExpression::Reverse(Box::new(knows))),
            ),
            var("o").into(),
        ),
    )?;
    // Every person that knows someone reaches itself.
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/alice>, ?s -> <http://example.com/alice>}",
        "{?o -> <http://example.com/bob>, ?s -> <http://example.com/bob>}",
        "{?o -> <http://example.com/carol>, ?s -> <http://example.com/carol>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_negated_property_set() -> TestResult {
    let context = context(social_graph())?;
    let solutions = run(
        &context,
        path(
            iri("alice").into(),
            PropertyPathExpression::NegatedPropertySet(vec![iri("knows")]),
            var("o").into(),
        ),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?o -> <http://example.com/alice-name>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_modifiers() -> TestResult {
    let context = context(social_graph())?;
    let query = Query::new(Element::triples([triple("s", "knows", "o")]))
        .with_projection([var("s")])
        .with_duplicates(DuplicateHandling::Distinct)
        .with_offset(1)
        .with_limit(1);
    assert_eq!(run_query(&context, &query)?.len(), 1);

    let all = Query::new(Element::triples([triple("s", "knows", "o")])).with_projection([]);
    let solutions = run_query(&context, &all.with_duplicates(DuplicateHandling::Distinct))?;
    assert_eq!(solutions, vec!["{}"]);
    Ok(())
}

#[test]
fn test_service_without_handler() -> TestResult {
    let context = context(social_graph())?;
    let inner = Element::triples([triple("s", "knows", "o")]);

    let error = evaluation_error(&context, Element::service(iri("endpoint"), inner.clone(), false));
    assert!(matches!(error, Some(QueryEvaluationError::UnsupportedService(_))));

    let solutions = run(&context, Element::service(iri("endpoint"), inner, true))?;
    assert_eq!(solutions, vec!["{}"]);
    Ok(())
}

struct StaticServiceHandler;

impl ServiceHandler for StaticServiceHandler {
    fn handle(
        &self,
        endpoint: &NamedNode,
        _pattern: &Algebra,
    ) -> Result<Vec<Solution>, Box<dyn Error + Send + Sync>> {
        Ok(vec![[(var("endpoint"), Term::from(endpoint.clone()))]
            .into_iter()
            .collect()])
    }
}

#[test]
fn test_service_handler() -> TestResult {
    let context = context(social_graph())?.with_service_handler(Arc::new(StaticServiceHandler));
    let solutions = run(
        &context,
        Element::service(
            iri("endpoint"),
            Element::triples([triple("s", "knows", "o")]),
            false,
        ),
    )?;
    insta::assert_debug_snapshot!(solutions, @r#"
    [
        "{?endpoint -> <http://example.com/endpoint>}",
    ]
    "#);
    Ok(())
}

#[test]
fn test_cancellation() -> TestResult {
    let token = CancellationToken::new();
    let context = context(social_graph())?.with_cancellation_token(token.clone());
    let algebra = compile(&Query::new(Element::triples([triple("s", "knows", "o")])))?;

    let mut solutions = evaluate(&context, &algebra);
    assert!(solutions.next().is_some_and(|solution| solution.is_ok()));
    token.cancel();
    assert!(matches!(
        solutions.next(),
        Some(Err(QueryEvaluationError::Cancelled))
    ));
    assert!(solutions.next().is_none());
    Ok(())
}

#[test]
fn test_query_solutions_use_projection_order() -> TestResult {
    let context = context(vec![quad("a", "p", "b")])?;
    let query = Query::new(Element::triples([triple("s", "p", "o")]))
        .with_projection([var("o"), var("s")]);
    let algebra = compile(&query)?;

    let solutions = QuerySolutionIter::evaluate(&context, &algebra);
    assert_eq!(solutions.variables(), &[var("o"), var("s")]);
    let solutions = solutions.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0].get("s"), Some(&Term::from(iri("a"))));
    assert_eq!(solutions[0].get(1), Some(&Term::from(iri("a"))));
    Ok(())
}
