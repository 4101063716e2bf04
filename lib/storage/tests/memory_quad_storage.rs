use rdf_algebra_common::QuadStorage;
use rdf_algebra_model::{
    GraphName, GraphNameRef, Literal, NamedNode, NamedOrBlankNode, Quad, Subject, Term,
};
use rdf_algebra_storage::MemoryQuadStorage;

#[test]
fn test_insert_quad() {
    let store = MemoryQuadStorage::new();

    let inserted = store.extend(vec![example_quad()]).unwrap();
    assert_eq!(inserted, 1);

    let len = store.len().unwrap();
    assert_eq!(len, 1);
    assert!(store.contains(example_quad().as_ref()).unwrap());
}

#[test]
fn test_insert_duplicate_quads_no_effect() {
    let store = MemoryQuadStorage::new();

    store.extend(vec![example_quad()]).unwrap();

    let inserted = store.extend(vec![example_quad()]).unwrap();
    assert_eq!(inserted, 0); // duplicate
}

#[test]
fn test_insert_duplicate_quads_in_same_operation_quads() {
    let store = MemoryQuadStorage::new();

    let inserted = store.extend(vec![example_quad(), example_quad()]).unwrap();

    assert_eq!(inserted, 1);
}

#[test]
fn test_named_graph_insertion_and_query() {
    let store = MemoryQuadStorage::new();
    let graph =
        NamedOrBlankNode::NamedNode(NamedNode::new("http://example.com/graph").unwrap());

    let inserted = store.insert_named_graph(graph.as_ref()).unwrap();
    assert!(inserted);

    let exists = store.contains_named_graph(graph.as_ref()).unwrap();
    assert!(exists);

    let graphs = store.named_graphs().unwrap();
    assert_eq!(graphs.len(), 1);
    assert_eq!(graphs[0], graph);
}

#[test]
fn test_graphs_with_quads_are_named_graphs() {
    let store = MemoryQuadStorage::new();
    store
        .extend(vec![example_quad(), example_quad_in_graph("http://example.com/g")])
        .unwrap();

    let graphs = store.named_graphs().unwrap();
    assert_eq!(
        graphs,
        vec![NamedOrBlankNode::NamedNode(
            NamedNode::new("http://example.com/g").unwrap()
        )]
    );
}

#[test]
fn test_pattern_lookup_by_component() {
    let store = MemoryQuadStorage::new();
    store
        .extend(vec![
            example_quad(),
            example_quad_in_graph("http://example.com/g1"),
            Quad::new(
                NamedNode::new("http://example.com/other").unwrap(),
                NamedNode::new("http://example.com/predicate").unwrap(),
                Literal::new_simple_literal("other"),
                GraphName::DefaultGraph,
            ),
        ])
        .unwrap();
    let subject = Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap());
    let predicate = NamedNode::new("http://example.com/predicate").unwrap();

    let all = store.quads_for_pattern(None, None, None, None).unwrap();
    assert_eq!(all.len(), 3);

    let by_subject = store
        .quads_for_pattern(Some(&subject), None, None, None)
        .unwrap();
    assert_eq!(by_subject.len(), 2);

    let in_default_graph = store
        .quads_for_pattern(None, Some(&predicate), None, Some(&GraphName::DefaultGraph))
        .unwrap();
    assert_eq!(in_default_graph.len(), 2);

    let unknown = Term::Literal(Literal::new_simple_literal("unknown"));
    let missing = store
        .quads_for_pattern(Some(&subject), None, Some(&unknown), None)
        .unwrap();
    assert!(missing.is_empty());
}

#[test]
fn test_remove_quad() {
    let store = MemoryQuadStorage::new();
    let quad = example_quad_in_graph("http://example.com/g");

    store.extend(vec![quad.clone()]).unwrap();
    let removed = store.remove(quad.as_ref()).unwrap();
    assert!(removed);

    let len = store.len().unwrap();
    assert_eq!(len, 0);
    assert!(store
        .quads_for_pattern(None, None, None, Some(&quad.graph_name))
        .unwrap()
        .is_empty());
}

#[test]
fn test_clear_graph() {
    let store = MemoryQuadStorage::new();

    let g1 = "http://example.com/g1";
    let g2 = "http://example.com/g2";

    store
        .extend(vec![example_quad_in_graph(g1), example_quad_in_graph(g2)])
        .unwrap();

    store
        .clear_graph(GraphNameRef::NamedNode(NamedNode::new(g1).unwrap().as_ref()))
        .unwrap();

    let len = store.len().unwrap();
    assert_eq!(len, 1);
}

#[test]
fn test_clear_all() {
    let store = MemoryQuadStorage::new();
    store
        .extend(vec![
            example_quad_in_graph("http://example.com/g1"),
            example_quad_in_graph("http://example.com/g2"),
        ])
        .unwrap();

    store.clear().unwrap();
    let len = store.len().unwrap();
    assert_eq!(len, 0);
    assert!(store.named_graphs().unwrap().is_empty());
}

fn example_quad() -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::DefaultGraph,
    )
}

fn example_quad_in_graph(graph: &str) -> Quad {
    Quad::new(
        Subject::NamedNode(NamedNode::new("http://example.com/subject").unwrap()),
        NamedNode::new("http://example.com/predicate").unwrap(),
        Term::Literal(Literal::new_simple_literal("value")),
        GraphName::NamedNode(NamedNode::new(graph).unwrap()),
    )
}
