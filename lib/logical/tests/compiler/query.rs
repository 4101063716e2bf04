use crate::test_utils::{iri, triple, var};
use rdf_algebra_logical::{
    Algebra, CompilationError, CompilerOptions, DuplicateHandling, Element, InlineData, Query,
    QueryCompiler,
};
use rdf_algebra_model::Term;

fn compile(query: &Query) -> Result<Algebra, CompilationError> {
    QueryCompiler::new(CompilerOptions::default()).compile(query)
}

#[test]
fn test_query_without_where_clause_is_unit() -> Result<(), CompilationError> {
    let algebra = compile(&Query::default())?;
    assert!(algebra.is_unit());
    Ok(())
}

#[test]
fn test_limit_and_offset() -> Result<(), CompilationError> {
    let query = Query::new(Element::triples([triple("s", "p", "o")]))
        .with_offset(1)
        .with_limit(10);
    let algebra = compile(&query)?;
    insta::assert_snapshot!(algebra, @r"
    Slice: offset=1, limit=10
      Bgp: ?s <http://example.com/p> ?o
    ");
    Ok(())
}

#[test]
fn test_offset_without_limit() -> Result<(), CompilationError> {
    let query = Query::new(Element::triples([triple("s", "p", "o")])).with_offset(2);
    let algebra = compile(&query)?;
    insta::assert_snapshot!(algebra, @r"
    Slice: offset=2, limit=none
      Bgp: ?s <http://example.com/p> ?o
    ");
    Ok(())
}

#[test]
fn test_zero_offset_adds_no_slice() -> Result<(), CompilationError> {
    let query = Query::new(Element::triples([triple("s", "p", "o")])).with_offset(0);
    assert!(matches!(compile(&query)?, Algebra::Bgp(_)));
    Ok(())
}

#[test]
fn test_distinct_projection() -> Result<(), CompilationError> {
    let query = Query::new(Element::triples([triple("s", "p", "o")]))
        .with_projection([var("s")])
        .with_duplicates(DuplicateHandling::Distinct);
    let algebra = compile(&query)?;
    insta::assert_snapshot!(algebra, @r"
    Distinct
      Project: ?s
        Bgp: ?s <http://example.com/p> ?o
    ");
    Ok(())
}

#[test]
fn test_reduced() -> Result<(), CompilationError> {
    let query = Query::new(Element::triples([triple("s", "p", "o")]))
        .with_duplicates(DuplicateHandling::Reduced);
    let algebra = compile(&query)?;
    insta::assert_snapshot!(algebra, @r"
    Reduced
      Bgp: ?s <http://example.com/p> ?o
    ");
    Ok(())
}

#[test]
fn test_values_clause_is_joined_before_projection() -> Result<(), CompilationError> {
    let values = InlineData::new(vec![var("s")], vec![vec![Some(Term::from(iri("a")))]]);
    let query = Query::new(Element::triples([triple("s", "p", "o")]))
        .with_values(values)
        .with_projection([var("o")]);
    let algebra = compile(&query)?;
    insta::assert_snapshot!(algebra, @r"
    Project: ?o
      Join: FixedHash(?s)
        Bgp: ?s <http://example.com/p> ?o
        Table: ?s (1 rows)
    ");
    Ok(())
}

#[test]
fn test_empty_values_clause_is_kept() -> Result<(), CompilationError> {
    let values = InlineData::new(vec![var("s")], Vec::new());
    let query = Query::default().with_values(values);
    let Algebra::Table(table) = compile(&query)? else {
        panic!("Expected a table");
    };
    assert!(table.is_empty());
    Ok(())
}
