use crate::test_utils::{
    compile, compile_memory_bounded, integer, iri, triple, var, variable,
};
use rdf_algebra_logical::join::JoinStrategy;
use rdf_algebra_logical::{
    Algebra, CompilationError, Element, ElementExpression, Expression, InlineData, Query,
    TriplePath,
};
use rdf_algebra_model::{
    BlankNode, NamedNodePattern, PropertyPathExpression, Term, TermPattern, TriplePattern,
    Variable,
};

#[test]
fn test_empty_group_is_unit() -> Result<(), CompilationError> {
    let algebra = compile(&Element::group([]))?;
    assert!(algebra.is_unit());
    Ok(())
}

#[test]
fn test_empty_triple_block_is_unit() -> Result<(), CompilationError> {
    let algebra = compile(&Element::group([Element::triples([])]))?;
    assert!(algebra.is_unit());
    Ok(())
}

#[test]
fn test_triple_block() -> Result<(), CompilationError> {
    let algebra = compile(&Element::triples([triple("s", "p", "o"), triple("o", "q", "x")]))?;
    insta::assert_snapshot!(algebra, @"Bgp: ?s <http://example.com/p> ?o . ?o <http://example.com/q> ?x");
    Ok(())
}

#[test]
fn test_join_of_groups_selects_fixed_hash() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::group([Element::triples([triple("s", "p", "o")])]),
        Element::group([Element::triples([triple("s", "q", "x")])]),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Join: FixedHash(?s)
      Bgp: ?s <http://example.com/p> ?o
      Bgp: ?s <http://example.com/q> ?x
    ");
    Ok(())
}

#[test]
fn test_memory_bounded_join_selects_loop() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::group([Element::triples([triple("s", "p", "o")])]),
        Element::group([Element::triples([triple("s", "q", "x")])]),
    ]);
    let algebra = compile_memory_bounded(&element)?;
    let Algebra::Join(join) = algebra else {
        panic!("Expected a join, got {algebra}");
    };
    assert_eq!(
        join.strategy(),
        &JoinStrategy::Loop {
            join_variables: vec![var("s")]
        }
    );
    Ok(())
}

#[test]
fn test_join_without_shared_variables_is_product() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::group([Element::triples([triple("a", "p", "b")])]),
        Element::group([Element::triples([triple("c", "p", "d")])]),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Join: Product
      Bgp: ?a <http://example.com/p> ?b
      Bgp: ?c <http://example.com/p> ?d
    ");
    Ok(())
}

#[test]
fn test_union_folds_to_the_right() -> Result<(), CompilationError> {
    let element = Element::Union(vec![
        Element::triples([triple("s", "a", "o")]),
        Element::triples([triple("s", "b", "o")]),
        Element::triples([triple("s", "c", "o")]),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Union
      Bgp: ?s <http://example.com/a> ?o
      Union
        Bgp: ?s <http://example.com/b> ?o
        Bgp: ?s <http://example.com/c> ?o
    ");
    Ok(())
}

#[test]
fn test_empty_union_fails() {
    let result = compile(&Element::Union(Vec::new()));
    assert_eq!(result, Err(CompilationError::EmptyUnion));
}

#[test]
fn test_union_fixed_variables_are_intersection() -> Result<(), CompilationError> {
    let element = Element::Union(vec![
        Element::triples([triple("s", "a", "o")]),
        Element::triples([triple("s", "b", "x")]),
    ]);
    let algebra = compile(&element)?;
    assert_eq!(
        algebra.fixed_variables().iter().cloned().collect::<Vec<_>>(),
        vec![var("s")]
    );
    assert_eq!(
        algebra.floating_variables().into_iter().collect::<Vec<_>>(),
        vec![var("o"), var("x")]
    );
    Ok(())
}

#[test]
fn test_optional_lifts_filter_into_left_join() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::triples([triple("s", "p", "o")]),
        Element::optional(Element::group([
            Element::triples([triple("s", "q", "x")]),
            Element::filter(ElementExpression::greater(variable("x"), integer(1))),
        ])),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r#"
    LeftJoin: FixedHash(?s) FILTER (?x > "1"^^<http://www.w3.org/2001/XMLSchema#integer>)
      Bgp: ?s <http://example.com/p> ?o
      Bgp: ?s <http://example.com/q> ?x
    "#);
    assert_eq!(
        algebra.fixed_variables().iter().cloned().collect::<Vec<_>>(),
        vec![var("o"), var("s")]
    );
    Ok(())
}

#[test]
fn test_minus_on_unit() -> Result<(), CompilationError> {
    let element = Element::group([Element::minus(Element::triples([triple("s", "p", "o")]))]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Minus: NonExistence(Product)
      Table: unit
      Bgp: ?s <http://example.com/p> ?o
    ");
    Ok(())
}

#[test]
fn test_group_filter_applies_after_join() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::filter(ElementExpression::equal(variable("o"), integer(1))),
        Element::triples([triple("s", "p", "o")]),
        Element::Data(InlineData::new(
            vec![var("s")],
            vec![vec![Some(Term::from(iri("a")))]],
        )),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r#"
    Filter: (?o = "1"^^<http://www.w3.org/2001/XMLSchema#integer>)
      Join: FixedHash(?s)
        Bgp: ?s <http://example.com/p> ?o
        Table: ?s (1 rows)
    "#);
    Ok(())
}

#[test]
fn test_consecutive_binds_are_merged() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::triples([triple("s", "p", "o")]),
        Element::bind(var("a"), integer(1)),
        Element::bind(var("b"), ElementExpression::add(variable("a"), integer(1))),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r#"
    Extend: ?a := "1"^^<http://www.w3.org/2001/XMLSchema#integer>, ?b := (?a + "1"^^<http://www.w3.org/2001/XMLSchema#integer>)
      Bgp: ?s <http://example.com/p> ?o
    "#);
    Ok(())
}

#[test]
fn test_service_is_joined_with_accumulator() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::triples([triple("s", "p", "o")]),
        Element::service(
            iri("sparql"),
            Element::triples([triple("s", "q", "x")]),
            true,
        ),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Join: FloatingHash(?s)
      Bgp: ?s <http://example.com/p> ?o
      Service: <http://example.com/sparql> SILENT
        Bgp: ?s <http://example.com/q> ?x
    ");
    Ok(())
}

#[test]
fn test_named_graph_variable_is_fixed() -> Result<(), CompilationError> {
    let element = Element::named_graph(var("g"), Element::triples([triple("s", "p", "o")]));
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    NamedGraph: ?g
      Bgp: ?s <http://example.com/p> ?o
    ");
    assert!(algebra.fixed_variables().contains(&var("g")));
    Ok(())
}

#[test]
fn test_sparse_values_leave_variables_floating() -> Result<(), CompilationError> {
    let element = Element::Data(InlineData::new(
        vec![var("a"), var("b")],
        vec![
            vec![Some(Term::from(iri("x"))), None],
            vec![Some(Term::from(iri("y"))), Some(Term::from(iri("z")))],
        ],
    ));
    let algebra = compile(&element)?;
    assert_eq!(
        algebra.fixed_variables().iter().cloned().collect::<Vec<_>>(),
        vec![var("a")]
    );
    assert_eq!(
        algebra.floating_variables().into_iter().collect::<Vec<_>>(),
        vec![var("b")]
    );
    Ok(())
}

#[test]
fn test_empty_values_is_empty_table() -> Result<(), CompilationError> {
    let element = Element::Data(InlineData::new(vec![var("a")], Vec::new()));
    let Algebra::Table(table) = compile(&element)? else {
        panic!("Expected a table");
    };
    assert!(table.is_empty());
    assert!(!table.is_unit());
    Ok(())
}

#[test]
fn test_values_row_with_wrong_length_fails() {
    let element = Element::Data(InlineData::new(
        vec![var("a"), var("b")],
        vec![vec![Some(Term::from(iri("x")))]],
    ));
    assert_eq!(
        compile(&element),
        Err(CompilationError::InvalidValuesRow {
            expected: 2,
            actual: 1
        })
    );
}

#[test]
fn test_values_with_duplicate_variable_fails() {
    let element = Element::Data(InlineData::new(vec![var("a"), var("a")], Vec::new()));
    assert_eq!(
        compile(&element),
        Err(CompilationError::DuplicateValuesVariable(var("a")))
    );
}

#[test]
fn test_path_block_groups_plain_triples() -> Result<(), CompilationError> {
    let path = PropertyPathExpression::ZeroOrMore(Box::new(PropertyPathExpression::NamedNode(
        iri("knows"),
    )));
    let element = Element::PathBlock(vec![
        TriplePath::from(triple("s", "p", "o")),
        TriplePath::Path {
            subject: TermPattern::Variable(var("s")),
            path: PropertyPathExpression::NamedNode(iri("q")),
            object: TermPattern::Variable(var("x")),
        },
        TriplePath::Path {
            subject: TermPattern::Variable(var("x")),
            path: path.clone(),
            object: TermPattern::Variable(var("y")),
        },
    ]);
    let algebra = compile(&element)?;

    let Algebra::Join(join) = &algebra else {
        panic!("Expected a join, got {algebra}");
    };
    let Algebra::Bgp(bgp) = join.lhs() else {
        panic!("Expected a BGP on the left-hand side");
    };
    assert_eq!(bgp.patterns(), &[triple("s", "p", "o"), triple("s", "q", "x")]);
    let Algebra::PropertyPath(property_path) = join.rhs() else {
        panic!("Expected a property path on the right-hand side");
    };
    assert_eq!(property_path.path(), &path);
    assert_eq!(
        join.strategy(),
        &JoinStrategy::FixedHash {
            join_variables: vec![var("x")]
        }
    );
    Ok(())
}

#[test]
fn test_filter_exists_selects_existence_strategy() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::triples([triple("s", "p", "o")]),
        Element::filter(ElementExpression::not_exists(Element::triples([triple(
            "s", "q", "x",
        )]))),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Filter: !EXISTS[Existence(FixedHash(?s))]
      Bgp: ?s <http://example.com/p> ?o
    ");
    Ok(())
}

#[test]
fn test_optional_exists_strategy_uses_both_operands() -> Result<(), CompilationError> {
    let element = Element::group([
        Element::triples([triple("x", "p", "y")]),
        Element::optional(Element::group([
            Element::triples([triple("y", "q", "z")]),
            Element::filter(ElementExpression::not_exists(Element::triples([triple(
                "x", "r", "z",
            )]))),
        ])),
    ]);
    let algebra = compile(&element)?;
    let Algebra::LeftJoin(left_join) = &algebra else {
        panic!("Expected a left join, got {algebra}");
    };
    let [Expression::Not(inner)] = left_join.filters() else {
        panic!("Expected a single negated filter");
    };
    let Expression::Exists(pattern) = inner.as_ref() else {
        panic!("Expected an exists pattern");
    };
    assert_eq!(
        pattern.strategy(),
        &JoinStrategy::Existence(Box::new(JoinStrategy::FixedHash {
            join_variables: vec![var("x"), var("z")]
        }))
    );
    Ok(())
}

#[test]
fn test_blank_nodes_are_hidden_from_group() -> Result<(), CompilationError> {
    let blank = BlankNode::new_unchecked("b");
    let element = Element::group([
        Element::triples([TriplePattern {
            subject: blank.clone().into(),
            predicate: NamedNodePattern::NamedNode(iri("p")),
            object: TermPattern::Variable(var("o")),
        }]),
        Element::bind(var("x"), variable("o")),
        Element::triples([TriplePattern {
            subject: blank.into(),
            predicate: NamedNodePattern::NamedNode(iri("q")),
            object: TermPattern::Variable(var("y")),
        }]),
    ]);
    let algebra = compile(&element)?;
    let Algebra::Project(project) = &algebra else {
        panic!("Expected a projection, got {algebra}");
    };
    let Algebra::Join(join) = project.inner() else {
        panic!("Expected the blocks to be joined");
    };
    assert_eq!(
        join.strategy(),
        &JoinStrategy::FixedHash {
            join_variables: vec![Variable::new_unchecked("_:b")]
        }
    );
    assert_eq!(
        algebra.projected_variables().iter().cloned().collect::<Vec<_>>(),
        vec![var("o"), var("x"), var("y")]
    );
    Ok(())
}

#[test]
fn test_sub_query_is_joined() -> Result<(), CompilationError> {
    let sub_query = Query::new(Element::triples([triple("s", "q", "x")]))
        .with_projection([var("s")])
        .with_limit(1);
    let element = Element::group([
        Element::triples([triple("s", "p", "o")]),
        Element::sub_query(sub_query),
    ]);
    let algebra = compile(&element)?;
    insta::assert_snapshot!(algebra, @r"
    Join: FixedHash(?s)
      Bgp: ?s <http://example.com/p> ?o
      Slice: offset=0, limit=1
        Project: ?s
          Bgp: ?s <http://example.com/q> ?x
    ");
    Ok(())
}
