use rdf_algebra_logical::{
    Algebra, CompilationError, CompilerOptions, Element, ElementCompiler, ElementExpression,
};
use rdf_algebra_model::{Literal, NamedNode, NamedNodePattern, TermPattern, TriplePattern, Variable};

pub fn var(name: &str) -> Variable {
    Variable::new_unchecked(name)
}

pub fn iri(suffix: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.com/{suffix}"))
}

/// Creates the triple pattern `?subject <http://example.com/predicate> ?object`.
pub fn triple(subject: &str, predicate: &str, object: &str) -> TriplePattern {
    TriplePattern {
        subject: TermPattern::Variable(var(subject)),
        predicate: NamedNodePattern::NamedNode(iri(predicate)),
        object: TermPattern::Variable(var(object)),
    }
}

pub fn integer(value: i64) -> ElementExpression {
    Literal::from(value).into()
}

pub fn variable(name: &str) -> ElementExpression {
    var(name).into()
}

pub fn compile(element: &Element) -> Result<Algebra, CompilationError> {
    ElementCompiler::new(CompilerOptions::default()).compile(element)
}

pub fn compile_memory_bounded(element: &Element) -> Result<Algebra, CompilationError> {
    ElementCompiler::new(CompilerOptions {
        memory_bounded_joins: true,
    })
    .compile(element)
}
