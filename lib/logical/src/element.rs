use crate::{Expression, Query};
use rdf_algebra_model::{
    NamedNode, NamedNodePattern, PropertyPathExpression, Term, TermPattern, TriplePattern,
    Variable,
};

/// An expression as it appears in a graph pattern, before compilation.
pub type ElementExpression = Expression<Element>;

/// A graph pattern element of a parsed query.
///
/// This is the tree that a SPARQL parser produces for the `WHERE` clause of a query. It mirrors
/// the syntax of the query (e.g., a `{ }` group with its children in order) and is compiled into
/// an [Algebra](crate::Algebra) by the [ElementCompiler](crate::ElementCompiler).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    /// A sequence of triple patterns.
    TripleBlock(Vec<TriplePattern>),
    /// A sequence of triple patterns and property path patterns.
    PathBlock(Vec<TriplePath>),
    /// `FILTER(expr)`. A group with multiple filters may collect them in one element.
    Filter(Vec<ElementExpression>),
    /// `BIND(expr AS ?v)`. Assignments are applied in order.
    Bind(Vec<(Variable, ElementExpression)>),
    /// `OPTIONAL { ... }`
    Optional(Box<Element>),
    /// `MINUS { ... }`
    Minus(Box<Element>),
    /// `{ ... } UNION { ... } UNION ...`
    Union(Vec<Element>),
    /// A `{ ... }` delimited group.
    Group(Vec<Element>),
    /// `GRAPH <g> { ... }` or `GRAPH ?g { ... }`
    NamedGraph {
        graph: NamedNodePattern,
        inner: Box<Element>,
    },
    /// `SERVICE [SILENT] <endpoint> { ... }`
    Service {
        endpoint: NamedNode,
        inner: Box<Element>,
        silent: bool,
    },
    /// `{ SELECT ... }`
    SubQuery(Box<Query>),
    /// `VALUES (...) { ... }`
    Data(InlineData),
}

impl Element {
    /// Creates a group of the given elements.
    pub fn group(elements: impl IntoIterator<Item = Element>) -> Self {
        Self::Group(elements.into_iter().collect())
    }

    /// Creates a block of triple patterns.
    pub fn triples(patterns: impl IntoIterator<Item = TriplePattern>) -> Self {
        Self::TripleBlock(patterns.into_iter().collect())
    }

    /// Creates a filter with a single expression.
    pub fn filter(expression: ElementExpression) -> Self {
        Self::Filter(vec![expression])
    }

    /// Creates a bind with a single assignment.
    pub fn bind(variable: Variable, expression: ElementExpression) -> Self {
        Self::Bind(vec![(variable, expression)])
    }

    /// Creates an `OPTIONAL` element.
    pub fn optional(inner: Element) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Creates a `MINUS` element.
    pub fn minus(inner: Element) -> Self {
        Self::Minus(Box::new(inner))
    }

    /// Creates a `GRAPH` element.
    pub fn named_graph(graph: impl Into<NamedNodePattern>, inner: Element) -> Self {
        Self::NamedGraph {
            graph: graph.into(),
            inner: Box::new(inner),
        }
    }

    /// Creates a `SERVICE` element.
    pub fn service(endpoint: NamedNode, inner: Element, silent: bool) -> Self {
        Self::Service {
            endpoint,
            inner: Box::new(inner),
            silent,
        }
    }

    /// Creates a sub-query element.
    pub fn sub_query(query: Query) -> Self {
        Self::SubQuery(Box::new(query))
    }
}

/// A triple pattern whose predicate may be a property path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TriplePath {
    Triple(TriplePattern),
    Path {
        subject: TermPattern,
        path: PropertyPathExpression,
        object: TermPattern,
    },
}

impl TriplePath {
    /// Returns the plain triple pattern if this path is a simple triple.
    ///
    /// A path that consists of a single IRI is a simple triple.
    pub fn as_triple(&self) -> Option<TriplePattern> {
        match self {
            Self::Triple(pattern) => Some(pattern.clone()),
            Self::Path {
                subject,
                path: PropertyPathExpression::NamedNode(predicate),
                object,
            } => Some(TriplePattern {
                subject: subject.clone(),
                predicate: predicate.clone().into(),
                object: object.clone(),
            }),
            Self::Path { .. } => None,
        }
    }
}

impl From<TriplePattern> for TriplePath {
    fn from(value: TriplePattern) -> Self {
        Self::Triple(value)
    }
}

/// The data of a `VALUES` block.
///
/// Each row has one entry per variable. `None` represents `UNDEF`, leaving the variable unbound
/// in that row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineData {
    pub variables: Vec<Variable>,
    pub rows: Vec<Vec<Option<Term>>>,
}

impl InlineData {
    /// Creates a new [InlineData].
    pub fn new(variables: Vec<Variable>, rows: Vec<Vec<Option<Term>>>) -> Self {
        Self { variables, rows }
    }
}
