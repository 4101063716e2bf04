//! API to access an in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset).
//!
//! The entry point of the module is the [`Store`] struct.

use crate::error::LoaderError;
use oxrdfio::RdfParser;
use rdf_algebra_common::error::StorageError;
use rdf_algebra_common::QuadStorage;
use rdf_algebra_execution::{
    evaluate, result_variables, ExecutionContext, QueryEvaluationError, QueryOptions,
    QuerySolution, QuerySolutionIter,
};
use rdf_algebra_logical::{Algebra, Query, QueryCompiler};
use rdf_algebra_model::{
    GraphName, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject, Term,
    Variable,
};
use rdf_algebra_storage::MemoryQuadStorage;
use std::io::Read;
use std::sync::Arc;

/// An in-memory [RDF dataset](https://www.w3.org/TR/rdf11-concepts/#dfn-rdf-dataset) store.
///
/// The store can be queried with compiled [Query] values.
///
/// Usage example:
/// ```
/// use rdf_algebra::model::*;
/// use rdf_algebra::store::Store;
///
/// let store = Store::default();
///
/// // insertion
/// let ex = NamedNode::new("http://example.com")?;
/// let quad = Quad::new(ex.clone(), ex.clone(), ex.clone(), GraphName::DefaultGraph);
/// store.insert(&quad)?;
///
/// // quad filter
/// let results = store.quads_for_pattern(None, None, None, None)?;
/// assert_eq!(vec![quad], results);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug)]
pub struct Store {
    storage: Arc<MemoryQuadStorage>,
    options: QueryOptions,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Creates an empty [Store] with a [MemoryQuadStorage] as backing storage.
    pub fn new() -> Store {
        Self {
            storage: Arc::new(MemoryQuadStorage::new()),
            options: QueryOptions::default(),
        }
    }

    /// Sets the options used by [Self::prepare] and [Self::query].
    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the options that queries are compiled and evaluated with.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Creates an [ExecutionContext] over this store.
    ///
    /// The context can be customized (e.g., with a dataset or a service handler) and passed to
    /// [PreparedQuery::evaluate].
    pub fn context(&self) -> ExecutionContext {
        let storage: Arc<dyn QuadStorage> = Arc::<MemoryQuadStorage>::clone(&self.storage);
        ExecutionContext::new(storage).with_options(self.options)
    }

    /// Compiles `query` into an [Algebra] tree.
    pub fn prepare(&self, query: &Query) -> Result<PreparedQuery, QueryEvaluationError> {
        let algebra = QueryCompiler::new(self.options.compiler).compile(query)?;
        Ok(PreparedQuery::new(algebra))
    }

    /// Compiles and evaluates `query`, collecting all solutions.
    ///
    /// Usage example:
    /// ```
    /// use rdf_algebra::logical::{Element, Query};
    /// use rdf_algebra::model::*;
    /// use rdf_algebra::store::Store;
    ///
    /// let store = Store::default();
    /// let ex = NamedNodeRef::new("http://example.com")?;
    /// store.insert(QuadRef::new(ex, ex, ex, GraphNameRef::DefaultGraph))?;
    ///
    /// let pattern = TriplePattern {
    ///     subject: Variable::new("s")?.into(),
    ///     predicate: Variable::new("p")?.into(),
    ///     object: Variable::new("o")?.into(),
    /// };
    /// let solutions = store.query(&Query::new(Element::triples([pattern])))?;
    /// assert_eq!(solutions[0].get("s"), Some(&ex.into_owned().into()));
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn query(&self, query: &Query) -> Result<Vec<QuerySolution>, QueryEvaluationError> {
        let prepared = self.prepare(query)?;
        let context = self.context();
        prepared.evaluate(&context).collect()
    }

    /// Returns the compiled [Algebra] of `query` without evaluating it.
    ///
    /// The [Display](std::fmt::Display) implementation of the algebra prints the operator tree
    /// including the selected join strategies.
    pub fn explain(&self, query: &Query) -> Result<Algebra, QueryEvaluationError> {
        Ok(self.prepare(query)?.into_algebra())
    }

    /// Retrieves quads with a filter on each quad component.
    pub fn quads_for_pattern(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
        graph_name: Option<&GraphName>,
    ) -> Result<Vec<Quad>, StorageError> {
        self.storage
            .quads_for_pattern(subject, predicate, object, graph_name)
    }

    /// Checks if this store contains a given quad.
    pub fn contains<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.storage.contains(quad.into())
    }

    /// Returns the number of quads in the store.
    pub fn len(&self) -> Result<usize, StorageError> {
        self.storage.len()
    }

    /// Returns if the store is empty.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    /// Adds a quad to this store.
    ///
    /// Returns `true` if the quad was not already in the store.
    pub fn insert<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        let quad: QuadRef<'a> = quad.into();
        let inserted = self.storage.extend(vec![quad.into_owned()])?;
        Ok(inserted > 0)
    }

    /// Adds a set of quads to this store. Returns the number of quads that were not already in
    /// the store.
    pub fn extend(
        &self,
        quads: impl IntoIterator<Item = impl Into<Quad>>,
    ) -> Result<usize, StorageError> {
        self.storage
            .extend(quads.into_iter().map(Into::<Quad>::into).collect())
    }

    /// Removes a quad from this store.
    ///
    /// Returns `true` if the quad was in the store and has been removed.
    pub fn remove<'a>(&self, quad: impl Into<QuadRef<'a>>) -> Result<bool, StorageError> {
        self.storage.remove(quad.into())
    }

    /// Returns all the store named graphs.
    pub fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        self.storage.named_graphs()
    }

    /// Adds a named graph to the store.
    ///
    /// Returns `true` if the graph was not already in the store.
    pub fn insert_named_graph<'a>(
        &self,
        graph_name: impl Into<NamedOrBlankNodeRef<'a>>,
    ) -> Result<bool, StorageError> {
        self.storage.insert_named_graph(graph_name.into())
    }

    /// Removes all quads and named graphs from the store.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.clear()
    }

    /// Loads an RDF file into the store.
    ///
    /// This function is atomic: the quads are only inserted once the whole file has been
    /// parsed. Blank nodes are renamed to avoid clashes with the blank nodes already in the
    /// store.
    ///
    /// Usage example:
    /// ```
    /// use oxrdfio::RdfFormat;
    /// use rdf_algebra::model::*;
    /// use rdf_algebra::store::Store;
    ///
    /// let store = Store::default();
    /// let file = b"<http://example.com> <http://example.com> <http://example.com> <http://example.com/g> .";
    /// store.load_from_reader(RdfFormat::NQuads, file.as_ref())?;
    ///
    /// let ex = NamedNodeRef::new("http://example.com")?;
    /// assert!(store.contains(QuadRef::new(ex, ex, ex, NamedNodeRef::new("http://example.com/g")?))?);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn load_from_reader(
        &self,
        parser: impl Into<RdfParser>,
        reader: impl Read,
    ) -> Result<(), LoaderError> {
        let quads = parser
            .into()
            .rename_blank_nodes()
            .for_reader(reader)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(quads = quads.len(), "Loading parsed quads");
        self.storage
            .extend(quads)
            .map(|_| ())
            .map_err(LoaderError::from)
    }
}

/// A compiled [Query] that can be evaluated any number of times.
#[derive(Clone, Debug)]
pub struct PreparedQuery {
    algebra: Algebra,
    variables: Arc<[Variable]>,
}

impl PreparedQuery {
    /// Creates a new [PreparedQuery] from a compiled `algebra`.
    pub fn new(algebra: Algebra) -> Self {
        let variables = result_variables(&algebra).into();
        Self { algebra, variables }
    }

    pub fn algebra(&self) -> &Algebra {
        &self.algebra
    }

    pub fn into_algebra(self) -> Algebra {
        self.algebra
    }

    /// The variables of every solution, in order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Evaluates the query lazily in `context`.
    pub fn evaluate<'a>(&'a self, context: &'a ExecutionContext) -> QuerySolutionIter<'a> {
        QuerySolutionIter::new(
            Arc::clone(&self.variables),
            evaluate(context, &self.algebra),
        )
    }
}
