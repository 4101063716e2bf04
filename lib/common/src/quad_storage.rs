use crate::error::StorageError;
use rdf_algebra_model::{
    GraphName, GraphNameRef, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef,
    Subject, Term,
};

/// The storage boundary of the query engine.
///
/// A [QuadStorage] holds an RDF dataset and answers quad pattern lookups. The query engine only
/// reads from the storage while evaluating a query. Writes happen outside of query evaluation.
///
/// # Consistency
///
/// A query plan most often contains multiple patterns that access the same storage. This trait
/// does not provide snapshots. A query that runs concurrently with writes may observe some of
/// them.
#[allow(clippy::len_without_is_empty)]
pub trait QuadStorage: Send + Sync {
    /// Returns all quads that match the given pattern. `None` matches any term in that position.
    ///
    /// Passing `Some(GraphName::DefaultGraph)` restricts the lookup to the default graph, while
    /// `None` matches the default graph and every named graph.
    fn quads_for_pattern(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
        graph_name: Option<&GraphName>,
    ) -> Result<Vec<Quad>, StorageError>;

    /// Returns whether the storage contains `quad`.
    fn contains(&self, quad: QuadRef<'_>) -> Result<bool, StorageError>;

    /// Returns the number of quads in the storage.
    fn len(&self) -> Result<usize, StorageError>;

    /// Loads the given quads into the storage. Returns the number of quads that were not already
    /// present.
    fn extend(&self, quads: Vec<Quad>) -> Result<usize, StorageError>;

    /// Removes the given quad from the storage.
    fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError>;

    /// Creates an empty named graph in the storage.
    fn insert_named_graph(&self, graph_name: NamedOrBlankNodeRef<'_>)
        -> Result<bool, StorageError>;

    /// Returns the list of named graphs in the storage.
    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError>;

    /// Returns whether `graph_name` is a named graph in the storage.
    fn contains_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError>;

    /// Clears the entire graph.
    fn clear_graph(&self, graph_name: GraphNameRef<'_>) -> Result<(), StorageError>;

    /// Clears the entire storage.
    fn clear(&self) -> Result<(), StorageError>;
}
