use crate::expression::{DefaultExpressionEvaluator, ExpressionEvaluator};
use crate::{ActiveGraph, QueryEvaluationError};
use rdf_algebra_common::error::StorageError;
use rdf_algebra_common::QuadStorage;
use rdf_algebra_logical::{Algebra, CompilerOptions};
use rdf_algebra_model::{GraphName, NamedNode, NamedOrBlankNode, Solution};
use std::error::Error;
use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Options for query evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// The options passed to the query compiler.
    pub compiler: CompilerOptions,
    /// Use the union of all graphs as the default graph.
    pub default_graph_as_union: bool,
}

/// A restriction of the dataset a query is evaluated against (`FROM` and `FROM NAMED`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryDataset {
    default: Option<Vec<GraphName>>,
    named: Option<Vec<NamedOrBlankNode>>,
}

impl QueryDataset {
    /// Creates the dataset that contains the whole storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if this dataset specification is the default one (i.e., the default graph is the
    /// storage default graph and all the storage named graphs are available).
    pub fn is_default_dataset(&self) -> bool {
        let default_graph_is_default = match &self.default {
            None => true,
            Some(graphs) => graphs.as_slice() == [GraphName::DefaultGraph],
        };
        default_graph_is_default && self.named.is_none()
    }

    /// Returns the list of the store graphs that are available to the query as the default graph
    /// or `None` if the union of all graphs is used as the default graph.
    pub fn default_graph_graphs(&self) -> Option<&[GraphName]> {
        self.default.as_deref()
    }

    /// Sets the union of the given graphs as the default graph.
    #[must_use]
    pub fn with_default_graph(mut self, graphs: impl IntoIterator<Item = GraphName>) -> Self {
        self.default = Some(graphs.into_iter().collect());
        self
    }

    /// Returns the list of the available named graphs for the query or `None` if all graphs are
    /// available.
    pub fn available_named_graphs(&self) -> Option<&[NamedOrBlankNode]> {
        self.named.as_deref()
    }

    /// Restricts the named graphs that `GRAPH` can access.
    #[must_use]
    pub fn with_available_named_graphs(
        mut self,
        named_graphs: impl IntoIterator<Item = NamedOrBlankNode>,
    ) -> Self {
        self.named = Some(named_graphs.into_iter().collect());
        self
    }
}

/// A token for cancelling a running query.
///
/// Cloned tokens share their state. The query checks the token whenever a solution is pulled
/// from one of its nodes and fails with [QueryEvaluationError::Cancelled] once the token has
/// been cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels every query that uses this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Handler for [SPARQL 1.1 Federated Query](https://www.w3.org/TR/sparql11-federated-query/) SERVICEs.
pub trait ServiceHandler: Send + Sync {
    /// Evaluates `pattern` on the remote `endpoint` and returns the solutions.
    fn handle(
        &self,
        endpoint: &NamedNode,
        pattern: &Algebra,
    ) -> Result<Vec<Solution>, Box<dyn Error + Send + Sync>>;
}

/// Everything that the evaluation of a query needs from its environment.
#[derive(Clone)]
pub struct ExecutionContext {
    storage: Arc<dyn QuadStorage>,
    dataset: QueryDataset,
    options: QueryOptions,
    cancellation_token: CancellationToken,
    expression_evaluator: Arc<dyn ExpressionEvaluator>,
    service_handler: Option<Arc<dyn ServiceHandler>>,
}

impl ExecutionContext {
    /// Creates a new [ExecutionContext] for the whole `storage` with the default options.
    pub fn new(storage: Arc<dyn QuadStorage>) -> Self {
        Self {
            storage,
            dataset: QueryDataset::default(),
            options: QueryOptions::default(),
            cancellation_token: CancellationToken::default(),
            expression_evaluator: Arc::new(DefaultExpressionEvaluator::new()),
            service_handler: None,
        }
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: QueryDataset) -> Self {
        self.dataset = dataset;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: QueryOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_cancellation_token(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = cancellation_token;
        self
    }

    /// Replaces the [DefaultExpressionEvaluator].
    #[must_use]
    pub fn with_expression_evaluator(
        mut self,
        expression_evaluator: Arc<dyn ExpressionEvaluator>,
    ) -> Self {
        self.expression_evaluator = expression_evaluator;
        self
    }

    /// Sets the handler for `SERVICE` patterns. Without a handler, every `SERVICE` fails.
    #[must_use]
    pub fn with_service_handler(mut self, service_handler: Arc<dyn ServiceHandler>) -> Self {
        self.service_handler = Some(service_handler);
        self
    }

    pub fn storage(&self) -> &dyn QuadStorage {
        self.storage.as_ref()
    }

    pub fn dataset(&self) -> &QueryDataset {
        &self.dataset
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn expression_evaluator(&self) -> &dyn ExpressionEvaluator {
        self.expression_evaluator.as_ref()
    }

    pub fn service_handler(&self) -> Option<&dyn ServiceHandler> {
        self.service_handler.as_deref()
    }

    /// Returns an error if the query has been cancelled.
    pub fn check_cancelled(&self) -> Result<(), QueryEvaluationError> {
        if self.cancellation_token.is_cancelled() {
            return Err(QueryEvaluationError::Cancelled);
        }
        Ok(())
    }

    /// Returns the graph that triple patterns outside of `GRAPH` are matched against.
    pub fn default_active_graph(&self) -> ActiveGraph {
        match self.dataset.default_graph_graphs() {
            Some(graphs) => ActiveGraph::Union(graphs.to_vec()),
            None if self.options.default_graph_as_union => ActiveGraph::AllGraphs,
            None => ActiveGraph::DefaultGraph,
        }
    }

    /// Returns the named graphs that `GRAPH ?g` iterates over.
    pub fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        match self.dataset.available_named_graphs() {
            Some(graphs) => Ok(graphs.to_vec()),
            None => self.storage.named_graphs(),
        }
    }

    /// Returns whether `GRAPH <graph>` can access `graph`.
    pub fn is_available_named_graph(&self, graph: &NamedOrBlankNode) -> bool {
        self.dataset
            .available_named_graphs()
            .map_or(true, |graphs| graphs.contains(graph))
    }
}

impl Debug for ExecutionContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("dataset", &self.dataset)
            .field("options", &self.options)
            .field("cancellation_token", &self.cancellation_token)
            .field("service_handler", &self.service_handler.is_some())
            .finish_non_exhaustive()
    }
}
