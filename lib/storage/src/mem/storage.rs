use crate::mem::index::QuadIndexes;
use rdf_algebra_common::error::StorageError;
use rdf_algebra_common::QuadStorage;
use rdf_algebra_model::{
    GraphName, GraphNameRef, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef,
    Subject, Term,
};
use rustc_hash::FxHashSet;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An in-memory [QuadStorage].
///
/// All quads are kept in a hash set and indexed by each of their components. Readers and writers
/// are synchronized with a [RwLock].
#[derive(Debug, Default)]
pub struct MemoryQuadStorage {
    content: RwLock<Content>,
}

#[derive(Debug, Default)]
struct Content {
    quads: QuadIndexes,
    /// Named graphs that have been created explicitly. Graphs that contain quads are always
    /// named graphs, regardless of this set.
    named_graphs: FxHashSet<NamedOrBlankNode>,
}

impl MemoryQuadStorage {
    /// Creates a new empty [MemoryQuadStorage].
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Content>, StorageError> {
        self.content.read().map_err(|_| StorageError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Content>, StorageError> {
        self.content.write().map_err(|_| StorageError::Poisoned)
    }
}

impl QuadStorage for MemoryQuadStorage {
    fn quads_for_pattern(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
        graph_name: Option<&GraphName>,
    ) -> Result<Vec<Quad>, StorageError> {
        Ok(self.read()?.quads.find(subject, predicate, object, graph_name))
    }

    fn contains(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        Ok(self.read()?.quads.contains(&quad.into_owned()))
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.read()?.quads.len())
    }

    fn extend(&self, quads: Vec<Quad>) -> Result<usize, StorageError> {
        let mut content = self.write()?;
        let mut inserted = 0;
        for quad in quads {
            if content.quads.insert(quad) {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    fn remove(&self, quad: QuadRef<'_>) -> Result<bool, StorageError> {
        Ok(self.write()?.quads.remove(&quad.into_owned()))
    }

    fn insert_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        let mut content = self.write()?;
        let graph_name = graph_name.into_owned();
        let exists = content
            .quads
            .contains_graph(&GraphName::from(graph_name.clone()));
        Ok(content.named_graphs.insert(graph_name) && !exists)
    }

    fn named_graphs(&self) -> Result<Vec<NamedOrBlankNode>, StorageError> {
        let content = self.read()?;
        let mut graphs = content.named_graphs.clone();
        graphs.extend(content.quads.graph_names().filter_map(|graph| match graph {
            GraphName::NamedNode(node) => Some(NamedOrBlankNode::NamedNode(node.clone())),
            GraphName::BlankNode(node) => Some(NamedOrBlankNode::BlankNode(node.clone())),
            GraphName::DefaultGraph => None,
        }));
        Ok(graphs.into_iter().collect())
    }

    fn contains_named_graph(
        &self,
        graph_name: NamedOrBlankNodeRef<'_>,
    ) -> Result<bool, StorageError> {
        let content = self.read()?;
        let graph_name = graph_name.into_owned();
        Ok(content.named_graphs.contains(&graph_name)
            || content.quads.contains_graph(&GraphName::from(graph_name)))
    }

    fn clear_graph(&self, graph_name: GraphNameRef<'_>) -> Result<(), StorageError> {
        let mut content = self.write()?;
        for quad in content.quads.quads_in_graph(&graph_name.into_owned()) {
            content.quads.remove(&quad);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.write()? = Content::default();
        Ok(())
    }
}
