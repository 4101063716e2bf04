use rdf_algebra_common::error::StorageError;
use rdf_algebra_common::QuadStorage;
use rdf_algebra_model::{GraphName, NamedNode, Quad, Subject, Term, Triple};
use rustc_hash::FxHashSet;

/// The graphs that triple patterns are matched against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActiveGraph {
    /// Only the default graph of the storage.
    DefaultGraph,
    /// The union of the default graph and every named graph.
    AllGraphs,
    /// The union of the given graphs.
    Union(Vec<GraphName>),
}

impl ActiveGraph {
    /// Returns all triples of the active graph that match the pattern. `None` matches any term.
    ///
    /// A triple that is contained in more than one active graph is only returned once.
    pub fn triples_for_pattern(
        &self,
        storage: &dyn QuadStorage,
        subject: Option<&Subject>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
    ) -> Result<Vec<Triple>, StorageError> {
        match self {
            Self::DefaultGraph => {
                let quads = storage.quads_for_pattern(
                    subject,
                    predicate,
                    object,
                    Some(&GraphName::DefaultGraph),
                )?;
                Ok(quads.into_iter().map(into_triple).collect())
            }
            Self::AllGraphs => {
                let quads = storage.quads_for_pattern(subject, predicate, object, None)?;
                Ok(distinct_triples(quads))
            }
            Self::Union(graphs) => {
                let mut quads = Vec::new();
                for graph in graphs {
                    quads.extend(storage.quads_for_pattern(
                        subject,
                        predicate,
                        object,
                        Some(graph),
                    )?);
                }
                if graphs.len() > 1 {
                    Ok(distinct_triples(quads))
                } else {
                    Ok(quads.into_iter().map(into_triple).collect())
                }
            }
        }
    }

    /// Returns every term that occurs as a subject or an object in the active graph.
    pub fn nodes(&self, storage: &dyn QuadStorage) -> Result<FxHashSet<Term>, StorageError> {
        let mut nodes = FxHashSet::default();
        for triple in self.triples_for_pattern(storage, None, None, None)? {
            nodes.insert(triple.subject.into());
            nodes.insert(triple.object);
        }
        Ok(nodes)
    }
}

fn into_triple(quad: Quad) -> Triple {
    Triple::new(quad.subject, quad.predicate, quad.object)
}

fn distinct_triples(quads: Vec<Quad>) -> Vec<Triple> {
    let mut seen = FxHashSet::default();
    quads
        .into_iter()
        .map(into_triple)
        .filter(|triple| seen.insert(triple.clone()))
        .collect()
}
