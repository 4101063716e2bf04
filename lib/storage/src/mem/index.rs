use rdf_algebra_model::{GraphName, NamedNode, Quad, Subject, Term};
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use std::sync::Arc;

type QuadSet = FxHashSet<Arc<Quad>>;

/// Maps the values of one quad component to the quads that contain it.
#[derive(Debug)]
struct ComponentIndex<TKey: Eq + Hash> {
    entries: FxHashMap<TKey, QuadSet>,
}

impl<TKey: Eq + Hash> Default for ComponentIndex<TKey> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<TKey: Eq + Hash> ComponentIndex<TKey> {
    fn insert(&mut self, key: TKey, quad: &Arc<Quad>) {
        self.entries
            .entry(key)
            .or_default()
            .insert(Arc::clone(quad));
    }

    fn remove(&mut self, key: &TKey, quad: &Quad) {
        if let Some(quads) = self.entries.get_mut(key) {
            quads.remove(quad);
            if quads.is_empty() {
                self.entries.remove(key);
            }
        }
    }

    fn get(&self, key: &TKey) -> Option<&QuadSet> {
        self.entries.get(key)
    }
}

/// The set of all quads together with one index per quad component.
///
/// A lookup scans the smallest set of candidates among the bound components and checks the
/// remaining components on each candidate.
#[derive(Debug, Default)]
pub(super) struct QuadIndexes {
    quads: QuadSet,
    by_subject: ComponentIndex<Subject>,
    by_predicate: ComponentIndex<NamedNode>,
    by_object: ComponentIndex<Term>,
    by_graph: ComponentIndex<GraphName>,
}

impl QuadIndexes {
    pub(super) fn len(&self) -> usize {
        self.quads.len()
    }

    pub(super) fn contains(&self, quad: &Quad) -> bool {
        self.quads.contains(quad)
    }

    pub(super) fn insert(&mut self, quad: Quad) -> bool {
        if self.quads.contains(&quad) {
            return false;
        }

        let quad = Arc::new(quad);
        self.by_subject.insert(quad.subject.clone(), &quad);
        self.by_predicate.insert(quad.predicate.clone(), &quad);
        self.by_object.insert(quad.object.clone(), &quad);
        self.by_graph.insert(quad.graph_name.clone(), &quad);
        self.quads.insert(quad)
    }

    pub(super) fn remove(&mut self, quad: &Quad) -> bool {
        if !self.quads.remove(quad) {
            return false;
        }

        self.by_subject.remove(&quad.subject, quad);
        self.by_predicate.remove(&quad.predicate, quad);
        self.by_object.remove(&quad.object, quad);
        self.by_graph.remove(&quad.graph_name, quad);
        true
    }

    pub(super) fn quads_in_graph(&self, graph_name: &GraphName) -> Vec<Quad> {
        self.by_graph
            .get(graph_name)
            .map(|quads| quads.iter().map(|quad| quad.as_ref().clone()).collect())
            .unwrap_or_default()
    }

    pub(super) fn contains_graph(&self, graph_name: &GraphName) -> bool {
        self.by_graph.get(graph_name).is_some()
    }

    pub(super) fn graph_names(&self) -> impl Iterator<Item = &GraphName> {
        self.by_graph.entries.keys()
    }

    pub(super) fn find(
        &self,
        subject: Option<&Subject>,
        predicate: Option<&NamedNode>,
        object: Option<&Term>,
        graph_name: Option<&GraphName>,
    ) -> Vec<Quad> {
        let candidates = [
            subject.map(|key| self.by_subject.get(key)),
            predicate.map(|key| self.by_predicate.get(key)),
            object.map(|key| self.by_object.get(key)),
            graph_name.map(|key| self.by_graph.get(key)),
        ];

        let mut smallest = &self.quads;
        for candidate in candidates.into_iter().flatten() {
            match candidate {
                // A bound component without any entry cannot match.
                None => return Vec::new(),
                Some(quads) if quads.len() < smallest.len() => smallest = quads,
                Some(_) => {}
            }
        }

        smallest
            .iter()
            .filter(|quad| {
                subject.map_or(true, |s| &quad.subject == s)
                    && predicate.map_or(true, |p| &quad.predicate == p)
                    && object.map_or(true, |o| &quad.object == o)
                    && graph_name.map_or(true, |g| &quad.graph_name == g)
            })
            .map(|quad| quad.as_ref().clone())
            .collect()
    }
}
