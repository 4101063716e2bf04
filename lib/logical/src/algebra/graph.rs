use crate::{Algebra, AlgebraVariables};
use rdf_algebra_model::{NamedNode, NamedNodePattern};
use std::collections::BTreeSet;
use std::fmt::Formatter;

/// Evaluates the inner node against a named graph (`GRAPH`).
///
/// If the graph is a variable, the inner node is evaluated once for every named graph of the
/// dataset and the variable is bound to the graph name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedGraph {
    graph: NamedNodePattern,
    inner: Box<Algebra>,
    variables: AlgebraVariables,
}

impl NamedGraph {
    /// Creates a new [NamedGraph].
    pub fn new(graph: NamedNodePattern, inner: Algebra) -> Self {
        let mut projected = inner.projected_variables().clone();
        let mut fixed = inner.fixed_variables().clone();
        if let NamedNodePattern::Variable(variable) = &graph {
            projected.insert(variable.clone());
            fixed.insert(variable.clone());
        }
        Self {
            graph,
            inner: Box::new(inner),
            variables: AlgebraVariables::new(projected, fixed),
        }
    }

    pub fn graph(&self) -> &NamedNodePattern {
        &self.graph
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "NamedGraph: {}", self.graph)
    }
}

/// Delegates the evaluation of the inner node to a remote endpoint (`SERVICE`).
///
/// A silent service produces a single empty solution if the remote evaluation fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Service {
    inner: Box<Algebra>,
    endpoint: NamedNode,
    silent: bool,
    variables: AlgebraVariables,
}

impl Service {
    /// Creates a new [Service].
    pub fn new(inner: Algebra, endpoint: NamedNode, silent: bool) -> Self {
        let variables = if silent {
            AlgebraVariables::new(inner.projected_variables().clone(), BTreeSet::new())
        } else {
            inner.variables().clone()
        };
        Self {
            inner: Box::new(inner),
            endpoint,
            silent,
            variables,
        }
    }

    pub fn inner(&self) -> &Algebra {
        &self.inner
    }

    pub fn endpoint(&self) -> &NamedNode {
        &self.endpoint
    }

    pub fn silent(&self) -> bool {
        self.silent
    }

    pub fn variables(&self) -> &AlgebraVariables {
        &self.variables
    }

    pub(crate) fn fmt_for_explain(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Service: {}", self.endpoint)?;
        if self.silent {
            f.write_str(" SILENT")?;
        }
        Ok(())
    }
}
