mod bgp;
mod filter;
mod graph;
mod join;
mod modifiers;
mod path;
mod table;
mod union;
mod variables;

pub use bgp::*;
pub use filter::*;
pub use graph::*;
pub use join::*;
pub use modifiers::*;
pub use path::*;
pub use table::*;
pub use union::*;
pub use variables::*;

use rdf_algebra_model::Variable;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// A node of a compiled query.
///
/// Every node knows statically which variables it may bind (projected variables) and which
/// variables are bound in every one of its solutions (fixed variables). The join strategies are
/// selected based on this information.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Algebra {
    Bgp(Bgp),
    Join(Join),
    LeftJoin(LeftJoin),
    Union(Union),
    Minus(Minus),
    Filter(Filter),
    Extend(Extend),
    NamedGraph(NamedGraph),
    Service(Service),
    PropertyPath(PropertyPath),
    Slice(Slice),
    Table(Table),
    Project(Project),
    Distinct(Distinct),
    Reduced(Reduced),
}

impl Algebra {
    /// Returns the unit table, the identity of the join operation.
    pub fn unit() -> Self {
        Self::Table(Table::unit())
    }

    /// Returns whether this node is the unit table.
    pub fn is_unit(&self) -> bool {
        matches!(self, Self::Table(table) if table.is_unit())
    }

    /// Returns the variable analysis of this node.
    pub fn variables(&self) -> &AlgebraVariables {
        match self {
            Self::Bgp(node) => node.variables(),
            Self::Join(node) => node.variables(),
            Self::LeftJoin(node) => node.variables(),
            Self::Union(node) => node.variables(),
            Self::Minus(node) => node.variables(),
            Self::Filter(node) => node.variables(),
            Self::Extend(node) => node.variables(),
            Self::NamedGraph(node) => node.variables(),
            Self::Service(node) => node.variables(),
            Self::PropertyPath(node) => node.variables(),
            Self::Slice(node) => node.variables(),
            Self::Table(node) => node.variables(),
            Self::Project(node) => node.variables(),
            Self::Distinct(node) => node.variables(),
            Self::Reduced(node) => node.variables(),
        }
    }

    /// All variables that may be bound in a solution of this node.
    pub fn projected_variables(&self) -> &BTreeSet<Variable> {
        self.variables().projected()
    }

    /// All variables that are bound in every solution of this node.
    pub fn fixed_variables(&self) -> &BTreeSet<Variable> {
        self.variables().fixed()
    }

    /// All variables that may or may not be bound in a solution of this node.
    pub fn floating_variables(&self) -> BTreeSet<Variable> {
        self.variables().floating()
    }

    /// Returns the direct children of this node.
    pub fn children(&self) -> Vec<&Algebra> {
        match self {
            Self::Bgp(_) | Self::PropertyPath(_) | Self::Table(_) => Vec::new(),
            Self::Join(node) => vec![node.lhs(), node.rhs()],
            Self::LeftJoin(node) => vec![node.lhs(), node.rhs()],
            Self::Union(node) => vec![node.lhs(), node.rhs()],
            Self::Minus(node) => vec![node.lhs(), node.rhs()],
            Self::Filter(node) => vec![node.inner()],
            Self::Extend(node) => vec![node.inner()],
            Self::NamedGraph(node) => vec![node.inner()],
            Self::Service(node) => vec![node.inner()],
            Self::Slice(node) => vec![node.inner()],
            Self::Project(node) => vec![node.inner()],
            Self::Distinct(node) => vec![node.inner()],
            Self::Reduced(node) => vec![node.inner()],
        }
    }

    fn fmt_node(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bgp(node) => node.fmt_for_explain(f),
            Self::Join(node) => node.fmt_for_explain(f),
            Self::LeftJoin(node) => node.fmt_for_explain(f),
            Self::Union(_) => f.write_str("Union"),
            Self::Minus(node) => node.fmt_for_explain(f),
            Self::Filter(node) => node.fmt_for_explain(f),
            Self::Extend(node) => node.fmt_for_explain(f),
            Self::NamedGraph(node) => node.fmt_for_explain(f),
            Self::Service(node) => node.fmt_for_explain(f),
            Self::PropertyPath(node) => node.fmt_for_explain(f),
            Self::Slice(node) => node.fmt_for_explain(f),
            Self::Table(node) => node.fmt_for_explain(f),
            Self::Project(node) => node.fmt_for_explain(f),
            Self::Distinct(_) => f.write_str("Distinct"),
            Self::Reduced(_) => f.write_str("Reduced"),
        }
    }

    fn fmt_tree(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        write!(f, "{:width$}", "", width = depth * 2)?;
        self.fmt_node(f)?;
        for child in self.children() {
            f.write_str("\n")?;
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Prints the algebra as an indented operator tree, one node per line.
impl Display for Algebra {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_tree(f, 0)
    }
}

macro_rules! implement_into_algebra {
    ($($node:ident),*) => {
        $(
            impl From<$node> for Algebra {
                fn from(value: $node) -> Self {
                    Algebra::$node(value)
                }
            }
        )*
    };
}

implement_into_algebra!(
    Bgp,
    Join,
    LeftJoin,
    Union,
    Minus,
    Filter,
    Extend,
    NamedGraph,
    Service,
    PropertyPath,
    Slice,
    Table,
    Project,
    Distinct,
    Reduced
);
