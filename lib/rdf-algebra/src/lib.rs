#![doc(test(attr(deny(warnings))))]

//! Compiles SPARQL graph patterns into a join algebra and evaluates them against an RDF dataset.
//!
//! A parsed [Query](logical::Query) is compiled into an [Algebra](logical::Algebra) tree whose
//! join nodes carry the [join strategy](logical::join::JoinStrategy) selected from a static
//! analysis of the variables of their operands. The tree is then evaluated lazily, one solution
//! at a time.
//!
//! ```
//! use rdf_algebra::logical::{Element, Query};
//! use rdf_algebra::model::*;
//! use rdf_algebra::store::Store;
//!
//! let store = Store::new();
//! let ex = NamedNode::new("http://example.com")?;
//! store.insert(QuadRef::new(&ex, &ex, &ex, GraphNameRef::DefaultGraph))?;
//!
//! let pattern = TriplePattern {
//!     subject: Variable::new("s")?.into(),
//!     predicate: ex.clone().into(),
//!     object: Variable::new("o")?.into(),
//! };
//! let solutions = store.query(&Query::new(Element::triples([pattern])))?;
//! assert_eq!(solutions[0].get("s"), Some(&ex.into()));
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

pub mod error;
pub mod store;

pub mod model {
    pub use rdf_algebra_model::*;
}

pub mod common {
    pub use rdf_algebra_common::*;
}

pub mod logical {
    pub use rdf_algebra_logical::*;
}

pub mod execution {
    pub use rdf_algebra_execution::*;
}

pub mod storage {
    pub use rdf_algebra_storage::*;
}
