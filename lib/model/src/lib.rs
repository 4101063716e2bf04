mod error;
mod numeric;
mod solution;

pub use error::*;
pub use numeric::*;
pub use solution::*;

// Re-export some oxrdf types.
pub use oxiri::Iri;
pub use oxrdf::vocab;
pub use oxrdf::{
    BlankNode, BlankNodeRef, GraphName, GraphNameRef, IriParseError, Literal, LiteralRef,
    NamedNode, NamedNodeRef, NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject,
    SubjectRef, Term, TermRef, Triple, TripleRef, Variable, VariableNameParseError, VariableRef,
};
pub use oxsdatatypes::Decimal;

// Re-export the pattern model of spargebra.
pub use spargebra::algebra::{Function, PropertyPathExpression};
pub use spargebra::term::{GroundTerm, NamedNodePattern, TermPattern, TriplePattern};
