#![doc(test(attr(deny(warnings))))]

//! Contains storage layer implementations for the RDF algebra engine.

mod mem;

pub use mem::MemoryQuadStorage;
