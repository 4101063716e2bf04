pub mod error;
mod quad_storage;

pub use quad_storage::QuadStorage;
