mod index;
mod storage;

pub use storage::MemoryQuadStorage;
