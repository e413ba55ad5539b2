//! Evidence store adapter implementations.

pub mod chroma;
pub mod memory;

pub use chroma::ChromaEvidenceStore;
pub use memory::InMemoryEvidenceStore;
