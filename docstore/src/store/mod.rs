//! Backends a [`DocumentStoreClient`](crate::collection::DocumentStoreClient)
//! forwards its operations to.

mod document_backend;
pub mod memory;
mod mongo;

pub use document_backend::*;
pub use memory::InMemoryBackend;
pub use mongo::*;
