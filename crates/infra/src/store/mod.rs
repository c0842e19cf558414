//! Collection-keyed document storage abstractions.

pub mod document_store;

pub use document_store::{DocumentStore, InMemoryDocumentStore, StoreError};
