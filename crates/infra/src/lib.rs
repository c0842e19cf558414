//! Infrastructure layer: document storage and the lookups built on it.

pub mod directory;
pub mod lookup;
pub mod store;

pub use directory::StoreDirectory;
pub use lookup::SalonLookup;
pub use store::{DocumentStore, InMemoryDocumentStore, StoreError};
