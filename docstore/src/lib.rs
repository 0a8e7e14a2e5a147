//! # docstore - CRUD access to a MongoDB collection
//!
//! docstore is a thin data-access layer binding one `database.collection`
//! of a MongoDB deployment and exposing create, read, update and delete on
//! it. Application code talks to a [`DocumentStoreClient`] instead of
//! spreading raw driver calls around.
//!
//! ## Key Features
//!
//! - **Uniform results**: the simple operations never fail; invalid input and
//!   backend errors degrade to `false`, `0` or an empty list
//! - **Typed results**: `try_*` operations return [`StoreResult`] for callers
//!   that need to know why nothing happened
//! - **Guarded writes**: updates are `$set` only and never upsert; a delete
//!   with an empty filter is refused unless explicitly allowed
//! - **Environment aware configuration**: host and port fall back to
//!   `MONGO_HOST` / `MONGO_PORT`, then `localhost:27017`
//! - **Pluggable backends**: the MongoDB driver, or an in-memory collection
//!   for tests and local tooling
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docstore::collection::{order_by, DocumentStoreClient};
//! use docstore::common::SortOrder;
//! use docstore::doc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DocumentStoreClient::builder()
//!     .credentials("svc", "secret")
//!     .database("shelter")
//!     .collection("animals")
//!     .open()?;
//!
//! client.create(&doc! { "name": "Rex", "breed": "Labrador", "age": 3 });
//! let labradors = client.read(Some(doc! { "breed": "Labrador" }), &order_by("age", SortOrder::Ascending));
//! client.update(&doc! { "name": "Rex" }, &doc! { "outcome": "Adoption" }, &Default::default());
//! client.delete(&doc! { "name": "Rex" }, &Default::default());
//!
//! client.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`client_builder`] - Fluent builder opening a client
//! - [`client_config`] - Connection settings and URI synthesis
//! - [`collection`] - The client and its operation options
//! - [`common`] - Sorting types and constants
//! - [`errors`] - Error types and result definitions
//! - [`store`] - Backends the client forwards to

pub mod client_builder;
pub mod client_config;
pub mod collection;
pub mod common;
pub mod errors;
pub mod store;

pub use client_builder::ClientBuilder;
pub use client_config::ClientConfig;
pub use collection::DocumentStoreClient;
pub use errors::{ErrorKind, StoreError, StoreResult};
pub use mongodb::bson::{doc, Bson, Document};

#[cfg(test)]
#[ctor::ctor]
fn init() {
    colog::init();
}
