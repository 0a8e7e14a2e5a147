//! Client operations over one bound collection.
//!
//! A [`DocumentStoreClient`] exposes create, read, update and delete against
//! a single `database.collection`. Each operation comes in a simple form that
//! never fails and a `try_*` form that returns [`StoreResult`](crate::errors::StoreResult).
//!
//! # Reading
//!
//! Reads take an optional filter and [`FindOptions`] carrying the sort,
//! projection, skip and limit. The sort is applied before skip and limit.
//!
//! ```rust,ignore
//! use docstore::collection::{order_by, Projection};
//! use docstore::common::SortOrder;
//!
//! let options = order_by("age", SortOrder::Descending)
//!     .projection(Projection::new().include("name"))
//!     .limit(10);
//! let oldest = client.read(Some(doc! { "breed": "Labrador" }), &options);
//! ```
//!
//! # Writing
//!
//! Updates are `$set` only and never insert. Deletes refuse an empty filter
//! unless [`full_scope`] options are passed.
//!
//! ```rust,ignore
//! use docstore::collection::{full_scope, update_many};
//!
//! let modified = client.update(&doc! { "breed": "Labrador" }, &doc! { "vaccinated": true }, &update_many());
//! let deleted = client.delete(&doc! {}, &full_scope());
//! ```
//!
//! # Diagnostics
//!
//! Failures absorbed by the simple operations are published to registered
//! [`ErrorListener`]s as [`StoreErrorEvent`]s.

mod document_store_client;
mod event;
mod find_options;
mod projection;
mod remove_options;
mod update_options;
mod write_result;

pub use document_store_client::*;
pub use event::*;
pub use find_options::*;
pub use projection::*;
pub use remove_options::*;
pub use update_options::*;
pub use write_result::*;
