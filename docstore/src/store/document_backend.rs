use crate::collection::{FindOptions, RemoveOptions, UpdateOptions, WriteResult};
use crate::errors::StoreResult;
use mongodb::bson::Document;

/// Low-level interface to the collection a client is bound to.
///
/// A backend exposes the raw insert/find/update/delete primitives of a
/// document database for exactly one collection. It performs no input
/// validation of its own beyond what the database does; that is the job of
/// [`DocumentStoreClient`](crate::collection::DocumentStoreClient).
///
/// # Implementations
/// - `MongoBackend`: a MongoDB server reached through the official driver
/// - `InMemoryBackend`: an in-process collection for tests and local tooling
///
/// # Thread Safety
/// Implementers must be `Send + Sync`; a client may be shared across threads
/// and forwards concurrent calls without serializing them.
pub trait DocumentBackend: Send + Sync {
    /// Inserts one document and returns the identifier assigned to it.
    fn insert_one(&self, document: Document) -> StoreResult<WriteResult>;

    /// Runs a query and materializes every matching document.
    ///
    /// The sort in `options` is applied before skip and limit.
    fn find(&self, filter: Document, options: &FindOptions) -> StoreResult<Vec<Document>>;

    /// Applies an update document (an operator document such as
    /// `{ "$set": { .. } }`) to the first match, or to every match when
    /// `options.is_many()`.
    fn update(
        &self,
        filter: Document,
        update: Document,
        options: &UpdateOptions,
    ) -> StoreResult<WriteResult>;

    /// Deletes the first match, or every match when `options.is_many()`.
    ///
    /// The full-scope guard is enforced by the client, not here.
    fn delete(&self, filter: Document, options: &RemoveOptions) -> StoreResult<WriteResult>;

    /// Releases the connection. Calling it more than once is a no-op.
    fn close(&self) -> StoreResult<()>;

    fn is_closed(&self) -> bool;
}
