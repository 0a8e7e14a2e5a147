use crate::client_builder::ClientBuilder;
use crate::collection::{
    ErrorListener, FindOptions, OperationKind, RemoveOptions, StoreErrorEvent, UpdateOptions,
    WriteResult,
};
use crate::common::SET_OPERATOR;
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::DocumentBackend;
use mongodb::bson::{Bson, Document};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// CRUD access to a single collection.
///
/// `DocumentStoreClient` is bound to one `database.collection` when it is
/// opened and forwards every operation to a [`DocumentBackend`]. It offers
/// two flavours of each operation:
///
/// - `create`, `read`, `update`, `delete` never fail. Invalid input and
///   backend failures degrade to `false`, an empty `Vec` or `0`. The failure
///   is logged and delivered to the registered [`ErrorListener`]s.
/// - `try_create`, `try_read`, `try_update`, `try_delete` return
///   `StoreResult` so a caller can tell "nothing matched" from "invalid
///   input" from "backend failure".
///
/// Cloning a client is cheap; clones share the same connection. The
/// connection is released by [`close`](Self::close) or when the last clone
/// is dropped.
///
/// # Examples
///
/// ```rust
/// use docstore::collection::{order_by, DocumentStoreClient};
/// use docstore::common::SortOrder;
/// use docstore::doc;
/// use docstore::store::InMemoryBackend;
///
/// let client = DocumentStoreClient::builder()
///     .database("shelter")
///     .collection("animals")
///     .open_with_backend(InMemoryBackend::new())
///     .unwrap();
///
/// assert!(client.create(&doc! { "name": "Rex", "age": 3 }));
/// assert!(client.create(&doc! { "name": "Bella", "age": 5 }));
///
/// let oldest = client.read(None, &order_by("age", SortOrder::Descending).limit(1));
/// assert_eq!(oldest[0].get_str("name").unwrap(), "Bella");
///
/// assert_eq!(client.update(&doc! { "name": "Rex" }, &doc! { "age": 4 }, &Default::default()), 1);
/// assert_eq!(client.delete(&doc! { "name": "Rex" }, &Default::default()), 1);
/// ```
#[derive(Clone)]
pub struct DocumentStoreClient {
    inner: Arc<DocumentStoreClientInner>,
}

impl DocumentStoreClient {
    /// Creates a [`ClientBuilder`] to configure and open a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(
        backend: Box<dyn DocumentBackend>,
        database: &str,
        collection: &str,
        socket_timeout: Duration,
        listeners: Vec<ErrorListener>,
    ) -> DocumentStoreClient {
        DocumentStoreClient {
            inner: Arc::new(DocumentStoreClientInner {
                backend,
                database: database.to_string(),
                collection: collection.to_string(),
                namespace: format!("{}.{}", database, collection),
                socket_timeout,
                listeners: RwLock::new(listeners),
            }),
        }
    }

    /// Inserts `document`; `true` when the backend assigned it an `_id`.
    ///
    /// Returns `false` without touching the collection when `document` does
    /// not serialize to a non-empty mapping.
    pub fn create<T: Serialize + ?Sized>(&self, document: &T) -> bool {
        let result = self.inner.try_create(document);
        self.inner
            .degrade(OperationKind::Create, result.map(|_| true), false)
    }

    /// Reads the documents matching `filter` (all documents when `None`).
    ///
    /// Returns an empty `Vec` when nothing matches or the read fails.
    pub fn read(&self, filter: Option<Document>, options: &FindOptions) -> Vec<Document> {
        let result = self.inner.try_read(filter, options);
        self.inner.degrade(OperationKind::Read, result, Vec::new())
    }

    /// Sets `fields` on the first document matching `filter`, or on all of
    /// them with [`update_many`](crate::collection::update_many).
    ///
    /// Returns the number of documents actually modified. An empty filter or
    /// empty `fields` returns `0` without touching the collection. Never
    /// inserts.
    pub fn update<T: Serialize + ?Sized>(
        &self,
        filter: &Document,
        fields: &T,
        options: &UpdateOptions,
    ) -> u64 {
        let result = self.inner.try_update(filter, fields, options);
        self.inner.degrade(
            OperationKind::Update,
            result.map(|result| result.modified_count()),
            0,
        )
    }

    /// Deletes the first document matching `filter`, or all of them with
    /// [`remove_many`](crate::collection::remove_many).
    ///
    /// An empty filter deletes nothing and returns `0` unless the options
    /// allow a full-scope delete.
    pub fn delete(&self, filter: &Document, options: &RemoveOptions) -> u64 {
        let result = self.inner.try_delete(filter, options);
        self.inner.degrade(
            OperationKind::Delete,
            result.map(|result| result.deleted_count()),
            0,
        )
    }

    /// Inserts `document` and returns the assigned `_id`.
    ///
    /// # Errors
    ///
    /// - `ValidationError` when `document` is not a non-empty mapping
    /// - `EncodingError` when it cannot be converted to BSON
    /// - `BackendError` when the insert fails or yields no identifier
    /// - `StoreAlreadyClosed` after [`close`](Self::close)
    pub fn try_create<T: Serialize + ?Sized>(&self, document: &T) -> StoreResult<WriteResult> {
        self.inner.try_create(document)
    }

    /// Reads the documents matching `filter`.
    ///
    /// When `options` carries no time bound, the configured socket timeout
    /// is applied as the query's server-side time limit (`maxTimeMS`).
    /// That limit covers the whole query, so a large read that is still
    /// progressing when it expires fails with `BackendError`, and
    /// [`read`](Self::read) returns an empty list. Set a larger
    /// [`FindOptions::max_time`] for such reads. Writes carry no
    /// per-operation limit.
    pub fn try_read(
        &self,
        filter: Option<Document>,
        options: &FindOptions,
    ) -> StoreResult<Vec<Document>> {
        self.inner.try_read(filter, options)
    }

    /// Applies a `$set` of `fields` to the matching document(s).
    pub fn try_update<T: Serialize + ?Sized>(
        &self,
        filter: &Document,
        fields: &T,
        options: &UpdateOptions,
    ) -> StoreResult<WriteResult> {
        self.inner.try_update(filter, fields, options)
    }

    /// Deletes the matching document(s).
    pub fn try_delete(&self, filter: &Document, options: &RemoveOptions) -> StoreResult<WriteResult> {
        self.inner.try_delete(filter, options)
    }

    /// Registers a listener for failures absorbed by the simple operations.
    pub fn subscribe(&self, listener: ErrorListener) {
        self.inner.listeners.write().push(listener);
    }

    /// Releases the connection. Later operations degrade to their no-op
    /// result. Closing twice is a no-op.
    pub fn close(&self) -> StoreResult<()> {
        self.inner.backend.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.backend.is_closed()
    }

    pub fn database_name(&self) -> &str {
        &self.inner.database
    }

    pub fn collection_name(&self) -> &str {
        &self.inner.collection
    }

    /// `database.collection`
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }
}

impl Debug for DocumentStoreClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStoreClient")
            .field("namespace", &self.namespace())
            .field("closed", &self.is_closed())
            .finish()
    }
}

struct DocumentStoreClientInner {
    backend: Box<dyn DocumentBackend>,
    database: String,
    collection: String,
    namespace: String,
    socket_timeout: Duration,
    listeners: RwLock<Vec<ErrorListener>>,
}

impl DocumentStoreClientInner {
    fn check_opened(&self) -> StoreResult<()> {
        if self.backend.is_closed() {
            return Err(StoreError::new(
                &format!("Client for {} is already closed", self.namespace),
                ErrorKind::StoreAlreadyClosed,
            ));
        }
        Ok(())
    }

    fn try_create<T: Serialize + ?Sized>(&self, document: &T) -> StoreResult<WriteResult> {
        self.check_opened()?;
        let document = to_mapping(document, "Document to create")?;

        let result = self.backend.insert_one(document)?;
        if result.inserted_id().is_none() {
            return Err(StoreError::new(
                &format!("Insert into {} returned no identifier", self.namespace),
                ErrorKind::BackendError,
            ));
        }
        log::debug!("Inserted document into {}", self.namespace);
        Ok(result)
    }

    fn try_read(&self, filter: Option<Document>, options: &FindOptions) -> StoreResult<Vec<Document>> {
        self.check_opened()?;
        if let Some(projection) = options.projection_fields() {
            projection.validate()?;
        }

        let filter = filter.unwrap_or_default();
        let documents = if options.max_time_limit().is_some() {
            self.backend.find(filter, options)?
        } else {
            let bounded = options.clone().max_time(self.socket_timeout);
            self.backend.find(filter, &bounded)?
        };
        log::debug!("Read {} document(s) from {}", documents.len(), self.namespace);
        Ok(documents)
    }

    fn try_update<T: Serialize + ?Sized>(
        &self,
        filter: &Document,
        fields: &T,
        options: &UpdateOptions,
    ) -> StoreResult<WriteResult> {
        self.check_opened()?;
        if filter.is_empty() {
            return Err(StoreError::new(
                "Update filter cannot be empty",
                ErrorKind::ValidationError,
            ));
        }
        let fields = to_mapping(fields, "Fields to update")?;
        if let Some(key) = fields.keys().find(|key| key.starts_with('$')) {
            return Err(StoreError::new(
                &format!("Update field {} cannot be an operator", key),
                ErrorKind::ValidationError,
            ));
        }

        let mut update = Document::new();
        update.insert(SET_OPERATOR, fields);
        let result = self.backend.update(filter.clone(), update, options)?;
        log::debug!(
            "Updated {} of {} matched document(s) in {}",
            result.modified_count(),
            result.matched_count(),
            self.namespace
        );
        Ok(result)
    }

    fn try_delete(&self, filter: &Document, options: &RemoveOptions) -> StoreResult<WriteResult> {
        self.check_opened()?;
        if filter.is_empty() && !options.is_full_scope_allowed() {
            return Err(StoreError::new(
                "Delete filter cannot be empty without allowing a full-scope delete",
                ErrorKind::ValidationError,
            ));
        }

        let result = self.backend.delete(filter.clone(), options)?;
        log::debug!(
            "Deleted {} document(s) from {}",
            result.deleted_count(),
            self.namespace
        );
        Ok(result)
    }

    /// Collapses a failure into `fallback` after logging and notifying
    /// listeners.
    fn degrade<T>(&self, operation: OperationKind, result: StoreResult<T>, fallback: T) -> T {
        match result {
            Ok(value) => value,
            Err(error) => {
                if error.kind().is_validation() {
                    log::debug!("Rejected {} on {}: {}", operation, self.namespace, error);
                } else {
                    log::warn!("Failed {} on {}: {}", operation, self.namespace, error);
                }

                let listeners = self.listeners.read().clone();
                if !listeners.is_empty() {
                    let event = StoreErrorEvent::new(operation, self.namespace.clone(), error);
                    for listener in &listeners {
                        listener.notify(event.clone());
                    }
                }
                fallback
            }
        }
    }
}

impl Drop for DocumentStoreClientInner {
    fn drop(&mut self) {
        if !self.backend.is_closed() {
            if let Err(error) = self.backend.close() {
                log::error!("Failed to close {}: {}", self.namespace, error);
            }
        }
    }
}

/// Converts `value` to a non-empty BSON document.
fn to_mapping<T: Serialize + ?Sized>(value: &T, what: &str) -> StoreResult<Document> {
    match mongodb::bson::to_bson(value)? {
        Bson::Document(document) if !document.is_empty() => Ok(document),
        Bson::Document(_) => Err(StoreError::new(
            &format!("{} cannot be empty", what),
            ErrorKind::ValidationError,
        )),
        other => Err(StoreError::new(
            &format!("{} must be a mapping, got {:?}", what, other.element_type()),
            ErrorKind::ValidationError,
        )),
    }
}
