use crate::client_config::{redact_uri, ClientConfig};
use crate::collection::{FindOptions, RemoveOptions, UpdateOptions, WriteResult};
use crate::errors::{ErrorKind, StoreError, StoreResult};
use crate::store::DocumentBackend;
use mongodb::bson::{doc, Document};
use mongodb::sync::{Client, Collection};
use parking_lot::RwLock;

/// Database pinged to check reachability.
const PING_DATABASE: &str = "admin";

/// A [`DocumentBackend`] talking to a MongoDB deployment through the
/// synchronous driver.
///
/// The driver client owns its own connection pool; this type only holds the
/// client and the bound collection handle. `close` drops both, after which
/// every operation fails with `ErrorKind::StoreAlreadyClosed`.
pub struct MongoBackend {
    handles: RwLock<Option<MongoHandles>>,
    namespace: String,
}

struct MongoHandles {
    // kept alive for the lifetime of the collection handle
    _client: Client,
    collection: Collection<Document>,
}

impl MongoBackend {
    /// Connects using `config` and verifies the server answers a `ping`.
    ///
    /// Fails with `ErrorKind::ConnectionError` when the URI is rejected by the
    /// driver or the server cannot be selected within the configured
    /// server-selection timeout.
    pub fn connect(config: &ClientConfig) -> StoreResult<MongoBackend> {
        let database_name = config.require_database()?;
        let collection_name = config.require_collection()?;
        let uri = config.connection_uri()?;

        log::debug!("Connecting to {}", redact_uri(&uri));
        let client = Client::with_uri_str(&uri).map_err(|err| {
            log::error!("MongoDB connection failed: {}", err);
            StoreError::new_with_cause(
                "MongoDB connection failed",
                ErrorKind::ConnectionError,
                err.into(),
            )
        })?;

        client
            .database(PING_DATABASE)
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|err| {
                log::error!("MongoDB connection failed: {}", err);
                StoreError::new_with_cause(
                    "MongoDB connection failed",
                    ErrorKind::ConnectionError,
                    err.into(),
                )
            })?;

        let collection = client
            .database(database_name)
            .collection::<Document>(collection_name);
        let namespace = format!("{}.{}", database_name, collection_name);
        log::info!("Connected to {}", namespace);

        Ok(MongoBackend {
            handles: RwLock::new(Some(MongoHandles {
                _client: client,
                collection,
            })),
            namespace,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    fn with_collection<T>(
        &self,
        op: impl FnOnce(&Collection<Document>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let guard = self.handles.read();
        match guard.as_ref() {
            Some(handles) => op(&handles.collection),
            None => Err(StoreError::new(
                &format!("Connection to {} is already closed", self.namespace),
                ErrorKind::StoreAlreadyClosed,
            )),
        }
    }
}

/// Translates the crate's read options into driver options.
fn driver_find_options(options: &FindOptions) -> mongodb::options::FindOptions {
    let mut find_options = mongodb::options::FindOptions::default();
    if let Some(sort) = options.sort_fields() {
        find_options.sort = Some(sort.to_document());
    }
    if let Some(projection) = options.projection_fields() {
        find_options.projection = Some(projection.to_document());
    }
    if let Some(skip) = options.skip_count() {
        find_options.skip = Some(skip);
    }
    if let Some(limit) = options.limit_count() {
        find_options.limit = Some(limit);
    }
    if let Some(max_time) = options.max_time_limit() {
        find_options.max_time = Some(max_time);
    }
    find_options
}

impl DocumentBackend for MongoBackend {
    fn insert_one(&self, document: Document) -> StoreResult<WriteResult> {
        self.with_collection(|collection| {
            let result = collection.insert_one(document).run()?;
            Ok(WriteResult::inserted(result.inserted_id))
        })
    }

    fn find(&self, filter: Document, options: &FindOptions) -> StoreResult<Vec<Document>> {
        self.with_collection(|collection| {
            let cursor = collection
                .find(filter)
                .with_options(driver_find_options(options))
                .run()?;

            let mut documents = Vec::new();
            for document in cursor {
                documents.push(document?);
            }
            Ok(documents)
        })
    }

    fn update(
        &self,
        filter: Document,
        update: Document,
        options: &UpdateOptions,
    ) -> StoreResult<WriteResult> {
        self.with_collection(|collection| {
            let result = if options.is_many() {
                collection.update_many(filter, update).run()?
            } else {
                collection.update_one(filter, update).run()?
            };
            Ok(WriteResult::updated(result.matched_count, result.modified_count))
        })
    }

    fn delete(&self, filter: Document, options: &RemoveOptions) -> StoreResult<WriteResult> {
        self.with_collection(|collection| {
            let result = if options.is_many() {
                collection.delete_many(filter).run()?
            } else {
                collection.delete_one(filter).run()?
            };
            Ok(WriteResult::deleted(result.deleted_count))
        })
    }

    fn close(&self) -> StoreResult<()> {
        if self.handles.write().take().is_some() {
            log::info!("Closed connection to {}", self.namespace);
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.handles.read().is_none()
    }
}
