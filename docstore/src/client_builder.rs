use crate::client_config::ClientConfig;
use crate::collection::{DocumentStoreClient, ErrorListener};
use crate::errors::{StoreError, StoreResult};
use crate::store::{DocumentBackend, MongoBackend};
use std::time::Duration;

/// Builder for opening a [`DocumentStoreClient`].
///
/// Every setter validates its input. The first invalid value is captured and
/// returned by [`open`](Self::open), so the chain itself never fails.
///
/// # Examples
///
/// ```rust,ignore
/// use docstore::collection::DocumentStoreClient;
///
/// let client = DocumentStoreClient::builder()
///     .credentials("svc", "secret")
///     .host("db.internal")
///     .port(27017)
///     .database("shelter")
///     .collection("animals")
///     .open()?;
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    error: Option<StoreError>,
    config: ClientConfig,
    listeners: Vec<ErrorListener>,
}

impl ClientBuilder {
    /// Creates a builder with default timeouts and no connection settings.
    pub fn new() -> Self {
        ClientBuilder {
            error: None,
            config: ClientConfig::new(),
            listeners: Vec::new(),
        }
    }

    /// Starts from an existing configuration, e.g. one read by
    /// [`ClientConfig::from_env`].
    pub fn from_config(config: ClientConfig) -> Self {
        ClientBuilder {
            error: None,
            config,
            listeners: Vec::new(),
        }
    }

    fn apply(mut self, setter: impl FnOnce(&mut ClientConfig) -> StoreResult<()>) -> Self {
        if self.error.is_none() {
            if let Err(e) = setter(&mut self.config) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Uses a full connection string; the individual connection fields are
    /// then ignored.
    pub fn uri(self, uri: &str) -> Self {
        self.apply(|config| config.set_uri(uri))
    }

    pub fn credentials(self, user: &str, password: &str) -> Self {
        self.apply(|config| config.set_credentials(user, password))
    }

    pub fn user(self, user: &str) -> Self {
        self.apply(|config| config.set_user(user))
    }

    pub fn password(self, password: &str) -> Self {
        self.apply(|config| config.set_password(password))
    }

    pub fn host(self, host: &str) -> Self {
        self.apply(|config| config.set_host(host))
    }

    pub fn port(self, port: u16) -> Self {
        self.apply(|config| config.set_port(port))
    }

    pub fn database(self, database: &str) -> Self {
        self.apply(|config| config.set_database(database))
    }

    pub fn collection(self, collection: &str) -> Self {
        self.apply(|config| config.set_collection(collection))
    }

    pub fn connect_timeout(self, timeout: Duration) -> Self {
        self.apply(|config| config.set_connect_timeout(timeout))
    }

    pub fn socket_timeout(self, timeout: Duration) -> Self {
        self.apply(|config| config.set_socket_timeout(timeout))
    }

    pub fn server_selection_timeout(self, timeout: Duration) -> Self {
        self.apply(|config| config.set_server_selection_timeout(timeout))
    }

    /// Adds an option to the connection string query (`appName`,
    /// `maxPoolSize`, ...).
    pub fn driver_option(self, key: &str, value: &str) -> Self {
        self.apply(|config| config.set_driver_option(key, value))
    }

    pub fn add_error_listener(mut self, listener: ErrorListener) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Connects to the configured server and binds the collection.
    ///
    /// # Errors
    ///
    /// - the first error captured by a setter
    /// - `MissingRequiredField` when the database or collection is unset
    /// - `InvalidConfiguration` for incomplete credentials, a bad
    ///   `MONGO_HOST` or a bad `MONGO_PORT`
    /// - `ConnectionError` when the server cannot be reached
    pub fn open(self) -> StoreResult<DocumentStoreClient> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let backend = MongoBackend::connect(&self.config)?;
        self.finish(Box::new(backend))
    }

    /// Binds the configured namespace to an already constructed backend
    /// instead of connecting to a server.
    pub fn open_with_backend<B: DocumentBackend + 'static>(
        self,
        backend: B,
    ) -> StoreResult<DocumentStoreClient> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.finish(Box::new(backend))
    }

    fn finish(self, backend: Box<dyn DocumentBackend>) -> StoreResult<DocumentStoreClient> {
        let database = self.config.require_database()?;
        let collection = self.config.require_collection()?;
        Ok(DocumentStoreClient::new(
            backend,
            database,
            collection,
            self.config.socket_timeout(),
            self.listeners,
        ))
    }
}
