use crate::errors::StoreError;
use chrono::{DateTime, Utc};
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// The client operation during which a failure was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Read => write!(f, "read"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Delete => write!(f, "delete"),
        }
    }
}

/// A failure that a simple client operation turned into its no-op result.
///
/// The simple `create`/`read`/`update`/`delete` calls report failures only
/// as `false`, `0` or an empty list. Each such failure is also published as
/// a `StoreErrorEvent` to the listeners registered on the client, so callers
/// that care can still see why an operation did nothing.
///
/// # Usage
///
/// ```ignore
/// let client = DocumentStoreClient::builder()
///     .add_error_listener(ErrorListener::new(|event: StoreErrorEvent| {
///         eprintln!("{} on {} failed: {}", event.operation(), event.namespace(), event.error());
///     }))
///     .open()?;
/// ```
#[derive(Clone)]
pub struct StoreErrorEvent {
    inner: Arc<StoreErrorEventInner>,
}

struct StoreErrorEventInner {
    operation: OperationKind,
    namespace: String,
    error: StoreError,
    timestamp: DateTime<Utc>,
}

impl StoreErrorEvent {
    pub fn new(operation: OperationKind, namespace: String, error: StoreError) -> Self {
        StoreErrorEvent {
            inner: Arc::new(StoreErrorEventInner {
                operation,
                namespace,
                error,
                timestamp: Utc::now(),
            }),
        }
    }

    pub fn operation(&self) -> OperationKind {
        self.inner.operation
    }

    /// The `database.collection` the client is bound to.
    pub fn namespace(&self) -> &str {
        &self.inner.namespace
    }

    pub fn error(&self) -> &StoreError {
        &self.inner.error
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.inner.timestamp
    }
}

impl Debug for StoreErrorEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreErrorEvent")
            .field("operation", &self.operation())
            .field("namespace", &self.namespace())
            .field("kind", self.error().kind())
            .field("message", &self.error().message())
            .field("timestamp", &self.timestamp())
            .finish()
    }
}

/// Closure signature for error listeners.
///
/// Any `Send + Sync` closure taking a `StoreErrorEvent` implements it.
pub trait ErrorCallback: Send + Sync + Fn(StoreErrorEvent) {}

impl<F> ErrorCallback for F where F: Send + Sync + Fn(StoreErrorEvent) {}

/// Receives the failures absorbed by a client.
///
/// Listeners run synchronously on the calling thread, after the failure has
/// been logged and before the operation returns its no-op value.
#[derive(Clone)]
pub struct ErrorListener {
    on_error: Arc<dyn ErrorCallback>,
}

impl ErrorListener {
    pub fn new(on_error: impl ErrorCallback + 'static) -> Self {
        ErrorListener {
            on_error: Arc::new(on_error),
        }
    }

    pub(crate) fn notify(&self, event: StoreErrorEvent) {
        (self.on_error)(event)
    }
}

impl Debug for ErrorListener {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorListener").finish()
    }
}
