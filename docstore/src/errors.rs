use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

/// Error kinds for docstore operations.
///
/// Each kind names a category of failure so that callers of the typed
/// `try_*` operations can tell an invalid input apart from a backend fault.
///
/// # Examples
///
/// ```rust
/// use docstore::errors::{ErrorKind, StoreError, StoreResult};
///
/// fn example() -> StoreResult<()> {
///     Err(StoreError::new("filter cannot be empty", ErrorKind::ValidationError))
/// }
///
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::ValidationError);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Construction Errors
    /// The database server could not be reached or refused the handshake
    ConnectionError,
    /// A configuration value is malformed or contradictory
    InvalidConfiguration,
    /// A required configuration value is missing
    MissingRequiredField,

    // Operation Errors
    /// Malformed input to an operation (empty or non-mapping document/filter)
    ValidationError,
    /// A value could not be converted to or from BSON
    EncodingError,
    /// Failure reported by the database driver or backend during an operation
    BackendError,
    /// The client has been closed
    StoreAlreadyClosed,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConnectionError => write!(f, "Connection error"),
            ErrorKind::InvalidConfiguration => write!(f, "Invalid configuration"),
            ErrorKind::MissingRequiredField => write!(f, "Missing required field"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::StoreAlreadyClosed => write!(f, "Store already closed"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

impl ErrorKind {
    /// Returns `true` for failures caused by the caller's input rather than
    /// by the backend.
    pub fn is_validation(&self) -> bool {
        matches!(self, ErrorKind::ValidationError | ErrorKind::EncodingError)
    }
}

/// The error type of the docstore crate.
///
/// `StoreError` carries a message, an [`ErrorKind`], an optional cause and a
/// backtrace captured where the error was created.
///
/// # Examples
///
/// ```rust
/// use docstore::errors::{ErrorKind, StoreError};
///
/// let cause = StoreError::new("server selection timed out", ErrorKind::BackendError);
/// let err = StoreError::new_with_cause("MongoDB connection failed", ErrorKind::ConnectionError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct StoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StoreError>>,
    backtrace: Backtrace,
}

impl StoreError {
    /// Creates a new `StoreError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Backtrace::new(),
        }
    }

    /// Creates a new `StoreError` that wraps an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StoreError) -> Self {
        StoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Backtrace::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StoreError> {
        self.cause.as_deref()
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// `StoreResult<T>` is shorthand for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind as DriverErrorKind;

        let error_kind = match *err.kind {
            DriverErrorKind::InvalidArgument { .. } => ErrorKind::InvalidConfiguration,
            DriverErrorKind::BsonSerialization(_) | DriverErrorKind::BsonDeserialization(_) => {
                ErrorKind::EncodingError
            }
            _ => ErrorKind::BackendError,
        };
        StoreError::new(&format!("MongoDB error: {}", err), error_kind)
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::new(
            &format!("BSON encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<std::num::ParseIntError> for StoreError {
    fn from(err: std::num::ParseIntError) -> Self {
        StoreError::new(
            &format!("Integer parsing error: {}", err),
            ErrorKind::InvalidConfiguration,
        )
    }
}

impl From<String> for StoreError {
    fn from(msg: String) -> Self {
        StoreError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for StoreError {
    fn from(msg: &str) -> Self {
        StoreError::new(msg, ErrorKind::InternalError)
    }
}
