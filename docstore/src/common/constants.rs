use std::time::Duration;

// doc constants
pub const DOC_ID: &str = "_id";
pub const SET_OPERATOR: &str = "$set";

// environment constants
pub const ENV_HOST: &str = "MONGO_HOST";
pub const ENV_PORT: &str = "MONGO_PORT";
pub const ENV_URI: &str = "MONGO_URI";
pub const ENV_USER: &str = "MONGO_USER";
pub const ENV_PASSWORD: &str = "MONGO_PASSWORD";
pub const ENV_DATABASE: &str = "MONGO_DATABASE";
pub const ENV_COLLECTION: &str = "MONGO_COLLECTION";

// connection constants
pub const URI_SCHEME: &str = "mongodb";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 27017;
pub const DEFAULT_AUTH_SOURCE: &str = "admin";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_millis(5000);

// uri option keys
pub const OPT_AUTH_SOURCE: &str = "authSource";
pub const OPT_DIRECT_CONNECTION: &str = "directConnection";
pub const OPT_RETRY_WRITES: &str = "retryWrites";
pub const OPT_CONNECT_TIMEOUT: &str = "connectTimeoutMS";
pub const OPT_SERVER_SELECTION_TIMEOUT: &str = "serverSelectionTimeoutMS";
pub const OPT_SOCKET_TIMEOUT: &str = "socketTimeoutMS";
