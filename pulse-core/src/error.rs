/// Top-level Pulse error type.
///
/// All fallible operations in `pulse-core` return [`Result<T, PulseError>`](Result).
/// Each variant wraps a domain-specific error enum, allowing callers to
/// match on the error source without losing type information. Only
/// `Config`, `Auth`, and `Write` errors are fatal to a run; `Fetch`
/// errors are caught at the per-repository boundary inside collection.
#[derive(thiserror::Error, Debug)]
pub enum PulseError {
    /// A required configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential retrieval or token extraction failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A repository's data could not be fully fetched from the hosting API.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Error from an object-store or secret-store backend.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The final batch could not be serialized or uploaded.
    #[error("Write error: {0}")]
    Write(#[from] WriteError),
}

/// Errors in Pulse configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required setting was not supplied.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    /// A setting is present but semantically invalid.
    #[error("Invalid setting {name}: {message}")]
    Invalid {
        /// Name of the offending setting.
        name: &'static str,
        /// Description of why it is invalid.
        message: String,
    },
}

/// Errors during credential retrieval.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// The secret store returned no value for the configured identifier.
    #[error("Secret {id} could not be read: {source}")]
    Secret {
        /// The secret identifier that was requested.
        id: String,
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },

    /// The secret payload is not a JSON object.
    #[error("Secret {id} is not a JSON object")]
    MalformedSecret {
        /// The secret identifier that was requested.
        id: String,
    },

    /// The payload is missing the expected token field, or it is empty.
    #[error("Secret {id} has no usable `{field}` field")]
    MissingToken {
        /// The secret identifier that was requested.
        id: String,
        /// Name of the expected token field.
        field: &'static str,
    },
}

/// Errors fetching one repository's data from the hosting API.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    /// The API returned a non-success HTTP status.
    #[error("GitHub API {status} for {url}: {body}")]
    Api {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Network-level failure issuing the request.
    #[error("Network error for {url}: {source}")]
    Network {
        /// Request URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("Could not decode response from {url}: {source}")]
    Decode {
        /// Request URL.
        url: String,
        /// Underlying decode error.
        #[source]
        source: reqwest::Error,
    },
}

/// Errors from object-store and secret-store backends.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The requested object or secret does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Filesystem I/O failure in a local backend.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Errors writing the final insight batch. Fatal to the run.
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// The destination bucket identifier is unset.
    #[error("Destination bucket is not configured")]
    BucketNotConfigured,

    /// Arrow column construction failed.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// Parquet serialization failed.
    #[error("Parquet encode error: {0}")]
    Encode(#[from] parquet::errors::ParquetError),

    /// The upload to object storage failed.
    #[error("Upload failed: {0}")]
    Upload(#[source] StoreError),
}

/// Convenience alias for `Result<T, PulseError>`.
pub type Result<T> = std::result::Result<T, PulseError>;
