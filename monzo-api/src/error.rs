use reqwest::StatusCode;

/// Convenience alias for results returned by this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the [`Client`](crate::Client) and the builders that
/// feed it
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be constructed from the given inputs
    #[error("failed to construct request: {0}")]
    Construction(String),

    /// The request could not be delivered, or the response could not be read
    #[error("transport error")]
    Transport(#[from] reqwest::Error),

    /// The API answered with something other than `200 OK`
    #[error("request failed with status {status}: {body}")]
    Status {
        /// The status code returned by the API
        status: StatusCode,

        /// The raw response body, verbatim
        body: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A payload failed validation before it was sent
    #[error("validation failed: {0}")]
    Validation(String),

    /// The operation is not allowed in the current state
    #[error("invalid operation: {0}")]
    Logic(String),

    /// A resource looked up by id is not present in the listing
    #[error("no {kind} found with id {id}")]
    NotFound {
        /// The kind of resource, eg. "account"
        kind: &'static str,

        /// The id that was searched for
        id: String,
    },

    /// The call was cancelled before the API responded
    #[error("request cancelled")]
    Cancelled,
}

/// Errors raised while unwrapping a response
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body is not a JSON object
    #[error("response is not a JSON object")]
    Malformed(#[source] serde_json::Error),

    /// The body is a JSON object, but the envelope key is absent
    #[error("response has no '{0}' key")]
    MissingKey(String),

    /// The payload does not match the expected shape
    #[error("unexpected response shape")]
    Shape(#[source] serde_json::Error),
}
