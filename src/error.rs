use http::status::StatusCode;

use std::error::Error;

///
/// Error raised before any I/O when the caller's configuration cannot support the
/// requested operation.
///
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A required parameter was configured with an empty value.
    #[error("empty {0}")]
    Empty(&'static str),
    /// A parameter required by the requested operation was never configured.
    #[error("missing {0}")]
    Missing(&'static str),
    /// The authorization request carried no scopes.
    #[error("at least one scope must be requested")]
    MissingScopes,
}

///
/// Error encountered while exchanging an authorization code for an access token.
///
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TokenExchangeError<RE>
where
    RE: Error + 'static,
{
    /// The exchange could not be attempted with the configured client.
    #[error("invalid client configuration")]
    Configuration(#[from] ConfigurationError),
    /// The token endpoint answered outside the provider's 200-209 success band. The
    /// raw response body is retained for diagnostics.
    #[error("server returned error status {status}")]
    ServerResponse {
        /// Response status code.
        status: StatusCode,
        /// Raw response body.
        body: Vec<u8>,
    },
    /// An error occurred while sending the request or receiving the response (e.g.,
    /// network connectivity failed).
    #[error("request failed")]
    Request(#[source] RE),
    /// Failed to parse the token endpoint's response body.
    #[error("failed to parse server response")]
    Parse(
        #[source] serde_path_to_error::Error<serde_json::error::Error>,
        Vec<u8>,
    ),
    /// The caller-supplied delegated-exchange parser rejected the server's response.
    #[error("delegated exchange failed")]
    Delegated(#[source] Box<dyn Error + Send + Sync + 'static>),
    /// Some other type of error occurred (e.g., an unexpected server response).
    #[error("other error: {}", _0)]
    Other(String),
}

///
/// Error encountered while fetching a profile, email address, or display image.
///
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProfileFetchError<RE>
where
    RE: Error + 'static,
{
    /// The endpoint answered outside the provider's 200-209 success band. The raw
    /// response body is retained for diagnostics.
    #[error("server returned error status {status}")]
    ServerResponse {
        /// Response status code.
        status: StatusCode,
        /// Raw response body.
        body: Vec<u8>,
    },
    /// An error occurred while sending the request or receiving the response (e.g.,
    /// network connectivity failed).
    #[error("request failed")]
    Request(#[source] RE),
    /// Failed to parse the endpoint's response body.
    #[error("failed to parse server response")]
    Parse(
        #[source] serde_path_to_error::Error<serde_json::error::Error>,
        Vec<u8>,
    ),
    /// An element path the projection should have produced was absent from the
    /// response. LinkedIn answers a fetch made with an insufficient scope this way
    /// rather than with a distinguishable permission error.
    #[error("expected element path absent from response: {0}")]
    MissingField(&'static str),
    /// Some other type of error occurred (e.g., an unexpected server response).
    #[error("other error: {}", _0)]
    Other(String),
}

///
/// Terminal failure reported by the redirect interceptor.
///
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RedirectError {
    /// The redirect's `state` parameter did not match the one generated for the
    /// pending authorization request.
    #[error("state parameter does not match the pending authorization request")]
    StateMismatch,
    /// The provider reported an error on the redirect (e.g., the member denied the
    /// authorization request).
    #[error("{error}: {description}")]
    Provider {
        /// The provider's `error` parameter.
        error: String,
        /// The provider's `error_description` parameter, or empty when absent.
        description: String,
    },
    /// The intercepted redirect carried neither a code nor an error.
    #[error("redirect carried neither a code nor an error")]
    MissingCode,
}

///
/// Error type returned by failed HTTP clients.
///
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HttpClientError<E>
where
    E: Error + 'static,
{
    /// Error returned by the underlying HTTP client.
    #[error("request failed")]
    Client(#[from] Box<E>),
    /// Non-client HTTP error.
    #[error("HTTP error")]
    Http(#[from] http::Error),
    /// I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// Other error.
    #[error("Other error: {}", _0)]
    Other(String),
}

// Response-side failures shared by every endpoint; each public error type absorbs
// them via From so request plumbing can use `?`.
#[derive(Debug)]
pub(crate) enum ResponseError {
    ServerResponse {
        status: StatusCode,
        body: Vec<u8>,
    },
    Parse(
        serde_path_to_error::Error<serde_json::error::Error>,
        Vec<u8>,
    ),
    Other(String),
}

impl<RE> From<ResponseError> for TokenExchangeError<RE>
where
    RE: Error + 'static,
{
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::ServerResponse { status, body } => {
                TokenExchangeError::ServerResponse { status, body }
            }
            ResponseError::Parse(source, body) => TokenExchangeError::Parse(source, body),
            ResponseError::Other(msg) => TokenExchangeError::Other(msg),
        }
    }
}

impl<RE> From<ResponseError> for ProfileFetchError<RE>
where
    RE: Error + 'static,
{
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::ServerResponse { status, body } => {
                ProfileFetchError::ServerResponse { status, body }
            }
            ResponseError::Parse(source, body) => ProfileFetchError::Parse(source, body),
            ResponseError::Other(msg) => ProfileFetchError::Other(msg),
        }
    }
}
