use axum::{
    body::Body,
    response::{IntoResponse, Json},
};
use http::{Method, Response, StatusCode};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Client caused, never retried
    #[error("Bad Request: {0}")]
    BadRequest(#[from] Error400),

    // Operator caused, expected 500
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Token exchange failed: {0}")]
    Token(#[from] TokenFailure),

    #[error("Not Implemented")]
    NotImplemented,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error400 {
    #[error("missing code parameter")]
    MissingCode,

    #[error("unsupported method")]
    UnsupportedMethod(Method),

    #[error("authorization denied: {error}")]
    AuthorizationDenied {
        error: String,
        description: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("client id is not configured")]
    MissingClientId,

    #[error("client secret is not configured")]
    MissingClientSecret,

    #[error("redirect url is not configured")]
    MissingRedirectUrl,

    #[error("redirect url is invalid: {0}")]
    InvalidRedirectUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The authorization server answered with a non-2xx status.
    ProviderError,
    /// The token endpoint could not be reached or did not answer in time.
    NetworkError,
    /// The token endpoint answered 2xx with a body that is not a token.
    ParseError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::ParseError => "parse_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a failed exchange. `detail` is safe to show to the
/// caller: it never carries the client secret.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct TokenFailure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl TokenFailure {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn provider(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProviderError, detail)
    }

    pub fn network(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkError, detail)
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseError, detail)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    error_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Token(failure) => match failure.kind {
                ErrorKind::ProviderError | ErrorKind::ParseError => StatusCode::BAD_GATEWAY,
                ErrorKind::NetworkError => StatusCode::GATEWAY_TIMEOUT,
            },
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "invalid_request",
            Self::Configuration(_) => "server_misconfigured",
            Self::Token(failure) => failure.kind.as_str(),
            Self::NotImplemented => "not_implemented",
        }
    }

    fn description(&self) -> String {
        match self {
            Self::BadRequest(Error400::AuthorizationDenied {
                error,
                description: Some(description),
            }) => format!("authorization denied: {error} ({description})"),
            Self::BadRequest(e) => e.to_string(),
            Self::Configuration(e) => e.to_string(),
            Self::Token(e) => e.detail.clone(),
            Self::NotImplemented => "no handler for this path".to_string(),
        }
    }

    /// Renders the error, echoing the caller's `state` back untouched.
    pub fn to_response(&self, state: Option<&str>) -> Response<Body> {
        match self {
            Self::Configuration(e) => tracing::error!(error = %e, "rejecting request, server is misconfigured"),
            Self::Token(e) => tracing::warn!(kind = %e.kind, detail = %e.detail, "token exchange failed"),
            _ => tracing::debug!(error = %self, "rejecting request"),
        }
        let body = ErrorBody {
            error: self.error_code(),
            error_description: self.description(),
            state,
        };
        (self.status(), Json(body)).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        self.to_response(None)
    }
}
