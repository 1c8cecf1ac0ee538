use oauth2::AuthorizationCode;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::collections::HashMap;

use crate::{CredentialContext, TokenFailure};

pub type TokenResult = Result<TokenSuccess, TokenFailure>;

/// The parts of an inbound callback the classifier looks at.
#[derive(Debug, Clone)]
pub struct IncomingAuthRequest {
    pub method: http::Method,
    pub query_params: HashMap<String, String>,
}

impl IncomingAuthRequest {
    pub fn new(method: http::Method, query_params: HashMap<String, String>) -> Self {
        Self {
            method,
            query_params,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(String::as_str)
    }

    pub fn state(&self) -> Option<&str> {
        self.param("state")
    }
}

/// A validated callback, ready to be exchanged.
#[derive(Debug)]
pub struct AuthCallback {
    pub code: AuthorizationCode,
    pub state: Option<String>,
}

/// Form body of the token request (RFC 6749 §4.1.3).
///
/// Borrowed from the request's code and the process credentials, so it cannot
/// outlive the request that produced it. Field order is the wire order.
#[derive(Serialize)]
pub struct ExchangeRequest<'a> {
    grant_type: &'static str,
    code: &'a str,
    redirect_uri: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

impl<'a> ExchangeRequest<'a> {
    pub const GRANT_TYPE: &'static str = "authorization_code";

    pub fn new(code: &'a AuthorizationCode, credentials: &'a CredentialContext) -> Self {
        Self {
            grant_type: Self::GRANT_TYPE,
            code: code.secret(),
            redirect_uri: credentials.redirect_url().as_str(),
            client_id: credentials.client_id().as_str(),
            client_secret: credentials.client_secret().secret(),
        }
    }
}

impl std::fmt::Debug for ExchangeRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeRequest")
            .field("grant_type", &self.grant_type)
            .field("redirect_uri", &self.redirect_uri)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[serde_as]
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenSuccess {
    pub access_token: String,
    pub token_type: String,
    // some providers send this as a string
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl std::fmt::Debug for TokenSuccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSuccess")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
