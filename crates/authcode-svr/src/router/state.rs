use std::sync::Arc;

use authcode_core::{Config, ConfigurationError, CredentialContext, ProviderConfig, ResponseMode};

/// Everything a callback needs, shared read-only across requests.
///
/// `credentials` holds the startup verdict on the client registration: when it
/// is an error, every request is answered with that error and nothing is sent
/// to the token endpoint.
#[derive(Clone)]
pub struct AppState<E> {
    pub(crate) credentials: Result<Arc<CredentialContext>, ConfigurationError>,
    pub(crate) exchanger: E,
    pub(crate) provider: Arc<ProviderConfig>,
    pub(crate) response_mode: Arc<ResponseMode>,
    pub(crate) allow_form_post: bool,
}

impl<E> AppState<E> {
    pub fn new(
        config: &Config,
        credentials: Result<CredentialContext, ConfigurationError>,
        exchanger: E,
    ) -> Self {
        Self {
            credentials: credentials.map(Arc::new),
            exchanger,
            provider: Arc::new(config.provider.clone()),
            response_mode: Arc::new(config.response.clone()),
            allow_form_post: config.server.allow_form_post,
        }
    }

    pub(crate) fn credentials(&self) -> Result<&CredentialContext, ConfigurationError> {
        self.credentials.as_deref().map_err(Clone::clone)
    }
}
