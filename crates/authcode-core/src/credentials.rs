use oauth2::{ClientId, ClientSecret, RedirectUrl};

use crate::{ClientConfig, ConfigurationError};

/// The confidential client this process acts as.
///
/// Built once at startup and shared read-only by every request; there is no
/// way to mutate it after construction.
#[derive(Debug, Clone)]
pub struct CredentialContext {
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
}

impl CredentialContext {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let client_id = non_blank(client_id.into()).ok_or(ConfigurationError::MissingClientId)?;
        let client_secret =
            non_blank(client_secret.into()).ok_or(ConfigurationError::MissingClientSecret)?;
        let redirect_url =
            non_blank(redirect_url.into()).ok_or(ConfigurationError::MissingRedirectUrl)?;
        let redirect_url = RedirectUrl::new(redirect_url)
            .map_err(|err| ConfigurationError::InvalidRedirectUrl(err.to_string()))?;

        Ok(Self {
            client_id: ClientId::new(client_id),
            client_secret: ClientSecret::new(client_secret),
            redirect_url,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigurationError> {
        Self::new(
            config.id.clone().unwrap_or_default(),
            config
                .secret
                .as_ref()
                .map(|secret| secret.expose_secret().to_string())
                .unwrap_or_default(),
            config.redirect_url.clone().unwrap_or_default(),
        )
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    pub fn redirect_url(&self) -> &RedirectUrl {
        &self.redirect_url
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
