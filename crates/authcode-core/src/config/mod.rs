pub mod application;
pub mod client;
pub mod provider;
pub mod response;
pub mod server;

use serde::{Deserialize, Serialize};
use url::Url;

pub use application::ApplicationConfig;
pub use client::ClientConfig;
pub use provider::{ProviderConfig, RetryConfig};
pub use response::ResponseMode;
pub use server::{ServerConfig, DEFAULT_AUTHORIZE_PATH, DEFAULT_CALLBACK_PATH};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub application: ApplicationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub response: ResponseMode,
}

impl Config {
    pub fn callback_path(&self) -> String {
        if let Some(path) = self.server.callback_path.as_ref().filter(|p| !p.is_empty()) {
            return path.clone();
        }
        self.client
            .redirect_url
            .as_deref()
            .and_then(|raw| Url::parse(raw).ok())
            .map(|url| url.path().to_string())
            .filter(|path| !path.is_empty() && path != "/")
            .unwrap_or_else(|| DEFAULT_CALLBACK_PATH.to_string())
    }

    pub fn authorize_path(&self) -> String {
        self.server
            .authorize_path
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHORIZE_PATH.to_string())
    }
}
