use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,
    /// Path the callback handler is mounted on. Falls back to the path of
    /// `client.redirect_url`, then to `/callback`.
    pub callback_path: Option<String>,
    /// Path of the entry point that redirects browsers to the authorization
    /// endpoint. Only mounted when `provider.auth_url` is set.
    pub authorize_path: Option<String>,
    /// Accept `response_mode=form_post` callbacks (POST with a form body).
    #[serde(default)]
    pub allow_form_post: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            callback_path: None,
            authorize_path: None,
            allow_form_post: false,
        }
    }
}

pub const DEFAULT_CALLBACK_PATH: &str = "/callback";
pub const DEFAULT_AUTHORIZE_PATH: &str = "/";

fn default_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 9090)
}
