use clap::{Args, Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub subcommand: Subcommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Subcommands {
    Run(SubcommandRun),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseModeArg {
    Json,
    Redirect,
}

#[derive(Args, Debug, Clone)]
pub struct SubcommandRun {
    #[arg(short, long = "config", env = "AUTHCODE_CONFIG_FILE")]
    pub configfile: Option<PathBuf>,

    #[arg(short, long = "log-filter", env = "AUTHCODE_LOG_FILTER")]
    pub log_filter: Option<String>,

    #[arg(long = "health-check", env = "AUTHCODE_HEALTH_CHECK")]
    pub health_check: Option<bool>,

    #[arg(long = "addr", env = "AUTHCODE_SERVER_ADDR")]
    pub addr: Option<SocketAddr>,

    #[arg(long = "callback-path", env = "AUTHCODE_CALLBACK_PATH")]
    pub callback_path: Option<String>,

    #[arg(long = "authorize-path", env = "AUTHCODE_AUTHORIZE_PATH")]
    pub authorize_path: Option<String>,

    #[arg(long = "allow-form-post", env = "AUTHCODE_ALLOW_FORM_POST")]
    pub allow_form_post: Option<bool>,

    #[arg(long = "client-id", env = "AUTHCODE_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long = "client-secret", env = "AUTHCODE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    #[arg(long = "redirect-url", env = "AUTHCODE_REDIRECT_URL")]
    pub redirect_url: Option<String>,

    #[arg(long = "token-url", env = "AUTHCODE_TOKEN_URL")]
    pub token_url: Option<Url>,

    #[arg(long = "auth-url", env = "AUTHCODE_AUTH_URL")]
    pub auth_url: Option<Url>,

    #[arg(long = "scopes", env = "AUTHCODE_SCOPES", value_delimiter = ',', num_args = 1..)]
    pub scopes: Option<Vec<String>>,

    #[arg(long = "timeout-ms", env = "AUTHCODE_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    #[arg(long = "max-retries", env = "AUTHCODE_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    #[arg(long = "response-mode", env = "AUTHCODE_RESPONSE_MODE", value_enum)]
    pub response_mode: Option<ResponseModeArg>,

    #[arg(
        long = "redirect-target",
        env = "AUTHCODE_REDIRECT_TARGET",
        required_if_eq("response_mode", "redirect")
    )]
    pub redirect_target: Option<Url>,
}
