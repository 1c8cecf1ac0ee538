use anyhow::{Context, Result};
use authcode_core::{Config, CredentialContext};
use authcode_exchange::HttpExchanger;
use authcode_svr::{router, AppState};
use figment::{
    providers::{Format, Json as FigmentJson, Serialized},
    Figment,
};
use serde_json::json;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::utils::clean_json;

use super::command::{ResponseModeArg, SubcommandRun};

pub async fn run(cli: &SubcommandRun) -> Result<()> {
    let configfile = cli.configfile.clone().map(FigmentJson::file);
    let config: Config = Figment::new()
        .merge(configfile.unwrap_or(FigmentJson::string("{}")))
        .merge(figment_merge(cli)?)
        .extract()
        .context("Failed to load configuration")?;

    let env_filter = config
        .application
        .log_filter
        .as_deref()
        .unwrap_or("info")
        .parse::<EnvFilter>()
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(env_filter)
        .init();
    tracing::info!("{}", serde_json::to_string_pretty(&config)?);

    // a broken client registration would fail every callback, refuse to start instead
    let credentials = CredentialContext::from_config(&config.client).inspect_err(|err| {
        tracing::error!(error = %err, "client registration is incomplete");
    })?;

    let http = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .context("Failed to build http client")?;
    let cancel = CancellationToken::new();
    let exchanger = HttpExchanger::new(http, &config.provider, cancel.clone());
    tracing::info!(token_url = %exchanger.token_url(), "token endpoint configured");

    let app = router(&config, AppState::new(&config, Ok(credentials), exchanger));

    tracing::info!("Server started at: {}", config.server.addr);
    let listener = tokio::net::TcpListener::bind(config.server.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down...");
    cancel.cancel();
}

fn figment_merge(cli: &SubcommandRun) -> Result<Serialized<figment::value::Value>> {
    let response = match cli.response_mode {
        Some(ResponseModeArg::Json) => json!({ "mode": "json" }),
        Some(ResponseModeArg::Redirect) => json!({
            "mode": "redirect",
            "target": cli.redirect_target,
        }),
        None => json!(null),
    };

    let result = json!({
        "application": {
            "log_filter": cli.log_filter,
            "health_check": cli.health_check,
        },
        "server": {
            "addr": cli.addr,
            "callback_path": cli.callback_path,
            "authorize_path": cli.authorize_path,
            "allow_form_post": cli.allow_form_post,
        },
        "client": {
            "id": cli.client_id,
            "secret": cli.client_secret,
            "redirect_url": cli.redirect_url,
        },
        "provider": {
            "token_url": cli.token_url,
            "auth_url": cli.auth_url,
            "scopes": cli.scopes,
            "timeout_ms": cli.timeout_ms,
            "retry": {
                "max_retries": cli.max_retries,
            },
        },
        "response": response,
    });

    let figment_value: figment::value::Value = serde_json::from_value(clean_json(result))
        .context("Failed to convert command line overrides")?;
    Ok(Serialized::from(figment_value, figment::Profile::Default))
}
