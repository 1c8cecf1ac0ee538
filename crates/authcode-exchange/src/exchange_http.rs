use authcode_core::{
    CredentialContext, ExchangeRequest, GeneralExchanger, ProviderConfig, RetryConfig,
    TokenFailure, TokenResult, TokenSuccess,
};
use oauth2::AuthorizationCode;
use reqwest::{header, StatusCode};
use std::{ops::Deref, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    detail::{excerpt, scrub},
    guard::InFlightExchange,
};

/// Exchanges authorization codes against a token endpoint over HTTP.
#[derive(Clone)]
pub struct HttpExchanger(pub(crate) Arc<InnerHttpExchanger>);

impl Deref for HttpExchanger {
    type Target = InnerHttpExchanger;

    fn deref(&self) -> &Self::Target {
        Arc::as_ref(&self.0)
    }
}

pub struct InnerHttpExchanger {
    pub(crate) client: reqwest::Client,
    pub(crate) token_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) retry: RetryConfig,
    pub(crate) cancel: CancellationToken,
}

/// Outcome of a single POST to the token endpoint.
enum Attempt {
    Finished(TokenResult),
    Transient(TokenFailure),
}

impl GeneralExchanger for HttpExchanger {
    async fn exchange(
        &self,
        code: &AuthorizationCode,
        credentials: &CredentialContext,
    ) -> TokenResult {
        let request = ExchangeRequest::new(code, credentials);
        let secret = credentials.client_secret().secret();
        let in_flight = InFlightExchange::start();

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => {
                tracing::warn!("token exchange cancelled by shutdown");
                Err(TokenFailure::network("exchange cancelled, server is shutting down"))
            }
            result = self.exchange_with_retry(&request, secret) => {
                in_flight.finish();
                result
            }
        }
    }
}

impl HttpExchanger {
    pub fn new(
        client: reqwest::Client,
        provider: &ProviderConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self(Arc::new(InnerHttpExchanger {
            client,
            token_url: provider.token_url.clone(),
            timeout: provider.timeout(),
            retry: provider.retry.clone(),
            cancel,
        }))
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    async fn exchange_with_retry(&self, request: &ExchangeRequest<'_>, secret: &str) -> TokenResult {
        let max_attempts = self.retry.max_retries.saturating_add(1);
        let mut attempt = 1;
        loop {
            match self.attempt(request, secret).await {
                Attempt::Finished(result) => {
                    if result.is_ok() {
                        tracing::info!(attempt, "token exchange succeeded");
                    }
                    return result;
                }
                Attempt::Transient(failure) if attempt < max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        kind = %failure.kind,
                        detail = %failure.detail,
                        "transient token endpoint failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Attempt::Transient(failure) => {
                    tracing::warn!(attempts = attempt, "token endpoint retry budget exhausted");
                    return Err(failure);
                }
            }
        }
    }

    async fn attempt(&self, request: &ExchangeRequest<'_>, secret: &str) -> Attempt {
        let sent = self
            .client
            .post(self.token_url.as_str())
            .header(header::ACCEPT, "application/json")
            .form(request)
            .timeout(self.timeout)
            .send()
            .await;
        let response = match sent {
            Ok(response) => response,
            Err(err) => return self.transport_failure(err),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return self.transport_failure(err),
        };

        if status.is_success() {
            return Attempt::Finished(parse_token(&body, secret));
        }

        let failure = TokenFailure::provider(format!("{status}: {}", excerpt(&body, secret)));
        if is_transient_status(status) {
            Attempt::Transient(failure)
        } else {
            tracing::debug!(%status, "token endpoint rejected the exchange");
            Attempt::Finished(Err(failure))
        }
    }

    fn transport_failure(&self, err: reqwest::Error) -> Attempt {
        if err.is_timeout() {
            Attempt::Transient(TokenFailure::network(format!(
                "token endpoint did not answer within {} ms",
                self.timeout.as_millis()
            )))
        } else if is_local_failure(&err) {
            Attempt::Finished(Err(TokenFailure::network(format!(
                "token request failed: {}",
                err.without_url()
            ))))
        } else {
            // the connection broke, the request itself was well formed
            Attempt::Transient(TokenFailure::network(format!(
                "token endpoint connection failed: {}",
                err.without_url()
            )))
        }
    }
}

fn is_local_failure(err: &reqwest::Error) -> bool {
    err.is_builder() || err.is_redirect() || err.is_decode()
}

fn is_transient_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
    )
}

fn parse_token(body: &str, secret: &str) -> TokenResult {
    match serde_json::from_str::<TokenSuccess>(body) {
        Ok(token) if token.access_token.is_empty() => {
            Err(TokenFailure::parse("token response carries an empty access_token"))
        }
        Ok(token) => Ok(token),
        Err(err) => Err(TokenFailure::parse(format!(
            "token response is not a usable token: {}",
            scrub(&err.to_string(), secret)
        ))),
    }
}
