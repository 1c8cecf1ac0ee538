use authcode_core::{
    CredentialContext, ErrorKind, GeneralExchanger, ProviderConfig, RetryConfig,
};
use authcode_exchange::HttpExchanger;
use oauth2::AuthorizationCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::{
    matchers::{body_string, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const EXPECTED_BODY: &str = "grant_type=authorization_code&code=abc123&redirect_uri=https%3A%2F%2Fapp%2Fcallback&client_id=cid&client_secret=csecret";

fn credentials() -> CredentialContext {
    CredentialContext::new("cid", "csecret", "https://app/callback").unwrap()
}

fn code() -> AuthorizationCode {
    AuthorizationCode::new("abc123".to_string())
}

fn provider(token_url: Url) -> ProviderConfig {
    ProviderConfig {
        token_url,
        auth_url: None,
        scopes: vec![],
        timeout_ms: 300,
        retry: RetryConfig {
            max_retries: 2,
            initial_backoff_ms: 10,
            multiplier: 3,
        },
    }
}

async fn exchanger(server: &MockServer) -> HttpExchanger {
    let token_url = Url::parse(&format!("{}/token", server.uri())).unwrap();
    HttpExchanger::new(
        reqwest::Client::new(),
        &provider(token_url),
        CancellationToken::new(),
    )
}

#[tokio::test]
async fn posts_form_encoded_grant_and_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("accept", "application/json"))
        .and(body_string(EXPECTED_BODY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok1",
            "token_type": "bearer",
            "expires_in": 3600,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap();

    assert_eq!(token.access_token, "tok1");
    assert_eq!(token.token_type, "bearer");
    assert_eq!(token.expires_in, Some(3600));
}

#[tokio::test]
async fn invalid_grant_is_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .expect(1)
        .mount(&server)
        .await;

    let failure = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(failure.kind, ErrorKind::ProviderError);
    assert!(failure.detail.starts_with("400 Bad Request"), "{}", failure.detail);
    assert!(failure.detail.contains("invalid_grant"));
}

#[tokio::test]
async fn unauthorized_and_forbidden_are_never_retried() {
    for status in [401u16, 403] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(status).set_body_string("invalid_client"))
            .expect(1)
            .mount(&server)
            .await;

        let failure = exchanger(&server)
            .await
            .exchange(&code(), &credentials())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::ProviderError);
        server.verify().await;
    }
}

#[tokio::test]
async fn gateway_errors_use_the_whole_retry_budget() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let failure = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap_err();

    assert_eq!(failure.kind, ErrorKind::ProviderError);
    assert!(failure.detail.starts_with("503"));
}

#[tokio::test]
async fn bad_gateway_then_success_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok1", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap();
    assert_eq!(token.access_token, "tok1");
}

#[tokio::test]
async fn two_timeouts_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string(EXPECTED_BODY))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "tok1", "token_type": "bearer"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap();
    assert_eq!(token.access_token, "tok1");
}

#[tokio::test]
async fn persistent_timeouts_surface_as_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .expect(3)
        .mount(&server)
        .await;

    let failure = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap_err();
    assert_eq!(failure.kind, ErrorKind::NetworkError);
}

#[tokio::test]
async fn non_json_success_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let failure = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap_err();
    assert_eq!(failure.kind, ErrorKind::ParseError);
}

#[tokio::test]
async fn success_without_access_token_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": "bad_verification_code"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let failure = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap_err();
    assert_eq!(failure.kind, ErrorKind::ParseError);
}

#[tokio::test]
async fn echoed_secret_never_reaches_the_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string("client_secret csecret is not valid"),
        )
        .mount(&server)
        .await;

    let failure = exchanger(&server)
        .await
        .exchange(&code(), &credentials())
        .await
        .unwrap_err();
    assert!(!failure.detail.contains("csecret"));
    assert!(failure.detail.contains("[REDACTED]"));
}

#[tokio::test]
async fn zero_retry_budget_means_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(504))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = provider(Url::parse(&format!("{}/token", server.uri())).unwrap());
    config.retry.max_retries = 0;
    let exchanger = HttpExchanger::new(reqwest::Client::new(), &config, CancellationToken::new());

    let failure = exchanger.exchange(&code(), &credentials()).await.unwrap_err();
    assert_eq!(failure.kind, ErrorKind::ProviderError);
}

#[tokio::test]
async fn unreachable_endpoint_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let token_url = Url::parse(&format!("http://{addr}/token")).unwrap();
    let exchanger = HttpExchanger::new(
        reqwest::Client::new(),
        &provider(token_url),
        CancellationToken::new(),
    );

    let failure = exchanger.exchange(&code(), &credentials()).await.unwrap_err();
    assert_eq!(failure.kind, ErrorKind::NetworkError);
}

#[tokio::test]
async fn shutdown_cancels_in_flight_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let token_url = Url::parse(&format!("{}/token", server.uri())).unwrap();
    let mut config = provider(token_url);
    config.timeout_ms = 10_000;
    let cancel = CancellationToken::new();
    let exchanger = HttpExchanger::new(reqwest::Client::new(), &config, cancel.clone());

    let started = Instant::now();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
    });
    let failure = exchanger.exchange(&code(), &credentials()).await.unwrap_err();

    assert_eq!(failure.kind, ErrorKind::NetworkError);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn dropped_connections_use_the_retry_budget() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let connections = Arc::new(AtomicUsize::new(0));
    let accepted = connections.clone();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            accepted.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            drop(socket);
        }
    });

    let token_url = Url::parse(&format!("http://{addr}/token")).unwrap();
    let exchanger = HttpExchanger::new(
        reqwest::Client::new(),
        &provider(token_url),
        CancellationToken::new(),
    );

    let failure = exchanger.exchange(&code(), &credentials()).await.unwrap_err();
    assert_eq!(failure.kind, ErrorKind::NetworkError);
    assert_eq!(connections.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn dropping_the_exchange_aborts_the_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&server)
        .await;

    let token_url = Url::parse(&format!("{}/token", server.uri())).unwrap();
    let mut config = provider(token_url);
    config.timeout_ms = 10_000;
    let exchanger = HttpExchanger::new(reqwest::Client::new(), &config, CancellationToken::new());

    let started = Instant::now();
    let outcome = tokio::time::timeout(
        Duration::from_millis(200),
        exchanger.exchange(&code(), &credentials()),
    )
    .await;

    assert!(outcome.is_err());
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
