use authcode_core::{Error, ResponseMode, TokenSuccess};
use axum::response::{IntoResponse, Json, Response};
use http::{header, StatusCode};
use serde::Serialize;
use url::Url;

#[derive(Serialize)]
struct SuccessBody<'a> {
    #[serde(flatten)]
    token: &'a TokenSuccess,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
}

/// Turns the outcome of one callback into the response sent back to the
/// browser. `state` is echoed on success and failure alike.
pub fn build(outcome: Result<TokenSuccess, Error>, state: Option<&str>, mode: &ResponseMode) -> Response {
    match outcome {
        Ok(token) => success(&token, state, mode),
        Err(err) => err.to_response(state),
    }
}

fn success(token: &TokenSuccess, state: Option<&str>, mode: &ResponseMode) -> Response {
    match mode {
        ResponseMode::Json => (
            [
                (header::CACHE_CONTROL, "no-store"),
                (header::PRAGMA, "no-cache"),
            ],
            Json(SuccessBody { token, state }),
        )
            .into_response(),
        ResponseMode::Redirect { target } => {
            let location = fragment_location(target, token, state);
            (
                StatusCode::FOUND,
                [
                    (header::LOCATION, location.as_str()),
                    (header::CACHE_CONTROL, "no-store"),
                ],
            )
                .into_response()
        }
    }
}

// the refresh token stays out of browser-visible URLs
fn fragment_location(target: &Url, token: &TokenSuccess, state: Option<&str>) -> Url {
    let mut fragment = form_urlencoded::Serializer::new(String::new());
    fragment.append_pair("access_token", &token.access_token);
    fragment.append_pair("token_type", &token.token_type);
    if let Some(expires_in) = token.expires_in {
        fragment.append_pair("expires_in", &expires_in.to_string());
    }
    if let Some(scope) = &token.scope {
        fragment.append_pair("scope", scope);
    }
    if let Some(state) = state {
        fragment.append_pair("state", state);
    }

    let mut location = target.clone();
    location.set_fragment(Some(&fragment.finish()));
    location
}
