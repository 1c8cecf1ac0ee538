use authcode_core::{classify, Error, GeneralExchanger, IncomingAuthRequest, TokenSuccess};
use axum::{extract::State, response::Response};

use crate::{response, utils::CallbackRequest};

use super::AppState;

pub async fn handler<E>(
    State(state): State<AppState<E>>,
    CallbackRequest(request): CallbackRequest,
) -> Response
where
    E: GeneralExchanger + Clone + Send + Sync + 'static,
{
    let outcome = exchange(&state, &request).await;
    response::build(outcome, request.state(), &state.response_mode)
}

async fn exchange<E>(state: &AppState<E>, request: &IncomingAuthRequest) -> Result<TokenSuccess, Error>
where
    E: GeneralExchanger,
{
    let credentials = state.credentials()?;
    let callback = classify(request, state.allow_form_post)?;
    tracing::debug!(has_state = callback.state.is_some(), "exchanging authorization code");
    let token = state.exchanger.exchange(&callback.code, credentials).await?;
    Ok(token)
}
