use authcode_core::Error;
use authcode_exchange::authorize_url;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct Params {
    state: Option<String>,
}

pub async fn handler<E>(
    State(state): State<AppState<E>>,
    Query(query): Query<Params>,
) -> Result<impl IntoResponse, Error>
where
    E: Clone + Send + Sync + 'static,
{
    let credentials = state.credentials()?;
    let Some(auth_url) = state.provider.auth_url.as_ref() else {
        return Err(Error::NotImplemented);
    };

    let (auth_url, _csrf_token) =
        authorize_url(credentials, auth_url, &state.provider.scopes, query.state);

    Ok(Redirect::temporary(auth_url.as_str()))
}
