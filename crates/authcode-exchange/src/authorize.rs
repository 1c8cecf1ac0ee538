use authcode_core::CredentialContext;
use oauth2::{basic::BasicClient, AuthUrl, CsrfToken, Scope};
use url::Url;

/// Builds the URL a browser is sent to in order to start the flow.
///
/// When the caller supplies `state` it is used verbatim, otherwise a random
/// CSRF token is generated. Either way the value is returned so the caller can
/// keep it; nothing is stored here.
pub fn authorize_url(
    credentials: &CredentialContext,
    auth_url: &Url,
    scopes: &[String],
    state: Option<String>,
) -> (Url, CsrfToken) {
    BasicClient::new(credentials.client_id().clone())
        .set_auth_uri(AuthUrl::from_url(auth_url.clone()))
        .set_redirect_uri(credentials.redirect_url().clone())
        .authorize_url(move || state.map(CsrfToken::new).unwrap_or_else(CsrfToken::new_random))
        .add_scopes(scopes.iter().cloned().map(Scope::new))
        .url()
}
