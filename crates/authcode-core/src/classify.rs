use http::Method;
use oauth2::AuthorizationCode;

use crate::{AuthCallback, Error400, IncomingAuthRequest};

/// Decides whether an inbound callback carries something worth exchanging.
///
/// `state` is handed through untouched; validating it is the job of whoever
/// started the authorization request.
pub fn classify(
    request: &IncomingAuthRequest,
    allow_form_post: bool,
) -> Result<AuthCallback, Error400> {
    let method_allowed =
        request.method == Method::GET || (allow_form_post && request.method == Method::POST);
    if !method_allowed {
        return Err(Error400::UnsupportedMethod(request.method.clone()));
    }

    if let Some(error) = request.param("error").filter(|e| !e.is_empty()) {
        return Err(Error400::AuthorizationDenied {
            error: error.to_string(),
            description: request.param("error_description").map(str::to_string),
        });
    }

    let code = request
        .param("code")
        .filter(|code| !code.is_empty())
        .ok_or(Error400::MissingCode)?;

    Ok(AuthCallback {
        code: AuthorizationCode::new(code.to_string()),
        state: request.state().map(str::to_string),
    })
}
