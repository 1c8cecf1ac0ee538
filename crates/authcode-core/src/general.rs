use crate::{CredentialContext, TokenResult};
use oauth2::AuthorizationCode;
use std::future::Future;

pub trait GeneralExchanger {
    /// Trades `code` for a token. Implementations perform at most one logical
    /// exchange per call and never retry a terminal failure.
    fn exchange(
        &self,
        code: &AuthorizationCode,
        credentials: &CredentialContext,
    ) -> impl Future<Output = TokenResult> + Send;
}
