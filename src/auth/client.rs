use reqwest::RequestBuilder;

use crate::auth::error::TokenError;
use crate::auth::provider::TokenProvider;

/// Request-signing wrapper around the token provider.
///
/// `authorize` is a plain transformation: request in, request with an
/// `Authorization: Bearer <token>` header out. Token refresh stays
/// transparent to every downstream call made through it.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    provider: TokenProvider,
}

impl AuthenticatedClient {
    pub fn new(provider: TokenProvider) -> Self {
        Self { provider }
    }

    /// Attach a valid bearer token to the request.
    pub async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, TokenError> {
        let access_token = self.provider.get_access_token().await?;
        Ok(request.bearer_auth(access_token))
    }
}
