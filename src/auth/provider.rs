use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::auth::error::TokenError;
use crate::cache::token_cache::{CachedToken, TokenCache};
use crate::config::credential::{CredentialConfig, GraphConfig};
use crate::helpers::time::now_u64;
use crate::observability::metrics::get_metrics;
use crate::utils::constants::{
    ACCESS_TOKEN_CACHE_PREFIX, TENANT_PLACEHOLDER, TOKEN_SAFETY_MARGIN_SECS,
};

/// Wire format of the token endpoint's success body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Read-through provider for client-credential access tokens.
///
/// Refresh is reactive: nothing runs in the background, the next caller
/// after expiry pays for the fetch. The cache is an injected handle, so
/// several providers may share one cache keyed by tenant.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    token_endpoint: String,
    scope: String,
    cache: TokenCache,
    client: Client,
    // per-key guards so concurrent cold-cache callers share one request
    inflight: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl TokenProvider {
    pub fn new(
        credential: &CredentialConfig,
        graph: &GraphConfig,
        cache: TokenCache,
        client: Client,
    ) -> Result<Self> {
        // Secrets resolve once at startup; a missing env var fails fast here
        let client_secret = credential.client_secret.resolve()?;
        Ok(Self {
            tenant_id: credential.tenant_id.clone(),
            client_id: credential.client_id.clone(),
            client_secret,
            token_endpoint: credential.token_endpoint.clone(),
            scope: graph.scope.clone(),
            cache,
            client,
            inflight: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Return a valid bearer token, fetching and caching one on miss.
    ///
    /// The cached expiry sits `TOKEN_SAFETY_MARGIN_SECS` before the
    /// endpoint-reported one, so a returned token is never already expired
    /// from the provider's point of view. The cache is mutated only on a
    /// successful acquisition.
    pub async fn get_access_token(&self) -> Result<String, TokenError> {
        let metrics = get_metrics().await;
        let cache_key = format!("{}{}", ACCESS_TOKEN_CACHE_PREFIX, self.tenant_id);

        if let Some(cached) = self.cache.get(&cache_key).await {
            metrics
                .token_cache_hits
                .with_label_values(&[&self.tenant_id])
                .inc();
            debug!("access token for tenant '{}' served from cache", self.tenant_id);
            return Ok(cached.value);
        }

        let guard = self.inflight_guard(&cache_key).await;
        let _held = guard.lock().await;

        // a concurrent caller may have populated the key while we waited
        if let Some(cached) = self.cache.get(&cache_key).await {
            metrics
                .token_cache_hits
                .with_label_values(&[&self.tenant_id])
                .inc();
            return Ok(cached.value);
        }

        let start = Instant::now();
        metrics
            .token_fetch_requests
            .with_label_values(&[&self.tenant_id])
            .inc();

        let outcome = self.request_new_token().await;
        metrics
            .token_fetch_duration
            .with_label_values(&[&self.tenant_id])
            .observe(start.elapsed().as_secs_f64());

        let token = match outcome {
            Ok(Some(token)) => token,
            Ok(None) => {
                metrics
                    .token_fetch_failures
                    .with_label_values(&[&self.tenant_id, "rejected"])
                    .inc();
                return Err(TokenError::EndpointRejected);
            }
            Err(e) => {
                metrics
                    .token_fetch_failures
                    .with_label_values(&[&self.tenant_id, "transport"])
                    .inc();
                return Err(e);
            }
        };

        if token.access_token.trim().is_empty() {
            metrics
                .token_fetch_failures
                .with_label_values(&[&self.tenant_id, "null_token"])
                .inc();
            return Err(TokenError::NullToken);
        }

        let expires_at_unix_ts =
            now_u64() + token.expires_in.saturating_sub(TOKEN_SAFETY_MARGIN_SECS);
        self.cache
            .set(
                &cache_key,
                CachedToken::new(token.access_token.clone(), expires_at_unix_ts),
            )
            .await;
        debug!(
            "access token for tenant '{}' cached until {}",
            self.tenant_id, expires_at_unix_ts
        );

        Ok(token.access_token)
    }

    /// Request a fresh token from the OAuth2 endpoint.
    ///
    /// Non-2xx responses yield `Ok(None)`; the caller escalates that to a
    /// hard failure. Transport and decode errors propagate as-is.
    pub async fn request_new_token(&self) -> Result<Option<TokenResponse>, TokenError> {
        let request_url = self
            .token_endpoint
            .replace(TENANT_PLACEHOLDER, &self.tenant_id);

        let form = [
            ("client_id", self.client_id.as_str()),
            ("scope", self.scope.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&request_url)
            .header(http::header::ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(
                "token request for tenant '{}' failed: {}",
                self.tenant_id,
                response.status()
            );
            return Ok(None);
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(TokenError::MalformedResponse)?;
        Ok(Some(token))
    }

    async fn inflight_guard(&self, key: &str) -> Arc<Mutex<()>> {
        // guards stay allocated per key; one per tenant, bounded
        let mut map = self.inflight.lock().await;
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
