#[cfg(test)]
mod test {

    use httpmock::Method::POST;
    use httpmock::MockServer;
    use reqwest::Client;
    use serde_json::json;
    use std::time::Duration;

    use crate::auth::error::TokenError;
    use crate::auth::provider::TokenProvider;
    use crate::cache::token_cache::{CachedToken, TokenCache};
    use crate::config::credential::{CredentialConfig, GraphConfig, SecretValue};
    use crate::helpers::time::now_u64;

    const TOKEN_PATH: &str = "/contoso/oauth2/v2.0/token";

    /// Provider wired to a mock token endpoint, template still holding `common`.
    fn build_provider(server: &MockServer, cache: TokenCache) -> TokenProvider {
        let credential = CredentialConfig {
            tenant_id: "contoso".to_string(),
            client_id: "client-123".to_string(),
            client_secret: SecretValue::Literal {
                value: "s3cr3t".to_string(),
            },
            token_endpoint: format!("{}/common/oauth2/v2.0/token", server.base_url()),
        };
        let graph = GraphConfig {
            base_url: "http://unused.example".to_string(),
            scope: "https://graph.microsoft.com/.default".to_string(),
        };
        TokenProvider::new(&credential, &graph, cache, Client::new()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn second_call_is_a_cache_hit() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "abc-123",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let provider = build_provider(&server, TokenCache::new());

        let first = provider.get_access_token().await.unwrap();
        let second = provider.get_access_token().await.unwrap();

        assert_eq!(first, "abc-123");
        assert_eq!(second, "abc-123");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn tenant_substitution_and_form_fields() {
        let server = MockServer::start_async().await;
        // matches only if the `common` segment was replaced and the form is complete
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(TOKEN_PATH)
                    .header("accept", "application/json")
                    .form_urlencoded_tuple("client_id", "client-123")
                    .form_urlencoded_tuple("client_secret", "s3cr3t")
                    .form_urlencoded_tuple("scope", "https://graph.microsoft.com/.default")
                    .form_urlencoded_tuple("grant_type", "client_credentials");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "tok",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let provider = build_provider(&server, TokenCache::new());
        let token = provider.get_access_token().await.unwrap();

        assert_eq!(token, "tok");
        mock.assert_async().await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cached_expiry_carries_safety_margin() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "abc",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let cache = TokenCache::new();
        let provider = build_provider(&server, cache.clone());

        let before = now_u64();
        provider.get_access_token().await.unwrap();
        let after = now_u64();

        let cached = cache.get("accessToken_contoso").await.unwrap();
        // expiry = now + 3600 - 10, with slack for the now() captured around the call
        assert!(cached.expires_at_unix_ts >= before + 3590);
        assert!(cached.expires_at_unix_ts <= after + 3590);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn non_success_status_fails_and_leaves_cache_untouched() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(500).body("boom");
            })
            .await;

        let cache = TokenCache::new();
        let provider = build_provider(&server, cache.clone());

        let err = provider.get_access_token().await.unwrap_err();
        assert!(matches!(err, TokenError::EndpointRejected));
        assert!(cache.is_empty().await);

        // no poisoned entry was written, the next call goes to the network again
        let err2 = provider.get_access_token().await.unwrap_err();
        assert!(matches!(err2, TokenError::EndpointRejected));
        assert_eq!(mock.hits_async().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn empty_access_token_is_a_null_token_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let cache = TokenCache::new();
        let provider = build_provider(&server, cache.clone());

        let err = provider.get_access_token().await.unwrap_err();
        assert!(matches!(err, TokenError::NullToken));
        assert!(cache.is_empty().await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn missing_access_token_field_is_a_null_token_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({ "expires_in": 3600 }));
            })
            .await;

        let provider = build_provider(&server, TokenCache::new());

        let err = provider.get_access_token().await.unwrap_err();
        assert!(matches!(err, TokenError::NullToken));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn unparseable_body_is_a_malformed_response_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body("definitely-not-json");
            })
            .await;

        let provider = build_provider(&server, TokenCache::new());

        let err = provider.get_access_token().await.unwrap_err();
        assert!(matches!(err, TokenError::MalformedResponse(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn stale_entry_triggers_a_fresh_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "fresh",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let cache = TokenCache::new();
        cache
            .set(
                "accessToken_contoso",
                CachedToken::new("stale".into(), now_u64().saturating_sub(5)),
            )
            .await;

        let provider = build_provider(&server, cache.clone());
        let token = provider.get_access_token().await.unwrap();

        assert_eq!(token, "fresh");
        assert_eq!(mock.hits_async().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_cold_misses_share_one_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(TOKEN_PATH);
                then.status(200)
                    .header("Content-Type", "application/json")
                    .delay(Duration::from_millis(250))
                    .json_body(json!({
                        "access_token": "shared",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let provider = build_provider(&server, TokenCache::new());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let provider = provider.clone();
            handles.push(tokio::spawn(
                async move { provider.get_access_token().await },
            ));
        }

        for handle in handles {
            let token = handle.await.unwrap().unwrap();
            assert_eq!(token, "shared");
        }
        assert_eq!(mock.hits_async().await, 1);
    }
}
