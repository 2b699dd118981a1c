use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::helpers::time::now_u64;

/// Cached access token with its absolute expiry.
///
/// Invariant: an entry is never handed out once `now >= expires_at_unix_ts`.
#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: String,
    pub expires_at_unix_ts: u64,
}

impl CachedToken {
    pub fn new(value: String, expires_at_unix_ts: u64) -> Self {
        Self {
            value,
            expires_at_unix_ts,
        }
    }

    pub fn is_expired(&self) -> bool {
        now_u64() >= self.expires_at_unix_ts
    }
}

/// Token cache: key -> token with expiry.
///
/// A cloneable handle around shared state. Passed explicitly to every
/// collaborator instead of living in a process-wide static, so tests and
/// multi-tenant deployments can run isolated instances. Concurrent reads
/// and per-key writes are safe; writes are last-write-wins.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    inner: Arc<RwLock<HashMap<String, CachedToken>>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get token if it exists and is not expired
    pub async fn get(&self, key: &str) -> Option<CachedToken> {
        let map = self.inner.read().await;
        map.get(key)
            .cloned()
            .filter(|token| !token.is_expired())
    }

    /// Insert token into cache, superseding any previous entry
    pub async fn set(&self, key: &str, token: CachedToken) {
        let mut map = self.inner.write().await;
        map.insert(key.to_string(), token);
    }

    /// Number of entries, expired ones included (eviction is lazy)
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drop expired entries
    pub async fn cleanup(&self) {
        let mut map = self.inner.write().await;
        map.retain(|_, token| !token.is_expired());
    }
}
