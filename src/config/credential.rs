use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;

use crate::utils::constants::DEFAULT_GRAPH_SCOPE;

/// ================================
/// Application credential
/// ================================
///
/// Static client-credential configuration. Loaded once at process start,
/// never mutated at runtime.
#[derive(Debug, Deserialize, Clone)]
pub struct CredentialConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: SecretValue,
    /// URL template containing the literal segment `common`,
    /// replaced by `tenant_id` when requesting a token.
    pub token_endpoint: String,
}

/// Secret sources: inline literal or environment indirection
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum SecretValue {
    Literal { value: String },
    FromEnv { from_env: String },
}

impl SecretValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            SecretValue::Literal { value } => Ok(value.to_owned()),
            SecretValue::FromEnv { from_env } => env::var(from_env)
                .map_err(|_| anyhow!("secret env var '{}' is not set", from_env)),
        }
    }
}

/// ================================
/// Directory API target
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct GraphConfig {
    pub base_url: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

fn default_scope() -> String {
    DEFAULT_GRAPH_SCOPE.to_string()
}
