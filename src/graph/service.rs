use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::warn;

use crate::auth::client::AuthenticatedClient;
use crate::auth::error::TokenError;
use crate::graph::model::{GraphPage, GraphUser, UserModel};

#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("directory request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("directory API returned status {status}")]
    Api { status: u16 },

    #[error("malformed directory response: {0}")]
    MalformedResponse(#[source] reqwest::Error),
}

/// Client for the directory API. Every request goes out through the
/// signing wrapper, so token lifecycle never leaks into call sites.
#[derive(Debug, Clone)]
pub struct GraphService {
    auth: AuthenticatedClient,
    client: Client,
    base_url: String,
}

impl GraphService {
    pub fn new(auth: AuthenticatedClient, client: Client, base_url: String) -> Self {
        Self {
            auth,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Retrieve all users
    pub async fn list_users(&self) -> Result<Vec<UserModel>, GraphError> {
        let request = self.client.get(format!("{}/users", self.base_url));
        let response = self.auth.authorize(request).await?.send().await?;

        if !response.status().is_success() {
            warn!("user listing failed: {}", response.status());
            return Err(GraphError::Api {
                status: response.status().as_u16(),
            });
        }

        let page = response
            .json::<GraphPage<GraphUser>>()
            .await
            .map_err(GraphError::MalformedResponse)?;
        Ok(page.value.into_iter().map(UserModel::from).collect())
    }

    /// Retrieve user by id; `Ok(None)` when the directory has no such user
    pub async fn get_user(&self, id: &str) -> Result<Option<UserModel>, GraphError> {
        let request = self.client.get(format!("{}/users/{}", self.base_url, id));
        let response = self.auth.authorize(request).await?.send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            warn!("user lookup for '{}' failed: {}", id, response.status());
            return Err(GraphError::Api {
                status: response.status().as_u16(),
            });
        }

        let user = response
            .json::<GraphUser>()
            .await
            .map_err(GraphError::MalformedResponse)?;
        Ok(Some(user.into()))
    }
}
