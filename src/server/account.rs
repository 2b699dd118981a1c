use axum::{
    extract::State,
    response::Redirect,
    routing::get,
    Router,
};

use crate::config::credential::CredentialConfig;
use crate::server::server::AppState;
use crate::utils::constants::TENANT_PLACEHOLDER;

/// Interactive sign-in/sign-out redirect targets, derived from the
/// token-endpoint template. No cookie or session state is kept here;
/// the identity provider owns the interactive flow.
#[derive(Debug, Clone)]
pub struct AccountState {
    authorize_url: String,
    logout_url: String,
}

impl AccountState {
    pub fn new(credential: &CredentialConfig) -> Self {
        let endpoint_base = credential
            .token_endpoint
            .replace(TENANT_PLACEHOLDER, &credential.tenant_id);
        let endpoint_base = endpoint_base.trim_end_matches("/token");
        Self {
            authorize_url: format!(
                "{}/authorize?client_id={}&response_type=code&redirect_uri=%2F",
                endpoint_base, credential.client_id
            ),
            logout_url: format!("{}/logout?post_logout_redirect_uri=%2F", endpoint_base),
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/account/signin", get(sign_in))
        .route("/account/signout", get(sign_out))
}

async fn sign_in(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.account_state.authorize_url)
}

async fn sign_out(State(state): State<AppState>) -> Redirect {
    Redirect::temporary(&state.account_state.logout_url)
}
