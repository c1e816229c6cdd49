//! Credential sign-in against the auth service.

use crate::models::FormData;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use thiserror::Error;

/// Provider id for email/password sign-in.
pub const CREDENTIALS_PROVIDER: &str = "credentials";

#[derive(Debug, Error)]
pub enum SignInError {
    /// The provider rejected the credentials.
    #[error("CredentialsSignin")]
    CredentialsSignin,

    #[error("Unsupported sign-in provider: {0}")]
    UnsupportedProvider(String),

    #[error("NetworkError: {0}")]
    Network(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// Signed-in identity returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
}

#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Exchange a credential bag for a principal.
    async fn sign_in(&self, provider: &str, credentials: &FormData)
        -> Result<Principal, SignInError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct AccessTokenClaims {
    sub: String,
    email: String,
}

/// Decode access-token claims without verifying the signature.
///
/// The token arrives straight from the auth service over the call that issued
/// it; only the subject and email are read for the session.
fn decode_claims(token: &str) -> Result<AccessTokenClaims, SignInError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(SignInError::Provider("Invalid JWT format".to_string()));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| SignInError::Provider(format!("Failed to decode JWT payload: {}", e)))?;

    serde_json::from_slice(&payload)
        .map_err(|e| SignInError::Provider(format!("Failed to parse JWT claims: {}", e)))
}

/// HTTP client for the auth service's `/auth/login` endpoint.
pub struct AuthServiceClient {
    client: Client,
    base_url: String,
}

impl AuthServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CredentialsProvider for AuthServiceClient {
    #[tracing::instrument(skip(self, credentials), fields(provider = %provider))]
    async fn sign_in(
        &self,
        provider: &str,
        credentials: &FormData,
    ) -> Result<Principal, SignInError> {
        if provider != CREDENTIALS_PROVIDER {
            return Err(SignInError::UnsupportedProvider(provider.to_string()));
        }

        let url = format!("{}/auth/login", self.base_url);
        let response = self
            .client
            .traced_post(&url)
            .json(&credentials.to_map())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send POST request to {}: {}", url, e);
                SignInError::Network(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::info!("Credentials rejected by auth service");
                return Err(SignInError::CredentialsSignin);
            }
            status => {
                return Err(SignInError::Provider(format!(
                    "auth service returned {}",
                    status
                )))
            }
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| SignInError::Provider(format!("Invalid token response: {}", e)))?;
        let claims = decode_claims(&tokens.access_token)?;

        tracing::info!(user_id = %claims.sub, "User signed in");

        Ok(Principal {
            user_id: claims.sub,
            email: claims.email,
            access_token: tokens.access_token,
        })
    }
}
