use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{Identity, IdentityError, IdentityProvider, IdentityResult, IdentitySession};
use crate::core::config::IdentityConfig;

/// Request body for signUp / signInWithPassword
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Request body for sendOobCode
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    email: &'a str,
}

/// Request body for accounts:lookup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

/// Response of signUp / signInWithPassword
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Seconds, encoded as a string
    #[serde(default)]
    expires_in: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorEnvelope {
    error: FirebaseErrorBody,
}

#[derive(Debug, Deserialize)]
struct FirebaseErrorBody {
    #[serde(default)]
    message: String,
}

/// Client for the Firebase Authentication (Identity Toolkit) REST API
pub struct FirebaseAuthClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl FirebaseAuthClient {
    const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

    pub fn new(config: &IdentityConfig) -> IdentityResult<Self> {
        let http_client = Client::builder()
            .user_agent("KindMealCore/1.0 (donation-service)")
            .build()?;

        info!("Firebase auth client initialized: {}", config.base_url);

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}", self.base_url, method)
    }

    /// POST to an `accounts:*` endpoint and decode the success body
    async fn call<B, T>(&self, method: &str, body: &B) -> IdentityResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self.endpoint(method);
        debug!("Calling Firebase auth endpoint: {}", url);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Firebase auth request failed: {}", e);
                IdentityError::Transport(e)
            })?;

        let response = Self::check(response).await?;

        response.json::<T>().await.map_err(|e| {
            error!("Failed to parse Firebase auth response: {}", e);
            IdentityError::Decode(format!("Failed to parse {} response: {}", method, e))
        })
    }

    async fn check(response: Response) -> IdentityResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<FirebaseErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));

        if status.is_client_error() {
            debug!("Firebase auth rejected request: {}", reason);
            Err(IdentityError::Rejected(reason))
        } else {
            error!("Firebase auth error: HTTP {} - {}", status, body);
            Err(IdentityError::Unavailable(reason))
        }
    }

    fn session(response: PasswordResponse) -> IdentitySession {
        let expires_in = response
            .expires_in
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::DEFAULT_EXPIRES_IN_SECS);

        IdentitySession {
            identity: Identity {
                uid: response.local_id,
                email: response.email,
            },
            id_token: response.id_token,
            refresh_token: response.refresh_token,
            expires_in,
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentitySession> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: PasswordResponse = self.call("signInWithPassword", &body).await?;
        Ok(Self::session(response))
    }

    async fn create_account(&self, email: &str, password: &str) -> IdentityResult<IdentitySession> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: PasswordResponse = self.call("signUp", &body).await?;

        info!("Created Firebase account: {}", response.local_id);
        Ok(Self::session(response))
    }

    async fn send_password_reset(&self, email: &str) -> IdentityResult<()> {
        let body = OobCodeRequest {
            request_type: "PASSWORD_RESET",
            email,
        };
        let _: serde_json::Value = self.call("sendOobCode", &body).await?;
        Ok(())
    }

    async fn verify_token(&self, id_token: &str) -> IdentityResult<Identity> {
        let response: LookupResponse = self.call("lookup", &LookupRequest { id_token }).await?;

        response
            .users
            .into_iter()
            .next()
            .map(|u| Identity {
                uid: u.local_id,
                email: u.email,
            })
            .ok_or_else(|| IdentityError::Rejected("USER_NOT_FOUND".to_string()))
    }
}
