//! Identity provider module
//!
//! Account creation, password sign-in, password reset, and ID token
//! verification are delegated to an external identity provider behind the
//! [`IdentityProvider`] trait. The production backend is Firebase
//! Authentication ([`FirebaseAuthClient`]).

mod firebase_auth_client;

use async_trait::async_trait;
use thiserror::Error;

pub use firebase_auth_client::FirebaseAuthClient;

/// Errors raised by the identity provider
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider refused the request; the reason is passed through as-is
    #[error("{0}")]
    Rejected(String),

    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),

    #[error("Unexpected identity provider response: {0}")]
    Decode(String),
}

pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

/// A verified account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
}

/// Tokens issued on sign-in or account creation
#[derive(Debug, Clone)]
pub struct IdentitySession {
    pub identity: Identity,
    pub id_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentitySession>;

    async fn create_account(&self, email: &str, password: &str) -> IdentityResult<IdentitySession>;

    async fn send_password_reset(&self, email: &str) -> IdentityResult<()>;

    /// Resolve the account behind an ID token
    async fn verify_token(&self, id_token: &str) -> IdentityResult<Identity>;
}
