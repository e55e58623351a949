#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use crate::modules::identity::{Identity, IdentityError, IdentityProvider, IdentityResult, IdentitySession};

#[cfg(test)]
use async_trait::async_trait;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
use std::collections::HashMap;

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
pub const TEST_UID: &str = "test-uid";

#[cfg(test)]
#[allow(dead_code)]
pub fn create_test_user() -> AuthenticatedUser {
    AuthenticatedUser {
        uid: TEST_UID.to_string(),
        email: Some("donor@example.com".to_string()),
    }
}

#[cfg(test)]
#[allow(dead_code)]
async fn inject_test_user_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_test_user());
    next.run(request).await
}

/// Attach [`create_test_user`] to every request, skipping token verification
#[cfg(test)]
#[allow(dead_code)]
pub fn with_authenticated_user(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_test_user_middleware))
}

/// In-memory identity provider
///
/// Issues `token-{uid}` ID tokens and rejects with the same reason codes the
/// Firebase REST API uses.
#[cfg(test)]
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeIdentityProvider {
    accounts: Mutex<HashMap<String, (String, String)>>,
    pub reset_requests: Mutex<Vec<String>>,
}

#[cfg(test)]
#[allow(dead_code)]
impl FakeIdentityProvider {
    fn session(uid: &str, email: &str) -> IdentitySession {
        IdentitySession {
            identity: Identity {
                uid: uid.to_string(),
                email: Some(email.to_string()),
            },
            id_token: format!("token-{}", uid),
            refresh_token: Some(format!("refresh-{}", uid)),
            expires_in: 3600,
        }
    }

    fn rejected(reason: &str) -> IdentityError {
        IdentityError::Rejected(reason.to_string())
    }
}

#[cfg(test)]
#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<IdentitySession> {
        let accounts = self.accounts.lock().map_err(|_| Self::rejected("LOCK_POISONED"))?;
        match accounts.get(email) {
            Some((uid, stored)) if stored == password => Ok(Self::session(uid, email)),
            _ => Err(Self::rejected("INVALID_LOGIN_CREDENTIALS")),
        }
    }

    async fn create_account(&self, email: &str, password: &str) -> IdentityResult<IdentitySession> {
        let mut accounts = self.accounts.lock().map_err(|_| Self::rejected("LOCK_POISONED"))?;
        if accounts.contains_key(email) {
            return Err(Self::rejected("EMAIL_EXISTS"));
        }
        let uid = format!("uid-{}", accounts.len() + 1);
        accounts.insert(email.to_string(), (uid.clone(), password.to_string()));
        Ok(Self::session(&uid, email))
    }

    async fn send_password_reset(&self, email: &str) -> IdentityResult<()> {
        let known = self
            .accounts
            .lock()
            .map_err(|_| Self::rejected("LOCK_POISONED"))?
            .contains_key(email);
        if !known {
            return Err(Self::rejected("EMAIL_NOT_FOUND"));
        }
        self.reset_requests
            .lock()
            .map_err(|_| Self::rejected("LOCK_POISONED"))?
            .push(email.to_string());
        Ok(())
    }

    async fn verify_token(&self, id_token: &str) -> IdentityResult<Identity> {
        let uid = id_token
            .strip_prefix("token-")
            .ok_or_else(|| Self::rejected("INVALID_ID_TOKEN"))?;
        let accounts = self.accounts.lock().map_err(|_| Self::rejected("LOCK_POISONED"))?;
        accounts
            .iter()
            .find(|(_, (account_uid, _))| account_uid == uid)
            .map(|(email, (account_uid, _))| Identity {
                uid: account_uid.clone(),
                email: Some(email.clone()),
            })
            .ok_or_else(|| Self::rejected("USER_NOT_FOUND"))
    }
}
