//! Single shared admin password and the session tokens issued after login.

pub mod password;
pub mod session;

use thiserror::Error;

pub use password::{hash_password, verify_password};
pub use session::{Claims, SessionConfig, SessionToken, SESSION_DURATION_HOURS};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid password")]
    InvalidPassword,

    #[error("invalid or expired session")]
    InvalidSession,

    #[error("password hash error: {0}")]
    Hash(String),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Checks the shared admin password and issues/validates sessions.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    password_hash: String,
    session: SessionConfig,
}

impl AdminAuth {
    pub fn new(password_hash: impl Into<String>, session: SessionConfig) -> Self {
        Self {
            password_hash: password_hash.into(),
            session,
        }
    }

    /// Verify the password and issue a session token.
    pub fn login(&self, password: &str) -> Result<SessionToken, AuthError> {
        let matches = verify_password(password, &self.password_hash).map_err(|e| {
            tracing::error!(error = %e, "Configured admin password hash is unusable");
            AuthError::Hash(e.to_string())
        })?;

        if !matches {
            tracing::warn!("Rejected admin login");
            return Err(AuthError::InvalidPassword);
        }

        let token = session::issue(&self.session)?;
        tracing::info!(expires_at = %token.expires_at, "Admin logged in");
        Ok(token)
    }

    pub fn check_session(&self, token: &str) -> Result<Claims, AuthError> {
        session::validate(token, &self.session)
    }
}
