//! # Session Manager
//!
//! Resolves, creates and destroys the authenticated session.
//!
//! ## Identity Check on Start
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    GET /auth/me (cookie from jar)                       │
//! │                                                                         │
//! │   200 {username, isAdmin} ──► Authenticated(Session)                    │
//! │   401 / 403               ──► Guest          (normal, not an error)     │
//! │   network / 5xx / garbage ──► Guest          (warn! in the log only)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logout is best effort: the local session is cleared even when the server
//! cannot be told.

use std::sync::Arc;
use tracing::{debug, info, warn};

use kawuz_core::types::{Credentials, Registration, Session, SessionState};
use kawuz_core::validation::{validate_credentials, validate_registration, ArithmeticCaptcha};

use crate::api::StoreApi;
use crate::error::ClientResult;

/// Auth calls plus the local rules around them.
#[derive(Clone)]
pub struct SessionManager {
    api: Arc<dyn StoreApi>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn StoreApi>) -> Self {
        SessionManager { api }
    }

    /// Asks the backend who the ambient credential belongs to.
    ///
    /// Never fails: anything but a 200 means guest.
    pub async fn rehydrate(&self) -> SessionState {
        match self.api.me().await {
            Ok(session) => {
                info!(username = %session.username, admin = session.is_admin, "Session restored");
                SessionState::Authenticated(session)
            }
            Err(e) if e.is_unauthorized() => {
                debug!("No active session");
                SessionState::Guest
            }
            Err(e) => {
                warn!(error = %e, "Identity check failed, continuing as guest");
                SessionState::Guest
            }
        }
    }

    /// Validates the form, then logs in.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<Session> {
        validate_credentials(credentials)?;
        let session = self.api.login(credentials).await?;
        info!(username = %session.username, admin = session.is_admin, "Logged in");
        Ok(session)
    }

    /// Tells the server to drop the cookie. Failures are logged and ignored.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Failed to notify server about logout");
        }
        info!("Logged out");
    }

    /// Checks the CAPTCHA and the form, then registers.
    ///
    /// Returns the server's confirmation message.
    pub async fn register(
        &self,
        registration: &Registration,
        captcha: &ArithmeticCaptcha,
        answer: &str,
    ) -> ClientResult<String> {
        captcha.check(answer)?;
        validate_registration(registration)?;
        let message = self.api.register(registration).await?;
        info!(username = %registration.username, "Account registered");
        Ok(message)
    }
}
