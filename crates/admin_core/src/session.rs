use std::sync::Arc;

use chrono::Utc;
use shared::{domain::SessionToken, protocol::SigninRequest};
use tracing::{info, warn};

use crate::{api::CatalogApi, error::AuthError, token_store::TokenStore};

/// Authentication state handed to the catalog controller on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    is_authenticated: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub(crate) fn authenticated(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            is_authenticated: true,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// The token, but only once the store has accepted it.
    pub fn authenticated_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|_| self.is_authenticated)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub struct SessionController {
    api: Arc<dyn CatalogApi>,
    tokens: Arc<dyn TokenStore>,
    session: Session,
    login_form: LoginForm,
    loading: bool,
}

impl SessionController {
    pub fn new(api: Arc<dyn CatalogApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            tokens,
            session: Session::anonymous(),
            login_form: LoginForm::default(),
            loading: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn login_form(&self) -> &LoginForm {
        &self.login_form
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.login_form
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn submit_login_form(&mut self) -> Result<Session, AuthError> {
        let LoginForm { username, password } = self.login_form.clone();
        self.login(&username, &password).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<Session, AuthError> {
        let request = SigninRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        self.loading = true;
        let result = self.api.sign_in(&request).await;
        self.loading = false;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!("session: sign-in failed username={username}: {err}");
                self.session = Session::anonymous();
                return Err(err.into());
            }
        };

        if response.token.is_empty() {
            self.session = Session::anonymous();
            return Err(AuthError::InvalidCredentials(
                "store returned no token".to_string(),
            ));
        }
        let Some(expires_at) = response.expires_at() else {
            self.session = Session::anonymous();
            return Err(AuthError::InvalidExpiry(response.expired));
        };

        let token = SessionToken::new(response.token, expires_at);
        if let Err(err) = self.tokens.save(&token).await {
            warn!("session: token not persisted, session lasts for this run only: {err:#}");
        }

        info!("session: signed in username={username} expires_at={expires_at}");
        self.session = Session::authenticated(token.token);
        Ok(self.session.clone())
    }

    /// Startup check of the persisted token. Fails closed: any problem clears it.
    pub async fn verify(&mut self) -> bool {
        let persisted = match self.tokens.load().await {
            Ok(Some(persisted)) => persisted,
            Ok(None) => {
                self.session = Session::anonymous();
                return false;
            }
            Err(err) => {
                warn!("session: persisted token unreadable: {err:#}");
                self.discard_persisted_token().await;
                return false;
            }
        };

        if persisted.is_expired_at(Utc::now()) {
            info!(
                "session: persisted token expired at {}",
                persisted.expires_at
            );
            self.discard_persisted_token().await;
            return false;
        }

        self.loading = true;
        let result = self.api.check_session(&persisted.token).await;
        self.loading = false;

        match result {
            Ok(()) => {
                info!("session: persisted token verified");
                self.session = Session::authenticated(persisted.token);
                true
            }
            Err(err) => {
                warn!("session: verification failed: {err}");
                self.discard_persisted_token().await;
                false
            }
        }
    }

    /// Best-effort remote logout; local state is always reset.
    pub async fn logout(&mut self) {
        self.loading = true;
        if let Some(token) = self.session.token().map(str::to_owned) {
            if let Err(err) = self.api.sign_out(&token).await {
                warn!("session: logout request failed: {err}");
            }
        }
        if let Err(err) = self.tokens.clear().await {
            warn!("session: failed to clear persisted token: {err:#}");
        }
        self.session = Session::anonymous();
        self.login_form = LoginForm::default();
        self.loading = false;
        info!("session: signed out");
    }

    async fn discard_persisted_token(&mut self) {
        if let Err(err) = self.tokens.clear().await {
            warn!("session: failed to clear persisted token: {err:#}");
        }
        self.session = Session::anonymous();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
