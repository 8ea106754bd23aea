use crate::api::{ApiClient, ApiResponse};
use crate::model::{AuthBody, Session, User};
use crate::service::session::SessionStore;
use crate::util;
use chrono::Duration;
use std::sync::Arc;

/// How long a freshly issued token is trusted locally. Matches the backend's
/// JWT expiry.
const SESSION_TTL_HOURS: i64 = 1;

/// Owned, injected session state: current user, current token, and a loading
/// flag that stays true until the one-time rehydration attempt has run.
/// Nothing in here throws; every outcome is a bool or silently updated state.
pub struct AuthContext {
    client: Arc<ApiClient>,
    store: SessionStore,
    user: Option<User>,
    token: Option<String>,
    loading: bool,
}

impl AuthContext {
    pub fn new(client: Arc<ApiClient>, store: SessionStore) -> Self {
        Self {
            client,
            store,
            user: None,
            token: None,
            loading: true,
        }
    }

    /// One-time startup pass over the persisted session. An expired or
    /// unreadable record is cleared; a live one is installed into state and
    /// its token propagated to the gateway.
    pub fn rehydrate(&mut self) {
        if let Some(session) = self.store.load() {
            if session.is_expired() {
                log::info!("stored session has expired, clearing it");
                self.store.clear();
            } else {
                let user = session.user.clone().normalize();
                log::debug!("restored session for {}", user.email);
                self.client.set_token(Some(session.token.clone()));
                self.token = Some(session.token);
                self.user = Some(user);
            }
        }
        self.loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        let response = self.client.login(email, password).await;
        self.install(response)
    }

    pub async fn signup(&mut self, email: &str, password: &str, name: Option<&str>) -> bool {
        let response = self.client.signup(email, password, name).await;
        self.install(response)
    }

    /// Form-level login: validates the fields first and returns the field
    /// message on failure, without any network traffic. `Ok(false)` means the
    /// server rejected the credentials.
    pub async fn submit_login(&mut self, email: &str, password: &str) -> Result<bool, String> {
        util::validate_email(email)?;
        util::validate_login_password(password)?;
        Ok(self.login(email, password).await)
    }

    /// Form-level signup, same contract as `submit_login` but with the
    /// signup complexity rules and the optional name.
    pub async fn submit_signup(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<bool, String> {
        util::validate_email(email)?;
        util::validate_signup_password(password)?;
        if let Some(name) = name {
            util::validate_name(name)?;
        }
        Ok(self.signup(email, password, name).await)
    }

    /// Pull user and token out of the nested auth envelope, persist a session
    /// with a fixed expiry, and update local state. Any malformed envelope is
    /// a plain failure.
    fn install(&mut self, response: ApiResponse<AuthBody>) -> bool {
        let Some(body) = response.data else {
            return false;
        };
        if !body.success {
            return false;
        }
        let Some(auth) = body.data else {
            return false;
        };

        let user = auth.user.normalize();
        let session = Session::new(
            auth.jwt_token.clone(),
            user.clone(),
            Duration::hours(SESSION_TTL_HOURS),
        );
        if let Err(e) = self.store.save(&session) {
            log::warn!("failed to persist session: {}", e);
        }

        self.client.set_token(Some(auth.jwt_token.clone()));
        self.token = Some(auth.jwt_token);
        self.user = Some(user);
        true
    }

    /// Clears everything locally and fires the server-side invalidation
    /// without waiting on it.
    pub fn logout(&mut self) {
        self.store.clear();
        self.user = None;
        self.token = None;
        self.client.set_token(None);

        let client = self.client.clone();
        tokio::spawn(async move {
            let _ = client.logout().await;
        });
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
