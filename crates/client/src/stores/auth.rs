use std::sync::Arc;

use chrono::{DateTime, Utc};

use gstbill_auth::{Credentials, RegisterRequest, TokenPair, User, is_token_valid};

use super::Status;
use crate::api::AuthApi;
use crate::error::{ClientError, ClientResult};
use crate::storage::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SessionStorage, USER_KEY};

/// Session state: tokens and the signed-in user, mirrored to storage.
pub struct AuthStore {
    api: AuthApi,
    storage: Arc<dyn SessionStorage>,
    user: Option<User>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    status: Status,
}

impl core::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthStore")
            .field("user", &self.user.as_ref().map(|u| &u.email))
            .field("authenticated", &self.is_authenticated())
            .field("status", &self.status)
            .finish()
    }
}

impl AuthStore {
    pub fn new(api: AuthApi, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            api,
            storage,
            user: None,
            access_token: None,
            refresh_token: None,
            status: Status::default(),
        }
    }

    /// Load whatever session storage holds. An unreadable user record is
    /// dropped; the tokens still count.
    pub fn init(&mut self) {
        self.access_token = self.storage.get(ACCESS_TOKEN_KEY).filter(|t| !t.is_empty());
        self.refresh_token = self.storage.get(REFRESH_TOKEN_KEY).filter(|t| !t.is_empty());
        self.user = self
            .storage
            .get(USER_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(err) => {
                    tracing::warn!(%err, "failed to parse stored user");
                    None
                }
            });
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_superuser)
    }

    /// Whether the stored access token is a JWT that has not expired at `now`.
    pub fn check_token_validity(&self, now: DateTime<Utc>) -> bool {
        self.access_token
            .as_deref()
            .is_some_and(|token| is_token_valid(token, now))
    }

    fn save_tokens(&mut self, access: &str, refresh: Option<&str>) -> ClientResult<()> {
        self.storage.set(ACCESS_TOKEN_KEY, access)?;
        self.access_token = Some(access.to_string());
        if let Some(refresh) = refresh {
            self.storage.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        self.refresh_token = refresh.map(str::to_string);
        Ok(())
    }

    fn save_user(&mut self, user: &User) -> ClientResult<()> {
        let raw = serde_json::to_string(user).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.storage.set(USER_KEY, &raw)?;
        self.user = Some(user.clone());
        Ok(())
    }

    /// Forget the session, in memory and in storage.
    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove(key) {
                tracing::warn!(key, %err, "failed to clear session key");
            }
        }
    }

    /// Log in, persist the tokens, then load the user record.
    pub async fn login(&mut self, credentials: &Credentials) -> ClientResult<TokenPair> {
        self.status.begin();
        let result = self.login_inner(credentials).await;
        self.status.loading = false;
        if let Err(err) = &result {
            self.status.fail(fallback_message(err, "Login failed"));
        }
        result
    }

    async fn login_inner(&mut self, credentials: &Credentials) -> ClientResult<TokenPair> {
        credentials.validate()?;
        let tokens = self.api.login(credentials).await?;
        self.save_tokens(&tokens.access_token, tokens.refresh_token.as_deref())?;
        self.fetch_current_user().await?;
        tracing::info!(email = %credentials.email, "logged in");
        Ok(tokens)
    }

    pub async fn register(&mut self, request: &RegisterRequest) -> ClientResult<User> {
        self.status.begin();
        let result = match request.validate() {
            Ok(()) => self.api.register(request).await,
            Err(err) => Err(err.into()),
        };
        self.status.loading = false;
        if let Err(err) = &result {
            self.status.fail(fallback_message(err, "Registration failed"));
        }
        result
    }

    pub async fn fetch_current_user(&mut self) -> ClientResult<User> {
        let user = self.api.current_user().await.inspect_err(|err| {
            tracing::warn!(%err, "failed to fetch current user");
        })?;
        self.save_user(&user)?;
        Ok(user)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// A response without a refresh token keeps the current one. Any failure,
    /// including having no refresh token at all, ends the session.
    pub async fn refresh_access_token(&mut self) -> ClientResult<String> {
        let Some(current) = self.refresh_token.clone() else {
            self.logout().await;
            return Err(ClientError::NoRefreshToken);
        };

        match self.api.refresh(&current).await {
            Ok(tokens) => {
                let refresh = tokens.refresh_token.as_deref().unwrap_or(&current);
                self.save_tokens(&tokens.access_token, Some(refresh))?;
                tracing::debug!("access token refreshed");
                Ok(tokens.access_token)
            }
            Err(err) => {
                tracing::warn!(%err, "token refresh failed; logging out");
                self.logout().await;
                Err(err)
            }
        }
    }

    pub async fn logout(&mut self) {
        self.status.loading = true;
        if let Err(err) = self.api.logout().await {
            tracing::warn!(%err, "logout error");
        }
        self.clear();
        self.status.loading = false;
    }
}

/// Backend detail when there is one; otherwise the action's generic failure.
/// Local validation and connectivity messages are kept as they are.
fn fallback_message(err: &ClientError, generic: &str) -> String {
    match err {
        ClientError::Api(api) => api.detail.clone().unwrap_or_else(|| generic.to_string()),
        ClientError::Domain(_) | ClientError::Network(_) => err.to_string(),
        _ => generic.to_string(),
    }
}
