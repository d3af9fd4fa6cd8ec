use gstbill_auth::{Credentials, RefreshRequest, RegisterRequest, TokenPair, User};

use crate::error::ClientResult;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<User> {
        self.client.post("/auth/register", request).await
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<TokenPair> {
        self.client.post("/auth/login", credentials).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> ClientResult<TokenPair> {
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.post("/auth/refresh", &body).await
    }

    pub async fn current_user(&self) -> ClientResult<User> {
        self.client.get("/auth/me").await
    }

    /// There is no server-side logout; the store clears the session.
    pub async fn logout(&self) -> ClientResult<()> {
        Ok(())
    }
}
