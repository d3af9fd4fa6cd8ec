//! Shared HTTP client: bearer injection, JSON bodies and the single place
//! where failures become user-facing messages.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::connectivity::Connectivity;
use crate::error::{
    ApiError, ClientError, ClientResult, MSG_NOT_FOUND, MSG_SERVER, MSG_UNEXPECTED, MSG_VALIDATION,
};
use crate::notify::{Notifier, Toast};
use crate::storage::{ACCESS_TOKEN_KEY, SessionStorage};

/// Cheap to clone; every façade holds one.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    storage: Arc<dyn SessionStorage>,
    notifier: Arc<dyn Notifier>,
    connectivity: Arc<Connectivity>,
}

impl core::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.api_base_url)
            .field("connectivity", &self.connectivity.state())
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        storage: Arc<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> ClientResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let builder = reqwest::Client::builder().default_headers(headers);
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.timeout);

        let http = builder
            .build()
            .map_err(|e| ClientError::Network(e.to_string()))?;

        Ok(Self {
            http,
            config,
            storage,
            notifier,
            connectivity: Arc::new(Connectivity::new()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn SessionStorage> {
        &self.storage
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn url(&self, path: &str) -> String {
        self.config.endpoint(path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.url(path));
        match self.storage.get(ACCESS_TOKEN_KEY) {
            Some(token) if !token.is_empty() => req.bearer_auth(token),
            _ => req,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.send(path, self.request(Method::GET, path)).await?;
        decode(resp).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path).query(query);
        let resp = self.send(path, req).await?;
        decode(resp).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .send(path, self.request(Method::POST, path).json(body))
            .await?;
        decode(resp).await
    }

    /// POST with no body (`/finalize`).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.send(path, self.request(Method::POST, path)).await?;
        decode(resp).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .send(path, self.request(Method::PUT, path).json(body))
            .await?;
        decode(resp).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self
            .send(path, self.request(Method::PATCH, path).json(body))
            .await?;
        decode(resp).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let resp = self.send(path, self.request(Method::DELETE, path)).await?;
        decode(resp).await
    }

    /// GET returning the raw successful response (binary downloads).
    pub async fn get_raw(&self, path: &str) -> ClientResult<Response> {
        self.send(path, self.request(Method::GET, path)).await
    }

    /// Send, classify the outcome, and report failures to the notifier.
    async fn send(&self, path: &str, req: RequestBuilder) -> ClientResult<Response> {
        let resp = match req.send().await {
            Ok(resp) => resp,
            Err(err) => {
                self.connectivity.set_offline();
                tracing::warn!(%path, error = %err, "request got no response");
                let err = ClientError::Network(err.to_string());
                self.notifier.notify(Toast::error(err.to_string()));
                return Err(err);
            }
        };
        self.connectivity.set_online();

        let status = resp.status();
        if status.is_success() {
            tracing::debug!(%path, status = status.as_u16(), "request ok");
            return Ok(resp);
        }

        let body = resp.bytes().await.unwrap_or_default();
        let api_error = map_error(status.as_u16(), &body);
        tracing::warn!(%path, status = api_error.status, message = %api_error.message, "request failed");
        self.notifier.notify(Toast::error(api_error.message.clone()));
        Err(ClientError::Api(api_error))
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))?;
    // An empty body (204) reads as JSON null; callers that accept one decode
    // into `Option<T>`.
    let bytes: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

/// Map an error response to the message shown to the user.
///
/// A `detail` string wins, then `detail.message`; otherwise the message
/// depends on the status alone.
pub fn map_error(status: u16, body: &[u8]) -> ApiError {
    let detail = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| match v.get("detail") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(serde_json::Value::Object(o)) => o
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            _ => None,
        });

    let message = match (&detail, status) {
        (Some(d), _) => d.clone(),
        (None, 404) => MSG_NOT_FOUND.to_string(),
        (None, 422) => MSG_VALIDATION.to_string(),
        (None, 500) => MSG_SERVER.to_string(),
        (None, _) => MSG_UNEXPECTED.to_string(),
    };

    ApiError {
        status,
        message,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_wins_over_status() {
        let e = map_error(400, br#"{"detail":"GSTIN already registered"}"#);
        assert_eq!(e.message, "GSTIN already registered");
        assert_eq!(e.detail.as_deref(), Some("GSTIN already registered"));

        let e = map_error(404, br#"{"detail":"Invoice not found"}"#);
        assert_eq!(e.message, "Invoice not found");
    }

    #[test]
    fn nested_detail_message() {
        let e = map_error(409, br#"{"detail":{"message":"Invoice is final","code":"LOCKED"}}"#);
        assert_eq!(e.message, "Invoice is final");
    }

    #[test]
    fn status_fallbacks() {
        assert_eq!(map_error(404, b"").message, MSG_NOT_FOUND);
        assert_eq!(map_error(422, br#"{"detail":[{"loc":["body","name"]}]}"#).message, MSG_VALIDATION);
        assert_eq!(map_error(500, b"<html>").message, MSG_SERVER);
        assert_eq!(map_error(418, b"{}").message, MSG_UNEXPECTED);
        assert_eq!(map_error(400, br#"{"detail":{"code":"X"}}"#).message, MSG_UNEXPECTED);
        assert_eq!(map_error(404, b"").detail, None);
    }
}
