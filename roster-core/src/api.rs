//! HTTP client for the remote directory API.
//!
//! Every request carries the service's static API key header; once a session
//! exists the bearer token rides along too. Wire payloads are validated at
//! this boundary, so nothing untyped reaches the overlay or the projector.

use crate::error::{CoreError, Result};
use crate::gateway::UserGateway;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_model::{NewUser, PageSnapshot, RawUser, User, UserId};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Header the service requires on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client with authentication support.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    token_store: Arc<RwLock<Option<String>>>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct RawPage {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    per_page: u32,
    #[serde(default)]
    total: u32,
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl ApiClient {
    /// Create a new API client.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        log::info!("[ApiClient] created for base URL: {base_url}");

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            token_store: Arc::new(RwLock::new(None)),
        })
    }

    /// Build a full API URL.
    pub fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Set or clear the bearer token attached to subsequent requests.
    pub async fn set_token(&self, token: Option<String>) {
        *self.token_store.write().await = token;
    }

    /// The bearer token currently attached, if any.
    pub async fn token(&self) -> Option<String> {
        self.token_store.read().await.clone()
    }

    /// Authenticate against the service; the returned token is attached to
    /// the client for subsequent requests.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        #[derive(serde::Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct LoginResponse {
            token: String,
        }

        let url = self.build_url("login");
        log::debug!("[ApiClient] POST {url}");
        let request = self
            .build_request(self.client.post(&url))
            .await
            .json(&LoginRequest { email, password });
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(match self.failure(response).await {
                CoreError::Api { message, .. } => CoreError::LoginRejected(message),
                other => other,
            });
        }

        let body: LoginResponse = response.json().await?;
        self.set_token(Some(body.token.clone())).await;
        Ok(body.token)
    }

    /// Build a request with the API key and, when present, the bearer token.
    async fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header(API_KEY_HEADER, &self.api_key);
        if let Some(token) = self.token_store.read().await.as_ref() {
            builder.header("Authorization", format!("Bearer {token}"))
        } else {
            builder
        }
    }

    /// Turn a non-success response into an error, pulling the service's
    /// `{"error": ...}` body when it sent one. An expired token is dropped so
    /// the next action prompts for login instead of failing the same way.
    async fn failure(&self, response: Response) -> CoreError {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.set_token(None).await;
        }
        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => body.error,
            Err(_) if text.is_empty() => "unknown error".to_string(),
            Err(_) => text,
        };
        CoreError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(self.failure(response).await)
        }
    }

    async fn execute_no_content(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.failure(response).await)
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.build_url(path);
        log::debug!("[ApiClient] GET {url}");
        let request = self.build_request(self.client.get(&url)).await;
        self.execute(request).await
    }

    async fn post<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        log::debug!("[ApiClient] POST {url}");
        let request = self.build_request(self.client.post(&url)).await.json(body);
        self.execute(request).await
    }

    async fn put<B: serde::Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        log::debug!("[ApiClient] PUT {url}");
        let request = self.build_request(self.client.put(&url)).await.json(body);
        self.execute(request).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let url = self.build_url(path);
        log::debug!("[ApiClient] DELETE {url}");
        let request = self.build_request(self.client.delete(&url)).await;
        self.execute_no_content(request).await
    }
}

// Raw wire page -> validated snapshot. Malformed records are dropped with a
// warning rather than propagated; pagination fields the server omitted fall
// back to what was requested.
fn snapshot_from_wire(raw: RawPage, requested_page: u32, requested_per_page: u32) -> PageSnapshot {
    let mut items = Vec::with_capacity(raw.data.len());
    for value in raw.data {
        let parsed = serde_json::from_value::<RawUser>(value)
            .map_err(|err| err.to_string())
            .and_then(|record| record.into_user().map_err(|err| err.to_string()));
        match parsed {
            Ok(user) => items.push(user),
            Err(err) => log::warn!("[ApiClient] dropping malformed user record: {err}"),
        }
    }

    PageSnapshot {
        items,
        page: if raw.page == 0 { requested_page } else { raw.page },
        per_page: if raw.per_page == 0 {
            requested_per_page
        } else {
            raw.per_page
        },
        total: raw.total,
    }
}

#[async_trait]
impl UserGateway for ApiClient {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<PageSnapshot> {
        let raw: RawPage = self
            .get(&format!("users?page={page}&per_page={per_page}"))
            .await?;
        Ok(snapshot_from_wire(raw, page, per_page))
    }

    async fn create_user(&self, draft: &NewUser) -> Result<User> {
        let value: serde_json::Value = self.post("users", draft).await?;
        // Server-assigned id, with a client-generated fallback when the
        // response omits one.
        let id = value
            .get("id")
            .and_then(|raw| serde_json::from_value::<UserId>(raw.clone()).ok())
            .map(UserId::canonical)
            .unwrap_or_else(UserId::new_local);
        log::info!("[ApiClient] created user {id}");
        Ok(draft.clone().into_user(id))
    }

    async fn update_user(&self, id: &UserId, draft: &NewUser) -> Result<User> {
        let _ack: serde_json::Value = self.put(&format!("users/{id}"), draft).await?;
        log::info!("[ApiClient] updated user {id}");
        Ok(draft.clone().into_user(id.clone()))
    }

    async fn delete_user(&self, id: &UserId) -> Result<()> {
        self.delete(&format!("users/{id}")).await?;
        log::info!("[ApiClient] deleted user {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_page_drops_malformed_records() {
        let raw: RawPage = serde_json::from_value(json!({
            "page": 1,
            "per_page": 6,
            "total": 12,
            "data": [
                {"id": 1, "email": "a@x.com", "first_name": "A", "last_name": "One"},
                {"email": "no-id@x.com"},
                {"id": 3, "first_name": "No", "last_name": "Email"},
                {"id": "4", "email": "d@x.com", "first_name": "D", "last_name": "Four"},
            ]
        }))
        .unwrap();

        let snapshot = snapshot_from_wire(raw, 1, 6);
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(snapshot.items[0].id, UserId::Num(1));
        // String ids from the wire are canonicalized.
        assert_eq!(snapshot.items[1].id, UserId::Num(4));
        assert_eq!(snapshot.total, 12);
    }

    #[test]
    fn omitted_pagination_fields_fall_back_to_the_request() {
        let raw: RawPage = serde_json::from_value(json!({
            "data": []
        }))
        .unwrap();

        let snapshot = snapshot_from_wire(raw, 3, 6);
        assert_eq!(snapshot.page, 3);
        assert_eq!(snapshot.per_page, 6);
        assert_eq!(snapshot.total, 0);
    }

    #[tokio::test]
    async fn token_slot_round_trips() {
        let client = ApiClient::new("https://example.test/api", "test-key").unwrap();
        assert!(client.token().await.is_none());
        client.set_token(Some("tok".to_string())).await;
        assert_eq!(client.token().await.as_deref(), Some("tok"));
        client.set_token(None).await;
        assert!(client.token().await.is_none());
    }

    #[test]
    fn urls_join_without_duplicate_slashes() {
        let client = ApiClient::new("https://example.test/api/", "k").unwrap();
        assert_eq!(
            client.build_url("/users?page=1"),
            "https://example.test/api/users?page=1"
        );
    }
}
