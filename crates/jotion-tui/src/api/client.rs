use anyhow::Result;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use reqwest::{Client, StatusCode};
use jotion_shared::{
    api::{CreateDocumentRequest, CreateDocumentResponse, SidebarParams},
    Document,
};
use uuid::Uuid;

use super::auth::AuthToken;

/// JWT payload claims the client reads without verifying
#[derive(Debug, serde::Deserialize)]
struct JwtClaims {
    exp: i64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Resource not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Server error: {0}")]
    Server(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<AuthToken>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Load token from disk
    pub fn load_token(&mut self) -> Result<bool> {
        self.token = AuthToken::load()?;
        Ok(self.token.is_some())
    }

    /// Use a new token and remember it for the next start
    pub fn set_token(&mut self, access_token: &str) -> Result<()> {
        let token = AuthToken {
            access_token: access_token.trim().to_string(),
        };
        token.save()?;
        self.token = Some(token);
        Ok(())
    }

    /// Forget the token, in memory and on disk
    pub fn clear_token(&mut self) -> Result<()> {
        self.token = None;
        AuthToken::delete()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Display name carried in the token, if the provider put one there
    pub fn display_name(&self) -> Option<String> {
        let token = self.token.as_ref()?;
        Self::decode_claims(&token.access_token)?.name
    }

    /// Build URL for endpoint
    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url, path)
    }

    /// Authorization header value, if authenticated
    fn auth_header(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|t| format!("Bearer {}", t.access_token))
    }

    /// Decode the JWT payload without checking the signature
    fn decode_claims(token: &str) -> Option<JwtClaims> {
        // JWT format: header.payload.signature
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
        serde_json::from_slice(&payload).ok()
    }

    /// True when the token is missing or already past its expiry.
    /// Undecodable tokens are left for the server to judge.
    pub fn is_token_expired(&self) -> bool {
        let Some(token) = &self.token else {
            return true;
        };

        let Some(claims) = Self::decode_claims(&token.access_token) else {
            return false;
        };

        claims.exp <= chrono::Utc::now().timestamp()
    }

    // ============ Authenticated Request Helpers ============

    async fn authed_get<Q: serde::Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<reqwest::Response, ApiError> {
        let auth = self.auth_header().ok_or(ApiError::Unauthenticated)?;
        if self.is_token_expired() {
            return Err(ApiError::Unauthenticated);
        }
        self.client
            .get(self.url(path))
            .header("Authorization", auth)
            .query(query)
            .send()
            .await
            .map_err(ApiError::Network)
    }

    async fn authed_post<T: serde::Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, ApiError> {
        let auth = self.auth_header().ok_or(ApiError::Unauthenticated)?;
        if self.is_token_expired() {
            return Err(ApiError::Unauthenticated);
        }
        self.client
            .post(self.url(path))
            .header("Authorization", auth)
            .json(body)
            .send()
            .await
            .map_err(ApiError::Network)
    }

    /// Handle API response
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                response.json().await.map_err(ApiError::Network)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthenticated),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Validation(text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ApiError::Server(format!("{}: {}", status, text)))
            }
        }
    }

    // ============ Documents ============

    /// Live documents directly under `parent_document`, newest first
    pub async fn get_sidebar(
        &self,
        parent_document: Option<Uuid>,
    ) -> Result<Vec<Document>, ApiError> {
        let params = SidebarParams { parent_document };
        let response = self.authed_get("/documents/sidebar", &params).await?;
        self.handle_response(response).await
    }

    pub async fn create_document(
        &self,
        title: &str,
        parent_document: Option<Uuid>,
    ) -> Result<Uuid, ApiError> {
        let req = CreateDocumentRequest {
            title: title.to_string(),
            parent_document,
        };
        let response = self.authed_post("/documents", &req).await?;
        let created: CreateDocumentResponse = self.handle_response(response).await?;
        Ok(created.id)
    }
}
