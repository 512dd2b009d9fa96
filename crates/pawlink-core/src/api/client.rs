//! API client for communicating with the Pawlink REST backend.
//!
//! This module provides the `ApiClient` struct, which owns the
//! authenticated request pipeline: it attaches the stored access token to
//! outgoing requests, and on a first-pass 401 it refreshes the token pair
//! and replays the original request exactly once.

use std::sync::Arc;

use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

use crate::auth::{CredentialStore, KeyringCredentials};
use crate::config::{normalize_base_url, ApiConfig};
use crate::models::{
    ApiMessage, AuthResponse, Booking, BookingStatus, LoginRequest, NewBooking, NewPost, NewReview,
    Post, ProfileUpdate, RefreshRequest, RefreshResponse, Review, SignupRequest, UploadResponse,
    User, VerifyEmailRequest,
};

use super::endpoint::Endpoint;
use super::multipart::{FilePart, MultipartBody};
use super::transport::{HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Content type for JSON request bodies.
const CONTENT_TYPE_JSON: &str = "application/json";

/// Cap on response body text echoed into logs.
/// 500 characters is enough to identify a payload without flooding output.
const LOG_BODY_PREVIEW_CHARS: usize = 500;

// ============================================================================
// Request pipeline types
// ============================================================================

/// Which pass through the pipeline a request is on. A request goes to the
/// wire at most twice: `First`, then `Replay` after a token refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Replay,
}

/// Body of one logical call, encoded exactly once so the replay resends
/// the same bytes.
enum Payload {
    Empty,
    Json(Vec<u8>),
    Multipart {
        content_type: String,
        bytes: Vec<u8>,
    },
}

impl Payload {
    fn json<B: Serialize>(body: &B) -> Result<Self, ApiError> {
        let bytes =
            serde_json::to_vec(body).map_err(|error| ApiError::Encoding(error.to_string()))?;
        Ok(Payload::Json(bytes))
    }

    fn multipart(body: &MultipartBody) -> Self {
        Payload::Multipart {
            content_type: body.content_type(),
            bytes: body.encode(),
        }
    }

    fn into_wire(self) -> (Option<String>, Option<Vec<u8>>) {
        match self {
            Payload::Empty => (None, None),
            Payload::Json(bytes) => (Some(CONTENT_TYPE_JSON.to_string()), Some(bytes)),
            Payload::Multipart {
                content_type,
                bytes,
            } => (Some(content_type), Some(bytes)),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Client for the Pawlink REST API.
/// Clone is cheap - the transport, store, and refresh gate are shared Arcs.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
    base_url: String,
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a production client: reqwest transport plus keychain storage.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.timeout())?;
        let credentials = KeyringCredentials::new(config.service_name.clone());
        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(credentials),
            config.base_url.clone(),
        ))
    }

    /// Assemble a client from explicit parts. Tests inject a scripted
    /// transport and an in-memory store here.
    pub fn with_parts(
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            base_url: normalize_base_url(base_url.into()),
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    /// True when a token pair is stored. Whether it is still accepted is
    /// only known to the server.
    pub fn has_session(&self) -> bool {
        self.credentials.access_token().is_some()
    }

    /// Drop the local session. There is no server-side logout endpoint.
    pub fn logout(&self) {
        self.credentials.clear();
        info!("Logged out");
    }

    // ===== Session =====

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let auth: AuthResponse = self.send_json(Endpoint::login(), &body).await?;
        self.credentials
            .save(&auth.access_token, &auth.refresh_token);
        info!(user_id = auth.user.id, "Logged in");
        Ok(auth.user)
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<User, ApiError> {
        let auth: AuthResponse = self.send_json(Endpoint::signup(), request).await?;
        self.credentials
            .save(&auth.access_token, &auth.refresh_token);
        info!(user_id = auth.user.id, "Signed up");
        Ok(auth.user)
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> Result<User, ApiError> {
        let body = VerifyEmailRequest {
            email: email.to_string(),
            code: code.to_string(),
        };
        let auth: AuthResponse = self.send_json(Endpoint::verify_email(), &body).await?;
        self.credentials
            .save(&auth.access_token, &auth.refresh_token);
        info!(user_id = auth.user.id, "Email verified");
        Ok(auth.user)
    }

    // ===== Profile =====

    pub async fn me(&self) -> Result<User, ApiError> {
        self.get_json(Endpoint::me()).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        self.send_json(Endpoint::update_profile(), update).await
    }

    pub async fn upload_avatar(&self, image: FilePart) -> Result<UploadResponse, ApiError> {
        let body = MultipartBody::new().file(image);
        self.upload(Endpoint::upload_avatar(), &body).await
    }

    // ===== Posts =====

    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.get_json(Endpoint::posts()).await
    }

    pub async fn fetch_post(&self, id: i64) -> Result<Post, ApiError> {
        self.get_json(Endpoint::post(id)).await
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ApiError> {
        self.send_json(Endpoint::create_post(), post).await
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        self.send_empty(Endpoint::delete_post(id)).await
    }

    pub async fn upload_post_images(
        &self,
        id: i64,
        images: Vec<FilePart>,
    ) -> Result<UploadResponse, ApiError> {
        let mut body = MultipartBody::new();
        for image in images {
            body = body.file(image);
        }
        self.upload(Endpoint::upload_post_images(id), &body).await
    }

    // ===== Bookings =====

    pub async fn fetch_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.get_json(Endpoint::bookings()).await
    }

    pub async fn request_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.send_json(Endpoint::create_booking(), booking).await
    }

    pub async fn update_booking(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Booking, ApiError> {
        let body = serde_json::json!({ "status": status.wire_name() });
        self.send_json(Endpoint::update_booking(id), &body).await
    }

    // ===== Reviews =====

    pub async fn fetch_reviews(&self, post_id: i64) -> Result<Vec<Review>, ApiError> {
        self.get_json(Endpoint::post_reviews(post_id)).await
    }

    pub async fn submit_review(
        &self,
        post_id: i64,
        review: &NewReview,
    ) -> Result<Review, ApiError> {
        self.send_json(Endpoint::create_review(post_id), review).await
    }

    // ===== Request pipeline =====

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, ApiError> {
        let response = self.dispatch(&endpoint, Payload::Empty).await?;
        decode(&response)
    }

    async fn send_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = Payload::json(body)?;
        let response = self.dispatch(&endpoint, payload).await?;
        decode(&response)
    }

    async fn send_empty(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        self.dispatch(&endpoint, Payload::Empty).await?;
        Ok(())
    }

    async fn upload<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        body: &MultipartBody,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(&endpoint, Payload::multipart(body)).await?;
        decode(&response)
    }

    /// Send one logical request. Attaches the current access token when the
    /// endpoint wants one, and on a first-pass 401 refreshes the session and
    /// replays once. The replay's outcome is final, 401 included.
    async fn dispatch(
        &self,
        endpoint: &Endpoint,
        payload: Payload,
    ) -> Result<TransportResponse, ApiError> {
        let url = self.url_for(endpoint)?;
        let (content_type, body) = payload.into_wire();

        let mut attempt = Attempt::First;
        loop {
            let bearer = if endpoint.requires_auth {
                self.credentials.access_token()
            } else {
                None
            };

            debug!(
                method = %endpoint.method,
                path = %endpoint.path,
                attempt = ?attempt,
                authed = bearer.is_some(),
                "Sending request"
            );

            let request = TransportRequest {
                method: endpoint.method,
                url: url.clone(),
                bearer: bearer.clone(),
                content_type: content_type.clone(),
                body: body.clone(),
            };

            let response = self.transport.execute(request).await?;

            if response.is_success() {
                return Ok(response);
            }

            if response.status == 401 && endpoint.requires_auth && attempt == Attempt::First {
                debug!(path = %endpoint.path, "Access token rejected, refreshing session");
                self.refresh_session(bearer).await?;
                attempt = Attempt::Replay;
                continue;
            }

            warn!(
                status = response.status,
                path = %endpoint.path,
                message = %server_message(&response.body)
                    .unwrap_or_else(|| preview(&response.body)),
                "Request failed"
            );
            return Err(ApiError::from_status(response.status));
        }
    }

    fn url_for(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        Url::parse(&format!("{}{}", self.base_url, endpoint.path)).map_err(|_| ApiError::InvalidUrl)
    }

    /// Refresh the token pair, de-duplicating concurrent refreshes.
    ///
    /// `rejected` is the access token the 401'd request was sent with. The
    /// first caller through the gate performs the real refresh; later
    /// callers observe a different stored token and return immediately.
    /// A logout that lands while the round trip is in flight wins: the
    /// refreshed pair is discarded and the caller fails out.
    async fn refresh_session(&self, rejected: Option<String>) -> Result<(), ApiError> {
        let _gate = self.refresh_gate.lock().await;

        let current = self.credentials.access_token();
        if current.is_some() && current != rejected {
            debug!("Session already refreshed by a concurrent request");
            return Ok(());
        }

        let refresh_token = match self.credentials.refresh_token() {
            Some(token) => token,
            None => {
                warn!("No refresh token stored, ending session");
                self.credentials.clear();
                return Err(ApiError::Unauthorized);
            }
        };

        match self.request_new_tokens(&refresh_token).await {
            Ok((access_token, new_refresh_token)) => {
                // Logout can land while the round trip is in flight. Only
                // save when the store still holds the token this refresh
                // consumed; a cleared or replaced store stays as it is.
                if self.credentials.refresh_token().as_deref() != Some(refresh_token.as_str()) {
                    warn!("Session ended during refresh, discarding new tokens");
                    return Err(ApiError::Unauthorized);
                }
                self.credentials.save(&access_token, &new_refresh_token);
                info!("Session tokens refreshed");
                Ok(())
            }
            Err(error) => {
                warn!(error = %error, "Token refresh failed, ending session");
                self.credentials.clear();
                Err(ApiError::Unauthorized)
            }
        }
    }

    /// One round trip to the refresh endpoint. Deliberately not routed
    /// through `dispatch`: a 401 here must not trigger another refresh.
    async fn request_new_tokens(&self, refresh_token: &str) -> Result<(String, String), ApiError> {
        let endpoint = Endpoint::refresh();
        let url = self.url_for(&endpoint)?;
        let body = RefreshRequest {
            refresh_token: refresh_token.to_string(),
        };
        let bytes =
            serde_json::to_vec(&body).map_err(|error| ApiError::Encoding(error.to_string()))?;

        let request = TransportRequest {
            method: endpoint.method,
            url,
            bearer: None,
            content_type: Some(CONTENT_TYPE_JSON.to_string()),
            body: Some(bytes),
        };

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(ApiError::from_status(response.status));
        }

        let parsed: RefreshResponse = decode(&response)?;
        // An unrotated refresh token stays valid; keep the one we sent.
        let new_refresh = parsed
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string());
        Ok((parsed.access_token, new_refresh))
    }
}

// ===== Response helpers =====

fn decode<T: DeserializeOwned>(response: &TransportResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|error| {
        warn!(error = %error, body = %preview(&response.body), "Failed to decode response");
        ApiError::Decoding(error.to_string())
    })
}

/// Server-provided message from an error body, when it parses as one.
fn server_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiMessage>(body)
        .ok()
        .and_then(|message| message.message)
}

/// Clip a response body for log output.
fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(LOG_BODY_PREVIEW_CHARS)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::TransportError;
    use crate::auth::MemoryCredentials;

    struct NoopTransport;

    #[async_trait::async_trait]
    impl HttpTransport for NoopTransport {
        async fn execute(
            &self,
            _request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            Ok(TransportResponse {
                status: 200,
                body: Vec::new(),
            })
        }
    }

    struct UnreachableTransport;

    #[async_trait::async_trait]
    impl HttpTransport for UnreachableTransport {
        async fn execute(
            &self,
            _request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            panic!("no request should reach the wire");
        }
    }

    /// A body with no JSON form, for exercising the encoding failure path.
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("no wire form"))
        }
    }

    fn client_with_base(base_url: &str) -> ApiClient {
        ApiClient::with_parts(
            Arc::new(NoopTransport),
            Arc::new(MemoryCredentials::new()),
            base_url,
        )
    }

    #[test]
    fn test_url_for_joins_base_and_path() {
        let client = client_with_base("https://api.pawlink.app/v1");
        let url = client.url_for(&Endpoint::post(42)).unwrap();
        assert_eq!(url.as_str(), "https://api.pawlink.app/v1/posts/42");
    }

    #[test]
    fn test_url_for_rejects_unparseable_base() {
        let client = client_with_base("not a url");
        let error = client.url_for(&Endpoint::me()).unwrap_err();
        assert!(matches!(error, ApiError::InvalidUrl));
    }

    #[test]
    fn test_with_parts_strips_trailing_slash() {
        let client = client_with_base("https://api.pawlink.app/v1/");
        let url = client.url_for(&Endpoint::me()).unwrap();
        assert_eq!(url.as_str(), "https://api.pawlink.app/v1/users/me");
    }

    #[test]
    fn test_json_payload_carries_json_content_type() {
        let payload = Payload::json(&serde_json::json!({"a": 1})).unwrap();
        let (content_type, body) = payload.into_wire();
        assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE_JSON));
        assert_eq!(body.as_deref(), Some(br#"{"a":1}"#.as_slice()));
    }

    #[tokio::test]
    async fn test_unencodable_body_fails_before_any_send() {
        let client = ApiClient::with_parts(
            Arc::new(UnreachableTransport),
            Arc::new(MemoryCredentials::new()),
            "https://api.pawlink.app/v1",
        );
        let error = client
            .send_json::<User, _>(Endpoint::create_post(), &Unserializable)
            .await
            .unwrap_err();
        assert!(matches!(error, ApiError::Encoding(_)));
    }

    #[test]
    fn test_server_message_prefers_backend_text() {
        let body = br#"{"success": false, "message": "post not found"}"#;
        assert_eq!(server_message(body).as_deref(), Some("post not found"));
        assert!(server_message(b"<html>oops</html>").is_none());
    }
}
