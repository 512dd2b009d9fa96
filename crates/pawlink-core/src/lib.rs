//! Pawlink core - networking and session layer of the Pawlink app.
//!
//! The crate centers on two pieces:
//!
//! - [`auth::CredentialStore`]: durable storage for the access/refresh
//!   token pair (OS keychain, encrypted file, or in-memory).
//! - [`api::ApiClient`]: the authenticated request pipeline. It attaches
//!   the stored access token as a bearer header, and when the server
//!   answers 401 on a first attempt it refreshes the token pair and
//!   replays the request exactly once.
//!
//! UI layers consume the typed call surface on `ApiClient` (`login`,
//! `fetch_posts`, `request_booking`, ...) and never touch tokens directly.
//!
//! ```no_run
//! use pawlink_core::{ApiClient, ApiConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ApiClient::new(&ApiConfig::from_env())?;
//! let user = client.login("ana@example.com", "hunter2").await?;
//! let posts = client.fetch_posts().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{
    ApiClient, ApiError, Endpoint, FilePart, HttpTransport, Method, MultipartBody,
    TransportError, TransportRequest, TransportResponse,
};
pub use auth::{CredentialStore, KeyringCredentials, MemoryCredentials, VaultCredentials};
pub use config::ApiConfig;
