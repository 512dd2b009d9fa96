//! REST API client module for the Pawlink backend.
//!
//! This module provides the `ApiClient` for authenticated requests against
//! the Pawlink API: session endpoints, posts, bookings, reviews, and file
//! uploads.
//!
//! The API uses bearer token authentication with a refresh token pair;
//! expired access tokens are refreshed and the failed request replayed
//! once, transparently to callers.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod multipart;
pub mod transport;

pub use client::ApiClient;
pub use endpoint::{Endpoint, Method};
pub use error::ApiError;
pub use multipart::{FilePart, MultipartBody};
pub use transport::{
    HttpTransport, ReqwestTransport, TransportError, TransportRequest, TransportResponse,
};
