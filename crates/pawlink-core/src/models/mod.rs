//! Data models for Pawlink entities.
//!
//! This module contains the wire structures exchanged with the backend:
//!
//! - `User`, `ProfileUpdate`: Accounts and profile edits
//! - Auth types: `AuthResponse`, `RefreshRequest`, `RefreshResponse`, etc.
//! - `Post`, `NewPost`, `ServiceKind`: Service listings
//! - `Booking`, `NewBooking`, `BookingStatus`: Booking requests
//! - `Review`, `NewReview`: Post reviews

pub mod auth;
pub mod booking;
pub mod post;
pub mod review;
pub mod user;

pub use auth::{
    ApiMessage, AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, SignupRequest,
    VerifyEmailRequest,
};
pub use booking::{Booking, BookingStatus, NewBooking};
pub use post::{NewPost, Post, ServiceKind, UploadResponse};
pub use review::{NewReview, Review};
pub use user::{ProfileUpdate, User};
