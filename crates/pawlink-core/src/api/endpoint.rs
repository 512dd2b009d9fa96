//! Catalog of server endpoints.
//!
//! Every request the client can make starts from one of the constructors
//! below, so the full REST surface is visible in one place. An [`Endpoint`]
//! carries the relative path, the HTTP method, and whether the request
//! should carry the session's access token.

use std::fmt;

// ===== Methods =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== Endpoints =====

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub method: Method,
    pub requires_auth: bool,
}

impl Endpoint {
    fn open(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            requires_auth: false,
        }
    }

    fn protected(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            requires_auth: true,
        }
    }

    // ----- Auth -----

    pub fn login() -> Self {
        Self::open(Method::Post, "/auth/login")
    }

    pub fn signup() -> Self {
        Self::open(Method::Post, "/auth/signup")
    }

    pub fn verify_email() -> Self {
        Self::open(Method::Post, "/auth/verify-email")
    }

    /// Token refresh is authenticated by the refresh token in the body,
    /// not by a bearer header.
    pub fn refresh() -> Self {
        Self::open(Method::Post, "/auth/refresh")
    }

    // ----- Users -----

    pub fn me() -> Self {
        Self::protected(Method::Get, "/users/me")
    }

    pub fn update_profile() -> Self {
        Self::protected(Method::Put, "/users/me")
    }

    pub fn upload_avatar() -> Self {
        Self::protected(Method::Post, "/users/me/avatar")
    }

    // ----- Posts -----

    pub fn posts() -> Self {
        Self::protected(Method::Get, "/posts")
    }

    pub fn post(id: i64) -> Self {
        Self::protected(Method::Get, format!("/posts/{id}"))
    }

    pub fn create_post() -> Self {
        Self::protected(Method::Post, "/posts")
    }

    pub fn delete_post(id: i64) -> Self {
        Self::protected(Method::Delete, format!("/posts/{id}"))
    }

    pub fn upload_post_images(id: i64) -> Self {
        Self::protected(Method::Post, format!("/posts/{id}/images"))
    }

    // ----- Bookings -----

    pub fn bookings() -> Self {
        Self::protected(Method::Get, "/bookings")
    }

    pub fn create_booking() -> Self {
        Self::protected(Method::Post, "/bookings")
    }

    pub fn update_booking(id: i64) -> Self {
        Self::protected(Method::Patch, format!("/bookings/{id}"))
    }

    // ----- Reviews -----

    pub fn post_reviews(post_id: i64) -> Self {
        Self::protected(Method::Get, format!("/posts/{post_id}/reviews"))
    }

    pub fn create_review(post_id: i64) -> Self {
        Self::protected(Method::Post, format!("/posts/{post_id}/reviews"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_endpoints_are_open() {
        assert!(!Endpoint::login().requires_auth);
        assert!(!Endpoint::signup().requires_auth);
        assert!(!Endpoint::verify_email().requires_auth);
        assert!(!Endpoint::refresh().requires_auth);
    }

    #[test]
    fn test_resource_endpoints_require_auth() {
        assert!(Endpoint::me().requires_auth);
        assert!(Endpoint::posts().requires_auth);
        assert!(Endpoint::bookings().requires_auth);
        assert!(Endpoint::create_review(1).requires_auth);
    }

    #[test]
    fn test_paths_interpolate_ids() {
        assert_eq!(Endpoint::post(42).path, "/posts/42");
        assert_eq!(Endpoint::update_booking(7).path, "/bookings/7");
        assert_eq!(Endpoint::post_reviews(3).path, "/posts/3/reviews");
        assert_eq!(Endpoint::upload_post_images(9).path, "/posts/9/images");
    }
}
