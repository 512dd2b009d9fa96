use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

/// Service category for sorting and filtering posts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Walking,
    Sitting,
    Boarding,
    Grooming,
    Training,
    Other,
}

impl ServiceKind {
    /// Parse a service string into a ServiceKind enum value.
    /// Handles variations like "dog walking", "Pet Sitting", etc.
    pub fn from_str(s: Option<&str>) -> Self {
        match s {
            Some(kind) => {
                let lower = kind.to_lowercase();
                if lower.contains("walk") {
                    ServiceKind::Walking
                } else if lower.contains("sit") {
                    ServiceKind::Sitting
                } else if lower.contains("board") {
                    ServiceKind::Boarding
                } else if lower.contains("groom") {
                    ServiceKind::Grooming
                } else if lower.contains("train") {
                    ServiceKind::Training
                } else {
                    ServiceKind::Other
                }
            }
            None => ServiceKind::Other,
        }
    }

    /// Get the display name for this service kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Walking => "Dog Walking",
            ServiceKind::Sitting => "Pet Sitting",
            ServiceKind::Boarding => "Boarding",
            ServiceKind::Grooming => "Grooming",
            ServiceKind::Training => "Training",
            ServiceKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw service string from the backend; use `kind()` for matching
    #[serde(default)]
    pub service_type: Option<String>,
    /// Price per unit of service, in cents
    #[serde(default)]
    pub price_cents: i64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    pub author: User,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn kind(&self) -> ServiceKind {
        ServiceKind::from_str(self.service_type.as_deref())
    }

    /// Price formatted for display: "$12.50", or "-$3.00" for a credit.
    pub fn price_display(&self) -> String {
        let sign = if self.price_cents < 0 { "-" } else { "" };
        let cents = self.price_cents.unsigned_abs();
        format!("{}${}.{:02}", sign, cents / 100, cents % 100)
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(|url| url.as_str())
    }

    /// Rating rounded for list views: "4.8" or "-" when unrated
    pub fn rating_display(&self) -> String {
        match self.rating {
            Some(rating) => format!("{:.1}", rating),
            None => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub service_type: String,
    pub price_cents: i64,
    pub city: String,
}

/// Returned by the image upload endpoints; one URL per uploaded part.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub urls: Vec<String>,
}

impl UploadResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.urls.first().map(|url| url.as_str())
    }
}
