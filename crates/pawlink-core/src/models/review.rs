use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub post_id: i64,
    pub author: User,
    /// 1 to 5 inclusive
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Star bar for list views: "★★★★☆"
    pub fn stars(&self) -> String {
        let filled = usize::from(self.rating.min(5));
        let mut bar = "★".repeat(filled);
        bar.push_str(&"☆".repeat(5 - filled));
        bar
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewReview {
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NewReview {
    /// Build a review, clamping the rating into the 1..=5 range.
    pub fn new(rating: u8, comment: Option<String>) -> Self {
        Self {
            rating: rating.clamp(1, 5),
            comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_renders_five_slots() {
        let review = Review {
            id: 1,
            post_id: 2,
            author: User {
                id: 3,
                name: "Sam Ortiz".to_string(),
                email: "sam@example.com".to_string(),
                role: "user".to_string(),
                avatar_url: None,
                phone: None,
                bio: None,
            },
            rating: 4,
            comment: None,
            created_at: Utc::now(),
        };
        assert_eq!(review.stars(), "★★★★☆");
    }

    #[test]
    fn test_new_review_clamps_rating() {
        assert_eq!(NewReview::new(0, None).rating, 1);
        assert_eq!(NewReview::new(9, None).rating, 5);
        assert_eq!(NewReview::new(3, None).rating, 3);
    }
}
