use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Account role as reported by the backend ("user", "sitter", "admin")
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl User {
    pub fn is_sitter(&self) -> bool {
        self.role.eq_ignore_ascii_case("sitter")
    }

    /// First name only, for compact greetings
    pub fn short_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    pub fn has_avatar(&self) -> bool {
        self.avatar_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Fields a user can change about themselves. `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Maria Santos".to_string(),
            email: "maria@example.com".to_string(),
            role: "sitter".to_string(),
            avatar_url: None,
            phone: None,
            bio: None,
        }
    }

    #[test]
    fn test_short_name_takes_first_word() {
        assert_eq!(sample_user().short_name(), "Maria");
    }

    #[test]
    fn test_role_check_ignores_case() {
        let mut user = sample_user();
        user.role = "Sitter".to_string();
        assert!(user.is_sitter());
        user.role = "user".to_string();
        assert!(!user.is_sitter());
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("Dog person".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"bio":"Dog person"}"#);
    }
}
