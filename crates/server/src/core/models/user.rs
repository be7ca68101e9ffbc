use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::validate::not_blank;

/// Account record as persisted, including the bcrypt hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Public user info (no password)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            date: user.date,
        }
    }
}

/// Owner reference embedded in populated profile views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub avatar: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct RegisterInput {
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginInput {
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_info_hides_password() {
        let user = User {
            id: "u1".into(),
            name: "A".into(),
            email: "a@x.com".into(),
            password: "$2b$04$hash".into(),
            avatar: "https://www.gravatar.com/avatar/x".into(),
            date: Utc::now(),
        };
        let json = serde_json::to_value(UserInfo::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], "u1");
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn test_register_rules() {
        assert!(ok_input().validate().is_ok());

        let short = RegisterInput {
            password: "12345".into(),
            ..ok_input()
        };
        let errors = short.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));

        let missing: RegisterInput = serde_json::from_str("{}").unwrap();
        let errors = missing.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);

        let blank_name = RegisterInput {
            name: "   ".into(),
            ..ok_input()
        };
        let errors = blank_name.validate().unwrap_err();
        let name_errors = errors.field_errors()["name"];
        assert_eq!(name_errors[0].message.as_deref(), Some("Name is required"));
    }

    fn ok_input() -> RegisterInput {
        RegisterInput {
            name: "A".into(),
            email: "a@x.com".into(),
            password: "secret1".into(),
        }
    }

    #[test]
    fn test_login_rules() {
        let bad = LoginInput {
            email: "not-an-email".into(),
            password: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }
}
