use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Public user info as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub category: Option<Category>,
}

/// Body for admin post create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub body: String,
    pub category_id: u64,
}

/// Body for admin category create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub role: Role,
}

/// Login, register and refresh response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthGrant {
    pub access_token: String,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_profile_wire_format() {
        let user: UserProfile = serde_json::from_value(json!({
            "id": 1,
            "email": "a@b.c",
            "role": "ADMIN",
            "isActive": true,
            "createdAt": "2024-05-01T10:00:00"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.created_at.as_deref(), Some("2024-05-01T10:00:00"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["isActive"], json!(true));
        assert_eq!(back["role"], json!("ADMIN"));
    }

    #[test]
    fn test_user_profile_without_created_at_serializes_compactly() {
        let user = UserProfile {
            id: 1,
            email: "a@b.c".into(),
            role: Role::User,
            is_active: true,
            created_at: None,
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({ "id": 1, "email": "a@b.c", "role": "USER", "isActive": true })
        );
    }

    #[test]
    fn test_post_with_missing_category() {
        let post: Post = serde_json::from_value(json!({ "id": 3, "title": "Hi" })).unwrap();
        assert_eq!(post.body, "");
        assert!(post.category.is_none());
    }

    #[test]
    fn test_auth_grant_uses_camel_case() {
        let grant: AuthGrant = serde_json::from_value(json!({
            "accessToken": "tok",
            "user": { "id": 2, "email": "x@y.z", "role": "USER", "isActive": false }
        }))
        .unwrap();
        assert_eq!(grant.access_token, "tok");
        assert!(!grant.user.is_active);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "USER");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_post_payload_field_names() {
        let payload = PostPayload {
            title: "t".into(),
            body: "b".into(),
            category_id: 4,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({ "title": "t", "body": "b", "category_id": 4 })
        );
    }
}
