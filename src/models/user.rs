//! User accounts and the role taxonomy.

use serde::{Deserialize, Serialize};

/// Account roles understood by the client.
///
/// The backend's token claims sometimes carry a Spring-style `ROLE_` prefix
/// while its user payloads do not; [`Role::from_claim`] accepts both
/// spellings so the rest of the crate can match on one closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Provider,
    Admin,
}

impl Role {
    /// Normalize a raw role claim: strip an optional `ROLE_` prefix,
    /// upper-case the remainder, and map it onto the three known roles.
    pub fn from_claim(raw: &str) -> Option<Role> {
        let name = raw.trim().strip_prefix("ROLE_").unwrap_or(raw.trim());
        match name.to_uppercase().as_str() {
            "CLIENT" => Some(Role::Client),
            "PROVIDER" => Some(Role::Provider),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "CLIENT",
            Role::Provider => "PROVIDER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Role::from_claim(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown role: {raw}")))
    }
}

/// A platform account as returned by `/users/me` and `/admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

/// Partial update for `/users/update`. Only the populated fields are sent.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdate {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_claim_with_prefix_is_normalized() {
        assert_eq!(Role::from_claim("ROLE_PROVIDER"), Some(Role::Provider));
        assert_eq!(Role::from_claim("ROLE_CLIENT"), Some(Role::Client));
        assert_eq!(Role::from_claim("ROLE_ADMIN"), Some(Role::Admin));
    }

    #[test]
    fn role_claim_without_prefix_is_normalized() {
        assert_eq!(Role::from_claim("client"), Some(Role::Client));
        assert_eq!(Role::from_claim("Admin"), Some(Role::Admin));
        assert_eq!(Role::from_claim("PROVIDER"), Some(Role::Provider));
    }

    #[test]
    fn unknown_role_claim_is_rejected() {
        assert_eq!(Role::from_claim("ROLE_SUPERUSER"), None);
        assert_eq!(Role::from_claim(""), None);
    }

    #[test]
    fn user_deserializes_from_camel_case() {
        let user: User = serde_json::from_str(
            r#"{"id":4,"firstName":"Amira","lastName":"Ben","email":"amira@example.com",
                "phoneNumber":"0601020304","role":"ROLE_CLIENT"}"#,
        )
        .unwrap();
        assert_eq!(user.full_name(), "Amira Ben");
        assert_eq!(user.role, Role::Client);
        assert_eq!(user.phone.as_deref(), Some("0601020304"));
        assert!(user.active);
    }
}
