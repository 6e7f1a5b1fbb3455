//! User model and role predicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of dashboard roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Apprentice,
    Ssp,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Apprentice => "apprentice",
            Role::Ssp => "ssp",
            Role::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "apprentice" => Some(Role::Apprentice),
            "ssp" => Some(Role::Ssp),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// French label shown in the dashboard.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Apprentice => "Apprenti(e)",
            Role::Ssp => "Service Socio-Pro",
            Role::Admin => "Administrateur",
        }
    }
}

/// Check whether a (possibly absent) user holds one of the given roles.
pub fn has_role(user: Option<&User>, roles: &[Role]) -> bool {
    user.map(|u| roles.contains(&u.role)).unwrap_or(false)
}

/// A dashboard user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Request body for creating a new user (admin only).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Request body for updating an existing user (admin only).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Request body for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login: a bearer token and the authenticated user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Request body for a user updating their own profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "u1".to_string(),
            email: "u1@btpcfa.fr".to_string(),
            name: "Test".to_string(),
            role,
            avatar: None,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_has_role_no_user() {
        assert!(!has_role(None, &[Role::Apprentice, Role::Ssp, Role::Admin]));
    }

    #[test]
    fn test_has_role_membership() {
        let ssp = user(Role::Ssp);
        assert!(has_role(Some(&ssp), &[Role::Ssp, Role::Admin]));
        assert!(!has_role(Some(&ssp), &[Role::Apprentice]));
        assert!(!has_role(Some(&ssp), &[]));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Apprentice, Role::Ssp, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()), Some(role));
        }
        assert_eq!(Role::from_str("superuser"), None);
    }
}
