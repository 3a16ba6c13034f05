//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Books slots
    Customer,
    /// Registers and manages parking spaces
    Owner,
    /// Full administrative access
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "owner" => Some(Self::Owner),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A service user. Authentication is handled by the presentation layer;
/// the core only carries identity and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID
    pub id: String,
    pub email: String,
    pub phone: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            phone: phone.into(),
            name: name.into(),
            role,
            created_at: Utc::now(),
        }
    }
}
