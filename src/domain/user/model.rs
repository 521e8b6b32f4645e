use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    User,
}

/// Pricing tier, fixed at registration by the socio lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Socio,
    NoSocio,
}

impl UserType {
    pub fn from_socio_active(socio_active: bool) -> Self {
        if socio_active {
            Self::Socio
        } else {
            Self::NoSocio
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Socio => "Socio",
            Self::NoSocio => "No Socio",
        }
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: UserRole,
    pub email: String,
    pub phone: String,
    pub dni: String,
    pub user_type: UserType,
    pub password_hash: String,
    pub is_email_validated: bool,
    pub is_phone_validated: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Case-insensitive email match
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}
