//! Audit trail entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::support::id::{new_id, AUDIT};

/// What kind of action an audit entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    Seed,
    Config,
    Court,
    Register,
    Login,
    Account,
    Block,
    Unblock,
    Reservation,
    Payment,
    NoShow,
    Admin,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Config => "Config",
            Self::Court => "Court",
            Self::Register => "Register",
            Self::Login => "Login",
            Self::Account => "Account",
            Self::Block => "Block",
            Self::Unblock => "Unblock",
            Self::Reservation => "Reservation",
            Self::Payment => "Payment",
            Self::NoShow => "NoShow",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable record of who did what, when
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub at: DateTime<Utc>,
    pub by: String,
    pub action: AuditAction,
    pub detail: String,
}

impl AuditEntry {
    pub fn new(
        by: impl Into<String>,
        action: AuditAction,
        detail: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(AUDIT),
            at,
            by: by.into(),
            action,
            detail: detail.into(),
        }
    }
}
