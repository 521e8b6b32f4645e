//! Audit aggregate (AuditLog)

pub mod model;

pub use model::{AuditAction, AuditEntry};
