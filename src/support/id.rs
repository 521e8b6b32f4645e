//! Prefixed identifiers

use uuid::Uuid;

pub const USER: &str = "usr";
pub const RESERVATION: &str = "res";
pub const PAYMENT: &str = "pay";
pub const BLOCK: &str = "blk";
pub const AUDIT: &str = "aud";
pub const NOTIFICATION: &str = "ntf";
pub const GATEWAY_OPERATION: &str = "gw";

/// Generate a new id of the form `<prefix>_<32 hex chars>`.
pub fn new_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}
