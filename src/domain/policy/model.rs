//! Club-wide booking policy

use serde::{Deserialize, Serialize};

/// How members authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMode {
    #[default]
    EmailPassword,
}

/// Global policy. Prices are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubPolicy {
    pub auth_mode: AuthMode,
    pub require_email_validation: bool,
    pub require_phone_validation: bool,
    pub price_socio: u64,
    pub price_no_socio: u64,
    pub currency: String,
}

impl Default for ClubPolicy {
    fn default() -> Self {
        Self {
            auth_mode: AuthMode::EmailPassword,
            require_email_validation: true,
            require_phone_validation: true,
            price_socio: 0,
            price_no_socio: 8000,
            currency: "ARS".to_string(),
        }
    }
}

/// Partial update of [`ClubPolicy`]. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<AuthMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_email_validation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_phone_validation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_socio: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_no_socio: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl PolicyPatch {
    pub fn apply_to(&self, policy: &mut ClubPolicy) {
        if let Some(mode) = self.auth_mode {
            policy.auth_mode = mode;
        }
        if let Some(v) = self.require_email_validation {
            policy.require_email_validation = v;
        }
        if let Some(v) = self.require_phone_validation {
            policy.require_phone_validation = v;
        }
        if let Some(v) = self.price_socio {
            policy.price_socio = v;
        }
        if let Some(v) = self.price_no_socio {
            policy.price_no_socio = v;
        }
        if let Some(ref v) = self.currency {
            policy.currency = v.clone();
        }
    }

    /// JSON rendering of the set fields, used as audit detail.
    pub fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_club_pricing() {
        let p = ClubPolicy::default();
        assert_eq!(p.price_socio, 0);
        assert_eq!(p.price_no_socio, 8000);
        assert_eq!(p.currency, "ARS");
        assert!(p.require_email_validation);
        assert!(p.require_phone_validation);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut p = ClubPolicy::default();
        let patch = PolicyPatch {
            price_no_socio: Some(9500),
            require_phone_validation: Some(false),
            ..Default::default()
        };
        patch.apply_to(&mut p);
        assert_eq!(p.price_no_socio, 9500);
        assert!(!p.require_phone_validation);
        assert_eq!(p.price_socio, 0);
        assert!(p.require_email_validation);
    }

    #[test]
    fn describe_lists_only_set_fields() {
        let patch = PolicyPatch {
            price_socio: Some(100),
            ..Default::default()
        };
        assert_eq!(patch.describe(), r#"{"price_socio":100}"#);
    }

    #[test]
    fn unknown_patch_fields_are_rejected() {
        let res: Result<PolicyPatch, _> = serde_json::from_str(r#"{"price_vip": 5}"#);
        assert!(res.is_err());
    }
}
