//! Payment paired with each reservation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Share of the amount returned on a no-show
pub const NO_SHOW_REFUND_PERCENT: u64 = 50;

/// Payment status
///
/// `Pending → Approved → RefundedPartial`. `Rejected` is part of the
/// taxonomy but no command produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Approved,
    Rejected,
    RefundedPartial,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::RefundedPartial => "RefundedPartial",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Online payment through the gateway
    Gateway,
    /// Cash collected at the front desk
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gateway => "gateway",
            Self::Cash => "cash",
        }
    }
}

/// What the gateway hands back for an approved charge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayReceipt {
    pub operation_id: String,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashReceipt {
    pub by: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    pub percent: u64,
    pub amount: u64,
    pub by: String,
    pub at: DateTime<Utc>,
}

/// Free-form evidence attached to a payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash: Option<CashReceipt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund: Option<Refund>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub reservation_id: String,
    pub method: Option<PaymentMethod>,
    pub status: PaymentStatus,
    /// Equal to the reservation price, fixed at creation
    pub amount: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub meta: PaymentMeta,
}

impl Payment {
    pub fn pending(
        id: impl Into<String>,
        reservation_id: impl Into<String>,
        amount: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            reservation_id: reservation_id.into(),
            method: None,
            status: PaymentStatus::Pending,
            amount,
            created_at: now,
            updated_at: now,
            meta: PaymentMeta::default(),
        }
    }

    /// Approval replaces any earlier approval evidence.
    pub fn approve_via_gateway(&mut self, receipt: GatewayReceipt, now: DateTime<Utc>) {
        self.method = Some(PaymentMethod::Gateway);
        self.status = PaymentStatus::Approved;
        self.updated_at = now;
        self.meta = PaymentMeta {
            gateway: Some(receipt),
            ..PaymentMeta::default()
        };
    }

    /// Keep a receipt that arrived after the reservation closed. Status and
    /// method are left as they were.
    pub fn record_orphaned_charge(&mut self, receipt: GatewayReceipt, now: DateTime<Utc>) {
        self.updated_at = now;
        self.meta.gateway = Some(receipt);
    }

    pub fn approve_cash(&mut self, by: &str, now: DateTime<Utc>) {
        self.method = Some(PaymentMethod::Cash);
        self.status = PaymentStatus::Approved;
        self.updated_at = now;
        self.meta = PaymentMeta {
            cash: Some(CashReceipt {
                by: by.to_string(),
                at: now,
            }),
            ..PaymentMeta::default()
        };
    }

    /// Record a partial refund and return the refunded amount.
    pub fn refund_partial(&mut self, percent: u64, by: &str, now: DateTime<Utc>) -> u64 {
        let amount = refund_amount(self.amount, percent);
        self.status = PaymentStatus::RefundedPartial;
        self.updated_at = now;
        self.meta.refund = Some(Refund {
            percent,
            amount,
            by: by.to_string(),
            at: now,
        });
        amount
    }
}

/// `amount × percent / 100`, rounded half up. Computed in `u128` so any
/// configured price is safe.
pub fn refund_amount(amount: u64, percent: u64) -> u64 {
    let exact = (u128::from(amount) * u128::from(percent) + 50) / 100;
    u64::try_from(exact).unwrap_or(u64::MAX)
}
