//! Payment aggregate (PaymentLedger)

pub mod ledger;
pub mod model;

pub use model::{
    refund_amount, CashReceipt, GatewayReceipt, Payment, PaymentMeta, PaymentMethod,
    PaymentStatus, Refund, NO_SHOW_REFUND_PERCENT,
};
