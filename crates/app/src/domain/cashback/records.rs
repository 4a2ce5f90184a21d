//! Cashback Records

use jiff::Timestamp;
use storefront::cashback::CashbackPolicy;

/// Cashback Policy Record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashbackPolicyRecord {
    pub policy: CashbackPolicy,
    pub updated_at: Timestamp,
}
