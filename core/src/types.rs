//! Shared primitive types used across the payout engine.

/// Integer currency units. Every money value in the engine is whole yen.
pub type Yen = i64;

/// 1 = most senior, 4 = most junior.
pub type TierLevel = u8;

pub type AgencyId = String;
pub type SaleId = String;
pub type ProductId = String;
