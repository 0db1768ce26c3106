//! Protocol constants.

/// Denominator for pool fees: fees are expressed in parts per million.
///
/// A pool created with fee `1000` charges 0.10% on every swap input. Pool
/// creation rejects fees at or above this denominator.
pub const FEE_DENOMINATOR: u32 = 1_000_000;
