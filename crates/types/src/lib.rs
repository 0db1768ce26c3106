//! # FairSwap Types
//!
//! Shared identifiers, constants, and error types for the FairSwap engine:
//!
//! - 20-byte token/account addresses with the zero address reserved for the
//!   native coin
//! - Deterministic Keccak-256 pool and position identifiers
//! - Protocol constants (fee denominator)
//! - The engine error enum and result alias

pub mod address;
pub mod constants;
pub mod errors;
pub mod ids;

// Re-export commonly used items
pub use address::Address;
pub use constants::*;
pub use errors::{EngineError, EngineResult};
pub use ids::{pool_id_for, position_id_for, PoolId, PositionId};
