//! Deterministic pool and position identifiers.
//!
//! Identifiers are Keccak-256 content hashes over canonically ordered
//! inputs: the same unordered token pair and fee always resolve to the same
//! pool id, regardless of argument order.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::address::Address;

/// Identifier of a pool: hash of `(token0, token1, fee)` with tokens in
/// canonical (bytewise ascending) order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PoolId(pub [u8; 32]);

/// Identifier of one owner's position in a pool: hash of `(pool_id, owner)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PositionId(pub [u8; 32]);

impl PoolId {
    /// The all-zero id. Never produced by [`pool_id_for`], so it is a handy
    /// stand-in for an unregistered pool.
    pub const ZERO: PoolId = PoolId([0u8; 32]);

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl PositionId {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Normalize a token pair into canonical order and derive the pool id.
///
/// Returns the id together with the canonical `(token0, token1)` ordering,
/// so callers never have to sort tokens themselves.
pub fn pool_id_for(token_a: Address, token_b: Address, fee: u32) -> (PoolId, Address, Address) {
    let (token0, token1) = if token_a <= token_b {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    let mut hasher = Keccak256::new();
    hasher.update(token0.as_bytes());
    hasher.update(token1.as_bytes());
    hasher.update(fee.to_be_bytes());

    (PoolId(hasher.finalize().into()), token0, token1)
}

/// Derive the position id for an owner's stake in a pool.
pub fn position_id_for(pool_id: PoolId, owner: Address) -> PositionId {
    let mut hasher = Keccak256::new();
    hasher.update(pool_id.as_bytes());
    hasher.update(owner.as_bytes());
    PositionId(hasher.finalize().into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(tag: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = tag;
        Address::new(bytes)
    }

    #[test]
    fn test_pool_id_is_order_independent() {
        let (id_ab, token0, token1) = pool_id_for(addr(1), addr(2), 1000);
        let (id_ba, token0_rev, token1_rev) = pool_id_for(addr(2), addr(1), 1000);

        assert_eq!(id_ab, id_ba);
        assert_eq!(token0, token0_rev);
        assert_eq!(token1, token1_rev);
        assert_eq!(token0, addr(1));
        assert_eq!(token1, addr(2));
    }

    #[test]
    fn test_pool_id_varies_with_fee() {
        let (id_low, _, _) = pool_id_for(addr(1), addr(2), 500);
        let (id_high, _, _) = pool_id_for(addr(1), addr(2), 1000);
        assert_ne!(id_low, id_high);
    }

    #[test]
    fn test_native_token_sorts_first() {
        let (_, token0, token1) = pool_id_for(addr(7), Address::ZERO, 1000);
        assert!(token0.is_zero());
        assert_eq!(token1, addr(7));
    }

    #[test]
    fn test_position_id_depends_on_owner() {
        let (pool_id, _, _) = pool_id_for(addr(1), addr(2), 1000);
        assert_ne!(
            position_id_for(pool_id, addr(3)),
            position_id_for(pool_id, addr(4))
        );
    }

    #[test]
    fn test_ids_serde_round_trip() {
        let (pool_id, token0, _) = pool_id_for(addr(1), addr(2), 1_000);
        let json = serde_json::to_string(&pool_id).unwrap();
        let back: PoolId = serde_json::from_str(&json).unwrap();
        assert_eq!(pool_id, back);

        let json = serde_json::to_string(&token0).unwrap();
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(token0, back);
    }

    #[test]
    fn test_derived_ids_are_never_zero() {
        let (pool_id, _, _) = pool_id_for(Address::ZERO, Address::ZERO, 0);
        assert_ne!(pool_id, PoolId::ZERO);
    }
}
