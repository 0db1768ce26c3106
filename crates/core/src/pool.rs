//! Pool state and the per-pool position ledger.

use std::collections::HashMap;

use fairswap_types::{Address, PositionId};

/// An isolated two-token reserve plus its accounting state.
///
/// `token0 < token1` in canonical byte order; both are immutable after
/// creation, as is the fee. The position ledger maps position ids to owned
/// liquidity shares; the sum of all entries always equals
/// `total_liquidity`.
#[derive(Debug, Clone)]
pub struct Pool {
    token0: Address,
    token1: Address,
    fee: u32,
    pub(crate) reserve0: u128,
    pub(crate) reserve1: u128,
    pub(crate) total_liquidity: u128,
    positions: HashMap<PositionId, u128>,
}

impl Pool {
    pub(crate) fn new(token0: Address, token1: Address, fee: u32) -> Self {
        Pool {
            token0,
            token1,
            fee,
            reserve0: 0,
            reserve1: 0,
            total_liquidity: 0,
            positions: HashMap::new(),
        }
    }

    pub fn token0(&self) -> Address {
        self.token0
    }

    pub fn token1(&self) -> Address {
        self.token1
    }

    pub fn fee(&self) -> u32 {
        self.fee
    }

    pub fn reserve0(&self) -> u128 {
        self.reserve0
    }

    pub fn reserve1(&self) -> u128 {
        self.reserve1
    }

    pub fn total_liquidity(&self) -> u128 {
        self.total_liquidity
    }

    /// Liquidity owned by a position; zero for positions never created.
    pub fn position_liquidity(&self, position_id: PositionId) -> u128 {
        self.positions.get(&position_id).copied().unwrap_or(0)
    }

    pub(crate) fn credit_position(&mut self, position_id: PositionId, liquidity: u128) {
        *self.positions.entry(position_id).or_insert(0) += liquidity;
    }

    /// Caller must have checked the position owns at least `liquidity`.
    pub(crate) fn debit_position(&mut self, position_id: PositionId, liquidity: u128) {
        if let Some(owned) = self.positions.get_mut(&position_id) {
            *owned -= liquidity;
        }
    }

    /// Sum of all recorded positions, for invariant checks in tests.
    pub fn positions_total(&self) -> u128 {
        self.positions.values().sum()
    }
}
