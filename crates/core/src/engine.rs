//! The FairSwap engine: pool registry plus the public operations.
//!
//! Every mutating operation follows the same shape: resolve state, compute
//! the full effect with the numeric kernel, enforce the economic guards,
//! settle assets through the [`TokenBank`], and only then commit reserves
//! and positions in one step. A failure at any point returns the engine
//! bit-for-bit unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fairswap_math::{
    amounts_for_burn, amounts_for_deposit, invariant_holds, liquidity_to_mint, quote, safe_add,
    safe_sub,
};
use fairswap_types::{
    pool_id_for, position_id_for, Address, EngineError, EngineResult, PoolId, PositionId,
    FEE_DENOMINATOR,
};

use crate::bank::TokenBank;
use crate::pool::Pool;

/// Outcome of a successful `add_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityReceipt {
    /// Token0 actually deposited (may be below the desired amount)
    pub amount0: u128,
    /// Token1 actually deposited
    pub amount1: u128,
    /// Liquidity shares credited to the caller's position
    pub liquidity_minted: u128,
    /// Native value returned to the caller
    pub refund: u128,
}

/// Outcome of a successful `remove_liquidity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityReceipt {
    /// Token0 paid out
    pub amount0: u128,
    /// Token1 paid out
    pub amount1: u128,
    /// Liquidity shares burned from the caller's position
    pub liquidity_burned: u128,
}

/// Outcome of a successful `swap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    /// Output amount paid to the caller
    pub output_amount: u128,
    /// Fee taken from the input, retained by the pool
    pub fee_paid: u128,
    /// Native value returned to the caller
    pub refund: u128,
}

/// The exchange engine: a registry of pools keyed by deterministic ids.
///
/// `address` is the engine's settlement identity, the custody account that
/// inbound transfers credit; it appears in transfer-failure errors so
/// callers see all parties of the failed leg.
#[derive(Debug)]
pub struct Engine {
    address: Address,
    pools: HashMap<PoolId, Pool>,
}

impl Engine {
    pub fn new(address: Address) -> Self {
        Engine {
            address,
            pools: HashMap::new(),
        }
    }

    /// The engine's settlement address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Normalize a token pair and derive its pool id without touching state.
    ///
    /// Returns the id and the canonical `(token0, token1)` ordering.
    pub fn pool_id(token_a: Address, token_b: Address, fee: u32) -> (PoolId, Address, Address) {
        pool_id_for(token_a, token_b, fee)
    }

    /// Read-only pool lookup.
    pub fn pool(&self, pool_id: PoolId) -> Option<&Pool> {
        self.pools.get(&pool_id)
    }

    /// Register a new pool for an unordered token pair and fee.
    ///
    /// Argument order is irrelevant: tokens are normalized before the id is
    /// derived, so `(a, b, fee)` and `(b, a, fee)` name the same pool.
    pub fn create_pool(
        &mut self,
        token_a: Address,
        token_b: Address,
        fee: u32,
    ) -> EngineResult<PoolId> {
        if fee >= FEE_DENOMINATOR {
            return Err(EngineError::InvalidFee { fee });
        }

        let (pool_id, token0, token1) = pool_id_for(token_a, token_b, fee);
        if self.pools.contains_key(&pool_id) {
            return Err(EngineError::PoolAlreadyExists { pool_id });
        }

        self.pools.insert(pool_id, Pool::new(token0, token1, fee));
        info!(%pool_id, %token0, %token1, fee, "pool created");
        Ok(pool_id)
    }

    /// Match desired deposit amounts to a pool's balances (pure view).
    ///
    /// Exposed so callers can preview a deposit; `add_liquidity` applies the
    /// same computation against the pool's live reserves.
    pub fn get_liquidity_amounts(
        amount0_desired: u128,
        amount1_desired: u128,
        amount0_min: u128,
        amount1_min: u128,
        balance0: u128,
        balance1: u128,
    ) -> EngineResult<(u128, u128)> {
        amounts_for_deposit(
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
            balance0,
            balance1,
        )
    }

    /// Deterministic position id for an owner in a pool (pure view).
    pub fn get_position_id(pool_id: PoolId, owner: Address) -> PositionId {
        position_id_for(pool_id, owner)
    }

    /// Liquidity owned by `owner` in `pool_id`; zero when the position or
    /// even the pool does not exist (absence is a valid zero state).
    pub fn get_position_liquidity(&self, pool_id: PoolId, owner: Address) -> u128 {
        self.pools
            .get(&pool_id)
            .map(|pool| pool.position_liquidity(position_id_for(pool_id, owner)))
            .unwrap_or(0)
    }

    /// Deposit tokens into a pool and mint liquidity shares.
    ///
    /// Amounts are matched to the pool ratio with `amount0_min`/`amount1_min`
    /// as the slippage guard. When `token0` is the native coin its leg is
    /// funded from `attached`; any excess attached value is refunded within
    /// the operation.
    pub fn add_liquidity<B: TokenBank>(
        &mut self,
        bank: &mut B,
        caller: Address,
        attached: u128,
        pool_id: PoolId,
        amount0_desired: u128,
        amount1_desired: u128,
        amount0_min: u128,
        amount1_min: u128,
    ) -> EngineResult<AddLiquidityReceipt> {
        let pool = self
            .pools
            .get(&pool_id)
            .ok_or(EngineError::PoolDoesNotExist { pool_id })?;
        let (token0, token1) = (pool.token0(), pool.token1());

        // Compute the full effect before anything moves
        let (amount0, amount1) = amounts_for_deposit(
            amount0_desired,
            amount1_desired,
            amount0_min,
            amount1_min,
            pool.reserve0(),
            pool.reserve1(),
        )?;
        let liquidity_minted = liquidity_to_mint(
            amount0,
            amount1,
            pool.reserve0(),
            pool.reserve1(),
            pool.total_liquidity(),
        )?;
        let new_reserve0 = safe_add(pool.reserve0(), amount0)?;
        let new_reserve1 = safe_add(pool.reserve1(), amount1)?;
        let new_total = safe_add(pool.total_liquidity(), liquidity_minted)?;

        let refund =
            self.settle_in(bank, caller, attached, &[(token0, amount0), (token1, amount1)])?;

        // Commit
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or(EngineError::PoolDoesNotExist { pool_id })?;
        pool.reserve0 = new_reserve0;
        pool.reserve1 = new_reserve1;
        pool.total_liquidity = new_total;
        let position_id = position_id_for(pool_id, caller);
        pool.credit_position(position_id, liquidity_minted);

        info!(%pool_id, owner = %caller, liquidity = liquidity_minted, "liquidity minted");
        Ok(AddLiquidityReceipt {
            amount0,
            amount1,
            liquidity_minted,
            refund,
        })
    }

    /// Burn liquidity shares and withdraw the proportional reserve amounts.
    ///
    /// Amounts floor, so rounding dust stays with the pool. Native token0 is
    /// unwrapped and paid as native value.
    pub fn remove_liquidity<B: TokenBank>(
        &mut self,
        bank: &mut B,
        caller: Address,
        pool_id: PoolId,
        liquidity_to_remove: u128,
    ) -> EngineResult<RemoveLiquidityReceipt> {
        let pool = self
            .pools
            .get(&pool_id)
            .ok_or(EngineError::PoolDoesNotExist { pool_id })?;
        let (token0, token1) = (pool.token0(), pool.token1());

        let position_id = position_id_for(pool_id, caller);
        let owned = pool.position_liquidity(position_id);
        if liquidity_to_remove > owned {
            return Err(EngineError::InsufficientLiquidityOwned {
                requested: liquidity_to_remove,
                owned,
            });
        }

        let (amount0, amount1) = amounts_for_burn(
            liquidity_to_remove,
            pool.reserve0(),
            pool.reserve1(),
            pool.total_liquidity(),
        )?;
        let new_reserve0 = safe_sub(pool.reserve0(), amount0)?;
        let new_reserve1 = safe_sub(pool.reserve1(), amount1)?;
        let new_total = safe_sub(pool.total_liquidity(), liquidity_to_remove)?;

        self.settle_out(bank, caller, &[(token0, amount0), (token1, amount1)])?;

        // Commit
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or(EngineError::PoolDoesNotExist { pool_id })?;
        pool.reserve0 = new_reserve0;
        pool.reserve1 = new_reserve1;
        pool.total_liquidity = new_total;
        pool.debit_position(position_id, liquidity_to_remove);

        info!(%pool_id, owner = %caller, liquidity = liquidity_to_remove, "liquidity burned");
        Ok(RemoveLiquidityReceipt {
            amount0,
            amount1,
            liquidity_burned: liquidity_to_remove,
        })
    }

    /// Swap an exact input for the constant-product output.
    ///
    /// `zero_for_one` selects the direction (true means token0 is the
    /// input). The full input, fee included, enters the pool; the output is
    /// checked against `min_output_amount` and the post-swap reserve product
    /// must not decrease.
    pub fn swap<B: TokenBank>(
        &mut self,
        bank: &mut B,
        caller: Address,
        attached: u128,
        pool_id: PoolId,
        input_amount: u128,
        min_output_amount: u128,
        zero_for_one: bool,
    ) -> EngineResult<SwapReceipt> {
        let pool = self
            .pools
            .get(&pool_id)
            .ok_or(EngineError::PoolDoesNotExist { pool_id })?;

        // An empty pool would price everything at zero and accumulate input
        // against no outstanding shares
        if pool.total_liquidity() == 0 {
            return Err(EngineError::InsufficientLiquidity);
        }

        let (reserve_in, reserve_out, token_in, token_out) = if zero_for_one {
            (pool.reserve0(), pool.reserve1(), pool.token0(), pool.token1())
        } else {
            (pool.reserve1(), pool.reserve0(), pool.token1(), pool.token0())
        };

        let priced = quote(input_amount, reserve_in, reserve_out, pool.fee())?;
        if priced.output < min_output_amount {
            return Err(EngineError::TooMuchSlippage {
                output: priced.output,
                min_output: min_output_amount,
            });
        }

        let new_reserve_in = safe_add(reserve_in, input_amount)?;
        let new_reserve_out = safe_sub(reserve_out, priced.output)?;
        if !invariant_holds(reserve_in, reserve_out, new_reserve_in, new_reserve_out) {
            return Err(EngineError::InvariantViolation);
        }

        let refund = self.settle_in(bank, caller, attached, &[(token_in, input_amount)])?;
        self.settle_out(bank, caller, &[(token_out, priced.output)])?;

        // Commit
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or(EngineError::PoolDoesNotExist { pool_id })?;
        if zero_for_one {
            pool.reserve0 = new_reserve_in;
            pool.reserve1 = new_reserve_out;
        } else {
            pool.reserve1 = new_reserve_in;
            pool.reserve0 = new_reserve_out;
        }

        info!(
            %pool_id,
            user = %caller,
            input_amount,
            output_amount = priced.output,
            fee_paid = priced.fee_paid,
            zero_for_one,
            "swap executed"
        );
        Ok(SwapReceipt {
            output_amount: priced.output,
            fee_paid: priced.fee_paid,
            refund,
        })
    }

    /// Draw the inbound legs of an operation from the caller.
    ///
    /// Native legs (the zero-address token) are funded from the attached
    /// value; ERC-20 legs are pulled through the bank. Whatever attached
    /// value the legs do not consume is refunded before this returns, and a
    /// failed refund is its own fatal error since unreturned native value is
    /// a direct loss of caller funds.
    fn settle_in<B: TokenBank>(
        &self,
        bank: &mut B,
        caller: Address,
        attached: u128,
        legs: &[(Address, u128)],
    ) -> EngineResult<u128> {
        let native_required: u128 = legs
            .iter()
            .filter(|(token, _)| token.is_zero())
            .map(|(_, amount)| amount)
            .sum();

        if attached < native_required {
            return Err(EngineError::FailedOrInsufficientTokenTransfer {
                token: Address::ZERO,
                from: caller,
                to: self.address,
                amount: native_required,
            });
        }

        // The attached value arrives with the call; draw it into custody so
        // the refund and any native leg are fully funded.
        if attached > 0 && !bank.pull(Address::ZERO, caller, attached) {
            return Err(EngineError::FailedOrInsufficientTokenTransfer {
                token: Address::ZERO,
                from: caller,
                to: self.address,
                amount: attached,
            });
        }

        for &(token, amount) in legs {
            if token.is_zero() || amount == 0 {
                continue;
            }
            if !bank.pull(token, caller, amount) {
                return Err(EngineError::FailedOrInsufficientTokenTransfer {
                    token,
                    from: caller,
                    to: self.address,
                    amount,
                });
            }
        }

        let refund = attached - native_required;
        if refund > 0 {
            debug!(to = %caller, refund, "returning extra native value");
            if !bank.pay_native(caller, refund) {
                return Err(EngineError::FailedToReturnExtraEth {
                    to: caller,
                    amount: refund,
                });
            }
        }

        Ok(refund)
    }

    /// Pay the outbound legs of an operation to the caller, unwrapping the
    /// native token where applicable.
    fn settle_out<B: TokenBank>(
        &self,
        bank: &mut B,
        to: Address,
        legs: &[(Address, u128)],
    ) -> EngineResult<()> {
        for &(token, amount) in legs {
            if amount == 0 {
                continue;
            }
            let sent = if token.is_zero() {
                bank.pay_native(to, amount)
            } else {
                bank.push(token, to, amount)
            };
            if !sent {
                return Err(EngineError::FailedOrInsufficientTokenTransfer {
                    token,
                    from: self.address,
                    to,
                    amount,
                });
            }
        }
        Ok(())
    }
}
