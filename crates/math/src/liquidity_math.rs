//! Proportional-ownership liquidity math.
//!
//! Deposits into a non-empty pool are scaled to the pool's current reserve
//! ratio; shares are minted in proportion to the deposit and burned back
//! into proportional reserve amounts. All divisions floor, so rounding dust
//! stays with the pool rather than the user.

use fairswap_types::{EngineError, EngineResult};

use crate::big_int::{mul_div, sqrt_u256, widening_mul, Rounding};

/// Match desired deposit amounts to the pool's current reserve ratio.
///
/// The first deposit into an empty pool sets the initial price and is taken
/// unchanged. Otherwise one side is scaled down to the pool ratio; whichever
/// amount was scaled is checked against its slippage minimum.
pub fn amounts_for_deposit(
    amount0_desired: u128,
    amount1_desired: u128,
    amount0_min: u128,
    amount1_min: u128,
    balance0: u128,
    balance1: u128,
) -> EngineResult<(u128, u128)> {
    if balance0 == 0 && balance1 == 0 {
        return Ok((amount0_desired, amount1_desired));
    }

    let amount1_optimal = mul_div(amount0_desired, balance1, balance0, Rounding::Down)?;
    if amount1_optimal <= amount1_desired {
        if amount1_optimal < amount1_min {
            return Err(EngineError::InsufficientAmount {
                amount: amount1_optimal,
                minimum: amount1_min,
            });
        }
        Ok((amount0_desired, amount1_optimal))
    } else {
        let amount0_optimal = mul_div(amount1_desired, balance0, balance1, Rounding::Down)?;
        if amount0_optimal < amount0_min {
            return Err(EngineError::InsufficientAmount {
                amount: amount0_optimal,
                minimum: amount0_min,
            });
        }
        Ok((amount0_optimal, amount1_desired))
    }
}

/// Liquidity shares minted for a deposit.
///
/// The first deposit mints `sqrt(amount0 * amount1)`; later deposits mint in
/// proportion to existing reserves, taking the smaller of the two sides so a
/// lopsided deposit never mints more than it funds.
pub fn liquidity_to_mint(
    amount0: u128,
    amount1: u128,
    reserve0: u128,
    reserve1: u128,
    total_liquidity: u128,
) -> EngineResult<u128> {
    let minted = if total_liquidity == 0 {
        sqrt_u256(widening_mul(amount0, amount1))
    } else {
        let by_amount0 = mul_div(amount0, total_liquidity, reserve0, Rounding::Down)?;
        let by_amount1 = mul_div(amount1, total_liquidity, reserve1, Rounding::Down)?;
        by_amount0.min(by_amount1)
    };

    if minted == 0 {
        return Err(EngineError::InsufficientLiquidityMinted);
    }
    Ok(minted)
}

/// Token amounts returned when burning liquidity shares.
///
/// Floored in the pool's favor: the protocol, not the user, keeps rounding
/// dust.
pub fn amounts_for_burn(
    liquidity: u128,
    reserve0: u128,
    reserve1: u128,
    total_liquidity: u128,
) -> EngineResult<(u128, u128)> {
    if liquidity == 0 {
        return Ok((0, 0));
    }

    let amount0 = mul_div(liquidity, reserve0, total_liquidity, Rounding::Down)?;
    let amount1 = mul_div(liquidity, reserve1, total_liquidity, Rounding::Down)?;
    Ok((amount0, amount1))
}
