//! Constant-product swap pricing.
//!
//! Output for a given input under `x * y = k`, with the fee taken from the
//! input side and every division floored so the pool always rounds in its
//! own favor.

use fairswap_types::{EngineResult, FEE_DENOMINATOR};

use crate::big_int::{mul_div, widening_mul, Rounding};
use crate::safe_math::safe_add;

/// A priced swap before settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    /// Input remaining after the fee, the amount actually priced
    pub input_after_fee: u128,
    /// Fee taken from the input, stays in the pool
    pub fee_paid: u128,
    /// Output owed to the caller
    pub output: u128,
}

/// Price an input amount against the current reserves.
///
/// `output = reserve_out * input_after_fee / (reserve_in + input_after_fee)`
/// where `input_after_fee = input * (FEE_DENOMINATOR - fee) / FEE_DENOMINATOR`.
/// The full input, fee included, is what enters the pool; pool creation
/// guarantees `fee < FEE_DENOMINATOR`.
pub fn quote(
    input_amount: u128,
    reserve_in: u128,
    reserve_out: u128,
    fee: u32,
) -> EngineResult<SwapQuote> {
    debug_assert!(fee < FEE_DENOMINATOR, "fee validated at pool creation");

    let input_after_fee = mul_div(
        input_amount,
        (FEE_DENOMINATOR - fee) as u128,
        FEE_DENOMINATOR as u128,
        Rounding::Down,
    )?;
    let fee_paid = input_amount - input_after_fee;

    let denominator = safe_add(reserve_in, input_after_fee)?;
    let output = mul_div(reserve_out, input_after_fee, denominator, Rounding::Down)?;

    Ok(SwapQuote {
        input_after_fee,
        fee_paid,
        output,
    })
}

/// Check the post-swap constant-product invariant.
///
/// The product of reserves must never decrease across a swap; a strict
/// decrease indicates a pricing defect and is treated as fatal by the
/// engine.
pub fn invariant_holds(
    reserve_in: u128,
    reserve_out: u128,
    new_reserve_in: u128,
    new_reserve_out: u128,
) -> bool {
    widening_mul(new_reserve_in, new_reserve_out) >= widening_mul(reserve_in, reserve_out)
}
