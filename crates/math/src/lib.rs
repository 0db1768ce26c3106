//! # FairSwap Math
//!
//! Pure numeric kernel for the FairSwap engine. No floating point anywhere:
//! all arithmetic is fixed-width unsigned integer with explicit overflow and
//! underflow detection, all divisions floor, and intermediate products go
//! through 256-bit limbs so `a * b / c` never overflows spuriously.

pub mod big_int;
pub mod liquidity_math;
pub mod safe_math;
pub mod swap_math;

// Re-export commonly used functions
pub use big_int::{mul_div, sqrt_u256, widening_mul, Rounding, U256};
pub use liquidity_math::{amounts_for_burn, amounts_for_deposit, liquidity_to_mint};
pub use safe_math::{isqrt, safe_add, safe_div, safe_mul, safe_sub};
pub use swap_math::{invariant_holds, quote, SwapQuote};
