//! Overflow-checked arithmetic for reserve and share accounting.
//!
//! All operations return errors instead of panicking.

use fairswap_types::{EngineError, EngineResult};

/// Safe addition with overflow check
pub fn safe_add(a: u128, b: u128) -> EngineResult<u128> {
    a.checked_add(b).ok_or(EngineError::MathOverflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u128, b: u128) -> EngineResult<u128> {
    a.checked_sub(b).ok_or(EngineError::MathUnderflow)
}

/// Safe multiplication with overflow check
pub fn safe_mul(a: u128, b: u128) -> EngineResult<u128> {
    a.checked_mul(b).ok_or(EngineError::MathOverflow)
}

/// Safe division with zero check
pub fn safe_div(a: u128, b: u128) -> EngineResult<u128> {
    if b == 0 {
        return Err(EngineError::DivisionByZero);
    }
    Ok(a / b)
}

/// Floored integer square root
pub fn isqrt(n: u128) -> u128 {
    use integer_sqrt::IntegerSquareRoot;
    n.integer_sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_arithmetic() {
        assert_eq!(safe_add(100, 200).unwrap(), 300);
        assert_eq!(safe_sub(200, 100).unwrap(), 100);
        assert_eq!(safe_mul(10, 20).unwrap(), 200);
        assert_eq!(safe_div(100, 5).unwrap(), 20);

        assert_eq!(safe_add(u128::MAX, 1), Err(EngineError::MathOverflow));
        assert_eq!(safe_sub(100, 200), Err(EngineError::MathUnderflow));
        assert_eq!(safe_mul(u128::MAX, 2), Err(EngineError::MathOverflow));
        assert_eq!(safe_div(100, 0), Err(EngineError::DivisionByZero));
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(9), 3);
        assert_eq!(isqrt(10_000_000_000), 100_000);
    }
}
