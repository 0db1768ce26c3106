//! 256-bit intermediates for overflow-free mul-div and square roots.
//!
//! Reserve products and share computations multiply two `u128` values, so
//! intermediate results need up to 256 bits. A two-limb representation with
//! widening multiplication, binary long division by a `u128` divisor, and a
//! Newton square root covers everything the engine needs.

use fairswap_types::{EngineError, EngineResult};

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// 256-bit unsigned integer for intermediate calculations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U256 {
    /// Low 128 bits
    pub lo: u128,
    /// High 128 bits
    pub hi: u128,
}

impl U256 {
    pub const ZERO: U256 = U256 { lo: 0, hi: 0 };

    pub const fn new(lo: u128, hi: u128) -> Self {
        Self { lo, hi }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self { lo: value, hi: 0 }
    }

    pub const fn is_zero(&self) -> bool {
        self.lo == 0 && self.hi == 0
    }

    /// Convert to u128, returning None on overflow
    pub fn to_u128(&self) -> Option<u128> {
        if self.hi == 0 {
            Some(self.lo)
        } else {
            None
        }
    }

    pub fn checked_add(self, other: U256) -> Option<U256> {
        let (lo, carry) = self.lo.overflowing_add(other.lo);
        let hi = self.hi.checked_add(other.hi)?.checked_add(carry as u128)?;
        Some(U256::new(lo, hi))
    }

    /// Bit `i` of the value, with bit 0 the least significant.
    fn bit(&self, i: u32) -> bool {
        if i >= 128 {
            (self.hi >> (i - 128)) & 1 == 1
        } else {
            (self.lo >> i) & 1 == 1
        }
    }

    fn set_bit(&mut self, i: u32) {
        if i >= 128 {
            self.hi |= 1u128 << (i - 128);
        } else {
            self.lo |= 1u128 << i;
        }
    }

    /// Number of significant bits.
    fn bits(&self) -> u32 {
        if self.hi != 0 {
            256 - self.hi.leading_zeros()
        } else {
            128 - self.lo.leading_zeros()
        }
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.hi.cmp(&other.hi) {
            std::cmp::Ordering::Equal => self.lo.cmp(&other.lo),
            ordering => ordering,
        }
    }
}

/// Full widening multiplication of two `u128` values.
pub fn widening_mul(a: u128, b: u128) -> U256 {
    // Schoolbook multiplication over 64-bit limbs
    let a_lo = a as u64 as u128;
    let a_hi = a >> 64;
    let b_lo = b as u64 as u128;
    let b_hi = b >> 64;

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let (mid, mid_carry) = lh.overflowing_add(hl);
    let (lo, lo_carry) = ll.overflowing_add(mid << 64);
    let hi = hh + (mid >> 64) + ((mid_carry as u128) << 64) + lo_carry as u128;

    U256::new(lo, hi)
}

/// Divide a 256-bit value by a non-zero `u128` divisor.
///
/// Returns `(quotient, remainder)`. The quotient may still exceed 128 bits;
/// callers narrow it with [`U256::to_u128`].
pub fn div_rem(n: U256, d: u128) -> (U256, u128) {
    debug_assert!(d != 0, "div_rem divisor must be non-zero");

    if n.hi == 0 {
        return (U256::from_u128(n.lo / d), n.lo % d);
    }

    // Binary restoring division. The remainder stays below the divisor, so
    // the only subtlety is the shift out of bit 127: when it happens the
    // true remainder exceeds the divisor and wrapping subtraction yields the
    // correct reduced value.
    let mut quotient = U256::ZERO;
    let mut rem: u128 = 0;
    for i in (0..n.bits()).rev() {
        let carry = rem >> 127;
        rem = (rem << 1) | n.bit(i) as u128;
        if carry == 1 || rem >= d {
            rem = rem.wrapping_sub(d);
            quotient.set_bit(i);
        }
    }

    (quotient, rem)
}

/// Multiply two values and divide by a third with the given rounding.
///
/// `result = (a * b) / denominator` with a 256-bit intermediate product.
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> EngineResult<u128> {
    if denominator == 0 {
        return Err(EngineError::DivisionByZero);
    }

    let product = widening_mul(a, b);
    let (quotient, remainder) = div_rem(product, denominator);

    let quotient = if rounding == Rounding::Up && remainder > 0 {
        quotient
            .checked_add(U256::from_u128(1))
            .ok_or(EngineError::MulDivOverflow)?
    } else {
        quotient
    };

    quotient.to_u128().ok_or(EngineError::MulDivOverflow)
}

/// Floored integer square root of a 256-bit value.
///
/// The result of `sqrt` over 256 bits always fits in a `u128`.
pub fn sqrt_u256(n: U256) -> u128 {
    if n.hi == 0 {
        return crate::safe_math::isqrt(n.lo);
    }

    // Newton's method, seeded from above so every iterate stays >= the true
    // root and n / x always fits in a u128.
    let half_bits = (n.bits() + 1) / 2;
    let mut x = if half_bits >= 128 {
        u128::MAX
    } else {
        1u128 << half_bits
    };

    loop {
        let (q, _) = div_rem(n, x);
        let q = q.to_u128().unwrap_or(u128::MAX);
        // floor((x + q) / 2) without overflowing the sum
        let next = (x >> 1) + (q >> 1) + (x & q & 1);
        if next >= x {
            return x;
        }
        x = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_mul_small() {
        let product = widening_mul(100, 200);
        assert_eq!(product.to_u128().unwrap(), 20_000);
    }

    #[test]
    fn test_widening_mul_overflows_u128() {
        let product = widening_mul(u128::MAX, 2);
        assert_eq!(product.lo, u128::MAX - 1);
        assert_eq!(product.hi, 1);
    }

    #[test]
    fn test_widening_mul_max() {
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        let product = widening_mul(u128::MAX, u128::MAX);
        assert_eq!(product.lo, 1);
        assert_eq!(product.hi, u128::MAX - 1);
    }

    #[test]
    fn test_div_rem_wide_dividend() {
        // (u128::MAX * 6) / 3 == u128::MAX * 2, which does not fit in u128
        let n = widening_mul(u128::MAX, 6);
        let (q, r) = div_rem(n, 3);
        assert_eq!(r, 0);
        assert_eq!(q, widening_mul(u128::MAX, 2));
    }

    #[test]
    fn test_div_rem_large_divisor() {
        let d = u128::MAX - 1;
        let n = widening_mul(d, 7);
        let (q, r) = div_rem(n, d);
        assert_eq!(q.to_u128().unwrap(), 7);
        assert_eq!(r, 0);

        let n = n.checked_add(U256::from_u128(5)).unwrap();
        let (q, r) = div_rem(n, d);
        assert_eq!(q.to_u128().unwrap(), 7);
        assert_eq!(r, 5);
    }

    #[test]
    fn test_mul_div_rounding() {
        assert_eq!(mul_div(10, 3, 4, Rounding::Down).unwrap(), 7);
        assert_eq!(mul_div(10, 3, 4, Rounding::Up).unwrap(), 8);
        assert_eq!(mul_div(10, 4, 5, Rounding::Up).unwrap(), 8);
    }

    #[test]
    fn test_mul_div_large_values() {
        let a = u128::MAX / 2;
        assert_eq!(mul_div(a, 2, 2, Rounding::Down).unwrap(), a);
        assert_eq!(mul_div(u128::MAX, u128::MAX, u128::MAX, Rounding::Down).unwrap(), u128::MAX);
    }

    #[test]
    fn test_mul_div_zero_denominator() {
        assert_eq!(
            mul_div(1, 1, 0, Rounding::Down),
            Err(EngineError::DivisionByZero)
        );
    }

    #[test]
    fn test_mul_div_quotient_overflow() {
        assert_eq!(
            mul_div(u128::MAX, 2, 1, Rounding::Down),
            Err(EngineError::MulDivOverflow)
        );
    }

    #[test]
    fn test_sqrt_u256_narrow() {
        assert_eq!(sqrt_u256(U256::from_u128(0)), 0);
        assert_eq!(sqrt_u256(U256::from_u128(1)), 1);
        assert_eq!(sqrt_u256(U256::from_u128(99)), 9);
        assert_eq!(sqrt_u256(U256::from_u128(100)), 10);
    }

    use proptest::prelude::*;

    proptest! {
        /// `mul_div` floors: q * d <= a * b < (q + 1) * d.
        #[test]
        fn prop_mul_div_floors(a: u128, b: u128, d in 1u128..) {
            if let Ok(q) = mul_div(a, b, d, Rounding::Down) {
                let product = widening_mul(a, b);
                let qd = widening_mul(q, d);
                prop_assert!(qd <= product);
                if let Some(qd_plus_d) = qd.checked_add(U256::from_u128(d)) {
                    prop_assert!(qd_plus_d > product);
                }
            }
        }

        /// `sqrt_u256` floors: r^2 <= n < (r + 1)^2.
        #[test]
        fn prop_sqrt_u256_floors(a: u128, b: u128) {
            let n = widening_mul(a, b);
            let r = sqrt_u256(n);
            prop_assert!(widening_mul(r, r) <= n);
            if r < u128::MAX {
                prop_assert!(widening_mul(r + 1, r + 1) > n);
            }
        }
    }

    #[test]
    fn test_sqrt_u256_wide() {
        // sqrt(a^2) == a for values whose square exceeds u128
        for a in [1u128 << 64, (1u128 << 64) + 12345, u128::MAX / 3, u128::MAX] {
            let square = widening_mul(a, a);
            assert_eq!(sqrt_u256(square), a);
            // One less than the square floors down to a - 1
            let mut below = square;
            if below.lo == 0 {
                below.hi -= 1;
                below.lo = u128::MAX;
            } else {
                below.lo -= 1;
            }
            assert_eq!(sqrt_u256(below), a - 1);
        }
    }
}
