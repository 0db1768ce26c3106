//! Token and account addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 20-byte token or account address.
///
/// The all-zero address is reserved: used as a token it denotes the chain's
/// native coin, settled via attached value instead of a token transfer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address, denoting the native coin.
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Whether this is the zero (native coin) address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1u8; 20]).is_zero());
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let low = Address::new([0u8; 20]);
        let mut high_bytes = [0u8; 20];
        high_bytes[0] = 1;
        let high = Address::new(high_bytes);

        assert!(low < high);
        assert!(Address::ZERO <= low);
    }

    #[test]
    fn test_display_hex() {
        let mut bytes = [0u8; 20];
        bytes[19] = 0xab;
        let addr = Address::new(bytes);
        assert_eq!(
            format!("{}", addr),
            "0x00000000000000000000000000000000000000ab"
        );
    }
}
