//! Engine error types.
//!
//! Every failure carries the parameters a caller needs to diagnose it, and
//! every failure aborts the whole operation with no state change. Errors
//! fall into three classes: precondition violations (detected before any
//! computation), economic guards (detected after computing amounts but
//! before committing), and settlement failures (detected while moving
//! assets).

use thiserror::Error;

use crate::address::Address;
use crate::ids::PoolId;

/// Errors surfaced by the FairSwap engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ========================================================================
    // Precondition violations
    // ========================================================================
    #[error("pool {pool_id} already exists")]
    PoolAlreadyExists { pool_id: PoolId },

    #[error("pool {pool_id} does not exist")]
    PoolDoesNotExist { pool_id: PoolId },

    #[error("cannot remove {requested} liquidity from a position owning {owned}")]
    InsufficientLiquidityOwned { requested: u128, owned: u128 },

    #[error("pool fee {fee} is not below the fee denominator")]
    InvalidFee { fee: u32 },

    #[error("pool has no liquidity to swap against")]
    InsufficientLiquidity,

    // ========================================================================
    // Economic guards
    // ========================================================================
    #[error("amount {amount} is below the requested minimum {minimum}")]
    InsufficientAmount { amount: u128, minimum: u128 },

    #[error("deposit would mint zero liquidity")]
    InsufficientLiquidityMinted,

    #[error("swap output {output} is below the requested minimum {min_output}")]
    TooMuchSlippage { output: u128, min_output: u128 },

    // ========================================================================
    // Settlement failures
    // ========================================================================
    #[error("transfer of {amount} of token {token} from {from} to {to} failed")]
    FailedOrInsufficientTokenTransfer {
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    },

    #[error("failed to return {amount} extra native value to {to}")]
    FailedToReturnExtraEth { to: Address, amount: u128 },

    // ========================================================================
    // Numeric kernel faults
    // ========================================================================
    #[error("math overflow")]
    MathOverflow,

    #[error("math underflow")]
    MathUnderflow,

    #[error("division by zero")]
    DivisionByZero,

    #[error("mul div overflow")]
    MulDivOverflow,

    // ========================================================================
    // Defensive checks
    // ========================================================================
    #[error("constant product invariant violated")]
    InvariantViolation,
}

/// Result type using engine errors.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_parameters() {
        let err = EngineError::InsufficientLiquidityOwned {
            requested: 500_000,
            owned: 100_000,
        };
        assert_eq!(
            format!("{}", err),
            "cannot remove 500000 liquidity from a position owning 100000"
        );

        let err = EngineError::PoolDoesNotExist {
            pool_id: PoolId::ZERO,
        };
        assert!(format!("{}", err).contains(&format!("{}", PoolId::ZERO)));
    }

    #[test]
    fn test_transfer_error_names_all_parties() {
        let err = EngineError::FailedOrInsufficientTokenTransfer {
            token: Address::new([1u8; 20]),
            from: Address::new([2u8; 20]),
            to: Address::new([3u8; 20]),
            amount: 42,
        };
        let rendered = format!("{}", err);
        assert!(rendered.contains("42"));
        assert!(rendered.contains(&format!("{}", Address::new([2u8; 20]))));
    }
}
