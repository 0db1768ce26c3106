//! # FairSwap Core
//!
//! A constant-product exchange engine: multi-pool reserve accounting, a
//! position ledger of proportional liquidity shares, deposit/withdrawal
//! math with slippage guards, and fee-adjusted swaps under a strict
//! non-decreasing `x * y` invariant.
//!
//! Every public operation is atomic: effects are computed up front, assets
//! move through the [`TokenBank`] seam, and state commits in one step only
//! after settlement succeeds. Any error leaves the engine exactly as it was.

pub mod bank;
pub mod engine;
pub mod pool;

pub use bank::{MemoryBank, TokenBank};
pub use engine::{AddLiquidityReceipt, Engine, RemoveLiquidityReceipt, SwapReceipt};
pub use pool::Pool;
