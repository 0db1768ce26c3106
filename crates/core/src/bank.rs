//! The asset-movement seam between the engine and token contracts.

use std::collections::{HashMap, HashSet};

use fairswap_types::Address;

/// External settlement collaborator.
///
/// `pull` draws ERC-20 value from a caller into the engine's custody,
/// `push` pays ERC-20 value out, and `pay_native` sends native coin (used
/// for withdrawals, swap output, and overpayment refunds). Each returns
/// `false` on failure; the engine maps failures onto its settlement errors
/// and aborts the operation without committing any state.
pub trait TokenBank {
    fn pull(&mut self, token: Address, from: Address, amount: u128) -> bool;
    fn push(&mut self, token: Address, to: Address, amount: u128) -> bool;
    fn pay_native(&mut self, to: Address, amount: u128) -> bool;
}

/// In-memory bank with injectable failure modes, for tests and simulation.
///
/// Balances are tracked per `(token, holder)`; the native coin is the
/// zero-address token. The engine's custody is a holder like any other, so
/// conservation of every token across operations is directly observable.
#[derive(Debug, Default)]
pub struct MemoryBank {
    engine: Address,
    balances: HashMap<(Address, Address), u128>,
    frozen_tokens: HashSet<Address>,
    reject_native: HashSet<Address>,
}

impl MemoryBank {
    pub fn new(engine: Address) -> Self {
        MemoryBank {
            engine,
            ..Default::default()
        }
    }

    /// Credit a holder out of thin air (test setup).
    pub fn mint(&mut self, token: Address, holder: Address, amount: u128) {
        *self.balances.entry((token, holder)).or_insert(0) += amount;
    }

    pub fn balance_of(&self, token: Address, holder: Address) -> u128 {
        self.balances.get(&(token, holder)).copied().unwrap_or(0)
    }

    /// Make every transfer of `token` fail, simulating a broken or
    /// fee-on-transfer token.
    pub fn freeze_token(&mut self, token: Address) {
        self.frozen_tokens.insert(token);
    }

    /// Make native sends to `holder` fail, simulating a recipient that
    /// rejects value.
    pub fn reject_native_to(&mut self, holder: Address) {
        self.reject_native.insert(holder);
    }

    fn transfer(&mut self, token: Address, from: Address, to: Address, amount: u128) -> bool {
        if amount == 0 {
            return true;
        }
        let from_balance = self.balance_of(token, from);
        if from_balance < amount {
            return false;
        }
        self.balances.insert((token, from), from_balance - amount);
        *self.balances.entry((token, to)).or_insert(0) += amount;
        true
    }
}

impl TokenBank for MemoryBank {
    fn pull(&mut self, token: Address, from: Address, amount: u128) -> bool {
        if self.frozen_tokens.contains(&token) {
            return false;
        }
        self.transfer(token, from, self.engine, amount)
    }

    fn push(&mut self, token: Address, to: Address, amount: u128) -> bool {
        if self.frozen_tokens.contains(&token) {
            return false;
        }
        self.transfer(token, self.engine, to, amount)
    }

    fn pay_native(&mut self, to: Address, amount: u128) -> bool {
        if self.reject_native.contains(&to) {
            return false;
        }
        self.transfer(Address::ZERO, self.engine, to, amount)
    }
}
