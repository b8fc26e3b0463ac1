//! In-memory oraclized token.

use crate::authority::Authority;
use crate::error::TokenError;
use crate::ledger::TokenLedger;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tcr_types::Address;

/// Descriptive token metadata (no effect on accounting).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// A fungible token whose supply can only be changed by its supply oracle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OraclizedToken {
    pub metadata: TokenMetadata,
    total_supply: u128,
    balances: HashMap<Address, u128>,
    allowed: HashMap<(Address, Address), u128>,
    supply_oracle: Authority,
}

impl OraclizedToken {
    /// Create a token with `initial_supply` credited to `creator`.
    pub fn new(
        metadata: TokenMetadata,
        creator: &Address,
        initial_supply: u128,
        supply_oracle: Address,
    ) -> Self {
        let mut balances = HashMap::new();
        if initial_supply > 0 {
            balances.insert(creator.clone(), initial_supply);
        }
        Self {
            metadata,
            total_supply: initial_supply,
            balances,
            allowed: HashMap::new(),
            supply_oracle: Authority::new(supply_oracle),
        }
    }

    /// Number of accounts holding a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    fn debit(&mut self, owner: &Address, amount: u128) -> Result<(), TokenError> {
        let available = self.balance_of(owner);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                owner: owner.to_string(),
                needed: amount,
                available,
            });
        }
        self.balances.insert(owner.clone(), available - amount);
        Ok(())
    }

    fn credit(&mut self, owner: &Address, amount: u128) -> Result<(), TokenError> {
        let balance = self
            .balance_of(owner)
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.balances.insert(owner.clone(), balance);
        Ok(())
    }
}

impl TokenLedger for OraclizedToken {
    fn balance_of(&self, owner: &Address) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowed
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        // Check the credit side first so a failure leaves both balances untouched.
        if from != to {
            self.balance_of(to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
        }
        self.debit(from, amount)?;
        self.credit(to, amount)?;
        tracing::debug!(%from, %to, amount, "token transfer");
        Ok(())
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowed.insert((owner.clone(), spender.clone()), amount);
        tracing::debug!(%owner, %spender, amount, "token approval");
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance {
                spender: spender.to_string(),
                needed: amount,
                available: allowance,
            });
        }
        self.transfer(from, to, amount)?;
        self.allowed
            .insert((from.clone(), spender.clone()), allowance - amount);
        Ok(())
    }

    fn supply_oracle(&self) -> &Address {
        self.supply_oracle.holder()
    }

    fn increase_supply(
        &mut self,
        caller: &Address,
        amount: u128,
        to: &Address,
    ) -> Result<(), TokenError> {
        self.supply_oracle.ensure(caller)?;
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        self.credit(to, amount)?;
        self.total_supply = supply;
        tracing::info!(%to, amount, total_supply = supply, "supply increased");
        Ok(())
    }

    fn decrease_supply(
        &mut self,
        caller: &Address,
        amount: u128,
        from: &Address,
    ) -> Result<(), TokenError> {
        self.supply_oracle.ensure(caller)?;
        self.debit(from, amount)?;
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::Overflow)?;
        tracing::info!(%from, amount, total_supply = self.total_supply, "supply decreased");
        Ok(())
    }

    fn change_supply_oracle(
        &mut self,
        caller: &Address,
        new_oracle: Address,
    ) -> Result<(), TokenError> {
        self.supply_oracle.reassign(caller, new_oracle)?;
        tracing::info!(oracle = %self.supply_oracle.holder(), "supply oracle changed");
        Ok(())
    }
}
