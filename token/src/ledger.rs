//! The token capability consumed by the ballot engine, parameterizer and registry.

use crate::error::TokenError;
use tcr_types::Address;

/// Fungible token with an oracle-gated supply.
///
/// Every mutating method names the acting party explicitly: `transfer` moves
/// `from`'s own tokens, `transfer_from` spends `from`'s allowance granted to
/// `spender`, and the supply methods check `caller` against the oracle slot.
pub trait TokenLedger {
    fn balance_of(&self, owner: &Address) -> u128;

    fn total_supply(&self) -> u128;

    fn allowance(&self, owner: &Address, spender: &Address) -> u128;

    fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> Result<(), TokenError>;

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u128);

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError>;

    fn supply_oracle(&self) -> &Address;

    /// Mint `amount` to `to`. Only the supply oracle may call this.
    fn increase_supply(
        &mut self,
        caller: &Address,
        amount: u128,
        to: &Address,
    ) -> Result<(), TokenError>;

    /// Burn `amount` held by `from`. Only the supply oracle may call this.
    fn decrease_supply(
        &mut self,
        caller: &Address,
        amount: u128,
        from: &Address,
    ) -> Result<(), TokenError>;

    fn change_supply_oracle(
        &mut self,
        caller: &Address,
        new_oracle: Address,
    ) -> Result<(), TokenError>;
}
