//! Deposit split arithmetic.
//!
//! All functions return `None` on overflow; callers report it as an error.

/// Share of a losing stake set aside for the winning voters.
pub fn dispensation_pool(stake: u128, dispensation_pct: u128) -> Option<u128> {
    let keep = 100u128.checked_sub(dispensation_pct)?;
    keep.checked_mul(stake).map(|v| v / 100)
}

/// Paid to the winning party: both stakes minus the voter pool, or both stakes
/// outright when nobody revealed on the winning side.
pub fn winner_payout(stake: u128, reward_pool: u128, winning_tokens: u128) -> Option<u128> {
    let both = stake.checked_mul(2)?;
    if winning_tokens == 0 {
        Some(both)
    } else {
        both.checked_sub(reward_pool)
    }
}

/// A voter's cut of what is left in the pool.
pub fn voter_share(voter_tokens: u128, remaining_pool: u128, remaining_tokens: u128) -> Option<u128> {
    if remaining_tokens == 0 {
        return Some(0);
    }
    voter_tokens
        .checked_mul(remaining_pool)
        .map(|v| v / remaining_tokens)
}

/// Supply minted for the majority bloc.
pub fn majority_bloc_inflation(winning_tokens: u128, inflation_factor: u128) -> Option<u128> {
    winning_tokens
        .checked_mul(inflation_factor)
        .map(|v| v / 100)
}
