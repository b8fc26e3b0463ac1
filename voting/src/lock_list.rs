//! Per-voter ledger of tokens locked in unrevealed commitments.
//!
//! Nodes are poll ids kept in ascending order of committed weight, so the
//! tail holds the voter's largest outstanding commitment, which is exactly
//! the amount that cannot be withdrawn. Poll id `0` is the sentinel on both
//! ends: `next(0)` is the head, `prev(0)` the tail.

use serde::{Deserialize, Serialize};
use tcr_types::PollId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockList {
    nodes: Vec<(PollId, u128)>,
}

impl LockList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn index_of(&self, poll_id: PollId) -> Option<usize> {
        self.nodes.iter().position(|(id, _)| *id == poll_id)
    }

    pub fn contains(&self, poll_id: PollId) -> bool {
        poll_id != 0 && self.index_of(poll_id).is_some()
    }

    /// Tokens locked in `poll_id` (0 for the sentinel or absent polls).
    pub fn tokens(&self, poll_id: PollId) -> u128 {
        self.index_of(poll_id)
            .map(|i| self.nodes[i].1)
            .unwrap_or(0)
    }

    /// Node after `poll_id`; `next(0)` is the head.
    pub fn next(&self, poll_id: PollId) -> PollId {
        if poll_id == 0 {
            return self.nodes.first().map(|n| n.0).unwrap_or(0);
        }
        match self.index_of(poll_id) {
            Some(i) => self.nodes.get(i + 1).map(|n| n.0).unwrap_or(0),
            None => 0,
        }
    }

    /// Node before `poll_id`; `prev(0)` is the tail.
    pub fn prev(&self, poll_id: PollId) -> PollId {
        if poll_id == 0 {
            return self.nodes.last().map(|n| n.0).unwrap_or(0);
        }
        match self.index_of(poll_id) {
            Some(i) if i > 0 => self.nodes[i - 1].0,
            _ => 0,
        }
    }

    /// Largest outstanding commitment.
    pub fn locked(&self) -> u128 {
        self.nodes.last().map(|n| n.1).unwrap_or(0)
    }

    /// Whether `num_tokens` fits between `prev` and `next` while keeping the
    /// list sorted.
    pub fn valid_position(&self, prev: PollId, next: PollId, num_tokens: u128) -> bool {
        let prev_valid = num_tokens >= self.tokens(prev);
        let next_valid = next == 0 || num_tokens <= self.tokens(next);
        prev_valid && next_valid
    }

    /// The node after which a commitment of `num_tokens` belongs: the last node
    /// holding no more than `num_tokens`, or `0` to insert at the head.
    pub fn insert_point(&self, num_tokens: u128) -> PollId {
        self.nodes
            .iter()
            .rev()
            .find(|(_, tokens)| *tokens <= num_tokens)
            .map(|(id, _)| *id)
            .unwrap_or(0)
    }

    /// Link `poll_id` between `prev` and `next`. Returns `false` (leaving the
    /// list unchanged) if the neighbours are not adjacent or the ordering
    /// would break.
    pub fn insert(&mut self, prev: PollId, poll_id: PollId, next: PollId, num_tokens: u128) -> bool {
        if poll_id == 0 || self.contains(poll_id) {
            return false;
        }
        if prev != 0 && !self.contains(prev) {
            return false;
        }
        if self.next(prev) != next || !self.valid_position(prev, next, num_tokens) {
            return false;
        }
        let at = if prev == 0 {
            0
        } else {
            self.index_of(prev).map(|i| i + 1).unwrap_or(self.nodes.len())
        };
        self.nodes.insert(at, (poll_id, num_tokens));
        true
    }

    /// Unlink `poll_id`; returns whether it was present.
    pub fn remove(&mut self, poll_id: PollId) -> bool {
        match self.index_of(poll_id) {
            Some(i) => {
                self.nodes.remove(i);
                true
            }
            None => false,
        }
    }

    /// Poll ids from head to tail.
    pub fn poll_ids(&self) -> impl Iterator<Item = PollId> + '_ {
        self.nodes.iter().map(|(id, _)| *id)
    }
}
