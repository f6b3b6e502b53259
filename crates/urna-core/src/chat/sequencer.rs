//! Reply ordering for overlapping turns.
//!
//! Turns are sent without waiting for earlier ones, so round trips can
//! complete out of order. `ReplySequencer` either passes completions through
//! as they arrive or holds them back until every earlier turn has resolved.

use std::collections::BTreeMap;

use urna_types::config::ReplyOrder;

/// Releases turn outcomes according to a [`ReplyOrder`].
///
/// Generic over the outcome type so failed turns take their slot too;
/// a later reply never waits on a turn that already failed.
pub struct ReplySequencer<T> {
    order: ReplyOrder,
    next_release: u64,
    pending: BTreeMap<u64, T>,
}

impl<T> ReplySequencer<T> {
    /// Create a sequencer whose first expected turn is `0`.
    pub fn new(order: ReplyOrder) -> Self {
        Self {
            order,
            next_release: 0,
            pending: BTreeMap::new(),
        }
    }

    pub fn order(&self) -> ReplyOrder {
        self.order
    }

    /// Record the outcome of turn `seq` and return whatever is now releasable.
    pub fn push(&mut self, seq: u64, outcome: T) -> Vec<T> {
        match self.order {
            ReplyOrder::Completion => vec![outcome],
            ReplyOrder::Send => {
                self.pending.insert(seq, outcome);
                let mut ready = Vec::new();
                while let Some(outcome) = self.pending.remove(&self.next_release) {
                    ready.push(outcome);
                    self.next_release += 1;
                }
                ready
            }
        }
    }

    /// Outcomes held back waiting for an earlier turn.
    pub fn held(&self) -> usize {
        self.pending.len()
    }
}
