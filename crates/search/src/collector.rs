//! Concurrent dedup of next-layer states, sharded to spread lock pressure.

use std::sync::Mutex;

use hashbrown::hash_map::Entry;
use hashbrown::HashMap;

use cascade_core::{W, WORDS};

use crate::state::StatePtr;

/// Shard count; prime, so the rolling hash spreads evenly.
const SHARDS: usize = 17;

type BrickKey = [u64; WORDS];

/// Rolling hash over the packed row words; only used to pick a shard. The
/// map inside each shard hashes the full key itself.
#[inline]
fn shard_of(key: &BrickKey) -> usize {
    let mut h = 0u64;
    for &word in key {
        h = h.rotate_left(W as u32) ^ word;
    }
    (h % SHARDS as u64) as usize
}

/// Keep the better of two states with identical bricks: higher score wins,
/// then fewer collapses (more scoring headroom left). The rule is
/// commutative, so the surviving set does not depend on insertion order.
#[inline]
fn better(a: &StatePtr, b: &StatePtr) -> bool {
    a.board.score > b.board.score
        || (a.board.score == b.board.score && a.board.collapse_count < b.board.collapse_count)
}

pub struct StateCollector {
    shards: [Mutex<HashMap<BrickKey, StatePtr>>; SHARDS],
}

impl Default for StateCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl StateCollector {
    pub fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| Mutex::new(HashMap::new())),
        }
    }

    pub fn add(&self, state: StatePtr) {
        let key = state.board.words();
        let mut shard = self.shards[shard_of(&key)].lock().unwrap();
        match shard.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(state);
            }
            Entry::Occupied(mut slot) => {
                if better(&state, slot.get()) {
                    slot.insert(state);
                }
            }
        }
    }

    /// Drain every shard into `out`.
    pub fn drain_into(&self, out: &mut Vec<StatePtr>) {
        for shard in &self.shards {
            let mut map = shard.lock().unwrap();
            out.extend(map.drain().map(|(_, state)| state));
        }
    }
}
