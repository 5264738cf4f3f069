//! Frontier selection: prune stragglers, then take the top states under two
//! objectives with ancestor-chain and height diversity quotas.

use hashbrown::HashMap;
use nohash_hasher::BuildNoHashHasher;

use cascade_core::H;

use crate::config::{KeepPlan, SearchConfig};
use crate::state::{State, StatePtr};

/// Per-group quota bookkeeping: how many were taken and the key value of
/// the last one taken (states tying it stay eligible).
struct QuotaSlot<V> {
    taken: usize,
    last: Option<V>,
}

impl<V> Default for QuotaSlot<V> {
    fn default() -> Self {
        Self { taken: 0, last: None }
    }
}

impl<V: PartialEq + Clone> QuotaSlot<V> {
    #[inline]
    fn allows(&self, value: &V, max: usize) -> bool {
        self.taken < max || self.last.as_ref() == Some(value)
    }

    #[inline]
    fn charge(&mut self, value: &V) {
        self.taken += 1;
        self.last = Some(value.clone());
    }
}

/// Ancestor quota map keyed by the parent node's address; the pointer is
/// only used as an identity within one selection pass.
type AncestorQuota<V> = HashMap<usize, QuotaSlot<V>, BuildNoHashHasher<usize>>;

/// Move the best `n` states by `key` from `from` into `to`.
///
/// Walking the list in descending key order, a state is skipped when any of
/// its nearest ancestors' groups (or its occupied-height bucket) is
/// already full at a different key value. Once capacity runs out, states
/// tying the last accepted key are still taken; the first lower key stops
/// the pass. Skipped states stay in `from` for the next pass.
fn move_top_n<V, K>(
    from: &mut Vec<StatePtr>,
    to: &mut Vec<StatePtr>,
    mut n: usize,
    ancestor_max: &[usize],
    height_max: usize,
    key: K,
) where
    V: Ord + Clone,
    K: Fn(&State) -> V,
{
    if n == 0 {
        return;
    }
    if from.len() <= n {
        to.append(from);
        return;
    }

    from.sort_by(|a, b| {
        key(b)
            .cmp(&key(a))
            .then_with(|| b.board.bricks_cmp(&a.board))
    });

    let mut ancestor_quota: AncestorQuota<V> = AncestorQuota::default();
    let mut height_quota: Vec<QuotaSlot<V>> = (0..=H).map(|_| QuotaSlot::default()).collect();

    let mut accepted: Vec<StatePtr> = Vec::with_capacity(n);
    let mut rest: Vec<StatePtr> = Vec::new();
    let mut last_key: Option<V> = None;
    let mut done = false;

    for state in from.drain(..) {
        if done {
            rest.push(state);
            continue;
        }
        let value = key(&state);

        let mut over_quota = false;
        let mut node: &State = &state;
        for &max in ancestor_max {
            let Some(parent) = &node.parent else { break };
            let slot = ancestor_quota
                .entry(parent.as_ref() as *const State as usize)
                .or_default();
            if !slot.allows(&value, max) {
                over_quota = true;
                break;
            }
            node = parent.as_ref();
        }
        if !over_quota && !height_quota[state.occupied_height as usize].allows(&value, height_max) {
            over_quota = true;
        }
        if over_quota {
            rest.push(state);
            continue;
        }

        if n == 0 {
            if last_key.as_ref() != Some(&value) {
                done = true;
                rest.push(state);
                continue;
            }
        } else {
            n -= 1;
        }

        // charge the quotas only for states actually taken
        let mut node: &State = &state;
        for _ in ancestor_max {
            let Some(parent) = &node.parent else { break };
            ancestor_quota
                .entry(parent.as_ref() as *const State as usize)
                .or_default()
                .charge(&value);
            node = parent.as_ref();
        }
        height_quota[state.occupied_height as usize].charge(&value);

        last_key = Some(value);
        accepted.push(state);
    }

    *from = rest;
    to.append(&mut accepted);
}

/// Build the next frontier from a drained layer.
pub(crate) fn choose_for_next_step(
    config: &SearchConfig,
    plan: &KeepPlan,
    mut layer: Vec<StatePtr>,
    next: &mut Vec<StatePtr>,
) {
    next.clear();
    if layer.is_empty() {
        return;
    }

    // Drop everything far behind the best score or the tallest stack.
    let mut max_score = 0u32;
    let mut max_height = 0u32;
    for state in &layer {
        max_score = max_score.max(state.board.score);
        max_height = max_height.max(state.occupied_height);
    }
    layer.retain(|state| {
        state.board.score + config.ignore_score_threshold >= max_score
            && state.occupied_height + config.ignore_height_threshold >= max_height
    });

    if layer.len() <= plan.score_keep + plan.quality_keep {
        next.append(&mut layer);
        return;
    }

    // First pass: highest average yield per clear.
    move_top_n(
        &mut layer,
        next,
        plan.score_keep,
        &plan.score_parent_quota,
        plan.score_height_quota,
        |state| {
            let board = &state.board;
            (
                board.score as u64 * 10_000 / board.collapse_count.max(1) as u64,
                board.score,
                state.quality,
            )
        },
    );

    // Second pass over what remains: most workable stacks.
    move_top_n(
        &mut layer,
        next,
        plan.quality_keep,
        &plan.quality_parent_quota,
        plan.quality_height_quota,
        |state| (state.quality, state.board.score),
    );
}
