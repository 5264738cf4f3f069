//! Layered beam driver: expand one piece per layer in parallel, dedup,
//! track the global best, and select the next frontier.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use cascade_core::{action, Action, Board, SEQUENCE, H, STEPS, W};
use cascade_engine::{find_moves, verify_route, Candidate};
use cascade_eval::{is_ok, quality};

use crate::collector::StateCollector;
use crate::config::SearchConfig;
use crate::select::choose_for_next_step;
use crate::state::{State, StatePtr};

/// Minimum stack height before a clear of 1..=4 rows is allowed, indexed by
/// `lines - 1`. Clearing a short stack wastes scoring potential.
const THRESHOLD_HEIGHT: [u32; 4] = [
    H as u32 - 4,
    H as u32 - 4,
    H as u32 - 3,
    H as u32 - 3,
];

/// Minimum occupied cells before a clear of 1..=4 rows is allowed.
const THRESHOLD_OCCUPIED: [u32; 4] = [
    (H as u32 - 6) * (W as u32 - 1),
    (H as u32 - 6) * (W as u32 - 1),
    (H as u32 - 5) * (W as u32 - 1),
    (H as u32 - 5) * (W as u32 - 1),
];

/// Result of a full run: the action script, the board it produces, and the
/// best score seen after each layer.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    pub actions: Vec<Action>,
    pub final_board: Board,
    pub score_by_step: Vec<u32>,
}

pub fn solve(config: &SearchConfig) -> Solution {
    let plan = config.keep_plan();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()
        .expect("failed to build the worker pool");

    let root = State::root(&config.quality);
    let mut frontier: Vec<StatePtr> = vec![root.clone()];
    let mut global_best = root;

    let mut score_by_step = Vec::with_capacity(config.max_steps);
    let started = Instant::now();

    for step in 0..config.max_steps.min(STEPS) {
        for state in &frontier {
            assert_eq!(
                state.board.step as usize, step,
                "frontier state out of phase with the layer index"
            );
        }

        let collector = StateCollector::new();
        pool.install(|| {
            frontier.par_iter().for_each_init(Vec::new, |scratch, state| {
                expand_state(config, state, scratch, &collector);
            });
        });

        let mut layer = Vec::new();
        collector.drain_into(&mut layer);

        for state in &layer {
            if better_global(state, &global_best) {
                global_best = state.clone();
            }
        }

        let best_score = global_best.board.score;
        if best_score < config.abort_floor(step) {
            info!(step, best_score, floor = config.abort_floor(step), "abort floor missed");
            return Solution::default();
        }
        score_by_step.push(best_score);

        choose_for_next_step(config, &plan, layer, &mut frontier);

        if step != 0 && step % 100 == 0 {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            let per_step = elapsed_ms / (step as u64 + 1);
            info!(
                step,
                best_score,
                frontier = frontier.len(),
                projected_score = best_score as u64 * STEPS as u64 / (step as u64 + 1),
                ms_per_step = per_step,
                eta_s = per_step * (config.max_steps as u64 - step as u64 - 1) / 1000,
                "layer done"
            );
        }
    }

    make_solution(&global_best, score_by_step)
}

/// `(score, step, quality)` with a brick tiebreak, so the winner is
/// independent of drain order.
fn better_global(candidate: &State, best: &State) -> bool {
    let ck = (candidate.board.score, candidate.board.step, candidate.quality);
    let bk = (best.board.score, best.board.step, best.quality);
    ck > bk || (ck == bk && candidate.board.bricks_cmp(&best.board) == Ordering::Greater)
}

/// Expand one frontier state: enumerate landings for the sequenced piece,
/// apply the late-collapse and shape gates, verify each survivor by replay,
/// and hand the children to the collector.
fn expand_state(
    config: &SearchConfig,
    parent: &StatePtr,
    scratch: &mut Vec<Candidate>,
    collector: &StateCollector,
) {
    let spawn = SEQUENCE[parent.board.step as usize];
    find_moves(&parent.board, spawn.shape, spawn.pose, scratch);

    let parent_height = parent.occupied_height;
    let parent_lines = parent.board.collapse_lines;
    let parent_occupied = parent.board.total_occupied();

    for cand in scratch.drain(..) {
        // Clears only count once the stack is tall and dense enough;
        // anything earlier trades away too much future score.
        let cleared = cand.board.collapse_lines - parent_lines;
        if (1..=4).contains(&cleared) {
            let i = (cleared - 1) as usize;
            if parent_height < THRESHOLD_HEIGHT[i] || parent_occupied < THRESHOLD_OCCUPIED[i] {
                continue;
            }
        }

        if !is_ok(&cand.board) {
            continue;
        }

        // A failed replay is a planner bug, not a game condition.
        if let Err(err) =
            verify_route(&parent.board, spawn.shape, spawn.pose, &cand.actions, &cand.board)
        {
            panic!(
                "candidate failed replay verification ({err})\npiece: {}\nparent:\n{}actions: {}\nchild:\n{}",
                spawn.shape,
                parent.board,
                action::join(&cand.actions),
                cand.board,
            );
        }

        let q = quality(&cand.board, &config.quality);
        let height = cand.board.occupied_height();
        collector.add(Arc::new(State {
            board: cand.board,
            quality: q,
            occupied_height: height,
            parent: Some(parent.clone()),
            actions: cand.actions,
        }));
    }
}

/// Walk the best state's ancestry, prepending each route and a piece
/// marker; the reversed result starts with `N` for piece 0.
fn make_solution(best: &StatePtr, score_by_step: Vec<u32>) -> Solution {
    let mut actions: Vec<Action> = Vec::new();
    let mut node: Option<&StatePtr> = Some(best);
    while let Some(state) = node {
        if state.board.step == 0 {
            break;
        }
        actions.extend(state.actions.iter().rev().copied());
        actions.push(Action::new_piece());
        node = state.parent.as_ref();
    }
    actions.reverse();

    Solution {
        actions,
        final_board: best.board,
        score_by_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::{ActionList, FULL_ROW};
    use cascade_eval::QualityWeights;

    fn state_for(board: Board) -> StatePtr {
        let weights = QualityWeights::default();
        Arc::new(State {
            quality: quality(&board, &weights),
            occupied_height: board.occupied_height(),
            board,
            parent: None,
            actions: ActionList::new(),
        })
    }

    fn expand(parent: &StatePtr) -> Vec<StatePtr> {
        let config = SearchConfig::default();
        let collector = StateCollector::new();
        let mut scratch = Vec::new();
        expand_state(&config, parent, &mut scratch, &collector);
        let mut out = Vec::new();
        collector.drain_into(&mut out);
        out
    }

    /// A right-well board: rows `top..20` full except column 9, step picked
    /// so the incoming piece is the vertical I (sequence index 14).
    fn right_well(top: usize) -> Board {
        let mut board = Board::new();
        for y in top..H {
            board.set_row(y, FULL_ROW & !(1 << 9));
        }
        board.step = 14;
        board
    }

    #[test]
    fn test_quad_clear_allowed_on_tall_stack() {
        // Height 17 and 153 cells pass the 4-line thresholds.
        let parent = state_for(right_well(3));
        assert_eq!(parent.occupied_height, 17);
        assert_eq!(parent.board.total_occupied(), 153);
        let children = expand(&parent);
        assert!(children.iter().any(|s| s.board.collapse_lines == 4));
    }

    #[test]
    fn test_quad_clear_gated_on_shorter_stack() {
        // Height 16 fails the 4-line height threshold of 17.
        let parent = state_for(right_well(4));
        assert_eq!(parent.occupied_height, 16);
        let children = expand(&parent);
        assert!(!children.iter().any(|s| s.board.collapse_lines == 4));
    }

    #[test]
    fn test_children_advance_one_step() {
        let parent = state_for(right_well(3));
        for child in expand(&parent) {
            assert_eq!(child.board.step, 15);
            assert!(Arc::ptr_eq(child.parent.as_ref().unwrap(), &parent));
        }
    }

    #[test]
    fn test_make_solution_reconstructs_markers() {
        let weights = QualityWeights::default();
        let root = State::root(&weights);

        let mut first = Board::new();
        first.step = 1;
        let mut first_actions = ActionList::new();
        first_actions.push(Action::down(18));
        let first = Arc::new(State {
            quality: 0,
            occupied_height: 0,
            board: first,
            parent: Some(root),
            actions: first_actions,
        });

        let mut second = Board::new();
        second.step = 2;
        let mut second_actions = ActionList::new();
        second_actions.push(Action::left(2));
        second_actions.push(Action::down(17));
        let second = Arc::new(State {
            quality: 0,
            occupied_height: 0,
            board: second,
            parent: Some(first),
            actions: second_actions,
        });

        let solution = make_solution(&second, vec![0, 0]);
        assert_eq!(
            solution.actions,
            vec![
                Action::new_piece(),
                Action::down(18),
                Action::new_piece(),
                Action::left(2),
                Action::down(17),
            ]
        );
        assert_eq!(action::join(&solution.actions), "N,D18,N,L2,D17");
    }

    #[test]
    fn test_better_global_prefers_score_then_step() {
        let mut a = Board::new();
        a.score = 10;
        a.step = 3;
        let mut b = Board::new();
        b.score = 10;
        b.step = 4;
        let a = state_for(a);
        let b = state_for(b);
        assert!(better_global(&b, &a));
        assert!(!better_global(&a, &b));
    }
}
