//! Shared search node.

use std::sync::Arc;

use cascade_core::{ActionList, Board};
use cascade_eval::{quality, QualityWeights};

/// Nodes are shared: every child holds its parent alive, and so does the
/// global-best pointer, until the last reference drops.
pub type StatePtr = Arc<State>;

#[derive(Debug)]
pub struct State {
    pub board: Board,
    /// Cached `quality(board)`.
    pub quality: i32,
    /// Cached `board.occupied_height()`.
    pub occupied_height: u32,
    pub parent: Option<StatePtr>,
    /// Actions from the parent's board to this one, without the leading
    /// piece marker.
    pub actions: ActionList,
}

impl State {
    pub fn root(weights: &QualityWeights) -> StatePtr {
        let board = Board::new();
        Arc::new(State {
            quality: quality(&board, weights),
            occupied_height: board.occupied_height(),
            board,
            parent: None,
            actions: ActionList::new(),
        })
    }
}
