//! Landing-pose enumeration for one incoming piece.

use cascade_core::bits::set_bits;
use cascade_core::{ActionList, Board, Pose, Shape, FULL_ROW, H};

use crate::route::route;

/// A reachable landing: its pose, the board after placement and collapse,
/// and the primitive actions that take the spawn pose there.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub pose: Pose,
    pub board: Board,
    pub actions: ActionList,
}

/// Enumerate every distinct landing of `shape` spawned at `spawn`.
///
/// Per rotation, scan rows bottom-up and keep a bitmask of columns still
/// worth probing; a pose is a landing when it fits but the row below does
/// not. Landings that occupy row 0 (top-out) or that no route reaches are
/// dropped. Each column yields at most one landing per rotation.
pub fn find_moves(board: &Board, shape: Shape, spawn: Pose, out: &mut Vec<Candidate>) {
    out.clear();
    if !board.fits(shape, spawn) {
        return; // spawn blocked: nothing can be placed
    }

    for rot in 0..shape.rotations() {
        let mut remaining = FULL_ROW as u32;
        for y in (1..H as i8).rev() {
            if remaining == 0 {
                break;
            }
            let row = board.row(y as usize) as u32;
            for x in set_bits(remaining & !row) {
                let pose = Pose { x: x as i8, y, rot };
                if !board.fits(shape, pose) || board.fits(shape, pose.with_y(y + 1)) {
                    continue;
                }

                let placed = board.put(shape, pose);
                if placed.row(0) != 0 {
                    continue; // reaching the top row ends the game
                }
                let mut actions = ActionList::new();
                if !route(board, shape, spawn, pose, &mut actions) {
                    continue; // no way to get there
                }
                let mut after = placed;
                after.collapse();
                out.push(Candidate { pose, board: after, actions });

                // a column rarely offers a second useful landing
                remaining &= !(1 << x);
            }
        }
    }
}
