//! Cascade eval crate - board quality heuristics.

use cascade_core::{Board, FULL_ROW, H};
use serde::{Deserialize, Serialize};

/// Penalty weights for [`quality`]. Positive values penalize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityWeights {
    /// Horizontally adjacent cells that differ.
    pub row_transition: i32,
    /// Vertically adjacent cells that differ.
    pub col_transition: i32,
    /// Empty cell with any occupied cell above it in the same column.
    pub hole: i32,
    /// Occupied cell with any empty cell below it in the same column.
    pub overhang: i32,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            row_transition: 458,
            col_transition: 0,
            hole: 1080,
            overhang: 0,
        }
    }
}

/// Compactness score of a board: more cells is better, ragged edges, holes,
/// and overhangs are worse. Counters on the board are ignored.
pub fn quality(board: &Board, w: &QualityWeights) -> i32 {
    let mut r = 0i32;

    let mut covered: u32 = 0;
    let mut last_row: u32 = 0;
    for y in 0..H {
        let row = board.row(y) as u32;

        r += 600 * row.count_ones() as i32;

        let alts = (row ^ (row >> 1)) & (FULL_ROW as u32 >> 1);
        r -= w.row_transition * alts.count_ones() as i32;

        r -= w.col_transition * (row ^ last_row).count_ones() as i32;
        last_row = row;

        // holes: empty under something already seen above
        r -= (w.hole - w.overhang) * (!row & covered).count_ones() as i32;
        covered |= row;
    }

    let mut solid_below: u32 = FULL_ROW as u32;
    for y in (0..H).rev() {
        let row = board.row(y) as u32;
        // overhangs: occupied with a gap somewhere underneath
        r -= w.overhang * (row & !solid_below).count_ones() as i32;
        solid_below &= row;
    }

    r
}

/// Reject towering spikes: a stack at least five rows tall whose top five
/// rows are all three cells wide or less.
pub fn is_ok(board: &Board) -> bool {
    const SPIKE_ROWS: u32 = 5;

    let height = board.occupied_height();
    if height >= SPIKE_ROWS {
        let top = H as u32 - height;
        let mut widest = 0;
        for i in 0..SPIKE_ROWS {
            widest = widest.max(board.row((top + i) as usize).count_ones());
        }
        if widest <= 3 {
            return false;
        }
    }
    true
}
