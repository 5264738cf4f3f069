//! Route construction from the spawn pose to a landing pose.
//!
//! [`route`] tries the straightforward rotate/slide/drop path first and
//! falls back to detours: sliding in from beside the landing spot, stepping
//! aside before descending, stopping one row short, spinning into place
//! from an adjacent rotation, or pre-spinning at the top. The attempt order
//! matters for solution quality; guard bits keep each fallback from
//! re-entering itself.

use cascade_core::{Action, ActionList, Board, Pose, Shape, W};

const BOTTOM_DETOUR: u8 = 1;
const TOP_DETOUR: u8 = 2;
const SPIN_LAST: u8 = 4;
const SPIN_FIRST: u8 = 8;

/// Columns probed on each side of a detour anchor.
const DETOUR_SPAN: i8 = 5;

/// Rotate forward one notch at a time until `to_rot`, requiring every
/// intermediate pose to fit. Appends a single `C` record.
pub fn rotate_route(
    board: &Board,
    shape: Shape,
    from: Pose,
    to_rot: u8,
    out: &mut ActionList,
) -> bool {
    if from.rot == to_rot {
        return true;
    }
    let cnt = shape.rotations();
    let mut steps = 0u8;
    let mut rot = from.rot;
    while rot != to_rot {
        steps += 1;
        rot = (rot + 1) & (cnt - 1);
        if !board.fits(shape, from.with_rot(rot)) {
            return false;
        }
    }
    out.push(Action::rotate(steps));
    true
}

/// Slide one column at a time toward `to_x`, requiring every intermediate
/// pose to fit. Appends a single `L` or `R` record.
pub fn horizontal_route(
    board: &Board,
    shape: Shape,
    from: Pose,
    to_x: i8,
    out: &mut ActionList,
) -> bool {
    if from.x == to_x {
        return true;
    }
    let dir = if to_x > from.x { 1 } else { -1 };
    let mut x = from.x;
    while x != to_x {
        x += dir;
        if !board.fits(shape, from.with_x(x)) {
            return false;
        }
    }
    if to_x > from.x {
        out.push(Action::right((to_x - from.x) as u8));
    } else {
        out.push(Action::left((from.x - to_x) as u8));
    }
    true
}

/// Rotate and slide (in whichever order works), then drop straight down.
pub fn route_naive(
    board: &Board,
    shape: Shape,
    from: Pose,
    to: Pose,
    out: &mut ActionList,
) -> bool {
    if to.y < from.y {
        return false;
    }
    let mark = out.len();

    let aligned = (rotate_route(board, shape, from, to.rot, out)
        && horizontal_route(board, shape, from.with_rot(to.rot), to.x, out))
        || {
            out.truncate(mark);
            horizontal_route(board, shape, from, to.x, out)
                && rotate_route(board, shape, from.with_x(to.x), to.rot, out)
        };
    if !aligned {
        out.truncate(mark);
        return false;
    }

    let from = to.with_y(from.y);
    if to.y > from.y {
        for y in from.y..to.y {
            if !board.fits(shape, from.with_y(y + 1)) {
                out.truncate(mark);
                return false;
            }
        }
        out.push(Action::down((to.y - from.y) as u8));
    }
    true
}

/// Full route finder. Returns false when no fallback reaches `to`; the
/// action list is left exactly as it was on failure.
pub fn route(board: &Board, shape: Shape, from: Pose, to: Pose, out: &mut ActionList) -> bool {
    route_guarded(board, shape, from, to, out, 0)
}

fn route_guarded(
    board: &Board,
    shape: Shape,
    from: Pose,
    to: Pose,
    out: &mut ActionList,
    tried: u8,
) -> bool {
    let mark = out.len();

    if route_naive(board, shape, from, to, out) {
        return true;
    }

    // drop next to the landing spot and slide in sideways
    if tried & BOTTOM_DETOUR == 0 {
        for dir in 0..2 {
            for dx in 1..=DETOUR_SPAN {
                let x = if dir == 0 { to.x + dx } else { to.x - dx };
                if x < 0 || x >= W as i8 {
                    break;
                }
                let via = to.with_x(x);
                if !board.fits(shape, via) {
                    break;
                }
                if route_guarded(board, shape, from, via, out, tried | BOTTOM_DETOUR)
                    && horizontal_route(board, shape, via, to.x, out)
                {
                    return true;
                }
                out.truncate(mark);
            }
        }
    }

    // step aside at the top before descending
    if tried & TOP_DETOUR == 0 {
        for dir in 0..2 {
            for dx in 1..=DETOUR_SPAN {
                let x = if dir == 0 { from.x + dx } else { from.x - dx };
                if x < 0 || x >= W as i8 {
                    break;
                }
                let via = from.with_x(x);
                if !board.fits(shape, via) {
                    break;
                }
                if horizontal_route(board, shape, from, x, out)
                    && route_guarded(board, shape, via, to, out, tried | TOP_DETOUR)
                {
                    return true;
                }
                out.truncate(mark);
            }
        }
    }

    // stop one row short, then finish with a plain drop
    if to.y > 1 {
        let via = to.with_y(to.y - 1);
        if board.fits(shape, via) {
            if route_guarded(board, shape, from, via, out, tried)
                && route_naive(board, shape, via, to, out)
            {
                return true;
            }
            out.truncate(mark);
        }
    }

    // arrive in a neighboring rotation and spin into place
    if tried & SPIN_LAST == 0 {
        let cnt = shape.rotations();
        let mut rot = to.rot;
        loop {
            rot = if rot == 0 { cnt - 1 } else { rot - 1 };
            if rot == to.rot {
                break;
            }
            let via = to.with_rot(rot);
            if !board.fits(shape, via) {
                break;
            }
            if route_guarded(board, shape, from, via, out, tried | SPIN_LAST)
                && rotate_route(board, shape, via, to.rot, out)
            {
                return true;
            }
            out.truncate(mark);
        }
    }

    // spin at the top first, then descend
    if tried & SPIN_FIRST == 0 {
        let cnt = shape.rotations();
        let mut rot = from.rot;
        loop {
            rot = (rot + 1) & (cnt - 1);
            if rot == from.rot {
                break;
            }
            let via = from.with_rot(rot);
            if !board.fits(shape, via) {
                break;
            }
            if rotate_route(board, shape, from, rot, out)
                && route_guarded(board, shape, via, to, out, tried | SPIN_FIRST)
            {
                return true;
            }
            out.truncate(mark);
        }
    }

    false
}
