//! Action replay with full legality checking.
//!
//! Replays are the ground truth: every candidate the planner emits must
//! replay from its parent board to exactly the board it claims.

use std::fmt;

use cascade_core::{Action, ActionKind, Board, Pose, Shape, H, SEQUENCE, W};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayError {
    /// The spawn pose does not fit the board.
    SpawnBlocked,
    /// A `New` record appeared inside a single piece's route.
    NewInRoute,
    /// A script did not start a piece with a `New` record.
    MissingNew,
    /// A rotation step produced a pose that does not fit.
    IllegalRotate(Pose),
    /// A horizontal step hit a wall or an occupied cell.
    IllegalShift(Pose),
    /// A drop step hit the floor or an occupied cell.
    IllegalDrop(Pose),
    /// The replayed board does not match the recorded one.
    BoardMismatch,
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayError::SpawnBlocked => write!(f, "spawn pose does not fit"),
            ReplayError::NewInRoute => write!(f, "N record inside a route"),
            ReplayError::MissingNew => write!(f, "script does not start with N"),
            ReplayError::IllegalRotate(p) => {
                write!(f, "illegal rotate at x={} y={} rot={}", p.x, p.y, p.rot)
            }
            ReplayError::IllegalShift(p) => {
                write!(f, "illegal shift at x={} y={} rot={}", p.x, p.y, p.rot)
            }
            ReplayError::IllegalDrop(p) => {
                write!(f, "illegal drop at x={} y={} rot={}", p.x, p.y, p.rot)
            }
            ReplayError::BoardMismatch => write!(f, "replayed board differs from target"),
        }
    }
}

/// Drive one piece from `spawn` through `actions`, checking every
/// intermediate pose, and return where it ends up. Nothing is placed.
pub fn replay_pose(
    board: &Board,
    shape: Shape,
    spawn: Pose,
    actions: &[Action],
) -> Result<Pose, ReplayError> {
    if !board.fits(shape, spawn) {
        return Err(ReplayError::SpawnBlocked);
    }
    let mut pose = spawn;
    for action in actions {
        match action.kind {
            ActionKind::New => return Err(ReplayError::NewInRoute),
            ActionKind::Rotate => {
                for _ in 0..action.by {
                    pose = pose.with_rot((pose.rot + 1) & (shape.rotations() - 1));
                    if !board.fits(shape, pose) {
                        return Err(ReplayError::IllegalRotate(pose));
                    }
                }
            }
            ActionKind::Left => {
                for _ in 0..action.by {
                    if pose.x == 0 {
                        return Err(ReplayError::IllegalShift(pose));
                    }
                    pose = pose.with_x(pose.x - 1);
                    if !board.fits(shape, pose) {
                        return Err(ReplayError::IllegalShift(pose));
                    }
                }
            }
            ActionKind::Right => {
                for _ in 0..action.by {
                    if pose.x as usize >= W - 1 {
                        return Err(ReplayError::IllegalShift(pose));
                    }
                    pose = pose.with_x(pose.x + 1);
                    if !board.fits(shape, pose) {
                        return Err(ReplayError::IllegalShift(pose));
                    }
                }
            }
            ActionKind::Down => {
                for _ in 0..action.by {
                    if pose.y as usize >= H - 1 {
                        return Err(ReplayError::IllegalDrop(pose));
                    }
                    pose = pose.with_y(pose.y + 1);
                    if !board.fits(shape, pose) {
                        return Err(ReplayError::IllegalDrop(pose));
                    }
                }
            }
        }
    }
    Ok(pose)
}

/// Replay one piece's route, place it, and collapse.
pub fn replay_route(
    board: &Board,
    shape: Shape,
    spawn: Pose,
    actions: &[Action],
) -> Result<Board, ReplayError> {
    let pose = replay_pose(board, shape, spawn, actions)?;
    let mut out = board.put(shape, pose);
    out.collapse();
    Ok(out)
}

/// Replay a candidate's route and require that it lands on `target`
/// (bricks only; counters are derived).
pub fn verify_route(
    board: &Board,
    shape: Shape,
    spawn: Pose,
    actions: &[Action],
    target: &Board,
) -> Result<(), ReplayError> {
    let replayed = replay_route(board, shape, spawn, actions)?;
    if !replayed.bricks_eq(target) {
        return Err(ReplayError::BoardMismatch);
    }
    Ok(())
}

/// Replay a complete solution from the empty board. Each `N` record pulls
/// the next piece from the global sequence; the records up to the next `N`
/// drive that piece.
pub fn replay_script(actions: &[Action]) -> Result<Board, ReplayError> {
    let mut board = Board::new();
    let mut i = 0;
    while i < actions.len() {
        if actions[i].kind != ActionKind::New {
            return Err(ReplayError::MissingNew);
        }
        let mut j = i + 1;
        while j < actions.len() && actions[j].kind != ActionKind::New {
            j += 1;
        }
        let spawn = SEQUENCE[board.step as usize];
        board = replay_route(&board, spawn.shape, spawn.pose, &actions[i + 1..j])?;
        i = j;
    }
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::FULL_ROW;

    fn spawn() -> Pose {
        Pose { x: 4, y: 0, rot: 0 }
    }

    #[test]
    fn test_replay_simple_drop() {
        let board = Board::new();
        let actions = [Action::left(4), Action::down(18)];
        let pose = replay_pose(&board, Shape::I, spawn(), &actions).unwrap();
        assert_eq!(pose, Pose { x: 0, y: 18, rot: 0 });

        let after = replay_route(&board, Shape::I, spawn(), &actions).unwrap();
        assert_eq!(after.step, 1);
        assert_eq!(after.total_occupied(), 4);
    }

    #[test]
    fn test_replay_rejects_new_inside_route() {
        let board = Board::new();
        let actions = [Action::down(1), Action::new_piece()];
        assert_eq!(
            replay_pose(&board, Shape::I, spawn(), &actions),
            Err(ReplayError::NewInRoute)
        );
    }

    #[test]
    fn test_replay_rejects_walking_off_the_wall() {
        let board = Board::new();
        let actions = [Action::left(5)];
        assert!(matches!(
            replay_pose(&board, Shape::I, spawn(), &actions),
            Err(ReplayError::IllegalShift(_))
        ));
    }

    #[test]
    fn test_replay_rejects_drop_into_stack() {
        let mut board = Board::new();
        board.set_row(19, FULL_ROW);
        let actions = [Action::down(18)];
        assert!(matches!(
            replay_pose(&board, Shape::I, spawn(), &actions),
            Err(ReplayError::IllegalDrop(_))
        ));
    }

    #[test]
    fn test_replay_blocked_spawn() {
        let mut board = Board::new();
        board.set_cell(4, 0, true);
        assert_eq!(
            replay_pose(&board, Shape::O, Pose { x: 4, y: 0, rot: 0 }, &[]),
            Err(ReplayError::SpawnBlocked)
        );
    }

    #[test]
    fn test_verify_route_detects_mismatch() {
        let board = Board::new();
        let actions = [Action::down(18)];
        let mut wrong = board.put(Shape::I, Pose { x: 3, y: 18, rot: 0 });
        wrong.collapse();
        assert_eq!(
            verify_route(&board, Shape::I, spawn(), &actions, &wrong),
            Err(ReplayError::BoardMismatch)
        );
    }

    #[test]
    fn test_replay_script_first_piece() {
        // The sequence opens with a Z; drop it straight down.
        let actions = [Action::new_piece(), Action::down(18)];
        let board = replay_script(&actions).unwrap();
        assert_eq!(board.step, 1);
        assert_eq!(board.total_occupied(), 4);
    }

    #[test]
    fn test_replay_script_requires_new_marker() {
        let actions = [Action::down(3)];
        assert_eq!(replay_script(&actions), Err(ReplayError::MissingNew));
    }
}
