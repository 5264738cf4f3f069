//! Cross-module checks: play real sequence prefixes through the enumerator
//! and confirm the recorded scripts replay to the same boards.

use cascade_core::{action, Action, Board, SEQUENCE};

fn play_greedy(steps: usize) -> (Board, Vec<Action>) {
    let mut board = Board::new();
    let mut script: Vec<Action> = Vec::new();
    let mut candidates = Vec::new();

    for step in 0..steps {
        let spawn = SEQUENCE[step];
        cascade_engine::find_moves(&board, spawn.shape, spawn.pose, &mut candidates);
        assert!(
            !candidates.is_empty(),
            "no landing for piece {} at step {}",
            spawn.shape,
            step
        );

        // Greedy: lowest resulting stack, then deterministic tiebreak.
        let best = candidates
            .iter()
            .min_by(|a, b| {
                a.board
                    .occupied_height()
                    .cmp(&b.board.occupied_height())
                    .then_with(|| b.board.bricks_cmp(&a.board))
            })
            .unwrap();

        cascade_engine::verify_route(&board, spawn.shape, spawn.pose, &best.actions, &best.board)
            .expect("candidate must replay");

        script.push(Action::new_piece());
        script.extend(best.actions.iter().copied());
        board = best.board;
    }

    (board, script)
}

#[test]
fn test_first_pieces_replay_to_same_board() {
    let (board, script) = play_greedy(32);
    assert_eq!(board.step, 32);

    let replayed = cascade_engine::replay_script(&script).expect("script must replay");
    assert!(replayed.bricks_eq(&board));
    assert_eq!(replayed.score, board.score);
    assert_eq!(replayed.step, board.step);
}

#[test]
fn test_script_text_round_trip() {
    let (_, script) = play_greedy(12);
    let text = action::join(&script);
    let parsed = action::parse(&text).expect("rendered script must parse");
    let replayed_direct = cascade_engine::replay_script(&script).unwrap();
    let replayed_parsed = cascade_engine::replay_script(&parsed).unwrap();
    assert!(replayed_direct.bricks_eq(&replayed_parsed));
    assert_eq!(replayed_direct.score, replayed_parsed.score);
}
