use chess_core::engine::config::EngineConfig;
use chess_core::logic::board::{BoardCoordinate, Color};
use chess_core::logic::session::{GameMode, GameSession, UserMoveOutcome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn sq(s: &str) -> BoardCoordinate {
    s.parse().unwrap()
}

#[test]
fn test_bot_game_runs_to_completion_or_move_limit() {
    let config = EngineConfig::load_from_json(r#"{ "think_delay_ms": [0, 0, 0] }"#).unwrap();
    let mut session = GameSession::new(Arc::new(config));
    session.set_mode(GameMode::Ai);
    session.set_level(2);
    let mut rng = StdRng::seed_from_u64(2024);

    // White is played by a random mover through the public API.
    for _ in 0..40 {
        if session.game().is_game_over() {
            break;
        }
        let (from, to) = {
            let game = session.game();
            let board = game.board();
            let (from, _) = board
                .iter()
                .find(|(coord, piece)| {
                    piece.color == Color::White && !game.move_hints(*coord).is_empty()
                })
                .unwrap();
            (from, game.move_hints(from).first().unwrap().to)
        };

        match session.user_move(from, to) {
            UserMoveOutcome::Moved { ai_to_move, .. } => {
                if !ai_to_move {
                    break;
                }
            }
            other => panic!("move {from}{to} refused: {other:?}"),
        }

        session.begin_ai_turn().unwrap();
        let reply = session.finish_ai_turn(&mut rng).unwrap();
        assert_eq!(reply.color, Color::Black);
    }

    let plies = session.game().history().len();
    assert!(plies > 0);
    let summary = session.game_over_summary();
    assert_eq!(summary.is_some(), session.game().is_game_over());
    assert!(!session.status_line().is_empty());
}

#[test]
fn test_puzzle_rotation() {
    let mut session = GameSession::new(Arc::new(EngineConfig::default()));
    let mut rng = StdRng::seed_from_u64(8);

    let first = session.start_puzzle(&mut rng).unwrap().title.clone();
    let second = session.start_puzzle(&mut rng).unwrap().title.clone();
    assert_ne!(first, second);
    assert_eq!(session.mode(), GameMode::Puzzle);

    // Leaving puzzle mode starts over from the opening position.
    session.set_mode(GameMode::Friend);
    assert!(session.current_puzzle().is_none());
    assert!(matches!(
        session.user_move(sq("g1"), sq("f3")),
        UserMoveOutcome::Moved { .. }
    ));
}
