use arbiter::error::{ParseError, PositionError};
use arbiter::replay::{replay_line, replay_stream};
use arbiter::status::GameStatus;

#[test]
fn clean_game_reports_final_position() {
    let game = replay_line("e2e4 e7e5 g1f3 b8c6 f1b5 ");
    assert!(game.is_ok());
    assert_eq!(game.moves.len(), 5);
    assert_eq!(
        game.final_fen,
        "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3"
    );
    assert_eq!(game.status, GameStatus::InPlay);
}

#[test]
fn engine_flags_are_recomputed() {
    let game = replay_line("e2e4 a7a6 e4e5 d7d5 e5d6");
    assert!(game.is_ok());
    assert!(game.moves[4].is_en_passant());
    assert!(game.moves[4].is_capture());
    assert!(game.moves[0].is_double_pawn_push());
}

#[test]
fn mate_line_reports_checkmate() {
    let game = replay_line("f2f3 e7e5 g2g4 d8h4");
    assert_eq!(game.status, GameStatus::Checkmate);
}

#[test]
fn move_after_mate_is_illegal() {
    let game = replay_line("f2f3 e7e5 g2g4 d8h4 e1f2");
    let failure = game.failure.unwrap();
    assert_eq!(failure.ply, 5);
    assert_eq!(
        failure.error,
        PositionError::IllegalMove {
            notation: "e1f2".to_string()
        }
    );
}

#[test]
fn malformed_token_is_a_parse_failure() {
    let game = replay_line("e2e4 e7e9");
    let failure = game.failure.unwrap();
    assert_eq!(failure.ply, 2);
    assert_eq!(
        failure.error,
        PositionError::Parse(ParseError::Square("e9".to_string()))
    );
}

#[test]
fn stream_keeps_going_after_failures() {
    let input = "\
e2e4 e7e5 \n\
e2e5 \n\
\n\
d2d4 d7d5 c2c4 \n\
g1f3 g8f6 f3g5 f6g4 g5f7 g4f2 f7d8 f2d1 d8b7 \n";
    let report = replay_stream(input.as_bytes()).unwrap();
    assert_eq!(report.game_count(), 4);
    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.passed_count(), 3);

    let failed: Vec<usize> = report.failures().map(|g| g.line).collect();
    assert_eq!(failed, vec![2]);
    assert_eq!(report.games[2].line, 4);
    assert_eq!(report.games[0].move_text(), "e2e4 e7e5");
}

#[test]
fn empty_stream_is_an_empty_report() {
    let report = replay_stream("".as_bytes()).unwrap();
    assert_eq!(report.game_count(), 0);
    assert_eq!(report.failures().count(), 0);
}

#[test]
fn invalid_utf8_fails_its_game_only() {
    let input: &[u8] = b"e2e4 e7e5\n\xff\xfe garbage\nd2d4 d7d5\r\n";
    let report = replay_stream(input).unwrap();
    assert_eq!(report.game_count(), 3);
    assert_eq!(report.failure_count(), 1);

    let bad = &report.games[1];
    assert_eq!(bad.line, 2);
    let failure = bad.failure.as_ref().unwrap();
    assert_eq!(failure.ply, 1);
    assert!(matches!(failure.error, PositionError::Parse(_)));

    assert!(report.games[2].is_ok());
    assert_eq!(report.games[2].tokens, vec!["d2d4", "d7d5"]);
}
