//! End-to-end rule scenarios driven through the public `Match` API.

use chess_rules::engine::{ChessError, Color, Coordinate, Match, PieceKind};

fn sq(name: &str) -> Coordinate {
    chess_rules::console::parse_coordinate(name).unwrap()
}

fn play(m: &mut Match, from: &str, to: &str) {
    m.play(sq(from), sq(to))
        .unwrap_or_else(|e| panic!("{from}-{to} rejected: {e}"));
}

// =====================================================================
// Setup
// =====================================================================

#[test]
fn starting_position_matches_standard_setup() {
    let m = Match::new();
    assert_eq!(m.current_player(), Color::White);
    assert_eq!(m.turn(), 1);

    let back = PieceKind::BACK_RANK;
    for (i, file) in ('a'..='h').enumerate() {
        for (color, back_rank, pawn_rank) in [(Color::White, 1, 2), (Color::Black, 8, 7)] {
            let piece = m.board().piece(sq(&format!("{file}{back_rank}"))).unwrap();
            assert_eq!((piece.color, piece.kind), (color, back[i]));
            assert_eq!(piece.move_count, 0);

            let pawn = m.board().piece(sq(&format!("{file}{pawn_rank}"))).unwrap();
            assert_eq!((pawn.color, pawn.kind), (color, PieceKind::Pawn));
        }
        for rank in 3..=6 {
            assert!(m.board().piece(sq(&format!("{file}{rank}"))).is_none());
        }
    }
    assert_eq!(m.board().pieces_on_board(Color::White).len(), 16);
    assert_eq!(m.board().pieces_on_board(Color::Black).len(), 16);
}

// =====================================================================
// Execute / undo round trip
// =====================================================================

#[test]
fn every_opening_move_round_trips() {
    let mut m = Match::new();
    play(&mut m, "e2", "e4");
    play(&mut m, "d7", "d5");
    let before = m.board().clone();

    let moves = m.legal_moves(Color::White).unwrap();
    assert!(!moves.is_empty());
    for (from, to) in moves {
        let captured = m.execute_move(from, to).unwrap();
        m.undo_move(from, to, captured).unwrap();
        assert_eq!(m.board(), &before, "{from}-{to} did not round-trip");
    }
    assert!(m.captured(Color::Black).is_empty());
}

// =====================================================================
// Self-check
// =====================================================================

#[test]
fn king_cannot_step_into_attack() {
    let mut m = Match::empty(Color::White);
    m.place_new_piece(PieceKind::King, Color::White, sq("e1")).unwrap();
    m.place_new_piece(PieceKind::Rook, Color::Black, sq("d8")).unwrap();
    m.place_new_piece(PieceKind::King, Color::Black, sq("h8")).unwrap();

    assert_eq!(
        m.play(sq("e1"), sq("d1")),
        Err(ChessError::SelfCheck {
            from: sq("e1"),
            to: sq("d1")
        })
    );
    assert_eq!(m.turn(), 1);
    assert_eq!(m.current_player(), Color::White);
    assert_eq!(m.board().piece(sq("e1")).unwrap().kind, PieceKind::King);

    play(&mut m, "e1", "f2");
    assert_eq!(m.current_player(), Color::Black);
}

// =====================================================================
// Check / checkmate
// =====================================================================

#[test]
fn lone_king_escapes_queen_check() {
    let mut m = Match::empty(Color::White);
    m.place_new_piece(PieceKind::King, Color::White, sq("e1")).unwrap();
    m.place_new_piece(PieceKind::Queen, Color::Black, sq("e8")).unwrap();
    m.place_new_piece(PieceKind::King, Color::Black, sq("a8")).unwrap();

    assert!(m.is_in_check(Color::White).unwrap());
    assert!(!m.is_in_checkmate(Color::White).unwrap());

    for escape in ["d1", "f1"] {
        let mut trial = m.clone();
        play(&mut trial, "e1", escape);
        assert!(!trial.is_in_check(Color::White).unwrap());
    }

    // Staying on the e-file does not help.
    assert!(matches!(
        m.play(sq("e1"), sq("e2")),
        Err(ChessError::SelfCheck { .. })
    ));
}

#[test]
fn scholars_mate_ends_the_match() {
    let mut m = Match::new();
    for (from, to) in [
        ("e2", "e4"),
        ("e7", "e5"),
        ("f1", "c4"),
        ("b8", "c6"),
        ("d1", "h5"),
        ("g8", "f6"),
    ] {
        play(&mut m, from, to);
    }
    let mate = m.play(sq("h5"), sq("f7")).unwrap();
    assert!(mate.check && mate.checkmate);
    assert_eq!(mate.captured, Some(PieceKind::Pawn));
    assert!(m.is_terminated());
    assert_eq!(m.current_player(), Color::White);
    assert_eq!(m.history().len(), 7);
    assert_eq!(
        m.validate_origin(sq("e8")),
        Err(ChessError::GameOver(Color::Black))
    );
}

#[test]
fn check_that_can_be_blocked_is_not_mate() {
    let mut m = Match::new();
    play(&mut m, "e2", "e4");
    play(&mut m, "f7", "f6");
    let rec = m.play(sq("d1"), sq("h5")).unwrap();
    assert!(rec.check);
    assert!(!rec.checkmate);
    assert!(m.check());

    // g6 blocks; anything else that leaves the king exposed is refused.
    assert!(matches!(
        m.play(sq("a7"), sq("a6")),
        Err(ChessError::SelfCheck { .. })
    ));
    play(&mut m, "g7", "g6");
    assert!(!m.check());
}

// =====================================================================
// En passant
// =====================================================================

#[test]
fn en_passant_by_black() {
    let mut m = Match::new();
    play(&mut m, "a2", "a3");
    play(&mut m, "d7", "d5");
    play(&mut m, "a3", "a4");
    play(&mut m, "d5", "d4");
    play(&mut m, "e2", "e4");

    let e4 = m.board().piece_id(sq("e4"));
    assert_eq!(m.en_passant_vulnerable(), e4);

    play(&mut m, "d4", "e3");
    assert!(m.board().piece(sq("e4")).is_none());
    let pawn = m.board().piece(sq("e3")).unwrap();
    assert_eq!((pawn.color, pawn.kind), (Color::Black, PieceKind::Pawn));
    assert_eq!(m.captured(Color::White).len(), 1);
    assert_eq!(m.en_passant_vulnerable(), None);
}

#[test]
fn double_step_only_from_unmoved_pawn() {
    let mut m = Match::new();
    play(&mut m, "e2", "e3");
    play(&mut m, "a7", "a6");
    assert!(matches!(
        m.play(sq("e3"), sq("e5")),
        Err(ChessError::IllegalDestination { .. })
    ));
    play(&mut m, "e3", "e4");
    assert_eq!(m.en_passant_vulnerable(), None);
}

// =====================================================================
// Castling
// =====================================================================

#[test]
fn castling_after_clearing_the_back_rank() {
    let mut m = Match::new();
    for (from, to) in [
        ("g1", "f3"),
        ("g8", "f6"),
        ("e2", "e3"),
        ("e7", "e6"),
        ("f1", "e2"),
        ("f8", "e7"),
    ] {
        play(&mut m, from, to);
    }
    assert!(m.legal_destinations(sq("e1")).unwrap().is_set(sq("g1")));

    play(&mut m, "e1", "g1");
    let king = m.board().piece(sq("g1")).unwrap();
    let rook = m.board().piece(sq("f1")).unwrap();
    assert_eq!(king.kind, PieceKind::King);
    assert_eq!(rook.kind, PieceKind::Rook);
    assert_eq!((king.move_count, rook.move_count), (1, 1));
    assert!(m.board().piece(sq("h1")).is_none());

    play(&mut m, "e8", "g8");
    assert_eq!(m.board().piece(sq("f8")).unwrap().kind, PieceKind::Rook);
}

fn kingside_castling_setup(black_rook: &str) -> Match {
    let mut m = Match::empty(Color::White);
    m.place_new_piece(PieceKind::King, Color::White, sq("e1")).unwrap();
    m.place_new_piece(PieceKind::Rook, Color::White, sq("h1")).unwrap();
    m.place_new_piece(PieceKind::Rook, Color::Black, sq(black_rook)).unwrap();
    m.place_new_piece(PieceKind::King, Color::Black, sq("a8")).unwrap();
    m
}

#[test]
fn castling_through_attacked_square_is_allowed() {
    let mut m = kingside_castling_setup("f8");
    assert!(!m.is_in_check(Color::White).unwrap());

    play(&mut m, "e1", "g1");
    assert_eq!(m.board().piece(sq("g1")).unwrap().kind, PieceKind::King);
    assert_eq!(m.board().piece(sq("f1")).unwrap().kind, PieceKind::Rook);
}

#[test]
fn castling_out_of_check_is_allowed() {
    let mut m = kingside_castling_setup("e8");
    assert!(m.is_in_check(Color::White).unwrap());
    assert!(m.legal_destinations(sq("e1")).unwrap().is_set(sq("g1")));

    play(&mut m, "e1", "g1");
    assert_eq!(m.board().piece(sq("g1")).unwrap().kind, PieceKind::King);
    assert_eq!(m.board().piece(sq("f1")).unwrap().kind, PieceKind::Rook);
    assert!(!m.is_in_check(Color::White).unwrap());
}

#[test]
fn moved_rook_forbids_castling() {
    let mut m = Match::empty(Color::White);
    m.place_new_piece(PieceKind::King, Color::White, sq("e1")).unwrap();
    m.place_new_piece(PieceKind::Rook, Color::White, sq("h1")).unwrap();
    m.place_new_piece(PieceKind::King, Color::Black, sq("a8")).unwrap();

    play(&mut m, "h1", "h2");
    play(&mut m, "a8", "b8");
    play(&mut m, "h2", "h1");
    play(&mut m, "b8", "a8");
    assert!(!m.legal_destinations(sq("e1")).unwrap().is_set(sq("g1")));
}

// =====================================================================
// Origin validation
// =====================================================================

#[test]
fn blocked_piece_has_no_moves() {
    let m = Match::new();
    assert_eq!(
        m.validate_origin(sq("f1")),
        Err(ChessError::NoLegalMoves(sq("f1")))
    );
    assert!(m.validate_origin(sq("b1")).is_ok());
}
