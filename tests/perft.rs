//! Perft: exhaustive move-generation correctness suite.
//!
//! Counts the leaf nodes of the legal move tree and compares them with the
//! published values for the starting position. A mismatch means a bug in
//! move generation, execute/undo, or self-check filtering.
//!
//! Reference: <https://www.chessprogramming.org/Perft_Results>

use chess_rules::engine::Match;

/// Recursive perft: count leaf nodes at `depth`.
fn perft(m: &mut Match, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    if m.is_terminated() {
        return 0;
    }
    let moves = m.legal_moves(m.current_player()).unwrap();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0u64;
    for (from, to) in moves {
        let mut child = m.clone();
        child.play(from, to).unwrap();
        nodes += perft(&mut child, depth - 1);
    }
    nodes
}

#[test]
fn perft_start_depth_1() {
    assert_eq!(perft(&mut Match::new(), 1), 20);
}

#[test]
fn perft_start_depth_2() {
    assert_eq!(perft(&mut Match::new(), 2), 400);
}

#[test]
fn perft_start_depth_3() {
    assert_eq!(perft(&mut Match::new(), 3), 8_902);
}

#[test]
fn perft_start_depth_4() {
    assert_eq!(perft(&mut Match::new(), 4), 197_281);
}

#[test]
fn perft_leaves_match_untouched() {
    let mut m = Match::new();
    let before = m.board().clone();
    perft(&mut m, 2);
    assert_eq!(m.board(), &before);
    assert_eq!(m.turn(), 1);
}
