//! Terminal front-end: board rendering, coordinate input, and the
//! prompt-validate-play loop.
//!
//! The engine never sees raw text. This module turns `"e2"` into a
//! [`Coordinate`] and prints whatever the engine reports.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::AppConfig;
use crate::engine::{Board, ChessError, Color, Coordinate, Match, MoveMap};

// =========================================================================
// Rendering
// =========================================================================

/// Render the board with the first row (rank 8) at the top.
///
/// Pieces are letters (uppercase White), empty squares are `.`, and squares
/// in `highlight` are followed by `*`.
pub fn render_board(board: &Board, highlight: Option<&MoveMap>) -> String {
    let mut s = String::with_capacity(200);
    for row in 0..board.rows() {
        let mut line = format!("{} ", board.rows() - row);
        for col in 0..board.cols() {
            let at = Coordinate::new(row, col);
            line.push(board.piece(at).map_or('.', |p| p.symbol()));
            let marked = highlight.is_some_and(|h| h.is_set(at));
            line.push(if marked { '*' } else { ' ' });
        }
        s.push_str(line.trim_end());
        s.push('\n');
    }
    s.push_str("  ");
    let files: Vec<String> = (0..board.cols())
        .map(|c| ((b'a' + c as u8) as char).to_string())
        .collect();
    s.push_str(&files.join(" "));
    s
}

/// One line per color listing the pieces it has lost, e.g. `white: [P, N]`.
pub fn render_captured(m: &Match) -> String {
    let line = |color: Color| {
        let symbols: Vec<String> = m
            .captured(color)
            .into_iter()
            .map(|id| m.board().get(id).symbol().to_string())
            .collect();
        format!("{color}: [{}]", symbols.join(", "))
    };
    format!(
        "Captured pieces:\n{}\n{}",
        line(Color::White),
        line(Color::Black)
    )
}

// =========================================================================
// Input
// =========================================================================

/// Parse file/rank text such as `"e2"` into a coordinate.
pub fn parse_coordinate(text: &str) -> Result<Coordinate, ChessError> {
    let text = text.trim();
    let mut chars = text.chars();
    let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
        return Err(ChessError::InvalidSquare(text.to_string()));
    };
    let rank = rank
        .to_digit(10)
        .ok_or_else(|| ChessError::InvalidSquare(text.to_string()))?;
    Coordinate::from_file_rank(file, rank as u8)
}

fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    label: &str,
) -> io::Result<Option<String>> {
    write!(out, "{label}: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

// =========================================================================
// Loop
// =========================================================================

/// Drive `m` from `input` until checkmate or end of input.
///
/// Rule violations are printed and the player is asked again; only I/O
/// failures end the loop with an error.
pub fn run(
    m: &mut Match,
    mut input: impl BufRead,
    mut out: impl Write,
    config: &AppConfig,
) -> io::Result<()> {
    while !m.is_terminated() {
        writeln!(out)?;
        writeln!(out, "{}", render_board(m.board(), None))?;
        if config.show_captured {
            writeln!(out, "{}", render_captured(m))?;
        }
        writeln!(out, "Turn: {}", m.turn())?;
        writeln!(out, "Waiting for: {}", m.current_player())?;
        if m.check() {
            writeln!(out, "CHECK!")?;
        }

        let Some(line) = prompt(&mut input, &mut out, "Origin")? else {
            debug!(match_id = %m.id, "input closed");
            return Ok(());
        };
        let origin = parse_coordinate(&line).and_then(|c| m.validate_origin(c).map(|()| c));
        let origin = match origin {
            Ok(c) => c,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        if config.highlight_moves
            && let Ok(map) = m.legal_destinations(origin)
        {
            writeln!(out)?;
            writeln!(out, "{}", render_board(m.board(), Some(&map)))?;
        }

        let Some(line) = prompt(&mut input, &mut out, "Destination")? else {
            debug!(match_id = %m.id, "input closed");
            return Ok(());
        };
        let played = parse_coordinate(&line).and_then(|dest| m.play(origin, dest));
        if let Err(e) = played {
            writeln!(out, "{e}")?;
            continue;
        }

        if config.snapshot_json {
            let json = serde_json::to_string(&m.snapshot()).map_err(io::Error::other)?;
            writeln!(out, "{json}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "{}", render_board(m.board(), None))?;
    writeln!(out, "CHECKMATE!")?;
    writeln!(out, "Winner: {}", m.current_player())?;
    Ok(())
}

// =========================================================================
// Tests
// =========================================================================
