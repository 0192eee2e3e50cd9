//! Canonical move text: `*(x,y)` for a pawn step or jump, `H(x,y)` /
//! `V(x,y)` for a wall anchored at lattice corner `(x,y)`. Hand-rolled
//! `char`/`str` parsing, matching the teacher's own preference for parsing
//! its algebraic move notation by hand rather than pulling in a
//! parser-combinator crate.

use super::Move;
use crate::error::{CorridorsError, Result};

pub fn format_move(mv: &Move) -> String {
    match *mv {
        Move::Step { x, y } => format!("*({},{})", x, y),
        Move::Horizontal { x, y } => format!("H({},{})", x, y),
        Move::Vertical { x, y } => format!("V({},{})", x, y),
    }
}

pub fn parse_move(input: &str) -> Result<Move> {
    let bad = |reason: &str| CorridorsError::InvalidMove {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let kind = chars.next().ok_or_else(|| bad("empty move text"))?;
    let rest = chars.as_str();

    let inner = rest
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| bad("expected coordinates in parentheses"))?;

    let (x_str, y_str) = inner
        .split_once(',')
        .ok_or_else(|| bad("expected \"x,y\" coordinate pair"))?;

    let x: u8 = x_str
        .trim()
        .parse()
        .map_err(|_| bad("x coordinate is not an integer"))?;
    let y: u8 = y_str
        .trim()
        .parse()
        .map_err(|_| bad("y coordinate is not an integer"))?;

    match kind {
        '*' => Ok(Move::Step { x, y }),
        'H' | 'h' => Ok(Move::Horizontal { x, y }),
        'V' | 'v' => Ok(Move::Vertical { x, y }),
        _ => Err(bad("unrecognized move token, expected '*', 'H', or 'V'")),
    }
}
