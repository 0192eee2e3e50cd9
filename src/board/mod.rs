//! The Corridors board: pawn positions, remaining wall counts, and the two
//! wall lattices, always represented from the perspective of the side to
//! move ("hero"). There is no separate `to_move` flag — [`Board::apply`]
//! performs a perspective swap after every move, so "hero" and "side to
//! move" are the same thing by construction. This trades a one-bit flag for
//! a swap on every ply; the swap is already mandatory for the negamax-style
//! scoring the search engine relies on, so the flag would be redundant
//! state that could drift out of sync with it.

pub mod geometry;
pub mod notation;
pub mod reachability;

use crate::error::{CorridorsError, Result};
use geometry::{
    flip_cell, flip_walls, h_wall_conflicts, neighbor_cell, step_blocked, v_wall_conflicts, Dir,
    BOARD_SIZE, WALL_LATTICE,
};
use reachability::BfsScratch;
use std::fmt;

pub const STARTING_WALLS: u8 = 10;
const HERO_GOAL_ROW: u8 = BOARD_SIZE - 1;
const VILLAIN_GOAL_ROW: u8 = 0;

/// Steepness of the heuristic's `tanh` squashing. Tuned so that a
/// difference of a handful of steps already saturates close to +/-1, which
/// keeps rollout fallback values informative without needing exact path
/// lengths to dominate the signal.
const HEURISTIC_SCALE: f64 = 0.2;

/// A legal action: a pawn step (including jumps, which are just a step onto
/// or past the opposing pawn), or a wall placed at a lattice corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Move {
    Step { x: u8, y: u8 },
    Horizontal { x: u8, y: u8 },
    Vertical { x: u8, y: u8 },
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", notation::format_move(self))
    }
}

impl std::str::FromStr for Move {
    type Err = CorridorsError;

    fn from_str(s: &str) -> Result<Move> {
        notation::parse_move(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    hero: (u8, u8),
    villain: (u8, u8),
    hero_walls_left: u8,
    villain_walls_left: u8,
    h_walls: u64,
    v_walls: u64,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// The standard Corridors starting position: both pawns centered on
    /// their home row, ten walls each, empty lattice.
    pub fn new() -> Board {
        Board {
            hero: (4, 0),
            villain: (4, HERO_GOAL_ROW),
            hero_walls_left: STARTING_WALLS,
            villain_walls_left: STARTING_WALLS,
            h_walls: 0,
            v_walls: 0,
        }
    }

    pub fn hero_position(&self) -> (u8, u8) {
        self.hero
    }

    pub fn villain_position(&self) -> (u8, u8) {
        self.villain
    }

    pub fn hero_walls_left(&self) -> u8 {
        self.hero_walls_left
    }

    pub fn villain_walls_left(&self) -> u8 {
        self.villain_walls_left
    }

    /// Every move legal for the side to move, in deterministic order: pawn
    /// steps first (sorted by destination), then horizontal walls, then
    /// vertical walls (both sorted by anchor corner) — the same ordering
    /// `Move`'s derived `Ord` gives when moves are sorted, since `*` moves
    /// are declared before `H` before `V`.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = self.legal_pawn_moves();
        moves.sort_unstable();

        let mut walls = Vec::new();
        if self.hero_walls_left > 0 {
            let mut scratch = BfsScratch::new();
            for y in 0..WALL_LATTICE {
                for x in 0..WALL_LATTICE {
                    if !h_wall_conflicts(self.h_walls, self.v_walls, x, y)
                        && self.wall_preserves_paths(x, y, true, &mut scratch)
                    {
                        walls.push(Move::Horizontal { x, y });
                    }
                    if !v_wall_conflicts(self.h_walls, self.v_walls, x, y)
                        && self.wall_preserves_paths(x, y, false, &mut scratch)
                    {
                        walls.push(Move::Vertical { x, y });
                    }
                }
            }
        }
        walls.sort_unstable();

        moves.extend(walls);
        moves
    }

    fn legal_pawn_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(5);
        let (hx, hy) = self.hero;

        for dir in Dir::ALL {
            let Some(straight) = neighbor_cell(hx, hy, dir) else {
                continue;
            };
            if step_blocked(self.h_walls, self.v_walls, hx, hy, dir) {
                continue;
            }
            if straight != self.villain {
                out.push(Move::Step {
                    x: straight.0,
                    y: straight.1,
                });
                continue;
            }

            // The straight neighbor holds the opposing pawn: try to jump
            // over it, falling back to diagonal side-steps if the square
            // beyond is blocked or off the board.
            let (vx, vy) = self.villain;
            let beyond = neighbor_cell(vx, vy, dir)
                .filter(|_| !step_blocked(self.h_walls, self.v_walls, vx, vy, dir));

            if let Some((bx, by)) = beyond {
                out.push(Move::Step { x: bx, y: by });
            } else {
                for pd in dir.perpendicular() {
                    if let Some((dx, dy)) = neighbor_cell(vx, vy, pd) {
                        if !step_blocked(self.h_walls, self.v_walls, vx, vy, pd) {
                            out.push(Move::Step { x: dx, y: dy });
                        }
                    }
                }
            }
        }
        out
    }

    /// Whether placing a wall of the given orientation at `(x, y)` leaves
    /// both pawns with a path to their goal row.
    fn wall_preserves_paths(
        &self,
        x: u8,
        y: u8,
        horizontal: bool,
        scratch: &mut BfsScratch,
    ) -> bool {
        let mut h = self.h_walls;
        let mut v = self.v_walls;
        if horizontal {
            geometry::set_h_wall(&mut h, x, y);
        } else {
            geometry::set_v_wall(&mut v, x, y);
        }
        scratch
            .distance_to_row(h, v, self.hero, HERO_GOAL_ROW)
            .is_some()
            && scratch
                .distance_to_row(h, v, self.villain, VILLAIN_GOAL_ROW)
                .is_some()
    }

    /// Applies a move and returns the resulting board, perspective-swapped
    /// so the mover's opponent becomes the new "hero". Applying a move
    /// absent from [`Board::legal_moves`] is a contract violation: the
    /// caller is expected to have checked legality (or obtained the move
    /// from `legal_moves` itself), so this only asserts it in debug builds
    /// rather than threading a `Result` through the hot simulation path.
    pub fn apply(&self, mv: Move) -> Board {
        debug_assert!(
            self.legal_moves().contains(&mv),
            "apply called with illegal move {:?}",
            mv
        );

        let mut next = *self;
        match mv {
            Move::Step { x, y } => next.hero = (x, y),
            Move::Horizontal { x, y } => {
                geometry::set_h_wall(&mut next.h_walls, x, y);
                next.hero_walls_left -= 1;
            }
            Move::Vertical { x, y } => {
                geometry::set_v_wall(&mut next.v_walls, x, y);
                next.hero_walls_left -= 1;
            }
        }

        Board {
            hero: flip_cell(next.villain),
            villain: flip_cell(next.hero),
            hero_walls_left: next.villain_walls_left,
            villain_walls_left: next.hero_walls_left,
            h_walls: flip_walls(next.h_walls),
            v_walls: flip_walls(next.v_walls),
        }
    }

    /// Whether either pawn has reached its goal row.
    pub fn is_terminal(&self) -> bool {
        self.hero.1 == HERO_GOAL_ROW || self.villain.1 == VILLAIN_GOAL_ROW
    }

    /// +1 if hero has reached its goal row, -1 if villain has reached its
    /// own goal row. Defined only when [`Board::is_terminal`] holds;
    /// calling it otherwise is a precondition violation rather than a
    /// user-correctable error, since non-terminal boards have no outcome to
    /// report.
    pub fn terminal_value(&self) -> Result<i8> {
        if self.hero.1 == HERO_GOAL_ROW {
            Ok(1)
        } else if self.villain.1 == VILLAIN_GOAL_ROW {
            Ok(-1)
        } else {
            debug_assert!(false, "terminal_value queried on a non-terminal board");
            Err(CorridorsError::PreconditionViolation {
                reason: "terminal_value queried on a non-terminal board".to_string(),
            })
        }
    }

    /// A cheap static evaluation from hero's perspective, used as the
    /// rollout fallback when no evaluator is attached: `tanh` of the
    /// difference between villain's and hero's shortest path length to
    /// their respective goal rows. Positive favors hero.
    pub fn heuristic_value(&self) -> f64 {
        let mut scratch = BfsScratch::new();
        // 100 mirrors the Quoridor reference implementation's sentinel for
        // "no path found", which invariant 2 guarantees never actually
        // happens on a reachable board but keeps this total outside of
        // that invariant's enforcement.
        let hero_dist = scratch
            .distance_to_row(self.h_walls, self.v_walls, self.hero, HERO_GOAL_ROW)
            .unwrap_or(100) as f64;
        let villain_dist = scratch
            .distance_to_row(self.h_walls, self.v_walls, self.villain, VILLAIN_GOAL_ROW)
            .unwrap_or(100) as f64;
        (HEURISTIC_SCALE * (villain_dist - hero_dist)).tanh()
    }

    /// Renders a human-readable ASCII board, hero's own row at the bottom.
    pub fn render(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        let _ = writeln!(out, "  +{}+", "--".repeat(BOARD_SIZE as usize));
        for y in (0..BOARD_SIZE).rev() {
            let _ = write!(out, "{} | ", y);
            for x in 0..BOARD_SIZE {
                let mark = if (x, y) == self.hero {
                    'H'
                } else if (x, y) == self.villain {
                    'V'
                } else {
                    '.'
                };
                let _ = write!(out, "{} ", mark);
            }
            let _ = writeln!(out, "|");
        }
        let _ = writeln!(out, "  +{}+", "--".repeat(BOARD_SIZE as usize));
        let _ = writeln!(
            out,
            "  walls: hero {} / villain {}",
            self.hero_walls_left, self.villain_walls_left
        );
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
