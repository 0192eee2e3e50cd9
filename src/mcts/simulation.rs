//! Random rollout used when a leaf has no attached evaluator, or as the
//! fallback once an evaluator declines to return a value.

use crate::board::Board;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Upper bound on rollout plies before falling back to the static
/// heuristic, mirroring the teacher's `MAX_PLAYOUT_DEPTH` guard against
/// pathologically long random games.
const MAX_ROLLOUT_PLIES: u32 = 200;

/// Plays uniformly random legal moves from `state` until the game ends or
/// the depth cap is hit, returning a value in `[-1, 1]` from `state`'s own
/// side-to-move perspective (positive favors whoever is to move at
/// `state`).
pub fn random_rollout(state: &Board, rng: &mut StdRng) -> f64 {
    let mut board = *state;
    let mut sign = 1.0;

    for _ in 0..MAX_ROLLOUT_PLIES {
        if board.is_terminal() {
            let terminal = board
                .terminal_value()
                .expect("is_terminal just confirmed a terminal board");
            return sign * terminal as f64;
        }

        let legal = board.legal_moves();
        let mv = *legal
            .choose(rng)
            .expect("non-terminal board always has a legal move");
        board = board.apply(mv);
        sign = -sign;
    }

    sign * board.heuristic_value()
}
