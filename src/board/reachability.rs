//! Breadth-first shortest-path search used both to reject wall placements
//! that would seal off a pawn's goal row and to score non-terminal boards.
//!
//! The search space is fixed (81 cells), so a scratch buffer is reused
//! across the up to 128 wall-legality checks a single `legal_moves()` call
//! can perform, instead of allocating a fresh queue and visited-set each
//! time (mirrors the goal-row BFS/Dijkstra in the Quoridor reference
//! implementation this module is grounded on, minus its per-call graph
//! allocation).

use super::geometry::{neighbor_cell, step_blocked, Dir, BOARD_SIZE};
use std::collections::VecDeque;

/// Reusable BFS scratch space. Call [`BfsScratch::distance_to_row`] as many
/// times as needed; each call resets internal state in O(cells visited).
pub struct BfsScratch {
    visited: u128,
    queue: VecDeque<(u8, u8)>,
}

impl BfsScratch {
    pub fn new() -> Self {
        BfsScratch {
            visited: 0,
            queue: VecDeque::with_capacity((BOARD_SIZE as usize) * (BOARD_SIZE as usize)),
        }
    }

    /// Shortest number of pawn steps from `start` to any cell on row
    /// `goal_y`, or `None` if no such path exists under the current walls.
    pub fn distance_to_row(
        &mut self,
        h_walls: u64,
        v_walls: u64,
        start: (u8, u8),
        goal_y: u8,
    ) -> Option<u32> {
        self.visited = 0;
        self.queue.clear();

        let start_bit = cell_index(start);
        self.visited |= 1u128 << start_bit;
        self.queue.push_back((start, 0));

        if start.1 == goal_y {
            return Some(0);
        }

        while let Some(((x, y), dist)) = self.pop() {
            for dir in Dir::ALL {
                let Some(next) = neighbor_cell(x, y, dir) else {
                    continue;
                };
                if step_blocked(h_walls, v_walls, x, y, dir) {
                    continue;
                }
                let bit = 1u128 << cell_index(next);
                if self.visited & bit != 0 {
                    continue;
                }
                self.visited |= bit;
                if next.1 == goal_y {
                    return Some(dist + 1);
                }
                self.queue.push_back((next, dist + 1));
            }
        }
        None
    }

    fn pop(&mut self) -> Option<((u8, u8), u32)> {
        self.queue.pop_front()
    }
}

impl Default for BfsScratch {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_index((x, y): (u8, u8)) -> u32 {
    y as u32 * BOARD_SIZE as u32 + x as u32
}
