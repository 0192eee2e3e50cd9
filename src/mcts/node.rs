//! Tree node storage for the search engine.
//!
//! Every node owns its children directly (`Vec<Node>`); there is no
//! `Rc`/`RefCell`/`Weak` sharing. Selection records the path of child
//! indices it walked from the root, and backpropagation replays that path
//! with a chain of mutable borrows instead of climbing parent pointers.
//! Root promotion (`Engine::apply_action`) simply removes one child from
//! the root's `Vec` and makes it the new root; every sibling subtree is
//! dropped along with the old root.

use crate::board::{Board, Move};

/// A node in the search tree: the board reached here, the move that led to
/// it (`None` only at the root), and the running visit/value statistics
/// accumulated from simulations that passed through it.
#[derive(Debug)]
pub struct Node {
    pub state: Board,
    pub action: Option<Move>,
    pub visits: u32,
    pub total_value: f64,
    /// Prior probability assigned by an evaluator at expansion time.
    /// `1 / children.len()` when no evaluator is attached.
    pub prior: f64,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new_root(state: Board) -> Node {
        Node {
            state,
            action: None,
            visits: 0,
            total_value: 0.0,
            prior: 1.0,
            children: Vec::new(),
        }
    }

    fn new_child(state: Board, action: Move, prior: f64) -> Node {
        Node {
            state,
            action: Some(action),
            visits: 0,
            total_value: 0.0,
            prior,
            children: Vec::new(),
        }
    }

    /// Average value accumulated at this node, from this node's own
    /// side-to-move perspective. Zero for an unvisited node (never read as
    /// a real estimate, since unvisited children always win selection via
    /// infinite score).
    pub fn average_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_value / self.visits as f64
        }
    }

    pub fn record(&mut self, value: f64) {
        self.visits += 1;
        self.total_value += value;
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Populates `children` with one node per legal move, seeding priors
    /// either uniformly or from `priors` (aligned with `legal_moves` by
    /// index) when supplied. Does nothing if already expanded or terminal
    /// (expansion is one-shot and idempotent on re-request). When
    /// `eval_children` is set, each new child is seeded with one visit
    /// worth of its own heuristic evaluation instead of starting at zero,
    /// so it carries a usable estimate before it is ever selected.
    pub fn expand(&mut self, priors: Option<&[f64]>, eval_children: bool) {
        if !self.children.is_empty() || self.is_terminal() {
            return;
        }
        let legal_moves = self.state.legal_moves();
        let uniform = 1.0 / legal_moves.len().max(1) as f64;
        self.children = legal_moves
            .into_iter()
            .enumerate()
            .map(|(i, mv)| {
                let prior = priors.and_then(|p| p.get(i).copied()).unwrap_or(uniform);
                let next_state = self.state.apply(mv);
                let mut child = Node::new_child(next_state, mv, prior);
                if eval_children && !child.is_terminal() {
                    child.record(child.state.heuristic_value());
                }
                child
            })
            .collect();
    }
}
