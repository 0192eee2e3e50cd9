//! The search engine: owns the tree root, drives simulation cycles, and
//! exposes ranked actions. Grounded on the shape of the teacher's
//! `tactical_mcts_search` driver loop and `TacticalMctsStats`, reworked
//! around the single-owner [`Node`] tree and the config's `use_rollout` /
//! `use_puct` / `eval_children` / `use_probs` switches instead of the
//! teacher's fixed tactical-then-NN pipeline.

use super::config::{EngineConfig, Evaluator};
use super::node::Node;
use super::selection::{argmax, puct_score, uct_score};
use super::simulation::random_rollout;
use crate::board::{Board, Move};
use crate::error::{CorridorsError, Result};
use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Running totals kept alongside the tree, surfaced for diagnostics.
/// Grounded on the shape of the teacher's `TacticalMctsStats`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SearchStats {
    pub simulations_run: u64,
    pub nodes_expanded: u64,
}

/// One `(visits, equity, move)` row as reported by [`Engine::ranked_actions`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedAction {
    pub mv: Move,
    pub visits: u32,
    pub equity: f64,
}

pub struct Engine {
    root: Node,
    config: EngineConfig,
    rng: StdRng,
    evaluator: Option<Box<dyn Evaluator>>,
    stats: SearchStats,
}

impl Engine {
    pub fn new(board: Board, config: EngineConfig) -> Result<Engine> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Engine {
            root: Node::new_root(board),
            config,
            rng,
            evaluator: None,
            stats: SearchStats::default(),
        })
    }

    pub fn set_evaluator(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluator = Some(evaluator);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn root_board(&self) -> &Board {
        &self.root.state
    }

    /// Runs one full select/expand/evaluate/backpropagate cycle. A no-op
    /// that returns `Ok(())` immediately if the root is terminal, since
    /// there is nothing left to search.
    pub fn run_simulation(&mut self) -> Result<()> {
        if self.root.is_terminal() {
            return Ok(());
        }
        self.require_evaluator_if_needed("run_simulation")?;
        trace!(
            "run_simulation #{}: selecting from root with {} visits",
            self.stats.simulations_run,
            self.root.visits
        );
        let value = simulate_from(
            &mut self.root,
            &self.config,
            &mut self.rng,
            self.evaluator.as_deref(),
            &mut self.stats,
        );
        self.stats.simulations_run += 1;
        trace!(
            "run_simulation #{}: backpropagated root value {:.4}",
            self.stats.simulations_run,
            value
        );
        Ok(())
    }

    /// `use_probs` commits the engine to asking an evaluator for priors (and
    /// possibly a leaf value) at every expansion; an operation that would
    /// expand a node under that setting with no evaluator attached fails
    /// instead of silently falling back to uniform priors, per the
    /// evaluator-hook contract.
    fn require_evaluator_if_needed(&self, operation: &str) -> Result<()> {
        if self.config.use_probs && self.evaluator.is_none() {
            return Err(CorridorsError::MissingEvaluator {
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    /// Runs simulations in batches of `sim_increment` until at least `n`
    /// have run since the engine was constructed or last had its root
    /// replaced (via [`Engine::reset_root`] / promotion). No-ops on a
    /// terminal root, per the session façade's documented contract. Runs
    /// the full `n` requested, uncapped: `max_simulations` is a façade-level
    /// per-call ceiling (see [`crate::session::Session::ensure_simulations`]),
    /// not a limit the engine itself imposes on its own callers.
    pub fn ensure_simulations(&mut self, n: u32) -> Result<()> {
        if self.root.is_terminal() {
            return Ok(());
        }
        self.require_evaluator_if_needed("ensure_simulations")?;
        let target = n as u64;
        while (self.stats.simulations_run as u64) < target {
            trace!(
                "ensure_simulations: {}/{} simulations run",
                self.stats.simulations_run,
                target
            );
            let batch_end =
                ((self.stats.simulations_run as u64) + self.config.sim_increment as u64).min(target);
            while (self.stats.simulations_run as u64) < batch_end {
                self.run_simulation()?;
                if self.root.is_terminal() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Ensures the root is expanded, then returns one entry per child
    /// sorted by `decide_using_visits` (visit count, else average equity
    /// from the root's own side-to-move perspective), ties broken by
    /// child-list order.
    pub fn ranked_actions(&mut self) -> Result<Vec<RankedAction>> {
        self.ensure_root_expanded()?;
        let mut ranked: Vec<RankedAction> = self
            .root
            .children
            .iter()
            .map(|child| RankedAction {
                mv: child.action.expect("child nodes always carry an action"),
                visits: child.visits,
                // The child's average_value is from the child's own
                // perspective; negate to view it from the root's.
                equity: -child.average_value(),
            })
            .collect();
        if self.config.decide_using_visits {
            ranked.sort_by(|a, b| b.visits.cmp(&a.visits));
        } else {
            ranked.sort_by(|a, b| {
                b.equity.partial_cmp(&a.equity).unwrap_or(std::cmp::Ordering::Equal)
            });
        }
        Ok(ranked)
    }

    pub fn best_action(&mut self) -> Result<Option<RankedAction>> {
        Ok(self.ranked_actions()?.into_iter().next())
    }

    /// Promotes the child reached by `mv` to be the new root, discarding
    /// every sibling subtree. Expands the root first if needed. Fails with
    /// [`CorridorsError::InvalidMove`] if `mv` is not legal at the current
    /// root.
    pub fn apply_action(&mut self, mv: Move) -> Result<()> {
        self.ensure_root_expanded()?;
        let idx = self
            .root
            .children
            .iter()
            .position(|child| child.action == Some(mv))
            .ok_or_else(|| CorridorsError::InvalidMove {
                input: mv.to_string(),
                reason: "move is not legal at the current root".to_string(),
            })?;
        let promoted = self.root.children.swap_remove(idx);
        self.root = promoted;
        self.stats.simulations_run = 0;
        Ok(())
    }

    /// Replaces the root with a fresh board and an empty tree.
    pub fn reset_root(&mut self, board: Board) {
        self.root = Node::new_root(board);
        self.stats = SearchStats::default();
    }

    fn ensure_root_expanded(&mut self) -> Result<()> {
        if !self.root.is_leaf() || self.root.is_terminal() {
            return Ok(());
        }
        self.require_evaluator_if_needed("expand root")?;
        let legal_moves = self.root.state.legal_moves();
        let priors = request_priors(&self.config, self.evaluator.as_deref(), &self.root.state, &legal_moves);
        self.root
            .expand(priors.as_deref(), self.config.eval_children);
        self.stats.nodes_expanded += self.root.children.len() as u64;
        Ok(())
    }
}

fn request_priors(
    config: &EngineConfig,
    evaluator: Option<&dyn Evaluator>,
    board: &Board,
    legal_moves: &[Move],
) -> Option<Vec<f64>> {
    if !config.use_probs {
        return None;
    }
    evaluator.and_then(|e| e.evaluate(board, legal_moves).priors)
}

/// Selects down to a leaf from `node`, expands/evaluates it, and
/// backpropagates, returning the value recorded at `node` from `node`'s
/// own perspective. A free function (rather than an `Engine` method) so it
/// can recurse into owned child nodes while `config`/`rng`/`evaluator`/
/// `stats` stay borrowed independently of the tree it's walking.
fn simulate_from(
    node: &mut Node,
    config: &EngineConfig,
    rng: &mut StdRng,
    evaluator: Option<&dyn Evaluator>,
    stats: &mut SearchStats,
) -> f64 {
    if node.is_terminal() {
        let value = node
            .state
            .terminal_value()
            .expect("is_terminal just confirmed a terminal board") as f64;
        trace!("simulate_from: terminal leaf, value {:.4}", value);
        node.record(value);
        return value;
    }

    if node.is_leaf() {
        let legal_moves = node.state.legal_moves();
        let priors = request_priors(config, evaluator, &node.state, &legal_moves);
        let eval_value = if config.use_probs {
            evaluator.and_then(|e| e.evaluate(&node.state, &legal_moves).value)
        } else {
            None
        };
        node.expand(priors.as_deref(), config.eval_children);
        stats.nodes_expanded += node.children.len() as u64;
        trace!(
            "simulate_from: expanded leaf into {} children",
            node.children.len()
        );

        let value = eval_value.unwrap_or_else(|| {
            if config.use_rollout {
                random_rollout(&node.state, rng)
            } else {
                node.state.heuristic_value()
            }
        });
        trace!("simulate_from: evaluated fresh leaf at {:.4}", value);
        node.record(value);
        return value;
    }

    let parent_visits = node.visits;
    let idx = argmax(node.children.iter().map(|child| {
        if config.use_puct {
            puct_score(
                child.average_value(),
                child.visits,
                parent_visits,
                child.prior,
                config.exploration_c,
            )
        } else {
            uct_score(
                child.average_value(),
                child.visits,
                parent_visits,
                config.exploration_c,
            )
        }
    }))
    .expect("non-terminal node is only reached via expand(), which gives it >=1 child");
    trace!(
        "simulate_from: selected child {}/{} ({} visits)",
        idx,
        node.children.len(),
        node.children[idx].visits
    );

    let child_value = simulate_from(&mut node.children[idx], config, rng, evaluator, stats);
    let value = -child_value;
    trace!("simulate_from: backpropagating {:.4} to this node", value);
    node.record(value);
    value
}
