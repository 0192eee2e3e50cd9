//! A long-lived wrapper around one [`Engine`] over one game in progress.
//! Grounded on the teacher's `UCIEngine` (`src/uci.rs`): a stateful struct
//! that an external driver calls into repeatedly across one session,
//! reworked away from the UCI text protocol loop down to the six
//! operations this crate exposes.

use crate::board::{Board, Move};
use crate::error::Result;
use crate::mcts::{Engine, EngineConfig, Evaluator, RankedAction};
use log::{debug, warn};

/// One `(visits, equity, move_text)` row, as returned by
/// [`Session::ranked_actions`].
#[derive(Debug, Clone, PartialEq)]
pub struct RankedActionView {
    pub move_text: String,
    pub visits: u32,
    pub equity: f64,
}

pub struct Session {
    engine: Engine,
    config: EngineConfig,
}

impl Session {
    pub fn new(config: EngineConfig) -> Result<Session> {
        config.validate()?;
        let engine = Engine::new(Board::new(), config.clone())?;
        Ok(Session { engine, config })
    }

    pub fn with_evaluator(mut self, evaluator: Box<dyn Evaluator>) -> Session {
        self.engine.set_evaluator(evaluator);
        self
    }

    /// Runs simulations until at least `n` have executed since the last
    /// `commit`/`reset`, capped at the configured `max_simulations` per
    /// call (the engine itself runs the full count it's asked for; this
    /// façade is what turns `max_simulations` into the upper bound §4.3
    /// names it as). No-ops on a terminal root.
    pub fn ensure_simulations(&mut self, n: u32) -> Result<()> {
        let capped = n.min(self.config.max_simulations);
        if capped < n {
            debug!(
                "ensure_simulations({}): capped to max_simulations={}",
                n, capped
            );
        }
        self.engine.ensure_simulations(capped)?;
        debug!(
            "ensure_simulations({}): {} simulations run this root",
            n,
            self.engine.stats().simulations_run
        );
        Ok(())
    }

    /// Ranked `(visits, equity, move_text)` rows for every legal move at
    /// the root, from the root's own side-to-move perspective. First tops
    /// the engine up to `min_simulations` (the configured lower bound
    /// action queries are gated on), then expands the root if it hasn't
    /// been already. Fails with `MissingEvaluator` if the configuration
    /// requires priors from an evaluator that was never attached via
    /// [`Session::with_evaluator`].
    pub fn ranked_actions(&mut self) -> Result<Vec<RankedActionView>> {
        self.engine.ensure_simulations(self.config.min_simulations)?;
        Ok(self
            .engine
            .ranked_actions()?
            .into_iter()
            .map(RankedActionView::from)
            .collect())
    }

    /// First element of [`Session::ranked_actions`], subject to the same
    /// `min_simulations` gating.
    pub fn best_action(&mut self) -> Result<Option<RankedActionView>> {
        Ok(self.ranked_actions()?.into_iter().next())
    }

    /// Parses `move_text`, verifies it is legal at the root, and promotes
    /// the matching child subtree to be the new root. Fails with
    /// `InvalidMove` if the text doesn't parse or isn't legal here.
    pub fn commit(&mut self, move_text: &str) -> Result<()> {
        let mv: Move = match move_text.parse() {
            Ok(mv) => mv,
            Err(err) => {
                warn!("commit rejected unparseable move {:?}", move_text);
                return Err(err);
            }
        };
        match self.engine.apply_action(mv) {
            Ok(()) => {
                debug!("committed {} as new root", move_text);
                Ok(())
            }
            Err(err) => {
                warn!("commit rejected illegal move {:?}", move_text);
                Err(err)
            }
        }
    }

    /// A stable human-readable rendering of the current root board.
    pub fn display(&self) -> String {
        self.engine.root_board().render()
    }

    /// Replaces the root with a fresh initial board, discarding the tree.
    pub fn reset(&mut self) {
        debug!("resetting session to a fresh board");
        self.engine.reset_root(Board::new());
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl From<RankedAction> for RankedActionView {
    fn from(action: RankedAction) -> RankedActionView {
        RankedActionView {
            move_text: action.mv.to_string(),
            visits: action.visits,
            equity: action.equity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_has_one_ranked_action_per_legal_move() {
        let mut session = Session::new(EngineConfig {
            seed: 9,
            ..EngineConfig::default()
        })
        .unwrap();
        let ranked = session.ranked_actions().unwrap();
        assert_eq!(ranked.len(), Board::new().legal_moves().len());
    }

    #[test]
    fn commit_rejects_unparseable_text() {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        assert!(session.commit("not a move").is_err());
    }

    #[test]
    fn commit_reuses_statistics_from_the_promoted_child() {
        let mut session = Session::new(EngineConfig {
            seed: 11,
            ..EngineConfig::default()
        })
        .unwrap();
        session.ensure_simulations(30).unwrap();
        let chosen = session.best_action().unwrap().unwrap().move_text;
        session.commit(&chosen).unwrap();
        // The simulations-since-commit counter resets, but committing
        // itself must succeed and leave the new root queryable.
        assert!(!session.ranked_actions().unwrap().is_empty() || session.display().contains("walls"));
    }

    #[test]
    fn reset_returns_to_the_opening_position() {
        let mut session = Session::new(EngineConfig::default()).unwrap();
        session.commit("*(4,1)").unwrap();
        session.reset();
        assert_eq!(
            session.ranked_actions().unwrap().len(),
            Board::new().legal_moves().len()
        );
    }

    #[test]
    fn use_probs_without_evaluator_fails_with_missing_evaluator() {
        let mut session = Session::new(EngineConfig {
            seed: 12,
            use_probs: true,
            ..EngineConfig::default()
        })
        .unwrap();
        assert!(matches!(
            session.ranked_actions(),
            Err(crate::error::CorridorsError::MissingEvaluator { .. })
        ));
    }
}
