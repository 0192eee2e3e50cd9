//! Search configuration and the external evaluator hook.

use crate::board::{Board, Move};
use crate::error::{CorridorsError, Result};

/// Tunable knobs for a search engine instance, named after the options a
/// caller configures it with. Grounded on the shape of the teacher's
/// `TacticalMctsConfig`: a plain `Default`-able struct rather than a
/// builder, validated once up front via [`EngineConfig::validate`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Exploration constant `c` in the selection formula. √2 is the usual
    /// choice for UCT; PUCT typically wants something smaller.
    pub exploration_c: f64,
    /// Seeds the rollout RNG. Identical seed + identical inputs yields an
    /// identical tree.
    pub seed: u64,
    /// Lower bound the session façade uses to gate action queries.
    pub min_simulations: u32,
    /// Upper bound the session façade uses per `ensure_simulations` call.
    pub max_simulations: u32,
    /// Batch size `ensure_simulations` works in, so a caller can interleave
    /// polling between batches.
    pub sim_increment: u32,
    /// Leaf evaluation: random playout to terminal if true, the board
    /// heuristic if false.
    pub use_rollout: bool,
    /// Selection formula: PUCT if true (requires priors), UCT if false.
    pub use_puct: bool,
    /// Seed each freshly expanded child with one heuristic-evaluation
    /// visit, so it has a meaningful value before ever being selected.
    pub eval_children: bool,
    /// Ask the attached evaluator for per-child prior probabilities at
    /// expansion time; uniform priors otherwise.
    pub use_probs: bool,
    /// Rank actions by visit count if true, by average equity if false.
    pub decide_using_visits: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            exploration_c: std::f64::consts::SQRT_2,
            seed: 0,
            min_simulations: 0,
            max_simulations: 1_000,
            sim_increment: 64,
            use_rollout: true,
            use_puct: false,
            eval_children: false,
            use_probs: false,
            decide_using_visits: true,
        }
    }
}

impl EngineConfig {
    /// Rejects configurations that can't drive a meaningful search: a
    /// non-finite/negative exploration constant, a zero batch size, or
    /// bounds that make `min_simulations`/`max_simulations` contradictory.
    pub fn validate(&self) -> Result<()> {
        if !self.exploration_c.is_finite() || self.exploration_c < 0.0 {
            return Err(CorridorsError::InvalidConfiguration {
                reason: "exploration_c must be a non-negative finite number".to_string(),
            });
        }
        if self.sim_increment == 0 {
            return Err(CorridorsError::InvalidConfiguration {
                reason: "sim_increment must be positive".to_string(),
            });
        }
        if self.max_simulations == 0 {
            return Err(CorridorsError::InvalidConfiguration {
                reason: "max_simulations must be positive".to_string(),
            });
        }
        if self.min_simulations > self.max_simulations {
            return Err(CorridorsError::InvalidConfiguration {
                reason: "min_simulations must not exceed max_simulations".to_string(),
            });
        }
        if self.use_puct && !self.use_probs {
            return Err(CorridorsError::InvalidConfiguration {
                reason: "use_puct requires use_probs (PUCT needs priors)".to_string(),
            });
        }
        Ok(())
    }
}

/// What an [`Evaluator`] hands back for a given board.
#[derive(Debug, Clone, Default)]
pub struct EvalOutput {
    /// Prior probabilities aligned with the `legal_moves` slice passed to
    /// `evaluate`, ideally summing to 1.0. `None` means "use uniform
    /// priors".
    pub priors: Option<Vec<f64>>,
    /// A scalar value estimate in `[-1, 1]` from the board's own
    /// side-to-move perspective. `None` means "fall back to rollout or the
    /// static heuristic".
    pub value: Option<f64>,
}

/// External policy/value provider. Plugging one in replaces uniform priors
/// and/or random rollouts with whatever the implementor computes (a neural
/// net, a handcrafted evaluation, a lookup table). Modeled on the teacher's
/// `PolicyNetwork` trait, generalized to a single call that can return
/// either or both of priors and a value so the engine doesn't need to know
/// which the implementor actually supplies.
pub trait Evaluator {
    fn evaluate(&self, board: &Board, legal_moves: &[Move]) -> EvalOutput;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn negative_exploration_constant_is_rejected() {
        let config = EngineConfig {
            exploration_c: -1.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_sim_increment_is_rejected() {
        let config = EngineConfig {
            sim_increment: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn puct_without_probs_is_rejected() {
        let config = EngineConfig {
            use_puct: true,
            use_probs: false,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_simulation_bounds_are_rejected() {
        let config = EngineConfig {
            min_simulations: 100,
            max_simulations: 10,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
