//! ABC configuration.
//!
//! [`AbcConfig`] holds every parameter that controls the colony loop.

use super::init::Initialization;
use super::mutation::Mutation;
use super::scaling::ScalingConfig;
use super::selection::Selection;
use super::types::Direction;
use crate::error::{AbcError, Result};

/// Configuration for the Artificial Bee Colony.
///
/// # Defaults
///
/// ```
/// use u_beecolony::abc::AbcConfig;
///
/// let config = AbcConfig::default();
/// assert_eq!(config.colony_size, 40);
/// assert_eq!(config.employed_bees(), 20);
/// assert_eq!(config.onlooker_bees(), 20);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_beecolony::abc::{AbcConfig, Mutation, Selection};
///
/// let config = AbcConfig::default()
///     .with_colony_size(60)
///     .with_max_iters(500)
///     .with_mutation(Mutation::BestOne)
///     .with_selection(Selection::Tournament(4))
///     .with_self_adaptive_sf(true)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbcConfig {
    /// Total number of bees (employed + onlooker).
    pub colony_size: usize,

    /// Number of employed bees (food sources).
    ///
    /// `None` splits the colony evenly: `colony_size / 2` (at least 1).
    pub n_employed_bees: Option<usize>,

    /// Maximum number of iterations (full employed/onlooker/scout cycles).
    pub max_iters: usize,

    /// Failed-improvement count at which a food source is abandoned.
    ///
    /// `None` uses `ceil(0.6 * employed * dim)`, at least 1.
    pub limit: Option<usize>,

    /// Maximum scout reinitializations per iteration.
    ///
    /// `None` allows every employed bee to scout in the same iteration.
    pub max_scouts: Option<usize>,

    /// Placement rule for initial and scouted food sources.
    pub initialization: Initialization,

    /// Neighbor-generation strategy.
    pub mutation: Mutation,

    /// Donor and onlooker-target selection strategy.
    pub selection: Selection,

    /// Scaling-factor controller parameters.
    pub scaling: ScalingConfig,

    /// Per-dimension perturbation probability for [`Mutation::Modified`].
    pub mr: f64,

    /// Minimum improvement of the best value over `stagnation_window`
    /// iterations; if not exceeded the run stops early.
    ///
    /// `None` disables stagnation-based termination (the default).
    pub stagnation_tol: Option<f64>,

    /// Trailing window (in iterations) for the stagnation check.
    pub stagnation_window: usize,

    /// Minimize (default) or maximize the objective.
    pub direction: Direction,

    /// Evaluate candidates of a phase in parallel (requires the
    /// `parallel` feature; ignored otherwise). Results are identical to a
    /// sequential run with the same seed.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` draws a seed once when the colony is built.
    pub seed: Option<u64>,

    /// Optional starting point; replaces one initial food source.
    pub initial_guess: Option<Vec<f64>>,

    /// Keep a full population snapshot per iteration.
    ///
    /// Disable for long runs where only the best-bee trace is needed.
    pub record_history: bool,
}

impl Default for AbcConfig {
    fn default() -> Self {
        Self {
            colony_size: 40,
            n_employed_bees: None,
            max_iters: 100,
            limit: None,
            max_scouts: None,
            initialization: Initialization::default(),
            mutation: Mutation::default(),
            selection: Selection::default(),
            scaling: ScalingConfig::default(),
            mr: 0.8,
            stagnation_tol: None,
            stagnation_window: 10,
            direction: Direction::Minimize,
            parallel: false,
            seed: None,
            initial_guess: None,
            record_history: true,
        }
    }
}

impl AbcConfig {
    pub fn with_colony_size(mut self, n: usize) -> Self {
        self.colony_size = n;
        self
    }

    pub fn with_employed_bees(mut self, n: usize) -> Self {
        self.n_employed_bees = Some(n);
        self
    }

    pub fn with_max_iters(mut self, n: usize) -> Self {
        self.max_iters = n;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_max_scouts(mut self, n: usize) -> Self {
        self.max_scouts = Some(n);
        self
    }

    pub fn with_initialization(mut self, init: Initialization) -> Self {
        self.initialization = init;
        self
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = mutation;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    pub fn with_scaling(mut self, scaling: ScalingConfig) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_initial_sf(mut self, sf: f64) -> Self {
        self.scaling.initial_sf = sf;
        self
    }

    pub fn with_self_adaptive_sf(mut self, enabled: bool) -> Self {
        self.scaling.self_adaptive = enabled;
        self
    }

    /// Sets the per-dimension mutation rate. Must lie in `[0, 1]`.
    pub fn with_mr(mut self, mr: f64) -> Self {
        self.mr = mr;
        self
    }

    pub fn with_stagnation_tol(mut self, tol: f64) -> Self {
        self.stagnation_tol = Some(tol);
        self
    }

    pub fn with_stagnation_window(mut self, iters: usize) -> Self {
        self.stagnation_window = iters;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_guess(mut self, guess: Vec<f64>) -> Self {
        self.initial_guess = Some(guess);
        self
    }

    pub fn with_record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// Preset for the modified ABC of Akay & Karaboga: MR-controlled
    /// perturbation with a self-adaptive scaling factor.
    pub fn modified() -> Self {
        Self {
            mutation: Mutation::Modified,
            scaling: ScalingConfig {
                self_adaptive: true,
                ..ScalingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Number of employed bees after applying the default split.
    pub fn employed_bees(&self) -> usize {
        self.n_employed_bees
            .unwrap_or((self.colony_size / 2).max(1))
    }

    /// Number of onlooker bees: the rest of the colony.
    pub fn onlooker_bees(&self) -> usize {
        self.colony_size.saturating_sub(self.employed_bees())
    }

    /// Abandonment limit for a problem of dimension `dim`.
    pub fn resolved_limit(&self, dim: usize) -> usize {
        self.limit.unwrap_or_else(|| {
            let auto = (0.6 * self.employed_bees() as f64 * dim as f64).ceil() as usize;
            auto.max(1)
        })
    }

    /// Per-iteration scout cap.
    pub fn resolved_max_scouts(&self) -> usize {
        self.max_scouts.unwrap_or(self.employed_bees())
    }

    /// Validates every dimension-independent parameter.
    ///
    /// Dimension-dependent checks (initial guess) happen when the colony
    /// is built against concrete bounds.
    pub fn validate(&self) -> Result<()> {
        if self.colony_size == 0 {
            return Err(AbcError::config("colony_size must be positive"));
        }
        let employed = self.employed_bees();
        if employed == 0 || employed > self.colony_size {
            return Err(AbcError::config(format!(
                "n_employed_bees must be in 1..={}, got {employed}",
                self.colony_size
            )));
        }
        let needed = self.mutation.donors_required() + 1;
        if employed < needed {
            return Err(AbcError::config(format!(
                "{:?} mutation needs at least {needed} employed bees, got {employed}",
                self.mutation
            )));
        }
        if self.max_iters == 0 {
            return Err(AbcError::config("max_iters must be positive"));
        }
        if self.limit == Some(0) {
            return Err(AbcError::config("limit must be positive"));
        }
        if let Some(scouts) = self.max_scouts {
            if scouts > employed {
                return Err(AbcError::config(format!(
                    "max_scouts ({scouts}) cannot exceed employed bees ({employed})"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.mr) {
            return Err(AbcError::config(format!("mr must be in [0, 1], got {}", self.mr)));
        }
        if let Some(tol) = self.stagnation_tol {
            if !tol.is_finite() || tol < 0.0 {
                return Err(AbcError::config(format!(
                    "stagnation_tol must be finite and non-negative, got {tol}"
                )));
            }
            if self.stagnation_window == 0 {
                return Err(AbcError::config("stagnation_window must be positive"));
            }
        }
        if let Selection::Tournament(k) = self.selection {
            if k == 0 {
                return Err(AbcError::config("tournament size must be at least 1"));
            }
        }
        if let Mutation::Directed { c } = self.mutation {
            if !c.is_finite() || c < 0.0 {
                return Err(AbcError::config(format!(
                    "directed attraction c must be finite and non-negative, got {c}"
                )));
            }
        }
        self.scaling.validate()
    }
}
