//! Artificial Bee Colony optimization for continuous problems.
//!
//! Minimizes (or maximizes) a black-box objective `f: R^d -> R` over a box
//! `[lower, upper]^d` using the swarm-intelligence scheme of Karaboga's
//! Artificial Bee Colony, with the common variants from the literature:
//!
//! - **Mutation strategies**: standard, modified (MR-controlled), ABC/best/1,
//!   ABC/best/2 and gbest-directed neighbor generation.
//! - **Selection**: roulette wheel (waggle dance) or tournament, used both
//!   for onlooker recruitment and donor choice.
//! - **Initialization**: uniform random or chaotic sine-map sampling with
//!   opposition-based learning.
//! - **Step control**: fixed or self-adaptive scaling factor (1/5 rule).
//!
//! Runs are reproducible: the same seed and configuration produce the same
//! trajectory, with or without parallel evaluation.
//!
//! # Quick Start
//!
//! ```
//! use u_beecolony::abc::{AbcConfig, ArtificialBeeColony, Bounds};
//!
//! let rosenbrock = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
//! let bounds = Bounds::uniform(2, -2.0, 2.0)?;
//! let config = AbcConfig::modified().with_max_iters(200).with_seed(7);
//!
//! let result = ArtificialBeeColony::new(rosenbrock, bounds, config)?.optimize()?;
//! assert!(result.best_value < 1.0);
//! # Ok::<(), u_beecolony::AbcError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize`/`Deserialize` for configurations, bees and results
//! - `parallel`: evaluate the candidates of a phase on the rayon thread pool

pub mod abc;
pub mod error;
pub mod random;

pub use error::{AbcError, ObjectiveError, Result};
