//! Artificial Bee Colony (ABC) optimizer for continuous box-bounded problems.
//!
//! The colony is split into employed bees (one per food source), onlooker
//! bees and scouts. Each iteration runs three phases:
//!
//! 1. **Employed**: every food source is perturbed once against donor
//!    sources and replaced if the candidate is strictly better.
//! 2. **Onlooker**: onlookers pick sources with probability proportional
//!    to fitness (the waggle dance) and exploit them the same way.
//! 3. **Scout**: sources whose failure counter reached `limit` are
//!    abandoned and re-placed at random.
//!
//! # Key Types
//!
//! - [`ArtificialBeeColony`]: Colony state machine and run loop
//! - [`AbcConfig`]: Algorithm parameters (sizes, strategies, termination)
//! - [`AbcResult`]: Best bee, iteration count and best-value trace
//! - [`Bounds`], [`Objective`], [`Problem`]: Search-space description
//!
//! # Strategies
//!
//! - [`Mutation`]: standard, modified (MR), ABC/best/1, ABC/best/2, gbest-directed
//! - [`Selection`]: roulette wheel or tournament, for donors and onlookers
//! - [`Initialization`]: uniform random or chaotic (sine map) with opposition
//! - [`ScalingFactor`]: fixed or self-adaptive (1/5 rule) step size
//!
//! # References
//!
//! - Karaboga (2005), "An idea based on honey bee swarm for numerical optimization"
//! - Karaboga & Basturk (2007), "A powerful and efficient algorithm for numerical
//!   function optimization: artificial bee colony (ABC) algorithm"
//! - Akay & Karaboga (2012), "A modified Artificial Bee Colony algorithm for
//!   real-parameter optimization"
//! - Alatas (2010), "Chaotic bee colony algorithms for global numerical optimization"

mod bee;
mod colony;
mod config;
mod init;
mod mutation;
mod scaling;
mod selection;
mod stats;
mod types;

pub use bee::{fitness_of, Bee};
pub use colony::{AbcResult, ArtificialBeeColony, ColonySnapshot, Phase, TerminationReason};
pub use config::AbcConfig;
pub use init::Initialization;
pub use mutation::{Mutation, MutationContext};
pub use scaling::{ScalingConfig, ScalingFactor};
pub use selection::{waggle_dance, Selection};
pub use stats::{diversity, RunSummary};
pub use types::{Bounds, Direction, Fallible, Objective, Problem};
