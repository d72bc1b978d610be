//! Colony state machine and optimization loop.
//!
//! [`ArtificialBeeColony`] owns the population and drives the phase cycle:
//!
//! ```text
//! Initialized -> Employed -> Onlooker -> Scout -> (Employed ... | Terminated)
//! ```
//!
//! # Update policy
//!
//! Updates are synchronous within a phase: every candidate of a phase is
//! generated from the population as it stood when the phase began, then
//! all candidates are evaluated (optionally in parallel), then accepted or
//! rejected in bee order. The onlooker phase starts from the population as
//! finalized by the employed phase of the same iteration, so waggle-dance
//! probabilities reflect the employed phase's results.
//!
//! All random draws happen in the generation step on one seeded stream, so
//! parallel evaluation never changes the outcome of a seeded run.

use super::bee::Bee;
use super::config::AbcConfig;
use super::init::Initialization;
use super::mutation::MutationContext;
use super::scaling::ScalingFactor;
use super::stats::diversity;
use super::types::{Bounds, Direction, Objective, Problem};
use crate::error::{AbcError, Result};
use crate::random::{create_rng, ColonyRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Where the colony is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    /// Population placed and evaluated; no iteration run yet.
    Initialized,
    /// Employed bees are exploiting their food sources.
    Employed,
    /// Onlookers are exploiting sources recruited by the waggle dance.
    Onlooker,
    /// Exhausted sources are being abandoned and re-placed.
    Scout,
    /// The run has stopped.
    Terminated,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// `max_iters` iterations were executed.
    MaxIterations,
    /// The best value did not improve by more than `stagnation_tol` over
    /// the trailing `stagnation_window` iterations.
    Stagnation,
    /// The cancellation flag was raised.
    Cancelled,
}

/// State of the colony after one iteration (or after initialization for
/// iteration 0).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColonySnapshot {
    /// Completed iterations at the time of the snapshot.
    pub iteration: usize,

    /// Employed bees. Empty when `record_history` is disabled.
    pub bees: Vec<Bee>,

    /// Best value found so far.
    pub best_value: f64,

    /// Mean objective value over the employed bees.
    pub mean_value: f64,

    /// Scaling factor in effect after this iteration's update.
    pub sf: f64,

    /// Accepted mutations during the iteration.
    pub successes: usize,

    /// Attempted mutations during the iteration.
    pub attempts: usize,

    /// Scout reinitializations during the iteration.
    pub scouts: usize,

    /// Population spread, see [`diversity`](super::stats::diversity).
    pub diversity: f64,
}

/// Result of an optimization run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbcResult {
    /// Best bee observed during the whole run.
    pub optimal_bee: Bee,

    /// Objective value of `optimal_bee`.
    pub best_value: f64,

    /// Number of iterations executed.
    pub actual_iters: usize,

    /// Why the run stopped.
    pub termination: TerminationReason,

    /// Total objective evaluations, including initialization.
    pub evaluations: usize,

    /// `|best_value - known optimum|`, when the optimum is known.
    pub optimum_gap: Option<f64>,

    /// Best value after initialization and after each iteration.
    pub best_value_history: Vec<f64>,
}

/// Artificial Bee Colony optimizer.
///
/// # Usage
///
/// ```
/// use u_beecolony::abc::{AbcConfig, ArtificialBeeColony, Bounds};
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// let bounds = Bounds::uniform(2, -5.0, 5.0).unwrap();
/// let config = AbcConfig::default()
///     .with_colony_size(20)
///     .with_max_iters(50)
///     .with_seed(42);
///
/// let mut colony = ArtificialBeeColony::new(sphere, bounds, config).unwrap();
/// let result = colony.optimize().unwrap();
/// assert!(result.best_value < 1.0);
/// assert_eq!(colony.optimal_bee_history().len(), result.actual_iters + 1);
/// ```
pub struct ArtificialBeeColony<O> {
    objective: O,
    bounds: Bounds,
    config: AbcConfig,
    seed: u64,
    limit: usize,
    max_scouts: usize,
    known_optimum: Option<f64>,

    rng: ColonyRng,
    phase: Phase,
    employed: Vec<Bee>,
    optimal_bee: Bee,
    sf: ScalingFactor,
    actual_iters: usize,
    evaluations: usize,
    termination: Option<TerminationReason>,
    colony_history: Vec<ColonySnapshot>,
    optimal_bee_history: Vec<Bee>,
}

impl<O: Objective> ArtificialBeeColony<O> {
    /// Validates the configuration against `bounds` and places the initial
    /// population.
    ///
    /// Configuration errors are reported before the objective is ever
    /// called. Evaluation errors from the initial population are reported
    /// afterwards.
    pub fn new(objective: O, bounds: Bounds, config: AbcConfig) -> Result<Self> {
        config.validate()?;
        if let Some(guess) = &config.initial_guess {
            bounds.check_dim(guess)?;
            if !bounds.contains(guess) {
                return Err(AbcError::config(format!(
                    "initial guess {guess:?} lies outside the bounds"
                )));
            }
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        let limit = config.resolved_limit(bounds.dim());
        let max_scouts = config.resolved_max_scouts();
        let mut rng = create_rng(seed);
        let spawned = spawn_population(&objective, &bounds, &config, &mut rng)?;

        debug!(
            dim = bounds.dim(),
            employed = config.employed_bees(),
            onlookers = config.onlooker_bees(),
            limit,
            max_scouts,
            seed,
            "colony initialized"
        );

        let mut colony = Self {
            sf: ScalingFactor::new(config.scaling),
            objective,
            bounds,
            config,
            seed,
            limit,
            max_scouts,
            known_optimum: None,
            rng,
            phase: Phase::Initialized,
            employed: spawned.bees,
            optimal_bee: spawned.best,
            actual_iters: 0,
            evaluations: spawned.evaluations,
            termination: None,
            colony_history: Vec::new(),
            optimal_bee_history: Vec::new(),
        };
        colony.record(0, 0, 0);
        Ok(colony)
    }

    /// Restores the colony to its freshly constructed state.
    ///
    /// The random stream is re-seeded with the original seed, so a
    /// subsequent run repeats the previous one exactly.
    pub fn reset(&mut self) -> Result<()> {
        self.rng = create_rng(self.seed);
        let spawned = spawn_population(&self.objective, &self.bounds, &self.config, &mut self.rng)?;
        self.employed = spawned.bees;
        self.optimal_bee = spawned.best;
        self.evaluations = spawned.evaluations;
        self.sf.reset();
        self.phase = Phase::Initialized;
        self.actual_iters = 0;
        self.termination = None;
        self.colony_history.clear();
        self.optimal_bee_history.clear();
        self.record(0, 0, 0);
        Ok(())
    }

    /// Runs the colony until a termination condition is met.
    ///
    /// A colony that has already iterated is [`reset`](Self::reset) first,
    /// so every call performs a complete, reproducible run.
    pub fn optimize(&mut self) -> Result<AbcResult> {
        self.optimize_with_cancel(None)
    }

    /// Runs the colony with an optional cancellation flag.
    ///
    /// The flag is checked at the start of each iteration; when raised the
    /// run stops with [`TerminationReason::Cancelled`] and returns the best
    /// bee found so far.
    pub fn optimize_with_cancel(&mut self, cancel: Option<Arc<AtomicBool>>) -> Result<AbcResult> {
        if self.phase != Phase::Initialized {
            self.reset()?;
        }

        info!(
            max_iters = self.config.max_iters,
            mutation = ?self.config.mutation,
            selection = ?self.config.selection,
            "starting bee colony optimization"
        );

        loop {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    self.terminate(TerminationReason::Cancelled);
                    break;
                }
            }
            if self.step()? {
                break;
            }
        }

        let result = self.result();
        info!(
            iterations = result.actual_iters,
            evaluations = result.evaluations,
            best_value = result.best_value,
            reason = ?result.termination,
            "bee colony optimization finished"
        );
        Ok(result)
    }

    /// Runs one full iteration (employed, onlooker, scout, bookkeeping).
    ///
    /// Returns `true` once the colony has terminated. Calling `step` on a
    /// terminated colony does nothing. After an error the colony is left
    /// mid-iteration and should be [`reset`](Self::reset).
    pub fn step(&mut self) -> Result<bool> {
        if self.phase == Phase::Terminated {
            return Ok(true);
        }

        let (employed_ok, employed_tried) = self.employed_phase()?;
        let (onlooker_ok, onlooker_tried) = self.onlooker_phase()?;
        let scouts = self.scout_phase()?;

        // bookkeeping
        self.actual_iters += 1;
        self.update_optimal_bee();
        let successes = employed_ok + onlooker_ok;
        let attempts = employed_tried + onlooker_tried;
        let sf = self.sf.update(successes, attempts);
        self.record(successes, attempts, scouts);

        debug!(
            iteration = self.actual_iters,
            best_value = self.optimal_bee.value(),
            successes,
            attempts,
            scouts,
            sf,
            "iteration complete"
        );

        if self.is_stagnating() {
            self.terminate(TerminationReason::Stagnation);
        } else if self.actual_iters >= self.config.max_iters {
            self.terminate(TerminationReason::MaxIterations);
        }
        Ok(self.phase == Phase::Terminated)
    }

    /// Each employed bee tries one neighbor of its own food source.
    fn employed_phase(&mut self) -> Result<(usize, usize)> {
        self.phase = Phase::Employed;
        let base = self.employed.clone();
        let targets: Vec<usize> = (0..base.len()).collect();
        self.exploit(&base, &targets)
    }

    /// Onlookers pick food sources by waggle dance and exploit them.
    fn onlooker_phase(&mut self) -> Result<(usize, usize)> {
        self.phase = Phase::Onlooker;
        let n_onlookers = self.config.onlooker_bees();
        if n_onlookers == 0 {
            return Ok((0, 0));
        }

        let base = self.employed.clone();
        let fitness: Vec<f64> = base.iter().map(Bee::fitness).collect();
        let selection = self.config.selection;
        let targets: Vec<usize> = (0..n_onlookers)
            .map(|_| selection.select_target(&fitness, &mut self.rng))
            .collect();
        self.exploit(&base, &targets)
    }

    /// Generates one candidate per target from `base`, evaluates all of
    /// them, then applies greedy selection on the live population.
    fn exploit(&mut self, base: &[Bee], targets: &[usize]) -> Result<(usize, usize)> {
        let config = &self.config;
        let ctx = MutationContext {
            bounds: &self.bounds,
            global_best: self.optimal_bee.position(),
            sf: self.sf.current(),
            mr: config.mr,
        };
        let n_donors = config.mutation.donors_required();

        let mut positions = Vec::with_capacity(targets.len());
        for &target in targets {
            let donors = config
                .selection
                .select_donors(base, target, n_donors, &mut self.rng);
            let donor_positions: Vec<&[f64]> =
                donors.iter().map(|&d| base[d].position()).collect();
            positions.push(config.mutation.mutate(
                base[target].position(),
                &donor_positions,
                &ctx,
                &mut self.rng,
            ));
        }

        let candidates = evaluate_all(&self.objective, config.direction, positions, config.parallel)?;
        self.evaluations += candidates.len();

        let direction = config.direction;
        let mut successes = 0;
        for (&target, candidate) in targets.iter().zip(candidates) {
            let bee = &mut self.employed[target];
            if bee.replace_if_better(candidate, direction) {
                successes += 1;
                // a scout may abandon this source before the iteration ends
                if direction.is_better(bee.value(), self.optimal_bee.value()) {
                    self.optimal_bee = bee.clone();
                }
            }
        }
        Ok((successes, targets.len()))
    }

    /// Abandons exhausted food sources, most-stagnant first.
    fn scout_phase(&mut self) -> Result<usize> {
        self.phase = Phase::Scout;

        let mut exhausted: Vec<usize> = (0..self.employed.len())
            .filter(|&i| self.employed[i].trial() >= self.limit)
            .collect();
        // stable: equal trial counts keep index order
        exhausted.sort_by(|&a, &b| self.employed[b].trial().cmp(&self.employed[a].trial()));
        exhausted.truncate(self.max_scouts);

        let init = self.config.initialization;
        for &idx in &exhausted {
            trace!(bee = idx, trial = self.employed[idx].trial(), "scout abandons food source");
            self.employed[idx] = init.scout(
                &self.bounds,
                &self.objective,
                self.config.direction,
                &mut self.rng,
            )?;
            self.evaluations += evaluations_per_bee(init);
        }
        Ok(exhausted.len())
    }

    /// Picks up scouted sources that beat the best so far.
    fn update_optimal_bee(&mut self) {
        let direction = self.config.direction;
        if let Some(best) = best_of(&self.employed, direction) {
            if direction.is_better(best.value(), self.optimal_bee.value()) {
                self.optimal_bee = best.clone();
            }
        }
    }

    /// True when the best value improved by at most `stagnation_tol` over
    /// the trailing window.
    fn is_stagnating(&self) -> bool {
        let Some(tol) = self.config.stagnation_tol else {
            return false;
        };
        let window = self.config.stagnation_window;
        let history = &self.optimal_bee_history;
        if history.len() <= window {
            return false;
        }

        let direction = self.config.direction;
        let now = direction.cost(history[history.len() - 1].value());
        let then = direction.cost(history[history.len() - 1 - window].value());
        then - now <= tol
    }

    fn terminate(&mut self, reason: TerminationReason) {
        self.phase = Phase::Terminated;
        self.termination = Some(reason);
    }

    fn record(&mut self, successes: usize, attempts: usize, scouts: usize) {
        let mean_value =
            self.employed.iter().map(Bee::value).sum::<f64>() / self.employed.len() as f64;
        self.colony_history.push(ColonySnapshot {
            iteration: self.actual_iters,
            bees: if self.config.record_history {
                self.employed.clone()
            } else {
                Vec::new()
            },
            best_value: self.optimal_bee.value(),
            mean_value,
            sf: self.sf.current(),
            successes,
            attempts,
            scouts,
            diversity: diversity(&self.employed),
        });
        self.optimal_bee_history.push(self.optimal_bee.clone());
    }

    fn result(&self) -> AbcResult {
        let best_value = self.optimal_bee.value();
        AbcResult {
            optimal_bee: self.optimal_bee.clone(),
            best_value,
            actual_iters: self.actual_iters,
            termination: self.termination.unwrap_or(TerminationReason::MaxIterations),
            evaluations: self.evaluations,
            optimum_gap: self.known_optimum.map(|opt| (best_value - opt).abs()),
            best_value_history: self.optimal_bee_history.iter().map(Bee::value).collect(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Best bee observed so far (an owned copy, unaffected by later moves).
    pub fn optimal_bee(&self) -> &Bee {
        &self.optimal_bee
    }

    /// Current employed bees (food sources).
    pub fn employed_bees(&self) -> &[Bee] {
        &self.employed
    }

    /// One snapshot for initialization plus one per iteration.
    pub fn colony_history(&self) -> &[ColonySnapshot] {
        &self.colony_history
    }

    /// Best-so-far bee after initialization and after each iteration.
    pub fn optimal_bee_history(&self) -> &[Bee] {
        &self.optimal_bee_history
    }

    pub fn actual_iters(&self) -> usize {
        self.actual_iters
    }

    /// Current scaling factor.
    pub fn sf(&self) -> f64 {
        self.sf.current()
    }

    /// Seed of the random stream (drawn at construction if not configured).
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Effective abandonment limit.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn config(&self) -> &AbcConfig {
        &self.config
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }
}

impl<F: Objective> ArtificialBeeColony<Problem<F>> {
    /// Builds a colony for a [`Problem`], reporting the gap to its known
    /// optimum in results.
    pub fn from_problem(problem: Problem<F>, config: AbcConfig) -> Result<Self> {
        let bounds = problem.bounds().clone();
        let mut colony = Self::new(problem, bounds, config)?;
        colony.known_optimum = colony.objective.optimal_value().transpose()?;
        Ok(colony)
    }
}

struct Spawned {
    bees: Vec<Bee>,
    best: Bee,
    evaluations: usize,
}

/// Places and evaluates the initial population.
fn spawn_population<O: Objective>(
    objective: &O,
    bounds: &Bounds,
    config: &AbcConfig,
    rng: &mut ColonyRng,
) -> Result<Spawned> {
    let n = config.employed_bees();
    let direction = config.direction;
    let mut bees = config
        .initialization
        .population(n, bounds, objective, direction, rng)?;
    let mut evaluations = n * evaluations_per_bee(config.initialization);

    if let Some(guess) = &config.initial_guess {
        let seeded = Bee::new(guess.clone(), objective, direction)?;
        evaluations += 1;
        if let Some(worst) = worst_index(&bees, direction) {
            bees[worst] = seeded;
        }
    }

    let best = best_of(&bees, direction)
        .cloned()
        .ok_or_else(|| AbcError::config("colony has no employed bees"))?;
    Ok(Spawned {
        bees,
        best,
        evaluations,
    })
}

fn evaluations_per_bee(init: Initialization) -> usize {
    match init {
        Initialization::Random => 1,
        Initialization::Chaotic { .. } => 2,
    }
}

fn best_of(bees: &[Bee], direction: Direction) -> Option<&Bee> {
    bees.iter()
        .min_by(|a, b| direction.cost(a.value()).total_cmp(&direction.cost(b.value())))
}

fn worst_index(bees: &[Bee], direction: Direction) -> Option<usize> {
    bees.iter()
        .enumerate()
        .max_by(|a, b| direction.cost(a.1.value()).total_cmp(&direction.cost(b.1.value())))
        .map(|(i, _)| i)
}

/// Evaluates candidate positions, in parallel when requested.
#[cfg(feature = "parallel")]
fn evaluate_all<O: Objective>(
    objective: &O,
    direction: Direction,
    positions: Vec<Vec<f64>>,
    parallel: bool,
) -> Result<Vec<Bee>> {
    use rayon::prelude::*;

    if parallel {
        positions
            .into_par_iter()
            .map(|p| Bee::new(p, objective, direction))
            .collect()
    } else {
        positions
            .into_iter()
            .map(|p| Bee::new(p, objective, direction))
            .collect()
    }
}

/// Evaluates candidate positions sequentially.
#[cfg(not(feature = "parallel"))]
fn evaluate_all<O: Objective>(
    objective: &O,
    direction: Direction,
    positions: Vec<Vec<f64>>,
    _parallel: bool,
) -> Result<Vec<Bee>> {
    positions
        .into_iter()
        .map(|p| Bee::new(p, objective, direction))
        .collect()
}
