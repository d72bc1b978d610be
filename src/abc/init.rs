//! Population initialization rules.
//!
//! # References
//!
//! - Karaboga & Basturk (2007), uniform random food sources
//! - Alatas (2010), "Chaotic bee colony algorithms for global numerical
//!   optimization"
//! - Rahnamayan, Tizhoosh & Salama (2008), opposition-based initialization

use super::bee::Bee;
use super::types::{Bounds, Direction, Objective};
use crate::error::{AbcError, Result};
use rand::Rng;
use std::f64::consts::PI;
use std::str::FromStr;

/// How food sources are placed at start-up and when a scout abandons one.
///
/// # Examples
///
/// ```
/// use u_beecolony::abc::Initialization;
///
/// let init: Initialization = "chaotic".parse().unwrap();
/// assert_eq!(init, Initialization::Chaotic { iterations: 300 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Initialization {
    /// Uniform sampling inside the bounds.
    #[default]
    Random,

    /// Sine-map chaotic sampling combined with opposition-based learning.
    ///
    /// Each unit coordinate starts uniform and is iterated through
    /// `x <- sin(pi * x)` `iterations` times before being mapped onto the
    /// bounds. Every chaotic point also yields its opposite
    /// `lower + upper - x`; the best half of the combined set is kept.
    Chaotic {
        /// Number of sine-map iterations per coordinate.
        iterations: usize,
    },
}

impl FromStr for Initialization {
    type Err = AbcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "uniform" => Ok(Initialization::Random),
            "chaotic" | "cahotic" => Ok(Initialization::Chaotic { iterations: 300 }),
            _ => Err(AbcError::UnknownStrategy {
                kind: "initialization",
                name: s.to_string(),
            }),
        }
    }
}

impl Initialization {
    /// Creates `n` evaluated bees.
    pub fn population<O, R>(
        &self,
        n: usize,
        bounds: &Bounds,
        objective: &O,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Vec<Bee>>
    where
        O: Objective + ?Sized,
        R: Rng,
    {
        match *self {
            Initialization::Random => (0..n)
                .map(|_| Bee::random(bounds, objective, direction, rng))
                .collect(),
            Initialization::Chaotic { iterations } => {
                let mut pool = Vec::with_capacity(2 * n);
                for _ in 0..n {
                    let (bee, opposite) =
                        chaotic_pair(bounds, objective, direction, iterations, rng)?;
                    pool.push(bee);
                    pool.push(opposite);
                }
                pool.sort_by(|a, b| direction.cost(a.value()).total_cmp(&direction.cost(b.value())));
                pool.truncate(n);
                Ok(pool)
            }
        }
    }

    /// Creates one replacement bee for an abandoned food source.
    pub fn scout<O, R>(
        &self,
        bounds: &Bounds,
        objective: &O,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Bee>
    where
        O: Objective + ?Sized,
        R: Rng,
    {
        match *self {
            Initialization::Random => Bee::random(bounds, objective, direction, rng),
            Initialization::Chaotic { iterations } => {
                let (bee, opposite) = chaotic_pair(bounds, objective, direction, iterations, rng)?;
                Ok(if direction.is_better(opposite.value(), bee.value()) {
                    opposite
                } else {
                    bee
                })
            }
        }
    }
}

/// One chaotic point and its opposite, both evaluated.
fn chaotic_pair<O, R>(
    bounds: &Bounds,
    objective: &O,
    direction: Direction,
    iterations: usize,
    rng: &mut R,
) -> Result<(Bee, Bee)>
where
    O: Objective + ?Sized,
    R: Rng,
{
    let unit = chaotic_unit(bounds.dim(), iterations, rng);
    let position = bounds.scale_unit(&unit);
    let opposite = bounds.opposite(&position);
    Ok((
        Bee::new(position, objective, direction)?,
        Bee::new(opposite, objective, direction)?,
    ))
}

/// Sine-map sequence endpoint for each of `dim` coordinates, in `[0, 1]`.
fn chaotic_unit<R: Rng>(dim: usize, iterations: usize, rng: &mut R) -> Vec<f64> {
    (0..dim)
        .map(|_| {
            let mut x: f64 = rng.random_range(0.0..1.0);
            for _ in 0..iterations {
                x = (PI * x).sin();
            }
            x.clamp(0.0, 1.0)
        })
        .collect()
}
