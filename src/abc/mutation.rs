//! Neighbor-generation (mutation) strategies.
//!
//! Every strategy produces a new position from a bee's position, one or
//! more donor positions and the current scaling factor `sf`. Random
//! coefficients `phi` are drawn from `U(-sf, sf)`. Results are always
//! hard-clipped into the bounds.
//!
//! | Strategy   | Donors | Update (dimension `j`)                                   |
//! |------------|--------|----------------------------------------------------------|
//! | `Standard` | 1      | `x_j + phi (x_j - a_j)`, one random `j`                  |
//! | `Modified` | 1      | same, each `j` with probability `mr`                     |
//! | `BestOne`  | 2      | `g_j + phi (a_j - b_j)`, one random `j`                  |
//! | `BestTwo`  | 4      | `g_j + phi (a_j - b_j) + phi (c_j - d_j)`, one random `j`|
//! | `Directed` | 1      | `x_j + phi (x_j - a_j) + psi (g_j - x_j)`, `psi ~ U(0,c)` |
//!
//! `g` is the best position found so far.
//!
//! # References
//!
//! - Karaboga & Basturk (2007), standard ABC
//! - Akay & Karaboga (2012), "A modified Artificial Bee Colony algorithm for
//!   real-parameter optimization" (MR-controlled perturbation)
//! - Gao & Liu (2011), ABC/best/1 and ABC/best/2
//! - Zhu & Kwong (2010), "Gbest-guided artificial bee colony algorithm"

use super::types::Bounds;
use crate::error::{AbcError, Result};
use rand::Rng;
use std::str::FromStr;

/// Candidate-generation rule.
///
/// # Examples
///
/// ```
/// use u_beecolony::abc::Mutation;
///
/// let m: Mutation = "ABC/best/2".parse().unwrap();
/// assert_eq!(m, Mutation::BestTwo);
/// assert_eq!(m.donors_required(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Perturb one random dimension against one donor.
    #[default]
    Standard,

    /// Perturb each dimension with probability `mr` against one donor.
    Modified,

    /// Global-best base plus one donor difference.
    BestOne,

    /// Global-best base plus two donor differences.
    BestTwo,

    /// Standard move plus a random pull toward the global best.
    Directed {
        /// Upper bound of the attraction coefficient `psi ~ U(0, c)`.
        c: f64,
    },
}

impl FromStr for Mutation {
    type Err = AbcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "standardabc" => Ok(Mutation::Standard),
            "modified" | "modifiedabc" => Ok(Mutation::Modified),
            "best1" | "abc/best/1" => Ok(Mutation::BestOne),
            "best2" | "abc/best/2" => Ok(Mutation::BestTwo),
            "directed" | "gbest" | "gabc" => Ok(Mutation::Directed { c: 1.5 }),
            _ => Err(AbcError::UnknownStrategy {
                kind: "mutation",
                name: s.to_string(),
            }),
        }
    }
}

/// Shared inputs for one mutation.
#[derive(Debug, Clone, Copy)]
pub struct MutationContext<'a> {
    pub bounds: &'a Bounds,
    /// Best position found so far.
    pub global_best: &'a [f64],
    /// Current scaling factor.
    pub sf: f64,
    /// Per-dimension perturbation probability (used by `Modified`).
    pub mr: f64,
}

impl Mutation {
    /// Number of distinct donors the strategy consumes.
    pub fn donors_required(&self) -> usize {
        match self {
            Mutation::Standard | Mutation::Modified | Mutation::Directed { .. } => 1,
            Mutation::BestOne => 2,
            Mutation::BestTwo => 4,
        }
    }

    /// Produces a new position from `bee` and `donors`.
    ///
    /// # Panics
    /// Panics if fewer than [`donors_required`](Self::donors_required)
    /// donors are supplied.
    pub fn mutate<R: Rng>(
        &self,
        bee: &[f64],
        donors: &[&[f64]],
        ctx: &MutationContext<'_>,
        rng: &mut R,
    ) -> Vec<f64> {
        assert!(
            donors.len() >= self.donors_required(),
            "{self:?} needs {} donors, got {}",
            self.donors_required(),
            donors.len()
        );

        let dim = bee.len();
        let sf = ctx.sf;
        let best = ctx.global_best;
        let mut candidate = bee.to_vec();

        match *self {
            Mutation::Standard => {
                let j = rng.random_range(0..dim);
                let phi = rng.random_range(-sf..=sf);
                candidate[j] = bee[j] + phi * (bee[j] - donors[0][j]);
            }
            Mutation::Modified => {
                let forced = rng.random_range(0..dim);
                for j in 0..dim {
                    let chosen = rng.random_range(0.0..1.0) < ctx.mr;
                    if chosen || j == forced {
                        let phi = rng.random_range(-sf..=sf);
                        candidate[j] = bee[j] + phi * (bee[j] - donors[0][j]);
                    }
                }
            }
            Mutation::BestOne => {
                let j = rng.random_range(0..dim);
                let phi = rng.random_range(-sf..=sf);
                candidate[j] = best[j] + phi * (donors[0][j] - donors[1][j]);
            }
            Mutation::BestTwo => {
                let j = rng.random_range(0..dim);
                let phi = rng.random_range(-sf..=sf);
                candidate[j] = best[j]
                    + phi * (donors[0][j] - donors[1][j])
                    + phi * (donors[2][j] - donors[3][j]);
            }
            Mutation::Directed { c } => {
                let j = rng.random_range(0..dim);
                let phi = rng.random_range(-sf..=sf);
                let psi = rng.random_range(0.0..=c);
                candidate[j] = bee[j] + phi * (bee[j] - donors[0][j]) + psi * (best[j] - bee[j]);
            }
        }

        ctx.bounds.clip(&mut candidate);
        candidate
    }
}
