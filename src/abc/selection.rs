//! Selection strategies: donor choice and onlooker recruitment.
//!
//! Both strategies work on bee fitness (larger is better, always positive)
//! and are fully determined by the RNG stream they are given.
//!
//! # References
//!
//! - Karaboga (2005), waggle-dance (fitness-proportionate) recruitment
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::bee::Bee;
use crate::error::{AbcError, Result};
use crate::random::sample_distinct;
use rand::Rng;
use std::str::FromStr;

/// Strategy for picking donors and onlooker targets.
///
/// # Examples
///
/// ```
/// use u_beecolony::abc::Selection;
///
/// let sel: Selection = "tournament".parse().unwrap();
/// assert_eq!(sel, Selection::Tournament(3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate selection: `p_i = fit_i / sum(fit)`.
    ///
    /// Falls back to uniform choice when the weights are degenerate
    /// (zero or non-finite total).
    #[default]
    RouletteWheel,

    /// Sample `k` bees uniformly without replacement, keep the fittest.
    Tournament(usize),
}

impl FromStr for Selection {
    type Err = AbcError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roulette" | "roulettewheel" | "roulette-wheel" | "roulette_wheel" => {
                Ok(Selection::RouletteWheel)
            }
            "tournament" => Ok(Selection::Tournament(3)),
            _ => Err(AbcError::UnknownStrategy {
                kind: "selection",
                name: s.to_string(),
            }),
        }
    }
}

impl Selection {
    /// Picks `count` distinct donor indices from `population`, never `exclude`.
    ///
    /// # Panics
    /// Panics if fewer than `count` bees other than `exclude` exist.
    pub fn select_donors<R: Rng>(
        &self,
        population: &[Bee],
        exclude: usize,
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        let n = population.len();
        assert!(
            n.saturating_sub(1) >= count,
            "need {count} donors but population has {n} bees"
        );

        let fitness: Vec<f64> = population.iter().map(Bee::fitness).collect();
        let mut taken = vec![false; n];
        if exclude < n {
            taken[exclude] = true;
        }

        let mut donors = Vec::with_capacity(count);
        for _ in 0..count {
            let idx = match *self {
                Selection::RouletteWheel => roulette(&fitness, &taken, rng),
                Selection::Tournament(k) => tournament(&fitness, &taken, k, rng),
            };
            taken[idx] = true;
            donors.push(idx);
        }
        donors
    }

    /// Picks the employed bee an onlooker will exploit.
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select_target<R: Rng>(&self, fitness: &[f64], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");
        let taken = vec![false; fitness.len()];
        match *self {
            Selection::RouletteWheel => roulette(fitness, &taken, rng),
            Selection::Tournament(k) => tournament(fitness, &taken, k, rng),
        }
    }
}

/// Waggle-dance probabilities `fit_i / sum(fit)`.
///
/// Returns a uniform distribution when the total is zero or non-finite.
pub fn waggle_dance(fitness: &[f64]) -> Vec<f64> {
    let total: f64 = fitness.iter().sum();
    if fitness.is_empty() {
        return Vec::new();
    }
    if total <= 0.0 || !total.is_finite() {
        return vec![1.0 / fitness.len() as f64; fitness.len()];
    }
    fitness.iter().map(|&f| f / total).collect()
}

/// Fitness-proportionate draw among indices not yet `taken`.
fn roulette<R: Rng>(fitness: &[f64], taken: &[bool], rng: &mut R) -> usize {
    let weight = |i: usize| {
        let f = fitness[i];
        if taken[i] || !f.is_finite() || f <= 0.0 {
            0.0
        } else {
            f
        }
    };

    let total: f64 = (0..fitness.len()).map(weight).sum();
    if total <= 0.0 || !total.is_finite() {
        return uniform_free(taken, rng);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_free = None;
    for i in 0..fitness.len() {
        let w = weight(i);
        if w > 0.0 {
            cumulative += w;
            last_free = Some(i);
            if cumulative > threshold {
                return i;
            }
        }
    }

    // floating-point fallback
    match last_free {
        Some(i) => i,
        None => uniform_free(taken, rng),
    }
}

/// Best of `k` distinct free indices drawn uniformly.
fn tournament<R: Rng>(fitness: &[f64], taken: &[bool], k: usize, rng: &mut R) -> usize {
    let free: Vec<usize> = (0..fitness.len()).filter(|&i| !taken[i]).collect();
    let k = k.clamp(1, free.len());
    let picks = sample_distinct(free.len(), k, rng);

    let mut best = free[picks[0]];
    for &p in &picks[1..] {
        let idx = free[p];
        if fitness[idx] > fitness[best] {
            best = idx;
        }
    }
    best
}

fn uniform_free<R: Rng>(taken: &[bool], rng: &mut R) -> usize {
    let free: Vec<usize> = (0..taken.len()).filter(|&i| !taken[i]).collect();
    free[rng.random_range(0..free.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abc::types::Direction;
    use crate::random::create_rng;

    fn make_population(values: &[f64]) -> Vec<Bee> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Bee::evaluated(vec![i as f64], v, Direction::Minimize))
            .collect()
    }

    #[test]
    fn test_roulette_never_returns_excluded() {
        let pop = make_population(&[0.0, 0.1, 5.0, 2.0, 0.01]);
        let mut rng = create_rng(42);
        for trial in 0..1000 {
            let exclude = trial % pop.len();
            let donors = Selection::RouletteWheel.select_donors(&pop, exclude, 1, &mut rng);
            assert_ne!(donors[0], exclude);
        }
    }

    #[test]
    fn test_donors_distinct_and_exclude_self() {
        let pop = make_population(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let mut rng = create_rng(7);
        for sel in [Selection::RouletteWheel, Selection::Tournament(3)] {
            for _ in 0..500 {
                let donors = sel.select_donors(&pop, 2, 4, &mut rng);
                assert_eq!(donors.len(), 4);
                assert!(!donors.contains(&2));
                let mut d = donors.clone();
                d.sort_unstable();
                d.dedup();
                assert_eq!(d.len(), 4);
            }
        }
    }

    #[test]
    fn test_roulette_favors_fittest_target() {
        let pop = make_population(&[100.0, 50.0, 0.0, 80.0]);
        let fitness: Vec<f64> = pop.iter().map(Bee::fitness).collect();
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[Selection::RouletteWheel.select_target(&fitness, &mut rng)] += 1;
        }
        assert!(
            counts[2] > 9000,
            "best bee should dominate the dance: {counts:?}"
        );
    }

    #[test]
    fn test_equal_fitness_is_uniform() {
        let fitness = [0.5; 4];
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[Selection::RouletteWheel.select_target(&fitness, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected uniform selection, got {counts:?}");
        }
        assert_eq!(waggle_dance(&fitness), vec![0.25; 4]);
    }

    #[test]
    fn test_degenerate_weights_fall_back_to_uniform() {
        assert_eq!(waggle_dance(&[0.0, 0.0]), vec![0.5, 0.5]);
        let mut rng = create_rng(1);
        let idx = Selection::RouletteWheel.select_target(&[0.0, 0.0, 0.0], &mut rng);
        assert!(idx < 3);
    }

    #[test]
    fn test_tournament_full_size_picks_best() {
        let fitness = [0.1, 0.9, 0.3, 0.2];
        let mut rng = create_rng(42);
        for _ in 0..100 {
            assert_eq!(Selection::Tournament(4).select_target(&fitness, &mut rng), 1);
        }
    }

    #[test]
    fn test_tournament_size_one_is_random() {
        let fitness = [0.1, 0.9, 0.3, 0.2];
        let mut rng = create_rng(42);
        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            counts[Selection::Tournament(1).select_target(&fitness, &mut rng)] += 1;
        }
        for &c in &counts {
            assert!(c > 2000, "expected uniform, got {counts:?}");
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let pop = make_population(&[3.0, 1.0, 4.0, 1.5, 9.0]);
        let run = |seed| {
            let mut rng = create_rng(seed);
            (0..50)
                .map(|i| Selection::RouletteWheel.select_donors(&pop, i % 5, 2, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "RouletteWheel".parse::<Selection>().unwrap(),
            Selection::RouletteWheel
        );
        assert!("rank".parse::<Selection>().is_err());
    }

    #[test]
    #[should_panic(expected = "need 2 donors")]
    fn test_not_enough_donors_panics() {
        let pop = make_population(&[1.0, 2.0]);
        let mut rng = create_rng(1);
        Selection::RouletteWheel.select_donors(&pop, 0, 2, &mut rng);
    }
}
