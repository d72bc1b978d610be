//! Candidate solutions (bees).

use super::types::{evaluate_checked, Bounds, Direction, Objective};
use crate::error::Result;
use rand::Rng;

/// Positive, rank-consistent fitness transform used by the waggle dance.
///
/// For a cost `c` (lower is better): `1 / (1 + c)` when `c >= 0`,
/// otherwise `1 + |c|`. Larger fitness is better and always `> 0` for
/// finite input.
#[inline]
pub fn fitness_of(value: f64, direction: Direction) -> f64 {
    let cost = direction.cost(value);
    if cost >= 0.0 {
        1.0 / (1.0 + cost)
    } else {
        1.0 + cost.abs()
    }
}

/// A food source: a position in the search space plus its bookkeeping.
///
/// The objective and bounds are shared by the colony and never owned by a
/// bee; a bee only caches the objective value of its current position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bee {
    position: Vec<f64>,
    value: f64,
    fitness: f64,
    trial: usize,
}

impl Bee {
    /// Creates a bee at `position`, evaluating the objective there.
    pub fn new<O: Objective + ?Sized>(
        position: Vec<f64>,
        objective: &O,
        direction: Direction,
    ) -> Result<Self> {
        let value = evaluate_checked(objective, &position)?;
        Ok(Self::evaluated(position, value, direction))
    }

    /// Creates a bee at a uniformly random position inside `bounds`.
    pub fn random<O: Objective + ?Sized, R: Rng>(
        bounds: &Bounds,
        objective: &O,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Self> {
        Self::new(bounds.sample_uniform(rng), objective, direction)
    }

    /// Wraps an already-evaluated position.
    pub(crate) fn evaluated(position: Vec<f64>, value: f64, direction: Direction) -> Self {
        Self {
            fitness: fitness_of(value, direction),
            position,
            value,
            trial: 0,
        }
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    /// Objective value at the current position.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Fitness of the current position (larger is better, always positive).
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Consecutive failed improvement attempts.
    pub fn trial(&self) -> usize {
        self.trial
    }

    /// Re-evaluates the objective at the current position.
    pub fn evaluate<O: Objective + ?Sized>(
        &mut self,
        objective: &O,
        direction: Direction,
    ) -> Result<f64> {
        self.value = evaluate_checked(objective, &self.position)?;
        self.fitness = fitness_of(self.value, direction);
        Ok(self.value)
    }

    /// Greedy selection between this bee and `candidate`.
    ///
    /// The candidate replaces the current position only when it is strictly
    /// better; ties keep the incumbent. Returns `true` on replacement, which
    /// resets the trial counter; otherwise the counter is incremented.
    pub fn replace_if_better(&mut self, candidate: Bee, direction: Direction) -> bool {
        if direction.is_better(candidate.value, self.value) {
            self.position = candidate.position;
            self.value = candidate.value;
            self.fitness = candidate.fitness;
            self.trial = 0;
            true
        } else {
            self.trial = self.trial.saturating_add(1);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbcError;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn sphere(x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn test_fitness_transform() {
        assert!((fitness_of(0.0, Direction::Minimize) - 1.0).abs() < 1e-15);
        assert!((fitness_of(1.0, Direction::Minimize) - 0.5).abs() < 1e-15);
        assert!((fitness_of(-2.0, Direction::Minimize) - 3.0).abs() < 1e-15);
        // Maximizing 2.0 is a cost of -2.0.
        assert!((fitness_of(2.0, Direction::Maximize) - 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_new_evaluates() {
        let bee = Bee::new(vec![1.0, 2.0], &sphere, Direction::Minimize).unwrap();
        assert_eq!(bee.value(), 5.0);
        assert!((bee.fitness() - 1.0 / 6.0).abs() < 1e-15);
        assert_eq!(bee.trial(), 0);
    }

    #[test]
    fn test_new_rejects_nan() {
        let f = |_: &[f64]| f64::NAN;
        let err = Bee::new(vec![0.0], &f, Direction::Minimize).unwrap_err();
        assert!(matches!(err, AbcError::NonFiniteObjective { .. }));
    }

    #[test]
    fn test_evaluate_refreshes_cache() {
        let mut bee = Bee::new(vec![1.0, 2.0], &sphere, Direction::Minimize).unwrap();
        let shifted = |x: &[f64]| sphere(x) - 10.0;
        assert_eq!(bee.evaluate(&shifted, Direction::Minimize).unwrap(), -5.0);
        assert_eq!(bee.value(), -5.0);
        assert!((bee.fitness() - 6.0).abs() < 1e-15);

        // failed evaluation keeps the previous cache
        let broken = |_: &[f64]| f64::INFINITY;
        assert!(bee.evaluate(&broken, Direction::Minimize).is_err());
        assert_eq!(bee.value(), -5.0);
    }

    #[test]
    fn test_replace_if_better_accepts_improvement() {
        let mut bee = Bee::new(vec![2.0], &sphere, Direction::Minimize).unwrap();
        let worse = Bee::new(vec![3.0], &sphere, Direction::Minimize).unwrap();
        assert!(!bee.replace_if_better(worse, Direction::Minimize));
        assert_eq!(bee.trial(), 1);

        let better = Bee::new(vec![1.0], &sphere, Direction::Minimize).unwrap();
        assert!(bee.replace_if_better(better, Direction::Minimize));
        assert_eq!(bee.position(), &[1.0]);
        assert_eq!(bee.trial(), 0);
    }

    #[test]
    fn test_tie_is_not_improvement() {
        let mut bee = Bee::new(vec![1.0], &sphere, Direction::Minimize).unwrap();
        let tie = Bee::new(vec![-1.0], &sphere, Direction::Minimize).unwrap();
        assert!(!bee.replace_if_better(tie, Direction::Minimize));
        assert_eq!(bee.position(), &[1.0]);
        assert_eq!(bee.trial(), 1);
    }

    #[test]
    fn test_maximize_direction() {
        let mut bee = Bee::new(vec![1.0], &sphere, Direction::Maximize).unwrap();
        let bigger = Bee::new(vec![2.0], &sphere, Direction::Maximize).unwrap();
        assert!(bee.replace_if_better(bigger, Direction::Maximize));
        assert_eq!(bee.value(), 4.0);
    }

    #[test]
    fn test_random_inside_bounds() {
        let bounds = Bounds::uniform(3, -1.0, 1.0).unwrap();
        let mut rng = create_rng(3);
        let bee = Bee::random(&bounds, &sphere, Direction::Minimize, &mut rng).unwrap();
        assert!(bounds.contains(bee.position()));
        assert!((bee.value() - sphere(bee.position())).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn prop_fitness_positive_and_rank_consistent(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            let fa = fitness_of(a, Direction::Minimize);
            let fb = fitness_of(b, Direction::Minimize);
            prop_assert!(fa > 0.0 && fb > 0.0);
            if a < b {
                prop_assert!(fa >= fb);
            }
        }
    }
}
