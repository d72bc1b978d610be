//! Objective contract and search-space description.
//!
//! The colony treats the objective as an opaque callable `f: R^d -> R`
//! paired with box bounds. Everything else (names, known optima) is
//! metadata for reporting.

use crate::error::{AbcError, ObjectiveError, Result};
use rand::Rng;
use std::fmt::Display;

/// An objective function over a box-bounded real domain.
///
/// Any `Fn(&[f64]) -> f64 + Sync` closure is an objective. Wrap closures
/// that can fail in [`Fallible`].
///
/// Implementations must be side-effect free: evaluating the same position
/// twice must return the same value.
///
/// # Examples
///
/// ```
/// use u_beecolony::abc::Objective;
///
/// let sphere = |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>();
/// assert_eq!(sphere.evaluate(&[1.0, 2.0]).unwrap(), 5.0);
/// ```
pub trait Objective: Sync {
    /// Evaluates the objective at `position`.
    fn evaluate(&self, position: &[f64]) -> std::result::Result<f64, ObjectiveError>;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn evaluate(&self, position: &[f64]) -> std::result::Result<f64, ObjectiveError> {
        Ok(self(position))
    }
}

/// Adapter for objectives that report their own failures.
///
/// ```
/// use u_beecolony::abc::{Fallible, Objective};
///
/// let log_objective = Fallible(|x: &[f64]| {
///     if x[0] <= 0.0 {
///         Err(format!("log undefined at {}", x[0]))
///     } else {
///         Ok(x[0].ln().abs())
///     }
/// });
/// assert!(log_objective.evaluate(&[-1.0]).is_err());
/// ```
pub struct Fallible<F>(pub F);

impl<F, E> Objective for Fallible<F>
where
    F: Fn(&[f64]) -> std::result::Result<f64, E> + Sync,
    E: Display,
{
    fn evaluate(&self, position: &[f64]) -> std::result::Result<f64, ObjectiveError> {
        (self.0)(position).map_err(|e| ObjectiveError::new(e.to_string()))
    }
}

/// Evaluates `objective` and rejects failures and non-finite results.
pub(crate) fn evaluate_checked<O: Objective + ?Sized>(objective: &O, position: &[f64]) -> Result<f64> {
    let value = objective.evaluate(position)?;
    if !value.is_finite() {
        return Err(AbcError::NonFiniteObjective {
            value,
            position: position.to_vec(),
        });
    }
    Ok(value)
}

/// Whether lower or higher objective values are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl Direction {
    /// Maps an objective value to a cost where lower is always better.
    #[inline]
    pub fn cost(self, value: f64) -> f64 {
        match self {
            Direction::Minimize => value,
            Direction::Maximize => -value,
        }
    }

    /// Whether `candidate` is strictly better than `incumbent`.
    #[inline]
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        self.cost(candidate) < self.cost(incumbent)
    }
}

/// Axis-aligned box bounds: one `[lower, upper]` interval per dimension.
///
/// Construction rejects empty domains and any dimension where
/// `lower >= upper`, either end is not finite, or the width
/// `upper - lower` overflows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Builds bounds from `(lower, upper)` pairs.
    ///
    /// ```
    /// use u_beecolony::abc::Bounds;
    ///
    /// let bounds = Bounds::new([(-5.0, 5.0), (0.0, 1.0)]).unwrap();
    /// assert_eq!(bounds.dim(), 2);
    /// assert!(Bounds::new([(1.0, 1.0)]).is_err());
    /// ```
    pub fn new(pairs: impl IntoIterator<Item = (f64, f64)>) -> Result<Self> {
        let (lower, upper): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        if lower.is_empty() {
            return Err(AbcError::config("bounds must have at least one dimension"));
        }
        for (dim, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi || !(hi - lo).is_finite() {
                return Err(AbcError::InvalidBounds {
                    dim,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Same interval in every dimension.
    pub fn uniform(dim: usize, lower: f64, upper: f64) -> Result<Self> {
        Self::new(std::iter::repeat_n((lower, upper), dim))
    }

    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Whether every coordinate lies inside its interval (inclusive).
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dim()
            && position
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&x, (&lo, &hi))| x >= lo && x <= hi)
    }

    /// Hard-clips one coordinate into dimension `j`'s interval.
    #[inline]
    pub fn clip_dim(&self, j: usize, value: f64) -> f64 {
        value.clamp(self.lower[j], self.upper[j])
    }

    /// Hard-clips every coordinate in place.
    pub fn clip(&self, position: &mut [f64]) {
        for (j, x) in position.iter_mut().enumerate() {
            *x = self.clip_dim(j, *x);
        }
    }

    /// Draws a point uniformly inside the box.
    pub fn sample_uniform<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(&lo, &hi)| rng.random_range(lo..hi))
            .collect()
    }

    /// Maps a point of the unit cube onto the box.
    pub fn scale_unit(&self, unit: &[f64]) -> Vec<f64> {
        unit.iter()
            .enumerate()
            .map(|(j, &u)| self.clip_dim(j, self.lower[j] + (self.upper[j] - self.lower[j]) * u))
            .collect()
    }

    /// Reflects a point through the box centre: `lower + upper - x`.
    pub fn opposite(&self, position: &[f64]) -> Vec<f64> {
        position
            .iter()
            .enumerate()
            .map(|(j, &x)| self.clip_dim(j, self.lower[j] + self.upper[j] - x))
            .collect()
    }

    /// Fails unless `position` has the same dimensionality as the box.
    pub fn check_dim(&self, position: &[f64]) -> Result<()> {
        if position.len() != self.dim() {
            return Err(AbcError::DimensionMismatch {
                expected: self.dim(),
                actual: position.len(),
            });
        }
        Ok(())
    }
}

/// An objective bundled with its bounds and optional known optimum.
///
/// The known optimum is used only for reporting the gap between the best
/// value found and the true optimum; it never steers the search.
///
/// ```
/// use u_beecolony::abc::{Bounds, Problem};
///
/// let sphere = Problem::new(
///     "Sphere-2d",
///     |x: &[f64]| x.iter().map(|v| v * v).sum::<f64>(),
///     Bounds::uniform(2, -5.12, 5.12).unwrap(),
/// )
/// .with_optimal_solution(vec![0.0, 0.0])
/// .unwrap();
/// assert_eq!(sphere.optimal_value().unwrap().unwrap(), 0.0);
/// ```
pub struct Problem<F> {
    name: String,
    objective: F,
    bounds: Bounds,
    optimal_solution: Option<Vec<f64>>,
}

impl<F: Objective> Problem<F> {
    pub fn new(name: impl Into<String>, objective: F, bounds: Bounds) -> Self {
        Self {
            name: name.into(),
            objective,
            bounds,
            optimal_solution: None,
        }
    }

    /// Records the known optimal solution (must match the bounds' dimension).
    pub fn with_optimal_solution(mut self, solution: Vec<f64>) -> Result<Self> {
        self.bounds.check_dim(&solution)?;
        self.optimal_solution = Some(solution);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn optimal_solution(&self) -> Option<&[f64]> {
        self.optimal_solution.as_deref()
    }

    /// Objective value at the known optimum, if one was recorded.
    pub fn optimal_value(&self) -> Option<Result<f64>> {
        self.optimal_solution
            .as_deref()
            .map(|x| evaluate_checked(&self.objective, x))
    }
}

impl<F: Objective> Objective for Problem<F> {
    fn evaluate(&self, position: &[f64]) -> std::result::Result<f64, ObjectiveError> {
        self.objective.evaluate(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_bounds_rejects_inverted_and_zero_width() {
        assert!(matches!(
            Bounds::new([(-1.0, 1.0), (3.0, 2.0)]),
            Err(AbcError::InvalidBounds { dim: 1, .. })
        ));
        assert!(matches!(
            Bounds::new([(0.5, 0.5)]),
            Err(AbcError::InvalidBounds { dim: 0, .. })
        ));
        assert!(Bounds::new([(f64::NEG_INFINITY, 0.0)]).is_err());
        // finite ends, infinite width
        assert!(matches!(
            Bounds::new([(0.0, 1.0), (-f64::MAX, f64::MAX)]),
            Err(AbcError::InvalidBounds { dim: 1, .. })
        ));
        assert!(Bounds::new([(0.0, f64::MAX)]).is_ok());
        assert!(Bounds::new(Vec::<(f64, f64)>::new()).is_err());
    }

    #[test]
    fn test_clip_and_contains() {
        let bounds = Bounds::new([(-1.0, 1.0), (0.0, 10.0)]).unwrap();
        let mut x = vec![-3.0, 11.0];
        assert!(!bounds.contains(&x));
        bounds.clip(&mut x);
        assert_eq!(x, vec![-1.0, 10.0]);
        assert!(bounds.contains(&x));
        assert!(!bounds.contains(&[0.0]));
    }

    #[test]
    fn test_sample_uniform_inside() {
        let bounds = Bounds::new([(-5.0, 5.0), (100.0, 100.5)]).unwrap();
        let mut rng = create_rng(42);
        for _ in 0..1000 {
            assert!(bounds.contains(&bounds.sample_uniform(&mut rng)));
        }
    }

    #[test]
    fn test_opposite_point() {
        let bounds = Bounds::new([(0.0, 10.0), (-2.0, 2.0)]).unwrap();
        assert_eq!(bounds.opposite(&[3.0, 1.5]), vec![7.0, -1.5]);
        assert_eq!(bounds.scale_unit(&[0.5, 1.0]), vec![5.0, 2.0]);
    }

    #[test]
    fn test_direction() {
        assert!(Direction::Minimize.is_better(1.0, 2.0));
        assert!(!Direction::Minimize.is_better(2.0, 2.0));
        assert!(Direction::Maximize.is_better(3.0, 2.0));
        assert!(!Direction::Maximize.is_better(2.0, 2.0));
    }

    #[test]
    fn test_evaluate_checked_rejects_non_finite() {
        let f = |_: &[f64]| f64::NAN;
        assert!(matches!(
            evaluate_checked(&f, &[1.0]),
            Err(AbcError::NonFiniteObjective { .. })
        ));

        let g = Fallible(|_: &[f64]| -> std::result::Result<f64, String> { Err("boom".into()) });
        assert_eq!(
            evaluate_checked(&g, &[1.0]),
            Err(AbcError::Objective(ObjectiveError::new("boom")))
        );
    }

    #[test]
    fn test_problem_metadata() {
        let problem = Problem::new(
            "shifted",
            |x: &[f64]| (x[0] - 1.0).powi(2) + 2.0,
            Bounds::uniform(1, -3.0, 3.0).unwrap(),
        );
        assert!(problem.optimal_value().is_none());

        let problem = problem.with_optimal_solution(vec![1.0]).unwrap();
        assert_eq!(problem.name(), "shifted");
        assert_eq!(problem.optimal_value(), Some(Ok(2.0)));

        let bad = Problem::new("bad", |_: &[f64]| 0.0, Bounds::uniform(2, 0.0, 1.0).unwrap())
            .with_optimal_solution(vec![0.0]);
        assert!(matches!(bad, Err(AbcError::DimensionMismatch { .. })));
    }
}
