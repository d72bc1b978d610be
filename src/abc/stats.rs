//! Population diversity and multi-run summaries.

use super::bee::Bee;

/// Spread of a population around its centroid.
///
/// For each bee, the root-mean-square distance (over dimensions) to the
/// centroid; the result is the mean of those distances. Zero for an empty
/// or single-bee population.
pub fn diversity(bees: &[Bee]) -> f64 {
    let n = bees.len();
    if n < 2 {
        return 0.0;
    }
    let dim = bees[0].position().len();
    if dim == 0 {
        return 0.0;
    }

    let mut centroid = vec![0.0; dim];
    for bee in bees {
        for (c, &x) in centroid.iter_mut().zip(bee.position()) {
            *c += x;
        }
    }
    for c in &mut centroid {
        *c /= n as f64;
    }

    let total: f64 = bees
        .iter()
        .map(|bee| {
            let ms: f64 = bee
                .position()
                .iter()
                .zip(&centroid)
                .map(|(&x, &c)| (x - c) * (x - c))
                .sum::<f64>()
                / dim as f64;
            ms.sqrt()
        })
        .sum();
    total / n as f64
}

/// Summary statistics of best values collected over repeated runs.
///
/// ```
/// use u_beecolony::abc::RunSummary;
///
/// let s = RunSummary::from_values(&[3.0, 1.0, 2.0]).unwrap();
/// assert_eq!(s.median, 2.0);
/// assert_eq!(s.best, 1.0);
/// assert_eq!(s.worst, 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub runs: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Lowest value.
    pub best: f64,
    /// Highest value.
    pub worst: f64,
}

impl RunSummary {
    /// Summarizes minimization results. Returns `None` for an empty slice.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            runs: values.len(),
            mean,
            median,
            std: var.sqrt(),
            best: sorted[0],
            worst: sorted[sorted.len() - 1],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abc::types::Direction;

    fn bee_at(position: Vec<f64>) -> Bee {
        Bee::evaluated(position, 0.0, Direction::Minimize)
    }

    #[test]
    fn test_diversity_of_identical_bees_is_zero() {
        let bees = vec![bee_at(vec![1.0, 2.0]); 5];
        assert_eq!(diversity(&bees), 0.0);
        assert_eq!(diversity(&bees[..1]), 0.0);
    }

    #[test]
    fn test_diversity_symmetric_pair() {
        // Both bees sit at RMS distance 1 from the origin centroid.
        let bees = vec![bee_at(vec![1.0, -1.0]), bee_at(vec![-1.0, 1.0])];
        assert!((diversity(&bees) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_even_count() {
        let s = RunSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.runs, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.std - 1.25f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.best, 1.0);
        assert_eq!(s.worst, 4.0);
    }

    #[test]
    fn test_summary_empty() {
        assert!(RunSummary::from_values(&[]).is_none());
    }
}
