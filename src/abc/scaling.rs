//! Scaling-factor control.
//!
//! The scaling factor `sf` bounds the random coefficient `phi ~ U(-sf, sf)`
//! used by every mutation strategy. In fixed mode it never changes. In
//! self-adaptive mode it follows Rechenberg's 1/5 success rule: after each
//! iteration the fraction of accepted mutations is compared to a target
//! ratio and `sf` is divided (more success) or multiplied (less success) by
//! `factor`, then clamped to `[sf_min, sf_max]`.
//!
//! # References
//!
//! - Rechenberg (1973), 1/5 success rule
//! - Akay & Karaboga (2012), self-adaptive scaling factor in modified ABC

use crate::error::{AbcError, Result};

/// Parameters of the scaling-factor controller.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalingConfig {
    /// Starting value of `sf`.
    pub initial_sf: f64,

    /// Adapt `sf` after each iteration.
    pub self_adaptive: bool,

    /// Success ratio at which `sf` stays unchanged. Default: 1/5.
    pub target_ratio: f64,

    /// Multiplicative step in (0, 1). Default: 0.85.
    pub factor: f64,

    /// Lower clamp for `sf` (must be positive).
    pub sf_min: f64,

    /// Upper clamp for `sf`.
    pub sf_max: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            initial_sf: 1.0,
            self_adaptive: false,
            target_ratio: 0.2,
            factor: 0.85,
            sf_min: 1e-3,
            sf_max: 4.0,
        }
    }
}

impl ScalingConfig {
    pub fn validate(&self) -> Result<()> {
        // phi is drawn from [-sf, sf], whose width must stay finite
        if !(self.initial_sf > 0.0 && (2.0 * self.initial_sf).is_finite()) {
            return Err(AbcError::config(format!(
                "initial_sf must be positive with a finite range [-sf, sf], got {}",
                self.initial_sf
            )));
        }
        if !self.self_adaptive {
            return Ok(());
        }
        if !(self.factor > 0.0 && self.factor < 1.0) {
            return Err(AbcError::config(format!(
                "sf adaptation factor must be in (0, 1), got {}",
                self.factor
            )));
        }
        if !(self.target_ratio > 0.0 && self.target_ratio < 1.0) {
            return Err(AbcError::config(format!(
                "sf target ratio must be in (0, 1), got {}",
                self.target_ratio
            )));
        }
        if !(self.sf_min > 0.0 && (2.0 * self.sf_max).is_finite() && self.sf_min <= self.sf_max) {
            return Err(AbcError::config(format!(
                "sf clamp must satisfy 0 < sf_min <= sf_max with 2 * sf_max finite, got [{}, {}]",
                self.sf_min, self.sf_max
            )));
        }
        if self.initial_sf < self.sf_min || self.initial_sf > self.sf_max {
            return Err(AbcError::config(format!(
                "initial_sf {} lies outside [{}, {}]",
                self.initial_sf, self.sf_min, self.sf_max
            )));
        }
        Ok(())
    }
}

/// Live scaling factor plus the rule that updates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingFactor {
    config: ScalingConfig,
    sf: f64,
}

impl ScalingFactor {
    pub fn new(config: ScalingConfig) -> Self {
        Self {
            sf: config.initial_sf,
            config,
        }
    }

    /// Current value of `sf`.
    pub fn current(&self) -> f64 {
        self.sf
    }

    pub fn config(&self) -> &ScalingConfig {
        &self.config
    }

    /// Applies one iteration's outcome and returns the new `sf`.
    ///
    /// No-op in fixed mode or when no mutation was attempted.
    pub fn update(&mut self, successes: usize, attempts: usize) -> f64 {
        if !self.config.self_adaptive || attempts == 0 {
            return self.sf;
        }

        let ratio = successes as f64 / attempts as f64;
        let next = if ratio > self.config.target_ratio {
            self.sf / self.config.factor
        } else if ratio < self.config.target_ratio {
            self.sf * self.config.factor
        } else {
            self.sf
        };
        self.sf = next.clamp(self.config.sf_min, self.config.sf_max);
        self.sf
    }

    /// Restores `sf` to its initial value.
    pub fn reset(&mut self) {
        self.sf = self.config.initial_sf;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn adaptive() -> ScalingConfig {
        ScalingConfig {
            self_adaptive: true,
            ..ScalingConfig::default()
        }
    }

    #[test]
    fn test_fixed_mode_is_constant() {
        let mut sf = ScalingFactor::new(ScalingConfig {
            initial_sf: 0.7,
            ..ScalingConfig::default()
        });
        for s in 0..10 {
            assert_eq!(sf.update(s, 10), 0.7);
        }
    }

    #[test]
    fn test_one_fifth_rule() {
        let mut sf = ScalingFactor::new(adaptive());
        // 50% success: grow
        assert!((sf.update(5, 10) - 1.0 / 0.85).abs() < 1e-12);
        sf.reset();
        // 10% success: shrink
        assert!((sf.update(1, 10) - 0.85).abs() < 1e-12);
        sf.reset();
        // exactly on target: unchanged
        assert_eq!(sf.update(2, 10), 1.0);
        // nothing attempted: unchanged
        assert_eq!(sf.update(0, 0), 1.0);
    }

    #[test]
    fn test_clamped_to_range() {
        let mut sf = ScalingFactor::new(adaptive());
        for _ in 0..500 {
            sf.update(0, 10);
        }
        assert_eq!(sf.current(), 1e-3);
        for _ in 0..500 {
            sf.update(10, 10);
        }
        assert_eq!(sf.current(), 4.0);
    }

    #[test]
    fn test_validate() {
        assert!(ScalingConfig::default().validate().is_ok());
        assert!(adaptive().validate().is_ok());
        let bad = ScalingConfig {
            initial_sf: 0.0,
            ..ScalingConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = ScalingConfig {
            factor: 1.2,
            ..adaptive()
        };
        assert!(bad.validate().is_err());
        let bad = ScalingConfig {
            sf_min: 0.0,
            ..adaptive()
        };
        assert!(bad.validate().is_err());
        let bad = ScalingConfig {
            initial_sf: 10.0,
            ..adaptive()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_overflowing_range() {
        let bad = ScalingConfig {
            initial_sf: f64::MAX,
            ..ScalingConfig::default()
        };
        assert!(bad.validate().is_err());
        let bad = ScalingConfig {
            sf_max: f64::MAX,
            ..adaptive()
        };
        assert!(bad.validate().is_err());
        let ok = ScalingConfig {
            initial_sf: 1e300,
            ..ScalingConfig::default()
        };
        assert!(ok.validate().is_ok());
    }

    proptest! {
        #[test]
        fn prop_sf_stays_positive_and_finite(outcomes in proptest::collection::vec((0usize..=20, 1usize..=20), 1..300)) {
            let mut sf = ScalingFactor::new(adaptive());
            for (s, a) in outcomes {
                let v = sf.update(s.min(a), a);
                prop_assert!(v > 0.0 && v.is_finite());
                prop_assert!((1e-3..=4.0).contains(&v));
            }
        }
    }
}
