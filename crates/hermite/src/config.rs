//! Configuration shared by every operation.
//!
//! One `HermiteConfig` fixes the working precision, tolerance and budgets
//! for a whole call. With the `serde` feature it round-trips through TOML:
//!
//! ```toml
//! precision = 100
//! max_iterations = 1000
//! tolerance = 1e-10
//! min_confirmations = 3
//! max_degree = 4
//! max_denominator = 100
//! full_analysis = true
//! ```

use crate::error::HermiteError;
use crate::real::{Precision, Real};

/// Highest polynomial degree the minimal-polynomial search accepts.
pub const MAX_SEARCH_DEGREE: usize = 8;

/// Tuning knobs for periodicity detection, verification and classification.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct HermiteConfig {
    /// Working precision in decimal digits.
    pub precision: u32,
    /// Iteration cap of the projective-triple iteration.
    pub max_iterations: usize,
    /// Absolute tolerance for zero tests, equivalence and root checks.
    pub tolerance: f64,
    /// Independent observations a period length needs before it is trusted.
    pub min_confirmations: usize,
    /// Highest degree tried by the minimal-polynomial search.
    pub max_degree: usize,
    /// Largest denominator of the rational pre-filter.
    pub max_denominator: u64,
    /// Cross-check algebraic findings with the periodicity iteration.
    pub full_analysis: bool,
}

impl Default for HermiteConfig {
    fn default() -> Self {
        Self {
            precision: Precision::DEFAULT.digits(),
            max_iterations: 1000,
            tolerance: 1e-10,
            min_confirmations: 3,
            max_degree: 4,
            max_denominator: 100,
            full_analysis: true,
        }
    }
}

impl HermiteConfig {
    /// Check every field against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::PrecisionOutOfRange`] for an unsupported
    /// precision and [`HermiteError::InvalidConfig`] naming the first other
    /// field that is out of range.
    pub fn validate(&self) -> Result<(), HermiteError> {
        let precision = Precision::new(self.precision)?;
        if self.max_iterations == 0 {
            return Err(HermiteError::config("max_iterations", "must be at least 1"));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(HermiteError::config(
                "tolerance",
                format!("must lie strictly between 0 and 1, got {}", self.tolerance),
            ));
        }
        let floor = 10f64.powi(-(precision.digits().min(300) as i32));
        if self.tolerance < floor {
            return Err(HermiteError::config(
                "tolerance",
                format!(
                    "{} is below the resolution of {} digits",
                    self.tolerance, self.precision
                ),
            ));
        }
        if self.min_confirmations == 0 {
            return Err(HermiteError::config("min_confirmations", "must be at least 1"));
        }
        if !(1..=MAX_SEARCH_DEGREE).contains(&self.max_degree) {
            return Err(HermiteError::config(
                "max_degree",
                format!("must lie in 1..={MAX_SEARCH_DEGREE}"),
            ));
        }
        if self.max_denominator == 0 {
            return Err(HermiteError::config("max_denominator", "must be at least 1"));
        }
        Ok(())
    }

    /// The working precision.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::PrecisionOutOfRange`] for unsupported digits.
    pub fn working_precision(&self) -> Result<Precision, HermiteError> {
        Precision::new(self.precision)
    }

    /// The tolerance as a high-precision value.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::InvalidConfig`] when the tolerance is not
    /// finite.
    pub fn tolerance_at(&self, precision: Precision) -> Result<Real, HermiteError> {
        Real::from_f64(self.tolerance, precision)
            .ok_or_else(|| HermiteError::config("tolerance", "must be finite"))
    }

    /// Builder: set the precision.
    #[must_use]
    pub fn with_precision(mut self, digits: u32) -> Self {
        self.precision = digits;
        self
    }

    /// Builder: set the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder: set the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder: set the confirmation threshold.
    #[must_use]
    pub fn with_min_confirmations(mut self, min_confirmations: usize) -> Self {
        self.min_confirmations = min_confirmations;
        self
    }

    /// Builder: set the search degree.
    #[must_use]
    pub fn with_max_degree(mut self, max_degree: usize) -> Self {
        self.max_degree = max_degree;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = HermiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.precision, 100);
        assert_eq!(config.min_confirmations, 3);
        assert_eq!(config.working_precision().unwrap(), Precision::DEFAULT);
    }

    #[test]
    fn each_field_is_checked() {
        let base = HermiteConfig::default();
        let field = |config: HermiteConfig| match config.validate() {
            Err(HermiteError::InvalidConfig { field, .. }) => field,
            other => panic!("expected a field error, got {other:?}"),
        };
        assert_eq!(field(base.clone().with_max_iterations(0)), "max_iterations");
        assert_eq!(field(base.clone().with_tolerance(0.0)), "tolerance");
        assert_eq!(field(base.clone().with_tolerance(f64::NAN)), "tolerance");
        assert_eq!(field(base.clone().with_tolerance(1e-30).with_precision(20)), "tolerance");
        assert_eq!(field(base.clone().with_min_confirmations(0)), "min_confirmations");
        assert_eq!(field(base.clone().with_max_degree(0)), "max_degree");
        assert_eq!(field(base.clone().with_max_degree(9)), "max_degree");
        assert!(matches!(
            base.with_precision(4).validate(),
            Err(HermiteError::PrecisionOutOfRange { digits: 4, .. })
        ));
    }

    #[test]
    fn tolerance_converts_exactly() {
        let config = HermiteConfig::default();
        let tolerance = config.tolerance_at(Precision::DEFAULT).unwrap();
        assert_eq!(tolerance.to_f64(), 1e-10);
    }
}
