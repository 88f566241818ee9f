//! Hermite - cubic irrational detection
//!
//! Hermite asked whether some integer expansion of a real number becomes
//! periodic exactly when the number is a cubic irrational, the way
//! continued fractions characterize quadratic irrationals. This crate runs
//! a projective-triple iteration in that spirit and cross-validates its
//! answer with an independent algebraic check.
//!
//! # Pipeline
//!
//! ```text
//! value ──► rational pre-filter ──► minimal polynomial ──► companion-matrix check
//!                                          │                      │
//!                                          └──► periodicity ◄─────┘ (full analysis)
//! ```
//!
//! | Module | Role |
//! |--------|------|
//! | [`real`] | arbitrary-precision arithmetic with an explicit [`Precision`] |
//! | [`polynomial`] | exact rational polynomials |
//! | [`analyzer`] | degree and irreducibility over ℚ |
//! | [`companion`] | companion matrices and power traces |
//! | [`verifier`] | cubic verification via the trace recurrence |
//! | [`hapd`] | projective-triple periodicity detection |
//! | [`continued_fraction`] | continued fractions and the rational search |
//! | [`finder`] | minimal polynomials by lattice reduction |
//! | [`classifier`] | the combined verdict |
//!
//! # Precision
//!
//! There is no global precision. Every call takes a [`HermiteConfig`] whose
//! `precision` is applied to the input before any arithmetic, and every
//! [`Real`] produced inside that call carries it.
//!
//! # Example: Classification
//!
//! ```
//! use hermite::prelude::*;
//!
//! let config = HermiteConfig::default();
//! let p = config.working_precision().unwrap();
//! let value = Real::from_integer(2, p).cbrt();
//!
//! let result = classify(&value, &config).unwrap();
//! assert_eq!(result.kind, NumberKind::CubicIrrational);
//! assert_eq!(result.polynomial.unwrap().to_string(), "x^3 - 2");
//! ```
//!
//! # Example: Periodicity
//!
//! ```
//! use hermite::prelude::*;
//!
//! let config = HermiteConfig::default();
//! let value = Real::from_integer(2, Precision::DEFAULT).cbrt();
//! let report = run_periodicity(&value, &config).unwrap();
//! assert_eq!(report.digit_pairs[0], DigitPair::new(1, 1));
//! assert_eq!(report.status.period().map(|(_, period)| period), Some(1));
//! ```

// Arbitrary-precision reals
pub mod real;
// Exact polynomials and their analysis
pub mod analyzer;
pub mod polynomial;
// Companion matrices and the cubic verifier
pub mod companion;
pub mod verifier;
// Projective-triple iteration
pub mod hapd;
// Collaborators: continued fractions and minimal polynomials
pub mod continued_fraction;
pub mod finder;
// Combined classification
pub mod classifier;
// Configuration and errors
pub mod config;
pub mod error;

#[cfg(feature = "serde")]
mod serde_support;

pub use analyzer::{degree, is_irreducible};
pub use classifier::{classify, Classification, Classifier, Confidence, Method, NumberKind};
pub use companion::{CompanionMatrix, RecurrenceCheck, Scalar, TraceSequence};
pub use config::HermiteConfig;
pub use continued_fraction::{continued_fraction, ContinuedFraction};
pub use error::HermiteError;
pub use finder::{LatticeFinder, MinimalPolynomialFinder};
pub use hapd::{
    run_periodicity, DigitPair, PeriodCandidate, PeriodicityReport, PeriodicityStatus,
    ProjectiveTriple, ProjectiveTripleIterator, TerminationReason,
};
pub use polynomial::Polynomial;
pub use real::{Precision, Real};
pub use verifier::{verify_cubic, CubicEvidence, CubicVerdict, CubicVerifier, NotCubicReason};

/// Prelude module for convenient imports.
///
/// ```
/// use hermite::prelude::*;
/// ```
pub mod prelude {
    pub use crate::analyzer::{degree, is_irreducible};
    pub use crate::classifier::{classify, Classification, Classifier, Confidence, NumberKind};
    pub use crate::companion::CompanionMatrix;
    pub use crate::config::HermiteConfig;
    pub use crate::error::HermiteError;
    pub use crate::finder::{LatticeFinder, MinimalPolynomialFinder};
    pub use crate::hapd::{run_periodicity, DigitPair, PeriodicityReport, PeriodicityStatus};
    pub use crate::polynomial::Polynomial;
    pub use crate::real::{Precision, Real};
    pub use crate::verifier::{verify_cubic, CubicVerdict};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_are_independent() {
        let config = HermiteConfig::default();
        let value = Real::from_integer(3, Precision::DEFAULT).cbrt();
        let first = run_periodicity(&value, &config).unwrap();
        let _ = classify(&Real::pi(Precision::DEFAULT), &config).unwrap();
        let second = run_periodicity(&value, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_input_precision_is_overridden_by_config() {
        let config = HermiteConfig::default().with_precision(60);
        let wide = Precision::new(400).unwrap();
        let value = Real::from_integer(2, wide).cbrt();
        let report = run_periodicity(&value, &config).unwrap();
        let p = report.triples[0].v1.precision();
        assert_eq!(p.digits(), 60);
    }
}
