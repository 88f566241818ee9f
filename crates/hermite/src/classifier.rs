//! Classification of a real number by algebraic degree.
//!
//! The classifier reconciles the three signals of this crate:
//!
//! 1. the rational pre-filter of the periodicity iteration;
//! 2. a minimal polynomial from the configured [`MinimalPolynomialFinder`],
//!    with degree-3 candidates confirmed by the companion-matrix verifier
//!    (and, with `full_analysis`, cross-checked by the periodicity
//!    iteration);
//! 3. the periodicity iteration itself, when no polynomial is found.
//!
//! A periodic digit stream alone never yields
//! [`NumberKind::CubicIrrational`]: the floor step falls into the all-zero
//! digit cycle for many inputs, so only the algebraic verifier can certify
//! a cubic.
//!
//! # Examples
//!
//! ```
//! use hermite::classifier::{classify, NumberKind};
//! use hermite::config::HermiteConfig;
//! use hermite::real::{Precision, Real};
//!
//! let config = HermiteConfig::default();
//! let cbrt2 = Real::from_integer(2, Precision::DEFAULT).cbrt();
//! assert_eq!(classify(&cbrt2, &config).unwrap().kind, NumberKind::CubicIrrational);
//!
//! let sqrt2 = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
//! assert_eq!(classify(&sqrt2, &config).unwrap().kind, NumberKind::QuadraticIrrational);
//! ```

use core::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

use crate::config::HermiteConfig;
use crate::continued_fraction::evaluate;
use crate::error::HermiteError;
use crate::finder::{LatticeFinder, MinimalPolynomialFinder};
use crate::hapd::{
    PeriodicityReport, PeriodicityStatus, ProjectiveTripleIterator, TerminationReason,
};
use crate::polynomial::Polynomial;
use crate::real::Real;
use crate::verifier::{CubicVerdict, CubicVerifier};

/// Algebraic nature of a real number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NumberKind {
    /// Root of a linear polynomial.
    Rational,
    /// Root of an irreducible quadratic.
    QuadraticIrrational,
    /// Root of an irreducible cubic.
    CubicIrrational,
    /// Root of an irreducible polynomial of degree four or more.
    HigherDegreeAlgebraic {
        /// The degree.
        degree: usize,
    },
    /// No relation within the search bounds.
    Transcendental,
}

impl fmt::Display for NumberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rational => f.write_str("rational"),
            Self::QuadraticIrrational => f.write_str("quadratic irrational"),
            Self::CubicIrrational => f.write_str("cubic irrational"),
            Self::HigherDegreeAlgebraic { degree } => {
                write!(f, "algebraic of degree {degree}")
            }
            Self::Transcendental => f.write_str("transcendental"),
        }
    }
}

/// How much the classification can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Confidence {
    /// Weak or conflicting evidence.
    Low,
    /// Evidence from one heuristic signal.
    Medium,
    /// Exact algebraic evidence.
    High,
    /// Exact algebraic evidence confirmed by an independent check.
    VeryHigh,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::VeryHigh => "very high",
        })
    }
}

/// Which stage decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// Small-denominator or continued-fraction pre-filter.
    RationalCheck,
    /// Degree of the minimal polynomial.
    Polynomial,
    /// Minimal polynomial confirmed by the companion matrix.
    PolynomialMatrix,
    /// As above, and the periodicity iteration also found a period.
    PolynomialMatrixPeriodicity,
    /// The periodicity iteration.
    Periodicity,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RationalCheck => "rational check",
            Self::Polynomial => "minimal polynomial",
            Self::PolynomialMatrix => "minimal polynomial + companion matrix",
            Self::PolynomialMatrixPeriodicity => {
                "minimal polynomial + companion matrix + periodicity"
            }
            Self::Periodicity => "periodicity",
        })
    }
}

/// Result of [`Classifier::classify`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Classification {
    /// The verdict.
    pub kind: NumberKind,
    /// Trust in the verdict.
    pub confidence: Confidence,
    /// Stage that decided.
    pub method: Method,
    /// Minimal polynomial, when known.
    pub polynomial: Option<Polynomial>,
    /// Companion-matrix verdict, when a cubic was checked.
    pub verification: Option<CubicVerdict>,
    /// Periodicity report, when the iteration ran.
    pub periodicity: Option<PeriodicityReport>,
}

impl Classification {
    fn new(kind: NumberKind, confidence: Confidence, method: Method) -> Self {
        Self {
            kind,
            confidence,
            method,
            polynomial: None,
            verification: None,
            periodicity: None,
        }
    }
}

/// Full classification pipeline.
#[derive(Debug, Clone)]
pub struct Classifier<F = LatticeFinder> {
    iterator: ProjectiveTripleIterator,
    verifier: CubicVerifier<F>,
    tolerance: Real,
    max_degree: usize,
    full_analysis: bool,
}

impl Classifier<LatticeFinder> {
    /// Classifier using the default [`LatticeFinder`].
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid configuration.
    pub fn new(config: &HermiteConfig) -> Result<Self, HermiteError> {
        Self::with_finder(config, LatticeFinder::default())
    }
}

impl<F: MinimalPolynomialFinder> Classifier<F> {
    /// Classifier using a custom finder.
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid configuration.
    pub fn with_finder(config: &HermiteConfig, finder: F) -> Result<Self, HermiteError> {
        let iterator = ProjectiveTripleIterator::new(config)?;
        let tolerance = config.tolerance_at(iterator.precision())?;
        Ok(Self {
            iterator,
            verifier: CubicVerifier::with_finder(config, finder)?,
            tolerance,
            max_degree: config.max_degree,
            full_analysis: config.full_analysis,
        })
    }

    /// Classify `value` (taken at the working precision).
    #[must_use]
    pub fn classify(&self, value: &Real) -> Classification {
        let value = value.with_precision(self.iterator.precision());
        let classification = self.decide(&value);
        tracing::debug!(
            kind = %classification.kind,
            confidence = %classification.confidence,
            method = %classification.method,
            "classified"
        );
        classification
    }

    fn decide(&self, value: &Real) -> Classification {
        if let Some(reason) = self.iterator.prefilter(value) {
            let mut result = Classification::new(
                NumberKind::Rational,
                Confidence::VeryHigh,
                Method::RationalCheck,
            );
            result.polynomial = rational_of(&reason).map(|r| linear_integer_form(&r));
            return result;
        }

        let candidate =
            self.verifier
                .finder()
                .find_minimal_polynomial(value, self.max_degree, &self.tolerance);
        if let Some(polynomial) = candidate {
            if let Some(result) = self.from_polynomial(value, polynomial) {
                return result;
            }
        }

        let report = self.iterator.run(value);
        let (kind, confidence) = match &report.status {
            PeriodicityStatus::Terminated { .. } => (NumberKind::Rational, Confidence::High),
            PeriodicityStatus::Collapsed { .. } => {
                (NumberKind::QuadraticIrrational, Confidence::Medium)
            }
            // a period without a polynomial conflicts with the search
            PeriodicityStatus::Periodic { .. } => (NumberKind::Transcendental, Confidence::Low),
            PeriodicityStatus::PotentiallyPeriodic { .. } | PeriodicityStatus::NoPeriodicity => {
                (NumberKind::Transcendental, Confidence::Medium)
            }
        };
        let mut result = Classification::new(kind, confidence, Method::Periodicity);
        result.periodicity = Some(report);
        result
    }

    fn from_polynomial(&self, value: &Real, polynomial: Polynomial) -> Option<Classification> {
        let degree = polynomial.exact_degree();
        let mut result = match degree {
            0 => return None,
            1 => {
                Classification::new(NumberKind::Rational, Confidence::VeryHigh, Method::Polynomial)
            }
            2 => Classification::new(
                NumberKind::QuadraticIrrational,
                Confidence::VeryHigh,
                Method::Polynomial,
            ),
            3 => {
                let verdict = self.verifier.verify(value, Some(&polynomial));
                if !verdict.is_cubic() {
                    tracing::debug!(verdict = verdict.label(), "cubic candidate rejected");
                    return None;
                }
                let mut result = Classification::new(
                    NumberKind::CubicIrrational,
                    Confidence::VeryHigh,
                    Method::PolynomialMatrix,
                );
                if self.full_analysis {
                    let report = self.iterator.run(value);
                    if report.status.is_periodic() {
                        result.method = Method::PolynomialMatrixPeriodicity;
                    }
                    result.periodicity = Some(report);
                }
                result.verification = Some(verdict);
                result
            }
            _ => Classification::new(
                NumberKind::HigherDegreeAlgebraic { degree },
                Confidence::High,
                Method::Polynomial,
            ),
        };
        result.polynomial = Some(polynomial);
        Some(result)
    }
}

fn rational_of(reason: &TerminationReason) -> Option<BigRational> {
    match reason {
        TerminationReason::SmallDenominator { rational } => Some(rational.clone()),
        TerminationReason::ContinuedFraction { terms } => evaluate(terms),
        TerminationReason::VanishingThirdComponent { .. } => None,
    }
}

/// `q·x - p` for the rational `p/q`.
fn linear_integer_form(rational: &BigRational) -> Polynomial {
    let q: BigInt = rational.denom().clone();
    let p: BigInt = rational.numer().clone();
    Polynomial::from_integers([q, -p]).unwrap_or_else(|_| Polynomial::linear(rational.clone()))
}

/// Classify `value` under `config` with the default finder.
///
/// # Errors
///
/// Returns an error only for an invalid configuration.
pub fn classify(value: &Real, config: &HermiteConfig) -> Result<Classification, HermiteError> {
    Ok(Classifier::new(config)?.classify(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::real::Precision;

    fn config() -> HermiteConfig {
        HermiteConfig::default()
    }

    fn int(n: i64) -> Real {
        Real::from_integer(n, Precision::DEFAULT)
    }

    #[test]
    fn rationals_use_the_fast_path() {
        let c = classify(&Real::from_ratio(22, 7, Precision::DEFAULT).unwrap(), &config()).unwrap();
        assert_eq!(c.kind, NumberKind::Rational);
        assert_eq!(c.method, Method::RationalCheck);
        assert_eq!(
            c.polynomial,
            Some(Polynomial::from_integers([7, -22]).unwrap())
        );
        assert!(c.periodicity.is_none());
    }

    #[test]
    fn cube_root_is_confirmed_three_ways() {
        let c = classify(&int(2).cbrt(), &config()).unwrap();
        assert_eq!(c.kind, NumberKind::CubicIrrational);
        assert_eq!(c.confidence, Confidence::VeryHigh);
        assert_eq!(c.method, Method::PolynomialMatrixPeriodicity);
        assert!(c.verification.as_ref().is_some_and(CubicVerdict::is_cubic));
    }

    #[test]
    fn without_full_analysis_no_iteration_runs() {
        let mut config = config();
        config.full_analysis = false;
        let c = classify(&int(3).cbrt(), &config).unwrap();
        assert_eq!(c.kind, NumberKind::CubicIrrational);
        assert_eq!(c.method, Method::PolynomialMatrix);
        assert!(c.periodicity.is_none());
    }

    #[test]
    fn quadratic_and_quartic() {
        let c = classify(&int(2).sqrt().unwrap(), &config()).unwrap();
        assert_eq!(c.kind, NumberKind::QuadraticIrrational);
        let c = classify(&int(2).nth_root(4).unwrap(), &config()).unwrap();
        assert_eq!(c.kind, NumberKind::HigherDegreeAlgebraic { degree: 4 });
        assert_eq!(c.confidence, Confidence::High);
    }

    #[test]
    fn transcendentals_fall_through_to_the_iteration() {
        let c = classify(&Real::pi(Precision::DEFAULT), &config()).unwrap();
        assert_eq!(c.kind, NumberKind::Transcendental);
        assert_eq!(c.method, Method::Periodicity);
        assert!(c.polynomial.is_none());
        assert!(c.confidence <= Confidence::Medium);
    }

    #[test]
    fn a_period_alone_never_certifies_a_cubic() {
        let nothing = |_: &Real, _: usize, _: &Real| -> Option<Polynomial> { None };
        let classifier = Classifier::with_finder(&config(), nothing).unwrap();
        let c = classifier.classify(&int(2).cbrt());
        assert!(c.periodicity.as_ref().is_some_and(|r| r.status.is_periodic()));
        assert_ne!(c.kind, NumberKind::CubicIrrational);
        assert_eq!(c.confidence, Confidence::Low);
    }

    #[test]
    fn collapse_without_a_polynomial_reads_as_quadratic() {
        let nothing = |_: &Real, _: usize, _: &Real| -> Option<Polynomial> { None };
        let classifier = Classifier::with_finder(&config(), nothing).unwrap();
        let c = classifier.classify(&int(3).sqrt().unwrap());
        assert_eq!(c.kind, NumberKind::QuadraticIrrational);
        assert_eq!(c.method, Method::Periodicity);
    }

    #[test]
    fn labels() {
        assert_eq!(NumberKind::CubicIrrational.to_string(), "cubic irrational");
        assert_eq!(
            NumberKind::HigherDegreeAlgebraic { degree: 5 }.to_string(),
            "algebraic of degree 5"
        );
        assert_eq!(Confidence::VeryHigh.to_string(), "very high");
        assert!(Confidence::Low < Confidence::VeryHigh);
    }
}
