//! Companion-matrix verification of cubic irrationals.
//!
//! A value passes when its polynomial (supplied, or found by a
//! [`MinimalPolynomialFinder`]) has degree 3, is irreducible over ℚ, its
//! companion matrix's power traces obey the Newton recurrence for
//! `k = 3, 4, 5`, and the value is a root within tolerance.
//!
//! ```
//! use hermite::config::HermiteConfig;
//! use hermite::polynomial::Polynomial;
//! use hermite::real::{Precision, Real};
//! use hermite::verifier::verify_cubic;
//!
//! let config = HermiteConfig::default();
//! let cbrt2 = Real::from_integer(2, Precision::DEFAULT).cbrt();
//! let p = Polynomial::from_integers([1, 0, 0, -2]).unwrap();
//! assert!(verify_cubic(&cbrt2, Some(&p), &config).unwrap().is_cubic());
//!
//! let reducible = Polynomial::from_integers([1, 0, 0, -1]).unwrap();
//! let one = Real::one(Precision::DEFAULT);
//! assert!(!verify_cubic(&one, Some(&reducible), &config).unwrap().is_cubic());
//! ```

use crate::analyzer::{degree, find_factor, significant_part};
use crate::companion::{CompanionMatrix, RecurrenceCheck, TraceSequence, MAX_TRACE_POWER};
use crate::config::HermiteConfig;
use crate::error::HermiteError;
use crate::finder::{LatticeFinder, MinimalPolynomialFinder};
use crate::polynomial::Polynomial;
use crate::real::{Precision, Real};

/// Everything computed while checking a degree-3 irreducible polynomial.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CubicEvidence {
    /// The polynomial checked.
    pub polynomial: Polynomial,
    /// `Tr(Cᵏ)` for `k = 0..=5`.
    pub traces: TraceSequence<Real>,
    /// One check per `k = 3, 4, 5`.
    pub checks: Vec<RecurrenceCheck<Real>>,
    /// `|P(α)|`.
    pub residual: Real,
    /// Whether the residual is within tolerance.
    pub is_root: bool,
}

impl CubicEvidence {
    /// True when every recurrence check passed.
    #[must_use]
    pub fn recurrence_holds(&self) -> bool {
        !self.checks.is_empty() && self.checks.iter().all(|c| c.passed)
    }
}

/// Why a polynomial does not certify a cubic irrational.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum NotCubicReason {
    /// Degree other than 3.
    DegreeMismatch {
        /// The degree found.
        degree: usize,
    },
    /// The polynomial factors over ℚ.
    Reducible {
        /// A nontrivial factor.
        factor: Polynomial,
    },
    /// The trace recurrence failed for these powers.
    RecurrenceFailed {
        /// Powers whose check failed.
        powers: Vec<usize>,
    },
    /// The value is not a root within tolerance.
    NotARoot,
}

/// Why no verdict could be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InconclusiveReason {
    /// The finder returned nothing (including a singular fitting system).
    NoPolynomialFound,
}

/// Outcome of [`verify_cubic`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "classification", rename_all = "snake_case"))]
pub enum CubicVerdict {
    /// Every check passed.
    CubicIrrational {
        /// Supporting computations.
        evidence: CubicEvidence,
    },
    /// Some check failed.
    NotCubic {
        /// The first failure.
        reason: NotCubicReason,
        /// The polynomial examined.
        polynomial: Polynomial,
        /// Partial results, present once the structural checks passed.
        evidence: Option<CubicEvidence>,
    },
    /// Nothing to check.
    Inconclusive {
        /// Why.
        reason: InconclusiveReason,
    },
}

impl CubicVerdict {
    /// True for [`CubicVerdict::CubicIrrational`].
    #[must_use]
    pub fn is_cubic(&self) -> bool {
        matches!(self, Self::CubicIrrational { .. })
    }

    /// The polynomial examined, if any.
    #[must_use]
    pub fn polynomial(&self) -> Option<&Polynomial> {
        match self {
            Self::CubicIrrational { evidence } => Some(&evidence.polynomial),
            Self::NotCubic { polynomial, .. } => Some(polynomial),
            Self::Inconclusive { .. } => None,
        }
    }

    /// Trace and root evidence, if computed.
    #[must_use]
    pub fn evidence(&self) -> Option<&CubicEvidence> {
        match self {
            Self::CubicIrrational { evidence } => Some(evidence),
            Self::NotCubic { evidence, .. } => evidence.as_ref(),
            Self::Inconclusive { .. } => None,
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::CubicIrrational { .. } => "cubic_irrational",
            Self::NotCubic { .. } => "not_cubic",
            Self::Inconclusive { .. } => "inconclusive",
        }
    }
}

/// Verifier with a configured precision, tolerance and polynomial finder.
#[derive(Debug, Clone)]
pub struct CubicVerifier<F = LatticeFinder> {
    finder: F,
    precision: Precision,
    tolerance: Real,
    max_degree: usize,
}

impl CubicVerifier<LatticeFinder> {
    /// Verifier using the default [`LatticeFinder`].
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid configuration.
    pub fn new(config: &HermiteConfig) -> Result<Self, HermiteError> {
        Self::with_finder(config, LatticeFinder::default())
    }
}

impl<F: MinimalPolynomialFinder> CubicVerifier<F> {
    /// Verifier using a custom finder.
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid configuration.
    pub fn with_finder(config: &HermiteConfig, finder: F) -> Result<Self, HermiteError> {
        config.validate()?;
        let precision = config.working_precision()?;
        Ok(Self {
            finder,
            precision,
            tolerance: config.tolerance_at(precision)?,
            max_degree: config.max_degree,
        })
    }

    /// The finder in use.
    pub fn finder(&self) -> &F {
        &self.finder
    }

    /// Verify `value` against `polynomial`, or against the finder's
    /// candidate when `polynomial` is `None`.
    #[must_use]
    pub fn verify(&self, value: &Real, polynomial: Option<&Polynomial>) -> CubicVerdict {
        let value = value.with_precision(self.precision);
        let found;
        let polynomial = match polynomial {
            Some(p) => p,
            None => {
                found = self
                    .finder
                    .find_minimal_polynomial(&value, self.max_degree, &self.tolerance);
                match &found {
                    Some(p) => p,
                    None => {
                        tracing::debug!("verification inconclusive: no polynomial");
                        return CubicVerdict::Inconclusive {
                            reason: InconclusiveReason::NoPolynomialFound,
                        };
                    }
                }
            }
        };
        let verdict = self.check(&value, polynomial);
        tracing::debug!(
            verdict = verdict.label(),
            polynomial = %polynomial,
            "cubic verification"
        );
        verdict
    }

    fn check(&self, value: &Real, polynomial: &Polynomial) -> CubicVerdict {
        let not_cubic = |reason, evidence| CubicVerdict::NotCubic {
            reason,
            polynomial: polynomial.clone(),
            evidence,
        };

        let found_degree = degree(polynomial.coefficients());
        if found_degree != 3 {
            return not_cubic(NotCubicReason::DegreeMismatch { degree: found_degree }, None);
        }
        let cubic = significant_part(polynomial);
        if let Some(factor) = find_factor(&cubic) {
            return not_cubic(NotCubicReason::Reducible { factor }, None);
        }

        let Some(companion) = CompanionMatrix::<Real>::new(&cubic, self.precision) else {
            return not_cubic(NotCubicReason::DegreeMismatch { degree: 0 }, None);
        };
        let traces = companion.traces(MAX_TRACE_POWER);
        let checks = companion.verify_recurrence(&traces, &self.tolerance);
        let residual = cubic.eval(value).abs();
        let is_root = residual <= self.tolerance;
        let evidence = CubicEvidence {
            polynomial: cubic,
            traces,
            checks,
            residual,
            is_root,
        };

        let failed: Vec<usize> = evidence
            .checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.power)
            .collect();
        if !failed.is_empty() {
            return not_cubic(NotCubicReason::RecurrenceFailed { powers: failed }, Some(evidence));
        }
        if !evidence.is_root {
            return not_cubic(NotCubicReason::NotARoot, Some(evidence));
        }
        CubicVerdict::CubicIrrational { evidence }
    }
}

/// Verify that `value` is a cubic irrational, using `polynomial` when given
/// and the default finder otherwise.
///
/// # Errors
///
/// Returns an error only for an invalid configuration.
pub fn verify_cubic(
    value: &Real,
    polynomial: Option<&Polynomial>,
    config: &HermiteConfig,
) -> Result<CubicVerdict, HermiteError> {
    Ok(CubicVerifier::new(config)?.verify(value, polynomial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_rational::BigRational;

    fn poly(c: &[i64]) -> Polynomial {
        Polynomial::from_integers(c.iter().copied()).unwrap()
    }

    fn cbrt2() -> Real {
        Real::from_integer(2, Precision::DEFAULT).cbrt()
    }

    #[test]
    fn cube_root_of_two_with_supplied_polynomial() {
        let verdict = verify_cubic(&cbrt2(), Some(&poly(&[1, 0, 0, -2])), &HermiteConfig::default())
            .unwrap();
        let CubicVerdict::CubicIrrational { evidence } = verdict else {
            panic!("expected a cubic verdict, got {verdict:?}");
        };
        assert!(evidence.is_root);
        assert!(evidence.recurrence_holds());
        assert_eq!(evidence.checks.len(), 3);
        assert_eq!(evidence.traces.values().len(), 6);
    }

    #[test]
    fn discovered_polynomial() {
        let verdict = verify_cubic(&cbrt2(), None, &HermiteConfig::default()).unwrap();
        assert!(verdict.is_cubic());
        assert_eq!(verdict.polynomial(), Some(&poly(&[1, 0, 0, -2])));
    }

    #[test]
    fn reducible_is_rejected_even_for_a_root() {
        let one = Real::one(Precision::DEFAULT);
        let verdict =
            verify_cubic(&one, Some(&poly(&[1, 0, 0, -1])), &HermiteConfig::default()).unwrap();
        match verdict {
            CubicVerdict::NotCubic {
                reason: NotCubicReason::Reducible { factor },
                evidence: None,
                ..
            } => assert_eq!(factor, Polynomial::linear(BigRational::from_integer(1.into()))),
            other => panic!("expected a reducibility rejection, got {other:?}"),
        }
    }

    #[test]
    fn wrong_degree() {
        let root = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
        let verdict = verify_cubic(&root, Some(&poly(&[1, 0, -2])), &HermiteConfig::default())
            .unwrap();
        assert!(matches!(
            verdict,
            CubicVerdict::NotCubic {
                reason: NotCubicReason::DegreeMismatch { degree: 2 },
                ..
            }
        ));
    }

    #[test]
    fn leading_zeros_are_ignored() {
        let verdict = verify_cubic(
            &cbrt2(),
            Some(&poly(&[0, 0, 1, 0, 0, -2])),
            &HermiteConfig::default(),
        )
        .unwrap();
        assert!(verdict.is_cubic());
    }

    #[test]
    fn non_root_keeps_partial_evidence() {
        let verdict = verify_cubic(&cbrt2(), Some(&poly(&[1, 0, 0, -3])), &HermiteConfig::default())
            .unwrap();
        let CubicVerdict::NotCubic {
            reason: NotCubicReason::NotARoot,
            evidence: Some(evidence),
            ..
        } = verdict
        else {
            panic!("expected a non-root rejection");
        };
        assert!(evidence.recurrence_holds());
        assert!(!evidence.is_root);
    }

    #[test]
    fn quadratic_discovery_is_not_cubic() {
        let root = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
        let verdict = verify_cubic(&root, None, &HermiteConfig::default()).unwrap();
        assert_eq!(verdict.label(), "not_cubic");
        assert_eq!(verdict.polynomial(), Some(&poly(&[1, 0, -2])));
    }

    #[test]
    fn missing_polynomial_is_inconclusive() {
        let nothing = |_: &Real, _: usize, _: &Real| -> Option<Polynomial> { None };
        let verifier = CubicVerifier::with_finder(&HermiteConfig::default(), nothing).unwrap();
        let verdict = verifier.verify(&cbrt2(), None);
        assert_eq!(
            verdict,
            CubicVerdict::Inconclusive {
                reason: InconclusiveReason::NoPolynomialFound
            }
        );
        assert!(verdict.evidence().is_none());
    }
}
