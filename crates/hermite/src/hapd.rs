//! Projective-triple periodicity detection.
//!
//! A real `α` is lifted to the projective point `(α, α², 1)` and advanced by
//! a unimodular floor step, the three-dimensional analogue of the
//! continued-fraction step:
//!
//! ```text
//! a₁ = ⌊v₁/v₃⌋   a₂ = ⌊v₂/v₃⌋
//! (v₁, v₂, v₃)  ↦  (v₁ - a₁v₃,  v₂ - a₂v₃,  v₃ - a₁r₁ - a₂r₂)
//! ```
//!
//! Each step emits a [`DigitPair`] `(a₁, a₂)`. After every step the new
//! point is normalized and compared against every earlier point; a match
//! at history index `j` after step `i` proposes the period `i - j + 1`.
//!
//! # Outcomes
//!
//! | Status | Meaning |
//! |--------|---------|
//! | [`Periodic`](PeriodicityStatus::Periodic) | a period was confirmed `min_confirmations` times and the digits repeat over two cycles |
//! | [`Terminated`](PeriodicityStatus::Terminated) | rational: pre-filter hit or `v₃` vanished |
//! | [`Collapsed`](PeriodicityStatus::Collapsed) | `r₁` or `r₂` vanished: `1, α, α²` are linearly dependent over ℚ |
//! | [`PotentiallyPeriodic`](PeriodicityStatus::PotentiallyPeriodic) | cap reached, some period seen at least twice |
//! | [`NoPeriodicity`](PeriodicityStatus::NoPeriodicity) | cap reached, nothing recurring |
//!
//! Because the step is unimodular, `r₁` or `r₂` can only reach zero when
//! `α` satisfies a rational relation of degree at most two, so quadratic
//! irrationals end in `Collapsed` rather than a false `Periodic`.
//!
//! # Numerics
//!
//! All arithmetic happens at the configured [`Precision`]. Quotients within
//! the precision's noise floor of an integer snap to that integer before
//! flooring, so representation error in `α` (e.g. `√2·√2 = 1.99…9`) cannot
//! flip a digit.
//!
//! # Examples
//!
//! ```
//! use hermite::config::HermiteConfig;
//! use hermite::hapd::{run_periodicity, PeriodicityStatus};
//! use hermite::real::{Precision, Real};
//!
//! let config = HermiteConfig::default();
//! let cbrt2 = Real::from_integer(2, Precision::DEFAULT).cbrt();
//! let report = run_periodicity(&cbrt2, &config).unwrap();
//! assert!(matches!(report.status, PeriodicityStatus::Periodic { .. }));
//!
//! let third = Real::from_ratio(1, 3, Precision::DEFAULT).unwrap();
//! let report = run_periodicity(&third, &config).unwrap();
//! assert!(report.status.is_terminated());
//! ```

use core::fmt;
use std::collections::BTreeMap;

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::ToPrimitive;

use crate::config::HermiteConfig;
use crate::continued_fraction::{reliable_continued_fraction, small_denominator_rational};
use crate::error::HermiteError;
use crate::real::{Precision, Real};

/// Equivalence matches kept on a report for diagnostics.
pub const RECORDED_MATCHES: usize = 16;

/// Largest `|aᵢ|` that [`DigitPair::encode`] accepts.
pub const MAX_ENCODED_DIGIT: usize = 1 << 16;

/// A point `(v₁ : v₂ : v₃)` of the projective plane.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProjectiveTriple {
    /// First coordinate.
    pub v1: Real,
    /// Second coordinate.
    pub v2: Real,
    /// Third coordinate.
    pub v3: Real,
}

impl ProjectiveTriple {
    /// Create a triple.
    #[must_use]
    pub fn new(v1: Real, v2: Real, v3: Real) -> Self {
        Self { v1, v2, v3 }
    }

    /// The starting point `(α, α², 1)`.
    #[must_use]
    pub fn initial(alpha: &Real) -> Self {
        Self {
            v1: alpha.clone(),
            v2: alpha * alpha,
            v3: Real::one(alpha.precision()),
        }
    }

    /// Coordinates in order.
    #[must_use]
    pub fn components(&self) -> [&Real; 3] {
        [&self.v1, &self.v2, &self.v3]
    }

    /// Euclidean norm.
    #[must_use]
    pub fn norm(&self) -> Real {
        let squares = &(&(&self.v1 * &self.v1) + &(&self.v2 * &self.v2)) + &(&self.v3 * &self.v3);
        squares
            .sqrt()
            .unwrap_or_else(|| Real::zero(self.v1.precision()))
    }

    /// The representative of unit Euclidean norm, or `None` for the zero
    /// vector.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        let norm = self.norm();
        Some(Self {
            v1: self.v1.checked_div(&norm)?,
            v2: self.v2.checked_div(&norm)?,
            v3: self.v3.checked_div(&norm)?,
        })
    }

    /// Projective equivalence within `tolerance`.
    ///
    /// Components below `tolerance` in both triples are skipped; a component
    /// below it in only one triple makes them inequivalent. The remaining
    /// componentwise ratios must agree to a relative `tolerance`.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self, tolerance: &Real) -> bool {
        let mut ratios = Vec::with_capacity(3);
        for (a, b) in self.components().into_iter().zip(other.components()) {
            match (a.abs() < *tolerance, b.abs() < *tolerance) {
                (true, true) => continue,
                (false, false) => {}
                _ => return false,
            }
            match a.checked_div(b) {
                Some(ratio) => ratios.push(ratio),
                None => return false,
            }
        }
        let Some((first, rest)) = ratios.split_first() else {
            return false;
        };
        let bound = tolerance * &first.abs();
        rest.iter().all(|r| (r - first).abs() <= bound)
    }

    /// Which of `v₁` (1) or `v₂` (2) has fallen below `tolerance`, if any.
    #[must_use]
    pub fn vanishing_component(&self, tolerance: &Real) -> Option<u8> {
        if self.v1.abs() < *tolerance {
            Some(1)
        } else if self.v2.abs() < *tolerance {
            Some(2)
        } else {
            None
        }
    }
}

/// The floor quotients `(a₁, a₂)` of one step.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DigitPair {
    /// `⌊v₁/v₃⌋`.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_support::big_int"))]
    pub a1: BigInt,
    /// `⌊v₂/v₃⌋`.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_support::big_int"))]
    pub a2: BigInt,
}

impl DigitPair {
    /// Create a pair from anything integer-like.
    #[must_use]
    pub fn new(a1: impl Into<BigInt>, a2: impl Into<BigInt>) -> Self {
        Self {
            a1: a1.into(),
            a2: a2.into(),
        }
    }

    /// The pair as one natural number,
    /// `2^|a₁| · 3^|a₂| · 5^s(a₁) · 7^s(a₂)` with `s` = 0, 1, 2 for
    /// negative, zero, positive.
    ///
    /// Distinct pairs encode to distinct numbers. Returns `None` when a
    /// digit exceeds [`MAX_ENCODED_DIGIT`] in magnitude.
    #[must_use]
    pub fn encode(&self) -> Option<BigUint> {
        let exponent = |a: &BigInt| {
            a.magnitude()
                .to_usize()
                .filter(|&e| e <= MAX_ENCODED_DIGIT)
        };
        let sign = |a: &BigInt| -> usize {
            match a.sign() {
                Sign::Minus => 0,
                Sign::NoSign => 1,
                Sign::Plus => 2,
            }
        };
        let power = |base: u32, e: usize| num_traits::pow(BigUint::from(base), e);
        Some(
            power(2, exponent(&self.a1)?)
                * power(3, exponent(&self.a2)?)
                * power(5, sign(&self.a1))
                * power(7, sign(&self.a2)),
        )
    }
}

impl fmt::Display for DigitPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a1, self.a2)
    }
}

/// A period length and how often it has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PeriodCandidate {
    /// Proposed period length.
    pub period: usize,
    /// Independent equivalence matches proposing this length.
    pub confirmations: usize,
}

/// One equivalence between the point after step `iteration` and the
/// recorded point `earlier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EquivalenceMatch {
    /// Step that produced the new point.
    pub iteration: usize,
    /// History index of the equivalent point.
    pub earlier: usize,
    /// `iteration - earlier + 1`.
    pub period: usize,
}

/// Why the iteration stopped with a rational signature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TerminationReason {
    /// Within tolerance of `p/q` with a small `q`.
    SmallDenominator {
        /// The rational found.
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_support::rational"))]
        rational: BigRational,
    },
    /// The continued-fraction pre-filter terminated.
    ContinuedFraction {
        /// Its partial quotients.
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_support::big_ints"))]
        terms: Vec<BigInt>,
    },
    /// `v₃` fell below tolerance after this step.
    VanishingThirdComponent {
        /// Step index.
        step: usize,
    },
}

/// Verdict of the periodicity iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", rename_all = "snake_case"))]
pub enum PeriodicityStatus {
    /// Confirmed period.
    Periodic {
        /// Index of the first point of the cycle.
        preperiod: usize,
        /// Cycle length.
        period: usize,
        /// Matches that confirmed the period.
        confirmations: usize,
    },
    /// Rational signature.
    Terminated {
        /// What ended the iteration.
        reason: TerminationReason,
    },
    /// A remainder vanished at `step`: the value is rational or quadratic.
    Collapsed {
        /// Step index.
        step: usize,
        /// 1 for `r₁`, 2 for `r₂`.
        component: u8,
    },
    /// Cap reached with candidates seen at least twice.
    PotentiallyPeriodic {
        /// All candidates with two or more confirmations.
        candidates: Vec<PeriodCandidate>,
    },
    /// Cap reached without any recurring period.
    NoPeriodicity,
}

impl PeriodicityStatus {
    /// True for a confirmed period.
    #[must_use]
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Periodic { .. })
    }

    /// True for a rational signature.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }

    /// `(preperiod, period)` of a confirmed period.
    #[must_use]
    pub fn period(&self) -> Option<(usize, usize)> {
        match self {
            Self::Periodic {
                preperiod, period, ..
            } => Some((*preperiod, *period)),
            _ => None,
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Periodic { .. } => "periodic",
            Self::Terminated { .. } => "terminated",
            Self::Collapsed { .. } => "collapsed",
            Self::PotentiallyPeriodic { .. } => "potentially_periodic",
            Self::NoPeriodicity => "no_periodicity",
        }
    }
}

/// Status plus the trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PeriodicityReport {
    /// Verdict.
    pub status: PeriodicityStatus,
    /// One pair per completed step.
    pub digit_pairs: Vec<DigitPair>,
    /// The point at the start of every step.
    pub triples: Vec<ProjectiveTriple>,
    /// The first equivalence matches, for diagnostics.
    pub matches: Vec<EquivalenceMatch>,
}

impl PeriodicityReport {
    fn stopped(status: PeriodicityStatus) -> Self {
        Self {
            status,
            digit_pairs: Vec::new(),
            triples: Vec::new(),
            matches: Vec::new(),
        }
    }

    /// Steps performed.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.digit_pairs.len()
    }

    /// [`DigitPair::encode`] over the digit stream; a period in the pairs
    /// is the same period in this sequence.
    #[must_use]
    pub fn encoded_sequence(&self) -> Option<Vec<BigUint>> {
        self.digit_pairs.iter().map(DigitPair::encode).collect()
    }
}

/// A confirmed period waiting for its second digit cycle.
#[derive(Debug, Clone, Copy)]
struct Pending {
    preperiod: usize,
    period: usize,
    confirmations: usize,
}

impl Pending {
    fn into_status(self) -> PeriodicityStatus {
        PeriodicityStatus::Periodic {
            preperiod: self.preperiod,
            period: self.period,
            confirmations: self.confirmations,
        }
    }
}

/// The periodicity iteration, configured once and reusable.
#[derive(Debug, Clone)]
pub struct ProjectiveTripleIterator {
    precision: Precision,
    tolerance: Real,
    noise_floor: Real,
    max_iterations: usize,
    min_confirmations: usize,
    max_denominator: u64,
}

impl ProjectiveTripleIterator {
    /// Prepare an iteration from `config`.
    ///
    /// # Errors
    ///
    /// Returns the validation error of an invalid configuration.
    pub fn new(config: &HermiteConfig) -> Result<Self, HermiteError> {
        config.validate()?;
        let precision = config.working_precision()?;
        Ok(Self {
            precision,
            tolerance: config.tolerance_at(precision)?,
            noise_floor: precision.noise_floor(),
            max_iterations: config.max_iterations,
            min_confirmations: config.min_confirmations,
            max_denominator: config.max_denominator,
        })
    }

    /// Working precision.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Rational fast paths: a small-denominator fraction, then a
    /// continued fraction that terminates before its partial quotients
    /// sink below the precision's noise.
    #[must_use]
    pub fn prefilter(&self, alpha: &Real) -> Option<TerminationReason> {
        if let Some(rational) =
            small_denominator_rational(alpha, self.max_denominator, &self.tolerance)
        {
            return Some(TerminationReason::SmallDenominator { rational });
        }
        let cf = reliable_continued_fraction(alpha, &self.tolerance);
        cf.terminated
            .then(|| TerminationReason::ContinuedFraction { terms: cf.terms })
    }

    /// One floor step, or `None` when `v₃` is exactly zero.
    #[must_use]
    pub fn step(&self, triple: &ProjectiveTriple) -> Option<(DigitPair, ProjectiveTriple)> {
        let a1 = self.snapped_floor(&triple.v1.checked_div(&triple.v3)?);
        let a2 = self.snapped_floor(&triple.v2.checked_div(&triple.v3)?);
        let r1 = &triple.v1 - &triple.v3.mul_integer(&a1);
        let r2 = &triple.v2 - &triple.v3.mul_integer(&a2);
        let v3 = &(&triple.v3 - &r1.mul_integer(&a1)) - &r2.mul_integer(&a2);
        Some((DigitPair { a1, a2 }, ProjectiveTriple::new(r1, r2, v3)))
    }

    fn snapped_floor(&self, quotient: &Real) -> BigInt {
        let nearest = quotient.round();
        let gap = quotient - &Real::from_integer(nearest.clone(), self.precision);
        if gap.abs() < self.noise_floor {
            nearest
        } else {
            quotient.floor()
        }
    }

    /// Run the iteration on `value` (taken at the working precision).
    #[must_use]
    pub fn run(&self, value: &Real) -> PeriodicityReport {
        let alpha = value.with_precision(self.precision);
        if let Some(reason) = self.prefilter(&alpha) {
            tracing::debug!(?reason, "rational pre-filter");
            return PeriodicityReport::stopped(PeriodicityStatus::Terminated { reason });
        }
        self.run_from(&ProjectiveTriple::initial(&alpha))
    }

    /// Run the iteration from an arbitrary starting point, without the
    /// rational pre-filter.
    #[must_use]
    pub fn run_from(&self, start: &ProjectiveTriple) -> PeriodicityReport {
        let mut report = PeriodicityReport::stopped(PeriodicityStatus::NoPeriodicity);
        let mut history: Vec<ProjectiveTriple> = Vec::new();
        let mut candidates: BTreeMap<usize, PeriodCandidate> = BTreeMap::new();
        let mut pending: Option<Pending> = None;
        let mut state = ProjectiveTriple::new(
            start.v1.with_precision(self.precision),
            start.v2.with_precision(self.precision),
            start.v3.with_precision(self.precision),
        );

        for i in 0..self.max_iterations {
            let vanished = PeriodicityStatus::Terminated {
                reason: TerminationReason::VanishingThirdComponent { step: i },
            };
            report.triples.push(state.clone());
            if state.v3.abs() < self.tolerance {
                return self.finish(report, vanished);
            }
            let Some(normalized) = state.normalized() else {
                return self.finish(report, vanished);
            };
            history.push(normalized);

            let Some((pair, next)) = self.step(&state) else {
                return self.finish(report, vanished);
            };
            tracing::trace!(step = i, a1 = %pair.a1, a2 = %pair.a2, "digit pair");
            report.digit_pairs.push(pair);

            if let Some(p) = pending {
                if report.digit_pairs.len() >= p.preperiod + 2 * p.period {
                    if cycles_agree(&report.digit_pairs, p.preperiod, p.period) {
                        return self.finish(report, p.into_status());
                    }
                    pending = None;
                }
            }

            if next.v3.abs() < self.tolerance {
                return self.finish(report, vanished);
            }
            if let Some(component) = next.vanishing_component(&self.tolerance) {
                return self.finish(report, PeriodicityStatus::Collapsed { step: i, component });
            }
            let Some(normalized) = next.normalized() else {
                return self.finish(report, vanished);
            };

            for (j, earlier) in history.iter().enumerate() {
                if !normalized.is_equivalent(earlier, &self.tolerance) {
                    continue;
                }
                let period = i - j + 1;
                if report.matches.len() < RECORDED_MATCHES {
                    report.matches.push(EquivalenceMatch {
                        iteration: i,
                        earlier: j,
                        period,
                    });
                }
                let candidate = candidates.entry(period).or_insert(PeriodCandidate {
                    period,
                    confirmations: 0,
                });
                candidate.confirmations += 1;
                if pending.is_none() && candidate.confirmations >= self.min_confirmations {
                    pending = Some(Pending {
                        preperiod: j,
                        period,
                        confirmations: candidate.confirmations,
                    });
                }
            }
            state = next;
        }

        // cap reached: a confirmed period is judged on the digits available
        if let Some(p) = pending {
            if cycles_agree(&report.digit_pairs, p.preperiod, p.period) {
                return self.finish(report, p.into_status());
            }
        }
        let recurring: Vec<PeriodCandidate> = candidates
            .into_values()
            .filter(|c| c.confirmations >= 2)
            .collect();
        let status = if recurring.is_empty() {
            PeriodicityStatus::NoPeriodicity
        } else {
            PeriodicityStatus::PotentiallyPeriodic {
                candidates: recurring,
            }
        };
        self.finish(report, status)
    }

    fn finish(
        &self,
        mut report: PeriodicityReport,
        status: PeriodicityStatus,
    ) -> PeriodicityReport {
        tracing::debug!(
            status = status.label(),
            iterations = report.iterations(),
            digits = self.precision.digits(),
            "periodicity iteration finished"
        );
        report.status = status;
        report
    }
}

/// Whether the digits from `preperiod` repeat with `period` over every full
/// cycle available (at most two are compared).
fn cycles_agree(pairs: &[DigitPair], preperiod: usize, period: usize) -> bool {
    let Some(cycle) = pairs.get(preperiod..preperiod + period) else {
        return false;
    };
    let tail = &pairs[preperiod + period..];
    let compared = tail.len().min(period);
    tail[..compared] == cycle[..compared]
}

/// Run the periodicity iteration on `value` under `config`.
///
/// # Errors
///
/// Returns an error only for an invalid configuration.
pub fn run_periodicity(
    value: &Real,
    config: &HermiteConfig,
) -> Result<PeriodicityReport, HermiteError> {
    Ok(ProjectiveTripleIterator::new(config)?.run(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HermiteConfig {
        HermiteConfig::default()
    }

    fn at(value: &str) -> Real {
        Real::parse(value, Precision::DEFAULT).unwrap()
    }

    fn tolerance() -> Real {
        at("1e-10")
    }

    #[test]
    fn initial_triple() {
        let t = ProjectiveTriple::initial(&at("1.5"));
        assert_eq!(t.v1, at("1.5"));
        assert_eq!(t.v2, at("2.25"));
        assert_eq!(t.v3, at("1"));
    }

    #[test]
    fn normalization_has_unit_norm() {
        let t = ProjectiveTriple::new(at("3"), at("0"), at("4"));
        let n = t.normalized().unwrap();
        let epsilon = Precision::DEFAULT.epsilon();
        assert!((&n.v1 - &at("0.6")).abs() < epsilon);
        assert!(n.v2.is_zero());
        assert!((&n.v3 - &at("0.8")).abs() < epsilon);
        assert!((&n.norm() - &Real::one(Precision::DEFAULT)).abs() < epsilon);
        let zero = ProjectiveTriple::new(at("0"), at("0"), at("0"));
        assert!(zero.normalized().is_none());
    }

    #[test]
    fn equivalence_up_to_scale_and_sign() {
        let t = ProjectiveTriple::new(at("1"), at("-2"), at("3"));
        let scaled = ProjectiveTriple::new(at("-2.5"), at("5"), at("-7.5"));
        assert!(t.is_equivalent(&scaled, &tolerance()));
        let other = ProjectiveTriple::new(at("1"), at("-2"), at("3.001"));
        assert!(!t.is_equivalent(&other, &tolerance()));
    }

    #[test]
    fn near_zero_components() {
        let tol = tolerance();
        let a = ProjectiveTriple::new(at("1"), at("1e-20"), at("2"));
        let b = ProjectiveTriple::new(at("2"), at("0"), at("4"));
        assert!(a.is_equivalent(&b, &tol));
        let c = ProjectiveTriple::new(at("2"), at("0.5"), at("4"));
        assert!(!a.is_equivalent(&c, &tol));
        assert!(!c.is_equivalent(&a, &tol));
    }

    #[test]
    fn step_matches_hand_computation() {
        // α = 3/2: a1 = 1, a2 = 2; r1 = 1/2, r2 = 1/4; v3' = 1 - 1/2 - 1/2 = 0
        let iterator = ProjectiveTripleIterator::new(&config()).unwrap();
        let (pair, next) = iterator.step(&ProjectiveTriple::initial(&at("1.5"))).unwrap();
        assert_eq!(pair, DigitPair::new(1, 2));
        assert_eq!(next.v1, at("0.5"));
        assert_eq!(next.v2, at("0.25"));
        assert!(next.v3.is_zero());
    }

    #[test]
    fn step_floors_negative_quotients() {
        let iterator = ProjectiveTripleIterator::new(&config()).unwrap();
        let (pair, _) = iterator.step(&ProjectiveTriple::initial(&at("-1.5"))).unwrap();
        assert_eq!(pair, DigitPair::new(-2, 2));
    }

    #[test]
    fn step_refuses_zero_third_component() {
        let iterator = ProjectiveTripleIterator::new(&config()).unwrap();
        let t = ProjectiveTriple::new(at("1"), at("1"), at("0"));
        assert!(iterator.step(&t).is_none());
    }

    #[test]
    fn snapping_absorbs_representation_error() {
        let iterator = ProjectiveTripleIterator::new(&config()).unwrap();
        let root = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
        let square = &root * &root;
        assert!(square < at("2"));
        assert_eq!(iterator.snapped_floor(&square), BigInt::from(2));
        assert_eq!(iterator.snapped_floor(&at("1.9999")), BigInt::from(1));
    }

    #[test]
    fn prefilter_catches_rationals() {
        let iterator = ProjectiveTripleIterator::new(&config()).unwrap();
        assert!(matches!(
            iterator.prefilter(&at("0.75")),
            Some(TerminationReason::SmallDenominator { .. })
        ));
        let large = Real::from_ratio(1, 1009, Precision::DEFAULT).unwrap();
        assert!(matches!(
            iterator.prefilter(&large),
            Some(TerminationReason::ContinuedFraction { .. })
        ));
        assert!(iterator.prefilter(&Real::pi(Precision::DEFAULT)).is_none());
    }

    #[test]
    fn cycle_comparison() {
        let p = |a: i64, b: i64| DigitPair::new(a, b);
        let pairs = vec![p(1, 1), p(2, 3), p(4, 5), p(2, 3), p(4, 5)];
        assert!(cycles_agree(&pairs, 1, 2));
        assert!(!cycles_agree(&pairs, 0, 2));
        assert!(cycles_agree(&pairs, 3, 2));
        assert!(!cycles_agree(&pairs, 4, 2));
    }

    #[test]
    fn status_accessors() {
        let periodic = PeriodicityStatus::Periodic {
            preperiod: 2,
            period: 1,
            confirmations: 3,
        };
        assert!(periodic.is_periodic());
        assert_eq!(periodic.period(), Some((2, 1)));
        assert_eq!(periodic.label(), "periodic");
        assert_eq!(PeriodicityStatus::NoPeriodicity.period(), None);
        assert_eq!(PeriodicityStatus::NoPeriodicity.label(), "no_periodicity");
    }

    #[test]
    fn invalid_config_is_an_error() {
        let bad = config().with_min_confirmations(0);
        assert!(run_periodicity(&at("2"), &bad).is_err());
    }

    #[test]
    fn vanishing_third_component_terminates_the_loop() {
        // 3/2 clears v3 in one step
        let iterator = ProjectiveTripleIterator::new(&config()).unwrap();
        let report = iterator.run_from(&ProjectiveTriple::initial(&at("1.5")));
        assert_eq!(
            report.status,
            PeriodicityStatus::Terminated {
                reason: TerminationReason::VanishingThirdComponent { step: 0 }
            }
        );
        assert_eq!(report.digit_pairs, vec![DigitPair::new(1, 2)]);

        for v3 in ["0", "1e-30", "-1e-12"] {
            let start = ProjectiveTriple::new(at("1"), at("2"), at(v3));
            let report = iterator.run_from(&start);
            assert_eq!(
                report.status,
                PeriodicityStatus::Terminated {
                    reason: TerminationReason::VanishingThirdComponent { step: 0 }
                },
                "v3 = {v3}"
            );
            assert_eq!(report.iterations(), 0);
        }
    }

    #[test]
    fn digit_encoding() {
        assert_eq!(DigitPair::new(0, 0).encode(), Some(BigUint::from(35u32)));
        assert_eq!(DigitPair::new(1, -1).encode(), Some(BigUint::from(150u32)));
        assert_eq!(DigitPair::new(-1, 2).encode(), Some(BigUint::from(882u32)));
        let too_large = MAX_ENCODED_DIGIT as i64 + 1;
        assert_eq!(DigitPair::new(too_large, 0).encode(), None);

        let mut seen = std::collections::HashSet::new();
        for a1 in -6i64..=6 {
            for a2 in -6i64..=6 {
                let code = DigitPair::new(a1, a2).encode().unwrap();
                assert!(seen.insert(code), "({a1}, {a2}) collides");
            }
        }
    }
}
