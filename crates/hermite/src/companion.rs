//! Companion matrices and their power traces.
//!
//! For a monic polynomial `xⁿ + a₁xⁿ⁻¹ + … + aₙ` the companion matrix `C`
//! has ones on the subdiagonal and `-aₙ, …, -a₁` down its last column, so
//! its characteristic polynomial is the polynomial itself. By Newton's
//! identities the power traces `pₖ = Tr(Cᵏ)` then obey
//!
//! ```text
//! pₖ = -a₁·pₖ₋₁ - a₂·pₖ₋₂ - … - aₙ·pₖ₋ₙ     (k ≥ n)
//! ```
//!
//! The matrix code is generic over [`Scalar`], implemented for exact
//! [`BigRational`] (the recurrence holds with zero error) and for
//! high-precision [`Real`] (it holds within rounding).
//!
//! # Examples
//!
//! ```
//! use hermite::companion::CompanionMatrix;
//! use hermite::polynomial::Polynomial;
//! use num_rational::BigRational;
//!
//! let p = Polynomial::from_integers([1, 0, 0, -2]).unwrap();
//! let c = CompanionMatrix::<BigRational>::new(&p, ()).unwrap();
//! let traces = c.traces(5);
//! // power sums of the three cube roots of 2
//! let expected: Vec<BigRational> =
//!     [3, 0, 0, 6, 0, 0].iter().map(|&t| BigRational::from_integer(t.into())).collect();
//! assert_eq!(traces.values(), expected.as_slice());
//! ```

use core::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::polynomial::Polynomial;
use crate::real::{Precision, Real};

/// Highest power whose trace the verifier inspects.
pub const MAX_TRACE_POWER: usize = 5;

/// Arithmetic needed by the matrix code.
pub trait Scalar: Clone + fmt::Debug {
    /// What a conversion from an exact rational needs (e.g. a precision).
    type Context: Copy;

    /// Convert an exact rational.
    fn from_rational(value: &BigRational, context: Self::Context) -> Self;

    /// Zero in the same context as `self`.
    #[must_use]
    fn zero_like(&self) -> Self;

    /// `self + rhs`.
    #[must_use]
    fn plus(&self, rhs: &Self) -> Self;

    /// `self - rhs`.
    #[must_use]
    fn minus(&self, rhs: &Self) -> Self;

    /// `self · rhs`.
    #[must_use]
    fn times(&self, rhs: &Self) -> Self;

    /// `|self|` as a high-precision real, for tolerance comparisons.
    fn magnitude(&self, precision: Precision) -> Real;
}

impl Scalar for BigRational {
    type Context = ();

    fn from_rational(value: &BigRational, _context: ()) -> Self {
        value.clone()
    }

    fn zero_like(&self) -> Self {
        Self::zero()
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn magnitude(&self, precision: Precision) -> Real {
        Real::from_rational(&self.abs(), precision)
    }
}

impl Scalar for Real {
    type Context = Precision;

    fn from_rational(value: &BigRational, precision: Precision) -> Self {
        Real::from_rational(value, precision)
    }

    fn zero_like(&self) -> Self {
        Real::zero(self.precision())
    }

    fn plus(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn minus(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn times(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn magnitude(&self, precision: Precision) -> Real {
        self.abs().with_precision(precision)
    }
}

/// Dense square matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
struct SquareMatrix<T> {
    dimension: usize,
    entries: Vec<T>,
}

impl<T: Scalar> SquareMatrix<T> {
    fn at(&self, row: usize, col: usize) -> &T {
        &self.entries[row * self.dimension + col]
    }

    fn multiply(&self, rhs: &Self) -> Self {
        let n = self.dimension;
        let mut entries = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let cell = (0..n).fold(self.at(0, 0).zero_like(), |acc, k| {
                    acc.plus(&self.at(i, k).times(rhs.at(k, j)))
                });
                entries.push(cell);
            }
        }
        Self {
            dimension: n,
            entries,
        }
    }

    fn trace(&self) -> T {
        (0..self.dimension).fold(self.at(0, 0).zero_like(), |acc, i| acc.plus(self.at(i, i)))
    }
}

/// Companion matrix of a monic-normalized polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanionMatrix<T> {
    matrix: SquareMatrix<T>,
    /// `a₁ … aₙ` of the monic normalization.
    tail: Vec<T>,
    dimension_scalar: T,
}

impl<T: Scalar> CompanionMatrix<T> {
    /// Build the companion matrix of `polynomial`'s monic normalization.
    ///
    /// Returns `None` for constant polynomials (including zero), which
    /// have no companion matrix.
    #[must_use]
    pub fn new(polynomial: &Polynomial, context: T::Context) -> Option<Self> {
        let monic = polynomial.monic()?;
        let normalized = monic.coefficients();
        let n = normalized.len() - 1;
        if n == 0 {
            return None;
        }
        let zero = T::from_rational(&BigRational::zero(), context);
        let one = T::from_rational(&BigRational::one(), context);
        let mut entries = vec![zero; n * n];
        for i in 1..n {
            entries[i * n + (i - 1)] = one.clone();
        }
        for i in 0..n {
            entries[i * n + (n - 1)] = T::from_rational(&-&normalized[n - i], context);
        }
        let tail = normalized[1..]
            .iter()
            .map(|c| T::from_rational(c, context))
            .collect();
        let dimension_scalar =
            T::from_rational(&BigRational::from_integer(BigInt::from(n)), context);
        Some(Self {
            matrix: SquareMatrix {
                dimension: n,
                entries,
            },
            tail,
            dimension_scalar,
        })
    }

    /// Matrix dimension, equal to the polynomial's degree.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.matrix.dimension
    }

    /// Entry at `(row, col)`, or `None` outside the matrix.
    #[must_use]
    pub fn entry(&self, row: usize, col: usize) -> Option<&T> {
        let n = self.dimension();
        (row < n && col < n).then(|| self.matrix.at(row, col))
    }

    /// One row of the matrix, or `None` outside the matrix.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[T]> {
        let n = self.dimension();
        self.matrix.entries.get(row * n..(row + 1) * n)
    }

    /// Coefficients `a₁ … aₙ` following the leading 1.
    #[must_use]
    pub fn monic_tail(&self) -> &[T] {
        &self.tail
    }

    /// `Tr(Cᵏ)` for `k = 0..=max_power`.
    ///
    /// `Tr(C⁰)` is the dimension. A 2×2 matrix uses the Cayley–Hamilton
    /// shortcut `pₖ = t·pₖ₋₁ - d·pₖ₋₂` from its own trace and determinant;
    /// larger matrices use repeated multiplication.
    #[must_use]
    pub fn traces(&self, max_power: usize) -> TraceSequence<T> {
        let mut values = vec![self.dimension_scalar.clone()];
        if max_power == 0 {
            return TraceSequence { values };
        }
        values.push(self.matrix.trace());

        if self.dimension() == 2 {
            let m = &self.matrix;
            let trace = m.trace();
            let determinant = m.at(0, 0).times(m.at(1, 1)).minus(&m.at(0, 1).times(m.at(1, 0)));
            for k in 2..=max_power {
                let next = trace
                    .times(&values[k - 1])
                    .minus(&determinant.times(&values[k - 2]));
                values.push(next);
            }
            return TraceSequence { values };
        }

        let mut power = self.matrix.clone();
        for _ in 2..=max_power {
            power = power.multiply(&self.matrix);
            values.push(power.trace());
        }
        TraceSequence { values }
    }

    /// Check `pₖ = -a₁·pₖ₋₁ - … - aₙ·pₖ₋ₙ` for every `k` from the
    /// dimension up to the last computed trace.
    ///
    /// Each check passes when the absolute error is at most `tolerance`.
    #[must_use]
    pub fn verify_recurrence(
        &self,
        traces: &TraceSequence<T>,
        tolerance: &Real,
    ) -> Vec<RecurrenceCheck<T>> {
        let n = self.dimension();
        let precision = tolerance.precision();
        (n..traces.values.len())
            .map(|k| {
                let predicted = self
                    .tail
                    .iter()
                    .enumerate()
                    .fold(traces.values[0].zero_like(), |acc, (i, a)| {
                        acc.minus(&a.times(&traces.values[k - 1 - i]))
                    });
                let actual = traces.values[k].clone();
                let error = actual.minus(&predicted).magnitude(precision);
                let passed = error <= *tolerance;
                RecurrenceCheck {
                    power: k,
                    actual,
                    predicted,
                    error,
                    passed,
                }
            })
            .collect()
    }
}

/// `Tr(Cᵏ)` for consecutive powers starting at `k = 0`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TraceSequence<T> {
    values: Vec<T>,
}

impl<T> TraceSequence<T> {
    /// The traces, indexed by power.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// `Tr(Cᵏ)`, if computed.
    #[must_use]
    pub fn get(&self, power: usize) -> Option<&T> {
        self.values.get(power)
    }
}

/// Outcome of one trace-recurrence check.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecurrenceCheck<T> {
    /// The power `k`.
    pub power: usize,
    /// `Tr(Cᵏ)` as computed from the matrix power.
    pub actual: T,
    /// `Tr(Cᵏ)` as predicted from earlier traces.
    pub predicted: T,
    /// `|actual - predicted|`.
    pub error: Real,
    /// Whether the error is within tolerance.
    pub passed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(c: &[i64]) -> Polynomial {
        Polynomial::from_integers(c.iter().copied()).unwrap()
    }

    fn int(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    #[test]
    fn companion_layout() {
        // x^3 + 2x^2 - 5x + 7
        let c = CompanionMatrix::<BigRational>::new(&poly(&[1, 2, -5, 7]), ()).unwrap();
        assert_eq!(c.dimension(), 3);
        assert_eq!(c.row(0), Some(&[int(0), int(0), int(-7)][..]));
        assert_eq!(c.row(1), Some(&[int(1), int(0), int(5)][..]));
        assert_eq!(c.row(2), Some(&[int(0), int(1), int(-2)][..]));
        assert_eq!(c.row(3), None);
        assert_eq!(c.monic_tail(), &[int(2), int(-5), int(7)]);
    }

    #[test]
    fn non_monic_input_is_normalized() {
        let c = CompanionMatrix::<BigRational>::new(&poly(&[2, 0, 0, -4]), ()).unwrap();
        assert_eq!(c.entry(0, 2), Some(&int(2)));
        assert_eq!(c.entry(3, 0), None);
        assert_eq!(c.traces(3).get(3), Some(&int(6)));
    }

    #[test]
    fn constants_have_no_companion() {
        assert!(CompanionMatrix::<BigRational>::new(&poly(&[5]), ()).is_none());
        assert!(CompanionMatrix::<BigRational>::new(&poly(&[0, 0]), ()).is_none());
    }

    #[test]
    fn exact_recurrence_has_zero_error() {
        let c = CompanionMatrix::<BigRational>::new(&poly(&[1, -3, 3, -3]), ()).unwrap();
        let traces = c.traces(MAX_TRACE_POWER);
        assert_eq!(traces.values().len(), 6);
        let tolerance = Real::zero(Precision::DEFAULT);
        let checks = c.verify_recurrence(&traces, &tolerance);
        assert_eq!(checks.iter().map(|c| c.power).collect::<Vec<_>>(), vec![3, 4, 5]);
        assert!(checks.iter().all(|c| c.passed && c.error.is_zero()));
    }

    #[test]
    fn two_by_two_shortcut_matches_multiplication() {
        // x^2 - x - 1: traces are Lucas numbers
        let c = CompanionMatrix::<BigRational>::new(&poly(&[1, -1, -1]), ()).unwrap();
        let lucas: Vec<BigRational> = [2, 1, 3, 4, 7, 11].iter().map(|&n| int(n)).collect();
        assert_eq!(c.traces(5).values(), lucas.as_slice());
    }

    #[test]
    fn high_precision_traces_agree_with_exact() {
        let p = poly(&[1, 4, -1, 9]);
        let exact = CompanionMatrix::<BigRational>::new(&p, ()).unwrap().traces(5);
        let approx = CompanionMatrix::<Real>::new(&p, Precision::DEFAULT)
            .unwrap()
            .traces(5);
        for (e, a) in exact.values().iter().zip(approx.values()) {
            assert_eq!(Real::from_rational(e, Precision::DEFAULT), *a);
        }
    }

    #[test]
    fn broken_traces_fail_the_check() {
        let c = CompanionMatrix::<BigRational>::new(&poly(&[1, 0, 0, -2]), ()).unwrap();
        let mut traces = c.traces(5);
        traces.values[4] = int(1);
        let tolerance = Real::parse("1e-10", Precision::DEFAULT).unwrap();
        let passed: Vec<bool> = c
            .verify_recurrence(&traces, &tolerance)
            .iter()
            .map(|c| c.passed)
            .collect();
        assert_eq!(passed, vec![true, false, true]);
    }
}
