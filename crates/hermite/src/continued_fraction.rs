//! Simple continued fractions.
//!
//! Used by the rational pre-filter of the projective-triple iteration and
//! exposed on its own for diagnostics.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::real::Real;

/// Leading terms of a continued-fraction expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContinuedFraction {
    /// `[a₀; a₁, a₂, …]`.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::serde_support::big_ints"))]
    pub terms: Vec<BigInt>,
    /// True when the remainder vanished (within tolerance) before the term
    /// budget ran out, i.e. the value is rational to working precision.
    pub terminated: bool,
}

impl ContinuedFraction {
    /// The rational value of the collected terms.
    #[must_use]
    pub fn value(&self) -> Option<BigRational> {
        evaluate(&self.terms)
    }
}

/// Expand `value` into at most `max_terms` partial quotients.
///
/// At each step the current remainder `x` contributes `floor(x)`; when `x`
/// lies within `tolerance` of an integer that integer is the final term and
/// the expansion is marked terminated.
#[must_use]
pub fn continued_fraction(value: &Real, max_terms: usize, tolerance: &Real) -> ContinuedFraction {
    expand(value, max_terms, None, tolerance)
}

/// Expand `value` for as long as its partial quotients are reliable.
///
/// After a convergent with denominator `k` the remainder carries an error
/// of about `ε·k²` (ε the precision's resolution), so the expansion stops
/// unterminated once `k²` exceeds `tolerance / ε`. Any rational whose
/// denominator stays below that bound terminates, however many terms it
/// needs.
#[must_use]
pub fn reliable_continued_fraction(value: &Real, tolerance: &Real) -> ContinuedFraction {
    let precision = value.precision();
    let max_denominator = tolerance
        .checked_div(&precision.epsilon())
        .and_then(|ratio| ratio.sqrt())
        .map_or_else(BigInt::one, |bound| bound.floor());
    let max_terms = usize::try_from(precision.bits()).unwrap_or(usize::MAX);
    expand(value, max_terms, Some(&max_denominator), tolerance)
}

fn expand(
    value: &Real,
    max_terms: usize,
    max_denominator: Option<&BigInt>,
    tolerance: &Real,
) -> ContinuedFraction {
    let precision = value.precision();
    let one = Real::one(precision);
    let mut x = value.clone();
    let mut terms = Vec::new();
    let mut terminated = false;
    let (mut k_prev, mut k) = (BigInt::one(), BigInt::zero());
    while terms.len() < max_terms {
        let nearest = x.round();
        if (&x - &Real::from_integer(nearest.clone(), precision)).abs() < *tolerance {
            terms.push(nearest);
            terminated = true;
            break;
        }
        let term = x.floor();
        let fraction = &x - &Real::from_integer(term.clone(), precision);
        let k_next = &term * &k + &k_prev;
        k_prev = core::mem::replace(&mut k, k_next);
        terms.push(term);
        if max_denominator.is_some_and(|limit| k.abs() > *limit) {
            break;
        }
        match one.checked_div(&fraction) {
            Some(next) => x = next,
            None => {
                terminated = true;
                break;
            }
        }
    }
    tracing::trace!(terms = terms.len(), terminated, "continued fraction");
    ContinuedFraction { terms, terminated }
}

/// The rational `[a₀; a₁, …, aₙ]`.
///
/// Returns `None` for an empty list or when an intermediate value is zero.
#[must_use]
pub fn evaluate(terms: &[BigInt]) -> Option<BigRational> {
    let (last, rest) = terms.split_last()?;
    let mut acc = BigRational::from_integer(last.clone());
    for term in rest.iter().rev() {
        if acc.is_zero() {
            return None;
        }
        acc = BigRational::from_integer(term.clone()) + acc.recip();
    }
    Some(acc)
}

/// Successive convergents `hₙ/kₙ`.
///
/// Convergents with a zero denominator (possible only with non-positive
/// partial quotients) are skipped.
#[must_use]
pub fn convergents(terms: &[BigInt]) -> Vec<BigRational> {
    let (mut h_prev, mut h) = (BigInt::zero(), BigInt::one());
    let (mut k_prev, mut k) = (BigInt::one(), BigInt::zero());
    let mut out = Vec::with_capacity(terms.len());
    for a in terms {
        let h_next = a * &h + &h_prev;
        let k_next = a * &k + &k_prev;
        h_prev = core::mem::replace(&mut h, h_next);
        k_prev = core::mem::replace(&mut k, k_next);
        if !k.is_zero() {
            out.push(BigRational::new(h.clone(), k.clone()));
        }
    }
    out
}

/// The first `p/q` with `1 ≤ q ≤ max_denominator` and `|value - p/q| <
/// tolerance`, in order of increasing `q`.
#[must_use]
pub fn small_denominator_rational(
    value: &Real,
    max_denominator: u64,
    tolerance: &Real,
) -> Option<BigRational> {
    let precision = value.precision();
    (1..=max_denominator).find_map(|q| {
        let q = BigInt::from(q);
        let p = value.mul_integer(&q).round();
        let candidate = Real::from_ratio(p.clone(), q.clone(), precision)?;
        ((value - &candidate).abs() < *tolerance).then(|| BigRational::new(p, q))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::real::Precision;

    fn ints(v: &[i64]) -> Vec<BigInt> {
        v.iter().map(|&n| BigInt::from(n)).collect()
    }

    fn tolerance() -> Real {
        Real::parse("1e-10", Precision::DEFAULT).unwrap()
    }

    #[test]
    fn rational_expansion_terminates() {
        let x = Real::from_ratio(355, 113, Precision::DEFAULT).unwrap();
        let cf = continued_fraction(&x, 20, &tolerance());
        assert!(cf.terminated);
        assert_eq!(cf.terms, ints(&[3, 7, 16]));
        assert_eq!(cf.value(), Some(BigRational::new(355.into(), 113.into())));
    }

    #[test]
    fn negative_values_use_floor() {
        let x = Real::from_ratio(-7, 3, Precision::DEFAULT).unwrap();
        let cf = continued_fraction(&x, 20, &tolerance());
        assert_eq!(cf.terms, ints(&[-3, 1, 2]));
        assert_eq!(cf.value(), Some(BigRational::new((-7).into(), 3.into())));
    }

    #[test]
    fn golden_ratio_is_all_ones() {
        let five = Real::from_integer(5, Precision::DEFAULT);
        let phi = Real::from_ratio(1, 2, Precision::DEFAULT).unwrap()
            * (Real::one(Precision::DEFAULT) + five.sqrt().unwrap());
        let cf = continued_fraction(&phi, 30, &tolerance());
        assert!(!cf.terminated);
        assert_eq!(cf.terms, vec![BigInt::one(); 30]);
    }

    #[test]
    fn sqrt_two_is_periodic() {
        let root = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
        let cf = continued_fraction(&root, 12, &tolerance());
        assert_eq!(cf.terms[0], BigInt::one());
        assert!(cf.terms[1..].iter().all(|t| *t == BigInt::from(2)));
    }

    #[test]
    fn evaluation_and_convergents() {
        assert_eq!(evaluate(&[]), None);
        assert_eq!(evaluate(&ints(&[1, 0])), None);
        let pi_terms = ints(&[3, 7, 15, 1]);
        let conv = convergents(&pi_terms);
        let expect: Vec<BigRational> = [(3, 1), (22, 7), (333, 106), (355, 113)]
            .iter()
            .map(|&(p, q)| BigRational::new(BigInt::from(p), BigInt::from(q)))
            .collect();
        assert_eq!(conv, expect);
        assert_eq!(evaluate(&pi_terms), conv.last().cloned());
    }

    #[test]
    fn small_denominator_search() {
        let tol = tolerance();
        let x = Real::from_ratio(22, 7, Precision::DEFAULT).unwrap();
        assert_eq!(
            small_denominator_rational(&x, 100, &tol),
            Some(BigRational::new(22.into(), 7.into()))
        );
        let root = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
        assert_eq!(small_denominator_rational(&root, 100, &tol), None);
        let pi = Real::pi(Precision::DEFAULT);
        assert_eq!(small_denominator_rational(&pi, 100, &tol), None);
        let x = Real::from_ratio(1, 101, Precision::DEFAULT).unwrap();
        assert_eq!(small_denominator_rational(&x, 100, &tol), None);
    }

    #[test]
    fn long_rational_expansions_terminate() {
        // F30/F31: thirty partial quotients
        let x = Real::from_ratio(832_040, 1_346_269, Precision::DEFAULT).unwrap();
        assert!(!continued_fraction(&x, 20, &tolerance()).terminated);
        let cf = reliable_continued_fraction(&x, &tolerance());
        assert!(cf.terminated);
        assert!(cf.terms.len() > 20);
        assert_eq!(cf.value(), Some(BigRational::new(832_040.into(), 1_346_269.into())));
    }

    #[test]
    fn reliable_expansion_stops_at_noise() {
        let pi = Real::pi(Precision::DEFAULT);
        let cf = reliable_continued_fraction(&pi, &tolerance());
        assert!(!cf.terminated);
        assert_eq!(cf.terms[..5], ints(&[3, 7, 15, 1, 292])[..]);
        // stops just past the denominator bound sqrt(1e-10 / 1e-100)
        let last = convergents(&cf.terms).pop().unwrap();
        assert!(last.denom() > &BigInt::from(10).pow(44u32));
    }
}
