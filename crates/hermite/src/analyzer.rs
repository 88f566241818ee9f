//! Degree and irreducibility over ℚ.
//!
//! Irreducibility is decided on the primitive integer form of a polynomial
//! (Gauss's lemma makes that equivalent to irreducibility over ℚ):
//!
//! | Degree | Test |
//! |--------|------|
//! | 0      | never irreducible |
//! | 1      | always irreducible |
//! | 2, 3   | rational roots |
//! | ≥ 4    | rational roots, then Kronecker's factor search (bounded) |
//!
//! Rational roots are found without factoring the coefficients: Sturm
//! bisection isolates the real roots to a width at which at most one
//! rational of admissible denominator fits, and that rational is checked
//! exactly.
//!
//! # Examples
//!
//! ```
//! use hermite::analyzer::{degree, is_irreducible};
//! use hermite::polynomial::Polynomial;
//!
//! let p = Polynomial::from_integers([0, 1, 0, 0, -2]).unwrap();
//! assert_eq!(degree(p.coefficients()), 3);
//! assert!(is_irreducible(&p));
//! assert!(!is_irreducible(&Polynomial::from_integers([1, 0, 0, -1]).unwrap()));
//! ```

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::polynomial::Polynomial;

/// Leading coefficients at or below `10^-DEGREE_EPSILON_DIGITS` in
/// magnitude do not count toward the degree.
pub const DEGREE_EPSILON_DIGITS: u32 = 10;

/// Integer sample points `-R..=R` considered by Kronecker's method.
const KRONECKER_RADIUS: i64 = 12;

/// Sample values above this magnitude are not factored.
const KRONECKER_VALUE_LIMIT: u64 = 1_000_000_000_000;

/// Interpolants tried per factor degree before the search gives up.
const KRONECKER_CANDIDATES: u64 = 250_000;

/// `10^-DEGREE_EPSILON_DIGITS`.
#[must_use]
pub fn degree_epsilon() -> BigRational {
    let scale = num_traits::pow(BigInt::from(10), DEGREE_EPSILON_DIGITS as usize);
    BigRational::new(BigInt::one(), scale)
}

/// Degree of a coefficient list (highest first), skipping leading
/// coefficients whose magnitude does not exceed [`degree_epsilon`].
///
/// An all-zero list has degree 0.
#[must_use]
pub fn degree(coefficients: &[BigRational]) -> usize {
    let epsilon = degree_epsilon();
    coefficients
        .iter()
        .position(|c| c.abs() > epsilon)
        .map_or(0, |index| coefficients.len() - index - 1)
}

/// The polynomial with negligible leading coefficients removed, so that its
/// exact degree equals [`degree`].
#[must_use]
pub fn significant_part(polynomial: &Polynomial) -> Polynomial {
    let coefficients = polynomial.coefficients();
    let keep = degree(coefficients) + 1;
    let tail = coefficients[coefficients.len().saturating_sub(keep)..].to_vec();
    Polynomial::new(tail).unwrap_or_else(|_| polynomial.clone())
}

/// Irreducibility over ℚ.
///
/// Constants (including the zero polynomial) are not irreducible; every
/// linear polynomial is. Up to degree 3 the answer is exact. Above that the
/// factor search is bounded, and a polynomial whose factors it cannot reach
/// is reported irreducible.
#[must_use]
pub fn is_irreducible(polynomial: &Polynomial) -> bool {
    match polynomial.exact_degree() {
        0 => false,
        1 => true,
        _ => find_factor(polynomial).is_none(),
    }
}

/// A nontrivial factor over ℚ, or `None` when the polynomial is
/// irreducible or has degree below 2.
///
/// Linear factors are returned monic (`x - r`); higher-degree factors are
/// returned in primitive integer form.
#[must_use]
pub fn find_factor(polynomial: &Polynomial) -> Option<Polynomial> {
    let coefficients = polynomial.primitive()?;
    let degree = coefficients.len() - 1;
    if degree < 2 {
        return None;
    }
    if let Some(root) = roots_of_primitive(&coefficients).into_iter().next() {
        tracing::trace!(%root, "rational root");
        return Some(Polynomial::linear(root));
    }
    let factor = (2..=degree / 2).find_map(|d| kronecker_factor(&coefficients, d));
    if let Some(factor) = &factor {
        tracing::trace!(%factor, "factor of higher degree");
    }
    factor
}

/// All distinct rational roots, ascending.
#[must_use]
pub fn rational_roots(polynomial: &Polynomial) -> Vec<BigRational> {
    polynomial
        .primitive()
        .map(|c| roots_of_primitive(&c))
        .unwrap_or_default()
}

fn roots_of_primitive(coefficients: &[BigInt]) -> Vec<BigRational> {
    let mut coefficients = coefficients.to_vec();
    let mut roots = Vec::new();
    if coefficients.len() > 1 && coefficients.last().is_some_and(Zero::is_zero) {
        roots.push(BigRational::zero());
        while coefficients.len() > 1 && coefficients.last().is_some_and(Zero::is_zero) {
            coefficients.pop();
        }
    }
    if coefficients.len() > 1 {
        roots.extend(nonzero_roots(&coefficients));
    }
    roots.sort();
    roots.dedup();
    roots
}

/// Rational roots of a primitive polynomial with a nonzero constant term.
///
/// A root `p/q` has `q` dividing the leading coefficient `a`, so two such
/// roots lie at least `1/a²` apart. Sturm bisection narrows every interval
/// holding a real root below `1/(2a²)`; the simplest rational in it is then
/// the only candidate, and it is confirmed exactly.
fn nonzero_roots(coefficients: &[BigInt]) -> Vec<BigRational> {
    let Ok(f) = Polynomial::from_integers(coefficients.iter().cloned()) else {
        return Vec::new();
    };
    let Some(square_free) = square_free_part(&f) else {
        return Vec::new();
    };
    let sturm = sturm_sequence(&square_free);
    let two = BigRational::from_integer(BigInt::from(2));
    let leading = BigRational::from_integer(coefficients[0].abs());
    let width = (&two * &leading * &leading).recip();
    let bound = cauchy_bound(&square_free);

    let mut roots = Vec::new();
    let mut pending = vec![(-bound.clone(), bound)];
    while let Some((low, high)) = pending.pop() {
        let count = sign_variations(&sturm, &low).saturating_sub(sign_variations(&sturm, &high));
        if count == 0 {
            continue;
        }
        if &high - &low < width {
            let candidate = simplest_between(&low, &high);
            if vanishes_at(coefficients, candidate.numer(), candidate.denom()) {
                roots.push(candidate);
            }
            continue;
        }
        let middle = (&low + &high) / &two;
        pending.push((low, middle.clone()));
        pending.push((middle, high));
    }
    roots
}

/// `f / gcd(f, f')`: the same roots, each simple.
fn square_free_part(f: &Polynomial) -> Option<Polynomial> {
    let g = f.gcd(&f.derivative())?;
    let (quotient, _) = f.div_rem(&g)?;
    Some(quotient)
}

/// `f, f', -rem(f, f'), …` down to the last nonzero remainder.
fn sturm_sequence(f: &Polynomial) -> Vec<Polynomial> {
    let mut sequence = vec![f.trimmed(), f.derivative()];
    loop {
        let n = sequence.len();
        if sequence[n - 1].is_zero() {
            sequence.pop();
            break;
        }
        let Some((_, remainder)) = sequence[n - 2].div_rem(&sequence[n - 1]) else {
            break;
        };
        if remainder.is_zero() {
            break;
        }
        let negated = remainder.coefficients().iter().map(|c| -c).collect();
        match Polynomial::new(negated) {
            Ok(next) => sequence.push(next),
            Err(_) => break,
        }
    }
    sequence
}

/// Sign changes of the sequence at `point`, zeros skipped.
fn sign_variations(sequence: &[Polynomial], point: &BigRational) -> usize {
    let signs: Vec<bool> = sequence
        .iter()
        .map(|p| p.eval_rational(point))
        .filter(|v| !v.is_zero())
        .map(|v| v.is_positive())
        .collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

/// `1 + max |aᵢ / a₀|`, strictly above every root's magnitude.
fn cauchy_bound(f: &Polynomial) -> BigRational {
    let trimmed = f.trimmed();
    let coefficients = trimmed.coefficients();
    let leading = coefficients[0].abs();
    let largest = coefficients[1..]
        .iter()
        .map(|c| c.abs() / &leading)
        .max()
        .unwrap_or_else(BigRational::zero);
    largest + BigRational::one()
}

/// The rational of smallest denominator in `[low, high]`.
fn simplest_between(low: &BigRational, high: &BigRational) -> BigRational {
    let ceiling = low.ceil();
    if &ceiling <= high {
        return ceiling;
    }
    // low and high share their integer part and low is not an integer
    let whole = low.floor();
    let inner = simplest_between(&(high - &whole).recip(), &(low - &whole).recip());
    whole + inner.recip()
}

/// Whether `Σ aᵢ x^(n-i)` vanishes at `x = p/q`, tested as the homogeneous
/// integer sum `Σ aᵢ p^(n-i) q^i`.
fn vanishes_at(coefficients: &[BigInt], p: &BigInt, q: &BigInt) -> bool {
    let n = coefficients.len() - 1;
    let mut sum = BigInt::zero();
    let mut q_power = BigInt::one();
    for (i, a) in coefficients.iter().enumerate() {
        sum += a * num_traits::pow(p.clone(), n - i) * &q_power;
        q_power *= q;
    }
    sum.is_zero()
}

/// Positive divisors of `|n|`, ascending, or `None` beyond
/// [`KRONECKER_VALUE_LIMIT`]. Empty for zero.
fn divisors(n: &BigInt) -> Option<Vec<BigInt>> {
    let n = n.magnitude().to_u64().filter(|&n| n <= KRONECKER_VALUE_LIMIT)?;
    let mut low = Vec::new();
    let mut high = Vec::new();
    let mut d = 1u64;
    while n != 0 && d <= n / d {
        if n % d == 0 {
            low.push(d);
            if d != n / d {
                high.push(n / d);
            }
        }
        d += 1;
    }
    low.extend(high.into_iter().rev());
    Some(low.into_iter().map(BigInt::from).collect())
}

/// Kronecker's method: search for an integer factor of exact degree `d`.
///
/// Any factor `g` of `f` satisfies `g(x) | f(x)` at every integer `x`, so
/// `g` is the interpolant of some choice of signed divisors at `d + 1`
/// sample points. The points with the fewest divisors are used, and the
/// search is abandoned when the sample values are too large to factor or
/// the interpolants exceed [`KRONECKER_CANDIDATES`].
fn kronecker_factor(coefficients: &[BigInt], d: usize) -> Option<Polynomial> {
    let target = Polynomial::from_integers(coefficients.iter().cloned()).ok()?;
    let mut samples: Vec<(BigInt, Vec<BigInt>)> = (-KRONECKER_RADIUS..=KRONECKER_RADIUS)
        .filter_map(|x| {
            let x = BigInt::from(x);
            let y = target
                .eval_rational(&BigRational::from_integer(x.clone()))
                .to_integer();
            if y.is_zero() {
                return None;
            }
            divisors(&y).map(|divisors| (x, divisors))
        })
        .collect();
    samples.sort_by_key(|(_, divisors)| divisors.len());
    samples.truncate(d + 1);
    if samples.len() < d + 1 {
        tracing::warn!(degree = d, "factor search skipped: sample values too large");
        return None;
    }

    let points: Vec<BigInt> = samples.iter().map(|(x, _)| x.clone()).collect();
    // g and -g are the same factor: fix the sign of the first value
    let radices: Vec<usize> = samples
        .iter()
        .enumerate()
        .map(|(i, (_, divs))| if i == 0 { divs.len() } else { 2 * divs.len() })
        .collect();
    let candidates = radices
        .iter()
        .try_fold(1u64, |acc, &r| acc.checked_mul(r as u64))
        .unwrap_or(u64::MAX);
    if candidates > KRONECKER_CANDIDATES {
        tracing::warn!(degree = d, candidates, "factor search skipped: too many interpolants");
        return None;
    }
    let mut odometer = vec![0usize; d + 1];
    loop {
        let values: Vec<BigInt> = samples
            .iter()
            .zip(&odometer)
            .map(|((_, divs), &k)| {
                if k < divs.len() {
                    divs[k].clone()
                } else {
                    -&divs[k - divs.len()]
                }
            })
            .collect();
        if let Some(candidate) = interpolate(&points, &values) {
            let integral = candidate.coefficients().iter().all(|c| c.is_integer());
            if integral
                && candidate.exact_degree() == d
                && target
                    .div_rem(&candidate)
                    .is_some_and(|(_, remainder)| remainder.is_zero())
            {
                return Some(candidate.trimmed());
            }
        }

        let mut digit = 0;
        loop {
            if digit == odometer.len() {
                return None;
            }
            odometer[digit] += 1;
            if odometer[digit] < radices[digit] {
                break;
            }
            odometer[digit] = 0;
            digit += 1;
        }
    }
}

/// Lagrange interpolant through `(xs[i], ys[i])`, highest degree first.
fn interpolate(xs: &[BigInt], ys: &[BigInt]) -> Option<Polynomial> {
    let n = xs.len();
    let mut lowest_first = vec![BigRational::zero(); n];
    for i in 0..n {
        let mut basis = vec![BigRational::one()];
        let mut denominator = BigInt::one();
        for j in (0..n).filter(|&j| j != i) {
            let root = BigRational::from_integer(xs[j].clone());
            let mut next = vec![BigRational::zero(); basis.len() + 1];
            for (k, c) in basis.iter().enumerate() {
                next[k + 1] += c;
                next[k] -= c * &root;
            }
            basis = next;
            denominator *= &xs[i] - &xs[j];
        }
        let scale = BigRational::new(ys[i].clone(), denominator);
        for (k, c) in basis.iter().enumerate() {
            lowest_first[k] += c * &scale;
        }
    }
    lowest_first.reverse();
    Polynomial::new(lowest_first).ok()
}
