//! Minimal-polynomial search.
//!
//! [`LatticeFinder`] looks for an integer relation `c₀ + c₁α + … + c_dα^d = 0`
//! by lattice reduction. For each degree `d` it reduces the rows
//!
//! ```text
//! [ e_k | round(S · α^k) ]      k = 0..=d,   S = 10^(digits/2)
//! ```
//!
//! with the LLL algorithm (δ = 3/4, exact rational Gram–Schmidt). A short
//! vector has small `cᵢ` and a small scaled residual, i.e. it is a
//! low-height polynomial nearly vanishing at `α`. The smallest-height
//! irreducible candidate that passes the residual check wins; the lowest
//! degree with any winner is returned.
//!
//! A singular Gram–Schmidt system (dependent rows) means "nothing found".

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::analyzer::is_irreducible;
use crate::polynomial::Polynomial;
use crate::real::Real;

/// Largest coefficient magnitude accepted by default.
pub const DEFAULT_MAX_HEIGHT: u64 = 1_000_000;

/// Row swaps after which a reduction is abandoned.
const MAX_SWAPS: usize = 100_000;

/// Anything that can propose a minimal polynomial for a value.
pub trait MinimalPolynomialFinder {
    /// A candidate of degree at most `max_degree` whose value at `value` is
    /// within `tolerance` of zero, or `None`.
    fn find_minimal_polynomial(
        &self,
        value: &Real,
        max_degree: usize,
        tolerance: &Real,
    ) -> Option<Polynomial>;
}

impl<F> MinimalPolynomialFinder for F
where
    F: Fn(&Real, usize, &Real) -> Option<Polynomial>,
{
    fn find_minimal_polynomial(
        &self,
        value: &Real,
        max_degree: usize,
        tolerance: &Real,
    ) -> Option<Polynomial> {
        self(value, max_degree, tolerance)
    }
}

/// Integer-relation search by LLL reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeFinder {
    max_height: BigInt,
}

impl Default for LatticeFinder {
    fn default() -> Self {
        Self::with_max_height(DEFAULT_MAX_HEIGHT)
    }
}

impl LatticeFinder {
    /// Accept coefficients up to `max_height` in magnitude.
    #[must_use]
    pub fn with_max_height(max_height: u64) -> Self {
        Self {
            max_height: BigInt::from(max_height),
        }
    }

    fn search_degree(&self, value: &Real, degree: usize, tolerance: &Real) -> Option<Polynomial> {
        let precision = value.precision();
        let scale = Real::pow10(i64::from(precision.digits() / 2), precision);
        let mut power = Real::one(precision);
        let mut basis = Vec::with_capacity(degree + 1);
        for k in 0..=degree {
            let mut row = vec![BigInt::zero(); degree + 2];
            row[k] = BigInt::from(1);
            row[degree + 1] = (&scale * &power).round();
            basis.push(row);
            power = &power * value;
        }

        let reduced = lll_reduce(basis)?;
        let mut best: Option<(BigInt, Polynomial)> = None;
        for row in &reduced {
            let lowest_first = &row[..=degree];
            if lowest_first[degree].is_zero() {
                continue;
            }
            let height = lowest_first
                .iter()
                .map(Signed::abs)
                .max()
                .unwrap_or_default();
            if height > self.max_height {
                continue;
            }
            let Ok(candidate) = Polynomial::from_integers(lowest_first.iter().rev().cloned())
            else {
                continue;
            };
            if candidate.eval(value).abs() > *tolerance || !is_irreducible(&candidate) {
                continue;
            }
            if best.as_ref().map_or(true, |(h, _)| height < *h) {
                best = Some((height, candidate));
            }
        }
        best.and_then(|(_, p)| normalize(&p))
    }
}

impl MinimalPolynomialFinder for LatticeFinder {
    fn find_minimal_polynomial(
        &self,
        value: &Real,
        max_degree: usize,
        tolerance: &Real,
    ) -> Option<Polynomial> {
        for degree in 1..=max_degree {
            if let Some(found) = self.search_degree(value, degree, tolerance) {
                tracing::debug!(degree, polynomial = %found, "minimal polynomial found");
                return Some(found);
            }
        }
        tracing::debug!(max_degree, "no minimal polynomial found");
        None
    }
}

/// Primitive integer form with a positive leading coefficient.
fn normalize(polynomial: &Polynomial) -> Option<Polynomial> {
    Polynomial::from_integers(polynomial.primitive()?).ok()
}

/// Gram–Schmidt coefficients `μ` and squared norms `B` of the rows.
///
/// Returns `None` when a row depends on the previous ones.
fn gram_schmidt(basis: &[Vec<BigInt>]) -> Option<(Vec<Vec<BigRational>>, Vec<BigRational>)> {
    let n = basis.len();
    let mut orthogonal: Vec<Vec<BigRational>> = Vec::with_capacity(n);
    let mut mu = vec![vec![BigRational::zero(); n]; n];
    let mut norms: Vec<BigRational> = Vec::with_capacity(n);
    for i in 0..n {
        let row: Vec<BigRational> = basis[i]
            .iter()
            .map(|x| BigRational::from_integer(x.clone()))
            .collect();
        let mut v = row.clone();
        for j in 0..i {
            mu[i][j] = dot(&row, &orthogonal[j]) / &norms[j];
            for (x, y) in v.iter_mut().zip(&orthogonal[j]) {
                *x -= &mu[i][j] * y;
            }
        }
        let norm = dot(&v, &v);
        if norm.is_zero() {
            return None;
        }
        norms.push(norm);
        orthogonal.push(v);
    }
    Some((mu, norms))
}

fn dot(a: &[BigRational], b: &[BigRational]) -> BigRational {
    a.iter()
        .zip(b)
        .fold(BigRational::zero(), |acc, (x, y)| acc + x * y)
}

/// LLL reduction with δ = 3/4, or `None` for a degenerate basis.
fn lll_reduce(mut basis: Vec<Vec<BigInt>>) -> Option<Vec<Vec<BigInt>>> {
    let n = basis.len();
    let delta = BigRational::new(3.into(), 4.into());
    let (mut mu, mut norms) = gram_schmidt(&basis)?;
    let mut k = 1;
    let mut swaps = 0;
    while k < n {
        for j in (0..k).rev() {
            let q = mu[k][j].round().to_integer();
            if !q.is_zero() {
                let (head, tail) = basis.split_at_mut(k);
                for (x, y) in tail[0].iter_mut().zip(&head[j]) {
                    *x -= &q * y;
                }
                (mu, norms) = gram_schmidt(&basis)?;
            }
        }
        let lovasz = (&delta - &mu[k][k - 1] * &mu[k][k - 1]) * &norms[k - 1];
        if norms[k] >= lovasz {
            k += 1;
        } else {
            basis.swap(k, k - 1);
            (mu, norms) = gram_schmidt(&basis)?;
            k = (k - 1).max(1);
            swaps += 1;
            if swaps > MAX_SWAPS {
                return None;
            }
        }
    }
    Some(basis)
}
