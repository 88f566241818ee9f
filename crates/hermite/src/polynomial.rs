//! Polynomials with exact rational coefficients.
//!
//! Coefficients are stored highest degree first, exactly as supplied.
//! Leading zeros are kept (the analyzer's [`degree`](crate::analyzer::degree)
//! skips them), so a `Polynomial` built from `[0, 1, 0, 0, -2]` still
//! remembers it had five coefficients.
//!
//! # Examples
//!
//! ```
//! use hermite::polynomial::Polynomial;
//! use num_rational::BigRational;
//!
//! let p = Polynomial::from_integers([1, 0, 0, -2]).unwrap();
//! assert_eq!(p.to_string(), "x^3 - 2");
//! assert_eq!(p.eval_rational(&BigRational::from_integer(2.into())), BigRational::from_integer(6.into()));
//! ```

use core::fmt;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::HermiteError;
use crate::real::{Precision, Real};

/// Univariate polynomial over ℚ, coefficients highest degree first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Polynomial {
    coefficients: Vec<BigRational>,
}

impl Polynomial {
    /// Build from rational coefficients, highest degree first.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::EmptyPolynomial`] when `coefficients` is empty.
    pub fn new(coefficients: Vec<BigRational>) -> Result<Self, HermiteError> {
        if coefficients.is_empty() {
            return Err(HermiteError::EmptyPolynomial);
        }
        Ok(Self { coefficients })
    }

    /// Build from integer coefficients, highest degree first.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::EmptyPolynomial`] when no coefficient is given.
    pub fn from_integers<I, T>(coefficients: I) -> Result<Self, HermiteError>
    where
        I: IntoIterator<Item = T>,
        T: Into<BigInt>,
    {
        Self::new(
            coefficients
                .into_iter()
                .map(|c| BigRational::from_integer(c.into()))
                .collect(),
        )
    }

    /// Build from floating-point coefficients, taking each `f64` at its
    /// exact binary value.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::EmptyPolynomial`] for an empty slice and
    /// [`HermiteError::NonFiniteCoefficient`] for NaN or infinities.
    pub fn from_f64s(coefficients: &[f64]) -> Result<Self, HermiteError> {
        let exact = coefficients
            .iter()
            .enumerate()
            .map(|(index, &c)| {
                BigRational::from_float(c).ok_or(HermiteError::NonFiniteCoefficient { index })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(exact)
    }

    /// `x - root`.
    #[must_use]
    pub fn linear(root: BigRational) -> Self {
        Self {
            coefficients: vec![BigRational::one(), -root],
        }
    }

    /// Coefficients as supplied, highest degree first.
    #[inline]
    #[must_use]
    pub fn coefficients(&self) -> &[BigRational] {
        &self.coefficients
    }

    /// True when every coefficient is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(Zero::is_zero)
    }

    /// The same polynomial without exactly-zero leading coefficients.
    ///
    /// The zero polynomial trims to the single coefficient `0`.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        let start = self
            .coefficients
            .iter()
            .position(|c| !c.is_zero())
            .unwrap_or(self.coefficients.len() - 1);
        Self {
            coefficients: self.coefficients[start..].to_vec(),
        }
    }

    /// Exact degree (position of the first nonzero coefficient).
    #[must_use]
    pub fn exact_degree(&self) -> usize {
        self.trimmed().coefficients.len() - 1
    }

    /// Divide through by the leading coefficient, or `None` for the zero
    /// polynomial.
    #[must_use]
    pub fn monic(&self) -> Option<Self> {
        let trimmed = self.trimmed();
        let leading = trimmed.coefficients[0].clone();
        if leading.is_zero() {
            return None;
        }
        Some(Self {
            coefficients: trimmed.coefficients.iter().map(|c| c / &leading).collect(),
        })
    }

    /// Primitive integer form: coefficients cleared of denominators,
    /// divided by their content, leading coefficient positive.
    ///
    /// Returns `None` for the zero polynomial.
    #[must_use]
    pub fn primitive(&self) -> Option<Vec<BigInt>> {
        let trimmed = self.trimmed();
        if trimmed.coefficients[0].is_zero() {
            return None;
        }
        let denominator = trimmed
            .coefficients
            .iter()
            .fold(BigInt::one(), |acc, c| acc.lcm(c.denom()));
        let scaled: Vec<BigInt> = trimmed
            .coefficients
            .iter()
            .map(|c| c.numer() * (&denominator / c.denom()))
            .collect();
        let content = scaled.iter().fold(BigInt::zero(), |acc, c| acc.gcd(c));
        let sign = if scaled[0].is_negative() {
            -BigInt::one()
        } else {
            BigInt::one()
        };
        let divisor = content * sign;
        Some(scaled.iter().map(|c| c / &divisor).collect())
    }

    /// Exact evaluation at a rational point (Horner).
    #[must_use]
    pub fn eval_rational(&self, x: &BigRational) -> BigRational {
        self.coefficients
            .iter()
            .fold(BigRational::zero(), |acc, c| acc * x + c)
    }

    /// High-precision evaluation at `x` (Horner), at `x`'s precision.
    #[must_use]
    pub fn eval(&self, x: &Real) -> Real {
        let precision = x.precision();
        self.coefficients
            .iter()
            .fold(Real::zero(precision), |acc, c| {
                &(&acc * x) + &Real::from_rational(c, precision)
            })
    }

    /// Evaluation at an `f64`, through [`Real`] at default precision.
    #[must_use]
    pub fn eval_f64(&self, x: f64) -> f64 {
        Real::from_f64(x, Precision::DEFAULT)
            .map_or(f64::NAN, |x| self.eval(&x).to_f64())
    }

    /// Euclidean division: `self = quotient · divisor + remainder`.
    ///
    /// Returns `None` when `divisor` is the zero polynomial.
    #[must_use]
    pub fn div_rem(&self, divisor: &Self) -> Option<(Self, Self)> {
        let divisor = divisor.trimmed();
        let lead = divisor.coefficients[0].clone();
        if lead.is_zero() {
            return None;
        }
        let mut remainder = self.trimmed().coefficients;
        let m = divisor.coefficients.len();
        if remainder.len() < m {
            return Some((Self::zero(), Self { coefficients: remainder }));
        }
        let steps = remainder.len() - m + 1;
        let mut quotient = Vec::with_capacity(steps);
        for i in 0..steps {
            let factor = &remainder[i] / &lead;
            for (j, d) in divisor.coefficients.iter().enumerate() {
                let update = &factor * d;
                remainder[i + j] -= update;
            }
            quotient.push(factor);
        }
        let mut tail = remainder.split_off(steps);
        if tail.is_empty() {
            tail.push(BigRational::zero());
        }
        let remainder = Self { coefficients: tail };
        Some((Self { coefficients: quotient }, remainder.trimmed()))
    }

    /// Formal derivative.
    #[must_use]
    pub fn derivative(&self) -> Self {
        let trimmed = self.trimmed();
        let n = trimmed.coefficients.len() - 1;
        if n == 0 {
            return Self::zero();
        }
        Self {
            coefficients: trimmed.coefficients[..n]
                .iter()
                .enumerate()
                .map(|(i, c)| c * BigRational::from_integer(BigInt::from(n - i)))
                .collect(),
        }
    }

    /// Monic greatest common divisor, or `None` when both are zero.
    #[must_use]
    pub fn gcd(&self, other: &Self) -> Option<Self> {
        let (mut a, mut b) = (self.trimmed(), other.trimmed());
        while !b.is_zero() {
            let (_, remainder) = a.div_rem(&b)?;
            a = core::mem::replace(&mut b, remainder);
        }
        a.monic()
    }

    fn zero() -> Self {
        Self {
            coefficients: vec![BigRational::zero()],
        }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let trimmed = self.trimmed();
        let degree = trimmed.coefficients.len() - 1;
        let mut first = true;
        for (i, c) in trimmed.coefficients.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            let power = degree - i;
            let magnitude = c.abs();
            match (first, c.is_negative()) {
                (true, true) => f.write_str("-")?,
                (true, false) => {}
                (false, true) => f.write_str(" - ")?,
                (false, false) => f.write_str(" + ")?,
            }
            first = false;
            if power == 0 || !magnitude.is_one() {
                if magnitude.is_integer() || power == 0 {
                    write!(f, "{magnitude}")?;
                } else {
                    write!(f, "({magnitude})")?;
                }
            }
            match power {
                0 => {}
                1 => f.write_str("x")?,
                _ => write!(f, "x^{power}")?,
            }
        }
        if first {
            f.write_str("0")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Polynomial {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.coefficients.len()))?;
        for c in &self.coefficients {
            seq.serialize_element(&c.to_string())?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rational(n: i64, d: i64) -> BigRational {
        BigRational::new(n.into(), d.into())
    }

    #[test]
    fn empty_is_rejected() {
        assert_eq!(Polynomial::new(vec![]), Err(HermiteError::EmptyPolynomial));
        assert_eq!(
            Polynomial::from_integers(Vec::<i64>::new()),
            Err(HermiteError::EmptyPolynomial)
        );
    }

    #[test]
    fn non_finite_float_is_rejected() {
        assert_eq!(
            Polynomial::from_f64s(&[1.0, f64::NAN]),
            Err(HermiteError::NonFiniteCoefficient { index: 1 })
        );
        let p = Polynomial::from_f64s(&[1.0, 0.5]).unwrap();
        assert_eq!(p.coefficients()[1], rational(1, 2));
    }

    #[test]
    fn display_forms() {
        let show = |c: &[i64]| Polynomial::from_integers(c.iter().copied()).unwrap().to_string();
        assert_eq!(show(&[1, 0, 0, -2]), "x^3 - 2");
        assert_eq!(show(&[0, 0, -1, 1, 1]), "-x^2 + x + 1");
        assert_eq!(show(&[3, -1]), "3x - 1");
        assert_eq!(show(&[0, 0]), "0");
        let half = Polynomial::new(vec![rational(1, 2), rational(-3, 4)]).unwrap();
        assert_eq!(half.to_string(), "(1/2)x - 3/4");
    }

    #[test]
    fn trimming_and_degree() {
        let p = Polynomial::from_integers([0, 0, 1, 0, -2]).unwrap();
        assert_eq!(p.coefficients().len(), 5);
        assert_eq!(p.exact_degree(), 2);
        assert_eq!(p.trimmed().coefficients().len(), 3);
        assert_eq!(Polynomial::from_integers([0, 0]).unwrap().exact_degree(), 0);
    }

    #[test]
    fn monic_and_primitive() {
        let p = Polynomial::new(vec![rational(-2, 3), rational(1, 3), rational(4, 1)]).unwrap();
        let monic = p.monic().unwrap();
        assert_eq!(monic.coefficients(), &[rational(1, 1), rational(-1, 2), rational(-6, 1)]);
        assert_eq!(
            p.primitive().unwrap(),
            vec![BigInt::from(2), BigInt::from(-1), BigInt::from(-12)]
        );
        assert!(Polynomial::from_integers([0]).unwrap().monic().is_none());
        assert!(Polynomial::from_integers([0, 0]).unwrap().primitive().is_none());
    }

    #[test]
    fn exact_division() {
        // x^3 - 1 = (x - 1)(x^2 + x + 1)
        let cube = Polynomial::from_integers([1, 0, 0, -1]).unwrap();
        let (q, r) = cube.div_rem(&Polynomial::linear(rational(1, 1))).unwrap();
        assert_eq!(q, Polynomial::from_integers([1, 1, 1]).unwrap());
        assert!(r.is_zero());

        let (q, r) = cube.div_rem(&Polynomial::from_integers([2, 0]).unwrap()).unwrap();
        assert_eq!(q.coefficients(), &[rational(1, 2), rational(0, 1), rational(0, 1)]);
        assert_eq!(r, Polynomial::from_integers([-1]).unwrap());

        assert!(cube.div_rem(&Polynomial::from_integers([0]).unwrap()).is_none());
    }

    #[test]
    fn evaluation_agrees_across_domains() {
        let p = Polynomial::from_integers([1, 0, -2]).unwrap();
        assert_eq!(p.eval_rational(&rational(3, 2)), rational(1, 4));
        let x = Real::from_ratio(3, 2, Precision::DEFAULT).unwrap();
        assert_eq!(p.eval(&x), Real::from_ratio(1, 4, Precision::DEFAULT).unwrap());
        assert!((p.eval_f64(1.5) - 0.25).abs() < 1e-15);
        let root = Real::from_integer(2, Precision::DEFAULT).sqrt().unwrap();
        assert!(p.eval(&root).abs() < Precision::DEFAULT.noise_floor());
    }

    #[test]
    fn derivative_and_gcd() {
        let p = Polynomial::from_integers([1, 0, -3, 2]).unwrap();
        assert_eq!(p.derivative(), Polynomial::from_integers([3, 0, -3]).unwrap());
        assert!(Polynomial::from_integers([0, 5]).unwrap().derivative().is_zero());

        // x^3 - 3x + 2 = (x - 1)^2 (x + 2)
        let g = p.gcd(&p.derivative()).unwrap();
        assert_eq!(g, Polynomial::from_integers([1, -1]).unwrap());
        let coprime = Polynomial::from_integers([1, 0, -2]).unwrap();
        let one = Polynomial::from_integers([1]).unwrap();
        assert_eq!(coprime.gcd(&coprime.derivative()).unwrap(), one);
    }
}
