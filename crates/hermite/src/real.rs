//! High-precision real arithmetic.
//!
//! A [`Real`] is a binary floating-point value `mantissa × 2^exponent` with
//! an arbitrary-precision integer mantissa. Every value carries the
//! [`Precision`] it was created at, and every operation rounds its result to
//! that many decimal digits (plus guard bits). There is no process-wide
//! precision setting: callers thread a `Precision` through explicitly, and a
//! single classification call works at one precision throughout.
//!
//! # Rounding
//!
//! Results are truncated toward zero once the mantissa exceeds the bit
//! budget. Sums are formed exactly before truncation, so the sign of a
//! difference is always exact; this is what makes [`Ord`] on `Real` sound.
//!
//! | Digits | Mantissa bits |
//! |--------|---------------|
//! | 16     | 70            |
//! | 50     | 183           |
//! | 100    | 349           |
//! | 1000   | 3338          |
//!
//! # Examples
//!
//! ```
//! use hermite::real::{Precision, Real};
//!
//! let p = Precision::new(50).unwrap();
//! let two = Real::from_integer(2, p);
//! let root = two.cbrt();
//! let cube = &(&root * &root) * &root;
//! assert!((&cube - &two).abs() < p.epsilon());
//! assert_eq!(root.floor(), 1.into());
//! ```

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::float::FloatCore;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::HermiteError;

/// Smallest supported precision in decimal digits.
pub const MIN_DIGITS: u32 = 16;

/// Largest supported precision in decimal digits.
pub const MAX_DIGITS: u32 = 10_000;

const GUARD_BITS: u64 = 16;

/// Extra fixed-point bits used while summing constant series.
const SERIES_GUARD_BITS: u64 = 32;

/// log10(2), for estimating decimal exponents.
const LOG10_2: f64 = 0.301_029_995_663_981_2;

/// Working precision in decimal digits.
///
/// Size: 4 bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    /// 100 decimal digits.
    pub const DEFAULT: Self = Self { digits: 100 };

    /// Create a precision of `digits` decimal digits.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::PrecisionOutOfRange`] outside
    /// `MIN_DIGITS..=MAX_DIGITS`.
    pub fn new(digits: u32) -> Result<Self, HermiteError> {
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            return Err(HermiteError::PrecisionOutOfRange {
                digits,
                min: MIN_DIGITS,
                max: MAX_DIGITS,
            });
        }
        Ok(Self { digits })
    }

    /// Decimal digits.
    #[inline]
    #[must_use]
    pub const fn digits(self) -> u32 {
        self.digits
    }

    /// Mantissa budget in bits: ⌈digits · log₂10⌉ plus guard bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        (self.digits as u64 * 3322).div_ceil(1000) + GUARD_BITS
    }

    /// `10^-digits`, the relative resolution of this precision.
    #[must_use]
    pub fn epsilon(self) -> Real {
        Real::pow10(-i64::from(self.digits), self)
    }

    /// `10^-(digits/2)`.
    ///
    /// Magnitudes below the noise floor are indistinguishable from
    /// accumulated rounding error and are treated as zero.
    #[must_use]
    pub fn noise_floor(self) -> Real {
        Real::pow10(-i64::from(self.digits / 2), self)
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Arbitrary-precision binary floating-point number.
///
/// # Invariant
///
/// The mantissa never exceeds `precision.bits()` bits, and zero is stored
/// with exponent 0.
#[derive(Clone)]
pub struct Real {
    mantissa: BigInt,
    exponent: i64,
    precision: Precision,
}

impl Real {
    fn normalized(mantissa: BigInt, exponent: i64, precision: Precision) -> Self {
        if mantissa.is_zero() {
            return Self::zero(precision);
        }
        let limit = precision.bits();
        let bits = mantissa.bits();
        if bits <= limit {
            return Self {
                mantissa,
                exponent,
                precision,
            };
        }
        let shift = bits - limit;
        let (sign, magnitude) = mantissa.into_parts();
        Self {
            mantissa: BigInt::from_biguint(sign, magnitude >> shift),
            exponent: exponent + shift as i64,
            precision,
        }
    }

    /// Zero.
    #[must_use]
    pub fn zero(precision: Precision) -> Self {
        Self {
            mantissa: BigInt::zero(),
            exponent: 0,
            precision,
        }
    }

    /// One.
    #[must_use]
    pub fn one(precision: Precision) -> Self {
        Self::from_integer(1, precision)
    }

    /// An integer, rounded to the working precision.
    #[must_use]
    pub fn from_integer(value: impl Into<BigInt>, precision: Precision) -> Self {
        Self::normalized(value.into(), 0, precision)
    }

    /// A rational number, correctly truncated (no intermediate rounding).
    #[must_use]
    pub fn from_rational(value: &BigRational, precision: Precision) -> Self {
        let numer = value.numer();
        let denom = value.denom();
        if numer.is_zero() {
            return Self::zero(precision);
        }
        let target = precision.bits() as i64 + 2;
        let shift = (target + denom.bits() as i64 - numer.bits() as i64).max(0);
        let quotient = (numer << shift as u64) / denom;
        Self::normalized(quotient, -shift, precision)
    }

    /// `numerator / denominator`, or `None` when the denominator is zero.
    #[must_use]
    pub fn from_ratio(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
        precision: Precision,
    ) -> Option<Self> {
        let denominator = denominator.into();
        if denominator.is_zero() {
            return None;
        }
        let ratio = BigRational::new(numerator.into(), denominator);
        Some(Self::from_rational(&ratio, precision))
    }

    /// The exact binary value of an `f64`, or `None` for NaN and infinities.
    #[must_use]
    pub fn from_f64(value: f64, precision: Precision) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let (mantissa, exponent, sign) = value.integer_decode();
        let mantissa = BigInt::from(mantissa) * BigInt::from(sign);
        Some(Self::normalized(mantissa, i64::from(exponent), precision))
    }

    /// `10^exponent`.
    #[must_use]
    pub fn pow10(exponent: i64, precision: Precision) -> Self {
        let power = num_traits::pow(BigInt::from(10), exponent.unsigned_abs() as usize);
        if exponent >= 0 {
            Self::from_integer(power, precision)
        } else {
            Self::from_rational(&BigRational::new(BigInt::one(), power), precision)
        }
    }

    /// Parse a decimal literal such as `-1.25`, `3`, `.5` or `6.02e23`.
    ///
    /// # Errors
    ///
    /// Returns [`HermiteError::InvalidLiteral`] when `literal` is not a
    /// decimal number or its exponent is absurdly large.
    pub fn parse(literal: &str, precision: Precision) -> Result<Self, HermiteError> {
        let invalid = || HermiteError::InvalidLiteral {
            literal: literal.to_string(),
        };
        let text = literal.trim();
        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let (significand, exponent) = match body.find(['e', 'E']) {
            Some(at) => (
                &body[..at],
                body[at + 1..].parse::<i64>().map_err(|_| invalid())?,
            ),
            None => (body, 0),
        };
        let (whole, fraction) = significand.split_once('.').unwrap_or((significand, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let digits = format!("{whole}{fraction}");
        let mut value: BigInt = digits.parse().map_err(|_| invalid())?;
        if negative {
            value = -value;
        }
        let scale = exponent
            .checked_sub(fraction.len() as i64)
            .filter(|s| s.unsigned_abs() <= 100_000)
            .ok_or_else(invalid)?;
        let power = num_traits::pow(BigInt::from(10), scale.unsigned_abs() as usize);
        Ok(if scale >= 0 {
            Self::from_integer(value * power, precision)
        } else {
            Self::from_rational(&BigRational::new(value, power), precision)
        })
    }

    /// π, by Machin's formula.
    #[must_use]
    pub fn pi(precision: Precision) -> Self {
        let scale_bits = precision.bits() + SERIES_GUARD_BITS;
        let unit = BigInt::one() << scale_bits;
        let pi = arctan_inverse(5, &unit) * 16 - arctan_inverse(239, &unit) * 4;
        Self::normalized(pi, -(scale_bits as i64), precision)
    }

    /// Euler's number, by the factorial series.
    #[must_use]
    pub fn e(precision: Precision) -> Self {
        let scale_bits = precision.bits() + SERIES_GUARD_BITS;
        let mut term = BigInt::one() << scale_bits;
        let mut sum = term.clone();
        let mut k = 1u32;
        loop {
            term /= k;
            if term.is_zero() {
                break;
            }
            sum += &term;
            k += 1;
        }
        Self::normalized(sum, -(scale_bits as i64), precision)
    }

    /// Working precision of this value.
    #[inline]
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// The same value rounded to (or widened to) another precision.
    #[must_use]
    pub fn with_precision(&self, precision: Precision) -> Self {
        Self::normalized(self.mantissa.clone(), self.exponent, precision)
    }

    /// True for exactly zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// True for values strictly below zero.
    #[inline]
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.mantissa.sign() == Sign::Minus
    }

    /// Absolute value.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self {
            mantissa: self.mantissa.abs(),
            exponent: self.exponent,
            precision: self.precision,
        }
    }

    /// Position just above the most significant bit: `|x| < 2^top`.
    fn top(&self) -> i64 {
        self.exponent + self.mantissa.bits() as i64
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        let precision = self.precision.max(rhs.precision);
        if rhs.is_zero() {
            return Self::normalized(self.mantissa.clone(), self.exponent, precision);
        }
        if self.is_zero() {
            return Self::normalized(rhs.mantissa.clone(), rhs.exponent, precision);
        }
        // An addend entirely below the other's rounding position cannot
        // change the truncated sum; skip the (possibly huge) alignment.
        let gap = precision.bits() as i64 + 2;
        let (top_lhs, top_rhs) = (self.top(), rhs.top());
        if top_lhs - top_rhs > gap {
            return Self::normalized(self.mantissa.clone(), self.exponent, precision);
        }
        if top_rhs - top_lhs > gap {
            return Self::normalized(rhs.mantissa.clone(), rhs.exponent, precision);
        }
        let (hi, lo) = if self.exponent >= rhs.exponent {
            (self, rhs)
        } else {
            (rhs, self)
        };
        let shift = (hi.exponent - lo.exponent) as u64;
        Self::normalized((&hi.mantissa << shift) + &lo.mantissa, lo.exponent, precision)
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        let precision = self.precision.max(rhs.precision);
        Self::normalized(
            &self.mantissa * &rhs.mantissa,
            self.exponent + rhs.exponent,
            precision,
        )
    }

    /// Multiply by an integer without rounding the integer first.
    #[must_use]
    pub fn mul_integer(&self, factor: &BigInt) -> Self {
        Self::normalized(&self.mantissa * factor, self.exponent, self.precision)
    }

    /// `self / rhs`, or `None` when `rhs` is exactly zero.
    #[must_use]
    pub fn checked_div(&self, rhs: &Self) -> Option<Self> {
        if rhs.is_zero() {
            return None;
        }
        let precision = self.precision.max(rhs.precision);
        if self.is_zero() {
            return Some(Self::zero(precision));
        }
        let target = precision.bits() as i64 + 2;
        let shift =
            (target + rhs.mantissa.bits() as i64 - self.mantissa.bits() as i64).max(0) as u64;
        let quotient = (&self.mantissa << shift) / &rhs.mantissa;
        Some(Self::normalized(
            quotient,
            self.exponent - rhs.exponent - shift as i64,
            precision,
        ))
    }

    /// Largest integer not above `self` (rounds toward negative infinity).
    #[must_use]
    pub fn floor(&self) -> BigInt {
        if self.exponent >= 0 {
            return &self.mantissa << self.exponent as u64;
        }
        let shift = self.exponent.unsigned_abs();
        if self.mantissa.bits() < shift {
            // |x| < 1
            return if self.is_negative() {
                -BigInt::one()
            } else {
                BigInt::zero()
            };
        }
        self.mantissa.div_floor(&(BigInt::one() << shift))
    }

    /// Nearest integer, halves rounded up.
    #[must_use]
    pub fn round(&self) -> BigInt {
        let half = Self {
            mantissa: BigInt::one(),
            exponent: -1,
            precision: self.precision,
        };
        (self + &half).floor()
    }

    /// `self^exponent` by repeated squaring.
    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        let mut result = Self::one(self.precision);
        let mut base = self.clone();
        let mut e = exponent;
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &base;
            }
            e >>= 1;
            if e > 0 {
                base = &base * &base;
            }
        }
        result
    }

    /// Real `n`-th root.
    ///
    /// Returns `None` for `n == 0` and for even roots of negative values.
    #[must_use]
    pub fn nth_root(&self, n: u32) -> Option<Self> {
        if n == 0 || (n % 2 == 0 && self.is_negative()) {
            return None;
        }
        Some(self.signed_root(n))
    }

    /// Square root, or `None` for negative values.
    #[must_use]
    pub fn sqrt(&self) -> Option<Self> {
        self.nth_root(2)
    }

    /// Real cube root (defined for every sign).
    #[must_use]
    pub fn cbrt(&self) -> Self {
        self.signed_root(3)
    }

    fn signed_root(&self, n: u32) -> Self {
        if n == 1 || self.is_zero() {
            return self.clone();
        }
        let degree = i64::from(n);
        let target = u64::from(n) * (self.precision.bits() + 2);
        let mut shift = target.saturating_sub(self.mantissa.bits()) as i64;
        // the remaining exponent must divide evenly by n
        shift += (self.exponent - shift).rem_euclid(degree);
        let radicand = self.mantissa.magnitude() << shift as u64;
        let root = BigInt::from_biguint(self.mantissa.sign(), radicand.nth_root(n));
        Self::normalized(root, (self.exponent - shift) / degree, self.precision)
    }

    /// Nearest `f64` (saturating to zero or infinity outside its range).
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        if self.is_zero() {
            return 0.0;
        }
        let shift = self.mantissa.bits().saturating_sub(64);
        let head = (&self.mantissa >> shift).to_f64().unwrap_or(f64::NAN);
        scale_by_power_of_two(head, self.exponent + shift as i64)
    }

    /// Fixed-point rendering with `fraction_digits` digits after the point.
    #[must_use]
    pub fn to_decimal_string(&self, fraction_digits: usize) -> String {
        let scale = Self::pow10(fraction_digits as i64, self.precision);
        let scaled = (&self.abs() * &scale).round();
        let mut digits = scaled.to_string();
        if fraction_digits > 0 {
            if digits.len() <= fraction_digits {
                let pad = fraction_digits + 1 - digits.len();
                digits.insert_str(0, &"0".repeat(pad));
            }
            digits.insert(digits.len() - fraction_digits, '.');
        }
        if self.is_negative() && !scaled.is_zero() {
            digits.insert(0, '-');
        }
        digits
    }

    /// Scientific rendering with `significant` significant digits, e.g.
    /// `1.2599e0`.
    #[must_use]
    pub fn to_scientific_string(&self, significant: usize) -> String {
        if self.is_zero() {
            return "0e0".to_string();
        }
        let significant = significant.max(1);
        let magnitude = self.abs();
        let mut exponent10 = ((self.top() - 1) as f64 * LOG10_2).floor() as i64;
        let mut digits = String::new();
        // the estimate is off by at most one; settle in a couple of rounds
        for _ in 0..4 {
            let scale = Self::pow10(significant as i64 - 1 - exponent10, self.precision);
            digits = (&magnitude * &scale).round().to_string();
            match digits.len().cmp(&significant) {
                Ordering::Greater => exponent10 += 1,
                Ordering::Less => exponent10 -= 1,
                Ordering::Equal => break,
            }
        }
        let sign = if self.is_negative() { "-" } else { "" };
        let (lead, rest) = digits.split_at(1.min(digits.len()));
        if rest.is_empty() {
            format!("{sign}{lead}e{exponent10}")
        } else {
            format!("{sign}{lead}.{rest}e{exponent10}")
        }
    }
}

fn arctan_inverse(x: u32, unit: &BigInt) -> BigInt {
    // arctan(1/x) = Σ (-1)^k / ((2k+1) · x^(2k+1))
    let x = BigInt::from(x);
    let x_squared = &x * &x;
    let mut power = unit / &x;
    let mut sum = power.clone();
    let mut k = 1u32;
    loop {
        power /= &x_squared;
        if power.is_zero() {
            break;
        }
        let term = &power / (2 * k + 1);
        if k.is_odd() {
            sum -= term;
        } else {
            sum += term;
        }
        k += 1;
    }
    sum
}

fn scale_by_power_of_two(mut value: f64, exponent: i64) -> f64 {
    let mut exponent = exponent.clamp(-2200, 2200);
    while exponent > 1000 {
        value *= 2f64.powi(1000);
        exponent -= 1000;
    }
    while exponent < -1000 {
        value *= 2f64.powi(-1000);
        exponent += 1000;
    }
    value * 2f64.powi(exponent as i32)
}

impl PartialEq for Real {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Real {}

impl PartialOrd for Real {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Real {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.mantissa.sign(), other.mantissa.sign()) {
            (a, b) if a != b => a.cmp(&b),
            (Sign::NoSign, _) => Ordering::Equal,
            _ => match (self - other).mantissa.sign() {
                Sign::Minus => Ordering::Less,
                Sign::NoSign => Ordering::Equal,
                Sign::Plus => Ordering::Greater,
            },
        }
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl $trait<&Real> for &Real {
            type Output = Real;
            fn $method(self, rhs: &Real) -> Real {
                self.$inner(rhs)
            }
        }

        impl $trait<Real> for Real {
            type Output = Real;
            fn $method(self, rhs: Real) -> Real {
                self.$inner(&rhs)
            }
        }

        impl $trait<&Real> for Real {
            type Output = Real;
            fn $method(self, rhs: &Real) -> Real {
                self.$inner(rhs)
            }
        }

        impl $trait<Real> for &Real {
            type Output = Real;
            fn $method(self, rhs: Real) -> Real {
                self.$inner(&rhs)
            }
        }
    };
}

impl Real {
    fn sub_ref(&self, rhs: &Self) -> Self {
        self.add_ref(&-rhs)
    }
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);

impl Neg for &Real {
    type Output = Real;
    fn neg(self) -> Real {
        Real {
            mantissa: -&self.mantissa,
            exponent: self.exponent,
            precision: self.precision,
        }
    }
}

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        -&self
    }
}

impl fmt::Display for Real {
    /// Fixed-point for moderate magnitudes, scientific otherwise. The
    /// formatter precision selects the number of digits (default 20).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(20);
        let top = self.top();
        if self.is_zero() || (-19..70).contains(&top) {
            write!(f, "{}", self.to_decimal_string(digits))
        } else {
            write!(f, "{}", self.to_scientific_string(digits + 1))
        }
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Real({}, {} digits)",
            self.to_scientific_string(24),
            self.precision.digits
        )
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Real {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_scientific_string(40))
    }
}
