//! Input parsing shared by the `hermite` binary.
//!
//! Values are arithmetic expressions evaluated at a working precision:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := atom ('^' unary)?
//! atom    := number | 'pi' | 'e' | name '(' expr (',' expr)* ')' | '(' expr ')'
//! ```
//!
//! Literals and their sums, products, quotients and integer powers stay
//! exact rationals until the end, so `355/113` and `0.1` reach the library
//! without rounding. Exponents must be exact: `2^(1/3)` is a cube root.
//! Functions: `sqrt(x)`, `cbrt(x)`, `root(n, x)`.

use hermite::{HermiteError, Polynomial, Precision, Real};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use thiserror::Error;

/// Largest root index or exponent accepted.
pub const MAX_EXPONENT: u32 = 1000;

/// Malformed or unevaluable input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// Character that starts no token.
    #[error("unexpected character '{ch}' at position {position}")]
    UnexpectedChar {
        /// The character.
        ch: char,
        /// Byte offset.
        position: usize,
    },

    /// Input ended early.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Token out of place.
    #[error("unexpected '{found}'")]
    UnexpectedToken {
        /// The token as written.
        found: String,
    },

    /// Unknown constant or function.
    #[error("unknown name '{name}'")]
    UnknownName {
        /// The name.
        name: String,
    },

    /// Function called with the wrong number of arguments.
    #[error("{name} takes {expected} argument(s), got {found}")]
    Arity {
        /// The function.
        name: String,
        /// Arguments expected.
        expected: usize,
        /// Arguments given.
        found: usize,
    },

    /// Division by an exact zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Exponent or root index that is not a small exact number.
    #[error("unsupported exponent {exponent}")]
    UnsupportedExponent {
        /// The exponent as written.
        exponent: String,
    },

    /// Even root of a negative value.
    #[error("even root of a negative value")]
    NegativeRoot,

    /// Invalid literal or polynomial.
    #[error(transparent)]
    Hermite(#[from] HermiteError),
}

/// Evaluate `input` at `precision`.
///
/// # Errors
///
/// Returns an [`ExprError`] describing the first problem found.
///
/// ```
/// use hermite::Precision;
/// use hermite_clients::parse_value;
///
/// let x = parse_value("cbrt(2) + 1", Precision::DEFAULT).unwrap();
/// assert_eq!(x.to_decimal_string(6), "2.259921");
/// ```
pub fn parse_value(input: &str, precision: Precision) -> Result<Real, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens: &tokens,
        position: 0,
        precision,
    };
    let value = parser.expr()?;
    match parser.peek() {
        None => Ok(value.into_real(precision)),
        Some(token) => Err(ExprError::UnexpectedToken {
            found: token.to_string(),
        }),
    }
}

/// Parse comma-separated coefficients, highest degree first.
///
/// Each coefficient is an integer, a fraction `p/q` or a decimal literal,
/// all taken exactly.
///
/// # Errors
///
/// Returns an [`ExprError`] for a malformed coefficient or an empty list.
///
/// ```
/// use hermite_clients::parse_polynomial;
///
/// let p = parse_polynomial("1, 0, 0, -2").unwrap();
/// assert_eq!(p.to_string(), "x^3 - 2");
/// ```
pub fn parse_polynomial(input: &str) -> Result<Polynomial, ExprError> {
    let coefficients = input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(parse_coefficient)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polynomial::new(coefficients)?)
}

fn parse_coefficient(text: &str) -> Result<BigRational, ExprError> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text.strip_prefix('+').unwrap_or(text).trim_start()),
    };
    let magnitude = match body.split_once('/') {
        Some((p, q)) => {
            let p = decimal(p.trim())?;
            let q = decimal(q.trim())?;
            if q.is_zero() {
                return Err(ExprError::DivisionByZero);
            }
            p / q
        }
        None => decimal(body)?,
    };
    Ok(if negative { -magnitude } else { magnitude })
}

/// An unsigned decimal literal as an exact rational.
fn decimal(text: &str) -> Result<BigRational, ExprError> {
    let invalid = || HermiteError::InvalidLiteral {
        literal: text.to_string(),
    };
    let (significand, exponent) = match text.find(['e', 'E']) {
        Some(at) => (
            &text[..at],
            text[at + 1..].parse::<i32>().map_err(|_| invalid())?,
        ),
        None => (text, 0),
    };
    let (whole, fraction) = significand.split_once('.').unwrap_or((significand, ""));
    if (whole.is_empty() && fraction.is_empty())
        || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit())
    {
        return Err(invalid().into());
    }
    let digits: BigInt = format!("{whole}{fraction}").parse().map_err(|_| invalid())?;
    let scale = i64::from(exponent) - fraction.len() as i64;
    if scale.unsigned_abs() > 10_000 {
        return Err(invalid().into());
    }
    let power = num_traits::pow(BigInt::from(10), scale.unsigned_abs() as usize);
    Ok(if scale >= 0 {
        BigRational::from_integer(digits * power)
    } else {
        BigRational::new(digits, power)
    })
}

// =============================================================================
// Tokens
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(String),
    Name(String),
    Op(char),
    Open,
    Close,
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(s) | Self::Name(s) => f.write_str(s),
            Self::Op(c) => write!(f, "{c}"),
            Self::Open => f.write_str("("),
            Self::Close => f.write_str(")"),
            Self::Comma => f.write_str(","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, ExprError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\n' => i += 1,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // scientific exponent, but not the constant `e` after a number
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        i = j;
                        while i < bytes.len() && bytes[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                tokens.push(Token::Number(input[start..i].to_string()));
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push(Token::Name(input[start..i].to_ascii_lowercase()));
            }
            b'+' | b'-' | b'*' | b'/' | b'^' => {
                tokens.push(Token::Op(c as char));
                i += 1;
            }
            b'(' => {
                tokens.push(Token::Open);
                i += 1;
            }
            b')' => {
                tokens.push(Token::Close);
                i += 1;
            }
            b',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            _ => {
                let ch = input[i..].chars().next().unwrap_or('?');
                return Err(ExprError::UnexpectedChar { ch, position: i });
            }
        }
    }
    Ok(tokens)
}

// =============================================================================
// Evaluation
// =============================================================================

/// Exact as long as possible.
#[derive(Debug, Clone)]
enum Number {
    Exact(BigRational),
    Approx(Real),
}

impl Number {
    fn into_real(self, precision: Precision) -> Real {
        match self {
            Self::Exact(r) => Real::from_rational(&r, precision),
            Self::Approx(x) => x,
        }
    }

    fn binary(
        self,
        rhs: Self,
        precision: Precision,
        exact: impl FnOnce(BigRational, BigRational) -> BigRational,
        approx: impl FnOnce(&Real, &Real) -> Real,
    ) -> Self {
        match (self, rhs) {
            (Self::Exact(a), Self::Exact(b)) => Self::Exact(exact(a, b)),
            (a, b) => Self::Approx(approx(&a.into_real(precision), &b.into_real(precision))),
        }
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    precision: Precision,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Result<&Token, ExprError> {
        let token = self.tokens.get(self.position).ok_or(ExprError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(ExprError::UnexpectedToken {
                found: token.to_string(),
            })
        }
    }

    fn expr(&mut self) -> Result<Number, ExprError> {
        let mut value = self.term()?;
        while let Some(Token::Op(op @ ('+' | '-'))) = self.peek() {
            let op = *op;
            self.position += 1;
            let rhs = self.term()?;
            value = if op == '+' {
                value.binary(rhs, self.precision, |a, b| a + b, |a, b| a + b)
            } else {
                value.binary(rhs, self.precision, |a, b| a - b, |a, b| a - b)
            };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<Number, ExprError> {
        let mut value = self.unary()?;
        while let Some(Token::Op(op @ ('*' | '/'))) = self.peek() {
            let op = *op;
            self.position += 1;
            let rhs = self.unary()?;
            value = if op == '*' {
                value.binary(rhs, self.precision, |a, b| a * b, |a, b| a * b)
            } else {
                self.divide(value, rhs)?
            };
        }
        Ok(value)
    }

    fn divide(&self, lhs: Number, rhs: Number) -> Result<Number, ExprError> {
        match (lhs, rhs) {
            (_, Number::Exact(b)) if b.is_zero() => Err(ExprError::DivisionByZero),
            (Number::Exact(a), Number::Exact(b)) => Ok(Number::Exact(a / b)),
            (a, b) => a
                .into_real(self.precision)
                .checked_div(&b.into_real(self.precision))
                .map(Number::Approx)
                .ok_or(ExprError::DivisionByZero),
        }
    }

    fn unary(&mut self) -> Result<Number, ExprError> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.position += 1;
                Ok(match self.unary()? {
                    Number::Exact(r) => Number::Exact(-r),
                    Number::Approx(x) => Number::Approx(-x),
                })
            }
            Some(Token::Op('+')) => {
                self.position += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Number, ExprError> {
        let base = self.atom()?;
        if self.peek() != Some(&Token::Op('^')) {
            return Ok(base);
        }
        self.position += 1;
        let exponent = match self.unary()? {
            Number::Exact(r) => r,
            Number::Approx(x) => {
                return Err(ExprError::UnsupportedExponent {
                    exponent: x.to_string(),
                })
            }
        };
        self.raise(base, &exponent)
    }

    /// `base^(p/q)` as the `q`-th root of `base^p`.
    fn raise(&self, base: Number, exponent: &BigRational) -> Result<Number, ExprError> {
        let unsupported = || ExprError::UnsupportedExponent {
            exponent: exponent.to_string(),
        };
        let p = exponent.numer().abs().to_u32().filter(|&p| p <= MAX_EXPONENT);
        let q = exponent.denom().to_u32().filter(|&q| q <= MAX_EXPONENT);
        let (Some(p), Some(q)) = (p, q) else {
            return Err(unsupported());
        };
        let powered = match base {
            Number::Exact(r) => Number::Exact(num_traits::pow(r, p as usize)),
            Number::Approx(x) => Number::Approx(x.pow(p)),
        };
        let inverted = if exponent.is_negative() {
            self.divide(Number::Exact(BigRational::one()), powered)?
        } else {
            powered
        };
        if q == 1 {
            return Ok(inverted);
        }
        inverted
            .into_real(self.precision)
            .nth_root(q)
            .map(Number::Approx)
            .ok_or(ExprError::NegativeRoot)
    }

    fn atom(&mut self) -> Result<Number, ExprError> {
        let token = self.next()?.clone();
        match token {
            Token::Number(text) => Ok(Number::Exact(decimal(&text)?)),
            Token::Open => {
                let value = self.expr()?;
                self.expect(&Token::Close)?;
                Ok(value)
            }
            Token::Name(name) => self.named(name),
            other => Err(ExprError::UnexpectedToken {
                found: other.to_string(),
            }),
        }
    }

    fn named(&mut self, name: String) -> Result<Number, ExprError> {
        match name.as_str() {
            "pi" => return Ok(Number::Approx(Real::pi(self.precision))),
            "e" => return Ok(Number::Approx(Real::e(self.precision))),
            "sqrt" | "cbrt" | "root" => {}
            other => {
                return Err(ExprError::UnknownName {
                    name: other.to_string(),
                })
            }
        }
        self.expect(&Token::Open)?;
        let mut args = vec![self.expr()?];
        while self.peek() == Some(&Token::Comma) {
            self.position += 1;
            args.push(self.expr()?);
        }
        self.expect(&Token::Close)?;

        let expected = if name == "root" { 2 } else { 1 };
        if args.len() != expected {
            return Err(ExprError::Arity {
                name,
                expected,
                found: args.len(),
            });
        }
        let mut args = args.into_iter();
        let (index, radicand) = match (name.as_str(), args.next(), args.next()) {
            ("sqrt", Some(x), None) => (BigRational::from_integer(2.into()), x),
            ("cbrt", Some(x), None) => (BigRational::from_integer(3.into()), x),
            ("root", Some(Number::Exact(n)), Some(x)) if n.is_integer() && n.is_positive() => {
                (n, x)
            }
            _ => {
                return Err(ExprError::UnsupportedExponent {
                    exponent: format!("root index in {name}"),
                })
            }
        };
        self.raise(radicand, &index.recip())
    }
}
