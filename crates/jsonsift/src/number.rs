//! Numeric values without silent precision loss.
//!
//! Integral literals decode to [`Number::Integer`] (or [`Number::BigInteger`]
//! past the `i64` range). Literals with a fraction or an exponent decode to an
//! arbitrary-precision [`Number::Decimal`], or to [`Number::Float`] when the
//! caller opted out of exact numbers. Exponents too large for a `BigDecimal`
//! scale are kept exactly as [`Number::Scientific`].
//!
//! Equality is numeric across variants, so `Decimal(1.0E+2) == Integer(100)`.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::SyntaxErrorKind;

/// A JSON number.
#[derive(Debug, Clone)]
pub enum Number {
    Integer(i64),
    BigInteger(BigInt),
    Decimal(BigDecimal),
    /// `significand × 10^exponent` for exponents whose negation does not fit
    /// an `i64`. `significand` is non-zero and has no trailing zeros.
    Scientific {
        significand: BigInt,
        exponent: BigInt,
    },
    Float(f64),
}

impl Number {
    /// Decode a complete number lexeme.
    ///
    /// `exact` selects between [`Number::Decimal`] and [`Number::Float`] for
    /// non-integral literals. Integral literals are always exact.
    pub(crate) fn from_lexeme(lexeme: &str, exact: bool) -> Result<Self, SyntaxErrorKind> {
        let integral = !lexeme.bytes().any(|b| matches!(b, b'.' | b'e' | b'E'));
        if integral {
            if let Ok(i) = lexeme.parse::<i64>() {
                return Ok(Self::Integer(i));
            }
            return BigInt::from_str(lexeme)
                .map(Self::BigInteger)
                .map_err(|_| SyntaxErrorKind::InvalidNumber);
        }
        if exact {
            Self::exact_decimal(lexeme).ok_or(SyntaxErrorKind::InvalidNumber)
        } else {
            lexeme
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| SyntaxErrorKind::InvalidNumber)
        }
    }

    fn exact_decimal(lexeme: &str) -> Option<Self> {
        let (digits, exponent) = decompose(lexeme)?;
        if let Some(scale) = (-&exponent).to_i64() {
            let significand = BigInt::from_str(&digits).ok()?;
            return Some(Self::Decimal(BigDecimal::new(significand, scale)));
        }
        if digits.bytes().all(|b| matches!(b, b'0' | b'-')) {
            return Some(Self::Decimal(BigDecimal::from(0)));
        }
        // Trailing zeros may bring the exponent back into range.
        let stripped = digits.trim_end_matches('0');
        let exponent = exponent + (digits.len() - stripped.len());
        let significand = BigInt::from_str(stripped).ok()?;
        Some(match (-&exponent).to_i64() {
            Some(scale) => Self::Decimal(BigDecimal::new(significand, scale)),
            None => Self::Scientific {
                significand,
                exponent,
            },
        })
    }

    /// `true` for the integral variants.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::BigInteger(_))
    }

    /// The value as an `i64`, when it is integral and fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::BigInteger(b) => b.to_i64(),
            Self::Decimal(_) | Self::Scientific { .. } | Self::Float(_) => None,
        }
    }

    /// The value as the nearest `f64`. Lossy for exact variants.
    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(i) => Some(*i as f64),
            Self::BigInteger(b) => b.to_f64(),
            Self::Decimal(d) => d.to_f64(),
            Self::Scientific {
                significand,
                exponent,
            } => {
                let magnitude = if exponent.is_positive() {
                    f64::INFINITY
                } else {
                    0.0
                };
                Some(if significand.is_negative() {
                    -magnitude
                } else {
                    magnitude
                })
            }
            Self::Float(f) => Some(*f),
        }
    }

    /// The value as an exact decimal. `None` for [`Number::Float`] and
    /// [`Number::Scientific`].
    #[must_use]
    pub fn to_big_decimal(&self) -> Option<BigDecimal> {
        match self {
            Self::Integer(i) => Some(BigDecimal::from(*i)),
            Self::BigInteger(b) => Some(BigDecimal::new(b.clone(), 0)),
            Self::Decimal(d) => Some(d.clone()),
            Self::Scientific { .. } | Self::Float(_) => None,
        }
    }

    /// `(significand, exponent)` with `value = significand × 10^exponent`.
    fn exact_parts(&self) -> Option<(BigInt, BigInt)> {
        match self {
            Self::Integer(i) => Some((BigInt::from(*i), BigInt::ZERO)),
            Self::BigInteger(b) => Some((b.clone(), BigInt::ZERO)),
            Self::Decimal(d) => {
                let (digits, scale) = d.as_bigint_and_exponent();
                Some((digits, -BigInt::from(scale)))
            }
            Self::Scientific {
                significand,
                exponent,
            } => Some((significand.clone(), exponent.clone())),
            Self::Float(_) => None,
        }
    }
}

/// Split a non-integral lexeme into its digits, sign kept and point removed,
/// and the power of ten they are scaled by.
fn decompose(lexeme: &str) -> Option<(String, BigInt)> {
    let (mantissa, exponent) = match lexeme.find(['e', 'E']) {
        Some(at) => (&lexeme[..at], lexeme[at + 1..].trim_start_matches('+')),
        None => (lexeme, "0"),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let exponent = BigInt::from_str(exponent).ok()? - fraction.len();
    Some((format!("{whole}{fraction}"), exponent))
}

fn decimal_digits(n: &BigInt) -> usize {
    n.magnitude().to_str_radix(10).len()
}

/// Numeric equality of two exact values.
///
/// Compares orders of magnitude before aligning exponents, so the rescale is
/// bounded by the digits actually present.
fn exact_eq((a, ea): (BigInt, BigInt), (b, eb): (BigInt, BigInt)) -> bool {
    if a.is_zero() || b.is_zero() {
        return a.is_zero() && b.is_zero();
    }
    if a.sign() != b.sign() || &ea + decimal_digits(&a) != &eb + decimal_digits(&b) {
        return false;
    }
    let (high, low, gap) = if ea >= eb {
        (a, b, ea - eb)
    } else {
        (b, a, eb - ea)
    };
    match gap.to_u32() {
        Some(gap) => high * BigInt::from(10u8).pow(gap) == low,
        None => false,
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Float(f), n) | (n, Self::Float(f)) => n.to_f64() == Some(*f),
            (a, b) => match (a.exact_parts(), b.exact_parts()) {
                (Some(a), Some(b)) => exact_eq(a, b),
                _ => false,
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => i.fmt(f),
            Self::BigInteger(b) => b.fmt(f),
            Self::Decimal(d) => d.fmt(f),
            Self::Scientific {
                significand,
                exponent,
            } => write!(f, "{significand}e{exponent}"),
            Self::Float(x) => x.fmt(f),
        }
    }
}

impl From<i64> for Number {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Number {
    fn from(v: i32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<u32> for Number {
    fn from(v: u32) -> Self {
        Self::Integer(v.into())
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<BigInt> for Number {
    fn from(v: BigInt) -> Self {
        Self::BigInteger(v)
    }
}

impl From<BigDecimal> for Number {
    fn from(v: BigDecimal) -> Self {
        Self::Decimal(v)
    }
}
