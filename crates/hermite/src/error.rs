//! Error type for contract violations.
//!
//! Only malformed inputs abort a call. Numeric near-degeneracy, singular
//! fitting systems and inconclusive iterations are ordinary outcomes and
//! surface as enum variants on the respective reports, never as errors.

use thiserror::Error;

/// Contract violation raised by the public API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HermiteError {
    /// A polynomial was constructed from an empty coefficient list.
    #[error("polynomial has no coefficients")]
    EmptyPolynomial,

    /// A coefficient supplied as a float was NaN or infinite.
    #[error("coefficient {index} is not a finite number")]
    NonFiniteCoefficient {
        /// Position of the offending coefficient (0 = leading).
        index: usize,
    },

    /// A configuration field holds a value outside its domain.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        /// Name of the field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The requested decimal precision is outside the supported range.
    #[error("precision of {digits} digits is outside the supported range {min}..={max}")]
    PrecisionOutOfRange {
        /// Requested digits.
        digits: u32,
        /// Smallest supported precision.
        min: u32,
        /// Largest supported precision.
        max: u32,
    },

    /// A numeric literal could not be parsed.
    #[error("invalid number literal '{literal}'")]
    InvalidLiteral {
        /// The literal as supplied.
        literal: String,
    },
}

impl HermiteError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
