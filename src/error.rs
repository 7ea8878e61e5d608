// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Error type shared by every operation of the crate.

use num_bigint::BigInt;
use thiserror::Error;

/// Errors raised while splitting, combining, solving or decoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Malformed construction arguments (empty coefficients, bad subset size, bad k/n).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Text that is not a well formed bigintcs string or integer.
    #[error("format error: {0}")]
    Format(String),

    #[error("checksum mismatch: computed {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },

    #[error("secret must be less than the modulus")]
    SecretTooLarge,

    #[error("secret must be greater than zero")]
    SecretNotPositive,

    #[error("not enough shares to combine (need {needed}, got {supplied})")]
    InsufficientShares { needed: u32, supplied: usize },

    /// Two shares collide on their x index, or carry the same value at different indexes.
    #[error("duplicate share: x={x} conflicts with x={other_x}")]
    DuplicateShare { x: i32, other_x: i32 },

    #[error("inconsistent public info: field '{field}' differs on share x={x}")]
    InconsistentPublicInfo { field: &'static str, x: i32 },

    #[error("too few observations (need {needed} distinct x values, got {distinct})")]
    TooFewObservations { needed: usize, distinct: usize },

    /// Exact division left a remainder and no modulus was available to absorb it.
    #[error("division of {numerator} by {divisor} in row {row} left a remainder")]
    DivisionRemainder {
        row: usize,
        numerator: BigInt,
        divisor: BigInt,
    },

    #[error("arithmetic inconsistency: {0}")]
    ArithmeticInconsistency(String),

    #[error("no multiple of the modulus makes {numerator} divisible by {divisor}")]
    RetryExhausted { numerator: BigInt, divisor: BigInt },

    #[error("no more combinations")]
    NoMoreElements,
}

pub type Result<T> = std::result::Result<T, Error>;
