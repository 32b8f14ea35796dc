use thiserror::Error;

/// Failures from `parse_size`.
///
/// Each variant carries enough of the offending input to make the
/// rendered message useful on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("cannot parse a size from an empty string")]
    EmptyInput,

    #[error("invalid number in {0:?}")]
    InvalidNumber(String),

    #[error("unknown unit {unit:?} in {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("negative size not allowed: {0:?}")]
    NegativeNotAllowed(String),

    #[error("size {value} is below minimum {min}")]
    BelowMinimum { value: i128, min: i128 },

    #[error("size {value} exceeds maximum {max}")]
    AboveMaximum { value: i128, max: i128 },

    #[error("size in {0:?} overflows the supported range")]
    Overflow(String),
}

/// Failures from `format_size`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("cannot format {0:?} as a size")]
    InvalidValue(String),
}
