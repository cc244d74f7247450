use rust_decimal::Decimal;
use thiserror::Error;

/// Failures that terminate a parse.
///
/// Anything that could silently corrupt a money amount or a transaction date
/// ends up here. Recoverable problems (unknown type codes, missing optional
/// elements, unreadable balance dates) never do.
#[derive(Debug, Error, PartialEq)]
pub enum OfxError {
    /// The amount did not survive sanitizing as a decimal number.
    #[error("invalid amount \"{raw}\" (sanitized to \"{sanitized}\")")]
    InvalidAmount { raw: String, sanitized: String },

    /// Scaling the amount to minor units does not fit in an `i64`.
    #[error("amount {0} is out of range for minor units")]
    AmountOutOfRange(Decimal),

    /// Neither `YYYYMMDD[HHMMSS]` nor, for BRL statements, `DD/MM/YYYY`.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// A required element is missing from the body.
    #[error("missing required element: {0}")]
    MissingElement(&'static str),

    /// The tag tree rejected a path pattern.
    #[error("invalid tag path \"{0}\"")]
    InvalidSelector(String),

    /// The document has no `<OFX>` root to split the body on.
    #[error("no <OFX> body found in document")]
    MissingBody,

    #[error("unsupported OFX version: {0}")]
    UnsupportedVersion(String),
}

pub type OfxResult<T> = Result<T, OfxError>;
