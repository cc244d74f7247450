//! ofx-core: OFX 1.0.2 domain records and the value normalizers that turn raw
//! statement text into exact amounts, dates and classifications.

pub mod amount;
pub mod date;
pub mod error;
pub mod kinds;
pub mod model;

pub use amount::{CENTS_SCALED_BANK_ID, sanitize_amount, to_decimal, to_minor_units};
pub use date::{PostedAt, parse_date};
pub use error::{OfxError, OfxResult};
pub use kinds::{AccountType, TransactionType};
pub use model::{Account, Balance, SignOn, SignOnStatus, StatementPeriod, Transaction};
