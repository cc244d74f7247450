use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Unknown,
}

impl AccountType {
    /// Map an `ACCTTYPE` code. Anything unrecognized is `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "CHECKING" => AccountType::Checking,
            _ => AccountType::Unknown,
        }
    }
}

/// `TRNTYPE` codes from the OFX 1.0.2 banking message set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Atm,
    Cash,
    Check,
    Credit,
    Debit,
    Deposit,
    DirectDebit,
    DirectDeposit,
    Dividend,
    Fee,
    Interest,
    Other,
    Payment,
    PointOfSale,
    RepeatPayment,
    ServiceCharge,
    Transfer,
    Unknown,
}

impl TransactionType {
    /// Map a `TRNTYPE` code, case-insensitively. Codes outside the fixed set
    /// (`WIRE`, `HOLD`, typos) are `Unknown`, never an error.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "ATM" => TransactionType::Atm,
            "CASH" => TransactionType::Cash,
            "CHECK" => TransactionType::Check,
            "CREDIT" => TransactionType::Credit,
            "DEBIT" => TransactionType::Debit,
            "DEP" | "DEPOSIT" => TransactionType::Deposit,
            "DIRECTDEBIT" => TransactionType::DirectDebit,
            "DIRECTDEP" | "DIRECTDEPOSIT" => TransactionType::DirectDeposit,
            "DIV" | "DIVIDEND" => TransactionType::Dividend,
            "FEE" => TransactionType::Fee,
            "INT" | "INTEREST" => TransactionType::Interest,
            "OTHER" => TransactionType::Other,
            "PAYMENT" => TransactionType::Payment,
            "POS" | "POINT_OF_SALE" => TransactionType::PointOfSale,
            "REPEATPMT" | "REPEAT_PAYMENT" => TransactionType::RepeatPayment,
            "SRVCHG" | "SERVICE_CHARGE" => TransactionType::ServiceCharge,
            "XFER" | "TRANSFER" => TransactionType::Transfer,
            _ => TransactionType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type() {
        assert_eq!(AccountType::from_code("CHECKING"), AccountType::Checking);
        assert_eq!(AccountType::from_code("checking"), AccountType::Checking);
        assert_eq!(AccountType::from_code("SAVINGS"), AccountType::Unknown);
        assert_eq!(AccountType::from_code(""), AccountType::Unknown);
    }

    #[test]
    fn test_transaction_type_wire_codes() {
        assert_eq!(TransactionType::from_code("DEBIT"), TransactionType::Debit);
        assert_eq!(TransactionType::from_code("pos"), TransactionType::PointOfSale);
        assert_eq!(TransactionType::from_code("XFER"), TransactionType::Transfer);
        assert_eq!(TransactionType::from_code("SRVCHG"), TransactionType::ServiceCharge);
        assert_eq!(TransactionType::from_code("DIRECTDEP"), TransactionType::DirectDeposit);
    }

    #[test]
    fn test_transaction_type_names() {
        assert_eq!(
            TransactionType::from_code("repeat_payment"),
            TransactionType::RepeatPayment
        );
        assert_eq!(TransactionType::from_code("Dividend"), TransactionType::Dividend);
    }

    #[test]
    fn test_unknown_transaction_type() {
        assert_eq!(TransactionType::from_code("WIRE"), TransactionType::Unknown);
        assert_eq!(TransactionType::from_code(""), TransactionType::Unknown);
    }
}
