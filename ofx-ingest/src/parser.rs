//! Domain builder for one OFX 1.0.2 document.
//!
//! Every aggregate is computed on first access and cached for the life of the
//! parser, so repeated reads hand back the same value. A parser owns its tree
//! and its caches; parse different documents with different parsers.

use std::cell::OnceCell;

use ofx_core::{
    Account, AccountType, Balance, OfxError, OfxResult, PostedAt, SignOn, SignOnStatus,
    StatementPeriod, Transaction, TransactionType, parse_date, to_decimal, to_minor_units,
};

use crate::document::{check_version, split_document};
use crate::header::{Headers, parse_headers};
use crate::tag_tree::{HtmlTagTree, TagTree};

const CURRENCY: &str = "bankmsgsrsv1 > stmttrnrs > stmtrs > curdef, \
                        creditcardmsgsrsv1 > ccstmttrnrs > ccstmtrs > curdef";
const BANK_ID: &str = "bankacctfrom > bankid";
const ACCOUNT_ID: &str = "bankacctfrom > acctid, ccacctfrom > acctid";
const ACCOUNT_TYPE: &str = "bankacctfrom > accttype";

const LEDGER_AMOUNT: &str = "ledgerbal > balamt";
const LEDGER_DATE: &str = "ledgerbal > dtasof";
const AVAILABLE: &str = "availbal";
const AVAILABLE_AMOUNT: &str = "availbal > balamt";
const AVAILABLE_DATE: &str = "availbal > dtasof";

const TRANSACTION_LIST: &str = "banktranlist";
const PERIOD_START: &str = "banktranlist > dtstart";
const PERIOD_END: &str = "banktranlist > dtend";
const TRANSACTIONS: &str = "banktranlist > stmttrn";

const LANGUAGE: &str = "signonmsgsrsv1 > sonrs > language";
const FI_ID: &str = "signonmsgsrsv1 > sonrs > fi > fid";
const FI_NAME: &str = "signonmsgsrsv1 > sonrs > fi > org";
const SERVER_TIME: &str = "signonmsgsrsv1 > sonrs > dtserver";
const STATUS: &str = "signonmsgsrsv1 > sonrs > status";
const STATUS_CODE: &str = "signonmsgsrsv1 > sonrs > status > code";
const STATUS_SEVERITY: &str = "signonmsgsrsv1 > sonrs > status > severity";
const STATUS_MESSAGE: &str = "signonmsgsrsv1 > sonrs > status > message";

fn cached<'a, V>(cell: &'a OnceCell<V>, compute: impl FnOnce() -> OfxResult<V>) -> OfxResult<&'a V> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

pub struct Ofx102Parser<T: TagTree = HtmlTagTree> {
    headers: Option<Headers>,
    tree: T,
    currency: OnceCell<String>,
    bank_id: OnceCell<String>,
    sign_on: OnceCell<SignOn>,
    balance: OnceCell<Balance>,
    available_balance: OnceCell<Option<Balance>>,
    transactions: OnceCell<Vec<Transaction>>,
    account: OnceCell<Account>,
}

impl Ofx102Parser<HtmlTagTree> {
    /// Parser over an already separated header block and body.
    pub fn new(header_text: &str, body_text: &str) -> Self {
        Self::with_tree(parse_headers(header_text), HtmlTagTree::parse(body_text))
    }

    /// Parser over a whole file's text.
    pub fn from_document(raw: &str) -> OfxResult<Self> {
        let (header_text, body_text) = split_document(raw)?;
        let headers = parse_headers(header_text);
        check_version(headers.as_ref())?;
        Ok(Self::with_tree(headers, HtmlTagTree::parse(body_text)))
    }
}

impl<T: TagTree> Ofx102Parser<T> {
    pub fn with_tree(headers: Option<Headers>, tree: T) -> Self {
        Self {
            headers,
            tree,
            currency: OnceCell::new(),
            bank_id: OnceCell::new(),
            sign_on: OnceCell::new(),
            balance: OnceCell::new(),
            available_balance: OnceCell::new(),
            transactions: OnceCell::new(),
            account: OnceCell::new(),
        }
    }

    /// `None` when the header block had no parseable line.
    pub fn headers(&self) -> Option<&Headers> {
        self.headers.as_ref()
    }

    /// Statement currency (`CURDEF`), empty when the document has none.
    pub fn currency(&self) -> OfxResult<&str> {
        cached(&self.currency, || {
            let currency = self.text(CURRENCY)?.unwrap_or_default();
            tracing::debug!(currency = %currency, "resolved statement currency");
            Ok(currency)
        })
        .map(String::as_str)
    }

    pub fn bank_id(&self) -> OfxResult<&str> {
        cached(&self.bank_id, || Ok(self.text(BANK_ID)?.unwrap_or_default())).map(String::as_str)
    }

    pub fn sign_on(&self) -> OfxResult<&SignOn> {
        cached(&self.sign_on, || {
            let root = self.tree.root();
            let status = if self.tree.exists(root, STATUS)? {
                Some(SignOnStatus {
                    code: self.text(STATUS_CODE)?.and_then(|code| code.parse().ok()),
                    severity: self.text(STATUS_SEVERITY)?.unwrap_or_default(),
                    message: self.text(STATUS_MESSAGE)?,
                })
            } else {
                None
            };

            Ok(SignOn {
                language: self.text(LANGUAGE)?.unwrap_or_default(),
                fi_id: self.text(FI_ID)?.unwrap_or_default(),
                fi_name: self.text(FI_NAME)?.unwrap_or_default(),
                server_time: self.lenient_date(SERVER_TIME)?,
                status,
            })
        })
    }

    /// Ledger balance. Its amount is required; its date is not.
    pub fn balance(&self) -> OfxResult<&Balance> {
        cached(&self.balance, || {
            self.build_balance(LEDGER_AMOUNT, LEDGER_DATE, "LEDGERBAL > BALAMT")
        })
    }

    /// Available balance, only when the document has an `AVAILBAL` element.
    pub fn available_balance(&self) -> OfxResult<Option<&Balance>> {
        cached(&self.available_balance, || {
            if !self.tree.exists(self.tree.root(), AVAILABLE)? {
                return Ok(None);
            }
            self.build_balance(AVAILABLE_AMOUNT, AVAILABLE_DATE, "AVAILBAL > BALAMT")
                .map(Some)
        })
        .map(Option::as_ref)
    }

    /// Transactions in document order.
    pub fn transactions(&self) -> OfxResult<&[Transaction]> {
        cached(&self.transactions, || {
            let nodes = self.tree.select(self.tree.root(), TRANSACTIONS)?;
            let transactions = nodes
                .into_iter()
                .map(|node| self.build_transaction(node))
                .collect::<OfxResult<Vec<_>>>()?;
            tracing::debug!(count = transactions.len(), "parsed transactions");
            Ok(transactions)
        })
        .map(Vec::as_slice)
    }

    pub fn account(&self) -> OfxResult<&Account> {
        cached(&self.account, || {
            let period = if self.tree.exists(self.tree.root(), TRANSACTION_LIST)? {
                Some(StatementPeriod {
                    start: self.lenient_date(PERIOD_START)?,
                    end: self.lenient_date(PERIOD_END)?,
                })
            } else {
                None
            };

            Ok(Account {
                bank_id: self.bank_id()?.to_string(),
                id: self.text(ACCOUNT_ID)?.unwrap_or_default(),
                kind: AccountType::from_code(&self.text(ACCOUNT_TYPE)?.unwrap_or_default()),
                currency: self.currency()?.to_string(),
                balance: self.balance()?.clone(),
                available_balance: self.available_balance()?.cloned(),
                period,
                transactions: self.transactions()?.to_vec(),
            })
        })
    }

    fn text(&self, pattern: &str) -> OfxResult<Option<String>> {
        self.tree.first_text(self.tree.root(), pattern)
    }

    /// Dates on balances, the sign-on and the statement period are
    /// informational: a missing or unreadable one becomes `None`.
    fn lenient_date(&self, pattern: &str) -> OfxResult<Option<PostedAt>> {
        let Some(raw) = self.text(pattern)? else {
            return Ok(None);
        };
        match parse_date(&raw, self.currency()?) {
            Ok(date) => Ok(Some(date)),
            Err(err) => {
                tracing::warn!(%err, element = pattern, "ignoring unreadable date");
                Ok(None)
            }
        }
    }

    fn build_balance(
        &self,
        amount_pattern: &str,
        date_pattern: &str,
        element: &'static str,
    ) -> OfxResult<Balance> {
        let raw = self
            .text(amount_pattern)?
            .ok_or(OfxError::MissingElement(element))?;
        let amount = to_decimal(&raw, self.bank_id()?)?;
        Balance::new(amount, self.lenient_date(date_pattern)?)
    }

    fn build_transaction<'a>(&'a self, node: T::Node<'a>) -> OfxResult<Transaction> {
        let field = |name: &str| self.tree.first_text(node, &format!("stmttrn > {name}"));
        let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

        let raw_amount = field("trnamt")?.ok_or(OfxError::MissingElement("STMTTRN > TRNAMT"))?;
        let amount = to_decimal(&raw_amount, self.bank_id()?)?;

        let raw_posted =
            field("dtposted")?.ok_or(OfxError::MissingElement("STMTTRN > DTPOSTED"))?;
        let posted_at = parse_date(&raw_posted, self.currency()?)?;
        let occurred_at = match non_empty(field("dtuser")?) {
            Some(raw) => Some(parse_date(&raw, self.currency()?)?),
            None => None,
        };

        let transaction = Transaction {
            amount,
            amount_in_pennies: to_minor_units(amount)?,
            fit_id: field("fitid")?.unwrap_or_default(),
            memo: field("memo")?.unwrap_or_default(),
            name: field("name")?.unwrap_or_default(),
            payee: field("payee")?.unwrap_or_default(),
            check_number: non_empty(field("checknum")?),
            ref_number: non_empty(field("refnum")?),
            posted_at,
            occurred_at,
            kind: TransactionType::from_code(&field("trntype")?.unwrap_or_default()),
            sic: non_empty(field("sic")?),
        };
        tracing::trace!(fit_id = %transaction.fit_id, amount = %transaction.amount, "parsed transaction");
        Ok(transaction)
    }
}
