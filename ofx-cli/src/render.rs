//! Plain-text rendering for `ofx headers` and `ofx show`.

use ofx_core::{Account, Balance, PostedAt, SignOn};
use ofx_ingest::Headers;

pub fn format_date(date: Option<&PostedAt>, date_format: &str) -> String {
    match date {
        Some(d) => match d.time() {
            Some(t) => format!("{} {}", d.date().format(date_format), t.format("%H:%M:%S")),
            None => d.date().format(date_format).to_string(),
        },
        None => "-".to_string(),
    }
}

pub fn headers(headers: Option<&Headers>) -> String {
    let Some(headers) = headers else {
        return "no headers found\n".to_string();
    };
    let mut out = String::new();
    for (key, value) in headers.iter() {
        out.push_str(&format!("{key}: {}\n", value.unwrap_or("<none>")));
    }
    out
}

fn balance_line(label: &str, balance: &Balance, currency: &str, date_format: &str) -> String {
    format!(
        "{label:<10} {:>14} {currency} (as of {})\n",
        balance.amount,
        format_date(balance.posted_at.as_ref(), date_format)
    )
}

pub fn summary(sign_on: &SignOn, account: &Account, limit: usize, date_format: &str) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "Institution: {} (FID {}) lang={}\n",
        or_dash(&sign_on.fi_name),
        or_dash(&sign_on.fi_id),
        or_dash(&sign_on.language)
    ));
    out.push_str(&format!(
        "Account:     {} / {} ({:?}, {})\n\n",
        or_dash(&account.bank_id),
        or_dash(&account.id),
        account.kind,
        or_dash(&account.currency)
    ));

    out.push_str(&balance_line("Ledger", &account.balance, &account.currency, date_format));
    if let Some(available) = &account.available_balance {
        out.push_str(&balance_line("Available", available, &account.currency, date_format));
    }

    out.push_str(&format!("\n{} transactions\n", account.transactions.len()));
    for t in account.transactions.iter().take(limit) {
        let description = [&t.name, &t.memo, &t.payee]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("-");
        out.push_str(&format!(
            "  {:<19} {:>12}  {:<15} {}\n",
            format_date(Some(&t.posted_at), date_format),
            t.amount,
            format!("{:?}", t.kind),
            description
        ));
    }
    if account.transactions.len() > limit {
        out.push_str(&format!("  ... {} more\n", account.transactions.len() - limit));
    }

    out
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}
