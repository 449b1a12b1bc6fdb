//! Plain-text reports over a checked [`Ledger`].

use crate::{utils::format_amount, Account, Ledger};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Debit and credit totals of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub account: String,
    pub debit: i128,
    pub credit: i128,
}

impl BalanceRow {
    fn from_signed(account: &str, signed: i64) -> Self {
        let signed = i128::from(signed);
        BalanceRow {
            account: account.to_string(),
            debit: signed.max(0),
            credit: (-signed).max(0),
        }
    }
}

/// The columns printed by [`trial_balance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialBalanceKind {
    /// `o`
    Opening,
    /// `c`
    Closing,
    /// `oc`
    OpeningClosing,
    /// `otc`
    Full,
}

impl FromStr for TrialBalanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "o" => Ok(TrialBalanceKind::Opening),
            "c" => Ok(TrialBalanceKind::Closing),
            "oc" => Ok(TrialBalanceKind::OpeningClosing),
            "otc" => Ok(TrialBalanceKind::Full),
            _ => Err(format!("unknown trial balance kind `{}`, expect o, c, oc or otc", s)),
        }
    }
}

fn sorted_accounts(ledger: &Ledger) -> Vec<&Account> {
    let mut accounts: Vec<&Account> = ledger.accounts().iter().collect();
    accounts.sort_by(|a, b| a.name().cmp(b.name()));
    accounts
}

/// Signed values of the legs of `account` over its whole history.
fn own_legs(account: &Account) -> impl Iterator<Item = i64> + '_ {
    account
        .history()
        .iter()
        .flat_map(|entry| entry.legs().iter())
        .filter(move |leg| leg.account == *account.name())
        .map(|leg| leg.amount.signed())
}

/// Adds a signed value to a `(debit, credit)` pair.
fn accumulate((debit, credit): (i128, i128), signed: i64) -> (i128, i128) {
    let signed = i128::from(signed);
    if signed >= 0 {
        (debit + signed, credit)
    } else {
        (debit, credit - signed)
    }
}

/// Joins lines, each terminated by a newline.
fn render(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

pub fn opening_balances(ledger: &Ledger) -> Vec<BalanceRow> {
    sorted_accounts(ledger)
        .into_iter()
        .map(|a| BalanceRow::from_signed(a.name(), a.opening_balance().signed()))
        .collect()
}

/// Total debits and total credits posted to each account.
pub fn transaction_totals(ledger: &Ledger) -> Vec<BalanceRow> {
    sorted_accounts(ledger)
        .into_iter()
        .map(|a| {
            let (debit, credit) = own_legs(a).fold((0, 0), accumulate);
            BalanceRow {
                account: a.name().clone(),
                debit,
                credit,
            }
        })
        .collect()
}

pub fn closing_balances(ledger: &Ledger) -> Vec<BalanceRow> {
    sorted_accounts(ledger)
        .into_iter()
        .map(|a| BalanceRow::from_signed(a.name(), a.closing_balance().signed()))
        .collect()
}

/// Accounts sorted by name with their signed closing balance, right aligned.
pub fn balances(ledger: &Ledger) -> String {
    let rows: Vec<(&str, String)> = sorted_accounts(ledger)
        .into_iter()
        .map(|a| (a.name().as_str(), format_amount(a.closing_balance().signed())))
        .collect();
    let name_width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);
    render(
        rows.into_iter()
            .map(|(name, value)| {
                format!(
                    "{:name_width$}  {:>value_width$}",
                    name,
                    value,
                    name_width = name_width,
                    value_width = value_width
                )
            })
            .collect(),
    )
}

/// Tab separated trial balance with a Totals row.
pub fn trial_balance(ledger: &Ledger, kind: TrialBalanceKind) -> String {
    let start = ledger
        .start_date()
        .map_or_else(String::new, |d| d.to_string());
    let end = ledger.end_date().map_or_else(String::new, |d| d.to_string());
    let columns: Vec<(String, Vec<BalanceRow>)> = match kind {
        TrialBalanceKind::Opening => vec![(start, opening_balances(ledger))],
        TrialBalanceKind::Closing => vec![(end, closing_balances(ledger))],
        TrialBalanceKind::OpeningClosing => vec![
            (start, opening_balances(ledger)),
            (end, closing_balances(ledger)),
        ],
        TrialBalanceKind::Full => vec![
            (start, opening_balances(ledger)),
            ("Transactions".to_string(), transaction_totals(ledger)),
            (end, closing_balances(ledger)),
        ],
    };

    let headings: Vec<String> = columns.iter().map(|(h, _)| format!("{}\t", h)).collect();
    let mut lines = vec![
        "Trial Balance".to_string(),
        format!("Account\t{}", headings.join("\t")),
        format!("\t{}", vec!["Debit\tCredit"; columns.len()].join("\t")),
    ];
    for (i, account) in sorted_accounts(ledger).into_iter().enumerate() {
        let cells: Vec<String> = columns
            .iter()
            .map(|(_, rows)| {
                format!(
                    "{}\t{}",
                    format_amount(rows[i].debit),
                    format_amount(rows[i].credit)
                )
            })
            .collect();
        lines.push(format!("{}\t{}", account.name(), cells.join("\t")));
    }
    let totals: Vec<String> = columns
        .iter()
        .map(|(_, rows)| {
            let debit: i128 = rows.iter().map(|r| r.debit).sum();
            let credit: i128 = rows.iter().map(|r| r.credit).sum();
            format!("{}\t{}", format_amount(debit), format_amount(credit))
        })
        .collect();
    lines.push(format!("Totals\t{}", totals.join("\t")));
    render(lines)
}

/// Debit and credit totals per account for every calendar month with
/// activity.
pub fn monthly_transactions(ledger: &Ledger) -> String {
    let mut months: BTreeMap<String, BTreeMap<&str, (i128, i128)>> = BTreeMap::new();
    for account in ledger.accounts() {
        for entry in account.history() {
            let month = entry.date().format("%Y-%m").to_string();
            for leg in entry.legs().iter().filter(|leg| leg.account == *account.name()) {
                let totals = months
                    .entry(month.clone())
                    .or_default()
                    .entry(account.name().as_str())
                    .or_default();
                *totals = accumulate(*totals, leg.amount.signed());
            }
        }
    }
    let mut lines = Vec::new();
    for (month, accounts) in months {
        lines.push(format!("{}\tDebit\tCredit", month));
        for (name, (debit, credit)) in accounts {
            lines.push(format!(
                "{}\t{}\t{}",
                name,
                format_amount(debit),
                format_amount(credit)
            ));
        }
    }
    render(lines)
}
