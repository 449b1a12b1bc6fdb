use log::info;
use std::collections::HashMap;

use crate::{
    parse::{Chart, LedgerDraft},
    Account, Amount, Error, ErrorType, JournalEntry, Ledger, Source,
};

fn check_opening_balances(accounts: &[Account], src: &Source) -> Result<(), Error> {
    let diff: i128 = accounts
        .iter()
        .map(|account| i128::from(account.opening_balance.signed()))
        .sum();
    if diff != 0 {
        return Err(Error::new(
            ErrorType::Mismatch,
            format!("Opening balance mismatch: {}", diff),
            src.clone(),
        ));
    }
    Ok(())
}

fn post_entry(
    entry: JournalEntry,
    accounts: &mut [Account],
    index: &HashMap<String, usize>,
) -> Result<(), Error> {
    let mut targets: Vec<usize> = Vec::with_capacity(entry.legs.len());
    for leg in entry.legs.iter() {
        match index.get(&leg.account) {
            Some(&i) => {
                if !targets.contains(&i) {
                    targets.push(i);
                }
            }
            None => {
                return Err(Error::new(
                    ErrorType::Account,
                    format!("Unknown account {}.", leg.account),
                    leg.src.clone(),
                ))
            }
        }
    }
    let diff: i128 = entry
        .legs
        .iter()
        .map(|leg| i128::from(leg.amount.signed()))
        .sum();
    if diff != 0 {
        return Err(Error::new(
            ErrorType::NotBalanced,
            format!("Unbalanced entry on {}. Diff: {}", entry.date, diff),
            entry.src,
        ));
    }
    for i in targets {
        accounts[i].history.push(entry.clone());
    }
    Ok(())
}

/// Recomputes every closing balance from the posted history and checks that
/// the chart still sums to zero. Sums run in `i128`; a closing balance that
/// does not fit an [`Amount`] is an error.
fn check_closing_balances(accounts: &mut [Account], src: &Source) -> Result<(), Error> {
    for account in accounts.iter_mut() {
        let movement: i128 = account
            .history
            .iter()
            .flat_map(|entry| entry.legs.iter())
            .filter(|leg| leg.account == account.name)
            .map(|leg| i128::from(leg.amount.signed()))
            .sum();
        let signed = i128::from(account.opening_balance.signed()) + movement;
        let closing = Amount::checked_from_signed(signed).ok_or_else(|| {
            Error::new(
                ErrorType::Mismatch,
                format!("Closing balance of {} is out of range: {}", account.name, signed),
                account.src.clone(),
            )
        })?;
        account.closing_balance = closing.to_side(account.category.natural_side());
    }
    let diff: i128 = accounts
        .iter()
        .map(|account| i128::from(account.closing_balance.signed()))
        .sum();
    if diff != 0 {
        return Err(Error::new(
            ErrorType::Mismatch,
            format!("Closing balance mismatch: {}", diff),
            src.clone(),
        ));
    }
    Ok(())
}

impl LedgerDraft {
    /// Consuming `self`, checks opening balances, validates every pending
    /// journal entry and posts it into the history of each account it
    /// touches, then checks closing balances. The first violation aborts the
    /// whole check.
    pub fn into_ledger(self) -> Result<Ledger, Error> {
        let LedgerDraft {
            file,
            chart,
            pending,
            end_date,
        } = self;
        let Chart {
            mut accounts,
            start_date,
            src,
        } = chart;
        let src = src.unwrap_or_else(|| Source::start_of(file));
        check_opening_balances(&accounts, &src)?;

        let index: HashMap<String, usize> = accounts
            .iter()
            .enumerate()
            .map(|(i, account)| (account.name.clone(), i))
            .collect();
        let count = pending.len();
        for entry in pending {
            post_entry(entry, &mut accounts, &index)?;
        }
        check_closing_balances(&mut accounts, &src)?;
        info!(
            "Posted {} journal entries into {} accounts",
            count,
            accounts.len()
        );
        Ok(Ledger {
            start_date,
            end_date,
            accounts,
        })
    }
}
