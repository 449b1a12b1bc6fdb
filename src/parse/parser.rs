use super::lexer::{normalize_newlines, Lexer};
use super::token::{Directive, Token, DATE, NUMBER};
use crate::{
    utils::parse_amount, Account, Amount, Category, Date, Entry, Error, ErrorType, JournalEntry,
    Location, Side, Source, SrcFile,
};
use log::{debug, info};

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

/// Reads the content of ledger files.
pub trait Loader {
    fn load(&self, path: &Path) -> io::Result<String>;
}

/// Reads ledger files from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl Loader for FsLoader {
    fn load(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// In-memory files keyed by path.
impl Loader for HashMap<PathBuf, String> {
    fn load(&self, path: &Path) -> io::Result<String> {
        self.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}

/// The chart of accounts, shared by every file of a ledger.
#[derive(Debug, Default)]
pub struct Chart {
    pub accounts: Vec<Account>,
    /// The first date found while parsing.
    pub start_date: Option<Date>,
    /// Where the chart was opened.
    pub src: Option<Source>,
}

/// A parsed but unchecked ledger. The pending entries are sorted by date.
#[derive(Debug)]
pub struct LedgerDraft {
    pub file: SrcFile,
    pub chart: Chart,
    pub pending: Vec<JournalEntry>,
    pub end_date: Option<Date>,
}

/// Whether entries parsed from a file go to the main pending list, or to the
/// isolated list of a `journal` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Ledger,
    Journal,
}

/// Appends `entry` to `pending`, which must stay in date order.
pub(crate) fn push_pending(
    pending: &mut Vec<JournalEntry>,
    entry: JournalEntry,
) -> Result<(), Error> {
    if let Some(last) = pending.last() {
        if last.date > entry.date {
            return Err(Error::new(
                ErrorType::Sequence,
                format!("Postings not in sequence: {} > {}.", last.date, entry.date),
                entry.src,
            ));
        }
    }
    pending.push(entry);
    Ok(())
}

fn parse_file(
    loader: &dyn Loader,
    path: &Path,
    refer_src: Source,
    scope: Scope,
    chart: &mut Chart,
    pending: &mut Vec<JournalEntry>,
) -> Result<(), Error> {
    info!("Parsing {}", path.display());
    let data = loader.load(path).map_err(|io_error| {
        Error::new(
            ErrorType::Io,
            format!("Couldn't read {}: {}", path.display(), io_error),
            refer_src,
        )
    })?;
    let text = normalize_newlines(&data);
    let file = Arc::new(path.display().to_string());
    let mut parser = Parser {
        lexer: Lexer::new(&text, file.clone()),
        file,
        loader,
        scope,
        date: None,
        contra: None,
    };
    parser.parse_directives(chart, pending)
}

pub struct Parser<'source, 'a> {
    lexer: Lexer<'source>,
    file: SrcFile,
    loader: &'a dyn Loader,
    scope: Scope,
    /// The date waiting for its postings.
    date: Option<(Date, Location)>,
    /// The account set by `use account`.
    contra: Option<(String, Source)>,
}

impl<'source, 'a> Parser<'source, 'a> {
    /// Parses `path` and every file it includes from the file system.
    pub fn parse(path: &str) -> Result<LedgerDraft, Error> {
        Self::parse_with(path, &FsLoader)
    }

    /// Parses `path` and every file it includes, reading them through
    /// `loader`. The pending entries of the returned draft are sorted by
    /// date.
    pub fn parse_with(path: &str, loader: &dyn Loader) -> Result<LedgerDraft, Error> {
        let file = Arc::new(path.to_string());
        let mut chart = Chart::default();
        let mut pending = Vec::new();
        parse_file(
            loader,
            Path::new(path),
            Source::start_of(file.clone()),
            Scope::Ledger,
            &mut chart,
            &mut pending,
        )?;
        pending.sort_by_key(|entry| entry.date);
        let end_date = pending.last().map(|entry| entry.date);
        Ok(LedgerDraft {
            file,
            chart,
            pending,
            end_date,
        })
    }

    fn src_from(&self, start: Location) -> Source {
        Source {
            start,
            end: self.lexer.last_token_end(),
            file: self.file.clone(),
        }
    }

    fn src_of(&self, text: &str) -> Source {
        Source {
            file: self.file.clone(),
            start: self.lexer.location(),
            end: self.lexer.location().advance(text.chars().count()),
        }
    }

    fn unexpected(&self, token: Token, text: &str) -> Error {
        Error::new(
            ErrorType::Syntax,
            format!("Unexpected token {:?}({}).", token, text),
            self.src_of(text),
        )
    }

    fn parse_directives(
        &mut self,
        chart: &mut Chart,
        pending: &mut Vec<JournalEntry>,
    ) -> Result<(), Error> {
        while !self.lexer.eof() {
            let (token, text) = self.lexer.peek()?;
            match token {
                DATE => self.parse_date(chart)?,
                NUMBER => self.parse_journal_entry(pending)?,
                Token::Directive => self.parse_directive(text, chart, pending)?,
                _ => return Err(self.unexpected(token, text)),
            }
        }
        if let Some((date, start)) = self.date {
            return Err(Error::new(
                ErrorType::Syntax,
                format!("Date {} has no postings.", date),
                self.src_from(start),
            ));
        }
        Ok(())
    }

    fn parse_date(&mut self, chart: &mut Chart) -> Result<(), Error> {
        let start = self.lexer.location();
        let date_str = self.lexer.take(DATE)?;
        if let Some((date, _)) = self.date {
            return Err(Error::new(
                ErrorType::Syntax,
                format!("Expect postings after {}, found date {}.", date, date_str),
                self.src_from(start),
            ));
        }
        let date = date_str.parse::<Date>().map_err(|_| {
            Error::new(
                ErrorType::Syntax,
                format!("Invalid date: {}.", date_str),
                self.src_from(start),
            )
        })?;
        chart.start_date.get_or_insert(date);
        self.date = Some((date, start));
        Ok(())
    }

    fn parse_directive(
        &mut self,
        text: &str,
        chart: &mut Chart,
        pending: &mut Vec<JournalEntry>,
    ) -> Result<(), Error> {
        let start = self.lexer.location();
        let directive = Directive::lookup(text).ok_or_else(|| {
            Error::new(
                ErrorType::Syntax,
                format!("Unknown directive `{}`.", text.trim_end()),
                self.src_of(text.trim_end()),
            )
        })?;
        self.lexer.consume();
        match directive {
            Directive::OpenLedger => self.parse_open_ledger(start, chart),
            Directive::UseAccount => self.parse_use_account(start),
            Directive::Include => self.parse_include(start, chart, pending),
            Directive::Journal => self.parse_journal(start, chart, pending),
        }
    }

    fn parse_open_ledger(&mut self, start: Location, chart: &mut Chart) -> Result<(), Error> {
        if self.scope == Scope::Journal {
            return Err(Error::new(
                ErrorType::Syntax,
                "Cannot open ledger inside a journal.",
                self.src_from(start),
            ));
        }
        if chart.src.is_some() || !chart.accounts.is_empty() {
            return Err(Error::new(
                ErrorType::Syntax,
                "Cannot reopen ledger.",
                self.src_from(start),
            ));
        }
        let entries = self.parse_entries()?;
        for (entry, category) in entries {
            let category = category.ok_or_else(|| {
                Error::new(
                    ErrorType::Syntax,
                    format!("Account {} has no known category.", entry.account),
                    entry.src.clone(),
                )
            })?;
            if let Some(existing) = chart.accounts.iter().find(|a| a.name == entry.account) {
                return Err(Error::new(
                    ErrorType::Duplicate,
                    format!("Account {} has been opened at {}.", entry.account, existing.src),
                    entry.src,
                ));
            }
            chart
                .accounts
                .push(Account::open(entry.account, category, entry.amount, entry.src));
        }
        debug!("Opened {} accounts in {}", chart.accounts.len(), self.file);
        chart.src = Some(self.src_from(start));
        Ok(())
    }

    fn parse_use_account(&mut self, start: Location) -> Result<(), Error> {
        let account = self.lexer.take(Token::Account)?;
        self.contra = Some((account.to_string(), self.src_from(start)));
        Ok(())
    }

    fn resolve(&self, path_str: &str) -> PathBuf {
        let path = Path::new(path_str);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            match Path::new(self.file.as_str()).parent() {
                Some(dir) => dir.join(path),
                None => path.to_path_buf(),
            }
        }
    }

    fn parse_include(
        &mut self,
        start: Location,
        chart: &mut Chart,
        pending: &mut Vec<JournalEntry>,
    ) -> Result<(), Error> {
        let path = self.parse_string()?;
        let full_path = self.resolve(&path);
        let src = self.src_from(start);
        parse_file(self.loader, &full_path, src, self.scope, chart, pending)
    }

    fn parse_journal(
        &mut self,
        start: Location,
        chart: &mut Chart,
        pending: &mut Vec<JournalEntry>,
    ) -> Result<(), Error> {
        let path = self.parse_string()?;
        let full_path = self.resolve(&path);
        let src = self.src_from(start);
        let mut journal = Vec::new();
        parse_file(
            self.loader,
            &full_path,
            src,
            Scope::Journal,
            chart,
            &mut journal,
        )?;
        debug!(
            "Journal {} contributed {} entries",
            full_path.display(),
            journal.len()
        );
        pending.extend(journal);
        Ok(())
    }

    #[inline]
    fn unquote(input: &str) -> String {
        let mut chars = input.chars();
        chars.next();
        chars.next_back();
        let mut result = String::with_capacity(input.len());
        while let Some(c) = chars.next() {
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    result.push(escaped);
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    fn parse_string(&mut self) -> Result<String, Error> {
        let quoted_str = self.lexer.take(Token::String)?;
        Ok(Self::unquote(quoted_str))
    }

    fn parse_entries(&mut self) -> Result<Vec<(Entry, Option<Category>)>, Error> {
        let mut entries = Vec::new();
        while self.lexer.lookahead() == Some(NUMBER) {
            entries.push(self.parse_entry()?);
        }
        Ok(entries)
    }

    /// Parses `NUMBER ACCOUNT`. The amount lands on the natural side of the
    /// account, or on the debit side when the name has no known category.
    /// Such an account can never be opened, so the checker rejects it.
    fn parse_entry(&mut self) -> Result<(Entry, Option<Category>), Error> {
        let start = self.lexer.location();
        let num_str = self.lexer.take(NUMBER)?;
        let number = parse_amount(num_str, &self.src_from(start))?;
        let account = self.lexer.take(Token::Account)?;
        let category = Category::of(account);
        let side = category.map_or(Side::Debit, Category::natural_side);
        let entry = Entry {
            account: account.to_string(),
            amount: Amount::on_side(number, side),
            src: self.src_from(start),
        };
        Ok((entry, category))
    }

    fn parse_journal_entry(&mut self, pending: &mut Vec<JournalEntry>) -> Result<(), Error> {
        let (date, start) = match self.date.take() {
            Some(current) => current,
            None => {
                let (_, text) = self.lexer.peek()?;
                return Err(Error::new(
                    ErrorType::Syntax,
                    "Postings without a date.",
                    self.src_of(text),
                ));
            }
        };
        let legs: Vec<Entry> = self
            .parse_entries()?
            .into_iter()
            .map(|(entry, _)| entry)
            .collect();
        let src = self.src_from(start);
        match &self.contra {
            Some((account, contra_src)) => {
                for entry in legs {
                    let contra = Entry {
                        account: account.clone(),
                        amount: entry.amount.opposite(),
                        src: contra_src.clone(),
                    };
                    let journal_entry = JournalEntry {
                        date,
                        legs: vec![entry, contra],
                        src: src.clone(),
                    };
                    push_pending(pending, journal_entry)?;
                }
            }
            None => push_pending(pending, JournalEntry { date, legs, src })?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART: &str = "\
open ledger
  100.00 ASSETS/Cash
  100.00 CAPITAL/Equity
  0 INCOMES/Sales
  0 EXPENSES/Rent
";

    fn parse_files(files: &[(&str, &str)]) -> Result<LedgerDraft, Error> {
        let loader: HashMap<PathBuf, String> = files
            .iter()
            .map(|(path, text)| (PathBuf::from(path), text.to_string()))
            .collect();
        Parser::parse_with(files[0].0, &loader)
    }

    fn parse_one(text: &str) -> Result<LedgerDraft, Error> {
        parse_files(&[("main.ledger", text)])
    }

    fn dates(draft: &LedgerDraft) -> Vec<String> {
        draft.pending.iter().map(|e| e.date.to_string()).collect()
    }

    #[test]
    fn opens_accounts_on_natural_sides() {
        let draft = parse_one("open ledger\n  100.00 ASSETS/Cash\n  -40.00 LIABILITIES/Card\n  60 CAPITAL/Equity\n").unwrap();
        let accounts = &draft.chart.accounts;
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].name(), "ASSETS/Cash");
        assert_eq!(accounts[0].category(), Category::Assets);
        assert_eq!(
            accounts[0].opening_balance(),
            Amount {
                value: 10_000,
                side: Side::Debit
            }
        );
        assert_eq!(
            accounts[1].opening_balance(),
            Amount {
                value: 4_000,
                side: Side::Debit
            }
        );
        assert_eq!(accounts[2].opening_balance().signed(), -6_000);
        assert!(draft.chart.src.is_some());
        assert!(draft.pending.is_empty());
        assert_eq!(draft.end_date, None);
    }

    #[test]
    fn collects_one_entry_per_postings_block() {
        let text = format!(
            "{}\n2020-01-02\n  25.00 ASSETS/Cash\n  25.00 INCOMES/Sales\n\n2020-01-03 ; rent\n  10.00 EXPENSES/Rent\n  -10.00 ASSETS/Cash\n",
            CHART
        );
        let draft = parse_one(&text).unwrap();
        assert_eq!(dates(&draft), vec!["2020-01-02", "2020-01-03"]);
        let rent = &draft.pending[1];
        assert_eq!(rent.legs.len(), 2);
        assert_eq!(rent.legs[1].account, "ASSETS/Cash");
        assert_eq!(
            rent.legs[1].amount,
            Amount {
                value: 1_000,
                side: Side::Credit
            }
        );
        assert_eq!(draft.pending[0].src.start, Location::from((7, 1)));
        assert_eq!(rent.src.start, Location::from((11, 1)));
        assert_eq!(draft.chart.start_date, Some(Date::from_ymd_opt(2020, 1, 2).unwrap()));
        assert_eq!(draft.end_date, Some(Date::from_ymd_opt(2020, 1, 3).unwrap()));
    }

    #[test]
    fn use_account_expands_every_leg() {
        let text = format!(
            "{}use account CAPITAL/Equity\n2020-01-04\n  50.00 EXPENSES/Rent\n  20.00 ASSETS/Cash\n",
            CHART
        );
        let draft = parse_one(&text).unwrap();
        assert_eq!(draft.pending.len(), 2);
        let rent = &draft.pending[0];
        assert_eq!(rent.legs.len(), 2);
        assert_eq!(rent.legs[0].account, "EXPENSES/Rent");
        assert_eq!(
            rent.legs[0].amount,
            Amount {
                value: 5_000,
                side: Side::Debit
            }
        );
        assert_eq!(rent.legs[1].account, "CAPITAL/Equity");
        assert_eq!(
            rent.legs[1].amount,
            Amount {
                value: 5_000,
                side: Side::Credit
            }
        );
        assert_eq!(draft.pending[1].legs[0].account, "ASSETS/Cash");
        assert_eq!(draft.pending[1].legs[1].amount.signed(), -2_000);
    }

    #[test]
    fn rejects_postings_out_of_sequence() {
        let text = format!(
            "{}2020-02-01\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\n2020-01-31\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\n",
            CHART
        );
        let error = parse_one(&text).unwrap_err();
        assert_eq!(error.r#type, ErrorType::Sequence);
        assert_eq!(error.msg, "Postings not in sequence: 2020-02-01 > 2020-01-31.");
        assert_eq!(error.src.start, Location::from((9, 1)));
    }

    #[test]
    fn same_day_postings_stay_in_order() {
        let text = format!(
            "{}2020-02-01\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\n2020-02-01\n  2.00 ASSETS/Cash\n  2.00 INCOMES/Sales\n",
            CHART
        );
        let draft = parse_one(&text).unwrap();
        assert_eq!(draft.pending[0].legs[0].amount.value, 100);
        assert_eq!(draft.pending[1].legs[0].amount.value, 200);
    }

    #[test]
    fn push_pending_accepts_non_decreasing_dates() {
        let src = Source::start_of(Arc::new("main.ledger".to_string()));
        let entry = |day| JournalEntry {
            date: Date::from_ymd_opt(2021, 3, day).unwrap(),
            legs: vec![],
            src: src.clone(),
        };
        let mut pending = Vec::new();
        for day in [1, 1, 2, 5, 5, 9].iter() {
            push_pending(&mut pending, entry(*day)).unwrap();
        }
        let error = push_pending(&mut pending, entry(8)).unwrap_err();
        assert_eq!(error.r#type, ErrorType::Sequence);
        assert_eq!(pending.len(), 6);
    }

    #[test]
    fn postings_need_a_date() {
        let text = format!("{}use account CAPITAL/Equity\n5.00 ASSETS/Cash\n", CHART);
        let error = parse_one(&text).unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert_eq!(error.msg, "Postings without a date.");
        assert_eq!(error.src.start, Location::from((7, 1)));
    }

    #[test]
    fn date_needs_postings() {
        let trailing = parse_one(&format!("{}2020-01-01\n", CHART)).unwrap_err();
        assert_eq!(trailing.r#type, ErrorType::Syntax);
        assert_eq!(trailing.msg, "Date 2020-01-01 has no postings.");

        let doubled = parse_one(&format!("{}2020-01-01\n2020-01-02\n", CHART)).unwrap_err();
        assert_eq!(doubled.r#type, ErrorType::Syntax);
        assert!(doubled.msg.contains("found date 2020-01-02"));
    }

    #[test]
    fn rejects_invalid_dates() {
        let error = parse_one("2020-02-30\n  1.00 ASSETS/Cash\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert_eq!(error.msg, "Invalid date: 2020-02-30.");
    }

    #[test]
    fn rejects_unknown_directive() {
        let error = parse_one("close ledger\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert_eq!(error.msg, "Unknown directive `close ledger`.");
        assert_eq!(error.src.end, Location::from((1, 13)));
    }

    #[test]
    fn rejects_stray_tokens() {
        let error = parse_one("ASSETS/Cash\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        let error = parse_one("use account \"CAPITAL/Equity\"\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert!(error.msg.starts_with("Expect Account"));
    }

    #[test]
    fn cannot_reopen_ledger() {
        let text = format!("{}open ledger\n  1.00 ASSETS/Bank\n  1.00 CAPITAL/Bank\n", CHART);
        let error = parse_one(&text).unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert_eq!(error.msg, "Cannot reopen ledger.");

        let error = parse_one("open ledger\nopen ledger\n  1.00 ASSETS/Bank\n").unwrap_err();
        assert_eq!(error.msg, "Cannot reopen ledger.");
        assert_eq!(error.src.start, Location::from((2, 1)));
    }

    #[test]
    fn rejects_duplicate_and_uncategorized_accounts() {
        let error = parse_one("open ledger\n  1.00 ASSETS/Cash\n  1.00 ASSETS/Cash\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Duplicate);
        assert_eq!(error.src.start, Location::from((3, 3)));

        let error = parse_one("open ledger\n  1.00 EQUITY/Owner\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert_eq!(error.msg, "Account EQUITY/Owner has no known category.");

        let error = parse_one("open ledger\n  1.00 Cash\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
    }

    #[test]
    fn uncategorized_postings_wait_for_the_checker() {
        let text = format!(
            "{}2020-01-01\n  5.00 EQUITY/Owner\n  -5.00 ASSETS/Cash\n  1.00 Cash\n",
            CHART
        );
        let draft = parse_one(&text).unwrap();
        let legs = &draft.pending[0].legs;
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[0].account, "EQUITY/Owner");
        assert_eq!(legs[0].amount.signed(), 500);
        assert_eq!(legs[2].amount.signed(), 100);
    }

    #[test]
    fn lex_errors_propagate() {
        let error = parse_one("2020-01-01\n  1.5 ASSETS/Cash\n").unwrap_err();
        assert_eq!(error.r#type, ErrorType::Lex);
    }

    #[test]
    fn include_shares_pending_entries() {
        let main = format!(
            "include \"books/chart.ledger\"\n{}",
            "2020-03-01\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\ninclude \"books/march.ledger\"\n"
        );
        let draft = parse_files(&[
            ("main.ledger", &main),
            ("books/chart.ledger", CHART),
            (
                "books/march.ledger",
                "2020-03-02\n  2.00 ASSETS/Cash\n  2.00 INCOMES/Sales\n",
            ),
        ])
        .unwrap();
        assert_eq!(draft.chart.accounts.len(), 4);
        assert_eq!(dates(&draft), vec!["2020-03-01", "2020-03-02"]);
        assert_eq!(draft.pending[1].src.file.as_str(), "books/march.ledger");
    }

    #[test]
    fn include_is_sequence_checked_against_parent() {
        let error = parse_files(&[
            (
                "main.ledger",
                "2020-03-01\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\ninclude \"feb.ledger\"\n",
            ),
            ("feb.ledger", "2020-02-01\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\n"),
        ])
        .unwrap_err();
        assert_eq!(error.r#type, ErrorType::Sequence);
        assert_eq!(error.src.file.as_str(), "feb.ledger");
    }

    #[test]
    fn journal_keeps_its_own_sequence() {
        let main = format!(
            "{}2020-03-01\n  1.00 ASSETS/Cash\n  1.00 INCOMES/Sales\njournal \"feb.ledger\"\n2020-03-05\n  3.00 ASSETS/Cash\n  3.00 INCOMES/Sales\n",
            CHART
        );
        let draft = parse_files(&[
            ("main.ledger", &main),
            (
                "feb.ledger",
                "use account INCOMES/Sales\n2020-02-01\n  2.00 ASSETS/Cash\n2020-02-10\n  4.00 ASSETS/Cash\n",
            ),
        ])
        .unwrap();
        assert_eq!(
            dates(&draft),
            vec!["2020-02-01", "2020-02-10", "2020-03-01", "2020-03-05"]
        );
        assert_eq!(draft.chart.start_date, Some(Date::from_ymd_opt(2020, 3, 1).unwrap()));
        assert_eq!(draft.end_date, Some(Date::from_ymd_opt(2020, 3, 5).unwrap()));
    }

    #[test]
    fn use_account_does_not_leak_out_of_a_file() {
        let main = format!(
            "{}journal \"cash.ledger\"\n2020-03-01\n  1.00 ASSETS/Cash\n",
            CHART
        );
        let draft = parse_files(&[
            ("main.ledger", &main),
            ("cash.ledger", "use account INCOMES/Sales\n2020-02-01\n  2.00 ASSETS/Cash\n"),
        ])
        .unwrap();
        assert_eq!(draft.pending[0].legs.len(), 2);
        assert_eq!(draft.pending[1].legs.len(), 1);
    }

    #[test]
    fn journal_cannot_open_accounts() {
        let error = parse_files(&[
            ("main.ledger", "journal \"chart.ledger\"\n"),
            ("chart.ledger", CHART),
        ])
        .unwrap_err();
        assert_eq!(error.r#type, ErrorType::Syntax);
        assert_eq!(error.msg, "Cannot open ledger inside a journal.");
        assert_eq!(error.src.file.as_str(), "chart.ledger");
    }

    #[test]
    fn missing_file_points_at_directive() {
        let error = parse_files(&[("main.ledger", "\n  include \"missing.ledger\"\n")]).unwrap_err();
        assert_eq!(error.r#type, ErrorType::Io);
        assert_eq!(error.src.file.as_str(), "main.ledger");
        assert_eq!(error.src.start, Location::from((2, 3)));
        assert!(error.msg.starts_with("Couldn't read missing.ledger"));
    }

    #[test]
    fn unquotes_escapes() {
        assert_eq!(Parser::unquote(r#""a \"b\" \\c""#), r#"a "b" \c"#);
        assert_eq!(Parser::unquote(r#""""#), "");
    }
}
