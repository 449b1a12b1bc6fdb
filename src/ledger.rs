use crate::parse::{FsLoader, Loader, Parser};
pub use chrono::NaiveDate as Date;
use getset::{CopyGetters, Getters};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::convert::From;
use std::fmt;
use std::sync::Arc;

/// Representing a location, line number and column number, in a source file.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    pub fn advance(&self, width: usize) -> Self {
        Location {
            col: self.col + width,
            line: self.line,
        }
    }
}

impl From<(usize, usize)> for Location {
    fn from(tuple: (usize, usize)) -> Self {
        Location {
            line: tuple.0,
            col: tuple.1,
        }
    }
}

/// A string wrapped in [`Arc`](std::sync::Arc)
/// representing the source file path.
pub type SrcFile = Arc<String>;

/// Represents a range in a source file. Used to locate errors across an
/// include graph, and to remember where entries and accounts came from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Source {
    pub file: SrcFile,
    pub start: Location,
    pub end: Location,
}

impl Source {
    /// The very first position of `file`.
    pub fn start_of(file: SrcFile) -> Self {
        Source {
            file,
            start: (1, 1).into(),
            end: (1, 1).into(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.start.line, self.start.col)
    }
}

/// Kinds of errors that `tally` encounters while turning input files into a
/// [`Ledger`]. Every one of them is fatal.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// IO error, e.g., an included file cannot be read.
    Io,
    /// Unrecognized character, malformed number or date, unterminated string.
    Lex,
    /// Unexpected token, unknown directive, or a directive used where it is
    /// not allowed.
    Syntax,
    /// A journal entry is dated before the entry preceding it.
    Sequence,
    /// The same account is opened twice.
    Duplicate,
    /// A posting refers to an account that was never opened.
    Account,
    /// The legs of a journal entry do not sum to zero.
    NotBalanced,
    /// Opening or closing balances of the whole chart do not sum to zero.
    Mismatch,
}

/// Contains the full information of an error.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Error {
    pub msg: String,
    pub src: Source,
    pub r#type: ErrorType,
}

impl Error {
    pub fn new(r#type: ErrorType, msg: impl Into<String>, src: Source) -> Self {
        Error {
            msg: msg.into(),
            src,
            r#type,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} error: {}\n  {}", self.r#type, self.msg, self.src)
    }
}

impl std::error::Error for Error {}

/// The side of a ledger an amount sits on.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Debit,
    Credit,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Debit => Side::Credit,
            Side::Credit => Side::Debit,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Debit => write!(f, "D"),
            Side::Credit => write!(f, "C"),
        }
    }
}

/// A non-negative number of minor currency units plus the side it sits on.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Amount {
    pub value: i64,
    pub side: Side,
}

impl Amount {
    /// Places `number` on `side`. A negative number ends up on the opposite
    /// side with its magnitude. `i64::MIN` is clamped to `-i64::MAX`.
    pub fn on_side(number: i64, side: Side) -> Self {
        Amount {
            value: number.max(-i64::MAX),
            side,
        }
        .to_side(side)
    }

    /// Like [`Amount::from_signed`], for sums that may not fit in an `i64`.
    pub fn checked_from_signed(signed: i128) -> Option<Self> {
        let value = i64::try_from(signed.unsigned_abs()).ok()?;
        let side = if signed < 0 { Side::Credit } else { Side::Debit };
        Some(Amount { value, side })
    }

    /// Debit for non-negative signed values, credit otherwise.
    pub fn from_signed(signed: i64) -> Self {
        Amount::on_side(signed, Side::Debit)
    }

    /// Debits count positive, credits negative.
    pub fn signed(&self) -> i64 {
        match self.side {
            Side::Debit => self.value,
            Side::Credit => -self.value,
        }
    }

    /// Re-expresses the amount on `side`, flipping to the opposite side when
    /// the value would otherwise be negative.
    pub fn to_side(&self, side: Side) -> Amount {
        let value = match side {
            Side::Debit => self.signed(),
            Side::Credit => -self.signed(),
        };
        if value < 0 {
            Amount {
                value: -value,
                side: side.opposite(),
            }
        } else {
            Amount { value, side }
        }
    }

    /// The same magnitude on the other side.
    pub fn opposite(&self) -> Amount {
        Amount {
            value: self.value,
            side: self.side.opposite(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", crate::utils::format_amount(self.value), self.side)
    }
}

/// The top level classification of an account, taken from the prefix of its
/// name.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Assets,
    Liabilities,
    Capital,
    Income,
    Expenses,
}

impl Category {
    /// Derives the category from the part of `account` before the first `/`.
    /// Returns `None` when there is no `/` or the prefix is unknown.
    pub fn of(account: &str) -> Option<Category> {
        let (prefix, _) = account.split_once('/')?;
        match prefix.to_uppercase().as_str() {
            "ASSETS" => Some(Category::Assets),
            "LIABILITIES" => Some(Category::Liabilities),
            "CAPITAL" => Some(Category::Capital),
            "INCOMES" | "INCOME" => Some(Category::Income),
            "EXPENSES" => Some(Category::Expenses),
            _ => None,
        }
    }

    /// The side on which accounts of this category increase.
    pub fn natural_side(self) -> Side {
        match self {
            Category::Assets | Category::Expenses => Side::Debit,
            Category::Capital | Category::Liabilities | Category::Income => Side::Credit,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Assets => "ASSETS",
            Category::Liabilities => "LIABILITIES",
            Category::Capital => "CAPITAL",
            Category::Income => "INCOMES",
            Category::Expenses => "EXPENSES",
        };
        write!(f, "{}", name)
    }
}

/// One leg of a [`JournalEntry`], like `25.00 ASSETS/Cash`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub account: String,
    pub amount: Amount,
    pub src: Source,
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>14} {}", self.amount.to_string(), self.account)
    }
}

/// A dated group of legs whose signed amounts sum to zero once checked.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct JournalEntry {
    /// Returns the entry date.
    #[getset(get_copy = "pub")]
    pub(crate) date: Date,

    /// Returns the legs in source order.
    #[getset(get = "pub")]
    pub(crate) legs: Vec<Entry>,

    /// Returns the source of this entry.
    #[getset(get = "pub")]
    pub(crate) src: Source,
}

impl fmt::Display for JournalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date)?;
        for leg in &self.legs {
            write!(f, "\n  {}", leg)?;
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Account {
    /// Returns the full account name, e.g. `ASSETS/Cash`.
    #[getset(get = "pub")]
    pub(crate) name: String,

    #[getset(get_copy = "pub")]
    pub(crate) category: Category,

    /// Returns the opening balance on the natural side of the account.
    #[getset(get_copy = "pub")]
    pub(crate) opening_balance: Amount,

    /// Returns the opening balance plus every posted leg of this account, on
    /// the natural side of the account.
    #[getset(get_copy = "pub")]
    pub(crate) closing_balance: Amount,

    /// Returns the journal entries touching this account, in date order.
    /// An entry appears once even if it has several legs on this account.
    #[getset(get = "pub")]
    pub(crate) history: Vec<JournalEntry>,

    /// Returns where the account was opened.
    #[getset(get = "pub")]
    pub(crate) src: Source,
}

impl Account {
    pub(crate) fn open(name: String, category: Category, opening: Amount, src: Source) -> Self {
        let opening_balance = opening.to_side(category.natural_side());
        Account {
            name,
            category,
            opening_balance,
            closing_balance: opening_balance,
            history: Vec::new(),
            src,
        }
    }
}

/// A sealed ledger: every journal entry has been validated and posted into
/// the history of the accounts it touches.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Ledger {
    /// Returns the first date found while parsing.
    #[getset(get_copy = "pub")]
    pub(crate) start_date: Option<Date>,

    /// Returns the date of the latest journal entry.
    #[getset(get_copy = "pub")]
    pub(crate) end_date: Option<Date>,

    /// Returns the accounts in the order they were opened.
    #[getset(get = "pub")]
    pub(crate) accounts: Vec<Account>,
}

impl Ledger {
    /// Parses `path` and the files it includes, then checks and posts every
    /// journal entry.
    pub fn from_file(path: &str) -> Result<Self, Error> {
        Self::from_loader(path, &FsLoader)
    }

    /// Same as [`Ledger::from_file`], reading files through `loader`.
    pub fn from_loader(path: &str, loader: &dyn Loader) -> Result<Self, Error> {
        Parser::parse_with(path, loader)?.into_ledger()
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.name == name)
    }
}
