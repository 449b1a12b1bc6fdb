//! # tally
//!
//! tally checks plain-text double-entry ledgers: a chart of accounts opened
//! with `open ledger`, dated journal entries, and `include`/`journal` files
//! merged into one set of books.
#![doc(html_root_url = "https://docs.rs/tally/0.1.0")]

mod ledger;
pub mod parse;
pub mod report;
pub mod utils;

pub use ledger::*;
