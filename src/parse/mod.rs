mod checker;
mod lexer;
mod parser;
mod token;

pub use lexer::{normalize_newlines, Lexer};
pub use parser::*;
pub use token::{Directive, Numeric, Token, DATE, NUMBER};
