use logos::{Lexer, Logos};

/// What a run of digits, `-`, `.` and `,` turned out to be.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Numeric {
    /// `YYYY-MM-DD`
    Date,
    /// `-?[0-9,]+(\.[0-9]{2})?`
    Number,
}

fn is_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn is_number(text: &str) -> bool {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    integer.bytes().any(|b| b.is_ascii_digit())
        && integer.bytes().all(|b| b.is_ascii_digit() || b == b',')
        && fraction.map_or(true, |f| f.len() == 2 && f.bytes().all(|b| b.is_ascii_digit()))
}

fn numeric(lex: &mut Lexer<Token>) -> Option<Numeric> {
    let text = lex.slice();
    if is_date(text) {
        Some(Numeric::Date)
    } else if is_number(text) {
        Some(Numeric::Number)
    } else {
        None
    }
}

#[derive(Debug, PartialEq, Eq, Logos, Clone, Copy)]
pub enum Token {
    #[regex(r"[ \t\f\v]+")]
    WhiteSpace,

    #[token("\n")]
    NewLine,

    #[regex(r";[^\n]*")]
    Comment,

    /// Lowercase words, possibly several separated by spaces, like
    /// `open ledger`. The slice keeps trailing spaces.
    #[regex(r"[a-z][a-z ]*")]
    Directive,

    #[regex(r"[0-9\-][0-9.,\-]*", numeric)]
    Numeric(Numeric),

    #[regex(r"[A-Z][^ \t\f\v\n;]*")]
    Account,

    /// A double quoted string on a single line, with `\"` and `\\` escapes.
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[error]
    Error,
}

pub const DATE: Token = Token::Numeric(Numeric::Date);
pub const NUMBER: Token = Token::Numeric(Numeric::Number);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    OpenLedger,
    UseAccount,
    Include,
    Journal,
}

const DIRECTIVES: [(&str, Directive); 4] = [
    ("open ledger", Directive::OpenLedger),
    ("use account", Directive::UseAccount),
    ("include", Directive::Include),
    ("journal", Directive::Journal),
];

impl Directive {
    /// Finds the directive spelled by a [`Token::Directive`] slice.
    pub fn lookup(text: &str) -> Option<Directive> {
        let text = text.trim_end();
        DIRECTIVES
            .iter()
            .find(|(keyword, _)| *keyword == text)
            .map(|(_, directive)| *directive)
    }
}
