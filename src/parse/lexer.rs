use super::Token;
use crate::{Error, ErrorType, Location, Source, SrcFile};
use logos::{Lexer as LogosLexer, Logos};
use std::borrow::Cow;

/// Turns `\r\n` and lone `\r` line endings into `\n`.
pub fn normalize_newlines(src: &str) -> Cow<'_, str> {
    if src.contains('\r') {
        Cow::Owned(src.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(src)
    }
}

/// A token stream over one source file which skips white space and
/// comments and keeps track of line and column numbers.
pub struct Lexer<'source> {
    llex: LogosLexer<'source, Token>,
    location: Location,
    last_token_end: Location,
    peeked_token: Option<(Token, &'source str)>,
    peeked_offset: usize,
    file: SrcFile,
}

impl<'source> Lexer<'source> {
    pub fn new(src: &'source str, file: SrcFile) -> Self {
        let mut lexer = Lexer {
            llex: Token::lexer(src),
            location: (1, 1).into(),
            last_token_end: (1, 1).into(),
            peeked_token: None,
            peeked_offset: 0,
            file,
        };
        lexer.skip_comment_space();
        lexer
    }

    pub fn last_token_end(&self) -> Location {
        self.last_token_end
    }

    pub fn location(&self) -> Location {
        self.location
    }

    fn skip_comment_space(&mut self) {
        while let Some(token) = self.llex.next() {
            match token {
                Token::Comment => {}
                Token::NewLine => {
                    self.location.col = 1;
                    self.location.line += 1;
                }
                Token::WhiteSpace => self.location.col += self.llex.slice().chars().count(),
                _ => {
                    self.peeked_token = Some((token, self.llex.slice()));
                    self.peeked_offset = self.llex.span().start;
                    return;
                }
            }
        }
    }

    pub fn eof(&self) -> bool {
        self.peeked_token.is_none()
    }

    /// The kind of the next token, if there is one.
    pub fn lookahead(&self) -> Option<Token> {
        self.peeked_token.map(|(token, _)| token)
    }

    fn src_here(&self, width: usize) -> Source {
        Source {
            file: self.file.clone(),
            start: self.location,
            end: self.location.advance(width),
        }
    }

    fn lex_error(&self, text: &str) -> Error {
        let rest = &self.llex.source()[self.peeked_offset..];
        let line = rest.split('\n').next().unwrap_or(rest);
        let msg = match text.chars().next() {
            Some('"') => format!("Unterminated string: {}", line),
            Some(c) if c == '-' || c.is_ascii_digit() => {
                format!("Malformed number or date: `{}`.", text)
            }
            Some(c) => format!("Unrecognized character `{}` in `{}`.", c, line),
            None => "Unrecognized input.".to_string(),
        };
        Error::new(ErrorType::Lex, msg, self.src_here(text.chars().count()))
    }

    pub fn peek(&self) -> Result<(Token, &'source str), Error> {
        match self.peeked_token {
            None => Err(Error::new(
                ErrorType::Syntax,
                "Unexpected end of file.",
                self.src_here(0),
            )),
            Some((Token::Error, text)) => Err(self.lex_error(text)),
            Some(peeked) => Ok(peeked),
        }
    }

    #[inline]
    pub fn consume(&mut self) {
        if let Some((_, text)) = self.peeked_token.take() {
            self.location.col += text.chars().count();
            self.last_token_end = self.location;
            self.skip_comment_space();
        }
    }

    pub fn next(&mut self) -> Result<(Token, &'source str), Error> {
        let peeked = self.peek()?;
        self.consume();
        Ok(peeked)
    }

    pub fn take(&mut self, expected: Token) -> Result<&'source str, Error> {
        let (token, text) = self.peek()?;
        if token != expected {
            Err(Error::new(
                ErrorType::Syntax,
                format!("Expect {:?}, found {:?}({:?}).", expected, &token, text),
                self.src_here(text.chars().count()),
            ))
        } else {
            self.consume();
            Ok(text)
        }
    }
}
