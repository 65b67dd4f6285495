//! Pull parser turning raw token text into `Token` trees

use std::iter::Peekable;
use std::str::Chars;

use crate::Token;
use thiserror::Error;

/// Hard bound on group nesting. Malformed input nested deeper than this is
/// rejected instead of growing the parse stack without limit.
pub const MAX_DEPTH: usize = 256;

/// A malformed-input failure, carrying the offending source position.
///
/// Parse errors are always surfaced to the caller; a corrupt file must never
/// produce a partially built tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected ')' with no open group at line {line}, column {column}")]
    UnbalancedClose { line: usize, column: usize },
    #[error("end of input inside the group opened at line {line}, column {column}")]
    UnterminatedGroup { line: usize, column: usize },
    #[error("nesting exceeds {limit} levels in the group opened at line {line}, column {column}")]
    TooDeep {
        line: usize,
        column: usize,
        limit: usize,
    },
}

/// Reads top-level tokens out of a source string, one at a time.
///
/// Atoms are separated by whitespace; a `(` opens a group whose first atom
/// names the group and whose remaining items become children. `next_token`
/// advances an internal cursor, so a file holding several root tokens is
/// consumed by calling it until `Ok(None)`.
pub struct TokenReader<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> TokenReader<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    /// Next complete top-level token, or `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace();
        match self.chars.peek() {
            None => Ok(None),
            Some('(') => self.read_group(1).map(Some),
            Some(')') => Err(ParseError::UnbalancedClose {
                line: self.line,
                column: self.column,
            }),
            Some(_) => Ok(Some(Token::new(self.read_atom()))),
        }
    }

    fn read_group(&mut self, depth: usize) -> Result<Token, ParseError> {
        let (open_line, open_column) = (self.line, self.column);
        self.bump();
        if depth > MAX_DEPTH {
            return Err(ParseError::TooDeep {
                line: open_line,
                column: open_column,
                limit: MAX_DEPTH,
            });
        }
        // The head atom names the group; a group whose first item is nested
        // (or that is empty) gets an empty name.
        let mut token: Option<Token> = None;
        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                None => {
                    return Err(ParseError::UnterminatedGroup {
                        line: open_line,
                        column: open_column,
                    })
                }
                Some(')') => {
                    self.bump();
                    return Ok(token.unwrap_or_default());
                }
                Some('(') => {
                    let child = self.read_group(depth + 1)?;
                    token.get_or_insert_with(Token::default).push(child);
                }
                Some(_) => {
                    let atom = self.read_atom();
                    match token.as_mut() {
                        None => token = Some(Token::new(atom)),
                        Some(t) => t.push(Token::new(atom)),
                    }
                }
            }
        }
    }

    fn read_atom(&mut self) -> String {
        let mut atom = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == '(' || c == ')' {
                break;
            }
            atom.push(c);
            self.bump();
        }
        atom
    }

    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.bump();
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}

/// Parse every top-level token in `source`.
pub fn parse_all(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut reader = TokenReader::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = reader.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}
