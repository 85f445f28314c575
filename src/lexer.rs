//! Indentation-aware lexer.
//!
//! Converts raw source text into a token stream, synthesizing
//! `Indent`/`Dedent`/`Newline`/`Eof` tokens from column structure and
//! end-of-file padding. Statements are `Newline`-separated and block
//! structure is delivered through balanced `Indent`/`Dedent` tokens, so the
//! parser never has to look at whitespace.

use std::collections::VecDeque;
use std::mem;

pub mod error;
pub mod token;

pub use error::{LexError, LexResult};
pub use token::Token;

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Last token handed out; `Newline` before anything has been read, so
    /// the first line is treated as a line start.
    current: Token,
    /// Open indentation levels at the current position.
    indent_depth: usize,
    /// Queued tokens from multi-token emissions (indent bursts, EOF padding).
    pending: VecDeque<Token>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `input` and reads the first token, so
    /// `current_token` is valid immediately.
    pub fn new(input: &'a str) -> LexResult<Self> {
        let mut lexer = Self {
            input,
            pos: 0,
            current: Token::Newline,
            indent_depth: 0,
            pending: VecDeque::new(),
        };
        lexer.next_token()?;
        Ok(lexer)
    }

    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Advances to the next token and returns it.
    pub fn next_token(&mut self) -> LexResult<&Token> {
        let token = if let Some(queued) = self.pending.pop_front() {
            queued
        } else {
            self.skip_insignificant();
            self.read_token()?
        };
        self.current = token;
        Ok(&self.current)
    }

    /// Returns the current token if it equals `expected`, payload included.
    pub fn expect(&self, expected: &Token) -> LexResult<&Token> {
        if self.current == *expected {
            Ok(&self.current)
        } else {
            Err(mismatch(expected, &self.current))
        }
    }

    /// Returns the current token if it has the same variant as `expected`,
    /// ignoring any payload.
    pub fn expect_kind(&self, expected: &Token) -> LexResult<&Token> {
        if mem::discriminant(&self.current) == mem::discriminant(expected) {
            Ok(&self.current)
        } else {
            Err(mismatch(expected, &self.current))
        }
    }

    /// Advances, then behaves like [`Lexer::expect`].
    pub fn expect_next(&mut self, expected: &Token) -> LexResult<&Token> {
        self.next_token()?;
        self.expect(expected)
    }

    /// Advances, then behaves like [`Lexer::expect_kind`].
    pub fn expect_next_kind(&mut self, expected: &Token) -> LexResult<&Token> {
        self.next_token()?;
        self.expect_kind(expected)
    }

    fn read_token(&mut self) -> LexResult<Token> {
        if self.at_end() {
            return Ok(self.read_eof());
        }
        if let Some(token) = self.read_indent_or_dedent() {
            return Ok(token);
        }
        if let Some(token) = self.read_number()? {
            return Ok(token);
        }
        if let Some(token) = self.read_string()? {
            return Ok(token);
        }
        if let Some(token) = self.read_word() {
            return Ok(token);
        }
        if let Some(token) = self.read_newline() {
            return Ok(token);
        }
        if self.at_end() {
            return Ok(self.read_eof());
        }
        if let Some(token) = self.read_operator() {
            return Ok(token);
        }
        match self.peek_char() {
            Some(character) => Err(LexError::UnexpectedCharacter {
                character,
                position: self.pos,
            }),
            None => Ok(self.read_eof()),
        }
    }

    /// Pads the end of input: drains open indentation levels, then makes sure
    /// the last statement is terminated by a `Newline`, then emits `Eof`.
    fn read_eof(&mut self) -> Token {
        if self.indent_depth > 0 {
            for _ in 1..self.indent_depth {
                self.pending.push_back(Token::Dedent);
            }
            self.pending.push_back(Token::Eof);
            self.indent_depth = 0;
            Token::Dedent
        } else if !matches!(self.current, Token::Newline | Token::Dedent | Token::Eof) {
            self.pending.push_back(Token::Eof);
            Token::Newline
        } else {
            Token::Eof
        }
    }

    /// Emits indentation changes at the start of a logical line. Changes of
    /// more than one level return the first token and queue the rest.
    fn read_indent_or_dedent(&mut self) -> Option<Token> {
        if !self.at_line_start() {
            return None;
        }
        let pairs = self.count_indent_pairs();
        if pairs > self.indent_depth {
            for _ in 1..(pairs - self.indent_depth) {
                self.pending.push_back(Token::Indent);
            }
            self.indent_depth = pairs;
            Some(Token::Indent)
        } else if pairs < self.indent_depth {
            for _ in 1..(self.indent_depth - pairs) {
                self.pending.push_back(Token::Dedent);
            }
            self.indent_depth = pairs;
            Some(Token::Dedent)
        } else {
            None
        }
    }

    fn read_number(&mut self) -> LexResult<Option<Token>> {
        if !self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        let start = self.pos;
        self.consume_while(|c| c.is_ascii_digit());
        let literal = &self.input[start..self.pos];
        let value = literal
            .parse::<i32>()
            .map_err(|_| LexError::InvalidNumberLiteral {
                literal: literal.to_string(),
                position: start,
            })?;
        Ok(Some(Token::Number(value)))
    }

    fn read_string(&mut self) -> LexResult<Option<Token>> {
        let quote = match self.peek_char() {
            Some(c @ ('\'' | '"')) => c,
            _ => return Ok(None),
        };
        let start = self.pos;
        self.consume_char();

        let mut value = String::new();
        loop {
            let Some(c) = self.consume_char() else {
                return Err(LexError::UnterminatedString { position: start });
            };
            if c == quote {
                break;
            }
            match c {
                '\\' => {
                    let Some(escape) = self.consume_char() else {
                        return Err(LexError::UnterminatedString { position: start });
                    };
                    let unescaped = match escape {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '"' => '"',
                        '\'' => '\'',
                        '\\' => '\\',
                        other => {
                            return Err(LexError::UnknownEscape {
                                escape: other,
                                position: self.pos - other.len_utf8(),
                            });
                        }
                    };
                    value.push(unescaped);
                }
                '\n' => return Err(LexError::UnterminatedString { position: start }),
                '\r' => return Err(LexError::UnexpectedLineBreak { position: self.pos - 1 }),
                other => value.push(other),
            }
        }
        Ok(Some(Token::String(value)))
    }

    fn read_word(&mut self) -> Option<Token> {
        if !self.peek_char().is_some_and(is_name_start) {
            return None;
        }
        let start = self.pos;
        self.consume_while(|c| is_name_start(c) || c.is_ascii_digit());
        let word = &self.input[start..self.pos];
        Some(Token::keyword(word).unwrap_or_else(|| Token::Id(word.to_string())))
    }

    /// Reads a statement terminator. Consecutive `Newline` tokens are never
    /// emitted; blank lines are consumed by the skip phase instead.
    fn read_newline(&mut self) -> Option<Token> {
        if self.peek_char() == Some('\n') && !matches!(self.current, Token::Newline) {
            self.consume_char();
            Some(Token::Newline)
        } else {
            None
        }
    }

    /// Reads a punctuation symbol, greedily combining it with the following
    /// character when the pair spells a comparison operator.
    fn read_operator(&mut self) -> Option<Token> {
        let first = match self.peek_char() {
            Some(c) if is_symbol(c) => c,
            _ => return None,
        };
        self.consume_char();

        if let Some(second) = self.peek_char()
            && is_symbol(second)
            && let Some(token) = Token::two_char_operator(first, second)
        {
            self.consume_char();
            return Some(token);
        }
        Some(Token::Char(first))
    }

    /// Consumes everything between tokens: mid-line spaces, comments, and
    /// runs of lines with no content.
    fn skip_insignificant(&mut self) {
        self.skip_spaces();
        self.skip_comment();
        self.skip_blank_lines();
    }

    fn skip_spaces(&mut self) {
        if self.peek_char() != Some(' ') {
            return;
        }
        if self.at_line_start() {
            // Leave pairs of spaces for indentation counting; a lone leading
            // space is ordinary whitespace.
            let saved = self.pos;
            self.consume_char();
            if self.peek_char() == Some(' ') {
                self.pos = saved;
            }
        } else {
            self.consume_while(|c| c == ' ');
        }
    }

    fn skip_comment(&mut self) {
        if self.peek_char() != Some('#') {
            return;
        }
        self.consume_while(|c| c != '\n');
        if self.peek_char() == Some('\n') {
            self.consume_char();
            // The newline still terminates the statement preceding the
            // comment, so leave it for the newline reader.
            if !self.at_line_start() {
                self.pos -= 1;
            }
        }
    }

    /// At a line start, consumes every following line that holds no tokens:
    /// empty lines, space-only lines, and comment-only lines.
    fn skip_blank_lines(&mut self) {
        if !self.at_line_start() {
            return;
        }
        if !matches!(self.peek_char(), Some(' ' | '\n' | '#')) {
            return;
        }
        while self.pos < self.input.len() {
            let line_end = self.input[self.pos..].find('\n').map(|offset| self.pos + offset);
            let line = match line_end {
                Some(end) => &self.input[self.pos..end],
                None => &self.input[self.pos..],
            };
            let significant = match line.find('#') {
                Some(comment) => !line[..comment].chars().all(|c| c == ' '),
                None => !line.chars().all(|c| c == ' '),
            };
            if significant {
                break;
            }
            self.pos = match line_end {
                Some(end) => end + 1,
                None => self.input.len(),
            };
        }
    }

    fn count_indent_pairs(&mut self) -> usize {
        let mut pairs = 0;
        while self.peek_char() == Some(' ') {
            self.consume_char();
            if self.peek_char() == Some(' ') {
                self.consume_char();
                pairs += 1;
            } else {
                break;
            }
        }
        pairs
    }

    fn at_line_start(&self) -> bool {
        matches!(self.current, Token::Newline)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume_while<P>(&mut self, keep: P)
    where
        P: Fn(char) -> bool,
    {
        while let Some(c) = self.peek_char() {
            if !keep(c) {
                break;
            }
            self.consume_char();
        }
    }
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_symbol(c: char) -> bool {
    matches!(
        c,
        '-' | '+'
            | '='
            | '>'
            | '<'
            | '!'
            | '*'
            | '/'
            | ';'
            | ','
            | '.'
            | '('
            | ')'
            | ':'
            | '$'
            | '%'
            | '|'
            | '\\'
            | '['
            | ']'
            | '{'
            | '}'
            | '?'
            | '&'
            | '^'
            | '@'
    )
}

fn mismatch(expected: &Token, found: &Token) -> LexError {
    LexError::UnexpectedToken {
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

/// Tokenizes an entire source text. The returned stream ends with a single
/// `Eof`, preceded by any pending `Dedent`s and a terminating `Newline`.
pub fn tokenize(input: &str) -> LexResult<Vec<Token>> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = Vec::new();
    loop {
        let token = lexer.current_token().clone();
        let is_eof = token == Token::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
        lexer.next_token()?;
    }
    Ok(tokens)
}
