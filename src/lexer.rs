//! Tokens for the alpha formula language and depth-aware splitting helpers.

use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Number,
    Str,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    /// Bare `=`: assignment or named-argument binding.
    Equal,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    /// Any other punctuation (`+ - * / ? : ! & | ^ ~ .`, non-ascii, ...).
    Symbol,
}

impl TokenKind {
    /// Comparison and logical operators that split an expression into operands.
    #[inline]
    pub const fn is_comparison_or_logical(self) -> bool {
        matches!(
            self,
            Self::Lt
                | Self::Le
                | Self::Gt
                | Self::Ge
                | Self::EqEq
                | Self::NotEq
                | Self::AndAnd
                | Self::OrOr
        )
    }

    #[inline]
    pub const fn opens_group(self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    #[inline]
    pub const fn closes_group(self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }
}

/// A token with its byte span in the source it was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    #[inline]
    pub fn is_ident(&self, source: &str, word: &str) -> bool {
        self.kind == TokenKind::Ident && self.text(source) == word
    }
}

/// Tokenizes `source`. Never fails: unknown characters become `Symbol` and an
/// unterminated string literal runs to the end of input.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token() {
        tokens.push(tok);
    }
    tokens
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        self.skip_ws();
        let (start, ch) = self.chars.next()?;
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '<' => self.with_eq(TokenKind::Le, TokenKind::Lt),
            '>' => self.with_eq(TokenKind::Ge, TokenKind::Gt),
            '=' => self.with_eq(TokenKind::EqEq, TokenKind::Equal),
            '!' => self.with_eq(TokenKind::NotEq, TokenKind::Symbol),
            '&' => self.doubled('&', TokenKind::AndAnd),
            '|' => self.doubled('|', TokenKind::OrOr),
            '"' | '\'' => {
                self.read_string(ch);
                TokenKind::Str
            }
            c if is_ident_start(c) => {
                self.read_ident();
                TokenKind::Ident
            }
            c if c.is_ascii_digit() => {
                self.read_number();
                TokenKind::Number
            }
            '.' if matches!(self.chars.peek(), Some((_, c)) if c.is_ascii_digit()) => {
                self.read_number();
                TokenKind::Number
            }
            _ => TokenKind::Symbol,
        };
        Some(Token {
            kind,
            start,
            end: self.offset(),
        })
    }

    fn offset(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.source.len())
    }

    fn skip_ws(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn with_eq(&mut self, paired: TokenKind, single: TokenKind) -> TokenKind {
        if matches!(self.chars.peek(), Some((_, '='))) {
            self.chars.next();
            paired
        } else {
            single
        }
    }

    fn doubled(&mut self, expected: char, paired: TokenKind) -> TokenKind {
        if matches!(self.chars.peek(), Some((_, c)) if *c == expected) {
            self.chars.next();
            paired
        } else {
            TokenKind::Symbol
        }
    }

    fn read_string(&mut self, quote: char) {
        for (_, c) in self.chars.by_ref() {
            if c == quote {
                break;
            }
        }
    }

    fn read_ident(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if is_ident_continue(*c)) {
            self.chars.next();
        }
    }

    fn read_number(&mut self) {
        let mut seen_dot = false;
        let mut seen_exp = false;

        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.chars.next();
                continue;
            }
            if c == '.' && !seen_dot && !seen_exp {
                seen_dot = true;
                self.chars.next();
                continue;
            }
            if (c == 'e' || c == 'E') && !seen_exp {
                seen_exp = true;
                self.chars.next();
                if matches!(self.chars.peek(), Some((_, '+' | '-'))) {
                    self.chars.next();
                }
                continue;
            }
            break;
        }
    }
}

#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns the identifier tokens of `source` as string slices.
pub fn identifiers(source: &str) -> impl Iterator<Item = &str> {
    tokenize(source)
        .into_iter()
        .filter(|tok| tok.kind == TokenKind::Ident)
        .map(move |tok| tok.text(source))
}

/// Splits `source` at commas that are not nested in `()`, `[]` or `{}`.
/// Pieces are trimmed and empty pieces dropped.
pub fn split_top_level_args(source: &str) -> Vec<&str> {
    split_top_level(source, |tok| tok.kind == TokenKind::Comma)
}

/// Splits `source` at tokens outside any brackets accepted by `is_separator`.
pub fn split_top_level<'a>(
    source: &'a str,
    is_separator: impl Fn(&Token) -> bool,
) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut depth: i32 = 0;
    let mut piece_start = 0;
    for tok in tokenize(source) {
        if tok.kind.opens_group() {
            depth += 1;
        } else if tok.kind.closes_group() {
            depth -= 1;
        } else if depth == 0 && is_separator(&tok) {
            push_piece(&mut pieces, &source[piece_start..tok.start]);
            piece_start = tok.end;
        }
    }
    push_piece(&mut pieces, &source[piece_start..]);
    pieces
}

fn push_piece<'a>(pieces: &mut Vec<&'a str>, raw: &'a str) {
    let piece = raw.trim();
    if !piece.is_empty() {
        pieces.push(piece);
    }
}
