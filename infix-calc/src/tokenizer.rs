use growbuf::GrowBuf;
use thiserror::Error;
use tracing::{debug, trace};

/// Longest digit run accepted as a single literal.
pub const MAX_NUMBER_LEN: usize = 31;

/// Capacity the token buffer starts with before doubling.
pub const INITIAL_TOKEN_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    LParen,
    RParen,
    Number,
    /// Scan-only classification, never stored in a [`TokenList`] by the tokenizer.
    Whitespace,
}

impl TokenKind {
    pub fn is_operator(self) -> bool {
        use TokenKind::*;
        matches!(self, Add | Sub | Mul | Div | Pow)
    }

    pub fn symbol(self) -> &'static str {
        use TokenKind::*;
        match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Pow => "**",
            LParen => "(",
            RParen => ")",
            Number => "NUM",
            Whitespace => "WHITESPACE",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub pos: usize,
    /// Literal value, only meaningful for [`TokenKind::Number`].
    pub value: i64,
}

impl Token {
    pub fn new(kind: TokenKind, pos: usize) -> Self {
        Self {
            kind,
            pos,
            value: 0,
        }
    }

    pub fn number(value: i64, pos: usize) -> Self {
        Self {
            kind: TokenKind::Number,
            pos,
            value,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            TokenKind::Number => write!(f, "{}", self.value),
            kind => write!(f, "{}", kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizerError {
    #[error("unknown character `{ch}` at position {pos}")]
    UnknownCharacter { ch: char, pos: usize },
    #[error(
        "number at position {pos} has {len} digits, at most {max} are allowed",
        max = MAX_NUMBER_LEN
    )]
    NumberTooLong { pos: usize, len: usize },
    #[error("number at position {pos} does not fit in a 64-bit integer")]
    NumberOutOfRange { pos: usize },
}

/// The token arena. Later stages refer to tokens by their index in this list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenList(GrowBuf<Token>);

impl std::ops::Deref for TokenList {
    type Target = GrowBuf<Token>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenList(iter.into_iter().collect())
    }
}

impl TokenList {
    /// Token kinds in order, without positions.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.iter().map(|t| t.kind).collect()
    }
}

pub struct Tokenizer;

impl Tokenizer {
    /// Splits `input` into tokens, skipping spaces.
    ///
    /// Fails on the first character that cannot start a token and on digit
    /// runs longer than [`MAX_NUMBER_LEN`].
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn tokenize(input: &str) -> Result<TokenList, TokenizerError> {
        use TokenKind::*;

        let mut tokens = GrowBuf::with_capacity(INITIAL_TOKEN_CAPACITY);
        let mut chars = input.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            let token = match c {
                '+' => Token::new(Add, pos),
                '-' => Token::new(Sub, pos),
                '*' => {
                    if chars.next_if(|&(_, next)| next == '*').is_some() {
                        Token::new(Pow, pos)
                    } else {
                        Token::new(Mul, pos)
                    }
                }
                '/' => Token::new(Div, pos),
                '(' => Token::new(LParen, pos),
                ')' => Token::new(RParen, pos),
                '0'..='9' => {
                    // Digits are single bytes, so the run ends `len` bytes after `pos`.
                    let mut len = 1;
                    while chars.next_if(|&(_, next)| next.is_ascii_digit()).is_some() {
                        len += 1;
                    }

                    if len > MAX_NUMBER_LEN {
                        return Err(TokenizerError::NumberTooLong { pos, len });
                    }

                    let value = input[pos..pos + len]
                        .parse::<i64>()
                        .map_err(|_| TokenizerError::NumberOutOfRange { pos })?;
                    Token::number(value, pos)
                }
                ' ' => Token::new(Whitespace, pos),
                ch => return Err(TokenizerError::UnknownCharacter { ch, pos }),
            };

            if token.kind != Whitespace {
                trace!(%token, pos, "token");
                tokens.push(token);
            }
        }

        debug!(count = tokens.len(), "tokenized input");
        Ok(TokenList(tokens))
    }

    /// Like [`Tokenizer::tokenize`], for input that may not be valid UTF-8.
    ///
    /// Characters before the first invalid byte are scanned as usual. The
    /// invalid byte itself is reported as [`char::REPLACEMENT_CHARACTER`] at
    /// its byte offset.
    pub fn tokenize_bytes(input: &[u8]) -> Result<TokenList, TokenizerError> {
        match std::str::from_utf8(input) {
            Ok(input) => Self::tokenize(input),
            Err(e) => {
                let pos = e.valid_up_to();
                // The prefix is valid UTF-8 by construction.
                let prefix = String::from_utf8_lossy(&input[..pos]);
                Self::tokenize(&prefix)?;
                Err(TokenizerError::UnknownCharacter {
                    ch: char::REPLACEMENT_CHARACTER,
                    pos,
                })
            }
        }
    }
}
