use std::fmt::Display;
use std::rc::Rc;

use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    Ident,
    Number,
    // Reserved for string literals, never produced yet.
    String,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,

    FatArrow,

    Comma,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,

    // Keywords
    And,
    Case,
    Else,
    False,
    For,
    Function,
    If,
    Match,
    Null,
    Or,
    Print,
    Return,
    True,
    Var,
    While,

    Eof,
}

impl TokenKind {
    fn to_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident => "identifier",
            Number => "number",
            String => "string",
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            GreaterEqual => ">=",
            LessThan => "<",
            LessEqual => "<=",
            FatArrow => "=>",
            Comma => ",",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            And => "and",
            Case => "case",
            Else => "else",
            False => "false",
            For => "for",
            Function => "fn",
            If => "if",
            Match => "match",
            Null => "null",
            Or => "or",
            Print => "print",
            Return => "return",
            True => "true",
            Var => "var",
            While => "while",
            Eof => "end of input",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Rc<str>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Token::new(TokenKind::Eof, "", line)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum LexError {
    #[error("Unexpected character '{character}' at line {line}")]
    UnexpectedCharacter { character: char, line: usize },
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "and" => Some(TokenKind::And),
        "case" => Some(TokenKind::Case),
        "else" => Some(TokenKind::Else),
        "false" => Some(TokenKind::False),
        "fn" => Some(TokenKind::Function),
        "for" => Some(TokenKind::For),
        "if" => Some(TokenKind::If),
        "match" => Some(TokenKind::Match),
        "null" => Some(TokenKind::Null),
        "or" => Some(TokenKind::Or),
        "print" => Some(TokenKind::Print),
        "return" => Some(TokenKind::Return),
        "true" => Some(TokenKind::True),
        "var" => Some(TokenKind::Var),
        "while" => Some(TokenKind::While),
        _ => None,
    }
}

/// Lexes the whole source, appending a single `Eof` token that carries the
/// final line number. Stops at the first unexpected character.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = tokenizer.by_ref().collect::<Result<Vec<_>, _>>()?;
    tokens.push(Token::eof(tokenizer.line()));
    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Streaming scanner. Yields tokens without the trailing `Eof`.
#[derive(Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    iter: std::iter::Peekable<std::str::CharIndices<'a>>,
    line: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        let iter = input.char_indices().peekable();
        Self {
            input,
            iter,
            line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn is_identifier_start(ch: char) -> bool {
        ch.is_alphabetic()
    }

    fn is_identifier_continue(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_'
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, ch)) = self.iter.peek() {
            match ch {
                ' ' | '\r' | '\t' => {}
                '\n' => self.line += 1,
                _ => break,
            }
            self.iter.next();
        }
    }

    fn read_identifier(&mut self, start: usize) -> Token {
        while self
            .iter
            .next_if(|(_, ch)| Self::is_identifier_continue(*ch))
            .is_some()
        {}

        let end = self.next_idx();
        let ident = &self.input[start..end];
        Token::new(
            keywords(ident).unwrap_or(TokenKind::Ident),
            ident,
            self.line,
        )
    }

    fn read_number(&mut self, start: usize) -> Token {
        while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}

        // A '.' only belongs to the number when a digit follows it.
        if let Some(&(dot, '.')) = self.iter.peek() {
            if self.input[dot + 1..].starts_with(|ch: char| ch.is_ascii_digit()) {
                self.iter.next();
                while self.iter.next_if(|(_, ch)| ch.is_ascii_digit()).is_some() {}
            }
        }

        self.token(TokenKind::Number, start)
    }

    fn either(&mut self, expected: char, matched: TokenKind, otherwise: TokenKind) -> TokenKind {
        if self.iter.next_if(|(_, ch)| *ch == expected).is_some() {
            matched
        } else {
            otherwise
        }
    }

    fn token(&mut self, kind: TokenKind, start: usize) -> Token {
        let end = self.next_idx();
        Token::new(kind, &self.input[start..end], self.line)
    }

    fn next_idx(&mut self) -> usize {
        self.iter
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();

        let (idx, ch) = self.iter.next()?;
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::SemiColon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Asterisk,
            '/' => TokenKind::Slash,
            '=' => {
                if self.iter.next_if(|(_, ch)| *ch == '=').is_some() {
                    TokenKind::Equal
                } else {
                    self.either('>', TokenKind::FatArrow, TokenKind::Assign)
                }
            }
            '!' => self.either('=', TokenKind::NotEqual, TokenKind::Bang),
            '<' => self.either('=', TokenKind::LessEqual, TokenKind::LessThan),
            '>' => self.either('=', TokenKind::GreaterEqual, TokenKind::GreaterThan),
            c if c.is_ascii_digit() => return Some(Ok(self.read_number(idx))),
            c if Self::is_identifier_start(c) => return Some(Ok(self.read_identifier(idx))),
            character => {
                return Some(Err(LexError::UnexpectedCharacter {
                    character,
                    line: self.line,
                }))
            }
        };
        Some(Ok(self.token(kind, idx)))
    }
}
