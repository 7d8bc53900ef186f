//! Selection expressions such as `test =~ /net::/ and not name == slow_one`

use regex::Regex;
use std::fmt;

use crate::error::{Error, Result};
use crate::types::TestCase;

/// Test property a comparison looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Test,
    Name,
    Class,
    Id,
}

impl Field {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "test" => Some(Field::Test),
            "name" => Some(Field::Name),
            "class" => Some(Field::Class),
            "id" => Some(Field::Id),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Field::Test => "test",
            Field::Name => "name",
            Field::Class => "class",
            Field::Id => "id",
        }
    }

    fn value_of<'a>(&self, case: &'a TestCase) -> &'a str {
        match self {
            Field::Test => &case.full_name,
            Field::Name => case.name(),
            Field::Class => case.class_name(),
            Field::Id => &case.id,
        }
    }
}

/// Right hand side of a comparison
#[derive(Debug, Clone)]
pub enum Matcher {
    Equals(String),
    Regex(Regex),
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::Equals(a), Matcher::Equals(b)) => a == b,
            (Matcher::Regex(a), Matcher::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// A parsed selection expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Compare {
        field: Field,
        matcher: Matcher,
        negated: bool,
    },
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self> {
        let tokens = tokenize(source)?;
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or()?;
        match parser.peek() {
            None => Ok(expr),
            Some(token) => Err(syntax_error(
                token.offset,
                format!("unexpected {}", token.kind),
            )),
        }
    }

    pub fn matches(&self, case: &TestCase) -> bool {
        match self {
            Expr::Compare {
                field,
                matcher,
                negated,
            } => {
                let value = field.value_of(case);
                let hit = match matcher {
                    Matcher::Equals(expected) => value == expected,
                    Matcher::Regex(regex) => regex.is_match(value),
                };
                hit != *negated
            }
            Expr::Not(inner) => !inner.matches(case),
            Expr::And(lhs, rhs) => lhs.matches(case) && rhs.matches(case),
            Expr::Or(lhs, rhs) => lhs.matches(case) || rhs.matches(case),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare {
                field,
                matcher,
                negated,
            } => {
                let op = match (matcher, negated) {
                    (Matcher::Equals(_), false) => "==",
                    (Matcher::Equals(_), true) => "!=",
                    (Matcher::Regex(_), false) => "=~",
                    (Matcher::Regex(_), true) => "!~",
                };
                let value = match matcher {
                    Matcher::Equals(s) => s.as_str(),
                    Matcher::Regex(r) => r.as_str(),
                };
                write!(f, "{} {} '{}'", field.as_str(), op, value.replace('\'', "\\'"))
            }
            Expr::Not(inner) => write!(f, "not ({inner})"),
            Expr::And(lhs, rhs) => write!(f, "({lhs} and {rhs})"),
            Expr::Or(lhs, rhs) => write!(f, "({lhs} or {rhs})"),
        }
    }
}

fn syntax_error(offset: usize, message: impl Into<String>) -> Error {
    Error::FilterSyntax {
        offset,
        message: message.into(),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Word(String),
    Quoted(String),
    Regex(String),
    Op(&'static str),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Word(w) => write!(f, "'{w}'"),
            TokenKind::Quoted(q) => write!(f, "string '{q}'"),
            TokenKind::Regex(r) => write!(f, "regex /{r}/"),
            TokenKind::Op(op) => write!(f, "'{op}'"),
            TokenKind::And => f.write_str("'and'"),
            TokenKind::Or => f.write_str("'or'"),
            TokenKind::Not => f.write_str("'not'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

const OPERATORS: [&str; 4] = ["==", "!=", "=~", "!~"];

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let rest = &source[offset..];
        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            chars.next();
            chars.next();
            tokens.push(Token {
                kind: TokenKind::Op(*op),
                offset,
            });
            continue;
        }
        if rest.starts_with("&&") || rest.starts_with("||") {
            chars.next();
            chars.next();
            let kind = if c == '&' { TokenKind::And } else { TokenKind::Or };
            tokens.push(Token { kind, offset });
            continue;
        }

        let kind = match c {
            '(' => {
                chars.next();
                TokenKind::LParen
            }
            ')' => {
                chars.next();
                TokenKind::RParen
            }
            '!' => {
                chars.next();
                TokenKind::Not
            }
            '\'' | '"' | '/' => {
                chars.next();
                let mut text = String::new();
                let mut closed = false;
                while let Some((_, ch)) = chars.next() {
                    if ch == '\\' {
                        match chars.peek() {
                            Some(&(_, next)) if next == c => {
                                text.push(next);
                                chars.next();
                            }
                            _ => text.push(ch),
                        }
                    } else if ch == c {
                        closed = true;
                        break;
                    } else {
                        text.push(ch);
                    }
                }
                if !closed {
                    return Err(syntax_error(offset, format!("unterminated {c}")));
                }
                if c == '/' {
                    TokenKind::Regex(text)
                } else {
                    TokenKind::Quoted(text)
                }
            }
            _ => {
                let mut word = String::new();
                while let Some(&(pos, ch)) = chars.peek() {
                    let at_op = OPERATORS.iter().any(|op| source[pos..].starts_with(*op));
                    if ch.is_whitespace() || ch == '(' || ch == ')' || at_op {
                        break;
                    }
                    word.push(ch);
                    chars.next();
                }
                match word.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    _ => TokenKind::Word(word),
                }
            }
        };
        tokens.push(Token { kind, offset });
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn end_offset(&self) -> usize {
        self.tokens.last().map(|t| t.offset + 1).unwrap_or(0)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_or(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        while self.eat(&TokenKind::And) {
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::Not) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if self.eat(&TokenKind::LParen) {
            let inner = self.parse_or()?;
            if !self.eat(&TokenKind::RParen) {
                let offset = self.peek().map(|t| t.offset).unwrap_or(self.end_offset());
                return Err(syntax_error(offset, "expected ')'"));
            }
            return Ok(inner);
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr> {
        let end = self.end_offset();
        let field_token = self
            .next()
            .ok_or_else(|| syntax_error(end, "expected a field name"))?;
        let field = match &field_token.kind {
            TokenKind::Word(word) => Field::parse(word).ok_or_else(|| {
                syntax_error(
                    field_token.offset,
                    format!("unknown field '{word}', expected test, name, class or id"),
                )
            })?,
            other => {
                return Err(syntax_error(
                    field_token.offset,
                    format!("expected a field name, found {other}"),
                ));
            }
        };

        let op_token = self
            .next()
            .ok_or_else(|| syntax_error(end, "expected an operator"))?;
        let op = match op_token.kind {
            TokenKind::Op(op) => op,
            other => {
                return Err(syntax_error(
                    op_token.offset,
                    format!("expected ==, !=, =~ or !~, found {other}"),
                ));
            }
        };

        let value_token = self
            .next()
            .ok_or_else(|| syntax_error(end, "expected a value"))?;
        let value = match value_token.kind {
            TokenKind::Word(v) | TokenKind::Quoted(v) | TokenKind::Regex(v) => v,
            other => {
                return Err(syntax_error(
                    value_token.offset,
                    format!("expected a value, found {other}"),
                ));
            }
        };

        let (matcher, negated) = match op {
            "==" | "!=" => (Matcher::Equals(value), op == "!="),
            _ => {
                let regex = Regex::new(&value).map_err(|e| {
                    syntax_error(value_token.offset, format!("invalid regex: {e}"))
                })?;
                (Matcher::Regex(regex), op == "!~")
            }
        };

        Ok(Expr::Compare {
            field,
            matcher,
            negated,
        })
    }
}
