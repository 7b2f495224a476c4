//! Wire filter string parser

use crate::config::{FieldCatalog, FieldKind, PARAMETER_SIGIL};
use crate::condition::Condition;
use crate::element::{Comparison, ComparisonOperator, Literal, LogicalConnective, DATETIME_WIRE_FORMAT};
use crate::error::{FilterError, Result};
use chrono::NaiveDateTime;
use uuid::Uuid;

/// Parse a wire filter string into a linear condition
///
/// Field names are resolved against `catalog` and literals are typed from
/// the field kind. The flat shape of the input is preserved: every
/// parenthesized part becomes a nested condition and connectives stay in
/// source order.
pub fn parse(input: &str, catalog: &FieldCatalog) -> Result<Condition> {
    let tokens = tokenize(input)?;
    log::trace!("tokenized filter into {} tokens", tokens.len());

    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        catalog,
    };
    let condition = parser.parse_sequence(0)?;
    if parser.pos != tokens.len() {
        return Err(FilterError::Parse(format!(
            "Unexpected token {:?}",
            tokens[parser.pos]
        )));
    }
    Ok(condition)
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    /// Single-quoted string, already unescaped
    Quoted(String),
    /// Prefixed literal like datetime'...' or guid'...'
    Prefixed(String, String),
    Number(String),
    /// Copied verbatim: cast(...) calls and parameter placeholders
    Raw(String),
    OpenParen,
    CloseParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut paren_depth: i32 = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push(Token::OpenParen);
                paren_depth += 1;
                i += 1;
            }
            ')' => {
                tokens.push(Token::CloseParen);
                paren_depth -= 1;
                if paren_depth < 0 {
                    return Err(FilterError::Parse("Unbalanced parentheses".to_string()));
                }
                i += 1;
            }
            '\'' => {
                let (text, next) = read_quoted(&chars, i)?;
                tokens.push(Token::Quoted(text));
                i = next;
            }
            c if c == PARAMETER_SIGIL => {
                let end = scan(&chars, i + 1, |ch| ch.is_alphanumeric() || ch == '_');
                tokens.push(Token::Raw(chars[i..end].iter().collect()));
                i = end;
            }
            c if c.is_ascii_digit() || c == '-' || c == '+' => {
                let end = scan(&chars, i + 1, |ch| {
                    ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E' | '-' | '+')
                });
                tokens.push(Token::Number(chars[i..end].iter().collect()));
                i = end;
            }
            c if c.is_alphabetic() || c == '_' => {
                let end = scan(&chars, i + 1, |ch| {
                    ch.is_alphanumeric() || matches!(ch, '_' | '.' | '/')
                });
                let word: String = chars[i..end].iter().collect();
                i = end;

                if chars.get(i) == Some(&'\'') && matches!(word.as_str(), "datetime" | "guid") {
                    let (text, next) = read_quoted(&chars, i)?;
                    tokens.push(Token::Prefixed(word, text));
                    i = next;
                } else if word == "cast" && chars.get(i) == Some(&'(') {
                    let next = read_call(&chars, i)?;
                    let raw: String = chars[end - word.len()..next].iter().collect();
                    tokens.push(Token::Raw(raw));
                    i = next;
                } else {
                    tokens.push(Token::Word(word));
                }
            }
            other => {
                return Err(FilterError::Parse(format!(
                    "Unexpected character '{}' at {}",
                    other, i
                )))
            }
        }
    }

    if paren_depth != 0 {
        return Err(FilterError::Parse("Unbalanced parentheses".to_string()));
    }

    Ok(tokens)
}

fn scan(chars: &[char], mut i: usize, accept: impl Fn(char) -> bool) -> usize {
    while i < chars.len() && accept(chars[i]) {
        i += 1;
    }
    i
}

/// Read a '...' string starting at `start`; `''` stands for one quote
fn read_quoted(chars: &[char], start: usize) -> Result<(String, usize)> {
    let mut text = String::new();
    let mut i = start + 1;
    while i < chars.len() {
        if chars[i] == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                text.push('\'');
                i += 2;
                continue;
            }
            return Ok((text, i + 1));
        }
        text.push(chars[i]);
        i += 1;
    }
    Err(FilterError::Parse("Unterminated string literal".to_string()))
}

/// Skip a balanced (...) call starting at `start`, honoring quotes
fn read_call(chars: &[char], start: usize) -> Result<usize> {
    let mut depth = 0;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '\'' => {
                let (_, next) = read_quoted(chars, i)?;
                i = next;
                continue;
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(FilterError::Parse("Unterminated cast(...) call".to_string()))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    catalog: &'a FieldCatalog,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn parse_sequence(&mut self, depth: usize) -> Result<Condition> {
        let mut condition = Condition::new();
        if self.peek().is_none() && depth == 0 {
            return Ok(condition);
        }

        loop {
            // operand position
            match self.next() {
                Some(Token::Word(w)) if w == "not" => {
                    condition.append(LogicalConnective::Not)?;
                    continue;
                }
                Some(Token::OpenParen) => {
                    if self.peek() == Some(&Token::CloseParen) {
                        return Err(FilterError::Parse("Empty parentheses".to_string()));
                    }
                    let nested = self.parse_sequence(depth + 1)?;
                    match self.next() {
                        Some(Token::CloseParen) => {}
                        _ => return Err(FilterError::Parse("Expected ')'".to_string())),
                    }
                    condition.append(nested)?;
                }
                Some(Token::Word(name)) => {
                    let comparison = self.parse_comparison(name)?;
                    condition.append(comparison)?;
                }
                Some(other) => {
                    return Err(FilterError::Parse(format!("Expected operand, found {:?}", other)))
                }
                None => return Err(FilterError::Parse("Expected operand at end of input".to_string())),
            }

            // connective position
            match self.peek() {
                None => return Ok(condition),
                Some(Token::CloseParen) if depth > 0 => return Ok(condition),
                Some(Token::Word(w)) => match LogicalConnective::from_wire(w) {
                    Some(c) if c.is_binary() => {
                        self.pos += 1;
                        condition.append(c)?;
                    }
                    _ => return Err(FilterError::Parse(format!("Expected 'and' or 'or', found '{}'", w))),
                },
                Some(other) => {
                    return Err(FilterError::Parse(format!(
                        "Expected 'and' or 'or', found {:?}",
                        other
                    )))
                }
            }
        }
    }

    fn parse_comparison(&mut self, name: &str) -> Result<Comparison> {
        let field = self
            .catalog
            .get(name)
            .ok_or_else(|| FilterError::InvalidArgument(format!("Unknown field: {}", name)))?
            .clone();

        let operator = match self.next() {
            Some(Token::Word(w)) => ComparisonOperator::from_wire(w)
                .ok_or_else(|| FilterError::Parse(format!("Unknown operator: {}", w)))?,
            other => {
                return Err(FilterError::Parse(format!(
                    "Expected operator after {}, found {:?}",
                    name, other
                )))
            }
        };

        let token = self
            .next()
            .ok_or_else(|| FilterError::Parse(format!("Expected value after {}", name)))?;
        let value = typed_literal(token, field.kind)
            .ok_or_else(|| {
                FilterError::InvalidArgument(format!(
                    "Value {:?} does not match {:?} field {}",
                    token, field.kind, name
                ))
            })??;

        Comparison::new(field, operator, value)
    }
}

/// Type a literal token for a field kind
///
/// Returns `None` when the token shape does not fit the kind at all and
/// `Some(Err)` when it fits but its content is malformed.
fn typed_literal(token: &Token, kind: FieldKind) -> Option<Result<Literal>> {
    let literal = match (token, kind) {
        (Token::Raw(raw), _) => Ok(Literal::Expression(raw.clone())),
        (Token::Quoted(s), FieldKind::Text) => Ok(Literal::Text(s.clone())),
        (Token::Prefixed(p, s), FieldKind::DateTime) if p == "datetime" => {
            NaiveDateTime::parse_from_str(s, DATETIME_WIRE_FORMAT)
                .map(Literal::DateTime)
                .map_err(|e| FilterError::Parse(format!("Invalid datetime '{}': {}", s, e)))
        }
        (Token::Prefixed(p, s), FieldKind::Guid) if p == "guid" => Uuid::parse_str(s)
            .map(Literal::Guid)
            .map_err(|e| FilterError::Parse(format!("Invalid guid '{}': {}", s, e))),
        (Token::Number(n), k) if k.is_integer() => n
            .parse::<i64>()
            .map(Literal::Int)
            .map_err(|_| FilterError::Parse(format!("Invalid integer: {}", n))),
        (Token::Number(n), FieldKind::Double) => n
            .parse::<f64>()
            .map(Literal::Double)
            .map_err(|_| FilterError::Parse(format!("Invalid number: {}", n))),
        (Token::Word(w), FieldKind::Boolean) => match w.as_str() {
            "true" => Ok(Literal::Boolean(true)),
            "false" => Ok(Literal::Boolean(false)),
            _ => return None,
        },
        _ => return None,
    };
    Some(literal)
}
