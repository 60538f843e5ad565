//! Tokenizer for arithmetic expressions.
//!
//! Accepts exactly the characters of the allow-list grammar: digits, `.`,
//! `+ - * / ^`, parentheses and whitespace. `**` is folded into a single
//! power token.

use crate::error::EvalError;

/// A single arithmetic token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

/// Split an expression into tokens.
///
/// Fails with `InvalidExpression` on any character outside the grammar and on
/// malformed literals such as `1.2.3` or a lone `.`.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, EvalError> {
    let bytes = expression.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
            }
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let literal = &expression[start..i];
                tokens.push(Token::Number(parse_literal(expression, literal)?));
            }
            b'+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            b'-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push(Token::Caret);
                    i += 2;
                } else {
                    tokens.push(Token::Star);
                    i += 1;
                }
            }
            b'/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            b'^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => {
                let ch = expression[i..].chars().next().unwrap_or('?');
                return Err(EvalError::invalid(
                    expression,
                    format!("unexpected character '{ch}' at offset {i}"),
                ));
            }
        }
    }

    Ok(tokens)
}

fn parse_literal(expression: &str, literal: &str) -> Result<f64, EvalError> {
    let dots = literal.bytes().filter(|&b| b == b'.').count();
    if dots > 1 || literal == "." {
        return Err(EvalError::invalid(
            expression,
            format!("malformed number \"{literal}\""),
        ));
    }
    literal
        .parse::<f64>()
        .map_err(|e| EvalError::invalid(expression, format!("malformed number \"{literal}\": {e}")))
}
