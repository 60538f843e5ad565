//! Recursive-descent parser and interpreter for the arithmetic grammar.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('-' | '+') unary | power
//! power  := atom ('^' unary)?
//! atom   := NUMBER | '(' expr ')'
//! ```
//!
//! The AST has no variables, calls or names, so evaluation can only ever
//! produce a number or an [`EvalError`].

use super::lexer::Token;
use crate::error::EvalError;

/// Maximum nesting of parentheses and unary operators.
pub const MAX_DEPTH: usize = 64;

/// Binary operators the grammar admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Arithmetic abstract syntax.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Evaluate the tree. `source` is only used for error messages.
    pub fn eval(&self, source: &str) -> Result<f64, EvalError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Neg(inner) => Ok(-inner.eval(source)?),
            Self::Binary { op, lhs, rhs } => {
                let l = lhs.eval(source)?;
                let r = rhs.eval(source)?;
                match op {
                    BinaryOp::Add => Ok(l + r),
                    BinaryOp::Sub => Ok(l - r),
                    BinaryOp::Mul => Ok(l * r),
                    BinaryOp::Div => {
                        if r == 0.0 {
                            return Err(EvalError::DivisionByZero {
                                expression: source.to_string(),
                            });
                        }
                        Ok(l / r)
                    }
                    BinaryOp::Pow => {
                        if l == 0.0 && r < 0.0 {
                            return Err(EvalError::DivisionByZero {
                                expression: source.to_string(),
                            });
                        }
                        Ok(l.powf(r))
                    }
                }
            }
        }
    }
}

/// Parse a token stream into an [`Expr`], requiring all tokens be consumed.
pub fn parse(source: &str, tokens: &[Token]) -> Result<Expr, EvalError> {
    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(parser.error(format!("unexpected {} after expression", describe(tok)))),
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn error(&self, reason: impl Into<String>) -> EvalError {
        EvalError::invalid(self.source, reason)
    }

    fn descend(&mut self) -> Result<(), EvalError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error(format!("nesting deeper than {MAX_DEPTH} levels")));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.term()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self) -> Result<Expr, EvalError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                self.descend()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.bump();
                self.descend()?;
                let inner = self.unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr, EvalError> {
        let base = self.atom()?;
        if self.peek() == Some(Token::Caret) {
            self.bump();
            self.descend()?;
            // Right-associative: 2^3^2 == 2^(3^2).
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, EvalError> {
        match self.bump() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.depth -= 1;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => Err(self.error(format!("expected ')', found {}", describe(tok)))),
                    None => Err(self.error("unbalanced parentheses")),
                }
            }
            Some(tok) => Err(self.error(format!("expected a number, found {}", describe(tok)))),
            None => Err(self.error("unexpected end of input")),
        }
    }
}

fn describe(tok: Token) -> String {
    match tok {
        Token::Number(n) => format!("number {n}"),
        Token::Plus => "'+'".into(),
        Token::Minus => "'-'".into(),
        Token::Star => "'*'".into(),
        Token::Slash => "'/'".into(),
        Token::Caret => "'^'".into(),
        Token::LParen => "'('".into(),
        Token::RParen => "')'".into(),
    }
}
