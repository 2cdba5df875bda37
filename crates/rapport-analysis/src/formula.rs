//! Arithmetic formulas over feature keys
//!
//! Derived features such as `totalMeetings * 0.3 + totalMemos * 0.3` are parsed
//! into an expression tree and evaluated against a [`FeatureVector`]. Only numbers,
//! identifiers, `+ - * /`, unary minus and parentheses are accepted; there are no
//! function calls or any other way to escape the grammar.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := '-' unary | primary
//! primary := NUMBER | IDENT | '(' expr ')'
//! ```
//!
//! Formulas are limited to [`MAX_TOKENS`] tokens and [`MAX_DEPTH`] levels of
//! nested parentheses and negations, which bounds the depth of the expression tree.
//!
//! # Examples
//!
//! ```
//! use rapport_analysis::{feature::FeatureVector, formula::Formula};
//!
//! let formula = Formula::parse("totalMeetings * 0.5 + (totalMemos - 1) / 2").unwrap();
//! let vector = FeatureVector::new("c1")
//!     .with("totalMeetings", 4.0)
//!     .with("totalMemos", 5.0);
//! assert_eq!(formula.evaluate(&vector).unwrap(), 4.0);
//! ```

use std::{collections::BTreeSet, fmt};

use crate::feature::{FeatureValue, FeatureVector};

/// Maximum nesting of parentheses and unary minus.
pub const MAX_DEPTH: usize = 256;
/// Maximum number of tokens in one formula.
pub const MAX_TOKENS: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FormulaError {
    #[display("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },
    #[display("invalid number '{text}' at offset {offset}")]
    InvalidNumber { text: String, offset: usize },
    #[display("unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },
    #[display("function calls are not allowed ('{name}' at offset {offset})")]
    FunctionCall { name: String, offset: usize },
    #[display("formula nests deeper than {max} levels at offset {offset}")]
    TooDeep { offset: usize, max: usize },
    #[display("formula has {tokens} tokens, more than the limit of {max}")]
    TooLong { tokens: usize, max: usize },
    #[display("unexpected end of formula")]
    UnexpectedEnd,
    #[display("empty formula")]
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum EvalError {
    #[display("feature '{name}' has no usable value")]
    MissingFeature { name: String },
    #[display("division by zero")]
    DivisionByZero,
    #[display("result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Ident(String),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    fn evaluate(&self, vector: &FeatureVector) -> Result<f64, EvalError> {
        match self {
            Expr::Number(value) => Ok(*value),
            Expr::Ident(name) => vector.value(name).ok_or_else(|| EvalError::MissingFeature {
                name: name.clone(),
            }),
            Expr::Neg(inner) => Ok(-inner.evaluate(vector)?),
            Expr::Binary(op, lhs, rhs) => {
                let lhs = lhs.evaluate(vector)?;
                let rhs = rhs.evaluate(vector)?;
                match op {
                    BinaryOp::Add => Ok(lhs + rhs),
                    BinaryOp::Sub => Ok(lhs - rhs),
                    BinaryOp::Mul => Ok(lhs * rhs),
                    BinaryOp::Div if rhs == 0.0 => Err(EvalError::DivisionByZero),
                    BinaryOp::Div => Ok(lhs / rhs),
                }
            }
        }
    }

    fn collect_identifiers<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Number(_) => {}
            Expr::Ident(name) => {
                out.insert(name.as_str());
            }
            Expr::Neg(inner) => inner.collect_identifiers(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_identifiers(out);
                rhs.collect_identifiers(out);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(value) => write!(f, "{value}"),
            Expr::Ident(name) => f.write_str(name),
            Expr::Neg(inner) => write!(f, "(-{inner})"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(BinaryOp),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{value}"),
            Token::Ident(name) => f.write_str(name),
            Token::Op(op) => write!(f, "{}", op.symbol()),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, FormulaError> {
    let mut tokens = vec![];
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '+' => Token::Op(BinaryOp::Add),
            '-' => Token::Op(BinaryOp::Sub),
            '*' => Token::Op(BinaryOp::Mul),
            '/' => Token::Op(BinaryOp::Div),
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_ascii_digit() || c == '.') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                let text = &source[offset..end];
                let value = text.parse().map_err(|_| FormulaError::InvalidNumber {
                    text: text.to_owned(),
                    offset,
                })?;
                tokens.push((Token::Number(value), offset));
                continue;
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = offset;
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push((Token::Ident(source[offset..end].to_owned()), offset));
                continue;
            }
            ch => return Err(FormulaError::UnexpectedChar { ch, offset }),
        };
        chars.next();
        tokens.push((token, offset));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_op(&self, ops: &[BinaryOp]) -> Option<BinaryOp> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => Some(*op),
            _ => None,
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        while let Some(op) = self.peek_op(&[BinaryOp::Add, BinaryOp::Sub]) {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek_op(&[BinaryOp::Mul, BinaryOp::Div]) {
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    /// Runs `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        offset: usize,
        f: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        if self.depth >= MAX_DEPTH {
            return Err(FormulaError::TooDeep {
                offset,
                max: MAX_DEPTH,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.peek_op(&[BinaryOp::Sub]).is_some() {
            let offset = self.tokens[self.pos].1;
            self.pos += 1;
            let inner = self.nested(offset, Self::unary)?;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.advance().ok_or(FormulaError::UnexpectedEnd)? {
            (Token::Number(value), _) => Ok(Expr::Number(value)),
            (Token::Ident(name), offset) => {
                if self.peek() == Some(&Token::LParen) {
                    return Err(FormulaError::FunctionCall { name, offset });
                }
                Ok(Expr::Ident(name))
            }
            (Token::LParen, offset) => {
                let inner = self.nested(offset, Self::expr)?;
                match self.advance() {
                    Some((Token::RParen, _)) => Ok(inner),
                    Some((token, offset)) => Err(FormulaError::UnexpectedToken {
                        found: token.to_string(),
                        offset,
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            (token, offset) => Err(FormulaError::UnexpectedToken {
                found: token.to_string(),
                offset,
            }),
        }
    }
}

/// A parsed feature formula
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parses `source` into a formula.
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(FormulaError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(FormulaError::TooLong {
                tokens: tokens.len(),
                max: MAX_TOKENS,
            });
        }
        let mut parser = Parser::new(tokens);
        let expr = parser.expr()?;
        if let Some((token, offset)) = parser.advance() {
            return Err(FormulaError::UnexpectedToken {
                found: token.to_string(),
                offset,
            });
        }
        Ok(Self {
            source: source.to_owned(),
            expr,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Feature keys referenced by the formula, sorted.
    #[must_use]
    pub fn identifiers(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.expr.collect_identifiers(&mut out);
        out
    }

    /// Evaluates the formula against one entity.
    pub fn evaluate(&self, vector: &FeatureVector) -> Result<f64, EvalError> {
        let value = self.expr.evaluate(vector)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::NonFinite)
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.expr, f)
    }
}

/// Adds the feature `name` computed by `formula` to copies of `vectors`.
///
/// Entities on which the formula cannot be evaluated keep the feature absent.
#[must_use]
pub fn derive_feature(vectors: &[FeatureVector], name: &str, formula: &Formula) -> Vec<FeatureVector> {
    let mut failures = 0;
    let derived = vectors
        .iter()
        .map(|vector| {
            let mut vector = vector.clone();
            match formula.evaluate(&vector) {
                Ok(value) => {
                    vector
                        .features
                        .insert(name.to_owned(), FeatureValue::Number(value));
                }
                Err(err) => {
                    failures += 1;
                    tracing::debug!(entity = %vector.id, feature = name, %err, "formula not evaluated");
                    vector.features.remove(name);
                }
            }
            vector
        })
        .collect();
    tracing::info!(
        feature = name,
        formula = formula.source(),
        entities = vectors.len(),
        failures,
        "derived feature"
    );
    derived
}
