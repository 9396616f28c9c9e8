use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            literal::Literal,
            paren::Paren,
            unary::Unary,
        },
        error::Error,
        token::op::Precedence,
        Parse,
        Parser,
    },
    try_parse_catch_fatal,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a general expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A call to a built-in function, such as `sin(x)`.
    Call(Call),

    /// A unary operation, such as `-1` or `3!`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is an [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.innermost(),
            expr => expr,
        }
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let lhs = Unary::parse_or_lower(input)?;
        Binary::parse_expr(input, lhs, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

/// Represents a primary expression: one that can be used as the operand of a unary or binary
/// operator without parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primary {
    Literal(Literal),
    Paren(Paren),
    Call(Call),

    /// A function raised to a power before its argument, such as `sin^2(x)`.
    PoweredCall(Binary),
}

impl Primary {
    /// Returns the span of the primary expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Primary::Literal(literal) => literal.span(),
            Primary::Paren(paren) => paren.span(),
            Primary::Call(call) => call.span(),
            Primary::PoweredCall(binary) => binary.span(),
        }
    }
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        // function calls must be tried before literals, since a call begins with a name
        let err = try_parse_catch_fatal!(
            input.try_parse_with_fn(Call::parse_power).map(Primary::PoweredCall),
            input.try_parse::<Call>().map(Primary::Call),
            input.try_parse::<Literal>().map(Primary::Literal),
            input.try_parse::<Paren>().map(Primary::Paren),
        );
        Err(err)
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
            Primary::Call(call) => Self::Call(call),
            Primary::PoweredCall(binary) => Self::Binary(binary),
        }
    }
}
