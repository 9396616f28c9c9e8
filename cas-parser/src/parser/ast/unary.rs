use crate::parser::{
    ast::{binary::Binary, expr::{Expr, Primary}},
    error::{kind, Error},
    token::op::{Associativity, UnaryOp},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attempt to parse a unary operator with the correct associativity. Returns a non-fatal error if
/// the operator is not of the correct associativity.
fn try_parse_unary_op(input: &mut Parser, associativity: Associativity) -> Result<UnaryOp, Error> {
    input.try_parse_then::<UnaryOp, _>(|op, input| {
        if op.associativity() == associativity {
            Ok(())
        } else {
            Err(input.error(kind::NonFatal))
        }
    })
}

/// A unary expression, such as `-x` or `3!`. Unary expressions can include nested expressions.
///
/// Unary expressions do not directly implement [`Parse`] due to the backtracking involved in
/// parsing left-associative unary expressions (see [`Unary::parse_left_or_operand`]). Instead, a
/// combination of [`Unary::parse_right`] and [`Unary::parse_left_or_operand`] can be used to
/// parse unary expressions.
///
/// [`Parse`]: crate::parser::Parse
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression (left or right, depending on the associativity).
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parse a unary expression with right-associativity.
    pub fn parse_right(input: &mut Parser) -> Result<Self, Error> {
        let op = try_parse_unary_op(input, Associativity::Right)?;
        let op_precedence = op.precedence();
        let start_span = op.span.start;
        let operand = {
            let lhs = Unary::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, op_precedence)?
        };
        let end_span = operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span: start_span..end_span,
        })
    }

    /// Parse a unary expression with left-associativity.
    ///
    /// By the nature of left-associative operators, we must parse the operand first. This can
    /// result in enormous backtracking if the operator is not present. To avoid this, this
    /// function returns the parsed operand as-is if it does determine that there is no operator
    /// present.
    pub fn parse_left_or_operand(input: &mut Parser) -> Result<Expr, Error> {
        let operand: Expr = input.try_parse::<Primary>()?.into();
        let start_span = operand.span().start;

        // one operator must be present
        let op = match try_parse_unary_op(input, Associativity::Left) {
            Ok(op) => op,
            Err(_) => return Ok(operand),
        };
        let mut result = Self {
            span: start_span..op.span.end,
            operand: Box::new(operand),
            op,
        };

        // iteratively find any other left-associative operators; each one nests the operand one
        // level deeper
        let mut levels = 1;
        while let Ok(next_op) = try_parse_unary_op(input, Associativity::Left) {
            input.check_depth(levels)?;
            levels += 1;
            result = Self {
                span: start_span..next_op.span.end,
                operand: Box::new(Expr::Unary(result)),
                op: next_op,
            };
        }

        Ok(Expr::Unary(result))
    }

    /// Parses a unary expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        input.nested(|input| {
            // a prefix operator commits to a right-associative unary expression
            if try_parse_unary_op(&mut input.clone(), Associativity::Right).is_ok() {
                Self::parse_right(input).map(Expr::Unary)
            } else {
                Self::parse_left_or_operand(input)
            }
        })
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.associativity() {
            Associativity::Left => {
                self.operand.fmt(f)?;
                self.op.fmt(f)
            },
            Associativity::Right => {
                self.op.fmt(f)?;
                self.operand.fmt(f)
            },
        }
    }
}
