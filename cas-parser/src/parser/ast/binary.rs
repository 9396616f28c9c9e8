use crate::parser::{
    ast::{expr::Expr, unary::Unary},
    error::{kind, Error},
    token::op::{Associativity, BinOp, BinOpKind, Precedence},
    Parser,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operator, including implicit multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `*`.
    Op(BinOp),

    /// Implicit multiplication, such as `2x` or `x(x + 1)`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => BinOpKind::Mul.precedence(),
        }
    }
}

impl From<BinOp> for BinOpExt {
    fn from(op: BinOp) -> Self {
        BinOpExt::Op(op)
    }
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    ///
    /// If we are parsing the expression `1 + 2 * 3`, we will first parse the left-hand-side `1`,
    /// then the operator `+`, then the right-hand-side `2`. However, before we build the
    /// corresponding AST node, we should check if the operator after `2` has higher precedence
    /// than `+` (if it exists).
    ///
    /// If it does, we should parse the expression starting with `2` first, so that we get `2 * 3`
    /// as the right-hand-side to the `1 +` node. This works by calling into [`Self::parse_expr`]
    /// again, but with `rhs` (`2` in this case) as the `lhs` argument.
    ///
    /// If it does not (such as in the expression `3 * 2 + 1`), we build the AST node `3 * 2`
    /// first. Then, [`Self::parse_expr`] will pick up the `+ 1` part of the expression, and
    /// build the AST node `3 * 2 + 1`.
    ///
    /// Implicit multiplication is also handled here. In an expression such as `1 + 2x`, there is
    /// no operator after `2`, so we assume an implicit multiplication operator, because
    /// multiplication has higher precedence than addition, then continue with the same procedure
    /// as if the operator did exist. Since the operator is created out of thin air, the loop
    /// stops once [`Self::parse_expr`] no longer consumes any tokens.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    // this operator has a higher precedence or it is right associative, so we
                    // should parse its expression starting with `rhs` first
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
                } else {
                    // this operator has lower precedence, or equal precedence and
                    // left-associativity, as in `1 * 2 + 3` or `1 * 2 * 3`
                    //
                    // break out of the loop and let `lhs` become `1 * 2`; the outer loop will
                    // parse this operator next
                    break;
                }
            } else {
                // there is no operator; if the previous operator binds at least as tightly as
                // multiplication, implicit multiplication cannot take priority
                if precedence >= BinOpKind::Mul.precedence() {
                    break;
                }

                let before = input.cursor();
                rhs = Self::parse_expr(input, rhs, BinOpKind::Mul.precedence())?;
                if input.cursor() == before {
                    break;
                }
            }
        }

        // create the binary node representing `lhs op rhs`
        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        let op = match op {
            BinOpExt::Op(op) => op,
            BinOpExt::ImplicitMultiplication => BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: lhs.span().end..rhs.span().start,
            },
        };

        Ok(Expr::Binary(Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span: start_span..end_span,
        }))
    }

    /// After parsing the left-hand-side of a potential binary expression, parse ahead to see if
    /// there is a binary operator and a right-hand-side.
    ///
    /// Only operators with a precedence of at least `precedence` are consumed. If nothing after
    /// `lhs` can be parsed, `lhs` is returned as-is.
    pub fn parse_expr(
        input: &mut Parser,
        lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        input.nested(|input| {
            let mut lhs = lhs;
            loop {
                let mut input_ahead = input.clone();
                if let Ok(op) = input_ahead.try_parse_then::<BinOp, _>(|bin_op, input| {
                    if bin_op.precedence() >= precedence {
                        Ok(())
                    } else {
                        Err(input.error(kind::NonFatal))
                    }
                }) {
                    input.set_cursor(&input_ahead);
                    let rhs = Unary::parse_or_lower(input)?;
                    lhs = Self::complete_rhs(input, lhs, op.into(), rhs)?;
                } else if BinOpKind::Mul.precedence() >= precedence {
                    // implicit multiplication test

                    // ensure that we get here because there is *no* operator, not because the
                    // operator has lower precedence
                    if input_ahead.try_parse::<BinOp>().is_ok() {
                        break;
                    }

                    // if there is no expression, there is no implicit multiplication and all our
                    // attempts to parse a binary expression fail
                    match Unary::parse_or_lower(&mut input_ahead) {
                        Ok(rhs) => {
                            input.set_cursor(&input_ahead);
                            lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
                        },
                        Err(err) if err.fatal => return Err(err),
                        Err(_) => break,
                    }
                } else {
                    break;
                }
            }

            Ok(lhs)
        })
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}
