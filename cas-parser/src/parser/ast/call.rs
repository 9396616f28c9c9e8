use crate::{
    parser::{
        ast::{binary::Binary, expr::Expr, literal::LitSym, unary::Unary},
        error::{kind, Error},
        token::{op::{BinOp, BinOpKind}, CloseParen, Comma, OpenParen},
        Parse,
        Parser,
        Precedence,
    },
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The built-in functions, with the smallest and largest number of arguments each accepts.
///
/// Only these names can be called. Any other name followed by parentheses is a symbol multiplied
/// by the parenthesized expression.
pub const BUILTINS: &[(&str, usize, usize)] = &[
    ("sin", 1, 1),
    ("cos", 1, 1),
    ("tan", 1, 1),
    ("sec", 1, 1),
    ("csc", 1, 1),
    ("cot", 1, 1),
    ("asin", 1, 1),
    ("acos", 1, 1),
    ("atan", 1, 1),
    ("arcsin", 1, 1),
    ("arccos", 1, 1),
    ("arctan", 1, 1),
    ("sinh", 1, 1),
    ("cosh", 1, 1),
    ("tanh", 1, 1),
    ("exp", 1, 1),
    ("log", 1, 2),
    ("ln", 1, 1),
    ("log10", 1, 1),
    ("sqrt", 1, 1),
    ("cbrt", 1, 1),
    ("abs", 1, 1),
    ("factorial", 1, 1),
];

/// Returns the range of argument counts accepted by the built-in function with the given name,
/// or [`None`] if there is no such function.
pub fn builtin_arity(name: &str) -> Option<(usize, usize)> {
    BUILTINS
        .iter()
        .find(|(builtin, _, _)| *builtin == name)
        .map(|&(_, min, max)| (min, max))
}

/// A function call, such as `sin(x)`, `log(8, 2)`, or the implicit application `sin x`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the parenthesized, comma-separated arguments after the opening parenthesis.
    fn parse_args(input: &mut Parser, open_paren: &OpenParen) -> Result<(Vec<Expr>, usize), Error> {
        if let Ok(close_paren) = input.try_parse::<CloseParen>() {
            return Ok((Vec::new(), close_paren.span.end));
        }

        let mut args = vec![input.try_parse::<Expr>()?];
        while input.try_parse::<Comma>().is_ok() {
            args.push(input.try_parse::<Expr>()?);
        }

        let close_paren = input.try_parse::<CloseParen>().map_err(|_| {
            Error::new_fatal(vec![open_paren.span.clone()], kind::UnclosedParenthesis { opening: true })
        })?;
        Ok((args, close_paren.span.end))
    }
}

impl Call {
    /// Parses a call with the function raised to a power before its argument, as in `sin^2(x)`
    /// or `sin^2 x`. The power applies to the result, so both mean `sin(x)^2`.
    ///
    /// The power is a single operand, so `sin^2x(y)` is `sin(x(y))^2`. Returns a non-fatal error if
    /// the name is not a built-in function followed by `^`.
    pub fn parse_power(input: &mut Parser) -> Result<Binary, Error> {
        let name = input.try_parse::<LitSym>()?;
        if builtin_arity(&name.name).is_none() {
            return Err(Error::new(vec![name.span.clone()], kind::NonFatal));
        }

        let op = input.try_parse_then::<BinOp, _>(|op, input| {
            if op.kind == BinOpKind::Exp {
                Ok(())
            } else {
                Err(input.error(kind::NonFatal))
            }
        })?;
        let exp = input.nested(Unary::parse_left_or_operand)?;
        let call = Self::parse_after_name(input, name)?;

        Ok(Binary {
            span: call.span(),
            lhs: Box::new(Expr::Call(call)),
            op,
            rhs: Box::new(exp),
        })
    }

    /// Parses the arguments of a call to the built-in function `name`.
    fn parse_after_name(input: &mut Parser, name: LitSym) -> Result<Self, Error> {
        let Some((min, max)) = builtin_arity(&name.name) else {
            return Err(Error::new(vec![name.span.clone()], kind::NonFatal));
        };

        let (args, end) = if let Ok(open_paren) = input.try_parse::<OpenParen>() {
            Self::parse_args(input, &open_paren).map_err(|mut err| {
                err.fatal = true;
                err
            })?
        } else {
            // implicit application, as in `sin x` or `sqrt x^3`
            let operand = input.try_parse_with_fn(|input| {
                input.nested(|input| {
                    let operand = Unary::parse_left_or_operand(input)?;
                    Binary::parse_expr(input, operand, Precedence::Exp)
                })
            }).map_err(|err| {
                if err.fatal {
                    err
                } else {
                    Error::new_fatal(vec![name.span.clone()], kind::MissingArgument {
                        name: name.name.clone(),
                    })
                }
            })?;
            let end = operand.span().end;
            (vec![operand], end)
        };

        if args.len() < min || args.len() > max {
            return Err(Error::new_fatal(vec![name.span.start..end], kind::WrongArgumentCount {
                name: name.name.clone(),
                min,
                max,
                given: args.len(),
            }));
        }

        Ok(Self {
            span: name.span.start..end,
            name,
            args,
        })
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name = input.try_parse::<LitSym>()?;
        Self::parse_after_name(input, name)
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}
