//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](cas_parser::parser::ast::expr::Expr) type from `cas_parser` is a recursive `enum`
//! that represents the AST of a mathematical expression. It's convenient for parsing, but not so
//! much for algebraic manipulation.
//!
//! This module defines a separate [`Expr`], which flattens the AST into lists of terms and
//! factors. Subtraction becomes addition of a negated term, division becomes multiplication by a
//! reciprocal, and parentheses disappear.
//!
//! # Strict equality
//!
//! Two expressions are **strictly equal** if they are the same kind of node with strictly equal
//! children, where the terms of an [`Expr::Add`] and the factors of an [`Expr::Mul`] may appear
//! in any order. `x^2 + 2x + 1` and `(x + 1)^2` are equal expressions, but they are not strictly
//! equal. Strict equality never reports false positives, and it does not need any
//! simplification to compute.
//!
//! The [`PartialEq`] and [`Eq`] implementations for [`Expr`] implement **strict equality**, not
//! semantic equality. Use [`crate::symbolic::is_zero`] on the difference of two expressions for
//! the latter.

use cas_error::{Error, ErrorKind};
use cas_parser::parser::{
    ast::{expr::Expr as AstExpr, literal::Literal},
    token::op::{BinOpKind, Precedence, UnaryOpKind},
};
use crate::primitive::{int, int_from_str, rational_from_decimal};
use rug::{Integer, Rational};
use std::{
    cmp::Ordering,
    fmt::{self, Display, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub},
};

/// A number literal could not be represented exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidLiteral {
    /// The literal as written.
    pub literal: String,
}

impl ErrorKind for InvalidLiteral {
    fn message(&self) -> String {
        format!("invalid number literal `{}`", self.literal)
    }

    fn labels(&self) -> Vec<String> {
        vec!["this number".to_owned()]
    }

    fn help(&self) -> Option<String> {
        Some("exponents in scientific notation must be between -1000 and 1000".to_owned())
    }
}

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Primary {
    /// An integer, such as `2` or `144`.
    Integer(Integer),

    /// A decimal number, such as `3.14` or `1e-9`. The value is stored exactly as its digits
    /// denote, but it is still an approximation of whatever the writer meant.
    Decimal(Rational),

    /// A variable, such as `x` or `y`. The constants `pi` and `e` are also symbols at this level.
    Symbol(String),

    /// A function call, such as `sin(x)` or `log(8, 2)`.
    Call(String, Vec<Expr>),
}

impl Display for Primary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(num) => write!(f, "{}", num),
            Self::Decimal(num) => write!(f, "{}", num.to_f64()),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(name, args) => {
                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
        }
    }
}

/// Adds two [`Primary`]s together. Two integers are added together. Otherwise, the two
/// [`Primary`]s are wrapped in an [`Expr::Add`].
impl Add<Primary> for Primary {
    type Output = Expr;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                Expr::Primary(Primary::Integer(lhs + rhs))
            },
            (lhs, rhs) => Expr::Add(vec![
                Expr::Primary(lhs),
                Expr::Primary(rhs),
            ]),
        }
    }
}

/// Multiplies two [`Primary`]s together. Two integers are multiplied together. Otherwise, the two
/// [`Primary`]s are wrapped in an [`Expr::Mul`].
impl Mul<Primary> for Primary {
    type Output = Expr;

    fn mul(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Primary::Integer(lhs), Primary::Integer(rhs)) => {
                Expr::Primary(Primary::Integer(lhs * rhs))
            },
            (lhs, rhs) => Expr::Mul(vec![
                Expr::Primary(lhs),
                Expr::Primary(rhs),
            ]),
        }
    }
}

/// A mathematical expression with information about its terms and factors.
///
/// This type should be distinguished from the [`cas_parser::parser::ast::expr::Expr`] type, which
/// is produced by [`cas_parser`]. The main difference is that this type **flattens** out the tree
/// structure. For example, the expression `x + (y + z)` would be represented as a single
/// [`Expr::Add`] node with _three_ children, `x`, `y`, and `z`.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Debug, Clone, Eq, Hash)]
pub enum Expr {
    /// A single term or factor.
    Primary(Primary),

    /// Multiple terms added together.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together.
    Mul(Vec<Expr>),

    /// An expression raised to a power.
    Exp(Box<Expr>, Box<Expr>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                    for term in iter {
                        write!(f, " + {}", term)?;
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if let Some(factor) = iter.next() {
                    if factor.cmp_precedence(self) != Ordering::Greater {
                        write!(f, "({})", factor)?;
                    } else {
                        write!(f, "{}", factor)?;
                    }
                    for factor in iter {
                        if factor.cmp_precedence(self) != Ordering::Greater {
                            write!(f, " * ({})", factor)?;
                        } else {
                            write!(f, " * {}", factor)?;
                        }
                    }
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                if base.cmp_precedence(self) != Ordering::Greater || base.is_negative_number() {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "^")?;
                if exp.cmp_precedence(self) == Ordering::Less || exp.is_negative_number() {
                    write!(f, "({})", exp)?;
                } else {
                    write!(f, "{}", exp)?;
                }
                Ok(())
            },
        }
    }
}

impl Expr {
    /// Creates an [`Expr::Primary`] holding the given integer.
    pub fn integer<T>(n: T) -> Self
    where
        Integer: From<T>,
    {
        Self::Primary(Primary::Integer(int(n)))
    }

    /// Creates an [`Expr::Primary`] holding the given symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Primary(Primary::Symbol(name.into()))
    }

    /// Returns the precedence of the expression.
    fn precedence(&self) -> Option<Precedence> {
        match self {
            Self::Primary(_) => None,
            Self::Add(_) => Some(BinOpKind::Add.precedence()),
            Self::Mul(_) => Some(BinOpKind::Mul.precedence()),
            Self::Exp(_, _) => Some(BinOpKind::Exp.precedence()),
        }
    }

    /// Compares the precedence of two expressions.
    ///
    /// This is used to determine if parentheses are needed around the given expression when
    /// printing.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        match (self.precedence(), other.precedence()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
        }
    }

    /// Returns true if the expression is a negative number, which needs parentheses around it in
    /// a power.
    fn is_negative_number(&self) -> bool {
        match self {
            Self::Primary(Primary::Integer(n)) => n.cmp0() == Ordering::Less,
            Self::Primary(Primary::Decimal(n)) => n.cmp0() == Ordering::Less,
            _ => false,
        }
    }

    /// If the expression is a [`Primary::Integer`], returns a reference to the contained integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Primary(Primary::Integer(int)) => Some(int),
            _ => None,
        }
    }

    /// If the expression is a [`Primary::Symbol`], returns a reference to the contained symbol.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Primary(Primary::Symbol(sym)) => Some(sym),
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and simplifies the expression
    /// into the single term / factor, or an [`Expr::Primary`] containing the integer 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::integer(0)
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::integer(1)
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns true if a symbol with the given name appears anywhere in the expression.
    pub fn contains_symbol(&self, name: &str) -> bool {
        match self {
            Self::Primary(Primary::Symbol(sym)) => sym == name,
            Self::Primary(Primary::Call(_, args)) => args.iter().any(|arg| arg.contains_symbol(name)),
            Self::Primary(_) => false,
            Self::Add(children) | Self::Mul(children) => {
                children.iter().any(|child| child.contains_symbol(name))
            },
            Self::Exp(base, exp) => base.contains_symbol(name) || exp.contains_symbol(name),
        }
    }
}

/// Builds the expression `numerator * denominator^-1`. No simplification is done.
pub fn make_fraction(numerator: Expr, denominator: Expr) -> Expr {
    numerator * Expr::Exp(Box::new(denominator), Box::new(Expr::integer(-1)))
}

/// Checks if two expressions are **strictly** equal.
///
/// For more information about strict equality, see the [module-level documentation](self).
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs == rhs,
            (Self::Add(lhs), Self::Add(rhs)) | (Self::Mul(lhs), Self::Mul(rhs)) => {
                lhs.len() == rhs.len()
                    && lhs.iter().all(|lhs| rhs.contains(lhs))
                    && rhs.iter().all(|rhs| lhs.contains(rhs))
            },
            (Self::Exp(lhs_base, lhs_exp), Self::Exp(rhs_base, rhs_exp)) => {
                lhs_base == rhs_base && lhs_exp == rhs_exp
            },
            _ => false,
        }
    }
}

/// Converts a literal into a number or symbol.
fn convert_literal(literal: Literal) -> Result<Expr, Error> {
    match literal {
        Literal::Integer(lit) => match int_from_str(&lit.value) {
            Some(n) => Ok(Expr::Primary(Primary::Integer(n))),
            None => Err(Error::new(vec![lit.span], InvalidLiteral { literal: lit.value })),
        },
        Literal::Float(lit) => match rational_from_decimal(&lit.value) {
            Some(n) => Ok(Expr::Primary(Primary::Decimal(n))),
            None => Err(Error::new(vec![lit.span], InvalidLiteral { literal: lit.value })),
        },
        Literal::Symbol(sym) => Ok(Expr::Primary(Primary::Symbol(sym.name))),
    }
}

/// Converts a parsed expression into its flattened form.
///
/// Fails only if a number literal cannot be represented, such as `1e99999`.
impl TryFrom<AstExpr> for Expr {
    type Error = Error;

    fn try_from(expr: AstExpr) -> Result<Self, Self::Error> {
        match expr {
            AstExpr::Literal(literal) => convert_literal(literal),
            AstExpr::Paren(paren) => Self::try_from(paren.into_innermost()),
            AstExpr::Call(call) => {
                let args = call.args
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Primary(Primary::Call(call.name.name, args)))
            },
            AstExpr::Unary(unary) => {
                let operand = Self::try_from(*unary.operand)?;
                Ok(match unary.op.kind {
                    UnaryOpKind::Neg => -operand,
                    UnaryOpKind::Pos => operand,
                    UnaryOpKind::Factorial => {
                        Self::Primary(Primary::Call("factorial".to_owned(), vec![operand]))
                    },
                })
            },
            AstExpr::Binary(bin) => match bin.op.kind {
                BinOpKind::Exp => Ok(Self::Exp(
                    Box::new(Self::try_from(*bin.lhs)?),
                    Box::new(Self::try_from(*bin.rhs)?),
                )),
                BinOpKind::Add | BinOpKind::Sub => {
                    // iteratively flatten the chain into terms; the flag marks terms that are
                    // subtracted
                    let mut terms = Self::Add(Vec::new());
                    let mut stack = vec![(AstExpr::Binary(bin), false)];
                    while let Some((expr, negate)) = stack.pop() {
                        match expr {
                            AstExpr::Binary(bin) if matches!(bin.op.kind, BinOpKind::Add | BinOpKind::Sub) => {
                                let negate_rhs = negate ^ (bin.op.kind == BinOpKind::Sub);
                                stack.push((*bin.rhs, negate_rhs));
                                stack.push((*bin.lhs, negate));
                            },
                            expr => {
                                let term = Self::try_from(expr)?;
                                terms += if negate { -term } else { term };
                            },
                        }
                    }
                    Ok(terms.downgrade())
                },
                BinOpKind::Mul | BinOpKind::Div => {
                    // same as above, with divisors as reciprocal factors
                    let mut factors = Self::Mul(Vec::new());
                    let mut stack = vec![(AstExpr::Binary(bin), false)];
                    while let Some((expr, invert)) = stack.pop() {
                        match expr {
                            AstExpr::Binary(bin) if matches!(bin.op.kind, BinOpKind::Mul | BinOpKind::Div) => {
                                let invert_rhs = invert ^ (bin.op.kind == BinOpKind::Div);
                                stack.push((*bin.rhs, invert_rhs));
                                stack.push((*bin.lhs, invert));
                            },
                            expr => {
                                let factor = Self::try_from(expr)?;
                                factors *= if invert {
                                    Self::Exp(Box::new(factor), Box::new(Self::integer(-1)))
                                } else {
                                    factor
                                };
                            },
                        }
                    }
                    Ok(factors.downgrade())
                },
            },
        }
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except for the case where the operands
/// are a mix of [`Primary`] and / or [`Expr::Add`], in which case both are combined in one list
/// of terms (flattening).
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs + rhs,
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Adds two [`Expr`]s together, flattening into `self` if it is already an [`Expr::Add`].
impl AddAssign for Expr {
    fn add_assign(&mut self, rhs: Self) {
        match self {
            Self::Add(terms) => match rhs {
                Self::Add(rhs_terms) => terms.extend(rhs_terms),
                other => terms.push(other),
            },
            lhs => {
                let owned = std::mem::replace(lhs, Self::Add(Vec::new()));
                *lhs = owned + rhs;
            },
        }
    }
}

/// Subtracts two [`Expr`]s as `lhs + -rhs`. No simplification is done.
impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Primary`] and / or [`Expr::Mul`], in which case both are combined in
/// one list of factors (flattening).
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Primary(lhs), Self::Primary(rhs)) => lhs * rhs,
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

/// Multiplies two [`Expr`]s together, flattening into `self` if it is already an [`Expr::Mul`].
impl MulAssign for Expr {
    fn mul_assign(&mut self, rhs: Self) {
        match self {
            Self::Mul(factors) => match rhs {
                Self::Mul(rhs_factors) => factors.extend(rhs_factors),
                other => factors.push(other),
            },
            lhs => {
                let owned = std::mem::replace(lhs, Self::Mul(Vec::new()));
                *lhs = owned * rhs;
            },
        }
    }
}

/// Negates the expression. Numbers are negated in place; anything else becomes `-1 * expr`.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Primary(Primary::Integer(n)) => Self::Primary(Primary::Integer(-n)),
            Self::Primary(Primary::Decimal(n)) => Self::Primary(Primary::Decimal(-n)),
            expr => Self::integer(-1) * expr,
        }
    }
}
