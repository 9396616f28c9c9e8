//! Simplification of expressions into a canonical form.
//!
//! An expression is converted, bottom-up, into a [`Canonical`] form: a [`Fraction`] of two
//! expanded polynomials over [`Atom`]s with exact rational coefficients. Along the way, a fixed
//! set of rewrites is applied (see [`rules`]), each reported to a [`StepCollector`] as a
//! [`Step`]. Two expressions that the rules can prove equal end up with identical canonical
//! forms, so an expression is zero exactly when its canonical numerator is the zero polynomial.
//!
//! The conversion refuses to build forms that grow too large (see [`poly::MAX_TERMS`] and
//! [`rules::power::MAX_EXPONENT`]), and fails on division by zero. Callers that need an answer
//! anyway should fall back to numeric evaluation.
//!
//! [`Fraction`]: fraction::Fraction
//! [`Atom`]: atom::Atom

pub mod atom;
pub mod canonical;
pub mod fraction;
pub mod poly;
pub mod rules;
pub mod step;

use crate::{funcs::Func, symbolic::{expr::{Expr, Primary}, step_collector::StepCollector}};
use fraction::Fraction;
use rug::Rational;
use thiserror::Error;

pub use canonical::Canonical;
pub use step::Step;

/// An error that stops the construction of a canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimplifyError {
    /// A denominator simplified to zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A function was applied outside its domain, such as `log(0)`.
    #[error("`{func}` is undefined at this argument")]
    Undefined {
        /// The name of the function.
        func: &'static str,
    },

    /// A function name that isn't builtin.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    /// A builtin function was given the wrong number of arguments.
    #[error("the function `{name}` does not take {given} argument(s)")]
    Arity {
        /// The name of the function.
        name: &'static str,

        /// The number of arguments given.
        given: usize,
    },

    /// An exponent or root index was too large to compute.
    #[error("exponent is too large to compute exactly")]
    ExponentTooLarge,

    /// An expansion grew past the term limits.
    #[error("expansion is too large")]
    ExpansionLimit,

    /// The form is nonzero, but a decimal literal contributed to it, so it may only differ from
    /// zero by rounding.
    #[error("the expression contains decimals and cannot be compared exactly")]
    Inexact,
}

/// Builds canonical forms, reporting rewrites to a [`StepCollector`].
///
/// The arithmetic methods here wrap the ones on [`Fraction`], applying
/// [`Simplifier::reduce`] to every result.
pub(crate) struct Simplifier<'a> {
    step_collector: &'a mut dyn StepCollector<Step>,
}

impl<'a> Simplifier<'a> {
    pub(crate) fn new(step_collector: &'a mut dyn StepCollector<Step>) -> Self {
        Self { step_collector }
    }

    fn step(&mut self, step: Step) {
        self.step_collector.push(step);
    }

    /// Computes the canonical form of an expression.
    pub(crate) fn canonicalize(&mut self, expr: &Expr) -> Result<Canonical, SimplifyError> {
        match expr {
            Expr::Primary(Primary::Integer(n)) => {
                Ok(Canonical::exact(Fraction::constant(Rational::from(n))))
            },
            Expr::Primary(Primary::Decimal(n)) => Ok(Canonical {
                value: Fraction::constant(n.clone()),
                inexact: true,
            }),
            Expr::Primary(Primary::Symbol(name)) => {
                Ok(Canonical::exact(Fraction::atom(atom::Atom::symbol(name))))
            },
            Expr::Primary(Primary::Call(name, args)) => {
                let func = Func::from_name(name)
                    .ok_or_else(|| SimplifyError::UnknownFunction(name.clone()))?;
                if !func.accepts(args.len()) {
                    return Err(SimplifyError::Arity { name: func.name(), given: args.len() });
                }

                let mut inexact = false;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    let arg = self.canonicalize(arg)?;
                    inexact |= arg.inexact;
                    values.push(arg.value);
                }
                Ok(Canonical { value: self.call(func, values)?, inexact })
            },
            Expr::Add(terms) => {
                let mut sum = Canonical::exact(Fraction::zero());
                for term in terms {
                    let term = self.canonicalize(term)?;
                    sum = Canonical {
                        value: self.add(&sum.value, &term.value)?,
                        inexact: sum.inexact || term.inexact,
                    };
                }
                Ok(sum)
            },
            Expr::Mul(factors) => {
                let mut product = Canonical::exact(Fraction::one());
                for factor in factors {
                    let factor = self.canonicalize(factor)?;
                    product = Canonical {
                        value: self.mul(&product.value, &factor.value)?,
                        inexact: product.inexact || factor.inexact,
                    };
                }
                Ok(product)
            },
            Expr::Exp(base, exp) => {
                let base = self.canonicalize(base)?;
                let exp = self.canonicalize(exp)?;
                Ok(Canonical {
                    value: self.pow(base.value, exp.value)?,
                    inexact: base.inexact || exp.inexact,
                })
            },
        }
    }

    fn add(&mut self, lhs: &Fraction, rhs: &Fraction) -> Result<Fraction, SimplifyError> {
        let sum = lhs.add(rhs)?;
        self.reduce(sum)
    }

    fn mul(&mut self, lhs: &Fraction, rhs: &Fraction) -> Result<Fraction, SimplifyError> {
        let is_sum = |f: &Fraction| f.numer().len() > 1 || f.denom().len() > 1;
        if is_sum(lhs) && !rhs.is_one() || is_sum(rhs) && !lhs.is_one() {
            self.step(Step::ExpandProduct);
        }
        let product = lhs.mul(rhs)?;
        self.reduce(product)
    }

    fn div(&mut self, lhs: &Fraction, rhs: &Fraction) -> Result<Fraction, SimplifyError> {
        let quotient = lhs.div(rhs)?;
        self.reduce(quotient)
    }
}

/// Simplifies an expression into its canonical form.
///
/// The result is written as a sum of products over a common denominator, with every rewrite of
/// [`rules`] applied.
pub fn simplify(expr: &Expr) -> Result<Expr, SimplifyError> {
    simplify_with(expr, &mut ())
}

/// Simplifies an expression into its canonical form, reporting each rewrite to the given
/// collector.
pub fn simplify_with(
    expr: &Expr,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<Expr, SimplifyError> {
    Canonical::from_expr_with(expr, step_collector).map(|form| form.to_expr())
}

/// Decides whether an expression is zero.
///
/// Returns `Ok(true)` if the canonical form is zero, and `Ok(false)` if it is a nonzero exact
/// form. A nonzero form that a decimal literal contributed to returns
/// [`SimplifyError::Inexact`], since it can't be told apart from rounding error.
pub fn is_zero(expr: &Expr) -> Result<bool, SimplifyError> {
    is_zero_with(expr, &mut ())
}

/// Decides whether an expression is zero, reporting each rewrite to the given collector. See
/// [`is_zero`].
pub fn is_zero_with(
    expr: &Expr,
    step_collector: &mut dyn StepCollector<Step>,
) -> Result<bool, SimplifyError> {
    let form = Canonical::from_expr_with(expr, step_collector)?;
    if form.is_zero() {
        Ok(true)
    } else if form.inexact {
        Err(SimplifyError::Inexact)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use cas_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Expr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        Expr::try_from(ast).unwrap()
    }

    /// Decides whether two expressions are equal.
    fn equal(lhs: &str, rhs: &str) -> Result<bool, SimplifyError> {
        is_zero(&(parse(lhs) - parse(rhs)))
    }

    #[test]
    fn polynomial_identities() {
        assert_eq!(equal("2x + 3x", "5x"), Ok(true));
        assert_eq!(equal("(x + 1)^2", "x^2 + 2x + 1"), Ok(true));
        assert_eq!(equal("(x - y)(x + y)", "x^2 - y^2"), Ok(true));
        assert_eq!(equal("(a + b)^3", "a^3 + 3a^2 b + 3a b^2 + b^3"), Ok(true));
        assert_eq!(equal("x^2", "x^3"), Ok(false));
        assert_eq!(equal("x + 1", "x"), Ok(false));
    }

    #[test]
    fn rational_functions() {
        assert_eq!(equal("(x^2 - 1) / (x - 1)", "x + 1"), Ok(true));
        assert_eq!(equal("1/x + 1/y", "(x + y) / (x y)"), Ok(true));
        assert_eq!(equal("x / (2x)", "1/2"), Ok(true));
        assert_eq!(equal("1 / (x + 1)", "1 / x"), Ok(false));
    }

    #[test]
    fn function_arguments_are_cancelled() {
        assert_eq!(equal("sin((x^2 - 1)/(x^2 - 2x + 1))", "sin((x + 1)/(x - 1))"), Ok(true));
        assert_eq!(equal("log((x y + y)/(x^2 y - y))", "log(1/(x - 1))"), Ok(true));
    }

    #[test]
    fn roots() {
        assert_eq!(equal("sqrt(8)", "2 sqrt(2)"), Ok(true));
        assert_eq!(equal("sqrt(2) sqrt(3)", "sqrt(6)"), Ok(true));
        assert_eq!(equal("1 / sqrt(2)", "sqrt(2) / 2"), Ok(true));
        assert_eq!(equal("cbrt(4)", "cbrt(2)^2"), Ok(true));
        assert_eq!(equal("8^(1/3)", "2"), Ok(true));
        assert_eq!(equal("sqrt(x)^2", "x"), Ok(true));
        assert_eq!(equal("x^(1/2) x^(1/3)", "x^(5/6)"), Ok(true));
        assert_eq!(equal("(1 + sqrt(2))(1 - sqrt(2))", "-1"), Ok(true));
        assert_eq!(equal("sqrt(2)", "2^(1/3)"), Ok(false));
    }

    #[test]
    fn trigonometry() {
        assert_eq!(equal("sin(x)^2 + cos(x)^2", "1"), Ok(true));
        assert_eq!(equal("tan(x)", "sin(x) / cos(x)"), Ok(true));
        assert_eq!(equal("sin(-x)", "-sin(x)"), Ok(true));
        assert_eq!(equal("cos(-x)", "cos(x)"), Ok(true));
        assert_eq!(equal("sin(2x)", "2 sin(x) cos(x)"), Ok(true));
        assert_eq!(equal("cos(2x)", "1 - 2sin(x)^2"), Ok(true));
        assert_eq!(equal("sec(x)^2", "1 + tan(x)^2"), Ok(true));
        assert_eq!(equal("sin(x + pi)", "-sin(x)"), Ok(true));
        assert_eq!(equal("cos(x - pi/2)", "sin(x)"), Ok(true));
        assert_eq!(equal("sin(pi/2 - x)", "cos(x)"), Ok(true));
        assert_eq!(equal("tan(x + pi)", "tan(x)"), Ok(true));
        assert_eq!(equal("cos(x + 2pi)", "cos(x)"), Ok(true));
        assert_eq!(equal("sin(x)", "cos(x)"), Ok(false));
    }

    #[test]
    fn trigonometric_values() {
        assert_eq!(equal("sin(pi/6)", "1/2"), Ok(true));
        assert_eq!(equal("cos(pi/4)", "sqrt(2)/2"), Ok(true));
        assert_eq!(equal("sin(2pi/3)", "sqrt(3)/2"), Ok(true));
        assert_eq!(equal("cos(π)", "-1"), Ok(true));
        assert_eq!(equal("sin(13pi/6)", "1/2"), Ok(true));
        assert_eq!(equal("tan(pi/4)", "1"), Ok(true));
    }

    #[test]
    fn exp_and_log() {
        assert_eq!(equal("e^x", "exp(x)"), Ok(true));
        assert_eq!(equal("exp(x + 1)", "e exp(x)"), Ok(true));
        assert_eq!(equal("exp(2x)", "exp(x)^2"), Ok(true));
        assert_eq!(equal("exp(log(x))", "x"), Ok(true));
        assert_eq!(equal("exp(2 log(x))", "x^2"), Ok(true));
        assert_eq!(equal("ln(x)", "log(x)"), Ok(true));
        assert_eq!(equal("log(e)", "1"), Ok(true));
        assert_eq!(equal("log(1)", "0"), Ok(true));
        assert_eq!(equal("log(8, 2)", "log(8) / log(2)"), Ok(true));
        assert_eq!(equal("log(8, 2)", "3"), Ok(true));
        assert_eq!(equal("log(12)", "2log(2) + log(3)"), Ok(true));
        assert_eq!(equal("log(1/4)", "-2log(2)"), Ok(true));
        assert_eq!(equal("exp(log(8))", "8"), Ok(true));
        assert_eq!(equal("log10(x)", "log(x) / log(10)"), Ok(true));
        assert_eq!(equal("exp(0)", "1"), Ok(true));
    }

    #[test]
    fn special_values() {
        assert_eq!(equal("asin(0) + atan(0) + sinh(0) + tanh(0)", "0"), Ok(true));
        assert_eq!(equal("acos(1)", "0"), Ok(true));
        assert_eq!(equal("cosh(0)", "1"), Ok(true));
        assert_eq!(equal("abs(-3)", "3"), Ok(true));
        assert_eq!(equal("abs(-x)", "abs(x)"), Ok(true));
        assert_eq!(equal("5!", "120"), Ok(true));
        assert_eq!(equal("factorial(0)", "1"), Ok(true));
        assert_eq!(equal("atan(-x)", "-atan(x)"), Ok(true));
    }

    #[test]
    fn inexact_forms() {
        assert_eq!(equal("0.5x", "x/2"), Ok(true));
        assert_eq!(equal("0.1 + 0.2", "0.3"), Ok(true));
        assert_eq!(equal("3.0000000001", "3"), Err(SimplifyError::Inexact));
    }

    #[test]
    fn failures() {
        assert_eq!(equal("1/0", "1"), Err(SimplifyError::DivisionByZero));
        assert_eq!(equal("1/(x - x)", "1"), Err(SimplifyError::DivisionByZero));
        assert_eq!(equal("x^1001", "x"), Err(SimplifyError::ExponentTooLarge));
        assert_eq!(equal("(x + y + 1)^1000", "1"), Err(SimplifyError::ExpansionLimit));
        assert_eq!(equal("log(0)", "1"), Err(SimplifyError::Undefined { func: "log" }));
    }

    #[test]
    fn unknown_and_arity() {
        let call = Expr::Primary(Primary::Call("f".to_owned(), vec![Expr::symbol("x")]));
        assert_eq!(is_zero(&call), Err(SimplifyError::UnknownFunction("f".to_owned())));

        let call = Expr::Primary(Primary::Call("sin".to_owned(), Vec::new()));
        assert_eq!(is_zero(&call), Err(SimplifyError::Arity { name: "sin", given: 0 }));
    }

    #[test]
    fn simplify_is_idempotent() {
        for source in [
            "(x + 1)^2 / (x - 1)",
            "sqrt(8) + sin(x)^3 + cos(x)^3",
            "0.25 x + exp(2x) log(y)",
            "cbrt(2) / (1 + x)",
            "2^x + (-8)^(1/3)",
        ] {
            let once = Canonical::from_expr(&parse(source)).unwrap();
            let twice = Canonical::from_expr(&once.to_expr()).unwrap();
            assert_eq!(once, twice, "{}", source);
        }
    }

    #[test]
    fn simplify_output() {
        assert_eq!(simplify(&parse("x + x")).unwrap().to_string(), "2 * x");
        assert_eq!(simplify(&parse("(x + 1)(x - 1) + 1")).unwrap().to_string(), "x^2");
        assert_eq!(simplify(&parse("sin(x)^2 + cos(x)^2")).unwrap().to_string(), "1");
    }

    #[test]
    fn steps_are_reported() {
        let mut steps = Vec::new();
        simplify_with(&parse("tan(-x) + sqrt(8)"), &mut steps).unwrap();
        assert!(steps.contains(&Step::TrigAsSinCos));
        assert!(steps.contains(&Step::Parity(Func::Sin)));
        assert!(steps.contains(&Step::RootAsPower));
        assert!(steps.contains(&Step::ExactRoot));
    }
}
