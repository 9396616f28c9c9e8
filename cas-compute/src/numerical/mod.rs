//! Numeric evaluation of expressions with `f64` arithmetic.
//!
//! This is the fallback used when an expression can't be compared exactly. Evaluation is strict:
//! every intermediate value must be finite, and free variables are errors rather than being
//! assigned sample values.

use crate::{funcs::Func, symbolic::expr::{Expr, Primary}};
use std::f64::consts::{E, PI};
use thiserror::Error;

/// An error that can occur while evaluating an expression numerically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The expression contains a symbol that isn't a known constant.
    #[error("`{0}` is a free variable")]
    FreeVariable(String),

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

    /// A function was applied outside its domain.
    #[error("`{0}` is undefined at this argument")]
    Domain(&'static str),

    /// A value overflowed, or is not a real number.
    #[error("the expression does not evaluate to a finite real number")]
    NonFinite,
}

/// Returns the value if it is finite.
fn finite(value: f64) -> Result<f64, EvalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvalError::NonFinite)
    }
}

/// The value of a symbol, which must be one of the constants `pi`, `π`, `e` or `E`.
fn constant(name: &str) -> Result<f64, EvalError> {
    match name {
        "pi" | "π" => Ok(PI),
        "e" | "E" => Ok(E),
        _ => Err(EvalError::FreeVariable(name.to_owned())),
    }
}

/// Evaluates an expression to a finite `f64`.
///
/// Every literal and intermediate value must fit in an `f64`. Integers past `f64::MAX` (about
/// `1.8e308`), such as `10^400`, are [`EvalError::NonFinite`] even where the relative tolerance
/// of a comparison would be met, so answers of that size are only compared symbolically.
pub fn eval(expr: &Expr) -> Result<f64, EvalError> {
    match expr {
        Expr::Primary(Primary::Integer(n)) => finite(n.to_f64()),
        Expr::Primary(Primary::Decimal(n)) => finite(n.to_f64()),
        Expr::Primary(Primary::Symbol(name)) => constant(name),
        Expr::Primary(Primary::Call(name, args)) => {
            let func = Func::from_name(name)
                .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;
            if !func.accepts(args.len()) {
                return Err(EvalError::Arity { name: func.name(), given: args.len() });
            }

            let args = args.iter().map(eval).collect::<Result<Vec<_>, _>>()?;
            let value = func.eval(&args).ok_or(EvalError::Domain(func.name()))?;
            finite(value)
        },
        Expr::Add(terms) => terms
            .iter()
            .try_fold(0.0, |sum, term| finite(sum + eval(term)?)),
        Expr::Mul(factors) => factors
            .iter()
            .try_fold(1.0, |product, factor| finite(product * eval(factor)?)),
        Expr::Exp(base, exp) => finite(eval(base)?.powf(eval(exp)?)),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use cas_parser::parser::{ast::expr::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn eval_str(source: &str) -> Result<f64, EvalError> {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        eval(&Expr::try_from(ast).unwrap())
    }

    #[test]
    fn arithmetic() {
        assert_float_relative_eq!(eval_str("1 + 2 * 3").unwrap(), 7.0);
        assert_float_relative_eq!(eval_str("2^10 / 4").unwrap(), 256.0);
        assert_float_relative_eq!(eval_str("-3^2").unwrap(), -9.0);
        assert_float_relative_eq!(eval_str("3.0000000001").unwrap(), 3.0000000001);
    }

    #[test]
    fn constants_and_functions() {
        assert_float_relative_eq!(eval_str("sin(pi / 6)").unwrap(), 0.5);
        assert_float_relative_eq!(eval_str("log(e^2)").unwrap(), 2.0);
        assert_float_relative_eq!(eval_str("E").unwrap(), E);
        assert_float_relative_eq!(eval_str("log(8, 2)").unwrap(), 3.0);
        assert_float_relative_eq!(eval_str("sqrt(2)^2").unwrap(), 2.0);
        assert_float_relative_eq!(eval_str("4!").unwrap(), 24.0);
    }

    #[test]
    fn free_variable() {
        assert_eq!(eval_str("x + 1"), Err(EvalError::FreeVariable("x".to_owned())));
    }

    #[test]
    fn unknown_and_arity() {
        let call = Expr::Primary(Primary::Call("f".to_owned(), vec![Expr::integer(1)]));
        assert_eq!(eval(&call), Err(EvalError::UnknownFunction("f".to_owned())));

        let call = Expr::Primary(Primary::Call("sin".to_owned(), Vec::new()));
        assert_eq!(eval(&call), Err(EvalError::Arity { name: "sin", given: 0 }));
    }

    #[test]
    fn non_finite() {
        assert_eq!(eval_str("1 / 0"), Err(EvalError::NonFinite));
        assert_eq!(eval_str("log(-1)"), Err(EvalError::NonFinite));
        assert_eq!(eval_str("10^400"), Err(EvalError::NonFinite));
        assert_eq!(eval_str("factorial(2.5)"), Err(EvalError::Domain("factorial")));
    }
}
