use cas_compute::symbolic::SymExpr;
use cas_parser::parser::{ast::expr::Expr as AstExpr, Parser};
use crate::error::ParseError;

/// A parsed answer: a single expression, or an equation between two expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicForm {
    /// A single value, such as `x^2 - 4`.
    Expression(SymExpr),

    /// An equation, such as `x^2 = 4`.
    Equation {
        /// The left-hand side.
        lhs: SymExpr,

        /// The right-hand side.
        rhs: SymExpr,
    },
}

impl SymbolicForm {
    /// Returns true if this is an [`SymbolicForm::Equation`].
    pub fn is_equation(&self) -> bool {
        matches!(self, Self::Equation { .. })
    }
}

/// Parses a single expression.
fn parse_expr(text: &str) -> Result<SymExpr, ParseError> {
    let ast = Parser::new(text)
        .try_parse_full::<AstExpr>()
        .map_err(|source| ParseError::Syntax { text: text.to_owned(), source })?;
    SymExpr::try_from(ast).map_err(|source| ParseError::Literal { text: text.to_owned(), source })
}

/// Parses an answer.
///
/// The text is trimmed, then split at the first `=`, if there is one, into the two sides of an
/// equation. Any further `=` belongs to the right-hand side, where it is a syntax error.
pub fn parse(text: &str) -> Result<SymbolicForm, ParseError> {
    let text = text.trim();
    match text.split_once('=') {
        Some((lhs, rhs)) => Ok(SymbolicForm::Equation {
            lhs: parse_expr(lhs)?,
            rhs: parse_expr(rhs)?,
        }),
        None => parse_expr(text).map(SymbolicForm::Expression),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn equation() {
        let form = parse("x + 1 = 2").unwrap();
        assert_eq!(form, SymbolicForm::Equation {
            lhs: SymExpr::Add(vec![SymExpr::symbol("x"), SymExpr::integer(1)]),
            rhs: SymExpr::integer(2),
        });
        assert!(form.is_equation());
    }

    #[test]
    fn expression() {
        let form = parse("  x^2 - 4 ").unwrap();
        assert!(!form.is_equation());
        assert_eq!(form, SymbolicForm::Expression(SymExpr::Add(vec![
            SymExpr::Exp(Box::new(SymExpr::symbol("x")), Box::new(SymExpr::integer(2))),
            SymExpr::integer(-4),
        ])));
    }

    #[test]
    fn second_equals_is_an_error() {
        let err = parse("x = 1 = 2").unwrap_err();
        assert_eq!(err.text(), " 1 = 2");
        assert_eq!(err.error().spans, vec![3..4]);
    }

    #[test]
    fn malformed() {
        for text in ["", "   ", "(x + 1", "x +", "= 2", "x = ", "2 * * 3", "x)"] {
            assert!(parse(text).is_err(), "{:?}", text);
        }
    }

    #[test]
    fn literal_out_of_range() {
        let err = parse("1e5000").unwrap_err();
        assert!(matches!(err, ParseError::Literal { .. }));
    }

    #[test]
    fn split_names_are_products() {
        assert_eq!(parse("xy").unwrap(), parse("x y").unwrap());
        assert_eq!(parse("2ab").unwrap(), parse("2 a b").unwrap());
    }

    #[test]
    fn deep_nesting_is_rejected_on_a_small_stack() {
        let sources = [
            format!("{}x{}", "sin(".repeat(250), ")".repeat(250)),
            format!("{}x", "sin ".repeat(250)),
            format!("3{}", "!".repeat(500)),
            format!("{}x{}", "sin(".repeat(20), ")".repeat(20)),
        ];

        let results = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(move || sources.iter().map(|source| parse(source).is_ok()).collect::<Vec<_>>())
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(results, vec![false, false, false, true]);
    }
}
