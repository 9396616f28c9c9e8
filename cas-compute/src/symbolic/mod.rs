//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`SymExpr`] nodes. It's
//! similar to the [`cas_parser::parser::ast::expr::Expr`] nodes produced by [`cas_parser`], with
//! the main difference being that [`SymExpr`] nodes **flatten** out the tree structure.
//!
//! If you have a [`cas_parser::parser::ast::expr::Expr`], you can convert it to a [`SymExpr`]
//! using the [`TryFrom`] trait. Conversion is lossy, as [`SymExpr`] does not store span
//! information, but the resulting expression is semantically equivalent to the original.
//!
//! ```
//! use cas_compute::symbolic::SymExpr;
//! use cas_parser::parser::{ast::expr::Expr, Parser};
//!
//! let mut parser = Parser::new("x + (y + z)");
//! let ast_expr = parser.try_parse_full::<Expr>().unwrap();
//!
//! let expr = SymExpr::try_from(ast_expr).unwrap();
//! assert_eq!(expr, SymExpr::Add(vec![
//!     SymExpr::symbol("x"),
//!     SymExpr::symbol("y"),
//!     SymExpr::symbol("z"),
//! ]));
//! ```
//!
//! # Simplification
//!
//! [`simplify()`] rewrites an expression into a canonical form: a quotient of two expanded
//! polynomials whose variables are symbols, the constants `pi` and `e`, and irreducible function
//! calls and roots. Two expressions are equal exactly when their canonical forms are, within the
//! rules the engine knows about. [`is_zero()`] is the test built on top of it.
//!
//! ```
//! use cas_compute::symbolic::{is_zero, SymExpr};
//! use cas_parser::parser::{ast::expr::Expr, Parser};
//!
//! let parse = |src| SymExpr::try_from(Parser::new(src).try_parse_full::<Expr>().unwrap()).unwrap();
//!
//! // (x + 1)^2 - (x^2 + 2x + 1) = 0
//! let diff = parse("(x + 1)^2") - parse("x^2 + 2x + 1");
//! assert_eq!(is_zero(&diff), Ok(true));
//! ```
//!
//! For more information, see the [`mod@simplify`] module.

pub mod expr;
pub mod simplify;
pub mod step_collector;

pub use expr::{Expr as SymExpr, Primary};
pub use simplify::{is_zero, is_zero_with, simplify, simplify_with, Step, SimplifyError};
pub use step_collector::StepCollector;
