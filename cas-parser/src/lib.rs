//! Tokenizer and parser for the infix mathematical notation students type into answer boxes.
//!
//! The grammar covers arithmetic with the usual precedence, exponentiation (`^` or `**`),
//! factorials, calls to a fixed table of built-in functions (including `sin^2(x)` for
//! `sin(x)^2`), and implicit multiplication (`2x`, `x y`, `2(x + 1)`). Other names are free
//! symbols, and a multi-letter name is a product of letters, so `xy` is `x * y`.
//!
//! ```
//! use cas_parser::parser::{ast::expr::Expr, Parser};
//!
//! let mut parser = Parser::new("2x^2 + sin(x)");
//! let expr = parser.try_parse_full::<Expr>().unwrap();
//! assert_eq!(expr.to_string(), "2 * x ^ 2 + sin(x)");
//! ```

pub mod parser;
pub mod tokenizer;
