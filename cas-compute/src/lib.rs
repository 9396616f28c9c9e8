//! Symbolic and numeric computation over parsed math expressions.
//!
//! - [`symbolic`] converts the parser's AST into a flattened [`SymExpr`] tree, and implements
//! the simplification engine that decides whether an expression is exactly zero.
//! - [`numerical`] evaluates a [`SymExpr`] to a floating-point number.
//!
//! [`SymExpr`]: symbolic::SymExpr

pub mod funcs;
pub mod numerical;
pub mod primitive;
pub mod symbolic;
