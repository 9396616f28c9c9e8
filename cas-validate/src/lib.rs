//! Checks whether a student's answer to a math question is equivalent to the reference answer,
//! and whether it names one of the expected units.
//!
//! Answers are parsed into a [`SymbolicForm`], either a single expression or an equation, and
//! compared by [`check_equivalence`]: symbolically first, then numerically when the symbolic
//! engine can't decide. The unit check ([`check_units`]) is a plain text search over the raw
//! answer.
//!
//! ```
//! use cas_validate::{are_equivalent, parse};
//!
//! let student = parse("(x - 2)(x + 2)").unwrap();
//! let reference = parse("x^2 - 4").unwrap();
//! assert!(are_equivalent(&student, &reference));
//!
//! // a bare expression can match an equation with everything moved to one side
//! let reference = parse("x^2 = 4").unwrap();
//! assert!(are_equivalent(&student, &reference));
//! ```
//!
//! [`validate`] runs the whole check for one [`ValidationRequest`].

pub mod equivalence;
pub mod error;
pub mod form;
pub mod request;
pub mod units;

pub use equivalence::{are_equivalent, check_equivalence, EquivalenceResult, Method};
pub use error::ParseError;
pub use form::{parse, SymbolicForm};
pub use request::{validate, ValidationRequest, ValidationResponse};
pub use units::{check_units, UnitCheckResult};
