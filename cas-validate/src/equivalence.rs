//! Decides whether two answers are mathematically equivalent.
//!
//! The comparison is symbolic first: the difference of the two answers is reduced to a canonical
//! form with [`cas_compute::symbolic`], and the answers are equivalent if it is exactly zero. If
//! the symbolic engine can't decide (decimals, division by zero, expansions over its limits,
//! unknown functions), both answers are evaluated to numbers and compared with a tolerance.
//! Answers that can't be evaluated, such as equations or expressions with free variables, are
//! then not equivalent.

use cas_compute::{
    numerical::{self, EvalError},
    symbolic::{is_zero_with, SimplifyError, Step, SymExpr},
};
use crate::form::SymbolicForm;
use serde::Serialize;
use tracing::{debug, trace};

/// The detail reported for equivalent answers.
pub const EQUIVALENT: &str = "Expressions are equivalent";

/// The detail reported for answers that differ.
pub const DIFFERENT: &str = "Expressions differ";

/// Relative tolerance of the numeric comparison.
pub const RELATIVE_TOLERANCE: f64 = 1e-9;

/// Absolute tolerance of the numeric comparison, used near zero.
pub const ABSOLUTE_TOLERANCE: f64 = 1e-9;

/// How an [`EquivalenceResult`] was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// The symbolic difference was decided exactly.
    Symbolic,

    /// The symbolic engine failed, and the answers were compared numerically.
    Numeric,

    /// Neither comparison applied, so the answers are reported as different.
    Undecided,
}

/// The outcome of comparing two answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquivalenceResult {
    /// Whether the answers are equivalent.
    pub equivalent: bool,

    /// How the result was found.
    pub method: Method,
}

impl EquivalenceResult {
    /// The human-readable detail, which only depends on [`EquivalenceResult::equivalent`].
    pub fn detail(&self) -> &'static str {
        if self.equivalent {
            EQUIVALENT
        } else {
            DIFFERENT
        }
    }
}

/// Which pair of forms was compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Equations,
    EquationExpression,
    ExpressionEquation,
    Expressions,
}

/// Builds the expression whose zeroness decides the comparison. Equations are moved to one side
/// as `lhs - rhs`, and the student's part is always the minuend.
fn difference(student: &SymbolicForm, reference: &SymbolicForm) -> (Branch, SymExpr) {
    use SymbolicForm::*;

    match (student, reference) {
        (Equation { lhs: sl, rhs: sr }, Equation { lhs: rl, rhs: rr }) => (
            Branch::Equations,
            (sl.clone() - sr.clone()) - (rl.clone() - rr.clone()),
        ),
        (Equation { lhs, rhs }, Expression(expr)) => (
            Branch::EquationExpression,
            (lhs.clone() - rhs.clone()) - expr.clone(),
        ),
        (Expression(expr), Equation { lhs, rhs }) => (
            Branch::ExpressionEquation,
            expr.clone() - (lhs.clone() - rhs.clone()),
        ),
        (Expression(student), Expression(reference)) => (
            Branch::Expressions,
            student.clone() - reference.clone(),
        ),
    }
}

/// Decides the difference symbolically.
fn symbolic(diff: &SymExpr) -> Result<bool, SimplifyError> {
    let mut steps: Vec<Step> = Vec::new();
    let result = is_zero_with(diff, &mut steps);
    trace!(?steps, "simplification steps");
    result
}

/// Evaluates a form to a number. Equations have no value.
fn to_number(form: &SymbolicForm) -> Result<f64, Option<EvalError>> {
    match form {
        SymbolicForm::Expression(expr) => numerical::eval(expr).map_err(Some),
        SymbolicForm::Equation { .. } => Err(None),
    }
}

/// Returns true if `a` and `b` are equal within the relative and absolute tolerances.
pub fn is_close(a: f64, b: f64) -> bool {
    let tolerance = (RELATIVE_TOLERANCE * a.abs().max(b.abs())).max(ABSOLUTE_TOLERANCE);
    (a - b).abs() <= tolerance
}

/// Compares the forms numerically.
fn numeric(student: &SymbolicForm, reference: &SymbolicForm) -> EquivalenceResult {
    match (to_number(student), to_number(reference)) {
        (Ok(a), Ok(b)) => {
            let equivalent = is_close(a, b);
            debug!(student = a, reference = b, equivalent, "numeric comparison");
            EquivalenceResult { equivalent, method: Method::Numeric }
        },
        (Err(err), _) | (_, Err(err)) => {
            match err {
                Some(err) => debug!(%err, "numeric comparison failed"),
                None => debug!("numeric comparison failed: an equation has no value"),
            }
            EquivalenceResult { equivalent: false, method: Method::Undecided }
        },
    }
}

/// Compares a student's answer against the reference answer.
///
/// This never fails: when neither the symbolic nor the numeric comparison can decide, the answers
/// are reported as different.
pub fn check_equivalence(student: &SymbolicForm, reference: &SymbolicForm) -> EquivalenceResult {
    // identical answers are equivalent even when the engine can't handle them
    if student == reference {
        debug!("answers are identical");
        return EquivalenceResult { equivalent: true, method: Method::Symbolic };
    }

    let (branch, diff) = difference(student, reference);
    match symbolic(&diff) {
        Ok(equivalent) => {
            debug!(?branch, equivalent, "symbolic comparison");
            EquivalenceResult { equivalent, method: Method::Symbolic }
        },
        Err(err) => {
            debug!(?branch, %err, "symbolic comparison failed, comparing numerically");
            numeric(student, reference)
        },
    }
}

/// Returns true if a student's answer is equivalent to the reference answer. See
/// [`check_equivalence`].
pub fn are_equivalent(student: &SymbolicForm, reference: &SymbolicForm) -> bool {
    check_equivalence(student, reference).equivalent
}

#[cfg(test)]
mod tests {
    use crate::form::parse;
    use pretty_assertions::assert_eq;
    use super::*;

    fn check(student: &str, reference: &str) -> EquivalenceResult {
        check_equivalence(&parse(student).unwrap(), &parse(reference).unwrap())
    }

    fn symbolic_result(equivalent: bool) -> EquivalenceResult {
        EquivalenceResult { equivalent, method: Method::Symbolic }
    }

    #[test]
    fn expressions() {
        assert_eq!(check("x^2 - 4", "(x-2)(x+2)"), symbolic_result(true));
        assert_eq!(check("2x", "x + x"), symbolic_result(true));
        assert_eq!(check("x + y", "y + x + 1"), symbolic_result(false));
        assert_eq!(check("sin(x)^2", "1 - cos(x)^2"), symbolic_result(true));
        assert_eq!(check("sqrt(12)", "2sqrt(3)"), symbolic_result(true));
    }

    #[test]
    fn adjacent_letters_multiply() {
        assert_eq!(check("xy", "x*y"), symbolic_result(true));
        assert_eq!(check("2xy", "2yx"), symbolic_result(true));
        assert_eq!(check("ab + c", "c + b a"), symbolic_result(true));
        assert_eq!(check("theta^2", "theta theta"), symbolic_result(true));
    }

    #[test]
    fn function_powers() {
        assert_eq!(check("sin^2(x) + cos^2(x)", "1"), symbolic_result(true));
        assert_eq!(check("sin^2 x", "sin(x)^2"), symbolic_result(true));
        assert_eq!(check("2tan**2(x)", "2sec(x)^2 - 2"), symbolic_result(true));
    }

    #[test]
    fn equal_arguments_after_cancelling() {
        assert_eq!(check("sin((x^2-1)/(x^2-2x+1))", "sin((x+1)/(x-1))"), symbolic_result(true));
        assert_eq!(check("sqrt((x^2 - 1)/(x^2 + 2x + 1))", "sqrt((x - 1)/(x + 1))"), symbolic_result(true));
    }

    #[test]
    fn equations() {
        assert_eq!(check("x + 1 = 2", "x = 1"), symbolic_result(true));
        assert_eq!(check("y = 2x", "y - 2x = 0"), symbolic_result(true));
        assert_eq!(check("x = 1", "x = 2"), symbolic_result(false));

        // an equation is only compared after moving everything to one side
        assert_eq!(check("x = 1", "1 = x"), symbolic_result(false));
    }

    #[test]
    fn mixed() {
        assert_eq!(check("x^2 = 4", "x^2 - 4"), symbolic_result(true));
        assert_eq!(check("x^2 - 4", "x^2 = 4"), symbolic_result(true));
        assert_eq!(check("x^2 = 4", "x^2 + 4"), symbolic_result(false));
    }

    #[test]
    fn mixed_fallback_never_evaluates_the_equation() {
        let undecided = EquivalenceResult { equivalent: false, method: Method::Undecided };
        assert_eq!(check("0.5 = 0.5", "0.1"), undecided);
        assert_eq!(check("0.1", "0.5 = 0.5"), undecided);
    }

    #[test]
    fn numeric_fallback() {
        let numeric = |equivalent| EquivalenceResult { equivalent, method: Method::Numeric };
        assert_eq!(check("3.0000000001", "3"), numeric(true));
        assert_eq!(check("3.1", "3"), numeric(false));
        assert_eq!(check("3.14159265359", "pi"), numeric(true));
        assert_eq!(check("2^(1/2) + 1.0", "2.41421356237"), numeric(true));
    }

    #[test]
    fn undecided() {
        let undecided = EquivalenceResult { equivalent: false, method: Method::Undecided };
        assert_eq!(check("1/0", "2"), undecided);
        assert_eq!(check("0.5x", "0.4x"), undecided);
        assert_eq!(check("f(x)", "x"), symbolic_result(false));

        // too large for f64, so the tolerance is never applied
        assert_eq!(check("10^400 + 0.5", "10^400"), undecided);
    }

    #[test]
    fn euler_number_spellings() {
        assert_eq!(check("E^x", "exp(x)"), symbolic_result(true));
        assert_eq!(check("e^2", "E^2"), symbolic_result(true));
    }

    #[test]
    fn identical_answers() {
        assert_eq!(check("1/(x - x)", "1/(x - x)"), symbolic_result(true));
        assert_eq!(check("x^5000", "x^5000"), symbolic_result(true));
    }

    #[test]
    fn details() {
        assert_eq!(check("x", "x").detail(), "Expressions are equivalent");
        assert_eq!(check("x", "y").detail(), "Expressions differ");
    }

    #[test]
    fn tolerance() {
        assert!(is_close(1e12, 1e12 + 100.0));
        assert!(!is_close(1e12, 1e12 + 10_000.0));
        assert!(is_close(0.0, 1e-10));
        assert!(!is_close(0.0, 1e-8));
    }
}
