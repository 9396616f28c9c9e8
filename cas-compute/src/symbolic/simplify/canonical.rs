//! The canonical form of an expression, and its conversion back into an expression.

use crate::symbolic::{
    expr::{make_fraction, Expr, Primary},
    step_collector::StepCollector,
};
use rug::Rational;
use super::{
    atom::Atom,
    fraction::Fraction,
    poly::Poly,
    step::Step,
    Simplifier,
    SimplifyError,
};

/// The canonical form of an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// The value of the expression as a quotient of polynomials.
    pub value: Fraction,

    /// Whether a decimal literal contributed to the value. Decimals are stored exactly, but they
    /// are usually approximations, so an inexact nonzero value cannot be trusted to be nonzero.
    pub inexact: bool,
}

impl Canonical {
    /// Wraps a value that no decimal literal contributed to.
    pub fn exact(value: Fraction) -> Self {
        Self { value, inexact: false }
    }

    /// Computes the canonical form of an expression.
    pub fn from_expr(expr: &Expr) -> Result<Self, SimplifyError> {
        Self::from_expr_with(expr, &mut ())
    }

    /// Computes the canonical form of an expression, reporting each rewrite to the given
    /// collector.
    pub fn from_expr_with(
        expr: &Expr,
        step_collector: &mut dyn StepCollector<Step>,
    ) -> Result<Self, SimplifyError> {
        Simplifier::new(step_collector).canonicalize(expr)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Converts the canonical form back into an expression.
    ///
    /// Inexact values are written with decimal coefficients, so that converting the result again
    /// yields the same canonical form, including the `inexact` flag.
    pub fn to_expr(&self) -> Expr {
        fraction_to_expr(&self.value, self.inexact)
    }
}

fn number(value: &Rational, inexact: bool) -> Expr {
    if inexact {
        Expr::Primary(Primary::Decimal(value.clone()))
    } else if *value.denom() == 1 {
        Expr::Primary(Primary::Integer(value.numer().clone()))
    } else {
        make_fraction(
            Expr::Primary(Primary::Integer(value.numer().clone())),
            Expr::Primary(Primary::Integer(value.denom().clone())),
        )
    }
}

fn power(base: Expr, exp: Expr) -> Expr {
    Expr::Exp(Box::new(base), Box::new(exp))
}

fn atom_to_expr(atom: &Atom, exp: u32, inexact: bool) -> Expr {
    let base = match atom {
        Atom::Symbol(name) => Expr::symbol(name.as_str()),
        Atom::Const(constant) => Expr::symbol(constant.name()),
        Atom::Call(func, args) => Expr::Primary(Primary::Call(
            func.name().to_owned(),
            args.iter().map(|arg| fraction_to_expr(arg, inexact)).collect(),
        )),
        Atom::Root(base, index) => {
            return power(
                fraction_to_expr(base, inexact),
                make_fraction(Expr::integer(exp), Expr::integer(*index)),
            );
        },
        Atom::Pow(base, power_exp) => {
            let inner = power(fraction_to_expr(base, inexact), fraction_to_expr(power_exp, inexact));
            if exp == 1 {
                return inner;
            }
            return power(inner, Expr::integer(exp));
        },
    };

    if exp == 1 {
        base
    } else {
        power(base, Expr::integer(exp))
    }
}

fn poly_to_expr(poly: &Poly, inexact: bool) -> Expr {
    let mut terms = Vec::with_capacity(poly.len());

    // leading terms first
    for (monomial, coeff) in poly.terms().rev() {
        let mut term = Expr::Mul(Vec::new());
        if inexact || monomial.is_one() || *coeff != 1 {
            term *= number(coeff, inexact);
        }
        for (atom, exp) in monomial.factors() {
            term *= atom_to_expr(atom, *exp, inexact);
        }
        terms.push(term.downgrade());
    }

    if terms.is_empty() {
        return number(&Rational::new(), inexact);
    }
    Expr::Add(terms).downgrade()
}

fn fraction_to_expr(fraction: &Fraction, inexact: bool) -> Expr {
    let numer = poly_to_expr(fraction.numer(), inexact);
    if fraction.denom().is_one() {
        numer
    } else {
        make_fraction(numer, poly_to_expr(fraction.denom(), inexact))
    }
}
