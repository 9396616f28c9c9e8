//! Rewrite rules applied while building canonical forms.
//!
//! Each builtin function is either evaluated exactly, rewritten in terms of other functions, or
//! left as an [`Atom::Call`]. After every arithmetic operation, [`Simplifier::reduce`] rewrites
//! the monomials that are not canonical: powers of roots that can be combined, and powers of
//! `cos` that the Pythagorean identity removes.

pub mod exp_log;
pub mod power;
pub mod trig;

use crate::funcs::Func;
use rug::{Integer, Rational};
use std::cmp::Ordering;
use super::{
    atom::Atom,
    fraction::Fraction,
    poly::{Monomial, Poly},
    step::Step,
    Simplifier,
    SimplifyError,
};

/// The largest constant whose factorial is computed exactly.
pub const MAX_FACTORIAL: u32 = 1000;

/// [`Simplifier::reduce`] gives up after this many passes.
const MAX_REDUCTION_PASSES: usize = 8;

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Returns true if the monomial contains a power of a root that can be combined or lowered, or a
/// power of `cos` of degree two or more.
fn monomial_needs_reduction(monomial: &Monomial) -> bool {
    let factors = monomial.factors();
    factors.iter().enumerate().any(|(i, (atom, exp))| match atom {
        Atom::Root(base, index) => {
            *exp >= *index
                || gcd(*exp, *index) > 1
                || factors[i + 1..].iter().any(|(other, _)| matches!(other, Atom::Root(other_base, _) if other_base == base))
        },
        Atom::Call(Func::Cos, _) => *exp >= 2,
        _ => false,
    })
}

fn needs_reduction(poly: &Poly) -> bool {
    poly.terms().any(|(monomial, _)| monomial_needs_reduction(monomial))
}

impl Simplifier<'_> {
    /// Applies a builtin function to canonical arguments. The number of arguments must already
    /// be checked.
    pub(crate) fn call(&mut self, func: Func, args: Vec<Fraction>) -> Result<Fraction, SimplifyError> {
        let given = args.len();
        let mut args = args.into_iter();
        let (Some(arg), base) = (args.next(), args.next()) else {
            return Err(SimplifyError::Arity { name: func.name(), given });
        };

        match func {
            Func::Sqrt | Func::Cbrt => {
                self.step(Step::RootAsPower);
                let index = if func == Func::Sqrt { 2 } else { 3 };
                self.pow_rational(arg, &Rational::from((1, index)))
            },
            Func::Exp => self.exp(arg),
            Func::Log => match base {
                Some(base) => {
                    self.step(Step::ChangeOfBase);
                    let numer = self.log(arg)?;
                    let denom = self.log(base)?;
                    self.div(&numer, &denom)
                },
                None => self.log(arg),
            },
            Func::Log10 => {
                self.step(Step::ChangeOfBase);
                let numer = self.log(arg)?;
                let denom = self.log(Fraction::constant(Rational::from(10)))?;
                self.div(&numer, &denom)
            },
            Func::Sin => self.sin(arg),
            Func::Cos => self.cos(arg),
            Func::Tan | Func::Cot => {
                self.step(Step::TrigAsSinCos);
                let sin = self.sin(arg.clone())?;
                let cos = self.cos(arg)?;
                if func == Func::Tan {
                    self.div(&sin, &cos)
                } else {
                    self.div(&cos, &sin)
                }
            },
            Func::Sec | Func::Csc => {
                self.step(Step::TrigAsSinCos);
                let value = if func == Func::Sec { self.cos(arg)? } else { self.sin(arg)? };
                self.div(&Fraction::one(), &value)
            },
            Func::Asin | Func::Atan | Func::Sinh | Func::Tanh => Ok(self.odd(func, arg)),
            Func::Acos => {
                if arg.is_one() {
                    self.step(Step::ExactValue(func));
                    return Ok(Fraction::zero());
                }
                Ok(Fraction::atom(Atom::call(func, arg)))
            },
            Func::Cosh => {
                if arg.is_zero() {
                    self.step(Step::ExactValue(func));
                    return Ok(Fraction::one());
                }
                Ok(self.even(func, arg))
            },
            Func::Abs => {
                if let Some(c) = arg.as_constant() {
                    self.step(Step::ExactValue(func));
                    return Ok(Fraction::constant(c.abs()));
                }
                Ok(self.even(func, arg))
            },
            Func::Factorial => self.factorial(arg),
        }
    }

    /// An odd function with `f(0) = 0`.
    fn odd(&mut self, func: Func, arg: Fraction) -> Fraction {
        if arg.is_zero() {
            self.step(Step::ExactValue(func));
            return Fraction::zero();
        }
        if arg.is_negative() {
            self.step(Step::Parity(func));
            return Fraction::atom(Atom::call(func, arg.neg())).neg();
        }
        Fraction::atom(Atom::call(func, arg))
    }

    /// An even function.
    fn even(&mut self, func: Func, arg: Fraction) -> Fraction {
        if arg.is_negative() {
            self.step(Step::Parity(func));
            return Fraction::atom(Atom::call(func, arg.neg()));
        }
        Fraction::atom(Atom::call(func, arg))
    }

    fn factorial(&mut self, arg: Fraction) -> Result<Fraction, SimplifyError> {
        let Some(c) = arg.as_constant() else {
            return Ok(Fraction::atom(Atom::call(Func::Factorial, arg)));
        };
        if *c.denom() != 1 {
            return Ok(Fraction::atom(Atom::call(Func::Factorial, arg)));
        }
        if c.cmp0() == Ordering::Less {
            return Err(SimplifyError::Undefined { func: Func::Factorial.name() });
        }

        match c.numer().to_u32().filter(|n| *n <= MAX_FACTORIAL) {
            Some(n) => {
                self.step(Step::ExactValue(Func::Factorial));
                Ok(Fraction::constant(Rational::from(Integer::from(Integer::factorial(n)))))
            },
            None => Ok(Fraction::atom(Atom::call(Func::Factorial, arg))),
        }
    }

    /// Rewrites the monomials of a fraction that are not canonical, until none are left.
    pub(crate) fn reduce(&mut self, value: Fraction) -> Result<Fraction, SimplifyError> {
        let mut value = value;
        for _ in 0..MAX_REDUCTION_PASSES {
            if !needs_reduction(value.numer()) && !needs_reduction(value.denom()) {
                break;
            }
            let numer = self.reduce_poly(value.numer())?;
            let denom = self.reduce_poly(value.denom())?;
            value = numer.div(&denom)?;
        }
        Ok(value)
    }

    fn reduce_poly(&mut self, poly: &Poly) -> Result<Fraction, SimplifyError> {
        let mut sum = Fraction::zero();
        for (monomial, coeff) in poly.terms() {
            let term = if monomial_needs_reduction(monomial) {
                self.reduce_monomial(monomial)?.scale(coeff)
            } else {
                Fraction::from_poly(Poly::term(monomial.clone(), coeff.clone()))
            };
            sum = sum.add(&term)?;
        }
        Ok(sum)
    }

    fn reduce_monomial(&mut self, monomial: &Monomial) -> Result<Fraction, SimplifyError> {
        let mut value = Fraction::one();

        // the exponents of each root base, summed
        let mut roots: Vec<(&Fraction, Rational)> = Vec::new();

        for (atom, exp) in monomial.factors() {
            match atom {
                Atom::Root(base, index) => {
                    let share = Rational::from((*exp, *index));
                    match roots.iter_mut().find(|(other, _)| *other == base) {
                        Some((_, total)) => *total += share,
                        None => roots.push((base, share)),
                    }
                },
                Atom::Call(Func::Cos, args) if *exp >= 2 && args.len() == 1 => {
                    self.step(Step::Pythagorean);
                    let sin = self.sin(args[0].clone())?;
                    let identity = Fraction::one().sub(&sin.pow(2)?)?;
                    let mut factor = identity.pow(exp / 2)?;
                    if exp % 2 == 1 {
                        factor = factor.mul(&Fraction::atom(atom.clone()))?;
                    }
                    value = value.mul(&factor)?;
                },
                atom => value = value.mul(&Fraction::atom_pow(atom.clone(), *exp))?,
            }
        }

        for (base, total) in roots {
            self.step(Step::RootPower);
            let factor = self.pow_rational(base.clone(), &total)?;
            value = value.mul(&factor)?;
        }
        Ok(value)
    }
}
