//! Simplification rules for `exp` and `log`.

use crate::funcs::Func;
use rug::Rational;
use std::cmp::Ordering;
use super::power::{factorize, split_exponent};
use super::super::{
    atom::{Atom, Constant},
    fraction::Fraction,
    poly::{Monomial, Poly},
    step::Step,
    Simplifier,
    SimplifyError,
};

impl Simplifier<'_> {
    /// `exp(arg)`.
    ///
    /// A polynomial argument is split term by term, `exp(a + b) = exp(a) exp(b)`, and each term
    /// `c * m` becomes `e^c` for a constant, `u^c` for `m = log(u)`, or `exp(m)^c` for an integer
    /// `c`. Whatever remains is an `exp` atom.
    pub(crate) fn exp(&mut self, arg: Fraction) -> Result<Fraction, SimplifyError> {
        if arg.is_zero() {
            self.step(Step::ExactValue(Func::Exp));
            return Ok(Fraction::one());
        }
        if !arg.denom().is_one() {
            return Ok(Fraction::atom(Atom::call(Func::Exp, arg)));
        }

        if arg.numer().len() > 1 {
            self.step(Step::ExpOfSum);
        }
        let mut value = Fraction::one();
        for (monomial, coeff) in arg.numer().terms() {
            let factor = self.exp_term(monomial, coeff)?;
            value = self.mul(&value, &factor)?;
        }
        Ok(value)
    }

    /// `exp(coeff * monomial)`.
    fn exp_term(&mut self, monomial: &Monomial, coeff: &Rational) -> Result<Fraction, SimplifyError> {
        if let Some((numer, denom)) = split_exponent(coeff) {
            if monomial.is_one() {
                self.step(Step::ExpOfSum);
                return self.pow_rational(Fraction::atom(Atom::Const(Constant::E)), coeff);
            }

            if let Some(Atom::Call(Func::Log, args)) = monomial.as_atom() {
                if let [inner] = args.as_slice() {
                    self.step(Step::ExpOfLog);
                    return self.pow_rational(inner.clone(), coeff);
                }
            }

            if denom == 1 {
                let unit = Fraction::from_poly(Poly::term(monomial.clone(), Rational::from(1)));
                return self.pow_int(Fraction::atom(Atom::call(Func::Exp, unit)), numer);
            }
        }

        let arg = Fraction::from_poly(Poly::term(monomial.clone(), coeff.clone()));
        Ok(Fraction::atom(Atom::call(Func::Exp, arg)))
    }

    /// `log(arg)`, the natural logarithm.
    pub(crate) fn log(&mut self, arg: Fraction) -> Result<Fraction, SimplifyError> {
        if arg.is_zero() {
            return Err(SimplifyError::Undefined { func: Func::Log.name() });
        }
        if arg.is_one() {
            self.step(Step::ExactValue(Func::Log));
            return Ok(Fraction::zero());
        }

        if let Some(c) = arg.as_constant() {
            if c.cmp0() == Ordering::Greater {
                return self.log_of_constant(&c);
            }
        }

        // log(e^k) = k
        if arg.denom().is_one() {
            if let Some((monomial, coeff)) = arg.numer().as_term() {
                if let [(Atom::Const(Constant::E), k)] = monomial.factors() {
                    if *coeff == 1 {
                        self.step(Step::ExactValue(Func::Log));
                        return Ok(Fraction::constant(Rational::from(*k)));
                    }
                }
            }
        }

        Ok(Fraction::atom(Atom::call(Func::Log, arg)))
    }

    /// `log(c)` for a positive constant `c`, split over its prime factors as in
    /// `log(12) = 2 log(2) + log(3)`.
    fn log_of_constant(&mut self, c: &Rational) -> Result<Fraction, SimplifyError> {
        let factors = factorize(c.numer())
            .into_iter()
            .map(|(p, m)| (p, i64::from(m)))
            .chain(factorize(c.denom()).into_iter().map(|(p, m)| (p, -i64::from(m))))
            .collect::<Vec<_>>();
        if !matches!(factors.as_slice(), [(_, 1)]) {
            self.step(Step::LogOfConstant);
        }

        let mut value = Fraction::zero();
        for (prime, multiplicity) in factors {
            let log = Fraction::atom(Atom::call(Func::Log, Fraction::constant(Rational::from(prime))));
            value = value.add(&log.scale(&Rational::from(multiplicity)))?;
        }
        Ok(value)
    }
}
