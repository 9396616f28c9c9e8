//! Integer powers, rational powers and roots, and powers with symbolic exponents.

use rug::{ops::Pow, Integer, Rational};
use std::cmp::Ordering;
use super::super::{
    atom::{Atom, Constant},
    fraction::Fraction,
    step::Step,
    Simplifier,
    SimplifyError,
};

/// The largest integer exponent, and the largest root index, that will be computed.
pub const MAX_EXPONENT: u32 = 1000;

/// The largest number of bits an exact constant power may have.
pub const MAX_CONSTANT_BITS: u64 = 1 << 20;

/// Radicands are factored by trial division up to this bound.
const TRIAL_DIVISION_LIMIT: u32 = 1000;

/// Splits a rational exponent into its numerator and denominator, if both are within
/// [`MAX_EXPONENT`].
pub(crate) fn split_exponent(exp: &Rational) -> Option<(i64, u32)> {
    let numer = exp.numer().to_i64().filter(|n| n.unsigned_abs() <= u64::from(MAX_EXPONENT))?;
    let denom = exp.denom().to_u32().filter(|d| *d <= MAX_EXPONENT)?;
    Some((numer, denom))
}

/// The number of bits needed to write `value`.
fn bits(value: &Rational) -> u64 {
    u64::from(value.numer().significant_bits()) + u64::from(value.denom().significant_bits())
}

/// Factors a positive integer into primes found by trial division. A cofactor with no small prime
/// factors is kept whole, reduced to its perfect-power base if it has one.
pub(crate) fn factorize(n: &Integer) -> Vec<(Integer, u32)> {
    let mut factors = Vec::new();
    let mut rest = Integer::from(n.abs_ref());
    for p in 2..=TRIAL_DIVISION_LIMIT {
        if rest == 1 {
            break;
        }

        let mut count = 0;
        while rest.is_divisible_u(p) {
            rest.div_exact_u_mut(p);
            count += 1;
        }
        if count > 0 {
            factors.push((Integer::from(p), count));
        }
    }

    if rest > 1 {
        factors.push(perfect_power(rest));
    }
    factors
}

/// Writes `n > 1` as `base^exp` with the largest possible `exp`.
fn perfect_power(n: Integer) -> (Integer, u32) {
    let mut base = n;
    let mut exp = 1u32;
    'outer: while base > 1 && base.is_perfect_power() {
        for k in 2..=base.significant_bits() {
            let (root, rem) = base.clone().root_rem(Integer::new(), k);
            if rem == 0 {
                base = root;
                exp = exp.saturating_mul(k);
                continue 'outer;
            }
        }
        break;
    }
    (base, exp)
}

impl Simplifier<'_> {
    /// `base^exp`, for a canonical base and exponent.
    pub(crate) fn pow(&mut self, base: Fraction, exp: Fraction) -> Result<Fraction, SimplifyError> {
        match exp.as_constant() {
            Some(exp) => self.pow_rational(base, &exp),
            None => self.pow_symbolic(base, exp),
        }
    }

    /// `base^n` for an integer `n`, expanding the result.
    pub(crate) fn pow_int(&mut self, base: Fraction, n: i64) -> Result<Fraction, SimplifyError> {
        if n.unsigned_abs() > u64::from(MAX_EXPONENT) {
            return Err(SimplifyError::ExponentTooLarge);
        }
        if n == 0 {
            return Ok(Fraction::one());
        }
        if base.is_zero() {
            return if n < 0 {
                Err(SimplifyError::DivisionByZero)
            } else {
                Ok(Fraction::zero())
            };
        }

        if let Some(c) = base.as_constant() {
            if bits(&c).saturating_mul(n.unsigned_abs()) > MAX_CONSTANT_BITS {
                return Err(SimplifyError::ExponentTooLarge);
            }
            // |n| <= MAX_EXPONENT, so this fits
            return Ok(Fraction::constant(c.pow(n as i32)));
        }

        let base = if n < 0 { base.recip()? } else { base };
        let n = n.unsigned_abs() as u32;
        if n > 1 && (base.numer().len() > 1 || base.denom().len() > 1) {
            self.step(Step::ExpandPower);
        }
        let value = base.pow(n)?;
        self.reduce(value)
    }

    /// `base^exp` for a rational exponent.
    pub(crate) fn pow_rational(&mut self, base: Fraction, exp: &Rational) -> Result<Fraction, SimplifyError> {
        let (numer, index) = split_exponent(exp).ok_or(SimplifyError::ExponentTooLarge)?;
        if index == 1 {
            return self.pow_int(base, numer);
        }

        if base.is_zero() {
            return if numer > 0 {
                Ok(Fraction::zero())
            } else {
                Err(SimplifyError::DivisionByZero)
            };
        }
        if base.is_one() {
            return Ok(Fraction::one());
        }

        match base.as_constant() {
            Some(c) if c.cmp0() == Ordering::Greater => self.root_of_constant(&c, numer, index),

            // the real root of a negative constant is left alone
            Some(_) => Ok(Fraction::atom(Atom::Pow(base, Fraction::constant(exp.clone())))),

            None => {
                // b^(p/r) = b^q * root(b, r)^s, where p = qr + s and 0 < s < r
                let q = numer.div_euclid(i64::from(index));
                let s = numer.rem_euclid(i64::from(index)) as u32;
                let whole = self.pow_int(base.clone(), q)?;
                let root = Fraction::atom_pow(Atom::Root(base, index), s);
                self.mul(&whole, &root)
            },
        }
    }

    /// `c^(numer / index)` for a positive constant `c`, written as a rational number times roots
    /// of primes. Each prime `p` with multiplicity `m` contributes `p^(m * numer / index)`, whose
    /// whole part joins the coefficient; this also rationalizes denominators.
    fn root_of_constant(&mut self, c: &Rational, numer: i64, index: u32) -> Result<Fraction, SimplifyError> {
        if bits(c).saturating_mul(numer.unsigned_abs()) / u64::from(index) > MAX_CONSTANT_BITS {
            return Err(SimplifyError::ExponentTooLarge);
        }

        let exp = Rational::from((numer, index));
        let primes = factorize(c.numer())
            .into_iter()
            .map(|(p, m)| (p, i64::from(m)))
            .chain(factorize(c.denom()).into_iter().map(|(p, m)| (p, -i64::from(m))));

        let mut coeff = Rational::from(1);
        let mut value = Fraction::one();
        let mut exact = true;
        for (prime, multiplicity) in primes {
            let total = Rational::from(&exp * multiplicity);
            let whole = total.clone().floor();
            let frac = Rational::from(&total - &whole);

            let whole = whole.numer().to_i32().ok_or(SimplifyError::ExponentTooLarge)?;
            coeff *= Rational::from(prime.clone()).pow(whole);

            if frac.cmp0() != Ordering::Equal {
                exact = false;
                let s = frac.numer().to_u32().ok_or(SimplifyError::ExponentTooLarge)?;
                let r = frac.denom().to_u32().ok_or(SimplifyError::ExponentTooLarge)?;
                let root = Fraction::atom_pow(Atom::Root(Fraction::constant(Rational::from(prime)), r), s);
                value = value.mul(&root)?;
            }
        }

        if exact || coeff != 1 {
            self.step(Step::ExactRoot);
        }
        Ok(value.scale(&coeff))
    }

    /// `base^exp` for an exponent that isn't constant.
    fn pow_symbolic(&mut self, base: Fraction, exp: Fraction) -> Result<Fraction, SimplifyError> {
        if base.is_one() {
            return Ok(Fraction::one());
        }
        if base.as_atom() == Some(&Atom::Const(Constant::E)) {
            self.step(Step::PowerAsExp);
            return self.exp(exp);
        }
        Ok(Fraction::atom(Atom::Pow(base, exp)))
    }
}
