//! Quotients of polynomials, kept in a normalized form.

use rug::Rational;
use super::{
    atom::Atom,
    poly::{Monomial, Poly},
    SimplifyError,
};

/// A quotient of two polynomials.
///
/// Every [`Fraction`] is normalized on construction:
///
/// - the denominator is never zero, and zero is always `0 / 1`;
/// - the numerator and denominator have no common factor but constants;
/// - constant denominators are folded into the numerator;
/// - the leading coefficient of a non-constant denominator is `1`.
///
/// Equal fractions therefore have equal representations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fraction {
    numer: Poly,
    denom: Poly,
}

impl Fraction {
    /// Creates a normalized fraction.
    pub fn new(numer: Poly, denom: Poly) -> Result<Self, SimplifyError> {
        if denom.is_zero() {
            return Err(SimplifyError::DivisionByZero);
        }
        if numer.is_zero() {
            return Ok(Self::zero());
        }

        // monomial factors are cheap to cancel, and leave less for the gcd to do
        let content = numer.content().gcd(&denom.content());
        let (numer, denom) = if content.is_one() {
            (numer, denom)
        } else {
            match (numer.div_monomial(&content), denom.div_monomial(&content)) {
                (Some(numer), Some(denom)) => (numer, denom),
                _ => (numer, denom),
            }
        };

        if let Some(c) = denom.as_constant() {
            return Ok(Self::from_poly(numer.scale(&c.recip())));
        }

        let gcd = numer.gcd(&denom)?;
        let (numer, denom) = if gcd.is_one() {
            (numer, denom)
        } else {
            match (numer.div_exact(&gcd), denom.div_exact(&gcd)) {
                (Some(numer), Some(denom)) => (numer, denom),
                _ => return Err(SimplifyError::ExpansionLimit),
            }
        };

        if let Some(c) = denom.as_constant() {
            return Ok(Self::from_poly(numer.scale(&c.recip())));
        }
        match denom.leading() {
            Some((_, lead)) if *lead != 1 => {
                let inv = lead.clone().recip();
                Ok(Self { numer: numer.scale(&inv), denom: denom.scale(&inv) })
            },
            _ => Ok(Self { numer, denom }),
        }
    }

    /// A fraction with denominator `1`.
    pub fn from_poly(numer: Poly) -> Self {
        Self { numer, denom: Poly::one() }
    }

    /// The number zero.
    pub fn zero() -> Self {
        Self::from_poly(Poly::zero())
    }

    /// The number one.
    pub fn one() -> Self {
        Self::from_poly(Poly::one())
    }

    /// A constant.
    pub fn constant(value: Rational) -> Self {
        Self::from_poly(Poly::constant(value))
    }

    /// A single atom.
    pub fn atom(atom: Atom) -> Self {
        Self::from_poly(Poly::atom(atom))
    }

    /// A single atom raised to a positive power.
    pub fn atom_pow(atom: Atom, exp: u32) -> Self {
        Self::from_poly(Poly::term(Monomial::atom(atom, exp), Rational::from(1)))
    }

    pub fn numer(&self) -> &Poly {
        &self.numer
    }

    pub fn denom(&self) -> &Poly {
        &self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.denom.is_one() && self.numer.is_one()
    }

    /// If the fraction is constant, returns its value.
    pub fn as_constant(&self) -> Option<Rational> {
        if self.denom.is_one() {
            self.numer.as_constant()
        } else {
            None
        }
    }

    /// If the fraction is a single atom, returns the atom.
    pub fn as_atom(&self) -> Option<&Atom> {
        if self.denom.is_one() {
            self.numer.as_atom()
        } else {
            None
        }
    }

    /// Returns true if the leading coefficient of the numerator is negative. Exactly one of `f`
    /// and `-f` is negative for any nonzero `f`.
    pub fn is_negative(&self) -> bool {
        self.numer.is_negative()
    }

    pub fn neg(&self) -> Self {
        Self { numer: self.numer.neg(), denom: self.denom.clone() }
    }

    pub fn scale(&self, factor: &Rational) -> Self {
        Self { numer: self.numer.scale(factor), denom: self.denom.clone() }
    }

    pub fn add(&self, other: &Self) -> Result<Self, SimplifyError> {
        if self.denom == other.denom {
            return Self::new(self.numer.add(&other.numer)?, self.denom.clone());
        }

        let numer = self.numer.mul(&other.denom)?.add(&other.numer.mul(&self.denom)?)?;
        Self::new(numer, self.denom.mul(&other.denom)?)
    }

    pub fn sub(&self, other: &Self) -> Result<Self, SimplifyError> {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Result<Self, SimplifyError> {
        Self::new(self.numer.mul(&other.numer)?, self.denom.mul(&other.denom)?)
    }

    pub fn recip(&self) -> Result<Self, SimplifyError> {
        Self::new(self.denom.clone(), self.numer.clone())
    }

    pub fn div(&self, other: &Self) -> Result<Self, SimplifyError> {
        self.mul(&other.recip()?)
    }

    /// Raises the fraction to a non-negative integer power, expanding the result.
    pub fn pow(&self, n: u32) -> Result<Self, SimplifyError> {
        if n == 0 {
            return Ok(Self::one());
        }
        Self::new(self.numer.pow(n)?, self.denom.pow(n)?)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Fraction {
        Fraction::atom(Atom::symbol("x"))
    }

    fn int(n: i32) -> Fraction {
        Fraction::constant(Rational::from(n))
    }

    #[test]
    fn zero_denominator() {
        assert_eq!(int(1).div(&int(0)), Err(SimplifyError::DivisionByZero));
        assert_eq!(x().recip().unwrap().mul(&int(0)), Ok(Fraction::zero()));
    }

    #[test]
    fn constant_denominator_folds() {
        let half_x = x().div(&int(2)).unwrap();
        assert!(half_x.denom().is_one());
        assert_eq!(half_x, x().scale(&Rational::from((1, 2))));
    }

    #[test]
    fn cancels_exact_divisor() {
        // (x^2 - 1) / (x - 1) = x + 1
        let numer = x().pow(2).unwrap().sub(&int(1)).unwrap();
        let denom = x().sub(&int(1)).unwrap();
        assert_eq!(numer.div(&denom).unwrap(), x().add(&int(1)).unwrap());

        // (x - 1) / (x^2 - 1) = 1 / (x + 1)
        assert_eq!(denom.div(&numer).unwrap(), x().add(&int(1)).unwrap().recip().unwrap());
    }

    #[test]
    fn cancels_common_factor() {
        // (x^2 - 1) / (x^2 - 2x + 1) = (x + 1) / (x - 1)
        let numer = x().pow(2).unwrap().sub(&int(1)).unwrap();
        let denom = x().sub(&int(1)).unwrap().pow(2).unwrap();
        let expected = x().add(&int(1)).unwrap().div(&x().sub(&int(1)).unwrap()).unwrap();
        let value = numer.div(&denom).unwrap();
        assert_eq!(value, expected);
        assert_eq!(value.denom(), x().sub(&int(1)).unwrap().numer());
    }

    #[test]
    fn cancels_monomial_content() {
        // x / x^2 = 1 / x
        assert_eq!(x().div(&x().pow(2).unwrap()).unwrap(), x().recip().unwrap());
    }

    #[test]
    fn monic_denominator() {
        // 1 / (2x + 2) = (1/2) / (x + 1)
        let denom = x().scale(&Rational::from(2)).add(&int(2)).unwrap();
        let value = int(1).div(&denom).unwrap();
        assert_eq!(value.denom(), x().add(&int(1)).unwrap().numer());
        assert_eq!(value.numer().as_constant(), Some(Rational::from((1, 2))));
    }

    #[test]
    fn differences_of_equal_fractions_vanish() {
        // 1/(x + 1) + 1/(x - 1) = 2x / (x^2 - 1)
        let lhs = x().add(&int(1)).unwrap().recip().unwrap()
            .add(&x().sub(&int(1)).unwrap().recip().unwrap())
            .unwrap();
        let rhs = x().scale(&Rational::from(2))
            .div(&x().pow(2).unwrap().sub(&int(1)).unwrap())
            .unwrap();
        assert!(lhs.sub(&rhs).unwrap().is_zero());
    }
}
