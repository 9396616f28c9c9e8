//! Sparse multivariate polynomials with exact rational coefficients.

use rug::{ops::Pow, Rational};
use std::{
    cmp::Ordering,
    collections::{btree_map::Entry, BTreeMap, BTreeSet},
    mem,
};
use super::{atom::Atom, SimplifyError};

/// The maximum number of terms a polynomial may have.
pub const MAX_TERMS: usize = 10_000;

/// The maximum number of term pairs a single polynomial multiplication may visit.
pub const MAX_PRODUCT_PAIRS: usize = 250_000;

/// A product of atoms raised to positive integer powers, such as `x^2 * y`.
///
/// Factors are sorted by atom, and each atom appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Monomial(Vec<(Atom, u32)>);

impl Monomial {
    /// The empty product, `1`.
    pub fn one() -> Self {
        Self(Vec::new())
    }

    /// A single atom raised to a positive power.
    pub fn atom(atom: Atom, exp: u32) -> Self {
        if exp == 0 {
            Self::one()
        } else {
            Self(vec![(atom, exp)])
        }
    }

    /// Returns true if this is the empty product.
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// The factors of the monomial, sorted by atom.
    pub fn factors(&self) -> &[(Atom, u32)] {
        &self.0
    }

    /// If the monomial is a single atom to the first power, returns the atom.
    pub fn as_atom(&self) -> Option<&Atom> {
        match self.0.as_slice() {
            [(atom, 1)] => Some(atom),
            _ => None,
        }
    }

    /// The exponent of an atom in the monomial, and the monomial without that atom.
    pub fn split_off(&self, atom: &Atom) -> (u32, Self) {
        match self.0.iter().position(|(factor, _)| factor == atom) {
            Some(index) => {
                let mut rest = self.0.clone();
                let (_, exp) = rest.remove(index);
                (exp, Self(rest))
            },
            None => (0, self.clone()),
        }
    }

    /// The total degree of the monomial.
    pub fn degree(&self) -> u64 {
        self.0.iter().map(|(_, exp)| u64::from(*exp)).sum()
    }

    /// Multiplies two monomials.
    pub fn mul(&self, other: &Self) -> Self {
        let mut factors = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            let (lhs, lhs_exp) = &self.0[i];
            let (rhs, rhs_exp) = &other.0[j];
            match lhs.cmp(rhs) {
                Ordering::Less => {
                    factors.push((lhs.clone(), *lhs_exp));
                    i += 1;
                },
                Ordering::Greater => {
                    factors.push((rhs.clone(), *rhs_exp));
                    j += 1;
                },
                Ordering::Equal => {
                    factors.push((lhs.clone(), lhs_exp.saturating_add(*rhs_exp)));
                    i += 1;
                    j += 1;
                },
            }
        }
        factors.extend_from_slice(&self.0[i..]);
        factors.extend_from_slice(&other.0[j..]);
        Self(factors)
    }

    /// Divides this monomial by another, if the division is exact.
    pub fn div(&self, other: &Self) -> Option<Self> {
        let mut factors = Vec::with_capacity(self.0.len());
        let mut rest = other.0.iter().peekable();
        for (atom, exp) in &self.0 {
            match rest.peek() {
                Some((divisor, divisor_exp)) if divisor == atom => {
                    let remaining = exp.checked_sub(*divisor_exp)?;
                    if remaining > 0 {
                        factors.push((atom.clone(), remaining));
                    }
                    rest.next();
                },
                Some((divisor, _)) if divisor < atom => return None,
                _ => factors.push((atom.clone(), *exp)),
            }
        }

        if rest.next().is_some() {
            return None;
        }
        Some(Self(factors))
    }

    /// The greatest common divisor of two monomials.
    pub fn gcd(&self, other: &Self) -> Self {
        let mut factors = Vec::new();
        let mut rest = other.0.iter().peekable();
        for (atom, exp) in &self.0 {
            while rest.peek().is_some_and(|(other, _)| other < atom) {
                rest.next();
            }
            if let Some((other, other_exp)) = rest.peek() {
                if other == atom {
                    factors.push((atom.clone(), (*exp).min(*other_exp)));
                    rest.next();
                }
            }
        }
        Self(factors)
    }

    /// Raises the monomial to a power.
    pub fn pow(&self, n: u32) -> Self {
        if n == 0 {
            return Self::one();
        }
        Self(self.0.iter().map(|(atom, exp)| (atom.clone(), exp.saturating_mul(n))).collect())
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Graded lexicographic order: higher total degree is greater, and ties are broken by the
/// exponent of the smallest atom where the monomials differ.
impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.degree().cmp(&other.degree()).then_with(|| {
            for ((lhs, lhs_exp), (rhs, rhs_exp)) in self.0.iter().zip(&other.0) {
                match lhs.cmp(rhs) {
                    Ordering::Equal => match lhs_exp.cmp(rhs_exp) {
                        Ordering::Equal => continue,
                        ord => return ord,
                    },
                    // `self` has an atom that `other` lacks
                    Ordering::Less => return Ordering::Greater,
                    Ordering::Greater => return Ordering::Less,
                }
            }
            self.0.len().cmp(&other.0.len())
        })
    }
}

/// A polynomial: a sum of monomials with nonzero rational coefficients.
///
/// The terms are kept in a [`BTreeMap`] ordered by [`Monomial`], so two equal polynomials always
/// have identical representations, and the leading term is the last entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Poly {
    terms: BTreeMap<Monomial, Rational>,
}

impl Poly {
    /// The zero polynomial.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The constant polynomial `1`.
    pub fn one() -> Self {
        Self::constant(Rational::from(1))
    }

    /// A constant polynomial.
    pub fn constant(value: Rational) -> Self {
        Self::term(Monomial::one(), value)
    }

    /// A polynomial with a single term.
    pub fn term(monomial: Monomial, coeff: Rational) -> Self {
        let mut poly = Self::zero();
        poly.add_term(monomial, coeff);
        poly
    }

    /// The polynomial consisting of a single atom.
    pub fn atom(atom: Atom) -> Self {
        Self::term(Monomial::atom(atom, 1), Rational::from(1))
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns true if this is the constant polynomial `1`.
    pub fn is_one(&self) -> bool {
        self.as_constant().is_some_and(|c| c == 1)
    }

    /// The number of terms in the polynomial.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Iterates over the terms in ascending monomial order.
    pub fn terms(&self) -> impl DoubleEndedIterator<Item = (&Monomial, &Rational)> + '_ {
        self.terms.iter()
    }

    /// If the polynomial is constant, returns its value.
    pub fn as_constant(&self) -> Option<Rational> {
        match self.terms.len() {
            0 => Some(Rational::new()),
            1 => self.terms.get(&Monomial::one()).cloned(),
            _ => None,
        }
    }

    /// If the polynomial has exactly one term, returns it.
    pub fn as_term(&self) -> Option<(&Monomial, &Rational)> {
        if self.terms.len() == 1 {
            self.terms.iter().next()
        } else {
            None
        }
    }

    /// If the polynomial is a single atom with coefficient `1`, returns the atom.
    pub fn as_atom(&self) -> Option<&Atom> {
        let (monomial, coeff) = self.as_term()?;
        if *coeff == 1 {
            monomial.as_atom()
        } else {
            None
        }
    }

    /// The term with the greatest monomial.
    pub fn leading(&self) -> Option<(&Monomial, &Rational)> {
        self.terms.iter().next_back()
    }

    /// Returns true if the leading coefficient is negative.
    pub fn is_negative(&self) -> bool {
        self.leading().is_some_and(|(_, coeff)| coeff.cmp0() == Ordering::Less)
    }

    /// The greatest common divisor of all the monomials in the polynomial.
    pub fn content(&self) -> Monomial {
        let mut iter = self.terms.keys();
        let Some(first) = iter.next() else {
            return Monomial::one();
        };
        iter.fold(first.clone(), |acc, monomial| acc.gcd(monomial))
    }

    /// Adds a single term in place.
    fn add_term(&mut self, monomial: Monomial, coeff: Rational) {
        if coeff.cmp0() == Ordering::Equal {
            return;
        }

        match self.terms.entry(monomial) {
            Entry::Vacant(entry) => {
                entry.insert(coeff);
            },
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coeff;
                if entry.get().cmp0() == Ordering::Equal {
                    entry.remove();
                }
            },
        }
    }

    /// Fails if the polynomial has grown past [`MAX_TERMS`].
    fn check_len(self) -> Result<Self, SimplifyError> {
        if self.terms.len() > MAX_TERMS {
            Err(SimplifyError::ExpansionLimit)
        } else {
            Ok(self)
        }
    }

    /// Adds two polynomials.
    pub fn add(&self, other: &Self) -> Result<Self, SimplifyError> {
        let mut sum = self.clone();
        for (monomial, coeff) in &other.terms {
            sum.add_term(monomial.clone(), coeff.clone());
        }
        sum.check_len()
    }

    /// Negates the polynomial.
    pub fn neg(&self) -> Self {
        Self {
            terms: self.terms
                .iter()
                .map(|(monomial, coeff)| (monomial.clone(), Rational::from(-coeff)))
                .collect(),
        }
    }

    /// Subtracts two polynomials.
    pub fn sub(&self, other: &Self) -> Result<Self, SimplifyError> {
        self.add(&other.neg())
    }

    /// Multiplies every coefficient by a constant.
    pub fn scale(&self, factor: &Rational) -> Self {
        self.mul_term(&Monomial::one(), factor)
    }

    /// Multiplies the polynomial by a single term.
    pub fn mul_term(&self, monomial: &Monomial, coeff: &Rational) -> Self {
        if coeff.cmp0() == Ordering::Equal {
            return Self::zero();
        }

        Self {
            terms: self.terms
                .iter()
                .map(|(m, c)| (m.mul(monomial), Rational::from(c * coeff)))
                .collect(),
        }
    }

    /// Multiplies two polynomials, expanding the product.
    pub fn mul(&self, other: &Self) -> Result<Self, SimplifyError> {
        if self.terms.len().saturating_mul(other.terms.len()) > MAX_PRODUCT_PAIRS {
            return Err(SimplifyError::ExpansionLimit);
        }

        let mut product = Self::zero();
        for (lhs, lhs_coeff) in &self.terms {
            for (rhs, rhs_coeff) in &other.terms {
                product.add_term(lhs.mul(rhs), Rational::from(lhs_coeff * rhs_coeff));
            }
        }
        product.check_len()
    }

    /// Raises the polynomial to a non-negative integer power, expanding the result.
    pub fn pow(&self, n: u32) -> Result<Self, SimplifyError> {
        if n == 0 {
            return Ok(Self::one());
        }
        if let Some((monomial, coeff)) = self.as_term() {
            return Ok(Self::term(monomial.pow(n), Rational::from(coeff.pow(n))));
        }

        // square-and-multiply
        let mut result = Self::one();
        let mut base = self.clone();
        let mut n = n;
        loop {
            if n & 1 == 1 {
                result = result.mul(&base)?;
            }
            n >>= 1;
            if n == 0 {
                return Ok(result);
            }
            base = base.mul(&base)?;
        }
    }

    /// Scales the polynomial so that its leading coefficient is `1`.
    pub fn monic(&self) -> Self {
        match self.leading() {
            Some((_, lead)) if *lead != 1 => self.scale(&lead.clone().recip()),
            _ => self.clone(),
        }
    }

    /// The atoms that appear in the polynomial.
    fn atoms(&self) -> BTreeSet<&Atom> {
        self.terms
            .keys()
            .flat_map(|monomial| monomial.factors().iter().map(|(atom, _)| atom))
            .collect()
    }

    /// The coefficients of the powers of `atom`, keyed by exponent. The coefficients don't
    /// contain `atom`.
    fn coeffs_in(&self, atom: &Atom) -> BTreeMap<u32, Poly> {
        let mut coeffs: BTreeMap<u32, Poly> = BTreeMap::new();
        for (monomial, coeff) in &self.terms {
            let (exp, rest) = monomial.split_off(atom);
            coeffs.entry(exp).or_default().add_term(rest, coeff.clone());
        }
        coeffs
    }

    /// The degree in `atom`, and the coefficient of that power.
    fn leading_in(&self, atom: &Atom) -> (u32, Poly) {
        self.coeffs_in(atom).pop_last().unwrap_or_default()
    }

    /// The greatest common divisor of the coefficients of the powers of `atom`.
    fn content_in(&self, atom: &Atom) -> Result<Poly, SimplifyError> {
        let mut coeffs = self.coeffs_in(atom).into_values();
        let Some(mut content) = coeffs.next() else {
            return Ok(Self::zero());
        };
        for coeff in coeffs {
            if content.as_constant().is_some() {
                break;
            }
            content = content.gcd(&coeff)?;
        }
        Ok(content)
    }

    /// Divides the polynomial by its content in `atom`.
    fn primitive_in(&self, atom: &Atom) -> Result<Poly, SimplifyError> {
        let content = self.content_in(atom)?;
        self.div_exact(&content).ok_or(SimplifyError::ExpansionLimit)
    }

    /// The pseudo-remainder of dividing by `divisor`, as polynomials in `atom`. Each step
    /// multiplies the remainder by the leading coefficient of `divisor`, so no coefficient is
    /// ever divided.
    fn pseudo_rem(&self, divisor: &Self, atom: &Atom) -> Result<Self, SimplifyError> {
        let (degree, lead) = divisor.leading_in(atom);
        let mut rem = self.clone();
        loop {
            let (rem_degree, rem_lead) = rem.leading_in(atom);
            if rem.is_zero() || rem_degree < degree {
                return Ok(rem);
            }

            let shift = Monomial::atom(atom.clone(), rem_degree - degree);
            let cancel = divisor.mul(&rem_lead)?.mul_term(&shift, &Rational::from(1));
            rem = rem.mul(&lead)?.sub(&cancel)?;
        }
    }

    /// The greatest common divisor of two polynomials, normalized with [`Poly::monic`].
    ///
    /// The computation picks an atom both polynomials share and runs the primitive remainder
    /// sequence in it, with coefficients that are polynomials in the remaining atoms. Contents are
    /// found by recursing on those coefficients. Polynomials with no atom in common have no
    /// common factor but constants.
    pub fn gcd(&self, other: &Self) -> Result<Self, SimplifyError> {
        if self.is_zero() {
            return Ok(other.monic());
        }
        if other.is_zero() {
            return Ok(self.monic());
        }
        if self.as_constant().is_some() || other.as_constant().is_some() {
            return Ok(Self::one());
        }

        let shared = self.atoms()
            .intersection(&other.atoms())
            .next()
            .map(|atom| (*atom).clone());
        let Some(atom) = shared else {
            return Ok(Self::one());
        };

        let content = self.content_in(&atom)?.gcd(&other.content_in(&atom)?)?;
        let mut lhs = self.primitive_in(&atom)?;
        let mut rhs = other.primitive_in(&atom)?;
        loop {
            if lhs.leading_in(&atom).0 < rhs.leading_in(&atom).0 {
                mem::swap(&mut lhs, &mut rhs);
            }

            let rem = lhs.pseudo_rem(&rhs, &atom)?;
            if rem.is_zero() {
                break;
            }
            if rem.leading_in(&atom).0 == 0 {
                rhs = Self::one();
                break;
            }
            lhs = mem::replace(&mut rhs, rem.primitive_in(&atom)?);
        }

        Ok(content.mul(&rhs)?.monic())
    }

    /// Divides every monomial by the given monomial, if each division is exact.
    pub fn div_monomial(&self, divisor: &Monomial) -> Option<Self> {
        let terms = self.terms
            .iter()
            .map(|(monomial, coeff)| Some((monomial.div(divisor)?, coeff.clone())))
            .collect::<Option<BTreeMap<_, _>>>()?;
        Some(Self { terms })
    }

    /// Divides two polynomials, if the division leaves no remainder.
    ///
    /// This is multivariate long division by the leading term of `divisor`. It gives up on
    /// quotients that would need more than [`MAX_TERMS`] reduction steps.
    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (lead, lead_coeff) = divisor.leading()?;
        let mut remainder = self.clone();
        let mut quotient = Self::zero();

        for _ in 0..MAX_TERMS {
            let (monomial, coeff) = match remainder.leading() {
                Some((monomial, coeff)) => (monomial.div(lead)?, Rational::from(coeff / lead_coeff)),
                None => return Some(quotient),
            };

            for (m, c) in &divisor.terms {
                remainder.add_term(m.mul(&monomial), -Rational::from(c * &coeff));
            }
            if remainder.terms.len() > MAX_TERMS {
                return None;
            }
            quotient.add_term(monomial, coeff);
        }

        None
    }
}
