//! Simplification rules for trigonometric functions.

use crate::funcs::Func;
use once_cell::sync::Lazy;
use rug::Rational;
use std::collections::HashMap;
use super::super::{
    atom::{Atom, Constant},
    fraction::Fraction,
    poly::{Monomial, Poly},
    step::Step,
    Simplifier,
    SimplifyError,
};

/// The largest integer multiple `n` for which `sin(nx)` and `cos(nx)` are expanded.
const MAX_MULTIPLE: u32 = 12;

/// An exact output of `sin` or `cos` at a well-known angle, up to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigValue {
    Zero,
    Half,
    HalfSqrtTwo,
    HalfSqrtThree,
    One,
}

impl TrigValue {
    fn to_fraction(self) -> Fraction {
        let half = Rational::from((1, 2));
        let root = |n: i32| Fraction::atom(Atom::Root(Fraction::constant(Rational::from(n)), 2));
        match self {
            Self::Zero => Fraction::zero(),
            Self::Half => Fraction::constant(half),
            Self::HalfSqrtTwo => root(2).scale(&half),
            Self::HalfSqrtThree => root(3).scale(&half),
            Self::One => Fraction::one(),
        }
    }
}

/// The output of a trigonometric function for a known angle.
#[derive(Debug, Clone, Copy)]
pub struct TrigOut {
    /// The magnitude of the output.
    pub output: TrigValue,

    /// Whether the output is negated.
    pub neg: bool,
}

/// Input angles as multiples of `pi` in `[0, 2)`, written `(numerator, denominator)`, with the
/// corresponding output of `sin`.
const SIN_VALUES: [((u32, u32), TrigValue, bool); 16] = [
    ((0, 1), TrigValue::Zero, false),
    ((1, 6), TrigValue::Half, false),
    ((1, 4), TrigValue::HalfSqrtTwo, false),
    ((1, 3), TrigValue::HalfSqrtThree, false),
    ((1, 2), TrigValue::One, false),
    ((2, 3), TrigValue::HalfSqrtThree, false),
    ((3, 4), TrigValue::HalfSqrtTwo, false),
    ((5, 6), TrigValue::Half, false),
    ((1, 1), TrigValue::Zero, false),
    ((7, 6), TrigValue::Half, true),
    ((5, 4), TrigValue::HalfSqrtTwo, true),
    ((4, 3), TrigValue::HalfSqrtThree, true),
    ((3, 2), TrigValue::One, true),
    ((5, 3), TrigValue::HalfSqrtThree, true),
    ((7, 4), TrigValue::HalfSqrtTwo, true),
    ((11, 6), TrigValue::Half, true),
];

/// Lookup table for `sin`.
pub static SIN_TABLE: Lazy<HashMap<(u32, u32), TrigOut>> = Lazy::new(|| {
    SIN_VALUES
        .iter()
        .map(|&(angle, output, neg)| (angle, TrigOut { output, neg }))
        .collect()
});

/// Lookup table for `cos`, using `cos(t) = sin(t + pi/2)`.
pub static COS_TABLE: Lazy<HashMap<(u32, u32), TrigOut>> = Lazy::new(|| {
    SIN_VALUES
        .iter()
        .filter_map(|&((numer, denom), _, _)| {
            let angle = normalize_angle(&Rational::from((numer, denom)))?;
            let shifted = normalize_angle(&(Rational::from((numer, denom)) + Rational::from((1, 2))))?;
            SIN_TABLE.get(&shifted).map(|out| (angle, *out))
        })
        .collect()
});

/// Reduces a multiple of `pi` into `[0, 2)`.
fn normalize_angle(turns: &Rational) -> Option<(u32, u32)> {
    let periods = Rational::from(turns / 2u32).floor();
    let angle = Rational::from(turns - periods * 2u32);
    Some((angle.numer().to_u32()?, angle.denom().to_u32()?))
}

/// If the argument is a rational multiple of `pi`, returns the multiple.
fn pi_multiple(arg: &Fraction) -> Option<Rational> {
    if !arg.denom().is_one() {
        return None;
    }
    let (monomial, coeff) = arg.numer().as_term()?;
    match monomial.as_atom()? {
        Atom::Const(Constant::Pi) => Some(coeff.clone()),
        _ => None,
    }
}

/// Looks up the exact value of a function at a rational multiple of `pi`.
fn lookup(table: &HashMap<(u32, u32), TrigOut>, turns: &Rational) -> Option<Fraction> {
    let out = table.get(&normalize_angle(turns)?)?;
    let value = out.output.to_fraction();
    Some(if out.neg { value.neg() } else { value })
}

/// If the argument is `u + k pi` for a nonzero `u` and a multiple `k` of `1/2`, returns `u`,
/// `sin(k pi)` and `cos(k pi)`.
fn split_quarter_turns(arg: &Fraction) -> Option<(Fraction, Fraction, Fraction)> {
    if !arg.denom().is_one() || arg.numer().len() < 2 {
        return None;
    }
    let pi = Monomial::atom(Atom::Const(Constant::Pi), 1);
    let (_, turns) = arg.numer().terms().find(|(monomial, _)| **monomial == pi)?;
    if *Rational::from(turns * 2u32).denom() != 1 {
        return None;
    }

    let rest = arg.numer().sub(&Poly::term(pi, turns.clone())).ok()?;
    Some((Fraction::from_poly(rest), lookup(&SIN_TABLE, turns)?, lookup(&COS_TABLE, turns)?))
}

/// If the argument is `n * m` for a monomial `m` and integer `2 <= n <= MAX_MULTIPLE`, returns
/// `n` and `m`.
fn split_multiple(arg: &Fraction) -> Option<(u32, Fraction)> {
    if !arg.denom().is_one() {
        return None;
    }
    let (monomial, coeff) = arg.numer().as_term()?;
    if monomial.is_one() || *coeff.denom() != 1 {
        return None;
    }
    let n = coeff.numer().to_u32().filter(|n| (2..=MAX_MULTIPLE).contains(n))?;
    Some((n, Fraction::from_poly(Poly::term(monomial.clone(), Rational::from(1)))))
}

impl Simplifier<'_> {
    /// `sin(arg)`.
    pub(crate) fn sin(&mut self, arg: Fraction) -> Result<Fraction, SimplifyError> {
        if arg.is_negative() {
            self.step(Step::Parity(Func::Sin));
            return Ok(self.sin(arg.neg())?.neg());
        }
        if arg.is_zero() {
            self.step(Step::ExactValue(Func::Sin));
            return Ok(Fraction::zero());
        }
        if let Some(value) = pi_multiple(&arg).and_then(|turns| lookup(&SIN_TABLE, &turns)) {
            self.step(Step::ExactValue(Func::Sin));
            return Ok(value);
        }
        if let Some((rest, sin_k, cos_k)) = split_quarter_turns(&arg) {
            // sin(u + k pi) = sin(u) cos(k pi) + cos(u) sin(k pi)
            self.step(Step::QuarterTurnShift);
            return self.sin(rest.clone())?.mul(&cos_k)?.add(&self.cos(rest)?.mul(&sin_k)?);
        }
        if let Some((n, unit)) = split_multiple(&arg) {
            return Ok(self.multiple_angle(n, unit)?.0);
        }
        Ok(Fraction::atom(Atom::call(Func::Sin, arg)))
    }

    /// `cos(arg)`.
    pub(crate) fn cos(&mut self, arg: Fraction) -> Result<Fraction, SimplifyError> {
        if arg.is_negative() {
            self.step(Step::Parity(Func::Cos));
            return self.cos(arg.neg());
        }
        if arg.is_zero() {
            self.step(Step::ExactValue(Func::Cos));
            return Ok(Fraction::one());
        }
        if let Some(value) = pi_multiple(&arg).and_then(|turns| lookup(&COS_TABLE, &turns)) {
            self.step(Step::ExactValue(Func::Cos));
            return Ok(value);
        }
        if let Some((rest, sin_k, cos_k)) = split_quarter_turns(&arg) {
            // cos(u + k pi) = cos(u) cos(k pi) - sin(u) sin(k pi)
            self.step(Step::QuarterTurnShift);
            return self.cos(rest.clone())?.mul(&cos_k)?.sub(&self.sin(rest)?.mul(&sin_k)?);
        }
        if let Some((n, unit)) = split_multiple(&arg) {
            return Ok(self.multiple_angle(n, unit)?.1);
        }
        Ok(Fraction::atom(Atom::call(Func::Cos, arg)))
    }

    /// Expands `sin(nu)` and `cos(nu)` with the angle addition formulas.
    fn multiple_angle(&mut self, n: u32, unit: Fraction) -> Result<(Fraction, Fraction), SimplifyError> {
        self.step(Step::MultipleAngle);
        let sin = Fraction::atom(Atom::call(Func::Sin, unit.clone()));
        let cos = Fraction::atom(Atom::call(Func::Cos, unit));
        let (mut sin_n, mut cos_n) = (sin.clone(), cos.clone());
        for _ in 1..n {
            let next_sin = sin_n.mul(&cos)?.add(&cos_n.mul(&sin)?)?;
            let next_cos = cos_n.mul(&cos)?.sub(&sin_n.mul(&sin)?)?;
            sin_n = next_sin;
            cos_n = next_cos;
        }
        Ok((self.reduce(sin_n)?, self.reduce(cos_n)?))
    }
}
