//! The indivisible variables of a canonical form.

use crate::funcs::Func;
use super::fraction::Fraction;

/// A mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constant {
    /// `pi`, also written `π`.
    Pi,

    /// Euler's number, written `e` or `E`.
    E,
}

impl Constant {
    /// The name the constant is written with.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "e",
        }
    }
}

/// Something a polynomial treats as a variable.
///
/// Arguments, bases, and exponents inside an atom are themselves canonical, so two atoms are
/// equal exactly when they were built from equal canonical parts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    /// A free symbol, such as `x`.
    Symbol(String),

    /// A named constant.
    Const(Constant),

    /// A function call that no rule could evaluate, such as `sin(x)`.
    Call(Func, Vec<Fraction>),

    /// The real `n`-th root of a base, `base^(1/n)`, with `n >= 2`. Constant bases are always
    /// prime or otherwise free of perfect powers.
    Root(Fraction, u32),

    /// A power that isn't a polynomial in its base, such as `2^x`, or a fractional power of a
    /// negative constant.
    Pow(Fraction, Fraction),
}

impl Atom {
    /// The atom for a symbol name, recognizing the constants `pi`, `π`, `e` and `E`.
    pub fn symbol(name: &str) -> Self {
        match name {
            "pi" | "π" => Self::Const(Constant::Pi),
            "e" | "E" => Self::Const(Constant::E),
            name => Self::Symbol(name.to_owned()),
        }
    }

    /// The atom for an unevaluated function call with one argument.
    pub fn call(func: Func, arg: Fraction) -> Self {
        Self::Call(func, vec![arg])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn constants() {
        assert_eq!(Atom::symbol("pi"), Atom::Const(Constant::Pi));
        assert_eq!(Atom::symbol("π"), Atom::Const(Constant::Pi));
        assert_eq!(Atom::symbol("e"), Atom::Const(Constant::E));
        assert_eq!(Atom::symbol("E"), Atom::Const(Constant::E));
        assert_eq!(Atom::symbol("Pi"), Atom::Symbol("Pi".to_owned()));
    }
}
