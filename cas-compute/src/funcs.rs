//! The builtin functions understood by both the symbolic and numeric engines.

use std::fmt::{self, Display, Formatter};

/// A builtin function.
///
/// Several names can refer to the same function: `ln` is the natural logarithm `log`, and the
/// `arc`-prefixed names are the inverse trigonometric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sec,
    Csc,
    Cot,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Log,
    Log10,
    Sqrt,
    Cbrt,
    Abs,
    Factorial,
}

impl Func {
    /// Looks up a function by any of its names.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "sec" => Self::Sec,
            "csc" => Self::Csc,
            "cot" => Self::Cot,
            "asin" | "arcsin" => Self::Asin,
            "acos" | "arccos" => Self::Acos,
            "atan" | "arctan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "log" | "ln" => Self::Log,
            "log10" => Self::Log10,
            "sqrt" => Self::Sqrt,
            "cbrt" => Self::Cbrt,
            "abs" => Self::Abs,
            "factorial" => Self::Factorial,
            _ => return None,
        })
    }

    /// The canonical name of the function.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sec => "sec",
            Self::Csc => "csc",
            Self::Cot => "cot",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Sqrt => "sqrt",
            Self::Cbrt => "cbrt",
            Self::Abs => "abs",
            Self::Factorial => "factorial",
        }
    }

    /// The minimum and maximum number of arguments the function accepts.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Self::Log => (1, 2),
            _ => (1, 1),
        }
    }

    /// Returns true if the function accepts `given` arguments.
    pub fn accepts(self, given: usize) -> bool {
        let (min, max) = self.arity();
        (min..=max).contains(&given)
    }

    /// Evaluates the function numerically.
    ///
    /// Returns [`None`] if the argument count is wrong, or the function is not defined at the
    /// given arguments (e.g. the factorial of `2.5`). Results outside the real numbers come back
    /// as `NaN` or infinite, as in [`f64`] arithmetic.
    pub fn eval(self, args: &[f64]) -> Option<f64> {
        if !self.accepts(args.len()) {
            return None;
        }

        let x = args[0];
        Some(match self {
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Sec => x.cos().recip(),
            Self::Csc => x.sin().recip(),
            Self::Cot => x.tan().recip(),
            Self::Asin => x.asin(),
            Self::Acos => x.acos(),
            Self::Atan => x.atan(),
            Self::Sinh => x.sinh(),
            Self::Cosh => x.cosh(),
            Self::Tanh => x.tanh(),
            Self::Exp => x.exp(),
            Self::Log => match args.get(1) {
                Some(base) => x.ln() / base.ln(),
                None => x.ln(),
            },
            Self::Log10 => x.log10(),
            Self::Sqrt => x.sqrt(),
            Self::Cbrt => x.cbrt(),
            Self::Abs => x.abs(),
            Self::Factorial => factorial(x)?,
        })
    }
}

impl Display for Func {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The factorial of a non-negative integer-valued float. Beyond `170!`, the result overflows to
/// infinity.
fn factorial(x: f64) -> Option<f64> {
    if x < 0.0 || x.fract() != 0.0 {
        return None;
    }
    if x > 170.0 {
        return Some(f64::INFINITY);
    }

    Some((2..=x as u32).fold(1.0, |acc, n| acc * f64::from(n)))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::{
        afe_abs,
        afe_relative_error_msg,
        afe_is_relative_eq,
        assert_float_relative_eq,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn aliases() {
        assert_eq!(Func::from_name("ln"), Some(Func::Log));
        assert_eq!(Func::from_name("arcsin"), Some(Func::Asin));
        assert_eq!(Func::from_name("arctan"), Some(Func::Atan));
        assert_eq!(Func::from_name("f"), None);
    }

    #[test]
    fn names_round_trip() {
        for name in ["sin", "cosh", "log", "log10", "cbrt", "factorial"] {
            assert_eq!(Func::from_name(name).map(Func::name), Some(name));
        }
    }

    #[test]
    fn arity() {
        assert!(Func::Log.accepts(2));
        assert!(!Func::Sin.accepts(2));
        assert_eq!(Func::Sin.eval(&[]), None);
    }

    #[test]
    fn eval_basic() {
        assert_eq!(Func::Sin.eval(&[0.0]), Some(0.0));
        assert_float_relative_eq!(Func::Log.eval(&[8.0, 2.0]).unwrap(), 3.0);
        assert_float_relative_eq!(Func::Cbrt.eval(&[27.0]).unwrap(), 3.0);
        assert_float_relative_eq!(Func::Factorial.eval(&[5.0]).unwrap(), 120.0);
    }

    #[test]
    fn factorial_domain() {
        assert_eq!(Func::Factorial.eval(&[2.5]), None);
        assert_eq!(Func::Factorial.eval(&[-1.0]), None);
        assert_eq!(Func::Factorial.eval(&[0.0]), Some(1.0));
        assert_eq!(Func::Factorial.eval(&[171.0]), Some(f64::INFINITY));
    }
}
