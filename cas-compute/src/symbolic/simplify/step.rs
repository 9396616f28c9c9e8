use crate::funcs::Func;

/// A rewrite applied while building a canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A product involving a sum was expanded, as in `(x + 1)(x - 1) = x^2 - 1`.
    ExpandProduct,

    /// An integer power of a sum was expanded, as in `(x + 1)^2 = x^2 + 2x + 1`.
    ExpandPower,

    /// `sqrt(x) = x^(1/2)` and `cbrt(x) = x^(1/3)`.
    RootAsPower,

    /// A rational power of a constant was computed exactly, extracting perfect powers from the
    /// radicand, as in `sqrt(8) = 2 sqrt(2)` or `8^(1/3) = 2`.
    ExactRoot,

    /// Powers of the same root were combined, as in `sqrt(x)^2 = x`.
    RootPower,

    /// `e^x = exp(x)`.
    PowerAsExp,

    /// `exp(a + b) = exp(a) exp(b)`, and `exp(q) = e^q` for a constant `q`.
    ExpOfSum,

    /// `exp(log(u)) = u`.
    ExpOfLog,

    /// `log(x, b) = log(x) / log(b)`.
    ChangeOfBase,

    /// The logarithm of a constant was split over its prime factors, as in `log(8) = 3 log(2)`.
    LogOfConstant,

    /// `tan`, `sec`, `csc` and `cot` were written in terms of `sin` and `cos`.
    TrigAsSinCos,

    /// `sin(nu)` and `cos(nu)` were expanded with the angle addition formulas.
    MultipleAngle,

    /// A multiple of `pi/2` was split off the argument, as in `sin(x + pi) = -sin(x)`.
    QuarterTurnShift,

    /// `cos(u)^2 = 1 - sin(u)^2`.
    Pythagorean,

    /// An odd or even function absorbed the sign of its argument, as in `sin(-x) = -sin(x)`.
    Parity(Func),

    /// A function was evaluated exactly, as in `sin(pi/6) = 1/2` or `log(1) = 0`.
    ExactValue(Func),
}
