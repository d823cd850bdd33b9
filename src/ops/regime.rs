//! Evaluation regimes of the transcendental functions.

use crate::defs::MIN_P;
use crate::defs::TRIM_PADDING;

/// Working precision up to which the exponential uses precomputed tables and the
/// other functions use fixed point series. Above it, binary splitting is used.
pub const EXP_TAB_PREC: usize = 640;

/// Trigonometric functions of arguments with a larger exponent return `[-1, 1]`.
pub const TRIG_HUGE_EXP: i64 = 1 << 16;

/// The way a function value is computed for a given argument and precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Zero, infinity, NaN, or an infinite radius.
    ExactSpecial,

    /// The argument is small enough for a low order expansion with an analytic error bound.
    Tiny,

    /// Argument reduction followed by table lookup or a fixed point series.
    NormalTableCache,

    /// Argument reduction followed by bit-burst binary splitting.
    NormalBinarySplit,

    /// The result is too large to be represented, or the argument is too large for a meaningful result.
    HugeOverflow,

    /// The result is too small to be represented.
    HugeUnderflow,
}

/// Normal regime for the working precision `wp`.
pub(crate) fn normal_regime(wp: usize) -> Regime {
    if wp + 16 <= EXP_TAB_PREC {
        Regime::NormalTableCache
    } else {
        Regime::NormalBinarySplit
    }
}

/// Precision `p` clipped to a little above the accuracy `acc` in bits of the argument.
pub(crate) fn effective_precision(p: usize, acc: i64) -> usize {
    if acc >= p as i64 {
        p
    } else {
        ((acc.max(0) + TRIM_PADDING) as usize).min(p).max(MIN_P)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_regime_helpers() {
        assert_eq!(normal_regime(128), Regime::NormalTableCache);
        assert_eq!(normal_regime(EXP_TAB_PREC), Regime::NormalBinarySplit);
        assert_eq!(effective_precision(100, 200), 100);
        assert_eq!(effective_precision(100, 40), 56);
        assert_eq!(effective_precision(100, -5), 16);
        assert_eq!(effective_precision(10, 5), 10);
    }
}
