//! Rounding of mantissas to a given precision.

use super::Float;
use crate::defs::{Error, Exponent, RoundingMode, Sign};
use num_bigint::BigUint;

/// Rounds `(-1)^s * m * 2^e` to `p` significant bits using rounding mode `rm`.
/// Returns the rounded value and `true` if it differs from the exact one.
pub(crate) fn round_parts(
    s: Sign,
    m: BigUint,
    e: Exponent,
    p: usize,
    rm: RoundingMode,
) -> Result<(Float, bool), Error> {
    let bits = m.bits() as usize;
    if bits <= p {
        return Ok((Float::from_parts(s, m, e)?, false));
    }

    let shift = bits - p;
    let tz = m.trailing_zeros().unwrap_or(0) as usize;
    if tz >= shift {
        return Ok((Float::from_parts(s, m, e)?, false));
    }

    let q = &m >> shift;
    let round_up = match rm {
        RoundingMode::ToZero => false,
        RoundingMode::FromZero => true,
        RoundingMode::Up => s.is_positive(),
        RoundingMode::Down => s.is_negative(),
        RoundingMode::ToEven | RoundingMode::ToOdd => {
            let half = m.bit(shift as u64 - 1);
            let sticky = tz < shift - 1;
            half && (sticky || q.bit(0) == (rm == RoundingMode::ToEven))
        }
    };

    let q = if round_up { q + 1u32 } else { q };
    let ret = Float::from_parts(s, q, e.saturating_add(shift as Exponent))?;

    Ok((ret, true))
}

impl Float {
    /// Rounds `self` to precision `p` using rounding mode `rm`.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: rounding carried the value out of the exponent range.
    pub fn round(&self, p: usize, rm: RoundingMode) -> Result<(Float, bool), Error> {
        match self {
            Float::Finite { s, m, e } => round_parts(*s, m.clone(), *e, p, rm),
            v => Ok((v.clone(), false)),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn f(m: u64, e: Exponent) -> Float {
        Float::from_parts(Sign::Pos, BigUint::from(m), e).unwrap()
    }

    #[test]
    fn test_round() {
        // 0b10110 -> 3 bits
        let x = f(0b10110, 0);
        assert_eq!(x.round(3, RoundingMode::ToZero).unwrap(), (f(0b101, 2), true));
        assert_eq!(x.round(3, RoundingMode::FromZero).unwrap(), (f(0b110, 2), true));
        assert_eq!(x.round(3, RoundingMode::Up).unwrap(), (f(0b110, 2), true));
        assert_eq!(x.round(3, RoundingMode::Down).unwrap(), (f(0b101, 2), true));
        assert_eq!(x.round(3, RoundingMode::ToEven).unwrap(), (f(0b110, 2), true));
        assert_eq!(x.round(3, RoundingMode::ToOdd).unwrap(), (f(0b101, 2), true));
        assert_eq!(x.round(4, RoundingMode::ToOdd).unwrap(), (x.clone(), false));

        let y = x.neg();
        assert_eq!(y.round(3, RoundingMode::Up).unwrap().0, f(0b101, 2).neg());
        assert_eq!(y.round(3, RoundingMode::Down).unwrap().0, f(0b110, 2).neg());

        // not a tie: 0b10111
        let x = f(0b10111, 0);
        assert_eq!(x.round(3, RoundingMode::ToOdd).unwrap().0, f(0b110, 2));

        // carry into a new bit
        let x = f(0b1111, 0);
        assert_eq!(x.round(2, RoundingMode::FromZero).unwrap(), (f(1, 4), true));

        assert_eq!(Float::NaN.round(2, RoundingMode::ToEven).unwrap(), (Float::NaN, false));
    }
}
