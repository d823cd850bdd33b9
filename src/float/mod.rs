//! Binary floating point numbers with an arbitrary precision mantissa.
//!
//! A finite value is `(-1)^s * m * 2^e` where the mantissa `m` is odd, so every
//! value has exactly one representation. Rounding operations return the rounded
//! value together with a flag telling whether the result is inexact.

mod arith;
mod cmp;
mod conv;
mod fmt;
mod round;

use crate::defs::{Error, Exponent, Sign, EXPONENT_MAX, EXPONENT_MIN};
use num_bigint::BigUint;
use num_traits::Zero;

/// Floating point number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Float {
    /// Zero.
    Zero,

    /// Finite nonzero value `(-1)^s * m * 2^e` with odd `m`.
    Finite {
        /// Sign.
        s: Sign,
        /// Odd mantissa.
        m: BigUint,
        /// Exponent of the least significant bit.
        e: Exponent,
    },

    /// Infinity.
    Inf(Sign),

    /// Not a number.
    NaN,
}

impl Float {
    /// Constructs the value `(-1)^s * m * 2^e`.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the value is too large to be represented.
    ///  - ExponentUnderflow: the value is too small to be represented.
    pub fn from_parts(s: Sign, m: BigUint, e: Exponent) -> Result<Self, Error> {
        let ret = Self::from_parts_exact(s, m, e);
        if let Some(top) = ret.exponent() {
            if top > EXPONENT_MAX {
                return Err(Error::ExponentOverflow(s));
            }
            if top < EXPONENT_MIN {
                return Err(Error::ExponentUnderflow(s));
            }
        }
        Ok(ret)
    }

    /// Normalizes the mantissa without checking the exponent range.
    pub(crate) fn from_parts_exact(s: Sign, m: BigUint, e: Exponent) -> Self {
        match m.trailing_zeros() {
            None => Float::Zero,
            Some(0) => Float::Finite { s, m, e },
            Some(tz) => Float::Finite {
                s,
                m: m >> tz,
                e: e.saturating_add(tz as Exponent),
            },
        }
    }

    /// Returns positive or negative infinity.
    pub fn inf(s: Sign) -> Self {
        Float::Inf(s)
    }

    /// Returns the sign, or `None` for zero and NaN.
    pub fn sign(&self) -> Option<Sign> {
        match self {
            Float::Finite { s, .. } | Float::Inf(s) => Some(*s),
            _ => None,
        }
    }

    /// Returns the exponent `E` such that `2^(E-1) <= |self| < 2^E` for a finite nonzero value.
    pub fn exponent(&self) -> Option<Exponent> {
        match self {
            Float::Finite { m, e, .. } => Some(e.saturating_add(m.bits() as Exponent)),
            _ => None,
        }
    }

    /// Number of significant bits of the mantissa; 0 for special values.
    pub fn mantissa_bits(&self) -> usize {
        match self {
            Float::Finite { m, .. } => m.bits() as usize,
            _ => 0,
        }
    }

    /// Returns true if `self` is zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Float::Zero)
    }

    /// Returns true if `self` is NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self, Float::NaN)
    }

    /// Returns true if `self` is positive or negative infinity.
    pub fn is_inf(&self) -> bool {
        matches!(self, Float::Inf(_))
    }

    /// Returns true if `self` is positive infinity.
    pub fn is_inf_pos(&self) -> bool {
        matches!(self, Float::Inf(Sign::Pos))
    }

    /// Returns true if `self` is negative infinity.
    pub fn is_inf_neg(&self) -> bool {
        matches!(self, Float::Inf(Sign::Neg))
    }

    /// Returns true if `self` is zero or a finite nonzero number.
    pub fn is_finite(&self) -> bool {
        matches!(self, Float::Zero | Float::Finite { .. })
    }

    /// Returns true if `self` is zero, infinity or NaN.
    pub fn is_special(&self) -> bool {
        !matches!(self, Float::Finite { .. })
    }

    /// Returns true if `self` is greater than zero, including positive infinity.
    pub fn is_positive(&self) -> bool {
        self.sign() == Some(Sign::Pos)
    }

    /// Returns true if `self` is less than zero, including negative infinity.
    pub fn is_negative(&self) -> bool {
        self.sign() == Some(Sign::Neg)
    }

    /// Returns true if `self` is an integer.
    pub fn is_int(&self) -> bool {
        match self {
            Float::Zero => true,
            Float::Finite { e, .. } => *e >= 0,
            _ => false,
        }
    }

    /// Returns true if `self` is an exact power of two in absolute value.
    pub fn is_pow2(&self) -> bool {
        match self {
            Float::Finite { m, .. } => m.bits() == 1,
            _ => false,
        }
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        match self {
            Float::Finite { m, e, .. } => Float::Finite {
                s: Sign::Pos,
                m: m.clone(),
                e: *e,
            },
            Float::Inf(_) => Float::Inf(Sign::Pos),
            v => v.clone(),
        }
    }

    /// Returns the negated value.
    pub fn neg(&self) -> Self {
        match self {
            Float::Finite { s, m, e } => Float::Finite {
                s: s.invert(),
                m: m.clone(),
                e: *e,
            },
            Float::Inf(s) => Float::Inf(s.invert()),
            v => v.clone(),
        }
    }

    /// Returns a random normal number with precision `p` and exponent in the range from `exp_from` to `exp_to`.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: `p` is zero or `exp_from` is greater than `exp_to`.
    #[cfg(feature = "random")]
    pub fn random_normal(p: usize, exp_from: Exponent, exp_to: Exponent) -> Result<Self, Error> {
        use rand::Rng;

        if p == 0 || exp_from > exp_to {
            return Err(Error::InvalidArgument);
        }

        let mut rng = rand::thread_rng();
        let words = (p + 63) / 64;
        let digits: Vec<u64> = (0..words).map(|_| rng.gen()).collect();
        let mut m = BigUint::zero();
        for d in digits.iter() {
            m = (m << 64u32) + BigUint::from(*d);
        }
        m >>= words * 64 - p;
        m.set_bit(p as u64 - 1, true);

        let top = rng.gen_range(exp_from..=exp_to);
        let s = if rng.gen::<bool>() { Sign::Pos } else { Sign::Neg };
        Self::from_parts(s, m, top - p as Exponent)
    }
}

impl Default for Float {
    fn default() -> Self {
        Float::Zero
    }
}

impl From<&BigUint> for Float {
    fn from(m: &BigUint) -> Self {
        if m.is_zero() {
            Float::Zero
        } else {
            Self::from_parts_exact(Sign::Pos, m.clone(), 0)
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_normalization() {
        let a = Float::from_parts(Sign::Pos, BigUint::from(12u32), 3).unwrap();
        let b = Float::from_parts(Sign::Pos, BigUint::from(3u32), 5).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.exponent(), Some(7));
        assert_eq!(a.mantissa_bits(), 2);
        assert!(a.is_int());
        assert!(!Float::from_parts(Sign::Neg, BigUint::from(3u32), -1).unwrap().is_int());
        assert_eq!(Float::from_parts(Sign::Neg, BigUint::from(0u32), 5).unwrap(), Float::Zero);
    }

    #[test]
    fn test_range() {
        assert_eq!(
            Float::from_parts(Sign::Neg, BigUint::from(1u32), EXPONENT_MAX),
            Err(Error::ExponentOverflow(Sign::Neg))
        );
        assert_eq!(
            Float::from_parts(Sign::Pos, BigUint::from(1u32), EXPONENT_MIN - 2),
            Err(Error::ExponentUnderflow(Sign::Pos))
        );
        assert!(Float::from_parts(Sign::Pos, BigUint::from(1u32), EXPONENT_MAX - 1).is_ok());
    }

    #[test]
    fn test_random() {
        for _ in 0..100 {
            let p = rand::random::<usize>() % 300 + 1;
            let f = Float::random_normal(p, -20, 20).unwrap();
            assert!(f.mantissa_bits() <= p);
            let e = f.exponent().unwrap();
            assert!((-20..=20).contains(&e));
        }
        assert!(Float::random_normal(0, 0, 1).is_err());
    }

    #[test]
    fn test_predicates() {
        let x = Float::from_i64(-6);
        assert!(x.is_negative());
        assert!(!x.is_special());
        assert_eq!(x.abs(), Float::from_i64(6));
        assert_eq!(x.neg(), Float::from_i64(6));
        assert!(Float::Inf(Sign::Neg).is_inf_neg());
        assert!(Float::Zero.is_finite());
        assert!(!Float::NaN.is_finite());
        assert!(Float::from_u64(64).is_pow2());
    }
}
