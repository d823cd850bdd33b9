//! Conversions between floats and primitive types, big integers and fixed point numbers.

use super::arith::to_bigint;
use super::Float;
use crate::defs::{Error, Exponent, RoundingMode, Sign};
use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_traits::{ToPrimitive, Zero};

const F64_EXP_MASK: u64 = 0x7ff;
const F64_FRAC_MASK: u64 = (1 << 52) - 1;

impl Float {
    /// Constructs a float from an integer.
    pub fn from_i64(i: i64) -> Self {
        Self::from_bigint(&BigInt::from(i))
    }

    /// Constructs a float from an unsigned integer.
    pub fn from_u64(u: u64) -> Self {
        Self::from(&BigUint::from(u))
    }

    /// Constructs a float from a big integer.
    pub fn from_bigint(i: &BigInt) -> Self {
        let s = if i.sign() == BigSign::Minus { Sign::Neg } else { Sign::Pos };
        Self::from_parts_exact(s, i.magnitude().clone(), 0)
    }

    /// Constructs a float holding exactly the value of `f`.
    pub fn from_f64(f: f64) -> Self {
        let bits = f.to_bits();
        let s = if bits >> 63 != 0 { Sign::Neg } else { Sign::Pos };
        let exp = (bits >> 52) & F64_EXP_MASK;
        let frac = bits & F64_FRAC_MASK;

        if exp == F64_EXP_MASK {
            return if frac == 0 { Float::Inf(s) } else { Float::NaN };
        }

        let (m, e) = if exp == 0 {
            (frac, -1074)
        } else {
            (frac | (1 << 52), exp as Exponent - 1075)
        };

        Self::from_parts_exact(s, BigUint::from(m), e)
    }

    /// Converts `self` to the nearest `f64`. Values outside of the `f64` range become
    /// infinity or zero.
    pub fn to_f64(&self) -> f64 {
        match self {
            Float::Zero => 0.0,
            Float::NaN => f64::NAN,
            Float::Inf(s) => {
                if s.is_positive() {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                }
            }
            Float::Finite { s, .. } => {
                let sign = if s.is_positive() { 1.0 } else { -1.0 };
                let top = self.exponent().unwrap_or(0);
                if top > 1025 {
                    return sign * f64::INFINITY;
                }
                if top < -1100 {
                    return sign * 0.0;
                }

                match self.round(53, RoundingMode::ToEven) {
                    Ok((Float::Finite { m, e, .. }, _)) => {
                        let m = m.to_u64().unwrap_or(0) as f64;
                        let h = (e / 2) as i32;
                        let l = (e - e / 2) as i32;
                        sign * m * 2f64.powi(h) * 2f64.powi(l)
                    }
                    _ => sign * f64::INFINITY,
                }
            }
        }
    }

    /// Returns `floor(self * 2^w)`.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: `self` is infinite or NaN.
    pub fn to_fixed(&self, w: Exponent) -> Result<BigInt, Error> {
        match self {
            Float::Zero => Ok(BigInt::zero()),
            Float::Finite { s, m, e } => {
                let shift = e.checked_add(w).ok_or(Error::InvalidArgument)?;
                if shift >= 0 {
                    Ok(to_bigint(*s, m << (shift as usize)))
                } else {
                    let n = shift.unsigned_abs();
                    let q = if n >= m.bits() { BigUint::zero() } else { m >> (n as usize) };
                    // the mantissa is odd, so some bits are always dropped
                    if s.is_negative() {
                        Ok(-BigInt::from(q + 1u32))
                    } else {
                        Ok(BigInt::from(q))
                    }
                }
            }
            _ => Err(Error::InvalidArgument),
        }
    }

    /// Returns the value `v * 2^-w`.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the value is too large to be represented.
    ///  - ExponentUnderflow: the value is too small to be represented.
    pub fn from_fixed(v: &BigInt, w: Exponent) -> Result<Self, Error> {
        let s = if v.sign() == BigSign::Minus { Sign::Neg } else { Sign::Pos };
        Self::from_parts(s, v.magnitude().clone(), -w)
    }

    /// Returns the value as `i64` if it is an integer that fits.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Float::Zero => Some(0),
            Float::Finite { .. } if self.is_int() && self.exponent()? <= 64 => {
                self.to_fixed(0).ok()?.to_i64()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_f64() {
        for f in [1.0, -0.75, 3.5e300, -1.25e-300, 5e-324, f64::MAX, f64::MIN_POSITIVE, 0.1] {
            assert_eq!(Float::from_f64(f).to_f64(), f);
        }
        assert!(Float::from_f64(f64::NAN).is_nan());
        assert_eq!(Float::from_f64(f64::NEG_INFINITY), Float::Inf(Sign::Neg));
        assert_eq!(Float::from_f64(0.0), Float::Zero);
        assert_eq!(Float::from_f64(-0.0), Float::Zero);
        assert_eq!(Float::from_f64(6.0), Float::from_i64(6));
        assert_eq!(Float::from_f64(5e-324).exponent(), Some(-1073));

        let big = Float::from_i64(1).mul_2exp(5000).unwrap();
        assert_eq!(big.to_f64(), f64::INFINITY);
        assert_eq!(big.neg().to_f64(), f64::NEG_INFINITY);
        let small = Float::from_i64(1).mul_2exp(-5000).unwrap();
        assert_eq!(small.to_f64(), 0.0);

        for _ in 0..1000 {
            let f: f64 = rand::random::<f64>() * 1e10 - 5e9;
            assert_eq!(Float::from_f64(f).to_f64(), f);
        }
    }

    #[test]
    fn test_fixed() {
        let x = Float::from_f64(-2.75);
        assert_eq!(x.to_fixed(0).unwrap(), BigInt::from(-3));
        assert_eq!(x.to_fixed(1).unwrap(), BigInt::from(-6));
        assert_eq!(x.to_fixed(2).unwrap(), BigInt::from(-11));
        assert_eq!(x.to_fixed(-10).unwrap(), BigInt::from(-1));
        assert_eq!(x.abs().to_fixed(-10).unwrap(), BigInt::from(0));
        assert_eq!(Float::from_fixed(&BigInt::from(-11), 2).unwrap(), x);
        assert_eq!(Float::Inf(Sign::Pos).to_fixed(0), Err(Error::InvalidArgument));

        assert_eq!(Float::from_i64(-123).to_i64(), Some(-123));
        assert_eq!(Float::from_f64(0.5).to_i64(), None);
        assert_eq!(Float::from_i64(1).mul_2exp(70).unwrap().to_i64(), None);
        assert_eq!(Float::from_i64(i64::MIN).to_i64(), Some(i64::MIN));
    }
}
