//! Basic arithmetic operations.

use super::round::round_parts;
use super::Float;
use crate::defs::{Error, Exponent, RoundingMode, Sign};
use num_bigint::{BigInt, BigUint, Sign as BigSign};
use num_integer::Integer;
use num_traits::Zero;

pub(super) fn to_bigint(s: Sign, m: BigUint) -> BigInt {
    let sign = if s.is_positive() { BigSign::Plus } else { BigSign::Minus };
    BigInt::from_biguint(sign, m)
}

fn from_bigint(v: BigInt) -> (Sign, BigUint) {
    let (sign, m) = v.into_parts();
    let s = if sign == BigSign::Minus { Sign::Neg } else { Sign::Pos };
    (s, m)
}

// rounds to `p` bits, or normalizes exactly if `p` is None.
fn finish(s: Sign, m: BigUint, e: Exponent, p: Option<usize>, rm: RoundingMode) -> Result<(Float, bool), Error> {
    match p {
        Some(p) => round_parts(s, m, e, p, rm),
        None => Ok((Float::from_parts(s, m, e)?, false)),
    }
}

fn add_finite(
    (s1, m1, e1): (Sign, &BigUint, Exponent),
    (s2, m2, e2): (Sign, &BigUint, Exponent),
    p: Option<usize>,
    rm: RoundingMode,
) -> Result<(Float, bool), Error> {
    let top1 = e1 + m1.bits() as Exponent;
    let top2 = e2 + m2.bits() as Exponent;

    // An operand lying entirely below the rounding position of the other one
    // influences only the sticky bit, so it is replaced by a single bit just
    // under everything that can matter for rounding.
    let one = BigUint::from(1u32);
    let mut a = (s1, m1, e1);
    let mut b = (s2, m2, e2);
    if let Some(p) = p {
        let p = p as Exponent;
        if top1 >= top2 {
            let k = e1.min(top1 - p - 3);
            if top2 <= k {
                b = (s2, &one, k - 1);
            }
        } else {
            let k = e2.min(top2 - p - 3);
            if top1 <= k {
                a = (s1, &one, k - 1);
            }
        }
    }

    let e = a.2.min(b.2);
    let va = to_bigint(a.0, a.1 << ((a.2 - e) as usize));
    let vb = to_bigint(b.0, b.1 << ((b.2 - e) as usize));
    let sum = va + vb;

    if sum.is_zero() {
        return Ok((Float::Zero, false));
    }

    let (s, m) = from_bigint(sum);
    finish(s, m, e, p, rm)
}

impl Float {
    fn add_impl(&self, d2: &Self, p: Option<usize>, rm: RoundingMode) -> Result<(Float, bool), Error> {
        match (self, d2) {
            (Float::NaN, _) | (_, Float::NaN) => Ok((Float::NaN, false)),
            (Float::Inf(s1), Float::Inf(s2)) => {
                if s1 == s2 {
                    Ok((Float::Inf(*s1), false))
                } else {
                    Ok((Float::NaN, false))
                }
            }
            (Float::Inf(s), _) | (_, Float::Inf(s)) => Ok((Float::Inf(*s), false)),
            (Float::Zero, v) | (v, Float::Zero) => match p {
                Some(p) => v.round(p, rm),
                None => Ok((v.clone(), false)),
            },
            (Float::Finite { s: s1, m: m1, e: e1 }, Float::Finite { s: s2, m: m2, e: e2 }) => {
                add_finite((*s1, m1, *e1), (*s2, m2, *e2), p, rm)
            }
        }
    }

    fn mul_impl(&self, d2: &Self, p: Option<usize>, rm: RoundingMode) -> Result<(Float, bool), Error> {
        match (self, d2) {
            (Float::NaN, _) | (_, Float::NaN) => Ok((Float::NaN, false)),
            (Float::Inf(_), Float::Zero) | (Float::Zero, Float::Inf(_)) => Ok((Float::NaN, false)),
            (Float::Zero, _) | (_, Float::Zero) => Ok((Float::Zero, false)),
            (Float::Inf(s1), v) | (v, Float::Inf(s1)) => {
                let s2 = v.sign().unwrap_or(Sign::Pos);
                Ok((Float::Inf(s1.mul(s2)), false))
            }
            (Float::Finite { s: s1, m: m1, e: e1 }, Float::Finite { s: s2, m: m2, e: e2 }) => {
                finish(s1.mul(*s2), m1 * m2, e1 + e2, p, rm)
            }
        }
    }

    /// Adds `d2` to `self` and rounds the result to precision `p` using rounding mode `rm`.
    pub fn add(&self, d2: &Self, p: usize, rm: RoundingMode) -> Result<(Float, bool), Error> {
        self.add_impl(d2, Some(p), rm)
    }

    /// Subtracts `d2` from `self` and rounds the result to precision `p` using rounding mode `rm`.
    pub fn sub(&self, d2: &Self, p: usize, rm: RoundingMode) -> Result<(Float, bool), Error> {
        self.add_impl(&d2.neg(), Some(p), rm)
    }

    /// Multiplies `self` by `d2` and rounds the result to precision `p` using rounding mode `rm`.
    pub fn mul(&self, d2: &Self, p: usize, rm: RoundingMode) -> Result<(Float, bool), Error> {
        self.mul_impl(d2, Some(p), rm)
    }

    /// Exact sum of `self` and `d2`.
    pub fn add_exact(&self, d2: &Self) -> Result<Float, Error> {
        self.add_impl(d2, None, RoundingMode::ToZero).map(|(v, _)| v)
    }

    /// Exact difference of `self` and `d2`.
    pub fn sub_exact(&self, d2: &Self) -> Result<Float, Error> {
        self.add_impl(&d2.neg(), None, RoundingMode::ToZero).map(|(v, _)| v)
    }

    /// Exact product of `self` and `d2`.
    pub fn mul_exact(&self, d2: &Self) -> Result<Float, Error> {
        self.mul_impl(d2, None, RoundingMode::ToZero).map(|(v, _)| v)
    }

    /// Divides `self` by `d2` and rounds the result to precision `p` using rounding mode `rm`.
    /// Division of a nonzero number by zero gives infinity with the sign of `self`.
    pub fn div(&self, d2: &Self, p: usize, rm: RoundingMode) -> Result<(Float, bool), Error> {
        match (self, d2) {
            (Float::NaN, _) | (_, Float::NaN) => Ok((Float::NaN, false)),
            (Float::Inf(_), Float::Inf(_)) | (Float::Zero, Float::Zero) => Ok((Float::NaN, false)),
            (Float::Inf(s1), v) => {
                let s2 = v.sign().unwrap_or(Sign::Pos);
                Ok((Float::Inf(s1.mul(s2)), false))
            }
            (_, Float::Inf(_)) | (Float::Zero, _) => Ok((Float::Zero, false)),
            (Float::Finite { s, .. }, Float::Zero) => Ok((Float::Inf(*s), false)),
            (Float::Finite { s: s1, m: m1, e: e1 }, Float::Finite { s: s2, m: m2, e: e2 }) => {
                // the quotient gets at least p + 2 bits, the remainder turns into a sticky bit
                let need = (p + 2 + m2.bits() as usize) as Exponent;
                let shift = (need - m1.bits() as Exponent).max(0);
                let n = m1 << (shift as usize);
                let (mut q, r) = n.div_rem(m2);
                let mut e = e1 - e2 - shift;
                if !r.is_zero() {
                    q = (q << 1u32) | BigUint::from(1u32);
                    e -= 1;
                }
                round_parts(s1.mul(*s2), q, e, p, rm)
            }
        }
    }

    /// Computes the square root of `self` with precision `p` using rounding mode `rm`.
    /// The square root of a negative number is NaN.
    pub fn sqrt(&self, p: usize, rm: RoundingMode) -> Result<(Float, bool), Error> {
        match self {
            Float::NaN | Float::Inf(Sign::Neg) | Float::Finite { s: Sign::Neg, .. } => {
                Ok((Float::NaN, false))
            }
            Float::Zero | Float::Inf(Sign::Pos) => Ok((self.clone(), false)),
            Float::Finite { m, e, .. } => {
                let mut shift = (2 * (p as Exponent + 2) - m.bits() as Exponent).max(0);
                if (e - shift) & 1 != 0 {
                    shift += 1;
                }
                let n = m << (shift as usize);
                let mut r = n.sqrt();
                let mut exp = (e - shift) / 2;
                if &r * &r != n {
                    r = (r << 1u32) | BigUint::from(1u32);
                    exp -= 1;
                }
                round_parts(Sign::Pos, r, exp, p, rm)
            }
        }
    }

    /// Multiplies `self` by `2^k` exactly.
    ///
    /// ## Errors
    ///
    ///  - ExponentOverflow: the result is too large to be represented.
    ///  - ExponentUnderflow: the result is too small to be represented.
    pub fn mul_2exp(&self, k: Exponent) -> Result<Float, Error> {
        match self {
            Float::Finite { s, m, e } => {
                let e = e.checked_add(k).ok_or(if k > 0 {
                    Error::ExponentOverflow(*s)
                } else {
                    Error::ExponentUnderflow(*s)
                })?;
                Float::from_parts(*s, m.clone(), e)
            }
            v => Ok(v.clone()),
        }
    }
}
