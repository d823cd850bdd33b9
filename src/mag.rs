//! Low precision unsigned magnitudes used as ball radii.
//!
//! A magnitude carries a fixed size mantissa. Every operation has an upper bound
//! version, which never returns less than the exact result, and for some operations
//! there is a `_lower` counterpart, which never returns more than the exact result.

use crate::common::util::{isqrt_u128, top_u64};
use crate::defs::{Error, Exponent, Sign, EXPONENT_MAX, EXPONENT_MIN, MAG_BITS};
use crate::float::Float;
use core::cmp::Ordering;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use num_bigint::BigUint;

const M_MIN: u32 = 1 << (MAG_BITS - 1);
const M_LIM: u128 = 1 << MAG_BITS;

/// Nonnegative magnitude: zero, `m * 2^(e - 30)` with `2^29 <= m < 2^30`, or infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mag {
    /// Zero.
    Zero,

    /// Finite nonzero magnitude.
    Finite {
        /// Normalized mantissa.
        m: u32,
        /// Exponent `E` such that `2^(E-1) <= value < 2^E`.
        e: Exponent,
    },

    /// Infinity.
    Inf,
}

// Magnitude of `n * 2^exp` rounded up.
fn from_u128_up(n: u128, exp: Exponent) -> Mag {
    if n == 0 {
        return Mag::Zero;
    }
    let bits = (128 - n.leading_zeros()) as usize;
    let mut top = exp.saturating_add(bits as Exponent);
    let mut m = if bits > MAG_BITS {
        let shift = bits - MAG_BITS;
        let q = n >> shift;
        if n & ((1u128 << shift) - 1) != 0 {
            q + 1
        } else {
            q
        }
    } else {
        n << (MAG_BITS - bits)
    };
    if m == M_LIM {
        m >>= 1;
        top = top.saturating_add(1);
    }
    if top > EXPONENT_MAX {
        Mag::Inf
    } else if top < EXPONENT_MIN {
        Mag::Finite { m: M_MIN, e: EXPONENT_MIN }
    } else {
        Mag::Finite { m: m as u32, e: top }
    }
}

// Magnitude of `n * 2^exp` rounded down.
fn from_u128_down(n: u128, exp: Exponent) -> Mag {
    if n == 0 {
        return Mag::Zero;
    }
    let bits = (128 - n.leading_zeros()) as usize;
    let top = exp.saturating_add(bits as Exponent);
    let m = if bits > MAG_BITS { n >> (bits - MAG_BITS) } else { n << (MAG_BITS - bits) };
    if top > EXPONENT_MAX {
        Mag::Finite {
            m: (M_LIM - 1) as u32,
            e: EXPONENT_MAX,
        }
    } else if top < EXPONENT_MIN {
        Mag::Zero
    } else {
        Mag::Finite { m: m as u32, e: top }
    }
}

// upper bound of Euler's number: ceil(e * 2^28) * 2^-28
const E_UP: Mag = Mag::Finite { m: 729683223, e: 2 };

impl Mag {
    /// Returns 1.
    pub fn one() -> Self {
        Mag::Finite { m: M_MIN, e: 1 }
    }

    /// Returns `2^k`, saturating at the limits of the exponent range.
    pub fn from_2exp(k: Exponent) -> Self {
        from_u128_up(1, k)
    }

    /// Upper bound of `u`.
    pub fn from_u64(u: u64) -> Self {
        from_u128_up(u as u128, 0)
    }

    /// Lower bound of `u`.
    pub fn from_u64_lower(u: u64) -> Self {
        from_u128_down(u as u128, 0)
    }

    /// Upper bound of `|f|`. NaN gives infinity.
    pub fn from_float_up(f: &Float) -> Self {
        match f {
            Float::Zero => Mag::Zero,
            Float::Finite { m, e, .. } => {
                let (t, shift, sticky) = top_u64(m);
                from_u128_up(t as u128 + sticky as u128, e.saturating_add(shift as Exponent))
            }
            Float::Inf(_) | Float::NaN => Mag::Inf,
        }
    }

    /// Lower bound of `|f|`. NaN gives zero.
    pub fn from_float_lower(f: &Float) -> Self {
        match f {
            Float::Zero | Float::NaN => Mag::Zero,
            Float::Finite { m, e, .. } => {
                let (t, shift, _) = top_u64(m);
                from_u128_down(t as u128, e.saturating_add(shift as Exponent))
            }
            Float::Inf(_) => Mag::Inf,
        }
    }

    /// Upper bound of the unit in the last place of a `p`-bit number with the magnitude of `x`.
    pub fn ulp(x: &Float, p: usize) -> Self {
        match x.exponent() {
            Some(top) => Self::from_2exp(top - p as Exponent),
            None => Mag::Zero,
        }
    }

    /// Converts `self` to a float exactly.
    pub fn to_float(&self) -> Float {
        match self {
            Mag::Zero => Float::Zero,
            Mag::Inf => Float::Inf(Sign::Pos),
            Mag::Finite { m, e } => {
                Float::from_parts_exact(Sign::Pos, BigUint::from(*m), e - MAG_BITS as Exponent)
            }
        }
    }

    /// Converts `self` to `f64`; large values become infinity.
    pub fn to_f64(&self) -> f64 {
        match self {
            Mag::Zero => 0.0,
            Mag::Inf => f64::INFINITY,
            Mag::Finite { m, e } => {
                let k = (e - MAG_BITS as Exponent).clamp(-2200, 2200) as i32;
                *m as f64 * 2f64.powi(k / 2) * 2f64.powi(k - k / 2)
            }
        }
    }

    /// Upper bound of `self` as an integer, or `None` if it does not fit `u64`.
    pub fn to_u64_up(&self) -> Option<u64> {
        match self {
            Mag::Zero => Some(0),
            Mag::Inf => None,
            Mag::Finite { m, e } => {
                let m = *m as u64;
                if *e <= 0 {
                    Some(1)
                } else if *e <= MAG_BITS as Exponent {
                    let shift = MAG_BITS as Exponent - e;
                    Some((m + (1 << shift) - 1) >> shift)
                } else if *e <= 64 {
                    Some(m << (e - MAG_BITS as Exponent))
                } else {
                    None
                }
            }
        }
    }

    /// Exponent `E` such that `2^(E-1) <= self < 2^E`, or `None` for zero and infinity.
    pub fn exponent(&self) -> Option<Exponent> {
        match self {
            Mag::Finite { e, .. } => Some(*e),
            _ => None,
        }
    }

    /// Returns true if `self` is zero.
    pub fn is_zero(&self) -> bool {
        matches!(self, Mag::Zero)
    }

    /// Returns true if `self` is infinite.
    pub fn is_inf(&self) -> bool {
        matches!(self, Mag::Inf)
    }

    /// Upper bound of `self + d2`.
    pub fn add(&self, d2: &Self) -> Self {
        match (self, d2) {
            (Mag::Inf, _) | (_, Mag::Inf) => Mag::Inf,
            (Mag::Zero, v) | (v, Mag::Zero) => *v,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                let ((hm, he), (lm, le)) = if e1 >= e2 { ((*m1, *e1), (*m2, *e2)) } else { ((*m2, *e2), (*m1, *e1)) };
                let d = he - le;
                if d >= 64 {
                    from_u128_up(((hm as u128) << 1) | 1, he - MAG_BITS as Exponent - 1)
                } else {
                    from_u128_up(((hm as u128) << d) + lm as u128, le - MAG_BITS as Exponent)
                }
            }
        }
    }

    /// Lower bound of `self + d2`.
    pub fn add_lower(&self, d2: &Self) -> Self {
        match (self, d2) {
            (Mag::Inf, _) | (_, Mag::Inf) => Mag::Inf,
            (Mag::Zero, v) | (v, Mag::Zero) => *v,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                let ((hm, he), (lm, le)) = if e1 >= e2 { ((*m1, *e1), (*m2, *e2)) } else { ((*m2, *e2), (*m1, *e1)) };
                let d = he - le;
                if d >= 64 {
                    Mag::Finite { m: hm, e: he }
                } else {
                    from_u128_down(((hm as u128) << d) + lm as u128, le - MAG_BITS as Exponent)
                }
            }
        }
    }

    /// Lower bound of `max(self - d2, 0)`.
    pub fn sub_lower(&self, d2: &Self) -> Self {
        match (self, d2) {
            (_, Mag::Inf) | (Mag::Zero, _) => Mag::Zero,
            (v, Mag::Zero) => *v,
            (Mag::Inf, _) => Mag::Inf,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                if self <= d2 {
                    return Mag::Zero;
                }
                let d = e1 - e2;
                if d >= 64 {
                    from_u128_down(((*m1 as u128) << 1) - 1, e1 - MAG_BITS as Exponent - 1)
                } else {
                    from_u128_down(((*m1 as u128) << d) - *m2 as u128, e2 - MAG_BITS as Exponent)
                }
            }
        }
    }

    /// Upper bound of `self * d2`. Zero times infinity is zero.
    pub fn mul(&self, d2: &Self) -> Self {
        match (self, d2) {
            (Mag::Zero, _) | (_, Mag::Zero) => Mag::Zero,
            (Mag::Inf, _) | (_, Mag::Inf) => Mag::Inf,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                from_u128_up(*m1 as u128 * *m2 as u128, e1 + e2 - 2 * MAG_BITS as Exponent)
            }
        }
    }

    /// Lower bound of `self * d2`. Zero times infinity is zero.
    pub fn mul_lower(&self, d2: &Self) -> Self {
        match (self, d2) {
            (Mag::Zero, _) | (_, Mag::Zero) => Mag::Zero,
            (Mag::Inf, _) | (_, Mag::Inf) => Mag::Inf,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                from_u128_down(*m1 as u128 * *m2 as u128, e1 + e2 - 2 * MAG_BITS as Exponent)
            }
        }
    }

    /// Upper bound of `self / d2`. Division by zero gives infinity.
    pub fn div(&self, d2: &Self) -> Self {
        match (self, d2) {
            (_, Mag::Zero) => Mag::Inf,
            (Mag::Zero, _) | (_, Mag::Inf) => Mag::Zero,
            (Mag::Inf, _) => Mag::Inf,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                let n = (*m1 as u128) << 64;
                let d = *m2 as u128;
                let q = n / d;
                let q = if n % d != 0 { q + 1 } else { q };
                from_u128_up(q, e1 - e2 - 64)
            }
        }
    }

    /// Lower bound of `self / d2`.
    pub fn div_lower(&self, d2: &Self) -> Self {
        match (self, d2) {
            (Mag::Zero, _) | (_, Mag::Inf) => Mag::Zero,
            (_, Mag::Zero) | (Mag::Inf, _) => Mag::Inf,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                from_u128_down(((*m1 as u128) << 64) / *m2 as u128, e1 - e2 - 64)
            }
        }
    }

    /// Upper bound of `self * 2^k`.
    pub fn mul_2exp(&self, k: Exponent) -> Self {
        match self {
            Mag::Finite { m, e } => from_u128_up(*m as u128, e.saturating_add(k).saturating_sub(MAG_BITS as Exponent)),
            v => *v,
        }
    }

    /// Upper bound of `self^n`.
    pub fn pow_u64(&self, n: u64) -> Self {
        pow_impl(*self, n, Self::mul)
    }

    /// Lower bound of `self^n`.
    pub fn pow_lower(&self, n: u64) -> Self {
        pow_impl(*self, n, Self::mul_lower)
    }

    /// Upper bound of the square root.
    pub fn sqrt(&self) -> Self {
        self.sqrt_impl(true)
    }

    /// Lower bound of the square root.
    pub fn sqrt_lower(&self) -> Self {
        self.sqrt_impl(false)
    }

    fn sqrt_impl(&self, up: bool) -> Self {
        match self {
            Mag::Finite { m, e } => {
                let mut n = (*m as u128) << 64;
                let mut exp = e - MAG_BITS as Exponent - 64;
                if exp & 1 != 0 {
                    n <<= 1;
                    exp -= 1;
                }
                let r = isqrt_u128(n);
                if up {
                    let r = if r * r != n { r + 1 } else { r };
                    from_u128_up(r, exp / 2)
                } else {
                    from_u128_down(r, exp / 2)
                }
            }
            v => *v,
        }
    }

    /// Upper bound of `exp(self) - 1`.
    pub fn expm1_up(&self) -> Self {
        if *self <= Mag::one() {
            self.add(&self.mul(self))
        } else {
            self.exp_up()
        }
    }

    /// Upper bound of `exp(self)`.
    pub fn exp_up(&self) -> Self {
        match self {
            Mag::Zero => Mag::one(),
            Mag::Inf => Mag::Inf,
            Mag::Finite { e, .. } => {
                if *self <= Mag::one() {
                    Mag::one().add(&self.expm1_up())
                } else if *e > 62 {
                    Mag::Inf
                } else {
                    match self.to_u64_up() {
                        Some(n) => E_UP.pow_u64(n),
                        None => Mag::Inf,
                    }
                }
            }
        }
    }
}

fn pow_impl(x: Mag, mut n: u64, mul: fn(&Mag, &Mag) -> Mag) -> Mag {
    let mut acc = Mag::one();
    let mut base = x;
    while n > 0 {
        if n & 1 != 0 {
            acc = mul(&acc, &base);
        }
        n >>= 1;
        if n > 0 {
            base = mul(&base, &base);
        }
    }
    acc
}

impl Default for Mag {
    fn default() -> Self {
        Mag::Zero
    }
}

impl Ord for Mag {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Mag::Zero, Mag::Zero) | (Mag::Inf, Mag::Inf) => Ordering::Equal,
            (Mag::Zero, _) | (_, Mag::Inf) => Ordering::Less,
            (_, Mag::Zero) | (Mag::Inf, _) => Ordering::Greater,
            (Mag::Finite { m: m1, e: e1 }, Mag::Finite { m: m2, e: e2 }) => {
                e1.cmp(e2).then(m1.cmp(m2))
            }
        }
    }
}

impl PartialOrd for Mag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Mag {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        Display::fmt(&self.to_float(), f)
    }
}

impl FromStr for Mag {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Error> {
        let f = src.parse::<Float>()?;
        if f.is_negative() || f.is_nan() {
            return Err(Error::InvalidArgument);
        }
        Ok(Mag::from_float_up(&f))
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    fn mag(f: f64) -> Mag {
        Mag::from_float_up(&Float::from_f64(f))
    }

    #[test]
    fn test_conv() {
        assert_eq!(Mag::one().to_f64(), 1.0);
        assert_eq!(Mag::from_2exp(-3).to_f64(), 0.125);
        assert_eq!(mag(0.75).to_f64(), 0.75);
        assert_eq!(Mag::from_u64(7).to_u64_up(), Some(7));
        assert_eq!(mag(2.5).to_u64_up(), Some(3));
        assert_eq!(mag(0.001).to_u64_up(), Some(1));
        assert_eq!(Mag::from_2exp(70).to_u64_up(), None);

        // rounding of a long mantissa
        let x = Float::from_u64((1 << 40) + 1);
        assert!(Mag::from_float_up(&x).to_f64() > x.to_f64());
        assert!(Mag::from_float_lower(&x).to_f64() < x.to_f64());
        assert_eq!(Mag::from_float_up(&Float::NaN), Mag::Inf);
        assert_eq!(Mag::from_float_lower(&Float::NaN), Mag::Zero);

        assert_eq!(Mag::ulp(&Float::from_f64(3.0), 10), Mag::from_2exp(-8));
        assert_eq!(mag(0.375).to_string(), "0x3p-3");
        assert_eq!("0x3p-3".parse::<Mag>().unwrap(), mag(0.375));
        assert!("-0x3p-3".parse::<Mag>().is_err());
    }

    #[test]
    fn test_saturation() {
        let big = Mag::from_2exp(EXPONENT_MAX - 1);
        assert_eq!(big.mul(&big), Mag::Inf);
        assert!(!big.mul_lower(&big).is_inf());
        let small = Mag::from_2exp(EXPONENT_MIN + 1);
        assert!(!small.mul(&small).is_zero());
        assert!(small.mul_lower(&small).is_zero());
        assert_eq!(Mag::Inf.mul(&Mag::Zero), Mag::Zero);
        assert_eq!(Mag::one().div(&Mag::Zero), Mag::Inf);
    }

    #[test]
    fn test_ops() {
        let lo = |f: f64| Mag::from_float_lower(&Float::from_f64(f));
        for _ in 0..1000 {
            let a = rand::random::<f64>() * 100.0 + 1e-3;
            let b = rand::random::<f64>() * 100.0 + 1e-3;

            assert!(mag(a).add(&mag(b)).to_f64() >= a + b);
            assert!(lo(a).add_lower(&lo(b)).to_f64() <= a + b);
            assert!(mag(a).mul(&mag(b)).to_f64() >= a * b);
            assert!(lo(a).mul_lower(&lo(b)).to_f64() <= a * b);
            assert!(mag(a).div(&lo(b)).to_f64() >= a / b);
            assert!(lo(a).div_lower(&mag(b)).to_f64() <= a / b);
            assert!(mag(a).sqrt().to_f64() >= a.sqrt());
            assert!(lo(a).sqrt_lower().to_f64() <= a.sqrt());
            assert!(mag(a).pow_u64(3).to_f64() >= a * a * a * (1.0 - 1e-15));
            assert!(lo(a).pow_lower(3).to_f64() <= a * a * a * (1.0 + 1e-15));
            assert!(lo(a).sub_lower(&mag(b)).to_f64() <= (a - b).max(0.0));

            let rel = (mag(a).mul(&mag(b)).to_f64() - a * b) / (a * b);
            assert!(rel < 1e-8);

            let s = rand::random::<f64>() * 5.0;
            assert!(mag(s).exp_up().to_f64() >= s.exp());
            assert!(mag(s).expm1_up().to_f64() >= s.exp_m1());
        }
    }

    #[test]
    fn test_far_operands() {
        let a = Mag::one();
        let b = Mag::from_2exp(-100);
        assert!(a.add(&b) > a);
        assert_eq!(a.add_lower(&b), a);
        assert!(a.sub_lower(&b) < a);
        assert_eq!(b.sub_lower(&a), Mag::Zero);
        assert!(a.cmp(&b) == Ordering::Greater);
        assert!(Mag::Zero < b && b < Mag::Inf);
    }
}
