//! Multiplication.

use crate::ball::Ball;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::MIN_P;
use crate::mag::Mag;

// Upper bound of the radius of the product before the midpoint is rounded.
pub(crate) fn mul_rad(x: &Ball, y: &Ball) -> Mag {
    let xm = Mag::from_float_up(&x.mid);
    let ym = Mag::from_float_up(&y.mid);
    match (x.rad.is_zero(), y.rad.is_zero()) {
        (true, true) => Mag::Zero,
        (true, false) => xm.mul(&y.rad),
        (false, true) => ym.mul(&x.rad),
        (false, false) => xm.mul(&y.rad).add(&ym.mul(&x.rad)).add(&x.rad.mul(&y.rad)),
    }
}

impl Ball {
    /// Multiplies `self` by `d2` with precision `p`.
    pub fn mul(&self, d2: &Self, p: usize) -> Self {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);
        let rad = mul_rad(self, d2);
        Self::from_rounded(self.mid.mul(&d2.mid, p, RoundingMode::ToZero), rad, p)
    }

    /// Squares `self` with precision `p`.
    pub fn sqr(&self, p: usize) -> Self {
        self.mul(self, p)
    }

    /// Multiplies `self` by `2^k` exactly.
    pub fn mul_2exp(&self, k: Exponent) -> Self {
        if self.is_indeterminate() {
            return Self::indeterminate();
        }
        let rad = self.rad.mul_2exp(k);
        match self.mid.mul_2exp(k) {
            Ok(mid) => Ball { mid, rad },
            Err(e) => Self::from_range_error(&e, rad),
        }
    }
}
