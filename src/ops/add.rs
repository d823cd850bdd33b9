//! Addition and subtraction.

use crate::ball::Ball;
use crate::defs::RoundingMode;
use crate::defs::MIN_P;
use crate::ops::mul::mul_rad;

impl Ball {
    /// Returns the negated ball.
    pub fn neg(&self) -> Self {
        Ball {
            mid: self.mid.neg(),
            rad: self.rad,
        }
    }

    /// Returns a ball containing the absolute values of all points of `self`.
    pub fn abs(&self) -> Self {
        Ball {
            mid: self.mid.abs(),
            rad: self.rad,
        }
    }

    /// Adds `d2` to `self` with precision `p`.
    pub fn add(&self, d2: &Self, p: usize) -> Self {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);
        let rad = self.rad.add(&d2.rad);
        Self::from_rounded(self.mid.add(&d2.mid, p, RoundingMode::ToZero), rad, p)
    }

    /// Subtracts `d2` from `self` with precision `p`.
    pub fn sub(&self, d2: &Self, p: usize) -> Self {
        self.add(&d2.neg(), p)
    }

    /// Computes `self + d2 * d3` with a single rounding of the midpoint.
    pub fn addmul(&self, d2: &Self, d3: &Self, p: usize) -> Self {
        if self.is_indeterminate() || d2.is_indeterminate() || d3.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);
        match d2.mid.mul_exact(&d3.mid) {
            Ok(prod) => {
                let rad = self.rad.add(&mul_rad(d2, d3));
                Self::from_rounded(self.mid.add(&prod, p, RoundingMode::ToZero), rad, p)
            }
            Err(_) => self.add(&d2.mul(d3, p), p),
        }
    }

    /// Computes `self - d2 * d3` with a single rounding of the midpoint.
    pub fn submul(&self, d2: &Self, d3: &Self, p: usize) -> Self {
        self.addmul(&d2.neg(), d3, p)
    }
}
