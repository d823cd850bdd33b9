//! Square root.

use crate::ball::Ball;
use crate::defs::RoundingMode;
use crate::defs::MIN_P;
use crate::float::Float;
use crate::mag::Mag;

impl Ball {
    /// Computes the square root of `self` with precision `p`.
    ///
    /// A ball which is not certainly nonnegative gives the indeterminate ball.
    /// A nonnegative ball touching zero gives `[0, sqrt(upper bound)]`.
    pub fn sqrt(&self, p: usize) -> Self {
        if self.is_indeterminate() || !self.is_nonnegative() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);

        if self.mid.is_inf_pos() {
            return Self::pos_inf();
        }

        if self.rad.is_zero() {
            return Self::from_rounded(self.mid.sqrt(p, RoundingMode::ToZero), Mag::Zero, p);
        }

        let m_lo = Mag::from_float_lower(&self.mid);
        let d_lo = m_lo.sub_lower(&self.rad);
        if d_lo.is_zero() {
            let upper = self.upper_bound(p + 2);
            return match upper.sqrt(p, RoundingMode::Up) {
                Ok((s, _)) => half_interval(&s),
                Err(_) => Self::indeterminate(),
            };
        }

        let den = m_lo.sqrt_lower().add_lower(&d_lo.sqrt_lower());
        let rad = self.rad.div(&den);
        Self::from_rounded(self.mid.sqrt(p, RoundingMode::ToZero), rad, p)
    }

    /// Computes `1 / sqrt(self)` with precision `p`.
    pub fn rsqrt(&self, p: usize) -> Self {
        self.sqrt(p.max(MIN_P) + 8).inv(p)
    }
}

// The ball [0, s].
pub(crate) fn half_interval(s: &Float) -> Ball {
    match s.mul_2exp(-1) {
        Ok(h) => Ball {
            rad: Mag::from_float_up(&h),
            mid: h,
        },
        Err(e) => Ball::from_range_error(&e, Mag::from_float_up(s)),
    }
}
