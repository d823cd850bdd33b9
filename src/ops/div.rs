//! Division.

use crate::ball::Ball;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::MIN_P;
use crate::float::Float;
use crate::mag::Mag;

impl Ball {
    /// Divides `self` by `d2` with precision `p`.
    /// If `d2` contains zero, the result is the whole line `0 +/- inf`.
    pub fn div(&self, d2: &Self, p: usize) -> Self {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);

        if d2.mid.is_inf() {
            return if self.mid.is_inf() || self.rad.is_inf() {
                Self::indeterminate()
            } else {
                Self::zero()
            };
        }

        let ym_lo = Mag::from_float_lower(&d2.mid);
        let den_lo = ym_lo.sub_lower(&d2.rad);
        if den_lo.is_zero() {
            return Self::zero_pm_inf();
        }

        if let Float::Inf(s) = self.mid {
            if self.rad.is_inf() {
                return Self::zero_pm_inf();
            }
            let sy = d2.mid.sign().unwrap_or(Sign::Pos);
            return Self::exact(Float::Inf(s.mul(sy)));
        }
        if self.rad.is_inf() {
            return Self::zero_pm_inf();
        }

        let rad = if self.rad.is_zero() && d2.rad.is_zero() {
            Mag::Zero
        } else {
            let xm = Mag::from_float_up(&self.mid);
            let ym = Mag::from_float_up(&d2.mid);
            let num = xm.mul(&d2.rad).add(&ym.mul(&self.rad));
            num.div(&ym_lo.mul_lower(&den_lo))
        };

        Self::from_rounded(self.mid.div(&d2.mid, p, RoundingMode::ToZero), rad, p)
    }

    /// Computes `1 / self` with precision `p`.
    pub fn inv(&self, p: usize) -> Self {
        Self::one().div(self, p)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_div() {
        let a = Ball::from_i64(1);
        let b = Ball::from_i64(3);
        let c = a.div(&b, 64);
        assert!(!c.is_exact());
        assert!((c.mid().to_f64() - 1.0 / 3.0).abs() < 1e-18);
        assert!(c.rad().to_f64() < 1e-18);

        assert_eq!(Ball::from_i64(-12).div(&Ball::from_i64(4), 10), Ball::from_i64(-3));

        let x = Ball::from_f64_with_error(4.0, 1.0);
        let y = Ball::from_f64_with_error(2.0, 0.5);
        let z = x.div(&y, 53);
        assert!(z.contains(&Ball::from_f64(5.0 / 1.5)));
        assert!(z.contains(&Ball::from_f64(3.0 / 2.5)));
    }

    #[test]
    fn test_div_special() {
        // divisor touching zero
        let y = Ball::from_f64_with_error(1.0, 1.0);
        assert_eq!(Ball::from_i64(5).div(&y, 10), Ball::zero_pm_inf());
        assert_eq!(Ball::from_i64(5).div(&Ball::zero(), 10), Ball::zero_pm_inf());
        assert_eq!(Ball::zero().inv(10), Ball::zero_pm_inf());

        assert_eq!(Ball::from_i64(5).div(&Ball::neg_inf(), 10), Ball::zero());
        assert!(Ball::pos_inf().div(&Ball::pos_inf(), 10).is_indeterminate());
        assert_eq!(Ball::pos_inf().div(&Ball::from_i64(-2), 10), Ball::neg_inf());
        assert!(Ball::indeterminate().div(&Ball::one(), 10).is_indeterminate());
        assert_eq!(Ball::zero_pm_inf().div(&Ball::one(), 10), Ball::zero_pm_inf());
    }

    #[test]
    fn test_div_random() {
        for _ in 0..200 {
            let x = Ball::random(80, -20, 20).unwrap();
            let y = Ball::random(80, -20, 20).unwrap();
            let z = x.div(&y, 80);
            let back = z.mul(&y, 160);
            assert!(back.contains(&Ball::exact(x.mid().clone())));
        }
    }
}
