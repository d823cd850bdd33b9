//! Accuracy measurement, trimming, and set operations on balls.

use super::Ball;
use crate::defs::{Error, RoundingMode, ACCURACY_EXACT, ACCURACY_NONE, EXPONENT_MIN, MAG_BITS, MIN_P, TRIM_PADDING};
use crate::float::Float;
use crate::mag::Mag;
use core::cmp::Ordering;

// extra bits of the endpoints used by the set operations
const BOUND_GUARD: usize = 8;

impl Ball {
    /// Relative accuracy of the ball in bits: approximately `-log2(rad / |mid|)`.
    ///
    /// Returns `ACCURACY_EXACT` for an exact ball, and `ACCURACY_NONE` if the midpoint
    /// is zero or not finite or the radius is infinite.
    pub fn rel_accuracy_bits(&self) -> i64 {
        if self.mid.is_nan() {
            return ACCURACY_NONE;
        }
        if self.rad.is_zero() {
            return ACCURACY_EXACT;
        }
        match (self.mid.exponent(), self.rad.exponent()) {
            (Some(em), Some(er)) => em.saturating_sub(er).saturating_sub(1),
            _ => ACCURACY_NONE,
        }
    }

    /// Relative error of the ball in bits, the negated relative accuracy.
    pub fn rel_error_bits(&self) -> i64 {
        self.rel_accuracy_bits().saturating_neg()
    }

    /// Number of significant bits of the midpoint.
    pub fn bits(&self) -> usize {
        self.mid.mantissa_bits()
    }

    /// Rounds the midpoint to a precision slightly above the relative accuracy of the ball,
    /// dropping the bits that carry no information.
    pub fn trim(&self) -> Self {
        if self.mid.is_special() || self.rad.is_inf() {
            return self.clone();
        }
        let acc = self.rel_accuracy_bits();
        let bits = self.bits() as i64;
        if acc == ACCURACY_EXACT || acc > bits - TRIM_PADDING {
            self.clone()
        } else if acc < -TRIM_PADDING {
            Ball {
                mid: Float::Zero,
                rad: self.mag_upper(),
            }
        } else {
            self.set_round((acc.max(0) + TRIM_PADDING) as usize)
        }
    }

    /// Smallest ball with precision `p` containing both `self` and `d2`.
    pub fn union(&self, d2: &Self, p: usize) -> Self {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return Self::indeterminate();
        }
        let wp = p.max(MIN_P) + BOUND_GUARD;
        let lo = self.lower_bound(wp).min(&d2.lower_bound(wp));
        let hi = self.upper_bound(wp).max(&d2.upper_bound(wp));
        Self::set_interval(&lo, &hi, p)
    }

    /// Ball with precision `p` containing the intersection of `self` and `d2`,
    /// or `None` if they do not overlap.
    pub fn intersection(&self, d2: &Self, p: usize) -> Option<Self> {
        if self.is_indeterminate() {
            return Some(d2.clone());
        }
        if d2.is_indeterminate() {
            return Some(self.clone());
        }
        if !self.overlaps(d2) {
            return None;
        }
        let wp = p.max(MIN_P) + BOUND_GUARD;
        let lo = self.lower_bound(wp).max(&d2.lower_bound(wp));
        let hi = self.upper_bound(wp).min(&d2.upper_bound(wp));
        Some(Self::set_interval(&lo, &hi, p))
    }

    /// Ball with precision `p` containing the interval `[lo, hi]`.
    ///
    /// An empty interval or a NaN endpoint gives the indeterminate ball; an interval
    /// with an infinite endpoint gives the whole line unless it is a single infinity.
    pub fn set_interval(lo: &Float, hi: &Float, p: usize) -> Self {
        match lo.cmp(hi) {
            None | Some(Ordering::Greater) => return Self::indeterminate(),
            Some(Ordering::Equal) => return Self::exact(lo.clone()),
            Some(Ordering::Less) => {}
        }
        if lo.is_inf() || hi.is_inf() {
            return Self::zero_pm_inf();
        }

        let p = p.max(MIN_P);
        let mid = lo
            .add(hi, p, RoundingMode::ToZero)
            .and_then(|(s, _)| s.mul_2exp(-1));

        match mid {
            Ok(mid) => {
                let r1 = dist_up(&mid, lo);
                let r2 = dist_up(hi, &mid);
                Ball { mid, rad: r1.max(r2) }
            }
            Err(_) => Ball {
                mid: Float::Zero,
                rad: Mag::from_float_up(lo).max(Mag::from_float_up(hi)),
            },
        }
    }
}

// Upper bound of `|a - b|`.
fn dist_up(a: &Float, b: &Float) -> Mag {
    match a.sub(b, MAG_BITS, RoundingMode::FromZero) {
        Ok((d, _)) => Mag::from_float_up(&d),
        Err(Error::ExponentUnderflow(_)) => Mag::from_2exp(EXPONENT_MIN),
        Err(_) => Mag::Inf,
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::defs::Sign;

    #[test]
    fn test_accuracy() {
        let b = Ball::from_f64_with_error(1024.0, 1.0);
        assert_eq!(b.rel_accuracy_bits(), 9);
        assert_eq!(b.rel_error_bits(), -9);
        assert_eq!(Ball::from_i64(3).rel_accuracy_bits(), ACCURACY_EXACT);
        assert_eq!(Ball::zero_pm_one().rel_accuracy_bits(), ACCURACY_NONE);
        assert_eq!(Ball::indeterminate().rel_accuracy_bits(), ACCURACY_NONE);
        assert_eq!(Ball::pos_inf().rel_accuracy_bits(), ACCURACY_EXACT);
        assert_eq!(Ball::zero_pm_inf().rel_error_bits(), -ACCURACY_NONE);
        let b = Ball::from_f64_with_error(1.0, 1024.0);
        assert_eq!(b.rel_accuracy_bits(), -11);
    }

    #[test]
    fn test_trim() {
        let third = Ball::from_ratio(1, 3, 200);
        let loose = third.add_error(&Mag::from_2exp(-40));
        let t = loose.trim();
        assert!(t.bits() <= 40 + TRIM_PADDING as usize);
        assert!(t.contains(&loose));
        assert!(t.rel_accuracy_bits() >= loose.rel_accuracy_bits() - 1);

        assert_eq!(third.trim(), third);
        let exact = Ball::from_u64(u64::MAX);
        assert_eq!(exact.trim(), exact);

        let wide = Ball::from_f64_with_error(1.0, 1e10);
        let t = wide.trim();
        assert!(t.mid().is_zero());
        assert!(t.contains(&wide));

        for _ in 0..100 {
            let x = Ball::random(300, -10, 10).unwrap().add_error(&Mag::from_2exp(-50));
            let t = x.trim();
            assert!(t.contains(&x));
            assert!(t.rel_accuracy_bits() >= x.rel_accuracy_bits() - 2);
        }
    }

    #[test]
    fn test_union() {
        let a = Ball::from_f64_with_error(1.0, 0.5);
        let b = Ball::from_f64_with_error(3.0, 0.25);
        let u = a.union(&b, 53);
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert_eq!(u.lower_bound(53).to_f64(), 0.5);
        assert_eq!(u.upper_bound(53).to_f64(), 3.25);

        assert!(a.union(&Ball::indeterminate(), 10).is_indeterminate());
        assert_eq!(Ball::pos_inf().union(&Ball::pos_inf(), 10), Ball::pos_inf());
        let u = a.union(&Ball::neg_inf(), 10);
        assert!(u.rad().is_inf());
    }

    #[test]
    fn test_intersection() {
        let a = Ball::from_f64_with_error(1.0, 0.5);
        let b = Ball::from_f64_with_error(2.0, 1.0);
        let c = a.intersection(&b, 53).unwrap();
        assert_eq!(c.lower_bound(53).to_f64(), 1.0);
        assert_eq!(c.upper_bound(53).to_f64(), 1.5);
        assert!(a.intersection(&Ball::from_i64(5), 53).is_none());
        assert_eq!(a.intersection(&Ball::indeterminate(), 53), Some(a.clone()));
    }

    #[test]
    fn test_set_interval() {
        let x = Ball::set_interval(&Float::from_i64(-3), &Float::from_i64(5), 10);
        assert_eq!(x.mid(), &Float::from_i64(1));
        assert_eq!(x.rad(), &Mag::from_u64(4));
        assert!(Ball::set_interval(&Float::from_i64(5), &Float::from_i64(-3), 10).is_indeterminate());
        assert!(Ball::set_interval(&Float::NaN, &Float::Zero, 10).is_indeterminate());
        assert_eq!(
            Ball::set_interval(&Float::Zero, &Float::Inf(Sign::Pos), 10),
            Ball::zero_pm_inf()
        );
        assert_eq!(
            Ball::set_interval(&Float::Inf(Sign::Neg), &Float::Inf(Sign::Neg), 10),
            Ball::neg_inf()
        );

        // midpoint rounding is covered by the radius
        let lo = Float::from_u64(1);
        let hi = Float::from_u64((1 << 40) + 3);
        let x = Ball::set_interval(&lo, &hi, 8);
        assert!(x.contains_float(&lo));
        assert!(x.contains_float(&hi));
    }
}
