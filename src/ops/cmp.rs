//! Relational engine: containment, overlap, sign predicates, and certain comparisons.
//!
//! Every endpoint comparison reduces to the sign of a sum of dyadic terms.
//! The sign is first decided with low precision magnitude bounds, and only when
//! those are inconclusive the terms are summed exactly.

use crate::ball::Ball;
use crate::defs::Exponent;
use crate::defs::Sign;
use crate::float::Float;
use crate::mag::Mag;
use core::cmp::Ordering;
use num_bigint::BigInt;
use num_bigint::BigUint;
use num_bigint::Sign as BigSign;
use num_traits::Signed;
use num_traits::Zero;

/// Returns the sign of the exact sum of `terms` as an ordering relative to zero.
/// Terms which are not finite are ignored.
pub fn sum_sign(terms: &[Float]) -> Ordering {
    let mut pos_lo = Mag::Zero;
    let mut pos_hi = Mag::Zero;
    let mut neg_lo = Mag::Zero;
    let mut neg_hi = Mag::Zero;

    for t in terms.iter().filter(|t| t.is_finite()) {
        let lo = Mag::from_float_lower(t);
        let hi = Mag::from_float_up(t);
        if t.is_positive() {
            pos_lo = pos_lo.add_lower(&lo);
            pos_hi = pos_hi.add(&hi);
        } else if t.is_negative() {
            neg_lo = neg_lo.add_lower(&lo);
            neg_hi = neg_hi.add(&hi);
        }
    }

    if pos_hi.is_zero() && neg_hi.is_zero() {
        return Ordering::Equal;
    }
    if pos_lo > neg_hi {
        return Ordering::Greater;
    }
    if neg_lo > pos_hi {
        return Ordering::Less;
    }

    tracing::trace!(nterms = terms.len(), "magnitude bounds inconclusive, summing exactly");
    sum_sign_exact(terms)
}

/// Returns the sign of the exact sum of `terms` computed with big integers.
/// Terms which are not finite are ignored.
///
/// Terms are summed in groups from the largest to the smallest. A group is closed
/// when all remaining terms together are smaller than the lowest bit of the group, so
/// a nonzero group sum decides the sign and the shifts stay within the mantissa
/// widths whatever the exponent spread is.
pub fn sum_sign_exact(terms: &[Float]) -> Ordering {
    // (sign, mantissa, exponent of the lowest bit, exponent above the highest bit)
    let mut fin: Vec<(Sign, &BigUint, Exponent, Exponent)> = terms
        .iter()
        .filter_map(|t| match t {
            Float::Finite { s, m, e } => Some((*s, m, *e, e.saturating_add(m.bits() as Exponent))),
            _ => None,
        })
        .collect();
    fin.sort_by(|a, b| b.3.cmp(&a.3));

    let mut i = 0;
    while i < fin.len() {
        let mut low = fin[i].2;
        let mut j = i + 1;
        while j < fin.len() {
            // |sum of the n remaining terms| < n * 2^top <= 2^(top + bits(n))
            let rest = (fin.len() - j) as u64;
            let spread = (u64::BITS - rest.leading_zeros()) as Exponent;
            if fin[j].3.saturating_add(spread) <= low {
                break;
            }
            low = low.min(fin[j].2);
            j += 1;
        }

        let mut sum = BigInt::zero();
        for (s, m, e, _) in &fin[i..j] {
            let v = BigInt::from_biguint(BigSign::Plus, *m << ((e - low) as usize));
            if s.is_negative() {
                sum -= v;
            } else {
                sum += v;
            }
        }

        if sum.is_positive() {
            return Ordering::Greater;
        } else if sum.is_negative() {
            return Ordering::Less;
        }
        i = j;
    }

    Ordering::Equal
}

/// Endpoint of the interval of a non-NaN ball.
#[derive(Debug, Clone)]
enum Endpoint {
    NegInf,
    /// `mid + rad`, where `rad` carries the sign of the side.
    Finite(Float, Float),
    PosInf,
}

impl Endpoint {
    fn le(&self, d2: &Self) -> bool {
        match (self, d2) {
            (Endpoint::NegInf, _) | (_, Endpoint::PosInf) => true,
            (Endpoint::PosInf, _) | (_, Endpoint::NegInf) => false,
            (Endpoint::Finite(m1, r1), Endpoint::Finite(m2, r2)) => {
                sum_sign(&[m2.clone(), r2.clone(), m1.neg(), r1.neg()]) != Ordering::Less
            }
        }
    }

    fn lt(&self, d2: &Self) -> bool {
        !d2.le(self)
    }
}

impl Ball {
    // Lower and upper endpoint of a non-NaN ball over the extended reals.
    fn endpoints(&self) -> (Endpoint, Endpoint) {
        if self.rad.is_inf() {
            return (Endpoint::NegInf, Endpoint::PosInf);
        }
        match &self.mid {
            Float::Inf(Sign::Pos) => (Endpoint::PosInf, Endpoint::PosInf),
            Float::Inf(Sign::Neg) => (Endpoint::NegInf, Endpoint::NegInf),
            m => {
                let r = self.rad.to_float();
                (Endpoint::Finite(m.clone(), r.neg()), Endpoint::Finite(m.clone(), r))
            }
        }
    }

    // Compares the radius with the absolute value of the finite midpoint.
    fn rad_cmp_mid(&self) -> Ordering {
        if self.rad.is_inf() {
            return Ordering::Greater;
        }
        if self.rad < Mag::from_float_lower(&self.mid) {
            return Ordering::Less;
        }
        if self.rad > Mag::from_float_up(&self.mid) {
            return Ordering::Greater;
        }
        tracing::trace!("radius and midpoint magnitudes overlap, comparing exactly");
        self.rad.to_float().cmp_abs(&self.mid)
    }

    /// Returns true if every point of `d2` belongs to `self`.
    /// The indeterminate ball contains everything; nothing else contains the indeterminate ball.
    pub fn contains(&self, d2: &Self) -> bool {
        if self.is_indeterminate() {
            return true;
        }
        if d2.is_indeterminate() {
            return false;
        }
        let (xl, xh) = self.endpoints();
        let (yl, yh) = d2.endpoints();
        xl.le(&yl) && yh.le(&xh)
    }

    /// Returns true if `self` and `d2` have a common point, or if any of them is indeterminate.
    pub fn overlaps(&self, d2: &Self) -> bool {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return true;
        }
        let (xl, xh) = self.endpoints();
        let (yl, yh) = d2.endpoints();
        xl.le(&yh) && yl.le(&xh)
    }

    /// Returns true if `self` contains the value `f`.
    pub fn contains_float(&self, f: &Float) -> bool {
        if f.is_nan() {
            return self.is_indeterminate();
        }
        self.contains(&Ball::exact(f.clone()))
    }

    /// Returns true if `self` contains the integer `i`.
    pub fn contains_i64(&self, i: i64) -> bool {
        self.contains(&Ball::from_i64(i))
    }

    /// Returns true if `self` contains zero.
    pub fn contains_zero(&self) -> bool {
        self.contains(&Ball::zero())
    }

    /// Returns true if every point of `self` is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.is_certain(Sign::Pos, true)
    }

    /// Returns true if every point of `self` is greater than or equal to zero.
    pub fn is_nonnegative(&self) -> bool {
        self.is_certain(Sign::Pos, false)
    }

    /// Returns true if every point of `self` is less than zero.
    pub fn is_negative(&self) -> bool {
        self.is_certain(Sign::Neg, true)
    }

    /// Returns true if every point of `self` is less than or equal to zero.
    pub fn is_nonpositive(&self) -> bool {
        self.is_certain(Sign::Neg, false)
    }

    /// Returns true if `self` does not contain zero.
    pub fn is_nonzero(&self) -> bool {
        self.is_positive() || self.is_negative()
    }

    /// Returns true if `self` may contain a value greater than zero.
    pub fn contains_positive(&self) -> bool {
        self.may_contain(Sign::Pos, true)
    }

    /// Returns true if `self` may contain a value greater than or equal to zero.
    pub fn contains_nonnegative(&self) -> bool {
        self.may_contain(Sign::Pos, false)
    }

    /// Returns true if `self` may contain a value less than zero.
    pub fn contains_negative(&self) -> bool {
        self.may_contain(Sign::Neg, true)
    }

    /// Returns true if `self` may contain a value less than or equal to zero.
    pub fn contains_nonpositive(&self) -> bool {
        self.may_contain(Sign::Neg, false)
    }

    fn is_certain(&self, s: Sign, strict: bool) -> bool {
        if self.is_indeterminate() || self.rad.is_inf() {
            return false;
        }
        match &self.mid {
            Float::Inf(ms) => *ms == s,
            Float::Zero => !strict && self.rad.is_zero(),
            m => {
                m.sign() == Some(s)
                    && match self.rad_cmp_mid() {
                        Ordering::Less => true,
                        Ordering::Equal => !strict,
                        Ordering::Greater => false,
                    }
            }
        }
    }

    fn may_contain(&self, s: Sign, strict: bool) -> bool {
        if self.is_indeterminate() || self.rad.is_inf() {
            return true;
        }
        match &self.mid {
            Float::Inf(ms) => *ms == s,
            Float::Zero => !strict || !self.rad.is_zero(),
            m => {
                m.sign() == Some(s)
                    || match self.rad_cmp_mid() {
                        Ordering::Less => false,
                        Ordering::Equal => !strict,
                        Ordering::Greater => true,
                    }
            }
        }
    }

    /// Returns true if every point of `self` is less than every point of `d2`.
    pub fn lt(&self, d2: &Self) -> bool {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return false;
        }
        let (_, xh) = self.endpoints();
        let (yl, _) = d2.endpoints();
        xh.lt(&yl)
    }

    /// Returns true if every point of `self` is less than or equal to every point of `d2`.
    pub fn le(&self, d2: &Self) -> bool {
        if self.is_indeterminate() || d2.is_indeterminate() {
            return false;
        }
        let (_, xh) = self.endpoints();
        let (yl, _) = d2.endpoints();
        xh.le(&yl)
    }

    /// Returns true if every point of `self` is greater than every point of `d2`.
    pub fn gt(&self, d2: &Self) -> bool {
        d2.lt(self)
    }

    /// Returns true if every point of `self` is greater than or equal to every point of `d2`.
    pub fn ge(&self, d2: &Self) -> bool {
        d2.le(self)
    }

    /// Returns true if `self` and `d2` are the same single point.
    pub fn eq(&self, d2: &Self) -> bool {
        self.le(d2) && d2.le(self)
    }

    /// Returns true if `self` and `d2` have no common point.
    pub fn ne(&self, d2: &Self) -> bool {
        !self.overlaps(d2)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_sum_sign() {
        let t = |v: &[f64]| v.iter().map(|f| Float::from_f64(*f)).collect::<Vec<_>>();
        assert_eq!(sum_sign(&t(&[1.0, -0.5])), Ordering::Greater);
        assert_eq!(sum_sign(&t(&[1.0, -1.0])), Ordering::Equal);
        assert_eq!(sum_sign(&t(&[])), Ordering::Equal);
        assert_eq!(sum_sign(&t(&[0.0, 0.0])), Ordering::Equal);
        let tiny = Float::from_i64(1).mul_2exp(-200).unwrap();
        let terms = [Float::from_i64(1), Float::from_i64(-1), tiny.neg()];
        assert_eq!(sum_sign(&terms), Ordering::Less);
        assert_eq!(sum_sign_exact(&terms), Ordering::Less);

        for _ in 0..1000 {
            let n = rand::random::<usize>() % 5 + 1;
            let mut terms: Vec<Float> = (0..n)
                .map(|_| Float::from_i64(rand::random::<i16>() as i64).mul_2exp(rand::random::<i64>() % 8).unwrap())
                .collect();
            // cancel the sum now and then
            if rand::random::<bool>() {
                let s = terms.iter().fold(Float::Zero, |acc, t| acc.add_exact(t).unwrap());
                terms.push(s.neg());
            }
            assert_eq!(sum_sign(&terms), sum_sign_exact(&terms));
        }
    }

    #[test]
    fn test_sum_sign_wide_spread() {
        use crate::defs::{EXPONENT_MAX, EXPONENT_MIN};

        let p2 = |k: Exponent| Float::from_i64(1).mul_2exp(k).unwrap();
        let lo = p2(EXPONENT_MIN + 5);
        let hi = p2(EXPONENT_MAX - 10);

        let terms = [Float::from_i64(1), Float::from_i64(-1), lo.clone()];
        assert_eq!(sum_sign_exact(&terms), Ordering::Greater);
        assert_eq!(sum_sign(&terms), Ordering::Greater);

        let terms = [hi.clone(), hi.neg(), lo.neg(), p2(EXPONENT_MIN + 4)];
        assert_eq!(sum_sign_exact(&terms), Ordering::Less);

        // smaller terms which add up to the lowest bit of the larger ones
        let terms = [Float::from_i64(1), p2(-1).neg(), p2(-1).neg(), p2(-60).neg()];
        assert_eq!(sum_sign_exact(&terms), Ordering::Less);
        let terms = [Float::from_i64(2), p2(0).neg(), p2(0).neg(), lo.clone()];
        assert_eq!(sum_sign_exact(&terms), Ordering::Greater);

        let exps = [EXPONENT_MIN + 100, -1000, 0, 1000, EXPONENT_MAX - 100];
        for _ in 0..1000 {
            let e1 = exps[rand::random::<usize>() % exps.len()];
            let e2 = exps[rand::random::<usize>() % exps.len()];
            let a = Float::random_normal(64, e1, e1).unwrap();
            let b = Float::random_normal(64, e2, e2).unwrap();
            let expected = if b.is_positive() { Ordering::Greater } else { Ordering::Less };
            assert_eq!(sum_sign_exact(&[a.clone(), b.clone(), a.neg()]), expected);
            assert_eq!(sum_sign(&[a.neg(), b, a]), expected);
        }
        assert_eq!(sum_sign_exact(&[hi.clone(), lo.clone(), hi.neg(), lo.neg()]), Ordering::Equal);
    }

    #[test]
    fn test_contains() {
        let a = Ball::from_f64_with_error(1.0, 0.5);
        assert!(a.contains(&Ball::from_f64_with_error(1.25, 0.25)));
        assert!(!a.contains(&Ball::from_f64_with_error(1.25, 0.3)));
        assert!(a.contains_float(&Float::from_f64(0.5)));
        assert!(!a.contains_i64(2) || a.contains_float(&Float::from_i64(2)));
        assert!(a.contains_i64(1));
        assert!(!a.contains_zero());
        assert!(a.overlaps(&Ball::from_f64_with_error(2.0, 0.5)));
        assert!(!a.overlaps(&Ball::from_f64_with_error(2.0, 0.25)));
    }

    #[test]
    fn test_sign_predicates() {
        let p = Ball::from_f64_with_error(1.0, 0.5);
        let t = Ball::from_f64_with_error(1.0, 1.0);
        let s = Ball::from_f64_with_error(1.0, 2.0);
        assert!(p.is_positive() && p.is_nonnegative() && p.is_nonzero());
        assert!(!t.is_positive() && t.is_nonnegative() && !t.is_nonzero());
        assert!(!s.is_nonnegative() && s.contains_negative() && s.contains_positive());
        assert!(!t.contains_negative() && t.contains_nonpositive());
        assert!(!p.contains_nonpositive());

        let n = p.neg();
        assert!(n.is_negative() && n.is_nonpositive() && !n.contains_positive());

        let z = Ball::zero();
        assert!(!z.is_positive() && z.is_nonnegative() && z.is_nonpositive());
        assert!(!z.contains_positive() && z.contains_nonnegative());

        assert!(Ball::pos_inf().is_positive());
        assert!(!Ball::zero_pm_inf().is_nonnegative());
        assert!(Ball::zero_pm_inf().contains_negative());
        assert!(Ball::indeterminate().contains_positive());
        assert!(!Ball::indeterminate().is_positive());
    }

    #[test]
    fn test_comparisons() {
        let a = Ball::from_f64_with_error(1.0, 0.5);
        let b = Ball::from_f64_with_error(2.0, 0.5);
        let c = Ball::from_f64_with_error(3.0, 0.25);
        assert!(a.le(&b) && !a.lt(&b));
        assert!(a.lt(&c) && c.gt(&a) && c.ge(&b));
        assert!(!a.eq(&a));
        assert!(Ball::from_i64(3).eq(&Ball::from_i64(3)));
        assert!(a.ne(&c) && !a.ne(&b));
        assert!(Ball::neg_inf().lt(&a));
        assert!(a.lt(&Ball::pos_inf()));
        assert!(!Ball::pos_inf().lt(&Ball::pos_inf()));
        assert!(Ball::pos_inf().eq(&Ball::pos_inf()));
        assert!(!Ball::indeterminate().le(&a));
        assert!(!Ball::zero_pm_inf().lt(&Ball::pos_inf()));
    }
}
