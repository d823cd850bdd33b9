//! Powers and roots.

use crate::ball::Ball;
use crate::common::util::guard_bits;
use crate::common::util::log2_ceil;
use crate::defs::MIN_P;
use crate::float::Float;
use crate::ops::consts::Consts;
use crate::ops::sqrt::half_interval;
use num_integer::Integer;

impl Ball {
    /// Computes `self` to the power of `n` with precision `p`.
    /// The zero power of any ball except the indeterminate one is 1.
    pub fn pow_u64(&self, n: u64, p: usize) -> Self {
        if self.is_indeterminate() {
            return Self::indeterminate();
        }
        if n == 0 {
            return Self::one();
        }
        let p = p.max(MIN_P);
        let wp = p + log2_ceil(n as usize) + 4;

        // left-to-right binary exponentiation
        let mut acc = self.clone();
        for i in (0..63 - n.leading_zeros()).rev() {
            acc = acc.sqr(wp);
            if n & (1 << i) != 0 {
                acc = acc.mul(self, wp);
            }
        }

        acc.set_round(p)
    }

    /// Computes `self` to the power of `n` with precision `p`.
    pub fn pow_i64(&self, n: i64, p: usize) -> Self {
        if n >= 0 {
            self.pow_u64(n as u64, p)
        } else {
            let p = p.max(MIN_P);
            self.pow_u64(n.unsigned_abs(), p + 8).inv(p)
        }
    }

    /// Computes the `k`-th root of `self` with precision `p`.
    ///
    /// Even roots of a ball which is not certainly nonnegative give the indeterminate ball.
    /// Odd roots are defined for negative values too.
    pub fn root_u64(&self, k: u64, p: usize, cc: &mut Consts) -> Self {
        if self.is_indeterminate() || k == 0 {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);
        match k {
            1 => return self.set_round(p),
            2 => return self.sqrt(p),
            _ => {}
        }
        let odd = k.is_odd();
        if !odd && !self.is_nonnegative() {
            return Self::indeterminate();
        }

        if self.rad.is_zero() {
            return root_point(&self.mid, k, p, cc);
        }

        // the root is increasing
        let lo = self.lower_bound(p + 8);
        let hi = self.upper_bound(p + 8);
        let rhi = root_point(&hi, k, p, cc).upper_bound(p);
        if !odd && !lo.is_positive() {
            return half_interval(&rhi);
        }
        let rlo = root_point(&lo, k, p, cc).lower_bound(p);

        Self::set_interval(&rlo, &rhi, p)
    }

    /// Computes `self` to the rational power `a / b` with precision `p`.
    /// The fraction is reduced first, so `(-8)^(2/6)` is the real cube root of -8.
    pub fn pow_rational(&self, a: i64, b: u64, p: usize, cc: &mut Consts) -> Self {
        if b == 0 {
            return Self::indeterminate();
        }
        let g = a.unsigned_abs().gcd(&b).max(1);
        let (na, b) = (a.unsigned_abs() / g, b / g);
        let p = p.max(MIN_P);

        let r = if b == 1 {
            self.clone()
        } else {
            self.root_u64(b, p + log2_ceil(na as usize) + 8, cc)
        };

        // odd denominators keep the sign, even ones leave a nonnegative root
        let wp = p + 8;
        let y = r.pow_u64(na, wp);
        if a < 0 {
            y.inv(p)
        } else {
            y.set_round(p)
        }
    }

    /// Computes `self` to the power of `y` with precision `p`.
    ///
    /// Exact integer exponents use repeated multiplication, so they are defined for
    /// any base. Other exponents require a certainly positive base.
    pub fn pow(&self, y: &Self, p: usize, cc: &mut Consts) -> Self {
        if self.is_indeterminate() || y.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);

        if y.is_int() {
            if let Some(n) = y.mid.to_i64() {
                return self.pow_i64(n, p);
            }
        }

        if self.is_exact() && self.mid.is_zero() && y.is_positive() {
            return Self::zero();
        }

        // x^y = exp(y * ln(x))
        let wp = p + guard_bits(p) + y.mag_upper().exponent().unwrap_or(0).max(0) as usize;
        let l = self.ln(wp, cc);
        l.mul(y, wp).exp(p, cc)
    }
}

// k-th root of an exact x for k >= 3.
fn root_point(x: &Float, k: u64, p: usize, cc: &mut Consts) -> Ball {
    match x {
        Float::Zero => return Ball::zero(),
        Float::NaN => return Ball::indeterminate(),
        Float::Inf(_) => return Ball::exact(x.clone()),
        Float::Finite { .. } => {}
    }

    if x.is_negative() {
        return if k.is_odd() {
            root_point(&x.neg(), k, p, cc).neg()
        } else {
            Ball::indeterminate()
        };
    }

    // x^(1/k) = exp(ln(x) / k), the absolute error of the exponent is the relative error of the result
    let e = x.exponent().unwrap_or(0).unsigned_abs() as usize;
    let wp = p + guard_bits(p) + log2_ceil(e.max(1)) + 8;
    let l = Ball::exact(x.clone()).ln(wp, cc);
    l.div(&Ball::from_u64(k), wp).exp(p, cc)
}
