//! Natural logarithm.

use crate::ball::Ball;
use crate::common::consts::ONE;
use crate::common::util::guard_bits;
use crate::common::util::log2_ceil;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::MIN_P;
use crate::float::Float;
use crate::mag::Mag;
use crate::ops::consts::Consts;
use crate::ops::regime::effective_precision;
use crate::ops::series::series_fixed;
use crate::ops::series::PolycoeffGen;

// Radius relative to the midpoint above which the endpoints are evaluated separately.
const WIDE_RAD_SHIFT: Exponent = 4;

// Series of atanh: sum(w^(2k+1) / (2k+1)).
struct AtanhGen {
    k: u64,
}

impl PolycoeffGen for AtanhGen {
    fn next(&mut self) -> (u64, u64, u64) {
        self.k += 1;
        (1, 1, 2 * self.k + 1)
    }
}

impl Ball {
    /// Computes the natural logarithm of `self` with precision `p`.
    ///
    /// A ball which is not certainly positive gives the indeterminate ball.
    pub fn ln(&self, p: usize, cc: &mut Consts) -> Self {
        if self.is_indeterminate() || !self.is_positive() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);

        if self.mid.is_inf_pos() {
            return Self::pos_inf();
        }

        if self.rad.is_zero() {
            return ln_point(&self.mid, p, cc);
        }

        let m_lo = Mag::from_float_lower(&self.mid);
        if self.rad > m_lo.mul_2exp(-WIDE_RAD_SHIFT) {
            // ln is increasing
            let lo = ln_point(&self.lower_bound(p + 8), p, cc).lower_bound(p);
            let hi = ln_point(&self.upper_bound(p + 8), p, cc).upper_bound(p);
            return Self::set_interval(&lo, &hi, p);
        }

        // |ln(m + t) - ln(m)| <= r / (m - r) for |t| <= r
        let den = m_lo.sub_lower(&self.rad);
        let err = self.rad.div(&den);

        let acc = self.mid.exponent().unwrap_or(0) - self.rad.exponent().unwrap_or(0);
        let acc = acc + log2_ceil(self.mid.exponent().unwrap_or(0).unsigned_abs() as usize) as Exponent;
        let y = ln_point(&self.mid, effective_precision(p, acc + 64), cc);

        y.add_error(&err)
    }
}

// Ball containing ln(x) for an exact x.
fn ln_point(x: &Float, p: usize, cc: &mut Consts) -> Ball {
    match x {
        Float::Finite { s: Sign::Pos, .. } => {}
        Float::Inf(Sign::Pos) => return Ball::pos_inf(),
        Float::Zero => return Ball::neg_inf(),
        _ => return Ball::indeterminate(),
    }

    let wp = p + guard_bits(p);

    // x = f * 2^e, 1/2 <= f < 1; near 1 the scaling is skipped and x - 1 is exact
    let xe = x.exponent().unwrap_or(0);
    let (f, k, extra) = if xe == 0 || xe == 1 {
        let u = match x.sub_exact(&ONE) {
            Ok(u) => u,
            Err(_) => return Ball::indeterminate(),
        };
        if u.is_zero() {
            return Ball::zero();
        }

        let ue = u.exponent().unwrap_or(0);
        if ue < -(p as Exponent) / 2 - 2 {
            return ln1p_small(&Ball::exact(u), p + 4).set_round(p);
        }

        (x.clone(), 0, (-ue).max(0) as usize)
    } else {
        match x.mul_2exp(-xe) {
            Ok(f) => (f, xe, 0),
            Err(_) => return Ball::indeterminate(),
        }
    };

    let wp = wp + extra;
    let y0 = ln_approx(&f, wp);

    // ln(f) = y0 + ln(1 + v) with v = f * exp(-y0) - 1, which is tiny
    let z = Ball::exact(f).mul(&y0.neg().exp(wp + 8, cc), wp + 8);
    let v = z.sub(&Ball::one(), wp + 8);
    let corr = ln1p_small(&v, wp + 8);

    let mut y = y0.add(&corr, wp);

    if k != 0 {
        let ek = k.unsigned_abs() as usize;
        let ln2 = cc.ln2(wp + log2_ceil(ek) + 2);
        y = y.add(&ln2.mul(&Ball::from_i64(k), wp + 8), wp);
    }

    y.set_round(p)
}

// Approximation of ln(f) for 1/4 < f < 2 as an exact ball: 2 * atanh((f - 1) / (f + 1)).
fn ln_approx(f: &Float, wp: usize) -> Ball {
    let w = wp + 16;
    let num = f.sub(&ONE, w, RoundingMode::ToZero).map(|v| v.0);
    let den = f.add(&ONE, w, RoundingMode::ToZero).map(|v| v.0);
    let q = match (num, den) {
        (Ok(num), Ok(den)) => num.div(&den, w, RoundingMode::ToZero).map(|v| v.0),
        _ => return Ball::zero(),
    };

    let q = match q.and_then(|q| q.to_fixed(w as Exponent)) {
        Ok(q) => q,
        Err(_) => return Ball::zero(),
    };

    let q2 = (&q * &q) >> w;
    let s = series_fixed(q, &q2, w, &mut AtanhGen { k: 0 });

    // the value is only an approximation, the error bound is certified by the correction step
    match Float::from_fixed(&(s.v << 1usize), w as Exponent).and_then(|v| v.round(wp, RoundingMode::ToZero)) {
        Ok((v, _)) => Ball::exact(v),
        Err(_) => Ball::zero(),
    }
}

// ln(1 + v) for |v| well below 1: v - v^2/2 ± |v|^3 / (1 - |v|).
fn ln1p_small(v: &Ball, p: usize) -> Ball {
    let vm = v.mag_upper();
    if vm >= Mag::from_2exp(-1) {
        return Ball::zero_pm_inf();
    }
    let half_sq = v.sqr(p).mul_2exp(-1);
    let tail = vm.pow_u64(3).div(&Mag::one().sub_lower(&vm));
    v.sub(&half_sq, p).add_error(&tail)
}
