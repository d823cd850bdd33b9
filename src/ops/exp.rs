//! Exponential.

use crate::ball::Ball;
use crate::common::consts::ONE;
use crate::common::util::guard_bits;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::Sign;
use crate::defs::EXPONENT_MIN;
use crate::defs::MIN_P;
use crate::float::Float;
use crate::mag::Mag;
use crate::ops::consts::Consts;
use crate::ops::consts::EXP_TAB_BITS;
use crate::ops::regime::effective_precision;
use crate::ops::regime::normal_regime;
use crate::ops::regime::Regime;
use crate::ops::series::exp_bsplit_fixed;
use crate::ops::series::series_fixed;
use crate::ops::series::Fixed;
use crate::ops::series::PolycoeffGen;
use core::cmp::Ordering;
use num_bigint::BigInt;
use num_traits::One;
use num_traits::ToPrimitive;

// Arguments with a larger exponent overflow or underflow.
const EXP_HUGE_EXP: Exponent = 61;

// Radius above which the endpoints are evaluated separately.
const WIDE_RAD_EXP: Exponent = -4;

// Taylor series coefficients of exp.
struct ExpGen {
    k: u64,
}

impl PolycoeffGen for ExpGen {
    fn next(&mut self) -> (u64, u64, u64) {
        self.k += 1;
        (1, self.k, 1)
    }
}

impl Ball {
    /// Computes `e` to the power of `self` with precision `p`.
    /// The constants cache `cc` is used for the reduction by `ln(2)` and for table lookup.
    pub fn exp(&self, p: usize, cc: &mut Consts) -> Self {
        if self.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);

        if self.rad.is_inf() {
            return Self::zero_pm_inf();
        }

        match self.mid {
            Float::Inf(Sign::Pos) => return Self::pos_inf(),
            Float::Inf(Sign::Neg) => return Self::zero(),
            _ => {}
        }

        if self.rad.is_zero() {
            return exp_point(&self.mid, p, cc);
        }

        if self.rad > Mag::from_2exp(WIDE_RAD_EXP) {
            // exp is increasing
            let lo = exp_point(&self.lower_bound(p + 8), p, cc).lower_bound(p);
            let hi = exp_point(&self.upper_bound(p + 8), p, cc).upper_bound(p);
            let lo = if lo.is_negative() { Float::Zero } else { lo };
            return Self::set_interval(&lo, &hi, p);
        }

        let acc = -self.rad.exponent().unwrap_or(0);
        let y = exp_point(&self.mid, effective_precision(p, acc), cc);
        let err = y.mag_upper().mul(&self.rad.expm1_up());

        y.add_error(&err)
    }

    /// Returns the way `exp` evaluates `self` with precision `p`.
    pub fn exp_regime(&self, p: usize) -> Regime {
        if self.is_indeterminate() || self.rad.is_inf() {
            return Regime::ExactSpecial;
        }
        let acc = -self.rad.exponent().unwrap_or(Exponent::MIN + 1);
        point_regime(&self.mid, effective_precision(p.max(MIN_P), acc))
    }
}

fn point_regime(x: &Float, p: usize) -> Regime {
    match x.exponent() {
        None => Regime::ExactSpecial,
        Some(e) if e < -(p as Exponent) / 2 - 1 => Regime::Tiny,
        Some(e) if e > EXP_HUGE_EXP => {
            if x.is_positive() {
                Regime::HugeOverflow
            } else {
                Regime::HugeUnderflow
            }
        }
        Some(_) => normal_regime(p + guard_bits(p)),
    }
}

// Ball containing exp(x) for an exact x.
fn exp_point(x: &Float, p: usize, cc: &mut Consts) -> Ball {
    let regime = point_regime(x, p);
    tracing::trace!(?regime, p, "exp");

    match regime {
        Regime::ExactSpecial => match x {
            Float::Zero => Ball::one(),
            Float::Inf(Sign::Pos) => Ball::pos_inf(),
            Float::Inf(Sign::Neg) => Ball::zero(),
            _ => Ball::indeterminate(),
        },
        Regime::Tiny => {
            // |exp(x) - 1 - x| <= x^2 for |x| <= 1
            let m = Mag::from_float_up(x);
            Ball::from_rounded(ONE.add(x, p, RoundingMode::ToZero), m.mul(&m), p)
        }
        Regime::HugeOverflow => Ball::zero_pm_inf(),
        Regime::HugeUnderflow => Ball {
            mid: Float::Zero,
            rad: Mag::from_2exp(EXPONENT_MIN),
        },
        Regime::NormalTableCache | Regime::NormalBinarySplit => exp_reduced(x, p, regime, cc),
    }
}

// Reduction x = n * ln(2) + t, 0 <= t < 1.
fn reduce_ln2(x: &Float, wp: usize, ln2: &Ball) -> Option<(i64, Ball)> {
    let q = x.div(&ln2.mid, x.exponent()?.max(0) as usize + 16, RoundingMode::Down).ok()?.0;
    let mut n = q.to_fixed(0).ok()?.to_i64()?;

    for _ in 0..4 {
        let t = Ball::exact(x.clone()).sub(&ln2.mul(&Ball::from_i64(n), wp), wp);
        if t.mid.is_negative() {
            n -= 1;
        } else if t.mid.cmp_2exp(0) != Ordering::Less {
            n += 1;
        } else {
            return Some((n, t));
        }
    }

    None
}

fn exp_reduced(x: &Float, p: usize, regime: Regime, cc: &mut Consts) -> Ball {
    let wp = p + guard_bits(p);
    let ex = x.exponent().unwrap_or(0).max(0) as usize;
    let ln2 = cc.ln2(wp + ex + 8);

    let (n, t) = match reduce_ln2(x, wp + ex + 8, &ln2) {
        Some(v) => v,
        None => return Ball::indeterminate(),
    };

    let y = if regime == Regime::NormalTableCache {
        let w = wp + 16;
        exp_fixed_table(&t.mid, w, cc).map(|f| f.to_ball(w, wp))
    } else {
        let w = wp + 24;
        exp_fixed_bsplit(&t.mid, w).map(|f| f.to_ball(w, wp))
    };

    let y = match y {
        Some(y) => y,
        None => return Ball::indeterminate(),
    };

    let err = y.mag_upper().mul(&t.rad.expm1_up());
    y.add_error(&err).mul_2exp(n).set_round(p)
}

// Splits `t` truncated to `w` fractional bits into `(i, j, r)` where
// `t = i / 2^8 + j / 2^16 + r * 2^-w`, `0 <= r < 2^(w - 16)`.
fn split_arg(t: &BigInt, w: usize) -> (usize, usize, BigInt) {
    let mask = (BigInt::one() << EXP_TAB_BITS) - 1;
    let i = (t >> (w - EXP_TAB_BITS)).to_usize().unwrap_or(0);
    let j = ((t >> (w - 2 * EXP_TAB_BITS)) & &mask).to_usize().unwrap_or(0);
    let r = t & ((BigInt::one() << (w - 2 * EXP_TAB_BITS)) - 1);
    (i, j, r)
}

// exp(t) for 0 <= t < 1 with `w` fractional bits through two table lookups and a short series.
fn exp_fixed_table(t: &Float, w: usize, cc: &mut Consts) -> Option<Fixed> {
    let tv = t.to_fixed(w as Exponent).ok()?;
    let (i, j, r) = split_arg(&tv, w);

    let s = series_fixed(BigInt::one() << w, &r, w, &mut ExpGen { k: 0 });

    let tab = cc.exp_tables();
    let y = tab.coarse(i, w).mul(&tab.fine(j, w), w).mul(&s, w);

    // truncation of t costs at most e units
    Some(Fixed { v: y.v, err: y.err + 4 })
}

// exp(t) for 0 <= t < 1 with `w` fractional bits by the bit-burst method.
fn exp_fixed_bsplit(t: &Float, w: usize) -> Option<Fixed> {
    let tv = t.to_fixed(w as Exponent).ok()?;

    let mut acc = Fixed::one(w);
    let mut start = 0;
    let mut end = EXP_TAB_BITS.min(w);
    while start < w {
        let chunk: BigInt = (&tv >> (w - end)) & ((BigInt::one() << (end - start)) - 1);
        let f = exp_bsplit_fixed(&chunk, end, start, w);
        acc = acc.mul(&f, w);
        start = end;
        end = (2 * end).min(w);
    }

    Some(Fixed { v: acc.v, err: acc.err + 4 })
}
