//! Arctangent.

use crate::ball::Ball;
use crate::common::util::calc_add_cost;
use crate::common::util::calc_mul_cost;
use crate::common::util::calc_sqrt_cost;
use crate::common::util::guard_bits;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::defs::MIN_P;
use crate::float::Float;
use crate::mag::Mag;
use crate::ops::consts::Consts;
use crate::ops::regime::effective_precision;
use crate::ops::regime::normal_regime;
use crate::ops::regime::Regime;
use crate::ops::series::bsplit;
use crate::ops::series::series_cost_optimize;
use crate::ops::series::series_fixed;
use crate::ops::series::signed;
use crate::ops::series::ArgReductionEstimator;
use crate::ops::series::Fixed;
use crate::ops::series::PolycoeffGen;
use core::cmp::Ordering;
use num_bigint::BigInt;

const MAX_HALVINGS: usize = 64;

// Halvings before the bit-burst evaluation: the argument becomes smaller than 2^-3.
const BURST_HALVINGS: usize = 3;

const BURST_FIRST_BITS: usize = 16;

// Series of atan: x - x^3/3 + x^5/5 - ...
struct AtanGen {
    k: u64,
}

impl PolycoeffGen for AtanGen {
    fn next(&mut self) -> (u64, u64, u64) {
        self.k += 1;
        (1, 1, 2 * self.k + 1)
    }

    fn alternating(&self) -> bool {
        true
    }
}

// atan(x) = 2 * atan(x / (1 + sqrt(1 + x^2)))
struct HalvingEstimator {}

impl ArgReductionEstimator for HalvingEstimator {
    fn reduction_cost(n: usize, p: usize) -> u64 {
        let cost_mul = calc_mul_cost(p);
        let cost_add = calc_add_cost(p);
        (n * (calc_sqrt_cost(p, cost_mul, cost_add) + 3 * cost_mul + 2 * cost_add)) as u64
    }

    fn reduction_effect(n: usize, m: isize) -> usize {
        (n as isize + m).max(0) as usize
    }
}

impl Ball {
    /// Computes the arctangent of `self` with precision `p`.
    pub fn atan(&self, p: usize, cc: &mut Consts) -> Self {
        if self.is_indeterminate() {
            return Self::indeterminate();
        }
        let p = p.max(MIN_P);

        if self.rad.is_inf() {
            let half_pi = cc.pi(p).mul_2exp(-1);
            return Self::new(Float::Zero, half_pi.mag_upper());
        }

        if self.rad.is_zero() || self.mid.is_inf() {
            return atan_point(&self.mid, p, cc);
        }

        let e = self.mid.exponent().unwrap_or(0);
        let acc = e - self.rad.exponent().unwrap_or(0) + e.max(0);
        let y = atan_point(&self.mid, effective_precision(p, acc), cc);

        // |atan'(t)| <= 1 / (1 + l^2), where l is the smallest |t| in the ball
        let l = self.mag_lower();
        let den = Mag::one().add_lower(&l.mul_lower(&l));
        y.add_error(&self.rad.div(&den))
    }
}

fn atan_regime(x: &Float, p: usize) -> Regime {
    match x.exponent() {
        None => Regime::ExactSpecial,
        Some(e) if e < -(p as Exponent) / 2 - 1 => Regime::Tiny,
        Some(_) => normal_regime(p + guard_bits(p)),
    }
}

// Ball containing atan(x) for an exact x.
fn atan_point(x: &Float, p: usize, cc: &mut Consts) -> Ball {
    let regime = atan_regime(x, p);
    tracing::trace!(?regime, p, "atan");

    match regime {
        Regime::ExactSpecial => match x {
            Float::Zero => Ball::zero(),
            Float::Inf(s) => {
                let half_pi = cc.pi(p).mul_2exp(-1);
                if s.is_negative() {
                    half_pi.neg()
                } else {
                    half_pi
                }
            }
            _ => Ball::indeterminate(),
        },
        Regime::Tiny => {
            // |atan(x) - x| <= |x|^3 / 3
            let m = Mag::from_float_up(x);
            Ball::from_rounded(x.round(p, RoundingMode::ToZero), m.pow_u64(3).mul_2exp(-1), p)
        }
        _ => atan_reduced(x, p, regime, cc),
    }
}

fn atan_reduced(x: &Float, p: usize, regime: Regime, cc: &mut Consts) -> Ball {
    let wp = p + guard_bits(p);
    let neg = x.is_negative();

    let y = match x.cmp_2exp(0) {
        Ordering::Equal => cc.pi(wp).mul_2exp(-2),
        Ordering::Greater => {
            // atan(x) = pi/2 - atan(1/x) for x > 1
            let r = Ball::exact(x.abs()).inv(wp + 8).atan(wp + 8, cc);
            cc.pi(wp + 8).mul_2exp(-1).sub(&r, wp)
        }
        Ordering::Less => {
            let a = x.abs();
            if regime == Regime::NormalTableCache {
                atan_series(&a, wp)
            } else {
                atan_bsplit(&a, wp)
            }
        }
    };

    let y = if neg { y.neg() } else { y };
    y.set_round(p)
}

// u / (1 + sqrt(1 + u^2))
fn halve(u: &Ball, w: usize) -> Ball {
    let s = u.sqr(w).add(&Ball::one(), w).sqrt(w).add(&Ball::one(), w);
    u.div(&s, w)
}

// atan(a) for 0 < a < 1 by argument halving and the series in fixed point.
fn atan_series(a: &Float, wp: usize) -> Ball {
    let m = -a.exponent().unwrap_or(0) as isize;
    let (h, _) = series_cost_optimize::<AtanGen, HalvingEstimator>(wp, &AtanGen { k: 0 }, m);

    // at least one halving brings the argument below tan(pi/8)
    let h = h.clamp(1, MAX_HALVINGS);
    let w = wp + h + 16 + m.max(0) as usize;

    let mut u = Ball::exact(a.clone());
    for _ in 0..h {
        u = halve(&u, w);
    }

    let v = match u.mid().to_fixed(w as Exponent) {
        Ok(v) => v,
        Err(_) => return Ball::zero_pm_inf(),
    };
    let v2 = (&v * &v) >> w;

    // the truncation of the argument adds at most 4 units
    let mut s = series_fixed(v, &v2, w, &mut AtanGen { k: 0 });
    s.err += 4;

    s.to_ball(w, w).add_error(u.rad()).mul_2exp(h as Exponent)
}

// atan(c) for `c = a * 2^-b < 2^-r` by binary splitting, with `w` fractional bits.
fn atan_chunk(a: &BigInt, b: usize, r: usize, w: usize) -> Fixed {
    let n = ((w + 2) / (2 * r.max(1)) + 2) as u64;
    let a2 = -(a * a);

    let pqt = bsplit(1, n, &|j| (&a2 * (2 * j - 1), BigInt::from(2 * j + 1) << (2 * b)));
    let v = (((&pqt.q + &pqt.t) * a) << w) / (&pqt.q << b);

    Fixed { v, err: 2 }
}

// atan(a) for 0 < a < 1 by the bit-burst method.
fn atan_bsplit(a: &Float, wp: usize) -> Ball {
    let w = wp + 32 + (-a.exponent().unwrap_or(0)).max(0) as usize;

    let mut y = Ball::exact(a.clone());
    for _ in 0..BURST_HALVINGS {
        y = halve(&y, w);
    }

    // atan(y) = atan(c) + atan((y - c) / (1 + y * c))
    let mut acc = Ball::zero();
    let mut prev = BURST_HALVINGS;
    let mut b = BURST_FIRST_BITS;
    while 3 * prev < w + 3 && !y.mid().is_zero() {
        let neg = y.mid().is_negative();
        let ci = match y.mid().abs().to_fixed(b as Exponent) {
            Ok(v) => v,
            Err(_) => return Ball::zero_pm_inf(),
        };

        if ci.bits() != 0 {
            let t = atan_chunk(&ci, b, prev - 1, w);
            let t = Fixed {
                v: signed(t.v, neg),
                err: t.err,
            };
            acc = acc.add(&t.to_ball(w, w), w);

            let c = match Float::from_fixed(&signed(ci, neg), b as Exponent) {
                Ok(c) => Ball::exact(c),
                Err(_) => return Ball::zero_pm_inf(),
            };
            let num = y.sub(&c, w);
            let den = Ball::one().addmul(&y, &c, w);
            y = num.div(&den, w);
        }

        prev = b;
        b *= 2;
    }

    // |atan(y) - y| <= |y|^3 / 3
    let tail = y.mag_upper().pow_u64(3).mul_2exp(-1);
    acc.add(&y, w).add_error(&tail).mul_2exp(BURST_HALVINGS as Exponent)
}
