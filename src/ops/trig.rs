//! Sine, cosine, and tangent.

use crate::ball::Ball;
use crate::common::util::calc_mul_cost;
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
use crate::ops::regime::TRIG_HUGE_EXP;
use crate::ops::series::bsplit;
use crate::ops::series::exp_terms;
use crate::ops::series::series_cost_optimize;
use crate::ops::series::series_fixed;
use crate::ops::series::ArgReductionEstimator;
use crate::ops::series::Fixed;
use crate::ops::series::PolycoeffGen;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::One;
use num_traits::ToPrimitive;

// Maximum number of argument halvings before the series.
const MAX_HALVINGS: usize = 64;

// Number of leading argument bits of the first bit-burst chunk.
const BURST_FIRST_BITS: usize = 8;

// Sine series: x - x^3/3! + x^5/5! - ...
struct SinGen {
    k: u64,
}

impl PolycoeffGen for SinGen {
    fn next(&mut self) -> (u64, u64, u64) {
        self.k += 1;
        (1, (2 * self.k) * (2 * self.k + 1), 1)
    }

    fn alternating(&self) -> bool {
        true
    }
}

// Cosine series: 1 - x^2/2! + x^4/4! - ...
struct CosGen {
    k: u64,
}

impl PolycoeffGen for CosGen {
    fn next(&mut self) -> (u64, u64, u64) {
        self.k += 1;
        (1, (2 * self.k - 1) * (2 * self.k), 1)
    }

    fn alternating(&self) -> bool {
        true
    }
}

// Halving of the argument followed by the double angle formulas.
struct DoubleAngleEstimator {}

impl ArgReductionEstimator for DoubleAngleEstimator {
    fn reduction_cost(n: usize, p: usize) -> u64 {
        (n * 3 * calc_mul_cost(p)) as u64
    }

    fn reduction_effect(n: usize, m: isize) -> usize {
        (n as isize + m).max(0) as usize
    }
}

impl Ball {
    /// Computes the sine and the cosine of `self` with precision `p`.
    pub fn sin_cos(&self, p: usize, cc: &mut Consts) -> (Self, Self) {
        if self.is_indeterminate() {
            return (Self::indeterminate(), Self::indeterminate());
        }
        let p = p.max(MIN_P);

        if self.rad.is_inf() || self.mid.is_inf() || self.rad >= Mag::one() {
            return (Self::zero_pm_one(), Self::zero_pm_one());
        }

        if self.rad.is_zero() {
            return sin_cos_point(&self.mid, p, cc);
        }

        let acc = self.mid.exponent().unwrap_or(0).max(0) - self.rad.exponent().unwrap_or(0);
        let (s, c) = sin_cos_point(&self.mid, effective_precision(p, acc), cc);

        // both functions are 1-Lipschitz
        (clamp_unit(s.add_error(&self.rad)), clamp_unit(c.add_error(&self.rad)))
    }

    /// Computes the sine of `self` with precision `p`.
    pub fn sin(&self, p: usize, cc: &mut Consts) -> Self {
        self.sin_cos(p, cc).0
    }

    /// Computes the cosine of `self` with precision `p`.
    pub fn cos(&self, p: usize, cc: &mut Consts) -> Self {
        self.sin_cos(p, cc).1
    }

    /// Computes the tangent of `self` with precision `p`.
    pub fn tan(&self, p: usize, cc: &mut Consts) -> Self {
        let p = p.max(MIN_P);
        let (s, c) = self.sin_cos(p + 8, cc);
        s.div(&c, p)
    }
}

fn clamp_unit(b: Ball) -> Ball {
    if b.rad >= Mag::one() {
        Ball::zero_pm_one()
    } else {
        b
    }
}

fn trig_regime(x: &Float, p: usize) -> Regime {
    match x.exponent() {
        None => Regime::ExactSpecial,
        Some(e) if e < -(p as Exponent) / 2 - 1 => Regime::Tiny,
        Some(e) if e > TRIG_HUGE_EXP => Regime::HugeOverflow,
        Some(_) => normal_regime(p + guard_bits(p)),
    }
}

// Sine and cosine of an exact x.
fn sin_cos_point(x: &Float, p: usize, cc: &mut Consts) -> (Ball, Ball) {
    let regime = trig_regime(x, p);

    match regime {
        Regime::ExactSpecial => match x {
            Float::Zero => (Ball::zero(), Ball::one()),
            Float::Inf(_) => (Ball::zero_pm_one(), Ball::zero_pm_one()),
            _ => (Ball::indeterminate(), Ball::indeterminate()),
        },
        Regime::Tiny => {
            // |sin(x) - x| <= |x|^3 / 6, |cos(x) - 1| <= x^2 / 2
            let m = Mag::from_float_up(x);
            let m2 = m.mul(&m);
            let s = Ball::from_rounded(x.round(p, RoundingMode::ToZero), m2.mul(&m).mul_2exp(-2), p);
            let c = Ball {
                mid: Float::from_u64(1),
                rad: m2.mul_2exp(-1),
            };
            (s, c)
        }
        Regime::HugeOverflow | Regime::HugeUnderflow => (Ball::zero_pm_one(), Ball::zero_pm_one()),
        Regime::NormalTableCache | Regime::NormalBinarySplit => sin_cos_reduced(x, p, regime, cc),
    }
}

// Reduction x = n * pi/2 + t, |t| <= pi/4 approximately.
fn reduce_half_pi(x: &Float, wp: usize, cc: &mut Consts) -> Option<(u8, Ball)> {
    let ex = x.exponent()?.max(0) as usize;
    let wpr = wp + ex + 8;
    let half_pi = cc.pi(wpr).mul_2exp(-1);

    let q = x.div(&half_pi.mid, ex + 16, RoundingMode::ToZero).ok()?.0;
    // nearest integer
    let n = (q.to_fixed(1).ok()? + 1) >> 1usize;

    let t = Ball::exact(x.clone()).sub(&half_pi.mul(&Ball::from_bigint(&n), wpr), wpr);
    let quadrant = n.mod_floor(&BigInt::from(4)).to_u8()?;

    Some((quadrant, t))
}

fn sin_cos_reduced(x: &Float, p: usize, regime: Regime, cc: &mut Consts) -> (Ball, Ball) {
    let wp = p + guard_bits(p);

    let (quadrant, t) = match reduce_half_pi(x, wp, cc) {
        Some(v) => v,
        None => return (Ball::zero_pm_one(), Ball::zero_pm_one()),
    };

    // sin is odd and cos is even
    let a = t.mid.abs();
    let neg = t.mid.is_negative();

    let sc = if regime == Regime::NormalTableCache {
        sin_cos_series(&a, wp)
    } else {
        sin_cos_bsplit(&a, wp)
    };

    let (s, c) = match sc {
        Some((s, c, w)) => (s.to_ball(w, wp), c.to_ball(w, wp)),
        None => return (Ball::zero_pm_one(), Ball::zero_pm_one()),
    };
    let s = if neg { s.neg() } else { s };

    let s = s.add_error(&t.rad);
    let c = c.add_error(&t.rad);

    let (s, c) = match quadrant {
        0 => (s, c),
        1 => (c, s.neg()),
        2 => (s.neg(), c.neg()),
        _ => (c.neg(), s),
    };

    (clamp_unit(s.set_round(p)), clamp_unit(c.set_round(p)))
}

// sin(a) and cos(a) for 0 <= a < 1 in fixed point by argument halving, series,
// and the double angle formulas. Returns the values and the number of fractional bits.
fn sin_cos_series(a: &Float, wp: usize) -> Option<(Fixed, Fixed, usize)> {
    let m = -a.exponent().unwrap_or(0) as isize;
    let (h, _) = series_cost_optimize::<SinGen, DoubleAngleEstimator>(wp, &SinGen { k: 0 }, m);
    let h = h.min(MAX_HALVINGS);

    // small arguments need more fractional bits for the same relative accuracy
    let w = wp + 16 + 2 * h + m.max(0) as usize;

    // u = a / 2^h truncated, error 1
    let u = a.to_fixed((w - h) as Exponent).ok()?;
    let u2 = (&u * &u) >> w;

    // the argument error adds at most 4 units to each sum
    let mut s = series_fixed(u.clone(), &u2, w, &mut SinGen { k: 0 });
    s.err += 4;
    let mut c = series_fixed(BigInt::one() << w, &u2, w, &mut CosGen { k: 0 });
    c.err += 4;

    for _ in 0..h {
        let s2 = s.mul(&c, w).mul_2exp(1);
        let c2 = Fixed::one(w).sub(&s.mul(&s, w).mul_2exp(1));
        s = s2;
        c = c2;
    }

    Some((s, c, w))
}

// sin(c) and cos(c) for `c = a * 2^-b < 2^-r` by binary splitting, with `w` fractional bits.
fn sin_cos_chunk(a: &BigInt, b: usize, r: usize, w: usize) -> (Fixed, Fixed) {
    let n = exp_terms(r, w + 2) / 2 + 1;
    let a2 = -(a * a);

    let ps = bsplit(1, n, &|j| (a2.clone(), BigInt::from((2 * j) * (2 * j + 1)) << (2 * b)));
    let sv = (((&ps.q + &ps.t) * a) << w) / (&ps.q << b);

    let pc = bsplit(1, n, &|j| (a2.clone(), BigInt::from((2 * j - 1) * (2 * j)) << (2 * b)));
    let cv = ((&pc.q + &pc.t) << w) / &pc.q;

    (Fixed { v: sv, err: 2 }, Fixed { v: cv, err: 2 })
}

// sin(a) and cos(a) for 0 <= a < 1 by the bit-burst method.
fn sin_cos_bsplit(a: &Float, wp: usize) -> Option<(Fixed, Fixed, usize)> {
    let w = wp + 32 + (-a.exponent().unwrap_or(0)).max(0) as usize;
    let av = a.to_fixed(w as Exponent).ok()?;

    let mut s = Fixed::exact(BigInt::from(0));
    let mut c = Fixed::one(w);
    let mut start = 0;
    let mut end = BURST_FIRST_BITS.min(w);
    while start < w {
        let chunk: BigInt = (&av >> (w - end)) & ((BigInt::one() << (end - start)) - 1);
        if chunk.bits() != 0 {
            let (s1, c1) = sin_cos_chunk(&chunk, end, start, w);
            let s2 = s.mul(&c1, w).add(&c.mul(&s1, w));
            let c2 = c.mul(&c1, w).sub(&s.mul(&s1, w));
            s = s2;
            c = c2;
        }
        start = end;
        end = (2 * end).min(w);
    }

    // truncation of a costs at most one unit
    s.err += 1;
    c.err += 1;

    Some((s, c, w))
}
