//! Power series and binary splitting appliance.
//!
//! Series are evaluated in fixed point: an integer `v` stands for `v * 2^-w`.
//! Every fixed point value carries a bound of its absolute error in units of `2^-w`,
//! so the results can be turned into balls without any further analysis.

use crate::ball::Ball;
use crate::common::util::calc_add_cost;
use crate::common::util::calc_mul_cost;
use crate::common::util::log2_ceil;
use crate::common::util::log2_floor;
use crate::common::util::sqrt_int;
use crate::defs::Exponent;
use crate::defs::RoundingMode;
use crate::float::Float;
use crate::mag::Mag;
use num_bigint::BigInt;
use num_traits::One;
use num_traits::Signed;
use num_traits::Zero;
use smallvec::SmallVec;

const RECT_ITER_THRESHOLD: usize = 16;

//
// Public part
//

/// Fixed point number `v * 2^-w` with an absolute error of at most `err * 2^-w`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixed {
    pub v: BigInt,
    pub err: u64,
}

impl Fixed {
    /// Exact fixed point value.
    pub fn exact(v: BigInt) -> Self {
        Fixed { v, err: 0 }
    }

    /// Exact 1 with `w` fractional bits.
    pub fn one(w: usize) -> Self {
        Self::exact(BigInt::one() << w)
    }

    /// Fixed point value of `x` truncated to `w` fractional bits. The truncation error is
    /// included in the error bound.
    pub fn from_float(x: &Float, w: usize) -> Option<Self> {
        let v = x.to_fixed(w as Exponent).ok()?;
        let exact = Float::from_fixed(&v, w as Exponent).ok()? == *x;
        Some(Fixed {
            v,
            err: if exact { 0 } else { 1 },
        })
    }

    /// Product of two fixed point numbers with `w` fractional bits.
    pub fn mul(&self, d2: &Self, w: usize) -> Self {
        let v = (&self.v * &d2.v) >> w;
        let ka = int_part_up(&self.v, w);
        let kb = int_part_up(&d2.v, w);
        let err = ka
            .saturating_mul(d2.err)
            .saturating_add(kb.saturating_mul(self.err))
            .saturating_add(2);
        Fixed { v, err }
    }

    /// Sum of two fixed point numbers.
    pub fn add(&self, d2: &Self) -> Self {
        Fixed {
            v: &self.v + &d2.v,
            err: self.err.saturating_add(d2.err),
        }
    }

    /// Difference of two fixed point numbers.
    pub fn sub(&self, d2: &Self) -> Self {
        Fixed {
            v: &self.v - &d2.v,
            err: self.err.saturating_add(d2.err),
        }
    }

    /// Negated value.
    pub fn neg(&self) -> Self {
        Fixed {
            v: -&self.v,
            err: self.err,
        }
    }

    /// Multiplies by `2^k` exactly.
    pub fn mul_2exp(&self, k: usize) -> Self {
        Fixed {
            v: &self.v << k,
            err: self.err.saturating_mul(1 << k.min(63)),
        }
    }

    /// Converts to a ball with precision `p`.
    pub fn to_ball(&self, w: usize, p: usize) -> Ball {
        let rad = Mag::from_u64(self.err).mul_2exp(-(w as Exponent));
        let mid = Float::from_fixed(&self.v, w as Exponent).and_then(|f| f.round(p, RoundingMode::ToZero));
        Ball::from_rounded(mid, rad, p)
    }
}

/// Upper bound of the absolute value of `v * 2^-w` as an integer.
fn int_part_up(v: &BigInt, w: usize) -> u64 {
    let bits = v.bits();
    if bits <= w as u64 {
        1
    } else if bits - w as u64 >= 63 {
        u64::MAX
    } else {
        (1u64 << (bits - w as u64)).max(1)
    }
}

/// Generator of polynomial coefficients.
///
/// The series is `sum(t_k)`, where the power part is updated as
/// `p_k = p_(k-1) * x_step * num / den` and the term is `t_k = p_k / div`.
pub trait PolycoeffGen {
    /// Returns `(num, den, div)` for the next term.
    fn next(&mut self) -> (u64, u64, u64);

    /// Returns the divisor of the first term.
    fn first_div(&self) -> u64 {
        1
    }

    /// Returns true if the terms alternate in sign.
    fn alternating(&self) -> bool {
        false
    }

    /// Returns the cost of one call to next if numbers have precision p.
    fn iter_cost(&self, p: usize) -> usize {
        calc_add_cost(p)
    }
}

/// Estimate how argument reduction influences cost.
pub trait ArgReductionEstimator {
    /// Estimates cost of reduction n times for number with precision p.
    fn reduction_cost(n: usize, p: usize) -> u64;

    /// Given m, the negative power of 2 of a number, returns the negative power of 2 if reduction is applied n times.
    fn reduction_effect(n: usize, m: isize) -> usize;
}

/// Computes the number of reductions required for the best performance.
/// `p` is the precision, `m` is the negative exponent of the argument.
/// Returns the number of reductions and the estimated number of series iterations.
pub fn series_cost_optimize<T: PolycoeffGen, S: ArgReductionEstimator>(
    p: usize,
    polycoeff_gen: &T,
    m: isize,
) -> (usize, usize) {
    let reduction_num_step = (log2_floor(p) / 4).max(1);
    let mut reduction_times = if (reduction_num_step as isize) > m {
        (reduction_num_step as isize - m.max(0)) as usize
    } else {
        0
    };
    let mut cost1 = u64::MAX;
    let mut best = (reduction_times, usize::MAX);
    loop {
        let m_eff = S::reduction_effect(reduction_times, m);
        let niter = series_niter(p, m_eff);
        let cost2 = series_cost(niter, p, polycoeff_gen) + S::reduction_cost(reduction_times, p);
        if cost2 < cost1 {
            cost1 = cost2;
            best = (reduction_times, niter);
            reduction_times += reduction_num_step;
        } else {
            return best;
        }
    }
}

/// Evaluates the series described by `polycoeff_gen` with all values having `w` fractional bits.
/// `first` is the first power part `p_0`.
///
/// The absolute ratio `|x_step * num / den| * 2^-w` must not exceed 1/2 for every term,
/// and `num` must not exceed `den`. The returned error bound covers both the truncation
/// of the intermediate values and the discarded tail of the series.
pub fn series_fixed<T: PolycoeffGen>(
    first: BigInt,
    x_step: &BigInt,
    w: usize,
    polycoeff_gen: &mut T,
) -> Fixed {
    let alternating = polycoeff_gen.alternating();
    let d0 = polycoeff_gen.first_div();
    let mut acc = if d0 == 1 { first.clone() } else { &first / d0 };
    let mut pw = first;
    let mut nterms: u64 = 1;
    let mut neg = false;

    loop {
        let (num, den, div) = polycoeff_gen.next();
        pw = shr_trunc(&pw * x_step, w);
        if num != 1 {
            pw *= num;
        }
        if den != 1 {
            pw /= den;
        }
        if pw.is_zero() {
            break;
        }
        let t = if div == 1 { pw.clone() } else { &pw / div };
        neg = alternating && !neg;
        if neg {
            acc -= t;
        } else {
            acc += t;
        }
        nterms += 1;
    }

    Fixed {
        v: acc,
        err: 5 * nterms + 8,
    }
}

/// Result of binary splitting over a range of terms: the partial sum is `t / q`,
/// and `p / q` is the product of all term ratios in the range.
#[derive(Debug, Clone)]
pub struct Pqt {
    pub p: BigInt,
    pub q: BigInt,
    pub t: BigInt,
}

impl Pqt {
    /// Joins the result of the range `a..m` with the result of the adjacent range `m..b`.
    pub fn merge(&self, r: &Pqt) -> Pqt {
        Pqt {
            t: &self.t * &r.q + &self.p * &r.t,
            p: &self.p * &r.p,
            q: &self.q * &r.q,
        }
    }
}

/// Binary splitting of `sum(k = a..b, prod(j = a..=k, p(j) / q(j)))`, where `term(j)`
/// returns `(p(j), q(j))`.
pub fn bsplit<F: Fn(u64) -> (BigInt, BigInt)>(a: u64, b: u64, term: &F) -> Pqt {
    if b - a == 1 {
        let (p, q) = term(a);
        return Pqt { t: p.clone(), p, q };
    }

    if b - a <= RECT_ITER_THRESHOLD as u64 {
        // short ranges are folded linearly from the right
        let mut terms = SmallVec::<[(BigInt, BigInt); RECT_ITER_THRESHOLD]>::new();
        for j in a..b {
            terms.push(term(j));
        }
        let mut iter = terms.into_iter().rev();
        let (p, q) = match iter.next() {
            Some(v) => v,
            None => return Pqt { p: BigInt::one(), q: BigInt::one(), t: BigInt::zero() },
        };
        let mut acc = Pqt { t: p.clone(), p, q };
        for (p, q) in iter {
            acc = Pqt {
                t: &p * (&acc.q + &acc.t),
                p: &p * &acc.p,
                q: &q * &acc.q,
            };
        }
        return acc;
    }

    let m = (a + b) / 2;
    bsplit(a, m, term).merge(&bsplit(m, b, term))
}

/// Smallest `n >= 2` such that `2 * x^n / n! <= 2^-target` for any `x <= 2^-r`.
pub fn exp_terms(r: usize, target: usize) -> u64 {
    let mut n: u64 = 1;
    let mut lf: u64 = 0;
    loop {
        n += 1;
        lf += log2_floor(n as usize) as u64;
        if n as u128 * r as u128 + lf as u128 >= target as u128 + 1 {
            return n;
        }
    }
}

/// Ball containing `sum(k >= 0, (a * 2^-b)^k / k!) * 2^w` in fixed point, where
/// `0 <= a * 2^-b < 2^-r` and `r >= 0`.
pub fn exp_bsplit_fixed(a: &BigInt, b: usize, r: usize, w: usize) -> Fixed {
    if a.is_zero() {
        return Fixed::one(w);
    }
    let n = exp_terms(r, w + 2);
    let pqt = bsplit(1, n, &|j| (a.clone(), BigInt::from(j) << b));
    let v = (BigInt::one() << w) + (pqt.t << w) / pqt.q;
    Fixed { v, err: 2 }
}

/// Returns `a` with the sign of `neg` applied.
pub fn signed(a: BigInt, neg: bool) -> BigInt {
    if neg {
        -a
    } else {
        a
    }
}

//
// Private part
//

/// Shift to the right rounding towards zero.
fn shr_trunc(v: BigInt, w: usize) -> BigInt {
    if v.is_negative() {
        -((-v) >> w)
    } else {
        v >> w
    }
}

/// Estimate of the number of series iterations.
/// `p` is the precision, `m` is the negative power of x
/// (i.e. x = f*2^(-m), where 0.5 <= f < 1).
fn series_niter(p: usize, m: usize) -> usize {
    let ln = log2_ceil(p);
    let lln = log2_floor(ln);
    p / (ln.saturating_sub(lln) + m).max(1)
}

/// Estimate cost of execution for series.
fn series_cost<T: PolycoeffGen>(niter: usize, p: usize, polycoeff_gen: &T) -> u64 {
    let cost_mul = calc_mul_cost(p);
    let cost_add = calc_add_cost(p);
    let cost = niter * (cost_mul + cost_add + polycoeff_gen.iter_cost(p));
    if niter >= RECT_ITER_THRESHOLD {
        (cost + sqrt_int(niter as u32) as usize * cost_mul) as u64
    } else {
        cost as u64
    }
}
