//! Euler–Mascheroni constant.
//!
//! Brent–McMillan: with `a_k = (n^k / k!)^2`, `I = sum(a_k)` and `S = sum(a_k * H_k)`,
//! `|gamma - (S / I - ln(n))| < pi * e^(-4n)`. Both sums are computed together by
//! binary splitting.

use crate::ball::Ball;
use crate::common::util::log2_ceil;
use crate::defs::Exponent;
use crate::mag::Mag;
use num_bigint::BigInt;

// Binary splitting state of the range of terms `a .. b`.
struct Pqdctv {
    p: BigInt,
    q: BigInt,
    d: BigInt,
    c: BigInt,
    t: BigInt,
    v: BigInt,
}

fn bsplit_euler(a: u64, b: u64, n2: &BigInt) -> Pqdctv {
    if b - a == 1 {
        return Pqdctv {
            p: n2.clone(),
            q: BigInt::from(a) * a,
            d: BigInt::from(a),
            c: BigInt::from(1),
            t: n2.clone(),
            v: n2.clone(),
        };
    }

    let m = (a + b) / 2;
    let l = bsplit_euler(a, m, n2);
    let r = bsplit_euler(m, b, n2);

    let dq = &r.d * &r.q;
    let v = &l.v * &dq + &l.p * (&l.c * &r.d * &r.t + &l.d * &r.v);

    Pqdctv {
        c: &l.c * &r.d + &r.c * &l.d,
        t: &l.t * &r.q + &l.p * &r.t,
        v,
        p: l.p * r.p,
        q: l.q * r.q,
        d: l.d * r.d,
    }
}

/// Holds value of currently computed Euler–Mascheroni constant.
#[derive(Debug)]
pub struct EulerCache {
    val: Ball,
    prec: usize,
}

impl EulerCache {
    /// Parameter `n` of the method for precision `k`, such that `e^(-4n) < 2^-(k + 4)`.
    pub fn terms(k: usize) -> u64 {
        (k as u64 + 4) * 1000 / 5770 + 1
    }

    fn calc_euler(k: usize, ln_n: &Ball) -> Ball {
        let n = Self::terms(k);
        let nk = 5 * n;
        let n2 = BigInt::from(n) * n;
        let wp = k + 16;

        let s = bsplit_euler(1, nk, &n2);

        // a_K = (n^K / K!)^2 bounds the tails: 2 a_K for I and 2 a_K K for S
        let nk_pow = num_traits::pow(BigInt::from(n), nk as usize);
        let k_fact = (2..=nk).fold(BigInt::from(1), |acc, j| acc * j);
        let log_ak = 2 * (nk_pow.bits() as Exponent - k_fact.bits() as Exponent + 1);
        let tail_i = Mag::from_2exp(log_ak + 1);
        let tail_s = Mag::from_2exp(log_ak + 1 + log2_ceil(nk as usize) as Exponent);

        let i = Ball::from_big_ratio(&(&s.q + &s.t), &s.q, wp).add_error(&tail_i);
        let sum = Ball::from_big_ratio(&s.v, &(&s.d * &s.q), wp).add_error(&tail_s);

        // pi * e^(-4n) < 2^(2 - 5.77n)
        let method_err = Mag::from_2exp(2 - (5770 * n / 1000) as Exponent);

        sum.div(&i, wp).sub(ln_n, wp).add_error(&method_err).set_round(k)
    }

    /// Empty cache.
    pub fn new() -> Self {
        EulerCache {
            val: Ball::zero_pm_inf(),
            prec: 0,
        }
    }

    /// Precision of the cached value.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// Return value of the constant with precision `k`.
    /// `ln_n` must contain `ln(terms(k))` with precision not less than `k + 16`.
    pub(crate) fn for_prec(&mut self, k: usize, ln_n: &Ball) -> Ball {
        if self.prec < k {
            self.val = Self::calc_euler(k, ln_n);
            self.prec = k;
        }

        self.val.set_round(k)
    }
}
