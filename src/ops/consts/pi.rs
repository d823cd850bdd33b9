//! π number

use crate::ball::Ball;
use crate::defs::Exponent;
use crate::mag::Mag;
use num_bigint::BigInt;

// Chudnovsky series, terms a + 1 ..= b.
fn pqr(a: u64, b: u64) -> (BigInt, BigInt, BigInt) {
    if a == b - 1 {
        let r = BigInt::from(6 * b - 5) * (2 * b - 1) * (6 * b - 1);
        let q = BigInt::from(10939058860032000u64) * b * b * b;
        let mut p = &r * (13591409 + 545140134 * b);

        if b & 1 != 0 {
            p = -p;
        }

        (p, q, r)
    } else {
        let m = (a + b) / 2;

        let (pa, qa, ra) = pqr(a, m);
        let (pb, qb, rb) = pqr(m, b);

        let p = &pa * &qb + &pb * &ra;

        (p, qa * qb, ra * rb)
    }
}

fn pqr_inc(pa: &BigInt, qa: &BigInt, ra: &BigInt, m: u64) -> (BigInt, BigInt, BigInt, u64) {
    let b = m * 2;

    let (pb, qb, rb) = pqr(m, b);

    let p = pa * &qb + &pb * ra;

    (p, qa * qb, ra * rb, b)
}

/// Holds value of currently computed π.
#[derive(Debug)]
pub struct PiCache {
    b: u64,
    pk: BigInt,
    qk: BigInt,
    rk: BigInt,
    val: Ball,
    prec: usize,
}

impl PiCache {
    fn calc_pi(p: &BigInt, q: &BigInt, b: u64, k: usize) -> Ball {
        // 426880 * sqrt(10005) / (13591409 + p / q)
        let wp = k + 16;
        let s = Ball::from_big_ratio(&(p + q * 13591409u64), q, wp);

        // the terms decrease faster than 2^-47 each
        let tail = Mag::from_u64(2 * (13591409 + 545140134 * (b + 1))).mul_2exp(-47 * (b as Exponent + 1));
        let s = s.add_error(&tail);

        let c = Ball::from_u64(10005).sqrt(wp).mul(&Ball::from_u64(426880), wp);

        c.div(&s, k)
    }

    /// Empty cache.
    pub fn new() -> Self {
        let (pk, qk, rk) = pqr(0, 1);

        PiCache {
            b: 1,
            pk,
            qk,
            rk,
            val: Ball::zero_pm_inf(),
            prec: 0,
        }
    }

    /// Precision of the cached value.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// Return value of π with precision `k`.
    pub(crate) fn for_prec(&mut self, k: usize) -> Ball {
        if self.prec < k {
            let kext = (k as u64 + 46 + 64) / 47;

            while self.b <= kext {
                let (pk, qk, rk, b) = pqr_inc(&self.pk, &self.qk, &self.rk, self.b);
                self.pk = pk;
                self.qk = qk;
                self.rk = rk;
                self.b = b;
            }

            self.val = Self::calc_pi(&self.pk, &self.qk, self.b, k);
            self.prec = k;
        }

        self.val.set_round(k)
    }
}
