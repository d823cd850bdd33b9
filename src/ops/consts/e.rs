//! Euler's number

use crate::ball::Ball;
use crate::common::util::log2_factorial_floor;
use crate::mag::Mag;
use crate::ops::series::bsplit;
use crate::ops::series::Pqt;
use num_bigint::BigInt;

fn pq(a: u64, b: u64) -> Pqt {
    bsplit(a, b, &|j| (BigInt::from(1), BigInt::from(j)))
}

/// Holds value of currently computed e.
#[derive(Debug)]
pub struct ECache {
    b: u64,
    pqt: Pqt,
    val: Ball,
    prec: usize,
}

impl ECache {
    fn calc_e(pqt: &Pqt, b: u64, k: usize) -> Ball {
        // 1 + t / q, where t / q = sum(1 / j!, j = 1 .. b - 1)
        let s = Ball::from_big_ratio(&(&pqt.q + &pqt.t), &pqt.q, k + 8);

        // the rest of the series is below 2 / b!
        let tail = Mag::from_2exp(1 - log2_factorial_floor(b) as i64);

        s.add_error(&tail).set_round(k)
    }

    // Number of terms for which the discarded part is below 2^-(k + 8).
    fn b_factor(k: usize) -> u64 {
        let mut b = 2;
        while log2_factorial_floor(b) < k as u64 + 9 {
            b *= 2;
        }
        b
    }

    /// Empty cache.
    pub fn new() -> Self {
        ECache {
            b: 64,
            pqt: pq(1, 64),
            val: Ball::zero_pm_inf(),
            prec: 0,
        }
    }

    /// Precision of the cached value.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// Return value of e with precision `k`.
    pub(crate) fn for_prec(&mut self, k: usize) -> Ball {
        if self.prec < k {
            let b = Self::b_factor(k);

            while self.b < b {
                let m = self.b;
                self.pqt = self.pqt.merge(&pq(m, m * 2));
                self.b = m * 2;
            }

            self.val = Self::calc_e(&self.pqt, self.b, k);
            self.prec = k;
        }

        self.val.set_round(k)
    }
}
