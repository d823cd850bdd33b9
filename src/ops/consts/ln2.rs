//! Natural logarithm of 2.

use crate::ball::Ball;
use crate::defs::Exponent;
use crate::mag::Mag;
use crate::ops::series::bsplit;
use num_bigint::BigInt;

/// Ball containing `atanh(1/q)` with precision `k`, `q >= 2`.
///
/// The series `sum(1 / ((2j + 1) * q^(2j + 1)))` is summed by binary splitting
/// up to the first term below `2^-(k + 4)`.
pub fn atanh_recip(q: u64, k: usize) -> Ball {
    let q2 = BigInt::from(q) * q;

    // q^(2n + 1) bounds the discarded part from above
    let mut n: u64 = 1;
    let mut qpow = &q2 * q;
    while (qpow.bits() as usize) < k + 6 {
        n += 1;
        qpow *= &q2;
    }

    // 1 + sum(prod((2i - 1) / ((2i + 1) * q^2), i = 1 ..= j), j = 1 .. n - 1)
    let pqt = bsplit(1, n, &|i| (BigInt::from(2 * i - 1), BigInt::from(2 * i + 1) * &q2));
    let s = Ball::from_big_ratio(&(&pqt.q + &pqt.t), &(&pqt.q * q), k + 8);

    let tail = Mag::from_2exp(2 - qpow.bits() as Exponent);
    s.add_error(&tail).set_round(k)
}

/// Holds value of currently computed ln(2).
#[derive(Debug)]
pub struct Ln2Cache {
    val: Ball,
    prec: usize,
}

impl Ln2Cache {
    fn calc_ln2(k: usize) -> Ball {
        // 2 * atanh(1/3)
        atanh_recip(3, k + 2).mul_2exp(1).set_round(k)
    }

    /// Empty cache.
    pub fn new() -> Self {
        Ln2Cache {
            val: Ball::zero_pm_inf(),
            prec: 0,
        }
    }

    /// Precision of the cached value.
    pub fn prec(&self) -> usize {
        self.prec
    }

    /// Return value of ln(2) with precision `k`.
    pub(crate) fn for_prec(&mut self, k: usize) -> Ball {
        if self.prec < k {
            self.val = Self::calc_ln2(k);
            self.prec = k;
        }

        self.val.set_round(k)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::float::Float;

    #[test]
    fn test_ln2_const() {
        let mut ln2 = Ln2Cache::new();
        let c = ln2.for_prec(320);
        // 0xB17217F7D1CF79AB * 2^-64
        let r = Ball::exact(Float::from_u64(0xB17217F7D1CF79AB).mul_2exp(-64).unwrap()).add_error(&Mag::from_2exp(-64));
        assert!(r.contains(&c));
        assert!(c.rel_accuracy_bits() > 310);
        assert!((c.mid().to_f64() - core::f64::consts::LN_2).abs() < 1e-16);
    }

    #[test]
    fn test_atanh_recip() {
        // atanh(1/2) = ln(3) / 2
        let a = atanh_recip(2, 100);
        assert!((a.mid().to_f64() - 3f64.ln() / 2.0).abs() < 1e-15);
        assert!(a.rel_accuracy_bits() > 90);
    }
}
