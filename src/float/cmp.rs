//! Comparison.

use super::Float;
use crate::defs::{Exponent, Sign};
use core::cmp::Ordering;

impl Float {
    /// Compares `self` to `d2`. Returns `None` if any of the values is NaN.
    pub fn cmp(&self, d2: &Self) -> Option<Ordering> {
        match (self, d2) {
            (Float::NaN, _) | (_, Float::NaN) => None,
            _ => Some(self.total_cmp(d2)),
        }
    }

    /// Compares `self` to `d2` treating NaN as greater than any other value,
    /// including positive infinity.
    pub fn total_cmp(&self, d2: &Self) -> Ordering {
        match (self, d2) {
            (Float::NaN, Float::NaN) => Ordering::Equal,
            (Float::NaN, _) => Ordering::Greater,
            (_, Float::NaN) => Ordering::Less,
            _ => {
                let r1 = rank(self);
                let r2 = rank(d2);
                if r1 != r2 {
                    return r1.cmp(&r2);
                }
                match (self, d2) {
                    (Float::Finite { s, .. }, Float::Finite { .. }) => {
                        let ord = self.cmp_abs(d2);
                        if s.is_positive() {
                            ord
                        } else {
                            ord.reverse()
                        }
                    }
                    _ => Ordering::Equal,
                }
            }
        }
    }

    /// Compares absolute values of `self` and `d2`; NaN is ordered above infinity.
    pub fn cmp_abs(&self, d2: &Self) -> Ordering {
        match (self, d2) {
            (Float::Finite { m: m1, e: e1, .. }, Float::Finite { m: m2, e: e2, .. }) => {
                let t1 = e1 + m1.bits() as Exponent;
                let t2 = e2 + m2.bits() as Exponent;
                if t1 != t2 {
                    return t1.cmp(&t2);
                }
                // same top bit position: align and compare mantissas
                if e1 <= e2 {
                    m1.cmp(&(m2 << ((e2 - e1) as usize)))
                } else {
                    (m1 << ((e1 - e2) as usize)).cmp(m2)
                }
            }
            _ => abs_rank(self).cmp(&abs_rank(d2)),
        }
    }

    /// Compares `|self|` with `2^k`. NaN and infinity are greater, zero is less.
    pub fn cmp_2exp(&self, k: Exponent) -> Ordering {
        match self {
            Float::Zero => Ordering::Less,
            Float::Finite { m, e, .. } => {
                let top = e + m.bits() as Exponent;
                if top - 1 > k {
                    Ordering::Greater
                } else if top <= k {
                    Ordering::Less
                } else if m.bits() == 1 {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            _ => Ordering::Greater,
        }
    }

    /// Returns the larger of `self` and `d2`, or NaN if any of them is NaN.
    pub fn max(&self, d2: &Self) -> Self {
        match self.cmp(d2) {
            Some(Ordering::Less) => d2.clone(),
            Some(_) => self.clone(),
            None => Float::NaN,
        }
    }

    /// Returns the smaller of `self` and `d2`, or NaN if any of them is NaN.
    pub fn min(&self, d2: &Self) -> Self {
        match self.cmp(d2) {
            Some(Ordering::Greater) => d2.clone(),
            Some(_) => self.clone(),
            None => Float::NaN,
        }
    }
}

fn rank(f: &Float) -> i8 {
    match f {
        Float::Inf(Sign::Neg) => -2,
        Float::Finite { s: Sign::Neg, .. } => -1,
        Float::Zero => 0,
        Float::Finite { s: Sign::Pos, .. } => 1,
        Float::Inf(Sign::Pos) => 2,
        Float::NaN => 3,
    }
}

fn abs_rank(f: &Float) -> i8 {
    match f {
        Float::Zero => 0,
        Float::Finite { .. } => 1,
        Float::Inf(_) => 2,
        Float::NaN => 3,
    }
}
