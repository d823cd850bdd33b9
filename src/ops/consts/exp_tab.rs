//! Tables of exp(i / 2^8) and exp(j / 2^16) in fixed point.

use crate::ops::regime::EXP_TAB_PREC;
use crate::ops::series::exp_bsplit_fixed;
use crate::ops::series::Fixed;
use num_bigint::BigInt;

/// Number of entries in each table.
pub const EXP_TAB_SIZE: usize = 256;

/// Number of argument bits resolved by each table.
pub const EXP_TAB_BITS: usize = 8;

/// Two tables of the exponent values with `EXP_TAB_PREC` fractional bits.
/// Every entry is computed independently and has an error of at most 2 units.
#[derive(Debug)]
pub struct ExpTables {
    t1: Vec<Fixed>,
    t2: Vec<Fixed>,
}

impl ExpTables {
    /// Computes both tables.
    pub fn new() -> Self {
        tracing::debug!(prec = EXP_TAB_PREC, "building exponent tables");

        let t1 = (0..EXP_TAB_SIZE)
            .map(|i| exp_bsplit_fixed(&BigInt::from(i), EXP_TAB_BITS, 0, EXP_TAB_PREC))
            .collect();
        let t2 = (0..EXP_TAB_SIZE)
            .map(|j| exp_bsplit_fixed(&BigInt::from(j), 2 * EXP_TAB_BITS, EXP_TAB_BITS, EXP_TAB_PREC))
            .collect();

        ExpTables { t1, t2 }
    }

    /// Returns `exp(i / 2^8)` with `w <= EXP_TAB_PREC` fractional bits.
    pub fn coarse(&self, i: usize, w: usize) -> Fixed {
        Self::truncate(&self.t1[i], w)
    }

    /// Returns `exp(j / 2^16)` with `w <= EXP_TAB_PREC` fractional bits.
    pub fn fine(&self, j: usize, w: usize) -> Fixed {
        Self::truncate(&self.t2[j], w)
    }

    fn truncate(f: &Fixed, w: usize) -> Fixed {
        let s = EXP_TAB_PREC - w.min(EXP_TAB_PREC);
        if s == 0 {
            f.clone()
        } else {
            let lost = f.v.trailing_zeros().map_or(false, |tz| tz < s as u64);
            Fixed {
                v: &f.v >> s,
                err: (f.err >> s.min(63)) + (f.err != 0) as u64 + lost as u64,
            }
        }
    }
}
