//! Auxiliary functions.

use num_bigint::BigUint;

/// integer logarithm base 2 of a number.
pub fn log2_ceil(mut n: usize) -> usize {
    let mut ret = 0;
    let mut sticky = 0;
    while n > 1 {
        if n & 1 != 0 {
            sticky = 1;
        }
        ret += 1;
        n >>= 1;
    }
    ret + sticky
}

/// integer logarithm base 2 of a number.
pub fn log2_floor(mut n: usize) -> usize {
    let mut ret = 0;
    while n > 1 {
        ret += 1;
        n >>= 1;
    }
    ret
}

/// square root integer approximation.
pub fn sqrt_int(a: u32) -> u32 {
    if a == 0 {
        return 0;
    }

    let mut x = a;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + a / x) / 2;
    }
    x
}

/// Floor of the square root of a 128-bit number.
pub fn isqrt_u128(n: u128) -> u128 {
    let mut r = (n as f64).sqrt() as u128;
    while r.checked_mul(r).map_or(true, |s| s > n) {
        r -= 1;
    }
    while (r + 1).checked_mul(r + 1).map_or(false, |s| s <= n) {
        r += 1;
    }
    r
}

/// Estimate of the cost of multiplication of two numbers with precision p.
pub fn calc_mul_cost(p: usize) -> usize {
    if p < 70 {
        p * p
    } else {
        // karatsuba and toom-3 regions of the bignum backend
        if p < 1625 {
            sqrt_int((p * p * p).min(u32::MAX as usize) as u32) as usize
        } else {
            let q = sqrt_int(p.min(u32::MAX as usize) as u32) as usize;
            q * q * q
        }
    }
}

/// Cost of addition/subtraction of two numbers with precision p.
#[inline]
pub fn calc_add_cost(p: usize) -> usize {
    p
}

/// Estimate of sqrt op cost.
#[inline]
pub fn calc_sqrt_cost(p: usize, cost_mul: usize, cost_add: usize) -> usize {
    let log3_estimate = (log2_floor(p) * 41349) >> 16;
    log3_estimate * (5 * cost_mul + 2 * cost_add) / 2
}

/// Guard bits added to a working precision `p`.
#[inline]
pub fn guard_bits(p: usize) -> usize {
    log2_ceil(p) + 10
}

/// Returns the least significant 64 bits of `m`.
pub fn low_u64(m: &BigUint) -> u64 {
    m.iter_u64_digits().next().unwrap_or(0)
}

/// Returns the most significant 64 bits of `m` together with the shift applied
/// and whether any of the dropped bits was set.
pub fn top_u64(m: &BigUint) -> (u64, u64, bool) {
    let bits = m.bits();
    if bits <= 64 {
        (low_u64(m), 0, false)
    } else {
        let shift = bits - 64;
        let sticky = m.trailing_zeros().map_or(false, |tz| tz < shift);
        (low_u64(&(m >> shift)), shift, sticky)
    }
}

/// Lower bound of log2(n!) computed as a sum of integer logarithms.
pub fn log2_factorial_floor(n: u64) -> u64 {
    (2..=n).map(|k| log2_floor(k as usize) as u64).sum()
}

#[cfg(test)]
pub fn rand_p() -> usize {
    rand::random::<usize>() % 1000 + 10
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_log2() {
        assert_eq!(log2_ceil(1), 0);
        assert_eq!(log2_ceil(8), 3);
        assert_eq!(log2_ceil(9), 4);
        assert_eq!(log2_floor(9), 3);
        assert_eq!(log2_floor(1), 0);
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt_int(0), 0);
        assert_eq!(sqrt_int(15), 3);
        assert_eq!(sqrt_int(16), 4);
        assert_eq!(isqrt_u128(u64::MAX as u128 * 3), 7439101573);
        for _ in 0..1000 {
            let n = rand::random::<u128>() >> 33;
            let r = isqrt_u128(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n);
        }
    }

    #[test]
    fn test_top_bits() {
        let m = (BigUint::from(0xabcdu32) << 100u32) + BigUint::from(1u32);
        let (t, sh, sticky) = top_u64(&m);
        assert_eq!(sh, m.bits() - 64);
        assert!(sticky);
        assert_eq!(t >> 48, 0xabcd);
        assert_eq!(top_u64(&BigUint::from(5u32)), (5, 0, false));
        assert_eq!(log2_factorial_floor(4), 1 + 1 + 2);
    }
}
