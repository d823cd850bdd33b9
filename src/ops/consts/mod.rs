mod e;
mod euler;
mod exp_tab;
mod ln2;
mod pi;

use crate::ball::Ball;
use crate::ops::consts::e::ECache;
use crate::ops::consts::euler::EulerCache;
use crate::ops::consts::ln2::Ln2Cache;
use crate::ops::consts::pi::PiCache;

pub use crate::ops::consts::exp_tab::ExpTables;
pub use crate::ops::consts::exp_tab::EXP_TAB_BITS;

/// Default number of extra bits computed when a constant is refreshed.
pub const DEFAULT_HEADROOM: usize = 64;

/// Decides the precision a cached constant is computed with when a request
/// exceeds the precision of the cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Compute exactly the requested precision.
    Exact,

    /// Compute the requested precision plus the given number of bits.
    Headroom(usize),

    /// Compute at least twice the previously cached precision.
    Doubling,
}

impl CachePolicy {
    /// Precision to compute for the request `p` when the cached precision is `prev`.
    pub fn target(&self, p: usize, prev: usize) -> usize {
        match *self {
            CachePolicy::Exact => p,
            CachePolicy::Headroom(bits) => p.saturating_add(bits),
            CachePolicy::Doubling => p.max(prev.saturating_mul(2)),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy::Headroom(DEFAULT_HEADROOM)
    }
}

/// Mathematical constant held by the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    /// π
    Pi,
    /// Euler's number
    E,
    /// Natural logarithm of 2
    Ln2,
    /// Euler–Mascheroni constant
    Euler,
}

/// Constants cache contains arbitrary-precision mathematical constants.
///
/// Each value is kept together with the precision it was computed with, and it is
/// recomputed only when a strictly higher precision is requested. The precision of
/// the recomputation is decided by the `CachePolicy`.
#[derive(Debug)]
pub struct Consts {
    pi: PiCache,
    e: ECache,
    ln2: Ln2Cache,
    euler: EulerCache,
    exp_tab: Option<ExpTables>,
    policy: CachePolicy,
}

/// In an ideal situation, the `Consts` structure is initialized with `Consts::new` only once,
/// and then used where needed.
impl Consts {
    /// Initializes the constants cache with the default policy.
    pub fn new() -> Self {
        Self::with_policy(CachePolicy::default())
    }

    /// Initializes the constants cache with the refresh policy `policy`.
    pub fn with_policy(policy: CachePolicy) -> Self {
        Consts {
            pi: PiCache::new(),
            e: ECache::new(),
            ln2: Ln2Cache::new(),
            euler: EulerCache::new(),
            exp_tab: None,
            policy,
        }
    }

    /// Returns the refresh policy.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the precision the constant `c` is currently cached with, or 0.
    pub fn cached_precision(&self, c: Constant) -> usize {
        match c {
            Constant::Pi => self.pi.prec(),
            Constant::E => self.e.prec(),
            Constant::Ln2 => self.ln2.prec(),
            Constant::Euler => self.euler.prec(),
        }
    }

    fn refresh_target(&self, c: Constant, p: usize) -> usize {
        let prev = self.cached_precision(c);
        if prev >= p {
            return p;
        }
        let target = self.policy.target(p, prev);
        tracing::debug!(constant = ?c, requested = p, target, "refreshing cached constant");
        target
    }

    /// Returns a ball containing π with precision `p`.
    pub fn pi(&mut self, p: usize) -> Ball {
        let k = self.refresh_target(Constant::Pi, p);
        self.pi.for_prec(k).set_round(p)
    }

    /// Returns a ball containing Euler's number with precision `p`.
    pub fn e(&mut self, p: usize) -> Ball {
        let k = self.refresh_target(Constant::E, p);
        self.e.for_prec(k).set_round(p)
    }

    /// Returns a ball containing the natural logarithm of 2 with precision `p`.
    pub fn ln2(&mut self, p: usize) -> Ball {
        let k = self.refresh_target(Constant::Ln2, p);
        self.ln2.for_prec(k).set_round(p)
    }

    /// Returns a ball containing the Euler–Mascheroni constant with precision `p`.
    pub fn euler(&mut self, p: usize) -> Ball {
        let k = self.refresh_target(Constant::Euler, p);
        let ln_n = if self.euler.prec() < k {
            Ball::from_u64(EulerCache::terms(k)).ln(k + 16, self)
        } else {
            Ball::zero_pm_inf()
        };
        self.euler.for_prec(k, &ln_n).set_round(p)
    }

    /// Returns the exponent tables, building them on first use.
    pub(crate) fn exp_tables(&mut self) -> &ExpTables {
        self.exp_tab.get_or_insert_with(ExpTables::new)
    }
}

impl Default for Consts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_policy() {
        assert_eq!(CachePolicy::Exact.target(100, 50), 100);
        assert_eq!(CachePolicy::Headroom(64).target(100, 50), 164);
        assert_eq!(CachePolicy::Doubling.target(100, 80), 160);
        assert_eq!(CachePolicy::Doubling.target(100, 0), 100);
        assert_eq!(CachePolicy::default(), CachePolicy::Headroom(DEFAULT_HEADROOM));
    }

    #[test]
    fn test_cache_monotonic() {
        let mut cc = Consts::with_policy(CachePolicy::Exact);
        assert_eq!(cc.cached_precision(Constant::Pi), 0);

        let a = cc.pi(200);
        assert_eq!(cc.cached_precision(Constant::Pi), 200);

        // lower precision is served from the cache
        let b = cc.pi(100);
        assert_eq!(cc.cached_precision(Constant::Pi), 200);
        assert!(a.overlaps(&b));

        let c = cc.pi(300);
        assert_eq!(cc.cached_precision(Constant::Pi), 300);
        assert!(b.overlaps(&c));

        let mut cc = Consts::with_policy(CachePolicy::Doubling);
        cc.ln2(100);
        cc.ln2(150);
        assert_eq!(cc.cached_precision(Constant::Ln2), 200);
        assert_eq!(cc.policy(), CachePolicy::Doubling);

        let mut cc = Consts::new();
        cc.e(100);
        assert_eq!(cc.cached_precision(Constant::E), 100 + DEFAULT_HEADROOM);
    }

    #[test]
    fn test_consts_values() {
        let mut cc = Consts::new();
        let p = 128;
        assert!((cc.pi(p).mid().to_f64() - core::f64::consts::PI).abs() < 1e-15);
        assert!((cc.e(p).mid().to_f64() - core::f64::consts::E).abs() < 1e-15);
        assert!((cc.ln2(p).mid().to_f64() - core::f64::consts::LN_2).abs() < 1e-16);
        assert!((cc.euler(p).mid().to_f64() - 0.5772156649015329).abs() < 1e-15);
        for c in [Constant::Pi, Constant::E, Constant::Ln2, Constant::Euler] {
            assert!(cc.cached_precision(c) >= p);
        }
        assert!(cc.euler(p).rel_accuracy_bits() > 120);
    }
}
