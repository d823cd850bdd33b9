//! Ball: a floating point midpoint together with an error radius.

mod accuracy;

use crate::defs::{Error, Exponent, RoundingMode, Sign, EXPONENT_MIN, MIN_P};
use crate::float::Float;
use crate::mag::Mag;
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use num_bigint::BigInt;

/// A ball `[mid - rad, mid + rad]` which is guaranteed to contain the exact value.
///
/// The ball is exact if its radius is zero. The indeterminate ball has a NaN
/// midpoint; it contains everything and propagates through every operation.
/// A ball with an infinite radius and a finite midpoint is the whole real line,
/// and a ball with an infinite midpoint and a finite radius is that infinity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ball {
    pub(crate) mid: Float,
    pub(crate) rad: Mag,
}

impl Ball {
    /// Constructs a ball from a midpoint and a radius. A NaN midpoint gives the indeterminate ball.
    pub fn new(mid: Float, rad: Mag) -> Self {
        if mid.is_nan() {
            Self::indeterminate()
        } else {
            Ball { mid, rad }
        }
    }

    /// Exact ball holding `mid`.
    pub fn exact(mid: Float) -> Self {
        Self::new(mid, Mag::Zero)
    }

    /// Exact zero.
    pub fn zero() -> Self {
        Self::exact(Float::Zero)
    }

    /// Exact one.
    pub fn one() -> Self {
        Self::exact(Float::from_u64(1))
    }

    /// Exact ball holding the integer `i`.
    pub fn from_i64(i: i64) -> Self {
        Self::exact(Float::from_i64(i))
    }

    /// Exact ball holding the integer `u`.
    pub fn from_u64(u: u64) -> Self {
        Self::exact(Float::from_u64(u))
    }

    /// Exact ball holding the integer `i`.
    pub fn from_bigint(i: &BigInt) -> Self {
        Self::exact(Float::from_bigint(i))
    }

    /// Exact ball holding the value of `f`. NaN gives the indeterminate ball.
    pub fn from_f64(f: f64) -> Self {
        Self::exact(Float::from_f64(f))
    }

    /// Ball containing `a / b` with precision `p`.
    pub fn from_ratio(a: i64, b: i64, p: usize) -> Self {
        Self::from_i64(a).div(&Self::from_i64(b), p)
    }

    /// Ball containing `a / b` with precision `p`.
    pub fn from_big_ratio(a: &BigInt, b: &BigInt, p: usize) -> Self {
        Self::from_bigint(a).div(&Self::from_bigint(b), p)
    }

    /// Ball with midpoint `mid` and radius not less than `|err|`.
    pub fn with_error(mid: Float, err: &Float) -> Self {
        Self::new(mid, Mag::from_float_up(err))
    }

    /// Ball with midpoint `f` and radius not less than `|err|`.
    pub fn from_f64_with_error(f: f64, err: f64) -> Self {
        Self::with_error(Float::from_f64(f), &Float::from_f64(err))
    }

    /// The point positive infinity.
    pub fn pos_inf() -> Self {
        Self::exact(Float::Inf(Sign::Pos))
    }

    /// The point negative infinity.
    pub fn neg_inf() -> Self {
        Self::exact(Float::Inf(Sign::Neg))
    }

    /// The indeterminate ball.
    pub fn indeterminate() -> Self {
        Ball {
            mid: Float::NaN,
            rad: Mag::Inf,
        }
    }

    /// Zero with an infinite radius, i.e. the whole real line.
    pub fn zero_pm_inf() -> Self {
        Ball {
            mid: Float::Zero,
            rad: Mag::Inf,
        }
    }

    /// The ball `[-1, 1]`.
    pub fn zero_pm_one() -> Self {
        Ball {
            mid: Float::Zero,
            rad: Mag::one(),
        }
    }

    /// Returns a random ball with precision `p`, midpoint exponent in the range from `exp_from`
    /// to `exp_to`, and a radius of a few units in the last place.
    ///
    /// ## Errors
    ///
    ///  - InvalidArgument: `p` is zero or `exp_from` is greater than `exp_to`.
    #[cfg(feature = "random")]
    pub fn random(p: usize, exp_from: Exponent, exp_to: Exponent) -> Result<Self, Error> {
        let mid = Float::random_normal(p, exp_from, exp_to)?;
        let ulps = rand::random::<u64>() % 16;
        let rad = Mag::from_u64(ulps).mul(&Mag::ulp(&mid, p));
        Ok(Self::new(mid, rad))
    }

    /// Midpoint.
    pub fn mid(&self) -> &Float {
        &self.mid
    }

    /// Radius.
    pub fn rad(&self) -> &Mag {
        &self.rad
    }

    /// Returns true if the radius is zero.
    pub fn is_exact(&self) -> bool {
        self.rad.is_zero()
    }

    /// Returns true if `self` is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.mid.is_zero() && self.rad.is_zero()
    }

    /// Returns true if both the midpoint and the radius are finite.
    pub fn is_finite(&self) -> bool {
        self.mid.is_finite() && !self.rad.is_inf()
    }

    /// Returns true if `self` is the indeterminate ball.
    pub fn is_indeterminate(&self) -> bool {
        self.mid.is_nan()
    }

    /// Returns true if `self` is an exact integer.
    pub fn is_int(&self) -> bool {
        self.is_exact() && self.mid.is_int()
    }

    /// Rounds the midpoint to precision `p` and adds the rounding error to the radius.
    pub fn set_round(&self, p: usize) -> Self {
        let p = p.max(MIN_P);
        Self::from_rounded(self.mid.round(p, RoundingMode::ToZero), self.rad, p)
    }

    /// Adds `err` to the radius.
    pub fn add_error(&self, err: &Mag) -> Self {
        if self.is_indeterminate() {
            return Self::indeterminate();
        }
        Ball {
            mid: self.mid.clone(),
            rad: self.rad.add(err),
        }
    }

    /// Lower bound of the ball rounded to precision `p`.
    pub fn lower_bound(&self, p: usize) -> Float {
        self.bound(p, RoundingMode::Down)
    }

    /// Upper bound of the ball rounded to precision `p`.
    pub fn upper_bound(&self, p: usize) -> Float {
        self.bound(p, RoundingMode::Up)
    }

    fn bound(&self, p: usize, rm: RoundingMode) -> Float {
        let p = p.max(MIN_P);
        if self.mid.is_nan() {
            return Float::NaN;
        }
        let r = self.rad.to_float();
        let r = if rm == RoundingMode::Down { r.neg() } else { r };
        match self.mid.add(&r, p, rm) {
            Ok((v, _)) => v,
            Err(e) => error_to_bound(&e, rm),
        }
    }

    /// Upper bound of the absolute value of every point of the ball.
    pub fn mag_upper(&self) -> Mag {
        Mag::from_float_up(&self.mid).add(&self.rad)
    }

    /// Lower bound of the absolute value of every point of the ball.
    pub fn mag_lower(&self) -> Mag {
        Mag::from_float_lower(&self.mid).sub_lower(&self.rad)
    }

    // Ball from the result of a midpoint rounding to `p` bits with radius `rad`
    // accumulated before rounding.
    pub(crate) fn from_rounded(r: Result<(Float, bool), Error>, rad: Mag, p: usize) -> Self {
        match r {
            Ok((mid, inexact)) => {
                if mid.is_nan() {
                    return Self::indeterminate();
                }
                let rad = if inexact { rad.add(&Mag::ulp(&mid, p)) } else { rad };
                Ball { mid, rad }
            }
            Err(e) => Self::from_range_error(&e, rad),
        }
    }

    // Conservative ball for a midpoint which left the exponent range.
    pub(crate) fn from_range_error(e: &Error, rad: Mag) -> Self {
        match e {
            Error::ExponentOverflow(_) => Self::zero_pm_inf(),
            Error::ExponentUnderflow(_) => Ball {
                mid: Float::Zero,
                rad: rad.add(&Mag::from_2exp(EXPONENT_MIN)),
            },
            _ => Self::indeterminate(),
        }
    }
}

// Outward rounded bound for a result outside of the exponent range.
fn error_to_bound(e: &Error, rm: RoundingMode) -> Float {
    let tiny = |s| Float::from_parts_exact(s, 1u32.into(), EXPONENT_MIN - 1);
    match (e, rm) {
        (Error::ExponentOverflow(s), _) => Float::Inf(*s),
        (Error::ExponentUnderflow(Sign::Neg), RoundingMode::Down) => tiny(Sign::Neg),
        (Error::ExponentUnderflow(Sign::Pos), RoundingMode::Up) => tiny(Sign::Pos),
        (Error::ExponentUnderflow(_), _) => Float::Zero,
        _ => Float::NaN,
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::zero()
    }
}

impl Display for Ball {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{} +/- {}]", self.mid, self.rad)
    }
}

impl FromStr for Ball {
    type Err = Error;

    /// Parses `[mid +/- rad]`, or a single float as an exact ball.
    fn from_str(src: &str) -> Result<Self, Error> {
        let src = src.trim();
        match src.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Some(inner) => {
                let (m, r) = inner.split_once("+/-").ok_or(Error::InvalidArgument)?;
                Ok(Self::new(m.parse()?, r.parse()?))
            }
            None => Ok(Self::exact(src.parse()?)),
        }
    }
}
