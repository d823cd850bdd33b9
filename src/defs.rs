//! Definitions.

/// An exponent.
pub type Exponent = i64;

/// Maximum exponent value of a finite float.
pub const EXPONENT_MAX: Exponent = Exponent::MAX / 4;

/// Minimum exponent value of a finite float.
pub const EXPONENT_MIN: Exponent = -(Exponent::MAX / 4);

/// Default precision.
pub const DEFAULT_P: usize = 128;

/// Minimum precision of a ball midpoint.
pub const MIN_P: usize = 2;

/// Number of mantissa bits of a radius.
pub const MAG_BITS: usize = 30;

/// Number of extra bits kept by `trim` above the relative accuracy of a ball.
pub const TRIM_PADDING: i64 = 16;

/// Relative accuracy of an exact ball.
pub const ACCURACY_EXACT: i64 = i64::MAX;

/// Relative accuracy of a ball that carries no information.
pub const ACCURACY_NONE: i64 = -i64::MAX;

/// Sign.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum Sign {
    /// Negative.
    Neg = -1,

    /// Positive.
    Pos = 1,
}

impl Sign {
    /// Changes the sign to the opposite.
    pub fn invert(&self) -> Self {
        match *self {
            Sign::Pos => Sign::Neg,
            Sign::Neg => Sign::Pos,
        }
    }

    /// Returns true if `self` is positive.
    pub fn is_positive(&self) -> bool {
        *self == Sign::Pos
    }

    /// Returns true if `self` is negative.
    pub fn is_negative(&self) -> bool {
        *self == Sign::Neg
    }

    /// Returns 1 for the positive sign and -1 for the negative sign.
    pub fn to_int(&self) -> i8 {
        *self as i8
    }

    /// Sign of the product of two values with signs `self` and `other`.
    pub fn mul(&self, other: Sign) -> Sign {
        if *self == other {
            Sign::Pos
        } else {
            Sign::Neg
        }
    }
}

/// Possible errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The exponent value becomes greater than the upper limit of the range of exponent values.
    #[error("{} overflow", direction(.0))]
    ExponentOverflow(Sign),

    /// The exponent value becomes smaller than the lower limit of the range of exponent values.
    #[error("{} underflow", direction(.0))]
    ExponentUnderflow(Sign),

    /// Divisor is zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Invalid argument.
    #[error("invalid argument")]
    InvalidArgument,

    /// Worker pool could not be created.
    #[error("thread pool: {0}")]
    ThreadPool(String),
}

fn direction(s: &Sign) -> &'static str {
    if s.is_positive() {
        "positive"
    } else {
        "negative"
    }
}

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(e.to_string())
    }
}

/// Rounding modes.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash)]
pub enum RoundingMode {
    /// Round toward positive infinity.
    Up = 2,

    /// Round toward negative infinity.
    Down = 4,

    /// Round toward zero.
    ToZero = 8,

    /// Round away from zero.
    FromZero = 16,

    /// Round half to even.
    ToEven = 32,

    /// Round half to odd.
    ToOdd = 64,
}

impl RoundingMode {
    /// Rounding mode of the negated value: directed modes swap, the rest stay.
    pub fn invert(&self) -> Self {
        match *self {
            RoundingMode::Up => RoundingMode::Down,
            RoundingMode::Down => RoundingMode::Up,
            rm => rm,
        }
    }
}
