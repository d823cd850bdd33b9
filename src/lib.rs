//! Astro-ball is a library of arbitrary precision ball arithmetic.
//!
//! A ball is a floating point midpoint together with an error radius. Every operation
//! returns a ball which is guaranteed to contain the exact result of the operation applied
//! to any values contained in the operand balls, regardless of the rounding performed
//! during the computation.
//!
//! ```
//! use astro_ball::Ball;
//! use astro_ball::Consts;
//!
//! // Initialize mathematical constants cache
//! let mut cc = Consts::new();
//!
//! // 0.6 is not exactly representable, but the ball contains it
//! let x = Ball::from_ratio(3, 5, 128);
//! let y = x.exp(128, &mut cc).ln(128, &mut cc);
//! assert!(y.overlaps(&x));
//!
//! // a divisor which may be zero gives the whole line
//! let z = Ball::one().div(&Ball::from_f64_with_error(1.0, 2.0), 128);
//! assert!(!z.is_finite());
//! ```

#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::module_inception)]

mod ball;
mod common;
pub mod ctx;
mod defs;
mod float;
mod mag;
mod ops;
pub mod par;

#[cfg(feature = "serde")]
mod for_3rd;

pub use crate::ball::Ball;
pub use crate::ctx::Context;
pub use crate::defs::Error;
pub use crate::defs::Exponent;
pub use crate::defs::RoundingMode;
pub use crate::defs::Sign;
pub use crate::float::Float;
pub use crate::mag::Mag;
pub use crate::ops::consts::CachePolicy;
pub use crate::ops::consts::Constant;
pub use crate::ops::consts::Consts;
pub use crate::ops::regime::Regime;
pub use crate::ops::sum_sign;
pub use crate::ops::sum_sign_exact;
pub use crate::par::sum_series;
pub use crate::par::Executor;
pub use crate::par::Parallel;
pub use crate::par::Sequential;

pub use crate::defs::ACCURACY_EXACT;
pub use crate::defs::ACCURACY_NONE;
pub use crate::defs::DEFAULT_P;
pub use crate::defs::EXPONENT_MAX;
pub use crate::defs::EXPONENT_MIN;
pub use crate::defs::MAG_BITS;
pub use crate::defs::MIN_P;
pub use crate::defs::TRIM_PADDING;
pub use crate::ops::consts::DEFAULT_HEADROOM;
pub use crate::ops::regime::EXP_TAB_PREC;
pub use crate::ops::regime::TRIG_HUGE_EXP;
