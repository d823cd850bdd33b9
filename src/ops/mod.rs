//! Operations on balls.

mod add;
mod atan;
mod cmp;
pub mod consts;
mod div;
mod exp;
mod log;
mod mul;
mod pow;
pub mod regime;
pub(crate) mod series;
mod sqrt;
mod trig;

pub use crate::ops::cmp::sum_sign;
pub use crate::ops::cmp::sum_sign_exact;
