//! Static constants.

use crate::float::Float;
use lazy_static::lazy_static;

lazy_static! {

    /// 1
    pub(crate) static ref ONE: Float = Float::from_u64(1);
}
