//! Serialization of numbers and balls.
//! Values are serialized to their lossless text form.

use crate::ball::Ball;
use crate::float::Float;
use crate::mag::Mag;
use serde::Serialize;
use serde::Serializer;

macro_rules! impl_serialize {
    ($t:ty) => {
        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }
    };
}

impl_serialize!(Float);
impl_serialize!(Mag);
impl_serialize!(Ball);

#[cfg(test)]
mod tests {
    use serde_json::to_string;

    use crate::ball::Ball;
    use crate::float::Float;
    use crate::mag::Mag;

    #[test]
    fn to_json() {
        assert_eq!(to_string(&Float::Zero).unwrap(), "\"0\"");
        assert_eq!(to_string(&Float::from_f64(-0.375)).unwrap(), "\"-0x3p-3\"");
        assert_eq!(to_string(&Mag::from_u64(5)).unwrap(), "\"0x5p0\"");
        assert_eq!(
            to_string(&Ball::from_f64_with_error(1.5, 0.25)).unwrap(),
            "\"[0x3p-1 +/- 0x1p-2]\""
        );
        assert_eq!(to_string(&Ball::indeterminate()).unwrap(), "\"[nan +/- inf]\"");
    }
}
