//! Deserialization of numbers and balls.
//!
//! Strings are parsed in the lossless text form. JSON numbers are accepted too:
//! integers and `f64` values convert exactly.

use core::fmt::Formatter;
use core::marker::PhantomData;
use core::str::FromStr;

use crate::ball::Ball;
use crate::defs::Error as NumError;
use crate::float::Float;
use crate::mag::Mag;
use serde::de::Error;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;

// Conversion of the numbers a deserializer can produce.
trait FromNumber: Sized + FromStr<Err = NumError> {
    fn from_float(f: Float) -> Result<Self, NumError>;
}

impl FromNumber for Float {
    fn from_float(f: Float) -> Result<Self, NumError> {
        Ok(f)
    }
}

impl FromNumber for Mag {
    fn from_float(f: Float) -> Result<Self, NumError> {
        if f.is_negative() || f.is_nan() {
            Err(NumError::InvalidArgument)
        } else {
            Ok(Mag::from_float_up(&f))
        }
    }
}

impl FromNumber for Ball {
    fn from_float(f: Float) -> Result<Self, NumError> {
        Ok(Ball::exact(f))
    }
}

struct TextVisitor<T> {
    marker: PhantomData<T>,
}

impl<T> TextVisitor<T> {
    fn new() -> Self {
        TextVisitor { marker: PhantomData }
    }
}

impl<'de, T: FromNumber> Visitor<'de> for TextVisitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut Formatter) -> core::fmt::Result {
        formatter.write_str("a string in the text form or a number")
    }

    fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
        T::from_float(Float::from_u64(v)).map_err(|e| Error::custom(format!("{e:?}")))
    }

    fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
        T::from_float(Float::from_i64(v)).map_err(|e| Error::custom(format!("{e:?}")))
    }

    fn visit_f64<E: Error>(self, v: f64) -> Result<Self::Value, E> {
        T::from_float(Float::from_f64(v)).map_err(|e| Error::custom(format!("{e:?}")))
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<T>().map_err(|e| Error::custom(format!("{e:?}")))
    }

    fn visit_string<E: Error>(self, v: String) -> Result<Self::Value, E> {
        self.visit_str(&v)
    }
}

macro_rules! impl_deserialize {
    ($t:ty) => {
        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(TextVisitor::<$t>::new())
            }
        }
    };
}

impl_deserialize!(Float);
impl_deserialize!(Mag);
impl_deserialize!(Ball);
