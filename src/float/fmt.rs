//! Text representation.
//!
//! Finite values are written as a hexadecimal mantissa and a binary exponent, e.g. `-0x1bp-3`,
//! which keeps the conversion exact in both directions.

use super::Float;
use crate::defs::{Error, Exponent, Sign};
use core::fmt::{Display, Formatter};
use core::str::FromStr;
use num_bigint::BigUint;

impl Display for Float {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Float::Zero => f.write_str("0"),
            Float::NaN => f.write_str("nan"),
            Float::Inf(Sign::Pos) => f.write_str("inf"),
            Float::Inf(Sign::Neg) => f.write_str("-inf"),
            Float::Finite { s, m, e } => {
                if s.is_negative() {
                    f.write_str("-")?;
                }
                write!(f, "0x{}p{}", m.to_str_radix(16), e)
            }
        }
    }
}

impl FromStr for Float {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self, Error> {
        let src = src.trim();
        match src {
            "0" | "-0" | "+0" => return Ok(Float::Zero),
            "nan" | "NaN" => return Ok(Float::NaN),
            "inf" | "+inf" => return Ok(Float::Inf(Sign::Pos)),
            "-inf" => return Ok(Float::Inf(Sign::Neg)),
            _ => {}
        }

        let (s, rest) = match src.strip_prefix('-') {
            Some(rest) => (Sign::Neg, rest),
            None => (Sign::Pos, src.strip_prefix('+').unwrap_or(src)),
        };

        let rest = rest
            .strip_prefix("0x")
            .or_else(|| rest.strip_prefix("0X"))
            .ok_or(Error::InvalidArgument)?;

        let (digits, exp) = match rest.find(|c: char| c == 'p' || c == 'P') {
            Some(pos) => {
                let e = rest[pos + 1..].parse::<Exponent>().map_err(|_| Error::InvalidArgument)?;
                (&rest[..pos], e)
            }
            None => (rest, 0),
        };

        if digits.is_empty() {
            return Err(Error::InvalidArgument);
        }

        let m = BigUint::parse_bytes(digits.as_bytes(), 16).ok_or(Error::InvalidArgument)?;
        Float::from_parts(s, m, exp)
    }
}
