// Copyright 2020-2024 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Checksum protected text form of big integers.
//!
//! A value is written as `bigintcs:` followed by its hex digits in groups of
//! six (left padded with `0`, an optional leading `-` for negative values) and
//! a trailing group of six uppercase hex digits holding the checksum:
//!
//! ```text
//! bigintcs:-000064-BBC6EC
//! ```
//!
//! The checksum is the first three bytes of the MD5 digest of the lower-cased
//! signed hex payload, written in reverse byte order. A single mistyped
//! character is detected when the string is decoded.

use md5::{Digest, Md5};
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Prefix every encoded value starts with.
pub const PREFIX: &str = "bigintcs:";

const GROUP_WIDTH: usize = 6;

/// A big integer in its checksum protected form.
///
/// `hex_digits` carries the sign and the zero padded lower-case hex payload
/// without group separators, `checksum` the six uppercase hex checksum digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigIntChecksum {
    hex_digits: String,
    checksum: String,
}

impl BigIntChecksum {
    pub fn from_big_int(value: &BigInt) -> Self {
        let mut magnitude = value.abs().to_str_radix(16);
        let padding = (GROUP_WIDTH - magnitude.len() % GROUP_WIDTH) % GROUP_WIDTH;
        magnitude.insert_str(0, &"0".repeat(padding));

        let hex_digits = if value.is_negative() {
            format!("-{}", magnitude)
        } else {
            magnitude
        };
        let checksum = checksum_of(&hex_digits);
        BigIntChecksum {
            hex_digits,
            checksum,
        }
    }

    pub fn to_big_int(&self) -> BigInt {
        let (negative, digits) = split_sign(&self.hex_digits);
        let magnitude = BigInt::parse_bytes(digits.as_bytes(), 16).unwrap_or_else(BigInt::zero);
        if negative {
            -magnitude
        } else {
            magnitude
        }
    }

    pub fn hex_digits(&self) -> &str {
        &self.hex_digits
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

impl fmt::Display for BigIntChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (negative, digits) = split_sign(&self.hex_digits);
        f.write_str(PREFIX)?;
        if negative {
            f.write_str("-")?;
        }
        for (i, group) in digits.as_bytes().chunks(GROUP_WIDTH).enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            // chunks of an ascii hex string stay valid utf-8
            f.write_str(std::str::from_utf8(group).map_err(|_| fmt::Error)?)?;
        }
        write!(f, "-{}", self.checksum)
    }
}

impl FromStr for BigIntChecksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode(s).map(|value| BigIntChecksum::from_big_int(&value))
    }
}

/// Encodes `value` in its canonical `bigintcs:` form.
pub fn encode(value: &BigInt) -> String {
    BigIntChecksum::from_big_int(value).to_string()
}

/// Decodes a `bigintcs:` string, verifying its checksum.
pub fn decode(s: &str) -> Result<BigInt> {
    let body = s
        .trim()
        .strip_prefix(PREFIX)
        .ok_or_else(|| Error::Format(format!("'{}' does not start with '{}'", s, PREFIX)))?;
    let (negative, body) = split_sign(body);

    let segments: Vec<&str> = body.split('-').collect();
    let (found, groups) = match segments.split_last() {
        Some((found, groups)) if !groups.is_empty() => (*found, groups),
        _ => {
            return Err(Error::Format(format!(
                "'{}' needs at least one value group and a checksum group",
                s
            )))
        }
    };

    let digits = groups.concat().to_lowercase();
    let signed_digits = if negative {
        format!("-{}", digits)
    } else {
        digits.clone()
    };
    if groups.iter().any(|group| group.is_empty()) {
        return Err(Error::Format(format!("'{}' contains an empty group", s)));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Format(format!("'{}' contains non hex digits", s)));
    }

    let expected = checksum_of(&signed_digits);
    if !expected.eq_ignore_ascii_case(found) {
        return Err(Error::ChecksumMismatch {
            expected,
            found: found.to_string(),
        });
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| Error::Format(format!("'{}' is not a hex number", s)))?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// Like [`decode`] but swallows every failure.
pub fn try_decode(s: &str) -> Option<BigInt> {
    decode(s).ok()
}

/// Reads either a `bigintcs:` string or a plain decimal integer.
pub fn parse_lenient(s: &str) -> Result<BigInt> {
    if let Some(value) = try_decode(s) {
        return Ok(value);
    }
    let trimmed = s.trim();
    if trimmed.starts_with(PREFIX) {
        // report why the checksum form was rejected
        return decode(trimmed);
    }
    BigInt::from_str(trimmed)
        .map_err(|_| Error::Format(format!("'{}' is neither bigintcs nor a decimal integer", s)))
}

fn checksum_of(signed_hex: &str) -> String {
    let digest = Md5::digest(signed_hex.to_lowercase().as_bytes());
    format!("{:02X}{:02X}{:02X}", digest[2], digest[1], digest[0])
}

fn split_sign(s: &str) -> (bool, &str) {
    match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_known_values() {
        assert_eq!(encode(&BigInt::from(-100)), "bigintcs:-000064-BBC6EC");
        assert_eq!(encode(&BigInt::from(0)), "bigintcs:000000-140B67");
        assert_eq!(encode(&BigInt::from(45654)), "bigintcs:00b256-D73DF6");
        assert_eq!(encode(&BigInt::from(59561)), "bigintcs:00e8a9-7425C4");
    }

    #[test]
    fn test_encode_multiple_groups() {
        let value = (BigInt::from(1) << 48) + BigInt::from(5);
        assert_eq!(encode(&value), "bigintcs:000001-000000-000005-1A362E");
        assert_eq!(encode(&-value), "bigintcs:-000001-000000-000005-A8FA10");
    }

    #[test]
    fn test_decode_roundtrip() {
        for v in [-100i64, 0, 1, 45654, 59561, i64::MAX, i64::MIN] {
            let value = BigInt::from(v);
            assert_eq!(decode(&encode(&value)).unwrap(), value);
        }
        let big = num_traits::pow(BigInt::from(3), 200);
        assert_eq!(decode(&encode(&big)).unwrap(), big);
        assert_eq!(decode(&encode(&-big.clone())).unwrap(), -big);
    }

    #[test]
    fn test_decode_ignores_case() {
        assert_eq!(decode("bigintcs:-000064-bbc6ec").unwrap(), BigInt::from(-100));
        assert_eq!(decode("bigintcs:00B256-d73df6").unwrap(), BigInt::from(45654));
    }

    #[test]
    fn test_decode_detects_single_character_change() {
        let encoded = "bigintcs:00b256-D73DF6";
        let start = PREFIX.len();
        for (i, c) in encoded.char_indices().skip(start) {
            if c == '-' {
                continue;
            }
            for alt in "0123456789abcdef".chars() {
                if alt.eq_ignore_ascii_case(&c) {
                    continue;
                }
                let mut mutated = encoded.to_string();
                mutated.replace_range(i..i + 1, &alt.to_string());
                match decode(&mutated) {
                    Err(Error::ChecksumMismatch { .. }) => {}
                    other => panic!("{} decoded as {:?}", mutated, other),
                }
            }
        }
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode("000064-BBC6EC"), Err(Error::Format(_))));
        assert!(matches!(decode("bigintcs:"), Err(Error::Format(_))));
        assert!(matches!(decode("bigintcs:BBC6EC"), Err(Error::Format(_))));
        assert!(matches!(decode("bigintcs:-BBC6EC"), Err(Error::Format(_))));
        assert!(matches!(
            decode("bigintcs:-000064-BBC6ED"),
            Err(Error::ChecksumMismatch { .. })
        ));
        assert_eq!(try_decode("bigintcs:-000064"), None);
    }

    #[test]
    fn test_decode_reports_format_before_checksum() {
        // a character that can never be hex is a format problem, whatever the checksum says
        assert!(matches!(decode("bigintcs:00g256-D73DF6"), Err(Error::Format(_))));
        assert!(matches!(decode("bigintcs:00b2 6-D73DF6"), Err(Error::Format(_))));
        assert!(matches!(decode("bigintcs:00b256--D73DF6"), Err(Error::Format(_))));
        assert!(matches!(decode("bigintcs:-00b256-D73DF6"), Err(Error::ChecksumMismatch { .. })));
        assert_eq!(try_decode("12345"), None);
    }

    #[test]
    fn test_value_type() {
        let parsed: BigIntChecksum = "bigintcs:-000064-bbc6ec".parse().unwrap();
        assert_eq!(parsed.hex_digits(), "-000064");
        assert_eq!(parsed.checksum(), "BBC6EC");
        assert_eq!(parsed.to_big_int(), BigInt::from(-100));
        assert_eq!(parsed.to_string(), "bigintcs:-000064-BBC6EC");
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(parse_lenient(" 45654 ").unwrap(), BigInt::from(45654));
        assert_eq!(
            parse_lenient("bigintcs:00b256-D73DF6").unwrap(),
            BigInt::from(45654)
        );
        assert!(matches!(
            parse_lenient("bigintcs:00b256-D73DF7"),
            Err(Error::ChecksumMismatch { .. })
        ));
        assert!(matches!(parse_lenient("forty"), Err(Error::Format(_))));
    }
}
