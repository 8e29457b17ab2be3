// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Little-endian integer extraction for fixed-size tag values.

use crate::error::ValidationError;
use crate::tag::Tag;

/// Extract a `u32` (LE) from a tag value that must be exactly 4 bytes.
pub(crate) fn read_u32_le(data: &[u8], tag: Tag) -> Result<u32, ValidationError> {
    if data.len() != 4 {
        return Err(ValidationError::TagLength {
            tag,
            expected: 4,
            actual: data.len(),
        });
    }
    Ok(u32::from_le_bytes([data[0], data[1], data[2], data[3]]))
}

/// Extract a `u64` (LE) from a tag value that must be exactly 8 bytes.
pub(crate) fn read_u64_le(data: &[u8], tag: Tag) -> Result<u64, ValidationError> {
    if data.len() != 8 {
        return Err(ValidationError::TagLength {
            tag,
            expected: 8,
            actual: data.len(),
        });
    }
    Ok(u64::from_le_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u32_le() {
        let data = 99u32.to_le_bytes();
        assert_eq!(read_u32_le(&data, Tag::Radi).unwrap(), 99);
    }

    #[test]
    fn test_read_u32_le_wrong_length() {
        assert_eq!(
            read_u32_le(&[0; 8], Tag::Indx),
            Err(ValidationError::TagLength {
                tag: Tag::Indx,
                expected: 4,
                actual: 8,
            })
        );
    }

    #[test]
    fn test_read_u64_le() {
        let data = 42u64.to_le_bytes();
        assert_eq!(read_u64_le(&data, Tag::Midp).unwrap(), 42);
    }

    #[test]
    fn test_read_u64_le_wrong_length() {
        assert_eq!(
            read_u64_le(&[0; 4], Tag::Midp),
            Err(ValidationError::TagLength {
                tag: Tag::Midp,
                expected: 8,
                actual: 4,
            })
        );
    }

    #[test]
    fn test_read_u64_le_high_bit() {
        // Values past 2^63 must come through without sign extension.
        let data = u64::MAX.to_le_bytes();
        assert_eq!(read_u64_le(&data, Tag::Maxt).unwrap(), u64::MAX);
    }
}
