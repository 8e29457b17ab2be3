// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for Roughtime message parsing and response validation.
//!
//! [`ParseError`] covers wire-level violations of the tag-value container
//! format. [`ValidationError`] is the categorized cause a client sees when a
//! response fails verification; parse failures inside nested messages
//! propagate through it unwrapped via `From<ParseError>`.

use std::fmt;

use chrono::DateTime;

use crate::tag::Tag;

/// Errors that can occur while parsing the tag-value message container.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The buffer is shorter than the structure requires.
    TooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// The total message length is not a multiple of 4.
    Unaligned {
        /// The offending length.
        length: usize,
    },
    /// The tag count exceeds the supported maximum (65535).
    InvalidNumTags {
        /// The tag count read from the header.
        value: u32,
    },
    /// A value offset is not a multiple of 4.
    OffsetUnaligned {
        /// Zero-based position in the offset vector.
        index: usize,
        /// The offending offset.
        offset: u32,
    },
    /// A value offset exceeds the value region or runs backwards.
    OffsetOverflow {
        /// Zero-based position in the offset vector.
        index: usize,
        /// The offending offset.
        offset: u32,
        /// Length of the value region in bytes.
        limit: usize,
    },
    /// Tags are not in strictly increasing little-endian `u32` order.
    TagsNotIncreasing {
        /// The tag that violated the ordering.
        current: Tag,
        /// The tag read immediately before it.
        previous: Tag,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::TooShort { needed, available } => {
                write!(
                    f,
                    "message too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            ParseError::Unaligned { length } => {
                write!(f, "message length not a multiple of 4: {}", length)
            }
            ParseError::InvalidNumTags { value } => {
                write!(f, "invalid num_tags value {}", value)
            }
            ParseError::OffsetUnaligned { index, offset } => {
                write!(f, "offset {} not a multiple of 4: {}", index, offset)
            }
            ParseError::OffsetOverflow {
                index,
                offset,
                limit,
            } => {
                write!(
                    f,
                    "offset {} overflow: {} exceeds value region of {} bytes",
                    index, offset, limit
                )
            }
            ParseError::TagsNotIncreasing { current, previous } => {
                write!(
                    f,
                    "tags not strictly increasing: current '{}' (0x{:08x}), previous '{}' (0x{:08x})",
                    current,
                    current.value(),
                    previous,
                    previous.value()
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for std::io::Error {
    fn from(err: ParseError) -> std::io::Error {
        let kind = match &err {
            ParseError::TooShort { .. } => std::io::ErrorKind::UnexpectedEof,
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}

/// A failure of the Ed25519 signature chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SignatureError {
    /// The SIG inside CERT is not 64 bytes.
    CertificateSignatureLength {
        /// The length encountered.
        actual: usize,
    },
    /// The top-level SIG is not 64 bytes.
    ResponseSignatureLength {
        /// The length encountered.
        actual: usize,
    },
    /// The PUBK inside DELE is not 32 bytes.
    PublicKeyLength {
        /// The length encountered.
        actual: usize,
    },
    /// The long-term key did not sign this DELE.
    DelegationMismatch,
    /// The delegated key did not sign this SREP.
    ResponseMismatch,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureError::CertificateSignatureLength { actual } => {
                write!(f, "CERT SIG value is the wrong length: {}", actual)
            }
            SignatureError::ResponseSignatureLength { actual } => {
                write!(f, "top-level SIG is the wrong length: {}", actual)
            }
            SignatureError::PublicKeyLength { actual } => {
                write!(f, "delegated public key is the wrong length: {}", actual)
            }
            SignatureError::DelegationMismatch => {
                write!(f, "delegation signature does not match")
            }
            SignatureError::ResponseMismatch => {
                write!(f, "response signature does not match")
            }
        }
    }
}

/// A failure of the Merkle inclusion proof.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MerkleError {
    /// A single-nonce response's ROOT does not equal the nonce's leaf hash.
    NonceNotFound,
    /// PATH is not a whole number of 64-byte sibling hashes.
    PathUnaligned {
        /// The PATH length encountered.
        length: usize,
    },
    /// Exactly one of PATH-empty / INDX-zero holds, which no batch shape
    /// produces.
    PathIndexConflict {
        /// The PATH length encountered.
        path_len: usize,
        /// The INDX value encountered.
        index: u32,
    },
    /// Index bits remained after consuming PATH: the proof is shallower
    /// than the leaf index implies.
    DepthMismatch {
        /// The index bits left over.
        remaining: u32,
    },
    /// Walking the proof did not reproduce ROOT.
    RootMismatch,
}

impl fmt::Display for MerkleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MerkleError::NonceNotFound => {
                write!(f, "nonce not found in response Merkle tree")
            }
            MerkleError::PathUnaligned { length } => {
                write!(f, "PATH length not a multiple of 64: {}", length)
            }
            MerkleError::PathIndexConflict { path_len, index } => {
                write!(
                    f,
                    "invalid proof state: path length {}, index {}",
                    path_len, index
                )
            }
            MerkleError::DepthMismatch { remaining } => {
                write!(
                    f,
                    "proof shallower than leaf index implies: {:#x} index bits remain",
                    remaining
                )
            }
            MerkleError::RootMismatch => {
                write!(f, "inclusion proof does not reach ROOT")
            }
        }
    }
}

/// Categorized reasons a Roughtime response fails validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ValidationError {
    /// The response or a nested message violated the wire format.
    Parse(ParseError),
    /// A required tag is missing.
    MissingTag {
        /// The tag that was expected.
        tag: Tag,
    },
    /// A fixed-size tag value has an unexpected length.
    TagLength {
        /// The tag whose value was malformed.
        tag: Tag,
        /// The expected length.
        expected: usize,
        /// The length encountered.
        actual: usize,
    },
    /// The Ed25519 signature chain failed.
    SignatureInvalid(SignatureError),
    /// The Merkle inclusion proof failed.
    MerkleTreeInvalid(MerkleError),
    /// MIDP lies outside [MINT, MAXT] under unsigned comparison.
    MidpointInvalid {
        /// The midpoint reported by the server (microseconds).
        midpoint: u64,
        /// The delegation's earliest valid midpoint (microseconds).
        min_t: u64,
        /// The delegation's latest valid midpoint (microseconds).
        max_t: u64,
    },
}

/// Render microseconds since the Unix epoch in calendar form, falling back
/// to the raw count when the value exceeds chrono's representable range.
fn fmt_epoch_micros(f: &mut fmt::Formatter<'_>, micros: u64) -> fmt::Result {
    let calendar = i64::try_from(micros)
        .ok()
        .and_then(DateTime::from_timestamp_micros);
    match calendar {
        Some(utc) => write!(f, "{}", utc),
        None => write!(f, "{} us", micros),
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Parse(e) => e.fmt(f),
            ValidationError::MissingTag { tag } => {
                write!(f, "missing required tag: {}", tag)
            }
            ValidationError::TagLength {
                tag,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "tag {} has invalid length: expected {}, got {}",
                    tag, expected, actual
                )
            }
            ValidationError::SignatureInvalid(e) => e.fmt(f),
            ValidationError::MerkleTreeInvalid(e) => e.fmt(f),
            ValidationError::MidpointInvalid {
                midpoint,
                min_t,
                max_t,
            } => {
                write!(f, "midpoint outside delegation bounds: midp=")?;
                fmt_epoch_micros(f, *midpoint)?;
                write!(f, ", bounds=[")?;
                fmt_epoch_micros(f, *min_t)?;
                write!(f, ", ")?;
                fmt_epoch_micros(f, *max_t)?;
                write!(f, "]")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ParseError> for ValidationError {
    fn from(err: ParseError) -> Self {
        ValidationError::Parse(err)
    }
}

impl From<SignatureError> for ValidationError {
    fn from(err: SignatureError) -> Self {
        ValidationError::SignatureInvalid(err)
    }
}

impl From<MerkleError> for ValidationError {
    fn from(err: MerkleError) -> Self {
        ValidationError::MerkleTreeInvalid(err)
    }
}

impl From<ValidationError> for std::io::Error {
    fn from(err: ValidationError) -> std::io::Error {
        let kind = match &err {
            ValidationError::Parse(ParseError::TooShort { .. }) => {
                std::io::ErrorKind::UnexpectedEof
            }
            _ => std::io::ErrorKind::InvalidData,
        };
        std::io::Error::new(kind, err)
    }
}
