// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Roughtime tag registry.
//!
//! Tags are 32-bit identifiers whose wire form is four bytes, usually the
//! ASCII mnemonic (`NONC`, `SREP`, ...). Two mnemonics carry a non-ASCII
//! final byte: `PAD` ends in `0xFF` and `SIG` ends in `0x00`. Messages sort
//! tags by the little-endian `u32` reading of the wire bytes, which makes
//! `PAD` the numerically largest known tag.

use std::cmp::Ordering;
use std::fmt;

/// A Roughtime protocol tag.
///
/// Known tags carry protocol semantics; anything else parses as
/// [`Tag::Unknown`] with the raw wire bytes preserved, so no information is
/// lost and comparisons stay total.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Tag {
    /// Certificate: a nested message holding DELE and a SIG by the long-term key.
    Cert,
    /// Delegation: a nested message holding PUBK, MINT, and MAXT.
    Dele,
    /// The client's leaf index in the response Merkle tree (u32 LE).
    Indx,
    /// Latest midpoint the delegated key may sign (u64 LE microseconds).
    Maxt,
    /// Midpoint timestamp (u64 LE microseconds since the Unix epoch).
    Midp,
    /// Earliest midpoint the delegated key may sign (u64 LE microseconds).
    Mint,
    /// Client nonce (64 bytes).
    Nonc,
    /// Request padding (wire bytes `PAD\xff`).
    Pad,
    /// Concatenated 64-byte Merkle sibling hashes, leaf to root.
    Path,
    /// Delegated Ed25519 public key (32 bytes).
    Pubk,
    /// Radius of uncertainty around the midpoint (u32 LE microseconds).
    Radi,
    /// Merkle tree root (64-byte SHA-512 digest).
    Root,
    /// Ed25519 signature (64 bytes, wire bytes `SIG\0`).
    Sig,
    /// Signed response: a nested message holding ROOT, MIDP, and RADI.
    Srep,
    /// A tag this implementation has no semantics for.
    Unknown([u8; 4]),
}

impl Tag {
    /// The four wire bytes of this tag.
    pub const fn wire(self) -> [u8; 4] {
        match self {
            Tag::Cert => *b"CERT",
            Tag::Dele => *b"DELE",
            Tag::Indx => *b"INDX",
            Tag::Maxt => *b"MAXT",
            Tag::Midp => *b"MIDP",
            Tag::Mint => *b"MINT",
            Tag::Nonc => *b"NONC",
            Tag::Pad => [0x50, 0x41, 0x44, 0xFF],
            Tag::Path => *b"PATH",
            Tag::Pubk => *b"PUBK",
            Tag::Radi => *b"RADI",
            Tag::Root => *b"ROOT",
            Tag::Sig => [0x53, 0x49, 0x47, 0x00],
            Tag::Srep => *b"SREP",
            Tag::Unknown(raw) => raw,
        }
    }

    /// Resolve four wire bytes to a tag, falling back to [`Tag::Unknown`].
    pub fn from_wire(raw: [u8; 4]) -> Self {
        match &raw {
            b"CERT" => Tag::Cert,
            b"DELE" => Tag::Dele,
            b"INDX" => Tag::Indx,
            b"MAXT" => Tag::Maxt,
            b"MIDP" => Tag::Midp,
            b"MINT" => Tag::Mint,
            b"NONC" => Tag::Nonc,
            [0x50, 0x41, 0x44, 0xFF] => Tag::Pad,
            b"PATH" => Tag::Path,
            b"PUBK" => Tag::Pubk,
            b"RADI" => Tag::Radi,
            b"ROOT" => Tag::Root,
            [0x53, 0x49, 0x47, 0x00] => Tag::Sig,
            b"SREP" => Tag::Srep,
            _ => Tag::Unknown(raw),
        }
    }

    /// The numeric identity of this tag: its wire bytes read as a
    /// little-endian `u32`. Tags in a message must strictly increase by
    /// this value.
    pub const fn value(self) -> u32 {
        u32::from_le_bytes(self.wire())
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.wire() {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}
