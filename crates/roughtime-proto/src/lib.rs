// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Classic Roughtime protocol engine: wire codec and response verification.
//!
//! Roughtime provides rough (seconds-to-minutes accuracy) but
//! cryptographically authenticated wall-clock time from untrusted servers.
//! This crate implements the client-side protocol core: the tag-value
//! message container used by every Roughtime PDU, the 1024-byte padded
//! request, and the response-validation pipeline (Ed25519 signature chain,
//! SHA-512 Merkle inclusion proof, delegation bounds check). Transport is a
//! caller concern; see the `roughtime-client` crate.
//!
//! # Usage
//!
//! ```no_run
//! use roughtime_proto::{build_request, verify_response, Message};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The server's long-term public key, obtained out of band.
//! let server_public_key = [0u8; 32];
//!
//! // Build a 1024-byte request around a fresh 64-byte nonce.
//! let nonce = [0u8; 64]; // use a cryptographically strong RNG
//! let request_bytes = build_request(&nonce);
//!
//! // Send `request_bytes` via UDP, receive `response_bytes`.
//! # let response_bytes: Vec<u8> = vec![];
//! let response = Message::parse(&response_bytes)?;
//! let result = verify_response(&response, &nonce, &server_public_key)?;
//! println!(
//!     "midpoint: {} us since epoch (±{} us)",
//!     result.midpoint_us, result.radius_us
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Error types for message parsing and response validation.
pub mod error;

/// SHA-512 Merkle tree hashing and inclusion-proof verification.
pub mod merkle;

/// The Roughtime tag registry.
pub mod tag;

/// Response validation: signature chain, Merkle inclusion, midpoint bounds.
pub mod verify;

/// The tag-value message codec and request builder.
pub mod wire;

mod bytes;

pub use error::{MerkleError, ParseError, SignatureError, ValidationError};
pub use tag::Tag;
pub use verify::{
    verify_response, Delegation, VerifiedResponse, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
};
pub use wire::{build_request, Message, MessageBuilder, MIN_REQUEST_SIZE, NONCE_LENGTH};
