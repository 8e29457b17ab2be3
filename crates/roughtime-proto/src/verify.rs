// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Roughtime response validation.
//!
//! A response is accepted only after four checks, in order:
//!
//! 1. The long-term key signed the delegation (CERT.SIG over DELE).
//! 2. The delegated key signed the response (SIG over SREP).
//! 3. The client's nonce is included in the response's Merkle tree.
//! 4. The midpoint lies within the delegation's [MINT, MAXT] window.
//!
//! Stage ordering is enforced by dataflow: stage 2 consumes the delegated
//! key produced by stage 1, and stage 4 consumes stage 1's time bounds.

use ring::signature;

use crate::bytes::{read_u32_le, read_u64_le};
use crate::error::{SignatureError, ValidationError};
use crate::merkle;
use crate::tag::Tag;
use crate::wire::{Message, NONCE_LENGTH};

/// Context string prepended to the message a delegation signature covers.
const CERTIFICATE_CONTEXT: &[u8] = b"RoughTime v1 delegation signature--\0";

/// Context string prepended to the message a response signature covers.
const SIGNED_RESPONSE_CONTEXT: &[u8] = b"RoughTime v1 response signature\0";

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// A delegation extracted from a verified CERT: a short-term key authorized
/// to sign responses whose midpoint falls within `[min_t, max_t]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Delegation {
    /// The delegated Ed25519 public key.
    pub public_key: [u8; PUBLIC_KEY_LENGTH],
    /// Earliest midpoint the delegated key may sign (microseconds since the
    /// Unix epoch, unsigned).
    pub min_t: u64,
    /// Latest midpoint the delegated key may sign (microseconds since the
    /// Unix epoch, unsigned).
    pub max_t: u64,
}

/// The outcome of a fully verified response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct VerifiedResponse {
    /// The server's asserted time in microseconds since the Unix epoch.
    pub midpoint_us: u64,
    /// Uncertainty around the midpoint in microseconds.
    pub radius_us: u32,
    /// The delegation that authorized the signing key.
    pub delegation: Delegation,
}

impl VerifiedResponse {
    /// Midpoint as seconds since the Unix epoch (truncated).
    pub fn midpoint_seconds(&self) -> u64 {
        self.midpoint_us / 1_000_000
    }

    /// Radius as seconds (rounded up).
    pub fn radius_seconds(&self) -> u32 {
        self.radius_us.div_ceil(1_000_000)
    }
}

/// Verify an Ed25519 signature over `context || payload`, fail-closed on any
/// decoding error in the key or signature.
fn verify_ed25519(
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    context: &'static [u8],
    payload: &[u8],
    sig: &[u8],
) -> bool {
    let key = signature::UnparsedPublicKey::new(&signature::ED25519, public_key);
    let mut message = Vec::with_capacity(context.len() + payload.len());
    message.extend_from_slice(context);
    message.extend_from_slice(payload);
    key.verify(&message, sig).is_ok()
}

/// Stage 1: verify the long-term-key signature over DELE and extract the
/// delegation.
pub fn verify_delegation(
    long_term_key: &[u8; PUBLIC_KEY_LENGTH],
    response: &Message<'_>,
) -> Result<Delegation, ValidationError> {
    let cert = response.require_nested(Tag::Cert)?;
    let dele_bytes = cert.require(Tag::Dele)?;
    let sig = cert.require(Tag::Sig)?;
    if sig.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::CertificateSignatureLength { actual: sig.len() }.into());
    }
    if !verify_ed25519(long_term_key, CERTIFICATE_CONTEXT, dele_bytes, sig) {
        return Err(SignatureError::DelegationMismatch.into());
    }

    let dele = Message::parse(dele_bytes)?;
    let pubk = dele.require(Tag::Pubk)?;
    if pubk.len() != PUBLIC_KEY_LENGTH {
        return Err(SignatureError::PublicKeyLength { actual: pubk.len() }.into());
    }
    let mut public_key = [0u8; PUBLIC_KEY_LENGTH];
    public_key.copy_from_slice(pubk);

    let min_t = read_u64_le(dele.require(Tag::Mint)?, Tag::Mint)?;
    let max_t = read_u64_le(dele.require(Tag::Maxt)?, Tag::Maxt)?;

    Ok(Delegation {
        public_key,
        min_t,
        max_t,
    })
}

/// Stage 2: verify the delegated-key signature over the raw SREP bytes.
pub fn verify_signed_response(
    delegation: &Delegation,
    response: &Message<'_>,
) -> Result<(), ValidationError> {
    let srep_bytes = response.require(Tag::Srep)?;
    let sig = response.require(Tag::Sig)?;
    if sig.len() != SIGNATURE_LENGTH {
        return Err(SignatureError::ResponseSignatureLength { actual: sig.len() }.into());
    }
    if !verify_ed25519(
        &delegation.public_key,
        SIGNED_RESPONSE_CONTEXT,
        srep_bytes,
        sig,
    ) {
        return Err(SignatureError::ResponseMismatch.into());
    }
    Ok(())
}

/// Run the full validation pipeline over a parsed response.
///
/// On success, returns the midpoint, radius, and the delegation that
/// authorized them. The first failing stage aborts validation and its
/// categorized cause is returned; nothing about a partially validated
/// response is exposed.
pub fn verify_response(
    response: &Message<'_>,
    nonce: &[u8; NONCE_LENGTH],
    long_term_key: &[u8; PUBLIC_KEY_LENGTH],
) -> Result<VerifiedResponse, ValidationError> {
    let delegation = verify_delegation(long_term_key, response)?;
    verify_signed_response(&delegation, response)?;

    let srep = response.require_nested(Tag::Srep)?;

    let root = srep.require(Tag::Root)?;
    let path = response.require(Tag::Path)?;
    let index = read_u32_le(response.require(Tag::Indx)?, Tag::Indx)?;
    merkle::verify_inclusion(nonce, root, path, index)?;

    let midpoint_us = read_u64_le(srep.require(Tag::Midp)?, Tag::Midp)?;
    let radius_us = read_u32_le(srep.require(Tag::Radi)?, Tag::Radi)?;
    if midpoint_us < delegation.min_t || midpoint_us > delegation.max_t {
        return Err(ValidationError::MidpointInvalid {
            midpoint: midpoint_us,
            min_t: delegation.min_t,
            max_t: delegation.max_t,
        });
    }

    Ok(VerifiedResponse {
        midpoint_us,
        radius_us,
        delegation,
    })
}
