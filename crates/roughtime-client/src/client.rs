// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The stateful one-shot client facade.
//!
//! A [`RoughtimeClient`] is created with one server public key, draws one
//! nonce, sends one request, and accepts one response. The first call to
//! [`process_response`](RoughtimeClient::process_response) fixes the terminal
//! state (valid or invalid) and later calls are ignored. Accessors for the
//! midpoint and radius return 0 until a response has validated, so a partial
//! failure never leaks stale time values.

use rand::{CryptoRng, RngCore};

use roughtime_proto::error::ValidationError;
use roughtime_proto::verify::{verify_response, VerifiedResponse, PUBLIC_KEY_LENGTH};
use roughtime_proto::wire::{build_request, Message, NONCE_LENGTH};

/// Creates Roughtime client requests and validates server responses.
///
/// # Example
///
/// ```no_run
/// use roughtime_client::{Message, RoughtimeClient};
///
/// // The server's long-term public key, obtained out of band.
/// let server_public_key = [0u8; 32];
///
/// let mut client = RoughtimeClient::new(server_public_key);
/// let request_bytes = client.create_request();
///
/// // ... send `request_bytes` over UDP, receive `response_bytes` ...
/// # let response_bytes: Vec<u8> = vec![];
///
/// if let Ok(response) = Message::parse(&response_bytes) {
///     client.process_response(&response);
/// }
/// if client.is_response_valid() {
///     println!("midpoint: {} us (±{} us)", client.midpoint(), client.radius());
/// } else if let Some(cause) = client.invalid_response_cause() {
///     println!("invalid response: {cause}");
/// }
/// ```
#[derive(Debug)]
pub struct RoughtimeClient {
    nonce: [u8; NONCE_LENGTH],
    long_term_key: [u8; PUBLIC_KEY_LENGTH],
    outcome: Option<Result<VerifiedResponse, ValidationError>>,
}

impl RoughtimeClient {
    /// Create a client for the server owning `public_key`, drawing the nonce
    /// from the operating system's cryptographically strong RNG.
    pub fn new(public_key: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        let mut nonce = [0u8; NONCE_LENGTH];
        rand::fill(&mut nonce);
        RoughtimeClient {
            nonce,
            long_term_key: public_key,
            outcome: None,
        }
    }

    /// Create a client drawing its nonce from the provided generator.
    ///
    /// Production callers should prefer [`RoughtimeClient::new`]; this
    /// constructor exists so tests can inject a seeded generator. The
    /// entropy source is consulted exactly once, here.
    pub fn with_rng<R: RngCore + CryptoRng>(
        public_key: [u8; PUBLIC_KEY_LENGTH],
        rng: &mut R,
    ) -> Self {
        let mut nonce = [0u8; NONCE_LENGTH];
        rng.fill_bytes(&mut nonce);
        RoughtimeClient {
            nonce,
            long_term_key: public_key,
            outcome: None,
        }
    }

    /// This instance's nonce, frozen at construction.
    pub fn nonce(&self) -> &[u8; NONCE_LENGTH] {
        &self.nonce
    }

    /// Build the serialized request for this instance's nonce: exactly 1024
    /// bytes, NONC plus padding.
    pub fn create_request(&self) -> Vec<u8> {
        build_request(&self.nonce)
    }

    /// Validate the server's response and record the outcome.
    ///
    /// Runs the full pipeline: delegation signature, top-level signature,
    /// Merkle inclusion of this instance's nonce, and midpoint bounds. All
    /// failures are captured as the
    /// [`invalid_response_cause`](RoughtimeClient::invalid_response_cause);
    /// nothing is raised. Only the first call has any effect.
    pub fn process_response(&mut self, response: &Message<'_>) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(verify_response(response, &self.nonce, &self.long_term_key));
    }

    /// `true` if and only if a response was processed and passed every
    /// validation stage.
    pub fn is_response_valid(&self) -> bool {
        matches!(self.outcome, Some(Ok(_)))
    }

    /// The verified response, if validation succeeded.
    pub fn verified(&self) -> Option<&VerifiedResponse> {
        match &self.outcome {
            Some(Ok(verified)) => Some(verified),
            _ => None,
        }
    }

    /// The response midpoint in microseconds since the Unix epoch, or 0
    /// unless the response validated.
    pub fn midpoint(&self) -> u64 {
        self.verified().map_or(0, |v| v.midpoint_us)
    }

    /// The response radius in microseconds, or 0 unless the response
    /// validated.
    pub fn radius(&self) -> u32 {
        self.verified().map_or(0, |v| v.radius_us)
    }

    /// The categorized cause of the validation failure, or `None` while no
    /// response has been processed or the response was valid.
    pub fn invalid_response_cause(&self) -> Option<&ValidationError> {
        match &self.outcome {
            Some(Err(cause)) => Some(cause),
            _ => None,
        }
    }
}
