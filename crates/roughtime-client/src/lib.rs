// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Roughtime client library: cryptographically verified coarse time.

A Roughtime client sends a nonce-bearing UDP request to a server whose
long-term Ed25519 public key it already trusts, and verifies that the signed
response covers its nonce and falls inside the delegation's validity window.

# Example

```rust,no_run
fn main() -> std::io::Result<()> {
    let public_key = roughtime_client::decode_public_key(
        "etPaaIxcBMY1oUeGpwvPMCJMwlRVNxv51KK/tktoJTQ=",
    )?;
    let result = roughtime_client::request("roughtime.int08h.com:2002", &public_key)?;
    println!(
        "Time: {} seconds since epoch (±{}s)",
        result.midpoint_seconds(),
        result.radius_seconds()
    );
    Ok(())
}
```

For finer control over the exchange (custom transports, inspection of the
failure cause), drive a [`RoughtimeClient`] directly.

# Feature Flags

| Feature | Default | Description |
|---------|---------|-------------|
| `tokio` | no | Async request API using the tokio runtime. |
*/

#![warn(missing_docs)]

// Re-export protocol types from roughtime_proto for convenience.
pub use roughtime_proto::{error, merkle, tag, verify, wire};

/// The stateful one-shot client facade.
pub mod client;

mod request;

#[cfg(feature = "tokio")]
mod async_request;

pub use client::RoughtimeClient;
pub use request::{decode_public_key, request, request_with_timeout};

#[cfg(feature = "tokio")]
pub use async_request::{async_request, async_request_with_timeout};

pub use roughtime_proto::{Message, ValidationError, VerifiedResponse};
