// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking UDP transport for one-shot Roughtime exchanges.
//!
//! The request/response pipeline itself lives in `roughtime-proto`; this
//! module binds a socket, performs one exchange, and maps validation
//! failures to [`io::Error`]. The [`crate::ValidationError`] stays reachable
//! via [`io::Error::get_ref`] and `downcast_ref`.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use roughtime_proto::verify::{VerifiedResponse, PUBLIC_KEY_LENGTH};
use roughtime_proto::wire::Message;

use crate::client::RoughtimeClient;

/// Default timeout for Roughtime requests (5 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum response buffer size. A conforming response never exceeds the
/// 1024-byte request, but a generous buffer costs nothing.
pub(crate) const RECV_BUF_SIZE: usize = 4096;

/// Select the appropriate bind address based on the target address family.
///
/// Returns `"0.0.0.0:0"` for IPv4 targets and `"[::]:0"` for IPv6 targets.
pub(crate) fn bind_addr_for(target: &SocketAddr) -> &'static str {
    match target {
        SocketAddr::V4(_) => "0.0.0.0:0",
        SocketAddr::V6(_) => "[::]:0",
    }
}

/// Order resolved addresses IPv4 first; many Roughtime deployments answer
/// only on IPv4.
pub(crate) fn prefer_addresses(mut addrs: Vec<SocketAddr>) -> Vec<SocketAddr> {
    addrs.sort_by_key(|addr| match addr {
        SocketAddr::V4(_) => 0,
        SocketAddr::V6(_) => 1,
    });
    addrs
}

/// Parse and validate a received response through `client`, mapping the
/// outcome to `io::Result`. Shared by the sync and async paths.
pub(crate) fn finish_exchange(
    client: &mut RoughtimeClient,
    response_bytes: &[u8],
) -> io::Result<VerifiedResponse> {
    let response = Message::parse(response_bytes).map_err(io::Error::from)?;
    client.process_response(&response);
    if let Some(cause) = client.invalid_response_cause() {
        return Err(cause.clone().into());
    }
    client.verified().copied().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "client already held a terminal response",
        )
    })
}

/// Decode a server's long-term public key from its published base64 form.
///
/// Roughtime operators distribute their 32-byte Ed25519 keys as standard
/// base64 with padding; surrounding whitespace (a trailing newline from a
/// config file, say) is tolerated.
///
/// # Examples
///
/// ```
/// let pk = roughtime_client::decode_public_key(
///     "etPaaIxcBMY1oUeGpwvPMCJMwlRVNxv51KK/tktoJTQ="
/// ).unwrap();
/// assert_eq!(pk.len(), 32);
/// ```
pub fn decode_public_key(base64_key: &str) -> io::Result<[u8; PUBLIC_KEY_LENGTH]> {
    let bytes = BASE64.decode(base64_key.trim()).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("public key is not valid base64: {e}"),
        )
    })?;
    <[u8; PUBLIC_KEY_LENGTH]>::try_from(bytes.as_slice()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "public key must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                bytes.len()
            ),
        )
    })
}

/// Send a blocking Roughtime request with a 5 second timeout.
///
/// # Arguments
///
/// * `addr` - Server address (e.g., `"roughtime.int08h.com:2002"`)
/// * `public_key` - Server's Ed25519 long-term public key (32 bytes)
///
/// # Examples
///
/// ```no_run
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let pk = roughtime_client::decode_public_key(
///     "etPaaIxcBMY1oUeGpwvPMCJMwlRVNxv51KK/tktoJTQ="
/// )?;
/// let result = roughtime_client::request("roughtime.int08h.com:2002", &pk)?;
/// println!("Time: {} seconds since epoch (±{}s)",
///     result.midpoint_seconds(), result.radius_seconds());
/// # Ok(())
/// # }
/// ```
pub fn request<A: ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> io::Result<VerifiedResponse> {
    request_with_timeout(addr, public_key, DEFAULT_TIMEOUT)
}

/// Send a blocking Roughtime request with a configurable timeout.
///
/// # Errors
///
/// Returns `io::Error` if:
/// - DNS resolution fails or yields no addresses
/// - The socket cannot be bound, or send/recv time out
/// - The response is not a well-formed Roughtime message
/// - The response fails any validation stage (signature chain, Merkle
///   inclusion, midpoint bounds); the inner error is the
///   [`crate::ValidationError`]
pub fn request_with_timeout<A: ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    timeout: Duration,
) -> io::Result<VerifiedResponse> {
    let resolved_addrs: Vec<SocketAddr> = prefer_addresses(addr.to_socket_addrs()?.collect());
    if resolved_addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        ));
    }
    let target_addr = resolved_addrs[0];

    let mut client = RoughtimeClient::new(*public_key);
    let request_bytes = client.create_request();

    let sock = UdpSocket::bind(bind_addr_for(&target_addr))?;
    sock.set_read_timeout(Some(timeout))?;
    sock.set_write_timeout(Some(timeout))?;

    let sz = sock.send_to(&request_bytes, target_addr)?;
    debug!("roughtime: sent {} bytes to {:?}", sz, target_addr);

    let mut recv_buf = [0u8; RECV_BUF_SIZE];
    let (recv_len, src_addr) = sock.recv_from(&mut recv_buf)?;
    debug!("roughtime: recv {} bytes from {:?}", recv_len, src_addr);

    finish_exchange(&mut client, &recv_buf[..recv_len])
}
