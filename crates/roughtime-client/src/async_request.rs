// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async UDP transport for one-shot Roughtime exchanges (tokio).

use log::debug;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use roughtime_proto::verify::{VerifiedResponse, PUBLIC_KEY_LENGTH};

use crate::client::RoughtimeClient;
use crate::request::{bind_addr_for, finish_exchange, prefer_addresses, RECV_BUF_SIZE};

/// Default timeout for async Roughtime requests (5 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Send an async Roughtime request with a 5 second timeout.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> std::io::Result<()> {
/// let pk = roughtime_client::decode_public_key(
///     "etPaaIxcBMY1oUeGpwvPMCJMwlRVNxv51KK/tktoJTQ="
/// )?;
/// let result = roughtime_client::async_request("roughtime.int08h.com:2002", &pk).await?;
/// println!("Time: {} seconds since epoch", result.midpoint_seconds());
/// # Ok(())
/// # }
/// ```
pub async fn async_request<A: tokio::net::ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> io::Result<VerifiedResponse> {
    async_request_with_timeout(addr, public_key, DEFAULT_TIMEOUT).await
}

/// Send an async Roughtime request with a configurable timeout.
pub async fn async_request_with_timeout<A: tokio::net::ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    timeout: Duration,
) -> io::Result<VerifiedResponse> {
    tokio::time::timeout(timeout, async_request_inner(addr, public_key))
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "Roughtime request timed out"))?
}

async fn async_request_inner<A: tokio::net::ToSocketAddrs>(
    addr: A,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
) -> io::Result<VerifiedResponse> {
    let resolved_addrs: Vec<SocketAddr> =
        prefer_addresses(tokio::net::lookup_host(addr).await?.collect());
    if resolved_addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        ));
    }
    let target_addr = resolved_addrs[0];

    let mut client = RoughtimeClient::new(*public_key);
    let request_bytes = client.create_request();

    let sock = tokio::net::UdpSocket::bind(bind_addr_for(&target_addr)).await?;

    let sz = sock.send_to(&request_bytes, target_addr).await?;
    debug!("roughtime: sent {} bytes to {:?}", sz, target_addr);

    let mut recv_buf = [0u8; RECV_BUF_SIZE];
    let (recv_len, src_addr) = sock.recv_from(&mut recv_buf).await?;
    debug!("roughtime: recv {} bytes from {:?}", recv_len, src_addr);

    finish_exchange(&mut client, &recv_buf[..recv_len])
}
