// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SHA-512 Merkle tree hashing and inclusion-proof verification.
//!
//! Leaves and interior nodes are domain-separated by a single prefix byte
//! (`0x00` for leaves, `0x01` for nodes) to block second-preimage attacks
//! between the two levels. Classic Roughtime uses the full 64-byte SHA-512
//! digest throughout.

use ring::digest;

use crate::error::{MerkleError, ValidationError};
use crate::tag::Tag;

/// Length of a SHA-512 digest, and therefore of every tree node.
pub const HASH_LENGTH: usize = 64;

const LEAF_PREFIX: &[u8] = &[0x00];
const NODE_PREFIX: &[u8] = &[0x01];

/// Hash a leaf: `SHA-512(0x00 || data)`.
pub fn hash_leaf(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut ctx = digest::Context::new(&digest::SHA512);
    ctx.update(LEAF_PREFIX);
    ctx.update(data);
    let mut out = [0u8; HASH_LENGTH];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Hash an interior node: `SHA-512(0x01 || left || right)`.
pub fn hash_node(left: &[u8], right: &[u8]) -> [u8; HASH_LENGTH] {
    let mut ctx = digest::Context::new(&digest::SHA512);
    ctx.update(NODE_PREFIX);
    ctx.update(left);
    ctx.update(right);
    let mut out = [0u8; HASH_LENGTH];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

/// Verify that `nonce` is included in the Merkle tree committed to by `root`.
///
/// A single-nonce batch has an empty `path` and `index` 0, and `root` must
/// equal the nonce's leaf hash directly. A multi-nonce batch has a non-empty
/// `path` of 64-byte siblings and `index > 0`; bit `i` of `index` places the
/// running hash left (`0`) or right (`1`) at level `i`, and every index bit
/// must be consumed by the time the path ends. Any other `path`/`index`
/// combination is a protocol violation.
pub fn verify_inclusion(
    nonce: &[u8],
    root: &[u8],
    path: &[u8],
    index: u32,
) -> Result<(), ValidationError> {
    if root.len() != HASH_LENGTH {
        return Err(ValidationError::TagLength {
            tag: Tag::Root,
            expected: HASH_LENGTH,
            actual: root.len(),
        });
    }

    if path.is_empty() && index == 0 {
        if hash_leaf(nonce) != root[..] {
            return Err(MerkleError::NonceNotFound.into());
        }
        return Ok(());
    }

    if path.is_empty() || index == 0 {
        return Err(MerkleError::PathIndexConflict {
            path_len: path.len(),
            index,
        }
        .into());
    }

    if path.len() % HASH_LENGTH != 0 {
        return Err(MerkleError::PathUnaligned { length: path.len() }.into());
    }

    let mut hash = hash_leaf(nonce);
    let mut remaining = index;
    for sibling in path.chunks_exact(HASH_LENGTH) {
        hash = if remaining & 1 == 0 {
            hash_node(&hash, sibling)
        } else {
            hash_node(sibling, &hash)
        };
        remaining >>= 1;
    }

    if remaining != 0 {
        return Err(MerkleError::DepthMismatch { remaining }.into());
    }
    if hash != root[..] {
        return Err(MerkleError::RootMismatch.into());
    }
    Ok(())
}
