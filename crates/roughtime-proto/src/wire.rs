// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Roughtime tag-value message codec.
//!
//! Every Roughtime PDU is a map from tags to byte-strings:
//!
//! ```text
//! num_tags: u32 LE
//! offsets:  [u32 LE; N-1]   (cumulative byte offsets into the value region)
//! tags:     [[u8; 4]; N]    (strictly increasing by LE u32 value)
//! values:   [u8]            (concatenated, 4-byte aligned)
//! ```
//!
//! The first value starts at offset 0 implicitly; the last value runs to the
//! end of the message. [`Message`] is a validating zero-copy view over a
//! received buffer; [`MessageBuilder`] produces serialized messages,
//! optionally padded up to the 1024-byte request minimum.

use std::fmt;

use crate::error::{ParseError, ValidationError};
use crate::tag::Tag;

/// Minimum size of a client request in bytes.
///
/// Requests must be at least as large as any response they can elicit, so
/// that Roughtime cannot serve as a UDP amplification vector.
pub const MIN_REQUEST_SIZE: usize = 1024;

/// Length of a client nonce in bytes.
pub const NONCE_LENGTH: usize = 64;

/// Hard cap on the tag count. The wire format allows up to 2^32 - 1 tags;
/// no legitimate PDU comes anywhere near 65535.
const MAX_NUM_TAGS: u32 = 0xFFFF;

/// A zero-copy parsed Roughtime message referencing borrowed data.
///
/// Parsing validates every wire invariant eagerly; value slices are resolved
/// on lookup.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Message<'a> {
    num_tags: usize,
    offsets: &'a [u8],
    tags: &'a [u8],
    values: &'a [u8],
}

impl<'a> Message<'a> {
    /// Parse a Roughtime message from raw bytes.
    pub fn parse(buf: &'a [u8]) -> Result<Self, ParseError> {
        if buf.len() < 4 {
            return Err(ParseError::TooShort {
                needed: 4,
                available: buf.len(),
            });
        }
        if buf.len() % 4 != 0 {
            return Err(ParseError::Unaligned { length: buf.len() });
        }

        let num_tags = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if num_tags > MAX_NUM_TAGS {
            return Err(ParseError::InvalidNumTags { value: num_tags });
        }
        let num_tags = num_tags as usize;

        if num_tags == 0 {
            return Ok(Message {
                num_tags: 0,
                offsets: &[],
                tags: &[],
                values: &[],
            });
        }

        // Header: 4 (num_tags) + 4*(N-1) (offsets) + 4*N (tags).
        let offsets_len = (num_tags - 1) * 4;
        let tags_len = num_tags * 4;
        let header_len = 4 + offsets_len + tags_len;
        if buf.len() < header_len {
            return Err(ParseError::TooShort {
                needed: header_len,
                available: buf.len(),
            });
        }

        let offsets = &buf[4..4 + offsets_len];
        let tags = &buf[4 + offsets_len..header_len];
        let values = &buf[header_len..];

        // Offsets must be 4-byte aligned, within the value region, and
        // non-decreasing (a decreasing offset would give the preceding
        // value a negative length).
        let mut prev_offset = 0u32;
        for i in 0..num_tags - 1 {
            let offset = u32::from_le_bytes([
                offsets[i * 4],
                offsets[i * 4 + 1],
                offsets[i * 4 + 2],
                offsets[i * 4 + 3],
            ]);
            if offset % 4 != 0 {
                return Err(ParseError::OffsetUnaligned { index: i, offset });
            }
            if offset < prev_offset || offset as usize > values.len() {
                return Err(ParseError::OffsetOverflow {
                    index: i,
                    offset,
                    limit: values.len(),
                });
            }
            prev_offset = offset;
        }

        // Tags must strictly increase by LE u32 value.
        for i in 1..num_tags {
            let previous = tag_at_raw(tags, i - 1);
            let current = tag_at_raw(tags, i);
            if current.value() <= previous.value() {
                return Err(ParseError::TagsNotIncreasing { current, previous });
            }
        }

        Ok(Message {
            num_tags,
            offsets,
            tags,
            values,
        })
    }

    /// Number of tags in this message.
    pub fn len(&self) -> usize {
        self.num_tags
    }

    /// Whether this message carries no tags at all.
    pub fn is_empty(&self) -> bool {
        self.num_tags == 0
    }

    /// Look up a tag's value. Returns `None` if the tag is not present.
    pub fn get(&self, tag: Tag) -> Option<&'a [u8]> {
        (0..self.num_tags)
            .find(|&i| self.tag_at(i) == tag)
            .map(|i| self.value_at(i))
    }

    /// Look up a required tag, failing with `MissingTag` if absent.
    pub fn require(&self, tag: Tag) -> Result<&'a [u8], ValidationError> {
        self.get(tag).ok_or(ValidationError::MissingTag { tag })
    }

    /// Parse a tag's value as a nested message, if the tag is present.
    pub fn get_nested(&self, tag: Tag) -> Option<Result<Message<'a>, ParseError>> {
        self.get(tag).map(Message::parse)
    }

    /// Parse a required tag's value as a nested message. Parse failures of
    /// the nested message propagate unwrapped.
    pub fn require_nested(&self, tag: Tag) -> Result<Message<'a>, ValidationError> {
        Ok(Message::parse(self.require(tag)?)?)
    }

    /// Iterate over `(tag, value)` pairs in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &'a [u8])> + '_ {
        (0..self.num_tags).map(move |i| (self.tag_at(i), self.value_at(i)))
    }

    fn tag_at(&self, i: usize) -> Tag {
        tag_at_raw(self.tags, i)
    }

    fn value_at(&self, i: usize) -> &'a [u8] {
        let start = if i == 0 { 0 } else { self.offset_at(i - 1) };
        let end = if i == self.num_tags - 1 {
            self.values.len()
        } else {
            self.offset_at(i)
        };
        &self.values[start..end]
    }

    // The i-th entry of the offset vector, validated at parse time.
    fn offset_at(&self, i: usize) -> usize {
        u32::from_le_bytes([
            self.offsets[i * 4],
            self.offsets[i * 4 + 1],
            self.offsets[i * 4 + 2],
            self.offsets[i * 4 + 3],
        ]) as usize
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Message {{")?;
        for (tag, value) in self.iter() {
            writeln!(f, "    {} = {}", tag, hex::encode(value))?;
        }
        write!(f, "}}")
    }
}

fn tag_at_raw(tags: &[u8], i: usize) -> Tag {
    Tag::from_wire([tags[i * 4], tags[i * 4 + 1], tags[i * 4 + 2], tags[i * 4 + 3]])
}

/// Builds serialized Roughtime messages from tag-value pairs.
///
/// Entries may be added in any order; the builder sorts them by tag before
/// serializing. Duplicate tags and values whose length is not a multiple of
/// 4 are programmer errors and panic.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    entries: Vec<(Tag, Vec<u8>)>,
    padded: bool,
}

impl MessageBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        MessageBuilder::default()
    }

    /// Add a tag-value pair.
    ///
    /// # Panics
    ///
    /// Panics if `tag` was already added or if the value length is not a
    /// multiple of 4.
    pub fn add(mut self, tag: Tag, value: impl Into<Vec<u8>>) -> Self {
        let value = value.into();
        assert!(
            value.len() % 4 == 0,
            "value for tag {tag} must be a multiple of 4 bytes, got {}",
            value.len()
        );
        assert!(
            self.entries.iter().all(|(t, _)| *t != tag),
            "duplicate tag {tag}"
        );
        self.entries.push((tag, value));
        self
    }

    /// Request padding: a PAD entry is inserted so the serialized message is
    /// at least [`MIN_REQUEST_SIZE`] bytes (zero-length when the message
    /// already reaches it).
    ///
    /// # Panics
    ///
    /// `build` panics if PAD was also added explicitly.
    pub fn padded(mut self, padded: bool) -> Self {
        self.padded = padded;
        self
    }

    /// Serialize the message.
    pub fn build(mut self) -> Vec<u8> {
        if self.padded {
            assert!(
                self.entries.iter().all(|(t, _)| *t != Tag::Pad),
                "PAD is inserted automatically when padding is requested"
            );
            // Size of the message once PAD joins with an empty value:
            // 4 (num_tags) + 4*N (offsets) + 4*(N+1) (tags) + values.
            let values_len: usize = self.entries.iter().map(|(_, v)| v.len()).sum();
            let with_empty_pad = 8 + 8 * self.entries.len() + values_len;
            let pad_len = MIN_REQUEST_SIZE.saturating_sub(with_empty_pad);
            self.entries.push((Tag::Pad, vec![0u8; pad_len]));
        }

        self.entries.sort_by(|a, b| a.0.cmp(&b.0));

        let num_tags = self.entries.len() as u32;
        if self.entries.is_empty() {
            return num_tags.to_le_bytes().to_vec();
        }

        let values_len: usize = self.entries.iter().map(|(_, v)| v.len()).sum();
        let total = 4 + 4 * (self.entries.len() - 1) + 4 * self.entries.len() + values_len;
        let mut buf = Vec::with_capacity(total);

        buf.extend_from_slice(&num_tags.to_le_bytes());

        let mut cumulative = 0u32;
        for (_, value) in self.entries.iter().take(self.entries.len() - 1) {
            cumulative += value.len() as u32;
            buf.extend_from_slice(&cumulative.to_le_bytes());
        }

        for (tag, _) in &self.entries {
            buf.extend_from_slice(&tag.wire());
        }

        for (_, value) in &self.entries {
            buf.extend_from_slice(value);
        }

        buf
    }
}

/// Build a client request carrying `nonce`, padded to exactly
/// [`MIN_REQUEST_SIZE`] bytes.
pub fn build_request(nonce: &[u8; NONCE_LENGTH]) -> Vec<u8> {
    MessageBuilder::new()
        .add(Tag::Nonc, nonce.as_slice())
        .padded(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── building ──────────────────────────────────────────────────

    #[test]
    fn test_build_single_tag_no_padding() {
        let data = MessageBuilder::new()
            .add(Tag::Indx, vec![1, 2, 3, 4])
            .build();
        assert_eq!(
            data,
            [
                0x01, 0x00, 0x00, 0x00, // num_tags = 1
                0x49, 0x4E, 0x44, 0x58, // INDX
                0x01, 0x02, 0x03, 0x04, // value
            ]
        );

        let msg = Message::parse(&data).unwrap();
        assert_eq!(msg.len(), 1);
        assert_eq!(msg.get(Tag::Indx), Some([1, 2, 3, 4].as_slice()));
    }

    #[test]
    fn test_build_single_tag_with_padding() {
        let data = MessageBuilder::new()
            .add(Tag::Indx, vec![6, 7, 8, 9])
            .padded(true)
            .build();
        assert_eq!(data.len(), MIN_REQUEST_SIZE);

        //    4 num_tags
        //    4 single offset
        //    8 two tags (INDX and PAD)
        //    4 INDX value
        // 1004 PAD value
        let msg = Message::parse(&data).unwrap();
        assert_eq!(msg.len(), 2);
        assert_eq!(msg.get(Tag::Indx), Some([6, 7, 8, 9].as_slice()));
        assert_eq!(msg.get(Tag::Pad).unwrap().len(), 1004);
    }

    #[test]
    fn test_padding_overhead_alone_reaches_min_size() {
        let value = vec![b'x'; 1008];
        let data = MessageBuilder::new()
            .add(Tag::Sig, value.clone())
            .padded(true)
            .build();
        assert_eq!(data.len(), MIN_REQUEST_SIZE);

        let msg = Message::parse(&data).unwrap();
        assert_eq!(msg.len(), 2);
        assert_eq!(msg.get(Tag::Sig), Some(value.as_slice()));
        assert_eq!(msg.get(Tag::Pad).unwrap().len(), 0);
    }

    #[test]
    fn test_build_sorts_tags() {
        // Added out of order; the wire must carry SIG < NONC < CERT.
        let data = MessageBuilder::new()
            .add(Tag::Cert, vec![2u8; 16])
            .add(Tag::Nonc, vec![1u8; 32])
            .add(Tag::Sig, vec![0u8; 64])
            .build();
        let msg = Message::parse(&data).unwrap();
        let tags: Vec<Tag> = msg.iter().map(|(t, _)| t).collect();
        assert_eq!(tags, [Tag::Sig, Tag::Nonc, Tag::Cert]);
    }

    #[test]
    fn test_build_empty() {
        let data = MessageBuilder::new().build();
        assert_eq!(data, 0u32.to_le_bytes());
        let msg = Message::parse(&data).unwrap();
        assert!(msg.is_empty());
        assert_eq!(msg.get(Tag::Nonc), None);
    }

    #[test]
    #[should_panic(expected = "duplicate tag")]
    fn test_build_rejects_duplicates() {
        let _ = MessageBuilder::new()
            .add(Tag::Nonc, vec![0u8; 4])
            .add(Tag::Nonc, vec![1u8; 4]);
    }

    #[test]
    #[should_panic(expected = "multiple of 4")]
    fn test_build_rejects_unaligned_value() {
        let _ = MessageBuilder::new().add(Tag::Nonc, vec![0u8; 3]);
    }

    #[test]
    fn test_build_request_layout() {
        let nonce = [0xA5u8; NONCE_LENGTH];
        let data = build_request(&nonce);
        assert_eq!(data.len(), MIN_REQUEST_SIZE);

        // N = 2, offset[1] = 64: the nonce value sits first, padding last.
        assert_eq!(&data[0..4], &2u32.to_le_bytes());
        assert_eq!(&data[4..8], &64u32.to_le_bytes());
        assert_eq!(&data[8..12], &Tag::Nonc.wire());
        assert_eq!(&data[12..16], &Tag::Pad.wire());
        assert_eq!(&data[16..80], &nonce);

        let msg = Message::parse(&data).unwrap();
        assert_eq!(msg.get(Tag::Nonc), Some(nonce.as_slice()));
        assert_eq!(msg.get(Tag::Pad).unwrap().len(), MIN_REQUEST_SIZE - 80);
    }

    // ── parsing ───────────────────────────────────────────────────

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            Message::parse(&[]),
            Err(ParseError::TooShort {
                needed: 4,
                available: 0,
            })
        );
    }

    #[test]
    fn test_parse_unaligned_length() {
        assert_eq!(
            Message::parse(&[0u8; 7]),
            Err(ParseError::Unaligned { length: 7 })
        );
    }

    #[test]
    fn test_parse_invalid_num_tags() {
        let mut data = Vec::new();
        data.extend_from_slice(&0x0001_0000u32.to_le_bytes());
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::InvalidNumTags { value: 0x0001_0000 })
        );
    }

    #[test]
    fn test_parse_header_truncated() {
        // Claims 2 tags but provides no offset vector or tag list.
        let data = 2u32.to_le_bytes();
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::TooShort {
                needed: 16,
                available: 4,
            })
        );
    }

    #[test]
    fn test_parse_offset_unaligned() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes()); // num_tags = 2
        data.extend_from_slice(&6u32.to_le_bytes()); // offset not % 4
        data.extend_from_slice(&Tag::Nonc.wire());
        data.extend_from_slice(&Tag::Pad.wire());
        data.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::OffsetUnaligned {
                index: 0,
                offset: 6,
            })
        );
    }

    #[test]
    fn test_parse_offset_overflow() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&12u32.to_le_bytes()); // value region is 8 bytes
        data.extend_from_slice(&Tag::Nonc.wire());
        data.extend_from_slice(&Tag::Pad.wire());
        data.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::OffsetOverflow {
                index: 0,
                offset: 12,
                limit: 8,
            })
        );
    }

    #[test]
    fn test_parse_offsets_decreasing() {
        let mut data = Vec::new();
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&8u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes()); // runs backwards
        data.extend_from_slice(&Tag::Sig.wire());
        data.extend_from_slice(&Tag::Nonc.wire());
        data.extend_from_slice(&Tag::Pad.wire());
        data.extend_from_slice(&[0u8; 12]);
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::OffsetOverflow {
                index: 1,
                offset: 4,
                limit: 12,
            })
        );
    }

    #[test]
    fn test_parse_tags_not_increasing() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&Tag::Pad.wire()); // PAD > NONC: wrong order
        data.extend_from_slice(&Tag::Nonc.wire());
        data.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::TagsNotIncreasing {
                current: Tag::Nonc,
                previous: Tag::Pad,
            })
        );
    }

    #[test]
    fn test_parse_duplicate_tags_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&Tag::Nonc.wire());
        data.extend_from_slice(&Tag::Nonc.wire());
        data.extend_from_slice(&[0u8; 8]);
        assert_eq!(
            Message::parse(&data),
            Err(ParseError::TagsNotIncreasing {
                current: Tag::Nonc,
                previous: Tag::Nonc,
            })
        );
    }

    #[test]
    fn test_parse_single_tag_value_spans_rest() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&Tag::Srep.wire());
        data.extend_from_slice(&[0xABu8; 12]);
        let msg = Message::parse(&data).unwrap();
        assert_eq!(msg.get(Tag::Srep), Some([0xABu8; 12].as_slice()));
    }

    #[test]
    fn test_parse_zero_length_values() {
        // Duplicate offsets are legal: they produce zero-length values.
        let data = MessageBuilder::new()
            .add(Tag::Sig, vec![])
            .add(Tag::Nonc, vec![])
            .add(Tag::Pad, vec![0u8; 4])
            .build();
        let msg = Message::parse(&data).unwrap();
        assert_eq!(msg.get(Tag::Sig), Some([].as_slice()));
        assert_eq!(msg.get(Tag::Nonc), Some([].as_slice()));
        assert_eq!(msg.get(Tag::Pad).unwrap().len(), 4);
    }

    #[test]
    fn test_parse_unknown_tag() {
        let mut data = Vec::new();
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(b"QQQQ");
        data.extend_from_slice(&[1u8; 4]);
        let msg = Message::parse(&data).unwrap();
        assert_eq!(
            msg.get(Tag::Unknown(*b"QQQQ")),
            Some([1u8; 4].as_slice())
        );
    }

    // ── lookup ────────────────────────────────────────────────────

    #[test]
    fn test_require_missing_tag() {
        let data = MessageBuilder::new().add(Tag::Nonc, vec![0u8; 32]).build();
        let msg = Message::parse(&data).unwrap();
        assert_eq!(
            msg.require(Tag::Sig),
            Err(ValidationError::MissingTag { tag: Tag::Sig })
        );
    }

    #[test]
    fn test_nested_message() {
        let inner = MessageBuilder::new().add(Tag::Nonc, vec![42u8; 32]).build();
        let data = MessageBuilder::new().add(Tag::Cert, inner).build();
        let outer = Message::parse(&data).unwrap();
        let nested = outer.require_nested(Tag::Cert).unwrap();
        assert_eq!(nested.get(Tag::Nonc), Some([42u8; 32].as_slice()));
    }

    #[test]
    fn test_nested_message_parse_error_propagates() {
        // An inner value that is not itself a valid message.
        let data = MessageBuilder::new()
            .add(Tag::Cert, vec![0xFFu8; 4])
            .build();
        let outer = Message::parse(&data).unwrap();
        assert_eq!(
            outer.require_nested(Tag::Cert),
            Err(ValidationError::Parse(ParseError::InvalidNumTags {
                value: 0xFFFF_FFFF,
            }))
        );
    }

    #[test]
    fn test_roundtrip_preserves_order_and_values() {
        let data = MessageBuilder::new()
            .add(Tag::Cert, vec![3u8; 8])
            .add(Tag::Sig, vec![1u8; 64])
            .add(Tag::Srep, vec![2u8; 12])
            .build();
        let msg = Message::parse(&data).unwrap();
        let entries: Vec<(Tag, Vec<u8>)> =
            msg.iter().map(|(t, v)| (t, v.to_vec())).collect();
        // LE u32 order: SIG (0x0047...) < SREP (0x5045...) < CERT (0x5452...).
        assert_eq!(
            entries,
            vec![
                (Tag::Sig, vec![1u8; 64]),
                (Tag::Srep, vec![2u8; 12]),
                (Tag::Cert, vec![3u8; 8]),
            ]
        );
    }

    #[test]
    fn test_debug_hex_dump() {
        let data = MessageBuilder::new()
            .add(Tag::Indx, vec![0xDE, 0xAD, 0xBE, 0xEF])
            .build();
        let msg = Message::parse(&data).unwrap();
        let dump = format!("{msg:?}");
        assert!(dump.contains("INDX = deadbeef"), "got: {dump}");
    }
}
