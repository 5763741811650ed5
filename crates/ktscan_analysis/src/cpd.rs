//! Binary encoding of CPD (duplicate-detection) token streams.
//!
//! The cache stores CPD tokens as an opaque byte blob owned by this
//! module: a token count followed by length-prefixed token texts, all
//! little-endian. Decoding is fail-safe so a truncated or foreign blob
//! from an old cache becomes `None`, never a panic.

use crate::syntax::Token;

/// Encodes a token stream into the cache value format.
pub fn encode_tokens(tokens: &[Token]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(tokens.len() as u32).to_le_bytes());
    for token in tokens {
        let bytes = token.text.as_bytes();
        out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(bytes);
    }
    out
}

/// Decodes a cache value back into token texts.
///
/// Returns `None` on any structural problem with the blob.
pub fn decode_tokens(bytes: &[u8]) -> Option<Vec<String>> {
    let mut pos = 0usize;
    let count = read_u32(bytes, &mut pos)? as usize;
    // The count is untrusted; a valid blob needs at least 4 bytes per
    // token, so cap the reservation instead of trusting the header.
    let mut texts = Vec::with_capacity(count.min(bytes.len() / 4));
    for _ in 0..count {
        let len = read_u32(bytes, &mut pos)? as usize;
        let slice = bytes.get(pos..pos + len)?;
        texts.push(String::from_utf8(slice.to_vec()).ok()?);
        pos += len;
    }
    if pos != bytes.len() {
        return None;
    }
    Some(texts)
}

fn read_u32(bytes: &[u8], pos: &mut usize) -> Option<u32> {
    let slice = bytes.get(*pos..*pos + 4)?;
    *pos += 4;
    Some(u32::from_le_bytes(slice.try_into().ok()?))
}
