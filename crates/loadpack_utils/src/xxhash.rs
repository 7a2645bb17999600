use xxhash_rust::xxh3::xxh3_128;

pub fn xxhash_base64_url(input: &[u8]) -> String {
  let hash = xxh3_128(input).to_le_bytes();
  base64_simd::URL_SAFE_NO_PAD.encode_to_string(hash)
}

/// Content hash truncated to `len` characters, as used by `[contenthash:8]`.
pub fn short_content_hash(input: &[u8], len: usize) -> String {
  let mut hash = xxhash_base64_url(input);
  hash.truncate(len);
  hash
}

#[test]
fn test_short_content_hash() {
  let full = xxhash_base64_url(b"hello");
  assert_eq!(full.len(), 22);
  assert_eq!(short_content_hash(b"hello", 8), full[..8]);
  assert_ne!(short_content_hash(b"hello", 8), short_content_hash(b"world", 8));
}
