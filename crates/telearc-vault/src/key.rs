// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of operator-supplied key material into a fixed AES key.

use zeroize::Zeroizing;

/// Normalize arbitrary operator key material into exactly 32 bytes.
///
/// Keys longer than 32 bytes are truncated; shorter keys are right-padded
/// with ASCII `'0'`. Deterministic: the same configured key always yields
/// the same AES key, so previously sealed credentials stay decryptable
/// across restarts.
pub fn normalize_key(material: &str) -> Zeroizing<[u8; 32]> {
    let mut key = Zeroizing::new([b'0'; 32]);
    let bytes = material.as_bytes();
    let take = bytes.len().min(32);
    key[..take].copy_from_slice(&bytes[..take]);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_key_is_right_padded_with_zero_chars() {
        let key = normalize_key("abc");
        assert_eq!(&key[..3], b"abc");
        assert!(key[3..].iter().all(|&b| b == b'0'));
    }

    #[test]
    fn long_key_is_truncated() {
        let long = "x".repeat(64);
        let key = normalize_key(&long);
        assert_eq!(*key, [b'x'; 32]);
    }

    #[test]
    fn exact_key_passes_through() {
        let exact = "0123456789abcdef0123456789abcdef";
        let key = normalize_key(exact);
        assert_eq!(&*key, exact.as_bytes());
    }

    #[test]
    fn normalization_is_deterministic() {
        assert_eq!(*normalize_key("seed"), *normalize_key("seed"));
    }
}
