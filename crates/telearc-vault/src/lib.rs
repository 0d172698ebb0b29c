// SPDX-FileCopyrightText: 2026 Telearc Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted vault for the session credential.
//!
//! The session secret issued by the platform is a bearer credential: anyone
//! holding it can act as the account. It is therefore never written to the
//! database in cleartext. [`Vault`] seals it with AES-256-GCM under a key
//! derived from the operator-configured key material, and the database only
//! ever sees the opaque base64 envelope.
//!
//! Envelope layout: `base64(nonce[12] || ciphertext || tag[16])`.

pub mod crypto;
pub mod key;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::SecretString;
use telearc_core::ArchiveError;
use zeroize::Zeroizing;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Seals and opens session credentials with a normalized AES-256 key.
///
/// Cloning is cheap enough not to matter here; the vault is constructed once
/// at startup and shared behind the auth machine.
pub struct Vault {
    aes_key: Zeroizing<[u8; 32]>,
}

impl Vault {
    /// Build a vault from operator-supplied key material.
    ///
    /// The material is normalized to exactly 32 bytes (truncate / pad), so
    /// any non-empty configured string yields a usable key.
    pub fn from_key_material(material: &str) -> Self {
        Vault {
            aes_key: key::normalize_key(material),
        }
    }

    /// Seal a session secret into a base64 envelope for storage.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, ArchiveError> {
        let (ciphertext, nonce) = crypto::seal(&self.aes_key, plaintext.as_bytes())?;

        let mut envelope = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(envelope))
    }

    /// Open a stored envelope back into the session secret.
    ///
    /// Fails with [`ArchiveError::Decryption`] on malformed base64, truncated
    /// envelopes, tampering, or a key mismatch. Callers must treat any such
    /// failure as "credential unusable".
    pub fn decrypt(&self, envelope: &str) -> Result<SecretString, ArchiveError> {
        let raw = BASE64
            .decode(envelope)
            .map_err(|e| ArchiveError::Decryption(format!("invalid base64 envelope: {e}")))?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(ArchiveError::Decryption(format!(
                "envelope too short: {} bytes",
                raw.len()
            )));
        }

        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&raw[..NONCE_LEN]);

        let plaintext = Zeroizing::new(crypto::open(&self.aes_key, &nonce, &raw[NONCE_LEN..])?);
        let text = std::str::from_utf8(&plaintext)
            .map_err(|_| ArchiveError::Decryption("decrypted secret is not UTF-8".to_string()))?;

        Ok(SecretString::from(text))
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault").field("aes_key", &"[redacted]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let vault = Vault::from_key_material("operator-key");
        let envelope = vault.encrypt("1BVtsOHoBu...session").unwrap();
        let secret = vault.decrypt(&envelope).unwrap();
        assert_eq!(secret.expose_secret(), "1BVtsOHoBu...session");
    }

    #[test]
    fn envelope_is_not_the_plaintext() {
        let vault = Vault::from_key_material("operator-key");
        let envelope = vault.encrypt("visible secret").unwrap();
        assert!(!envelope.contains("visible secret"));
    }

    #[test]
    fn same_secret_seals_to_different_envelopes() {
        let vault = Vault::from_key_material("operator-key");
        let a = vault.encrypt("same").unwrap();
        let b = vault.encrypt("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let vault = Vault::from_key_material("key-one");
        let other = Vault::from_key_material("key-two");
        let envelope = vault.encrypt("secret").unwrap();
        assert!(matches!(
            other.decrypt(&envelope),
            Err(ArchiveError::Decryption(_))
        ));
    }

    #[test]
    fn keys_equal_after_normalization_interoperate() {
        // 32-char key and the same key with trailing garbage truncated away.
        let base = "0123456789abcdef0123456789abcdef";
        let vault = Vault::from_key_material(base);
        let longer = Vault::from_key_material(&format!("{base}-ignored-tail"));
        let envelope = vault.encrypt("secret").unwrap();
        assert_eq!(
            longer.decrypt(&envelope).unwrap().expose_secret(),
            "secret"
        );
    }

    #[test]
    fn malformed_base64_is_a_decryption_error() {
        let vault = Vault::from_key_material("operator-key");
        assert!(matches!(
            vault.decrypt("%%% not base64 %%%"),
            Err(ArchiveError::Decryption(_))
        ));
    }

    #[test]
    fn truncated_envelope_is_a_decryption_error() {
        let vault = Vault::from_key_material("operator-key");
        let short = BASE64.encode([0u8; 8]);
        assert!(matches!(
            vault.decrypt(&short),
            Err(ArchiveError::Decryption(_))
        ));
    }

    #[test]
    fn tampered_envelope_is_rejected() {
        let vault = Vault::from_key_material("operator-key");
        let envelope = vault.encrypt("secret").unwrap();
        let mut raw = BASE64.decode(&envelope).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let tampered = BASE64.encode(raw);
        assert!(vault.decrypt(&tampered).is_err());
    }

    #[test]
    fn debug_redacts_key_material() {
        let vault = Vault::from_key_material("operator-key");
        let rendered = format!("{vault:?}");
        assert!(!rendered.contains("operator-key"));
        assert!(rendered.contains("redacted"));
    }
}
