// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Sealed bearer-token issuance and verification.
//!
//! Tokens are the JSON-serialized [`Credential`] sealed with AES-256-GCM
//! under a single shared 32-byte key and emitted as
//! `base64url(nonce || ciphertext)`. The AEAD tag makes the token
//! tamper-evident and the encryption keeps its contents opaque to holders;
//! tag verification happens inside the cipher, so no manual comparisons are
//! involved. Any process holding the key can verify tokens issued by any
//! other, which is what makes the scheme stateless.

use std::time::Duration;

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fleet_core::Role;

use super::Credential;

// =============================================================================
// Constants
// =============================================================================

/// Required key length in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// Nonce length in bytes (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// AEAD tag length in bytes (128 bits).
pub const TAG_LENGTH: usize = 16;

// =============================================================================
// TokenError
// =============================================================================

/// Errors produced by the token authority.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The configured key does not decode to exactly [`KEY_LENGTH`] bytes.
    /// Fatal at startup; the server must not come up with a malformed key.
    #[error("token key must be {KEY_LENGTH} bytes, got {actual}")]
    KeyConfiguration {
        /// Actual decoded key length.
        actual: usize,
    },

    /// The configured token lifetime is zero or out of range. Fatal at
    /// startup, like a malformed key.
    #[error("token lifetime must be positive")]
    LifetimeConfiguration,

    /// The token is malformed, was tampered with, or was sealed under a
    /// different key. Deliberately carries no further detail.
    #[error("invalid token")]
    Invalid,

    /// The token parsed correctly but its validity window has elapsed.
    #[error("token has expired")]
    Expired,
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Token authority configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Base64-encoded 32-byte sealing key.
    #[serde(skip_serializing)]
    pub key: String,
    /// Token lifetime.
    #[serde(with = "duration_secs")]
    pub ttl: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            key: String::new(), // Must be set by the operator
            ttl: Duration::from_secs(15 * 60),
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given base64-encoded key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    /// Sets the token lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Decodes and validates the key material.
    fn key_bytes(&self) -> Result<[u8; KEY_LENGTH], TokenError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(&self.key)
            .or_else(|_| base64::engine::general_purpose::STANDARD.decode(&self.key))
            .map_err(|_| TokenError::KeyConfiguration { actual: 0 })?;
        if bytes.len() != KEY_LENGTH {
            return Err(TokenError::KeyConfiguration {
                actual: bytes.len(),
            });
        }
        let mut key = [0u8; KEY_LENGTH];
        key.copy_from_slice(&bytes);
        Ok(key)
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// =============================================================================
// TokenAuthority
// =============================================================================

/// Issues and verifies sealed bearer credentials.
///
/// Construction validates the key once; after that, issuance and
/// verification are pure functions of the request and the clock and can run
/// on any number of tasks concurrently.
#[derive(Clone)]
pub struct TokenAuthority {
    cipher: Aes256Gcm,
    ttl: chrono::Duration,
}

impl TokenAuthority {
    /// Creates a token authority from the given configuration.
    ///
    /// Fails with [`TokenError::KeyConfiguration`] unless the key decodes to
    /// exactly 32 bytes, and when the configured lifetime is zero.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        let key_bytes = config.key_bytes()?;
        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        let ttl = chrono::Duration::from_std(config.ttl)
            .map_err(|_| TokenError::LifetimeConfiguration)?;
        if ttl <= chrono::Duration::zero() {
            return Err(TokenError::LifetimeConfiguration);
        }
        Ok(Self {
            cipher: Aes256Gcm::new(key),
            ttl,
        })
    }

    /// Issues a sealed token for the given subject and role.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, TokenError> {
        let credential = Credential::new(subject, role, self.ttl);
        self.seal(&credential)
    }

    /// Seals an already-built credential.
    ///
    /// Exposed separately so tests can seal credentials with arbitrary
    /// validity windows.
    pub fn seal(&self, credential: &Credential) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(credential).map_err(|_| TokenError::Invalid)?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, payload.as_ref())
            .map_err(|_| TokenError::Invalid)?;

        let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(sealed))
    }

    /// Verifies a token against the current clock.
    pub fn verify(&self, token: &str) -> Result<Credential, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token against the given instant.
    ///
    /// Every decoding, length, and authentication failure collapses into
    /// [`TokenError::Invalid`]; only a structurally valid credential past its
    /// window reports [`TokenError::Expired`].
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Credential, TokenError> {
        let sealed = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| TokenError::Invalid)?;

        if sealed.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(TokenError::Invalid);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce_bytes);

        let payload = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| TokenError::Invalid)?;

        let credential: Credential =
            serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)?;

        if credential.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(credential)
    }

    /// Returns the configured token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

/// Generates a fresh random sealing key, base64-encoded.
pub fn generate_key() -> String {
    let key = Aes256Gcm::generate_key(&mut OsRng);
    URL_SAFE_NO_PAD.encode(key)
}

// =============================================================================
// Tests
// =============================================================================
