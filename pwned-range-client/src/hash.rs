use std::fmt;

use sha1::{Digest, Sha1};

/// The length of a SHA1 hash rendered as hex.
pub const HASH_HEX_LEN: usize = 40;

/// The length of the hash prefix sent to the range API (5 hex characters).
pub const PREFIX_LEN: usize = 5;

/// The length of the hash suffix compared locally against the range response.
pub const SUFFIX_LEN: usize = HASH_HEX_LEN - PREFIX_LEN;

/// Hex lookup table for uppercase rendering.
pub const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Uppercase hex SHA1 of a password.
///
/// The password is always hashed as its UTF-8 bytes, so the same password
/// produces the same hash on every platform and locale.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PasswordHash {
    hex: [u8; HASH_HEX_LEN],
}

impl PasswordHash {
    /// Hashes the password with a fresh SHA1 context.
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(password.as_bytes());
        let hash: [u8; 20] = hasher.finalize().into();

        let mut hex = [0u8; HASH_HEX_LEN];
        for (i, byte) in hash.iter().enumerate() {
            hex[i * 2] = HEX_CHARS[(byte >> 4) as usize];
            hex[i * 2 + 1] = HEX_CHARS[(byte & 0x0f) as usize];
        }

        Self { hex }
    }

    /// The full 40-character hash.
    pub fn as_str(&self) -> &str {
        // SAFETY: every byte comes from HEX_CHARS, which is ASCII.
        unsafe { std::str::from_utf8_unchecked(&self.hex) }
    }

    /// The first 5 characters, the only part ever sent over the network.
    pub fn prefix(&self) -> &str {
        &self.as_str()[..PREFIX_LEN]
    }

    /// The remaining 35 characters, matched against the range response.
    pub fn suffix(&self) -> &str {
        &self.as_str()[PREFIX_LEN..]
    }

    pub fn split(&self) -> (&str, &str) {
        self.as_str().split_at(PREFIX_LEN)
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Only the prefix is shown so a stray `{:?}` never puts a full hash in a log.
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash").field("prefix", &self.prefix()).finish_non_exhaustive()
    }
}
