//! Client identity and identity generators.
//!
//! The detector routes each reply back to the socket whose identity sent the
//! frame, so every concurrently connected client needs a distinct identity.
//! Uniqueness is advisory: a random UUID is enough in practice.
//!
//! Generators are injected at connect time, which lets tests pin the
//! identity with [`SequentialIdentity`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use uuid::Uuid;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Maximum identity length in bytes.
pub const MAX_IDENTITY_LEN: usize = 255;

// ============================================================================
// ClientIdentity
// ============================================================================

/// Identity a client announces to the detector before connecting.
///
/// Always 1..=255 bytes of visible ASCII, so it can travel as a handshake
/// header value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    /// Creates an identity after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the value is empty, too long, or
    /// contains characters outside visible ASCII.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        Self(value.into()).validated()
    }

    /// Checks an identity produced by an [`IdentityGenerator`].
    pub(crate) fn validated(self) -> Result<Self> {
        let value = &self.0;

        if value.is_empty() {
            return Err(Error::config("client identity must not be empty"));
        }

        if value.len() > MAX_IDENTITY_LEN {
            return Err(Error::config(format!(
                "client identity is {} bytes, maximum is {MAX_IDENTITY_LEN}",
                value.len()
            )));
        }

        if !value.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(Error::config(format!(
                "client identity {value:?} contains non-printable characters"
            )));
        }

        Ok(self)
    }

    /// Returns the identity as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// IdentityGenerator
// ============================================================================

/// Source of client identities.
pub trait IdentityGenerator {
    /// Produces the identity for the next client.
    fn generate(&mut self) -> ClientIdentity;
}

/// Random UUID v4 identities. Used by [`EdgeClient::connect`].
///
/// [`EdgeClient::connect`]: crate::EdgeClient::connect
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentity;

impl IdentityGenerator for UuidIdentity {
    fn generate(&mut self) -> ClientIdentity {
        // Hyphenated UUIDs are always 36 visible ASCII bytes.
        ClientIdentity(Uuid::new_v4().to_string())
    }
}

/// Deterministic `{prefix}{n}` identities.
#[derive(Debug, Clone)]
pub struct SequentialIdentity {
    prefix: String,
    next: u64,
}

impl SequentialIdentity {
    /// Creates a generator that starts counting at zero.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl IdentityGenerator for SequentialIdentity {
    fn generate(&mut self) -> ClientIdentity {
        let value = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        ClientIdentity(value)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_validation() {
        assert!(ClientIdentity::new("edge-7").is_ok());
        assert!(ClientIdentity::new("").is_err());
        assert!(ClientIdentity::new("has space").is_err());
        assert!(ClientIdentity::new("x".repeat(MAX_IDENTITY_LEN)).is_ok());
        assert!(ClientIdentity::new("x".repeat(MAX_IDENTITY_LEN + 1)).is_err());
    }

    #[test]
    fn test_uuid_identities_differ() {
        let mut generator = UuidIdentity;
        let a = generator.generate();
        let b = generator.generate();

        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert!(ClientIdentity::new(a.as_str()).is_ok());
    }

    #[test]
    fn test_sequential_identity() {
        let mut generator = SequentialIdentity::new("cam-");
        assert_eq!(generator.generate().as_str(), "cam-0");
        assert_eq!(generator.generate().as_str(), "cam-1");
    }

    #[test]
    fn test_identity_display() {
        let id = ClientIdentity::new("edge-1").unwrap();
        assert_eq!(id.to_string(), "edge-1");
    }
}
