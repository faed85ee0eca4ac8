//! Community-based access control.

use bytes::Bytes;

use crate::error::{Error, Result};

/// Read and read-write community strings.
///
/// Matching is exact and case-sensitive. A community equal to the write
/// community grants write access even if it also equals the read community.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Communities {
    read: Bytes,
    write: Bytes,
}

impl Communities {
    /// Create from the read-only and read-write community strings.
    pub fn new(read: impl Into<Bytes>, write: impl Into<Bytes>) -> Self {
        Self {
            read: read.into(),
            write: write.into(),
        }
    }

    /// Check a request's community.
    ///
    /// Returns whether the community may write, or
    /// [`Error::InvalidCommunity`] if it matches neither string.
    pub fn check(&self, community: &[u8]) -> Result<bool> {
        if community == self.write.as_ref() {
            Ok(true)
        } else if community == self.read.as_ref() {
            Ok(false)
        } else {
            // Length only, never the string.
            tracing::debug!(community_len = community.len(), "rejecting unknown community");
            Err(Error::InvalidCommunity { target: None })
        }
    }

    /// The read-only community.
    pub fn read(&self) -> &[u8] {
        &self.read
    }

    /// The read-write community.
    pub fn write(&self) -> &[u8] {
        &self.write
    }
}

impl Default for Communities {
    /// `public` / `private`.
    fn default() -> Self {
        Self::new(Bytes::from_static(b"public"), Bytes::from_static(b"private"))
    }
}
