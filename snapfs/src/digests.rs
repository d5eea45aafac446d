use bytes::Bytes;
use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The blake3 digest content-addressing trees, snapshots and file contents.
#[derive(PartialEq, Eq, Hash, Clone, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct B3Digest(Bytes);

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("invalid digest length: {0}")]
    InvalidDigestLen(usize),

    #[error("invalid digest encoding: {0}")]
    InvalidEncoding(String),
}

pub const B3_LEN: usize = 32;

const DISPLAY_PREFIX: &str = "b3:";

impl B3Digest {
    /// Hashes the passed data with blake3.
    pub fn of(data: &[u8]) -> Self {
        blake3::hash(data).into()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0[..]
    }
}

impl From<blake3::Hash> for B3Digest {
    fn from(value: blake3::Hash) -> Self {
        Self(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<&[u8; B3_LEN]> for B3Digest {
    fn from(value: &[u8; B3_LEN]) -> Self {
        Self(Bytes::copy_from_slice(value))
    }
}

impl TryFrom<Bytes> for B3Digest {
    type Error = Error;

    // constructs a [B3Digest] from a [bytes::Bytes].
    // Returns an error if the digest has the wrong length.
    fn try_from(value: Bytes) -> Result<Self, Self::Error> {
        if value.len() != B3_LEN {
            Err(Error::InvalidDigestLen(value.len()))
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<&[u8]> for B3Digest {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Bytes::copy_from_slice(value).try_into()
    }
}

impl std::str::FromStr for B3Digest {
    type Err = Error;

    /// Parses the `b3:<base64>` form produced by [std::fmt::Display].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(DISPLAY_PREFIX)
            .ok_or_else(|| Error::InvalidEncoding(s.to_string()))?;

        let decoded = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| Error::InvalidEncoding(e.to_string()))?;

        Bytes::from(decoded).try_into()
    }
}

impl TryFrom<String> for B3Digest {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<B3Digest> for String {
    fn from(value: B3Digest) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for B3Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, BASE64.encode(&self.0))
    }
}

impl std::fmt::Debug for B3Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", DISPLAY_PREFIX, BASE64.encode(&self.0))
    }
}
