use std::fmt;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use super::errors::PasswordError;

/// Algorithm tag written into every encoded hash.
pub const ALGORITHM_TAG: &str = "argon2id";

/// Argon2 version 1.3 (0x13).
pub const ARGON2_VERSION: u32 = 0x13;

/// Self-describing Argon2id hash.
///
/// Grammar: `$argon2id$v=<int>$m=<int>,t=<int>,p=<int>$<salt>$<hash>` where salt and
/// hash are standard base64 without padding. Exactly six `$`-delimited fields; the
/// first one is empty.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedHash {
    pub version: u32,
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
    pub salt: Vec<u8>,
    pub hash: Vec<u8>,
}

impl EncodedHash {
    /// Parse an encoded hash string.
    ///
    /// # Errors
    /// * `MalformedHash` - Wrong field count, wrong algorithm tag or unreadable version field
    /// * `UnsupportedVersion` - Version is not 0x13
    /// * `BadParams` - Cost parameter field is not `m=..,t=..,p=..`
    /// * `BadEncoding` - Salt or hash is not strict unpadded base64
    pub fn parse(encoded: &str) -> Result<Self, PasswordError> {
        let fields: Vec<&str> = encoded.split('$').collect();
        let [prefix, tag, version, params, salt, hash] = fields.as_slice() else {
            return Err(PasswordError::MalformedHash);
        };

        if !prefix.is_empty() || *tag != ALGORITHM_TAG {
            return Err(PasswordError::MalformedHash);
        }

        let version = version
            .strip_prefix("v=")
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or(PasswordError::MalformedHash)?;
        if version != ARGON2_VERSION {
            return Err(PasswordError::UnsupportedVersion(version));
        }

        let (memory_kib, iterations, parallelism) = parse_params(params)?;

        Ok(Self {
            version,
            memory_kib,
            iterations,
            parallelism,
            salt: decode_field("salt", salt)?,
            hash: decode_field("hash", hash)?,
        })
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM_TAG,
            self.version,
            self.memory_kib,
            self.iterations,
            self.parallelism,
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.hash),
        )
    }
}

// Salt and digest stay out of debug output.
impl fmt::Debug for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedHash")
            .field("version", &self.version)
            .field("memory_kib", &self.memory_kib)
            .field("iterations", &self.iterations)
            .field("parallelism", &self.parallelism)
            .field("salt_len", &self.salt.len())
            .field("hash_len", &self.hash.len())
            .finish()
    }
}

fn parse_params(field: &str) -> Result<(u32, u32, u32), PasswordError> {
    let mut parts = field.split(',');
    let memory_kib = parse_param(parts.next(), "m")?;
    let iterations = parse_param(parts.next(), "t")?;
    let parallelism = parse_param(parts.next(), "p")?;

    if parts.next().is_some() {
        return Err(PasswordError::BadParams(
            "unexpected trailing parameter".to_string(),
        ));
    }

    Ok((memory_kib, iterations, parallelism))
}

fn parse_param(part: Option<&str>, name: &str) -> Result<u32, PasswordError> {
    let value = part
        .and_then(|p| p.strip_prefix(name))
        .and_then(|p| p.strip_prefix('='))
        .ok_or_else(|| PasswordError::BadParams(format!("missing '{}' parameter", name)))?;

    value
        .parse::<u32>()
        .map_err(|e| PasswordError::BadParams(format!("'{}': {}", name, e)))
}

fn decode_field(name: &str, value: &str) -> Result<Vec<u8>, PasswordError> {
    STANDARD_NO_PAD
        .decode(value)
        .map_err(|e| PasswordError::BadEncoding(format!("{}: {}", name, e)))
}
