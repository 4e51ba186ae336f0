use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;

use super::encoded::EncodedHash;
use super::encoded::ARGON2_VERSION;
use super::errors::PasswordError;

/// Largest memory cost `verify` accepts from a stored hash (1 GiB).
pub const MAX_VERIFY_MEMORY_KIB: u32 = 1024 * 1024;

/// Argon2id cost parameters used when producing new hashes.
///
/// Verification never uses these; it reads the parameters back from the encoded hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
    /// Digest length in bytes
    pub output_len: usize,
    /// Random salt length in bytes
    pub salt_len: usize,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 64 * 1024,
            iterations: 3,
            parallelism: 1,
            output_len: 32,
            salt_len: 16,
        }
    }
}

/// Password hashing implementation.
///
/// Hashes login passwords and refresh secrets with Argon2id and encodes the result as
/// a self-describing `$argon2id$v=..$m=..,t=..,p=..$salt$hash` string.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Argon2Params,
}

impl PasswordHasher {
    /// Create a password hasher with the default cost parameters
    /// (64 MiB, 3 iterations, 1 lane, 32-byte digest, 16-byte salt).
    pub fn new() -> Self {
        Self::with_params(Argon2Params::default())
    }

    /// Create a password hasher with explicit cost parameters.
    pub fn with_params(params: Argon2Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &Argon2Params {
        &self.params
    }

    /// Hash a secret with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext secret to hash
    ///
    /// # Returns
    /// Encoded hash string
    ///
    /// # Errors
    /// * `RandomSourceFailed` - OS random source could not produce a salt
    /// * `HashingFailed` - Cost parameters rejected or hash computation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        if self.params.memory_kib > MAX_VERIFY_MEMORY_KIB {
            return Err(PasswordError::HashingFailed(format!(
                "memory cost {} KiB exceeds {} KiB",
                self.params.memory_kib, MAX_VERIFY_MEMORY_KIB
            )));
        }

        let mut salt = vec![0u8; self.params.salt_len];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::RandomSourceFailed(e.to_string()))?;

        let hash = derive(
            password.as_bytes(),
            &salt,
            self.params.memory_kib,
            self.params.iterations,
            self.params.parallelism,
            self.params.output_len,
        )
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        let encoded = EncodedHash {
            version: ARGON2_VERSION,
            memory_kib: self.params.memory_kib,
            iterations: self.params.iterations,
            parallelism: self.params.parallelism,
            salt,
            hash,
        };

        Ok(encoded.to_string())
    }

    /// Verify a secret against a stored encoded hash.
    ///
    /// The digest is recomputed with the parameters parsed from `hash` and compared
    /// in constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext secret to verify
    /// * `hash` - Stored encoded hash
    ///
    /// # Returns
    /// True if the secret matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash`, `UnsupportedVersion`, `BadParams`, `BadEncoding` - Stored hash cannot be parsed
    /// * `BadParams` - Stored memory cost exceeds [`MAX_VERIFY_MEMORY_KIB`]
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = EncodedHash::parse(hash)?;

        if parsed.memory_kib > MAX_VERIFY_MEMORY_KIB {
            return Err(PasswordError::BadParams(format!(
                "memory cost {} KiB exceeds {} KiB",
                parsed.memory_kib, MAX_VERIFY_MEMORY_KIB
            )));
        }

        let computed = derive(
            password.as_bytes(),
            &parsed.salt,
            parsed.memory_kib,
            parsed.iterations,
            parsed.parallelism,
            parsed.hash.len(),
        )
        .map_err(|e| PasswordError::BadParams(e.to_string()))?;

        Ok(bool::from(computed.as_slice().ct_eq(parsed.hash.as_slice())))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn derive(
    secret: &[u8],
    salt: &[u8],
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
    output_len: usize,
) -> Result<Vec<u8>, argon2::Error> {
    let params = Params::new(memory_kib, iterations, parallelism, Some(output_len))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut output = vec![0u8; output_len];
    argon2.hash_password_into(secret, salt, &mut output)?;
    Ok(output)
}
