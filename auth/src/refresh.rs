use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Generate a refresh secret of `length` random bytes.
///
/// The bytes come from the OS random source and are returned base64url encoded
/// without padding so they travel safely in JSON bodies.
pub fn generate_refresh_secret(length: usize) -> Result<String, rand::Error> {
    let mut bytes = vec![0u8; length];
    OsRng.try_fill_bytes(&mut bytes)?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
