use aes::Aes128;
use aes::Aes192;
use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::BlockDecryptMut;
use cbc::cipher::BlockEncryptMut;
use cbc::cipher::KeyIvInit;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::CipherError;

/// AES block size in bytes; also the IV length.
pub const BLOCK_SIZE: usize = 16;

/// Encrypt a sensitive value with AES-CBC.
///
/// The key size selects AES-128, AES-192 or AES-256. The plaintext is PKCS#7 padded
/// and encrypted under a fresh random IV, so equal plaintexts never produce equal blobs.
///
/// # Arguments
/// * `plaintext` - Value to protect
/// * `key` - 16, 24 or 32 byte key
///
/// # Returns
/// `IV || ciphertext`
///
/// # Errors
/// * `InvalidKeyLength` - Key is not 16, 24 or 32 bytes
/// * `RandomSourceFailed` - OS random source could not produce an IV
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    validate_key(key)?;

    let mut iv = [0u8; BLOCK_SIZE];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| CipherError::RandomSourceFailed(e.to_string()))?;

    let padding = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut blob = Vec::with_capacity(BLOCK_SIZE + plaintext.len() + padding);
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(plaintext);
    blob.resize(blob.len() + padding, padding as u8);

    let body = &mut blob[BLOCK_SIZE..];
    match key.len() {
        16 => encrypt_in_place::<cbc::Encryptor<Aes128>>(key, &iv, body)?,
        24 => encrypt_in_place::<cbc::Encryptor<Aes192>>(key, &iv, body)?,
        _ => encrypt_in_place::<cbc::Encryptor<Aes256>>(key, &iv, body)?,
    }

    Ok(blob)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// # Arguments
/// * `blob` - `IV || ciphertext`
/// * `key` - Key the blob was encrypted with
///
/// # Returns
/// Decrypted plaintext
///
/// # Errors
/// * `InvalidKeyLength` - Key is not 16, 24 or 32 bytes
/// * `CiphertextTooShort` - Blob is shorter than IV plus one block
/// * `InvalidBlockLength` - Ciphertext is not a whole number of blocks
/// * `InvalidPadding` - PKCS#7 padding is not well formed
pub fn decrypt(blob: &[u8], key: &[u8]) -> Result<Vec<u8>, CipherError> {
    validate_key(key)?;

    if blob.len() < 2 * BLOCK_SIZE {
        return Err(CipherError::CiphertextTooShort);
    }

    let (iv, ciphertext) = blob.split_at(BLOCK_SIZE);
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(CipherError::InvalidBlockLength);
    }

    let mut buffer = ciphertext.to_vec();
    match key.len() {
        16 => decrypt_in_place::<cbc::Decryptor<Aes128>>(key, iv, &mut buffer)?,
        24 => decrypt_in_place::<cbc::Decryptor<Aes192>>(key, iv, &mut buffer)?,
        _ => decrypt_in_place::<cbc::Decryptor<Aes256>>(key, iv, &mut buffer)?,
    }

    let plaintext_len = unpadded_len(&buffer)?;
    buffer.truncate(plaintext_len);
    Ok(buffer)
}

fn validate_key(key: &[u8]) -> Result<(), CipherError> {
    match key.len() {
        16 | 24 | 32 => Ok(()),
        other => Err(CipherError::InvalidKeyLength(other)),
    }
}

fn encrypt_in_place<E>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<(), CipherError>
where
    E: KeyIvInit + BlockEncryptMut,
{
    let len = buffer.len();
    E::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
        .encrypt_padded_mut::<NoPadding>(buffer, len)
        .map_err(|_| CipherError::InvalidBlockLength)?;
    Ok(())
}

fn decrypt_in_place<D>(key: &[u8], iv: &[u8], buffer: &mut [u8]) -> Result<(), CipherError>
where
    D: KeyIvInit + BlockDecryptMut,
{
    D::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?
        .decrypt_padded_mut::<NoPadding>(buffer)
        .map_err(|_| CipherError::InvalidBlockLength)?;
    Ok(())
}

// PKCS#7: the last byte n must be in 1..=BLOCK_SIZE and the last n bytes must all equal n.
fn unpadded_len(buffer: &[u8]) -> Result<usize, CipherError> {
    let Some(&last) = buffer.last() else {
        return Err(CipherError::InvalidPadding);
    };

    let padding = usize::from(last);
    if padding == 0 || padding > BLOCK_SIZE || padding > buffer.len() {
        return Err(CipherError::InvalidPadding);
    }

    let content_len = buffer.len() - padding;
    if buffer[content_len..].iter().any(|&b| b != last) {
        return Err(CipherError::InvalidPadding);
    }

    Ok(content_len)
}
