use std::fmt;

use auth::cipher;
use auth::CipherError;

use crate::config::EncryptionConfig;

/// Object type a sensitive field belongs to. Each category has its own static key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCategory {
    Account,
    BankCard,
}

/// Encrypts sensitive object fields before they are persisted and decrypts them on the way out.
#[derive(Clone)]
pub struct SensitiveFieldCipher {
    account_key: Vec<u8>,
    bank_card_key: Vec<u8>,
}

impl SensitiveFieldCipher {
    pub fn new(account_key: impl Into<Vec<u8>>, bank_card_key: impl Into<Vec<u8>>) -> Self {
        Self {
            account_key: account_key.into(),
            bank_card_key: bank_card_key.into(),
        }
    }

    pub fn from_config(config: &EncryptionConfig) -> Self {
        Self::new(
            config.account_obj_key.as_bytes(),
            config.bank_card_obj_key.as_bytes(),
        )
    }

    /// Check that every configured key has an AES key size.
    ///
    /// # Errors
    /// * `InvalidKeyLength` - First key found with a bad length
    pub fn check_keys(&self) -> Result<(), CipherError> {
        for key in [&self.account_key, &self.bank_card_key] {
            if !matches!(key.len(), 16 | 24 | 32) {
                return Err(CipherError::InvalidKeyLength(key.len()));
            }
        }
        Ok(())
    }

    /// Encrypt a field value with the key of its category.
    ///
    /// # Returns
    /// `IV || ciphertext`, ready to be stored
    pub fn seal(&self, category: FieldCategory, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        cipher::encrypt(plaintext, self.key(category))
    }

    /// Decrypt a stored field value with the key of its category.
    pub fn open(&self, category: FieldCategory, blob: &[u8]) -> Result<Vec<u8>, CipherError> {
        cipher::decrypt(blob, self.key(category))
    }

    fn key(&self, category: FieldCategory) -> &[u8] {
        match category {
            FieldCategory::Account => &self.account_key,
            FieldCategory::BankCard => &self.bank_card_key,
        }
    }
}

impl fmt::Debug for SensitiveFieldCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensitiveFieldCipher").finish_non_exhaustive()
    }
}
