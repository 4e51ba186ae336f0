pub mod aes_cbc;
pub mod errors;

pub use aes_cbc::decrypt;
pub use aes_cbc::encrypt;
pub use aes_cbc::BLOCK_SIZE;
pub use errors::CipherError;
