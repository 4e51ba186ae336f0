pub mod argon2;
pub mod encoded;
pub mod errors;

pub use argon2::Argon2Params;
pub use argon2::PasswordHasher;
pub use encoded::EncodedHash;
pub use errors::PasswordError;
