//! Secret stretching turns the shared, human-memorable secret into the 32 byte master key.
//!
//! Both parties have to arrive at the same key from the secret alone, so there is no salt. The scrypt cost is what makes guessing the secret offline expensive. Test builds swap scrypt for a single SHA-256 so the suite runs in seconds; that path is compiled out of every other build.

#[cfg(test)]
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::Error;
use crate::kdf::{SecretKey, KEY_LENGTH};

/// SCRYPT_LOG_N is log2 of the scrypt work factor (N = 2^16)
pub const SCRYPT_LOG_N: u8 = 16;
/// SCRYPT_R is the scrypt block size
pub const SCRYPT_R: u32 = 16;
/// SCRYPT_P is the scrypt parallelism
pub const SCRYPT_P: u32 = 4;

/// stretch derives the master key for an exchange
#[cfg(not(test))]
pub fn stretch(secret: &[u8]) -> Result<SecretKey, Error> {
    scrypt_key(secret)
}

/// stretch derives the master key for an exchange (fast, test builds only)
#[cfg(test)]
pub fn stretch(secret: &[u8]) -> Result<SecretKey, Error> {
    Ok(Zeroizing::new(Sha256::digest(secret).into()))
}

/// scrypt_key runs scrypt(secret, no salt, 2^16, 16, 4) into a 32 byte key
pub fn scrypt_key(secret: &[u8]) -> Result<SecretKey, Error> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LENGTH)?;
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    scrypt::scrypt(secret, &[], &params, key.as_mut_slice())?;
    Ok(key)
}

/* ------------------------------------------------------------------------- */

// TESTS
