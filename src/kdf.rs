//! Key derivation. Every value the exchange needs (masking exponent, relay tags, nonces, the session key) comes out of HMAC-SHA256 keyed with the exchange's own secret.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

/// KEY_LENGTH is 32 bytes
pub const KEY_LENGTH: usize = 32;
/// SPAKE_CONTEXT derives the masking exponent pw
pub const SPAKE_CONTEXT: &[u8] = b"spake";
/// ROUND_ONE_TAG_CONTEXT derives the relay tag for the SPAKE2 round
pub const ROUND_ONE_TAG_CONTEXT: &[u8] = b"round one tag";
/// ROUND_TWO_TAG_CONTEXT derives the relay tag for the message round
pub const ROUND_TWO_TAG_CONTEXT: &[u8] = b"round two tag";

/// SecretKey is a 32 byte key that is wiped when dropped
pub type SecretKey = Zeroizing<[u8; KEY_LENGTH]>;

type HmacSha256 = Hmac<Sha256>;

/// mac computes HMAC-SHA256 under key over the concatenation of parts
pub fn mac(key: &[u8], parts: &[&[u8]]) -> [u8; KEY_LENGTH] {
    let mut hmac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    for part in parts {
        hmac.update(part);
    }
    hmac.finalize().into_bytes().into()
}

/// derive returns HMAC(key, context || key). Feeding the key back in as message binds the output to this exchange's secret as well as to the context.
pub fn derive(key: &[u8; KEY_LENGTH], context: &[u8]) -> [u8; KEY_LENGTH] {
    mac(key, &[context, key.as_slice()])
}

/* ------------------------------------------------------------------------- */

// TESTS
