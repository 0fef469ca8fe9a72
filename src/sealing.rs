//! Padding and authenticated encryption of protocol bodies.
//!
//! Every body posted to the relay is exactly BODY_SIZE bytes: a 24 byte nonce followed by XSalsa20-Poly1305 over a zero-padded, length-prefixed payload. The nonce is derived from the key and the payload, so sealing the same payload twice gives the same body and distinct payloads never share a nonce.

use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{Aead, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use zeroize::Zeroizing;

use crate::error::Error;
use crate::kdf::{derive, KEY_LENGTH};

/// BODY_SIZE is the size of every sealed body (128 KiB)
pub const BODY_SIZE: usize = 1 << 17;
/// NONCE_LENGTH is the XSalsa20 nonce size, 24 bytes
pub const NONCE_LENGTH: usize = 24;
/// TAG_OVERHEAD is the Poly1305 tag size, 16 bytes
pub const TAG_OVERHEAD: usize = 16;
/// LENGTH_PREFIX is the 2 byte little-endian payload length at the start of the padded plaintext
const LENGTH_PREFIX: usize = 2;
/// PADDED_LENGTH is the plaintext size before encryption
const PADDED_LENGTH: usize = BODY_SIZE - NONCE_LENGTH - TAG_OVERHEAD;
/// MAX_MESSAGE_LEN is the largest payload that fits in a body. The length prefix is only 16 bits wide, so a peer reads back len % 65536 bytes of anything longer than 65535; keep messages below that if they must arrive whole.
pub const MAX_MESSAGE_LEN: usize = BODY_SIZE - NONCE_LENGTH - TAG_OVERHEAD - LENGTH_PREFIX;

/// seal pads content and encrypts it under key, returning nonce || ciphertext (always BODY_SIZE bytes)
///
/// Panics if content is longer than MAX_MESSAGE_LEN; callers check message sizes before an exchange is ever built.
pub fn seal(key: &[u8; KEY_LENGTH], content: &[u8]) -> Vec<u8> {
    assert!(content.len() <= MAX_MESSAGE_LEN, "sealed payload of {} bytes does not fit in a body", content.len());
    let derived = derive(key, content);
    let nonce = GenericArray::from_slice(&derived[..NONCE_LENGTH]);

    // The wire format only has room for 16 bits of length, larger payloads carry the low 16 bits
    let mut padded = Zeroizing::new(vec![0u8; PADDED_LENGTH]);
    padded[..LENGTH_PREFIX].copy_from_slice(&(content.len() as u16).to_le_bytes());
    padded[LENGTH_PREFIX..LENGTH_PREFIX + content.len()].copy_from_slice(content);

    let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key));
    let sealed = cipher.encrypt(nonce, padded.as_slice()).expect("XSalsa20-Poly1305 seals any body-sized plaintext");

    let mut body = Vec::with_capacity(BODY_SIZE);
    body.extend_from_slice(nonce);
    body.extend_from_slice(&sealed);
    body
}

/// open authenticates and decrypts a body sealed under key, returning the payload without padding
pub fn open(key: &[u8; KEY_LENGTH], body: &[u8]) -> Result<Vec<u8>, Error> {
    if body.len() < NONCE_LENGTH + TAG_OVERHEAD + LENGTH_PREFIX {
        return Err(Error::ReplyTooShort);
    }
    let (nonce, sealed) = body.split_at(NONCE_LENGTH);
    let cipher = XSalsa20Poly1305::new(GenericArray::from_slice(key));
    let padded = Zeroizing::new(
        cipher
            .decrypt(GenericArray::from_slice(nonce), sealed)
            .map_err(|_| Error::Unauthenticated)?,
    );
    let len = u16::from_le_bytes([padded[0], padded[1]]) as usize;
    let rest = &padded[LENGTH_PREFIX..];
    if len > rest.len() {
        return Err(Error::CorruptLength);
    }
    Ok(rest[..len].to_vec())
}

/* ------------------------------------------------------------------------- */

// TESTS
