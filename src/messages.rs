//! Requests handed to the caller for posting on the relay.

use std::fmt;

use crate::kdf::KEY_LENGTH;

/// Request wraps up what the caller has to POST to the relay:
///
/// - a tag: the key the relay files the body under. Both parties derive the same tag for a given round, which is how they find each other's posts.
/// - a body: the sealed, padded protocol message (always `BODY_SIZE` bytes)
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    pub tag: [u8; KEY_LENGTH],
    pub body: Vec<u8>,
}

impl Request {
    /// new wraps up a tag and body
    pub fn new(tag: [u8; KEY_LENGTH], body: Vec<u8>) -> Request {
        Request { tag, body }
    }

    /// tag_hex is the tag as lowercase hex, handy for relays that key on strings
    pub fn tag_hex(&self) -> String {
        hex::encode(self.tag)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("tag", &self.tag_hex())
            .field("body_len", &self.body.len())
            .finish()
    }
}

/* ------------------------------------------------------------------------- */

// TESTS
