//! # PANDA Exchange Library
//!
//! A pure rust implementation of the PANDA exchange: two people who share a short, human-memorable secret use it to swap one short message (typically a public key) through an untrusted relay, without the relay or anyone watching learning the message.
//!
//! ### Warnings and Disclaimers
//!
//! - The relay only ever sees random-looking, fixed-size bodies filed under random-looking tags. It still learns *when* two parties exchanged something.
//! - The secret is stretched with expensive scrypt and cannot be salted. Guessing it offline is only useful to an attacker *during* an exchange: once round one is done the message is protected by a session key the secret alone doesn't reveal.
//! - A persisted exchange (`Exchange::serialize`) is NOT encrypted and contains every secret. Store it accordingly, and delete it when the exchange is over.
//!
//! ### Examples / API
//!
//! Alice and Bob agreed on the secret "hunter2" in person. Each creates an exchange carrying the message they want the other to receive. This takes a few seconds (scrypt).
//!
//! ```rust
//! let mut alice = Exchange::new(&mut OsRng, b"hunter2", alice_public_key)?;
//! ```
//!
//! Each side asks its exchange what to post, posts the body under the tag, and polls the relay for the other body under the same tag. Posting is idempotent, so it is fine to post again on every poll.
//!
//! ```rust
//! let request = alice.next_request();
//! relay.post(&request.tag, &request.body)?;
//! if let Some(reply) = relay.get(&request.tag)? {
//!     let peer_message = alice.process(&reply)?;
//! }
//! ```
//!
//! The first successful `process` returns `None`: the SPAKE2 round is done and both sides now share a strong session key. Ask for `next_request` again (it now has a new tag) and repeat. The second successful `process` returns Bob's message and the exchange is finished.
//!
//! Messages can be up to `MAX_MESSAGE_LEN` (131030) bytes, but the body only records the low 16 bits of the length, so keep messages ≤ 65535 bytes if they must arrive whole. A longer message reaches the peer as its first `len % 65536` bytes, with no error on either side.
//!
//! Between polls, which may be days apart, the exchange can be written out and read back:
//!
//! ```rust
//! let saved = alice.serialize();
//! let alice = Exchange::deserialize(&saved)?;
//! ```
//!
//! ### Under the Hood
//!
//! The exchange is two rounds. In round one each side posts a SPAKE2 value, masked with a group element derived from the secret, sealed under the stretched secret. Processing the peer's value yields the session key. In round two each side posts its message sealed under that session key. Every body is padded to the same 128 KiB so its size says nothing about the message, and nonces are derived from the key and contents, so nothing depends on the caller's randomness after the private exponent is drawn.
//!
//! The library does no I/O. Talking to the relay, retrying and giving up are the caller's job. Progress is reported through `tracing` at debug/trace level (relay tags and round numbers only, never secrets), so nothing is printed unless the application installs a subscriber.

mod error;
mod exchange;
mod group;
mod kdf;
mod messages;
mod sealing;
mod spake;
mod state;
mod stretch;
#[cfg(test)]
mod testing;

pub use error::Error;
pub use exchange::Exchange;
pub use messages::Request;
pub use sealing::{BODY_SIZE, MAX_MESSAGE_LEN};
