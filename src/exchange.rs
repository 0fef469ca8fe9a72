//! The Exchange drives the two rounds of the protocol.
//!
//! Round one swaps masked SPAKE2 values sealed under the master key; once the peer's value is processed both sides hold the same session key. Round two swaps the actual messages sealed under that session key. An exchange in round one holds the private scalar, an exchange in round two holds the session key, and nothing holds both (the two are split so there is no "flag says done but key is missing" state to guard against).

use std::fmt;

use rand_core::{CryptoRng, RngCore};
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::error::Error;
use crate::kdf::{derive, SecretKey, ROUND_ONE_TAG_CONTEXT, ROUND_TWO_TAG_CONTEXT};
use crate::messages::Request;
use crate::sealing::{open, seal, MAX_MESSAGE_LEN};
use crate::spake::{self, KeyPair};
use crate::stretch::stretch;

/// Round is the only part of an Exchange that ever changes, and it changes once.
pub(crate) enum Round {
    /// One: waiting for the peer's masked value
    One(KeyPair),
    /// Two: session key established, waiting for (or holding) the peer's message
    Two { session_key: SecretKey },
}

/// Exchange is one party's side of a single exchange attempt.
///
/// Fields:
///
/// - master_key: stretched from the shared secret, fixed for the life of the exchange
///
/// - message: what we deliver to the peer, fixed at creation
///
/// - round: the SPAKE2 key pair before the session key exists, the session key afterwards
pub struct Exchange {
    pub(crate) master_key: SecretKey,
    pub(crate) message: Zeroizing<Vec<u8>>,
    pub(crate) round: Round,
}

impl Exchange {
    /// new stretches the shared secret and draws a fresh SPAKE2 key pair. With production stretching this takes seconds and ~128 MiB of memory.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R, secret: &[u8], message: &[u8]) -> Result<Exchange, Error> {
        // Checked first so a caller with an oversized message doesn't wait on scrypt to find out
        if message.len() > MAX_MESSAGE_LEN {
            return Err(Error::MessageTooLarge { len: message.len(), max: MAX_MESSAGE_LEN });
        }
        let master_key = stretch(secret)?;
        let key_pair = KeyPair::generate(rng, &master_key)?;
        debug!(message_len = message.len(), "created exchange");
        Ok(Exchange {
            master_key,
            message: Zeroizing::new(message.to_vec()),
            round: Round::One(key_pair),
        })
    }

    /// session_established is true once round one has been processed
    pub fn session_established(&self) -> bool {
        matches!(self.round, Round::Two { .. })
    }

    /// next_request returns the tag and body to post for the current round. Calling it again without processing a reply gives byte-identical output, so it is safe to re-post after a crash or a lost response.
    pub fn next_request(&self) -> Request {
        let request = match &self.round {
            // First round: exchange SPAKE2 public values
            Round::One(key_pair) => Request::new(
                derive(&self.master_key, ROUND_ONE_TAG_CONTEXT),
                seal(&self.master_key, &key_pair.public.to_bytes_be()),
            ),
            // Second round: send the message itself
            Round::Two { session_key } => Request::new(
                derive(&self.master_key, ROUND_TWO_TAG_CONTEXT),
                seal(session_key, &self.message),
            ),
        };
        trace!(tag = %request.tag_hex(), round = self.round_number(), "built request");
        request
    }

    /// process consumes the peer's body, fetched from the relay under the tag of the last next_request.
    ///
    /// In round one it returns Ok(None): the session key is now established and the caller should post next_request() again. In round two it returns the peer's message; the exchange is finished and processing the same reply again returns the same message. On error nothing about the exchange changes.
    pub fn process(&mut self, reply: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        match &self.round {
            Round::One(key_pair) => {
                let peer_public = Zeroizing::new(open(&self.master_key, reply)?);
                let session_key = spake::session_key(&self.master_key, key_pair, &peer_public)?;
                // Everything fallible is done, switch rounds
                self.round = Round::Two { session_key };
                debug!("session key established");
                Ok(None)
            }
            Round::Two { session_key } => {
                let message = open(session_key, reply)?;
                debug!(message_len = message.len(), "received peer message");
                Ok(Some(message))
            }
        }
    }

    fn round_number(&self) -> u8 {
        match self.round {
            Round::One(_) => 1,
            Round::Two { .. } => 2,
        }
    }
}

impl fmt::Debug for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // keys, scalar and message stay out of logs
        f.debug_struct("Exchange")
            .field("round", &self.round_number())
            .field("message_len", &self.message.len())
            .finish_non_exhaustive()
    }
}

/* ------------------------------------------------------------------------- */

// TESTS
