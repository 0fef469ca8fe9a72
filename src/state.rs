//! Persisting an exchange between process runs. An exchange can take days, so callers store the serialized record and restore it whenever they next poll the relay.
//!
//! The record is NOT encrypted and holds the master key, the private scalar or session key, and the message. Protecting it at rest is up to the caller.

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::Error;
use crate::exchange::{Exchange, Round};
use crate::group::group;
use crate::kdf::KEY_LENGTH;
use crate::sealing::MAX_MESSAGE_LEN;
use crate::spake::KeyPair;

/// ExchangeRecord is the flat, fixed-order layout of a persisted exchange. In round two the scalar and public value are no longer needed and are written empty.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
struct ExchangeRecord {
    master_key: Vec<u8>,
    message: Vec<u8>,
    scalar: Vec<u8>,
    public: Vec<u8>,
    session_key: Vec<u8>,
}

impl Exchange {
    /// serialize writes the full state of the exchange, secrets included
    pub fn serialize(&self) -> Vec<u8> {
        let (scalar, public, session_key) = match &self.round {
            Round::One(key_pair) => (key_pair.scalar.to_bytes_be(), key_pair.public.to_bytes_be(), Vec::new()),
            Round::Two { session_key } => (Vec::new(), Vec::new(), session_key.to_vec()),
        };
        let record = ExchangeRecord {
            master_key: self.master_key.to_vec(),
            message: self.message.to_vec(),
            scalar,
            public,
            session_key,
        };
        // Every field is a plain byte vector, so encoding cannot fail
        bincode::serialize(&record).expect("exchange record failed to encode")
    }

    /// deserialize restores an exchange written by serialize. A non-empty session key means round one already completed.
    pub fn deserialize(data: &[u8]) -> Result<Exchange, Error> {
        let record: ExchangeRecord = bincode::deserialize(data).map_err(|err| Error::MalformedState(err.to_string()))?;

        let master_key = fixed_key(&record.master_key, "master key")?;
        if record.message.len() > MAX_MESSAGE_LEN {
            return Err(Error::MalformedState(format!("message of {} bytes exceeds maximum of {}", record.message.len(), MAX_MESSAGE_LEN)));
        }
        let round = match record.session_key.len() {
            0 => Round::One(restore_key_pair(&record)?),
            KEY_LENGTH => Round::Two { session_key: fixed_key(&record.session_key, "session key")? },
            other => return Err(Error::MalformedState(format!("session key must be empty or {} bytes, found {}", KEY_LENGTH, other))),
        };

        let exchange = Exchange {
            master_key,
            message: Zeroizing::new(record.message.clone()),
            round,
        };
        debug!(session_established = exchange.session_established(), "restored exchange");
        Ok(exchange)
    }
}

/// fixed_key copies a 32 byte field out of the record
fn fixed_key(bytes: &[u8], name: &str) -> Result<Zeroizing<[u8; KEY_LENGTH]>, Error> {
    if bytes.len() != KEY_LENGTH {
        return Err(Error::MalformedState(format!("{} must be {} bytes, found {}", name, KEY_LENGTH, bytes.len())));
    }
    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    key.copy_from_slice(bytes);
    Ok(key)
}

/// restore_key_pair parses the round one fields, which must both be in range for the group
fn restore_key_pair(record: &ExchangeRecord) -> Result<KeyPair, Error> {
    let g = group();
    let scalar = BigUint::from_bytes_be(&record.scalar);
    if !g.contains(&scalar) {
        return Err(Error::MalformedState("private scalar out of range".to_string()));
    }
    let public = BigUint::from_bytes_be(&record.public);
    if !g.contains(&public) {
        return Err(Error::MalformedState("public value out of range".to_string()));
    }
    Ok(KeyPair { scalar, public })
}

/* ------------------------------------------------------------------------- */

// TESTS
