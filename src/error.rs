//! Errors returned by the exchange. Every variant is terminal for the call that produced it and none of them change the state of an `Exchange`.

use thiserror::Error;

/// Error covers everything that can go wrong while building, running or restoring an exchange.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller's message does not fit in a padded body.
    #[error("message too large: {len} bytes, maximum is {max}")]
    MessageTooLarge { len: usize, max: usize },

    /// The randomness source could not supply the private scalar.
    #[error("random source failed: {0}")]
    Random(#[from] rand_core::Error),

    /// scrypt rejected its cost parameters.
    #[error("secret stretching failed: {0}")]
    StretchParams(#[from] scrypt::errors::InvalidParams),

    /// scrypt rejected the requested output length.
    #[error("secret stretching failed: {0}")]
    StretchOutput(#[from] scrypt::errors::InvalidOutputLen),

    /// A persisted exchange record could not be decoded.
    #[error("malformed exchange state: {0}")]
    MalformedState(String),

    /// The relay returned fewer bytes than any sealed body can have.
    #[error("reply from relay is too short to be valid")]
    ReplyTooShort,

    /// The reply failed authentication. Deliberately says nothing about why.
    #[error("failed to authenticate reply from relay")]
    Unauthenticated,

    /// The peer's SPAKE value is not an element of the group.
    #[error("invalid SPAKE value from peer")]
    InvalidPeerValue,

    /// The reply authenticated but its length prefix overruns the body.
    #[error("corrupt but authentic message found")]
    CorruptLength,
}
