//! Test doubles: scripted and failing randomness, and an in-memory relay that follows the relay contract (idempotent posts, at most two distinct bodies per tag).

use std::collections::HashMap;

use rand_core::{impls, CryptoRng, RngCore};

use crate::exchange::Exchange;
use crate::kdf::KEY_LENGTH;
use crate::messages::Request;

/// ScriptedRng fills each requested buffer entirely with the next byte of its script, repeating the last byte once the script runs out
pub struct ScriptedRng {
    script: Vec<u8>,
    draws: usize,
}

impl ScriptedRng {
    pub fn new(script: &[u8]) -> Self {
        Self { script: script.to_vec(), draws: 0 }
    }

    /// draws is how many buffers have been filled so far
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let index = self.draws.min(self.script.len().saturating_sub(1));
        let value = self.script.get(index).copied().unwrap_or(0);
        dest.fill(value);
        self.draws += 1;
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ScriptedRng {}

/// FailingRng is an entropy source that is always unavailable
pub struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.try_fill_bytes(dest) {
            panic!("{}", err);
        }
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand_core::Error> {
        Err(rand_core::Error::new("entropy source unavailable"))
    }
}

impl CryptoRng for FailingRng {}

/// MemoryRelay stores up to two distinct bodies per tag
#[derive(Default)]
pub struct MemoryRelay {
    posts: HashMap<[u8; KEY_LENGTH], Vec<Vec<u8>>>,
}

impl MemoryRelay {
    /// post files a request's body under its tag. Re-posting a body is a no-op; a third distinct body is refused.
    pub fn post(&mut self, request: &Request) -> anyhow::Result<()> {
        let bodies = self.posts.entry(request.tag).or_default();
        if bodies.contains(&request.body) {
            return Ok(());
        }
        if bodies.len() >= 2 {
            anyhow::bail!("tag {} already holds two bodies", request.tag_hex());
        }
        bodies.push(request.body.clone());
        Ok(())
    }

    /// get returns the body under tag that isn't ours, if the peer has posted yet
    pub fn get(&self, tag: &[u8; KEY_LENGTH], ours: &[u8]) -> Option<Vec<u8>> {
        self.posts.get(tag)?.iter().find(|body| body.as_slice() != ours).cloned()
    }
}

/// poll_once posts the party's current request and processes the peer's reply if there is one
fn poll_once(relay: &mut MemoryRelay, party: &mut Exchange) -> anyhow::Result<Option<Vec<u8>>> {
    let request = party.next_request();
    relay.post(&request)?;
    match relay.get(&request.tag, &request.body) {
        Some(reply) => Ok(party.process(&reply)?),
        None => Ok(None),
    }
}

/// run_through_relay alternates the two parties against the relay until both have the other's message, returning (message for first, message for second)
pub fn run_through_relay(relay: &mut MemoryRelay, first: &mut Exchange, second: &mut Exchange) -> anyhow::Result<(Vec<u8>, Vec<u8>)> {
    let mut for_first = None;
    let mut for_second = None;
    for _ in 0..8 {
        if for_first.is_none() {
            for_first = poll_once(relay, first)?;
        }
        if for_second.is_none() {
            for_second = poll_once(relay, second)?;
        }
        if let (Some(a), Some(b)) = (&for_first, &for_second) {
            return Ok((a.clone(), b.clone()));
        }
    }
    anyhow::bail!("exchange did not complete")
}

/* ------------------------------------------------------------------------- */

// TESTS

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_refuses_third_body() {
        let mut relay = MemoryRelay::default();
        let tag = [1u8; KEY_LENGTH];
        relay.post(&Request::new(tag, vec![1])).unwrap();
        relay.post(&Request::new(tag, vec![1])).unwrap();
        relay.post(&Request::new(tag, vec![2])).unwrap();
        assert!(relay.post(&Request::new(tag, vec![3])).is_err());
        assert_eq!(relay.get(&tag, &[1]), Some(vec![2]));
        assert_eq!(relay.get(&tag, &[2]), Some(vec![1]));
        assert_eq!(relay.get(&[2u8; KEY_LENGTH], &[1]), None);
    }

    #[test]
    fn scripted_rng_repeats_last_value() {
        let mut rng = ScriptedRng::new(&[4, 5]);
        let mut buf = [0u8; 3];
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [4, 4, 4]);
        rng.fill_bytes(&mut buf);
        rng.fill_bytes(&mut buf);
        assert_eq!(buf, [5, 5, 5]);
        assert_eq!(rng.draws(), 3);
    }
}
