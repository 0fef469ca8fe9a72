//! SPAKE2 over the RFC 3526 group. Each side publishes X = g^x * N^pw, where pw comes from the master key, so only someone holding the shared secret can strip the mask off the other side's value.
//!
//! The session key hashes both masked values in numeric order, so neither side needs to know which one of them "started".

use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::Error;
use crate::group::{group, Group};
use crate::kdf::{derive, mac, SecretKey, KEY_LENGTH, SPAKE_CONTEXT};

/// KeyPair is one side's private exponent x and masked public value X
pub struct KeyPair {
    pub scalar: BigUint,
    pub public: BigUint,
}

impl KeyPair {
    /// generate draws a fresh exponent and masks g^x with the secret-derived N^pw
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, master_key: &[u8; KEY_LENGTH]) -> Result<KeyPair, Error> {
        let g = group();
        let scalar = random_scalar(rng, &g.modulus)?;
        let public = g.generator.modpow(&scalar, &g.modulus) * mask(g, master_key) % &g.modulus;
        Ok(KeyPair { scalar, public })
    }
}

/// random_scalar draws uniformly from [1, modulus) by rejection sampling: candidates of modulus' bit length are discarded when they are zero or not below the modulus
pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R, modulus: &BigUint) -> Result<BigUint, Error> {
    let bits = modulus.bits();
    let len = ((bits + 7) / 8) as usize;
    // clear the bits above the modulus' top bit so most draws land in range
    let top_mask = 0xffu8 >> (len as u64 * 8 - bits);
    let mut buf = Zeroizing::new(vec![0u8; len]);
    loop {
        rng.try_fill_bytes(&mut buf)?;
        buf[0] &= top_mask;
        let candidate = BigUint::from_bytes_be(&buf);
        if candidate.is_zero() || &candidate >= modulus {
            continue;
        }
        return Ok(candidate);
    }
}

/// mask computes N^pw mod p with pw = derive(master_key, "spake") read as a big-endian integer
fn mask(g: &Group, master_key: &[u8; KEY_LENGTH]) -> BigUint {
    let pw = Zeroizing::new(derive(master_key, SPAKE_CONTEXT));
    g.mask.modpow(&BigUint::from_bytes_be(pw.as_slice()), &g.modulus)
}

/// session_key completes SPAKE2 against the peer's masked value (big-endian bytes). Nothing is returned unless the peer value lies in (0, p).
pub fn session_key(master_key: &[u8; KEY_LENGTH], own: &KeyPair, peer: &[u8]) -> Result<SecretKey, Error> {
    let g = group();
    let peer = BigUint::from_bytes_be(peer);
    if !g.contains(&peer) {
        return Err(Error::InvalidPeerValue);
    }
    // p is prime, so the inverse of the mask is mask^(p-2)
    let inverse = mask(g, master_key).modpow(&(&g.modulus - 2u32), &g.modulus);
    let unmasked = &peer * inverse % &g.modulus;
    let shared = unmasked.modpow(&own.scalar, &g.modulus);

    let (low, high) = if own.public <= peer { (&own.public, &peer) } else { (&peer, &own.public) };
    let transcript = [length_prefixed(low), length_prefixed(high), length_prefixed(&shared)];
    let parts: Vec<&[u8]> = transcript.iter().map(|part| part.as_slice()).collect();
    Ok(Zeroizing::new(mac(master_key, &parts)))
}

/// length_prefixed writes the 2 byte little-endian length of v's big-endian magnitude, then the magnitude
fn length_prefixed(v: &BigUint) -> Zeroizing<Vec<u8>> {
    let magnitude = v.to_bytes_be();
    // group elements are at most 512 bytes
    let len = u16::try_from(magnitude.len()).expect("group element wider than 2^16 bytes");
    let mut out = Zeroizing::new(Vec::with_capacity(2 + magnitude.len()));
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&magnitude);
    out
}

/* ------------------------------------------------------------------------- */

// TESTS

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingRng, ScriptedRng};
    use rand_core::OsRng;

    fn pair(key: &[u8; KEY_LENGTH]) -> KeyPair {
        KeyPair::generate(&mut OsRng, key).unwrap()
    }

    #[test]
    fn both_sides_agree() {
        let key = [3u8; KEY_LENGTH];
        let alice = pair(&key);
        let bob = pair(&key);
        let alice_key = session_key(&key, &alice, &bob.public.to_bytes_be()).unwrap();
        let bob_key = session_key(&key, &bob, &alice.public.to_bytes_be()).unwrap();
        assert_eq!(*alice_key, *bob_key);
    }

    #[test]
    fn different_secrets_disagree() {
        let alice_key = [3u8; KEY_LENGTH];
        let bob_key = [4u8; KEY_LENGTH];
        let alice = pair(&alice_key);
        let bob = pair(&bob_key);
        let a = session_key(&alice_key, &alice, &bob.public.to_bytes_be()).unwrap();
        let b = session_key(&bob_key, &bob, &alice.public.to_bytes_be()).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn public_value_is_masked_power_of_generator() {
        let key = [5u8; KEY_LENGTH];
        let kp = pair(&key);
        let g = group();
        let unmasked = g.generator.modpow(&kp.scalar, &g.modulus);
        let expected = unmasked * mask(g, &key) % &g.modulus;
        assert_eq!(kp.public, expected);
        assert!(g.contains(&kp.public));
    }

    #[test]
    fn rejects_out_of_range_peer_values() {
        let key = [3u8; KEY_LENGTH];
        let own = pair(&key);
        let g = group();
        let zero: &[u8] = &[];
        assert!(matches!(session_key(&key, &own, zero), Err(Error::InvalidPeerValue)));
        assert!(matches!(session_key(&key, &own, &[0, 0, 0]), Err(Error::InvalidPeerValue)));
        assert!(matches!(session_key(&key, &own, &g.modulus.to_bytes_be()), Err(Error::InvalidPeerValue)));
        let above = &g.modulus + 12345u32;
        assert!(matches!(session_key(&key, &own, &above.to_bytes_be()), Err(Error::InvalidPeerValue)));
    }

    #[test]
    fn scalar_draw_skips_zero_and_modulus() {
        let g = group();
        // all 0xff bytes is above p, then zero, then an acceptable value
        let mut rng = ScriptedRng::new(&[0xff, 0x00, 0x01]);
        let scalar = random_scalar(&mut rng, &g.modulus).unwrap();
        assert_eq!(scalar, BigUint::from_bytes_be(&[0x01; 512]));
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn scalar_draw_masks_excess_bits() {
        // a 12 bit modulus needs two bytes, and the top nibble of the first byte must be cleared
        let modulus = BigUint::from(0x0fffu32);
        let mut rng = ScriptedRng::new(&[0xee]);
        let scalar = random_scalar(&mut rng, &modulus).unwrap();
        assert_eq!(scalar, BigUint::from(0x0eeeu32));
    }

    #[test]
    fn scalar_draw_propagates_rng_failure() {
        let g = group();
        assert!(matches!(random_scalar(&mut FailingRng, &g.modulus), Err(Error::Random(_))));
    }

    #[test]
    fn length_prefix_is_little_endian() {
        let v = BigUint::from(0x0102u32);
        assert_eq!(length_prefixed(&v).as_slice(), &[2, 0, 1, 2]);
        let wide = BigUint::from_bytes_be(&[0xab; 300]);
        let prefixed = length_prefixed(&wide);
        assert_eq!(&prefixed[..2], &[0x2c, 0x01]);
        assert_eq!(prefixed.len(), 302);
    }
}
