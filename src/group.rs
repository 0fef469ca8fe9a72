//! Group parameters for SPAKE2. The modulus and generator are the 4096-bit MODP group from RFC 3526 section 5, and the mask element is generated from a public seed so anyone can check it was not chosen with a trapdoor.
//!
//! Everything here is computed once per process and is read-only afterwards.

use lazy_static::lazy_static;
use num_bigint::BigUint;
use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::Salsa20;
use sha2::{Digest, Sha256};

/// MODULUS_HEX is the RFC 3526 4096-bit prime
const MODULUS_HEX: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
    020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
    4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
    98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
    9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
    3995497CEA956AE515D2261898FA051015728E5A8AAAC42DAD33170D04507A33\
    A85521ABDF1CBA64ECFB850458DBEF0A8AEA71575D060C7DB3970F85A6E1E4C7\
    ABF5AE8CDB0933D71E8C94E04A25619DCEE3D2261AD2EE6BF12FFA06D98A0864\
    D87602733EC86A64521F2B18177B200CBBE117577A615D6C770988C0BAD946E2\
    08E24FA074E5AB3143DB5BFCE0FD108E4B82D120A92108011A723C12A787E6D7\
    88719A10BDBA5B2699C327186AF4E23C1A946834B6150BDA2583E9CA2AD44CE8\
    DBBBC2DB04DE8EF92E8EFC141FBECAA6287C59474E6BC05D99B2964FA090C3A2\
    233BA186515BE7ED1F612970CEE2D7AFB81BDD762170481CD0069127D5B05AA9\
    93B4EA988D8FDDC186FFB7DC90A6C08F4DF435C934063199FFFFFFFFFFFFFFFF";
/// GENERATOR is 2, as in RFC 3526
const GENERATOR: u32 = 2;
/// MASK_SEED is hashed with SHA-256 to key the Salsa20 stream that produces the mask element
pub const MASK_SEED: &[u8] = b"PANDA key exchange, seed for N";
/// MASK_LENGTH is 512 bytes (4096 bits of Salsa20 output)
const MASK_LENGTH: usize = 512;

/// Group holds the modulus p, the generator g and the mask element N.
pub struct Group {
    pub modulus: BigUint,
    pub generator: BigUint,
    pub mask: BigUint,
}

lazy_static! {
    static ref GROUP: Group = Group::generate();
}

/// group returns the process-wide parameters, building them on first use
pub fn group() -> &'static Group {
    &*GROUP
}

impl Group {
    fn generate() -> Self {
        // MODULUS_HEX is a fixed literal, so a parse failure is a build defect rather than a runtime condition
        let modulus = BigUint::parse_bytes(MODULUS_HEX.as_bytes(), 16).expect("MODULUS_HEX is valid hexadecimal");
        Self {
            modulus,
            generator: BigUint::from(GENERATOR),
            mask: mask_from_seed(MASK_SEED),
        }
    }

    /// contains reports whether v is a usable group element, i.e. 0 < v < p
    pub fn contains(&self, v: &BigUint) -> bool {
        v.bits() > 0 && v < &self.modulus
    }
}

/// mask_from_seed reads MASK_LENGTH bytes of Salsa20 keystream (key = SHA-256(seed), all-zero nonce) as a big-endian integer
fn mask_from_seed(seed: &[u8]) -> BigUint {
    let key = Sha256::digest(seed);
    let nonce = [0u8; 8];
    let mut cipher = Salsa20::new(&key, &nonce.into());
    let mut stream = [0u8; MASK_LENGTH];
    cipher.apply_keystream(&mut stream);
    BigUint::from_bytes_be(&stream)
}

/* ------------------------------------------------------------------------- */

// TESTS
