use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

// Every draw in the crate goes through `RandomSource`, a uniform stream over [0,1).
// Drivers pick the backing: OS entropy, a seeded HMAC stream, or a fixed script.

pub type HmacSha256 = Hmac<Sha256>;

/// Uniform random draws over `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

pub fn derive_floats(hmac_bytes: &[u8], count: usize) -> Vec<f64> {
    // Convert successive 4-byte chunks into u32 then map to [0,1)
    let mut out = Vec::with_capacity(count);
    let mut buffer = hmac_bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            // extend the buffer deterministically by hashing the previous buffer
            buffer = Sha256::digest(&buffer).to_vec();
            i = 0;
            continue;
        }
        let chunk = &buffer[i..i + 4];
        let v = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        out.push(f64::from(v) / (f64::from(u32::MAX) + 1.0));
        i += 4;
    }
    out
}

/// Reproducible stream: HMAC-SHA256(server_seed, "client_seed:nonce"), one
/// block of draws per nonce.
pub struct SeededRandom {
    server_seed: String,
    client_seed: String,
    nonce: u64,
    block: Vec<f64>,
    cursor: usize,
}

const DRAWS_PER_BLOCK: usize = 8;

impl SeededRandom {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
            block: Vec::new(),
            cursor: 0,
        }
    }

    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    /// Nonce of the next block to be derived.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hmac_bytes(&self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes())
            .expect("HMAC accepts keys of any length");
        let msg = format!("{}:{}", self.client_seed, self.nonce);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        if self.cursor >= self.block.len() {
            self.block = derive_floats(&self.hmac_bytes(), DRAWS_PER_BLOCK);
            self.nonce += 1;
            self.cursor = 0;
        }
        let value = self.block[self.cursor];
        self.cursor += 1;
        value
    }
}

/// Replays a fixed sequence of draws, cycling when it runs out.
///
/// An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    index: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }

    /// The draw that lands on slot `index` of a `len`-slot uniform pick.
    pub fn slot(index: usize, len: usize) -> f64 {
        (index as f64 + 0.5) / len as f64
    }

    /// Script that lands on the given `(slot, len)` picks in order.
    pub fn from_slots(slots: &[(usize, usize)]) -> Self {
        Self::new(slots.iter().map(|&(i, n)| Self::slot(i, n)).collect())
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.index % self.values.len()];
        self.index += 1;
        value
    }
}

/// OS-seeded source for production drivers.
#[cfg(feature = "os-rng")]
pub struct OsRandom(rand::rngs::StdRng);

#[cfg(feature = "os-rng")]
impl OsRandom {
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::from_os_rng())
    }
}

#[cfg(feature = "os-rng")]
impl Default for OsRandom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "os-rng")]
impl RandomSource for OsRandom {
    fn next_f64(&mut self) -> f64 {
        use rand::Rng;
        self.0.random::<f64>()
    }
}
