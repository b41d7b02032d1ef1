//! Token identifier generators.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// A source of fresh, unique token identifiers.
///
/// Called once per issued token. Implementations must be safe to call from
/// several threads at once.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Generates 24 hex character ids laid out like a MongoDB ObjectId.
///
/// Layout: 4-byte big-endian seconds, 5 random bytes fixed per generator,
/// 3-byte big-endian counter starting at a random value.
#[derive(Debug)]
pub struct ObjectIdGenerator {
    process: [u8; 5],
    counter: AtomicU32,
}

impl ObjectIdGenerator {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            process: rng.gen(),
            counter: AtomicU32::new(rng.gen::<u32>() & 0x00ff_ffff),
        }
    }

    fn build(&self, seconds: u32) -> [u8; 12] {
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & 0x00ff_ffff;
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&self.process);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        bytes
    }
}

impl Default for ObjectIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for ObjectIdGenerator {
    fn generate(&self) -> String {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0);
        hex::encode(self.build(seconds))
    }
}

/// Generates 32 hex character ids from 16 random bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        hex::encode(rand::random::<[u8; 16]>())
    }
}
