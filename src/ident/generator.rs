//! Identifier generators
//!
//! The default generator draws 15 bytes (120 bits) from the OS CSPRNG and
//! encodes them as URL-safe base64. 15 is divisible by 3, so the encoding
//! is exactly 20 characters with no padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Number of random bytes per generated identifier
pub const ID_ENTROPY_BYTES: usize = 15;

/// Produces identifiers for records inserted without one
pub trait IdGenerator: Send + Sync {
    /// Generate an identifier for a record of `record_type`
    fn generate(&self, record_type: &str) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn generate(&self, record_type: &str) -> String {
        self(record_type)
    }
}

/// 120-bit random identifiers in base64
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self, _record_type: &str) -> String {
        let mut bytes = [0u8; ID_ENTROPY_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// UUIDv4 identifiers, hyphens removed
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self, _record_type: &str) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

/// Built-in generator selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Random,
    Uuid,
}

impl IdStrategy {
    /// Instantiate the generator for this strategy
    pub fn generator(&self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Random => Box::new(RandomIdGenerator),
            IdStrategy::Uuid => Box::new(UuidIdGenerator),
        }
    }
}
