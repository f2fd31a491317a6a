//! Identifier generation
//!
//! Stateless per call; the only shared resource is the OS randomness source.

mod generator;

pub use generator::{IdGenerator, IdStrategy, RandomIdGenerator, UuidIdGenerator, ID_ENTROPY_BYTES};
