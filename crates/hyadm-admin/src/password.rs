//! Password generation.

use hyadm_core::GENERATED_PASSWORD_LENGTH;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::PasswordError;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGIT: &[u8] = b"0123456789";
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Source of opaque password material.
pub trait PasswordGenerator: Send + Sync {
    fn generate(&self) -> Result<String, PasswordError>;
}

/// Alphanumeric passwords from the OS CSPRNG.
///
/// The first three characters are a lowercase letter, an uppercase letter
/// and a digit, so every password satisfies common class rules.
#[derive(Debug, Clone, Copy)]
pub struct RandomPasswordGenerator {
    length: usize,
}

impl RandomPasswordGenerator {
    pub fn new() -> Self {
        Self {
            length: GENERATED_PASSWORD_LENGTH,
        }
    }

    /// Use `length` characters, at least three.
    pub fn with_length(length: usize) -> Self {
        Self {
            length: length.max(3),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn generate_with<R: RngCore>(&self, rng: &mut R) -> Result<String, PasswordError> {
        let mut buf = Vec::with_capacity(self.length);
        for _ in 0..self.length {
            buf.push(pick(rng, ALPHABET)?);
        }
        buf[0] = pick(rng, LOWER)?;
        buf[1] = pick(rng, UPPER)?;
        buf[2] = pick(rng, DIGIT)?;
        // Every byte comes from an ASCII alphabet.
        Ok(buf.into_iter().map(char::from).collect())
    }
}

impl Default for RandomPasswordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self) -> Result<String, PasswordError> {
        self.generate_with(&mut OsRng)
    }
}

/// Uniform byte from `charset`, rejecting values that would bias the modulo.
fn pick<R: RngCore>(rng: &mut R, charset: &[u8]) -> Result<u8, rand::Error> {
    let len = charset.len();
    let limit = 256 - (256 % len);
    let mut byte = [0u8; 1];
    loop {
        rng.try_fill_bytes(&mut byte)?;
        let value = usize::from(byte[0]);
        if value < limit {
            return Ok(charset[value % len]);
        }
    }
}
