use crate::{Generator, GeneratorError};
use rand::Rng;
use snip_core::LinkId;
use std::ops::RangeInclusive;

/// Characters drawn from when generating ids.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Accepted id lengths.
pub const LENGTH_RANGE: RangeInclusive<usize> = 6..=8;

pub const DEFAULT_LENGTH: usize = 6;

/// Draws each character uniformly from [`ALPHABET`].
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        if !LENGTH_RANGE.contains(&length) {
            return Err(GeneratorError::InvalidLength {
                min: *LENGTH_RANGE.start(),
                max: *LENGTH_RANGE.end(),
                got: length,
            });
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    type Output = LinkId;

    fn generate(&self) -> Self::Output {
        let mut rng = rand::rng();
        let id: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        LinkId::new_unchecked(id)
    }
}
