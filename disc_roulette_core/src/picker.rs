//! Uniform picks over integer ranges and slices.

use disc_roulette_shared::{RouletteError, RouletteResult};

use crate::rng::RandomSource;

/// Uniform picker over an injected [`RandomSource`].
pub struct UniformPicker<R> {
    rng: R,
}

impl<R: RandomSource> UniformPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Integer in `1..=max`, each outcome equally likely.
    pub fn pick_int(&mut self, max: u32) -> RouletteResult<u32> {
        if max == 0 {
            return Err(RouletteError::InvalidArgument(
                "pick_int needs max >= 1".into(),
            ));
        }
        Ok(self.slot(max as usize) as u32 + 1)
    }

    /// Element at a uniformly drawn position. Duplicates count once per occurrence.
    pub fn pick_from<'a, T>(&mut self, items: &'a [T]) -> RouletteResult<&'a T> {
        if items.is_empty() {
            return Err(RouletteError::InvalidArgument(
                "cannot pick from an empty set".into(),
            ));
        }
        Ok(&items[self.slot(items.len())])
    }

    pub fn into_inner(self) -> R {
        self.rng
    }

    fn slot(&mut self, len: usize) -> usize {
        let u = self.rng.next_f64();
        // a source returning exactly 1.0 still lands on the last slot
        ((u * len as f64).floor() as usize).min(len - 1)
    }
}
