use crate::common::{NonZeroUInt, UInt};
use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

/// Source of die results for dice literals.
pub trait Roller {
    /// Rolls one die, returning a value in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;

    /// Rolls `num` dice and sums them.
    fn roll_sum(&mut self, num: usize, sides: NonZeroUInt) -> u64 {
        (0..num).map(|_| u64::from(self.roll(sides))).sum()
    }
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }

    fn roll_sum(&mut self, num: usize, sides: NonZeroUInt) -> u64 {
        Uniform::new_inclusive(1, sides.get())
            .sample_iter(self)
            .take(num)
            .map(u64::from)
            .sum()
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;
