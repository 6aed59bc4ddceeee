//! Presentation-side spin churn.
//!
//! Frames are cosmetic: drivers may show them, the result they settle on is the
//! one returned by `finish`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinAnimation {
    pub duration_ms: u32,
    pub interval_ms: u32,
}

/// Reel pickers flicker every 50 ms for 1.5 s.
pub const REEL_ANIMATION: SpinAnimation = SpinAnimation {
    duration_ms: 1500,
    interval_ms: 50,
};

/// Machine roulette flickers every 80 ms for 2 s.
pub const ITEM_ANIMATION: SpinAnimation = SpinAnimation {
    duration_ms: 2000,
    interval_ms: 80,
};

impl SpinAnimation {
    pub fn frames(&self) -> u32 {
        if self.interval_ms == 0 {
            return 0;
        }
        self.duration_ms / self.interval_ms
    }

    /// Calls `preview` once per frame, then returns whatever `finish` yields.
    /// Both closures get the same mutable `state`, typically the picker and
    /// whatever is being spun.
    pub fn run<S, P, F, T>(&self, state: &mut S, mut preview: P, finish: F) -> T
    where
        P: FnMut(&mut S, u32),
        F: FnOnce(&mut S) -> T,
    {
        for frame in 0..self.frames() {
            preview(state, frame);
        }
        finish(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        picker::UniformPicker, rng::SeededRandom, sequencer::SpinSequencer,
    };

    #[test]
    fn frame_counts_follow_timings() {
        assert_eq!(REEL_ANIMATION.frames(), 30);
        assert_eq!(ITEM_ANIMATION.frames(), 25);
        assert_eq!(
            SpinAnimation {
                duration_ms: 100,
                interval_ms: 0
            }
            .frames(),
            0
        );
    }

    #[test]
    fn churn_then_single_recorded_spin() {
        let mut state = (
            SpinSequencer::grouped21(),
            UniformPicker::new(SeededRandom::new("anim", "test", 0)),
        );
        let mut shown = Vec::new();

        let record = REEL_ANIMATION.run(
            &mut state,
            |(seq, picker), _| shown.push(seq.preview(picker).unwrap()),
            |(seq, picker)| seq.spin(picker),
        );

        assert_eq!(shown.len(), 30);
        let record = record.unwrap();
        assert_eq!(state.0.history(), &[record]);
    }
}
