use disc_roulette_shared::{RouletteError, RouletteResult};
use tracing::{debug, warn};

use crate::{
    groups::ReelLayout,
    history::{SpinHistoryLog, SpinRecord},
    picker::UniformPicker,
    rng::RandomSource,
};

/// Drives one reel pair. The left stop is drawn from the group for the current
/// spin index, the right stop from the whole reel.
///
/// With a spin cap the index is the history length: spins 0, 1, 2 use groups
/// A, B, C and the fourth is refused until [`SpinSequencer::reset`]. Without a
/// cap no history is kept and every spin uses the first group.
#[derive(Debug, Clone)]
pub struct SpinSequencer {
    layout: ReelLayout,
    history: Option<SpinHistoryLog>,
}

impl SpinSequencer {
    pub fn new(layout: ReelLayout) -> Self {
        let history = layout.spin_cap.map(SpinHistoryLog::with_capacity);
        Self { layout, history }
    }

    pub fn grouped21() -> Self {
        Self::new(ReelLayout::grouped21())
    }

    pub fn disc21() -> Self {
        Self::new(ReelLayout::disc21())
    }

    pub fn disc20() -> Self {
        Self::new(ReelLayout::disc20())
    }

    pub fn layout(&self) -> &ReelLayout {
        &self.layout
    }

    pub fn spin_index(&self) -> usize {
        self.history.as_ref().map_or(0, SpinHistoryLog::len)
    }

    pub fn history(&self) -> &[SpinRecord] {
        match &self.history {
            Some(history) => history.entries(),
            None => &[],
        }
    }

    /// True once the cap is reached and only `reset` can continue.
    pub fn is_exhausted(&self) -> bool {
        self.history.as_ref().is_some_and(SpinHistoryLog::is_full)
    }

    /// The authoritative spin: draws, records and advances the index.
    pub fn spin<R: RandomSource>(
        &mut self,
        picker: &mut UniformPicker<R>,
    ) -> RouletteResult<SpinRecord> {
        if let Some(history) = &self.history {
            if history.is_full() {
                warn!(limit = history.capacity(), "spin refused, history is full");
                return Err(RouletteError::SpinLimitExceeded {
                    limit: history.capacity(),
                });
            }
        }
        let record = self.draw(picker)?;
        if let Some(history) = &mut self.history {
            history.append(record.clone())?;
        }
        debug!(
            group = record.group_label.as_deref().unwrap_or("-"),
            left = record.left,
            right = record.right,
            index = self.spin_index(),
            "spin recorded"
        );
        Ok(record)
    }

    /// A throwaway draw for animation frames; touches no state.
    pub fn preview<R: RandomSource>(
        &self,
        picker: &mut UniformPicker<R>,
    ) -> RouletteResult<SpinRecord> {
        self.draw(picker)
    }

    pub fn reset(&mut self) {
        if let Some(history) = &mut self.history {
            history.clear();
        }
        debug!(size = self.layout.size, "sequencer reset");
    }

    fn draw<R: RandomSource>(&self, picker: &mut UniformPicker<R>) -> RouletteResult<SpinRecord> {
        let group = self
            .layout
            .group_for(self.spin_index())
            .ok_or_else(|| RouletteError::InvalidArgument("reel layout has no groups".into()))?;
        let left = *picker.pick_from(&group.positions)?;
        let right = picker.pick_int(self.layout.size)?;
        Ok(SpinRecord {
            group_label: self.layout.is_grouped().then(|| group.label.clone()),
            left,
            right,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, SeededRandom};

    #[test]
    fn grouped_spins_walk_a_b_c_then_stop() {
        let mut seq = SpinSequencer::grouped21();
        let mut picker = UniformPicker::new(SeededRandom::new("server", "client", 1));
        let layout = seq.layout().clone();

        for (i, label) in ["A", "B", "C"].iter().enumerate() {
            let record = seq.spin(&mut picker).unwrap();
            assert_eq!(record.group_label.as_deref(), Some(*label));
            assert!(layout.groups[i].contains(record.left));
            assert!((1..=21).contains(&record.right));
        }
        assert!(seq.is_exhausted());
        assert_eq!(
            seq.spin(&mut picker),
            Err(RouletteError::SpinLimitExceeded { limit: 3 })
        );
        assert_eq!(seq.history().len(), 3);

        seq.reset();
        assert_eq!(seq.spin_index(), 0);
        assert!(seq.history().is_empty());
        let record = seq.spin(&mut picker).unwrap();
        assert_eq!(record.group_label.as_deref(), Some("A"));
    }

    #[test]
    fn scripted_grouped_spins_are_exact() {
        // group slot then right slot, three spins
        let mut picker = UniformPicker::new(ScriptedRandom::from_slots(&[
            (0, 7),
            (20, 21),
            (6, 7),
            (0, 21),
            (3, 7),
            (9, 21),
        ]));
        let mut seq = SpinSequencer::grouped21();
        let lefts: Vec<(u32, u32)> = (0..3)
            .map(|_| seq.spin(&mut picker).map(|r| (r.left, r.right)).unwrap())
            .collect();
        assert_eq!(lefts, vec![(16, 21), (8, 1), (12, 10)]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut seq = SpinSequencer::grouped21();
        seq.reset();
        seq.reset();
        assert_eq!(seq.spin_index(), 0);
    }

    #[test]
    fn ungrouped_reels_never_cap() {
        let mut picker = UniformPicker::new(SeededRandom::new("plain", "reel", 0));
        for (mut seq, size) in [(SpinSequencer::disc21(), 21), (SpinSequencer::disc20(), 20)] {
            for _ in 0..50 {
                let record = seq.spin(&mut picker).unwrap();
                assert_eq!(record.group_label, None);
                assert!((1..=size).contains(&record.left));
                assert!((1..=size).contains(&record.right));
            }
            assert!(seq.history().is_empty());
            assert!(!seq.is_exhausted());
        }
    }

    #[test]
    fn preview_leaves_history_alone() {
        let mut picker = UniformPicker::new(SeededRandom::new("preview", "only", 0));
        let mut seq = SpinSequencer::grouped21();
        seq.spin(&mut picker).unwrap();
        for _ in 0..30 {
            let frame = seq.preview(&mut picker).unwrap();
            assert_eq!(frame.group_label.as_deref(), Some("B"));
        }
        assert_eq!(seq.spin_index(), 1);
    }

    #[test]
    fn capped_single_group_records_carry_label() {
        let mut seq = SpinSequencer::new(ReelLayout {
            spin_cap: Some(2),
            ..ReelLayout::ungrouped(20)
        });
        let mut picker = UniformPicker::new(SeededRandom::new("single", "group", 0));
        for _ in 0..2 {
            let record = seq.spin(&mut picker).unwrap();
            assert_eq!(record.group_label.as_deref(), Some("ALL"));
        }
        assert_eq!(
            seq.spin(&mut picker),
            Err(RouletteError::SpinLimitExceeded { limit: 2 })
        );
    }

    #[test]
    fn empty_layout_is_invalid() {
        let mut seq = SpinSequencer::new(ReelLayout {
            size: 21,
            groups: Vec::new(),
            spin_cap: Some(3),
        });
        let mut picker = UniformPicker::new(ScriptedRandom::default());
        assert!(matches!(
            seq.spin(&mut picker),
            Err(RouletteError::InvalidArgument(_))
        ));
        assert_eq!(seq.spin_index(), 0);
    }
}
