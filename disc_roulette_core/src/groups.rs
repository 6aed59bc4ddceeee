use serde::{Deserialize, Serialize};

/// Candidate positions the left reel may stop on for one spin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReelGroup {
    pub label: String,
    pub positions: Vec<u32>,
}

impl ReelGroup {
    pub fn new(label: impl Into<String>, positions: Vec<u32>) -> Self {
        Self {
            label: label.into(),
            positions,
        }
    }

    /// Every position `1..=size`.
    pub fn full_range(size: u32) -> Self {
        Self::new("ALL", (1..=size).collect())
    }

    pub fn contains(&self, position: u32) -> bool {
        self.positions.contains(&position)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelLayout {
    pub size: u32, // positions per reel
    pub groups: Vec<ReelGroup>, // left-reel group per spin index
    pub spin_cap: Option<usize>, // None = unlimited, no history kept
}

impl ReelLayout {
    /// Plain 21-position reel.
    pub fn disc21() -> Self {
        Self::ungrouped(21)
    }

    /// Plain 20-position reel.
    pub fn disc20() -> Self {
        Self::ungrouped(20)
    }

    pub fn ungrouped(size: u32) -> Self {
        Self {
            size,
            groups: vec![ReelGroup::full_range(size)],
            spin_cap: None,
        }
    }

    /// 21-position reel whose left stop walks groups A, B, C over three spins.
    pub fn grouped21() -> Self {
        Self {
            size: 21,
            groups: vec![
                ReelGroup::new("A", vec![16, 17, 18, 19, 20, 21, 1]),
                ReelGroup::new("B", (2..=8).collect()),
                ReelGroup::new("C", (9..=15).collect()),
            ],
            spin_cap: Some(3),
        }
    }

    /// Capped layouts tag each record with its group label.
    pub fn is_grouped(&self) -> bool {
        self.spin_cap.is_some()
    }

    /// Group used for the spin at `index`; the last group repeats past the end.
    pub fn group_for(&self, index: usize) -> Option<&ReelGroup> {
        self.groups.get(index).or_else(|| self.groups.last())
    }
}
