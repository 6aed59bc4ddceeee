use disc_roulette_shared::{RouletteError, RouletteResult, SpinView};
use serde::{Deserialize, Serialize};

/// Grouped-reel history holds this many spins before it must be cleared.
pub const HISTORY_CAPACITY: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpinRecord {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub group_label: Option<String>, // None for ungrouped reels
    pub left: u32,
    pub right: u32,
}

impl From<&SpinRecord> for SpinView {
    fn from(record: &SpinRecord) -> Self {
        SpinView {
            group_label: record.group_label.clone(),
            left: record.left,
            right: record.right,
        }
    }
}

/// Bounded, oldest-first log of spins.
#[derive(Debug, Clone)]
pub struct SpinHistoryLog {
    entries: Vec<SpinRecord>,
    capacity: usize,
}

impl Default for SpinHistoryLog {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl SpinHistoryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `record`; a full log rejects it instead of dropping the oldest.
    pub fn append(&mut self, record: SpinRecord) -> RouletteResult<()> {
        if self.is_full() {
            return Err(RouletteError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.entries.push(record);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[SpinRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(left: u32) -> SpinRecord {
        SpinRecord {
            group_label: Some("A".into()),
            left,
            right: 1,
        }
    }

    #[test]
    fn fourth_append_is_rejected() {
        let mut log = SpinHistoryLog::default();
        for left in 1..=3 {
            log.append(record(left)).unwrap();
        }
        assert!(log.is_full());
        assert_eq!(
            log.append(record(4)),
            Err(RouletteError::CapacityExceeded { capacity: 3 })
        );
        let lefts: Vec<u32> = log.entries().iter().map(|r| r.left).collect();
        assert_eq!(lefts, vec![1, 2, 3]);
    }

    #[test]
    fn clear_empties_any_state() {
        let mut log = SpinHistoryLog::default();
        log.clear();
        assert!(log.entries().is_empty());
        log.append(record(7)).unwrap();
        log.clear();
        assert!(log.entries().is_empty());
        log.append(record(8)).unwrap();
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn ungrouped_record_omits_label_when_serialized() {
        let plain = SpinRecord {
            group_label: None,
            left: 4,
            right: 20,
        };
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#"{"left":4,"right":20}"#);
    }
}
