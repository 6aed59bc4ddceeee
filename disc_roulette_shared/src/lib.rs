use serde::{Deserialize, Serialize};

/// Storage key the machine list is persisted under.
pub const STORAGE_KEY: &str = "disc_roulette_machines";

/// One machine entry as it is written to storage.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StoredItem {
    pub name: String,
    pub checked: bool,
}

/// Decode the persisted machine list blob.
pub fn decode_items(blob: &str) -> Result<Vec<StoredItem>, serde_json::Error> {
    serde_json::from_str(blob)
}

pub fn encode_items(items: &[StoredItem]) -> Result<String, serde_json::Error> {
    serde_json::to_string(items)
}

/// A finished spin as drivers render it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpinView {
    pub group_label: Option<String>,
    pub left: u32,
    pub right: u32,
}

impl SpinView {
    pub fn left_text(&self) -> String {
        position_text(self.left)
    }

    pub fn right_text(&self) -> String {
        position_text(self.right)
    }
}

/// "上段 Nコマ目": the reel position shown in the top row.
pub fn position_text(position: u32) -> String {
    format!("上段 {position}コマ目")
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RouletteError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("position {index} out of range for list of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("spin limit of {limit} reached, clear the history first")]
    SpinLimitExceeded { limit: usize },
    #[error("history is full ({capacity} entries)")]
    CapacityExceeded { capacity: usize },
    #[error("stored data under {key:?} is unreadable: {reason}")]
    PersistenceRead { key: String, reason: String },
    #[error("failed to store data under {key:?}: {reason}")]
    PersistenceWrite { key: String, reason: String },
}

pub type RouletteResult<T> = Result<T, RouletteError>;
