pub mod animation;
pub mod groups;
pub mod history;
pub mod picker;
pub mod rng;
pub mod roulette;
pub mod sequencer;
pub mod store;

pub use crate::animation::{SpinAnimation, ITEM_ANIMATION, REEL_ANIMATION};
pub use crate::groups::{ReelGroup, ReelLayout};
pub use crate::history::{SpinHistoryLog, SpinRecord, HISTORY_CAPACITY};
pub use crate::picker::UniformPicker;
#[cfg(feature = "os-rng")]
pub use crate::rng::OsRandom;
pub use crate::rng::{derive_floats, derive_hash_hex, RandomSource, ScriptedRandom, SeededRandom};
pub use crate::roulette::pick_item;
pub use crate::sequencer::SpinSequencer;
pub use crate::store::{MemoryStorage, SelectableItem, SelectableItemStore, Storage, StorageError};
pub use disc_roulette_shared::{RouletteError, RouletteResult};
