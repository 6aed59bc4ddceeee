use disc_roulette_shared::{RouletteError, RouletteResult};
use tracing::debug;

use crate::{
    picker::UniformPicker,
    rng::RandomSource,
    store::{SelectableItem, SelectableItemStore, Storage},
};

/// Draws one machine uniformly from the checked entries.
pub fn pick_item<S: Storage, R: RandomSource>(
    store: &SelectableItemStore<S>,
    picker: &mut UniformPicker<R>,
) -> RouletteResult<SelectableItem> {
    let candidates = store.selected_subset();
    if candidates.is_empty() {
        return Err(RouletteError::InvalidArgument(
            "select at least one machine".into(),
        ));
    }
    let item = (*picker.pick_from(&candidates)?).clone();
    debug!(name = %item.name, candidates = candidates.len(), "machine picked");
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rng::{ScriptedRandom, SeededRandom},
        store::MemoryStorage,
    };

    fn store_with(names: &[(&str, bool)]) -> SelectableItemStore<MemoryStorage> {
        let mut store = SelectableItemStore::open(MemoryStorage::new()).unwrap();
        for (i, (name, checked)) in names.iter().enumerate() {
            store.add(name).unwrap();
            store.set_selected(i, *checked).unwrap();
        }
        store
    }

    #[test]
    fn nothing_checked_is_rejected() {
        let store = store_with(&[("A", false), ("B", false)]);
        let mut picker = UniformPicker::new(ScriptedRandom::default());
        assert!(matches!(
            pick_item(&store, &mut picker),
            Err(RouletteError::InvalidArgument(_))
        ));
    }

    #[test]
    fn only_checked_items_are_drawn() {
        let store = store_with(&[("A", true), ("B", false), ("C", true)]);
        let mut picker = UniformPicker::new(SeededRandom::new("machines", "test", 0));
        for _ in 0..500 {
            let item = pick_item(&store, &mut picker).unwrap();
            assert!(item.name == "A" || item.name == "C");
        }
    }

    #[test]
    fn draw_indexes_the_checked_subset() {
        let store = store_with(&[("A", false), ("B", true), ("C", true)]);
        let mut picker = UniformPicker::new(ScriptedRandom::from_slots(&[(1, 2), (0, 2)]));
        assert_eq!(pick_item(&store, &mut picker).unwrap().name, "C");
        assert_eq!(pick_item(&store, &mut picker).unwrap().name, "B");
    }
}
