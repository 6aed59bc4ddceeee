use disc_roulette_core::{
    pick_item, MemoryStorage, ReelLayout, RouletteError, ScriptedRandom, SeededRandom,
    SelectableItem, SelectableItemStore, SpinSequencer, UniformPicker,
};

#[test]
fn seeded_sessions_repeat() {
    let run = || {
        let mut picker = UniformPicker::new(SeededRandom::new("s", "c", 42));
        let mut seq = SpinSequencer::grouped21();
        (0..3).map(|_| seq.spin(&mut picker).unwrap()).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn grouped_cycle_restarts_after_reset() {
    let layout = ReelLayout::grouped21();
    let mut picker = UniformPicker::new(SeededRandom::new("server", "client", 7));
    let mut seq = SpinSequencer::grouped21();
    for _round in 0..3 {
        for group in &layout.groups {
            let record = seq.spin(&mut picker).unwrap();
            assert_eq!(record.group_label.as_deref(), Some(group.label.as_str()));
            assert!(group.contains(record.left));
        }
        assert!(matches!(
            seq.spin(&mut picker),
            Err(RouletteError::SpinLimitExceeded { limit: 3 })
        ));
        seq.reset();
    }
}

#[test]
fn machine_list_survives_a_new_session() {
    let mut store = SelectableItemStore::open(MemoryStorage::new()).unwrap();
    store.add("Juggler").unwrap();
    store.add(" Hanahana ").unwrap();
    store.add("Pulsar").unwrap();
    store.set_selected(0, true).unwrap();
    store.set_selected(2, true).unwrap();
    store.remove(1).unwrap();
    let before: Vec<SelectableItem> = store.list().to_vec();

    let reopened = SelectableItemStore::open(store.into_storage()).unwrap();
    assert_eq!(reopened.list(), before.as_slice());
    assert_eq!(
        reopened.list(),
        &[
            SelectableItem {
                name: "Juggler".into(),
                selected: true
            },
            SelectableItem {
                name: "Pulsar".into(),
                selected: true
            },
        ]
    );
}

#[test]
fn item_roulette_over_reopened_store() {
    let mut store = SelectableItemStore::open(MemoryStorage::new()).unwrap();
    for name in ["A", "B", "C"] {
        store.add(name).unwrap();
    }
    store.set_selected(1, true).unwrap();
    let store = SelectableItemStore::open(store.into_storage()).unwrap();
    let mut picker = UniformPicker::new(ScriptedRandom::new(vec![0.99]));
    assert_eq!(pick_item(&store, &mut picker).unwrap().name, "B");
}
