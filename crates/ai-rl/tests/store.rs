use ai_core::SplitMix64;
use ai_rl::{Archetype, CombatAction, Feature, WeightStore, WeightTable};

#[test]
fn save_then_load_round_trips() {
    let mut store = WeightStore::new();
    assert!(!store.has_weights(Archetype::Kiter));
    assert!(store.load_weights(Archetype::Kiter).is_empty());

    let table = WeightTable::seeded(&mut SplitMix64::new(11));
    store.save_weights(Archetype::Kiter, table.clone());

    assert!(store.has_weights(Archetype::Kiter));
    assert!(!store.has_weights(Archetype::Tank));
    assert_eq!(store.load_weights(Archetype::Kiter), table);
}

#[test]
fn last_write_wins_for_the_same_archetype() {
    let mut store = WeightStore::new();
    let mut first = WeightTable::new();
    first.set(CombatAction::StrafeLeft, Feature::SelfHealth, 1.0);
    let mut second = WeightTable::new();
    second.set(CombatAction::StrafeLeft, Feature::SelfHealth, 2.0);

    store.save_weights(Archetype::Striker, first);
    store.save_weights(Archetype::Striker, second.clone());

    assert_eq!(store.len(), 1);
    assert_eq!(store.load_weights(Archetype::Striker), second);
}

#[test]
fn loading_hands_out_a_copy() {
    let mut store = WeightStore::new();
    store.save_weights(Archetype::Bruiser, WeightTable::new());

    let mut checked_out = store.load_weights(Archetype::Bruiser);
    checked_out.set(CombatAction::PrimaryAttack, Feature::LineOfSight, 9.0);

    assert_eq!(store.load_weights(Archetype::Bruiser), WeightTable::new());
}

#[test]
fn new_session_forgets_everything() {
    let mut store = WeightStore::new();
    store.save_weights(Archetype::Support, WeightTable::new());
    store.save_weights(Archetype::Tank, WeightTable::new());
    assert_eq!(store.session(), 0);

    store.new_session();
    assert!(store.is_empty());
    assert_eq!(store.session(), 1);

    store.save_weights(Archetype::Tank, WeightTable::new());
    store.reset_all();
    assert!(!store.has_weights(Archetype::Tank));
    assert_eq!(store.session(), 1);
}

#[cfg(feature = "serde")]
#[test]
fn store_serializes_to_json() {
    let mut store = WeightStore::new();
    store.save_weights(Archetype::Kiter, WeightTable::seeded(&mut SplitMix64::new(5)));

    let json = serde_json::to_string(&store).expect("serialize");
    assert!(json.contains("\"kiter\""));
    assert!(json.contains("\"move_toward_target\""));
    let back: WeightStore = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, store);
}
