//! Integration tests for weak collection
//!
//! Entries under a dropped key object become unreachable at once and are
//! reclaimed, along with their values, when the level sweeps.

use std::rc::Rc;

use manykeys::{Key, LevelConfig, LevelKind, ManyKeysWeakMap, Object};

#[test]
fn dropped_root_key_releases_subtree() {
    let value = Rc::new("payload");
    let a = Object::new(());
    let b = Object::new(());
    let mut map = ManyKeysWeakMap::new();
    map.set(&[Key::from(&a)], Rc::clone(&value)).unwrap();
    map.set(&[Key::from(&a), Key::from(&b)], Rc::clone(&value))
        .unwrap();
    assert_eq!(Rc::strong_count(&value), 3);

    drop(a);
    assert_eq!(map.purge(), 1);
    assert_eq!(Rc::strong_count(&value), 1);
    assert_eq!(b.strong_count(), 1);
}

#[test]
fn growth_sweeps_without_explicit_purge() {
    let value = Rc::new(());
    let mut map = ManyKeysWeakMap::new();
    for _ in 0..64 {
        let temp = Object::new(());
        map.set(&[Key::from(&temp)], Rc::clone(&value)).unwrap();
    }
    // Amortized sweeping keeps only a bounded number of dead entries around.
    assert!(Rc::strong_count(&value) < 64);
}

#[test]
fn strong_levels_retain_after_weak_sweep() {
    let value = Rc::new(());
    let a = Object::new(());
    let mut map = ManyKeysWeakMap::with_levels(LevelConfig::from([
        LevelKind::Strong,
        LevelKind::Weak,
    ]));
    map.set(&[Key::Int(1)], Rc::clone(&value)).unwrap();
    map.set(&[Key::Int(1), Key::from(&a)], Rc::clone(&value))
        .unwrap();

    drop(a);
    assert_eq!(map.purge(), 1);
    assert_eq!(Rc::strong_count(&value), 2);
    assert!(map.has(&[Key::Int(1)]));
}

#[test]
fn empty_intermediate_levels_survive_delete() {
    let a = Object::new(());
    let b = Object::new(());
    let mut map = ManyKeysWeakMap::new();
    map.set(&[Key::from(&a), Key::from(&b)], 1).unwrap();
    assert!(map.delete(&[Key::from(&a), Key::from(&b)]));

    // Both levels are still in place; nothing dead to sweep yet.
    assert_eq!(map.purge(), 0);
    drop(b);
    assert_eq!(map.purge(), 1);
    drop(a);
    assert_eq!(map.purge(), 1);
}

#[test]
fn value_owning_its_key_keeps_entry_alive() {
    let a = Object::new(());
    let weak = a.downgrade();
    let mut map = ManyKeysWeakMap::new();
    map.set(&[Key::from(&a)], a.clone()).unwrap();

    drop(a);
    assert_eq!(map.purge(), 0);
    assert!(weak.is_alive());

    // Deleting the entry breaks the cycle.
    let a = weak.upgrade().unwrap();
    assert!(map.delete(&[Key::from(&a)]));
    drop(a);
    assert!(!weak.is_alive());
}

#[test]
fn strong_level_keyed_by_weak_key_keeps_it_alive() {
    let a = Object::new(());
    let weak = a.downgrade();
    let mut map =
        ManyKeysWeakMap::with_levels(LevelConfig::from([LevelKind::Weak, LevelKind::Strong]));
    map.set(&[Key::from(&a), Key::from(&a)], 1).unwrap();

    drop(a);
    assert_eq!(map.purge(), 0);
    assert!(weak.is_alive());
    let a = weak.upgrade().unwrap();
    assert_eq!(map.get(&[Key::from(&a), Key::from(&a)]), Some(&1));
}
