//! Integration tests for mixed weak/strong level layouts
//!
//! Strong positions accept primitive keys and compare them by value.

use manykeys::{ErrorKind, Key, LevelConfig, LevelKind, ManyKeysWeakMap, Object};

fn weak_strong_strong() -> LevelConfig {
    LevelConfig::from([LevelKind::Weak, LevelKind::Strong, LevelKind::Strong])
}

#[test]
fn primitives_at_strong_positions() {
    let obj = Key::from(Object::new(()));
    let mut map = ManyKeysWeakMap::with_levels(weak_strong_strong());
    map.set(&[obj.clone(), Key::Int(1), Key::from("1")], "v")
        .unwrap();

    assert_eq!(
        map.get(&[obj.clone(), Key::Int(1), Key::from("1")]),
        Some(&"v")
    );
    assert_eq!(map.get(&[obj, Key::from("1"), Key::from("1")]), None);
}

#[test]
fn strong_positions_still_accept_objects() {
    let a = Key::from(Object::new(()));
    let b = Key::from(Object::new(()));
    let mut map = ManyKeysWeakMap::with_levels(weak_strong_strong());
    map.set(&[a.clone(), b.clone()], 7).unwrap();

    assert_eq!(map.get(&[a.clone(), b]), Some(&7));
    assert_eq!(map.get(&[a, Key::from(Object::new(()))]), None);
}

#[test]
fn strong_root_accepts_primitives() {
    let mut map = ManyKeysWeakMap::with_levels(LevelConfig::from([LevelKind::Strong]));
    map.set(&[Key::from("answer")], 42).unwrap();
    map.set(&[Key::Float(f64::NAN)], 0).unwrap();

    assert_eq!(map.get(&[Key::from(String::from("answer"))]), Some(&42));
    assert!(map.has(&[Key::Float(f64::NAN)]));
    assert!(map.delete(&[Key::from("answer")]));
    assert!(!map.has(&[Key::from("answer")]));
}

#[test]
fn weak_position_after_strong_prefix() {
    let mut map = ManyKeysWeakMap::with_levels(weak_strong_strong());
    let obj = Key::from(Object::new(()));
    let err = map
        .set(&[obj, Key::Int(1), Key::Int(2), Key::Int(3)], ())
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidKey {
            position: 3,
            level: LevelKind::Weak,
            ..
        }
    ));
}

#[test]
fn parsed_config_drives_layout() {
    let levels = LevelConfig::parse(["map", "map"]).unwrap();
    let mut map = ManyKeysWeakMap::with_levels(levels);
    map.set(&[Key::Bool(true), Key::Nil], "ok").unwrap();
    assert_eq!(map.get(&[Key::Bool(true), Key::Nil]), Some(&"ok"));
    assert_eq!(map.levels().kind_at(1), LevelKind::Strong);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn strong_string_keys_match_by_contents(s in "[a-z0-9]{0,12}", t in "[a-z0-9]{0,12}") {
            let owner = Key::from(Object::new(()));
            let mut map = ManyKeysWeakMap::with_levels(weak_strong_strong());
            map.set(&[owner.clone(), Key::from(s.as_str())], 1).unwrap();

            prop_assert!(map.has(&[owner.clone(), Key::from(s.clone())]));
            prop_assert_eq!(map.has(&[owner, Key::from(t.as_str())]), s == t);
        }
    }
}
