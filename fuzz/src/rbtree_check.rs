#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use rbtree::{RedBlackTree, TreeError};

#[derive(Arbitrary, Debug)]
enum MapMethod {
    Search { key: u16 },
    Insert { key: u16, val: usize },
    Update { key: u16, val: usize },
    Delete { key: u16 },
    Remove { key: u16 },
    Neighbours { key: u16 },
}

fuzz_target!(|methods: Vec<MapMethod>| {
    let mut tree = RedBlackTree::<u16, usize>::new();
    let mut bt_map = BTreeMap::<u16, usize>::new();

    for m in &methods {
        match m {
            MapMethod::Search { key } => {
                assert_eq!(tree.search(key).ok(), bt_map.get(key));
            }
            MapMethod::Insert { key, val } => {
                let expected = if bt_map.contains_key(key) {
                    Err(TreeError::DataConflict)
                } else {
                    bt_map.insert(*key, *val);
                    Ok(())
                };
                let result = tree.insert(*key, *val);
                eprintln!("Insert: {:?} {:?} {:?}", key, val, result);
                assert_eq!(result, expected);
            }
            MapMethod::Update { key, val } => {
                let old_bt = bt_map.get_mut(key);
                let old_rb = tree.search_mut(key).ok();
                assert_eq!(old_rb, old_bt);
                if let (Some(old_bt), Some(old_rb)) = (old_bt, old_rb) {
                    *old_bt = *val;
                    *old_rb = *val;
                }
            }
            MapMethod::Delete { key } => {
                let btr = bt_map.remove(key);
                let rbr = tree.delete(key);
                eprintln!("Delete: {:?} {:?} {:?}", key, rbr, btr);
                assert_eq!(rbr.is_ok(), btr.is_some());
            }
            MapMethod::Remove { key } => {
                let btr = bt_map.remove_entry(key);
                let rbr = tree.remove(key).ok();
                assert_eq!(rbr, btr);
            }
            MapMethod::Neighbours { key } => {
                if bt_map.contains_key(key) {
                    let succ = bt_map.range(key..).nth(1);
                    let pred = bt_map.range(..key).next_back();
                    assert_eq!(tree.successor(key).ok(), succ);
                    assert_eq!(tree.predecessor(key).ok(), pred);
                } else {
                    assert_eq!(tree.successor(key), Err(TreeError::NoData));
                    assert_eq!(tree.predecessor(key), Err(TreeError::NoData));
                }
            }
        }
        if let Err(violation) = tree.validate() {
            panic!("invariant broken after {:?}: {}", m, violation);
        }
        assert_eq!(tree.size(), bt_map.len());
    }

    assert_eq!(tree.minimum().ok(), bt_map.iter().next());
    assert_eq!(tree.maximum().ok(), bt_map.iter().next_back());
});
