//! Property-based tests for hashing, tree encoding and store round trips

use gut::object::{frame_and_hash, hash_object, parse_frame, ObjectKind};
use gut::store::{LooseObjectStore, MemoryObjectStore, ObjectStore};
use gut::tree::{codec, FileMode, TreeEntry};
use gut::types::ObjectId;
use proptest::prelude::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

fn kind_strategy() -> impl Strategy<Value = ObjectKind> {
    prop_oneof![
        Just(ObjectKind::Blob),
        Just(ObjectKind::Tree),
        Just(ObjectKind::Commit),
    ]
}

fn mode_strategy() -> impl Strategy<Value = FileMode> {
    prop_oneof![
        Just(FileMode::Regular),
        Just(FileMode::Executable),
        Just(FileMode::Directory),
    ]
}

/// Names the tree format accepts: no '/', NUL or newline, not "." or ".."
fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{1,16}".prop_filter("reserved name", |n| n != "." && n != "..")
}

fn entries_strategy() -> impl Strategy<Value = Vec<TreeEntry>> {
    prop::collection::btree_map(name_strategy(), (mode_strategy(), any::<[u8; 32]>()), 0..24)
        .prop_map(|map: BTreeMap<String, (FileMode, [u8; 32])>| {
            map.into_iter()
                .map(|(name, (mode, bytes))| {
                    TreeEntry::new(mode, name, ObjectId::from_bytes(bytes)).unwrap()
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn prop_hash_is_deterministic(kind in kind_strategy(), payload in any::<Vec<u8>>()) {
        let a = frame_and_hash(kind, &payload);
        let b = frame_and_hash(kind, &payload);
        prop_assert_eq!(a.id(), b.id());
        prop_assert_eq!(a.id(), hash_object(kind, &payload));
        prop_assert_eq!(a.size(), payload.len());
    }

    #[test]
    fn prop_distinct_payloads_distinct_ids(a in any::<Vec<u8>>(), b in any::<Vec<u8>>()) {
        prop_assume!(a != b);
        prop_assert_ne!(hash_object(ObjectKind::Blob, &a), hash_object(ObjectKind::Blob, &b));
    }

    #[test]
    fn prop_frame_parses_back(kind in kind_strategy(), payload in any::<Vec<u8>>()) {
        let obj = frame_and_hash(kind, &payload);
        let parsed = parse_frame(obj.framed_bytes().to_vec()).unwrap();
        prop_assert_eq!(parsed, obj);
    }

    #[test]
    fn prop_tree_decode_returns_sorted_input(entries in entries_strategy()) {
        let mut shuffled = entries.clone();
        shuffled.reverse();

        let decoded = codec::decode(&codec::encode(&shuffled)).unwrap();

        let mut expected = entries;
        expected.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn prop_tree_encoding_ignores_input_order(entries in entries_strategy()) {
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(codec::encode(&entries), codec::encode(&reversed));
    }

    #[test]
    fn prop_store_round_trip(kind in kind_strategy(), payload in any::<Vec<u8>>()) {
        let store = MemoryObjectStore::new();
        let obj = frame_and_hash(kind, &payload);
        store.put(&obj).unwrap();
        prop_assert_eq!(store.get(&obj.id()).unwrap(), obj);
    }
}

/// Payloads that stress the frame: empty, NUL-bearing and arbitrary bytes
fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        Just(Vec::new()),
        prop::collection::vec(prop_oneof![Just(0u8), any::<u8>()], 1..64),
        prop::collection::vec(any::<u8>(), 0..4096),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_loose_store_round_trip(kind in kind_strategy(), payload in payload_strategy()) {
        let temp_dir = TempDir::new().unwrap();
        let store = LooseObjectStore::new(temp_dir.path());
        store.init_layout().unwrap();

        let obj = frame_and_hash(kind, &payload);
        store.put(&obj).unwrap();
        prop_assert!(store.contains(&obj.id()).unwrap());

        let read = store.get(&obj.id()).unwrap();
        prop_assert_eq!(read.kind(), kind);
        prop_assert_eq!(read.payload(), payload.as_slice());
        prop_assert_eq!(&read, &obj);

        let header = store.read_header(&obj.id()).unwrap();
        prop_assert_eq!(header.id, obj.id());
        prop_assert_eq!(header.kind, kind);
        prop_assert_eq!(header.size, payload.len());
    }
}
