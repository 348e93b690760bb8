//! Integration tests for the tree payload format

use gut::error::StorageError;
use gut::object::{hash_object, ObjectKind};
use gut::tree::{codec, FileMode, Tree, TreeEntry};

fn entry(mode: FileMode, name: &str, content: &[u8]) -> TreeEntry {
    let kind = mode.object_kind();
    TreeEntry::new(mode, name, hash_object(kind, content)).unwrap()
}

/// Entries are written in byte order of name, whatever the input order
#[test]
fn test_encode_sorts_by_name() {
    let b = entry(FileMode::Regular, "b.txt", b"b");
    let a = entry(FileMode::Regular, "a.txt", b"a");

    let payload = codec::encode(&[b.clone(), a.clone()]);
    let expected = format!("100644 a.txt\0{}\n100644 b.txt\0{}\n", a.id, b.id);
    assert_eq!(payload, expected.into_bytes());

    assert_eq!(codec::decode(&payload).unwrap(), vec![a, b]);
}

/// Uppercase sorts before lowercase in byte order
#[test]
fn test_byte_order_not_case_folded() {
    let lower = entry(FileMode::Regular, "alpha", b"1");
    let upper = entry(FileMode::Regular, "Zeta", b"2");
    let decoded = codec::decode(&codec::encode(&[lower, upper])).unwrap();
    let names: Vec<_> = decoded.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "alpha"]);
}

#[test]
fn test_all_modes_round_trip() {
    let entries = vec![
        entry(FileMode::Regular, "file", b"f"),
        entry(FileMode::Executable, "script", b"s"),
        entry(FileMode::Directory, "sub", b""),
    ];
    let decoded = codec::decode(&codec::encode(&entries)).unwrap();
    assert_eq!(decoded, entries);
    assert_eq!(decoded[2].kind(), ObjectKind::Tree);
    assert_eq!(decoded[1].kind(), ObjectKind::Blob);
}

#[test]
fn test_missing_trailing_newline_tolerated() {
    let id = hash_object(ObjectKind::Blob, b"x");
    let payload = format!("100644 x\0{}", id);
    let decoded = codec::decode(payload.as_bytes()).unwrap();
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].id, id);
}

#[test]
fn test_malformed_line_reports_line_number() {
    let id = hash_object(ObjectKind::Blob, b"x");
    let payload = format!("100644 ok\0{}\n100644 broken {}\n", id, id);
    match codec::decode(payload.as_bytes()) {
        Err(StorageError::MalformedTreeEntry { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected MalformedTreeEntry, got {:?}", other),
    }
}

#[test]
fn test_rejects_bad_mode_and_hash() {
    let id = hash_object(ObjectKind::Blob, b"x");
    let bad_mode = format!("100600 x\0{}\n", id);
    assert!(matches!(
        codec::decode(bad_mode.as_bytes()),
        Err(StorageError::MalformedTreeEntry { line: 1, .. })
    ));

    let short_hash = "100644 x\0abc\n";
    assert!(matches!(
        codec::decode(short_hash.as_bytes()),
        Err(StorageError::MalformedTreeEntry { line: 1, .. })
    ));

    let upper_hash = format!("100644 x\0{}\n", id.to_hex().to_uppercase());
    assert!(codec::decode(upper_hash.as_bytes()).is_err());
}

#[test]
fn test_tree_object_frames_payload() {
    let mut tree = Tree::new();
    tree.insert(entry(FileMode::Regular, "hello", b"hello")).unwrap();
    let obj = tree.to_object();
    assert_eq!(obj.kind(), ObjectKind::Tree);
    assert_eq!(obj.payload(), tree.encode().as_slice());
    assert_eq!(Tree::decode(obj.payload()).unwrap(), tree);
}

#[test]
fn test_duplicate_names_rejected() {
    let mut tree = Tree::new();
    tree.insert(entry(FileMode::Regular, "same", b"1")).unwrap();
    assert!(tree.insert(entry(FileMode::Directory, "same", b"")).is_err());
}
