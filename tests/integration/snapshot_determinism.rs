//! Integration tests for snapshot determinism and structure

use gut::error::StorageError;
use gut::object::{hash_object, ObjectKind};
use gut::store::{LooseObjectStore, ObjectStore};
use gut::tree::walker::WalkerConfig;
use gut::tree::{FileMode, SnapshotBuilder, Tree};
use gut::types::ObjectId;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn read_tree(store: &dyn ObjectStore, id: &ObjectId) -> Tree {
    let obj = store.get(id).unwrap();
    assert_eq!(obj.kind(), ObjectKind::Tree);
    Tree::decode(obj.payload()).unwrap()
}

fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Same content created in a different order gives the same root
#[test]
fn test_creation_order_does_not_matter() {
    let files = [
        ("README.md", "readme"),
        ("src/main.rs", "fn main() {}"),
        ("src/util/mod.rs", "pub mod x;"),
        ("docs/guide.txt", "guide"),
    ];

    let first = TempDir::new().unwrap();
    write_files(first.path(), &files);

    let second = TempDir::new().unwrap();
    let mut reversed = files;
    reversed.reverse();
    write_files(second.path(), &reversed);

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let builder = SnapshotBuilder::new(&store);

    assert_eq!(
        builder.snapshot(first.path()).unwrap(),
        builder.snapshot(second.path()).unwrap()
    );
}

/// An empty directory snapshots to the zero-entry tree
#[test]
fn test_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());

    let id = SnapshotBuilder::new(&store)
        .snapshot_directory(temp_dir.path())
        .unwrap();
    assert_eq!(
        id.to_hex(),
        "6ef19b41225c5369f1c104d45d8d85efa9b057b53b14b4b9b939dd74decc5321"
    );

    let stored = store.get(&id).unwrap();
    assert_eq!(stored.framed_bytes(), b"tree 0\0");
}

/// Entries are listed by name even when created in reverse
#[test]
fn test_two_files_sorted() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("b.txt"), "B").unwrap();
    fs::write(temp_dir.path().join("a.txt"), "A").unwrap();

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let id = SnapshotBuilder::new(&store).snapshot(temp_dir.path()).unwrap();

    let payload = store.get(&id).unwrap().into_payload();
    let expected = format!(
        "100644 a.txt\0{}\n100644 b.txt\0{}\n",
        hash_object(ObjectKind::Blob, b"A"),
        hash_object(ObjectKind::Blob, b"B")
    );
    assert_eq!(payload, expected.into_bytes());
}

#[test]
fn test_content_change_changes_root() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[("dir/file.txt", "one")]);

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let builder = SnapshotBuilder::new(&store);
    let before = builder.snapshot(temp_dir.path()).unwrap();

    fs::write(temp_dir.path().join("dir/file.txt"), "two").unwrap();
    let after = builder.snapshot(temp_dir.path()).unwrap();
    assert_ne!(before, after);

    // Both versions remain readable
    assert_eq!(read_tree(&store, &before).len(), 1);
    assert_eq!(read_tree(&store, &after).len(), 1);
}

/// Every tree references objects that are present in the store
#[test]
fn test_snapshot_is_closed() {
    let temp_dir = TempDir::new().unwrap();
    write_files(
        temp_dir.path(),
        &[("a/b/c/d.txt", "deep"), ("a/x.txt", "x"), ("top.txt", "top")],
    );
    fs::create_dir_all(temp_dir.path().join("a/empty")).unwrap();

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let snapshot = SnapshotBuilder::new(&store).build(temp_dir.path()).unwrap();
    assert_eq!(snapshot.blobs, 3);
    assert_eq!(snapshot.trees, 5);

    let mut queue = vec![snapshot.root_id];
    let mut seen = 0;
    while let Some(id) = queue.pop() {
        for entry in read_tree(&store, &id).entries() {
            assert!(store.contains(&entry.id).unwrap(), "missing {}", entry.name);
            seen += 1;
            if entry.mode == FileMode::Directory {
                queue.push(entry.id);
            }
        }
    }
    assert_eq!(seen, 7);
}

/// The store directory inside the snapshotted tree is never captured
#[test]
fn test_store_directory_excluded() {
    let temp_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(temp_dir.path());
    store.init_layout().unwrap();
    fs::write(temp_dir.path().join("kept.txt"), "kept").unwrap();

    let builder = SnapshotBuilder::new(&store);
    let first = builder.snapshot(temp_dir.path()).unwrap();
    // Snapshotting again adds objects under .gut but must not change the root
    let second = builder.snapshot(temp_dir.path()).unwrap();
    assert_eq!(first, second);

    let tree = read_tree(&store, &first);
    let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["kept.txt"]);
}

/// Names that merely start with the store directory name are kept
#[test]
fn test_similar_names_not_excluded() {
    let temp_dir = TempDir::new().unwrap();
    write_files(temp_dir.path(), &[(".gutter/file", "x"), ("sub/.gut/hidden", "y")]);

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let id = SnapshotBuilder::new(&store)
        .with_walker_config(WalkerConfig::default())
        .snapshot(temp_dir.path())
        .unwrap();

    let tree = read_tree(&store, &id);
    let names: Vec<_> = tree.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec![".gutter", "sub"]);

    let sub = read_tree(&store, &tree.entries()[1].id);
    assert!(sub.is_empty());
}

#[cfg(unix)]
#[test]
fn test_executable_bit_recorded() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let script = temp_dir.path().join("run.sh");
    fs::write(&script, "#!/bin/sh\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o744)).unwrap();
    fs::write(temp_dir.path().join("plain.txt"), "plain").unwrap();

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let id = SnapshotBuilder::new(&store).snapshot(temp_dir.path()).unwrap();

    let tree = read_tree(&store, &id);
    assert_eq!(tree.entries()[0].name, "plain.txt");
    assert_eq!(tree.entries()[0].mode, FileMode::Regular);
    assert_eq!(tree.entries()[1].name, "run.sh");
    assert_eq!(tree.entries()[1].mode, FileMode::Executable);

    let text = String::from_utf8(store.get(&id).unwrap().into_payload()).unwrap();
    assert!(text.contains("100755 run.sh\0"));
}

#[cfg(unix)]
#[test]
fn test_symlink_aborts_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("target.txt"), "t").unwrap();
    std::os::unix::fs::symlink("target.txt", temp_dir.path().join("link")).unwrap();

    let store_dir = TempDir::new().unwrap();
    let store = LooseObjectStore::new(store_dir.path());
    let err = SnapshotBuilder::new(&store)
        .snapshot(temp_dir.path())
        .unwrap_err();

    match err {
        StorageError::IoError(e) => assert_eq!(e.kind(), std::io::ErrorKind::Unsupported),
        other => panic!("expected IoError, got {:?}", other),
    }
}
