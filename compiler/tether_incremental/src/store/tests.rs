use pretty_assertions::assert_eq;
use tether_ir::{ClassHeritage, UnitFacts};

use super::{decode, encode, BlobStore, CacheError, FileBlob, MemoryBlob, FORMAT_VERSION, MAGIC};
use crate::IncrementalLog;

fn sample() -> IncrementalLog {
    let mut log = IncrementalLog::new();
    let unit = UnitFacts::new("a.ts");
    let class = ClassHeritage::new(unit.symbol("A"));
    log.collect(unit.with_class(class));
    log
}

#[test]
fn test_header_layout() {
    let blob = encode(&sample()).unwrap_or_else(|e| panic!("encode failed: {e}"));
    assert_eq!(&blob[..4], &MAGIC);
    assert_eq!(&blob[4..8], &FORMAT_VERSION.to_le_bytes());
    assert!(blob.len() > 16);
}

#[test]
fn test_decode_rejects_truncated() {
    assert!(matches!(decode(b"TTHR"), Err(CacheError::Truncated(4))));
    assert!(matches!(decode(&[]), Err(CacheError::Truncated(0))));
}

#[test]
fn test_decode_rejects_bad_magic() {
    let mut blob = encode(&sample()).unwrap_or_else(|e| panic!("encode failed: {e}"));
    blob[0] = b'X';
    assert!(matches!(decode(&blob), Err(CacheError::BadMagic)));
}

#[test]
fn test_decode_rejects_other_version() {
    let mut blob = encode(&sample()).unwrap_or_else(|e| panic!("encode failed: {e}"));
    blob[4..8].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
    assert!(matches!(
        decode(&blob),
        Err(CacheError::Version { found, expected }) if found == FORMAT_VERSION + 1 && expected == FORMAT_VERSION
    ));
}

#[test]
fn test_decode_rejects_checksum_mismatch() {
    let mut blob = encode(&sample()).unwrap_or_else(|e| panic!("encode failed: {e}"));
    blob[8] ^= 0x01;
    assert!(matches!(decode(&blob), Err(CacheError::Checksum)));
}

#[test]
fn test_decode_rejects_garbage_payload_with_valid_checksum() {
    let payload = [0xffu8; 3];
    let mut blob = Vec::new();
    blob.extend_from_slice(&MAGIC);
    blob.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    blob.extend_from_slice(&crate::hash_bytes(&payload).value().to_le_bytes());
    blob.extend_from_slice(&payload);
    assert!(matches!(decode(&blob), Err(CacheError::Decode(_))));
}

#[test]
fn test_memory_blob_roundtrip() {
    let mut store = MemoryBlob::new();
    assert_eq!(store.load().ok(), Some(None));
    store
        .store(b"bytes")
        .unwrap_or_else(|e| panic!("store failed: {e}"));
    assert_eq!(store.bytes(), Some(&b"bytes"[..]));
}

#[test]
fn test_file_blob_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let store = FileBlob::new(dir.path().join("absent.bin"));
    assert!(matches!(store.load(), Ok(None)));
}

#[test]
fn test_file_blob_creates_parents_and_leaves_no_temp() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {e}"));
    let path = dir.path().join("cache").join("tether.bin");
    let mut store = FileBlob::new(&path);

    sample()
        .save(&mut store)
        .unwrap_or_else(|e| panic!("save failed: {e}"));
    assert!(path.exists());
    assert!(!dir.path().join("cache").join("tether.bin.tmp").exists());

    let loaded = IncrementalLog::try_load(&store)
        .unwrap_or_else(|e| panic!("load failed: {e}"))
        .unwrap_or_else(|| panic!("nothing stored"));
    assert_eq!(loaded.len(), 1);
}
