use std::fs;

use tempfile::TempDir;

use regrag_core::traits::ChunkStore;
use regrag_core::types::{Chunk, ChunkMetadata, DocStatus, Tier};
use regrag_store::JsonChunkStore;

fn meta(title: &str) -> ChunkMetadata {
    ChunkMetadata {
        title: title.to_string(),
        audience: "Research Analysts".to_string(),
        date: "2024-05-21".to_string(),
        status: DocStatus::Active,
        section: String::new(),
        cross_refs: vec![],
        has_table: false,
        is_latest: true,
    }
}

fn parent(id: &str, doc: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        doc_id: doc.to_string(),
        tier: Tier::Parent,
        text: text.to_string(),
        ordinal: 0,
        parent_id: None,
        metadata: meta(doc),
    }
}

fn child(id: &str, doc: &str, pid: &str, text: &str) -> Chunk {
    Chunk {
        id: id.to_string(),
        doc_id: doc.to_string(),
        tier: Tier::Child,
        text: text.to_string(),
        ordinal: 0,
        parent_id: Some(pid.to_string()),
        metadata: meta(doc),
    }
}

#[test]
fn load_from_json_file_and_lookup() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("chunks.json");
    let chunks = vec![
        parent("p1", "doc-a", "full section text"),
        child("c1", "doc-a", "p1", "small span"),
    ];
    fs::write(&path, serde_json::to_string(&chunks).expect("serialize")).expect("write");

    let store = JsonChunkStore::load(&path).expect("load");
    assert_eq!(store.len(), 2);

    let got = store.get("c1").expect("get").expect("present");
    assert_eq!(got.text, "small span");
    assert!(store.get("nope").expect("get").is_none());
}

#[test]
fn parent_of_resolves_owning_parent() {
    let store = JsonChunkStore::from_chunks(vec![
        parent("p1", "doc-a", "parent text"),
        child("c1", "doc-a", "p1", "child text"),
    ])
    .expect("build");

    let p = store.parent_of("c1").expect("parent_of").expect("present");
    assert_eq!(p.id, "p1");
    assert_eq!(p.text, "parent text");

    // a parent chunk has no parent of its own
    assert!(store.parent_of("p1").expect("parent_of").is_none());
    // unknown child resolves to nothing
    assert!(store.parent_of("ghost").expect("parent_of").is_none());
}

#[test]
fn child_with_missing_parent_is_rejected() {
    let err = JsonChunkStore::from_chunks(vec![child("c1", "doc-a", "p-missing", "orphan")])
        .expect_err("must fail");
    assert!(err.to_string().contains("missing parent"));
}

#[test]
fn child_crossing_documents_is_rejected() {
    let err = JsonChunkStore::from_chunks(vec![
        parent("p1", "doc-a", "text"),
        child("c1", "doc-b", "p1", "text"),
    ])
    .expect_err("must fail");
    assert!(err.to_string().contains("different documents"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = JsonChunkStore::from_chunks(vec![
        parent("p1", "doc-a", "text"),
        parent("p1", "doc-a", "text again"),
    ])
    .expect_err("must fail");
    assert!(err.to_string().contains("duplicate"));
}
