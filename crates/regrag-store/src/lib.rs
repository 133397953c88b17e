//! Read-only chunk store backed by the index build's JSON artifact.
//!
//! The batch indexer writes one `chunks.json` holding every child and
//! parent chunk with metadata. This crate loads it once at process start,
//! verifies the child→parent invariant, and serves lookups from memory.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use regrag_core::error::Error;
use regrag_core::traits::ChunkStore;
use regrag_core::types::{Chunk, ChunkId, Tier};

#[derive(Debug)]
pub struct JsonChunkStore {
    chunks: HashMap<ChunkId, Chunk>,
}

impl JsonChunkStore {
    /// Load and validate the artifact. Fails on unreadable or corrupt
    /// input; a store that loads is guaranteed to satisfy the invariant
    /// that every child's parent exists in the same document.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading chunk store at {}", path.display()))?;
        let list: Vec<Chunk> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing chunk store at {}", path.display()))?;
        let store = Self::from_chunks(list)?;
        info!(
            path = %path.display(),
            chunks = store.chunks.len(),
            "loaded chunk store"
        );
        Ok(store)
    }

    pub fn from_chunks(list: Vec<Chunk>) -> Result<Self> {
        let mut chunks = HashMap::with_capacity(list.len());
        for chunk in list {
            if chunks.insert(chunk.id.clone(), chunk).is_some() {
                return Err(Error::CorruptStore("duplicate chunk id".into()).into());
            }
        }
        validate(&chunks)?;
        Ok(Self { chunks })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn validate(chunks: &HashMap<ChunkId, Chunk>) -> Result<()> {
    for chunk in chunks.values() {
        match chunk.tier {
            Tier::Child => {
                let pid = chunk.parent_id.as_deref().ok_or_else(|| {
                    Error::CorruptStore(format!("child chunk {} has no parent_id", chunk.id))
                })?;
                let parent = chunks.get(pid).ok_or_else(|| {
                    Error::CorruptStore(format!(
                        "child chunk {} references missing parent {}",
                        chunk.id, pid
                    ))
                })?;
                if parent.tier != Tier::Parent {
                    return Err(Error::CorruptStore(format!(
                        "chunk {} parents onto non-parent chunk {}",
                        chunk.id, pid
                    ))
                    .into());
                }
                if parent.doc_id != chunk.doc_id {
                    return Err(Error::CorruptStore(format!(
                        "child {} and parent {} belong to different documents",
                        chunk.id, pid
                    ))
                    .into());
                }
            }
            Tier::Parent => {
                if chunk.parent_id.is_some() {
                    return Err(Error::CorruptStore(format!(
                        "parent chunk {} must not carry a parent_id",
                        chunk.id
                    ))
                    .into());
                }
            }
        }
    }
    Ok(())
}

impl ChunkStore for JsonChunkStore {
    fn get(&self, id: &str) -> Result<Option<Chunk>> {
        Ok(self.chunks.get(id).cloned())
    }

    fn parent_of(&self, child_id: &str) -> Result<Option<Chunk>> {
        let Some(child) = self.chunks.get(child_id) else {
            return Ok(None);
        };
        let Some(pid) = child.parent_id.as_deref() else {
            return Ok(None);
        };
        Ok(self.chunks.get(pid).cloned())
    }
}
