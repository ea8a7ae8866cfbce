//! C6: recursive-content digest engine.
//!
//! Maintains an ordered stack of `(segment, digest state)` pairs tracking
//! the current path prefix. Every directory's entry list is folded into
//! every digest state still on the stack when it is visited, so by the
//! time an ancestor is popped its digest has absorbed every descendant
//! seen while it was open, a recursive, order-sensitive content hash.

use sha2::{Digest, Sha256};

use crate::pathutil::{longest_common_prefix, split_segments};

const PATH_SEP: u8 = b'/';

/// SHA-256 of the empty byte string.
pub fn empty_digest() -> [u8; 32] {
    Sha256::digest([]).into()
}

/// SHA-256 of the canonical serialization of an empty entry list.
pub fn empty_dir_digest() -> [u8; 32] {
    Sha256::digest(serialize_entries(&[])).into()
}

/// Canonical serialization fed to the digest: for each entry in declared
/// order, one tag byte (`0`/`1`) then the name's big-endian `u32` length
/// then the name bytes. Injective: no two distinct entry lists serialize
/// to the same bytes, since every name's length is recorded before it.
fn serialize_entries(entries: &[(bool, Vec<u8>)]) -> Vec<u8> {
    let mut out = Vec::new();
    for (is_subdir, name) in entries {
        out.push(u8::from(*is_subdir));
        out.extend_from_slice(&(name.len() as u32).to_be_bytes());
        out.extend_from_slice(name);
    }
    out
}

struct Level {
    segment: Vec<u8>,
    digest: Sha256,
}

/// A pop event: the full path of the directory that just closed, its
/// finalized recursive digest, and a snapshot of its parent's digest
/// state at the moment of the pop (the parent hasn't closed yet, so this
/// is whatever it has absorbed so far, enough to tell whether the
/// parent is, up to this point, structurally identical to some other
/// parent, which is exactly what duplicate classification needs).
pub struct PopEvent {
    pub path_bytes: Vec<u8>,
    pub digest: [u8; 32],
    pub parent_digest: Option<[u8; 32]>,
}

/// The stack itself. Callers drain pop events from `select` as they occur.
#[derive(Default)]
pub struct HashStack {
    levels: Vec<Level>,
}

impl HashStack {
    pub fn new() -> Self {
        Self { levels: Vec::new() }
    }

    fn current_segments(&self) -> Vec<Vec<u8>> {
        self.levels.iter().map(|l| l.segment.clone()).collect()
    }

    fn full_path(levels: &[Level], upto: usize) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, level) in levels.iter().take(upto).enumerate() {
            if i > 0 {
                out.push(PATH_SEP);
            }
            out.extend_from_slice(&level.segment);
        }
        out
    }

    /// Moves the stack to `path_bytes`, popping divergent levels (emitting
    /// a `PopEvent` for each) and pushing the new segments. Returns the
    /// pop events in pop order (shallow levels close before deep ones, so
    /// the deepest diverging level pops first).
    pub fn select(&mut self, path_bytes: &[u8]) -> Vec<PopEvent> {
        let target = split_segments(path_bytes);
        let common = longest_common_prefix(&self.current_segments(), &target);

        let mut events = Vec::new();
        while self.levels.len() > common {
            let popped_count = self.levels.len();
            let path = Self::full_path(&self.levels, popped_count);
            let level = self.levels.pop().expect("just checked len > common");
            let parent_digest = self.levels.last().map(|l| -> [u8; 32] { l.digest.clone().finalize().into() });
            events.push(PopEvent {
                path_bytes: path,
                digest: level.digest.finalize().into(),
                parent_digest,
            });
        }
        for seg in &target[common..] {
            self.levels.push(Level {
                segment: seg.clone(),
                digest: Sha256::new(),
            });
        }
        events
    }

    /// Folds `entries` into every digest state currently on the stack and
    /// returns a standalone digest of the entry list alone.
    pub fn sum_contents(&mut self, entries: &[(bool, Vec<u8>)]) -> [u8; 32] {
        let chunk = serialize_entries(entries);
        for level in &mut self.levels {
            level.digest.update(&chunk);
        }
        Sha256::digest(&chunk).into()
    }

    /// Pops every remaining level, yielding their finalized digests. Call
    /// once the directory stream is exhausted to flush the final path.
    pub fn finish(mut self) -> Vec<PopEvent> {
        let mut events = Vec::new();
        while !self.levels.is_empty() {
            let path = Self::full_path(&self.levels, self.levels.len());
            let level = self.levels.pop().expect("checked non-empty");
            let parent_digest = self.levels.last().map(|l| -> [u8; 32] { l.digest.clone().finalize().into() });
            events.push(PopEvent {
                path_bytes: path,
                digest: level.digest.finalize().into(),
                parent_digest,
            });
        }
        events
    }
}
