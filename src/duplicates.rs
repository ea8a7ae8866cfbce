//! C7: duplicate-subtree detection from recursive-content digest pop events.

use std::collections::BTreeMap;

use crate::hashstack::{empty_dir_digest, PopEvent};

/// Classification of a duplicated digest against its parents' state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No parent digest is itself duplicated: report this as the top of
    /// the identical subtree.
    Top,
    /// Some parents are duplicated, some aren't.
    Mix,
}

/// One reportable group of duplicate directories.
#[derive(Debug, Clone)]
pub struct DuplicateSet {
    pub digest: [u8; 32],
    pub classification: Classification,
    /// Sorted member paths.
    pub paths: Vec<Vec<u8>>,
}

/// Accumulates `(path, digest)` pop events and reduces them to the
/// reportable duplicate sets: directories whose content digest repeats,
/// minus sub-duplicates whose parent is already part of a reported set.
#[derive(Default)]
pub struct DuplicateReducer {
    by_digest: BTreeMap<[u8; 32], Vec<Vec<u8>>>,
    parent_digest_by_path: BTreeMap<Vec<u8>, [u8; 32]>,
}

impl DuplicateReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one pop event.
    pub fn record(&mut self, event: &PopEvent) {
        self.by_digest
            .entry(event.digest)
            .or_default()
            .push(event.path_bytes.clone());
        if let Some(parent) = event.parent_digest {
            self.parent_digest_by_path
                .insert(event.path_bytes.clone(), parent);
        }
    }

    /// Reduces the accumulated events to a sorted list of duplicate sets,
    /// suppressing sub-duplicates (spec.md §4.7: every parent of the
    /// digest is itself duplicated, so a higher-level report already
    /// covers it).
    pub fn report(&self) -> Vec<DuplicateSet> {
        let empty_dir = empty_dir_digest();
        let dup_digests: BTreeMap<&[u8; 32], &Vec<Vec<u8>>> = self
            .by_digest
            .iter()
            .filter(|(digest, paths)| paths.len() > 1 && **digest != empty_dir)
            .collect();

        let mut sets = Vec::new();
        for (&digest, paths) in &dup_digests {
            let parent_digests: Vec<[u8; 32]> = paths
                .iter()
                .filter_map(|p| self.parent_digest_by_path.get(p))
                .copied()
                .collect();

            let any_parent_dup = parent_digests.iter().any(|p| dup_digests.contains_key(p));
            let all_parent_dup = !parent_digests.is_empty()
                && parent_digests.iter().all(|p| dup_digests.contains_key(p));

            if all_parent_dup {
                continue; // sub: a higher-level duplicate already covers this
            }
            let classification = if any_parent_dup {
                Classification::Mix
            } else {
                Classification::Top
            };
            let mut sorted_paths = paths.clone();
            sorted_paths.sort();
            sets.push(DuplicateSet {
                digest: *digest,
                classification,
                paths: sorted_paths,
            });
        }
        sets.sort_by(|a, b| a.digest.cmp(&b.digest));
        sets
    }
}
