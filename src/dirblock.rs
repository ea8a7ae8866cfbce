//! C3: one decoded directory, as handed out by the database decoder's
//! directory stream.

use chrono::{DateTime, TimeZone, Utc};
use regex::bytes::Regex;

use crate::pattern::any_matches;

/// One `(is_subdir, name_bytes)` row inside a directory block.
pub type Entry = (bool, Vec<u8>);

/// A single decoded directory: raw-bytes path, modification time, and the
/// ordered entry list exactly as stored on disk.
#[derive(Debug, Clone)]
pub struct DirBlock {
    pub path_bytes: Vec<u8>,
    pub mtime: DateTime<Utc>,
    pub entries: Vec<Entry>,
    /// Populated by `match_entries`; the sub-list of `entries` that matched
    /// the most recent pattern test.
    pub selection: Option<Vec<Entry>>,
}

impl DirBlock {
    pub fn new(path_bytes: Vec<u8>, seconds: i64, nanos: i32, entries: Vec<Entry>) -> Self {
        let micros = (f64::from(nanos) / 1000.0).round() as i64;
        let mtime = Utc
            .timestamp_opt(seconds, 0)
            .single()
            .unwrap_or_else(|| Utc.timestamp_opt(0, 0).single().unwrap())
            + chrono::Duration::microseconds(micros);
        Self {
            path_bytes,
            mtime,
            entries,
            selection: None,
        }
    }

    /// Formats `mtime` the way the original tool prints it:
    /// `2017-07-20 13:22:43.817771`.
    pub fn mtime_string(&self) -> String {
        self.mtime.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }

    /// True iff any of `selectors` matches `path_bytes` from the start.
    pub fn match_path(&self, selectors: &[Regex]) -> bool {
        any_matches(selectors, &self.path_bytes)
    }

    /// Returns (and records in `selection`) the prefix of `entries` whose
    /// names match any selector, truncated to `limit` entries (0 = no
    /// limit). Entries are tested in declared order; each entry is
    /// accepted by the first selector that matches it, never counted
    /// twice.
    pub fn match_entries(&mut self, selectors: &[Regex], limit: usize) -> Vec<Entry> {
        let mut out = Vec::new();
        for (is_subdir, name) in &self.entries {
            if any_matches(selectors, name) {
                out.push((*is_subdir, name.clone()));
                if limit != 0 && out.len() >= limit {
                    break;
                }
            }
        }
        self.selection = Some(out.clone());
        out
    }
}
