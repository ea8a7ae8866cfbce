//! End-to-end scenarios driven through the public decoder, pattern,
//! hash-stack, duplicate-reducer, and tree APIs, building synthetic
//! mlocate database byte streams rather than depending on a real one.

use std::io::Cursor;

use mlocate_explorer::database::Database;
use mlocate_explorer::duplicates::{Classification, DuplicateReducer};
use mlocate_explorer::hashstack::HashStack;
use mlocate_explorer::pattern::compile_patterns;
use mlocate_explorer::tree::Tree;

const MAGIC: &[u8; 8] = b"\0mlocate";

struct DbBuilder {
    buf: Vec<u8>,
}

impl DbBuilder {
    fn new(root: &[u8]) -> Self {
        let mut buf = Vec::new();
        buf.extend_from_slice(MAGIC);
        let conf = b"\0\0"; // one empty/closing pair, no groups
        buf.extend_from_slice(&(conf.len() as i32).to_be_bytes());
        buf.push(0);
        buf.push(0);
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(root);
        buf.push(0);
        buf.extend_from_slice(conf);
        Self { buf }
    }

    fn dir(mut self, path: &[u8], seconds: i64, nanos: i32, entries: &[(bool, &[u8])]) -> Self {
        self.buf.extend_from_slice(&seconds.to_be_bytes());
        self.buf.extend_from_slice(&nanos.to_be_bytes());
        self.buf.extend_from_slice(&[0, 0, 0, 0]);
        self.buf.extend_from_slice(path);
        self.buf.push(0);
        for (is_subdir, name) in entries {
            self.buf.push(u8::from(*is_subdir));
            self.buf.extend_from_slice(name);
            self.buf.push(0);
        }
        self.buf.push(2);
        self
    }

    fn build(self) -> Vec<u8> {
        self.buf
    }
}

/// Scenario 1: the `test` action emits exactly one line, the mtime then
/// the path, for a directory with a matching entry.
#[test]
fn scenario_1_test_action_line_format() {
    let bytes = DbBuilder::new(b"/")
        .dir(b"/x", 1_500_556_963, 817_771_000, &[(true, b"a"), (false, b"b")])
        .build();
    let mut db = Database::from_reader(Cursor::new(bytes)).unwrap();
    let selectors = compile_patterns(&["a".to_string()], false, false).unwrap();
    let mut blocks = db.directories();
    let mut dirblock = blocks.next().unwrap().unwrap();
    let matches = dirblock.match_entries(&selectors, 0);
    assert_eq!(matches, vec![(true, b"a".to_vec())]);
    assert_eq!(dirblock.mtime_string(), "2017-07-20 13:22:43.817771");
    let line = format!("{} {}", dirblock.mtime_string(), "/x");
    assert_eq!(line, "2017-07-20 13:22:43.817771 /x");
}

/// Scenario 2: glob pattern `*.ini` against an entry `desktop.ini` selects
/// it, with `-I 10` as an input cap that never kicks in for one directory.
#[test]
fn scenario_2_glob_pattern_selects_matching_entry() {
    let bytes = DbBuilder::new(b"/")
        .dir(b"/R/S", 0, 0, &[(false, b"desktop.ini")])
        .build();
    let mut db = Database::from_reader(Cursor::new(bytes)).unwrap();
    let selectors = compile_patterns(&["*.ini".to_string()], false, false).unwrap();
    let limit_input_dirs = 10usize;
    let mut input_count = 0usize;
    let mut found = Vec::new();
    for dirblock in db.directories() {
        let mut dirblock = dirblock.unwrap();
        input_count += 1;
        if limit_input_dirs != 0 && input_count > limit_input_dirs {
            break;
        }
        let matches = dirblock.match_entries(&selectors, 0);
        if !matches.is_empty() {
            found.push((dirblock.path_bytes.clone(), matches));
        }
    }
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, b"/R/S");
    assert_eq!(found[0].1, vec![(false, b"desktop.ini".to_vec())]);
}

/// Scenarios 3 and 4: two directories with identical recursive structure
/// report as one top-level duplicate set; adding an identical nested
/// directory under one of them yields a `sub` classification, suppressed
/// from the report.
#[test]
fn scenario_3_and_4_duplicate_classification() {
    let bytes = DbBuilder::new(b"/")
        .dir(b"/u/v1", 0, 0, &[(false, b"same.txt")])
        .dir(b"/u/v1/inner", 0, 0, &[(false, b"leaf.txt")])
        .dir(b"/u/v2", 0, 0, &[(false, b"same.txt")])
        .dir(b"/u/v2/inner", 0, 0, &[(false, b"leaf.txt")])
        .build();
    let mut db = Database::from_reader(Cursor::new(bytes)).unwrap();
    let mut stack = HashStack::new();
    let mut reducer = DuplicateReducer::new();
    for dirblock in db.directories() {
        let dirblock = dirblock.unwrap();
        for event in stack.select(&dirblock.path_bytes) {
            reducer.record(&event);
        }
        stack.sum_contents(&dirblock.entries);
    }
    for event in stack.finish() {
        reducer.record(&event);
    }

    let sets = reducer.report();
    // Only the /u/v1 vs /u/v2 top-level set should survive; the nested
    // "inner" duplicate is a sub-duplicate of an already-duplicated parent.
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].classification, Classification::Top);
    assert_eq!(sets[0].paths, vec![b"/u/v1".to_vec(), b"/u/v2".to_vec()]);
}

/// Scenario 6: a truncated directory header is a hard error; a clean EOF
/// at a directory boundary ends the stream normally.
#[test]
fn scenario_6_truncation_vs_clean_eof() {
    let full = DbBuilder::new(b"/").dir(b"/x", 0, 0, &[(false, b"f")]).build();

    let mut truncated = full.clone();
    truncated.pop();
    let mut db = Database::from_reader(Cursor::new(truncated)).unwrap();
    let result: mlocate_explorer::Result<Vec<_>> = db.directories().collect();
    assert!(result.is_err());

    let mut db = Database::from_reader(Cursor::new(full)).unwrap();
    let blocks: Vec<_> = db.directories().collect::<mlocate_explorer::Result<Vec<_>>>().unwrap();
    assert_eq!(blocks.len(), 1);
}

/// End-to-end `tree` rendering driven off a decoded directory stream.
#[test]
fn tree_render_end_to_end_from_decoded_stream() {
    let bytes = DbBuilder::new(b"/")
        .dir(b"/run/media/MyBook", 0, 0, &[])
        .dir(b"/run/media/MyBook/Archives", 0, 0, &[])
        .dir(b"/run/media/MyBook/Archives/2012", 0, 0, &[])
        .dir(b"/run/media/MyBook/Backup", 0, 0, &[])
        .build();
    let mut db = Database::from_reader(Cursor::new(bytes)).unwrap();
    let mut blocks = db.directories();
    let root = blocks.next().unwrap().unwrap();
    let mut tree = Tree::new(root.path_bytes);
    for dirblock in blocks {
        let dirblock = dirblock.unwrap();
        tree.load(&dirblock.path_bytes);
    }
    let rendered = tree.render(0, &mlocate_explorer::sink::NullSink);
    assert_eq!(
        rendered,
        "├── Archives\n│   └── 2012\n└── Backup\n"
    );
}
