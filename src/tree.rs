//! C8: subtree assembler and box-drawing renderer.
//!
//! Accepts a stream of absolute directory paths via `load`, reconstructs
//! the tree structure relative to a fixed root, and renders it the way
//! `tree`-style tools do: `├── `, `└── `, `│   `, `    `.

use crate::pathutil::{longest_common_prefix, split_segments};
use crate::sink::Sink;

const PATH_SEP: u8 = b'/';

const TEE: &str = "├── ";
const ELBOW: &str = "└── ";
const PIPE: &str = "│   ";
const SPACER: &str = "    ";

struct TreeNode {
    name: Vec<u8>,
    children: Vec<TreeNode>,
}

/// Builds a tree of directory names rooted at `root_bytes`, fed one
/// absolute path at a time via `load`.
pub struct Tree {
    root: Vec<u8>,
    stack: Vec<Vec<u8>>,
    children: Vec<TreeNode>,
}

impl Tree {
    pub fn new(root_bytes: Vec<u8>) -> Self {
        Self {
            root: root_bytes,
            stack: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Feeds one directory path in. If `path_bytes` does not start with
    /// the tree's root, returns `None` (the driver reads this as
    /// end-of-subtree). Otherwise returns the path relative to the root,
    /// with a trailing separator.
    pub fn load(&mut self, path_bytes: &[u8]) -> Option<Vec<u8>> {
        if !path_bytes.starts_with(&self.root) {
            return None;
        }
        let mut rest = &path_bytes[self.root.len()..];
        if rest.first() == Some(&PATH_SEP) {
            rest = &rest[1..];
        }
        let nodes = split_segments(rest);
        let common = longest_common_prefix(&self.stack, &nodes);
        self.stack.truncate(common);
        for seg in &nodes[common..] {
            self.push(seg.clone());
        }

        let mut rel = rest.to_vec();
        rel.push(PATH_SEP);
        Some(rel)
    }

    fn push(&mut self, segment: Vec<u8>) {
        let mut tip = &mut self.children;
        for _ in 0..self.stack.len() {
            tip = &mut tip.last_mut().expect("stack depth tracks inserted nodes").children;
        }
        tip.push(TreeNode {
            name: segment.clone(),
            children: Vec::new(),
        });
        self.stack.push(segment);
    }

    /// Current nesting depth (number of open path segments).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Renders the accumulated tree with box-drawing connectors.
    /// `max_depth` of `0` means unlimited.
    pub fn render(&self, max_depth: usize, sink: &dyn Sink) -> String {
        let mut out = String::new();
        render_level(&self.children, "", 0, max_depth, sink, &mut out);
        out
    }
}

fn render_level(
    nodes: &[TreeNode],
    prefix: &str,
    depth: usize,
    max_depth: usize,
    sink: &dyn Sink,
    out: &mut String,
) {
    if nodes.is_empty() {
        return;
    }
    if max_depth != 0 && depth >= max_depth {
        return;
    }
    let (last, rest) = nodes.split_last().expect("checked non-empty above");
    for node in rest {
        let name = crate::safe_decode::safe_decode(&node.name, "", sink);
        out.push_str(prefix);
        out.push_str(TEE);
        out.push_str(&name);
        out.push('\n');
        let child_prefix = format!("{prefix}{PIPE}");
        render_level(&node.children, &child_prefix, depth + 1, max_depth, sink, out);
    }
    let name = crate::safe_decode::safe_decode(&last.name, "", sink);
    out.push_str(prefix);
    out.push_str(ELBOW);
    out.push_str(&name);
    out.push('\n');
    let child_prefix = format!("{prefix}{SPACER}");
    render_level(&last.children, &child_prefix, depth + 1, max_depth, sink, out);
}
