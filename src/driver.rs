//! C9: query driver. Opens the database, applies the path filter to each
//! yielded directory block, and routes survivors to one of the three
//! subcommand consumers. Input/output limits are honored as
//! early-termination counters; zero means unlimited.

use std::fs::File;

use serde::Serialize;

use crate::cli::{Action, Cli, Command};
use crate::database::{Conf, Database, Header};
use crate::duplicates::{Classification, DuplicateReducer};
use crate::error::Result;
use crate::hashstack::HashStack;
use crate::pattern::compile_patterns;
use crate::safe_decode::safe_decode;
use crate::sink::Sink;
use crate::tree::Tree;

/// Runs the program according to the parsed command line.
pub fn run(cli: &Cli, sink: &dyn Sink) -> Result<()> {
    if cli.app_config {
        print_app_config(cli);
    }

    if cli.dry_run {
        return Ok(());
    }

    let mut db = Database::open(&cli.database)?;

    if cli.mdb_settings {
        print_mdb_settings(&db.header, &db.conf, sink);
    }

    match &cli.command {
        Some(Command::Find {
            limit_output_dirs,
            limit_output_match,
            action,
            patterns,
        }) => run_find(
            &mut db,
            patterns,
            cli.use_regexps,
            cli.ignore_case,
            cli.limit_input_dirs,
            *limit_output_dirs,
            *limit_output_match,
            *action,
        ),
        Some(Command::Dups { dir_selectors }) => run_dups(
            &mut db,
            dir_selectors,
            cli.use_regexps,
            cli.ignore_case,
            cli.limit_input_dirs,
        ),
        Some(Command::Tree {
            limit_output_dirs,
            depth,
            patterns,
        }) => run_tree(
            &mut db,
            patterns,
            cli.use_regexps,
            cli.ignore_case,
            cli.limit_input_dirs,
            *limit_output_dirs,
            *depth,
            sink,
        ),
        None => Ok(()),
    }
}

#[derive(Serialize)]
struct FoundDir {
    name: String,
    dt: String,
    matches: Vec<(bool, String)>,
}

#[allow(clippy::too_many_arguments)]
fn run_find(
    db: &mut Database<File>,
    patterns: &[String],
    use_regexps: bool,
    ignore_case: bool,
    limit_input_dirs: usize,
    limit_output_dirs: usize,
    limit_output_match: usize,
    action: Action,
) -> Result<()> {
    let selectors = compile_patterns(patterns, use_regexps, ignore_case)?;
    let mut dirs_emitted = 0usize;
    let mut entries_emitted = 0usize;
    let mut input_count = 0usize;
    let mut json_items = Vec::new();

    for dirblock in db.directories() {
        let mut dirblock = dirblock?;
        input_count += 1;
        if limit_input_dirs != 0 && input_count > limit_input_dirs {
            break;
        }
        if limit_output_match != 0 && entries_emitted >= limit_output_match {
            break;
        }
        let remaining = if limit_output_match == 0 {
            0
        } else {
            limit_output_match - entries_emitted
        };
        let matches = dirblock.match_entries(&selectors, remaining);
        if matches.is_empty() {
            continue;
        }
        entries_emitted += matches.len();
        dirs_emitted += 1;

        let path = safe_decode(&dirblock.path_bytes, "", &crate::sink::NullSink);
        match action {
            Action::Test => println!("{} {}", dirblock.mtime_string(), path),
            Action::Count => println!("[{}] {} matches in {}", dirblock.mtime_string(), matches.len(), path),
            Action::List => {
                println!("* {} {}", dirblock.mtime_string(), path);
                for (is_subdir, name) in &matches {
                    let suffix = if *is_subdir { "/" } else { "" };
                    println!("    - {}{}", safe_decode(name, "", &crate::sink::NullSink), suffix);
                }
            }
            Action::Json => {
                json_items.push(FoundDir {
                    name: path,
                    dt: dirblock.mtime_string(),
                    matches: matches
                        .iter()
                        .map(|(is_subdir, name)| {
                            (*is_subdir, safe_decode(name, "", &crate::sink::NullSink))
                        })
                        .collect(),
                });
            }
        }

        if limit_output_dirs != 0 && dirs_emitted >= limit_output_dirs {
            break;
        }
    }

    if action == Action::Json {
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    }
    Ok(())
}

fn run_dups(
    db: &mut Database<File>,
    dir_selectors: &[String],
    use_regexps: bool,
    ignore_case: bool,
    limit_input_dirs: usize,
) -> Result<()> {
    let selectors = compile_patterns(dir_selectors, use_regexps, ignore_case)?;
    let mut stack = HashStack::new();
    let mut reducer = DuplicateReducer::new();
    let mut input_count = 0usize;

    for dirblock in db.directories() {
        let dirblock = dirblock?;
        input_count += 1;
        if limit_input_dirs != 0 && input_count > limit_input_dirs {
            break;
        }
        if !selectors.is_empty() && !dirblock.match_path(&selectors) {
            continue;
        }
        for event in stack.select(&dirblock.path_bytes) {
            reducer.record(&event);
        }
        stack.sum_contents(&dirblock.entries);
    }
    for event in stack.finish() {
        reducer.record(&event);
    }

    print_duplicate_report(&reducer);
    Ok(())
}

fn print_duplicate_report(reducer: &DuplicateReducer) {
    println!("Reporting Duplicates");
    for set in reducer.report() {
        let tag = match set.classification {
            Classification::Top => "top",
            Classification::Mix => "mix",
        };
        println!(
            "* {} : {} potential duplicates ({})",
            hex_digest(&set.digest),
            set.paths.len(),
            tag
        );
        for path in &set.paths {
            println!("    - {}", safe_decode(path, "", &crate::sink::NullSink));
        }
    }
}

fn hex_digest(digest: &[u8; 32]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[allow(clippy::too_many_arguments)]
fn run_tree(
    db: &mut Database<File>,
    patterns: &[String],
    use_regexps: bool,
    ignore_case: bool,
    limit_input_dirs: usize,
    limit_output_dirs: usize,
    depth: usize,
    sink: &dyn Sink,
) -> Result<()> {
    let selectors = compile_patterns(patterns, use_regexps, ignore_case)?;
    let mut input_count = 0usize;
    let mut dirs_emitted = 0usize;
    let mut current_tree: Option<Tree> = None;

    for dirblock in db.directories() {
        let dirblock = dirblock?;
        input_count += 1;
        if limit_input_dirs != 0 && input_count > limit_input_dirs {
            break;
        }

        if let Some(tree) = &mut current_tree {
            if tree.load(&dirblock.path_bytes).is_some() {
                continue;
            }
            flush_tree(tree, depth, sink);
            current_tree = None;
        }

        if !selectors.is_empty() && !dirblock.match_path(&selectors) {
            continue;
        }
        dirs_emitted += 1;
        println!("{}", safe_decode(&dirblock.path_bytes, "", sink));
        current_tree = Some(Tree::new(dirblock.path_bytes));
        if limit_output_dirs != 0 && dirs_emitted >= limit_output_dirs {
            break;
        }
    }
    if let Some(tree) = &current_tree {
        flush_tree(tree, depth, sink);
    }
    Ok(())
}

fn flush_tree(tree: &Tree, depth: usize, sink: &dyn Sink) {
    let rendered = tree.render(depth, sink);
    if !rendered.is_empty() {
        print!("{rendered}");
    }
}

fn print_app_config(cli: &Cli) {
    let mut lines = vec![
        ("app_config".to_string(), cli.app_config.to_string()),
        ("database".to_string(), cli.database.display().to_string()),
        ("dry_run".to_string(), cli.dry_run.to_string()),
        ("ignore_case".to_string(), cli.ignore_case.to_string()),
        ("limit_input_dirs".to_string(), cli.limit_input_dirs.to_string()),
        ("log_level".to_string(), cli.log_level.clone()),
        ("mdb_settings".to_string(), cli.mdb_settings.to_string()),
        ("use_regexps".to_string(), cli.use_regexps.to_string()),
    ];
    match &cli.command {
        Some(Command::Find {
            limit_output_dirs,
            limit_output_match,
            action,
            patterns,
        }) => {
            lines.push(("command".to_string(), "find".to_string()));
            lines.push(("action".to_string(), action.to_string()));
            lines.push(("limit_output_dirs".to_string(), limit_output_dirs.to_string()));
            lines.push(("limit_output_match".to_string(), limit_output_match.to_string()));
            lines.push(("patterns".to_string(), format!("{patterns:?}")));
        }
        Some(Command::Dups { dir_selectors }) => {
            lines.push(("command".to_string(), "dups".to_string()));
            lines.push(("dir_selectors".to_string(), format!("{dir_selectors:?}")));
        }
        Some(Command::Tree {
            limit_output_dirs,
            depth,
            patterns,
        }) => {
            lines.push(("command".to_string(), "tree".to_string()));
            lines.push(("limit_output_dirs".to_string(), limit_output_dirs.to_string()));
            lines.push(("depth".to_string(), depth.to_string()));
            lines.push(("patterns".to_string(), format!("{patterns:?}")));
        }
        None => {}
    }
    lines.sort();
    for (key, value) in lines {
        println!("{key:20} : {value}");
    }
}

fn print_mdb_settings(header: &Header, conf: &Conf, sink: &dyn Sink) {
    println!("mlocate database details");
    println!("====================================");
    println!("Root: {}", safe_decode(&header.root, "", sink));
    println!("Requires visibility: {}", header.req_visibility);
    println!("File format: {}", header.file_format);
    println!();
    println!("Configuration:");
    let mut groups = conf.groups.clone();
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    for (key, values) in groups {
        let key_str = safe_decode(&key, "", sink);
        let values_str: Vec<String> = values.iter().map(|v| safe_decode(v, "", sink)).collect();
        println!("    - {} = {:?}", key_str, values_str);
    }
    println!("====================================");
}
