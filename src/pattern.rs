//! C5: turn glob or regex pattern strings into compiled byte-string matchers.
//!
//! Matchers run directly against undecoded path/name bytes, sidestepping
//! the encoding problem entirely: we never have to guess what codec a
//! filename was recorded in before we can test it against a pattern.

use regex::bytes::{Regex, RegexBuilder};

use crate::error::Result;

/// Translates a shell glob into an unanchored regex source string.
///
/// `*` becomes `.*`, `?` becomes `.`, a `[...]` character class is copied
/// through verbatim (a leading `!` is rewritten to `^` for regex negation),
/// and every other character is escaped so it matches itself literally.
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let start = i;
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '!' || chars[j] == '^') {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ']' {
                    j += 1;
                }
                while j < chars.len() && chars[j] != ']' {
                    j += 1;
                }
                if j >= chars.len() {
                    // unclosed class: treat the bracket as a literal
                    out.push_str(&regex::escape("["));
                    i += 1;
                    continue;
                }
                let mut class: String = chars[start..=j].iter().collect();
                if class.len() > 1 && class.as_bytes()[1] == b'!' {
                    class.replace_range(1..2, "^");
                }
                out.push_str(&class);
                i = j + 1;
                continue;
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
        i += 1;
    }
    out
}

/// Compiles a list of pattern strings into byte-string matchers, anchored
/// at the start (the semantics of a typical regex `match`, not a full-string
/// match). `use_regex` selects between treating the input as glob or as
/// already-a-regex; `ignore_case` sets case-insensitive matching.
pub fn compile_patterns(patterns: &[String], use_regex: bool, ignore_case: bool) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            let source = if use_regex { p.clone() } else { glob_to_regex(p) };
            let anchored = format!("^(?:{source})");
            RegexBuilder::new(&anchored)
                .case_insensitive(ignore_case)
                .build()
                .map_err(Into::into)
        })
        .collect()
}

/// True iff any compiled pattern matches `bytes` starting at offset zero.
pub fn any_matches(selectors: &[Regex], bytes: &[u8]) -> bool {
    selectors.iter().any(|r| r.is_match(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_and_question_translate() {
        assert_eq!(glob_to_regex("*.ini"), r".*\.ini");
        assert_eq!(glob_to_regex("a?c"), r"a.c");
    }

    #[test]
    fn character_class_preserved() {
        assert_eq!(glob_to_regex("c[--9].conf"), r"c[--9]\.conf");
        assert_eq!(glob_to_regex("[!abc]x"), r"[^abc]x");
    }

    #[test]
    fn glob_matches_desktop_ini() {
        let selectors = compile_patterns(&["*.ini".to_string()], false, false).unwrap();
        assert!(any_matches(&selectors, b"desktop.ini"));
        assert!(!any_matches(&selectors, b"desktop.inix_not_anchored_end"));
        // not anchored at the start -> no match
        assert!(!any_matches(&selectors, b"not_desktop.ini"));
    }

    #[test]
    fn ignore_case_flag_applies() {
        let selectors = compile_patterns(&["readme".to_string()], false, true).unwrap();
        assert!(any_matches(&selectors, b"README"));
    }

    #[test]
    fn glob_vs_regex_equivalence_for_plain_globs() {
        // For globs with no metacharacters outside *?[], translate() then
        // compile() should agree with compiling the translated source
        // directly as a "regex" input.
        for glob in ["*.txt", "file?.log", "[0-9]*.bin", "a*b?c"] {
            let via_glob = compile_patterns(&[glob.to_string()], false, false).unwrap();
            let translated = glob_to_regex(glob);
            let via_regex = compile_patterns(&[translated], true, false).unwrap();
            for sample in ["1.txt", "file1.log", "9x.bin", "axbyc", "nope"] {
                assert_eq!(
                    any_matches(&via_glob, sample.as_bytes()),
                    any_matches(&via_regex, sample.as_bytes()),
                    "glob {glob} vs its translation disagree on {sample}"
                );
            }
        }
    }

    #[test]
    fn invalid_regex_is_pattern_syntax_error() {
        let err = compile_patterns(&["(unclosed".to_string()], true, false).unwrap_err();
        assert!(matches!(err, crate::error::AppError::PatternSyntax(_)));
    }
}
