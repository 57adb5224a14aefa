//! Recursive expansion of quoted includes.
//!
//! One [`ExpansionState`] lives for exactly one bundle invocation and is
//! threaded by `&mut` through every recursive call. It is never global, so
//! two bundles in the same process (tests, for one) cannot leak into each
//! other.
//!
//! Rules applied to every line, in file order:
//! - `#pragma once` is dropped everywhere, root included.
//! - `#include <...>` is emitted the first time its exact trimmed text is
//!   seen, dropped afterwards.
//! - `using namespace std;` is emitted once.
//! - `#include "..."` naming a debug header is kept verbatim; otherwise it is
//!   replaced by the expansion of the resolved file plus one blank separator,
//!   or kept verbatim when nothing resolves.
//! - In included files (never the root), block comments that start a line
//!   are stripped up to the line containing `*/`.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{debug, instrument};

use super::BundleError;
use super::directive::{Directive, is_debug_header};
use super::resolve::resolve_include;
use crate::infra::io::{read_text, split_lines};

/// Dedup state shared by all files of one bundle
#[derive(Debug, Default)]
pub struct ExpansionState {
    /// Canonical paths already expanded, in first-seen order
    visited: IndexSet<PathBuf>,
    /// Exact trimmed text of every emitted `#include <...>`
    seen_system_includes: IndexSet<String>,
    /// Set once `using namespace std;` has been emitted
    seen_using_std: bool,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files expanded so far, root first
    pub fn visited(&self) -> impl Iterator<Item = &Path> {
        self.visited.iter().map(PathBuf::as_path)
    }

    /// System includes emitted so far, in output order
    pub fn system_includes(&self) -> impl Iterator<Item = &str> {
        self.seen_system_includes.iter().map(String::as_str)
    }

    pub fn seen_using_std(&self) -> bool {
        self.seen_using_std
    }
}

/// Expands one root file against a fixed list of fallback include directories
pub struct Expander<'a> {
    include_dirs: &'a [PathBuf],
    state: ExpansionState,
}

impl<'a> Expander<'a> {
    pub fn new(include_dirs: &'a [PathBuf]) -> Self {
        Self { include_dirs, state: ExpansionState::new() }
    }

    /// Expand the root file. Its own comments are preserved.
    pub fn expand_root(&mut self, path: &Path) -> Result<Vec<String>, BundleError> {
        self.expand(path, true)
    }

    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    pub fn into_state(self) -> ExpansionState {
        self.state
    }

    #[instrument(level = "debug", skip(self))]
    fn expand(&mut self, path: &Path, is_root: bool) -> Result<Vec<String>, BundleError> {
        let canonical = dunce::canonicalize(path)
            .map_err(|source| BundleError::Canonicalize { path: path.to_path_buf(), source })?;

        // Mark before recursing so self-inclusion is cut off
        if !self.state.visited.insert(canonical.clone()) {
            debug!(file = %canonical.display(), "already expanded; skipping");
            return Ok(Vec::new());
        }

        let text = read_text(&canonical)
            .map_err(|source| BundleError::Read { path: canonical.clone(), source })?;
        let current_dir = canonical.parent().unwrap_or(Path::new(""));

        let mut out = Vec::new();
        let mut in_block_comment = false;

        for line in split_lines(&text) {
            let trimmed = line.trim();

            if !is_root {
                if in_block_comment {
                    if trimmed.contains("*/") {
                        in_block_comment = false;
                    }
                    continue;
                }
                if trimmed.starts_with("/*") {
                    in_block_comment = !trimmed.contains("*/");
                    continue;
                }
            }

            match Directive::classify(trimmed) {
                Directive::PragmaOnce => {}

                Directive::SystemInclude => {
                    if self.state.seen_system_includes.insert(trimmed.to_string()) {
                        out.push(line);
                    }
                }

                Directive::UsingStd => {
                    if !self.state.seen_using_std {
                        self.state.seen_using_std = true;
                        out.push(line);
                    }
                }

                Directive::LocalInclude(include) if is_debug_header(include) => {
                    debug!(include, "keeping debug header external");
                    out.push(line);
                }

                Directive::LocalInclude(include) => {
                    match resolve_include(include, current_dir, self.include_dirs) {
                        Some(resolved) => {
                            let nested = self.expand(&resolved, false)?;
                            out.extend(trim_blank_edges(nested));
                            out.push(String::new());
                        }
                        None => {
                            debug!(include, from = %canonical.display(), "unresolved include; passing through");
                            out.push(line);
                        }
                    }
                }

                Directive::Other => out.push(line),
            }
        }

        Ok(out)
    }
}

/// Drop leading and trailing whitespace-only lines
fn trim_blank_edges(mut lines: Vec<String>) -> Vec<String> {
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    let lead = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..lead);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&p, body).unwrap();
        p
    }

    fn expand(root: &Path, dirs: &[PathBuf]) -> Vec<String> {
        Expander::new(dirs).expand_root(root).unwrap()
    }

    fn count(lines: &[String], needle: &str) -> usize {
        lines.iter().filter(|l| l.trim() == needle).count()
    }

    #[test]
    fn inlines_at_the_directive_position() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "lib.hpp", "\n\nvoid helper() {}\n\n");
        let root = write(tmp.path(), "A.cpp", "int a;\n#include \"lib.hpp\"\nint main() {}\n");

        let out = expand(&root, &[]);
        assert_eq!(out, vec!["int a;", "void helper() {}", "", "int main() {}"]);
    }

    #[test]
    fn diamond_contributes_once_at_first_position() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "base.hpp", "int base;\n");
        write(tmp.path(), "left.hpp", "#include \"base.hpp\"\nint left;\n");
        write(tmp.path(), "sub/right.hpp", "#include \"../base.hpp\"\nint right;\n");
        let root = write(
            tmp.path(),
            "A.cpp",
            "#include \"left.hpp\"\n#include \"sub/right.hpp\"\nint main() {}\n",
        );

        let out = expand(&root, &[]);
        assert_eq!(count(&out, "int base;"), 1);
        let base = out.iter().position(|l| l == "int base;").unwrap();
        let left = out.iter().position(|l| l == "int left;").unwrap();
        let right = out.iter().position(|l| l == "int right;").unwrap();
        assert!(base < left && left < right);
    }

    #[test]
    fn two_cycle_terminates() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.hpp", "#pragma once\n#include \"b.hpp\"\nvoid a() {}\n");
        write(tmp.path(), "b.hpp", "#pragma once\n#include \"a.hpp\"\nvoid b() {}\n");
        let root = write(tmp.path(), "C.cpp", "#include \"a.hpp\"\nint main() {}\n");

        let out = expand(&root, &[]);
        assert_eq!(count(&out, "void a() {}"), 1);
        assert_eq!(count(&out, "void b() {}"), 1);
        assert_eq!(count(&out, "#pragma once"), 0);
        // the back edge b -> a expands to nothing, leaving only its separator
        assert!(!out.iter().any(|l| l.contains("#include")));
    }

    #[test]
    fn root_including_itself_is_cut_off() {
        let tmp = TempDir::new().unwrap();
        let root = write(tmp.path(), "S.cpp", "#include \"S.cpp\"\nint main() {}\n");

        let out = expand(&root, &[]);
        assert_eq!(out, vec!["", "int main() {}"]);
    }

    #[test]
    fn system_includes_and_using_dedupe_first_seen() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "lib.hpp", "#pragma once\n#include <iostream>\nusing namespace std;\nvoid helper(){}\n");
        let root = write(
            tmp.path(),
            "A.cpp",
            "#include <iostream>\n#include \"lib.hpp\"\nusing namespace std;\nint main(){}\n",
        );

        let out = expand(&root, &[]);
        assert_eq!(
            out,
            vec!["#include <iostream>", "using namespace std;", "void helper(){}", "", "int main(){}"]
        );
    }

    #[test]
    fn system_include_dedup_is_by_exact_text() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "lib.hpp", "#include<vector>\n#include <vector>\n");
        let root = write(tmp.path(), "A.cpp", "#include <vector>\n#include \"lib.hpp\"\n");

        let out = expand(&root, &[]);
        assert_eq!(count(&out, "#include <vector>"), 1);
        assert_eq!(count(&out, "#include<vector>"), 1);
    }

    #[test]
    fn block_comments_stripped_only_from_included_files() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "lib.hpp",
            "/* one-liner */\nint x;\n/**\n * doc\n */\nint y;\n  /* indented\n end */\nint z;\n",
        );
        let root = write(tmp.path(), "A.cpp", "/* root comment */\n#include \"lib.hpp\"\n");

        let out = expand(&root, &[]);
        assert_eq!(out, vec!["/* root comment */", "int x;", "int y;", "int z;", ""]);
    }

    #[test]
    fn debug_and_missing_includes_pass_through() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "my_Debug.h", "#define dbg(...)\n");
        let root = write(
            tmp.path(),
            "A.cpp",
            "#include \"my_Debug.h\"\n  #include \"missing.hpp\"\nint main() {}\n",
        );

        let out = expand(&root, &[]);
        assert_eq!(out, vec!["#include \"my_Debug.h\"", "  #include \"missing.hpp\"", "int main() {}"]);
    }

    #[test]
    fn include_dirs_are_searched_after_local_directory() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "include/ext.hpp", "void external() {}\n");
        let root = write(tmp.path(), "work/K.cpp", "#include \"ext.hpp\"\nint main() {}\n");

        let dirs = vec![tmp.path().join("include")];
        let out = expand(&root, &dirs);
        assert_eq!(out, vec!["void external() {}", "", "int main() {}"]);
    }

    #[test]
    fn state_records_visit_order() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.hpp", "#include <set>\n");
        write(tmp.path(), "b.hpp", "#include \"a.hpp\"\n");
        let root = write(tmp.path(), "R.cpp", "#include \"b.hpp\"\n#include <map>\n");

        let mut ex = Expander::new(&[]);
        ex.expand_root(&root).unwrap();
        let state = ex.into_state();

        let names: Vec<_> = state
            .visited()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["R.cpp", "b.hpp", "a.hpp"]);
        assert_eq!(state.system_includes().collect::<Vec<_>>(), vec!["#include <set>", "#include <map>"]);
        assert!(!state.seen_using_std());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_paths_share_one_identity() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "real/lib.hpp", "int once;\n");
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("alias")).unwrap();
        let root = write(
            tmp.path(),
            "A.cpp",
            "#include \"real/lib.hpp\"\n#include \"alias/lib.hpp\"\n",
        );

        let out = expand(&root, &[]);
        assert_eq!(count(&out, "int once;"), 1);
    }

    #[test]
    fn vanished_root_is_a_filesystem_error() {
        let tmp = TempDir::new().unwrap();
        let root = write(tmp.path(), "A.cpp", "int main() {}\n");
        fs::remove_file(&root).unwrap();

        let err = Expander::new(&[]).expand_root(&root).unwrap_err();
        assert!(matches!(err, BundleError::Canonicalize { .. }));
        assert!(err.to_string().contains("A.cpp"));
    }

    // /proc/self/mem is a regular file that refuses reads at offset 0,
    // even for root
    #[cfg(target_os = "linux")]
    #[test]
    fn unreadable_header_aborts_the_whole_bundle() {
        let tmp = TempDir::new().unwrap();
        let root = write(tmp.path(), "A.cpp", "int a;\n#include \"/proc/self/mem\"\nint b;\n");

        let err = Expander::new(&[]).expand_root(&root).unwrap_err();
        match &err {
            BundleError::Read { path, .. } => assert!(path.ends_with("mem"), "{path:?}"),
            other => panic!("expected read error, got {other:?}"),
        }
        assert!(err.to_string().contains("mem"));
    }

    #[test]
    fn trim_blank_edges_keeps_inner_blanks() {
        let v = |s: &[&str]| s.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(trim_blank_edges(v(&["", "  ", "a", "", "b", "\t", ""])), v(&["a", "", "b"]));
        assert!(trim_blank_edges(v(&["", " "])).is_empty());
    }
}
