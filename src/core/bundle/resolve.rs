//! Quoted-include resolution: the including file's directory first, then the
//! configured `-I` directories in order.

use std::path::{Component, Path, PathBuf};

use tracing::trace;

/// Resolve `include` as written inside `#include "..."`.
///
/// Returns `None` when no regular file matches; callers pass the directive
/// through untouched in that case.
pub fn resolve_include(
    include: &str,
    current_dir: &Path,
    include_dirs: &[PathBuf],
) -> Option<PathBuf>
{
    std::iter::once(current_dir)
        .chain(
            include_dirs
                .iter()
                .map(PathBuf::as_path),
        )
        .map(|dir| normalize(&dir.join(include)))
        .find(|candidate| {
            trace!(candidate = %candidate.display(), "probing include");
            candidate.is_file()
        })
}

/// Lexically normalize a path: drop `.` and fold `..` into its parent.
///
/// Leading `..` components of a relative path are kept; `..` at the root is
/// dropped, as the filesystem would.
pub fn normalize(path: &Path) -> PathBuf
{
    let mut out = PathBuf::new();

    for comp in path.components()
    {
        match comp
        {
            Component::CurDir =>
            {}
            Component::ParentDir =>
            {
                let last = out
                    .components()
                    .next_back();
                let foldable = matches!(last, Some(Component::Normal(_)));
                let at_root = matches!(last, Some(Component::RootDir | Component::Prefix(_)));

                if foldable
                {
                    out.pop();
                }
                else if !at_root
                {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    if out
        .as_os_str()
        .is_empty()
    {
        out.push(".");
    }

    out
}
