//! Bundle a solution by expanding local `#include "..."` directives into one
//! self-contained file ready for submission.

pub mod directive;
pub mod expand;
pub mod resolve;

pub use expand::{ExpansionState, Expander};
pub use resolve::resolve_include;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::{AppContext, BundleArgs};
use crate::infra::clipboard::{ClipboardSink, SystemClipboard};
use crate::infra::config::load_config_or_default;
use crate::infra::io::write_text;

#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("{} not found", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("failed to resolve {}: {source}", path.display())]
    Canonicalize { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Result of bundling one root file
#[derive(Debug)]
pub struct Bundle {
    /// Normalised output text, newline-terminated
    pub text: String,
    /// Canonical paths of every file expanded, root first
    pub files: Vec<PathBuf>,
}

/// Where the bundled text goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    File(PathBuf),
    InPlace(PathBuf),
    Stdout,
    /// Clipboard, falling back to stdout
    Clipboard,
}

/// Which sink actually received the text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivered {
    File(PathBuf),
    Clipboard,
    Stdout { clipboard_failed: bool },
    DryRun,
}

/// `A`, `A.cpp` -> `<cwd>/A.cpp`
pub fn source_path(cwd: &Path, problem: &str) -> PathBuf {
    let stem = problem.strip_suffix(".cpp").unwrap_or(problem);
    cwd.join(format!("{stem}.cpp"))
}

/// Expand `root` into a single normalised text.
///
/// Any filesystem error aborts the whole bundle; a half-expanded file is
/// worse than none.
pub fn bundle_file(root: &Path, include_dirs: &[PathBuf]) -> Result<Bundle, BundleError> {
    if !root.exists() {
        return Err(BundleError::SourceNotFound { path: root.to_path_buf() });
    }

    let mut expander = Expander::new(include_dirs);
    let lines = expander.expand_root(root)?;
    let state = expander.into_state();

    let mut joined = lines.join("\n");
    joined.push('\n');

    Ok(Bundle {
        text: collapse_blank_runs(&joined),
        files: state.visited().map(Path::to_path_buf).collect(),
    })
}

/// Collapse every run of three or more newlines to exactly two
pub fn collapse_blank_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                out.push(c);
            }
        } else {
            run = 0;
            out.push(c);
        }
    }

    out
}

/// Send `text` to `dest`. Clipboard failure degrades to stdout with a warning.
pub fn deliver(
    text: &str,
    dest: &Destination,
    clipboard: &dyn ClipboardSink,
    ctx: &AppContext,
) -> Result<Delivered, BundleError> {
    if ctx.dry_run {
        return Ok(Delivered::DryRun);
    }

    match dest {
        Destination::File(path) | Destination::InPlace(path) => {
            write_text(path, text)
                .map_err(|source| BundleError::Write { path: path.clone(), source })?;
            Ok(Delivered::File(path.clone()))
        }
        Destination::Stdout => {
            print!("{text}");
            Ok(Delivered::Stdout { clipboard_failed: false })
        }
        Destination::Clipboard => match clipboard.copy(text) {
            Ok(()) => Ok(Delivered::Clipboard),
            Err(err) => {
                debug!(%err, "clipboard unavailable; printing to stdout");
                print!("{text}");
                Ok(Delivered::Stdout { clipboard_failed: true })
            }
        },
    }
}

fn destination(args: &BundleArgs, source: &Path) -> Destination {
    if let Some(out) = &args.output {
        Destination::File(out.clone())
    } else if args.in_place {
        Destination::InPlace(source.to_path_buf())
    } else if args.stdout {
        Destination::Stdout
    } else {
        Destination::Clipboard
    }
}

pub fn run(args: BundleArgs, ctx: &AppContext) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let source = source_path(&cwd, &args.problem);
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.problem.clone());

    let include_dirs = load_config_or_default().include_dirs();
    let bundle = bundle_file(&source, &include_dirs)?;
    info!(files = bundle.files.len(), bytes = bundle.text.len(), "bundled {name}");

    let dest = destination(&args, &source);
    let delivered = deliver(&bundle.text, &dest, &SystemClipboard::detect(), ctx)?;

    match delivered {
        Delivered::DryRun => {
            let target = match &dest {
                Destination::File(p) | Destination::InPlace(p) => p.display().to_string(),
                Destination::Stdout => "stdout".to_string(),
                Destination::Clipboard => "clipboard".to_string(),
            };
            ctx.note(&format!(
                "DRY RUN: Would write {} bytes ({} files) to {target}",
                bundle.text.len(),
                bundle.files.len()
            ));
        }
        Delivered::File(path) if matches!(dest, Destination::InPlace(_)) => {
            info!(path = %path.display(), "bundled in place");
            ctx.success(&format!("Bundled in-place: {name}"));
        }
        Delivered::File(path) => {
            ctx.success(&format!("Bundled to {}", path.display()));
        }
        Delivered::Clipboard => {
            ctx.success(&format!(
                "Bundled and copied to clipboard ({} files)",
                bundle.files.len()
            ));
        }
        Delivered::Stdout { clipboard_failed: true } => {
            ctx.warn("Could not copy to clipboard (install xclip, xsel or wl-copy).");
        }
        Delivered::Stdout { clipboard_failed: false } => {}
    }

    Ok(())
}
