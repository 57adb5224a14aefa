//! CLI command handlers for `cptools config`.
//!
//! Prints, initialises and opens the JSON config file. Editor choice follows
//! an explicit `--editor`, then `$EDITOR`, then the first of nano, vim, vi
//! and emacs found on `PATH`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use tracing::{debug, info};

use crate::cli::{AppContext, ConfigArgs, ConfigCommand, ConfigInitArgs};
use crate::infra::config::{config_path, ensure_config, load_config, write_defaults};

const FALLBACK_EDITORS: [&str; 4] = ["nano", "vim", "vi", "emacs"];

/// An editor command plus whether it deserves the vim cheat sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorChoice
{
    pub command: String,
    pub vim_like: bool,
}

impl EditorChoice
{
    fn new(command: &str) -> Self
    {
        Self {
            command: command.to_string(),
            vim_like: is_vim_like(command),
        }
    }
}

pub fn run(
    args: ConfigArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let path = config_path();

    match args.command
    {
        Some(ConfigCommand::Path) =>
        {
            println!("{}", path.display());
            Ok(())
        }
        Some(ConfigCommand::Show) => show(),
        Some(ConfigCommand::Init(init_args)) => init(&path, init_args, ctx),
        Some(ConfigCommand::Edit(edit)) => open_in_editor(&path, edit.editor.as_deref(), ctx),
        None => open_in_editor(&path, args.editor.as_deref(), ctx),
    }
}

fn show() -> Result<()>
{
    let cfg = load_config()?;
    let json = serde_json::to_string_pretty(&cfg).context("Failed to serialize configuration")?;
    println!("{json}");
    Ok(())
}

fn init(
    path: &Path,
    args: ConfigInitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    if path.exists() && !args.force
    {
        bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if ctx.dry_run
    {
        ctx.note(&format!("DRY RUN: Would write default config to {}", path.display()));
        return Ok(());
    }

    write_defaults(path)?;
    ctx.success(&format!("Created config file at {}", path.display()));
    Ok(())
}

fn open_in_editor(
    path: &Path,
    explicit: Option<&str>,
    ctx: &AppContext,
) -> Result<()>
{
    let editor = match explicit
    {
        Some(cmd) => EditorChoice::new(cmd),
        None => find_editor(std::env::var("EDITOR").ok().as_deref(), &search_path()),
    };

    if ctx.dry_run
    {
        ctx.note(&format!(
            "DRY RUN: Would open {} with {}",
            path.display(),
            editor.command
        ));
        return Ok(());
    }

    if ensure_config(path)?
    {
        info!(path = %path.display(), "created default config");
    }

    ctx.note(&format!("Opening config: {}", path.display()));
    ctx.note(&format!("Editor: {}", editor.command));

    if editor.vim_like && !ctx.quiet
    {
        print_vim_help(ctx);
    }

    let mut words = editor
        .command
        .split_whitespace();
    let program = words
        .next()
        .unwrap_or("vi");

    let status = Command::new(program)
        .args(words)
        .arg(path)
        .status()
        .with_context(|| {
            format!(
                "Editor '{}' not found. Install nano, vim or emacs, or set $EDITOR.",
                editor.command
            )
        })?;

    debug!(%status, "editor exited");
    Ok(())
}

/// Pick an editor: `$EDITOR` when it is on `search`, else the first fallback
/// found there, else plain `vi`.
pub fn find_editor(
    env_editor: Option<&str>,
    search: &[PathBuf],
) -> EditorChoice
{
    if let Some(cmd) = env_editor.filter(|c| !c.trim().is_empty())
    {
        if is_on_path(cmd, search)
        {
            return EditorChoice::new(cmd);
        }
        debug!(editor = cmd, "$EDITOR not found on PATH");
    }

    FALLBACK_EDITORS
        .iter()
        .find(|cmd| is_on_path(cmd, search))
        .map(|cmd| EditorChoice::new(cmd))
        .unwrap_or_else(|| EditorChoice::new("vi"))
}

fn search_path() -> Vec<PathBuf>
{
    std::env::var_os("PATH")
        .map(|p| std::env::split_paths(&p).collect())
        .unwrap_or_default()
}

/// `$EDITOR` may carry arguments (`code --wait`); only the program is checked
fn is_on_path(
    cmd: &str,
    search: &[PathBuf],
) -> bool
{
    let program = cmd
        .split_whitespace()
        .next()
        .unwrap_or(cmd);

    let as_path = Path::new(program);
    if as_path.components().count() > 1
    {
        return as_path.is_file();
    }

    search.iter().any(|dir| {
        let candidate = dir.join(program);
        candidate.is_file()
            || (cfg!(windows) && candidate.with_extension(OsStr::new("exe")).is_file())
    })
}

fn is_vim_like(cmd: &str) -> bool
{
    let program = Path::new(
        cmd.split_whitespace()
            .next()
            .unwrap_or(cmd),
    )
    .file_name()
    .map(|n| n.to_string_lossy().to_lowercase())
    .unwrap_or_default();

    matches!(program.as_str(), "vi" | "vim" | "nvim" | "gvim" | "view")
}

fn print_vim_help(ctx: &AppContext)
{
    let rows = [
        ("i", "Enter insert mode (start editing)"),
        ("Esc", "Exit insert mode (back to normal mode)"),
        (":w", "Save file"),
        (":q", "Quit"),
        (":wq", "Save and quit"),
        (":q!", "Quit without saving"),
    ];

    eprintln!();
    if ctx.no_color
    {
        eprintln!("Vim Quick Start:");
    }
    else
    {
        eprintln!("{}", "Vim Quick Start:".bold());
    }
    for (key, what) in rows
    {
        if ctx.no_color
        {
            eprintln!("{key:<10} - {what}");
        }
        else
        {
            eprintln!("{:<10} - {what}", key.bold());
        }
    }
    eprintln!();
}
