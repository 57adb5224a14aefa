//! Shell completion scripts for `cptools`.

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{Generator, Shell as CompletionShell, generate};
use std::io::Write;
use std::path::PathBuf;
use std::{fs, io};

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};

const BIN_NAME: &str = "cptools";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Completion script for `shell`, covering `bundle`, `config` and their flags
pub fn render(shell: CompletionShell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buf);
    buf
}

/// Where the script lands inside `dir`, e.g. `cptools.bash`, `_cptools`
pub fn script_path(shell: CompletionShell, dir: &std::path::Path) -> PathBuf {
    dir.join(shell.file_name(BIN_NAME))
}

pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    let shell: CompletionShell = args.shell.into();
    let script = render(shell);

    if args.stdout {
        io::stdout()
            .lock()
            .write_all(&script)
            .context("write completion script to stdout")?;
        return Ok(());
    }

    let dir = args.out_dir.ok_or_else(|| {
        anyhow::anyhow!("--out-dir is required unless --stdout is set (try `{BIN_NAME} completions {shell} --stdout`)")
    })?;
    let path = script_path(shell, &dir);

    if ctx.dry_run {
        ctx.note(&format!(
            "DRY RUN: Would write {shell} completion ({} bytes) to {}",
            script.len(),
            path.display()
        ));
        return Ok(());
    }

    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    fs::write(&path, &script).with_context(|| format!("write {}", path.display()))?;

    ctx.success(&format!("Wrote {shell} completion to {}", path.display()));
    Ok(())
}
