//! Best-effort clipboard delivery.
//!
//! A [`SystemClipboard`] walks an ordered list of backends and stops at the
//! first one that accepts the text. Every backend is allowed to fail; only
//! "nothing worked" is reported to the caller.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("{backend}: {reason}")]
    Backend { backend: String, reason: String },

    #[error("no clipboard backend available (tried: {})", .tried.join(", "))]
    Unavailable { tried: Vec<String> },
}

/// Something that can take a blob of text and put it on a clipboard
pub trait ClipboardSink {
    fn name(&self) -> &str;

    fn copy(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Pipes text into an external program such as `xclip` or `pbcopy`
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn fail(&self, reason: impl Into<String>) -> ClipboardError {
        ClipboardError::Backend { backend: self.program.clone(), reason: reason.into() }
    }
}

impl ClipboardSink for CommandSink {
    fn name(&self) -> &str {
        &self.program
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.fail(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).map_err(|e| self.fail(e.to_string()))?;
            // stdin dropped here so the program sees EOF
        }

        let status = child.wait().map_err(|e| self.fail(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(self.fail(format!("exited with {status}")))
        }
    }
}

/// Native clipboard through `arboard`
#[derive(Debug, Default, Clone, Copy)]
pub struct ArboardSink;

impl ClipboardSink for ArboardSink {
    fn name(&self) -> &str {
        "arboard"
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let fail = |e: arboard::Error| ClipboardError::Backend {
            backend: "arboard".to_string(),
            reason: e.to_string(),
        };

        let mut clipboard = arboard::Clipboard::new().map_err(fail)?;
        clipboard.set_text(text).map_err(fail)
    }
}

/// Ordered chain of clipboard backends
pub struct SystemClipboard {
    sinks: Vec<Box<dyn ClipboardSink>>,
}

impl SystemClipboard {
    pub fn with_sinks(sinks: Vec<Box<dyn ClipboardSink>>) -> Self {
        Self { sinks }
    }

    /// Platform default chain
    pub fn detect() -> Self {
        let mut sinks: Vec<Box<dyn ClipboardSink>> = Vec::new();

        // X11/Wayland selections die with the owning process
        if cfg!(any(target_os = "macos", target_os = "windows")) {
            sinks.push(Box::new(ArboardSink));
        }

        if cfg!(target_os = "macos") {
            sinks.push(Box::new(CommandSink::new("pbcopy", &[])));
        } else if cfg!(target_os = "windows") {
            sinks.push(Box::new(CommandSink::new("clip", &[])));
        } else {
            sinks.push(Box::new(CommandSink::new("xclip", &["-selection", "clipboard"])));
            sinks.push(Box::new(CommandSink::new("xsel", &["--clipboard", "--input"])));
            sinks.push(Box::new(CommandSink::new("wl-copy", &[])));
        }

        Self { sinks }
    }
}

impl ClipboardSink for SystemClipboard {
    fn name(&self) -> &str {
        "system"
    }

    fn copy(&self, text: &str) -> Result<(), ClipboardError> {
        let mut tried = Vec::with_capacity(self.sinks.len());

        for sink in &self.sinks {
            match sink.copy(text) {
                Ok(()) => {
                    debug!(backend = sink.name(), "copied to clipboard");
                    return Ok(());
                }
                Err(err) => {
                    debug!(%err, "clipboard backend failed");
                    tried.push(sink.name().to_string());
                }
            }
        }

        Err(ClipboardError::Unavailable { tried })
    }
}
