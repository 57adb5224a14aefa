//! **cptools** - Competitive programming tools
//!
//! Bundles a solution and its local headers into one submittable file,
//! deduplicating system includes and `using namespace std;` along the way.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core processing pipeline
pub mod core {
    /// Recursive include expansion, dedup and delivery
    pub mod bundle;
    pub use bundle::run as bundle_run;
}

/// Subcommand handlers that are mostly UI
pub mod cli_ext {
    /// `cptools config` (path, show, init, edit)
    pub mod config_cmd;
}

/// Infrastructure - Configuration, I/O, and the clipboard
pub mod infra {
    /// JSON config with defaults, file and environment layers
    pub mod config;
    pub use config::{Config, load_config};

    /// Source file reading and writing
    pub mod io;
    pub use io::{read_text, write_text};

    /// Clipboard backends with an ordered fallback chain
    pub mod clipboard;
    pub use clipboard::{ClipboardSink, SystemClipboard};
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use crate::core::bundle::{Bundle, BundleError, bundle_file};
pub use crate::core::bundle_run;
pub use infra::{Config, load_config};
