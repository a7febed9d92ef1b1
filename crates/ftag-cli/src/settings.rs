//! Resolved runtime settings.
//!
//! Clap already layers `--file` over `FTAG_FILE` over the default; this is the
//! value the command functions receive instead of reaching back into `Cli`.

use std::path::PathBuf;

use crate::Cli;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Sidecar file holding the tag index.
    pub index_path: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            index_path: cli.file.clone(),
        }
    }
}
