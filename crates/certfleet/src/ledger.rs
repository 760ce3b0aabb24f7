//! Local record of certificate ids registered by this tool.
//!
//! The ledger is a plain text file with one registry id per line. Deploy
//! appends to it one line at a time, so a crash mid-batch leaves a prefix of
//! the batch recorded. Cleanup backs it up, then rewrites it with whatever
//! could not be removed.

use certfleet_core::{FleetError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::error;

/// Default directory holding the ledger
pub const DEFAULT_LEDGER_DIR: &str = "certs_data";

/// Ledger file name
pub const LEDGER_FILE: &str = "cert_ids.txt";

/// Backup file name, written before cleanup
pub const BACKUP_FILE: &str = "cert_ids.txt.bak";

/// Ledger of registered certificate ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    dir: PathBuf,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::in_dir(DEFAULT_LEDGER_DIR)
    }
}

impl Ledger {
    /// A ledger stored in `dir`. Nothing is created until the first write.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the ledger and its backup
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the ledger file
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    /// Path of the backup file
    #[must_use]
    pub fn backup_path(&self) -> PathBuf {
        self.dir.join(BACKUP_FILE)
    }

    /// Whether the ledger file exists
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path().is_file()
    }

    /// Open the ledger for appending, creating the directory and file if needed
    pub fn open_writer(&self) -> Result<LedgerWriter> {
        fs::create_dir_all(&self.dir).map_err(|e| io_failure("create", &self.dir, e))?;

        let path = self.path();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| io_failure("open", &path, e))?;

        Ok(LedgerWriter { file, path })
    }

    /// Read every recorded id in order, skipping blank lines.
    ///
    /// Returns `None` when there is no ledger file.
    pub fn read(&self) -> Result<Option<Vec<String>>> {
        let path = self.path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_failure("read", &path, e)),
        };

        Ok(Some(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        ))
    }

    /// Copy the ledger to its backup file, replacing any older backup
    pub fn backup(&self) -> Result<PathBuf> {
        let backup = self.backup_path();
        fs::copy(self.path(), &backup).map_err(|e| io_failure("back up", &backup, e))?;
        Ok(backup)
    }

    /// Replace the ledger contents with `ids`
    pub fn rewrite(&self, ids: &[String]) -> Result<()> {
        let path = self.path();
        let mut contents = ids.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(&path, contents).map_err(|e| io_failure("rewrite", &path, e))
    }

    /// Delete the ledger file. The backup is kept.
    pub fn remove(&self) -> Result<()> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_failure("remove", &path, e)),
        }
    }
}

/// Append handle on the ledger. Every record is flushed before returning.
#[derive(Debug)]
pub struct LedgerWriter {
    file: File,
    path: PathBuf,
}

impl LedgerWriter {
    /// Append one id
    pub fn record(&mut self, certificate_id: &str) -> Result<()> {
        writeln!(self.file, "{certificate_id}")
            .and_then(|()| self.file.flush())
            .map_err(|e| io_failure("append to", &self.path, e))
    }
}

fn io_failure(action: &str, path: &Path, err: io::Error) -> FleetError {
    error!(path = %path.display(), "failed to {action} ledger: {err}");
    FleetError::Io(err)
}
