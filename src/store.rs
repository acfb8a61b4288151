//! File-backed ledger store.
//!
//! The whole ledger lives in one JSON object keyed by user id. Every read loads
//! the full snapshot; every write replaces it. Writes go through a temporary
//! file that is renamed over the ledger, so a failed write never leaves a
//! partial snapshot behind.

use crate::error::{Error, Result};
use crate::types::{LedgerEntry, UserId};
use fs2::FileExt;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Full ledger contents, keyed by user id.
pub type LedgerSnapshot = BTreeMap<UserId, LedgerEntry>;

/// Default ledger file name.
pub const DEFAULT_STATS_FILE: &str = "gem_stats.json";

/// Indentation used for the persisted JSON.
const JSON_INDENT: &[u8] = b"    ";

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path of the ledger JSON file.
    pub path: PathBuf,

    /// Whether to create missing parent directories on open.
    pub create_dirs: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STATS_FILE),
            create_dirs: true,
        }
    }
}

impl StoreConfig {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// Durable mapping of user id to gems given.
///
/// `adjust` is a single critical section: read the snapshot, check the new
/// balance, write the snapshot. Concurrent adjusts on any users serialize
/// through it.
pub struct LedgerStore {
    path: PathBuf,

    /// Lock file for exclusive access across processes.
    _lock_file: File,

    /// Single-writer guard for read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl LedgerStore {
    /// Open the ledger at `config.path`. A missing file is an empty ledger.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if config.create_dirs {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let lock_file = Self::acquire_lock(&config.path)?;
        debug!(path = %config.path.display(), "opened gem ledger");

        Ok(Self {
            path: config.path,
            _lock_file: lock_file,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current entry for `user`, or a zero entry if unseen. Never writes.
    pub fn get(&self, user: &UserId) -> Result<LedgerEntry> {
        let snapshot = self.load_snapshot()?;
        Ok(snapshot.get(user).cloned().unwrap_or_default())
    }

    /// Apply `delta` to `user`'s total and persist. Returns the new total.
    ///
    /// Fails with `InsufficientBalance` if a removal would drive the total
    /// negative, and with `TotalOverflow` if an addition would exceed `i64`.
    /// The ledger is left untouched in both cases.
    pub fn adjust(&self, user: &UserId, delta: i64) -> Result<i64> {
        let new_total = self
            .update(|snapshot| {
                let entry = snapshot.entry(user.clone()).or_default();
                let current = entry.gems_given;

                let total = current.checked_add(delta).ok_or_else(|| Error::TotalOverflow {
                    user: user.clone(),
                    delta,
                    current,
                })?;
                if total < 0 {
                    return Err(Error::InsufficientBalance {
                        user: user.clone(),
                        requested: delta.saturating_neg(),
                        available: current,
                    });
                }

                entry.gems_given = total;
                Ok(total)
            })
            .map_err(|e| {
                if e.is_operational() {
                    error!(user = %user, delta, error = %e, "failed to persist gem ledger");
                }
                e
            })?;

        info!(user = %user, delta, new_total, "adjusted gem total");
        Ok(new_total)
    }

    /// Read-modify-write the whole ledger under the write lock.
    ///
    /// The snapshot is persisted only if `f` returns `Ok`.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut LedgerSnapshot) -> Result<T>,
    {
        let _lock = self.write_lock.lock();

        let mut snapshot = self.load_snapshot()?;
        let value = f(&mut snapshot)?;
        self.write_snapshot(&snapshot)?;

        Ok(value)
    }

    /// Read the full ledger from disk.
    pub fn load_snapshot(&self) -> Result<LedgerSnapshot> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LedgerSnapshot::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(LedgerSnapshot::new());
        }

        let snapshot: LedgerSnapshot = serde_json::from_slice(&bytes)?;
        debug!(users = snapshot.len(), "loaded gem ledger");
        Ok(snapshot)
    }

    /// Replace the ledger on disk with `snapshot`.
    ///
    /// Serialized with `adjust` and `update`, so it never interleaves with a
    /// read-modify-write in progress.
    pub fn save_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let _lock = self.write_lock.lock();
        self.write_snapshot(snapshot)
    }

    /// Write `snapshot` through a temp file. Caller holds `write_lock`.
    fn write_snapshot(&self, snapshot: &LedgerSnapshot) -> Result<()> {
        let mut encoded = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut encoded, formatter);
        snapshot.serialize(&mut ser)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&encoded)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::from(e.error))?;

        debug!(users = snapshot.len(), bytes = encoded.len(), "saved gem ledger");
        Ok(())
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");
        let lock_file = File::create(PathBuf::from(lock_name))?;

        lock_file.try_lock_exclusive().map_err(|_| Error::Locked)?;

        Ok(lock_file)
    }
}
