//! # afreken-ledger
//!
//! Append-only revision ledger for composed settlements.
//!
//! A booking can be settled more than once (corrections, late damage
//! reports). Every settlement for a key is kept; versions within a key
//! are assigned strictly increasing from 1 at append time, and the
//! "current" settlement is simply the one with the highest version.
//! Nothing is ever updated or deleted in place.

pub mod error;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use afreken_core::{BookingKey, Settlement};

pub use error::{LedgerError, LedgerErrorCode, LedgerResult};

// ==================== Repository interface ====================

/// Storage interface for settlement revisions.
///
/// `append` owns version assignment: callers hand in a settlement with
/// version 0 and get the assigned revision number back. Reads never
/// change state.
pub trait SettlementRepository {
    /// Append a new revision for the settlement's booking key and
    /// return the version it was assigned.
    fn append(&self, settlement: Settlement) -> LedgerResult<u32>;

    /// The highest-version settlement for a key, if any.
    fn current_for(&self, key: &BookingKey) -> LedgerResult<Option<Settlement>>;

    /// Every revision for a key, oldest first.
    fn history_for(&self, key: &BookingKey) -> LedgerResult<Vec<Settlement>>;
}

type Entries = HashMap<BookingKey, Vec<Settlement>>;

fn next_version(history: &[Settlement]) -> u32 {
    history.iter().map(|s| s.version).max().unwrap_or(0) + 1
}

// ==================== In-memory ledger ====================

/// Ledger held entirely in memory. Used in tests and for dry runs.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<Entries>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Entries>> {
        self.entries.lock().map_err(|_| LedgerError::LockPoisoned)
    }
}

impl SettlementRepository for MemoryLedger {
    fn append(&self, mut settlement: Settlement) -> LedgerResult<u32> {
        let mut entries = self.lock()?;
        let history = entries.entry(settlement.key.clone()).or_default();
        let version = next_version(history);
        settlement.version = version;
        history.push(settlement);
        Ok(version)
    }

    fn current_for(&self, key: &BookingKey) -> LedgerResult<Option<Settlement>> {
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .and_then(|history| history.iter().max_by_key(|s| s.version))
            .cloned())
    }

    fn history_for(&self, key: &BookingKey) -> LedgerResult<Vec<Settlement>> {
        let entries = self.lock()?;
        let mut history = entries.get(key).cloned().unwrap_or_default();
        history.sort_by_key(|s| s.version);
        Ok(history)
    }
}

// ==================== JSON file ledger ====================

/// Ledger persisted as one JSON array of settlements.
///
/// Version assignment must hold across runs, not just within one
/// process, so `append` re-reads the file under its lock before
/// computing the next version and rewrites it through a temp file and
/// rename. Fine for the batch sizes this runs at; the repository
/// trait is the seam for anything heavier.
#[derive(Debug)]
pub struct JsonFileLedger {
    path: PathBuf,
    entries: Mutex<Entries>,
}

fn load_entries(path: &Path) -> LedgerResult<Entries> {
    let mut entries = Entries::new();
    if path.exists() {
        let raw = fs::read_to_string(path)?;
        let settlements: Vec<Settlement> =
            serde_json::from_str(&raw).map_err(|e| LedgerError::CorruptLedger {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        for settlement in settlements {
            entries
                .entry(settlement.key.clone())
                .or_default()
                .push(settlement);
        }
    }
    Ok(entries)
}

impl JsonFileLedger {
    /// Open a ledger file, creating an empty ledger if the file does
    /// not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = load_entries(&path)?;
        if !entries.is_empty() {
            log::info!(
                "Loaded revision ledger from {} ({} bookings)",
                path.display(),
                entries.len()
            );
        }

        Ok(JsonFileLedger {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn lock(&self) -> LedgerResult<MutexGuard<'_, Entries>> {
        self.entries.lock().map_err(|_| LedgerError::LockPoisoned)
    }

    fn persist(&self, entries: &Entries) -> LedgerResult<()> {
        let mut all: Vec<&Settlement> = entries.values().flatten().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key).then(a.version.cmp(&b.version)));

        let json = serde_json::to_string_pretty(&all).map_err(|e| LedgerError::StorageError {
            message: e.to_string(),
        })?;

        // Rewrite through a temp file so readers never see a
        // half-written ledger.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettlementRepository for JsonFileLedger {
    fn append(&self, mut settlement: Settlement) -> LedgerResult<u32> {
        let mut entries = self.lock()?;
        // Another handle or run may have appended since this ledger
        // last touched the file; the next version is computed from
        // what is on disk now, not from a stale snapshot.
        *entries = load_entries(&self.path)?;

        let version = next_version(entries.get(&settlement.key).map_or(&[][..], Vec::as_slice));
        settlement.version = version;
        entries
            .entry(settlement.key.clone())
            .or_default()
            .push(settlement);
        self.persist(&entries)?;
        Ok(version)
    }

    fn current_for(&self, key: &BookingKey) -> LedgerResult<Option<Settlement>> {
        let entries = self.lock()?;
        Ok(entries
            .get(key)
            .and_then(|history| history.iter().max_by_key(|s| s.version))
            .cloned())
    }

    fn history_for(&self, key: &BookingKey) -> LedgerResult<Vec<Settlement>> {
        let entries = self.lock()?;
        let mut history = entries.get(key).cloned().unwrap_or_default();
        history.sort_by_key(|s| s.version);
        Ok(history)
    }
}

// ==================== Tests ====================
