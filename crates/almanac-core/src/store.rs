//! Persisted calendar store.
//!
//! One iCalendar file is the sole source of truth. Every operation in the
//! system reloads it, mutates the in-memory [`Calendar`], and rewrites the
//! whole document as its final step; nothing is cached across calls and no
//! partial write is ever exposed.
//!
//! A document that fails to decode is recovered, not surfaced: [`CalendarStore::load`]
//! logs a warning and synthesizes a fresh empty calendar, and the broken
//! file is simply overwritten on the next save.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::Config;
use crate::ics::{parse_calendar, write_calendar, ParseError};
use crate::model::calendar::Calendar;

/// Name of the project-local calendar file.
pub const LOCAL_FILE: &str = "almanac.ics";

/// Errors surfaced by the store. Decode failures of the persisted document
/// are deliberately absent: they are recovered in [`CalendarStore::load`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the document failed.
    #[error("calendar file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// An uploaded replacement document does not parse; nothing was written.
    #[error("uploaded document is not a valid calendar: {0}")]
    InvalidUpload(#[source] ParseError),
}

/// Handle on the persisted calendar document.
#[derive(Debug, Clone)]
pub struct CalendarStore {
    path: PathBuf,
}

impl CalendarStore {
    /// Open a store at an explicit path. The file need not exist yet.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolve the calendar path and open a store there.
    ///
    /// Precedence: explicit override, then the `ALMANAC_CALENDAR` env var,
    /// then the config file value, then `./almanac.ics` when present, then
    /// a per-user data directory fallback (created on demand).
    ///
    /// # Errors
    ///
    /// Returns an error only when the fallback directory cannot be created.
    pub fn resolve(explicit: Option<PathBuf>, config: &Config) -> Result<Self, StoreError> {
        if let Some(path) = explicit {
            return Ok(Self::open(path));
        }
        if let Some(path) = std::env::var_os("ALMANAC_CALENDAR") {
            return Ok(Self::open(PathBuf::from(path)));
        }
        if let Some(path) = &config.calendar {
            return Ok(Self::open(path.clone()));
        }
        let local = PathBuf::from(LOCAL_FILE);
        if local.exists() {
            return Ok(Self::open(local));
        }
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        let dir = base.join("almanac");
        std::fs::create_dir_all(&dir)?;
        Ok(Self::open(dir.join("calendar.ics")))
    }

    /// The path this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted calendar.
    ///
    /// A missing file yields an empty calendar. A file that fails to decode
    /// also yields an empty calendar (with a `warn!`): the store never fails
    /// a caller over a malformed document.
    ///
    /// # Errors
    ///
    /// Only I/O failures other than "not found" propagate.
    pub fn load(&self) -> Result<Calendar, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no calendar file yet, starting empty");
                return Ok(Calendar::default());
            }
            Err(err) => return Err(StoreError::Io(err)),
        };
        match parse_calendar(&text) {
            Ok(calendar) => Ok(calendar),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "calendar file is malformed, starting from an empty calendar"
                );
                Ok(Calendar::default())
            }
        }
    }

    /// Serialize `calendar` and replace the persisted document.
    ///
    /// This is the only state-changing boundary, and it is always the last
    /// step of an operation.
    ///
    /// # Errors
    ///
    /// I/O failures propagate; the previously saved document stays intact
    /// when nothing was written.
    pub fn save(&self, calendar: &Calendar) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, write_calendar(calendar))?;
        debug!(path = %self.path.display(), events = calendar.events.len(), "calendar saved");
        Ok(())
    }

    /// Replace the whole document with externally supplied text, verbatim.
    ///
    /// The text is parse-validated first; on failure the existing document
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidUpload`] when `raw` does not parse as a
    /// calendar; otherwise I/O failures.
    pub fn replace_raw(&self, raw: &str) -> Result<(), StoreError> {
        parse_calendar(raw).map_err(StoreError::InvalidUpload)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    /// The persisted document text, verbatim; empty string if absent.
    ///
    /// # Errors
    ///
    /// I/O failures other than "not found" propagate.
    pub fn read_raw(&self) -> Result<String, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}
