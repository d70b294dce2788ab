//! Process-wide configuration, bound once per invocation.

use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::Datelike;

use crate::cgi;
use crate::request::Request;


/// Upload directory used when `UPLOAD_DIR` is unset, relative to the
/// script's working directory.
pub const DEFAULT_UPLOAD_DIR: &str = "../upload";


/// Settings shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    upload_dir: PathBuf,
    reference_year: i32,
}

impl Config {
    /// Creates a [`Config`] storing uploads in `upload_dir`. The reference
    /// year for age calculations defaults to the current UTC year.
    #[must_use]
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self { upload_dir: upload_dir.into(), reference_year: chrono::Utc::now().year() }
    }

    /// Overrides the calendar year ages are counted from.
    #[must_use]
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// Reads the configuration from a request's meta-variables.
    ///
    /// `UPLOAD_DIR` selects the upload directory (default
    /// [`DEFAULT_UPLOAD_DIR`]). A relative directory is resolved against the
    /// current working directory, and `.` and `..` components are removed
    /// from the result. `REFERENCE_YEAR` overrides the year used
    /// by the age calculator; invalid values are ignored with a warning.
    ///
    /// # Errors
    /// Returns an error if a relative directory is given and the current
    /// working directory cannot be determined.
    pub fn from_request(request: &Request) -> io::Result<Self> {
        let dir = match request.get_var(cgi::UPLOAD_DIR.into()) {
            Some(raw) if !raw.is_empty() => path_from_bytes(raw).unwrap_or_else(|| {
                tracing::warn!(value = %String::from_utf8_lossy(raw), "ignoring non-UTF-8 UPLOAD_DIR");
                PathBuf::from(DEFAULT_UPLOAD_DIR)
            }),
            _ => PathBuf::from(DEFAULT_UPLOAD_DIR),
        };
        let dir = if dir.is_absolute() { dir } else { std::env::current_dir()?.join(dir) };
        let mut config = Self::new(normalize(&dir));

        if let Some(raw) = request.get_var_str(cgi::REFERENCE_YEAR.into()) {
            match raw.trim().parse() {
                Ok(year) => config.reference_year = year,
                Err(e) => {
                    let error: &dyn std::error::Error = &e;
                    tracing::warn!(error, value = raw, "ignoring invalid REFERENCE_YEAR");
                },
            }
        }
        tracing::debug!(upload_dir = %config.upload_dir.display(), year = config.reference_year,
            "configuration loaded");
        Ok(config)
    }

    /// Returns the directory uploads are stored in.
    #[inline]
    #[must_use]
    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Returns the calendar year ages are counted from.
    #[inline]
    #[must_use]
    pub fn reference_year(&self) -> i32 {
        self.reference_year
    }
}


#[cfg(unix)]
fn path_from_bytes(raw: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(raw)))
}

#[cfg(not(unix))]
fn path_from_bytes(raw: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(raw).ok().map(PathBuf::from)
}

/// Removes `.` and `..` components without touching the filesystem. `..` at
/// the root stays at the root.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::ParentDir => {
                let last = out.components().next_back();
                if matches!(last, Some(Component::Normal(_))) {
                    out.pop();
                } else if !matches!(last, Some(Component::RootDir | Component::Prefix(_))) {
                    out.push(c);
                }
            },
            _ => out.push(c),
        }
    }
    out
}
