//! Error kinds and the reporting context for recoverable data-quality problems.
//!
//! A bibliography load routinely hits bad data: repeated entry keys, malformed
//! name strings, dangling cross-references. None of these should abort the whole
//! load by default. Every such problem is routed through an [`ErrorReporter`],
//! whose behavior the caller picks up front:
//!
//! - **strict**: the first reported error is returned and the load stops;
//! - **permissive**: the error is logged as a warning, a sticky non-zero status
//!   code is recorded, and processing continues;
//! - **capturing**: errors accumulate in the reporter for later inspection,
//!   nothing is logged or returned.
//!
//! The reporter is an explicit value threaded through fallible operations, so
//! concurrent loads with different policies never interfere.

use thiserror::Error;
use tracing::warn;

/// A recoverable problem found in bibliography data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BibliographyError {
    /// An entry key was seen twice (case-insensitively). The first entry wins.
    #[error("repeated bibliography entry: {0}")]
    DuplicateKey(String),

    /// A person name had more than three comma-separated groups.
    #[error("too many commas in {0:?}")]
    InvalidNameString(String),

    /// An entry cross-references a key that is not in the database.
    #[error("bad cross-reference: entry {key:?} refers to entry {crossref:?} which does not exist")]
    BadCrossref { key: String, crossref: String },
}

/// Exit status recorded by a permissive reporter once any error has been seen.
const ERROR_STATUS: i32 = 2;

/// How reported errors are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Fail on the first reported error.
    #[default]
    Strict,
    /// Warn and continue, remembering that something went wrong.
    Permissive,
}

/// Reporting context passed to every operation that can hit bad data.
#[derive(Debug, Default)]
pub struct ErrorReporter {
    mode: ReportMode,
    captured: Option<Vec<BibliographyError>>,
    status: i32,
}

impl ErrorReporter {
    /// A reporter that fails on the first error.
    #[must_use]
    pub fn strict() -> Self {
        Self::default()
    }

    /// A reporter that warns and continues.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            mode: ReportMode::Permissive,
            ..Self::default()
        }
    }

    /// A reporter that silently accumulates errors for inspection.
    #[must_use]
    pub fn capturing() -> Self {
        Self {
            captured: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// Handle one error according to the reporter's policy.
    ///
    /// # Errors
    ///
    /// Returns the error back to the caller only in strict mode; capturing and
    /// permissive reporters always return `Ok(())`.
    pub fn report(&mut self, error: BibliographyError) -> Result<(), BibliographyError> {
        if let Some(captured) = &mut self.captured {
            captured.push(error);
            return Ok(());
        }
        match self.mode {
            ReportMode::Strict => Err(error),
            ReportMode::Permissive => {
                warn!("{error}");
                self.status = ERROR_STATUS;
                Ok(())
            }
        }
    }

    /// Errors accumulated by a capturing reporter. Empty for other modes.
    #[must_use]
    pub fn captured(&self) -> &[BibliographyError] {
        self.captured.as_deref().unwrap_or(&[])
    }

    /// Exit status: zero until a permissive reporter sees an error.
    #[must_use]
    pub fn status(&self) -> i32 {
        self.status
    }
}
