//! Export strategies and the export state machine
//!
//! Both strategies sit behind [`ExportStrategy`]; which one is used is a
//! configuration choice ([`crate::StrategyKind`]). The [`ExportController`]
//! owns the `Idle -> Exporting -> (Idle | Error)` state machine shared by
//! both, including the cancellable timer that clears the error banner.

#[cfg(feature = "raster")]
pub mod pdf;
pub mod print;
pub mod timer;

use std::time::Duration;

use futures::future::BoxFuture;
use log::{debug, info};
use serde::Serialize;

use crate::preview::RenderTarget;
use crate::{Error, Result, StrategyKind};
use timer::Scheduled;

/// Banner shown when the print window cannot be opened
pub const ENVIRONMENT_MESSAGE: &str = "Unable to open print window. Please check your browser settings.";
/// Banner shown for every other export failure
pub const FAILURE_MESSAGE: &str = "There was an error generating the PDF. Please try again.";

/// A produced document offered for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Result of a finished export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub strategy: StrategyKind,
    /// `None` when the document was handed to a print flow that saves it itself
    pub artifact: Option<Artifact>,
}

/// Turns a rendered certificate into a document
pub trait ExportStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Export the element described by `target`.
    ///
    /// A rejected future means no file was produced.
    fn export<'a>(&'a self, target: &'a RenderTarget) -> BoxFuture<'a, Result<ExportOutcome>>;
}

/// Export state as seen by the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum ExportState {
    Idle,
    Exporting,
    /// Transient; reverts to `Idle` after the reset delay
    Error(String),
}

/// Banner text for a failed export
pub fn banner_for(err: &Error) -> String {
    match err {
        Error::ExportEnvironmentUnavailable(_) => ENVIRONMENT_MESSAGE.to_string(),
        _ => FAILURE_MESSAGE.to_string(),
    }
}

/// The `Idle -> Exporting -> (Idle | Error)` state machine.
///
/// Every export attempt gets a generation number; completions and timer
/// expiries carrying an older generation are ignored.
#[derive(Debug)]
pub struct ExportController {
    state: ExportState,
    generation: u64,
    reset_delay: Duration,
    reset: Option<Scheduled>,
}

impl ExportController {
    pub fn new(reset_delay: Duration) -> Self {
        Self {
            state: ExportState::Idle,
            generation: 0,
            reset_delay,
            reset: None,
        }
    }

    pub fn state(&self) -> &ExportState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// Try to enter `Exporting`. `missing` are the empty required fields.
    ///
    /// Rejections leave the state untouched.
    pub fn begin(&mut self, missing: Vec<crate::Field>) -> Result<u64> {
        if !missing.is_empty() {
            debug!("export rejected: record incomplete");
            return Err(Error::ValidationIncomplete(missing));
        }
        if self.state == ExportState::Exporting {
            debug!("export rejected: already exporting");
            return Err(Error::ExportInProgress);
        }
        if let Some(stale) = self.reset.take() {
            stale.cancel();
        }
        self.generation += 1;
        self.state = ExportState::Exporting;
        info!("export #{} started", self.generation);
        Ok(self.generation)
    }

    /// Record the end of export `generation`.
    ///
    /// Returns `true` when the controller entered `Error` and the caller
    /// should arm the reset timer with [`arm_reset`](Self::arm_reset).
    pub fn finish(&mut self, generation: u64, result: std::result::Result<(), String>) -> bool {
        if generation != self.generation || self.state != ExportState::Exporting {
            debug!("ignoring stale completion of export #{}", generation);
            return false;
        }
        match result {
            Ok(()) => {
                info!("export #{} finished", generation);
                self.state = ExportState::Idle;
                false
            }
            Err(banner) => {
                self.state = ExportState::Error(banner);
                true
            }
        }
    }

    pub fn arm_reset(&mut self, scheduled: Scheduled) {
        self.reset = Some(scheduled);
    }

    /// Timer callback for export `generation`: `Error -> Idle`
    pub fn expire(&mut self, generation: u64) {
        if generation == self.generation && matches!(self.state, ExportState::Error(_)) {
            debug!("clearing error banner of export #{}", generation);
            self.state = ExportState::Idle;
            self.reset = None;
        }
    }
}
