//! Print host backed by the desktop's default browser
//!
//! The print document is written next to the other outputs and opened with
//! the platform opener; the document's own script starts the print dialog.
//! There is no way to observe the dialog from here, so the print future
//! never resolves and the exporter's fallback delay closes the window.

use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};

use futures::future::{self, BoxFuture, FutureExt};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use super::{PrintHost, PrintWindow};
use crate::{Error, Result};

fn default_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

#[derive(Debug, Clone)]
pub struct SystemPrintHost {
    output_dir: PathBuf,
    command: Option<String>,
}

impl SystemPrintHost {
    pub fn new(output_dir: PathBuf, command: Option<String>) -> Self {
        Self { output_dir, command }
    }

    fn opener(&self) -> &str {
        self.command.as_deref().unwrap_or(default_opener())
    }
}

/// Wait for the opener on a blocking thread so it does not linger as a zombie
fn reap(mut child: Child) -> JoinHandle<std::io::Result<ExitStatus>> {
    tokio::task::spawn_blocking(move || {
        let status = child.wait();
        if let Err(e) = &status {
            warn!("waiting for opener (pid {}) failed: {}", child.id(), e);
        }
        status
    })
}

impl PrintHost for SystemPrintHost {
    fn open_window<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Box<dyn PrintWindow>>> {
        async move {
            std::fs::create_dir_all(&self.output_dir).map_err(|e| {
                Error::ExportEnvironmentUnavailable(format!(
                    "cannot use {}: {}",
                    self.output_dir.display(),
                    e
                ))
            })?;
            let path = self.output_dir.join(format!("{}.html", name));
            Ok(Box::new(SystemWindow { path, opener: self.opener().to_string() })
                as Box<dyn PrintWindow>)
        }
        .boxed()
    }
}

struct SystemWindow {
    path: PathBuf,
    opener: String,
}

impl PrintWindow for SystemWindow {
    fn write_document<'a>(&'a mut self, html: &'a str) -> BoxFuture<'a, Result<()>> {
        let res = std::fs::write(&self.path, html).map_err(Error::from);
        future::ready(res).boxed()
    }

    fn print(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        let spawned = Command::new(&self.opener)
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                info!("opened {} with {} (pid {})", self.path.display(), self.opener, child.id());
                drop(reap(child));
                future::pending().boxed()
            }
            Err(e) => future::ready(Err(Error::ExportEnvironmentUnavailable(format!(
                "failed to launch '{}': {}",
                self.opener, e
            ))))
            .boxed(),
        }
    }

    fn close(&mut self) -> BoxFuture<'_, Result<()>> {
        // The document stays on disk as the "Save as PDF" source.
        debug!("print window for {} closed", self.path.display());
        future::ready(Ok(())).boxed()
    }

    fn signals_completion(&self) -> bool {
        false
    }
}
