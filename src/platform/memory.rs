//! In-process print host with scriptable behavior, for tests and dry runs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};

use super::{PrintHost, PrintWindow};
use crate::{Error, Result};

/// How the in-memory print flow behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintBehavior {
    /// Printing completes immediately
    Completes,
    /// The print flow never signals completion
    NeverSignals,
    /// No window can be opened (popup blocked)
    Blocked,
    /// Printing signals completion after the delay and hands back a PDF
    Saves(Duration),
}

/// Everything that happened on the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintLog {
    pub opened: Vec<String>,
    pub documents: Vec<String>,
    pub printed: usize,
    pub closed: usize,
}

#[derive(Debug, Clone)]
pub struct MemoryPrintHost {
    behavior: PrintBehavior,
    log: Arc<Mutex<PrintLog>>,
}

impl MemoryPrintHost {
    pub fn new(behavior: PrintBehavior) -> Self {
        Self { behavior, log: Arc::new(Mutex::new(PrintLog::default())) }
    }

    /// Snapshot of the host's log
    pub fn log(&self) -> PrintLog {
        self.log.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Default for MemoryPrintHost {
    fn default() -> Self {
        Self::new(PrintBehavior::Completes)
    }
}

fn record(log: &Mutex<PrintLog>, f: impl FnOnce(&mut PrintLog)) {
    if let Ok(mut l) = log.lock() {
        f(&mut l);
    }
}

impl PrintHost for MemoryPrintHost {
    fn open_window<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Box<dyn PrintWindow>>> {
        async move {
            if self.behavior == PrintBehavior::Blocked {
                return Err(Error::ExportEnvironmentUnavailable(format!(
                    "window for {} was blocked",
                    name
                )));
            }
            record(&self.log, |l| l.opened.push(name.to_string()));
            Ok(Box::new(MemoryWindow { behavior: self.behavior, log: self.log.clone() })
                as Box<dyn PrintWindow>)
        }
        .boxed()
    }
}

struct MemoryWindow {
    behavior: PrintBehavior,
    log: Arc<Mutex<PrintLog>>,
}

impl PrintWindow for MemoryWindow {
    fn write_document<'a>(&'a mut self, html: &'a str) -> BoxFuture<'a, Result<()>> {
        record(&self.log, |l| l.documents.push(html.to_string()));
        future::ready(Ok(())).boxed()
    }

    fn print(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        record(&self.log, |l| l.printed += 1);
        match self.behavior {
            PrintBehavior::NeverSignals => future::pending().boxed(),
            PrintBehavior::Saves(delay) => async move {
                tokio::time::sleep(delay).await;
                Ok(Some(b"%PDF-1.4 memory".to_vec()))
            }
            .boxed(),
            _ => future::ready(Ok(None)).boxed(),
        }
    }

    fn close(&mut self) -> BoxFuture<'_, Result<()>> {
        record(&self.log, |l| l.closed += 1);
        future::ready(Ok(())).boxed()
    }

    fn signals_completion(&self) -> bool {
        self.behavior != PrintBehavior::NeverSignals
    }
}
