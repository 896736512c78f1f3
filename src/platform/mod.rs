//! Platform print surface used by the print-dialog export strategy
//!
//! A [`PrintHost`] opens new windows (browsing contexts); a [`PrintWindow`]
//! receives the print document, runs the platform print flow and is closed
//! afterwards. Hosts that cannot open a window report
//! [`Error::ExportEnvironmentUnavailable`](crate::Error::ExportEnvironmentUnavailable).

#[cfg(feature = "cdp")]
pub mod cdp;
pub mod memory;
pub mod system;

pub use memory::{MemoryPrintHost, PrintBehavior, PrintLog};
pub use system::SystemPrintHost;

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{GeneratorConfig, PrintHostKind, Result};

/// Something that can open print windows
pub trait PrintHost: Send + Sync {
    /// Open a new window for the document named `name` (no extension).
    fn open_window<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Box<dyn PrintWindow>>>;
}

/// A window holding one print document
pub trait PrintWindow: Send {
    /// Replace the window's document with `html`
    fn write_document<'a>(&'a mut self, html: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Start the print flow.
    ///
    /// Resolves when the platform signals that printing completed, with the
    /// saved PDF when the platform hands it back. Hosts without a completion
    /// signal return a future that never resolves.
    fn print(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>>>;

    fn close(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Whether [`print`](Self::print) resolves once printing is done.
    ///
    /// Windows that cannot tell are closed after the fallback delay instead.
    fn signals_completion(&self) -> bool;
}

/// Create the print host selected by `config.print_host`
pub fn new_print_host(config: &GeneratorConfig) -> Result<Arc<dyn PrintHost>> {
    match config.print_host {
        PrintHostKind::System => Ok(Arc::new(SystemPrintHost::new(
            config.output_dir.clone(),
            config.print_command.clone(),
        ))),
        #[cfg(feature = "cdp")]
        PrintHostKind::Cdp => Ok(Arc::new(cdp::CdpPrintHost::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_config_builds_system_host() {
        let host = new_print_host(&GeneratorConfig::default());
        assert!(host.is_ok());
    }
}
