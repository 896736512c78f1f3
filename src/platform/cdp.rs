//! Chrome DevTools Protocol print host
//!
//! Every window is a fresh tab in a headless Chrome instance. Printing uses
//! Chrome's own print-to-PDF, so the print flow does signal completion and
//! hands back the saved document.

use std::sync::Arc;

use base64::Engine as Base64Engine;
use futures::future::{BoxFuture, FutureExt};
use headless_chrome::browser::tab::Tab;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::warn;

use super::{PrintHost, PrintWindow};
use crate::{Error, Result};

/// A4 sheet in inches, portrait; Chrome rotates it for `landscape`
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;

fn pdf_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        landscape: Some(true),
        print_background: Some(true),
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CdpPrintHost;

impl CdpPrintHost {
    pub fn new() -> Self {
        CdpPrintHost
    }
}

fn blocking_err(e: tokio::task::JoinError) -> Error {
    Error::CdpError(format!("worker task failed: {}", e))
}

impl PrintHost for CdpPrintHost {
    fn open_window<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, Result<Box<dyn PrintWindow>>> {
        async move {
            let (browser, tab) = tokio::task::spawn_blocking(|| {
                let launch_options = LaunchOptions::default_builder()
                    .headless(true)
                    .build()
                    .map_err(|e| {
                        Error::ExportEnvironmentUnavailable(format!("Failed to build launch options: {}", e))
                    })?;
                let browser = Browser::new(launch_options).map_err(|e| {
                    Error::ExportEnvironmentUnavailable(format!("Failed to launch browser: {}", e))
                })?;
                let tab = browser.new_tab().map_err(|e| {
                    Error::ExportEnvironmentUnavailable(format!("Failed to create tab: {}", e))
                })?;
                Ok::<_, Error>((browser, tab))
            })
            .await
            .map_err(blocking_err)??;
            Ok(Box::new(CdpWindow { browser: Some(browser), tab }) as Box<dyn PrintWindow>)
        }
        .boxed()
    }
}

struct CdpWindow {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl PrintWindow for CdpWindow {
    fn write_document<'a>(&'a mut self, html: &'a str) -> BoxFuture<'a, Result<()>> {
        let tab = self.tab.clone();
        let url = format!(
            "data:text/html;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(html)
        );
        async move {
            tokio::task::spawn_blocking(move || {
                tab.navigate_to(&url)
                    .map_err(|e| Error::CdpError(format!("Navigation failed: {}", e)))?;
                tab.wait_until_navigated()
                    .map_err(|e| Error::CdpError(format!("Wait for navigation failed: {}", e)))?;
                Ok(())
            })
            .await
            .map_err(blocking_err)?
        }
        .boxed()
    }

    fn print(&mut self) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        let tab = self.tab.clone();
        async move {
            let pdf = tokio::task::spawn_blocking(move || {
                tab.print_to_pdf(Some(pdf_options()))
                .map_err(|e| Error::CdpError(format!("Print to PDF failed: {}", e)))
            })
            .await
            .map_err(blocking_err)??;
            Ok(Some(pdf))
        }
        .boxed()
    }

    fn close(&mut self) -> BoxFuture<'_, Result<()>> {
        let tab = self.tab.clone();
        let browser = self.browser.take();
        async move {
            let res = tokio::task::spawn_blocking(move || tab.close(true))
                .await
                .map_err(blocking_err)?;
            if let Err(e) = res {
                warn!("closing print tab failed: {}", e);
            }
            // Dropping the browser terminates the Chrome child process.
            drop(browser);
            Ok(())
        }
        .boxed()
    }

    fn signals_completion(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_options_request_a4_landscape() {
        let opts = pdf_options();
        assert_eq!(opts.landscape, Some(true));
        // portrait sheet; Chrome swaps the sides for landscape
        assert_eq!(opts.paper_width, Some(8.27));
        assert_eq!(opts.paper_height, Some(11.69));
        assert_eq!(opts.prefer_css_page_size, Some(true));
    }
}
