//! Print-dialog export strategy
//!
//! Opens a new window from the configured [`PrintHost`], writes a
//! print-ready document around the certificate markup, runs the print flow
//! and closes the window once the flow completes. Windows that cannot signal
//! completion are closed after the fallback delay instead.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use log::{info, warn};
use quick_xml::escape::escape;

use super::{Artifact, ExportOutcome, ExportStrategy};
use crate::platform::PrintHost;
use crate::preview::RenderTarget;
use crate::{GeneratorConfig, Result, StrategyKind};

const PRINT_STYLES: &str = r#"
      @media print {
        body { margin: 0; padding: 20px; background: white; }
        #certificate {
          box-shadow: none !important;
          border: 2px solid #e5e7eb !important;
          page-break-inside: avoid;
          width: 100% !important;
          max-width: none !important;
        }
        @page { size: A4 landscape; margin: 0.5in; }
      }
      body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', sans-serif;
        background: white;
      }
      p { margin: 0.25em 0; }
      .placeholder { letter-spacing: 0.05em; }"#;

const PRINT_SCRIPT: &str = r#"
      window.onload = function() {
        setTimeout(function() {
          window.onafterprint = function() { window.close(); };
          window.print();
        }, 1000);
      };"#;

/// Wrap the certificate markup into a standalone print document.
pub fn print_document(target: &RenderTarget) -> String {
    let name = target.participant_name.trim();
    let title = if name.is_empty() { "Certificate" } else { name };
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>Certificate - {title}</title>
    <style>{styles}
    </style>
  </head>
  <body>
    <div style="display:flex;justify-content:center;align-items:center;min-height:100vh;">
      {markup}
    </div>
    <script>{script}
    </script>
  </body>
</html>
"#,
        title = escape(title),
        styles = PRINT_STYLES,
        markup = target.html,
        script = PRINT_SCRIPT,
    )
}

pub struct PrintDialogExport {
    host: Arc<dyn PrintHost>,
    close_fallback: Duration,
}

impl PrintDialogExport {
    pub fn new(host: Arc<dyn PrintHost>, config: &GeneratorConfig) -> Self {
        Self {
            host,
            close_fallback: Duration::from_millis(config.print_close_fallback_ms),
        }
    }

    async fn run(&self, target: &RenderTarget) -> Result<ExportOutcome> {
        target.measure()?;
        let filename = target.artifact_filename();
        let stem = filename.trim_end_matches(".pdf");

        let mut window = self.host.open_window(stem).await?;
        if let Err(e) = window.write_document(&print_document(target)).await {
            let _ = window.close().await;
            return Err(e);
        }

        let printed = if window.signals_completion() {
            window.print().await
        } else {
            match tokio::time::timeout(self.close_fallback, window.print()).await {
                Ok(res) => res,
                Err(_) => {
                    warn!(
                        "no completion signal from print flow after {:?}; window closed",
                        self.close_fallback
                    );
                    Ok(None)
                }
            }
        };
        let close = window.close().await;
        let saved = printed?;
        close?;

        info!("print flow for {} done", stem);
        Ok(ExportOutcome {
            strategy: StrategyKind::Print,
            artifact: saved.map(|bytes| Artifact { filename, bytes }),
        })
    }
}

impl ExportStrategy for PrintDialogExport {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Print
    }

    fn export<'a>(&'a self, target: &'a RenderTarget) -> BoxFuture<'a, Result<ExportOutcome>> {
        self.run(target).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MemoryPrintHost, PrintBehavior};
    use crate::preview::Preview;
    use crate::{CertificateRecord, Error};

    fn target() -> RenderTarget {
        let rec = CertificateRecord::sample(chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        Preview::default().target(&rec)
    }

    fn exporter(host: &MemoryPrintHost) -> PrintDialogExport {
        PrintDialogExport::new(Arc::new(host.clone()), &GeneratorConfig::default())
    }

    #[test]
    fn document_carries_print_styles_and_markup() {
        let doc = print_document(&target());
        assert!(doc.contains("<title>Certificate - John Doe</title>"));
        assert!(doc.contains("size: A4 landscape"));
        assert!(doc.contains(r#"<div id="certificate""#));
        assert!(doc.contains("window.print()"));
    }

    #[tokio::test]
    async fn completed_print_closes_window() {
        let host = MemoryPrintHost::new(PrintBehavior::Completes);
        let outcome = exporter(&host).export(&target()).await.unwrap();
        assert_eq!(outcome.strategy, StrategyKind::Print);
        assert!(outcome.artifact.is_none());

        let log = host.log();
        assert_eq!(log.opened, vec!["John Doe_Certificate".to_string()]);
        assert_eq!(log.printed, 1);
        assert_eq!(log.closed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_print_flow_closes_after_fallback() {
        let host = MemoryPrintHost::new(PrintBehavior::NeverSignals);
        let started = tokio::time::Instant::now();
        exporter(&host).export(&target()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert_eq!(host.log().closed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_saving_window_keeps_its_pdf() {
        let host = MemoryPrintHost::new(PrintBehavior::Saves(Duration::from_secs(4)));
        let started = tokio::time::Instant::now();
        let outcome = exporter(&host).export(&target()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(4));

        let artifact = outcome.artifact.expect("saved PDF is kept past the fallback delay");
        assert_eq!(artifact.filename, "John Doe_Certificate.pdf");
        assert!(artifact.bytes.starts_with(b"%PDF"));
        assert_eq!(host.log().closed, 1);
    }

    #[tokio::test]
    async fn blocked_window_is_environment_error() {
        let host = MemoryPrintHost::new(PrintBehavior::Blocked);
        let err = exporter(&host).export(&target()).await.unwrap_err();
        assert!(matches!(err, Error::ExportEnvironmentUnavailable(_)));
    }
}
