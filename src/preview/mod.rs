//! Certificate preview
//!
//! The preview turns a record into a [`CertificateView`] (substituted text),
//! lays it out into a display list and serializes that list into the two
//! renditions the export strategies consume: HTML for the print flow and SVG
//! for raster capture. Both renditions describe the same `#certificate`
//! element.

pub mod date;
pub mod html;
pub mod layout;
pub mod paint;
#[cfg(feature = "raster")]
pub mod raster;
pub mod svg;
pub mod view;

pub use date::{format_date, DateStyle};
pub use layout::Canvas;
pub use view::CertificateView;

use serde::{Deserialize, Serialize};

use crate::export::ExportState;
use crate::{CertificateRecord, Error, Result};

/// Element id of the capture/print target
pub const CERTIFICATE_ID: &str = "certificate";

/// Preview rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub date_style: DateStyle,
    /// Wordmark drawn above the heading; `None` draws nothing
    pub brand: Option<String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            date_style: DateStyle::Long,
            brand: Some("Google".to_string()),
        }
    }
}

/// The element an export strategy captures or prints
#[derive(Debug, Clone)]
pub struct RenderTarget {
    pub id: &'static str,
    pub width: u32,
    pub height: u32,
    pub html: String,
    pub svg: String,
    pub participant_name: String,
}

impl RenderTarget {
    /// Size of the element; fails when there is nothing to capture
    pub fn measure(&self) -> Result<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::RenderError(format!(
                "#{} has no area ({}x{})",
                self.id, self.width, self.height
            )));
        }
        if self.html.is_empty() || self.svg.is_empty() {
            return Err(Error::RenderError(format!("#{} has no content", self.id)));
        }
        Ok((self.width, self.height))
    }

    /// `{participantName}_Certificate.pdf`, made safe for a file system
    pub fn artifact_filename(&self) -> String {
        let name: String = self
            .participant_name
            .trim()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        if name.is_empty() {
            "Certificate.pdf".to_string()
        } else {
            format!("{}_Certificate.pdf", name)
        }
    }
}

/// State of the "Download PDF" button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportTrigger {
    pub enabled: bool,
    pub label: &'static str,
}

impl ExportTrigger {
    pub fn new(complete: bool, state: &ExportState) -> Self {
        let enabled = complete && !matches!(state, ExportState::Exporting);
        Self { enabled, label: "Download PDF" }
    }
}

/// Everything the preview shows for one record
#[derive(Debug, Clone)]
pub struct Rendered {
    pub view: CertificateView,
    pub target: RenderTarget,
    pub trigger: ExportTrigger,
}

impl Rendered {
    pub fn to_text(&self) -> String {
        let button = if self.trigger.enabled {
            format!("[{}]", self.trigger.label)
        } else {
            format!("[{}] (disabled)", self.trigger.label)
        };
        format!("{}\n\n{}", self.view.to_text(), button)
    }
}

/// Preview component
#[derive(Debug, Clone, Default)]
pub struct Preview {
    config: PreviewConfig,
    canvas: Canvas,
}

impl Preview {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config, canvas: Canvas::default() }
    }

    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn view(&self, record: &CertificateRecord) -> CertificateView {
        CertificateView::from_record(record, self.config.date_style, self.config.brand.as_deref())
    }

    pub fn target(&self, record: &CertificateRecord) -> RenderTarget {
        let view = self.view(record);
        self.target_for(&view, record)
    }

    fn target_for(&self, view: &CertificateView, record: &CertificateRecord) -> RenderTarget {
        let commands = layout::layout_certificate(view, self.canvas);
        RenderTarget {
            id: CERTIFICATE_ID,
            width: self.canvas.width,
            height: self.canvas.height,
            html: html::to_html(view, self.canvas),
            svg: svg::to_svg(&commands, self.canvas),
            participant_name: record.participant_name.clone(),
        }
    }

    /// Render `record` while the exporter is in `state`
    pub fn render(&self, record: &CertificateRecord, state: &ExportState) -> Rendered {
        let view = self.view(record);
        let target = self.target_for(&view, record);
        Rendered {
            trigger: ExportTrigger::new(record.is_complete(), state),
            view,
            target,
        }
    }
}
