//! Certgen
//!
//! Form state, live preview and PDF export for participation certificates.
//! A single [`CertificateRecord`] is edited through a [`form::CertificateForm`],
//! rendered by a [`preview::Preview`] and exported by one of two interchangeable
//! [`export::ExportStrategy`] implementations.
//!
//! # Features
//!
//! - **Raster export** (default, `raster`): rasterizes the certificate at 2x and
//!   embeds the bitmap into an A4 landscape PDF
//! - **Print-dialog export**: hands a print-ready document to a [`platform::PrintHost`]
//! - **CDP print host** (`cdp`): drives headless Chrome's print-to-PDF
//!
//! # Example
//!
//! ```no_run
//! use certgen::{Field, GeneratorConfig, session::Session};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new(GeneratorConfig::default())?;
//! session.fill_sample().await?;
//! session.edit(Field::ParticipantName, "Jane Doe").await?;
//! let outcome = session.export().await?;
//! if let Some(artifact) = outcome.artifact {
//!     std::fs::write(&artifact.filename, &artifact.bytes)?;
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod export;
pub mod form;
pub mod platform;
pub mod preview;
pub mod session;
pub mod state;

pub use export::{Artifact, ExportOutcome, ExportState, ExportStrategy};
pub use form::policy::{FieldPolicy, FormPolicy};
pub use form::CertificateForm;
pub use preview::{DateStyle, Preview, PreviewConfig};

/// One editable field of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    ParticipantName,
    ProgramName,
    OrganizationName,
    Date,
    InitiativeName,
    CertificateType,
}

impl Field {
    /// Every field, in form order
    pub const ALL: [Field; 6] = [
        Field::ParticipantName,
        Field::CertificateType,
        Field::ProgramName,
        Field::OrganizationName,
        Field::Date,
        Field::InitiativeName,
    ];

    /// Fields that must be non-empty for a record to be complete
    pub const REQUIRED: [Field; 5] = [
        Field::ParticipantName,
        Field::ProgramName,
        Field::OrganizationName,
        Field::Date,
        Field::CertificateType,
    ];

    /// Wire name, as used in JSON records and policies
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ParticipantName => "participantName",
            Field::ProgramName => "programName",
            Field::OrganizationName => "organizationName",
            Field::Date => "date",
            Field::InitiativeName => "initiativeName",
            Field::CertificateType => "certificateType",
        }
    }

    /// Human readable label shown next to the control
    pub fn label(&self) -> &'static str {
        match self {
            Field::ParticipantName => "Participant Name",
            Field::ProgramName => "Program Name",
            Field::OrganizationName => "Organization Name",
            Field::Date => "Certificate Date",
            Field::InitiativeName => "Initiative Name",
            Field::CertificateType => "Certificate Type",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::InitiativeName)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown field '{}'", s))
    }
}

/// The enumerated certificate kinds offered by the type select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateType {
    Participation,
    Completion,
    Achievement,
    Excellence,
    Recognition,
    Merit,
    Appreciation,
}

impl CertificateType {
    pub const ALL: [CertificateType; 7] = [
        CertificateType::Participation,
        CertificateType::Completion,
        CertificateType::Achievement,
        CertificateType::Excellence,
        CertificateType::Recognition,
        CertificateType::Merit,
        CertificateType::Appreciation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateType::Participation => "Participation",
            CertificateType::Completion => "Completion",
            CertificateType::Achievement => "Achievement",
            CertificateType::Excellence => "Excellence",
            CertificateType::Recognition => "Recognition",
            CertificateType::Merit => "Merit",
            CertificateType::Appreciation => "Appreciation",
        }
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CertificateType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        CertificateType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown certificate type '{}'", s))
    }
}

/// The flat record holding every certificate field value
///
/// Records are values: edits produce a new record through [`with_field`]
/// instead of mutating the one a consumer is holding. `date` holds an ISO
/// calendar date (`YYYY-MM-DD`) or is empty.
///
/// [`with_field`]: CertificateRecord::with_field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateRecord {
    pub participant_name: String,
    pub program_name: String,
    pub organization_name: String,
    pub date: String,
    pub initiative_name: String,
    pub certificate_type: String,
}

impl CertificateRecord {
    /// The record behind the "Fill Sample Data" action
    pub fn sample(today: NaiveDate) -> Self {
        Self {
            participant_name: "John Doe".to_string(),
            program_name: "Student Ambassador Program".to_string(),
            organization_name: "Google".to_string(),
            date: today.format("%Y-%m-%d").to_string(),
            initiative_name: "Learning Initiative 2024".to_string(),
            certificate_type: CertificateType::Participation.as_str().to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::ParticipantName => &self.participant_name,
            Field::ProgramName => &self.program_name,
            Field::OrganizationName => &self.organization_name,
            Field::Date => &self.date,
            Field::InitiativeName => &self.initiative_name,
            Field::CertificateType => &self.certificate_type,
        }
    }

    /// Return a copy of this record with exactly one field replaced
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let slot = match field {
            Field::ParticipantName => &mut next.participant_name,
            Field::ProgramName => &mut next.program_name,
            Field::OrganizationName => &mut next.organization_name,
            Field::Date => &mut next.date,
            Field::InitiativeName => &mut next.initiative_name,
            Field::CertificateType => &mut next.certificate_type,
        };
        *slot = value.into();
        next
    }

    /// Required fields whose trimmed value is empty
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|f| self.get(*f).trim().is_empty())
            .collect()
    }

    /// Whether every required field is non-empty after trimming
    pub fn is_complete(&self) -> bool {
        Field::REQUIRED
            .iter()
            .all(|f| !self.get(*f).trim().is_empty())
    }
}

/// Which export strategy turns the preview into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Hand the certificate markup to a print window
    Print,
    /// Rasterize the certificate and embed it into a PDF
    Raster,
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "print" => Ok(StrategyKind::Print),
            "raster" => Ok(StrategyKind::Raster),
            other => Err(format!("unknown export strategy '{}'", other)),
        }
    }
}

/// Where the print-dialog strategy opens its window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintHostKind {
    /// Write the print document to disk and open it with the platform opener
    #[default]
    System,
    /// Headless Chrome through the DevTools protocol
    #[cfg(feature = "cdp")]
    Cdp,
}

/// Configuration for a generator session
///
/// The defaults mirror the behavior users expect from the form: raster
/// export, long date format, no locked fields and 3 second auto-clear and
/// print fallback delays.
///
/// # Examples
///
/// ```
/// let cfg = certgen::GeneratorConfig::default();
/// assert_eq!(cfg.error_reset_delay_ms, 3000);
/// assert_eq!(cfg.raster_scale, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Export strategy used by [`new_exporter`]
    pub strategy: StrategyKind,
    /// Print host used by the print-dialog strategy
    pub print_host: PrintHostKind,
    /// Preview rendering options
    pub preview: PreviewConfig,
    /// Lock policy applied to edits
    pub policy: FormPolicy,
    /// Upper bound for the date control; `None` means the local date
    pub today: Option<NaiveDate>,
    /// Delay before an export error banner reverts to idle
    pub error_reset_delay_ms: u64,
    /// How long the print window waits for a completion signal before closing
    pub print_close_fallback_ms: u64,
    /// Device pixel ratio used when rasterizing the certificate
    pub raster_scale: f32,
    /// Minimum page margin around the embedded bitmap
    pub page_margin_mm: f32,
    /// Directory the system print host writes its documents into
    pub output_dir: PathBuf,
    /// Override for the program that opens print documents
    pub print_command: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::Raster,
            print_host: PrintHostKind::default(),
            preview: PreviewConfig::default(),
            policy: FormPolicy::open(),
            today: None,
            error_reset_delay_ms: 3000,
            print_close_fallback_ms: 3000,
            raster_scale: 2.0,
            page_margin_mm: 10.0,
            output_dir: PathBuf::from("."),
            print_command: None,
        }
    }
}

impl GeneratorConfig {
    /// The effective upper bound for the date control
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// Create the export strategy selected by `config.strategy`
pub fn new_exporter(config: &GeneratorConfig) -> Result<Arc<dyn ExportStrategy>> {
    match config.strategy {
        StrategyKind::Print => {
            let host = platform::new_print_host(config)?;
            Ok(Arc::new(export::print::PrintDialogExport::new(host, config)))
        }
        #[cfg(feature = "raster")]
        StrategyKind::Raster => Ok(Arc::new(export::pdf::RasterExport::new(config))),
        #[cfg(not(feature = "raster"))]
        StrategyKind::Raster => Err(Error::ConfigError(
            "raster export requires the `raster` feature".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> CertificateRecord {
        CertificateRecord {
            participant_name: "Jane Doe".into(),
            program_name: "X".into(),
            organization_name: "Y".into(),
            date: "2024-05-01".into(),
            initiative_name: String::new(),
            certificate_type: "Completion".into(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.strategy, StrategyKind::Raster);
        assert_eq!(config.print_close_fallback_ms, 3000);
        assert!(config.policy.is_open());
    }

    #[test]
    fn completeness_ignores_initiative() {
        let rec = jane();
        assert!(rec.is_complete());
        assert!(rec.with_field(Field::InitiativeName, "Anything").is_complete());
        assert!(rec.missing_fields().is_empty());
    }

    #[test]
    fn whitespace_only_required_field_is_incomplete() {
        let rec = jane().with_field(Field::ProgramName, "   ");
        assert!(!rec.is_complete());
        assert_eq!(rec.missing_fields(), vec![Field::ProgramName]);
    }

    #[test]
    fn empty_record_misses_every_required_field() {
        let rec = CertificateRecord::default();
        assert!(!rec.is_complete());
        assert_eq!(rec.missing_fields().len(), Field::REQUIRED.len());
    }

    #[test]
    fn with_field_replaces_only_that_field() {
        let before = jane();
        for field in Field::ALL {
            let after = before.with_field(field, "changed");
            for other in Field::ALL {
                if other == field {
                    assert_eq!(after.get(other), "changed");
                } else {
                    assert_eq!(after.get(other), before.get(other));
                }
            }
        }
    }

    #[test]
    fn record_uses_camel_case_json() {
        let json = serde_json::to_value(jane()).unwrap();
        assert_eq!(json["participantName"], "Jane Doe");
        assert_eq!(json["certificateType"], "Completion");

        let parsed: CertificateRecord =
            serde_json::from_str(r#"{"participantName":"Alex"}"#).unwrap();
        assert_eq!(parsed.participant_name, "Alex");
        assert!(parsed.date.is_empty());
    }

    #[test]
    fn field_and_type_parse_from_wire_names() {
        assert_eq!("organizationName".parse::<Field>(), Ok(Field::OrganizationName));
        assert!("organisation".parse::<Field>().is_err());
        assert_eq!("Merit".parse::<CertificateType>(), Ok(CertificateType::Merit));
        assert!("merit".parse::<CertificateType>().is_err());
    }
}
