/// Text content of the certificate after field substitution

use serde::Serialize;

use super::date::{format_date, DateStyle};
use crate::{CertificateRecord, Field};

pub const PARTICIPANT_PLACEHOLDER: &str = "________________________";
pub const NAME_PLACEHOLDER: &str = "____________________";
pub const FOOTER_PLACEHOLDER: &str = "_______________";
pub const TYPE_PLACEHOLDER: &str = "____________";

pub const CERTIFY_LINE: &str = "This is to certify that";
pub const COMMENDATION: &str = "demonstrating enthusiasm, leadership, and commitment to fostering learning and innovation within their community.";

/// A substituted value and whether it is a placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub text: String,
    pub placeholder: bool,
}

impl Slot {
    fn fill(value: &str, placeholder: &str) -> Self {
        if value.trim().is_empty() {
            Slot { text: placeholder.to_string(), placeholder: true }
        } else {
            Slot { text: value.to_string(), placeholder: false }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    pub wordmark: Option<String>,
    pub certificate_type: Slot,
    pub participant: Slot,
    pub program: Slot,
    pub organization: Slot,
    pub date: Slot,
    pub initiative: Slot,
}

impl CertificateView {
    pub fn from_record(record: &CertificateRecord, style: DateStyle, wordmark: Option<&str>) -> Self {
        let date = if record.date.trim().is_empty() {
            Slot::fill("", FOOTER_PLACEHOLDER)
        } else {
            Slot::fill(&format_date(&record.date, style), FOOTER_PLACEHOLDER)
        };
        Self {
            wordmark: wordmark.map(str::to_string),
            certificate_type: Slot::fill(&record.certificate_type, TYPE_PLACEHOLDER),
            participant: Slot::fill(&record.participant_name, PARTICIPANT_PLACEHOLDER),
            program: Slot::fill(&record.program_name, NAME_PLACEHOLDER),
            organization: Slot::fill(&record.organization_name, NAME_PLACEHOLDER),
            date,
            initiative: Slot::fill(&record.initiative_name, FOOTER_PLACEHOLDER),
        }
    }

    pub fn heading(&self) -> String {
        format!("Certificate of {}", self.certificate_type.text)
    }

    pub fn slot(&self, field: Field) -> &Slot {
        match field {
            Field::ParticipantName => &self.participant,
            Field::ProgramName => &self.program,
            Field::OrganizationName => &self.organization,
            Field::Date => &self.date,
            Field::InitiativeName => &self.initiative,
            Field::CertificateType => &self.certificate_type,
        }
    }

    /// Plain-text rendition, one block per line
    pub fn to_text(&self) -> String {
        let mut out = Vec::new();
        if let Some(mark) = &self.wordmark {
            out.push(mark.clone());
        }
        out.push(self.heading());
        out.push(String::new());
        out.push(CERTIFY_LINE.to_string());
        out.push(self.participant.text.clone());
        out.push(format!(
            "has successfully participated in {}, organized by {}",
            self.program.text, self.organization.text
        ));
        out.push(COMMENDATION.to_string());
        out.push(String::new());
        out.push(format!("Date: {}", self.date.text));
        out.push(format!("Initiative: {}", self.initiative.text));
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_is_all_placeholders() {
        let view = CertificateView::from_record(&CertificateRecord::default(), DateStyle::Long, None);
        for field in Field::ALL {
            assert!(view.slot(field).placeholder, "{} should be a placeholder", field);
            assert!(view.slot(field).text.chars().all(|c| c == '_'));
        }
        assert_eq!(view.participant.text, PARTICIPANT_PLACEHOLDER);
    }

    #[test]
    fn values_are_substituted_verbatim() {
        let rec = CertificateRecord::default()
            .with_field(Field::ParticipantName, "Jane Doe")
            .with_field(Field::CertificateType, "Completion")
            .with_field(Field::Date, "2024-05-01");
        let view = CertificateView::from_record(&rec, DateStyle::Long, Some("Google"));
        assert_eq!(view.participant.text, "Jane Doe");
        assert_eq!(view.heading(), "Certificate of Completion");
        assert_eq!(view.date.text, "May 1, 2024");
        assert!(view.program.placeholder);
        assert!(view.to_text().starts_with("Google\nCertificate of Completion"));
    }
}
