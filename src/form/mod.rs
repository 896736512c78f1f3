//! The certificate input form
//!
//! [`CertificateForm`] turns a record into a list of [`Control`]s and turns
//! control edits back into new records. It never mutates the record it is
//! given; the caller stores whatever [`CertificateForm::edit`] returns.

pub mod policy;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::{CertificateRecord, CertificateType, Field};
use policy::FormPolicy;

/// Inline message shown under an empty required control
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// The kind of input rendered for a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ControlKind {
    Text,
    /// Calendar picker; no date after `max` can be chosen
    Date { max: NaiveDate },
    /// Select constrained to `options` (or empty)
    Select { options: Vec<&'static str> },
}

/// One rendered form control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    pub field: Field,
    pub label: &'static str,
    pub kind: ControlKind,
    pub value: String,
    pub placeholder: &'static str,
    pub required: bool,
    pub locked: bool,
    /// Advisory only; never blocks input
    pub error: Option<&'static str>,
}

/// Global banner summarizing the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Ready,
    Incomplete { missing: Vec<Field> },
}

impl FormStatus {
    pub fn message(&self) -> &'static str {
        match self {
            FormStatus::Ready => {
                "Ready to generate! Your certificate is complete and ready for download."
            }
            FormStatus::Incomplete { .. } => {
                "Fill in the required fields (*) to see your certificate preview update in real-time."
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FormStatus::Ready)
    }
}

/// Form bound to a lock policy and a date upper bound
#[derive(Debug, Clone)]
pub struct CertificateForm {
    policy: FormPolicy,
    today: NaiveDate,
}

impl CertificateForm {
    pub fn new(policy: FormPolicy, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    pub fn policy(&self) -> &FormPolicy {
        &self.policy
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Record as the form displays it: forced values applied
    pub fn normalize(&self, record: &CertificateRecord) -> CertificateRecord {
        self.policy.enforce(record)
    }

    /// Handle one keystroke/selection on `field`
    ///
    /// Returns the next record. Values a control could not produce (a date
    /// after today, an unknown certificate type) leave the record as is.
    pub fn edit(&self, record: &CertificateRecord, field: Field, value: &str) -> CertificateRecord {
        if !self.accepts(field, value) {
            debug!("control for {} rejected value {:?}", field, value);
            return self.normalize(record);
        }
        self.policy.edit(record, field, value)
    }

    fn accepts(&self, field: Field, value: &str) -> bool {
        if value.is_empty() {
            return true;
        }
        match field {
            Field::Date => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) => date <= self.today,
                Err(_) => false,
            },
            Field::CertificateType => value.parse::<CertificateType>().is_ok(),
            _ => true,
        }
    }

    pub fn is_complete(&self, record: &CertificateRecord) -> bool {
        self.normalize(record).is_complete()
    }

    /// Inline error for `field`, if any
    pub fn field_error(&self, record: &CertificateRecord, field: Field) -> Option<&'static str> {
        let record = self.normalize(record);
        (field.is_required() && record.get(field).trim().is_empty()).then_some(REQUIRED_MESSAGE)
    }

    pub fn status(&self, record: &CertificateRecord) -> FormStatus {
        let missing = self.normalize(record).missing_fields();
        if missing.is_empty() {
            FormStatus::Ready
        } else {
            FormStatus::Incomplete { missing }
        }
    }

    /// Render one control per field
    pub fn controls(&self, record: &CertificateRecord) -> Vec<Control> {
        let record = self.normalize(record);
        Field::ALL
            .into_iter()
            .map(|field| Control {
                field,
                label: field.label(),
                kind: self.kind_of(field),
                value: record.get(field).to_string(),
                placeholder: placeholder(field),
                required: field.is_required(),
                locked: self.policy.is_locked(field),
                error: self.field_error(&record, field),
            })
            .collect()
    }

    fn kind_of(&self, field: Field) -> ControlKind {
        match field {
            Field::Date => ControlKind::Date { max: self.today },
            Field::CertificateType => ControlKind::Select {
                options: CertificateType::ALL.iter().map(|t| t.as_str()).collect(),
            },
            _ => ControlKind::Text,
        }
    }
}

fn placeholder(field: Field) -> &'static str {
    match field {
        Field::ParticipantName => "Enter participant's full name",
        Field::ProgramName => "e.g., Student Ambassador Program",
        Field::OrganizationName => "e.g., Google, Microsoft, etc.",
        Field::InitiativeName => "e.g., Learning Initiative 2024",
        Field::CertificateType => "Select certificate type",
        Field::Date => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy::FieldPolicy;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn open_form() -> CertificateForm {
        CertificateForm::new(FormPolicy::open(), today())
    }

    #[test]
    fn edit_returns_new_record_and_leaves_input_alone() {
        let form = open_form();
        let before = CertificateRecord::default();
        let after = form.edit(&before, Field::ParticipantName, "J");
        assert_eq!(before.participant_name, "");
        assert_eq!(after.participant_name, "J");
    }

    #[test]
    fn future_dates_are_rejected_by_the_picker() {
        let form = open_form();
        let rec = form.edit(&CertificateRecord::default(), Field::Date, "2024-06-30");
        assert_eq!(rec.date, "2024-06-30");
        let rec2 = form.edit(&rec, Field::Date, "2024-07-01");
        assert_eq!(rec2.date, "2024-06-30");
        let rec3 = form.edit(&rec, Field::Date, "yesterday");
        assert_eq!(rec3.date, "2024-06-30");
        let cleared = form.edit(&rec, Field::Date, "");
        assert_eq!(cleared.date, "");
    }

    #[test]
    fn select_only_accepts_enumerated_types() {
        let form = open_form();
        let rec = form.edit(&CertificateRecord::default(), Field::CertificateType, "Merit");
        assert_eq!(rec.certificate_type, "Merit");
        let rec2 = form.edit(&rec, Field::CertificateType, "Platinum");
        assert_eq!(rec2.certificate_type, "Merit");
    }

    #[test]
    fn field_errors_are_advisory() {
        let form = open_form();
        let rec = CertificateRecord::default();
        assert_eq!(form.field_error(&rec, Field::ParticipantName), Some(REQUIRED_MESSAGE));
        assert_eq!(form.field_error(&rec, Field::InitiativeName), None);

        // typing still works while the field is in error
        let rec = form.edit(&rec, Field::ParticipantName, " ");
        assert_eq!(rec.participant_name, " ");
        assert_eq!(form.field_error(&rec, Field::ParticipantName), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn controls_describe_every_field() {
        let form = CertificateForm::new(
            FormPolicy::open().with(Field::Date, FieldPolicy::locked()),
            today(),
        );
        let controls = form.controls(&CertificateRecord::default());
        assert_eq!(controls.len(), 6);

        let date = controls.iter().find(|c| c.field == Field::Date).unwrap();
        assert_eq!(date.kind, ControlKind::Date { max: today() });
        assert!(date.locked);

        let kind = controls.iter().find(|c| c.field == Field::CertificateType).unwrap();
        match &kind.kind {
            ControlKind::Select { options } => assert_eq!(options.len(), 7),
            other => panic!("unexpected control kind {:?}", other),
        }

        let initiative = controls.iter().find(|c| c.field == Field::InitiativeName).unwrap();
        assert!(!initiative.required);
        assert!(initiative.error.is_none());
    }

    #[test]
    fn status_tracks_completeness() {
        let form = open_form();
        let empty = CertificateRecord::default();
        assert_eq!(
            form.status(&empty),
            FormStatus::Incomplete { missing: Field::REQUIRED.to_vec() }
        );
        let full = CertificateRecord::sample(today());
        assert!(form.status(&full).is_ready());
        assert!(form.is_complete(&full));
    }
}
