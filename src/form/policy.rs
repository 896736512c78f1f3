//! Declarative lock policy for form fields
//!
//! A field can be *locked* (edits to it are ignored) and can carry a
//! *forced value* (applied unconditionally whenever the record is
//! normalized). The two are independent: a forced field that is not locked
//! accepts the edit and then reads back the constant again.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{CertificateRecord, CertificateType, Error, Field, Result};

/// Policy for a single field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPolicy {
    /// Edits to this field are ignored
    pub locked: bool,
    /// Constant written into this field on every normalization
    pub forced_value: Option<String>,
}

impl FieldPolicy {
    pub fn locked() -> Self {
        Self { locked: true, forced_value: None }
    }

    pub fn forced(value: impl Into<String>) -> Self {
        Self { locked: false, forced_value: Some(value.into()) }
    }

    pub fn locked_to(value: impl Into<String>) -> Self {
        Self { locked: true, forced_value: Some(value.into()) }
    }
}

/// Per-field lock configuration for a form
///
/// Serialized as `{"fields": {"date": {"locked": true, "forcedValue": "2024-05-01"}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormPolicy {
    pub fields: BTreeMap<Field, FieldPolicy>,
}

impl FormPolicy {
    /// Every field editable, nothing forced
    pub fn open() -> Self {
        Self::default()
    }

    /// Only the participant name is free text; every other field reads back
    /// a fixed value and edits to the date and type controls are ignored.
    pub fn single_field(today: NaiveDate) -> Self {
        Self::open()
            .with(Field::Date, FieldPolicy::locked_to(today.format("%Y-%m-%d").to_string()))
            .with(
                Field::CertificateType,
                FieldPolicy::locked_to(CertificateType::Participation.as_str()),
            )
            .with(Field::ProgramName, FieldPolicy::forced("Student Ambassador Program"))
            .with(Field::OrganizationName, FieldPolicy::forced("Google"))
            .with(Field::InitiativeName, FieldPolicy::forced("Learning Initiative 2024"))
    }

    /// Builder-style helper replacing the policy of one field
    pub fn with(mut self, field: Field, policy: FieldPolicy) -> Self {
        self.fields.insert(field, policy);
        self
    }

    pub fn is_open(&self) -> bool {
        self.fields
            .values()
            .all(|p| !p.locked && p.forced_value.is_none())
    }

    pub fn is_locked(&self, field: Field) -> bool {
        self.fields.get(&field).map(|p| p.locked).unwrap_or(false)
    }

    pub fn forced_value(&self, field: Field) -> Option<&str> {
        self.fields
            .get(&field)
            .and_then(|p| p.forced_value.as_deref())
    }

    /// Overwrite every forced field with its constant
    pub fn enforce(&self, record: &CertificateRecord) -> CertificateRecord {
        self.fields
            .iter()
            .filter_map(|(field, p)| p.forced_value.as_deref().map(|v| (*field, v)))
            .fold(record.clone(), |rec, (field, value)| {
                if rec.get(field) == value {
                    rec
                } else {
                    rec.with_field(field, value)
                }
            })
    }

    /// Apply one edit under this policy, producing the next record
    pub fn edit(&self, record: &CertificateRecord, field: Field, value: &str) -> CertificateRecord {
        if self.is_locked(field) {
            debug!("ignoring edit to locked field {}", field);
            return self.enforce(record);
        }
        self.enforce(&record.with_field(field, value))
    }

    /// Reject forced values the form controls could never produce
    pub fn validate(&self) -> Result<()> {
        for (field, p) in &self.fields {
            let Some(value) = p.forced_value.as_deref() else {
                continue;
            };
            match field {
                Field::Date if !value.is_empty() => {
                    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
                        Error::ConfigError(format!("forced date '{}' is not an ISO date: {}", value, e))
                    })?;
                }
                Field::CertificateType if !value.is_empty() => {
                    CertificateType::from_str(value).map_err(Error::ConfigError)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let policy: FormPolicy = serde_json::from_str(s)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn open_policy_passes_edits_through() {
        let policy = FormPolicy::open();
        let rec = policy.edit(&CertificateRecord::default(), Field::Date, "2024-01-01");
        assert_eq!(rec.date, "2024-01-01");
        assert!(policy.is_open());
    }

    #[test]
    fn locked_field_edit_is_a_no_op() {
        let policy = FormPolicy::open().with(Field::CertificateType, FieldPolicy::locked());
        let before = CertificateRecord::default().with_field(Field::CertificateType, "Merit");
        let after = policy.edit(&before, Field::CertificateType, "Excellence");
        assert_eq!(after, before);
    }

    #[test]
    fn forced_field_reads_back_constant_after_edit() {
        let policy = FormPolicy::single_field(today());
        let rec = policy.edit(&CertificateRecord::default(), Field::ProgramName, "Other");
        assert_eq!(rec.program_name, "Student Ambassador Program");
        assert_eq!(rec.date, "2024-06-30");
        assert_eq!(rec.certificate_type, "Participation");
    }

    #[test]
    fn single_field_policy_keeps_participant_edits() {
        let policy = FormPolicy::single_field(today());
        let rec = policy.edit(&CertificateRecord::default(), Field::ParticipantName, "Alex");
        assert_eq!(rec.participant_name, "Alex");
        assert!(rec.is_complete());
        assert!(policy.is_locked(Field::Date));
        assert!(!policy.is_locked(Field::ProgramName));
    }

    #[test]
    fn policy_parses_from_json() {
        let policy = FormPolicy::from_json_str(
            r#"{"fields": {"date": {"locked": true, "forcedValue": "2024-05-01"}, "programName": {"forcedValue": "X"}}}"#,
        )
        .unwrap();
        assert!(policy.is_locked(Field::Date));
        assert_eq!(policy.forced_value(Field::Date), Some("2024-05-01"));
        assert_eq!(policy.forced_value(Field::ProgramName), Some("X"));
        assert!(!policy.is_locked(Field::ProgramName));
    }

    #[test]
    fn policy_rejects_impossible_forced_values() {
        let err = FormPolicy::from_json_str(r#"{"fields": {"date": {"forcedValue": "May 1"}}}"#);
        assert!(matches!(err, Err(Error::ConfigError(_))));
        let err = FormPolicy::from_json_str(r#"{"fields": {"certificateType": {"forcedValue": "Gold"}}}"#);
        assert!(matches!(err, Err(Error::ConfigError(_))));
    }
}
