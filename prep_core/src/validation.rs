//! Form validation.
//!
//! Every field is checked and every violation is collected, so a caller can
//! show all field messages at once. Procedure times must already be in
//! 24-hour `HH:MM` form; see [`crate::clock::to_24_hour`].

use crate::{SachetCount, ScheduleInput};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum patient name length, in characters
pub const MIN_NAME_LENGTH: usize = 2;
/// Maximum patient name length, in characters
pub const MAX_NAME_LENGTH: usize = 50;

/// Procedure dates are four-digit years
const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

const INVALID_DATE: &str = "Please select a valid procedure date.";

/// Raw field values as submitted by a form or carried in a link.
///
/// Every field may be missing; nothing is trusted until [`validate`] accepts it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScheduleInput {
    pub patient_name: Option<String>,
    /// ISO-8601 calendar date, `YYYY-MM-DD`
    pub procedure_date: Option<String>,
    /// 24-hour `HH:MM`
    pub procedure_time: Option<String>,
    pub sachets: Option<String>,
}

/// Form field a validation message belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PatientName,
    ProcedureDate,
    ProcedureTime,
    Sachets,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::PatientName => "patientName",
            Field::ProcedureDate => "procedureDate",
            Field::ProcedureTime => "procedureTime",
            Field::Sachets => "sachets",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One violated field constraint
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All constraint violations found in one input, in field order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub(crate) fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Messages for a single field
    pub fn for_field(&self, field: Field) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate raw field values into a `ScheduleInput`.
///
/// Returns every violated constraint, not only the first.
pub fn validate(raw: &RawScheduleInput) -> Result<ScheduleInput, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match raw.patient_name.as_deref() {
        Some(name) => {
            check_patient_name(name, &mut errors);
            Some(name)
        }
        None => {
            errors.push(Field::PatientName, "Please enter the patient name.");
            None
        }
    };

    let date = match raw.procedure_date.as_deref() {
        Some(text) => match parse_date(text) {
            Some(date) => {
                check_procedure_date(date, &mut errors);
                Some(date)
            }
            None => {
                errors.push(Field::ProcedureDate, INVALID_DATE);
                None
            }
        },
        None => {
            errors.push(Field::ProcedureDate, "Please select a procedure date.");
            None
        }
    };

    let time = match raw.procedure_time.as_deref() {
        Some(text) => {
            let time = parse_time_24h(text);
            if time.is_none() {
                errors.push(Field::ProcedureTime, "Please select a valid procedure time.");
            }
            time
        }
        None => {
            errors.push(Field::ProcedureTime, "Please select a procedure time.");
            None
        }
    };

    let sachets = match raw.sachets.as_deref() {
        Some(choice) => {
            let sachets = SachetCount::from_choice(choice);
            if sachets.is_none() {
                errors.push(Field::Sachets, "Number of sachets must be 2, 3 or 4.");
            }
            sachets
        }
        None => {
            errors.push(Field::Sachets, "Please select the number of sachets.");
            None
        }
    };

    match (name, date, time, sachets) {
        (Some(name), Some(date), Some(time), Some(sachets)) if errors.is_empty() => Ok(
            ScheduleInput::from_parts(name.to_string(), date, time, sachets),
        ),
        _ => {
            tracing::debug!(violations = errors.len(), "Schedule input rejected");
            Err(errors)
        }
    }
}

pub(crate) fn check_patient_name(name: &str, errors: &mut ValidationErrors) {
    let len = name.chars().count();
    if len < MIN_NAME_LENGTH {
        errors.push(
            Field::PatientName,
            format!("Patient name must be at least {} characters.", MIN_NAME_LENGTH),
        );
    } else if len > MAX_NAME_LENGTH {
        errors.push(
            Field::PatientName,
            format!("Patient name must be {} characters or less.", MAX_NAME_LENGTH),
        );
    }
}

pub(crate) fn check_procedure_date(date: NaiveDate, errors: &mut ValidationErrors) {
    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        errors.push(Field::ProcedureDate, INVALID_DATE);
    }
}

/// Strict `YYYY-MM-DD`
fn parse_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
    {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Strict zero-padded `HH:MM`
pub(crate) fn parse_time_24h(text: &str) -> Option<NaiveTime> {
    let bytes = text.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    if !bytes
        .iter()
        .enumerate()
        .all(|(i, b)| i == 2 || b.is_ascii_digit())
    {
        return None;
    }
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}
