//! Core domain types for the SPMC dosing schedule.
//!
//! This module defines:
//! - The sachet count choice offered by the form
//! - `ScheduleInput`, the validated and immutable form data
//! - `Schedule`, the computed dose timeline

use crate::validation::{self, ValidationErrors};
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, TimeZone};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Sachet Count
// ============================================================================

/// Number of sachets prescribed. Only 2, 3 or 4 are offered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SachetCount {
    Two,
    Three,
    Four,
}

impl SachetCount {
    pub const ALL: [SachetCount; 3] = [SachetCount::Two, SachetCount::Three, SachetCount::Four];

    pub fn get(self) -> usize {
        match self {
            SachetCount::Two => 2,
            SachetCount::Three => 3,
            SachetCount::Four => 4,
        }
    }

    /// Parse the discrete form choice. Anything but "2", "3" or "4" is rejected.
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "2" => Some(SachetCount::Two),
            "3" => Some(SachetCount::Three),
            "4" => Some(SachetCount::Four),
            _ => None,
        }
    }

    pub fn as_choice(self) -> &'static str {
        match self {
            SachetCount::Two => "2",
            SachetCount::Three => "3",
            SachetCount::Four => "4",
        }
    }
}

impl fmt::Display for SachetCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_choice())
    }
}

// ============================================================================
// Schedule Input
// ============================================================================

/// Validated form data. Built by the validator or by [`ScheduleInput::new`];
/// there is no way to change it afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScheduleInput {
    patient_name: String,
    procedure_date: NaiveDate,
    procedure_time: NaiveTime,
    sachets: SachetCount,
}

impl ScheduleInput {
    /// Build an input from already-typed values.
    ///
    /// The name length and date range rules still apply. Seconds and sub-seconds of
    /// `procedure_time` are dropped, since the form only carries `HH:MM`.
    pub fn new(
        patient_name: impl Into<String>,
        procedure_date: NaiveDate,
        procedure_time: NaiveTime,
        sachets: SachetCount,
    ) -> Result<Self, ValidationErrors> {
        let patient_name = patient_name.into();
        let mut errors = ValidationErrors::default();
        validation::check_patient_name(&patient_name, &mut errors);
        validation::check_procedure_date(procedure_date, &mut errors);
        errors.into_result()?;

        Ok(Self::from_parts(
            patient_name,
            procedure_date,
            procedure_time,
            sachets,
        ))
    }

    pub(crate) fn from_parts(
        patient_name: String,
        procedure_date: NaiveDate,
        procedure_time: NaiveTime,
        sachets: SachetCount,
    ) -> Self {
        let procedure_time = NaiveTime::from_hms_opt(
            procedure_time.hour(),
            procedure_time.minute(),
            0,
        )
        .unwrap_or(procedure_time);

        Self {
            patient_name,
            procedure_date,
            procedure_time,
            sachets,
        }
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn procedure_date(&self) -> NaiveDate {
        self.procedure_date
    }

    pub fn procedure_time(&self) -> NaiveTime {
        self.procedure_time
    }

    pub fn sachets(&self) -> SachetCount {
        self.sachets
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// A computed dosing schedule anchored in time zone `Tz`.
///
/// Fields are read-only. A new input means a new `Schedule`.
#[derive(Clone, Debug, Serialize)]
#[serde(bound(serialize = ""), rename_all = "camelCase")]
pub struct Schedule<Tz: TimeZone> {
    patient_name: String,
    procedure_date_time: DateTime<Tz>,
    last_meal_time: DateTime<Tz>,
    doses: Vec<DateTime<Tz>>,
}

impl<Tz: TimeZone> Schedule<Tz> {
    pub(crate) fn new(
        patient_name: String,
        procedure_date_time: DateTime<Tz>,
        last_meal_time: DateTime<Tz>,
        doses: Vec<DateTime<Tz>>,
    ) -> Self {
        Self {
            patient_name,
            procedure_date_time,
            last_meal_time,
            doses,
        }
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn procedure_date_time(&self) -> &DateTime<Tz> {
        &self.procedure_date_time
    }

    pub fn last_meal_time(&self) -> &DateTime<Tz> {
        &self.last_meal_time
    }

    /// Dose instants, earliest first
    pub fn doses(&self) -> &[DateTime<Tz>] {
        &self.doses
    }
}

impl<Tz: TimeZone> PartialEq for Schedule<Tz> {
    fn eq(&self, other: &Self) -> bool {
        self.patient_name == other.patient_name
            && self.procedure_date_time == other.procedure_date_time
            && self.last_meal_time == other.last_meal_time
            && self.doses == other.doses
    }
}

impl<Tz: TimeZone> Eq for Schedule<Tz> {}
