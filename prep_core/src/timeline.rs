//! Display rows and share text derived from a `Schedule`.

use crate::text::Language;
use crate::Schedule;
use chrono::{DateTime, TimeZone};
use std::fmt;

/// What a timeline row stands for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineKind {
    LastMeal,
    /// 1-based dose number
    Dose(usize),
    Procedure,
}

/// One row of the displayed timeline
#[derive(Clone, Debug)]
pub struct TimelineEntry<Tz: TimeZone> {
    pub kind: TimelineKind,
    pub at: DateTime<Tz>,
}

impl<Tz: TimeZone> TimelineEntry<Tz> {
    pub fn title(&self, lang: Language) -> String {
        let labels = lang.labels();
        match self.kind {
            TimelineKind::LastMeal => labels.last_meal.to_string(),
            TimelineKind::Dose(n) => format!("{} {}", labels.dose, n),
            TimelineKind::Procedure => labels.procedure.to_string(),
        }
    }

    pub fn description(&self, lang: Language) -> &'static str {
        let labels = lang.labels();
        match self.kind {
            TimelineKind::LastMeal => labels.last_meal_note,
            TimelineKind::Dose(_) => labels.dose_note,
            TimelineKind::Procedure => labels.procedure_note,
        }
    }
}

/// Timeline rows in ascending time order: last meal, each dose, procedure
pub fn timeline<Tz: TimeZone>(schedule: &Schedule<Tz>) -> Vec<TimelineEntry<Tz>> {
    let mut entries = Vec::with_capacity(schedule.doses().len() + 2);

    entries.push(TimelineEntry {
        kind: TimelineKind::LastMeal,
        at: schedule.last_meal_time().clone(),
    });
    entries.extend(
        schedule
            .doses()
            .iter()
            .enumerate()
            .map(|(i, dose)| TimelineEntry {
                kind: TimelineKind::Dose(i + 1),
                at: dose.clone(),
            }),
    );
    entries.push(TimelineEntry {
        kind: TimelineKind::Procedure,
        at: schedule.procedure_date_time().clone(),
    });

    entries
}

/// Plain message text for sharing a schedule through chat or email
pub fn share_text<Tz: TimeZone>(schedule: &Schedule<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    let short = |at: &DateTime<Tz>| {
        format!(
            "{} @ {}",
            at.format("%A, %b %-d"),
            Language::En.format_time(at)
        )
    };

    let mut text = format!("Dosing Schedule for {}:\n\n", schedule.patient_name());
    text.push_str(&format!(
        "*Last Meal:* {}\n",
        short(schedule.last_meal_time())
    ));
    for (i, dose) in schedule.doses().iter().enumerate() {
        text.push_str(&format!("*Dose {}:* {}\n", i + 1, short(dose)));
    }
    text.push_str(&format!(
        "\n*Procedure Time:* {}\n\n",
        short(schedule.procedure_date_time())
    ));
    text.push_str("Please follow all instructions from your doctor.");
    text
}
