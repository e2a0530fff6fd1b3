//! Language selection, translated labels and date/time formatting.

use crate::clock::to_12_hour;
use chrono::{DateTime, Datelike, Locale, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output language for labels and documents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

/// Fixed text shown next to schedule entries and in documents
#[derive(Debug)]
pub struct Labels {
    pub title: &'static str,
    pub patient: &'static str,
    pub procedure_on: &'static str,
    pub last_meal: &'static str,
    pub dose: &'static str,
    pub procedure: &'static str,
    pub last_meal_note: &'static str,
    pub dose_note: &'static str,
    pub procedure_note: &'static str,
    pub footer: &'static str,
}

static EN_LABELS: Labels = Labels {
    title: "Dosing Schedule",
    patient: "Patient",
    procedure_on: "Procedure on",
    last_meal: "Last Meal",
    dose: "Dose",
    procedure: "Procedure Time",
    last_meal_note: "A light, low-fiber meal. Avoid nuts, seeds, and high-fiber foods.",
    dose_note: "Mix sachet with water as instructed and drink over one hour.",
    procedure_note: "Arrive at the hospital/clinic as advised.",
    footer: "This schedule is for informational purposes. Always follow your doctor's instructions.",
};

static AR_LABELS: Labels = Labels {
    title: "جدول الجرعات",
    patient: "المريض",
    procedure_on: "الإجراء في",
    last_meal: "آخر وجبة",
    dose: "الجرعة",
    procedure: "وقت الإجراء",
    last_meal_note: "وجبة خفيفة قليلة الألياف. تجنب المكسرات والبذور والأطعمة الغنية بالألياف.",
    dose_note: "اخلط الكيس مع الماء حسب التعليمات واشربه خلال ساعة واحدة.",
    procedure_note: "احضر إلى المستشفى أو العيادة حسب التوجيهات.",
    footer: "هذا الجدول لأغراض إعلامية فقط. اتبع دائمًا تعليمات طبيبك.",
};

impl Language {
    pub const ALL: [Language; 2] = [Language::En, Language::Ar];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Right-to-left script
    pub fn is_rtl(self) -> bool {
        matches!(self, Language::Ar)
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Language::En => &EN_LABELS,
            Language::Ar => &AR_LABELS,
        }
    }

    /// Weekday, date and time, e.g. `Tuesday, June 10th at 9:00 AM`
    pub fn format_instant<Tz: TimeZone>(self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            Language::En => format!(
                "{}, {} {} at {}",
                at.format("%A"),
                at.format("%B"),
                ordinal(at.day()),
                to_12_hour(at.time())
            ),
            Language::Ar => at
                .format_localized("%A %-d %B، %-I:%M %p", Locale::ar_SA)
                .to_string(),
        }
    }

    /// Calendar date, e.g. `June 10th, 2025`
    pub fn format_date<Tz: TimeZone>(self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            Language::En => format!("{} {}, {}", at.format("%B"), ordinal(at.day()), at.year()),
            Language::Ar => at.format_localized("%-d %B %Y", Locale::ar_SA).to_string(),
        }
    }

    /// Time of day, e.g. `2:00 PM`
    pub fn format_time<Tz: TimeZone>(self, at: &DateTime<Tz>) -> String
    where
        Tz::Offset: fmt::Display,
    {
        match self {
            Language::En => to_12_hour(at.time()),
            Language::Ar => at.format_localized("%-I:%M %p", Locale::ar_SA).to_string(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            other => Err(format!("unsupported language {:?} (expected en or ar)", other)),
        }
    }
}

/// English ordinal day: 1st, 2nd, 3rd, 4th, 11th, 21st ...
pub(crate) fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}
