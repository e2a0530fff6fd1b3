//! What the front end is currently showing.
//!
//! `ViewState` is passed around explicitly. Each transition is a pure function
//! of its arguments and returns a fresh state; nothing is updated in place.

use crate::codec::{self, token_from_query};
use crate::error::DecodeError;
use crate::validation::{validate, RawScheduleInput, ValidationErrors};
use crate::{calculate_schedule, Schedule, ScheduleInput};
use chrono::TimeZone;

/// User-facing notice shown when a shared link cannot be opened
pub const INVALID_LINK_NOTICE: &str =
    "The shared schedule link is invalid. Please create a new one.";

/// Either nothing has been entered yet, or a schedule is on screen
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<Tz: TimeZone> {
    Empty,
    Showing {
        input: ScheduleInput,
        schedule: Schedule<Tz>,
        /// Link token for `input`
        token: String,
    },
}

/// Result of opening a URL: the new state, plus the decode failure if the
/// link was present but unusable
#[derive(Debug)]
pub struct Opened<Tz: TimeZone> {
    pub state: ViewState<Tz>,
    pub error: Option<DecodeError>,
}

impl<Tz: TimeZone> Opened<Tz> {
    /// Notice to show the user, if any
    pub fn notice(&self) -> Option<&'static str> {
        self.error.as_ref().map(|_| INVALID_LINK_NOTICE)
    }
}

impl<Tz: TimeZone> ViewState<Tz> {
    /// Compute and show the schedule for an already validated input
    pub fn show(input: ScheduleInput, tz: &Tz) -> Self {
        let schedule = calculate_schedule(&input, tz);
        let token = codec::encode(&input);
        ViewState::Showing {
            input,
            schedule,
            token,
        }
    }

    /// Handle a form submission. Times must already be 24-hour.
    pub fn submit(raw: &RawScheduleInput, tz: &Tz) -> Result<Self, ValidationErrors> {
        let input = validate(raw)?;
        Ok(Self::show(input, tz))
    }

    /// Rebuild the view from a query string or URL.
    ///
    /// No `data` parameter gives `Empty`. A bad token also gives `Empty`,
    /// with the failure reported alongside so the caller can show a notice.
    pub fn from_query(query_or_url: &str, tz: &Tz) -> Opened<Tz> {
        let Some(token) = token_from_query(query_or_url) else {
            return Opened {
                state: ViewState::Empty,
                error: None,
            };
        };

        match codec::decode(&token) {
            Ok(input) => Opened {
                state: Self::show(input, tz),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Failed to open shared schedule link: {}", e);
                Opened {
                    state: ViewState::Empty,
                    error: Some(e),
                }
            }
        }
    }

    pub fn reset() -> Self {
        ViewState::Empty
    }

    pub fn schedule(&self) -> Option<&Schedule<Tz>> {
        match self {
            ViewState::Empty => None,
            ViewState::Showing { schedule, .. } => Some(schedule),
        }
    }

    /// Query string for the current state; empty when nothing is shown
    pub fn query(&self) -> String {
        match self {
            ViewState::Empty => String::new(),
            ViewState::Showing { token, .. } => format!("?{}={}", codec::QUERY_PARAM, token),
        }
    }

    /// Values to pre-fill the form with, time in `h:mm AM|PM` form
    pub fn form_values(&self) -> Option<FormValues> {
        match self {
            ViewState::Empty => None,
            ViewState::Showing { input, .. } => Some(FormValues {
                patient_name: input.patient_name().to_string(),
                procedure_date: input.procedure_date().format("%Y-%m-%d").to_string(),
                procedure_time: crate::clock::to_12_hour(input.procedure_time()),
                sachets: input.sachets().as_choice().to_string(),
            }),
        }
    }
}

/// Form pre-fill values as the form widgets expect them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormValues {
    pub patient_name: String,
    pub procedure_date: String,
    pub procedure_time: String,
    pub sachets: String,
}
