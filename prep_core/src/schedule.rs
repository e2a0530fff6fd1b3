//! Dose schedule calculation.
//!
//! Everything is chained backward from the procedure time:
//! - Last dose: 5 hours before the procedure
//! - Each earlier dose: 3 hours before the next one
//! - Last meal: 3 hours before the first dose
//!
//! The offsets are clinical constants. All arithmetic is done on absolute
//! instants, so day boundaries and DST transitions keep exact spacing.

use crate::{Schedule, ScheduleInput};
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone};

/// Hours between the last dose and the procedure
pub const LAST_DOSE_LEAD_HOURS: i64 = 5;

/// Hours between consecutive doses, and between last meal and first dose
pub const DOSE_INTERVAL_HOURS: i64 = 3;

/// Compute the dosing schedule for a validated input.
///
/// The wall-clock procedure date and time are anchored in `tz`. This never
/// fails: invalid input is rejected by [`crate::validate`] before it gets here.
pub fn calculate_schedule<Tz: TimeZone>(input: &ScheduleInput, tz: &Tz) -> Schedule<Tz> {
    let local = input.procedure_date().and_time(input.procedure_time());
    let procedure = resolve_local(tz, local);

    let count = input.sachets().get();
    let interval = Duration::hours(DOSE_INTERVAL_HOURS);

    let last_dose = procedure.clone() - Duration::hours(LAST_DOSE_LEAD_HOURS);
    let mut doses = vec![last_dose; count];
    for i in (0..count - 1).rev() {
        doses[i] = doses[i + 1].clone() - interval;
    }

    let last_meal = doses[0].clone() - interval;
    doses.sort();

    tracing::debug!(
        sachets = count,
        procedure = %procedure.naive_local(),
        first_dose = %doses[0].naive_local(),
        "Calculated dosing schedule"
    );

    Schedule::new(
        input.patient_name().to_string(),
        procedure,
        last_meal,
        doses,
    )
}

/// Anchor a wall-clock time in `tz`.
///
/// An ambiguous time (clocks going back) takes the earlier instant. A time
/// skipped by clocks going forward is read with the offset in force before
/// the jump, which lands it after the gap.
fn resolve_local<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before_gap = tz.offset_from_utc_datetime(&(local - Duration::days(1)));
            let utc = local - Duration::seconds(i64::from(before_gap.fix().local_minus_utc()));
            tracing::debug!(%local, "Procedure time falls in a DST gap, moving forward");
            tz.from_utc_datetime(&utc)
        }
    }
}
