//! Property tests for the dose calculator and the link codec.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use prep_core::validation::Field;
use prep_core::{
    calculate_schedule, decode, encode, validate, RawScheduleInput, SachetCount, ScheduleInput,
};
use proptest::prelude::*;

fn sachets() -> impl Strategy<Value = SachetCount> {
    prop_oneof![
        Just(SachetCount::Two),
        Just(SachetCount::Three),
        Just(SachetCount::Four),
    ]
}

fn patient_name() -> impl Strategy<Value = String> {
    "[A-Za-z\u{0621}-\u{064A} .'-]{2,50}"
}

prop_compose! {
    fn schedule_input()(
        name in patient_name(),
        days in 0i64..(365 * 30),
        slot in 0u32..48,
        sachets in sachets(),
    ) -> ScheduleInput {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(days);
        let time = NaiveTime::from_hms_opt(slot / 2, (slot % 2) * 30, 0).unwrap();
        ScheduleInput::new(name, date, time, sachets).unwrap()
    }
}

fn check_offsets<Tz: TimeZone>(input: &ScheduleInput, tz: &Tz) {
    let schedule = calculate_schedule(input, tz);
    let doses = schedule.doses();
    let n = input.sachets().get();

    assert_eq!(doses.len(), n);
    assert_eq!(
        schedule.procedure_date_time().clone() - doses[n - 1].clone(),
        Duration::hours(5)
    );
    for pair in doses.windows(2) {
        assert_eq!(pair[1].clone() - pair[0].clone(), Duration::hours(3));
    }
    assert_eq!(
        doses[0].clone() - schedule.last_meal_time().clone(),
        Duration::hours(3)
    );

    assert!(schedule.last_meal_time() < &doses[0]);
    assert!(doses.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(&doses[n - 1] < schedule.procedure_date_time());
}

proptest! {
    #[test]
    fn offsets_hold_in_utc(input in schedule_input()) {
        check_offsets(&input, &Utc);
    }

    #[test]
    fn offsets_hold_across_dst(input in schedule_input()) {
        check_offsets(&input, &chrono_tz::Europe::London);
        check_offsets(&input, &chrono_tz::America::New_York);
        check_offsets(&input, &chrono_tz::Australia::Lord_Howe);
    }

    #[test]
    fn procedure_keeps_wall_clock_in_utc(input in schedule_input()) {
        let schedule = calculate_schedule(&input, &Utc);
        prop_assert_eq!(
            schedule.procedure_date_time().naive_utc(),
            input.procedure_date().and_time(input.procedure_time())
        );
    }

    #[test]
    fn calculation_is_deterministic(input in schedule_input()) {
        prop_assert_eq!(
            calculate_schedule(&input, &chrono_tz::Asia::Riyadh),
            calculate_schedule(&input, &chrono_tz::Asia::Riyadh)
        );
    }

    #[test]
    fn link_roundtrip(input in schedule_input()) {
        let decoded = decode(&encode(&input)).unwrap();
        prop_assert_eq!(&decoded, &input);
        prop_assert_eq!(
            calculate_schedule(&decoded, &Utc),
            calculate_schedule(&input, &Utc)
        );
    }

    #[test]
    fn arbitrary_tokens_never_panic(token in "\\PC{0,80}") {
        let _ = decode(&token);
    }

    #[test]
    fn every_violation_is_reported(
        short_name in "[a-z]?",
        sachets in "[015-9]",
        date in "[0-9]{4}-1[3-9]-[0-9]{2}",
    ) {
        let raw = RawScheduleInput {
            patient_name: Some(short_name),
            procedure_date: Some(date),
            procedure_time: Some("14:00".into()),
            sachets: Some(sachets),
        };
        let errors = validate(&raw).unwrap_err();
        prop_assert_eq!(errors.len(), 3);
        prop_assert!(errors.has(Field::PatientName));
        prop_assert!(errors.has(Field::ProcedureDate));
        prop_assert!(errors.has(Field::Sachets));
        prop_assert!(!errors.has(Field::ProcedureTime));
    }
}
