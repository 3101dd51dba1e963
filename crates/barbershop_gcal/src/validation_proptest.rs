#[cfg(test)]
mod tests {
    use crate::catalog::{free_slots, parse_slot, SLOT_CATALOG};
    use crate::logic::reservation_id;
    use crate::validation::{check_date, check_slot, DateRejection};
    use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
    use proptest::prelude::*;
    use std::collections::HashSet;

    // Any date between 2024-01-01 and roughly 2035.
    fn base_date(offset_days: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset_days)
    }

    fn catalog_time(index: usize) -> NaiveTime {
        parse_slot(SLOT_CATALOG[index % SLOT_CATALOG.len()]).unwrap()
    }

    fn check_booking(
        date: NaiveDate,
        time: NaiveTime,
        now: NaiveDateTime,
        horizon_days: i64,
    ) -> Result<(), DateRejection> {
        check_date(date, now.date(), horizon_days)?;
        check_slot(date, time, now)
    }

    fn next_sunday_on_or_after(date: NaiveDate) -> NaiveDate {
        let days = (7 - date.weekday().num_days_from_sunday() as i64) % 7;
        date + Duration::days(days)
    }

    proptest! {
        // Sundays are never bookable, whatever the time and however far ahead
        #[test]
        fn test_sunday_always_rejected(
            today_offset in 0..4000i64,
            weeks_ahead in 0..10i64,
            slot in 0..10usize,
            minute_of_day in 0..1440u32,
            requested_minute in 0..1440u32,
        ) {
            let today = base_date(today_offset);
            let now = NaiveDateTime::new(
                today,
                NaiveTime::from_hms_opt(minute_of_day / 60, minute_of_day % 60, 0).unwrap(),
            );
            let sunday = next_sunday_on_or_after(today) + Duration::weeks(weeks_ahead);
            prop_assert_eq!(sunday.weekday(), Weekday::Sun);

            let result = check_booking(sunday, catalog_time(slot), now, 30);
            prop_assert_eq!(result, Err(DateRejection::Sunday));

            // off-catalog times such as 09:30 or 13:00 get the Sunday answer too
            let requested =
                NaiveTime::from_hms_opt(requested_minute / 60, requested_minute % 60, 0).unwrap();
            let result = check_booking(sunday, requested, now, 30);
            prop_assert_eq!(result, Err(DateRejection::Sunday));
        }

        // For today, a slot at or before the clock is rejected and a later one accepted
        #[test]
        fn test_today_splits_on_current_time(
            today_offset in 0..4000i64,
            slot in 0..10usize,
            minute_of_day in 0..1440u32,
        ) {
            let today = base_date(today_offset);
            prop_assume!(today.weekday() != Weekday::Sun);
            let clock = NaiveTime::from_hms_opt(minute_of_day / 60, minute_of_day % 60, 0).unwrap();
            let now = NaiveDateTime::new(today, clock);
            let time = catalog_time(slot);

            let result = check_booking(today, time, now, 30);
            if time <= clock {
                prop_assert_eq!(result, Err(DateRejection::PastSlot));
            } else {
                prop_assert_eq!(result, Ok(()));
            }
        }

        // Open days inside the horizon pass the date rules, days after it never do
        #[test]
        fn test_horizon_boundary(
            today_offset in 0..4000i64,
            days_ahead in 0..60i64,
            horizon in 1..45i64,
        ) {
            let today = base_date(today_offset);
            let date = today + Duration::days(days_ahead);
            prop_assume!(date.weekday() != Weekday::Sun);

            let result = check_date(date, today, horizon);
            if days_ahead <= horizon {
                prop_assert_eq!(result, Ok(()));
            } else {
                prop_assert_eq!(result, Err(DateRejection::BeyondHorizon { horizon_days: horizon }));
            }
        }

        // Free slots are a catalog subset that never contains an occupied label
        #[test]
        fn test_free_slots_subset_of_catalog(
            occupied_indices in proptest::collection::vec(0..12usize, 0..10),
        ) {
            let occupied: HashSet<String> = occupied_indices
                .iter()
                .map(|i| SLOT_CATALOG.get(*i).map_or("13:00", |s| *s).to_string())
                .collect();

            let free = free_slots(&occupied);
            for slot in &free {
                prop_assert!(SLOT_CATALOG.contains(slot));
                prop_assert!(!occupied.contains(*slot));
            }
            let catalog_occupied = SLOT_CATALOG.iter().filter(|s| occupied.contains(**s)).count();
            prop_assert_eq!(free.len() + catalog_occupied, SLOT_CATALOG.len());
        }

        // Reservation ids stay inside the calendar's accepted id alphabet
        #[test]
        fn test_reservation_id_alphabet(
            hairdresser in "\\PC{1,20}",
            day_offset in 0..4000i64,
            slot in 0..10usize,
        ) {
            let id = reservation_id(&hairdresser, base_date(day_offset), catalog_time(slot));
            prop_assert!(id.len() >= 5 && id.len() <= 1024);
            prop_assert!(id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        }
    }
}
