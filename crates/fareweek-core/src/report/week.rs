//! Sunday-based week bucketing.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::models::trip::TripRecord;

/// Days in a report week.
pub const DAYS_PER_WEEK: usize = 7;

/// Trips of one Sunday-to-Saturday week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekBucket {
    /// The Sunday the week starts on.
    pub start: NaiveDate,
    /// Trips ordered by date, then time.
    pub trips: Vec<TripRecord>,
}

impl WeekBucket {
    /// The Saturday the week ends on.
    pub fn end(&self) -> NaiveDate {
        week_end(self.start)
    }

    /// Fare totals per day, Sunday first.
    pub fn daily_totals(&self) -> [Decimal; DAYS_PER_WEEK] {
        daily_totals(self.start, &self.trips)
    }
}

/// Zero-based day of the week with Sunday = 0 and Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_sunday() as usize
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(weekday_index(date) as i64)
}

/// The Saturday six days after `start`.
pub fn week_end(start: NaiveDate) -> NaiveDate {
    start + Duration::days(DAYS_PER_WEEK as i64 - 1)
}

/// Partition trips into week buckets, ascending by week start.
pub fn group_weeks(mut trips: Vec<TripRecord>) -> Vec<WeekBucket> {
    trips.sort_by_key(|t| (t.date, t.time));

    let mut buckets: Vec<WeekBucket> = Vec::new();
    for trip in trips {
        let start = week_start(trip.date);
        match buckets.last_mut() {
            Some(bucket) if bucket.start == start => bucket.trips.push(trip),
            _ => buckets.push(WeekBucket {
                start,
                trips: vec![trip],
            }),
        }
    }
    buckets
}

/// Sum the fares falling on each of the 7 days starting at `start`.
///
/// Trips outside the week are ignored.
pub fn daily_totals(start: NaiveDate, trips: &[TripRecord]) -> [Decimal; DAYS_PER_WEEK] {
    let mut totals = [Decimal::ZERO; DAYS_PER_WEEK];
    for trip in trips {
        let offset = (trip.date - start).num_days();
        if (0..DAYS_PER_WEEK as i64).contains(&offset) {
            totals[offset as usize] += trip.fare;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn trip(date: NaiveDate, hour: u32, fare: &str) -> TripRecord {
        TripRecord::new(
            date,
            NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            Decimal::from_str(fare).unwrap(),
            "",
        )
    }

    #[test]
    fn test_weekday_index() {
        assert_eq!(weekday_index(day(2024, 1, 7)), 0); // Sunday
        assert_eq!(weekday_index(day(2024, 1, 8)), 1);
        assert_eq!(weekday_index(day(2024, 1, 13)), 6); // Saturday
    }

    #[test]
    fn test_week_grouping_scenario() {
        let trips = vec![
            trip(day(2024, 1, 14), 9, "1.00"),
            trip(day(2024, 1, 10), 9, "1.00"),
            trip(day(2024, 1, 13), 9, "1.00"),
            trip(day(2024, 1, 7), 9, "1.00"),
        ];

        let buckets = group_weeks(trips);
        assert_eq!(buckets.len(), 2);

        assert_eq!(buckets[0].start, day(2024, 1, 7));
        let dates: Vec<_> = buckets[0].trips.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![day(2024, 1, 7), day(2024, 1, 10), day(2024, 1, 13)]);

        assert_eq!(buckets[1].start, day(2024, 1, 14));
        assert_eq!(buckets[1].trips.len(), 1);
    }

    #[test]
    fn test_empty_input_no_buckets() {
        assert!(group_weeks(Vec::new()).is_empty());
    }

    #[test]
    fn test_every_trip_inside_its_bucket() {
        let mut trips = Vec::new();
        let mut date = day(2023, 12, 20);
        for i in 0..40 {
            trips.push(trip(date, (i % 12) + 1, "2.50"));
            date = date + Duration::days((i % 3) as i64 + 1);
        }

        let buckets = group_weeks(trips);
        for bucket in &buckets {
            assert_eq!(bucket.start.weekday(), Weekday::Sun);
            for t in &bucket.trips {
                assert!(t.date >= bucket.start && t.date <= bucket.end());
            }
        }
        for pair in buckets.windows(2) {
            assert!(pair[0].start < pair[1].start);
        }
    }

    #[test]
    fn test_same_day_trips_ordered_by_time() {
        let buckets = group_weeks(vec![trip(day(2024, 1, 9), 17, "1.00"), trip(day(2024, 1, 9), 8, "1.00")]);
        let hours: Vec<_> = buckets[0].trips.iter().map(|t| t.time).collect();
        assert_eq!(
            hours,
            vec![NaiveTime::from_hms_opt(8, 0, 0).unwrap(), NaiveTime::from_hms_opt(17, 0, 0).unwrap()]
        );
    }

    #[test]
    fn test_wednesday_fare_vector() {
        let start = day(2024, 1, 7);
        let totals = daily_totals(start, &[trip(day(2024, 1, 10), 9, "12.34")]);

        let mut expected = [Decimal::ZERO; DAYS_PER_WEEK];
        expected[3] = Decimal::from_str("12.34").unwrap();
        assert_eq!(totals, expected);
    }

    #[test]
    fn test_same_day_fares_summed() {
        let start = day(2024, 1, 7);
        let totals = daily_totals(
            start,
            &[trip(day(2024, 1, 8), 9, "10.00"), trip(day(2024, 1, 8), 18, "5.25")],
        );
        assert_eq!(totals[1], Decimal::from_str("15.25").unwrap());
    }

    #[test]
    fn test_week_end() {
        assert_eq!(week_end(day(2024, 1, 28)), day(2024, 2, 3));
    }
}
