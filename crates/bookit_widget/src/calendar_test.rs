#[cfg(test)]
mod tests {
    use crate::availability::{AvailabilityIndex, MonthKey};
    use crate::calendar::{render_month, GRID_CELLS};
    use bookit_common::models::{DayAvailability, MonthAvailability, TimeSlot};
    use chrono::{Datelike, NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // Index with one slot on each of the given dates
    fn index_of(dates: &[NaiveDate]) -> AvailabilityIndex {
        let month: MonthAvailability = dates
            .iter()
            .map(|d| {
                let slot = TimeSlot {
                    time: format!("{}T10:00:00Z", d),
                    display: "10:00 AM".to_string(),
                };
                (*d, DayAvailability { date: *d, slots: vec![slot], count: 1 })
            })
            .collect();
        AvailabilityIndex::build(&month)
    }

    #[test]
    fn test_march_2024_grid_starts_on_last_sunday_of_february() {
        let cells = render_month(MonthKey::new(2024, 2), &AvailabilityIndex::default(), date(2024, 3, 1));

        assert_eq!(cells.len(), GRID_CELLS);
        // March 1st 2024 is a Friday
        assert_eq!(cells[0].date, date(2024, 2, 25));
        assert_eq!(cells[5].date, date(2024, 3, 1));
        assert_eq!(cells[41].date, date(2024, 4, 6));
        assert!(!cells[0].in_current_month);
        assert!(cells[5].in_current_month);
        assert!(!cells[41].in_current_month);
    }

    #[test]
    fn test_month_starting_on_sunday_has_no_leading_days() {
        // September 1st 2024 is a Sunday
        let cells = render_month(MonthKey::new(2024, 8), &AvailabilityIndex::default(), date(2024, 1, 1));
        assert_eq!(cells[0].date, date(2024, 9, 1));
        assert_eq!(cells[0].date.weekday(), Weekday::Sun);
    }

    #[test]
    fn test_only_current_future_available_cells_are_interactive() {
        let today = date(2024, 3, 10);
        let index = index_of(&[
            date(2024, 3, 5),  // past
            date(2024, 3, 10), // today
            date(2024, 3, 20),
            date(2024, 4, 2),  // next month, shown in trailing row
        ]);

        let cells = render_month(MonthKey::new(2024, 2), &index, today);
        let interactive: Vec<NaiveDate> = cells
            .iter()
            .filter(|c| c.is_interactive())
            .map(|c| c.date)
            .collect();

        assert_eq!(interactive, vec![date(2024, 3, 10), date(2024, 3, 20)]);

        let past = cells.iter().find(|c| c.date == date(2024, 3, 5)).unwrap();
        assert!(past.is_past && past.is_available && !past.is_interactive());
        let trailing = cells.iter().find(|c| c.date == date(2024, 4, 2)).unwrap();
        assert!(!trailing.in_current_month && !trailing.is_interactive());
    }

    #[test]
    fn test_render_is_idempotent() {
        let index = index_of(&[date(2024, 3, 5)]);
        let first = render_month(MonthKey::new(2024, 2), &index, date(2024, 3, 1));
        let second = render_month(MonthKey::new(2024, 2), &index, date(2024, 3, 1));
        assert_eq!(first, second);
    }
}
