#[cfg(test)]
mod tests {
    use crate::availability::{AvailabilityIndex, MonthKey};
    use crate::calendar::{render_month, GRID_CELLS};
    use bookit_common::models::{DayAvailability, DaySlots, MonthAvailability, TimeSlot};
    use chrono::{Datelike, Days, NaiveDate, Weekday};
    use proptest::prelude::*;

    // Index built from day offsets into the month; odd offsets get no slots
    fn sparse_index(month: MonthKey, offsets: &[u32]) -> AvailabilityIndex {
        let data: MonthAvailability = offsets
            .iter()
            .map(|offset| {
                let date = month.first_day() + Days::new(u64::from(offset % month.days_in_month()));
                let slots = if offset % 2 == 0 {
                    vec![TimeSlot { time: format!("{}T10:00:00Z", date), display: "10:00 AM".to_string() }]
                } else {
                    Vec::new()
                };
                (date, DayAvailability::from_wire(date, DaySlots { slots, count: None }))
            })
            .collect();
        AvailabilityIndex::build(&data)
    }

    proptest! {
        // Test that every grid has 42 cells starting on a Sunday
        #[test]
        fn test_grid_shape(
            year in 1970..2100i32,
            month0 in 0..12u32,
            today_offset in 0..3650u64,
        ) {
            let month = MonthKey::new(year, month0);
            let today = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + Days::new(today_offset * 13);
            let cells = render_month(month, &AvailabilityIndex::default(), today);

            prop_assert_eq!(cells.len(), GRID_CELLS);
            prop_assert_eq!(cells[0].date.weekday(), Weekday::Sun);
            prop_assert!(cells[0].date <= month.first_day());
            prop_assert!(cells.windows(2).all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
            prop_assert_eq!(
                cells.iter().filter(|c| c.in_current_month).count() as u32,
                month.days_in_month()
            );
        }

        // Test that interactive cells are exactly current, not past and indexed
        #[test]
        fn test_interactive_cells_match_index(
            year in 2000..2050i32,
            month0 in 0..12u32,
            offsets in proptest::collection::vec(0..31u32, 0..20),
            today_day in 0..40u64,
        ) {
            let month = MonthKey::new(year, month0);
            let index = sparse_index(month, &offsets);
            let today = month.first_day() + Days::new(today_day);
            let cells = render_month(month, &index, today);

            for cell in &cells {
                let expected = month.contains(cell.date) && cell.date >= today && index.contains(cell.date);
                prop_assert_eq!(cell.is_interactive(), expected);
            }
            prop_assert_eq!(cells, render_month(month, &index, today));
        }
    }
}
