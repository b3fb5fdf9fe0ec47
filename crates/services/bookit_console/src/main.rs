// File: services/bookit_console/src/main.rs
use bookit_common::{config_error, BookitError};
use bookit_config::{load_config, AppConfig};
use bookit_widget::calendar::WEEKDAY_LABELS;
use bookit_widget::{
    bootstrap, BookingWidget, Clock, DayCell, HttpBookingApi, MonthKey, NotificationCenter,
    Outcome, SystemClock,
};
use chrono::{Datelike, NaiveDate};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

/// `YYYY-MM` as given on the command line.
fn parse_month_arg(arg: &str) -> Option<MonthKey> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", arg), "%Y-%m-%d").ok()?;
    Some(MonthKey::from_date(first))
}

fn cell_label(cell: &DayCell) -> String {
    if !cell.in_current_month {
        "    ".to_string()
    } else if cell.is_interactive() {
        format!(" {:>2}*", cell.date.day())
    } else {
        format!(" {:>2} ", cell.date.day())
    }
}

fn print_grid(month: MonthKey, cells: &[DayCell]) {
    println!("\n📅 {}", month.label());
    println!("{}", WEEKDAY_LABELS.map(|d| format!("{:>4}", &d[..2])).join(""));
    for week in cells.chunks(7) {
        println!("{}", week.iter().map(cell_label).collect::<String>());
    }
    println!("  (* = bookable)");
}

async fn print_upcoming(widget: &BookingWidget, config: &AppConfig, today: NaiveDate) {
    let days = config.booking.days_to_check;
    match widget.cache.upcoming_available_dates(today, days).await {
        Ok(dates) if dates.is_empty() => println!("\nNo free slots in the next {} days.", days),
        Ok(dates) => {
            println!("\nNext available dates (next {} days):", days);
            for date in dates {
                let slots = widget
                    .cache
                    .get_month(MonthKey::from_date(date))
                    .await
                    .ok()
                    .and_then(|month| month.get(&date).map(|day| day.count))
                    .unwrap_or_default();
                println!("  {}  ({} slots)", date.format("%a %b %-d, %Y"), slots);
            }
        }
        Err(e) => println!("\n⚠️  {}", e.user_message()),
    }
}

async fn run() -> Result<(), BookitError> {
    let config = load_config().map_err(config_error)?;
    bookit_common::init_from_debug_flag(config.debug);

    let api = HttpBookingApi::from_config(&config.api)?;
    let clock = SystemClock::from_config(config.booking.time_zone.as_deref());
    let today = clock.today();
    let center = NotificationCenter::from_config(&config.notifications);

    println!("{} - {}", config.business.name, config.business.tagline);

    let widget = match bootstrap(&config, Arc::new(api), Arc::new(center.clone()), Arc::new(clock)).await {
        Ok(widget) => widget,
        Err(e) => {
            for notification in center.active() {
                eprintln!("❌ {}", notification.message);
            }
            return Err(e.into());
        }
    };

    if let Some(arg) = std::env::args().nth(1) {
        match parse_month_arg(&arg) {
            Some(month) => {
                if let Outcome::Ignored = widget.flow.show_month(month).await {
                    println!("{} is in the past, showing {}", month.label(), widget.flow.month().label());
                }
            }
            None => eprintln!("Ignoring month argument {:?}, expected YYYY-MM", arg),
        }
    }

    print_grid(widget.flow.month(), &widget.flow.calendar_cells());
    for notification in center.active() {
        println!("⚠️  {}", notification.message);
    }
    print_upcoming(&widget, &config, today).await;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Booking console stopped: {}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
