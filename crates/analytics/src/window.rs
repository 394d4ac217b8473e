use chrono::{Days, Months, NaiveDate};
use core_types::WindowType;
use serde::{Deserialize, Serialize};

/// An explicit date range derived from an event date and a window length.
///
/// Immutable once constructed; `start_date < end_date` always holds for any
/// positive length. Month arithmetic is calendar-based (chrono `Months`),
/// never a fixed 30-day block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub event_date: NaiveDate,
    pub window_type: WindowType,
    pub length_months: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl EventWindow {
    /// Derives the window bounds for one (event, type, length) combination:
    ///
    /// - `pre`: `[event − length, event − 1 day]`
    /// - `post`: `[event, event + length]`
    /// - `straddling`: `[event − length, event + length]`
    pub fn derive(event_date: NaiveDate, window_type: WindowType, length_months: u32) -> Self {
        let months = Months::new(length_months);
        let before = event_date
            .checked_sub_months(months)
            .expect("event date out of calendar range");
        let after = event_date
            .checked_add_months(months)
            .expect("event date out of calendar range");

        let (start_date, end_date) = match window_type {
            WindowType::Pre => (
                before,
                event_date
                    .checked_sub_days(Days::new(1))
                    .expect("event date out of calendar range"),
            ),
            WindowType::Post => (event_date, after),
            WindowType::Straddling => (before, after),
        };

        Self {
            event_date,
            window_type,
            length_months,
            start_date,
            end_date,
        }
    }

    /// The same bounds widened by `margin_months` calendar months on each
    /// side. Used when fetching a lower-frequency reference series so that
    /// forward-fill has a valid anchor value at the window boundaries.
    pub fn extended(&self, margin_months: u32) -> (NaiveDate, NaiveDate) {
        let margin = Months::new(margin_months);
        (
            self.start_date
                .checked_sub_months(margin)
                .expect("window start out of calendar range"),
            self.end_date
                .checked_add_months(margin)
                .expect("window end out of calendar range"),
        )
    }
}
