//! Upcoming birthday scheduling.
//!
//! A birthday is projected onto the current year (or the next one when it has
//! already passed), moved off the weekend to the following Monday and kept if
//! the resulting congratulation date is at most `window_days` away.

use super::{Birthday, Record, DATE_FORMAT};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use log::{debug, warn};
use std::fmt;

/// Length of the default look-ahead window, in days
pub const DEFAULT_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    pub name: String,
    pub birthday: Birthday,
    pub congratulation_date: NaiveDate,
}

impl fmt::Display for UpcomingBirthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> congratulate on {}",
            self.name,
            self.birthday,
            self.congratulation_date.format(DATE_FORMAT)
        )
    }
}

/// Result of the upcoming birthdays query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BirthdayReport {
    /// Nobody to congratulate inside the window
    Nobody,
    /// Sorted by congratulation date, then by name
    Upcoming(Vec<UpcomingBirthday>),
}

impl BirthdayReport {
    pub fn entries(&self) -> &[UpcomingBirthday] {
        match self {
            BirthdayReport::Nobody => &[],
            BirthdayReport::Upcoming(entries) => entries,
        }
    }
}

/// Month and day of `birthday` in `year`. Feb 29 falls back to Feb 28 in a
/// common year.
pub fn project_onto_year(birthday: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day()).or_else(|| {
        if birthday.month() == 2 && birthday.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// First anniversary of `birthday` on or after `today`
pub fn next_occurrence(birthday: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    let this_year = project_onto_year(birthday, today.year())?;
    if this_year < today {
        project_onto_year(birthday, today.year() + 1)
    } else {
        Some(this_year)
    }
}

/// Moves Saturday and Sunday to the following Monday
pub fn congratulation_date(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.checked_add_days(Days::new(2)),
        Weekday::Sun => date.checked_add_days(Days::new(1)),
        _ => Some(date),
    }
}

pub(crate) fn upcoming<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    today: NaiveDate,
    window_days: u32,
) -> BirthdayReport {
    let window = i64::from(window_days);
    let mut upcoming: Vec<UpcomingBirthday> = records
        .into_iter()
        .filter_map(|record| {
            let birthday = *record.birthday()?;
            let Some(date) = next_occurrence(birthday.date(), today).and_then(congratulation_date)
            else {
                warn!("Cannot schedule birthday {} of '{}'", birthday, record.name());
                return None;
            };
            let days_until = (date - today).num_days();
            debug!("'{}' is congratulated on {} ({} days)", record.name(), date, days_until);
            (0..=window).contains(&days_until).then(|| UpcomingBirthday {
                name: record.name().value().to_string(),
                birthday,
                congratulation_date: date,
            })
        })
        .collect();

    if upcoming.is_empty() {
        return BirthdayReport::Nobody;
    }
    upcoming.sort_by(|a, b| {
        a.congratulation_date.cmp(&b.congratulation_date).then_with(|| a.name.cmp(&b.name))
    });
    BirthdayReport::Upcoming(upcoming)
}
