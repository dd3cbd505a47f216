//! In-memory address book: contact records keyed by name, plus the
//! upcoming-birthdays query.

use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;
use std::fmt;

mod birthdays;
mod fields;
mod record;

pub use birthdays::*;
pub use fields::*;
pub use record::*;

/// What a failed lookup was looking for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Contact,
    Phone,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Contact => write!(f, "Contact"),
            Entity::Phone => write!(f, "Phone number"),
        }
    }
}

/// Errors raised by address book operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookError {
    #[error("invalid {field} '{value}', expected {expected}")]
    InvalidFormat { field: &'static str, value: String, expected: &'static str },
    #[error("{entity} '{key}' not found")]
    NotFound { entity: Entity, key: String },
}

impl BookError {
    pub fn invalid<F: Field>(value: &str, expected: &'static str) -> Self {
        BookError::InvalidFormat { field: F::LABEL, value: value.to_string(), expected }
    }

    pub fn contact_not_found(name: &str) -> Self {
        BookError::NotFound { entity: Entity::Contact, key: name.to_string() }
    }

    pub fn phone_not_found(phone: &str) -> Self {
        BookError::NotFound { entity: Entity::Phone, key: phone.to_string() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    records: BTreeMap<String, Record>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the record under its name. An existing record with the same
    /// name is replaced and returned.
    pub fn add_record(&mut self, record: Record) -> Option<Record> {
        let key = record.name().value().to_string();
        debug!("Storing record '{}'", key);
        self.records.insert(key, record)
    }

    pub fn find(&self, name: &str) -> Option<&Record> {
        self.records.get(name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Record> {
        self.records.get_mut(name)
    }

    pub fn delete(&mut self, name: &str) -> Result<Record, BookError> {
        debug!("Deleting record '{}'", name);
        self.records.remove(name).ok_or_else(|| BookError::contact_not_found(name))
    }

    /// Records in ascending name order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Birthdays to congratulate within the next seven days
    pub fn upcoming_birthdays(&self, today: NaiveDate) -> BirthdayReport {
        self.upcoming_birthdays_within(today, DEFAULT_WINDOW_DAYS)
    }

    pub fn upcoming_birthdays_within(&self, today: NaiveDate, window_days: u32) -> BirthdayReport {
        birthdays::upcoming(self.records(), today, window_days)
    }
}

impl FromIterator<Record> for AddressBook {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut book = AddressBook::new();
        for record in iter {
            book.add_record(record);
        }
        book
    }
}
