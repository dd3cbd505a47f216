//! Validated values held by a contact record.
//
// Every field is trimmed of surrounding whitespace before validation.

use super::BookError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format used to read and render birthdays
pub const DATE_FORMAT: &str = "%d.%m.%Y";

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}\.[0-9]{2}\.[0-9]{4}$").unwrap());

/// A labeled value that can be built from raw user input
pub trait Field: FromStr<Err = BookError> + fmt::Display {
    const LABEL: &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl Field for Name {
    const LABEL: &'static str = "name";
}

impl FromStr for Name {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A phone number of exactly ten ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn new(raw: &str) -> Result<Self, BookError> {
        let value = raw.trim();
        if !PHONE_PATTERN.is_match(value) {
            return Err(BookError::invalid::<Phone>(raw, "exactly 10 digits"));
        }
        Ok(Self(value.to_string()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }

    /// Replaces the number in place. The old value is kept if `raw` is invalid.
    pub fn set_value(&mut self, raw: &str) -> Result<(), BookError> {
        *self = Self::new(raw)?;
        Ok(())
    }
}

impl Field for Phone {
    const LABEL: &'static str = "phone";
}

impl FromStr for Phone {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Phone {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Phone> for String {
    fn from(phone: Phone) -> Self {
        phone.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar date written as DD.MM.YYYY
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn new(raw: &str) -> Result<Self, BookError> {
        let value = raw.trim();
        if !DATE_PATTERN.is_match(value) {
            return Err(BookError::invalid::<Birthday>(raw, "DD.MM.YYYY"));
        }
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self)
            .map_err(|_| BookError::invalid::<Birthday>(raw, "a real calendar date"))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl Field for Birthday {
    const LABEL: &'static str = "birthday";
}

impl From<NaiveDate> for Birthday {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for Birthday {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Birthday {
    type Error = BookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Birthday> for String {
    fn from(birthday: Birthday) -> Self {
        birthday.to_string()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
