//! Birthday command handler for contactbook
//!
//! Handles setting and showing birthdays and the upcoming birthdays report.

use super::{CommandArgs, CommandHandler, Reply, record_mut, title_case};
use crate::address_book::{AddressBook, BirthdayReport};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDate};

const ADD_BIRTHDAY_USAGE: &str = "add-birthday <name> <DD.MM.YYYY>";
const SHOW_BIRTHDAY_USAGE: &str = "show-birthday <name>";

#[derive(Debug)]
pub struct BirthdayHandler {
    window_days: u32,
    today: Option<NaiveDate>,
}

impl BirthdayHandler {
    pub fn new(window_days: u32) -> Self {
        Self { window_days, today: None }
    }

    /// Computes reports relative to a fixed date instead of the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn upcoming(&self, book: &AddressBook) -> String {
        if book.is_empty() {
            return "No contacts found in your book".to_string();
        }
        match book.upcoming_birthdays_within(self.today(), self.window_days) {
            BirthdayReport::Nobody => {
                format!("There is no one to congratulate in next {} days", self.window_days)
            }
            BirthdayReport::Upcoming(entries) => {
                let mut lines = vec![format!(
                    "Congratulations list for next {} days:",
                    self.window_days
                )];
                lines.extend(entries.iter().map(ToString::to_string));
                lines.join("\n")
            }
        }
    }
}

impl CommandHandler for BirthdayHandler {
    fn execute(&self, args: &CommandArgs, book: &mut AddressBook) -> Result<Reply> {
        let message = match args.command.as_str() {
            "add-birthday" | "add_birthday" => add_birthday(args, book)?,
            "show-birthday" | "show_birthday" => show_birthday(args, book)?,
            "birthdays" | "upcoming_birthdays" => self.upcoming(book),
            other => return Err(anyhow!("Unsupported birthday command: {}", other)),
        };
        Ok(Reply::Continue(message))
    }

    fn can_handle(&self, command: &str) -> bool {
        matches!(
            command,
            "add-birthday"
                | "add_birthday"
                | "show-birthday"
                | "show_birthday"
                | "birthdays"
                | "upcoming_birthdays"
        )
    }
}

fn add_birthday(args: &CommandArgs, book: &mut AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, ADD_BIRTHDAY_USAGE)?);
    let date = args.arg(1, ADD_BIRTHDAY_USAGE)?;
    record_mut(book, &name)?.set_birthday(date)?;
    Ok(format!("Birthday for {} was successfully updated", name))
}

fn show_birthday(args: &CommandArgs, book: &AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, SHOW_BIRTHDAY_USAGE)?);
    Ok(match book.find(&name) {
        Some(record) => match record.birthday() {
            Some(birthday) => format!("The birthday date of {} is {}", name, birthday),
            None => format!("There is no set birthday date for {}", name),
        },
        None => format!("There is no {} in your book, please add it first", name),
    })
}
