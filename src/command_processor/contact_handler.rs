//! Contact command handler for contactbook
//!
//! Handles adding, changing, listing, searching and deleting contacts.
//
// # Examples
//
// ```
// let handler = ContactHandler;
// let args = CommandArgs::new("add", vec!["alice".to_string(), "1234567890".to_string()]);
// handler.execute(&args, &mut book)?;
// ```

use super::{CommandArgs, CommandHandler, Reply, record_mut, title_case};
use crate::address_book::{AddressBook, Phone, Record};
use anyhow::{Result, anyhow};

const ADD_USAGE: &str = "add <name> [phone]";
const CHANGE_USAGE: &str = "change <name> <old phone> <new phone>";
const PHONE_USAGE: &str = "phone <name>";
const REMOVE_PHONE_USAGE: &str = "remove-phone <name> <phone>";
const SEARCH_USAGE: &str = "search <name>";
const DELETE_USAGE: &str = "delete <name>";

#[derive(Debug)]
pub struct ContactHandler;

impl CommandHandler for ContactHandler {
    fn execute(&self, args: &CommandArgs, book: &mut AddressBook) -> Result<Reply> {
        let message = match args.command.as_str() {
            "add" | "add_contact" => add_contact(args, book)?,
            "change" | "change_contact" => change_contact(args, book)?,
            "phone" => show_phone(args, book)?,
            "remove-phone" | "remove_phone" => remove_phone(args, book)?,
            "all" | "all_contacts" => show_all(book),
            "search" | "search_contact" => search_contact(args, book)?,
            "delete" | "delete_contact" => delete_contact(args, book)?,
            other => return Err(anyhow!("Unsupported contact command: {}", other)),
        };
        Ok(Reply::Continue(message))
    }

    fn can_handle(&self, command: &str) -> bool {
        matches!(
            command,
            "add"
                | "add_contact"
                | "change"
                | "change_contact"
                | "phone"
                | "remove-phone"
                | "remove_phone"
                | "all"
                | "all_contacts"
                | "search"
                | "search_contact"
                | "delete"
                | "delete_contact"
        )
    }
}

fn add_contact(args: &CommandArgs, book: &mut AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, ADD_USAGE)?);
    // Validate before touching the book so a bad phone adds nothing
    let phone = args.args.get(1).map(|raw| Phone::new(raw)).transpose()?;

    let message = if book.find(&name).is_some() {
        "Contact updated"
    } else {
        book.add_record(Record::new(&name));
        "Contact added"
    };
    if let Some(phone) = phone {
        record_mut(book, &name)?.add_phone(phone.value())?;
    }
    Ok(message.to_string())
}

fn change_contact(args: &CommandArgs, book: &mut AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, CHANGE_USAGE)?);
    let old_phone = args.arg(1, CHANGE_USAGE)?;
    let new_phone = args.arg(2, CHANGE_USAGE)?;
    record_mut(book, &name)?.edit_phone(old_phone, new_phone)?;
    Ok("Contact updated".to_string())
}

fn show_phone(args: &CommandArgs, book: &AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, PHONE_USAGE)?);
    let Some(record) = book.find(&name) else {
        return Ok(format!("There is no {} in your book, please add it first", name));
    };
    if record.phones().is_empty() {
        return Ok(format!("{} doesn't have any phones yet", name));
    }
    let phones: Vec<&str> = record.phones().iter().map(Phone::value).collect();
    Ok(format!("Available phone(s) for {}: {}", record.name(), phones.join("; ")))
}

fn remove_phone(args: &CommandArgs, book: &mut AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, REMOVE_PHONE_USAGE)?);
    let phone = args.arg(1, REMOVE_PHONE_USAGE)?;
    record_mut(book, &name)?.remove_phone(phone)?;
    Ok("Phone removed".to_string())
}

fn show_all(book: &AddressBook) -> String {
    if book.is_empty() {
        return "No contacts found".to_string();
    }
    book.records().map(Record::to_string).collect::<Vec<_>>().join("\n")
}

fn search_contact(args: &CommandArgs, book: &AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, SEARCH_USAGE)?);
    Ok(match book.find(&name) {
        Some(record) => format!("Here is what you have in your book -> {}", record),
        None => "There is no such contact in your book".to_string(),
    })
}

fn delete_contact(args: &CommandArgs, book: &mut AddressBook) -> Result<String> {
    let name = title_case(args.arg(0, DELETE_USAGE)?);
    book.delete(&name)?;
    Ok("Contact deleted".to_string())
}
