use crate::address_book::{AddressBook, BookError, Entity, Record};
use crate::config::Config;
use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::fmt::Debug;

pub mod birthday_handler;
pub mod contact_handler;
pub mod exit_handler;
pub mod help_handler;

/// Name, usage line and description of a shell command
#[derive(Debug, Clone, Copy)]
pub struct CommandInfo {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: &[CommandInfo] = &[
    CommandInfo { name: "hello", usage: "hello", description: "Greet the user" },
    CommandInfo { name: "help", usage: "help", description: "Show all commands" },
    CommandInfo { name: "add", usage: "add <name> [phone]", description: "Add a contact or a phone to it" },
    CommandInfo { name: "change", usage: "change <name> <old phone> <new phone>", description: "Replace a contact's phone" },
    CommandInfo { name: "phone", usage: "phone <name>", description: "Show the contact's phone numbers" },
    CommandInfo { name: "remove-phone", usage: "remove-phone <name> <phone>", description: "Remove a phone from a contact" },
    CommandInfo { name: "all", usage: "all", description: "Show all contacts" },
    CommandInfo { name: "search", usage: "search <name>", description: "Search for a contact" },
    CommandInfo { name: "delete", usage: "delete <name>", description: "Delete a contact" },
    CommandInfo { name: "add-birthday", usage: "add-birthday <name> <DD.MM.YYYY>", description: "Add a birthday to a contact" },
    CommandInfo { name: "show-birthday", usage: "show-birthday <name>", description: "Show a contact's birthday" },
    CommandInfo { name: "birthdays", usage: "birthdays", description: "Show upcoming birthdays" },
    CommandInfo { name: "close", usage: "close", description: "Save and exit the application" },
    CommandInfo { name: "exit", usage: "exit", description: "Save and exit the application" },
];

/// Errors raised by the command layer itself
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("not enough arguments ({given} given), usage: {usage}")]
    MissingArguments { given: usize, usage: &'static str },
    #[error("missing closing quote")]
    UnterminatedQuote,
}

/// A parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    pub command: String,
    pub args: Vec<String>,
}

impl CommandArgs {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self { command: command.into(), args }
    }

    /// Splits a line into a lower-cased command and its arguments.
    /// Double quotes group words into one argument. Blank input gives `None`,
    /// a quote left open is an `UnterminatedQuote` error.
    pub fn parse(input: &str) -> Result<Option<Self>> {
        let normalized_input = input.replace('\u{a0}', " ");
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_quotes = false;

        for c in normalized_input.trim().chars() {
            match c {
                '"' => {
                    in_quotes = !in_quotes;
                    if !in_quotes && !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                }
                c if c.is_whitespace() && !in_quotes => {
                    if !current.is_empty() {
                        parts.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            }
        }
        if in_quotes {
            return Err(CommandError::UnterminatedQuote.into());
        }
        if !current.is_empty() {
            parts.push(current);
        }

        if parts.is_empty() {
            return Ok(None);
        }
        let command = parts.remove(0).to_lowercase();
        debug!("Parsed command: {:?}, args: {:?}", command, parts);
        Ok(Some(Self { command, args: parts }))
    }

    /// Argument at `index`, or a `MissingArguments` error carrying `usage`
    pub fn arg(&self, index: usize, usage: &'static str) -> Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| CommandError::MissingArguments { given: self.args.len(), usage }.into())
    }
}

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Continue(String),
    Exit(String),
}

impl Reply {
    pub fn message(&self) -> &str {
        match self {
            Reply::Continue(message) | Reply::Exit(message) => message,
        }
    }
}

pub trait CommandHandler: Debug {
    fn execute(&self, args: &CommandArgs, book: &mut AddressBook) -> Result<Reply>;
    fn can_handle(&self, command: &str) -> bool;
}

/// Capitalises the first letter of every word and lower-cases the rest
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut inside_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if inside_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            inside_word = true;
        } else {
            result.push(c);
            inside_word = false;
        }
    }
    result
}

pub(crate) fn record_mut<'a>(book: &'a mut AddressBook, name: &str) -> Result<&'a mut Record> {
    book.find_mut(name).ok_or_else(|| BookError::contact_not_found(name).into())
}

/// Turns a failed command into the message shown to the user
pub fn describe_error(err: &anyhow::Error) -> String {
    if let Some(book_err) = err.downcast_ref::<BookError>() {
        return match book_err {
            BookError::InvalidFormat { .. } => format!(
                "Wrong parameters are provided, please try again with valid data: {}",
                book_err
            ),
            BookError::NotFound { entity: Entity::Contact, .. } => "Contact not found.".to_string(),
            BookError::NotFound { .. } => format!("{}.", book_err),
        };
    }
    match err.downcast_ref::<CommandError>() {
        Some(CommandError::MissingArguments { given: 0, .. }) => return "Enter user name.".to_string(),
        Some(CommandError::MissingArguments { usage, .. }) => {
            return format!("Not enough arguments. Usage: {}", usage);
        }
        Some(CommandError::UnterminatedQuote) => {
            return "Wrong parameters are provided, a quoted argument is missing its closing quote.".to_string();
        }
        None => {}
    }
    format!("Error: {:#}", err)
}

#[derive(Debug)]
pub struct CommandProcessor {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl CommandProcessor {
    pub fn new(config: &Config) -> Self {
        Self::with_birthday_handler(birthday_handler::BirthdayHandler::new(
            config.birthdays.window_days,
        ))
    }

    /// Processor whose birthday report is computed relative to `today`
    pub fn with_fixed_date(config: &Config, today: NaiveDate) -> Self {
        Self::with_birthday_handler(
            birthday_handler::BirthdayHandler::new(config.birthdays.window_days).with_today(today),
        )
    }

    fn with_birthday_handler(birthdays: birthday_handler::BirthdayHandler) -> Self {
        let handlers: Vec<Box<dyn CommandHandler>> = vec![
            Box::new(contact_handler::ContactHandler),
            Box::new(birthdays),
            Box::new(help_handler::HelpHandler),
            Box::new(exit_handler::ExitHandler),
        ];
        Self { handlers }
    }

    /// Runs the command. Handler errors are turned into messages here, so
    /// every command reports failures the same way.
    pub fn execute(&self, args: &CommandArgs, book: &mut AddressBook) -> Reply {
        for handler in &self.handlers {
            if handler.can_handle(&args.command) {
                info!("Executing command '{}' with arguments: {:?}", args.command, args.args);
                return match handler.execute(args, book) {
                    Ok(reply) => {
                        debug!("Command '{}' executed successfully", args.command);
                        reply
                    }
                    Err(e) => {
                        debug!("Command '{}' failed: {:?}", args.command, e);
                        Reply::Continue(describe_error(&e))
                    }
                };
            }
        }
        warn!("Unrecognized command: {}", args.command);
        Reply::Continue("Invalid command.".to_string())
    }
}

impl Default for CommandProcessor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_parse_splits_and_lowercases_command() {
        let args = CommandArgs::parse("  ADD   alice 1234567890 ").unwrap().unwrap();
        assert_eq!(args, CommandArgs::new("add", vec!["alice".into(), "1234567890".into()]));
    }

    #[test]
    fn test_parse_groups_quoted_words() {
        let args = CommandArgs::parse("add \"mary ann\" 1234567890").unwrap().unwrap();
        assert_eq!(args.args, vec!["mary ann".to_string(), "1234567890".to_string()]);
    }

    #[test_case("add \"mary 1112223333" ; "open quote swallows the phone")]
    #[test_case("add mary\"" ; "trailing quote")]
    fn test_parse_rejects_unterminated_quote(input: &str) {
        let err = CommandArgs::parse(input).unwrap_err();
        assert!(matches!(err.downcast_ref::<CommandError>(), Some(CommandError::UnterminatedQuote)));
        assert_eq!(
            describe_error(&err),
            "Wrong parameters are provided, a quoted argument is missing its closing quote."
        );
    }

    #[test_case("" ; "empty")]
    #[test_case("   \t " ; "whitespace only")]
    fn test_parse_blank_input(input: &str) {
        assert_eq!(CommandArgs::parse(input).unwrap(), None);
    }

    #[test_case("alice", "Alice")]
    #[test_case("ALICE", "Alice")]
    #[test_case("mary ann", "Mary Ann")]
    #[test_case("o'neil", "O'Neil")]
    #[test_case("jean-luc", "Jean-Luc")]
    fn test_title_case(input: &str, expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_describe_book_errors() {
        let invalid = anyhow::Error::from(BookError::invalid::<crate::address_book::Phone>(
            "12",
            "exactly 10 digits",
        ));
        assert_eq!(
            describe_error(&invalid),
            "Wrong parameters are provided, please try again with valid data: invalid phone '12', expected exactly 10 digits"
        );

        let contact = anyhow::Error::from(BookError::contact_not_found("Zed"));
        assert_eq!(describe_error(&contact), "Contact not found.");

        let phone = anyhow::Error::from(BookError::phone_not_found("1112223333"));
        assert_eq!(describe_error(&phone), "Phone number '1112223333' not found.");
    }

    #[test]
    fn test_describe_missing_arguments() {
        let args = CommandArgs::new("phone", vec![]);
        let err = args.arg(0, "phone <name>").unwrap_err();
        assert_eq!(describe_error(&err), "Enter user name.");

        let args = CommandArgs::new("change", vec!["Alice".into()]);
        let err = args.arg(1, "change <name> <old phone> <new phone>").unwrap_err();
        assert_eq!(
            describe_error(&err),
            "Not enough arguments. Usage: change <name> <old phone> <new phone>"
        );
    }

    #[test]
    fn test_unknown_command() {
        let processor = CommandProcessor::default();
        let mut book = AddressBook::new();
        let reply = processor.execute(&CommandArgs::new("fly", vec![]), &mut book);
        assert_eq!(reply, Reply::Continue("Invalid command.".to_string()));
    }

    #[test]
    fn test_every_listed_command_has_a_handler() {
        let processor = CommandProcessor::default();
        for info in COMMANDS {
            assert!(
                processor.handlers.iter().any(|h| h.can_handle(info.name)),
                "no handler for '{}'",
                info.name
            );
        }
    }
}
