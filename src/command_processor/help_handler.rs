//! Help command handler for contactbook
//!
//! Handles the greeting and the command overview.
//
// # Examples
//
// ```
// let handler = HelpHandler;
// let args = CommandArgs::new("help", vec![]);
// handler.execute(&args, &mut book)?;
// ```

use super::{COMMANDS, CommandArgs, CommandHandler, Reply};
use crate::address_book::AddressBook;
use anyhow::Result;

#[derive(Debug)]
pub struct HelpHandler;

impl CommandHandler for HelpHandler {
    fn execute(&self, args: &CommandArgs, _book: &mut AddressBook) -> Result<Reply> {
        if args.command == "hello" {
            return Ok(Reply::Continue("How can I help you?".to_string()));
        }
        Ok(Reply::Continue(help_text()))
    }
    fn can_handle(&self, command: &str) -> bool {
        command == "hello" || command == "help"
    }
}

pub fn help_text() -> String {
    let rule = "=".repeat(70);
    let mut lines = vec![rule.clone(), "Personal Assistant - Available Commands".to_string(), rule.clone()];
    for info in COMMANDS {
        lines.push(format!("  {:<40} {}", info.usage, info.description));
    }
    lines.push(rule);
    lines.join("\n")
}
