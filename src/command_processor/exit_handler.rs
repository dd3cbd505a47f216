//! Exit command handler for contactbook
//!
//! Handles close and exit commands. The shell saves the book before stopping.

use super::{CommandArgs, CommandHandler, Reply};
use crate::address_book::AddressBook;
use anyhow::Result;

#[derive(Debug)]
pub struct ExitHandler;

impl CommandHandler for ExitHandler {
    fn execute(&self, _args: &CommandArgs, _book: &mut AddressBook) -> Result<Reply> {
        Ok(Reply::Exit("Good bye!".to_string()))
    }
    fn can_handle(&self, command: &str) -> bool {
        command == "close" || command == "exit"
    }
}
