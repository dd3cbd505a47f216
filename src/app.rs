use crate::address_book::AddressBook;
use crate::command_processor::help_handler::help_text;
use crate::command_processor::{CommandArgs, CommandProcessor, Reply, describe_error};
use crate::completion::CommandCompleter;
use crate::config::Config;
use crate::storage::StateManager;
use anyhow::Result;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

pub struct Application {
    command_processor: CommandProcessor,
    state: StateManager,
    book: AddressBook,
}

impl Application {
    /// Loads the address book from `state`
    pub fn new(config: &Config, state: StateManager) -> Result<Self> {
        Self::with_processor(CommandProcessor::new(config), state)
    }

    pub fn with_processor(command_processor: CommandProcessor, state: StateManager) -> Result<Self> {
        let book = state.load()?;
        Ok(Self { command_processor, state, book })
    }

    pub fn book(&self) -> &AddressBook {
        &self.book
    }

    /// Runs one shell line. Blank lines give `None`.
    pub fn process_line(&mut self, line: &str) -> Option<Reply> {
        match CommandArgs::parse(line) {
            Ok(args) => args.map(|args| self.command_processor.execute(&args, &mut self.book)),
            Err(e) => {
                log::debug!("Rejected input {:?}: {}", line, e);
                Some(Reply::Continue(describe_error(&e)))
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.state.save(&self.book)
    }

    pub fn run(mut self) -> Result<()> {
        log::info!("Starting contactbook shell");

        let mut rl: Editor<CommandCompleter, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(CommandCompleter::new()));

        println!("Welcome to the assistant bot!");
        println!("{}", help_text());

        loop {
            match rl.readline("Enter a command: ") {
                Ok(line) => {
                    let Some(reply) = self.process_line(&line) else {
                        continue;
                    };
                    let _ = rl.add_history_entry(line.as_str());
                    println!("{}", reply.message());
                    if let Reply::Exit(_) = reply {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    log::error!("Failed to read input: {:?}", err);
                    break;
                }
            }
        }

        self.save()
    }
}
