//! Tab completion of command names for the interactive shell.

use crate::command_processor::COMMANDS;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

#[derive(Debug)]
pub struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self { commands: COMMANDS.iter().map(|info| info.name).collect() }
    }

    /// Start of the word being completed and the matching command names.
    /// Only the first word of a line is completed.
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<&'static str>) {
        let before_cursor = &line[..pos];
        let start = before_cursor.len() - before_cursor.trim_start().len();
        let word = &before_cursor[start..];
        if word.contains(char::is_whitespace) {
            return (pos, Vec::new());
        }
        let word = word.to_lowercase();
        let matches = self.commands.iter().copied().filter(|name| name.starts_with(&word)).collect();
        (start, matches)
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(line, pos);
        let pairs = matches
            .into_iter()
            .map(|name| Pair { display: name.to_string(), replacement: format!("{} ", name) })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {}

impl Helper for CommandCompleter {}
