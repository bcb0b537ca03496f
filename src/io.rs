use std::fs;
use std::path::Path;

use crate::constants::*;
use crate::error::ParseError;

/// One simulator command, with arguments already range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `np <proc_num> <page_count>`
    NewProcess { proc_num: usize, page_count: usize },
    /// `pfm`
    PrintFreeMap,
    /// `ppt <proc_num>`
    PrintPageTable { proc_num: usize },
    /// `kp <proc_num>`
    KillProcess { proc_num: usize },
    /// `sb <proc_num> <virtual_address> <value>`
    StoreByte { proc_num: usize, va: usize, value: u8 },
    /// `lb <proc_num> <virtual_address>`
    LoadByte { proc_num: usize, va: usize },
}

/// Parse a whole token stream, left to right.
pub fn parse_commands<I, S>(tokens: I) -> Result<Vec<Command>, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = tokens.into_iter();
    let mut commands = Vec::new();

    while let Some(token) = tokens.next() {
        let mut args = Args { tokens: &mut tokens };
        let command = match token.as_ref() {
            "np" => Command::NewProcess {
                proc_num: args.proc_num("np")?,
                page_count: args.bounded("np", "page_count", PAGE_COUNT)?,
            },
            "pfm" => Command::PrintFreeMap,
            "ppt" => Command::PrintPageTable {
                proc_num: args.proc_num("ppt")?,
            },
            "kp" => Command::KillProcess {
                proc_num: args.proc_num("kp")?,
            },
            "sb" => Command::StoreByte {
                proc_num: args.proc_num("sb")?,
                va: args.virtual_address("sb")?,
                // Only the low byte is stored.
                value: args.integer("sb", "value")? as u8,
            },
            "lb" => Command::LoadByte {
                proc_num: args.proc_num("lb")?,
                va: args.virtual_address("lb")?,
            },
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };
        commands.push(command);
    }

    Ok(commands)
}

/// Read whitespace-separated command tokens from a script file.
pub fn read_commands<P: AsRef<Path>>(path: P) -> Result<Vec<Command>, ParseError> {
    let content = fs::read_to_string(path.as_ref()).map_err(|source| ParseError::ReadFile {
        path: path.as_ref().to_path_buf(),
        source,
    })?;
    let tokens = content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default())
        .flat_map(str::split_whitespace);
    parse_commands(tokens)
}

struct Args<'a, I> {
    tokens: &'a mut I,
}

impl<I, S> Args<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    fn integer(&mut self, command: &'static str, name: &'static str) -> Result<i64, ParseError> {
        let token = self
            .tokens
            .next()
            .ok_or(ParseError::MissingArgument { command, name })?;
        let token = token.as_ref();
        token.parse().map_err(|_| ParseError::InvalidInteger {
            command,
            name,
            token: token.to_string(),
        })
    }

    /// Integer in `0..=max`.
    fn bounded(&mut self, command: &'static str, name: &'static str, max: usize) -> Result<usize, ParseError> {
        let value = self.integer(command, name)?;
        usize::try_from(value)
            .ok()
            .filter(|&v| v <= max)
            .ok_or(ParseError::OutOfRange { command, name, value, max })
    }

    fn proc_num(&mut self, command: &'static str) -> Result<usize, ParseError> {
        self.bounded(command, "proc_num", MAX_PROCESSES - 1)
    }

    fn virtual_address(&mut self, command: &'static str) -> Result<usize, ParseError> {
        self.bounded(command, "virtual_address", VIRTUAL_SPACE_SIZE - 1)
    }
}
