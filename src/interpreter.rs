use crate::builtin::{BuiltinTable, builtins};
use crate::command::{ExecutableCommand, Io, Status};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::reader::LineReader;
use crate::tokenizer::tokenize;
use anyhow::Result;
use std::io::BufRead;

/// Prompt printed before each line is read.
pub const DEFAULT_PROMPT: &str = "> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only support commands defined in this crate.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that can execute built-in and external commands.
///
/// Every line goes through the same cycle: read it, split it into words,
/// then run either the matching builtin or an external program.
///
/// Example
/// ```
/// use lsh::Interpreter;
/// use lsh::command::{Io, Status};
///
/// let mut sh = Interpreter::default();
/// let (mut out, mut err) = (Vec::new(), Vec::new());
/// let mut io = Io::new(&mut out, &mut err);
/// let status = sh.dispatch(&["exit"], &mut io).unwrap();
/// assert_eq!(status, Status::Stop);
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: &'static BuiltinTable,
    prompt: String,
}

impl Interpreter {
    /// Create a new interpreter around a builtin table.
    pub fn new(builtins: &'static BuiltinTable) -> Self {
        Self {
            env: Environment::new(),
            builtins,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run one tokenized command line.
    ///
    /// An empty line does nothing. Otherwise the builtins are scanned in
    /// order for an exact name match and the line falls through to an
    /// external program when none matches.
    pub fn dispatch(&mut self, argv: &[&str], io: &mut Io<'_>) -> Result<Status> {
        if argv.is_empty() {
            return Ok(Status::Continue);
        }
        let cmd: Box<dyn ExecutableCommand> = match self.builtins.try_create(argv) {
            Some(cmd) => cmd,
            None => match ExternalCommand::from_tokens(argv) {
                Some(cmd) => Box::new(cmd),
                None => return Ok(Status::Continue),
            },
        };
        cmd.execute(io, &mut self.env)
    }

    /// Read-eval loop: prompt, read, tokenize, dispatch until `exit` or end of input.
    ///
    /// Returns `Ok(())` on a clean stop. Failing to read input, or to grow the
    /// line buffer, is returned as an error and ends the loop.
    pub fn repl<R: BufRead>(&mut self, reader: &mut LineReader<R>, io: &mut Io<'_>) -> Result<()> {
        loop {
            write!(io.stdout, "{}", self.prompt)?;
            io.stdout.flush()?;

            let line = match reader.read_line() {
                Ok(line) => line,
                Err(e) if !e.is_fatal() => return Ok(()),
                Err(e) => return Err(e.into()),
            };
            let tokens = tokenize(&line);
            let status = match self.dispatch(tokens.as_slice(), io) {
                Ok(status) => status,
                Err(e) => {
                    writeln!(io.stderr, "lsh: {e:#}")?;
                    Status::Continue
                }
            };
            if status.is_stop() {
                return Ok(());
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter over the process-wide builtin table.
    fn default() -> Self {
        Self::new(builtins())
    }
}
