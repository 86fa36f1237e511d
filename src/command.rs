use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// What the read-eval loop should do after a command finished.
///
/// The numeric form follows the classic convention of the loop's control
/// value: `0` stops the loop, anything else keeps it running. Builtins and
/// external commands share this single contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Status {
    /// Terminate the read-eval loop.
    Stop = 0,
    /// Prompt for the next line.
    Continue = 1,
}

impl Status {
    pub fn is_stop(self) -> bool {
        self == Status::Stop
    }
}

/// Output streams handed to a running command.
///
/// Data goes to `stdout`, usage and error diagnostics go to `stderr`.
pub struct Io<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Io<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    fn execute(self: Box<Self>, io: &mut Io<'_>, env: &mut Environment) -> Result<Status>;
}

/// Factory that tries to create a command from a full token sequence.
///
/// `argv[0]` is the command name. Returns `None` when the factory doesn't
/// recognize it.
pub trait CommandFactory: Send + Sync {
    /// Name the factory answers to.
    fn name(&self) -> &'static str;

    /// Attempt to create a command instance for the provided tokens.
    fn try_create(&self, argv: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_loop_convention() {
        assert_eq!(Status::Stop as i32, 0);
        assert_ne!(Status::Continue as i32, 0);
        assert!(Status::Stop.is_stop());
        assert!(!Status::Continue.is_stop());
    }
}
