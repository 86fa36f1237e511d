use crate::command::{ExecutableCommand, Io, Status};
use crate::env::Environment;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::process::{Child, Command};

/// How a launched program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    /// The program exited with this status code.
    Exited(i32),
    /// The program was killed by this signal number.
    Signaled(i32),
}

/// Command that is not a builtin.
///
/// The program is resolved through the search path and inherits the
/// shell's standard streams.
pub struct ExternalCommand {
    name: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: OsString, args: Vec<OsString>) -> Self {
        Self { name, args }
    }

    /// Build from a token sequence: program first, its arguments after.
    pub fn from_tokens(argv: &[&str]) -> Option<Self> {
        let (name, args) = argv.split_first()?;
        Some(Self::new(
            name.into(),
            args.iter().map(|x| x.into()).collect(),
        ))
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, io: &mut Io<'_>, env: &mut Environment) -> Result<Status> {
        let name = self.name.to_string_lossy();
        let mut child = match Command::new(&self.name).args(&self.args).spawn() {
            Ok(child) => child,
            Err(e) => {
                // Nothing was started, so there is nothing to wait for.
                writeln!(io.stderr, "lsh: {name}: {e}")?;
                return Ok(Status::Continue);
            }
        };

        match wait_for(&mut child) {
            Ok(outcome) => env.last_child = Some(outcome),
            Err(e) => writeln!(io.stderr, "lsh: {name}: {e:#}")?,
        }
        // A failing child never stops the shell.
        Ok(Status::Continue)
    }
}

/// Block until `child` exits or is killed.
///
/// Stop reports and interrupted waits are not terminal: the wait is simply
/// issued again.
#[cfg(unix)]
fn wait_for(child: &mut Child) -> Result<ChildOutcome> {
    use nix::errno::Errno;
    use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
    use nix::unistd::Pid;

    let pid = Pid::from_raw(child.id() as i32);
    loop {
        match waitpid(pid, Some(WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(ChildOutcome::Exited(code)),
            Ok(WaitStatus::Signaled(_, signal, _)) => {
                return Ok(ChildOutcome::Signaled(signal as i32));
            }
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(e) => return Err(e).context("waitpid"),
        }
    }
}

#[cfg(not(unix))]
fn wait_for(child: &mut Child) -> Result<ChildOutcome> {
    let status = child.wait().context("wait")?;
    Ok(ChildOutcome::Exited(status.code().unwrap_or(-1)))
}

/// Keep SIGINT from killing the shell.
///
/// A do-nothing handler is installed instead of ignoring the signal: handlers
/// are reset to the default on exec, so launched programs can still be
/// interrupted, while the shell's blocked wait or read is just resumed.
#[cfg(unix)]
pub fn install_interrupt_handler() -> Result<()> {
    use nix::libc::c_int;
    use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};

    extern "C" fn on_interrupt(_signal: c_int) {}

    let action = SigAction::new(
        SigHandler::Handler(on_interrupt),
        SaFlags::empty(),
        SigSet::empty(),
    );
    // SAFETY: the handler has an empty body, so it is async-signal-safe.
    unsafe { sigaction(Signal::SIGINT, &action) }.context("can't install SIGINT handler")?;
    Ok(())
}

#[cfg(not(unix))]
pub fn install_interrupt_handler() -> Result<()> {
    Ok(())
}
