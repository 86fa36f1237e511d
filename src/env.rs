use crate::external::ChildOutcome;
use std::env as stdenv;
use std::io;
use std::path::Path;

/// Process-wide state the interpreter's commands act on.
///
/// The working directory is genuine OS process state, so it is not cached
/// here: it is read straight from the process and changed only through
/// [`Environment::change_dir`], which needs `&mut self`. Holding the single
/// `Environment` of an interpreter is therefore the only way to move it.
#[derive(Debug, Default)]
pub struct Environment {
    /// Outcome of the most recently awaited external command, if any.
    pub last_child: Option<ChildOutcome>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the process's working directory.
    ///
    /// The path is used literally; on failure the directory is left as it was.
    pub fn change_dir(&mut self, path: &Path) -> io::Result<()> {
        stdenv::set_current_dir(path)
    }
}
