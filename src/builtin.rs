use crate::command::{CommandFactory, ExecutableCommand, Io, Status};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result, bail};
use argh::{EarlyExit, FromArgs};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "cat".
    fn name() -> &'static str;

    /// Builds the command from the words following its name.
    ///
    /// Words are positional and taken literally, even when they start with a
    /// dash. Only a lone `--help` asks argh for the usage text.
    fn parse(name: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        if args == ["--help"] {
            return Self::from_args(&[name], args);
        }
        let literal: Vec<&str> = std::iter::once("--").chain(args.iter().copied()).collect();
        Self::from_args(&[name], &literal)
    }

    /// Executes the command using the provided streams and environment.
    ///
    /// Errors are reported on stderr by the caller and never stop the shell.
    fn execute(self, io: &mut Io<'_>, env: &mut Environment) -> Result<Status>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, io: &mut Io<'_>, env: &mut Environment) -> Result<Status> {
        match <T as BuiltinCommand>::execute(*self, io, env) {
            Ok(x) => Ok(x),
            Err(e) => {
                writeln!(io.stderr, "lsh: {e:#}")?;
                Ok(Status::Continue)
            }
        }
    }
}

/// Parse failure or `--help` request, reported instead of running the builtin.
struct InvalidArgs {
    name: &'static str,
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, io: &mut Io<'_>, _env: &mut Environment) -> Result<Status> {
        let output = self.output.trim_end();
        if self.is_error {
            writeln!(io.stderr, "lsh: {}: {output}", self.name)?;
        } else {
            writeln!(io.stdout, "{output}")?;
        }
        Ok(Status::Continue)
    }
}

impl<T: BuiltinCommand + Send + Sync + 'static> CommandFactory for Factory<T> {
    fn name(&self) -> &'static str {
        T::name()
    }

    fn try_create(&self, argv: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let (&name, args) = argv.split_first()?;
        if name != T::name() {
            return None;
        }
        Some(match T::parse(name, args) {
            Ok(cmd) => Box::new(cmd),
            Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                name: T::name(),
                output,
                is_error: status.is_err(),
            }),
        })
    }
}

/// Fixed, ordered mapping from builtin names to their factories.
///
/// Lookups are exact, case-sensitive and scan the entries in order.
pub struct BuiltinTable {
    entries: Vec<Box<dyn CommandFactory>>,
}

impl BuiltinTable {
    /// The shell's own builtins: `cd`, `ls`, `cat`, `help`, `exit`, `cp`.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                Box::new(Factory::<Cd>::default()),
                Box::new(Factory::<Ls>::default()),
                Box::new(Factory::<Cat>::default()),
                Box::new(Factory::<Help>::default()),
                Box::new(Factory::<Exit>::default()),
                Box::new(Factory::<Cp>::default()),
            ],
        }
    }

    /// Names in table order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name())
    }

    /// Create the builtin named by `argv[0]`, or `None` if there is none.
    pub fn try_create(&self, argv: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        self.entries.iter().find_map(|entry| entry.try_create(argv))
    }
}

/// The process-wide builtin table, built on first use and never changed.
pub fn builtins() -> &'static BuiltinTable {
    static TABLE: OnceLock<BuiltinTable> = OnceLock::new();
    TABLE.get_or_init(BuiltinTable::standard)
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to, used literally.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, _io: &mut Io<'_>, env: &mut Environment) -> Result<Status> {
        let Some(target) = self.target else {
            bail!("expected argument to \"cd\"");
        };
        env.change_dir(Path::new(&target))
            .with_context(|| format!("cd: {target}"))?;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// List the entries of a directory, skipping names that start with a dot.
pub struct Ls {
    #[argh(positional)]
    /// directory to list. Defaults to the current directory.
    pub dir: Option<String>,
}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn execute(self, io: &mut Io<'_>, _env: &mut Environment) -> Result<Status> {
        let dir = self.dir.as_deref().unwrap_or(".");
        let entries =
            fs::read_dir(dir).with_context(|| format!("ls: unable to open directory {dir}"))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("ls: {dir}"))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            write!(io.stdout, "{name} ")?;
        }
        writeln!(io.stdout)?;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// Print files to standard output, stopping at the first one that fails.
pub struct Cat {
    #[argh(positional, greedy)]
    /// files to print, in order.
    pub files: Vec<String>,
}

impl BuiltinCommand for Cat {
    fn name() -> &'static str {
        "cat"
    }

    fn execute(self, io: &mut Io<'_>, _env: &mut Environment) -> Result<Status> {
        if self.files.is_empty() {
            bail!("cat: file name not given");
        }
        // The first failing file aborts the rest of the invocation.
        for fname in &self.files {
            let mut f = File::open(fname).with_context(|| format!("cat: {fname}"))?;
            std::io::copy(&mut f, &mut *io.stdout).with_context(|| format!("cat: {fname}"))?;
        }
        writeln!(io.stdout)?;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// Copy a source file to a destination, creating or truncating it.
pub struct Cp {
    #[argh(positional, greedy)]
    /// source and destination paths.
    pub files: Vec<String>,
}

impl BuiltinCommand for Cp {
    fn name() -> &'static str {
        "cp"
    }

    fn execute(self, _io: &mut Io<'_>, _env: &mut Environment) -> Result<Status> {
        let (source, dest) = match self.files.as_slice() {
            [source, dest] => (source, dest),
            files if files.len() < 2 => bail!("cp: too few files"),
            _ => bail!("cp: too many files"),
        };

        let mut input = File::open(source).with_context(|| format!("cp: {source}"))?;
        let mut output = File::create(dest).with_context(|| format!("cp: {dest}"))?;
        std::io::copy(&mut input, &mut output)
            .with_context(|| format!("cp: can't copy {source} to {dest}"))?;
        output
            .flush()
            .with_context(|| format!("cp: can't copy {source} to {dest}"))?;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// Show how to use the shell and which commands are built in.
pub struct Help {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    // Arguments are ignored; `help --help` still lists the builtins.
    fn parse(_name: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Self {
            _args: args.iter().map(|arg| arg.to_string()).collect(),
        })
    }

    fn execute(self, io: &mut Io<'_>, _env: &mut Environment) -> Result<Status> {
        writeln!(io.stdout, "Type program names and arguments, and hit enter.")?;
        writeln!(io.stdout, "The following are built in:")?;
        for name in builtins().names() {
            writeln!(io.stdout, " {name}")?;
        }
        writeln!(
            io.stdout,
            "Use the man command for information on other programs."
        )?;
        Ok(Status::Continue)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    // Any arguments, `--help` included, are accepted and ignored.
    fn parse(_name: &str, args: &[&str]) -> Result<Self, EarlyExit> {
        Ok(Self {
            _args: args.iter().map(|arg| arg.to_string()).collect(),
        })
    }

    fn execute(self, _io: &mut Io<'_>, _env: &mut Environment) -> Result<Status> {
        Ok(Status::Stop)
    }
}
