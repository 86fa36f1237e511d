//! A small line-oriented command interpreter.
//!
//! Each input line is split into words and either handed to one of the
//! built-in commands (`cd`, `ls`, `cat`, `help`, `exit`, `cp`) or launched as
//! an external program, which the interpreter waits on before prompting again.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`],
//! [`env`], [`reader`] and [`tokenizer`] expose the pieces it is built from,
//! so each stage of the read-tokenize-dispatch cycle can be driven on its own.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
pub mod reader;
pub mod tokenizer;

pub use builtin::{BuiltinTable, builtins};
pub use external::{ChildOutcome, install_interrupt_handler};
pub use interpreter::{DEFAULT_PROMPT, Interpreter};
