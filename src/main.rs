use argh::FromArgs;
use lsh::Interpreter;
use lsh::command::Io;
use lsh::reader::LineReader;
use std::io;
use std::process::ExitCode;

#[derive(FromArgs)]
/// A small line-oriented command interpreter.
struct Args {
    #[argh(option, default = "lsh::DEFAULT_PROMPT.to_string()")]
    /// text printed before each command line is read.
    prompt: String,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    if let Err(e) = lsh::install_interrupt_handler() {
        eprintln!("lsh: warning: {e:#}");
    }

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    let mut io = Io::new(&mut stdout, &mut stderr);
    let mut reader = LineReader::stdin();

    match Interpreter::default()
        .with_prompt(args.prompt)
        .repl(&mut reader, &mut io)
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lsh: {e:#}");
            ExitCode::FAILURE
        }
    }
}
