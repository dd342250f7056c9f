use std::{
    io::{stdin, stdout, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use itertools::Itertools;

use interpreter::{InterpretError, Interpreter, RuntimeError};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Dump {
    Tokens,
    Ast,
}

#[derive(clap::Parser)]
#[command(version, about)]
struct Args {
    /// Script to run. Starts a prompt if omitted.
    file: Option<PathBuf>,

    /// Print the scanned tokens or the parsed statements instead of running.
    #[arg(long, value_enum)]
    dump: Option<Dump>,
}

fn dump(source: &str, what: Dump) -> Result<(), InterpretError> {
    let tokens = scanner::scan(source)?;
    match what {
        Dump::Tokens => {
            let lines = tokens
                .iter()
                .map(|t| format!("{:>4} {} {:?}", t.line().0, t.kind(), t.lexeme()))
                .join("\n");
            println!("{lines}");
        }
        Dump::Ast => {
            for stmt in parser::parse(&tokens)? {
                println!("{stmt}");
            }
        }
    }
    Ok(())
}

/// Exit status for a failed script, following sysexits.h.
fn exit_code(error: &InterpretError) -> u8 {
    match error {
        InterpretError::Compile(_) => 65,
        InterpretError::Runtime(RuntimeError::Output(_)) => 74,
        InterpretError::Runtime(_) => 70,
    }
}

/// Diagnostics are printed here as rendered, only failing to read the script is an `Err`.
fn run_file(
    path: PathBuf,
    dump_mode: Option<Dump>,
    interpreter: &mut Interpreter,
) -> anyhow::Result<ExitCode> {
    let source =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;

    let result = match dump_mode {
        Some(what) => dump(&source, what),
        None => interpreter.run_source(&source),
    };

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{e}");
            Ok(ExitCode::from(exit_code(&e)))
        }
    }
}

fn run_prompt(dump_mode: Option<Dump>, interpreter: &mut Interpreter) -> anyhow::Result<()> {
    loop {
        print!("> ");
        stdout().flush()?;

        let mut line = String::new();
        if stdin().read_line(&mut line)? == 0 {
            return Ok(());
        }

        if let Some(what) = dump_mode {
            if let Err(e) = dump(&line, what) {
                eprintln!("{e}");
            }
            continue;
        }

        match interpreter.run_line(&line) {
            Ok(Some(value)) => println!("{value}"),
            Ok(None) => (),
            Err(e) => eprintln!("{e}"),
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let mut interpreter = Interpreter::default();

    match args.file {
        Some(file) => {
            log::debug!("Running {}", file.display());
            run_file(file, args.dump, &mut interpreter)
        }
        None => run_prompt(args.dump, &mut interpreter).map(|()| ExitCode::SUCCESS),
    }
}
