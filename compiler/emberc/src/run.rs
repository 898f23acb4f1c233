//! The `run` command: load a JSON AST, execute it and drain the event loop.

use ember_eval::{stdout_handler, EvalError, Interpreter, SharedPrintHandler, Value};

use crate::load::{load_ast, LoadError};

/// Flags accepted by `ember run`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Seed for `rand`; OS entropy when absent.
    pub seed: Option<u64>,
    /// Closure call depth limit; the interpreter default when absent.
    pub max_depth: Option<usize>,
    /// Suppress the report of the program's result.
    pub quiet: bool,
}

/// Parse `run` flags. Unknown or malformed flags are warned about and skipped.
pub fn parse_run_options(args: &[String]) -> RunOptions {
    let mut options = RunOptions::default();

    for arg in args {
        if let Some(seed) = arg.strip_prefix("--seed=") {
            match seed.parse() {
                Ok(seed) => options.seed = Some(seed),
                Err(_) => eprintln!("warning: invalid seed '{seed}', using OS entropy"),
            }
        } else if let Some(depth) = arg.strip_prefix("--max-depth=") {
            match depth.parse() {
                Ok(depth) => options.max_depth = Some(depth),
                Err(_) => eprintln!("warning: invalid max depth '{depth}', using the default"),
            }
        } else if arg == "--quiet" || arg == "-q" {
            options.quiet = true;
        } else if arg.starts_with('-') {
            eprintln!("warning: unknown option '{arg}'");
        }
    }

    options
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl RunError {
    /// Label used in the `error[..]` report.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Load(_) => "InvalidAst",
            Self::Eval(err) => err.kind_name(),
        }
    }
}

/// Load and run a program held in memory, printing through `print_handler`.
pub fn run_source(
    text: &str,
    options: &RunOptions,
    print_handler: SharedPrintHandler,
) -> Result<Value, RunError> {
    let ast = load_ast(text)?.into_shared();

    let mut builder = Interpreter::builder().print_handler(print_handler);
    if let Some(seed) = options.seed {
        builder = builder.seed(seed);
    }
    if let Some(depth) = options.max_depth {
        builder = builder.max_call_depth(depth);
    }

    let mut interpreter = builder.build();
    Ok(interpreter.run(&ast)?)
}

/// Run a program file, exiting with status 1 on any failure.
pub fn run_file(path: &str, options: &RunOptions) {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    };

    match run_source(&text, options, stdout_handler()) {
        Ok(value) => {
            if !options.quiet && !value.is_null() {
                println!("{value}");
            }
        }
        Err(err) => {
            eprintln!("error[{}]: {err}", err.kind_name());
            std::process::exit(1);
        }
    }
}
