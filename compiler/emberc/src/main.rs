//! Ember CLI
//!
//! `ember run <file.json>` runs a program given as the parser's JSON node tree.

use emberc::{init_tracing, parse_run_options, run_file};

fn print_usage() {
    eprintln!("Usage: ember <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file.json>    Run a program from its JSON AST");
    eprintln!();
    eprintln!("Run options:");
    eprintln!("  --seed=<n>         Seed the random number generator");
    eprintln!("  --max-depth=<n>    Maximum nested function calls (default: 10000)");
    eprintln!("  -q, --quiet        Do not print the program's result");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=ember_eval=debug) to enable logging.");
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => {
            let Some(path) = args.iter().skip(2).find(|arg| !arg.starts_with('-')) else {
                eprintln!("error: missing file path");
                eprintln!("Usage: ember run <file.json> [--seed=<n>] [--max-depth=<n>] [--quiet]");
                std::process::exit(1);
            };
            let options = parse_run_options(&args[2..]);
            run_file(path, &options);
        }
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            std::process::exit(1);
        }
    }
}
