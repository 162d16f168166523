use std::{env, process};

use pundi::{
    cli::{output, run_cli, USAGE},
    errors::CliError,
};

fn main() {
    if let Err(err) = run_cli(env::args().skip(1)) {
        output::error(&err);
        if matches!(err, CliError::Usage(_)) {
            eprintln!("{USAGE}");
        }
        process::exit(1);
    }
}
