//! `blob-path`: read, write or restructure a JSON document by key path.
//!
//! Usage:
//!   blob-path [-v] <get|put|add|remove|keys|size> <pointer> [value]
//!
//! The document is read from stdin and the result is written to stdout.

use blob_json::json_cli::{init_logging, parse_args, run};
use std::io::{self, Read, Write};

fn main() {
    let invocation = match parse_args(std::env::args().skip(1)) {
        Ok(inv) => inv,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    init_logging(invocation.verbose);

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match run(&invocation.command, &buf) {
        Ok(result) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
