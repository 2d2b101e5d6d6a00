//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = restorank_cli::run() {
        eprintln!("restorank: {err}");
        std::process::exit(1);
    }
}
