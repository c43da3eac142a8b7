//! B-minor compiler entry point.

fn main() {
    if let Err(e) = bminor::cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
