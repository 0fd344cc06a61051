//! FloraDB CLI entry point
//!
//! A minimal entrypoint: parse arguments, dispatch, exit non-zero on
//! failure. All logic lives in the cli module.

use floradb::cli;

fn main() {
    if cli::run().is_err() {
        std::process::exit(1);
    }
}
