//! CLI tool to generate deployment secrets for the CMS.
//!
//! Usage: `cargo run --bin generate-keys >> .env`
//!
//! Prints `NAME=value` lines to stdout.

use std::process::ExitCode;

use gameloop::keys::{format_env, generate_deployment_keys};

fn main() -> ExitCode {
    match generate_deployment_keys() {
        Ok(keys) => {
            print!("{}", format_env(&keys));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to generate keys: {}", e);
            ExitCode::FAILURE
        }
    }
}
