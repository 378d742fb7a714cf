//! fitcheck CLI binary
//!
//! Minimal entrypoint; all logic is in the library. `cli::run()` handles
//! all output including errors, main only maps to a process exit code.

#[tokio::main]
async fn main() {
    if let Err(code) = fitcheck::cli::run().await {
        std::process::exit(code);
    }
}
