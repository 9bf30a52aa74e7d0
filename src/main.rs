//! Lingo CLI
//!
//! Command-line interface for locale routing and translation lookups.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match lingo_cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // clap has already reported usage errors
            if !is_bare(&e) {
                eprintln!("Error: {e}");
            }

            let code = u8::try_from(e.exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

/// Errors with no message of their own, already reported by clap.
fn is_bare(e: &lingo_cli::Error) -> bool {
    matches!(e, lingo_cli::Error::InvalidArgument(msg) if msg.is_empty())
}
