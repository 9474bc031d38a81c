//! Entry point for the `refuel` command-line interface.
#![forbid(unsafe_code)]

use refuel_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    match refuel_cli::run() {
        Ok(()) => {}
        // Help, version and usage errors keep clap's formatting and exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("refuel: {err}");
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
