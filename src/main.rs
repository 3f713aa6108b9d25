//! dylt command-line entry point
//!
//! ```bash
//! dylt                                  # URL from the clipboard, full video
//! dylt -u <URL> -c 0:08-5:01,6:00-6:30  # keep two ranges
//! dylt -u <URL> -a -n "talk" -t rust    # audio only, custom name with a tag
//! ```

use clap::Parser;
use tracing::error;

use dylt::cli::{commands, Cli};

/// Main entry point for the dylt CLI application
fn main() {
    // Help and version exit 0, argument errors exit 1 like every other failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };

    if let Err(err) = commands::execute(&cli) {
        error!("{:#}", err);
        eprintln!("{}", commands::describe_error(&err));
        std::process::exit(1);
    }
}
